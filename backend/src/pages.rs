//! Public document serving and the embedded admin assets.

use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use include_dir::{include_dir, Dir};
use mime_guess::from_path;

use crate::tree::DocumentTree;

static STATIC_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/static/dist");

/// One file from the embedded frontend build.
pub fn embedded_response(file_path: &str) -> HttpResponse {
    match STATIC_DIR.get_file(file_path) {
        Some(file) => {
            let mime = from_path(file_path).first_or_octet_stream();
            HttpResponse::Ok()
                .content_type(mime.as_ref())
                .body(file.contents().to_vec())
        }
        None => HttpResponse::NotFound().body("Not Found"),
    }
}

/// Fallback inside the `/admin` scope: every path that is not an API route
/// gets the SPA shell.
pub async fn admin_shell() -> HttpResponse {
    embedded_response("index.html")
}

/// App-level default service. Request paths resolve through the document
/// tree first; folders fall through to an `index.html` child. Paths that
/// are no document may still be embedded frontend assets.
pub async fn serve_public(req: HttpRequest, tree: web::Data<DocumentTree>) -> HttpResponse {
    let path = req.path();
    if let Some(doc) = tree.document_from_path(path).await {
        let target = if doc.folder {
            let index_path = format!("{}/index.html", path.trim_end_matches('/'));
            tree.document_from_path(&index_path).await
        } else {
            Some(doc)
        };
        if let Some(doc) = target {
            return match tree.content(doc.id).await {
                Ok((doc, data)) => {
                    let mime = doc
                        .mime_type
                        .unwrap_or_else(|| "application/octet-stream".to_string());
                    HttpResponse::Ok().content_type(mime).body(data)
                }
                Err(err) => err.error_response(),
            };
        }
        return HttpResponse::NotFound().body("Not Found");
    }
    embedded_response(path.trim_start_matches('/'))
}
