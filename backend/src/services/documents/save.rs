use actix_web::{web, HttpResponse};
use log::info;

use crate::error::CmsError;
use crate::tree::DocumentTree;

/// `PUT /admin/api/document/{id}/save`. The request body is the raw
/// document text; the previous content becomes a backup version.
pub async fn process(
    path: web::Path<i64>,
    body: web::Bytes,
    tree: web::Data<DocumentTree>,
) -> Result<HttpResponse, CmsError> {
    let id = path.into_inner();
    let text = std::str::from_utf8(&body)
        .map_err(|_| CmsError::BadRequest("document text must be valid UTF-8".into()))?;
    let doc = tree.save_text(id, text.as_bytes()).await?;
    info!("saved document {} ({} bytes)", id, doc.size);
    Ok(HttpResponse::Ok().body("Document saved"))
}
