use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use futures_util::StreamExt;
use log::info;

use crate::error::CmsError;
use crate::tree::DocumentTree;

/// `POST /admin/api/document/{parent_id}/upload`. Every file part of the
/// multipart payload becomes a document under the folder; an existing name
/// is overwritten after its content is backed up as a new version.
pub async fn process(
    path: web::Path<i64>,
    mut payload: Multipart,
    tree: web::Data<DocumentTree>,
) -> Result<HttpResponse, CmsError> {
    let parent_id = path.into_inner();
    let mut stored = Vec::new();

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(bad_multipart)?;
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(|f| f.to_string()));
        let Some(file_name) = file_name else {
            continue;
        };

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            data.extend_from_slice(&chunk.map_err(bad_multipart)?);
        }
        info!(
            "upload of '{}' ({} bytes) into folder {}",
            file_name,
            data.len(),
            parent_id
        );
        stored.push(tree.store_document(parent_id, &file_name, &data).await?);
    }

    if stored.is_empty() {
        return Err(CmsError::BadRequest("no file part in the upload".into()));
    }
    Ok(HttpResponse::Ok().json(stored))
}

fn bad_multipart(err: actix_multipart::MultipartError) -> CmsError {
    CmsError::BadRequest(format!("broken multipart payload: {err}"))
}
