use actix_multipart::Multipart;
use actix_web::http::header;
use actix_web::{web, HttpResponse};
use futures_util::StreamExt;
use log::info;

use crate::archive;
use crate::error::CmsError;
use crate::tree::DocumentTree;

/// `GET /admin/api/document/{id}/archive`. ZIP download of the subtree.
pub async fn export(
    path: web::Path<i64>,
    tree: web::Data<DocumentTree>,
) -> Result<HttpResponse, CmsError> {
    let (doc, bytes) = archive::export_archive(&tree, path.into_inner()).await?;
    let file_name = if doc.name.is_empty() {
        "root".to_string()
    } else {
        doc.name
    };
    Ok(HttpResponse::Ok()
        .content_type("application/zip")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}.zip\""),
        ))
        .body(bytes))
}

/// `POST /admin/api/document/{id}/archive`. Takes the first file part of
/// the multipart payload as a ZIP archive and unpacks it into the folder.
pub async fn import(
    path: web::Path<i64>,
    mut payload: Multipart,
    tree: web::Data<DocumentTree>,
) -> Result<HttpResponse, CmsError> {
    let folder_id = path.into_inner();
    let mut archive_bytes: Option<Vec<u8>> = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(bad_multipart)?;
        if field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .is_none()
        {
            continue;
        }
        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            data.extend_from_slice(&chunk.map_err(bad_multipart)?);
        }
        archive_bytes = Some(data);
        break;
    }

    let Some(bytes) = archive_bytes else {
        return Err(CmsError::BadRequest("no archive in the upload".into()));
    };
    let imported = archive::import_archive(&tree, folder_id, &bytes).await?;
    info!("imported {} documents into folder {}", imported, folder_id);
    Ok(HttpResponse::Ok().body(imported.to_string()))
}

fn bad_multipart(err: actix_multipart::MultipartError) -> CmsError {
    CmsError::BadRequest(format!("broken multipart payload: {err}"))
}
