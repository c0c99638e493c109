use actix_web::{web, HttpResponse};

use crate::error::CmsError;
use crate::tree::DocumentTree;

pub async fn metadata(
    path: web::Path<i64>,
    tree: web::Data<DocumentTree>,
) -> Result<HttpResponse, CmsError> {
    let doc = tree
        .document_by_id(path.into_inner())
        .await
        .ok_or(CmsError::NotFound)?;
    Ok(HttpResponse::Ok().json(doc))
}

/// Live payload, served with the stored MIME type.
pub async fn content(
    path: web::Path<i64>,
    tree: web::Data<DocumentTree>,
) -> Result<HttpResponse, CmsError> {
    let (doc, data) = tree.content(path.into_inner()).await?;
    let mime = doc
        .mime_type
        .unwrap_or_else(|| "application/octet-stream".to_string());
    Ok(HttpResponse::Ok().content_type(mime).body(data))
}

pub async fn children(
    path: web::Path<i64>,
    tree: web::Data<DocumentTree>,
) -> Result<HttpResponse, CmsError> {
    let children = tree.children_of(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(children))
}
