use actix_web::{web, HttpResponse};
use common::requests::CreateDocumentRequest;

use crate::error::CmsError;
use crate::tree::DocumentTree;

pub async fn folder(
    path: web::Path<i64>,
    payload: web::Json<CreateDocumentRequest>,
    tree: web::Data<DocumentTree>,
) -> Result<HttpResponse, CmsError> {
    let doc = tree.create_folder(path.into_inner(), &payload.name).await?;
    Ok(HttpResponse::Ok().json(doc))
}

/// Creates an empty text file; non-text names are refused.
pub async fn text_file(
    path: web::Path<i64>,
    payload: web::Json<CreateDocumentRequest>,
    tree: web::Data<DocumentTree>,
) -> Result<HttpResponse, CmsError> {
    let doc = tree
        .create_text_file(path.into_inner(), &payload.name)
        .await?;
    Ok(HttpResponse::Ok().json(doc))
}
