use actix_web::{web, HttpResponse};
use log::info;

use crate::error::CmsError;
use crate::tree::DocumentTree;

/// `DELETE /admin/api/document/{id}`. Recursive; answers with the
/// metadata of the removed document.
pub async fn process(
    path: web::Path<i64>,
    tree: web::Data<DocumentTree>,
) -> Result<HttpResponse, CmsError> {
    let doc = tree.delete_document(path.into_inner()).await?;
    info!("deleted document {} '{}'", doc.id, doc.name);
    Ok(HttpResponse::Ok().json(doc))
}
