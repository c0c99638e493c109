use actix_web::{web, HttpResponse};
use common::requests::SearchQuery;

use crate::tree::DocumentTree;

/// `GET /admin/api/document/search?q=`. Case-insensitive substring match
/// over full paths.
pub async fn process(query: web::Query<SearchQuery>, tree: web::Data<DocumentTree>) -> HttpResponse {
    let hits = tree.documents_by_path(&query.q).await;
    HttpResponse::Ok().json(hits)
}
