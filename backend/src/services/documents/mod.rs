//! # Document Service Module
//!
//! Aggregates the admin API endpoints for the document tree. The scope is
//! mounted inside `/admin`, so the full base path is `/admin/api/document`
//! and every route below is behind the session gate.
//!
//! ## Registered routes:
//!
//! *   **`GET /search?q=`** — path substring search over the whole tree.
//! *   **`PUT /{id}/save`** — overwrite the live text of a document; the
//!     raw request body is the new content. The previous content is kept
//!     as a backup version.
//! *   **`GET /{id}/content`** — live payload with its stored MIME type.
//! *   **`GET /{id}/children`** — metadata of a folder's children.
//! *   **`GET /{id}/archive`** — ZIP export of the subtree.
//! *   **`POST /{id}/archive`** — multipart ZIP import into the folder.
//! *   **`POST /{parent_id}/folder`** — create a folder.
//! *   **`POST /{parent_id}/file`** — create an empty text file.
//! *   **`POST /{parent_id}/upload`** — multipart file upload; existing
//!     names are overwritten with a backup version.
//! *   **`GET /{id}`** / **`DELETE /{id}`** — metadata and recursive
//!     delete.

mod archive_io;
mod create;
mod delete;
mod get;
mod save;
mod search;
mod upload;

use actix_web::web::{resource, scope};
use actix_web::{web, Scope};

/// Base path of the document API inside the `/admin` scope.
const API_PATH: &str = "/api/document";

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/search", web::get().to(search::process))
        .route("/{id}/save", web::put().to(save::process))
        .route("/{id}/content", web::get().to(get::content))
        .route("/{id}/children", web::get().to(get::children))
        .service(
            resource("/{id}/archive")
                .route(web::get().to(archive_io::export))
                .route(web::post().to(archive_io::import)),
        )
        .route("/{parent_id}/folder", web::post().to(create::folder))
        .route("/{parent_id}/file", web::post().to(create::text_file))
        .route("/{parent_id}/upload", web::post().to(upload::process))
        .service(
            resource("/{id}")
                .route(web::get().to(get::metadata))
                .route(web::delete().to(delete::process)),
        )
}
