pub mod archive;
pub mod auth;
pub mod config;
pub mod error;
pub mod pages;
pub mod services;
pub mod store;
pub mod tree;

use actix_web::middleware::from_fn;
use actix_web::web;

/// Route wiring shared by `main` and the integration tests. Application
/// data (document tree, auth state, config) is registered by the caller.
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/login/")
            .route(web::get().to(auth::login_page))
            .route(web::post().to(auth::login)),
    )
    .service(web::resource("/logout").route(web::post().to(auth::logout)))
    .service(
        web::scope("/admin")
            .wrap(from_fn(auth::require_admin))
            .service(services::documents::configure_routes())
            .default_service(web::route().to(pages::admin_shell)),
    )
    .default_service(web::route().to(pages::serve_public));
}
