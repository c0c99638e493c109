use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use backend::auth::AuthState;
use backend::config::Config;
use backend::store::Store;
use backend::tree::DocumentTree;
use env_logger::Env;
use log::{info, warn};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env();
    if config.admin_password == "admin" {
        warn!("running with the default admin credentials, set SOMA_ADMIN_PASSWORD");
    }

    let store = Arc::new(Store::open(&config.database).map_err(std::io::Error::other)?);
    let tree = web::Data::new(DocumentTree::load(store).map_err(std::io::Error::other)?);
    let auth = web::Data::new(AuthState::new());
    let bind = config.bind;
    let config = web::Data::new(config);

    info!("soma-cms listening on http://{}", bind);

    HttpServer::new(move || {
        App::new()
            .app_data(web::PayloadConfig::new(10 * 1024 * 1024)) // 10 MB
            .app_data(tree.clone())
            .app_data(auth.clone())
            .app_data(config.clone())
            .configure(backend::configure_app)
    })
    .bind(bind)?
    .run()
    .await
}
