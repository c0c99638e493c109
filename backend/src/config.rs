use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use log::warn;

/// Server configuration, read once at startup from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// `SOMA_BIND`, default `127.0.0.1:8080`.
    pub bind: SocketAddr,
    /// `SOMA_DB`, default `soma-cms.sqlite` in the working directory.
    pub database: PathBuf,
    /// `SOMA_ADMIN_USER` / `SOMA_ADMIN_PASSWORD`, default `admin` / `admin`.
    pub admin_user: String,
    pub admin_password: String,
}

impl Config {
    pub fn from_env() -> Self {
        let bind = env::var("SOMA_BIND")
            .ok()
            .and_then(|raw| match raw.parse() {
                Ok(addr) => Some(addr),
                Err(_) => {
                    warn!("ignoring unparseable SOMA_BIND value '{raw}'");
                    None
                }
            })
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8080)));
        let database = env::var_os("SOMA_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("soma-cms.sqlite"));
        let admin_user = env::var("SOMA_ADMIN_USER").unwrap_or_else(|_| "admin".to_string());
        let admin_password =
            env::var("SOMA_ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_string());
        Self {
            bind,
            database,
            admin_user,
            admin_password,
        }
    }
}
