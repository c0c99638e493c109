//! Session handling and the admin gate.
//!
//! Sessions are random tokens kept in shared state, handed out by the
//! login form and carried in a cookie. The `require_admin` middleware
//! wraps the whole `/admin` scope and splits unauthenticated requests the
//! way browsers need it: API calls (which arrive via fetch) get a bare
//! 403 so the caller can react, page loads get a redirect to the login
//! form.

use std::collections::HashSet;
use std::sync::Arc;

use actix_web::body::{BoxBody, MessageBody};
use actix_web::cookie::Cookie;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::middleware::Next;
use actix_web::{web, HttpRequest, HttpResponse};
use common::editor::LOGIN_PATH;
use common::requests::LoginForm;
use log::info;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::Config;
use crate::pages;

pub const SESSION_COOKIE: &str = "soma_session";

/// Shared set of live session tokens.
#[derive(Clone, Default)]
pub struct AuthState {
    sessions: Arc<RwLock<HashSet<String>>>,
}

impl AuthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn issue(&self) -> String {
        let token = Uuid::new_v4().to_string();
        self.sessions.write().await.insert(token.clone());
        token
    }

    pub async fn revoke(&self, token: &str) {
        self.sessions.write().await.remove(token);
    }

    pub async fn is_valid(&self, token: &str) -> bool {
        self.sessions.read().await.contains(token)
    }
}

/// Gate for everything under `/admin`. Unauthenticated API requests get
/// 403, unauthenticated page requests get sent to the login form.
pub async fn require_admin(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<BoxBody>, actix_web::Error> {
    let auth = req.app_data::<web::Data<AuthState>>().cloned();
    let authorized = match (req.cookie(SESSION_COOKIE), auth) {
        (Some(cookie), Some(auth)) => auth.is_valid(cookie.value()).await,
        _ => false,
    };
    if authorized {
        return Ok(next.call(req).await?.map_into_boxed_body());
    }

    let (req, _payload) = req.into_parts();
    let response = if req.path().starts_with("/admin/api/") {
        HttpResponse::Forbidden().finish()
    } else {
        HttpResponse::Found()
            .insert_header((header::LOCATION, LOGIN_PATH))
            .finish()
    };
    Ok(ServiceResponse::new(req, response))
}

pub async fn login_page() -> HttpResponse {
    pages::embedded_response("login.html")
}

/// `POST /login/`. On success a session cookie is set and the browser is
/// sent to the admin page; on failure back to the form.
pub async fn login(
    form: web::Form<LoginForm>,
    config: web::Data<Config>,
    auth: web::Data<AuthState>,
) -> HttpResponse {
    if form.username == config.admin_user && form.password == config.admin_password {
        let token = auth.issue().await;
        info!("admin '{}' logged in", form.username);
        let cookie = Cookie::build(SESSION_COOKIE, token)
            .path("/")
            .http_only(true)
            .finish();
        HttpResponse::Found()
            .cookie(cookie)
            .insert_header((header::LOCATION, "/admin/"))
            .finish()
    } else {
        info!("rejected login for '{}'", form.username);
        HttpResponse::Found()
            .insert_header((header::LOCATION, "/login/?failed=1"))
            .finish()
    }
}

/// `POST /logout`. Drops the session and clears the cookie.
pub async fn logout(req: HttpRequest, auth: web::Data<AuthState>) -> HttpResponse {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        auth.revoke(cookie.value()).await;
    }
    let mut removal = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    removal.make_removal();
    HttpResponse::Found()
        .cookie(removal)
        .insert_header((header::LOCATION, LOGIN_PATH))
        .finish()
}
