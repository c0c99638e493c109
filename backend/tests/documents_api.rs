use std::sync::Arc;

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use backend::auth::{AuthState, SESSION_COOKIE};
use backend::config::Config;
use backend::store::Store;
use backend::tree::DocumentTree;
use common::model::document::{Document, SearchResult, ROOT_ID};
use common::requests::{CreateDocumentRequest, LoginForm};

const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

struct TestState {
    store: Arc<Store>,
    tree: web::Data<DocumentTree>,
    auth: web::Data<AuthState>,
    config: web::Data<Config>,
}

fn setup() -> TestState {
    let store = Arc::new(Store::open_in_memory().unwrap());
    let tree = web::Data::new(DocumentTree::load(store.clone()).unwrap());
    let auth = web::Data::new(AuthState::new());
    let config = web::Data::new(Config {
        bind: ([127, 0, 0, 1], 0).into(),
        database: ":memory:".into(),
        admin_user: "admin".into(),
        admin_password: "letmein".into(),
    });
    TestState {
        store,
        tree,
        auth,
        config,
    }
}

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.tree.clone())
                .app_data($state.auth.clone())
                .app_data($state.config.clone())
                .configure(backend::configure_app),
        )
        .await
    };
}

fn session_header(token: &str) -> (header::HeaderName, String) {
    (header::COOKIE, format!("{SESSION_COOKIE}={token}"))
}

/// A single-file multipart payload the way a browser form sends it.
fn multipart_file(file_name: &str, bytes: &[u8]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

#[actix_web::test]
async fn save_persists_text_and_keeps_a_backup() {
    let state = setup();
    let file = state
        .tree
        .create_text_file(ROOT_ID, "page.html")
        .await
        .unwrap();
    let app = test_app!(state);
    let token = state.auth.issue().await;

    let req = test::TestRequest::put()
        .uri(&format!("/admin/api/document/{}/save", file.id))
        .insert_header(session_header(&token))
        .set_payload("hello world")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let (_, live) = state.tree.content(file.id).await.unwrap();
    assert_eq!(live, b"hello world");
    assert_eq!(state.store.latest_version(file.id).unwrap(), 1);

    let req = test::TestRequest::put()
        .uri(&format!("/admin/api/document/{}/save", file.id))
        .insert_header(session_header(&token))
        .set_payload("hello world, again")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(state.store.latest_version(file.id).unwrap(), 2);
    assert_eq!(state.store.content(file.id, 2).unwrap(), b"hello world");
}

#[actix_web::test]
async fn save_without_a_session_is_forbidden_and_stores_nothing() {
    let state = setup();
    let file = state
        .tree
        .create_text_file(ROOT_ID, "page.html")
        .await
        .unwrap();
    let app = test_app!(state);

    let req = test::TestRequest::put()
        .uri(&format!("/admin/api/document/{}/save", file.id))
        .set_payload("sneaky")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::put()
        .uri(&format!("/admin/api/document/{}/save", file.id))
        .insert_header(session_header("not-a-real-token"))
        .set_payload("sneaky")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let (_, live) = state.tree.content(file.id).await.unwrap();
    assert!(live.is_empty());
}

#[actix_web::test]
async fn unauthenticated_pages_redirect_but_api_calls_get_403() {
    let state = setup();
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/admin/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/login/"
    );

    let req = test::TestRequest::get()
        .uri("/admin/api/document/1")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn save_rejects_bad_targets() {
    let state = setup();
    let folder = state.tree.create_folder(ROOT_ID, "docs").await.unwrap();
    let file = state
        .tree
        .create_text_file(ROOT_ID, "ok.txt")
        .await
        .unwrap();
    let app = test_app!(state);
    let token = state.auth.issue().await;

    let req = test::TestRequest::put()
        .uri("/admin/api/document/9999/save")
        .insert_header(session_header(&token))
        .set_payload("text")
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );

    let req = test::TestRequest::put()
        .uri(&format!("/admin/api/document/{}/save", folder.id))
        .insert_header(session_header(&token))
        .set_payload("text")
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );

    let req = test::TestRequest::put()
        .uri(&format!("/admin/api/document/{}/save", file.id))
        .insert_header(session_header(&token))
        .set_payload(vec![0xff, 0xfe, 0x00])
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[actix_web::test]
async fn metadata_content_and_children_endpoints() {
    let state = setup();
    let docs = state.tree.create_folder(ROOT_ID, "docs").await.unwrap();
    let readme = state
        .tree
        .create_text_file(docs.id, "readme.md")
        .await
        .unwrap();
    state.tree.save_text(readme.id, b"# hi").await.unwrap();
    state.tree.create_folder(docs.id, "assets").await.unwrap();
    let app = test_app!(state);
    let token = state.auth.issue().await;

    let req = test::TestRequest::get()
        .uri(&format!("/admin/api/document/{}", readme.id))
        .insert_header(session_header(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let meta: Document = serde_json::from_slice(&test::read_body(resp).await).unwrap();
    assert_eq!(meta.name, "readme.md");
    assert_eq!(meta.parent_id, Some(docs.id));
    assert_eq!(meta.size, 4);

    let req = test::TestRequest::get()
        .uri(&format!("/admin/api/document/{}/content", readme.id))
        .insert_header(session_header(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/markdown"
    );
    assert_eq!(test::read_body(resp).await.as_ref(), b"# hi");

    let req = test::TestRequest::get()
        .uri(&format!("/admin/api/document/{}/children", docs.id))
        .insert_header(session_header(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let children: Vec<Document> = serde_json::from_slice(&test::read_body(resp).await).unwrap();
    let names: Vec<&str> = children.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["assets", "readme.md"]);
}

#[actix_web::test]
async fn create_and_delete_through_the_api() {
    let state = setup();
    let app = test_app!(state);
    let token = state.auth.issue().await;

    let req = test::TestRequest::post()
        .uri(&format!("/admin/api/document/{ROOT_ID}/folder"))
        .insert_header(session_header(&token))
        .set_json(CreateDocumentRequest {
            name: "blog".into(),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let folder: Document = serde_json::from_slice(&test::read_body(resp).await).unwrap();
    assert!(folder.folder);

    let req = test::TestRequest::post()
        .uri(&format!("/admin/api/document/{}/file", folder.id))
        .insert_header(session_header(&token))
        .set_json(CreateDocumentRequest {
            name: "post.md".into(),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let post: Document = serde_json::from_slice(&test::read_body(resp).await).unwrap();
    assert_eq!(post.mime_type.as_deref(), Some("text/markdown"));

    let req = test::TestRequest::post()
        .uri(&format!("/admin/api/document/{}/file", folder.id))
        .insert_header(session_header(&token))
        .set_json(CreateDocumentRequest {
            name: "photo.png".into(),
        })
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNSUPPORTED_MEDIA_TYPE
    );

    let req = test::TestRequest::delete()
        .uri(&format!("/admin/api/document/{}", folder.id))
        .insert_header(session_header(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/admin/api/document/{}", post.id))
        .insert_header(session_header(&token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn upload_creates_documents_and_backs_up_overwrites() {
    let state = setup();
    let app = test_app!(state);
    let token = state.auth.issue().await;

    let (content_type, body) = multipart_file("logo.svg", b"<svg/>");
    let req = test::TestRequest::post()
        .uri(&format!("/admin/api/document/{ROOT_ID}/upload"))
        .insert_header(session_header(&token))
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let stored: Vec<Document> = serde_json::from_slice(&test::read_body(resp).await).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].mime_type.as_deref(), Some("image/svg+xml"));

    let (content_type, body) = multipart_file("logo.svg", b"<svg>v2</svg>");
    let req = test::TestRequest::post()
        .uri(&format!("/admin/api/document/{ROOT_ID}/upload"))
        .insert_header(session_header(&token))
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let (_, live) = state.tree.content(stored[0].id).await.unwrap();
    assert_eq!(live, b"<svg>v2</svg>");
    assert_eq!(state.store.latest_version(stored[0].id).unwrap(), 1);
    assert_eq!(state.store.content(stored[0].id, 1).unwrap(), b"<svg/>");
}

#[actix_web::test]
async fn archive_export_import_roundtrip_over_http() {
    let state = setup();
    let site = state.tree.create_folder(ROOT_ID, "site").await.unwrap();
    state
        .tree
        .store_document(site.id, "index.html", b"<html>home</html>")
        .await
        .unwrap();
    let css = state.tree.create_folder(site.id, "css").await.unwrap();
    state
        .tree
        .store_document(css.id, "main.css", b"body {}")
        .await
        .unwrap();
    let restore = state.tree.create_folder(ROOT_ID, "restore").await.unwrap();
    let app = test_app!(state);
    let token = state.auth.issue().await;

    let req = test::TestRequest::get()
        .uri(&format!("/admin/api/document/{}/archive", site.id))
        .insert_header(session_header(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/zip"
    );
    let zip_bytes = test::read_body(resp).await;

    let (content_type, body) = multipart_file("site.zip", &zip_bytes);
    let req = test::TestRequest::post()
        .uri(&format!("/admin/api/document/{}/archive", restore.id))
        .insert_header(session_header(&token))
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await.as_ref(), b"4");

    let restored = state
        .tree
        .document_from_path("/restore/site/css/main.css")
        .await
        .unwrap();
    let (_, data) = state.tree.content(restored.id).await.unwrap();
    assert_eq!(data, b"body {}");
}

#[actix_web::test]
async fn search_finds_documents_by_path_fragment() {
    let state = setup();
    let docs = state.tree.create_folder(ROOT_ID, "Docs").await.unwrap();
    state
        .tree
        .create_text_file(docs.id, "Readme.txt")
        .await
        .unwrap();
    state
        .tree
        .create_text_file(ROOT_ID, "other.txt")
        .await
        .unwrap();
    let app = test_app!(state);
    let token = state.auth.issue().await;

    let req = test::TestRequest::get()
        .uri("/admin/api/document/search?q=readme")
        .insert_header(session_header(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let hits: Vec<SearchResult> = serde_json::from_slice(&test::read_body(resp).await).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].path, "/Docs/Readme.txt");
    assert!(!hits[0].document.folder);
}

#[actix_web::test]
async fn login_issues_a_session_and_logout_revokes_it() {
    let state = setup();
    let app = test_app!(state);

    let req = test::TestRequest::post()
        .uri("/login/")
        .set_form(LoginForm {
            username: "admin".into(),
            password: "wrong".into(),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/login/?failed=1"
    );
    assert!(resp
        .response()
        .cookies()
        .all(|c| c.name() != SESSION_COOKIE));

    let req = test::TestRequest::post()
        .uri("/login/")
        .set_form(LoginForm {
            username: "admin".into(),
            password: "letmein".into(),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/admin/");
    let token = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .unwrap()
        .value()
        .to_string();

    let req = test::TestRequest::get()
        .uri("/admin/")
        .insert_header(session_header(&token))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/logout")
        .insert_header(session_header(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let req = test::TestRequest::get()
        .uri("/admin/api/document/1")
        .insert_header(session_header(&token))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::FORBIDDEN
    );
}

#[actix_web::test]
async fn public_documents_are_served_without_a_session() {
    let state = setup();
    let site = state.tree.create_folder(ROOT_ID, "site").await.unwrap();
    state
        .tree
        .store_document(site.id, "index.html", b"<html>home</html>")
        .await
        .unwrap();
    state
        .tree
        .store_document(site.id, "style.css", b"body { margin: 0 }")
        .await
        .unwrap();
    let app = test_app!(state);

    let req = test::TestRequest::get().uri("/site/style.css").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/css"
    );
    assert_eq!(test::read_body(resp).await.as_ref(), b"body { margin: 0 }");

    let req = test::TestRequest::get().uri("/site").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await.as_ref(), b"<html>home</html>");

    let req = test::TestRequest::get().uri("/nowhere").to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}
