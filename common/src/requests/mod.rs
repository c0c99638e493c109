use serde::{Deserialize, Serialize};

/// Form payload of the login page.
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Request payload for creating a folder or an empty text file under a
/// parent folder.
#[derive(Deserialize, Serialize, Debug)]
pub struct CreateDocumentRequest {
    pub name: String,
}

/// Query string of the path search endpoint.
#[derive(Deserialize, Serialize, Debug)]
pub struct SearchQuery {
    pub q: String,
}
