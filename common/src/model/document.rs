use serde::{Deserialize, Serialize};

/// Id of the root folder. The schema seeds it on first start and it can
/// never be deleted or moved.
pub const ROOT_ID: i64 = 1;

/// Mime types that are edited as text even though they do not start with
/// `text/`.
const TEXT_MIME_TYPES: &[&str] = &[
    "application/json",
    "application/javascript",
    "application/xml",
    "application/xhtml+xml",
    "image/svg+xml",
];

/// Metadata of a single entry in the document tree. The payload itself is
/// stored separately and addressed by `(id, version)`, with version 0 being
/// the live copy.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Document {
    pub id: i64,
    /// `None` only for the root folder.
    pub parent_id: Option<i64>,
    pub name: String,
    /// Size of the live payload in bytes. Always 0 for folders.
    pub size: i64,
    /// `None` for folders and for files whose type could not be guessed.
    pub mime_type: Option<String>,
    pub folder: bool,
    /// Unix timestamp, seconds.
    pub created: i64,
    /// Unix timestamp, seconds.
    pub modified: i64,
}

impl Document {
    pub fn is_root(&self) -> bool {
        self.id == ROOT_ID
    }

    /// Whether the payload is editable text. Folders are never text.
    pub fn is_text(&self) -> bool {
        if self.folder {
            return false;
        }
        match self.mime_type.as_deref() {
            Some(mime) => mime.starts_with("text/") || TEXT_MIME_TYPES.contains(&mime),
            None => false,
        }
    }
}

/// One match of a path search, carrying the absolute path the document is
/// reachable under.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    pub path: String,
    pub document: Document,
}
