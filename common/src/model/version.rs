use serde::{Deserialize, Serialize};

/// A stored revision of a document payload. Version 0 is the live copy,
/// higher numbers are backups taken right before an overwrite.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct DocumentVersion {
    pub document_id: i64,
    pub version: i64,
    /// Unix timestamp, seconds.
    pub created: i64,
}
