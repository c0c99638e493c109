use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use log::debug;
use rusqlite::Connection;

use crate::error::Result;

mod contents;
mod documents;
mod versions;

/// Version number of the live copy of a payload.
pub const LIVE_VERSION: i64 = 0;

/// Current unix time in seconds.
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// SQLite-backed storage for document metadata, payloads and payload
/// backups. A single connection behind a mutex; the tree above already
/// serializes writers.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        debug!("opening document store at {}", path.display());
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub(crate) fn conn(&self) -> MutexGuard<'_, Connection> {
        // A poisoned lock means another thread panicked mid-statement; the
        // connection itself is still usable.
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// Payloads live in document_data keyed by (document_id, version), where
// version 0 is the live copy and higher versions are backups. The row with
// id 1 is the tree root and is seeded on first start.
fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS document (
             id INTEGER PRIMARY KEY AUTOINCREMENT,
             parent_id INTEGER,
             name TEXT NOT NULL,
             size INTEGER NOT NULL DEFAULT 0,
             mime_type TEXT,
             folder INTEGER NOT NULL DEFAULT 0,
             created INTEGER NOT NULL,
             modified INTEGER NOT NULL
         );
         CREATE UNIQUE INDEX IF NOT EXISTS idx_document_parent_name
             ON document (parent_id, name);
         CREATE TABLE IF NOT EXISTS document_data (
             document_id INTEGER NOT NULL,
             document_version INTEGER NOT NULL,
             data BLOB NOT NULL,
             PRIMARY KEY (document_id, document_version)
         );
         CREATE TABLE IF NOT EXISTS document_version (
             document_id INTEGER NOT NULL,
             document_version INTEGER NOT NULL,
             creation_time INTEGER NOT NULL,
             PRIMARY KEY (document_id, document_version)
         );
         INSERT OR IGNORE INTO document (id, parent_id, name, size, mime_type, folder, created, modified)
             VALUES (1, NULL, '', 0, NULL, 1,
                     CAST(strftime('%s', 'now') AS INTEGER),
                     CAST(strftime('%s', 'now') AS INTEGER));",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CmsError;
    use common::model::document::{Document, ROOT_ID};

    fn new_file(name: &str, mime: &str) -> Document {
        Document {
            id: 0,
            parent_id: Some(ROOT_ID),
            name: name.to_string(),
            size: 0,
            mime_type: Some(mime.to_string()),
            folder: false,
            created: unix_now(),
            modified: unix_now(),
        }
    }

    #[test]
    fn schema_seeds_the_root_folder() {
        let store = Store::open_in_memory().unwrap();
        let root = store.document_by_id(ROOT_ID).unwrap().unwrap();
        assert!(root.folder);
        assert_eq!(root.parent_id, None);
    }

    #[test]
    fn insert_then_fetch_roundtrip() {
        let store = Store::open_in_memory().unwrap();
        let mut doc = new_file("index.html", "text/html");
        doc.id = store.insert_document(&doc).unwrap();
        assert!(doc.id > ROOT_ID);

        let fetched = store.document_by_id(doc.id).unwrap().unwrap();
        assert_eq!(fetched, doc);
        assert_eq!(store.all_documents().unwrap().len(), 2);
    }

    #[test]
    fn update_overwrites_metadata() {
        let store = Store::open_in_memory().unwrap();
        let mut doc = new_file("a.txt", "text/plain");
        doc.id = store.insert_document(&doc).unwrap();

        doc.size = 42;
        doc.modified += 10;
        store.update_document(&doc).unwrap();
        assert_eq!(store.document_by_id(doc.id).unwrap().unwrap(), doc);
    }

    #[test]
    fn delete_cascades_content_and_versions() {
        let store = Store::open_in_memory().unwrap();
        let mut doc = new_file("a.txt", "text/plain");
        doc.id = store.insert_document(&doc).unwrap();
        store.insert_version(doc.id, 0, doc.created).unwrap();
        store.insert_content(doc.id, 0, b"live").unwrap();
        store.insert_version(doc.id, 1, doc.created).unwrap();
        store.insert_content(doc.id, 1, b"backup").unwrap();

        store.delete_document_row(doc.id).unwrap();
        assert!(store.document_by_id(doc.id).unwrap().is_none());
        assert!(matches!(
            store.content(doc.id, 0),
            Err(CmsError::NotFound)
        ));
        assert_eq!(store.latest_version(doc.id).unwrap(), 0);
        assert!(store.versions(doc.id).unwrap().is_empty());
    }

    #[test]
    fn content_roundtrip_and_missing_content() {
        let store = Store::open_in_memory().unwrap();
        let mut doc = new_file("a.txt", "text/plain");
        doc.id = store.insert_document(&doc).unwrap();

        store.insert_content(doc.id, 0, b"first").unwrap();
        assert_eq!(store.content(doc.id, 0).unwrap(), b"first");
        store.update_content(doc.id, 0, b"second").unwrap();
        assert_eq!(store.content(doc.id, 0).unwrap(), b"second");
        assert!(matches!(store.content(doc.id, 1), Err(CmsError::NotFound)));
    }

    #[test]
    fn latest_version_tracks_the_highest_backup() {
        let store = Store::open_in_memory().unwrap();
        let mut doc = new_file("a.txt", "text/plain");
        doc.id = store.insert_document(&doc).unwrap();

        assert_eq!(store.latest_version(doc.id).unwrap(), 0);
        store.insert_version(doc.id, 0, 100).unwrap();
        store.insert_version(doc.id, 1, 200).unwrap();
        store.insert_version(doc.id, 2, 300).unwrap();
        assert_eq!(store.latest_version(doc.id).unwrap(), 2);

        let versions = store.versions(doc.id).unwrap();
        assert_eq!(versions.len(), 3);
        assert_eq!(versions[0].version, 0);
        assert_eq!(versions[2].created, 300);
    }

    #[test]
    fn touch_version_updates_the_creation_time() {
        let store = Store::open_in_memory().unwrap();
        store.insert_version(9, 0, 100).unwrap();
        store.touch_version(9, 0, 500).unwrap();
        let versions = store.versions(9).unwrap();
        assert_eq!(versions[0].created, 500);
    }

    #[test]
    fn duplicate_sibling_names_are_rejected() {
        let store = Store::open_in_memory().unwrap();
        let doc = new_file("a.txt", "text/plain");
        store.insert_document(&doc).unwrap();
        assert!(store.insert_document(&doc).is_err());
    }
}
