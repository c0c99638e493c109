use rusqlite::{params, OptionalExtension};

use super::Store;
use crate::error::{CmsError, Result};

impl Store {
    pub fn insert_content(&self, document_id: i64, version: i64, data: &[u8]) -> Result<()> {
        self.conn().execute(
            "INSERT INTO document_data (document_id, document_version, data)
             VALUES (?1, ?2, ?3)",
            params![document_id, version, data],
        )?;
        Ok(())
    }

    pub fn update_content(&self, document_id: i64, version: i64, data: &[u8]) -> Result<()> {
        self.conn().execute(
            "UPDATE document_data SET data = ?3
             WHERE document_id = ?1 AND document_version = ?2",
            params![document_id, version, data],
        )?;
        Ok(())
    }

    /// Payload of one stored revision. Version 0 is the live copy.
    pub fn content(&self, document_id: i64, version: i64) -> Result<Vec<u8>> {
        self.conn()
            .query_row(
                "SELECT data FROM document_data
                 WHERE document_id = ?1 AND document_version = ?2",
                params![document_id, version],
                |row| row.get(0),
            )
            .optional()?
            .ok_or(CmsError::NotFound)
    }
}
