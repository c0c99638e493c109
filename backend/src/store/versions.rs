use common::model::version::DocumentVersion;
use rusqlite::params;

use super::Store;
use crate::error::Result;

impl Store {
    pub fn insert_version(&self, document_id: i64, version: i64, created: i64) -> Result<()> {
        self.conn().execute(
            "INSERT INTO document_version (document_id, document_version, creation_time)
             VALUES (?1, ?2, ?3)",
            params![document_id, version, created],
        )?;
        Ok(())
    }

    pub fn touch_version(&self, document_id: i64, version: i64, created: i64) -> Result<()> {
        self.conn().execute(
            "UPDATE document_version SET creation_time = ?3
             WHERE document_id = ?1 AND document_version = ?2",
            params![document_id, version, created],
        )?;
        Ok(())
    }

    /// Highest stored version number, 0 when only the live copy exists.
    pub fn latest_version(&self, document_id: i64) -> Result<i64> {
        let max: Option<i64> = self.conn().query_row(
            "SELECT MAX(document_version) FROM document_version WHERE document_id = ?1",
            params![document_id],
            |row| row.get(0),
        )?;
        Ok(max.unwrap_or(0))
    }

    pub fn versions(&self, document_id: i64) -> Result<Vec<DocumentVersion>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT document_id, document_version, creation_time
             FROM document_version WHERE document_id = ?1
             ORDER BY document_version",
        )?;
        let rows = stmt.query_map(params![document_id], |row| {
            Ok(DocumentVersion {
                document_id: row.get(0)?,
                version: row.get(1)?,
                created: row.get(2)?,
            })
        })?;
        let mut versions = Vec::new();
        for row in rows {
            versions.push(row?);
        }
        Ok(versions)
    }
}
