use common::model::document::Document;
use rusqlite::{params, OptionalExtension, Row};

use super::Store;
use crate::error::Result;

fn document_from_row(row: &Row) -> rusqlite::Result<Document> {
    Ok(Document {
        id: row.get(0)?,
        parent_id: row.get(1)?,
        name: row.get(2)?,
        size: row.get(3)?,
        mime_type: row.get(4)?,
        folder: row.get(5)?,
        created: row.get(6)?,
        modified: row.get(7)?,
    })
}

impl Store {
    /// Inserts the metadata row and returns the generated id.
    pub fn insert_document(&self, doc: &Document) -> Result<i64> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO document (parent_id, name, size, mime_type, folder, created, modified)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                doc.parent_id,
                doc.name,
                doc.size,
                doc.mime_type,
                doc.folder,
                doc.created,
                doc.modified,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn update_document(&self, doc: &Document) -> Result<()> {
        self.conn().execute(
            "UPDATE document
             SET parent_id = ?2, name = ?3, size = ?4, mime_type = ?5, folder = ?6, modified = ?7
             WHERE id = ?1",
            params![
                doc.id,
                doc.parent_id,
                doc.name,
                doc.size,
                doc.mime_type,
                doc.folder,
                doc.modified,
            ],
        )?;
        Ok(())
    }

    pub fn document_by_id(&self, id: i64) -> Result<Option<Document>> {
        let doc = self
            .conn()
            .query_row(
                "SELECT id, parent_id, name, size, mime_type, folder, created, modified
                 FROM document WHERE id = ?1",
                params![id],
                document_from_row,
            )
            .optional()?;
        Ok(doc)
    }

    /// Every metadata row, ordered by id so parents come before children.
    pub fn all_documents(&self) -> Result<Vec<Document>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, parent_id, name, size, mime_type, folder, created, modified
             FROM document ORDER BY id",
        )?;
        let rows = stmt.query_map([], document_from_row)?;
        let mut documents = Vec::new();
        for row in rows {
            documents.push(row?);
        }
        Ok(documents)
    }

    /// Removes the metadata row together with all payload and backup rows.
    pub fn delete_document_row(&self, id: i64) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM document_data WHERE document_id = ?1",
            params![id],
        )?;
        tx.execute(
            "DELETE FROM document_version WHERE document_id = ?1",
            params![id],
        )?;
        tx.execute("DELETE FROM document WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(())
    }
}
