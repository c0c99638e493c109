//! ZIP import and export for whole subtrees.
//!
//! Export walks the tree breadth-first so folder entries precede their
//! contents. Import cannot rely on any entry order (archives may list a
//! file before its folder, or omit folder entries entirely), so entries
//! are sorted folders-first and shallow-first, and missing intermediate
//! folders are created on the way down.

use std::io::{Cursor, Read, Write};

use common::model::document::Document;
use log::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{CmsError, Result};
use crate::tree::DocumentTree;

struct ArchiveEntry {
    /// Parent path inside the archive, `None` for top-level entries.
    path: Option<String>,
    name: String,
    /// `None` marks a folder entry.
    data: Option<Vec<u8>>,
}

impl ArchiveEntry {
    fn depth(&self) -> usize {
        self.path
            .as_deref()
            .map(|p| p.split('/').count())
            .unwrap_or(0)
    }
}

/// `"a/b/c.txt"` → `(Some("a/b"), "c.txt")`, `"top"` → `(None, "top")`.
fn split_entry_path(raw: &str) -> (Option<String>, String) {
    match raw.rsplit_once('/') {
        Some((path, name)) => (Some(path.to_string()), name.to_string()),
        None => (None, raw.to_string()),
    }
}

fn entry_name(base: &str, full: &str) -> String {
    let stripped = full.strip_prefix(base).unwrap_or(full);
    stripped.trim_start_matches('/').to_string()
}

/// Packs the subtree rooted at `id` into a ZIP archive. The exported
/// document itself is the top entry; exporting the root packs everything.
pub async fn export_archive(tree: &DocumentTree, id: i64) -> Result<(Document, Vec<u8>)> {
    let doc = tree.document_by_id(id).await.ok_or(CmsError::NotFound)?;
    let base = match doc.parent_id {
        Some(parent) => tree.path(parent).await.ok_or(CmsError::NotFound)?,
        None => "/".to_string(),
    };

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut queue = vec![doc.clone()];
    let mut cursor = 0;
    while cursor < queue.len() {
        let current = queue[cursor].clone();
        cursor += 1;
        let full = tree.path(current.id).await.ok_or(CmsError::NotFound)?;
        let name = entry_name(&base, &full);
        if current.folder {
            if !name.is_empty() {
                writer.add_directory(name, options)?;
            }
            queue.extend(tree.children_of(current.id).await?);
        } else {
            let (_, data) = tree.content(current.id).await?;
            writer.start_file(name, options)?;
            writer.write_all(&data)?;
        }
    }

    let bytes = writer.finish()?.into_inner();
    debug!("exported document {} as {} byte archive", id, bytes.len());
    Ok((doc, bytes))
}

/// Unpacks a ZIP archive into `folder_id`. Returns the number of documents
/// created or overwritten.
pub async fn import_archive(tree: &DocumentTree, folder_id: i64, bytes: &[u8]) -> Result<usize> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut entries = Vec::new();
    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let raw = file.name().trim_matches('/').to_string();
        if raw.is_empty() {
            continue;
        }
        let (path, name) = split_entry_path(&raw);
        let data = if file.is_dir() {
            None
        } else {
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)?;
            Some(data)
        };
        entries.push(ArchiveEntry { path, name, data });
    }

    entries.sort_by(|a, b| {
        a.data
            .is_some()
            .cmp(&b.data.is_some())
            .then_with(|| a.depth().cmp(&b.depth()))
            .then_with(|| a.name.cmp(&b.name))
    });

    let mut imported = 0;
    for entry in &entries {
        let parent = match entry.path.as_deref() {
            Some(path) => ensure_folder_path(tree, folder_id, path).await?,
            None => folder_id,
        };
        match &entry.data {
            Some(data) => {
                tree.store_document(parent, &entry.name, data).await?;
                imported += 1;
            }
            None => {
                if ensure_folder(tree, parent, &entry.name).await?.is_some() {
                    imported += 1;
                }
            }
        }
    }
    debug!("imported {} documents into folder {}", imported, folder_id);
    Ok(imported)
}

/// Resolves `path` below `folder_id`, creating missing folders. Errors if a
/// segment exists but is a plain document.
async fn ensure_folder_path(tree: &DocumentTree, folder_id: i64, path: &str) -> Result<i64> {
    let mut current = folder_id;
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        current = match ensure_folder(tree, current, segment).await? {
            Some(created) => created,
            None => tree
                .child_by_name(current, segment)
                .await
                .ok_or(CmsError::NotFound)?
                .id,
        };
    }
    Ok(current)
}

/// Creates the folder unless it already exists. `Ok(Some)` on creation,
/// `Ok(None)` when a folder of that name is already there.
async fn ensure_folder(tree: &DocumentTree, parent_id: i64, name: &str) -> Result<Option<i64>> {
    match tree.child_by_name(parent_id, name).await {
        Some(existing) if existing.folder => Ok(None),
        Some(_) => Err(CmsError::BadRequest(format!(
            "archive entry '{name}' collides with an existing document"
        ))),
        None => Ok(Some(tree.create_folder(parent_id, name).await?.id)),
    }
}
