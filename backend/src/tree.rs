//! In-memory index over the document store.
//!
//! The whole tree is loaded once at startup and kept in sync by every
//! mutating operation, so path lookups never touch SQLite. The index lives
//! behind a `tokio::sync::RwLock` and the tree is shared across actix
//! workers as `web::Data<DocumentTree>`; the write lock also serializes the
//! multi-statement version-bump sequences against each other.

use std::collections::HashMap;
use std::sync::Arc;

use common::model::document::{Document, SearchResult, ROOT_ID};
use log::{debug, info, warn};
use tokio::sync::RwLock;

use crate::error::{CmsError, Result};
use crate::store::{unix_now, Store, LIVE_VERSION};

struct Node {
    doc: Document,
    children: Vec<i64>,
}

struct TreeIndex {
    nodes: HashMap<i64, Node>,
}

impl TreeIndex {
    fn require_folder(&self, id: i64) -> Result<()> {
        match self.nodes.get(&id) {
            Some(node) if node.doc.folder => Ok(()),
            Some(_) => Err(CmsError::NotPermitted),
            None => Err(CmsError::NotFound),
        }
    }

    fn child_by_name(&self, parent_id: i64, name: &str) -> Option<i64> {
        let parent = self.nodes.get(&parent_id)?;
        parent
            .children
            .iter()
            .copied()
            .find(|child| self.nodes.get(child).is_some_and(|n| n.doc.name == name))
    }

    fn resolve_path(&self, path: &str) -> Option<i64> {
        let mut current = ROOT_ID;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = self.child_by_name(current, segment)?;
        }
        Some(current)
    }

    fn path_of(&self, id: i64) -> Option<String> {
        if id == ROOT_ID {
            return Some("/".to_string());
        }
        let mut segments = Vec::new();
        let mut current = id;
        while current != ROOT_ID {
            let node = self.nodes.get(&current)?;
            segments.push(node.doc.name.clone());
            current = node.doc.parent_id?;
        }
        segments.reverse();
        Some(format!("/{}", segments.join("/")))
    }

    /// Ids of the subtree rooted at `id`, parents before their children.
    fn subtree_ids(&self, id: i64) -> Vec<i64> {
        let mut ids = vec![id];
        let mut cursor = 0;
        while cursor < ids.len() {
            if let Some(node) = self.nodes.get(&ids[cursor]) {
                ids.extend_from_slice(&node.children);
            }
            cursor += 1;
        }
        ids
    }

    fn attach(&mut self, doc: Document) {
        if let Some(parent) = doc.parent_id.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.push(doc.id);
        }
        self.nodes.insert(
            doc.id,
            Node {
                doc,
                children: Vec::new(),
            },
        );
    }

    fn replace(&mut self, doc: Document) {
        if let Some(node) = self.nodes.get_mut(&doc.id) {
            node.doc = doc;
        }
    }
}

fn valid_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() || name.contains('/') {
        return Err(CmsError::BadRequest("invalid document name".into()));
    }
    Ok(name)
}

fn guess_mime(file_name: &str) -> Option<String> {
    mime_guess::from_path(file_name)
        .first_raw()
        .map(str::to_string)
}

/// The document tree: store plus index, shared application-wide.
pub struct DocumentTree {
    store: Arc<Store>,
    index: RwLock<TreeIndex>,
}

impl DocumentTree {
    pub fn load(store: Arc<Store>) -> Result<Self> {
        let documents = store.all_documents()?;
        let mut index = TreeIndex {
            nodes: HashMap::new(),
        };
        for doc in &documents {
            index.nodes.insert(
                doc.id,
                Node {
                    doc: doc.clone(),
                    children: Vec::new(),
                },
            );
        }
        for doc in &documents {
            let Some(parent_id) = doc.parent_id else {
                continue;
            };
            match index.nodes.get_mut(&parent_id) {
                Some(parent) => parent.children.push(doc.id),
                None => warn!("document {} references missing parent {}", doc.id, parent_id),
            }
        }
        info!("document tree loaded, {} documents", documents.len());
        Ok(Self {
            store,
            index: RwLock::new(index),
        })
    }

    pub async fn document_by_id(&self, id: i64) -> Option<Document> {
        self.index.read().await.nodes.get(&id).map(|n| n.doc.clone())
    }

    pub async fn document_from_path(&self, path: &str) -> Option<Document> {
        let index = self.index.read().await;
        let id = index.resolve_path(path)?;
        index.nodes.get(&id).map(|n| n.doc.clone())
    }

    pub async fn child_by_name(&self, parent_id: i64, name: &str) -> Option<Document> {
        let index = self.index.read().await;
        let id = index.child_by_name(parent_id, name)?;
        index.nodes.get(&id).map(|n| n.doc.clone())
    }

    /// Full path of a document, `/` for the root.
    pub async fn path(&self, id: i64) -> Option<String> {
        self.index.read().await.path_of(id)
    }

    /// Children of a folder, folders first, each group sorted by name.
    pub async fn children_of(&self, id: i64) -> Result<Vec<Document>> {
        let index = self.index.read().await;
        let node = index.nodes.get(&id).ok_or(CmsError::NotFound)?;
        let mut children: Vec<Document> = node
            .children
            .iter()
            .filter_map(|child| index.nodes.get(child))
            .map(|n| n.doc.clone())
            .collect();
        children.sort_by(|a, b| b.folder.cmp(&a.folder).then_with(|| a.name.cmp(&b.name)));
        Ok(children)
    }

    /// Live payload of a document together with its metadata.
    pub async fn content(&self, id: i64) -> Result<(Document, Vec<u8>)> {
        let doc = self.document_by_id(id).await.ok_or(CmsError::NotFound)?;
        if doc.folder {
            return Err(CmsError::BadRequest("folders have no content".into()));
        }
        let data = self.store.content(id, LIVE_VERSION)?;
        Ok((doc, data))
    }

    pub async fn create_folder(&self, parent_id: i64, name: &str) -> Result<Document> {
        self.create_document(parent_id, name, true).await
    }

    /// Creates an empty text file. The MIME type is guessed from the name
    /// and anything that is not editable text is refused.
    pub async fn create_text_file(&self, parent_id: i64, name: &str) -> Result<Document> {
        self.create_document(parent_id, name, false).await
    }

    async fn create_document(&self, parent_id: i64, name: &str, folder: bool) -> Result<Document> {
        let name = valid_name(name)?;
        let mut index = self.index.write().await;
        index.require_folder(parent_id)?;
        if index.child_by_name(parent_id, name).is_some() {
            return Err(CmsError::NameTaken);
        }
        let now = unix_now();
        let mut doc = Document {
            id: 0,
            parent_id: Some(parent_id),
            name: name.to_string(),
            size: 0,
            mime_type: if folder { None } else { guess_mime(name) },
            folder,
            created: now,
            modified: now,
        };
        if !folder && !doc.is_text() {
            return Err(CmsError::UnsupportedMimeType);
        }
        debug!(
            "creating {} '{}' under {}",
            if folder { "folder" } else { "file" },
            doc.name,
            parent_id
        );
        doc.id = self.store.insert_document(&doc)?;
        if !folder {
            self.store.insert_version(doc.id, LIVE_VERSION, now)?;
            self.store.insert_content(doc.id, LIVE_VERSION, &[])?;
        }
        index.attach(doc.clone());
        Ok(doc)
    }

    /// Upload semantics: a new name becomes a new document, an existing
    /// name gets its live content backed up as the next version and then
    /// overwritten.
    pub async fn store_document(&self, parent_id: i64, file_name: &str, data: &[u8]) -> Result<Document> {
        let file_name = valid_name(file_name)?;
        let mut index = self.index.write().await;
        index.require_folder(parent_id)?;
        let now = unix_now();
        match index.child_by_name(parent_id, file_name) {
            Some(id) => {
                let mut doc = index
                    .nodes
                    .get(&id)
                    .map(|n| n.doc.clone())
                    .ok_or(CmsError::NotFound)?;
                if doc.folder {
                    return Err(CmsError::NotPermitted);
                }
                self.backup_live_content(id, now)?;
                doc.size = data.len() as i64;
                doc.mime_type = guess_mime(file_name);
                doc.modified = now;
                self.store.update_document(&doc)?;
                self.store.touch_version(id, LIVE_VERSION, now)?;
                self.store.update_content(id, LIVE_VERSION, data)?;
                index.replace(doc.clone());
                Ok(doc)
            }
            None => {
                debug!("storing new document '{}' under {}", file_name, parent_id);
                let mut doc = Document {
                    id: 0,
                    parent_id: Some(parent_id),
                    name: file_name.to_string(),
                    size: data.len() as i64,
                    mime_type: guess_mime(file_name),
                    folder: false,
                    created: now,
                    modified: now,
                };
                doc.id = self.store.insert_document(&doc)?;
                self.store.insert_version(doc.id, LIVE_VERSION, now)?;
                self.store.insert_content(doc.id, LIVE_VERSION, data)?;
                index.attach(doc.clone());
                Ok(doc)
            }
        }
    }

    /// Overwrites the live text of an existing document, backing up the
    /// previous content as the next version first.
    pub async fn save_text(&self, id: i64, data: &[u8]) -> Result<Document> {
        let mut index = self.index.write().await;
        let mut doc = index
            .nodes
            .get(&id)
            .map(|n| n.doc.clone())
            .ok_or(CmsError::NotFound)?;
        if doc.folder {
            return Err(CmsError::BadRequest("cannot save text into a folder".into()));
        }
        let now = unix_now();
        self.backup_live_content(id, now)?;
        doc.size = data.len() as i64;
        doc.modified = now;
        self.store.update_document(&doc)?;
        self.store.touch_version(id, LIVE_VERSION, now)?;
        self.store.update_content(id, LIVE_VERSION, data)?;
        index.replace(doc.clone());
        Ok(doc)
    }

    fn backup_live_content(&self, id: i64, now: i64) -> Result<()> {
        let next = self.store.latest_version(id)? + 1;
        debug!("document {} backed up as version {}", id, next);
        let live = self.store.content(id, LIVE_VERSION)?;
        self.store.insert_version(id, next, now)?;
        self.store.insert_content(id, next, &live)?;
        Ok(())
    }

    /// Deletes a document and everything below it. The root is refused.
    pub async fn delete_document(&self, id: i64) -> Result<Document> {
        if id == ROOT_ID {
            return Err(CmsError::NotPermitted);
        }
        let mut index = self.index.write().await;
        let doc = index
            .nodes
            .get(&id)
            .map(|n| n.doc.clone())
            .ok_or(CmsError::NotFound)?;
        debug!("deleting document {} '{}'", id, doc.name);
        let doomed = index.subtree_ids(id);
        for child in doomed.iter().rev() {
            self.store.delete_document_row(*child)?;
        }
        for child in &doomed {
            index.nodes.remove(child);
        }
        if let Some(parent) = doc.parent_id.and_then(|p| index.nodes.get_mut(&p)) {
            parent.children.retain(|c| *c != id);
        }
        Ok(doc)
    }

    /// Case-insensitive substring search over full paths, root excluded.
    pub async fn documents_by_path(&self, fragment: &str) -> Vec<SearchResult> {
        let needle = fragment.to_lowercase();
        let index = self.index.read().await;
        let mut hits = Vec::new();
        for (id, node) in &index.nodes {
            if *id == ROOT_ID {
                continue;
            }
            let Some(path) = index.path_of(*id) else {
                continue;
            };
            if path.to_lowercase().contains(&needle) {
                hits.push(SearchResult {
                    path,
                    document: node.doc.clone(),
                });
            }
        }
        hits.sort_by(|a, b| a.path.cmp(&b.path));
        hits
    }
}
