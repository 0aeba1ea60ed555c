use crate::document::Document;
use crate::error::DocumentError;
use dashmap::mapref::entry::{Entry, VacantEntry};
use dashmap::DashMap;
use std::hash::Hash;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use thiserror::Error;

static GLOBAL_CACHE: OnceLock<DocumentCollection<String>> = OnceLock::new();

/// Process wide registry keyed by string ids.
pub fn global_document_cache() -> &'static DocumentCollection<String> {
    GLOBAL_CACHE.get_or_init(DocumentCollection::new)
}

/// Error types for cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    /// No document is registered under the id.
    #[error("document not found in cache")]
    NotFound,
    /// A document is already registered under the id.
    #[error("document already exists in cache")]
    AlreadyExists,
    /// The document could not be read.
    #[error("failed to load document: {0}")]
    FailedToLoad(#[from] DocumentError),
}

/// Parsed documents shared between threads, each behind an [`Arc`].
pub struct DocumentCollection<K> {
    cache: DashMap<K, Arc<Document>>,
}

impl<K> DocumentCollection<K>
where
    K: Hash + Eq,
{
    pub fn new() -> Self {
        DocumentCollection {
            cache: DashMap::new(),
        }
    }

    /// Reads a JSON or YAML file and registers it under `id`.
    ///
    /// The file is read before the map entry is taken, so no shard stays
    /// locked during disk access.
    pub fn insert_from_file_path<P>(&self, id: K, file_path: P) -> Result<Arc<Document>, CacheError>
    where
        P: AsRef<Path>,
    {
        if self.cache.contains_key(&id) {
            return Err(CacheError::AlreadyExists);
        }
        let document = Document::from_file(file_path)?;
        match self.cache.entry(id) {
            Entry::Occupied(_) => Err(CacheError::AlreadyExists),
            Entry::Vacant(entry) => Ok(Self::store(entry, document)),
        }
    }

    /// Registers anything that serializes to a document tree, e.g. a
    /// `serde_json::Value` or an already typed [`Document`].
    pub fn insert<V>(&self, id: K, document: V) -> Result<Arc<Document>, CacheError>
    where
        V: serde::Serialize,
    {
        match self.cache.entry(id) {
            Entry::Occupied(_) => Err(CacheError::AlreadyExists),
            Entry::Vacant(entry) => Self::create_document(entry, document),
        }
    }

    fn create_document<V>(
        entry: VacantEntry<K, Arc<Document>>,
        document: V,
    ) -> Result<Arc<Document>, CacheError>
    where
        V: serde::Serialize,
    {
        let tree = serde_json::to_value(document).map_err(DocumentError::from_json)?;
        let document = Document::from_value(tree)?;
        Ok(Self::store(entry, document))
    }

    fn store(entry: VacantEntry<K, Arc<Document>>, document: Document) -> Arc<Document> {
        log::debug!("Caching {} document '{}'", document.version(), document.info().title);
        let document = Arc::new(document);
        entry.insert(document.clone());
        document
    }

    pub fn get(&self, id: &K) -> Result<Arc<Document>, CacheError> {
        match self.cache.get(id) {
            Some(document) => Ok(Arc::clone(document.value())),
            None => Err(CacheError::NotFound),
        }
    }

    pub fn remove(&self, id: &K) -> Result<Arc<Document>, CacheError> {
        match self.cache.remove(id) {
            Some((_, document)) => Ok(document),
            None => Err(CacheError::NotFound),
        }
    }

    pub fn contains(&self, id: &K) -> bool {
        self.cache.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn clear(&self) {
        self.cache.clear();
        log::debug!("Cleared document cache");
    }
}

impl<K> Default for DocumentCollection<K>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}
