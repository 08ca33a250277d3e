//! In-memory session implementation.
//!
//! Documents are kept per collection in insertion order behind an async-aware
//! read-write lock.

use async_trait::async_trait;
use bson::Document;
use mea::rwlock::RwLock;
use std::{collections::HashMap, sync::Arc};
use tracing::debug;

use mongomap_core::{
    cursor::SharedCursor,
    error::OdmResult,
    filter::Filter,
    session::{Session, SessionBuilder},
};

use crate::{cursor::MemoryCursor, matcher::DocumentMatcher};

type CollectionMap = HashMap<String, Vec<Document>>;

/// Thread-safe in-memory session.
///
/// `InMemorySession` is cloneable; clones share the same underlying collections.
///
/// # Ordering
///
/// Finds return documents in insertion order, and [`Session::remove_one`] removes the
/// earliest inserted match. Unknown collections behave as empty.
///
/// # Example
///
/// ```ignore
/// use mongomap_memory::InMemorySession;
/// use bson::doc;
///
/// let session = InMemorySession::new();
/// session.insert("users", vec![doc! { "name": "Alice" }]).await;
/// assert_eq!(session.documents("users").await.len(), 1);
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemorySession {
    collections: Arc<RwLock<CollectionMap>>,
}

impl InMemorySession {
    /// Creates a new session with no collections.
    pub fn new() -> Self {
        Self {
            collections: Arc::new(RwLock::new(CollectionMap::new())),
        }
    }

    /// Creates a builder for seeding a session.
    pub fn builder() -> InMemorySessionBuilder {
        InMemorySessionBuilder::default()
    }

    /// Appends documents to a collection, creating it if needed.
    pub async fn insert(&self, collection: &str, documents: impl IntoIterator<Item = Document>) {
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .extend(documents);
    }

    /// Returns a snapshot of every document in a collection, in insertion order.
    pub async fn documents(&self, collection: &str) -> Vec<Document> {
        self.collections
            .read()
            .await
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    /// Lists the names of all collections.
    pub async fn list_collections(&self) -> Vec<String> {
        self.collections
            .read()
            .await
            .keys()
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Session for InMemorySession {
    async fn find(&self, collection: &str, filter: Filter) -> OdmResult<SharedCursor> {
        let matcher = DocumentMatcher::new(&filter)?;
        let collections = self.collections.read().await;

        let documents = match collections.get(collection) {
            Some(documents) => documents
                .iter()
                .filter(|document| matcher.matches(document))
                .cloned()
                .collect::<Vec<_>>(),
            None => vec![],
        };

        debug!(collection, matched = documents.len(), "in-memory find");

        Ok(SharedCursor::new(MemoryCursor::new(documents)))
    }

    async fn remove_all(&self, collection: &str, filter: Filter) -> OdmResult<()> {
        let matcher = DocumentMatcher::new(&filter)?;
        let mut collections = self.collections.write().await;

        if let Some(documents) = collections.get_mut(collection) {
            let before = documents.len();
            documents.retain(|document| !matcher.matches(document));

            debug!(collection, removed = before - documents.len(), "in-memory remove_all");
        }

        Ok(())
    }

    async fn remove_one(&self, collection: &str, filter: Filter) -> OdmResult<()> {
        let matcher = DocumentMatcher::new(&filter)?;
        let mut collections = self.collections.write().await;

        if let Some(documents) = collections.get_mut(collection) {
            if let Some(position) = documents.iter().position(|document| matcher.matches(document)) {
                documents.remove(position);

                debug!(collection, position, "in-memory remove_one");
            }
        }

        Ok(())
    }
}

/// Builder for constructing seeded [`InMemorySession`] instances.
///
/// # Example
///
/// ```ignore
/// use mongomap_memory::InMemorySession;
/// use mongomap::session::SessionBuilder;
///
/// let session = InMemorySession::builder()
///     .with_documents("numbers", vec![doc! { "id": 1 }])
///     .build()
///     .await?;
/// ```
#[derive(Default, Debug)]
pub struct InMemorySessionBuilder {
    seed: Vec<(String, Vec<Document>)>,
}

impl InMemorySessionBuilder {
    /// Queues documents to be inserted into `collection` when the session is built.
    pub fn with_documents(
        mut self,
        collection: impl Into<String>,
        documents: impl IntoIterator<Item = Document>,
    ) -> Self {
        self.seed.push((collection.into(), documents.into_iter().collect()));
        self
    }
}

#[async_trait]
impl SessionBuilder for InMemorySessionBuilder {
    type Session = InMemorySession;

    /// Builds the session. This always succeeds.
    async fn build(self) -> OdmResult<Self::Session> {
        let mut collections = CollectionMap::new();

        for (name, documents) in self.seed {
            collections.entry(name).or_default().extend(documents);
        }

        Ok(InMemorySession {
            collections: Arc::new(RwLock::new(collections)),
        })
    }
}
