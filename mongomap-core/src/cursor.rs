//! Raw and typed result cursors.
//!
//! Sessions hand back a [`SharedCursor`], a reference-counted handle over a driver-level
//! [`RawCursor`]. A [`ResultCursor`] pairs such a handle with a [`Mapper`] and turns each
//! pulled document into a typed value.
//!
//! Cursors are forward-only and single-pass: every raw document is read exactly once,
//! whichever mix of accessors is used, and an exhausted cursor stays exhausted.
//!
//! # Example
//!
//! ```ignore
//! let cursor = session.execute_query("users", Filter::match_all(), &mapper).await?;
//!
//! while cursor.more().await? {
//!     let user = cursor.next().await?;
//!     println!("{user:?}");
//! }
//! ```

use async_trait::async_trait;
use mea::mutex::Mutex;
use std::{fmt, sync::Arc};
use tracing::trace;

use crate::{
    error::{OdmResult, QueryError},
    mapper::Mapper,
};

/// The database's native untyped record representation.
pub type RawDocument = bson::Document;

/// A forward-only, single-pass sequence of raw documents provided by a driver.
///
/// Once `has_more` has returned `false` an implementation must never yield another
/// document.
#[async_trait]
pub trait RawCursor: Send + fmt::Debug {
    /// Returns `true` if at least one unread document remains.
    async fn has_more(&mut self) -> OdmResult<bool>;

    /// Reads the next document, or `None` if the cursor is exhausted.
    async fn next_document(&mut self) -> OdmResult<Option<RawDocument>>;
}

/// A reference-counted handle over a [`RawCursor`].
///
/// Clones share the same read position. A check-and-pull happens under one lock, so a
/// document is never handed out twice even when several handles pull from it.
#[derive(Clone)]
pub struct SharedCursor {
    inner: Arc<Mutex<Box<dyn RawCursor>>>,
}

impl SharedCursor {
    /// Wraps a raw cursor in a new shared handle.
    pub fn new(cursor: impl RawCursor + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(cursor))),
        }
    }

    /// Returns `true` if the underlying cursor has at least one unread document.
    pub async fn more(&self) -> OdmResult<bool> {
        self.inner.lock().await.has_more().await
    }

    /// Pulls the next raw document, or `None` once the cursor is exhausted.
    pub async fn pull(&self) -> OdmResult<Option<RawDocument>> {
        let mut cursor = self.inner.lock().await;

        if !cursor.has_more().await? {
            return Ok(None);
        }

        cursor.next_document().await
    }

    /// Number of live handles sharing the underlying cursor.
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl fmt::Debug for SharedCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedCursor")
            .field("handles", &self.handle_count())
            .finish()
    }
}

/// A typed, pull-based view over a [`SharedCursor`].
///
/// # Type Parameters
///
/// * `'m` - Lifetime of the borrowed mapper
/// * `T` - The type produced for each document
pub struct ResultCursor<'m, T> {
    cursor: SharedCursor,
    mapper: &'m dyn Mapper<T>,
}

impl<'m, T> ResultCursor<'m, T> {
    /// Creates a typed cursor from a shared raw cursor and a mapper.
    pub fn new(cursor: SharedCursor, mapper: &'m dyn Mapper<T>) -> Self {
        Self { cursor, mapper }
    }

    /// Pulls and maps the first available document.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] if the cursor has no documents left. Mapper and session
    /// errors are returned unchanged.
    pub async fn first(&self) -> OdmResult<T> {
        match self.cursor.pull().await? {
            Some(raw) => {
                trace!("mapping first document");
                self.mapper.from_raw(raw)
            }
            None => Err(QueryError::no_results().into()),
        }
    }

    /// Alias of [`ResultCursor::first`].
    pub async fn one(&self) -> OdmResult<T> {
        self.first().await
    }

    /// Pulls one document into `out` using the mapper's in-place form.
    ///
    /// Returns `false` once the cursor is exhausted, in which case `out` must not be
    /// relied upon.
    pub async fn next_into(&self, out: &mut T) -> OdmResult<bool> {
        match self.cursor.pull().await? {
            Some(raw) => {
                trace!("mapping document in place");
                self.mapper.from_raw_into(raw, out)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Alias of [`ResultCursor::next_into`].
    pub async fn first_into(&self, out: &mut T) -> OdmResult<bool> {
        self.next_into(out).await
    }

    /// Alias of [`ResultCursor::next_into`].
    pub async fn one_into(&self, out: &mut T) -> OdmResult<bool> {
        self.next_into(out).await
    }

    /// Returns `true` if at least one unread document remains.
    pub async fn more(&self) -> OdmResult<bool> {
        self.cursor.more().await
    }

    /// Pulls and maps the next document.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] if the cursor is exhausted.
    pub async fn next(&self) -> OdmResult<T> {
        match self.cursor.pull().await? {
            Some(raw) => {
                trace!("mapping next document");
                self.mapper.from_raw(raw)
            }
            None => Err(QueryError::exhausted().into()),
        }
    }

    /// Returns the shared handle this cursor reads from.
    pub fn shared(&self) -> &SharedCursor {
        &self.cursor
    }
}

impl<T: Default> ResultCursor<'_, T> {
    /// Drains the cursor, returning every remaining document in delivery order.
    ///
    /// Each document is pulled through [`ResultCursor::next_into`], so mappers with a
    /// custom in-place form are used for every element. An already exhausted cursor
    /// yields an empty vector.
    pub async fn all(&self) -> OdmResult<Vec<T>> {
        let mut results = Vec::new();
        let mut slot = T::default();

        while self.next_into(&mut slot).await? {
            results.push(std::mem::take(&mut slot));
        }

        trace!(count = results.len(), "drained cursor");

        Ok(results)
    }
}

impl<T> fmt::Debug for ResultCursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultCursor")
            .field("cursor", &self.cursor)
            .field("target", &std::any::type_name::<T>())
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::OdmError;
    use bson::doc;
    use std::{
        collections::VecDeque,
        sync::atomic::{AtomicUsize, Ordering},
    };

    /// Vector-backed cursor that counts how many documents were handed out.
    #[derive(Debug)]
    pub(crate) struct VecCursor {
        documents: VecDeque<RawDocument>,
        pulls: Arc<AtomicUsize>,
    }

    impl VecCursor {
        pub(crate) fn new(documents: Vec<RawDocument>) -> (Self, Arc<AtomicUsize>) {
            let pulls = Arc::new(AtomicUsize::new(0));
            let cursor = Self {
                documents: documents.into(),
                pulls: pulls.clone(),
            };
            (cursor, pulls)
        }
    }

    #[async_trait]
    impl RawCursor for VecCursor {
        async fn has_more(&mut self) -> OdmResult<bool> {
            Ok(!self.documents.is_empty())
        }

        async fn next_document(&mut self) -> OdmResult<Option<RawDocument>> {
            let next = self.documents.pop_front();
            if next.is_some() {
                self.pulls.fetch_add(1, Ordering::SeqCst);
            }
            Ok(next)
        }
    }

    pub(crate) fn id_mapper(doc: RawDocument) -> OdmResult<i32> {
        doc.get_i32("id")
            .map_err(|e| OdmError::Mapping(e.to_string()))
    }

    fn seeded(ids: &[i32]) -> (SharedCursor, Arc<AtomicUsize>) {
        let (cursor, pulls) = VecCursor::new(ids.iter().map(|id| doc! { "id": *id }).collect());
        (SharedCursor::new(cursor), pulls)
    }

    #[tokio::test]
    async fn test_all_returns_documents_in_order() {
        let (shared, pulls) = seeded(&[1, 2]);
        let cursor = ResultCursor::new(shared, &id_mapper);

        assert_eq!(cursor.all().await.unwrap(), vec![1, 2]);
        assert!(!cursor.more().await.unwrap());
        assert!(cursor.next().await.unwrap_err().is_query_error());
        assert_eq!(pulls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_empty_cursor() {
        let (shared, _) = seeded(&[]);
        let cursor = ResultCursor::new(shared, &id_mapper);

        assert!(!cursor.more().await.unwrap());

        let mut out = 42;
        assert!(!cursor.next_into(&mut out).await.unwrap());
        assert_eq!(out, 42);

        assert!(cursor.first().await.unwrap_err().is_query_error());
        assert!(cursor.one().await.unwrap_err().is_query_error());
        assert!(cursor.next().await.unwrap_err().is_query_error());
        assert!(cursor.all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_first_does_not_cache() {
        let (shared, _) = seeded(&[5, 6]);
        let cursor = ResultCursor::new(shared, &id_mapper);

        assert_eq!(cursor.first().await.unwrap(), 5);
        assert_eq!(cursor.first().await.unwrap(), 6);

        for _ in 0..3 {
            match cursor.first().await {
                Err(OdmError::Query(err)) => assert_eq!(
                    err.message(),
                    "Query returned no results; cannot return the first element."
                ),
                other => panic!("expected query error, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_next_error_message_after_exhaustion() {
        let (shared, _) = seeded(&[1]);
        let cursor = ResultCursor::new(shared, &id_mapper);

        assert_eq!(cursor.next().await.unwrap(), 1);

        match cursor.next().await {
            Err(OdmError::Query(err)) => assert_eq!(
                err.message(),
                "Query results are empty; cannot return any more results."
            ),
            other => panic!("expected query error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_mixed_accessors_consume_each_document_once() {
        let (shared, pulls) = seeded(&[1, 2, 3, 4, 5]);
        let cursor = ResultCursor::new(shared, &id_mapper);

        assert_eq!(cursor.first().await.unwrap(), 1);

        let mut out = 0;
        assert!(cursor.first_into(&mut out).await.unwrap());
        assert_eq!(out, 2);
        assert!(cursor.one_into(&mut out).await.unwrap());
        assert_eq!(out, 3);

        assert_eq!(cursor.next().await.unwrap(), 4);
        assert_eq!(cursor.all().await.unwrap(), vec![5]);
        assert!(cursor.all().await.unwrap().is_empty());
        assert!(!cursor.next_into(&mut out).await.unwrap());

        assert_eq!(pulls.load(Ordering::SeqCst), 5);
    }

    #[derive(Default)]
    struct CountingMapper {
        by_value: AtomicUsize,
        in_place: AtomicUsize,
    }

    impl Mapper<i32> for CountingMapper {
        fn from_raw(&self, raw: RawDocument) -> OdmResult<i32> {
            self.by_value.fetch_add(1, Ordering::SeqCst);
            id_mapper(raw)
        }

        fn from_raw_into(&self, raw: RawDocument, out: &mut i32) -> OdmResult<()> {
            self.in_place.fetch_add(1, Ordering::SeqCst);
            *out = id_mapper(raw)?;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_all_maps_in_place() {
        let (shared, _) = seeded(&[1, 2]);
        let mapper = CountingMapper::default();
        let cursor = ResultCursor::new(shared, &mapper);

        assert_eq!(cursor.all().await.unwrap(), vec![1, 2]);
        assert_eq!(mapper.in_place.load(Ordering::SeqCst), 2);
        assert_eq!(mapper.by_value.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_all_stops_at_mapper_error() {
        let (cursor, pulls) = VecCursor::new(vec![doc! { "id": 1 }, doc! { "name": "no id" }, doc! { "id": 3 }]);
        let cursor = ResultCursor::new(SharedCursor::new(cursor), &id_mapper);

        assert!(matches!(cursor.all().await, Err(OdmError::Mapping(_))));
        assert_eq!(pulls.load(Ordering::SeqCst), 2);
        assert_eq!(cursor.all().await.unwrap(), vec![3]);
    }

    #[tokio::test]
    async fn test_mapper_errors_propagate_and_consume() {
        let (cursor, pulls) = VecCursor::new(vec![doc! { "name": "no id" }, doc! { "id": 9 }]);
        let cursor = ResultCursor::new(SharedCursor::new(cursor), &id_mapper);

        assert!(matches!(cursor.next().await, Err(OdmError::Mapping(_))));
        assert_eq!(cursor.next().await.unwrap(), 9);
        assert_eq!(pulls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_shared_handles_never_repeat_documents() {
        let (shared, pulls) = seeded(&[1, 2, 3]);
        let left = ResultCursor::new(shared.clone(), &id_mapper);
        let right = ResultCursor::new(shared, &id_mapper);

        assert_eq!(left.shared().handle_count(), 2);
        assert_eq!(left.next().await.unwrap(), 1);
        assert_eq!(right.next().await.unwrap(), 2);
        assert_eq!(left.all().await.unwrap(), vec![3]);
        assert!(right.all().await.unwrap().is_empty());
        assert_eq!(pulls.load(Ordering::SeqCst), 3);

        drop(left);
        assert_eq!(right.shared().handle_count(), 1);
    }
}
