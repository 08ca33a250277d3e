//! Raw cursor over a MongoDB driver cursor.

use async_trait::async_trait;
use bson::Document;
use futures::{TryStream, TryStreamExt};
use mongodb::Cursor;
use std::fmt;

use mongomap_core::{
    cursor::RawCursor,
    error::{OdmError, OdmResult},
};

/// Adapts a driver [`Cursor`] (or any fallible stream of documents) to [`RawCursor`].
///
/// The driver only reports exhaustion by returning nothing, so one document is buffered
/// ahead to answer [`RawCursor::has_more`]. Exhaustion is latched: once the driver has
/// run dry the cursor is never polled again.
pub struct MongoRawCursor<S = Cursor<Document>> {
    stream: S,
    peeked: Option<Document>,
    exhausted: bool,
}

impl<S> MongoRawCursor<S>
where
    S: TryStream<Ok = Document> + Unpin + Send,
    S::Error: fmt::Display,
{
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            peeked: None,
            exhausted: false,
        }
    }

    async fn fill(&mut self) -> OdmResult<()> {
        if self.peeked.is_some() || self.exhausted {
            return Ok(());
        }

        match self
            .stream
            .try_next()
            .await
            .map_err(|e| OdmError::Backend(e.to_string()))?
        {
            Some(document) => self.peeked = Some(document),
            None => self.exhausted = true,
        }

        Ok(())
    }
}

#[async_trait]
impl<S> RawCursor for MongoRawCursor<S>
where
    S: TryStream<Ok = Document> + Unpin + Send,
    S::Error: fmt::Display,
{
    async fn has_more(&mut self) -> OdmResult<bool> {
        self.fill().await?;

        Ok(self.peeked.is_some())
    }

    async fn next_document(&mut self) -> OdmResult<Option<Document>> {
        self.fill().await?;

        Ok(self.peeked.take())
    }
}

impl<S> fmt::Debug for MongoRawCursor<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MongoRawCursor")
            .field("buffered", &self.peeked.is_some())
            .field("exhausted", &self.exhausted)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use futures::stream;
    use std::{
        collections::VecDeque,
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
        task::Poll,
    };

    type Item = Result<Document, String>;

    /// Stream over `items` that counts every poll it receives.
    fn counted(
        items: Vec<Item>,
    ) -> (impl TryStream<Ok = Document, Error = String> + Unpin + Send, Arc<AtomicUsize>) {
        let polls = Arc::new(AtomicUsize::new(0));
        let counter = polls.clone();
        let mut items: VecDeque<Item> = items.into();

        let stream = stream::poll_fn(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Poll::Ready(items.pop_front())
        });

        (stream, polls)
    }

    #[tokio::test]
    async fn test_has_more_does_not_consume() {
        let (stream, polls) = counted(vec![Ok(doc! { "id": 1 }), Ok(doc! { "id": 2 })]);
        let mut cursor = MongoRawCursor::new(stream);

        assert!(cursor.has_more().await.unwrap());
        assert!(cursor.has_more().await.unwrap());
        assert_eq!(polls.load(Ordering::SeqCst), 1);

        assert_eq!(cursor.next_document().await.unwrap(), Some(doc! { "id": 1 }));
        assert_eq!(polls.load(Ordering::SeqCst), 1);

        assert_eq!(cursor.next_document().await.unwrap(), Some(doc! { "id": 2 }));
        assert_eq!(polls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_exhaustion_is_latched() {
        let (stream, polls) = counted(vec![Ok(doc! { "id": 1 })]);
        let mut cursor = MongoRawCursor::new(stream);

        assert_eq!(cursor.next_document().await.unwrap(), Some(doc! { "id": 1 }));
        assert!(!cursor.has_more().await.unwrap());
        assert_eq!(polls.load(Ordering::SeqCst), 2);

        for _ in 0..3 {
            assert!(!cursor.has_more().await.unwrap());
            assert_eq!(cursor.next_document().await.unwrap(), None);
        }
        assert_eq!(polls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_stream_errors_are_backend_errors() {
        let (stream, _) = counted(vec![Err("cursor killed".to_string())]);
        let mut cursor = MongoRawCursor::new(stream);

        match cursor.has_more().await {
            Err(OdmError::Backend(message)) => assert_eq!(message, "cursor killed"),
            other => panic!("expected backend error, got {other:?}"),
        }
    }
}
