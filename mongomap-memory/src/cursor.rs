//! Snapshot cursor served by the in-memory session.

use async_trait::async_trait;
use bson::Document;
use std::collections::VecDeque;

use mongomap_core::{cursor::RawCursor, error::OdmResult};

/// A raw cursor over a snapshot of documents taken when the find ran.
///
/// Later writes to the session are not visible through an open cursor.
#[derive(Debug, Default)]
pub struct MemoryCursor {
    documents: VecDeque<Document>,
}

impl MemoryCursor {
    pub fn new(documents: impl IntoIterator<Item = Document>) -> Self {
        Self {
            documents: documents.into_iter().collect(),
        }
    }

    /// Number of documents not yet read.
    pub fn remaining(&self) -> usize {
        self.documents.len()
    }
}

#[async_trait]
impl RawCursor for MemoryCursor {
    async fn has_more(&mut self) -> OdmResult<bool> {
        Ok(!self.documents.is_empty())
    }

    async fn next_document(&mut self) -> OdmResult<Option<Document>> {
        Ok(self.documents.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[tokio::test]
    async fn test_cursor_yields_in_order_then_stays_exhausted() {
        let mut cursor = MemoryCursor::new(vec![doc! { "id": 1 }, doc! { "id": 2 }]);

        assert_eq!(cursor.remaining(), 2);
        assert_eq!(cursor.next_document().await.unwrap(), Some(doc! { "id": 1 }));
        assert!(cursor.has_more().await.unwrap());
        assert_eq!(cursor.next_document().await.unwrap(), Some(doc! { "id": 2 }));

        for _ in 0..2 {
            assert!(!cursor.has_more().await.unwrap());
            assert_eq!(cursor.next_document().await.unwrap(), None);
        }
    }
}
