//! Driver-level filter expressions.

use bson::Document;

/// Describes which documents a query or removal targets.
///
/// The builder in this crate only ever produces [`Filter::match_all`]; sessions receive
/// the filter as a plain BSON document they can hand to their driver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    document: Document,
}

impl Filter {
    /// Creates a filter matching every document in a collection.
    pub fn match_all() -> Self {
        Self { document: Document::new() }
    }

    /// Returns `true` if this filter places no constraint on documents.
    pub fn is_match_all(&self) -> bool {
        self.document.is_empty()
    }

    /// Returns the underlying BSON document.
    pub fn as_document(&self) -> &Document {
        &self.document
    }

    /// Consumes the filter, returning the underlying BSON document.
    pub fn into_document(self) -> Document {
        self.document
    }
}

impl From<Document> for Filter {
    fn from(document: Document) -> Self {
        Self { document }
    }
}
