//! Filter evaluation for in-memory documents.
//!
//! Only top-level equality is understood: every key of the filter must be present in the
//! document with an equal value. Numeric values compare by magnitude regardless of their
//! BSON width, so `Int32(1)`, `Int64(1)` and `Double(1.0)` are all equal.

use bson::{Bson, Document};

use mongomap_core::{
    error::{OdmError, OdmResult},
    filter::Filter,
};

pub(crate) struct DocumentMatcher<'a> {
    filter: &'a Document,
}

impl<'a> DocumentMatcher<'a> {
    /// Prepares a matcher, rejecting filters that use query operators.
    pub fn new(filter: &'a Filter) -> OdmResult<Self> {
        let filter = filter.as_document();

        if let Some(key) = filter.keys().find(|key| key.starts_with('$')) {
            return Err(OdmError::Backend(format!(
                "In-memory session does not support operator {key}"
            )));
        }

        Ok(Self { filter })
    }

    pub fn matches(&self, document: &Document) -> bool {
        self.filter
            .iter()
            .all(|(key, expected)| match document.get(key) {
                Some(actual) => values_equal(actual, expected),
                None => false,
            })
    }
}

fn as_number(value: &Bson) -> Option<f64> {
    match value {
        Bson::Int32(value) => Some(*value as f64),
        Bson::Int64(value) => Some(*value as f64),
        Bson::Double(value) => Some(*value),
        _ => None,
    }
}

fn values_equal(left: &Bson, right: &Bson) -> bool {
    match (as_number(left), as_number(right)) {
        (Some(left), Some(right)) => left == right,
        _ => left == right,
    }
}
