//! Conversion of raw documents into application types.
//!
//! A [`Mapper`] is the pluggable piece that turns a [`RawDocument`] into a `T`. Builders
//! and cursors only borrow their mapper, so one mapper can serve any number of queries.
//!
//! Besides implementing the trait by hand, two ready-made mappers are available:
//!
//! - any closure `Fn(RawDocument) -> OdmResult<T>`
//! - [`SerdeMapper`], which deserializes through serde for any `T: DeserializeOwned`
//!
//! # Example
//!
//! ```ignore
//! use mongomap::prelude::*;
//!
//! let ids = |doc: RawDocument| doc
//!     .get_i32("id")
//!     .map_err(|e| OdmError::Mapping(e.to_string()));
//!
//! let values: Vec<i32> = session.query("numbers", &ids).all().await?;
//! ```

use bson::{Bson, de::deserialize_from_bson};
use serde::de::DeserializeOwned;
use std::{fmt, marker::PhantomData};

use crate::{cursor::RawDocument, error::OdmResult};

/// Converts raw documents into values of type `T`.
pub trait Mapper<T>: Send + Sync {
    /// Builds a new `T` from a raw document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be represented as a `T`.
    fn from_raw(&self, raw: RawDocument) -> OdmResult<T>;

    /// Populates an existing `T` from a raw document.
    ///
    /// Implementations may reuse allocations held by `out`. On error the contents of
    /// `out` are unspecified.
    fn from_raw_into(&self, raw: RawDocument, out: &mut T) -> OdmResult<()> {
        *out = self.from_raw(raw)?;
        Ok(())
    }
}

impl<T, F> Mapper<T> for F
where
    F: Fn(RawDocument) -> OdmResult<T> + Send + Sync,
{
    fn from_raw(&self, raw: RawDocument) -> OdmResult<T> {
        self(raw)
    }
}

/// Maps raw documents through serde deserialization.
pub struct SerdeMapper<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> SerdeMapper<T> {
    pub fn new() -> Self {
        Self { _marker: PhantomData }
    }
}

impl<T> Default for SerdeMapper<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SerdeMapper<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerdeMapper")
            .field("target", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T: DeserializeOwned> Mapper<T> for SerdeMapper<T> {
    fn from_raw(&self, raw: RawDocument) -> OdmResult<T> {
        Ok(deserialize_from_bson(Bson::Document(raw))?)
    }
}
