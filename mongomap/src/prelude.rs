//! Convenient re-exports of commonly used types from mongomap.
//!
//! ```ignore
//! use mongomap::prelude::*;
//! ```

pub use mongomap_core::{
    cursor::{RawCursor, RawDocument, ResultCursor, SharedCursor},
    error::{OdmError, OdmResult, QueryError},
    filter::Filter,
    mapper::{Mapper, SerdeMapper},
    query::QueryBuilder,
    session::{Session, SessionBuilder, SessionExt},
};
