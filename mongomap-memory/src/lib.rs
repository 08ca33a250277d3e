//! In-memory session for mongomap.
//!
//! This crate provides a thread-safe, in-memory implementation of the `Session` trait.
//! It is meant for development and tests: documents live in per-collection vectors and
//! are returned in insertion order.
//!
//! # Quick Start
//!
//! ```ignore
//! use mongomap::{prelude::*, memory::InMemorySession};
//! use bson::doc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = InMemorySession::builder()
//!         .with_documents("numbers", vec![doc! { "id": 1 }, doc! { "id": 2 }])
//!         .build()
//!         .await?;
//!
//!     let ids = |doc: RawDocument| doc
//!         .get_i32("id")
//!         .map_err(|e| OdmError::Mapping(e.to_string()));
//!
//!     assert_eq!(session.query("numbers", &ids).all().await?, vec![1, 2]);
//!
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as mongomap_memory;

pub mod cursor;
pub mod matcher;
pub mod session;

pub use cursor::MemoryCursor;
pub use session::{InMemorySession, InMemorySessionBuilder};
