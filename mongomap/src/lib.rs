//! Main mongomap crate providing typed queries over document database sessions.
//!
//! This crate is the primary entry point for users of mongomap. It re-exports the core
//! types from the sub-crates and gives access to the available sessions.
//!
//! # Features
//!
//! - **Typed results** - Raw documents are converted through a pluggable [`mapper::Mapper`]
//! - **Pull-based cursors** - Read results one at a time or drain them at once
//! - **Multiple sessions** - In-memory and MongoDB sessions behind one trait
//!
//! # Quick Start
//!
//! ```ignore
//! use mongomap::{prelude::*, memory::InMemorySession};
//! use bson::doc;
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! pub struct User {
//!     pub name: String,
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let session = InMemorySession::builder()
//!         .with_documents("users", vec![doc! { "name": "Alice" }, doc! { "name": "Bob" }])
//!         .build()
//!         .await
//!         .unwrap();
//!
//!     let mapper = SerdeMapper::<User>::new();
//!     let users = session.query("users", &mapper);
//!
//!     // Pull results one at a time
//!     let cursor = users.result().await.unwrap();
//!     while cursor.more().await.unwrap() {
//!         println!("{:?}", cursor.next().await.unwrap());
//!     }
//!
//!     // Or fetch them all
//!     let everyone = users.all().await.unwrap();
//!     assert_eq!(everyone.len(), 2);
//!
//!     // Remove everything in the collection
//!     users.remove_all().await.unwrap();
//! }
//! ```
//!
//! # Sessions
//!
//! - [`memory`] - In-memory session for development and testing
//! - [`mongodb`] - MongoDB session (requires `mongodb` feature)

pub mod prelude;

pub use mongomap_core::{cursor, error, filter, mapper, query, session};

// Re-export BSON types for convenience
pub use bson;

/// In-memory session implementations.
pub mod memory {
    pub use mongomap_memory::{InMemorySession, InMemorySessionBuilder, MemoryCursor};
}

/// MongoDB session implementations.
///
/// This module is only available when the `mongodb` feature is enabled.
#[cfg(feature = "mongodb")]
pub mod mongodb {
    pub use mongomap_mongodb::{MongoRawCursor, MongoSession, MongoSessionBuilder};
}
