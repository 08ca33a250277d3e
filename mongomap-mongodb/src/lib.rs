//! MongoDB session for mongomap.
//!
//! This crate provides a `Session` implementation backed by the official MongoDB async
//! driver. Finds are streamed through the driver cursor, removals map to
//! `delete_many`/`delete_one`.
//!
//! To use this session, include the `mongodb` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! mongomap = { version = "x.y.z", features = ["mongodb"] }
//! ```
//!
//! # Ordering
//!
//! `remove_one` deletes whichever matching document the server finds first, which is
//! natural (storage) order for the match-all filter. No ordering is guaranteed.
//!
//! # Example
//!
//! ```ignore
//! use mongomap::{prelude::*, mongodb::MongoSession};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = MongoSession::builder("mongodb://localhost:27017", "my_database")
//!         .with_app_name("my-app")
//!         .build()
//!         .await?;
//!
//!     let mapper = SerdeMapper::<User>::new();
//!     let users = session.query("users", &mapper).all().await?;
//!
//!     session.shutdown().await?;
//!     Ok(())
//! }
//! ```

#[allow(unused_extern_crates)]
extern crate self as mongomap_mongodb;

pub mod cursor;
pub mod session;

pub use cursor::MongoRawCursor;
pub use session::{MongoSession, MongoSessionBuilder};
