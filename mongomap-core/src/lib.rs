//! A thin object-document mapping layer over database sessions.
//!
//! This crate is the core of the mongomap project and provides:
//!
//! - **Sessions** ([`session`]) - The capability that performs database round trips
//! - **Mappers** ([`mapper`]) - Pluggable conversion of raw documents into typed values
//! - **Cursors** ([`cursor`]) - Raw cursor abstraction and the typed [`cursor::ResultCursor`]
//! - **Queries** ([`query`]) - The [`query::QueryBuilder`] bound to one collection
//! - **Filters** ([`filter`]) - Driver-level filter expressions
//! - **Error handling** ([`error`]) - Error types and result types
//!
//! # Example
//!
//! ```ignore
//! use mongomap::prelude::*;
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! pub struct User {
//!     pub name: String,
//! }
//!
//! let mapper = SerdeMapper::<User>::new();
//! let alice = session.query("users", &mapper).first().await?;
//! ```

#[allow(unused_extern_crates)]
extern crate self as mongomap_core;

pub mod cursor;
pub mod error;
pub mod filter;
pub mod mapper;
pub mod query;
pub mod session;
