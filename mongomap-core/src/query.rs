//! Typed queries against a single collection.
//!
//! A [`QueryBuilder`] binds a session, a collection name and a mapper. Every call builds
//! a fresh filter and delegates to the session, so a builder can be reused freely.
//!
//! # Example
//!
//! ```ignore
//! use mongomap::prelude::*;
//!
//! let mapper = SerdeMapper::<User>::new();
//! let users = session.query("users", &mapper);
//!
//! let everyone = users.all().await?;
//! users.remove_all().await?;
//! ```

use tracing::debug;

use crate::{
    cursor::ResultCursor,
    error::OdmResult,
    filter::Filter,
    mapper::Mapper,
    session::{Session, SessionExt},
};

/// Describes a query against one collection and forwards it to a [`Session`].
///
/// # Type Parameters
///
/// * `'s` - Lifetime of the borrowed session
/// * `'m` - Lifetime of the borrowed mapper
/// * `S` - The session implementation
/// * `T` - The type produced for each document
pub struct QueryBuilder<'s, 'm, S: Session, T> {
    session: &'s S,
    collection: String,
    mapper: &'m dyn Mapper<T>,
}

impl<'s, 'm, S: Session, T> QueryBuilder<'s, 'm, S, T> {
    /// Creates a builder for `collection` on `session`, mapping results with `mapper`.
    pub fn new(session: &'s S, collection: impl Into<String>, mapper: &'m dyn Mapper<T>) -> Self {
        Self {
            session,
            collection: collection.into(),
            mapper,
        }
    }

    /// Returns the name of the bound collection.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    // Always match-all for now.
    fn filter(&self) -> Filter {
        Filter::match_all()
    }

    /// Executes the query and returns a cursor over the typed results.
    ///
    /// # Errors
    ///
    /// Any error raised by the session is returned unchanged.
    pub async fn result(&self) -> OdmResult<ResultCursor<'m, T>> {
        debug!(collection = %self.collection, "executing query");

        self.session
            .execute_query(&self.collection, self.filter(), self.mapper)
            .await
    }

    /// Executes the query and returns the first result.
    ///
    /// # Errors
    ///
    /// Returns a [`QueryError`](crate::error::QueryError) if no documents match.
    pub async fn first(&self) -> OdmResult<T> {
        self.result().await?.first().await
    }

    /// Executes the query and returns the single result.
    ///
    /// Equivalent to [`QueryBuilder::first`]; no check is made that only one document
    /// matched.
    pub async fn one(&self) -> OdmResult<T> {
        self.result().await?.one().await
    }

    /// Deletes every document matching the query.
    pub async fn remove_all(&self) -> OdmResult<()> {
        debug!(collection = %self.collection, "removing all matching documents");

        self.session
            .remove_all(&self.collection, self.filter())
            .await
    }

    /// Deletes at most one document matching the query.
    pub async fn remove_one(&self) -> OdmResult<()> {
        debug!(collection = %self.collection, "removing one matching document");

        self.session
            .remove_one(&self.collection, self.filter())
            .await
    }
}

impl<S: Session, T: Default> QueryBuilder<'_, '_, S, T> {
    /// Executes the query and collects every result in delivery order.
    pub async fn all(&self) -> OdmResult<Vec<T>> {
        self.result().await?.all().await
    }
}

impl<S: Session, T> std::fmt::Debug for QueryBuilder<'_, '_, S, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("session", &self.session)
            .field("collection", &self.collection)
            .finish()
    }
}
