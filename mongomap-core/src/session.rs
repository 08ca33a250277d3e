//! Session abstraction over a database driver.
//!
//! A [`Session`] performs the actual round trip to the database. The mapping layer never
//! talks to a driver directly; it hands a collection name and a [`Filter`] to the session
//! and works with whatever [`SharedCursor`] comes back.
//!
//! # Traits
//!
//! - [`Session`]: the capability implemented by backends
//! - [`SessionExt`]: typed helpers available on every session
//! - [`SessionBuilder`]: factory trait for creating sessions

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    cursor::{ResultCursor, SharedCursor},
    error::OdmResult,
    filter::Filter,
    mapper::Mapper,
    query::QueryBuilder,
};

/// Abstract interface for database sessions.
///
/// Errors raised by implementations (network, protocol, server-side) are propagated to
/// callers of the mapping layer without translation.
#[async_trait]
pub trait Session: Send + Sync + Debug {
    /// Runs a find against a collection and returns a cursor over the raw results.
    ///
    /// # Arguments
    ///
    /// * `collection` - The name of the collection to query
    /// * `filter` - Which documents to return
    async fn find(&self, collection: &str, filter: Filter) -> OdmResult<SharedCursor>;

    /// Deletes every document in `collection` matching `filter`.
    ///
    /// # Warning
    ///
    /// This operation is irreversible.
    async fn remove_all(&self, collection: &str, filter: Filter) -> OdmResult<()>;

    /// Deletes at most one document in `collection` matching `filter`.
    ///
    /// Which document counts as the first match is defined by the implementation.
    async fn remove_one(&self, collection: &str, filter: Filter) -> OdmResult<()>;

    /// Cleanly shuts down the session, releasing all resources.
    ///
    /// The default implementation is a no-op.
    async fn shutdown(self) -> OdmResult<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

#[async_trait]
impl<S> Session for &S
where
    S: Session,
{
    async fn find(&self, collection: &str, filter: Filter) -> OdmResult<SharedCursor> {
        (*self).find(collection, filter).await
    }

    async fn remove_all(&self, collection: &str, filter: Filter) -> OdmResult<()> {
        (*self).remove_all(collection, filter).await
    }

    async fn remove_one(&self, collection: &str, filter: Filter) -> OdmResult<()> {
        (*self).remove_one(collection, filter).await
    }
}

/// Typed helpers layered on top of any [`Session`].
#[async_trait]
pub trait SessionExt: Session + Sized {
    /// Executes a find and wraps the raw cursor with `mapper`.
    async fn execute_query<'m, T>(
        &self,
        collection: &str,
        filter: Filter,
        mapper: &'m dyn Mapper<T>,
    ) -> OdmResult<ResultCursor<'m, T>>;

    /// Creates a [`QueryBuilder`] bound to this session, a collection and a mapper.
    fn query<'s, 'm, T>(
        &'s self,
        collection: &str,
        mapper: &'m dyn Mapper<T>,
    ) -> QueryBuilder<'s, 'm, Self, T>;
}

#[async_trait]
impl<S: Session> SessionExt for S {
    async fn execute_query<'m, T>(
        &self,
        collection: &str,
        filter: Filter,
        mapper: &'m dyn Mapper<T>,
    ) -> OdmResult<ResultCursor<'m, T>> {
        let cursor = self.find(collection, filter).await?;

        Ok(ResultCursor::new(cursor, mapper))
    }

    fn query<'s, 'm, T>(
        &'s self,
        collection: &str,
        mapper: &'m dyn Mapper<T>,
    ) -> QueryBuilder<'s, 'm, Self, T> {
        QueryBuilder::new(self, collection, mapper)
    }
}

/// Factory trait for constructing sessions.
#[async_trait]
pub trait SessionBuilder {
    type Session: Session;

    async fn build(self) -> OdmResult<Self::Session>;
}
