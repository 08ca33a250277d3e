//! MongoDB-backed session and its builder.
//!
//! Finds stream through the driver cursor; removals map to `delete_many` and
//! `delete_one`. Driver failures surface as [`OdmError::Backend`].

use async_trait::async_trait;
use bson::Document;
use mongodb::{
    Client, Collection as MongoCollection,
    options::ClientOptions,
};
use std::time::Duration;
use tracing::debug;

use mongomap_core::{
    cursor::SharedCursor,
    error::{OdmError, OdmResult},
    filter::Filter,
    session::{Session, SessionBuilder},
};

use crate::cursor::MongoRawCursor;

/// A [`Session`] over one database of a MongoDB deployment.
#[derive(Debug, Clone)]
pub struct MongoSession {
    client: Client,
    database: String,
}

impl MongoSession {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }

    pub fn builder(dsn: &str, database: &str) -> MongoSessionBuilder {
        MongoSessionBuilder::new(dsn, database)
    }

    /// Returns the name of the database this session works against.
    pub fn database(&self) -> &str {
        &self.database
    }

    fn get_collection(&self, collection_name: &str) -> MongoCollection<Document> {
        self.client
            .database(&self.database)
            .collection(collection_name)
    }

    async fn shutdown(self) -> OdmResult<()> {
        self.client.shutdown().await;

        Ok(())
    }
}

#[async_trait]
impl Session for MongoSession {
    async fn find(&self, collection: &str, filter: Filter) -> OdmResult<SharedCursor> {
        debug!(collection, database = %self.database, "mongodb find");

        let cursor = self.get_collection(collection)
            .find(filter.into_document())
            .await
            .map_err(|e| OdmError::Backend(e.to_string()))?;

        Ok(SharedCursor::new(MongoRawCursor::new(cursor)))
    }

    async fn remove_all(&self, collection: &str, filter: Filter) -> OdmResult<()> {
        let result = self.get_collection(collection)
            .delete_many(filter.into_document())
            .await
            .map_err(|e| OdmError::Backend(e.to_string()))?;

        debug!(collection, removed = result.deleted_count, "mongodb delete_many");

        Ok(())
    }

    async fn remove_one(&self, collection: &str, filter: Filter) -> OdmResult<()> {
        let result = self.get_collection(collection)
            .delete_one(filter.into_document())
            .await
            .map_err(|e| OdmError::Backend(e.to_string()))?;

        debug!(collection, removed = result.deleted_count, "mongodb delete_one");

        Ok(())
    }

    async fn shutdown(self) -> OdmResult<()> {
        self.shutdown().await
    }
}

/// Builder for [`MongoSession`].
///
/// Optional settings are applied on top of whatever the connection string specifies.
/// Pool settings are forwarded to the driver, which owns the pool.
#[derive(Debug, Clone)]
pub struct MongoSessionBuilder {
    dsn: String,
    database: String,
    app_name: Option<String>,
    min_pool_size: Option<u32>,
    max_pool_size: Option<u32>,
    connect_timeout: Option<Duration>,
    server_selection_timeout: Option<Duration>,
}

impl MongoSessionBuilder {
    pub fn new(dsn: &str, database: &str) -> Self {
        Self {
            dsn: dsn.to_string(),
            database: database.to_string(),
            app_name: None,
            min_pool_size: None,
            max_pool_size: None,
            connect_timeout: None,
            server_selection_timeout: None,
        }
    }

    /// Sets the application name reported in server logs.
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    /// Sets the minimum number of connections the driver keeps open.
    pub fn with_min_pool_size(mut self, size: u32) -> Self {
        self.min_pool_size = Some(size);
        self
    }

    /// Sets the maximum number of connections the driver may open.
    pub fn with_max_pool_size(mut self, size: u32) -> Self {
        self.max_pool_size = Some(size);
        self
    }

    /// Sets how long the driver waits when opening a connection.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets how long the driver waits to find a suitable server.
    pub fn with_server_selection_timeout(mut self, timeout: Duration) -> Self {
        self.server_selection_timeout = Some(timeout);
        self
    }

    /// Parses the connection string and applies the builder's overrides.
    ///
    /// # Errors
    ///
    /// Returns [`OdmError::Initialization`] if the connection string is invalid.
    pub async fn client_options(&self) -> OdmResult<ClientOptions> {
        let mut options = ClientOptions::parse(&self.dsn)
            .await
            .map_err(|e| OdmError::Initialization(e.to_string()))?;

        if let Some(app_name) = &self.app_name {
            options.app_name = Some(app_name.clone());
        }
        if let Some(size) = self.min_pool_size {
            options.min_pool_size = Some(size);
        }
        if let Some(size) = self.max_pool_size {
            options.max_pool_size = Some(size);
        }
        if let Some(timeout) = self.connect_timeout {
            options.connect_timeout = Some(timeout);
        }
        if let Some(timeout) = self.server_selection_timeout {
            options.server_selection_timeout = Some(timeout);
        }

        Ok(options)
    }
}

#[async_trait]
impl SessionBuilder for MongoSessionBuilder {
    type Session = MongoSession;

    async fn build(self) -> OdmResult<Self::Session> {
        let options = self.client_options().await?;

        Ok(MongoSession::new(
            Client::with_options(options)
                .map_err(|e| OdmError::Initialization(e.to_string()))?,
            self.database,
        ))
    }
}
