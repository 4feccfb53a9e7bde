//! Service state shared by the HTTP routes.
//!
//! [`IdService`] pairs the [`IssuerPool`] (writes) with a handle on the same
//! [`IdentifierStore`] the issuer persists into (reads). Listing and lookups
//! read the store directly; only issuance is funneled through the worker.

use crate::server::{
    config::{ServerConfig, Strategy},
    error::{Error, Result},
    pool::manager::IssuerPool,
};
use core::time::Duration;
use qms_id::{
    Allocation, BasicAllocator, IdIssuer, Identifier, IdentifierStore, LockIssuer, MemoryStore,
    RetryIssuer, SystemCalendar,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct IdService {
    pool: Arc<IssuerPool>,
    store: Arc<dyn IdentifierStore>,
}

impl IdService {
    /// Builds the service described by `config` over a fresh in-memory store
    /// and spawns its issuing worker.
    pub fn new(config: &ServerConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let allocator = BasicAllocator::new(
            config.prefix_table(),
            SystemCalendar::with_offset(config.utc_offset),
        );

        let issuer: Box<dyn IdIssuer> = match config.strategy {
            Strategy::Lock => Box::new(LockIssuer::new(allocator, Arc::clone(&store))),
            Strategy::Retry => Box::new(RetryIssuer::with_max_attempts(
                allocator,
                Arc::clone(&store),
                config.max_attempts,
            )),
        };

        Self::from_issuer(config, issuer, store)
    }

    /// Builds the service around an existing issuer. `store` must be the store
    /// the issuer persists into, otherwise reads will not see issued
    /// identifiers.
    pub fn from_issuer(
        config: &ServerConfig,
        issuer: Box<dyn IdIssuer>,
        store: Arc<dyn IdentifierStore>,
    ) -> Self {
        let pool = IssuerPool::spawn(
            issuer,
            config.request_buffer_size,
            Duration::from_secs(config.shutdown_timeout),
        );

        Self {
            pool: Arc::new(pool),
            store,
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn issue(&self, category: &str) -> Result<Allocation> {
        self.pool.issue(category).await
    }

    /// Raw issued strings starting with `prefix`, legacy entries included.
    pub fn list(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .store
            .list_with_prefix(prefix)
            .map_err(qms_id::Error::from)?)
    }

    /// Parses `raw` and confirms it was issued.
    ///
    /// # Errors
    ///
    /// - [`Error::Id`] with `MalformedIdentifier` if `raw` is not canonical.
    /// - [`Error::NotFound`] if it is well-formed but absent from the store.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn lookup(&self, raw: &str) -> Result<Identifier> {
        let id: Identifier = raw.parse()?;
        let canonical = id.to_string();

        let issued = self
            .store
            .list_with_prefix(&canonical)
            .map_err(qms_id::Error::from)?;
        if issued.iter().any(|entry| *entry == canonical) {
            Ok(id)
        } else {
            Err(Error::NotFound { id: canonical })
        }
    }

    pub fn is_shutting_down(&self) -> bool {
        self.pool.is_shutting_down()
    }

    /// Refuses new work and stops the issuing worker.
    pub async fn shutdown(&self) -> Result<()> {
        self.pool.shutdown().await
    }
}
