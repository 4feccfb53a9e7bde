//! Front door to the issuing worker.
//!
//! [`IssuerPool`] owns the sending half of the worker's bounded queue. Handlers
//! submit [`WorkRequest::Issue`] messages and await the reply on a oneshot
//! channel; a full queue applies backpressure. Shutdown is coordinated through
//! a [`CancellationToken`] so requests arriving late are refused instead of
//! queued behind the shutdown message.

use crate::server::{
    error::{Error, Result},
    pool::{request::WorkRequest, worker::worker_loop},
};
use core::time::Duration;
use qms_id::{Allocation, IdIssuer};
use std::sync::Arc;
use tokio::{
    sync::{mpsc, oneshot},
    time::timeout,
};
use tokio_util::sync::CancellationToken;

pub struct IssuerPool {
    worker: mpsc::Sender<WorkRequest>,
    shutdown_token: CancellationToken,
    shutdown_timeout: Duration,
}

impl IssuerPool {
    /// Spawns the issuing worker on the current runtime.
    pub fn spawn(
        issuer: Box<dyn IdIssuer>,
        buffer_size: usize,
        shutdown_timeout: Duration,
    ) -> Self {
        let (tx, rx) = mpsc::channel(buffer_size.max(1));
        tokio::spawn(worker_loop(rx, Arc::from(issuer)));

        Self {
            worker: tx,
            shutdown_token: CancellationToken::new(),
            shutdown_timeout,
        }
    }

    /// Issues the next identifier for `category` through the worker.
    ///
    /// # Errors
    ///
    /// - [`Error::ServiceShutdown`] once shutdown has begun.
    /// - [`Error::ChannelError`] if the worker is gone.
    /// - [`Error::Id`] with the issuer's own failure.
    pub async fn issue(&self, category: &str) -> Result<Allocation> {
        if self.shutdown_token.is_cancelled() {
            return Err(Error::ServiceShutdown);
        }

        let (tx, rx) = oneshot::channel();
        let request = WorkRequest::Issue {
            category: category.to_owned(),
            response: tx,
        };

        tokio::select! {
            () = self.shutdown_token.cancelled() => return Err(Error::ServiceShutdown),
            sent = self.worker.send(request) => sent.map_err(|_| Error::ChannelError {
                context: "issuing worker channel closed".to_string(),
            })?,
        }

        let allocation = rx.await.map_err(|_| Error::ChannelError {
            context: "issuing worker dropped the reply".to_string(),
        })??;

        Ok(allocation)
    }

    /// Gracefully stops the worker.
    ///
    /// - Cancels the [`CancellationToken`] so new requests are refused.
    /// - Queues a [`WorkRequest::Shutdown`] behind requests already accepted,
    ///   letting those finish.
    /// - Waits up to the configured timeout for the acknowledgement.
    pub async fn shutdown(&self) -> Result<()> {
        // === Phase 1: Stop accepting new requests ===
        tracing::info!("Refusing new requests");
        self.shutdown_token.cancel();

        // === Phase 2: Notify the worker ===
        tracing::debug!("Notifying issuing worker to shut down");
        let (tx, rx) = oneshot::channel();
        if self
            .worker
            .send(WorkRequest::Shutdown { response: tx })
            .await
            .is_err()
        {
            tracing::warn!("Issuing worker already stopped");
            return Ok(());
        }

        // === Phase 3: Wait for the acknowledgement ===
        match timeout(self.shutdown_timeout, rx).await {
            Ok(Ok(())) => tracing::debug!("Issuing worker shutdown acknowledged"),
            Ok(Err(e)) => {
                return Err(Error::ChannelError {
                    context: format!("shutdown acknowledgement lost: {e}"),
                });
            }
            Err(_) => tracing::warn!(
                "Issuing worker shutdown timed out after {:?}",
                self.shutdown_timeout
            ),
        }

        tracing::info!("Issuer pool shutdown complete");
        Ok(())
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown_token.is_cancelled()
    }
}
