use crate::server::pool::request::WorkRequest;
use qms_id::IdIssuer;
use std::sync::Arc;
use tokio::{sync::mpsc, task};

/// The single writer in front of the issuer.
///
/// Requests are served strictly one at a time in arrival order, so within this
/// process the read-allocate-persist cycle never interleaves, whatever
/// strategy the issuer itself uses. Issuers take locks and may do store I/O,
/// so each call runs on the blocking pool and the loop awaits it before
/// taking the next request. The loop runs until a [`WorkRequest::Shutdown`]
/// arrives or every sender is dropped.
pub async fn worker_loop(mut rx: mpsc::Receiver<WorkRequest>, issuer: Arc<dyn IdIssuer>) {
    tracing::trace!("Issuing worker started");

    while let Some(work) = rx.recv().await {
        match work {
            WorkRequest::Issue { category, response } => {
                let issuer = Arc::clone(&issuer);
                let call = task::spawn_blocking(move || {
                    let outcome = issuer.try_issue(&category);
                    (category, outcome)
                });

                let (category, outcome) = match call.await {
                    Ok(done) => done,
                    Err(e) => {
                        // Dropping `response` reports a channel error to the requester.
                        tracing::error!(error = %e, "Issuer call did not complete");
                        continue;
                    }
                };

                match &outcome {
                    Ok(allocation) => tracing::debug!(
                        id = %allocation.id,
                        fallback = allocation.used_fallback(),
                        "Issued identifier"
                    ),
                    Err(e) => tracing::warn!(%category, error = %e, "Issuance failed"),
                }
                if response.send(outcome).is_err() {
                    // The identifier is persisted either way; only the reply is lost.
                    tracing::warn!(%category, "Requester went away before the reply");
                }
            }
            WorkRequest::Shutdown { response } => {
                tracing::debug!("Issuing worker received shutdown signal");

                if response.send(()).is_err() {
                    tracing::error!("Issuing worker failed to acknowledge shutdown");
                }
                break;
            }
        }
    }

    tracing::trace!("Issuing worker stopped");
}
