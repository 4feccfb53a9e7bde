use qms_id::Allocation;
use tokio::sync::oneshot;

/// Messages accepted by the issuing worker.
#[derive(Debug)]
pub enum WorkRequest {
    /// Issue the next identifier for `category` and report the outcome.
    Issue {
        category: String,
        response: oneshot::Sender<qms_id::Result<Allocation>>,
    },
    /// Stop after acknowledging on `response`.
    Shutdown { response: oneshot::Sender<()> },
}
