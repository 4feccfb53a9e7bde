//! Console logging for the service.
//!
//! Events are filtered through `RUST_LOG` (default `info`) and written either
//! as human-readable multi-line records or as one JSON object per line,
//! depending on [`LogFormat`].
//!
//! ```bash
//! RUST_LOG=qms_id=trace,qms_id_server=debug cargo run -p qms-id-server
//! LOG_FORMAT=json cargo run -p qms-id-server
//! ```

use crate::server::config::LogFormat;
use tracing_subscriber::{EnvFilter, fmt::time::ChronoLocal, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_telemetry(format: LogFormat) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    let pretty = (format == LogFormat::Pretty).then(|| {
        tracing_subscriber::fmt::layer()
            .with_thread_ids(true)
            .with_line_number(true)
            .with_target(false)
            .with_timer(ChronoLocal::rfc_3339())
            .with_file(true)
            .pretty()
    });

    let json = (format == LogFormat::Json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_thread_ids(true)
            .with_timer(ChronoLocal::rfc_3339())
            .json()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .try_init()?;

    Ok(())
}
