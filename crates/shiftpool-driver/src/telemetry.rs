//! Log output for the driver.
//!
//! Everything the pool reports goes through `tracing`: pool and worker
//! lifecycle events come from `shiftpool::LogObserver`, per-job lines from the
//! job handler. The filter defaults to `info` and can be overridden with
//! `RUST_LOG`, for example `RUST_LOG=debug` to also see job handoffs and the
//! pool's internal shutdown phases.

use tracing_subscriber::{
    EnvFilter, fmt, fmt::time::ChronoLocal, layer::SubscriberExt, util::SubscriberInitExt,
};

pub fn init_logging(json: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    let (text, json) = if json {
        let layer = fmt::layer()
            .json()
            .with_thread_names(true)
            .with_timer(ChronoLocal::rfc_3339())
            .with_current_span(false);
        (None, Some(layer))
    } else {
        let layer = fmt::layer()
            .with_thread_names(true)
            .with_line_number(true)
            .with_target(false)
            .with_timer(ChronoLocal::rfc_3339())
            .compact();
        (Some(layer), None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text)
        .with(json)
        .try_init()?;

    Ok(())
}
