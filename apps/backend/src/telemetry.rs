//! Tracing setup for the server binary.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter: request logs at info, the SQL layers quiet. The blog
/// routes themselves log through this crate's target.
const DEFAULT_FILTER: &str = "info,blog_backend=info,sqlx=warn,sea_orm=warn";

/// Resolve the log filter: `BLOG_LOG` wins, then `RUST_LOG`, then the
/// default above.
fn log_filter() -> EnvFilter {
    std::env::var("BLOG_LOG")
        .map(EnvFilter::new)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize JSON tracing. One line per event, fields flattened so log
/// shippers can index `trace_id` and the request fields directly.
pub fn init_tracing() {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_ansi(false)
        .json()
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(log_filter())
        .with(fmt_layer)
        .init();
}
