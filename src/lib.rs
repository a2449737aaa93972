pub mod api; // HTTP API
pub mod config;
pub mod db;
pub mod detection; // Voice + sensor triggers
pub mod hospital; // Availability, traffic, ranking
pub mod models;
pub mod notify;
pub mod protocol; // Escalation workflow
pub mod triage; // Symptom severity scoring

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber. `RUST_LOG` overrides the
/// default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();
}
