pub mod config;
pub mod intelligence;
pub mod models;
pub mod pipeline;
pub mod pipeline_config;

use tracing_subscriber::EnvFilter;

/// Initialize tracing. `RUST_LOG` wins over the built-in filter unless `verbose`
/// forces debug output. Logs go to stderr so stdout stays free for reports.
///
/// Panics if a global subscriber is already installed; call it once from `main`.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("vitalscan=debug,vitalscan_lib=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter()))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
