use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber: `RUST_LOG` if set, otherwise `log_level`,
/// rendered as flattened JSON events.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_tracing(service_name: &str, log_level: &str) -> bool {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let result = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_file(true)
                .with_line_number(true)
                .json()
                .flatten_event(true),
        )
        .try_init();

    match result {
        Ok(()) => {
            tracing::info!(service = service_name, log_level, "Tracing initialized");
            true
        }
        Err(e) => {
            eprintln!(
                "Failed to initialize tracing for service '{}': {}",
                service_name, e
            );
            false
        }
    }
}
