use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const ENV_LOG: &str = "GAUGE_LOG";

/// Logs go to stderr so they never mix with dashboard frames or JSON on
/// stdout. `GAUGE_LOG` takes an `EnvFilter` directive.
pub fn init(default_level: &str) {
    let filter =
        EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}
