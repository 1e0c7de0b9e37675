//! Tracing subscriber setup

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Install the global subscriber
///
/// `RUST_LOG` wins over `logging.level`. `logging.format = "json"` switches
/// to one JSON object per line, anything else prints human readable output.
pub fn init_tracing(config: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("spam_rs={},tower_http={}", config.level, config.level).into()
    });

    let registry = tracing_subscriber::registry().with(env_filter);

    // try_init: tests and embedders may already have a subscriber
    let result = if config.format.eq_ignore_ascii_case("json") {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer()).try_init()
    };

    if let Err(e) = result {
        eprintln!("tracing already initialized: {}", e);
    }
}
