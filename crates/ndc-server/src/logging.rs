// Logging setup — powered by tracing-subscriber
//
// A compatibility bridge (`tracing_log::LogTracer`) captures all `log::*`
// macro calls and routes them through the tracing subscriber so span
// context is preserved end-to-end.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Build the `EnvFilter` from the base level plus hardcoded noisy-crate
/// overrides.
fn build_env_filter(level: &str) -> anyhow::Result<EnvFilter> {
    let mut directives = vec![level.to_string()];

    // Suppress noisy third-party crates
    let noisy: &[(&str, &str)] = &[
        ("actix_server", "warn"),
        ("actix_web", "warn"),
        ("h2", "warn"),
    ];
    for (target, lvl) in noisy {
        directives.push(format!("{}={}", target, lvl));
    }

    let filter_str = directives.join(",");
    EnvFilter::try_new(&filter_str)
        .map_err(|e| anyhow::anyhow!("Invalid tracing filter '{}': {}", filter_str, e))
}

/// Initialize the global subscriber: console layer (compact or pretty),
/// the `log` bridge, and the level filter. Installing a second subscriber
/// in one process is an error surfaced to the caller; re-installing the
/// `log` bridge is harmless and ignored.
pub fn init_logging(level: &str, pretty_print: bool) -> anyhow::Result<()> {
    // Bridge `log` crate → tracing (for all log::info!() etc. calls)
    tracing_log::LogTracer::init().ok(); // ok() in case already initialized

    let filter = build_env_filter(level)?;

    let registry = tracing_subscriber::registry().with(filter);
    if pretty_print {
        registry
            .with(tracing_subscriber::fmt::layer().pretty().with_target(true))
            .try_init()
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().compact().with_target(true))
            .try_init()
    }
    .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_level_directives() {
        assert!(build_env_filter("not a directive").is_err());
        assert!(build_env_filter("debug").is_ok());
    }
}
