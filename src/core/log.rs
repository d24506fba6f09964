//! Global tracing subscriber setup.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Installs the global subscriber.
///
/// When `RUST_LOG` is set it replaces the command's level entirely. Otherwise
/// only `findash` and `tower_http` events at `level_filter` are emitted.
pub fn init_logging(level_filter: LevelFilter) {
    let env_filter = EnvFilter::try_from_default_env().ok();
    let app_filter = env_filter.is_none().then(|| app_targets(level_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().compact())
        .with(env_filter)
        .with(app_filter)
        .init();
}

fn app_targets(level_filter: LevelFilter) -> Targets {
    Targets::new()
        .with_target("findash", level_filter)
        .with_target("tower_http", level_filter)
}
