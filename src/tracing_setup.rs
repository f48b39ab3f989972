use std::fs;

use tracing_subscriber::{
    EnvFilter, Layer, Registry, filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

use appo::paths;

/// Initializes the tracing subscriber with layered output:
/// 1. Stdout: plain or JSON depending on the `log_json` flag.
/// 2. File: full JSON debug logs under `<data dir>/logs/appo-<name>.log` when
///    a log name is provided.
///
/// Returns a WorkerGuard that must be held by main() so file logs are flushed.
pub fn init(
    verbose: bool,
    log_json: bool,
    log_name: Option<&str>,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let registry = tracing_subscriber::registry();
    let stdout_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_env_filter(verbose));

    let (file_layer, guard) = if let Some(name) = log_name {
        let log_dir = paths::data_dir().join("logs");
        if let Err(e) = fs::create_dir_all(&log_dir) {
            eprintln!("Warning: Failed to create log dir {log_dir:?}: {e}");
            (None, None)
        } else {
            let file_name = format!("appo-{name}.log");
            let file_appender = tracing_appender::rolling::never(&log_dir, &file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let layer = fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(Targets::new().with_default(tracing::Level::DEBUG));

            (Some(layer), Some(guard))
        }
    } else {
        (None, None)
    };

    let stdout_layer: Box<dyn Layer<Registry> + Send + Sync> = if log_json {
        Box::new(
            fmt::layer()
                .json()
                .with_writer(std::io::stdout)
                .with_filter(stdout_filter),
        )
    } else if verbose {
        Box::new(
            fmt::layer()
                .with_writer(std::io::stdout)
                .with_filter(stdout_filter),
        )
    } else {
        Box::new(
            fmt::layer()
                .with_writer(std::io::stdout)
                .without_time()
                .with_target(false)
                .with_level(true)
                .with_filter(stdout_filter),
        )
    };

    registry.with(stdout_layer).with(file_layer).init();

    guard
}

fn default_env_filter(verbose: bool) -> EnvFilter {
    let spec = if verbose {
        "appo=debug,info"
    } else {
        "appo=info,warn"
    };
    EnvFilter::new(spec)
}
