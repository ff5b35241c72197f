use tracing_subscriber::EnvFilter;

/// Environment variables consulted for the log filter, highest priority
/// first.
const LOG_ENV_VARS: [&str; 2] = ["MESHBENCH_LOG", "RUST_LOG"];

/// Installs the global tracing subscriber. `--verbose` raises the default
/// level to debug; `MESHBENCH_LOG`/`RUST_LOG` override it entirely.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = LOG_ENV_VARS
        .iter()
        .find_map(|var| std::env::var(var).ok())
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(default_level));

    let result = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    if let Err(err) = result {
        eprintln!("Failed to initialize logging: {}", err);
    }
}
