use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment switch that behaves like `--verbose`
pub const DEBUG_ENV_VAR: &str = "REPORTDECK_DEBUG";

/// Environment filter override consulted after `RUST_LOG`
pub const LOG_ENV_VAR: &str = "REPORTDECK_LOG";

/// Helper macro for logging elapsed time at trace level.
///
/// Usage:
/// ```rust,ignore
/// let start = Instant::now();
/// // ... some work ...
/// trace_time!(start, "scan_corpus");
/// // Or with additional fields:
/// trace_time!(start, "scan_corpus", records = records.len());
/// ```
#[macro_export]
macro_rules! trace_time {
    ($start:expr, $name:expr) => {
        tracing::trace!(elapsed = ?$start.elapsed(), $name);
    };
    ($start:expr, $name:expr $(, $field:ident = $value:expr)*) => {
        tracing::trace!(elapsed = ?$start.elapsed(), $($field = $value),*, $name);
    };
}

/// Whether `REPORTDECK_DEBUG` asks for debug output
pub fn debug_requested() -> bool {
    std::env::var(DEBUG_ENV_VAR)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Initialize structured logging based on CLI arguments
pub fn init_tracing(
    verbose: bool,
    log_level: Option<&str>,
    log_json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let level = match (verbose || debug_requested(), log_level) {
        (_, Some(level)) => return init_with_level(level, log_json),
        (true, None) => "reportdeck=debug,reportdeck_core=debug",
        (false, None) => "reportdeck=warn,reportdeck_core=warn",
    };

    init_with_level(level, log_json)
}

fn filter_directive(level: &str) -> String {
    if level.contains('=') {
        level.to_string()
    } else {
        format!("reportdeck={level},reportdeck_core={level}")
    }
}

fn init_with_level(level: &str, log_json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_from_env(LOG_ENV_VAR))
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(level)));

    let registry = tracing_subscriber::registry().with(filter);

    if log_json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    }

    Ok(())
}
