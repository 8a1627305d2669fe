use tracing_subscriber::EnvFilter;

use crate::foundation::error::{GifkeyError, GifkeyResult};

/// Output format of the stderr log stream.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Standard single-line output.
    #[default]
    Default,
    /// Abbreviated single-line output.
    Compact,
    /// Multi-line, human-friendly output.
    Pretty,
}

/// Map a `-v` repeat count onto a filter directive.
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Filter from `RUST_LOG` when it is set and valid, otherwise from `level`.
pub fn build_filter(level: &str) -> GifkeyResult<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| GifkeyError::validation(format!("invalid log filter: {e}")))
}

/// Install the global `tracing` subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over `level` when it is set.
pub fn init(level: &str, format: LogFormat) -> GifkeyResult<()> {
    let filter = build_filter(level)?;

    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter);

    let res = match format {
        LogFormat::Default => builder.try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
    };
    res.map_err(|e| GifkeyError::Other(anyhow::anyhow!("failed to init logger: {e}")))
}

#[cfg(test)]
#[path = "../tests/unit/logging.rs"]
mod tests;
