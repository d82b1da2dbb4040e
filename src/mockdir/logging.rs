use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Install a compact stderr subscriber.
///
/// `RUST_LOG` wins when set. Otherwise `verbosity` picks the level:
/// 0 → warn, 1 → debug, 2+ → trace. Stdout is left alone because `get`
/// writes payloads there.
pub fn init(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "mockdir=debug",
        _ => "mockdir=trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_writer(io::stderr)
        .try_init();
}
