//! One-time `tracing` subscriber setup for hosts that load the library.

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

static INIT: OnceCell<()> = OnceCell::new();

/// Install a stderr `fmt` subscriber. `RUST_LOG` wins over `level`; with
/// neither, `info` is used. Later calls do nothing.
pub fn init(level: Option<&str>) {
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.unwrap_or("info")))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        // A host may already have installed its own subscriber.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

pub fn is_initialized() -> bool {
    INIT.get().is_some()
}
