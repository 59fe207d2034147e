pub mod commands;
pub mod engine;
pub mod eq;
pub mod error;
pub mod settings;

pub use engine::{EqEngine, SharedEqEngine};
pub use error::EqError;

/// Install `env_logger` as the `log` backend. Safe to call more than once.
pub fn init_logger() {
    let _ = env_logger::Builder::from_default_env()
        .format_timestamp_millis()
        .try_init();
}

pub fn init() -> anyhow::Result<()> {
    init_logger();
    log::debug!("bandwise-core initialised");
    Ok(())
}
