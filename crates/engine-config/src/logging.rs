use crate::settings::{ReconcileSettings, error::SettingsError};
use tracing_subscriber::EnvFilter;

/// Installs the global fmt subscriber. `RUST_LOG` wins over the configured level.
pub fn init_tracing(settings: &ReconcileSettings) -> Result<(), SettingsError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .map_err(|err| SettingsError::Logging(err.to_string()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| SettingsError::Logging(err.to_string()))
}
