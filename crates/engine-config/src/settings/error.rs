use thiserror::Error;

/// Errors raised when loading or validating reconciler settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// A setting has a value the reconciler cannot work with.
    #[error("Invalid setting '{setting}': {message}")]
    Invalid { setting: String, message: String },

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}
