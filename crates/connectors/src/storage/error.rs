use thiserror::Error;

/// Errors raised by an object storage client.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid storage URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    /// The storage service rejected or failed the request.
    #[error("Storage service error: {0}")]
    Service(String),
}
