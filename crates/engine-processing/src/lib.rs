pub mod error;
pub mod reconcile;
pub mod transform;
