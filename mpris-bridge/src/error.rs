//! Error types for the MPRIS bridge

use thiserror::Error;

/// Result type for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Failure reported by a `SessionBus` implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct BusError(pub String);

impl BusError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error("Failed to register {service} on the session bus: {source}")]
    ServiceRegistration {
        service: String,
        #[source]
        source: BusError,
    },

    #[error("Failed to register object {path}: {source}")]
    ObjectRegistration {
        path: String,
        #[source]
        source: BusError,
    },

    #[error("Invalid configuration: {0}")]
    Configuration(String),
}
