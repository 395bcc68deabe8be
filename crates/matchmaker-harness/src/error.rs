//! Error types for the scenario harness

use thiserror::Error;

/// Main error type for harness operations
#[derive(Error, Debug)]
pub enum HarnessError {
    /// Instance was not found in the configured topology
    #[error("Instance not found: {0}")]
    InstanceNotFound(String),

    /// An instance with this name is already configured
    #[error("Instance already configured: {0}")]
    DuplicateInstance(String),

    /// A scenario with this name is already registered
    #[error("Scenario already registered: {0}")]
    DuplicateScenario(String),

    /// Application artifact could not be resolved on disk
    #[error("Application artifact not found: {0}")]
    ArtifactNotFound(String),

    /// Address string failed multihash validation
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Remote call could not be dispatched
    #[error("Call dispatch error: {0}")]
    CallDispatch(String),

    /// Topology configuration is unusable
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error during serialization/deserialization
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// General I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using HarnessError
pub type HarnessResult<T> = Result<T, HarnessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HarnessError::InstanceNotFound("alice".to_string());
        assert_eq!(format!("{}", err), "Instance not found: alice");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let harness_err: HarnessError = io_err.into();
        assert!(matches!(harness_err, HarnessError::Io(_)));
    }

    #[test]
    fn test_error_from_serde() {
        let serde_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let harness_err: HarnessError = serde_err.into();
        assert!(matches!(harness_err, HarnessError::Serialization(_)));
    }
}
