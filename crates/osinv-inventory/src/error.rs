//! Error types for osinv-inventory

use thiserror::Error;

/// Errors that can occur while building an inventory
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    /// Required settings are missing or invalid
    #[error("invalid configuration: {0}")]
    ConfigError(String),

    /// Authentication or connection to the cloud failed
    #[error("connection failed: {0}")]
    Connection(String),

    /// Listing instances failed
    #[error("failed to list instances: {0}")]
    Listing(String),

    /// Instance has no IPv4 address on any network
    #[error("no IPv4 address found for instance {0}")]
    NoAddress(String),

    /// Rendering the document failed
    #[error("failed to format inventory: {0}")]
    Serialization(String),
}

impl InventoryError {
    /// Check if the error happened before any network activity
    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, InventoryError::ConfigError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_config() {
        assert!(InventoryError::ConfigError("x".to_string()).is_config());
        assert!(!InventoryError::Listing("boom".to_string()).is_config());
    }

    #[test]
    fn test_display() {
        let err = InventoryError::NoAddress("web-1".to_string());
        assert_eq!(err.to_string(), "no IPv4 address found for instance web-1");
    }
}
