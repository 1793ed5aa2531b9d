//! Error types for the OpenStack client

use osinv_inventory::InventoryError;
use thiserror::Error;

/// Errors that can occur when talking to OpenStack
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// API returned an error status
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from server
        message: String,
    },

    /// Identity service rejected or mangled the authentication
    #[error("authentication failed: {0}")]
    Auth(String),

    /// No matching endpoint in the service catalog
    #[error("no {service} endpoint found (interface {interface}, region {region})")]
    EndpointNotFound {
        /// Service type
        service: String,
        /// Endpoint interface
        interface: String,
        /// Region, or `any`
        region: String,
    },

    /// Missing or contradictory credentials
    #[error("invalid cloud configuration: {0}")]
    Config(String),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

impl From<ClientError> for InventoryError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Config(message) => InventoryError::ConfigError(message),
            ClientError::Auth(_) | ClientError::EndpointNotFound { .. } | ClientError::Url(_) => {
                InventoryError::Connection(err.to_string())
            }
            ClientError::Http(ref e) if e.is_connect() || e.is_timeout() => {
                InventoryError::Connection(err.to_string())
            }
            ClientError::Http(_)
            | ClientError::Json(_)
            | ClientError::Api { .. }
            | ClientError::InvalidResponse(_) => InventoryError::Listing(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_maps_to_connection() {
        let err: InventoryError = ClientError::Auth("bad password".to_string()).into();
        assert_eq!(
            err,
            InventoryError::Connection("authentication failed: bad password".to_string())
        );
    }

    #[test]
    fn test_api_error_maps_to_listing() {
        let err: InventoryError = ClientError::Api {
            status: 500,
            message: "oops".to_string(),
        }
        .into();
        assert!(matches!(err, InventoryError::Listing(m) if m.contains("500")));
    }

    #[test]
    fn test_config_maps_to_config() {
        let err: InventoryError = ClientError::Config("OS_AUTH_URL is not set".to_string()).into();
        assert!(err.is_config());
    }
}
