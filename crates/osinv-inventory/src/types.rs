//! Compute instance type definitions

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A compute instance as reported by the compute API
///
/// Field names follow the `servers/detail` response so a server object
/// deserializes directly into this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    /// Server UUID
    pub id: String,
    /// Server name, used as the inventory hostname
    pub name: String,
    /// Server status (ACTIVE, SHUTOFF, ...)
    #[serde(default)]
    pub status: String,
    /// User metadata
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    /// Addresses keyed by network name
    #[serde(default)]
    pub addresses: BTreeMap<String, Vec<InstanceAddress>>,
}

impl Instance {
    /// Create an instance with no metadata or addresses
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: "ACTIVE".to_string(),
            metadata: BTreeMap::new(),
            addresses: BTreeMap::new(),
        }
    }

    /// Set the status
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Add a metadata entry
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Add an address on a network
    #[must_use]
    pub fn with_address(mut self, network: impl Into<String>, address: InstanceAddress) -> Self {
        self.addresses.entry(network.into()).or_default().push(address);
        self
    }
}

/// A single address attached to an instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceAddress {
    /// IP address
    pub addr: String,
    /// IP version (4 or 6)
    pub version: u8,
    /// Address type (fixed, floating)
    #[serde(
        rename = "OS-EXT-IPS:type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
}

impl InstanceAddress {
    /// Create an IPv4 address
    pub fn v4(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            version: 4,
            kind: None,
        }
    }

    /// Create an IPv6 address
    pub fn v6(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            version: 6,
            kind: None,
        }
    }

    /// Check if this is an IPv4 address
    #[must_use]
    pub fn is_ipv4(&self) -> bool {
        self.version == 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_server_object() {
        let json = r#"{
            "id": "6f2c9f4e-1111-2222-3333-444455556666",
            "name": "web-1",
            "status": "ACTIVE",
            "metadata": {"env": "prod", "role": "web"},
            "addresses": {
                "private": [
                    {"addr": "10.0.0.5", "version": 4, "OS-EXT-IPS:type": "fixed"},
                    {"addr": "fd00::5", "version": 6}
                ]
            },
            "flavor": {"id": "m1.small"}
        }"#;

        let instance: Instance = serde_json::from_str(json).unwrap();
        assert_eq!(instance.name, "web-1");
        assert_eq!(instance.metadata.get("role").map(String::as_str), Some("web"));

        let private = &instance.addresses["private"];
        assert_eq!(private.len(), 2);
        assert!(private[0].is_ipv4());
        assert_eq!(private[0].kind.as_deref(), Some("fixed"));
        assert!(!private[1].is_ipv4());
    }

    #[test]
    fn test_missing_metadata_and_addresses_default_to_empty() {
        let instance: Instance =
            serde_json::from_str(r#"{"id": "1", "name": "bare", "status": "BUILD"}"#).unwrap();
        assert!(instance.metadata.is_empty());
        assert!(instance.addresses.is_empty());
    }
}
