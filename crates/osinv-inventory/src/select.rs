//! Instance inclusion and address selection
//!
//! Addresses are keyed by network name in a `BTreeMap`, so "first" always
//! means the lexicographically smallest network name, then the order the
//! compute API listed the addresses in.

use crate::config::InventoryConfig;
use crate::error::InventoryError;
use crate::types::Instance;

/// Check if an instance carries the configured tag pair
#[must_use]
pub fn is_included(instance: &Instance, config: &InventoryConfig) -> bool {
    instance
        .metadata
        .get(config.tag_key())
        .is_some_and(|value| value == config.tag_value())
}

/// Pick the address Ansible should connect to
///
/// # Errors
/// Returns `NoAddress` if the instance has no IPv4 address on any network.
pub fn preferred_ipv4(instance: &Instance) -> Result<&str, InventoryError> {
    ipv4_addresses(instance)
        .map(|(_, addr)| addr)
        .next()
        .ok_or_else(|| InventoryError::NoAddress(instance.name.clone()))
}

/// Every IPv4 address of an instance with its network name
pub fn ipv4_addresses(instance: &Instance) -> impl Iterator<Item = (&str, &str)> {
    instance.addresses.iter().flat_map(|(network, addrs)| {
        addrs
            .iter()
            .filter(|a| a.is_ipv4())
            .map(move |a| (network.as_str(), a.addr.as_str()))
    })
}
