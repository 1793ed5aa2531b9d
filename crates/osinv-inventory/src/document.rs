//! Ansible inventory document model
//!
//! The rendered layout is the one Ansible expects from a dynamic inventory
//! script called with `--list`:
//!
//! ```json
//! {
//!   "openstack": { "hosts": ["web-1"], "vars": { "environment_tag": "env", "environment_value": "prod" } },
//!   "role_web": { "hosts": ["web-1"], "vars": { "group_tag": "role", "group_value": "web" } },
//!   "_meta": { "hostvars": { "web-1": { "ansible_host": "10.0.0.5", ... } } }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::InventoryError;

/// Reserved top-level key holding per-host variables
pub const META_KEY: &str = "_meta";

/// Complete inventory document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryDocument {
    /// Groups keyed by name
    #[serde(flatten)]
    groups: BTreeMap<String, Group>,
    /// Reserved metadata section
    #[serde(rename = "_meta")]
    meta: Meta,
}

/// Reserved metadata section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// Variables keyed by hostname
    #[serde(default)]
    pub hostvars: BTreeMap<String, HostVars>,
}

impl InventoryDocument {
    /// Get a group by name
    #[must_use]
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }

    /// All groups, ordered by name
    #[must_use]
    pub fn groups(&self) -> &BTreeMap<String, Group> {
        &self.groups
    }

    /// Variables recorded for a host
    #[must_use]
    pub fn host_vars(&self, hostname: &str) -> Option<&HostVars> {
        self.meta.hostvars.get(hostname)
    }

    /// All host variables, ordered by hostname
    #[must_use]
    pub fn hostvars(&self) -> &BTreeMap<String, HostVars> {
        &self.meta.hostvars
    }

    /// Render as 2-space indented JSON
    ///
    /// # Errors
    /// Returns `Serialization` if the serializer fails, which indicates a bug.
    pub fn render(&self) -> Result<String, InventoryError> {
        serde_json::to_string_pretty(self).map_err(|e| InventoryError::Serialization(e.to_string()))
    }

    pub(crate) fn groups_mut(&mut self) -> &mut BTreeMap<String, Group> {
        &mut self.groups
    }

    pub(crate) fn hostvars_mut(&mut self) -> &mut BTreeMap<String, HostVars> {
        &mut self.meta.hostvars
    }
}

/// A named group of hosts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Hostnames in insertion order
    pub hosts: Vec<String>,
    /// Group variables, fixed at creation
    pub vars: GroupVars,
}

impl Group {
    /// Create an empty group
    #[must_use]
    pub fn new(vars: GroupVars) -> Self {
        Self {
            hosts: Vec::new(),
            vars,
        }
    }

    /// Number of times a host was added to this group
    #[must_use]
    pub fn count(&self, hostname: &str) -> usize {
        self.hosts.iter().filter(|h| *h == hostname).count()
    }

    /// Check if the group contains a host
    #[must_use]
    pub fn contains(&self, hostname: &str) -> bool {
        self.hosts.iter().any(|h| h == hostname)
    }
}

/// Group variables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupVars {
    /// Base group: the tag pair used for inclusion
    Environment {
        /// Tag key
        environment_tag: String,
        /// Tag value
        environment_value: String,
    },
    /// Group derived from a metadata key/value pair
    Metadata {
        /// Metadata key
        group_tag: String,
        /// Metadata value
        group_value: String,
    },
}

/// Variables for a single host under `_meta.hostvars`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostVars {
    /// Address Ansible connects to
    pub ansible_host: String,
    /// Server UUID
    pub openstack_id: String,
    /// Server name
    pub openstack_name: String,
    /// Raw server metadata
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openstack_metadata: Option<BTreeMap<String, String>>,
    /// Server status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openstack_status: Option<String>,
    /// Network the address belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_name: Option<String>,
}

impl HostVars {
    /// Create a record with the mandatory fields
    pub fn new(
        ansible_host: impl Into<String>,
        openstack_id: impl Into<String>,
        openstack_name: impl Into<String>,
    ) -> Self {
        Self {
            ansible_host: ansible_host.into(),
            openstack_id: openstack_id.into(),
            openstack_name: openstack_name.into(),
            openstack_metadata: None,
            openstack_status: None,
            network_name: None,
        }
    }

    /// Attach raw metadata
    #[must_use]
    pub fn with_metadata(mut self, metadata: BTreeMap<String, String>) -> Self {
        self.openstack_metadata = Some(metadata);
        self
    }

    /// Attach server status
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.openstack_status = Some(status.into());
        self
    }

    /// Attach network name
    #[must_use]
    pub fn with_network(mut self, network: impl Into<String>) -> Self {
        self.network_name = Some(network.into());
        self
    }
}
