//! Inventory builder

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::config::InventoryConfig;
use crate::document::{Group, GroupVars, HostVars, InventoryDocument, META_KEY};

/// Builds an [`InventoryDocument`] one host at a time
///
/// Groups are created lazily on first reference and never removed. Adding
/// the same hostname twice appends it twice; callers that need unique
/// entries must not repeat hosts.
#[derive(Debug, Clone)]
pub struct InventoryBuilder {
    config: InventoryConfig,
    document: InventoryDocument,
}

impl InventoryBuilder {
    /// Create a builder holding only the base group
    #[must_use]
    pub fn new(config: &InventoryConfig) -> Self {
        let mut document = InventoryDocument::default();
        document.groups_mut().insert(
            config.base_group().to_string(),
            Group::new(GroupVars::Environment {
                environment_tag: config.tag_key().to_string(),
                environment_value: config.tag_value().to_string(),
            }),
        );

        Self {
            config: config.clone(),
            document,
        }
    }

    /// Name of the group derived from a metadata pair
    #[must_use]
    pub fn group_name(key: &str, value: &str) -> String {
        format!("{key}_{value}")
    }

    /// Add a host to the base group and to one group per non-tag metadata pair
    pub fn add_host(&mut self, hostname: &str, metadata: &BTreeMap<String, String>) {
        let tag_key = self.config.tag_key();
        let base_group = self.config.base_group();
        let groups = self.document.groups_mut();

        if let Some(base) = groups.get_mut(base_group) {
            base.hosts.push(hostname.to_string());
        }

        for (key, value) in metadata {
            if key == tag_key {
                continue;
            }

            let name = Self::group_name(key, value);
            if name == META_KEY {
                warn!(
                    host = %hostname,
                    key = %key,
                    "metadata group name collides with reserved key, skipping"
                );
                continue;
            }
            if name == base_group {
                warn!(
                    host = %hostname,
                    group = %name,
                    "metadata group name collides with base group, skipping"
                );
                continue;
            }

            groups
                .entry(name)
                .or_insert_with_key(|name| {
                    debug!(group = %name, "creating metadata group");
                    Group::new(GroupVars::Metadata {
                        group_tag: key.clone(),
                        group_value: value.clone(),
                    })
                })
                .hosts
                .push(hostname.to_string());
        }
    }

    /// Replace the variables recorded for a host
    pub fn set_host_vars(&mut self, hostname: &str, vars: HostVars) {
        self.document
            .hostvars_mut()
            .insert(hostname.to_string(), vars);
    }

    /// Finish building
    #[must_use]
    pub fn finish(self) -> InventoryDocument {
        self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> InventoryBuilder {
        InventoryBuilder::new(&InventoryConfig::new("env", "prod", "openstack").unwrap())
    }

    fn metadata(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_new_has_base_group_and_empty_meta() {
        let doc = builder().finish();

        let base = doc.group("openstack").unwrap();
        assert!(base.hosts.is_empty());
        assert_eq!(
            base.vars,
            GroupVars::Environment {
                environment_tag: "env".to_string(),
                environment_value: "prod".to_string(),
            }
        );
        assert_eq!(doc.groups().len(), 1);
        assert!(doc.hostvars().is_empty());
    }

    #[test]
    fn test_add_host_creates_metadata_groups() {
        let mut builder = builder();
        builder.add_host("web-1", &metadata(&[("env", "prod"), ("role", "web"), ("tier", "1")]));
        let doc = builder.finish();

        assert_eq!(doc.group("openstack").unwrap().hosts, vec!["web-1"]);

        let role = doc.group("role_web").unwrap();
        assert_eq!(role.hosts, vec!["web-1"]);
        assert_eq!(
            role.vars,
            GroupVars::Metadata {
                group_tag: "role".to_string(),
                group_value: "web".to_string(),
            }
        );
        assert!(doc.group("tier_1").unwrap().contains("web-1"));
        assert!(doc.group("env_prod").is_none());
    }

    #[test]
    fn test_hosts_share_existing_group() {
        let mut builder = builder();
        builder.add_host("web-1", &metadata(&[("role", "web")]));
        builder.add_host("web-2", &metadata(&[("role", "web")]));
        let doc = builder.finish();

        assert_eq!(doc.group("role_web").unwrap().hosts, vec!["web-1", "web-2"]);
        assert_eq!(doc.groups().len(), 2);
    }

    #[test]
    fn test_add_host_twice_duplicates_entries() {
        let mut builder = builder();
        let meta = metadata(&[("role", "web")]);
        builder.add_host("web-1", &meta);
        builder.add_host("web-1", &meta);
        let doc = builder.finish();

        assert_eq!(doc.group("openstack").unwrap().count("web-1"), 2);
        assert_eq!(doc.group("role_web").unwrap().count("web-1"), 2);
    }

    #[test]
    fn test_reserved_group_name_skipped() {
        let mut builder = builder();
        builder.add_host("odd", &metadata(&[("", "meta")]));
        let doc = builder.finish();

        assert!(doc.group(META_KEY).is_none());
        assert_eq!(doc.group("openstack").unwrap().hosts, vec!["odd"]);
    }

    #[test]
    fn test_group_named_like_base_group_skipped() {
        let config = InventoryConfig::new("env", "prod", "role_web").unwrap();
        let mut builder = InventoryBuilder::new(&config);
        builder.add_host("web-1", &metadata(&[("env", "prod"), ("role", "web"), ("tier", "1")]));
        let doc = builder.finish();

        let base = doc.group("role_web").unwrap();
        assert_eq!(base.count("web-1"), 1);
        assert_eq!(
            base.vars,
            GroupVars::Environment {
                environment_tag: "env".to_string(),
                environment_value: "prod".to_string(),
            }
        );
        assert!(doc.group("tier_1").unwrap().contains("web-1"));
        assert_eq!(doc.groups().len(), 2);
    }

    #[test]
    fn test_set_host_vars_overwrites() {
        let mut builder = builder();
        builder.set_host_vars(
            "web-1",
            HostVars::new("10.0.0.5", "id-1", "web-1").with_status("BUILD"),
        );
        builder.set_host_vars("web-1", HostVars::new("10.0.0.6", "id-1", "web-1"));
        let doc = builder.finish();

        assert_eq!(doc.hostvars().len(), 1);
        let vars = doc.host_vars("web-1").unwrap();
        assert_eq!(vars.ansible_host, "10.0.0.6");
        assert!(vars.openstack_status.is_none());
    }
}
