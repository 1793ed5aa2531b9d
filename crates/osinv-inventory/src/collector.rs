//! High-level inventory collection API

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use crate::builder::InventoryBuilder;
use crate::config::{InventoryConfig, InventorySettings};
use crate::document::{HostVars, InventoryDocument};
use crate::error::InventoryError;
use crate::select::{ipv4_addresses, is_included, preferred_ipv4};
use crate::types::Instance;

/// Source of compute instances
///
/// Implemented by the cloud client; tests use fixed instance lists.
#[async_trait]
pub trait InstanceSource: Send + Sync {
    /// List every instance visible to the caller
    async fn list_instances(&self) -> Result<Vec<Instance>, InventoryError>;
}

/// How instances map to inventory hosts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HostMode {
    /// One host per instance, addressed by its preferred IPv4
    #[default]
    PerInstance,
    /// One host per instance network, named `<instance>_<network>`
    PerNetwork,
}

/// Inventory collector
///
/// Runs the single build pass: list, filter, select addresses, group.
pub struct InventoryCollector {
    source: Arc<dyn InstanceSource>,
}

impl InventoryCollector {
    /// Create a new collector
    pub fn new(source: Arc<dyn InstanceSource>) -> Self {
        Self { source }
    }

    /// Validate settings, list instances and build the document
    ///
    /// # Errors
    /// Returns `ConfigError` before touching the source if settings are
    /// incomplete, or the source's error if listing fails.
    #[instrument(skip(self, settings))]
    pub async fn collect(
        &self,
        settings: &InventorySettings,
        mode: HostMode,
    ) -> Result<InventoryDocument, InventoryError> {
        let config = settings.validate()?;

        let instances = self.source.list_instances().await?;
        info!(count = instances.len(), "listed instances");

        Ok(build(&config, &instances, mode))
    }
}

/// Build a document from a fixed instance list
#[must_use]
pub fn build(
    config: &InventoryConfig,
    instances: &[Instance],
    mode: HostMode,
) -> InventoryDocument {
    let mut builder = InventoryBuilder::new(config);
    let mut included = 0usize;
    let mut skipped = 0usize;

    for instance in instances {
        if !is_included(instance, config) {
            debug!(instance = %instance.name, "instance not tagged, ignoring");
            continue;
        }

        let added = match mode {
            HostMode::PerInstance => add_instance(&mut builder, instance),
            HostMode::PerNetwork => add_instance_networks(&mut builder, instance),
        };

        if added {
            included += 1;
        } else {
            skipped += 1;
        }
    }

    info!(included, skipped, "inventory built");

    builder.finish()
}

fn add_instance(builder: &mut InventoryBuilder, instance: &Instance) -> bool {
    let address = match preferred_ipv4(instance) {
        Ok(address) => address,
        Err(e) => {
            warn!(error = %e, "no suitable IP found, skipping");
            return false;
        }
    };

    builder.add_host(&instance.name, &instance.metadata);
    builder.set_host_vars(
        &instance.name,
        HostVars::new(address, &instance.id, &instance.name)
            .with_metadata(instance.metadata.clone()),
    );

    true
}

fn add_instance_networks(builder: &mut InventoryBuilder, instance: &Instance) -> bool {
    let mut added = false;

    for (network, address) in ipv4_addresses(instance) {
        let hostname = format!("{}_{network}", instance.name);

        builder.add_host(&hostname, &instance.metadata);
        builder.set_host_vars(
            &hostname,
            HostVars::new(address, &instance.id, &instance.name)
                .with_status(&instance.status)
                .with_network(network),
        );
        added = true;
    }

    added
}
