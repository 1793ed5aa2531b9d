//! osinv-inventory: Ansible inventory assembly
//!
//! Turns a flat list of OpenStack compute instances into an Ansible dynamic
//! inventory document: a base group, one group per metadata key/value pair,
//! and a `_meta.hostvars` section holding per-host variables.

pub mod builder;
pub mod collector;
pub mod config;
pub mod document;
pub mod error;
pub mod select;
pub mod types;

pub use builder::InventoryBuilder;
pub use collector::{HostMode, InstanceSource, InventoryCollector};
pub use config::{InventoryConfig, InventorySettings};
pub use document::{Group, GroupVars, HostVars, InventoryDocument, META_KEY};
pub use error::InventoryError;
pub use types::{Instance, InstanceAddress};
