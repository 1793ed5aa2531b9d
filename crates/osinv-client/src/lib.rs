//! osinv-client: OpenStack compute client
//!
//! Authenticates against Identity v3 and lists every compute server,
//! following pagination links. [`OpenStackClient`] implements
//! [`osinv_inventory::InstanceSource`] so it plugs straight into the
//! inventory collector.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use osinv_client::{CloudConfig, OpenStackClient};
//! use osinv_inventory::{HostMode, InventoryCollector, InventorySettings};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let cloud = CloudConfig {
//!     auth_url: Some("https://keystone.example.com:5000".into()),
//!     username: Some("demo".into()),
//!     password: Some("secret".into()),
//!     project_name: Some("ops".into()),
//!     ..Default::default()
//! };
//! let settings = InventorySettings {
//!     environment_tag: Some("env".into()),
//!     environment_value: Some("prod".into()),
//!     base_group_name: Some("openstack".into()),
//! };
//!
//! let collector = InventoryCollector::new(Arc::new(OpenStackClient::new(cloud)?));
//! let document = collector.collect(&settings, HostMode::PerInstance).await?;
//! println!("{}", document.render()?);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod compute;
pub mod config;
pub mod error;
pub mod identity;

pub use client::OpenStackClient;
pub use config::CloudConfig;
pub use error::{ClientError, Result};
