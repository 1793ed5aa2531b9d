//! OpenStack client implementing the inventory instance source

use async_trait::async_trait;
use osinv_inventory::{Instance, InstanceSource, InventoryError};
use reqwest::Client;
use tracing::info;

use crate::compute::list_servers;
use crate::config::CloudConfig;
use crate::error::{ClientError, Result};
use crate::identity::authenticate;

/// Client for listing OpenStack compute instances
///
/// Authenticates lazily: constructing the client never touches the network.
#[derive(Debug, Clone)]
pub struct OpenStackClient {
    client: Client,
    config: CloudConfig,
}

impl OpenStackClient {
    /// Create a new client
    ///
    /// # Errors
    /// Returns `Config` if the settings are incomplete, or `Http` if the
    /// HTTP client cannot be built.
    ///
    /// # Example
    /// ```no_run
    /// use osinv_client::{CloudConfig, OpenStackClient};
    ///
    /// let config = CloudConfig {
    ///     auth_url: Some("https://keystone.example.com:5000".into()),
    ///     username: Some("demo".into()),
    ///     password: Some("secret".into()),
    ///     project_name: Some("ops".into()),
    ///     ..Default::default()
    /// };
    /// let client = OpenStackClient::new(config)?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(config: CloudConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder().timeout(config.timeout()).build()?;
        Self::with_client(config, client)
    }

    /// Create a new client with a custom `reqwest::Client`
    ///
    /// # Errors
    /// Returns `Config` if the settings are incomplete.
    pub fn with_client(config: CloudConfig, client: Client) -> Result<Self> {
        config.validate()?;
        Ok(Self { client, config })
    }

    /// Authenticate and list every server
    ///
    /// # Errors
    /// Returns an error if authentication or any listing request fails.
    pub async fn servers(&self) -> Result<Vec<Instance>> {
        let session = authenticate(&self.client, &self.config).await?;
        let servers = list_servers(&self.client, &session).await?;
        info!(count = servers.len(), "retrieved servers");
        Ok(servers)
    }
}

#[async_trait]
impl InstanceSource for OpenStackClient {
    async fn list_instances(&self) -> std::result::Result<Vec<Instance>, InventoryError> {
        self.servers().await.map_err(ClientError::into)
    }
}
