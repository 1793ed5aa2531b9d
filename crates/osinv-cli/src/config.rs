//! Configuration loading and types
//!
//! Precedence, lowest first: built-in defaults, TOML file, environment.

use std::path::{Path, PathBuf};

use eyre::WrapErr;
use osinv_client::CloudConfig;
use osinv_inventory::InventorySettings;
use serde::{Deserialize, Serialize};

/// Environment variable pointing at a config file
pub const CONFIG_ENV: &str = "OSINV_CONFIG";

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Inventory grouping settings
    #[serde(default)]
    pub inventory: InventorySettings,
    /// Cloud connection settings
    #[serde(default)]
    pub cloud: CloudConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            inventory: InventorySettings::default(),
            cloud: CloudConfig::default(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &Path) -> eyre::Result<Self> {
        let content = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .wrap_err_with(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Load from an explicit path, the default paths, or use defaults
    ///
    /// # Errors
    /// Returns error if a selected file cannot be read or parsed
    pub fn load_default(explicit: Option<&Path>) -> eyre::Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::load(&PathBuf::from(path));
        }

        let paths = [
            Some(PathBuf::from("osinv.toml")),
            dirs::config_dir().map(|p| p.join("osinv/osinv.toml")),
        ];

        for path in paths.into_iter().flatten() {
            if path.exists() {
                return Self::load(&path);
            }
        }

        Ok(Config::default())
    }

    /// Overlay values from the environment
    ///
    /// `lookup` returns the value of a variable; empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |keys: &[&str]| {
            keys.iter()
                .find_map(|key| lookup(*key).filter(|v| !v.is_empty()))
        };

        let inventory = &mut self.inventory;
        overlay(&mut inventory.environment_tag, get(&["ENVIRONMENT_TAG"]));
        overlay(&mut inventory.environment_value, get(&["ENVIRONMENT_VALUE"]));
        overlay(&mut inventory.base_group_name, get(&["BASE_GROUP_NAME"]));

        let cloud = &mut self.cloud;
        overlay(&mut cloud.auth_url, get(&["OS_AUTH_URL"]));
        overlay(&mut cloud.username, get(&["OS_USERNAME"]));
        overlay(&mut cloud.user_id, get(&["OS_USER_ID"]));
        overlay(&mut cloud.password, get(&["OS_PASSWORD"]));
        overlay(&mut cloud.project_name, get(&["OS_PROJECT_NAME", "OS_TENANT_NAME"]));
        overlay(&mut cloud.project_id, get(&["OS_PROJECT_ID", "OS_TENANT_ID"]));
        overlay(
            &mut cloud.application_credential_id,
            get(&["OS_APPLICATION_CREDENTIAL_ID"]),
        );
        overlay(
            &mut cloud.application_credential_secret,
            get(&["OS_APPLICATION_CREDENTIAL_SECRET"]),
        );
        overlay(&mut cloud.region_name, get(&["OS_REGION_NAME"]));

        if let Some(domain) = get(&["OS_USER_DOMAIN_NAME"]) {
            cloud.user_domain_name = domain;
        }
        if let Some(domain) = get(&["OS_PROJECT_DOMAIN_NAME"]) {
            cloud.project_domain_name = domain;
        }
        if let Some(interface) = get(&["OS_INTERFACE"]) {
            cloud.interface = interface;
        }
    }
}

fn overlay(slot: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *slot = value;
    }
}
