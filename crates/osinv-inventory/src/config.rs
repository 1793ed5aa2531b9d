//! Inventory settings and their validation

use serde::{Deserialize, Serialize};

use crate::document::META_KEY;
use crate::error::InventoryError;

/// Raw inventory settings as loaded from a file or the environment
///
/// Any field may be missing here; [`InventorySettings::validate`] turns
/// them into an [`InventoryConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySettings {
    /// Metadata key that marks an instance for inclusion
    #[serde(default)]
    pub environment_tag: Option<String>,
    /// Value the tag key must carry
    #[serde(default)]
    pub environment_value: Option<String>,
    /// Group every included host belongs to
    #[serde(default)]
    pub base_group_name: Option<String>,
}

impl InventorySettings {
    /// Validate the settings
    ///
    /// # Errors
    /// Returns `ConfigError` naming every missing or empty setting, or if
    /// the base group name collides with the reserved `_meta` key.
    pub fn validate(&self) -> Result<InventoryConfig, InventoryError> {
        let fields = [
            ("ENVIRONMENT_TAG", &self.environment_tag),
            ("ENVIRONMENT_VALUE", &self.environment_value),
            ("BASE_GROUP_NAME", &self.base_group_name),
        ];

        let missing: Vec<&str> = fields
            .iter()
            .filter(|(_, value)| value.as_deref().is_none_or(str::is_empty))
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            return Err(InventoryError::ConfigError(format!(
                "missing required settings: {}",
                missing.join(", ")
            )));
        }

        InventoryConfig::new(
            self.environment_tag.clone().unwrap_or_default(),
            self.environment_value.clone().unwrap_or_default(),
            self.base_group_name.clone().unwrap_or_default(),
        )
    }
}

/// Validated inventory configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryConfig {
    tag_key: String,
    tag_value: String,
    base_group: String,
}

impl InventoryConfig {
    /// Create a validated configuration
    ///
    /// # Errors
    /// Returns `ConfigError` if any value is empty or the base group is `_meta`.
    pub fn new(
        tag_key: impl Into<String>,
        tag_value: impl Into<String>,
        base_group: impl Into<String>,
    ) -> Result<Self, InventoryError> {
        let config = Self {
            tag_key: tag_key.into(),
            tag_value: tag_value.into(),
            base_group: base_group.into(),
        };

        if config.tag_key.is_empty() || config.tag_value.is_empty() || config.base_group.is_empty()
        {
            return Err(InventoryError::ConfigError(
                "environment tag, environment value and base group name must not be empty"
                    .to_string(),
            ));
        }

        if config.base_group == META_KEY {
            return Err(InventoryError::ConfigError(format!(
                "base group name '{META_KEY}' is reserved"
            )));
        }

        Ok(config)
    }

    /// Metadata key that marks an instance for inclusion
    #[must_use]
    pub fn tag_key(&self) -> &str {
        &self.tag_key
    }

    /// Value the tag key must carry
    #[must_use]
    pub fn tag_value(&self) -> &str {
        &self.tag_value
    }

    /// Base group name
    #[must_use]
    pub fn base_group(&self) -> &str {
        &self.base_group
    }
}
