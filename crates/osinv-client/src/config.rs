//! Cloud connection settings

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

/// Settings needed to authenticate against OpenStack
///
/// Mirrors the usual `OS_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudConfig {
    /// Identity endpoint (`OS_AUTH_URL`)
    #[serde(default)]
    pub auth_url: Option<String>,
    /// User name (`OS_USERNAME`)
    #[serde(default)]
    pub username: Option<String>,
    /// User ID (`OS_USER_ID`)
    #[serde(default)]
    pub user_id: Option<String>,
    /// Password (`OS_PASSWORD`)
    #[serde(default)]
    pub password: Option<String>,
    /// Project name (`OS_PROJECT_NAME`)
    #[serde(default)]
    pub project_name: Option<String>,
    /// Project ID (`OS_PROJECT_ID`)
    #[serde(default)]
    pub project_id: Option<String>,
    /// Domain of the user (`OS_USER_DOMAIN_NAME`)
    #[serde(default = "default_domain")]
    pub user_domain_name: String,
    /// Domain of the project (`OS_PROJECT_DOMAIN_NAME`)
    #[serde(default = "default_domain")]
    pub project_domain_name: String,
    /// Application credential ID (`OS_APPLICATION_CREDENTIAL_ID`)
    #[serde(default)]
    pub application_credential_id: Option<String>,
    /// Application credential secret (`OS_APPLICATION_CREDENTIAL_SECRET`)
    #[serde(default)]
    pub application_credential_secret: Option<String>,
    /// Region to pick endpoints from (`OS_REGION_NAME`)
    #[serde(default)]
    pub region_name: Option<String>,
    /// Endpoint interface (`OS_INTERFACE`)
    #[serde(default = "default_interface")]
    pub interface: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            auth_url: None,
            username: None,
            user_id: None,
            password: None,
            project_name: None,
            project_id: None,
            user_domain_name: default_domain(),
            project_domain_name: default_domain(),
            application_credential_id: None,
            application_credential_secret: None,
            region_name: None,
            interface: default_interface(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_domain() -> String {
    "Default".to_string()
}

fn default_interface() -> String {
    "public".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

/// How the client proves its identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMethod {
    /// User + password, scoped to a project
    Password {
        /// Reference to the user
        user: UserRef,
        /// Password
        password: String,
        /// Project scope, if any
        project: Option<ProjectRef>,
    },
    /// Application credential (already scoped)
    ApplicationCredential {
        /// Credential ID
        id: String,
        /// Credential secret
        secret: String,
    },
}

/// User reference in an auth request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRef {
    /// By ID
    Id(String),
    /// By name within a domain
    Name {
        /// User name
        name: String,
        /// Domain name
        domain: String,
    },
}

/// Project reference in an auth request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectRef {
    /// By ID
    Id(String),
    /// By name within a domain
    Name {
        /// Project name
        name: String,
        /// Domain name
        domain: String,
    },
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}

impl CloudConfig {
    /// Identity endpoint
    ///
    /// # Errors
    /// Returns `Config` if no auth URL is set.
    pub fn auth_url(&self) -> Result<&str> {
        self.auth_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| ClientError::Config("OS_AUTH_URL is not set".to_string()))
    }

    /// Request timeout
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Work out which authentication method the settings describe
    ///
    /// Application credentials win over passwords when both are present.
    ///
    /// # Errors
    /// Returns `Config` if neither credential set is complete.
    pub fn auth_method(&self) -> Result<AuthMethod> {
        if let (Some(id), Some(secret)) = (
            non_empty(self.application_credential_id.as_ref()),
            non_empty(self.application_credential_secret.as_ref()),
        ) {
            return Ok(AuthMethod::ApplicationCredential { id, secret });
        }

        let password = non_empty(self.password.as_ref()).ok_or_else(|| {
            ClientError::Config(
                "set OS_PASSWORD or OS_APPLICATION_CREDENTIAL_ID/OS_APPLICATION_CREDENTIAL_SECRET"
                    .to_string(),
            )
        })?;

        let user = match (
            non_empty(self.user_id.as_ref()),
            non_empty(self.username.as_ref()),
        ) {
            (Some(id), _) => UserRef::Id(id),
            (None, Some(name)) => UserRef::Name {
                name,
                domain: self.user_domain_name.clone(),
            },
            (None, None) => {
                return Err(ClientError::Config(
                    "OS_USERNAME or OS_USER_ID is not set".to_string(),
                ));
            }
        };

        let project = match (
            non_empty(self.project_id.as_ref()),
            non_empty(self.project_name.as_ref()),
        ) {
            (Some(id), _) => Some(ProjectRef::Id(id)),
            (None, Some(name)) => Some(ProjectRef::Name {
                name,
                domain: self.project_domain_name.clone(),
            }),
            (None, None) => None,
        };

        Ok(AuthMethod::Password {
            user,
            password,
            project,
        })
    }

    /// Check that the settings are usable without contacting the cloud
    ///
    /// # Errors
    /// Returns `Config` describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        self.auth_url()?;
        self.auth_method()?;
        Ok(())
    }
}
