//! Identity (Keystone v3) authentication

use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info, instrument};
use url::Url;

use crate::config::{AuthMethod, CloudConfig, ProjectRef, UserRef};
use crate::error::{ClientError, Result};

/// Header carrying the issued token
const SUBJECT_TOKEN_HEADER: &str = "X-Subject-Token";

/// An authenticated session against one compute endpoint
#[derive(Debug, Clone)]
pub struct Session {
    /// Token sent as `X-Auth-Token`
    pub token: String,
    /// Compute service base URL
    pub compute_url: Url,
}

/// Token response body (only the parts we read)
#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: TokenBody,
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    #[serde(default)]
    catalog: Vec<CatalogEntry>,
}

/// Service catalog entry
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    /// Service type (`compute`, `identity`, ...)
    #[serde(rename = "type")]
    pub service_type: String,
    /// Endpoints for this service
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

/// Single endpoint in the catalog
#[derive(Debug, Clone, Deserialize)]
pub struct Endpoint {
    /// public, internal or admin
    pub interface: String,
    /// Region name
    #[serde(default)]
    pub region: Option<String>,
    /// Region ID
    #[serde(default)]
    pub region_id: Option<String>,
    /// Endpoint URL
    pub url: String,
}

/// Build the token endpoint from an auth URL
///
/// Unversioned URLs get `/v3` appended.
///
/// # Errors
/// Returns `Url` if the auth URL does not parse.
pub fn tokens_url(auth_url: &str) -> Result<Url> {
    let trimmed = auth_url.trim_end_matches('/');
    let base = if trimmed.ends_with("/v3") {
        format!("{trimmed}/")
    } else {
        format!("{trimmed}/v3/")
    };

    Ok(Url::parse(&base)?.join("auth/tokens")?)
}

/// Build the JSON body of a token request
#[must_use]
pub fn auth_request(method: &AuthMethod) -> Value {
    match method {
        AuthMethod::Password {
            user,
            password,
            project,
        } => {
            let mut user = match user {
                UserRef::Id(id) => json!({ "id": id }),
                UserRef::Name { name, domain } => {
                    json!({ "name": name, "domain": { "name": domain } })
                }
            };
            user["password"] = json!(password);

            let mut auth = json!({
                "identity": {
                    "methods": ["password"],
                    "password": { "user": user }
                }
            });

            if let Some(project) = project {
                let project = match project {
                    ProjectRef::Id(id) => json!({ "id": id }),
                    ProjectRef::Name { name, domain } => {
                        json!({ "name": name, "domain": { "name": domain } })
                    }
                };
                auth["scope"] = json!({ "project": project });
            }

            json!({ "auth": auth })
        }
        AuthMethod::ApplicationCredential { id, secret } => json!({
            "auth": {
                "identity": {
                    "methods": ["application_credential"],
                    "application_credential": { "id": id, "secret": secret }
                }
            }
        }),
    }
}

/// Pick an endpoint from the service catalog
///
/// # Errors
/// Returns `EndpointNotFound` if no endpoint matches service, interface
/// and (when given) region.
pub fn find_endpoint(
    catalog: &[CatalogEntry],
    service_type: &str,
    interface: &str,
    region: Option<&str>,
) -> Result<String> {
    catalog
        .iter()
        .filter(|entry| entry.service_type == service_type)
        .flat_map(|entry| entry.endpoints.iter())
        .find(|endpoint| {
            endpoint.interface == interface
                && region.is_none_or(|region| {
                    endpoint.region.as_deref() == Some(region)
                        || endpoint.region_id.as_deref() == Some(region)
                })
        })
        .map(|endpoint| endpoint.url.clone())
        .ok_or_else(|| ClientError::EndpointNotFound {
            service: service_type.to_string(),
            interface: interface.to_string(),
            region: region.unwrap_or("any").to_string(),
        })
}

/// Authenticate and resolve the compute endpoint
///
/// # Errors
/// Returns `Config` for unusable settings, `Auth` if the identity service
/// rejects the credentials, or `EndpointNotFound` if the catalog has no
/// compute endpoint.
#[instrument(skip(client, config))]
pub async fn authenticate(client: &Client, config: &CloudConfig) -> Result<Session> {
    let url = tokens_url(config.auth_url()?)?;
    let body = auth_request(&config.auth_method()?);

    debug!(url = %url, "requesting token");
    let response = client.post(url).json(&body).send().await?;

    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        if status.as_u16() == 401 {
            return Err(ClientError::Auth(message));
        }
        return Err(ClientError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let token = response
        .headers()
        .get(SUBJECT_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| {
            ClientError::Auth(format!("response has no {SUBJECT_TOKEN_HEADER} header"))
        })?;

    let body: TokenResponse = response.json().await?;
    let endpoint = find_endpoint(
        &body.token.catalog,
        "compute",
        &config.interface,
        config.region_name.as_deref(),
    )?;

    info!(endpoint = %endpoint, "authenticated with OpenStack");

    Ok(Session {
        token,
        compute_url: Url::parse(&endpoint)?,
    })
}
