//! Compute (Nova) server listing

use std::collections::HashSet;

use osinv_inventory::Instance;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use crate::error::{ClientError, Result};
use crate::identity::Session;

/// Header carrying the token on service requests
const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// One page of `servers/detail`
#[derive(Debug, Deserialize)]
pub struct ServerPage {
    /// Servers on this page
    pub servers: Vec<Instance>,
    /// Pagination links
    #[serde(default)]
    pub servers_links: Vec<Link>,
}

/// Pagination link
#[derive(Debug, Deserialize)]
pub struct Link {
    /// Relation (`next`)
    pub rel: String,
    /// Target URL
    pub href: String,
}

impl ServerPage {
    /// URL of the following page, if any
    #[must_use]
    pub fn next_link(&self) -> Option<&str> {
        self.servers_links
            .iter()
            .find(|link| link.rel == "next")
            .map(|link| link.href.as_str())
    }
}

/// Build the `servers/detail` URL under a compute endpoint
///
/// # Errors
/// Returns `Url` if the joined URL is invalid.
pub fn servers_url(compute_url: &Url) -> Result<Url> {
    let mut base = compute_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join("servers/detail")?)
}

/// Fetch a single page
async fn fetch_page(client: &Client, session: &Session, url: Url) -> Result<ServerPage> {
    let response = client
        .get(url)
        .header(AUTH_TOKEN_HEADER, &session.token)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        return Err(ClientError::Api { status, message });
    }

    Ok(response.json().await?)
}

/// List every server, following `next` links until the last page
///
/// # Errors
/// Returns an error if any page request fails, a page does not decode, or
/// the API hands back a link it already served.
#[instrument(skip(client, session))]
pub async fn list_servers(client: &Client, session: &Session) -> Result<Vec<Instance>> {
    let mut url = servers_url(&session.compute_url)?;
    let mut seen = HashSet::new();
    let mut servers = Vec::new();

    loop {
        seen.insert(url.to_string());
        debug!(url = %url, "fetching server page");

        let page = fetch_page(client, session, url).await?;
        debug!(count = page.servers.len(), "server page received");

        let next = page.next_link().map(Url::parse).transpose()?;
        servers.extend(page.servers);

        match next {
            Some(next) if seen.contains(next.as_str()) => {
                return Err(ClientError::InvalidResponse(format!(
                    "pagination loops back to {next}"
                )));
            }
            Some(next) => url = next,
            None => break,
        }
    }

    Ok(servers)
}
