//! Cloudflare v4 API client
//!
//! Zone lookup, Worker route management and Worker script upload.

use crate::error::{CloudflareError, Result};
use async_trait::async_trait;
use cfmp_cloud::{RemoteStateClient, Route};
use cfmp_worker::{MODULE_CONTENT_TYPE, ScriptBundle};
use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest response body echoed back in an error
const MAX_ERROR_BODY: usize = 512;

/// Cloudflare API client
pub struct CloudflareApi {
    client: reqwest::Client,
    api_token: SecretString,
    base_url: String,
}

impl CloudflareApi {
    /// Create a client against the public Cloudflare API
    pub fn new(api_token: SecretString) -> Result<Self> {
        Self::with_base_url(api_token, CLOUDFLARE_API_BASE)
    }

    /// Create a client against another API base (tests, proxies)
    pub fn with_base_url(api_token: SecretString, base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("cfmp/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            api_token,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the domain name of a zone
    pub async fn get_zone_name(&self, zone_id: &str) -> Result<String> {
        let url = format!("{}/zones/{}", self.base_url, zone_id);

        let response = self
            .client
            .get(&url)
            .bearer_auth(self.api_token.expose_secret())
            .send()
            .await?;

        let (zone, _): (ApiZone, _) = decode(response, &format!("zone {}", zone_id)).await?;
        Ok(zone.name)
    }

    /// List all Worker routes in a zone, following pagination
    pub async fn list_worker_routes(&self, zone_id: &str) -> Result<Vec<Route>> {
        let url = format!("{}/zones/{}/workers/routes", self.base_url, zone_id);
        let mut routes = Vec::new();
        let mut page = 1u32;

        loop {
            let mut request = self
                .client
                .get(&url)
                .bearer_auth(self.api_token.expose_secret());
            if page > 1 {
                request = request.query(&[("page", page)]);
            }

            let response = request.send().await?;
            let (batch, info): (Vec<ApiRoute>, _) =
                decode(response, &format!("routes of zone {}", zone_id)).await?;
            routes.extend(batch.into_iter().map(ApiRoute::into_route));

            let total_pages = info.and_then(|i| i.total_pages).unwrap_or(1);
            if page >= total_pages {
                break;
            }
            page += 1;
        }

        tracing::debug!(zone_id = %zone_id, count = routes.len(), "Listed worker routes");
        Ok(routes)
    }

    /// Create a Worker route
    pub async fn create_worker_route(
        &self,
        zone_id: &str,
        pattern: &str,
        script: &str,
    ) -> Result<Route> {
        let url = format!("{}/zones/{}/workers/routes", self.base_url, zone_id);

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.api_token.expose_secret())
            .json(&RouteRequest { pattern, script })
            .send()
            .await?;

        let (created, _): (ApiRoute, _) =
            decode(response, &format!("zone {}", zone_id)).await?;

        tracing::info!(route_id = %created.id, pattern = %pattern, "Created worker route");
        Ok(created.into_route_with(pattern, script))
    }

    /// Update the pattern and script of an existing Worker route
    pub async fn update_worker_route(
        &self,
        zone_id: &str,
        route_id: &str,
        pattern: &str,
        script: &str,
    ) -> Result<Route> {
        let url = format!(
            "{}/zones/{}/workers/routes/{}",
            self.base_url, zone_id, route_id
        );

        let response = self
            .client
            .put(&url)
            .bearer_auth(self.api_token.expose_secret())
            .json(&RouteRequest { pattern, script })
            .send()
            .await?;

        let (updated, _): (ApiRoute, _) =
            decode(response, &format!("route {}", route_id)).await?;

        tracing::info!(route_id = %route_id, pattern = %pattern, "Updated worker route");
        Ok(updated.into_route_with(pattern, script))
    }

    /// Upload (create or overwrite) a module Worker
    pub async fn put_worker_script(
        &self,
        account_id: &str,
        script: &str,
        bundle: &ScriptBundle,
    ) -> Result<()> {
        let url = format!(
            "{}/accounts/{}/workers/scripts/{}",
            self.base_url, account_id, script
        );

        let response = self
            .client
            .put(&url)
            .bearer_auth(self.api_token.expose_secret())
            .multipart(build_upload_form(bundle)?)
            .send()
            .await?;

        let _: (serde_json::Value, _) = decode(response, &format!("script {}", script)).await?;

        tracing::info!(script = %script, "Uploaded worker script");
        Ok(())
    }
}

#[async_trait]
impl RemoteStateClient for CloudflareApi {
    async fn zone_domain(&self, zone_id: &str) -> cfmp_cloud::Result<String> {
        Ok(self.get_zone_name(zone_id).await?)
    }

    async fn list_routes(&self, zone_id: &str) -> cfmp_cloud::Result<Vec<Route>> {
        Ok(self.list_worker_routes(zone_id).await?)
    }

    async fn create_route(
        &self,
        zone_id: &str,
        pattern: &str,
        script: &str,
    ) -> cfmp_cloud::Result<Route> {
        Ok(self.create_worker_route(zone_id, pattern, script).await?)
    }

    async fn update_route(
        &self,
        zone_id: &str,
        route_id: &str,
        pattern: &str,
        script: &str,
    ) -> cfmp_cloud::Result<Route> {
        Ok(self
            .update_worker_route(zone_id, route_id, pattern, script)
            .await?)
    }

    async fn upload_script(
        &self,
        account_id: &str,
        script: &str,
        bundle: &ScriptBundle,
    ) -> cfmp_cloud::Result<()> {
        Ok(self.put_worker_script(account_id, script, bundle).await?)
    }
}

/// Multipart form for the script upload endpoint
fn build_upload_form(bundle: &ScriptBundle) -> Result<Form> {
    let metadata = Part::text(bundle.metadata_json()?)
        .file_name("metadata.json")
        .mime_str("application/json")?;

    let mut form = Form::new().part("metadata", metadata);
    for (name, content) in &bundle.files {
        let part = Part::bytes(content.clone())
            .file_name(name.clone())
            .mime_str(MODULE_CONTENT_TYPE)?;
        form = form.part(name.clone(), part);
    }
    Ok(form)
}

/// Decode a Cloudflare response envelope
///
/// `what` names the resource for not-found errors.
async fn decode<T: DeserializeOwned>(
    response: reqwest::Response,
    what: &str,
) -> Result<(T, Option<ResultInfo>)> {
    let status = response.status();
    let body = response.text().await?;

    let envelope: ApiResponse<T> = match serde_json::from_str(&body) {
        Ok(envelope) => envelope,
        Err(_) => {
            return Err(CloudflareError::UnexpectedResponse {
                status: status.as_u16(),
                body: truncate(&body),
            });
        }
    };

    if !envelope.success || !status.is_success() {
        let message = envelope.error_message();
        return Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                CloudflareError::AuthenticationFailed {
                    status: status.as_u16(),
                    message,
                }
            }
            StatusCode::NOT_FOUND => CloudflareError::NotFound(format!("{}: {}", what, message)),
            _ => CloudflareError::ApiError {
                status: status.as_u16(),
                message,
            },
        });
    }

    match envelope.result {
        Some(result) => Ok((result, envelope.result_info)),
        None => Err(CloudflareError::UnexpectedResponse {
            status: status.as_u16(),
            body: truncate(&body),
        }),
    }
}

fn truncate(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

// ============ API Types ============

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    success: bool,
    result: Option<T>,
    #[serde(default)]
    errors: Vec<ApiError>,
    #[serde(default)]
    result_info: Option<ResultInfo>,
}

impl<T> ApiResponse<T> {
    fn error_message(&self) -> String {
        if self.errors.is_empty() {
            return "Unknown error".to_string();
        }
        self.errors
            .iter()
            .map(|e| format!("[{}] {}", e.code, e.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: i64,
    message: String,
}

#[derive(Debug, Clone, Deserialize)]
struct ResultInfo {
    #[serde(default)]
    total_pages: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ApiZone {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiRoute {
    id: String,
    #[serde(default)]
    pattern: Option<String>,
    #[serde(default)]
    script: Option<String>,
}

impl ApiRoute {
    fn into_route(self) -> Route {
        Route {
            id: self.id,
            pattern: self.pattern.unwrap_or_default(),
            script: self.script,
        }
    }

    /// Some endpoints only echo the id back
    fn into_route_with(self, pattern: &str, script: &str) -> Route {
        Route {
            id: self.id,
            pattern: self.pattern.unwrap_or_else(|| pattern.to_string()),
            script: self.script.or_else(|| Some(script.to_string())),
        }
    }
}

#[derive(Debug, Serialize)]
struct RouteRequest<'a> {
    pattern: &'a str,
    script: &'a str,
}
