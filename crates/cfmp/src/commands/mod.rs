pub mod config;
pub mod deploy;
pub mod disable;
pub mod enable;
pub mod preview;
pub mod status;

use anyhow::Context;
use cfmp_cloud::{ReconciliationEngine, ZoneTarget};
use cfmp_cloud_cloudflare::CloudflareApi;
use cfmp_config::ConfigResolver;

/// Environment variable pointing the client at another API base
pub const API_BASE_ENV: &str = "CFMP_API_BASE";

/// Resolve credentials and connect to the configured zone
pub async fn connect(
    resolver: &ConfigResolver,
) -> anyhow::Result<ReconciliationEngine<CloudflareApi>> {
    let credentials = resolver
        .resolve_credentials()
        .context("Failed to resolve Cloudflare credentials")?;

    let api = match std::env::var(API_BASE_ENV) {
        Ok(base) if !base.is_empty() => {
            CloudflareApi::with_base_url(credentials.api_token.clone(), base)?
        }
        _ => CloudflareApi::new(credentials.api_token.clone())?,
    };

    let target = ZoneTarget {
        account_id: credentials.account_id,
        zone_id: credentials.zone_id,
        script_name: credentials.script_name,
    };

    let engine = ReconciliationEngine::connect(api, target).await?;
    tracing::debug!(
        domain = %engine.domain(),
        script = %engine.script_name(),
        "Connected to zone"
    );
    Ok(engine)
}
