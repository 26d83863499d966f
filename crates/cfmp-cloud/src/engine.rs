//! Maintenance route reconciliation
//!
//! The engine never trusts a previous snapshot: routes are listed again
//! before every mutation, and each operation performs at most one write.
//!
//! | operation | current routes              | action                        |
//! |-----------|-----------------------------|-------------------------------|
//! | deploy    | none                        | create route on `disabled`    |
//! | deploy    | any                         | leave routes untouched        |
//! | enable    | `enabled` present           | no-op, `false`                |
//! | enable    | `disabled` present          | swap to `enabled`, `true`     |
//! | disable   | `disabled` present          | no-op, `false`                |
//! | disable   | `enabled` present           | swap to `disabled`, `true`    |
//! | enable/disable | neither present        | `NoMatchingRoute`             |

use crate::client::{RemoteStateClient, Route};
use crate::error::ReconcileError;
use crate::patterns::{MaintenanceState, Patterns, derive_script_name};
use cfmp_worker::PageConfig;
use tracing::{debug, info};

pub type Result<T> = std::result::Result<T, ReconcileError>;

/// Account and zone the engine operates on
#[derive(Debug, Clone)]
pub struct ZoneTarget {
    pub account_id: String,
    pub zone_id: String,
    /// Explicit script name; derived from the zone when `None`
    pub script_name: Option<String>,
}

/// Result of a deploy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOutcome {
    pub script_name: String,
    /// Route seeded by this deploy, if the zone had none
    pub created_route: Option<Route>,
}

/// Drives deploy / enable / disable for one zone and one script
pub struct ReconciliationEngine<C> {
    client: C,
    target: ZoneTarget,
    domain: String,
    patterns: Patterns,
    script_name: String,
}

impl<C: RemoteStateClient> ReconciliationEngine<C> {
    /// Look up the zone's domain and derive its patterns
    pub async fn connect(client: C, target: ZoneTarget) -> Result<Self> {
        if target.account_id.is_empty() {
            return Err(ReconcileError::InvalidTarget("account id"));
        }
        if target.zone_id.is_empty() {
            return Err(ReconcileError::InvalidTarget("zone id"));
        }

        let domain = client
            .zone_domain(&target.zone_id)
            .await
            .map_err(|source| ReconcileError::ZoneLookup {
                zone_id: target.zone_id.clone(),
                source,
            })?;

        let patterns = Patterns::for_domain(&domain);
        let script_name = target
            .script_name
            .clone()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| derive_script_name(&domain, &target.zone_id));

        debug!(
            zone_id = %target.zone_id,
            domain = %domain,
            script = %script_name,
            "Connected to zone"
        );

        Ok(Self {
            client,
            target,
            domain,
            patterns,
            script_name,
        })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn patterns(&self) -> &Patterns {
        &self.patterns
    }

    pub fn script_name(&self) -> &str {
        &self.script_name
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Upload the maintenance Worker and seed the first route
    ///
    /// A route on `patterns.disabled` is created only when the zone has no
    /// routes at all; existing routes keep their pattern, so re-deploying
    /// while maintenance is on leaves it on.
    pub async fn deploy(&self, page: &PageConfig) -> Result<DeployOutcome> {
        let bundle = cfmp_worker::build_bundle(page)?;

        info!(script = %self.script_name, "Uploading worker script");
        self.client
            .upload_script(&self.target.account_id, &self.script_name, &bundle)
            .await
            .map_err(|source| ReconcileError::UploadScript {
                script: self.script_name.clone(),
                source,
            })?;

        let routes = self.list_routes().await?;
        let created_route = if routes.is_empty() {
            info!(pattern = %self.patterns.disabled, "Creating initial route");
            let route = self
                .client
                .create_route(
                    &self.target.zone_id,
                    &self.patterns.disabled,
                    &self.script_name,
                )
                .await
                .map_err(|source| ReconcileError::CreateRoute {
                    pattern: self.patterns.disabled.clone(),
                    source,
                })?;
            Some(route)
        } else {
            debug!(count = routes.len(), "Routes already exist, leaving them untouched");
            None
        };

        Ok(DeployOutcome {
            script_name: self.script_name.clone(),
            created_route,
        })
    }

    /// Point the route at all traffic; `false` if already enabled
    pub async fn enable_maintenance(&self) -> Result<bool> {
        self.transition(&self.patterns.disabled, &self.patterns.enabled)
            .await
    }

    /// Point the route back at the maintenance sub-path; `false` if already disabled
    pub async fn disable_maintenance(&self) -> Result<bool> {
        self.transition(&self.patterns.enabled, &self.patterns.disabled)
            .await
    }

    /// Read the current maintenance state without changing anything
    pub async fn status(&self) -> Result<MaintenanceState> {
        let routes = self.list_routes().await?;

        let state = if find_route(&routes, &self.patterns.enabled).is_some() {
            MaintenanceState::Enabled
        } else if find_route(&routes, &self.patterns.disabled).is_some() {
            MaintenanceState::Disabled
        } else {
            MaintenanceState::Unknown
        };
        Ok(state)
    }

    async fn transition(&self, from: &str, to: &str) -> Result<bool> {
        let routes = self.list_routes().await?;

        if find_route(&routes, to).is_some() {
            debug!(pattern = %to, "Route already in desired state");
            return Ok(false);
        }

        let route = find_route(&routes, from).ok_or_else(|| ReconcileError::NoMatchingRoute {
            expected: from.to_string(),
        })?;

        info!(route_id = %route.id, from = %from, to = %to, "Updating route pattern");
        self.client
            .update_route(&self.target.zone_id, &route.id, to, &self.script_name)
            .await
            .map_err(|source| ReconcileError::UpdateRoute {
                route_id: route.id.clone(),
                pattern: to.to_string(),
                source,
            })?;

        Ok(true)
    }

    async fn list_routes(&self) -> Result<Vec<Route>> {
        self.client
            .list_routes(&self.target.zone_id)
            .await
            .map_err(|source| ReconcileError::ListRoutes {
                zone_id: self.target.zone_id.clone(),
                source,
            })
    }
}

/// First route with exactly this pattern
fn find_route<'a>(routes: &'a [Route], pattern: &str) -> Option<&'a Route> {
    routes.iter().find(|route| route.pattern == pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{InMemoryClient, Operation};

    const ZONE: &str = "023e105f4ecef8ad9ca31a8372d0c353";
    const ACCOUNT: &str = "account-1";
    const ENABLED: &str = "*example.com/*";
    const DISABLED: &str = "*example.com/maintenance*";
    const SCRIPT: &str = "maintenance-example-com-023e105f";

    fn target() -> ZoneTarget {
        ZoneTarget {
            account_id: ACCOUNT.to_string(),
            zone_id: ZONE.to_string(),
            script_name: None,
        }
    }

    fn zone() -> InMemoryClient {
        InMemoryClient::new().with_zone(ZONE, "example.com")
    }

    async fn engine(client: InMemoryClient) -> ReconciliationEngine<InMemoryClient> {
        ReconciliationEngine::connect(client, target()).await.unwrap()
    }

    fn patterns(client: &InMemoryClient) -> Vec<String> {
        client.routes(ZONE).into_iter().map(|r| r.pattern).collect()
    }

    #[tokio::test]
    async fn test_connect_derives_patterns() {
        let engine = engine(zone()).await;

        assert_eq!(engine.domain(), "example.com");
        assert_eq!(engine.patterns().enabled, ENABLED);
        assert_eq!(engine.patterns().disabled, DISABLED);
        assert_eq!(engine.script_name(), SCRIPT);
    }

    #[tokio::test]
    async fn test_connect_uses_explicit_script_name() {
        let target = ZoneTarget {
            script_name: Some("my-maintenance".to_string()),
            ..target()
        };
        let engine = ReconciliationEngine::connect(zone(), target).await.unwrap();

        assert_eq!(engine.script_name(), "my-maintenance");
    }

    #[tokio::test]
    async fn test_connect_fails_when_zone_lookup_fails() {
        let client = zone();
        client.fail(Operation::ZoneDomain);

        let result = ReconciliationEngine::connect(client, target()).await;

        assert!(matches!(result, Err(ReconcileError::ZoneLookup { .. })));
    }

    #[tokio::test]
    async fn test_connect_rejects_empty_zone() {
        let target = ZoneTarget {
            zone_id: String::new(),
            ..target()
        };

        let result = ReconciliationEngine::connect(zone(), target).await;

        assert!(matches!(result, Err(ReconcileError::InvalidTarget("zone id"))));
    }

    #[tokio::test]
    async fn test_deploy_seeds_disabled_route() {
        let engine = engine(zone()).await;

        let outcome = engine.deploy(&PageConfig::default()).await.unwrap();

        assert_eq!(outcome.script_name, SCRIPT);
        assert_eq!(outcome.created_route.unwrap().pattern, DISABLED);
        assert_eq!(patterns(engine.client()), vec![DISABLED]);
        assert!(engine.client().script(ACCOUNT, SCRIPT).is_some());
    }

    #[tokio::test]
    async fn test_deploy_twice_keeps_one_route() {
        let engine = engine(zone()).await;

        engine.deploy(&PageConfig::default()).await.unwrap();
        let second = engine.deploy(&PageConfig::default()).await.unwrap();

        assert!(second.created_route.is_none());
        assert_eq!(engine.client().routes(ZONE).len(), 1);
        assert_eq!(engine.client().upload_count(), 2);
    }

    #[tokio::test]
    async fn test_deploy_keeps_enabled_route() {
        let engine = engine(zone().with_route(ZONE, ENABLED, SCRIPT)).await;

        let outcome = engine.deploy(&PageConfig::default()).await.unwrap();

        assert!(outcome.created_route.is_none());
        assert_eq!(patterns(engine.client()), vec![ENABLED]);
    }

    #[tokio::test]
    async fn test_deploy_upload_failure_creates_no_route() {
        let client = zone();
        client.fail(Operation::UploadScript);
        let engine = engine(client).await;

        let result = engine.deploy(&PageConfig::default()).await;

        assert!(matches!(result, Err(ReconcileError::UploadScript { .. })));
        assert!(engine.client().routes(ZONE).is_empty());
    }

    #[tokio::test]
    async fn test_deploy_route_creation_failure() {
        let client = zone();
        client.fail(Operation::CreateRoute);
        let engine = engine(client).await;

        let result = engine.deploy(&PageConfig::default()).await;

        match result {
            Err(ReconcileError::CreateRoute { pattern, .. }) => assert_eq!(pattern, DISABLED),
            other => panic!("Expected CreateRoute error, got {:?}", other.map(|_| ())),
        }
        // the script is uploaded before the route is attempted
        assert_eq!(engine.client().upload_count(), 1);
        assert!(engine.client().routes(ZONE).is_empty());
    }

    #[tokio::test]
    async fn test_deploy_rejects_invalid_status_code() {
        let engine = engine(zone()).await;
        let page = PageConfig {
            status_code: 42,
            ..Default::default()
        };

        let result = engine.deploy(&page).await;

        assert!(matches!(result, Err(ReconcileError::Render(_))));
        assert_eq!(engine.client().upload_count(), 0);
    }

    #[tokio::test]
    async fn test_enable_twice() {
        let engine = engine(zone().with_route(ZONE, DISABLED, SCRIPT)).await;

        assert!(engine.enable_maintenance().await.unwrap());
        assert!(!engine.enable_maintenance().await.unwrap());
        assert_eq!(patterns(engine.client()), vec![ENABLED]);
    }

    #[tokio::test]
    async fn test_enable_when_already_enabled() {
        let engine = engine(zone().with_route(ZONE, ENABLED, SCRIPT)).await;

        assert!(!engine.enable_maintenance().await.unwrap());
        assert!(!engine.enable_maintenance().await.unwrap());
    }

    #[tokio::test]
    async fn test_enable_then_disable_restores_pattern() {
        let engine = engine(zone().with_route(ZONE, DISABLED, SCRIPT)).await;
        let original = engine.client().routes(ZONE)[0].clone();

        engine.enable_maintenance().await.unwrap();
        assert_eq!(engine.status().await.unwrap(), MaintenanceState::Enabled);

        assert!(engine.disable_maintenance().await.unwrap());
        let restored = engine.client().routes(ZONE)[0].clone();

        assert_eq!(restored.id, original.id);
        assert_eq!(restored.pattern, DISABLED);
        assert_eq!(engine.status().await.unwrap(), MaintenanceState::Disabled);
    }

    #[tokio::test]
    async fn test_disable_when_already_disabled() {
        let engine = engine(zone().with_route(ZONE, DISABLED, SCRIPT)).await;

        assert!(!engine.disable_maintenance().await.unwrap());
    }

    #[tokio::test]
    async fn test_enable_without_routes_fails() {
        let engine = engine(zone()).await;

        let err = engine.enable_maintenance().await.unwrap_err();

        assert!(matches!(err, ReconcileError::NoMatchingRoute { .. }));
        assert!(err.to_string().contains("no matching route"));
        assert!(engine.client().routes(ZONE).is_empty());
    }

    #[tokio::test]
    async fn test_unknown_patterns_fail_both_ways() {
        let engine = engine(zone().with_route(ZONE, "*example.com/api/*", "other")).await;

        assert!(engine.enable_maintenance().await.is_err());
        assert!(engine.disable_maintenance().await.is_err());
        assert_eq!(engine.status().await.unwrap(), MaintenanceState::Unknown);
        assert_eq!(patterns(engine.client()), vec!["*example.com/api/*"]);
    }

    #[tokio::test]
    async fn test_first_match_wins_with_duplicates() {
        let engine = engine(
            zone()
                .with_route(ZONE, DISABLED, SCRIPT)
                .with_route(ZONE, DISABLED, SCRIPT),
        )
        .await;

        assert!(engine.enable_maintenance().await.unwrap());
        assert_eq!(patterns(engine.client()), vec![ENABLED, DISABLED]);
    }

    #[tokio::test]
    async fn test_update_failure_is_tagged() {
        let client = zone().with_route(ZONE, DISABLED, SCRIPT);
        client.fail(Operation::UpdateRoute);
        let engine = engine(client).await;

        let err = engine.enable_maintenance().await.unwrap_err();

        match err {
            ReconcileError::UpdateRoute {
                route_id, pattern, ..
            } => {
                assert_eq!(route_id, "route-1");
                assert_eq!(pattern, ENABLED);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_list_failure_is_tagged() {
        let client = zone();
        client.fail(Operation::ListRoutes);
        let engine = engine(client).await;

        let result = engine.disable_maintenance().await;

        assert!(matches!(result, Err(ReconcileError::ListRoutes { .. })));
    }
}
