//! Remote state client abstraction

use crate::error::Result;
use async_trait::async_trait;
use cfmp_worker::ScriptBundle;
use serde::{Deserialize, Serialize};

/// A Worker route: a URL pattern bound to a script within a zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub id: String,
    pub pattern: String,
    #[serde(default)]
    pub script: Option<String>,
}

/// Zone, route and script operations of the edge platform
///
/// Every call is a remote call that may fail; callers do not retry.
#[async_trait]
pub trait RemoteStateClient: Send + Sync {
    /// Domain name of the zone (e.g. `example.com`)
    async fn zone_domain(&self, zone_id: &str) -> Result<String>;

    /// All Worker routes in the zone
    async fn list_routes(&self, zone_id: &str) -> Result<Vec<Route>>;

    /// Create a route binding `pattern` to `script`
    async fn create_route(&self, zone_id: &str, pattern: &str, script: &str) -> Result<Route>;

    /// Replace the pattern of an existing route, keeping its id
    async fn update_route(
        &self,
        zone_id: &str,
        route_id: &str,
        pattern: &str,
        script: &str,
    ) -> Result<Route>;

    /// Upload or overwrite a Worker script
    async fn upload_script(
        &self,
        account_id: &str,
        script: &str,
        bundle: &ScriptBundle,
    ) -> Result<()>;
}
