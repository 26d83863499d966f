//! In-memory remote state
//!
//! Holds routes per zone in a map so the engine can be exercised without a
//! network. Individual operations can be made to fail.

use crate::client::{RemoteStateClient, Route};
use crate::error::{CloudError, Result};
use async_trait::async_trait;
use cfmp_worker::ScriptBundle;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Remote operation names, used to inject failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ZoneDomain,
    ListRoutes,
    CreateRoute,
    UpdateRoute,
    UploadScript,
}

#[derive(Default)]
struct Inner {
    domains: HashMap<String, String>,
    routes: HashMap<String, Vec<Route>>,
    scripts: HashMap<(String, String), ScriptBundle>,
    failing: HashSet<Operation>,
    next_id: u64,
    uploads: usize,
}

/// [`RemoteStateClient`] backed by in-process maps
#[derive(Default)]
pub struct InMemoryClient {
    inner: Mutex<Inner>,
}

impl InMemoryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a zone and its domain
    pub fn with_zone(self, zone_id: impl Into<String>, domain: impl Into<String>) -> Self {
        self.lock().domains.insert(zone_id.into(), domain.into());
        self
    }

    /// Seed an existing route
    pub fn with_route(self, zone_id: &str, pattern: &str, script: &str) -> Self {
        {
            let mut inner = self.lock();
            let id = inner.allocate_id();
            inner.routes.entry(zone_id.to_string()).or_default().push(Route {
                id,
                pattern: pattern.to_string(),
                script: Some(script.to_string()),
            });
        }
        self
    }

    /// Make every later call of `op` fail
    pub fn fail(&self, op: Operation) {
        self.lock().failing.insert(op);
    }

    /// Current routes of a zone
    pub fn routes(&self, zone_id: &str) -> Vec<Route> {
        self.lock().routes.get(zone_id).cloned().unwrap_or_default()
    }

    /// Last uploaded bundle for a script
    pub fn script(&self, account_id: &str, script: &str) -> Option<ScriptBundle> {
        self.lock()
            .scripts
            .get(&(account_id.to_string(), script.to_string()))
            .cloned()
    }

    /// Number of script uploads performed
    pub fn upload_count(&self) -> usize {
        self.lock().uploads
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // a poisoned lock only means a test panicked mid-call
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check(&self, op: Operation) -> Result<()> {
        if self.lock().failing.contains(&op) {
            return Err(CloudError::ApiError(format!("injected failure: {:?}", op)));
        }
        Ok(())
    }
}

impl Inner {
    fn allocate_id(&mut self) -> String {
        self.next_id += 1;
        format!("route-{}", self.next_id)
    }
}

#[async_trait]
impl RemoteStateClient for InMemoryClient {
    async fn zone_domain(&self, zone_id: &str) -> Result<String> {
        self.check(Operation::ZoneDomain)?;
        self.lock()
            .domains
            .get(zone_id)
            .cloned()
            .ok_or_else(|| CloudError::ResourceNotFound(format!("zone {}", zone_id)))
    }

    async fn list_routes(&self, zone_id: &str) -> Result<Vec<Route>> {
        self.check(Operation::ListRoutes)?;
        Ok(self.routes(zone_id))
    }

    async fn create_route(&self, zone_id: &str, pattern: &str, script: &str) -> Result<Route> {
        self.check(Operation::CreateRoute)?;
        let mut inner = self.lock();
        let id = inner.allocate_id();
        let route = Route {
            id,
            pattern: pattern.to_string(),
            script: Some(script.to_string()),
        };
        inner
            .routes
            .entry(zone_id.to_string())
            .or_default()
            .push(route.clone());
        Ok(route)
    }

    async fn update_route(
        &self,
        zone_id: &str,
        route_id: &str,
        pattern: &str,
        script: &str,
    ) -> Result<Route> {
        self.check(Operation::UpdateRoute)?;
        let mut inner = self.lock();
        let route = inner
            .routes
            .get_mut(zone_id)
            .and_then(|routes| routes.iter_mut().find(|r| r.id == route_id))
            .ok_or_else(|| CloudError::ResourceNotFound(format!("route {}", route_id)))?;

        route.pattern = pattern.to_string();
        route.script = Some(script.to_string());
        Ok(route.clone())
    }

    async fn upload_script(
        &self,
        account_id: &str,
        script: &str,
        bundle: &ScriptBundle,
    ) -> Result<()> {
        self.check(Operation::UploadScript)?;
        let mut inner = self.lock();
        inner
            .scripts
            .insert((account_id.to_string(), script.to_string()), bundle.clone());
        inner.uploads += 1;
        Ok(())
    }
}
