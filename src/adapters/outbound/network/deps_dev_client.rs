use super::client_lifecycle::{cancelled, ClientLifecycle, ClientState};
use crate::graph_resolution::domain::PackageIdentity;
use crate::graph_resolution::services::VersionReconciler;
use crate::ports::outbound::{DependencyDataRepository, FetchOutcome, RawGraphData};
use crate::shared::error::DepGraphError;
use crate::shared::Result;
use async_trait::async_trait;
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

/// Public deps.dev endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.deps.dev/v3alpha/systems";

/// Connection and lifecycle tuning for `DepsDevClient`
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Whole-request timeout (connect + read)
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Requests allowed in flight at once
    pub max_concurrency: usize,
    /// How long shutdown waits for in-flight requests before forcing
    pub shutdown_grace: Duration,
    pub pool_max_idle_per_host: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            max_concurrency: 8,
            shutdown_grace: Duration::from_secs(5),
            pool_max_idle_per_host: 8,
        }
    }
}

/// DepsDevClient adapter for the deps.dev dependency-graph API
///
/// Implements the DependencyDataRepository port over a pooled async reqwest
/// client. Concurrency is bounded by a semaphore. Failed requests are never
/// retried: a non-2xx answer is a soft failure, anything else is hard.
///
/// # Shutdown
/// `shutdown` stops accepting requests, cancels in-flight ones, releases the
/// connection pool and waits up to the grace period before forcing the
/// `Closed` state. Repeated or concurrent calls are no-ops.
pub struct DepsDevClient {
    base_url: String,
    client: RwLock<Option<reqwest::Client>>,
    permits: Semaphore,
    shutdown_grace: Duration,
    lifecycle: ClientLifecycle,
}

impl DepsDevClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let user_agent = format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client: RwLock::new(Some(client)),
            permits: Semaphore::new(config.max_concurrency.max(1)),
            shutdown_grace: config.shutdown_grace,
            lifecycle: ClientLifecycle::new(),
        })
    }

    pub fn state(&self) -> ClientState {
        self.lifecycle.state()
    }

    /// `{base}/{ecosystem}/packages/{name}/versions/{query version}:dependencies`
    ///
    /// Vendor-patched versions are queried by their upstream version.
    pub fn dependencies_url(&self, identity: &PackageIdentity) -> String {
        let version = VersionReconciler::parse(identity.version());
        format!(
            "{}/{}/packages/{}/versions/{}:dependencies",
            self.base_url,
            identity.ecosystem().as_str(),
            urlencoding::encode(identity.name()),
            urlencoding::encode(version.query_version()),
        )
    }

    fn current_client(&self) -> Option<reqwest::Client> {
        self.client.read().ok().and_then(|client| client.clone())
    }

    async fn request(
        &self,
        client: &reqwest::Client,
        identity: &PackageIdentity,
        url: &str,
    ) -> Result<FetchOutcome> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| shut_down(identity))?;

        let started = Instant::now();
        let transport = |source: reqwest::Error| -> anyhow::Error {
            DepGraphError::Transport {
                package: identity.to_string(),
                source,
            }
            .into()
        };

        let response = client.get(url).send().await.map_err(transport)?;
        let status = response.status();

        if !status.is_success() {
            tracing::warn!(
                package = %identity,
                status = status.as_u16(),
                url,
                "metadata service returned a non-success status"
            );
            return Ok(FetchOutcome::Unavailable {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        let data: RawGraphData =
            serde_json::from_slice(&body).map_err(|e| -> anyhow::Error {
                DepGraphError::MalformedResponse {
                    package: identity.to_string(),
                    details: e.to_string(),
                }
                .into()
            })?;

        tracing::debug!(
            package = %identity,
            nodes = data.nodes.len(),
            edges = data.edges.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "fetched dependency data"
        );

        Ok(FetchOutcome::Resolved(data))
    }
}

fn shut_down(identity: &PackageIdentity) -> anyhow::Error {
    DepGraphError::ClientShutDown {
        package: identity.to_string(),
    }
    .into()
}

#[async_trait]
impl DependencyDataRepository for DepsDevClient {
    async fn fetch_dependency_data(&self, identity: &PackageIdentity) -> Result<FetchOutcome> {
        let Some(_guard) = self.lifecycle.try_enter() else {
            return Err(shut_down(identity));
        };
        let cancel = self.lifecycle.subscribe_cancel();
        let client = self.current_client().ok_or_else(|| shut_down(identity))?;
        let url = self.dependencies_url(identity);

        tokio::select! {
            _ = cancelled(cancel) => {
                tracing::debug!(package = %identity, "request cancelled by shutdown");
                Err(shut_down(identity))
            }
            result = self.request(&client, identity, &url) => result,
        }
    }

    async fn shutdown(&self) -> Result<()> {
        if !self.lifecycle.begin_shutdown() {
            return Ok(());
        }

        tracing::info!(in_flight = self.lifecycle.in_flight(), "shutting down metadata service client");
        self.permits.close();
        if let Ok(mut client) = self.client.write() {
            client.take();
        }

        if tokio::time::timeout(self.shutdown_grace, self.lifecycle.wait_idle())
            .await
            .is_err()
        {
            tracing::warn!(
                in_flight = self.lifecycle.in_flight(),
                grace_ms = self.shutdown_grace.as_millis() as u64,
                "grace period elapsed, forcing client shutdown"
            );
        }

        self.lifecycle.finish();
        tracing::debug!("metadata service client closed");
        Ok(())
    }
}
