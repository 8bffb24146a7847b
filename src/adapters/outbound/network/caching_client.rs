use crate::graph_resolution::domain::{Ecosystem, PackageIdentity};
use crate::graph_resolution::services::VersionReconciler;
use crate::ports::outbound::{DependencyDataRepository, FetchOutcome, RawGraphData};
use crate::shared::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// Cache key: what the metadata service is actually asked for
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct CacheKey {
    ecosystem: Ecosystem,
    name: String,
    query_version: String,
}

impl CacheKey {
    fn for_identity(identity: &PackageIdentity) -> Self {
        Self {
            ecosystem: identity.ecosystem(),
            name: identity.name().to_string(),
            query_version: VersionReconciler::query_version(identity.version()),
        }
    }
}

/// CachingDependencyRepository wraps a DependencyDataRepository with an in-memory cache.
///
/// Keyed by the query version, so vendor-patched variants of the same
/// upstream release share one request. Only successful fetches are cached;
/// soft and hard failures always reach the inner repository.
pub struct CachingDependencyRepository<R: DependencyDataRepository> {
    inner: R,
    cache: Arc<DashMap<CacheKey, RawGraphData>>,
}

impl<R: DependencyDataRepository> CachingDependencyRepository<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: Arc::new(DashMap::new()),
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Returns the current cache size (for testing/monitoring)
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[async_trait]
impl<R: DependencyDataRepository> DependencyDataRepository for CachingDependencyRepository<R> {
    async fn fetch_dependency_data(&self, identity: &PackageIdentity) -> Result<FetchOutcome> {
        let key = CacheKey::for_identity(identity);

        if let Some(cached) = self.cache.get(&key) {
            tracing::trace!(package = %identity, "dependency data cache hit");
            return Ok(FetchOutcome::Resolved(cached.clone()));
        }

        let outcome = self.inner.fetch_dependency_data(identity).await?;
        if let FetchOutcome::Resolved(data) = &outcome {
            self.cache.insert(key, data.clone());
        }

        Ok(outcome)
    }

    async fn shutdown(&self) -> Result<()> {
        self.inner.shutdown().await
    }
}
