//! Cached access to reference groups through a pluggable source.

use super::cache::{Clock, GroupCache, SystemClock};
use super::{process_rows, GroupRow};
use crate::config::FilterConfig;
use crate::error::{FilterError, Result};
use crate::ir::DemographicGroup;
use std::sync::Arc;
use tracing::{debug, warn};

/// Loads raw reference rows for a data source (a table name).
pub trait GroupSource: Send + Sync {
    fn fetch_rows(&self, data_source: &str) -> Result<Vec<GroupRow>>;
}

impl<F> GroupSource for F
where
    F: Fn(&str) -> Result<Vec<GroupRow>> + Send + Sync,
{
    fn fetch_rows(&self, data_source: &str) -> Result<Vec<GroupRow>> {
        self(data_source)
    }
}

/// Reference groups for one data source, cached per the configuration.
#[derive(Debug)]
pub struct GroupCatalog<S> {
    source: S,
    data_source: String,
    cache: Option<GroupCache>,
}

impl<S: GroupSource> GroupCatalog<S> {
    pub fn new(source: S, config: &FilterConfig) -> Self {
        Self::with_clock(source, config, Arc::new(SystemClock))
    }

    pub fn with_clock(source: S, config: &FilterConfig, clock: Arc<dyn Clock>) -> Self {
        let cache = config
            .enable_caching
            .then(|| GroupCache::with_clock(config.effective_cache_ttl(), clock));
        Self {
            source,
            data_source: config.data_source.clone(),
            cache,
        }
    }

    pub fn data_source(&self) -> &str {
        &self.data_source
    }

    pub fn cache(&self) -> Option<&GroupCache> {
        self.cache.as_ref()
    }

    /// Groups for the configured data source, from cache while fresh.
    pub fn fetch_groups(&self) -> Result<Arc<Vec<DemographicGroup>>> {
        if let Some(cached) = self.cache.as_ref().and_then(|c| c.get(&self.data_source)) {
            debug!(data_source = %self.data_source, "reference groups served from cache");
            return Ok(cached);
        }

        let rows = self.source.fetch_rows(&self.data_source).map_err(|err| {
            warn!(data_source = %self.data_source, error = %err, "failed to fetch reference groups");
            FilterError::SourceError(format!(
                "failed to fetch demographic options from '{}': {err}",
                self.data_source
            ))
        })?;

        let groups = process_rows(&rows);
        debug!(
            data_source = %self.data_source,
            rows = rows.len(),
            groups = groups.len(),
            "fetched reference groups"
        );

        Ok(match &self.cache {
            Some(cache) => cache.insert(self.data_source.clone(), groups),
            None => Arc::new(groups),
        })
    }

    /// Drop the cached groups so the next fetch hits the source.
    pub fn invalidate(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate(&self.data_source);
        }
    }
}
