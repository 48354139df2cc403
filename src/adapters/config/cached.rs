//! Cached Configuration Source - loads the inner source once per process.
//!
//! Concurrent first loads race on the same cell; `OnceCell` guarantees a
//! single winner and every caller observes that one configuration. A failed
//! load leaves the cell empty so a later request retries.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::domain::analysis::GlobalAnalysisConfiguration;
use crate::ports::{ConfigurationSource, ConfigurationSourceError};

/// Caching decorator over any ConfigurationSource.
pub struct CachedConfigurationSource {
    inner: Arc<dyn ConfigurationSource>,
    cache: OnceCell<GlobalAnalysisConfiguration>,
}

impl CachedConfigurationSource {
    /// Wraps the inner source with a process-lifetime cache.
    pub fn new(inner: Arc<dyn ConfigurationSource>) -> Self {
        Self {
            inner,
            cache: OnceCell::new(),
        }
    }
}

#[async_trait]
impl ConfigurationSource for CachedConfigurationSource {
    async fn load(&self) -> Result<GlobalAnalysisConfiguration, ConfigurationSourceError> {
        let configuration = self
            .cache
            .get_or_try_init(|| async {
                debug!("loading analysis configuration into cache");
                self.inner.load().await
            })
            .await?;
        Ok(configuration.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        loads: AtomicUsize,
        fail_first: AtomicUsize,
    }

    #[async_trait]
    impl ConfigurationSource for CountingSource {
        async fn load(&self) -> Result<GlobalAnalysisConfiguration, ConfigurationSourceError> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if self.fail_first.load(Ordering::SeqCst) > 0 {
                self.fail_first.fetch_sub(1, Ordering::SeqCst);
                return Err(ConfigurationSourceError::Read("transient".to_string()));
            }
            Ok(GlobalAnalysisConfiguration::default())
        }
    }

    fn counting(fail_first: usize) -> Arc<CountingSource> {
        Arc::new(CountingSource {
            loads: AtomicUsize::new(0),
            fail_first: AtomicUsize::new(fail_first),
        })
    }

    #[tokio::test]
    async fn inner_source_is_loaded_once() {
        let inner = counting(0);
        let cached = CachedConfigurationSource::new(inner.clone());

        cached.load().await.unwrap();
        cached.load().await.unwrap();
        cached.load().await.unwrap();

        assert_eq!(inner.loads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_load_is_retried() {
        let inner = counting(1);
        let cached = CachedConfigurationSource::new(inner.clone());

        assert!(cached.load().await.is_err());
        assert!(cached.load().await.is_ok());
        assert_eq!(inner.loads.load(Ordering::SeqCst), 2);
    }
}
