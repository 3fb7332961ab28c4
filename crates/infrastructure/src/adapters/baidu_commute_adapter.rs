//! Baidu commute adapter - Implements CommutePort using integration_baidu

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::CommutePort;
use async_trait::async_trait;
use domain::CommuteResult;
use integration_baidu::{BaiduConfig, BaiduError, BaiduMapClient, KeyPool, MapClient};
use tracing::{debug, instrument, warn};

/// Adapter for geocoding and routing via Baidu Maps
pub struct BaiduCommuteAdapter {
    client: Arc<dyn MapClient>,
    key_pool: Arc<KeyPool>,
}

impl std::fmt::Debug for BaiduCommuteAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaiduCommuteAdapter")
            .field("client", &"BaiduMapClient")
            .field("key_pool", &self.key_pool)
            .finish()
    }
}

impl BaiduCommuteAdapter {
    /// Create an adapter with a fresh client and key pool
    ///
    /// # Errors
    ///
    /// Returns an error if no keys are configured or the HTTP client fails
    /// to initialize.
    pub fn new(config: &BaiduConfig) -> Result<Self, ApplicationError> {
        let client = BaiduMapClient::new(config).map_err(|e| {
            ApplicationError::Configuration(format!("Baidu client setup failed: {e}"))
        })?;
        let key_pool = Arc::clone(client.key_pool());
        Ok(Self {
            client: Arc::new(client),
            key_pool,
        })
    }

    /// Create an adapter around an existing client and the pool it uses
    pub fn with_client(client: Arc<dyn MapClient>, key_pool: Arc<KeyPool>) -> Self {
        Self { client, key_pool }
    }

    /// The shared credential pool
    #[must_use]
    pub fn key_pool(&self) -> &Arc<KeyPool> {
        &self.key_pool
    }
}

fn map_error(e: &BaiduError) -> ApplicationError {
    match e.root_cause() {
        BaiduError::QuotaExhausted { .. } => ApplicationError::QuotaExhausted(e.to_string()),
        _ => ApplicationError::CommuteInfo(e.to_string()),
    }
}

#[async_trait]
impl CommutePort for BaiduCommuteAdapter {
    #[instrument(skip(self))]
    async fn commute_info(
        &self,
        start: &str,
        end: &str,
    ) -> Result<CommuteResult, ApplicationError> {
        let info = self.client.get_commute_info(start, end).await.map_err(|e| {
            warn!(error = %e, "Commute lookup failed");
            map_error(&e)
        })?;

        debug!(
            mode = %info.mode,
            distance_km = info.distance_km,
            duration_secs = info.duration_secs,
            "Commute resolved"
        );
        Ok(info.into())
    }

    fn credentials_available(&self) -> usize {
        self.key_pool.available()
    }

    fn credentials_configured(&self) -> usize {
        self.key_pool.len()
    }
}

#[cfg(test)]
mod tests {
    use domain::{Coordinate, TransportMode};
    use integration_baidu::{CommuteInfo, RouteInfo, RouteMode};

    use super::*;

    struct FixedClient {
        outcome: fn() -> Result<CommuteInfo, BaiduError>,
    }

    #[async_trait]
    impl MapClient for FixedClient {
        async fn geocode(&self, _address: &str) -> Result<Coordinate, BaiduError> {
            unreachable!("geocode is not called through the adapter")
        }

        async fn calculate_route(
            &self,
            _origin: Coordinate,
            _destination: Coordinate,
            _mode: RouteMode,
        ) -> Result<RouteInfo, BaiduError> {
            unreachable!("calculate_route is not called through the adapter")
        }

        async fn get_commute_info(
            &self,
            _start_address: &str,
            _end_address: &str,
        ) -> Result<CommuteInfo, BaiduError> {
            (self.outcome)()
        }
    }

    fn adapter(outcome: fn() -> Result<CommuteInfo, BaiduError>) -> BaiduCommuteAdapter {
        let pool = Arc::new(KeyPool::new(["key-a", "key-b"], 10).unwrap());
        BaiduCommuteAdapter::with_client(Arc::new(FixedClient { outcome }), pool)
    }

    #[tokio::test]
    async fn converts_commute_info() {
        let adapter = adapter(|| {
            Ok(CommuteInfo {
                start: Coordinate::new_unchecked(121.40, 31.20),
                end: Coordinate::new_unchecked(121.50, 31.20),
                distance_km: 12.345,
                duration_secs: 1800,
                mode: RouteMode::Transit,
            })
        });

        let result = adapter.commute_info("A", "B").await.unwrap();
        assert_eq!(result.mode, TransportMode::Transit);
        assert_eq!(result.duration_secs, 1800);
        assert!((result.start.longitude() - 121.40).abs() < 1e-9);
    }

    #[tokio::test]
    async fn exhausted_pool_maps_to_quota_error() {
        let adapter = adapter(|| {
            Err(BaiduError::CommuteInfo {
                source: Box::new(BaiduError::Geocode {
                    address: "A".to_string(),
                    source: Box::new(BaiduError::QuotaExhausted { keys: 2 }),
                }),
            })
        });

        let err = adapter.commute_info("A", "B").await.unwrap_err();
        assert!(matches!(err, ApplicationError::QuotaExhausted(_)));
    }

    #[tokio::test]
    async fn other_failures_map_to_commute_error() {
        let adapter = adapter(|| Err(BaiduError::NoRoutesFound));

        let err = adapter.commute_info("A", "B").await.unwrap_err();
        assert!(matches!(err, ApplicationError::CommuteInfo(_)));
    }

    #[test]
    fn reports_pool_counts() {
        let adapter = adapter(|| Err(BaiduError::NoRoutesFound));
        assert_eq!(adapter.credentials_configured(), 2);
        assert_eq!(adapter.credentials_available(), 2);
    }
}
