//! Baidu Maps client
//!
//! Geocoding via `/geocoding/v3/` and route planning via
//! `/direction/v2/{transit,riding}`. Every request draws its `ak` from the
//! shared [`KeyPool`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use domain::Coordinate;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::config::BaiduConfig;
use crate::error::{BaiduError, QUOTA_EXCEEDED_STATUS};
use crate::key_pool::KeyPool;
use crate::models::{
    CommuteInfo, RawGeocodeResponse, RawRidingResponse, RawStatus, RawTransitResponse, RouteInfo,
    RouteMode,
};

/// Trait for map service clients
#[async_trait]
pub trait MapClient: Send + Sync {
    /// Resolve an address to a coordinate
    async fn geocode(&self, address: &str) -> Result<Coordinate, BaiduError>;

    /// Plan a route between two coordinates
    async fn calculate_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: RouteMode,
    ) -> Result<RouteInfo, BaiduError>;

    /// Geocode both addresses and plan the commute between them
    async fn get_commute_info(
        &self,
        start_address: &str,
        end_address: &str,
    ) -> Result<CommuteInfo, BaiduError>;
}

/// Baidu Maps client with API-key rotation
#[derive(Debug)]
pub struct BaiduMapClient {
    client: Client,
    config: BaiduConfig,
    key_pool: Arc<KeyPool>,
}

impl BaiduMapClient {
    /// Create a new client with its own key pool built from the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if no keys are configured or the HTTP client cannot
    /// be initialized.
    pub fn new(config: &BaiduConfig) -> Result<Self, BaiduError> {
        let pool = KeyPool::new(config.usable_keys(), config.daily_cap)?;
        Self::with_key_pool(config, Arc::new(pool))
    }

    /// Create a new client that draws keys from an existing pool
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_key_pool(config: &BaiduConfig, key_pool: Arc<KeyPool>) -> Result<Self, BaiduError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("commute-calculator/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BaiduError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
            key_pool,
        })
    }

    /// The key pool this client draws from
    #[must_use]
    pub fn key_pool(&self) -> &Arc<KeyPool> {
        &self.key_pool
    }

    /// The coordinate delta above which transit is chosen
    #[must_use]
    pub const fn transit_threshold_degrees(&self) -> f64 {
        self.config.transit_threshold_degrees
    }

    /// Issue a GET with a freshly checked-out key and decode the body once
    /// the provider status is 0.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        mut params: Vec<(&'static str, String)>,
    ) -> Result<T, BaiduError> {
        let key = self.key_pool.checkout()?;
        params.push(("ak", key));

        let url = format!("{}{path}", self.config.base_url);
        debug!(%url, "Calling Baidu Maps");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BaiduError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    BaiduError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(BaiduError::RequestFailed {
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| BaiduError::ParseError(e.to_string()))?;

        self.check_status(&body)?;

        serde_json::from_str(&body).map_err(|e| BaiduError::ParseError(e.to_string()))
    }

    /// Translate the provider status envelope; a quota rejection rotates the pool
    fn check_status(&self, body: &str) -> Result<(), BaiduError> {
        let raw: RawStatus =
            serde_json::from_str(body).map_err(|e| BaiduError::ParseError(e.to_string()))?;

        match raw.status {
            0 => Ok(()),
            QUOTA_EXCEEDED_STATUS => {
                warn!("Provider reported exceeded quota, rotating API key");
                self.key_pool.advance();
                Err(BaiduError::QuotaExceeded)
            },
            status => Err(BaiduError::Provider {
                status,
                message: raw.message.unwrap_or_default(),
            }),
        }
    }

    async fn plan_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: RouteMode,
    ) -> Result<RouteInfo, BaiduError> {
        let params = vec![
            ("origin", lat_lng(&origin)),
            ("destination", lat_lng(&destination)),
            ("region", self.config.region.clone()),
        ];

        match mode {
            RouteMode::Transit => {
                let raw: RawTransitResponse = self.get_json(&mode.path(), params).await?;
                let fastest = raw.result.fastest().ok_or(BaiduError::NoRoutesFound)?;
                debug!(candidates = raw.result.routes.len(), "Transit routes found");
                Ok(fastest.into_route_info(mode))
            },
            RouteMode::Riding => {
                let raw: RawRidingResponse = self.get_json(&mode.path(), params).await?;
                let route = raw.result.route().ok_or(BaiduError::NoRoutesFound)?;
                Ok(route.into_route_info(mode))
            },
        }
    }
}

/// Baidu expects `lat,lng`
fn lat_lng(c: &Coordinate) -> String {
    format!("{},{}", c.latitude(), c.longitude())
}

#[async_trait]
impl MapClient for BaiduMapClient {
    #[instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<Coordinate, BaiduError> {
        let wrap = |source: BaiduError| BaiduError::Geocode {
            address: address.to_string(),
            source: Box::new(source),
        };

        let trimmed = address.trim();
        if trimmed.is_empty() {
            return Err(wrap(BaiduError::InvalidArgument(
                "address must not be empty".to_string(),
            )));
        }

        let params = vec![
            ("address", trimmed.to_string()),
            ("output", "json".to_string()),
            ("city", self.config.city.clone()),
        ];

        let raw: RawGeocodeResponse = self
            .get_json("/geocoding/v3/", params)
            .await
            .map_err(wrap)?;

        let location = raw.result.location;
        debug!(lng = location.lng, lat = location.lat, "Geocoded address");

        Coordinate::new(location.lng, location.lat)
            .map_err(|e| wrap(BaiduError::ParseError(e.to_string())))
    }

    #[instrument(skip(self, origin, destination), fields(origin = %origin, destination = %destination))]
    async fn calculate_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: RouteMode,
    ) -> Result<RouteInfo, BaiduError> {
        self.plan_route(origin, destination, mode)
            .await
            .map_err(|source| BaiduError::Route {
                mode: mode.as_str(),
                source: Box::new(source),
            })
    }

    #[instrument(skip(self))]
    async fn get_commute_info(
        &self,
        start_address: &str,
        end_address: &str,
    ) -> Result<CommuteInfo, BaiduError> {
        let wrap = |source: BaiduError| BaiduError::CommuteInfo {
            source: Box::new(source),
        };

        let start = self.geocode(start_address).await.map_err(wrap)?;
        let end = self.geocode(end_address).await.map_err(wrap)?;

        let mode = RouteMode::for_trip(&start, &end, self.config.transit_threshold_degrees);
        let route = self
            .calculate_route(start, end, mode)
            .await
            .map_err(wrap)?;

        Ok(CommuteInfo {
            start,
            end,
            distance_km: route.distance_km,
            duration_secs: route.duration_secs,
            mode: route.mode,
        })
    }
}
