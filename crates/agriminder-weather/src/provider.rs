//! OpenWeather forecast client.

use agriminder_core::{ReqwestErrorExt, Units, WeatherConfig, WeatherError};
use chrono::Utc;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::instrument;

use crate::cache::WeatherCache;
use crate::normalize::reduce_forecast;
use crate::types::{ForecastEntry, ForecastResponse, WeatherData};

const FORECAST_PATH: &str = "/forecast";

/// Fetches, reduces, and caches 5-day forecasts.
#[derive(Debug)]
pub struct WeatherProvider {
    client: Client,
    base_url: String,
    units: Units,
    cache: WeatherCache,
}

impl WeatherProvider {
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ReqwestErrorExt::into_weather_error)?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            units: config.units,
            cache: WeatherCache::new(Duration::from_secs(
                config.cache_ttl_minutes.saturating_mul(60),
            )),
        })
    }

    pub fn units(&self) -> Units {
        self.units
    }

    pub fn cache(&self) -> &WeatherCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut WeatherCache {
        &mut self.cache
    }

    /// Forecast for `city`, at most five days, served from cache when fresh.
    ///
    /// A missing key or blank city is reported before any lookup. Only
    /// successful results are cached.
    #[instrument(skip(self, api_key), level = "info")]
    pub async fn fetch_forecast(
        &mut self,
        city: &str,
        api_key: Option<&str>,
    ) -> Result<WeatherData, WeatherError> {
        let api_key = api_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(WeatherError::MissingApiKey)?;

        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::MissingCity);
        }

        if let Some(cached) = self.cache.get(city) {
            tracing::debug!("Forecast cache hit for {}", city);
            return Ok(cached.clone());
        }

        let entries = self.request(city, api_key).await?;
        let days = reduce_forecast(&entries);
        tracing::info!(
            "Fetched forecast for {}: {} entries -> {} days",
            city,
            entries.len(),
            days.len()
        );

        let data = WeatherData {
            city: city.to_string(),
            days,
            fetched_at: Utc::now(),
        };
        let expired = self.cache.expire();
        if expired > 0 {
            tracing::debug!("Dropped {} stale forecasts", expired);
        }
        self.cache.put(city, data.clone());
        Ok(data)
    }

    async fn request(&self, city: &str, api_key: &str) -> Result<Vec<ForecastEntry>, WeatherError> {
        let url = format!("{}{}", self.base_url, FORECAST_PATH);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", api_key),
                ("units", self.units.as_query()),
            ])
            .send()
            .await
            .map_err(ReqwestErrorExt::into_weather_error)?;

        let status = response.status();
        if status == StatusCode::OK {
            let body: ForecastResponse = response
                .json()
                .await
                .map_err(ReqwestErrorExt::into_weather_error)?;
            return Ok(body.list);
        }

        let err = match status {
            StatusCode::UNAUTHORIZED => WeatherError::Unauthorized,
            StatusCode::NOT_FOUND => WeatherError::CityNotFound,
            StatusCode::TOO_MANY_REQUESTS => WeatherError::RateLimited,
            _ => WeatherError::HttpError {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            },
        };
        tracing::warn!("Forecast request for {} failed: {}", city, err);
        Err(err)
    }
}
