use anyhow::Context;
use async_trait::async_trait;
use reqwest::Url;
use std::{fmt::Debug, time::Duration};
use tracing::debug;

use crate::{
    Config, ServiceId,
    error::LookoutError,
    model::{Coordinates, CryptoAsset, IssLocation, WeatherInfo},
    request::RequestExecutor,
    service::{coinapi::CoinApiClient, opennotify::OpenNotifyClient, openweather::OpenWeatherClient},
    units::UnitSystem,
};

pub mod coinapi;
pub mod opennotify;
pub mod openweather;

/// Everything the menu can ask of the upstream services.
#[async_trait]
pub trait LookoutApi: Send + Sync + Debug {
    async fn weather_in_city(
        &self,
        city: &str,
        units: UnitSystem,
    ) -> Result<WeatherInfo, LookoutError>;

    async fn weather_at(
        &self,
        coords: Coordinates,
        units: UnitSystem,
    ) -> Result<WeatherInfo, LookoutError>;

    async fn iss_location(&self) -> Result<IssLocation, LookoutError>;

    async fn crypto_asset(&self, asset_id: &str) -> Result<CryptoAsset, LookoutError>;
}

/// The three upstream clients sharing one HTTP connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    weather: OpenWeatherClient,
    iss: OpenNotifyClient,
    crypto: CoinApiClient,
}

impl ApiClient {
    /// Build clients from endpoints, keys and timeout in `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        if config.timeout_secs == 0 {
            anyhow::bail!("Invalid `timeout_secs = 0`: the request timeout must be at least 1 second");
        }

        let executor = RequestExecutor::new(Duration::from_secs(config.timeout_secs))
            .context("Failed to initialise HTTP client")?;

        let endpoints = &config.endpoints;
        let key = |id: ServiceId| config.service_api_key(id).map(str::to_owned);

        Ok(Self {
            weather: OpenWeatherClient::new(
                executor.clone(),
                parse_endpoint("weather_url", &endpoints.weather_url)?,
                key(ServiceId::OpenWeather),
            ),
            iss: OpenNotifyClient::new(
                executor.clone(),
                parse_endpoint("iss_url", &endpoints.iss_url)?,
            ),
            crypto: CoinApiClient::new(
                executor,
                parse_endpoint("assets_url", &endpoints.assets_url)?,
                key(ServiceId::CoinApi),
            ),
        })
    }

    /// Fire one throwaway request per service so the first real one skips
    /// connection setup. Failures are ignored.
    pub async fn warmup(&self) {
        if let Err(e) = self.iss.iss_location().await {
            debug!(error = %e, "warmup: iss");
        }
        if let Err(e) = self.weather.weather_in_city("London", UnitSystem::default()).await {
            debug!(error = %e, "warmup: weather");
        }
        if let Err(e) = self.crypto.crypto_asset("BTC").await {
            debug!(error = %e, "warmup: crypto");
        }
    }
}

fn parse_endpoint(name: &str, raw: &str) -> anyhow::Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("Invalid endpoint `{name}`: {raw}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("Endpoint `{name}` must be an http(s) URL, got: {raw}");
    }
    Ok(url)
}

#[async_trait]
impl LookoutApi for ApiClient {
    async fn weather_in_city(
        &self,
        city: &str,
        units: UnitSystem,
    ) -> Result<WeatherInfo, LookoutError> {
        self.weather.weather_in_city(city, units).await
    }

    async fn weather_at(
        &self,
        coords: Coordinates,
        units: UnitSystem,
    ) -> Result<WeatherInfo, LookoutError> {
        self.weather.weather_at(coords, units).await
    }

    async fn iss_location(&self) -> Result<IssLocation, LookoutError> {
        self.iss.iss_location().await
    }

    async fn crypto_asset(&self, asset_id: &str) -> Result<CryptoAsset, LookoutError> {
        self.crypto.crypto_asset(asset_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_works_without_keys() {
        assert!(ApiClient::from_config(&Config::default()).is_ok());
    }

    #[test]
    fn from_config_rejects_zero_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "timeout_secs = 0\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();
        let err = ApiClient::from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("timeout_secs = 0"));

        let cfg = Config { timeout_secs: 1, ..cfg };
        assert!(ApiClient::from_config(&cfg).is_ok());
    }

    #[test]
    fn from_config_rejects_bad_endpoint() {
        let mut cfg = Config::default();
        cfg.endpoints.iss_url = "not a url".to_string();

        let err = ApiClient::from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("Invalid endpoint `iss_url`"));
    }

    #[test]
    fn from_config_rejects_non_http_scheme() {
        let mut cfg = Config::default();
        cfg.endpoints.assets_url = "ftp://coins.example/v1/assets".to_string();

        let err = ApiClient::from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("must be an http(s) URL"));
    }

    #[tokio::test]
    async fn unconfigured_service_reports_missing_credentials() {
        let client = ApiClient::from_config(&Config::default()).unwrap();

        let err = client.weather_in_city("London", UnitSystem::Imperial).await.unwrap_err();
        assert!(matches!(err, LookoutError::MissingCredentials { service: ServiceId::OpenWeather }));

        let err = client.crypto_asset("BTC").await.unwrap_err();
        assert!(matches!(err, LookoutError::MissingCredentials { service: ServiceId::CoinApi }));
    }
}
