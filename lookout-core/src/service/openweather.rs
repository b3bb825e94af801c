use reqwest::Url;

use crate::{
    config::ServiceId,
    error::LookoutError,
    model::{Coordinates, WeatherInfo},
    request::RequestExecutor,
    units::UnitSystem,
};

/// OpenWeather "current weather" endpoint, by city or by coordinates.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    executor: RequestExecutor,
    url: Url,
    api_key: Option<String>,
}

impl OpenWeatherClient {
    pub fn new(executor: RequestExecutor, url: Url, api_key: Option<String>) -> Self {
        Self { executor, url, api_key }
    }

    /// Endpoint URL with the fixed `units` and `appid` parameters set.
    fn base_url(&self, units: UnitSystem) -> Result<Url, LookoutError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(LookoutError::MissingCredentials { service: ServiceId::OpenWeather })?;

        let mut url = self.url.clone();
        url.query_pairs_mut().append_pair("units", units.as_str()).append_pair("appid", api_key);
        Ok(url)
    }

    pub fn city_url(&self, city: &str, units: UnitSystem) -> Result<Url, LookoutError> {
        let mut url = self.base_url(units)?;
        url.query_pairs_mut().append_pair("q", city);
        Ok(url)
    }

    pub fn coordinates_url(
        &self,
        coords: Coordinates,
        units: UnitSystem,
    ) -> Result<Url, LookoutError> {
        let mut url = self.base_url(units)?;
        url.query_pairs_mut()
            .append_pair("lat", &coords.lat().to_string())
            .append_pair("lon", &coords.lon().to_string());
        Ok(url)
    }

    pub async fn weather_in_city(
        &self,
        city: &str,
        units: UnitSystem,
    ) -> Result<WeatherInfo, LookoutError> {
        let url = self.city_url(city, units)?;
        self.executor.get_json(url).await
    }

    pub async fn weather_at(
        &self,
        coords: Coordinates,
        units: UnitSystem,
    ) -> Result<WeatherInfo, LookoutError> {
        let url = self.coordinates_url(coords, units)?;
        self.executor.get_json(url).await
    }
}
