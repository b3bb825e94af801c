use reqwest::Url;
use tracing::debug;

use crate::{
    config::ServiceId, error::LookoutError, model::CryptoAsset, request::RequestExecutor,
};

/// CoinAPI asset lookup: `GET {assets_url}/{asset_id}?apikey=...`.
#[derive(Debug, Clone)]
pub struct CoinApiClient {
    executor: RequestExecutor,
    url: Url,
    api_key: Option<String>,
}

impl CoinApiClient {
    pub fn new(executor: RequestExecutor, url: Url, api_key: Option<String>) -> Self {
        Self { executor, url, api_key }
    }

    pub fn asset_url(&self, asset_id: &str) -> Result<Url, LookoutError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(LookoutError::MissingCredentials { service: ServiceId::CoinApi })?;

        let mut url = self.url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                LookoutError::InputFormat(format!("CoinAPI endpoint cannot take a path: {}", self.url))
            })?
            .pop_if_empty()
            .push(asset_id);
        url.query_pairs_mut().append_pair("apikey", api_key);
        Ok(url)
    }

    /// Look up one asset.
    ///
    /// CoinAPI answers an empty or unknown ID with `200 []`, so both cases are
    /// turned into [`LookoutError::EmptyAssetQuery`] here: the empty ID before
    /// any request is sent, the empty array after.
    pub async fn crypto_asset(&self, asset_id: &str) -> Result<CryptoAsset, LookoutError> {
        let asset_id = asset_id.trim();
        if asset_id.is_empty() {
            return Err(LookoutError::EmptyAssetQuery("Empty asset ID was queried.".to_string()));
        }

        let url = self.asset_url(asset_id)?;
        let assets: Vec<CryptoAsset> = self.executor.get_json(url).await?;

        debug!(asset_id, matches = assets.len(), "asset lookup");
        assets.into_iter().next().ok_or_else(|| {
            LookoutError::EmptyAssetQuery(format!(
                "The API request was invalid; unknown asset ID '{asset_id}' was queried."
            ))
        })
    }
}
