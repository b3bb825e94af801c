use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{LookoutError, classify_status};

/// Issues one GET per call and decodes the JSON body into a caller-chosen type.
///
/// No retries and no caching: every call goes to the network once and every
/// failure is reported once.
#[derive(Debug, Clone)]
pub struct RequestExecutor {
    http: Client,
}

impl RequestExecutor {
    pub fn new(timeout: Duration) -> Result<Self, LookoutError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LookoutError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http })
    }

    /// GET `url` and decode the body as `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, LookoutError> {
        let shown = redacted(&url);
        debug!(url = %shown, "GET");

        let res = self.http.get(url).send().await.map_err(|e| {
            let e = e.without_url();
            debug!(url = %shown, error = %e, "request failed before a response");
            LookoutError::from(e)
        })?;

        let status = res.status();
        // reported to the user by the caller; warn only on undecodable 2xx bodies
        if let Err(err) = classify_status(status) {
            debug!(url = %shown, %status, "request rejected");
            return Err(err);
        }

        let body = res
            .text()
            .await
            .map_err(|e| LookoutError::Transport(format!("failed to read response body: {}", e.without_url())))?;

        serde_json::from_str(&body).map_err(|e| {
            warn!(url = %shown, error = %e, body = %truncate_body(&body), "unexpected response body");
            LookoutError::Decode(e.to_string())
        })
    }
}

/// Copy of `url` with API key query values masked, for logging.
pub(crate) fn redacted(url: &Url) -> Url {
    const SECRET_PARAMS: &[&str] = &["appid", "apikey"];

    let mut shown = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if SECRET_PARAMS.contains(&k.as_ref()) { "***".into() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();

    if pairs.is_empty() {
        return shown;
    }

    shown.query_pairs_mut().clear().extend_pairs(pairs);
    shown
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
