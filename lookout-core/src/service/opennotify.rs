use reqwest::Url;

use crate::{error::LookoutError, model::IssLocation, request::RequestExecutor};

/// Open Notify "iss-now" endpoint. No credentials.
#[derive(Debug, Clone)]
pub struct OpenNotifyClient {
    executor: RequestExecutor,
    url: Url,
}

impl OpenNotifyClient {
    pub fn new(executor: RequestExecutor, url: Url) -> Self {
        Self { executor, url }
    }

    pub async fn iss_location(&self) -> Result<IssLocation, LookoutError> {
        self.executor.get_json(self.url.clone()).await
    }
}
