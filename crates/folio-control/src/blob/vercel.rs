use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::BlobError;

/// Default Vercel Blob API endpoint.
pub const VERCEL_BASE_URL: &str = "https://blob.vercel-storage.com";

const API_VERSION: &str = "7";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the Vercel Blob HTTP API.
#[derive(Debug, Clone)]
pub struct VercelBlobStore {
    client: Client,
    base_url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct PutBlobResult {
    url: String,
}

#[derive(Debug, Serialize)]
struct DeleteBlobsRequest<'a> {
    urls: &'a [String],
}

impl VercelBlobStore {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self, BlobError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    pub(super) async fn put(
        &self,
        pathname: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, BlobError> {
        let result: PutBlobResult = self
            .client
            .put(format!("{}/{}", self.base_url, pathname))
            .bearer_auth(&self.token)
            .header("x-api-version", API_VERSION)
            .header("x-content-type", content_type)
            .body(data)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(result.url)
    }

    pub(super) async fn delete(&self, urls: &[String]) -> Result<(), BlobError> {
        self.client
            .post(format!("{}/delete", self.base_url))
            .bearer_auth(&self.token)
            .header("x-api-version", API_VERSION)
            .json(&DeleteBlobsRequest { urls })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
