//! Gas-station API client.

use std::time::Duration;

use async_trait::async_trait;
use color_eyre::eyre::Result;
use reqwest::StatusCode;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::{
    config::ApiConfig,
    domain::{history::HistoryRecord, package::Package, session::PurchasePayload},
};

const PACKAGES_PATH: &str = "/tc/packages";
const HISTORY_PATH: &str = "/tc/history";
const SUBMIT_PATH: &str = "/tc/generate-deposit";

/// Errors returned by a gas-station backend.
#[derive(Debug, thiserror::Error)]
pub enum GasStationError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Gas station returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("{0}")]
    Api(String),

    #[error("Decode error: {0}")]
    Decode(String),
}

/// Remote operations the purchase and status forms depend on.
#[async_trait]
pub trait GasStationApi: Send + Sync {
    /// Ordered package list; the last entry is the custom-package template.
    async fn fetch_package_list(&self) -> Result<Vec<Package>, GasStationError>;

    async fn fetch_purchase_history(
        &self,
        address: &str,
    ) -> Result<Vec<HistoryRecord>, GasStationError>;

    async fn submit_purchase(&self, payload: &PurchasePayload) -> Result<(), GasStationError>;
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    data: Option<T>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

/// Decode a `{ "data": ..., "error": { "message": ... } }` response.
fn parse_response<T: DeserializeOwned>(
    status: StatusCode,
    body: &str,
) -> Result<Option<T>, GasStationError> {
    if !status.is_success() {
        // Error bodies may still carry an API message.
        if let Ok(envelope) = serde_json::from_str::<ApiEnvelope<serde_json::Value>>(body)
            && let Some(err) = envelope.error
            && !err.message.is_empty()
        {
            return Err(GasStationError::Api(err.message));
        }
        return Err(GasStationError::Status {
            status: status.as_u16(),
            body: body.to_string(),
        });
    }

    let envelope: ApiEnvelope<T> =
        serde_json::from_str(body).map_err(|e| GasStationError::Decode(e.to_string()))?;

    if let Some(err) = envelope.error
        && !err.message.is_empty()
    {
        return Err(GasStationError::Api(err.message));
    }
    Ok(envelope.data)
}

/// HTTP implementation of [`GasStationApi`].
pub struct HttpGasStation {
    base_url: String,
    client: reqwest::Client,
}

impl HttpGasStation {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Option<T>, GasStationError> {
        let resp = request
            .send()
            .await
            .map_err(|e| GasStationError::Network(e.to_string()))?;
        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| GasStationError::Network(e.to_string()))?;
        debug!("gas station answered {} ({} bytes)", status, body.len());
        parse_response(status, &body)
    }
}

#[async_trait]
impl GasStationApi for HttpGasStation {
    async fn fetch_package_list(&self) -> Result<Vec<Package>, GasStationError> {
        let url = self.url(PACKAGES_PATH);
        let packages: Option<Vec<Package>> = self.read(self.client.get(&url)).await?;
        if packages.is_none() {
            warn!("{} returned no data", url);
        }
        Ok(packages.unwrap_or_default())
    }

    async fn fetch_purchase_history(
        &self,
        address: &str,
    ) -> Result<Vec<HistoryRecord>, GasStationError> {
        let url = self.url(HISTORY_PATH);
        let request = self.client.get(&url).query(&[("address", address)]);
        let records: Option<Vec<HistoryRecord>> = self.read(request).await?;
        Ok(records.unwrap_or_default())
    }

    async fn submit_purchase(&self, payload: &PurchasePayload) -> Result<(), GasStationError> {
        let url = self.url(SUBMIT_PATH);
        let _: Option<serde_json::Value> = self.read(self.client.post(&url).json(payload)).await?;
        Ok(())
    }
}
