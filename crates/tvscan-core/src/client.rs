//! Scan execution against the remote scanner.
//!
//! [`ScreenerClient`] owns the transport and configuration. Every call encodes
//! the request afresh, POSTs it to the primary market's endpoint and decodes
//! the body. Nothing is retried and no other market is tried on failure.

use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::ScreenerConfig;
use crate::error::{ScreenerError, TransportError};
use crate::http_client::{HttpClient, HttpRequest, NoopHttpClient, ReqwestHttpClient};
use crate::request::QueryRequest;
use crate::response::ScreenerResult;
use crate::wire;

#[derive(Clone)]
pub struct ScreenerClient {
    http_client: Arc<dyn HttpClient>,
    config: ScreenerConfig,
}

impl Debug for ScreenerClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreenerClient")
            .field("config", &self.config)
            .field("mock", &self.http_client.is_mock())
            .finish()
    }
}

impl Default for ScreenerClient {
    fn default() -> Self {
        Self::new(
            Arc::new(ReqwestHttpClient::default()),
            ScreenerConfig::from_env(),
        )
    }
}

impl ScreenerClient {
    pub fn new(http_client: Arc<dyn HttpClient>, config: ScreenerConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    /// Client that never touches the network and always sees an empty result.
    pub fn offline() -> Self {
        Self::new(Arc::new(NoopHttpClient), ScreenerConfig::default())
    }

    pub fn with_config(mut self, config: ScreenerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ScreenerConfig {
        &self.config
    }

    pub fn is_mock(&self) -> bool {
        self.http_client.is_mock()
    }

    /// Encodes `request` into the HTTP call that [`ScreenerClient::scan`] would send.
    pub fn prepare(&self, request: &QueryRequest) -> Result<HttpRequest, ScreenerError> {
        let body = wire::encode_request(request)?;
        let url = self.config.scan_url(request.primary_market());

        Ok(HttpRequest::post(url)
            .with_headers(self.config.headers())
            .with_body(body)
            .with_timeout_ms(self.config.timeout_ms()))
    }

    pub async fn scan(&self, request: &QueryRequest) -> Result<ScreenerResult, ScreenerError> {
        let prepared = self.prepare(request)?;
        debug!(
            url = %prepared.url,
            columns = request.columns.len(),
            range_start = request.range.start(),
            range_end = request.range.end(),
            "dispatching scan"
        );
        self.dispatch(prepared).await
    }

    /// Like [`ScreenerClient::scan`], but abandons the in-flight request when
    /// `cancel` fires first.
    pub async fn scan_with_cancellation(
        &self,
        request: &QueryRequest,
        cancel: &CancellationToken,
    ) -> Result<ScreenerResult, ScreenerError> {
        let prepared = self.prepare(request)?;
        let url = prepared.url.clone();

        if cancel.is_cancelled() {
            debug!(url = %url, "scan cancelled before dispatch");
            return Err(ScreenerError::Cancelled { url });
        }

        debug!(
            url = %url,
            columns = request.columns.len(),
            range_start = request.range.start(),
            range_end = request.range.end(),
            "dispatching cancellable scan"
        );

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(url = %url, "scan cancelled while in flight");
                Err(ScreenerError::Cancelled { url })
            }
            result = self.dispatch(prepared) => result,
        }
    }

    async fn dispatch(&self, request: HttpRequest) -> Result<ScreenerResult, ScreenerError> {
        let url = request.url.clone();
        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|error| TransportError::Network {
                url: url.clone(),
                message: error.message().to_owned(),
                retryable: error.retryable(),
            })?;

        if !response.is_success() {
            warn!(url = %url, status = response.status, "scanner returned non-success status");
            return Err(TransportError::status(url, response.status, &response.body).into());
        }

        Ok(wire::decode_response(&response.body)?)
    }
}
