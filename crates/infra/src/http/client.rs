use std::time::Duration;

use clustersync_domain::{ApiError, ClusterSyncError, EndpointConfig, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{redirect, Client as ReqwestClient, Method, Request, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::time::sleep;
use tracing::{debug, instrument, warn};
use url::Url;

use super::response::parse_error_payload;
use crate::errors::IntoApiError;

/// Authenticated client for the control-plane REST API with bounded retry.
///
/// Every request is resolved against the endpoint's `/api/2.0/` base and
/// carries the bearer token. Transient failures are re-attempted after a
/// fixed delay, up to `max_retries` times.
#[derive(Clone)]
pub struct TransportClient {
    client: ReqwestClient,
    base_url: Url,
    max_retries: u32,
    retry_delay: Duration,
}

impl TransportClient {
    /// Build a client for `endpoint`.
    ///
    /// # Errors
    /// Returns `ClusterSyncError::Config` if the base URL or token cannot be
    /// used to build a client.
    pub fn new(endpoint: &EndpointConfig) -> Result<Self> {
        let base_url = Url::parse(endpoint.base_url()).map_err(|err| {
            ClusterSyncError::Config(format!("invalid base URL {}: {err}", endpoint.base_url()))
        })?;

        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", endpoint.token()))
            .map_err(|_| ClusterSyncError::Config("token is not a valid header value".into()))?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = ReqwestClient::builder()
            .timeout(endpoint.request_timeout)
            .default_headers(headers)
            .redirect(redirect::Policy::none())
            .no_proxy()
            .build()
            .map_err(|err| {
                ClusterSyncError::Config(format!("failed to build HTTP client: {err}"))
            })?;

        Ok(Self {
            client,
            base_url,
            max_retries: endpoint.max_retries,
            retry_delay: endpoint.retry_delay,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Total attempts per request (initial try + retries).
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Send one logical request and return the body of the 200 response.
    ///
    /// A `GET` payload is URL-encoded into the query string; any other
    /// method sends it as a JSON body. The payload is encoded once, before
    /// the first attempt.
    ///
    /// # Errors
    /// - `ClusterSyncError::InvalidRequest` if `path` cannot be resolved
    /// - `ClusterSyncError::Api` with the last attempt's error, unchanged,
    ///   once a permanent error occurs or the attempts run out
    #[instrument(skip_all, fields(method = %method, path = %path))]
    pub async fn execute<P>(
        &self,
        method: Method,
        path: &str,
        payload: Option<&P>,
    ) -> Result<Vec<u8>>
    where
        P: Serialize + ?Sized,
    {
        let url = self.resolve(path)?;
        let mut builder = self.client.request(method.clone(), url);
        if let Some(payload) = payload {
            builder = if method == Method::GET {
                builder.query(payload)
            } else {
                builder.json(payload)
            };
        }
        let template = builder.build().map_err(|err| err.into_api_error())?;

        let max_attempts = self.max_attempts();
        let mut attempt = 1u32;

        loop {
            let request = template.try_clone().ok_or_else(|| {
                ClusterSyncError::InvalidRequest("request body cannot be replayed".into())
            })?;

            debug!(attempt, max_attempts, "sending HTTP request");

            match self.send_once(request).await {
                Ok(body) => {
                    debug!(attempt, bytes = body.len(), "received HTTP 200");
                    return Ok(body);
                }
                Err(err) if err.is_transient() && attempt < max_attempts => {
                    warn!(
                        attempt,
                        max_attempts,
                        status = ?err.status(),
                        error = %err,
                        retry_in = ?self.retry_delay,
                        "transient failure, retrying"
                    );
                    sleep(self.retry_delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    if err.is_transient() {
                        warn!(attempt, status = ?err.status(), error = %err, "retries exhausted");
                    } else {
                        debug!(attempt, status = ?err.status(), error = %err, "permanent failure");
                    }
                    return Err(err.into());
                }
            }
        }
    }

    /// [`execute`](Self::execute) and decode the JSON body into `R`.
    ///
    /// # Errors
    /// Everything `execute` returns, plus `ClusterSyncError::Decode` if the
    /// body does not match `R`.
    pub async fn query<P, R>(&self, method: Method, path: &str, payload: Option<&P>) -> Result<R>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let body = self.execute(method, path, payload).await?;
        serde_json::from_slice(&body)
            .map_err(|err| ClusterSyncError::Decode(format!("{path}: {err}")))
    }

    /// Resolve `path` below the base URL. Anything that lands on another
    /// origin or outside the base path is rejected.
    fn resolve(&self, path: &str) -> Result<Url> {
        let url = self.base_url.join(path.trim_start_matches('/')).map_err(|err| {
            ClusterSyncError::InvalidRequest(format!("invalid path {path}: {err}"))
        })?;

        if url.origin() != self.base_url.origin() || !url.path().starts_with(self.base_url.path())
        {
            return Err(ClusterSyncError::InvalidRequest(format!(
                "path {path} resolves outside {}",
                self.base_url
            )));
        }
        Ok(url)
    }

    async fn send_once(&self, request: Request) -> std::result::Result<Vec<u8>, ApiError> {
        let response =
            self.client.execute(request).await.map_err(IntoApiError::into_api_error)?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().await.map_err(IntoApiError::into_api_error)?;

        if status == StatusCode::OK {
            return Ok(body.to_vec());
        }

        debug!(status = status.as_u16(), "received error response");
        let payload = parse_error_payload(content_type.as_deref(), &body);
        Err(ApiError::from_payload(status.as_u16(), payload))
    }
}
