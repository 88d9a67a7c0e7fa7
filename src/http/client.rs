//! HTTP client with built-in retry logic and error classification.

use log::{debug, warn};
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::UcpError;

use super::retry::{backoff_delay, classify_status, classify_transport};

/// Header carrying the client-generated idempotency key on checkout attempts.
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// HTTP client with bounded retry for merchant API operations.
///
/// Retries are strictly sequential and only fire for errors classified as
/// transient ([`UcpError::is_retryable`]); all other failures surface on the
/// first attempt.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    max_attempts: usize,
    base_delay: Duration,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client, max_attempts: usize, base_delay: Duration) -> Self {
        Self {
            client,
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Returns a reference to the underlying reqwest Client.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Performs a GET request and deserializes the JSON response.
    /// Automatically retries on transient errors.
    #[tracing::instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, UcpError> {
        debug!("GET JSON from {}...", url);

        self.with_retry("GET JSON", || async {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(classify_transport)?;

            read_json(response).await
        })
        .await
    }

    /// Performs a GET request with query parameters and deserializes the
    /// JSON response. Automatically retries on transient errors.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_json_with_query<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, UcpError> {
        debug!("GET JSON from {} with query {:?}...", url, query);

        self.with_retry("GET JSON with query", || async {
            let response = self
                .client
                .get(url)
                .query(query)
                .send()
                .await
                .map_err(classify_transport)?;

            read_json(response).await
        })
        .await
    }

    /// Performs a POST request carrying the given idempotency key and
    /// deserializes the JSON response.
    ///
    /// Every physical attempt of one call carries the same key, so a retry
    /// after a transient failure is recognized by the server as the same
    /// logical request and cannot create a duplicate side effect.
    #[tracing::instrument(skip(self, body))]
    pub async fn post_json<B, T>(
        &self,
        url: &str,
        body: &B,
        idempotency_key: &str,
    ) -> Result<T, UcpError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        debug!("POST JSON to {}...", url);

        self.with_retry("POST JSON", || async {
            let response = self
                .client
                .post(url)
                .header(IDEMPOTENCY_KEY_HEADER, idempotency_key)
                .json(body)
                .send()
                .await
                .map_err(classify_transport)?;

            read_json(response).await
        })
        .await
    }

    /// Executes an async operation with retry logic.
    ///
    /// Attempts run one at a time; the next attempt starts only after the
    /// prior attempt's outcome is classified as transient. Dropping the
    /// returned future at any await point abandons the loop.
    async fn with_retry<F, Fut, T>(&self, operation_name: &str, operation: F) -> Result<T, UcpError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, UcpError>>,
    {
        let mut last_error = None;

        for attempt in 1..=self.max_attempts {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if !e.is_retryable() {
                        debug!("{}: non-retryable error: {}", operation_name, e);
                        return Err(e);
                    }

                    if attempt < self.max_attempts {
                        let delay = backoff_delay(attempt, self.base_delay);
                        warn!(
                            "{}: attempt {}/{} failed ({}), retrying in {}ms...",
                            operation_name,
                            attempt,
                            self.max_attempts,
                            e,
                            delay.as_millis()
                        );
                        tokio::time::sleep(delay).await;
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            UcpError::Network(format!(
                "{}: failed after {} attempts",
                operation_name, self.max_attempts
            ))
        }))
    }
}

/// Reads a response body, classifying rejections and shape mismatches.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, UcpError> {
    let status = response.status();
    let body = response.text().await.map_err(classify_transport)?;

    if !status.is_success() {
        return Err(classify_status(status, &body));
    }

    serde_json::from_str(&body)
        .map_err(|e| UcpError::Protocol(format!("response does not match the expected shape: {}", e)))
}
