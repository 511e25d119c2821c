use std::sync::Arc;
#[cfg(feature = "tracing")]
use std::time::Instant;

use reqwest::Client as ReqwestClient;
use reqwest::{Method, Request};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::Result;
use crate::documents::{AdmissionPolicy, Document, DocumentResponse, DocumentsConfig, Signature};
use crate::error::Error;
use crate::rate_limit::FixedWindowRateLimiter;

const SIGNATURE: &str = "signature";
const APPLICATION_JSON: &str = "application/json";

/// Rate-limited client for the document creation endpoint.
///
/// Clones share the limiter and the underlying connection pool, so one client can be
/// handed to many tasks and the request limit holds across all of them.
#[derive(Clone, Debug)]
pub struct DocumentsClient {
    endpoint: Url,
    admission: AdmissionPolicy,
    limiter: Arc<FixedWindowRateLimiter>,
    client: ReqwestClient,
}

impl DocumentsClient {
    pub fn new(config: DocumentsConfig) -> Result<Self> {
        let mut builder = ReqwestClient::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Self::with_client(config, builder.build()?)
    }

    /// Uses a caller-built HTTP client; `request_timeout` from the config is ignored.
    pub fn with_client(config: DocumentsConfig, client: ReqwestClient) -> Result<Self> {
        let limiter = FixedWindowRateLimiter::from_time_unit(config.time_unit, config.request_limit);
        Self::with_limiter_and_client(config, Arc::new(limiter), client)
    }

    /// Shares an existing limiter, e.g. to put several clients under one limit.
    ///
    /// The limiter's own threshold and window win over `time_unit`/`request_limit`.
    pub fn with_limiter_and_client(
        config: DocumentsConfig,
        limiter: Arc<FixedWindowRateLimiter>,
        client: ReqwestClient,
    ) -> Result<Self> {
        config.admission.validate()?;

        Ok(Self {
            endpoint: config.endpoint,
            admission: config.admission,
            limiter,
            client,
        })
    }

    #[must_use]
    pub fn limiter(&self) -> &FixedWindowRateLimiter {
        &self.limiter
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Waits for a permit, then posts `document` once.
    ///
    /// The body and headers are prepared before waiting, so a call that fails on its
    /// input never takes a permit. Any HTTP status counts as success; inspect
    /// [`DocumentResponse::status`] if it matters. Dropping the returned future before
    /// the permit is granted leaves the limiter untouched.
    pub async fn create_document(
        &self,
        document: &Document,
        signature: &Signature,
    ) -> Result<DocumentResponse> {
        let (request, headers) = self.prepare_request(document, signature)?;
        self.acquire_permit(None).await?;
        crate::request(&self.client, request, Some(headers)).await
    }

    /// Like [`create_document`](Self::create_document), but gives up with
    /// [`Kind::Cancelled`](crate::error::Kind::Cancelled) as soon as `cancel` fires
    /// while waiting for a permit.
    ///
    /// Once the permit is granted the request is sent regardless of the token.
    pub async fn create_document_with_cancellation(
        &self,
        document: &Document,
        signature: &Signature,
        cancel: &CancellationToken,
    ) -> Result<DocumentResponse> {
        let (request, headers) = self.prepare_request(document, signature)?;
        self.acquire_permit(Some(cancel)).await?;
        crate::request(&self.client, request, Some(headers)).await
    }

    /// Blocks the task until the limiter grants one permit.
    pub async fn acquire_permit(&self, cancel: Option<&CancellationToken>) -> Result<()> {
        #[cfg(feature = "tracing")]
        let started = Instant::now();
        #[cfg(feature = "tracing")]
        let mut attempts: u32 = 1;

        while !self.limiter.try_acquire() {
            let wait = self.admission.next_wait(&self.limiter);

            match cancel {
                Some(token) => {
                    tokio::select! {
                        () = token.cancelled() => {
                            #[cfg(feature = "tracing")]
                            tracing::debug!(attempts, "admission wait cancelled");
                            return Err(Error::cancelled("waiting for a rate limit permit"));
                        }
                        () = tokio::time::sleep(wait) => {}
                    }
                }
                None => tokio::time::sleep(wait).await,
            }

            #[cfg(feature = "tracing")]
            {
                attempts += 1;
            }
        }

        #[cfg(feature = "tracing")]
        if attempts > 1 {
            tracing::debug!(
                attempts,
                waited_ms = started.elapsed().as_millis(),
                "rate limit permit granted"
            );
        }

        Ok(())
    }

    fn prepare_request(
        &self,
        document: &Document,
        signature: &Signature,
    ) -> Result<(Request, HeaderMap)> {
        let body = serde_json::to_vec(document)?;

        let mut headers = HeaderMap::with_capacity(3);
        headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        headers.insert(HeaderName::from_static(SIGNATURE), signature.header_value()?);

        let request = self
            .client
            .request(Method::POST, self.endpoint.clone())
            .body(body)
            .build()?;

        Ok((request, headers))
    }
}
