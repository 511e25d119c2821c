//! Client for the Chestny Znak (CRPT) document creation API with a built-in request
//! ceiling.
//!
//! ```rust,no_run
//! use crpt_api_client::documents::{Document, DocumentsClient, DocumentsConfig, Product, Signature};
//! use crpt_api_client::rate_limit::TimeUnit;
//!
//! # async fn run() -> crpt_api_client::Result<()> {
//! // At most 10 documents per second, shared by every clone of the client.
//! let client = DocumentsClient::new(DocumentsConfig::with_limit(TimeUnit::Seconds, 10)?)?;
//!
//! let document = Document::new("doc-1", "LP_INTRODUCE_GOODS")
//!     .with_product(Product::new("010461234567890121abc").with_tnved_code("6401100000"));
//! let signature = Signature::new("base64-detached-signature")?;
//!
//! let response = client.create_document(&document, &signature).await?;
//! println!("{response}");
//! # Ok(())
//! # }
//! ```
//!
//! The limiter is usable on its own through [`rate_limit::FixedWindowRateLimiter`].

pub mod documents;
pub mod error;
pub mod rate_limit;

use std::result::Result as StdResult;

use reqwest::header::HeaderMap;
use reqwest::{Client as ReqwestClient, Request};

use crate::documents::DocumentResponse;
use crate::error::Error;

pub type Result<T> = StdResult<T, Error>;

/// Sends `request` and reads the whole body.
///
/// Non-success statuses are logged, not turned into errors.
async fn request(
    client: &ReqwestClient,
    mut request: Request,
    headers: Option<HeaderMap>,
) -> Result<DocumentResponse> {
    #[cfg(feature = "tracing")]
    let method = request.method().clone();
    #[cfg(feature = "tracing")]
    let path = request.url().path().to_owned();

    if let Some(h) = headers {
        *request.headers_mut() = h;
    }

    let response = client.execute(request).await?;
    let status = response.status();
    let body = response.text().await?;

    #[cfg(feature = "tracing")]
    if status.is_success() {
        tracing::debug!(%status, %method, path = %path, "document request completed");
    } else {
        tracing::warn!(
            %status,
            %method,
            path = %path,
            body = %body,
            "document request returned a non-success status"
        );
    }

    Ok(DocumentResponse { status, body })
}
