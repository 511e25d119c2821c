//! Submits 30 documents through a client limited to 10 per second.
//!
//! ```sh
//! RUST_LOG=crpt_api_client=debug cargo run --example create_documents --features tracing
//! ```
//!
//! Set `CRPT_ENDPOINT` to point at a sandbox instead of the production endpoint.

use std::env;
use std::time::Instant;

use crpt_api_client::documents::{
    Description, Document, DocumentsClient, DocumentsConfig, Product, RawDocumentsConfig, Signature,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut raw = RawDocumentsConfig::new("seconds", 10);
    if let Ok(endpoint) = env::var("CRPT_ENDPOINT") {
        raw = raw.with_endpoint(endpoint);
    }
    let client = DocumentsClient::new(DocumentsConfig::from_raw(raw)?)?;

    let document = Document::new("demo-1", "LP_INTRODUCE_GOODS")
        .with_description(Description::new("7700000000"))
        .with_inns("7700000000", "7700000000", "7700000000")
        .with_production("2024-01-15", "OWN_PRODUCTION")
        .with_product(Product::new("010461234567890121abc").with_tnved_code("6401100000"));
    let signature = Signature::new("signature123")?;

    let start = Instant::now();
    for i in 0..30 {
        match client.create_document(&document, &signature).await {
            Ok(response) => info!(
                i,
                status = %response.status,
                body = %response.body,
                elapsed_ms = start.elapsed().as_millis(),
                "document submitted"
            ),
            Err(e) => warn!(i, error = %e, "document submission failed"),
        }
    }

    let stats = client.limiter().stats();
    info!(
        admitted = stats.admitted,
        rejected_attempts = stats.rejected,
        windows = stats.window_rolls + 1,
        "done"
    );
    Ok(())
}
