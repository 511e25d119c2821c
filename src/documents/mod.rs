//! Rate-limited submission of documents to the CRPT `documents/create` endpoint.
//!
//! The flow for every call is:
//! - wait for a permit from the shared fixed-window limiter
//! - serialize the [`Document`] to JSON
//! - `POST` it with `Accept`, `Content-Type` and `Signature` headers
//!
//! The response is handed back as-is; status codes are not interpreted.

mod client;
mod config;
mod policy;
mod types;

pub use client::DocumentsClient;
pub use config::{DEFAULT_ENDPOINT, DocumentsConfig, RawDocumentsConfig};
pub use policy::{AdmissionPolicy, DEFAULT_POLL_INTERVAL};
pub use types::{Description, Document, DocumentResponse, Product, Signature};
