use std::fmt;
use std::str::FromStr;

use reqwest::StatusCode;
use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret as _, SecretString};
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::error::Error;

/// Participant block of a [`Document`].
#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    pub participant_inn: Option<String>,
}

impl Description {
    #[must_use]
    pub fn new<S: Into<String>>(participant_inn: S) -> Self {
        Self {
            participant_inn: Some(participant_inn.into()),
        }
    }
}

/// One marked product unit inside a [`Document`].
#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub certificate_document: Option<String>,
    pub certificate_document_date: Option<String>,
    pub certificate_document_number: Option<String>,
    pub owner_inn: Option<String>,
    pub producer_inn: Option<String>,
    pub production_date: Option<String>,
    pub tnved_code: Option<String>,
    pub uit_code: Option<String>,
    pub uitu_code: Option<String>,
}

impl Product {
    #[must_use]
    pub fn new<S: Into<String>>(uit_code: S) -> Self {
        Self {
            uit_code: Some(uit_code.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_certificate<S: Into<String>>(mut self, document: S, number: S, date: S) -> Self {
        self.certificate_document = Some(document.into());
        self.certificate_document_number = Some(number.into());
        self.certificate_document_date = Some(date.into());
        self
    }

    #[must_use]
    pub fn with_owner_inn<S: Into<String>>(mut self, owner_inn: S) -> Self {
        self.owner_inn = Some(owner_inn.into());
        self
    }

    #[must_use]
    pub fn with_producer_inn<S: Into<String>>(mut self, producer_inn: S) -> Self {
        self.producer_inn = Some(producer_inn.into());
        self
    }

    #[must_use]
    pub fn with_production_date<S: Into<String>>(mut self, production_date: S) -> Self {
        self.production_date = Some(production_date.into());
        self
    }

    #[must_use]
    pub fn with_tnved_code<S: Into<String>>(mut self, tnved_code: S) -> Self {
        self.tnved_code = Some(tnved_code.into());
        self
    }

    #[must_use]
    pub fn with_uitu_code<S: Into<String>>(mut self, uitu_code: S) -> Self {
        self.uitu_code = Some(uitu_code.into());
        self
    }
}

/// Body of `POST /api/v3/lk/documents/create`.
///
/// Unset fields are sent as `null`. `import_request` goes over the wire as
/// `importRequest`, the only camelCase key the endpoint expects.
#[non_exhaustive]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub description: Option<Description>,
    pub doc_id: Option<String>,
    pub doc_status: Option<String>,
    pub doc_type: Option<String>,
    #[serde(rename = "importRequest")]
    pub import_request: bool,
    pub owner_inn: Option<String>,
    pub participant_inn: Option<String>,
    pub producer_inn: Option<String>,
    pub production_date: Option<String>,
    pub production_type: Option<String>,
    pub products: Option<Vec<Product>>,
    pub reg_date: Option<String>,
    pub reg_number: Option<String>,
}

impl Document {
    #[must_use]
    pub fn new<S: Into<String>>(doc_id: S, doc_type: S) -> Self {
        Self {
            doc_id: Some(doc_id.into()),
            doc_type: Some(doc_type.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: Description) -> Self {
        self.description = Some(description);
        self
    }

    #[must_use]
    pub fn with_doc_status<S: Into<String>>(mut self, doc_status: S) -> Self {
        self.doc_status = Some(doc_status.into());
        self
    }

    #[must_use]
    pub const fn with_import_request(mut self, import_request: bool) -> Self {
        self.import_request = import_request;
        self
    }

    /// Sets owner, participant and producer INNs in one go.
    #[must_use]
    pub fn with_inns<S: Into<String>>(mut self, owner: S, participant: S, producer: S) -> Self {
        self.owner_inn = Some(owner.into());
        self.participant_inn = Some(participant.into());
        self.producer_inn = Some(producer.into());
        self
    }

    #[must_use]
    pub fn with_production<S: Into<String>>(mut self, date: S, production_type: S) -> Self {
        self.production_date = Some(date.into());
        self.production_type = Some(production_type.into());
        self
    }

    #[must_use]
    pub fn with_registration<S: Into<String>>(mut self, date: S, number: S) -> Self {
        self.reg_date = Some(date.into());
        self.reg_number = Some(number.into());
        self
    }

    /// Appends a product, keeping insertion order.
    #[must_use]
    pub fn with_product(mut self, product: Product) -> Self {
        self.products.get_or_insert_with(Vec::new).push(product);
        self
    }
}

/// Document signature sent in the `Signature` header.
///
/// Opaque to this crate; it is only checked for being non-blank and a legal header
/// value, and kept out of `Debug` output.
#[derive(Clone, Debug)]
pub struct Signature(SecretString);

impl Signature {
    pub fn new<S: Into<String>>(signature: S) -> Result<Self> {
        let signature = signature.into();
        if signature.trim().is_empty() {
            return Err(Error::validation("signature must not be empty"));
        }
        // Rejected here rather than at send time, when a permit is already taken.
        if HeaderValue::from_str(&signature).is_err() {
            return Err(Error::validation(
                "signature contains characters not allowed in an HTTP header",
            ));
        }

        Ok(Self(SecretString::from(signature)))
    }

    pub(crate) fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// `Signature` header value, flagged sensitive so it stays out of logs.
    pub(crate) fn header_value(&self) -> Result<HeaderValue> {
        let mut value = HeaderValue::from_str(self.expose())?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl FromStr for Signature {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Signature::new(s)
    }
}

/// What the service answered. The body is passed through untouched.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentResponse {
    pub status: StatusCode,
    pub body: String,
}

impl fmt::Display for DocumentResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.body)
    }
}
