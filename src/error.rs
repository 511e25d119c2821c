use std::backtrace::Backtrace;
use std::error::Error as StdError;
use std::fmt;

use reqwest::header::InvalidHeaderValue;

/// Broad category of an [`Error`].
#[non_exhaustive]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Kind {
    /// Caller-supplied input or configuration was rejected before any I/O happened.
    Validation,
    /// The document could not be encoded to JSON.
    Serialization,
    /// The HTTP request could not be completed.
    Transport,
    /// The caller cancelled the operation while it was waiting for a permit.
    Cancelled,
}

#[derive(Debug)]
pub struct Error {
    kind: Kind,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
    backtrace: Backtrace,
}

impl Error {
    pub fn with_source<S: StdError + Send + Sync + 'static>(kind: Kind, source: S) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
            backtrace: Backtrace::capture(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// `true` for the failures that happen while producing or shipping the request body.
    #[must_use]
    pub fn is_io(&self) -> bool {
        matches!(self.kind, Kind::Serialization | Kind::Transport)
    }

    #[must_use]
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    #[must_use]
    pub fn inner(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        let e = self.source.as_deref()?;
        e.downcast_ref::<E>()
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Validation {
            reason: message.into(),
        }
        .into()
    }

    pub fn cancelled<S: Into<String>>(operation: S) -> Self {
        Cancelled {
            operation: operation.into(),
        }
        .into()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(src) => write!(f, "{:?}: {}", self.kind, src),
            None => write!(f, "{:?}", self.kind),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn StdError + 'static))
    }
}

/// Rejected input, with a human readable reason.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub reason: String,
}

impl fmt::Display for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid: {}", self.reason)
    }
}

impl StdError for Validation {}

/// The operation was abandoned because its cancellation token fired.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cancelled {
    pub operation: String,
}

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} was cancelled", self.operation)
    }
}

impl StdError for Cancelled {}

impl From<Validation> for Error {
    fn from(err: Validation) -> Self {
        Error::with_source(Kind::Validation, err)
    }
}

impl From<Cancelled> for Error {
    fn from(err: Cancelled) -> Self {
        Error::with_source(Kind::Cancelled, err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::with_source(Kind::Transport, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(Kind::Serialization, err)
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::with_source(Kind::Validation, err)
    }
}

impl From<InvalidHeaderValue> for Error {
    fn from(err: InvalidHeaderValue) -> Self {
        Error::with_source(Kind::Validation, err)
    }
}
