use std::str::FromStr as _;
use std::time::Duration;

use bon::bon;
use url::Url;

use crate::Result;
use crate::documents::policy::AdmissionPolicy;
use crate::error::Error;
use crate::rate_limit::TimeUnit;

pub const DEFAULT_ENDPOINT: &str = "https://ismp.crpt.ru/api/v3/lk/documents/create";

/// Raw values typically read from app-level config files or the environment.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub struct RawDocumentsConfig {
    pub time_unit: String,
    pub request_limit: u32,
    pub endpoint: Option<String>,
}

impl RawDocumentsConfig {
    #[must_use]
    pub fn new<S: Into<String>>(time_unit: S, request_limit: u32) -> Self {
        Self {
            time_unit: time_unit.into(),
            request_limit,
            endpoint: None,
        }
    }

    #[must_use]
    pub fn with_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }
}

/// Settings for a [`DocumentsClient`](crate::documents::DocumentsClient).
///
/// The limiter admits `request_limit` documents per one `time_unit`.
#[derive(Clone, Debug)]
pub struct DocumentsConfig {
    pub endpoint: Url,
    pub time_unit: TimeUnit,
    pub request_limit: u32,
    pub admission: AdmissionPolicy,
    pub request_timeout: Option<Duration>,
}

#[bon]
impl DocumentsConfig {
    #[builder]
    pub fn new(
        time_unit: TimeUnit,
        request_limit: u32,
        endpoint: Option<Url>,
        #[builder(default)] admission: AdmissionPolicy,
        request_timeout: Option<Duration>,
    ) -> Result<Self> {
        if request_limit == 0 {
            return Err(Error::validation(
                "request_limit must be positive, a zero limit would block every submission",
            ));
        }
        admission.validate()?;
        if request_timeout.is_some_and(|t| t.is_zero()) {
            return Err(Error::validation("request_timeout must be greater than zero"));
        }

        let endpoint = match endpoint {
            Some(url) => url,
            None => Url::parse(DEFAULT_ENDPOINT)?,
        };
        if !matches!(endpoint.scheme(), "https" | "http") {
            return Err(Error::validation(format!(
                "endpoint must be an http(s) URL, got scheme `{}`",
                endpoint.scheme()
            )));
        }

        Ok(Self {
            endpoint,
            time_unit,
            request_limit,
            admission,
            request_timeout,
        })
    }

    /// Production endpoint and default admission policy.
    pub fn with_limit(time_unit: TimeUnit, request_limit: u32) -> Result<Self> {
        Self::builder()
            .time_unit(time_unit)
            .request_limit(request_limit)
            .build()
    }

    pub fn from_raw(raw: RawDocumentsConfig) -> Result<Self> {
        let time_unit = TimeUnit::from_str(&raw.time_unit).map_err(|e| {
            Error::validation(format!("invalid time_unit `{}`: {e}", raw.time_unit))
        })?;
        let endpoint = raw.endpoint.as_deref().map(Url::parse).transpose()?;

        Self::builder()
            .time_unit(time_unit)
            .request_limit(raw.request_limit)
            .maybe_endpoint(endpoint)
            .build()
    }

    /// Length of one rate limit window: a single `time_unit`.
    #[must_use]
    pub fn window(&self) -> Duration {
        self.time_unit.window()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Kind;

    #[test]
    fn defaults_to_production_endpoint() {
        let config = DocumentsConfig::with_limit(TimeUnit::Seconds, 10).expect("valid config");

        assert_eq!(config.endpoint.as_str(), DEFAULT_ENDPOINT);
        assert_eq!(config.window(), Duration::from_secs(1));
        assert_eq!(config.admission, AdmissionPolicy::default());
        assert_eq!(config.request_timeout, None);
    }

    #[test]
    fn zero_limit_is_rejected() {
        let err = DocumentsConfig::with_limit(TimeUnit::Seconds, 0).expect_err("zero limit");
        assert_eq!(err.kind(), Kind::Validation);
    }

    #[test]
    fn builder_overrides() {
        let config = DocumentsConfig::builder()
            .time_unit(TimeUnit::Minutes)
            .request_limit(100)
            .endpoint(Url::parse("http://localhost:8080/create").expect("url"))
            .admission(AdmissionPolicy::Poll(Duration::from_millis(50)))
            .request_timeout(Duration::from_secs(5))
            .build()
            .expect("valid config");

        assert_eq!(config.endpoint.as_str(), "http://localhost:8080/create");
        assert_eq!(config.window(), Duration::from_secs(60));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn non_http_endpoint_is_rejected() {
        let err = DocumentsConfig::builder()
            .time_unit(TimeUnit::Seconds)
            .request_limit(1)
            .endpoint(Url::parse("ftp://example.com/create").expect("url"))
            .build()
            .expect_err("ftp endpoint");
        assert_eq!(err.kind(), Kind::Validation);
    }

    #[test]
    fn from_raw_parses_strings() {
        let config = DocumentsConfig::from_raw(
            RawDocumentsConfig::new("Seconds", 10).with_endpoint("https://example.com/create"),
        )
        .expect("valid raw config");

        assert_eq!(config.time_unit, TimeUnit::Seconds);
        assert_eq!(config.request_limit, 10);
        assert_eq!(config.endpoint.as_str(), "https://example.com/create");

        let err = DocumentsConfig::from_raw(RawDocumentsConfig::new("weeks", 10))
            .expect_err("unknown unit");
        assert_eq!(err.kind(), Kind::Validation);

        let err = DocumentsConfig::from_raw(
            RawDocumentsConfig::new("seconds", 10).with_endpoint("not a url"),
        )
        .expect_err("bad endpoint");
        assert_eq!(err.kind(), Kind::Validation);
    }
}
