use std::fmt;
use std::io::Error as IoError;
use std::error::Error;
use std::time::Duration;

use hyper::Error as HyperError;
use serde::Deserialize;
use serde_json::Value;

use f5xc_config::ConfigError;
use f5xc_diff::DiffError;
use f5xc_metadata_client::{ErrorClass, MetadataClientError};

use crate::client::http::header::InvalidHeaderValue;
use crate::client::http::Error as HttpError;
use crate::client::http::InvalidUri;

/// error body returned by the F5XC api
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(default)]
struct ApiErrorBody {
    code: Option<Value>,
    message: String,
    details: Vec<Value>,
}

/// non success response from the api
#[derive(Debug, Clone, PartialEq)]
pub struct ApiStatus {
    pub status: u16,
    pub code: Option<Value>,
    pub message: String,
    pub details: Vec<Value>,
}

impl ApiStatus {
    /// decode error body, falling back to the raw text when it isn't json
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        match serde_json::from_slice::<ApiErrorBody>(body) {
            Ok(parsed) if !parsed.message.is_empty() || parsed.code.is_some() => Self {
                status,
                code: parsed.code,
                message: parsed.message,
                details: parsed.details,
            },
            _ => Self {
                status,
                code: None,
                message: String::from_utf8_lossy(body).trim().to_owned(),
                details: vec![],
            },
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.status == 429 || self.status >= 500
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }
}

impl fmt::Display for ApiStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "api error {} ({}): {}", self.status, code, self.message),
            None => write!(f, "api error {}: {}", self.status, self.message),
        }
    }
}

#[non_exhaustive]
#[derive(Debug)]
pub enum ClientError {
    IoError(IoError),
    JsonError(serde_json::Error),
    DiffError(DiffError),
    HttpError(HttpError),
    InvalidUri(InvalidUri),
    /// name or namespace that can't be a single path segment
    InvalidSegment { field: &'static str, value: String },
    InvalidHttpHeader(InvalidHeaderValue),
    ConfigError(ConfigError),
    HyperError(HyperError),
    TlsError(rustls::Error),
    Timeout(Duration),
    Api(ApiStatus),
    Other(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(status) => Some(status.status),
            _ => None,
        }
    }

    /// worth sending again: throttling, server side failures and lost connections
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Api(status) => status.is_retryable(),
            Self::HyperError(err) => !err.is_user(),
            Self::Timeout(_) => true,
            _ => false,
        }
    }
}

impl Error for ClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::IoError(err) => Some(err),
            Self::JsonError(err) => Some(err),
            Self::DiffError(err) => Some(err),
            Self::HttpError(err) => Some(err),
            Self::InvalidUri(err) => Some(err),
            Self::InvalidSegment { .. } => None,
            Self::InvalidHttpHeader(err) => Some(err),
            Self::ConfigError(err) => Some(err),
            Self::HyperError(err) => Some(err),
            Self::TlsError(err) => Some(err),
            Self::Timeout(_) => None,
            Self::Api(_) => None,
            Self::Other(_) => None,
        }
    }
}

impl From<IoError> for ClientError {
    fn from(error: IoError) -> Self {
        Self::IoError(error)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(error: serde_json::Error) -> Self {
        Self::JsonError(error)
    }
}

impl From<DiffError> for ClientError {
    fn from(error: DiffError) -> Self {
        Self::DiffError(error)
    }
}

impl From<HttpError> for ClientError {
    fn from(error: HttpError) -> Self {
        Self::HttpError(error)
    }
}

impl From<InvalidUri> for ClientError {
    fn from(error: InvalidUri) -> Self {
        Self::InvalidUri(error)
    }
}

impl From<InvalidHeaderValue> for ClientError {
    fn from(error: InvalidHeaderValue) -> Self {
        Self::InvalidHttpHeader(error)
    }
}

impl From<ConfigError> for ClientError {
    fn from(error: ConfigError) -> Self {
        Self::ConfigError(error)
    }
}

impl From<HyperError> for ClientError {
    fn from(error: HyperError) -> Self {
        Self::HyperError(error)
    }
}

impl From<rustls::Error> for ClientError {
    fn from(error: rustls::Error) -> Self {
        Self::TlsError(error)
    }
}

impl From<ApiStatus> for ClientError {
    fn from(status: ApiStatus) -> Self {
        Self::Api(status)
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::IoError(err) => write!(f, "{}", err),
            Self::JsonError(err) => write!(f, "{}", err),
            Self::DiffError(err) => write!(f, "{}", err),
            Self::HttpError(err) => write!(f, "{}", err),
            Self::InvalidUri(err) => write!(f, "{}", err),
            Self::InvalidSegment { field, value } => {
                write!(f, "{} {:?} is not a valid path segment", field, value)
            }
            Self::InvalidHttpHeader(err) => write!(f, "{}", err),
            Self::ConfigError(err) => write!(f, "{}", err),
            Self::HyperError(err) => write!(f, "{}", err),
            Self::TlsError(err) => write!(f, "tls: {}", err),
            Self::Timeout(after) => write!(f, "request timed out after {:?}", after),
            Self::Api(status) => write!(f, "{}", status),
            Self::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl MetadataClientError for ClientError {
    fn classify(&self) -> ErrorClass {
        match self {
            Self::Api(status) => match status.status {
                404 => ErrorClass::NotFound,
                409 => ErrorClass::Conflict,
                400 | 422 => ErrorClass::Validation,
                401 | 403 => ErrorClass::Auth,
                _ => ErrorClass::Other,
            },
            Self::InvalidSegment { .. } => ErrorClass::Validation,
            Self::HyperError(_) | Self::IoError(_) | Self::Timeout(_) | Self::TlsError(_) => {
                ErrorClass::Transport
            }
            _ => ErrorClass::Other,
        }
    }

    fn status(&self) -> Option<u16> {
        ClientError::status(self)
    }
}
