//! Error type shared by every resource domain.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Categorised error kinds for Azure operations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AzureErrorKind {
    Auth,
    NotFound,
    Conflict,
    Forbidden,
    RateLimit,
    BadRequest,
    ServerError,
    Network,
    Parse,
    Validation,
    MissingAttribute,
    NotAuthenticated,
    SubscriptionNotSet,
    Io,
    Upload,
}

impl fmt::Display for AzureErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auth => write!(f, "Authentication error"),
            Self::NotFound => write!(f, "Resource not found"),
            Self::Conflict => write!(f, "Resource conflict"),
            Self::Forbidden => write!(f, "Forbidden"),
            Self::RateLimit => write!(f, "Rate limit exceeded"),
            Self::BadRequest => write!(f, "Bad request"),
            Self::ServerError => write!(f, "Server error"),
            Self::Network => write!(f, "Network error"),
            Self::Parse => write!(f, "Parse error"),
            Self::Validation => write!(f, "Validation error"),
            Self::MissingAttribute => write!(f, "Missing attribute"),
            Self::NotAuthenticated => write!(f, "Not authenticated"),
            Self::SubscriptionNotSet => write!(f, "Subscription ID not set"),
            Self::Io => write!(f, "I/O error"),
            Self::Upload => write!(f, "Upload error"),
        }
    }
}

/// Main error type for Azure operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureError {
    pub kind: AzureErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl AzureError {
    pub fn new(kind: AzureErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code: None,
        }
    }

    pub fn with_status(kind: AzureErrorKind, message: impl Into<String>, status: u16) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code: Some(status),
        }
    }

    /// Map an HTTP failure onto a kind; the body is kept verbatim as the message.
    pub fn from_status(status: u16, body: &str) -> Self {
        let kind = match status {
            400 => AzureErrorKind::BadRequest,
            401 => AzureErrorKind::Auth,
            403 => AzureErrorKind::Forbidden,
            404 => AzureErrorKind::NotFound,
            409 => AzureErrorKind::Conflict,
            429 => AzureErrorKind::RateLimit,
            500..=599 => AzureErrorKind::ServerError,
            _ => AzureErrorKind::Network,
        };
        Self::with_status(kind, body.to_string(), status)
    }

    /// Every name in `missing` is listed, in the order given.
    pub fn missing_attributes(resource: &str, missing: &[&str]) -> Self {
        Self::new(
            AzureErrorKind::MissingAttribute,
            format!("{} is missing required attribute(s): {}", resource, missing.join(", ")),
        )
    }

    pub fn not_authenticated() -> Self {
        Self::new(
            AzureErrorKind::NotAuthenticated,
            "No access token available and no credentials to acquire one",
        )
    }

    pub fn subscription_not_set() -> Self {
        Self::new(AzureErrorKind::SubscriptionNotSet, "Subscription ID not configured")
    }

    pub fn parse(context: &str, err: impl fmt::Display) -> Self {
        Self::new(AzureErrorKind::Parse, format!("{context}: {err}"))
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == AzureErrorKind::NotFound
    }
}

impl fmt::Display for AzureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl std::error::Error for AzureError {}

impl From<std::io::Error> for AzureError {
    fn from(e: std::io::Error) -> Self {
        Self::new(AzureErrorKind::Io, e.to_string())
    }
}

impl From<AzureError> for String {
    fn from(e: AzureError) -> String {
        e.to_string()
    }
}

pub type AzureResult<T> = Result<T, AzureError>;
