use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Empty not allowed")]
    Empty,
    #[error("Maximum length exceeded. {max} allowed but found {actual}")]
    MaxExceeded { max: usize, actual: usize },
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
    #[error("No session cookie received")]
    MissingSessionToken,
    #[error(transparent)]
    Request(#[from] RequestError),
}

/// Failure of a request that reached (or tried to reach) the backend
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("{message}")]
    Status { status: StatusCode, message: String },
    #[error("failed to send request: {0}")]
    Network(String),
    #[error("failed to parse response body: {0}")]
    InvalidBody(String),
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Not authenticated")]
    Unauthenticated,
    #[error(transparent)]
    Request(#[from] RequestError),
}

impl AuthError {
    /// Returns `true` if the auth error is [`Rejected`].
    ///
    /// [`Rejected`]: AuthError::Rejected
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

impl RequestError {
    /// The HTTP status if the backend answered at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RequestError::Status { status, .. } => Some(*status),
            RequestError::Network(_) | RequestError::InvalidBody(_) => None,
        }
    }
}

impl ClientError {
    /// Returns `true` if the client error is [`Unauthenticated`].
    ///
    /// [`Unauthenticated`]: ClientError::Unauthenticated
    #[must_use]
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Unauthenticated)
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Unauthenticated => None,
            ClientError::Request(e) => e.status(),
        }
    }
}

/// Shape of the error body sent by the Service Layer
///
/// `{"error": {"code": -5002, "message": {"lang": "en-us", "value": "..."}}}`
/// Some versions send `message` as a plain string instead
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct ServiceLayerErrorBody {
    pub error: ServiceLayerError,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct ServiceLayerError {
    #[serde(default)]
    pub code: serde_json::Value,
    pub message: ServiceLayerMessage,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum ServiceLayerMessage {
    Plain(String),
    Localized {
        #[serde(default)]
        lang: Option<String>,
        value: String,
    },
}

impl ServiceLayerErrorBody {
    pub fn new<S: Into<String>>(code: i64, message: S) -> Self {
        Self {
            error: ServiceLayerError {
                code: code.into(),
                message: ServiceLayerMessage::Localized {
                    lang: Some("en-us".to_string()),
                    value: message.into(),
                },
            },
        }
    }

    /// Best effort extraction of the message from an error response body
    ///
    /// Returns `None` if the body is not in the expected shape or the message
    /// is blank
    pub fn message_from_body(body: &str) -> Option<String> {
        let parsed: Self = serde_json::from_str(body).ok()?;
        let message = match parsed.error.message {
            ServiceLayerMessage::Plain(value) | ServiceLayerMessage::Localized { value, .. } => {
                value
            }
        };
        if message.trim().is_empty() {
            None
        } else {
            Some(message)
        }
    }
}
