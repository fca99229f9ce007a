//! Error types for the Pasis client.
//!
//! Every failure surfaces as a single [`PasisError`] value. Callers branch on
//! [`PasisError::kind`] rather than on message text; status codes and the
//! server's sub-errors are available where the failure came from a response.

mod classify;

pub use classify::classify;

use thiserror::Error;

use crate::transport::TransportError;

/// Result type alias for Pasis operations.
pub type PasisResult<T> = Result<T, PasisError>;

/// Error returned by the Pasis API for a non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code of the response.
    pub status_code: u16,
    /// Message from the error envelope, or a synthesized status line.
    pub message: String,
    /// Sub-errors from the error envelope, in server order.
    pub errors: Vec<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(status_code: u16, message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
            errors,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.message.is_empty() {
            f.write_str(&self.message)
        } else if !self.errors.is_empty() {
            write!(f, "API error: {:?}", self.errors)
        } else {
            write!(f, "API error: status code {}", self.status_code)
        }
    }
}

impl std::error::Error for ApiError {}

/// Comprehensive error type for Pasis client operations.
#[derive(Debug, Error)]
pub enum PasisError {
    /// Invalid client configuration.
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },

    /// Credential invalid, expired or unobtainable.
    #[error("authentication error: {message}")]
    Authentication {
        /// Error message.
        message: String,
        /// The failure that caused the authentication error.
        #[source]
        source: Option<Box<PasisError>>,
    },

    /// Request rejected as invalid (HTTP 400/422, or client-side checks).
    #[error("validation error: {message}")]
    Validation {
        /// Error message.
        message: String,
        /// Sub-errors supplied by the server, verbatim.
        errors: Vec<String>,
        /// The API error this was classified from, if server-side.
        #[source]
        source: Option<ApiError>,
    },

    /// Any other non-2xx response.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// No response was obtained.
    #[error("{message}: {source}")]
    Transport {
        /// Error message.
        message: String,
        /// Underlying transport failure.
        #[source]
        source: TransportError,
    },

    /// A success response could not be decoded.
    #[error("{message}: {source}")]
    Decode {
        /// Error message.
        message: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A request body could not be encoded.
    #[error("failed to marshal request body: {source}")]
    Serialization {
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The caller's cancellation signal fired.
    #[error("request cancelled")]
    Cancelled,

    /// An error annotated with the operation that produced it.
    #[error("{context}: {source}")]
    Context {
        /// Operation description, e.g. `failed to deposit`.
        context: String,
        /// The wrapped error.
        #[source]
        source: Box<PasisError>,
    },
}

/// Coarse error classification for branching without string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`PasisError::Configuration`].
    Configuration,
    /// See [`PasisError::Authentication`].
    Authentication,
    /// See [`PasisError::Validation`].
    Validation,
    /// See [`PasisError::Api`].
    Api,
    /// See [`PasisError::Transport`].
    Transport,
    /// See [`PasisError::Decode`].
    Decode,
    /// See [`PasisError::Serialization`].
    Serialization,
    /// See [`PasisError::Cancelled`].
    Cancelled,
}

impl ErrorKind {
    /// Returns a stable lowercase label, used for metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Configuration => "configuration",
            ErrorKind::Authentication => "authentication",
            ErrorKind::Validation => "validation",
            ErrorKind::Api => "api",
            ErrorKind::Transport => "transport",
            ErrorKind::Decode => "decode",
            ErrorKind::Serialization => "serialization",
            ErrorKind::Cancelled => "cancelled",
        }
    }
}

impl PasisError {
    /// Returns the kind of this error, looking through operation context.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PasisError::Configuration { .. } => ErrorKind::Configuration,
            PasisError::Authentication { .. } => ErrorKind::Authentication,
            PasisError::Validation { .. } => ErrorKind::Validation,
            PasisError::Api(_) => ErrorKind::Api,
            PasisError::Transport { .. } => ErrorKind::Transport,
            PasisError::Decode { .. } => ErrorKind::Decode,
            PasisError::Serialization { .. } => ErrorKind::Serialization,
            PasisError::Cancelled => ErrorKind::Cancelled,
            PasisError::Context { source, .. } => source.kind(),
        }
    }

    /// Returns true if a repeat attempt could plausibly succeed.
    ///
    /// Only transport failures and 5xx API errors qualify.
    pub fn is_retryable(&self) -> bool {
        match self {
            PasisError::Transport { .. } => true,
            PasisError::Api(api) => api.status_code >= 500,
            PasisError::Context { source, .. } => source.is_retryable(),
            _ => false,
        }
    }

    /// Returns the HTTP status code of the response behind this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        self.api_error().map(|api| api.status_code)
    }

    /// Returns the server-supplied sub-errors, empty when there are none.
    pub fn sub_errors(&self) -> &[String] {
        match self {
            PasisError::Validation { errors, .. } => errors.as_slice(),
            _ => self.api_error().map_or(&[][..], |api| api.errors.as_slice()),
        }
    }

    /// Returns the API error this error was classified from, if any.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            PasisError::Api(api) => Some(api),
            PasisError::Validation { source, .. } => source.as_ref(),
            PasisError::Authentication {
                source: Some(source),
                ..
            }
            | PasisError::Context { source, .. } => source.api_error(),
            _ => None,
        }
    }

    /// Wraps transport and decode failures with the operation that produced
    /// them. Other errors are returned unchanged so callers can still match on
    /// them directly.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        match self {
            PasisError::Transport { .. } | PasisError::Decode { .. } => PasisError::Context {
                context: context.into(),
                source: Box::new(self),
            },
            other => other,
        }
    }

    /// Creates an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        PasisError::Authentication {
            message: message.into(),
            source: None,
        }
    }

    /// Wraps `source` in an authentication error unless it already is one.
    pub fn into_authentication(self, message: impl Into<String>) -> Self {
        match self {
            PasisError::Authentication { .. } | PasisError::Cancelled => self,
            other => PasisError::Authentication {
                message: message.into(),
                source: Some(Box::new(other)),
            },
        }
    }

    /// Creates a client-side validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        PasisError::Validation {
            message: message.into(),
            errors: Vec::new(),
            source: None,
        }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        PasisError::Configuration {
            message: message.into(),
        }
    }

    /// Creates a transport error.
    pub fn transport(message: impl Into<String>, source: TransportError) -> Self {
        PasisError::Transport {
            message: message.into(),
            source,
        }
    }

    /// Creates a decode error.
    pub fn decode(message: impl Into<String>, source: serde_json::Error) -> Self {
        PasisError::Decode {
            message: message.into(),
            source,
        }
    }
}

impl From<url::ParseError> for PasisError {
    fn from(err: url::ParseError) -> Self {
        PasisError::Configuration {
            message: format!("invalid base URL: {}", err),
        }
    }
}
