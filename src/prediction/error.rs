// Error taxonomy for a prediction request.
//
// ValidationError is raised before any network call. The other three kinds
// are produced at the client boundary from transport failures, non-2xx
// statuses, and malformed response bodies respectively.

use thiserror::Error;

/// Bad form input, detected while building the payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be a whole number, got '{value}'")]
    NotANumber { field: &'static str, value: String },

    #[error("{field} cannot be negative, got {value}")]
    Negative { field: &'static str, value: i64 },

    #[error("caption is required")]
    EmptyCaption,
}

/// Coarse classification used by the UI to pick an icon and wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Network,
    Server,
    Parse,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "ValidationError",
            ErrorKind::Network => "NetworkError",
            ErrorKind::Server => "ServerError",
            ErrorKind::Parse => "ParseError",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed prediction request, with a message fit for display.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// The request never got a response (refused, DNS, timeout, ...).
    #[error("Could not reach the prediction service: {message}")]
    Network { message: String },

    /// The server answered with a non-2xx status.
    #[error("Prediction service returned {status}: {message}")]
    Server { status: u16, message: String },

    /// The body was not JSON, or was missing/out-of-range fields.
    #[error("Malformed prediction response: {message}")]
    Parse { message: String },
}

impl PredictionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PredictionError::Validation(_) => ErrorKind::Validation,
            PredictionError::Network { .. } => ErrorKind::Network,
            PredictionError::Server { .. } => ErrorKind::Server,
            PredictionError::Parse { .. } => ErrorKind::Parse,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        PredictionError::Network {
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        PredictionError::Parse {
            message: message.into(),
        }
    }
}

/// Classify a reqwest failure. Decode errors are a parse problem; anything
/// else (connect, timeout, body read) means we never got a usable answer.
impl From<reqwest::Error> for PredictionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return PredictionError::parse(err.to_string());
        }
        if err.is_timeout() {
            return PredictionError::network(format!("request timed out ({err})"));
        }
        if let Some(status) = err.status() {
            return PredictionError::Server {
                status: status.as_u16(),
                message: err.to_string(),
            };
        }
        PredictionError::network(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_converts_with_kind() {
        let err: PredictionError = ValidationError::EmptyCaption.into();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "Invalid input: caption is required");
    }

    #[test]
    fn kind_names_match_taxonomy() {
        assert_eq!(PredictionError::network("x").kind().as_str(), "NetworkError");
        assert_eq!(PredictionError::parse("x").kind().as_str(), "ParseError");
        let server = PredictionError::Server {
            status: 500,
            message: "Model not loaded".into(),
        };
        assert_eq!(server.kind(), ErrorKind::Server);
        assert_eq!(
            server.to_string(),
            "Prediction service returned 500: Model not loaded"
        );
    }
}
