//! Error types for coinscope.

use thiserror::Error;

/// Result type alias for coinscope operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Classified failure of a fetch operation.
///
/// Every failure is terminal for the current command. Partial progress made
/// before the failure is discarded.
#[derive(Error, Debug)]
pub enum Error {
    /// The API rejected the key (HTTP 401).
    #[error("Authentication failed: the API key is missing, invalid, or not valid for this tier")]
    Auth,

    /// The API throttled the request (HTTP 429).
    #[error("Rate limited: the API request quota is exhausted, wait before trying again")]
    RateLimited,

    /// Any other HTTP error status.
    #[error("API error (HTTP {status}){}", message_suffix(.message))]
    Api {
        /// HTTP status code.
        status: u16,
        /// The API's own error message, if the body carried one.
        message: Option<String>,
    },

    /// No HTTP response was obtained.
    #[error("Network failure: {0}")]
    Network(String),

    /// Invalid caller input, detected before or instead of a request.
    #[error(transparent)]
    Input(#[from] InputError),

    /// The API answered with a body that does not match the expected schema.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl Error {
    /// Returns the process exit code for this failure kind.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Input(_) => 2,
            Self::Auth => 3,
            Self::RateLimited => 4,
            Self::Api { .. } => 5,
            Self::Network(_) => 6,
            Self::InvalidResponse(_) => 7,
        }
    }

    /// Returns a short name for the failure kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::RateLimited => "rate-limited",
            Self::Api { .. } => "api",
            Self::Network(_) => "network",
            Self::Input(_) => "input",
            Self::InvalidResponse(_) => "invalid-response",
        }
    }
}

fn message_suffix(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}

/// Invalid caller input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// Date not in `YYYY-MM-DD` form.
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    /// Day count below one.
    #[error("Invalid day count {0}: must be a positive integer")]
    NonPositiveDays(i64),

    /// Range start not strictly before its end.
    #[error("Invalid range: from ({from}) must be before to ({to})")]
    InvalidRange {
        /// Range start, epoch seconds.
        from: i64,
        /// Range end, epoch seconds.
        to: i64,
    },

    /// None of the requested symbols matched a coin.
    #[error("No coins found for symbols: {}", .0.join(", "))]
    NoSymbolsResolved(Vec<String>),

    /// The API returned no data for the request.
    #[error("No data returned for {0}")]
    EmptyResult(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message() {
        let err = Error::Api {
            status: 404,
            message: Some("coin not found".to_string()),
        };
        assert_eq!(err.to_string(), "API error (HTTP 404): coin not found");

        let err = Error::Api {
            status: 500,
            message: None,
        };
        assert_eq!(err.to_string(), "API error (HTTP 500)");
    }

    #[test]
    fn test_exit_codes_are_distinct() {
        let errors = [
            Error::Auth,
            Error::RateLimited,
            Error::Api {
                status: 500,
                message: None,
            },
            Error::Network("reset".to_string()),
            Error::Input(InputError::NonPositiveDays(0)),
            Error::InvalidResponse("eof".to_string()),
        ];
        let mut codes: Vec<i32> = errors.iter().map(Error::exit_code).collect();
        assert!(codes.iter().all(|&c| c != 0));
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_input_error_transparent() {
        let err: Error = InputError::NoSymbolsResolved(vec!["FOO".into(), "BAR".into()]).into();
        assert_eq!(err.to_string(), "No coins found for symbols: FOO, BAR");
        assert_eq!(err.kind(), "input");
    }
}
