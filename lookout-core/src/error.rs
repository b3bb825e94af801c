pub use reqwest::StatusCode;
use thiserror::Error;

use crate::config::ServiceId;

/// Every failure a single menu action can produce.
///
/// Request failures are classified once by the executor; input failures come
/// from the console. The menu loop turns any of them into one line of output.
#[derive(Debug, Error)]
pub enum LookoutError {
    /// HTTP 4xx: malformed request or unknown resource.
    #[error("request rejected with status {status}")]
    Client { status: StatusCode },

    /// HTTP 5xx: upstream failure, possibly transient.
    #[error("upstream failed with status {status}")]
    Server { status: StatusCode },

    /// Any other non-success status the transport handed back.
    #[error("unexpected status {status}")]
    UnexpectedStatus { status: StatusCode },

    /// No response was obtained (DNS, connect, timeout, reset).
    #[error("transport error: {0}")]
    Transport(String),

    /// The body did not match the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Empty or unknown crypto asset ID. Upstream answers 200 with `[]`.
    #[error("{0}")]
    EmptyAssetQuery(String),

    /// Non-numeric or out-of-range console input.
    #[error("{0}")]
    InputFormat(String),

    #[error(
        "No API key configured for service '{service}'.\n\
         Hint: run `lookout configure {service}` or set {}.",
        .service.env_var()
    )]
    MissingCredentials { service: ServiceId },
}

impl LookoutError {
    /// True for failures caused by the query itself, including the crypto
    /// empty-result case which upstream reports as a success.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Client { .. } | Self::EmptyAssetQuery(_))
    }

    /// Single line shown to the user at the menu boundary.
    pub fn user_message(&self) -> String {
        match self {
            Self::Client { .. } => "Error: Invalid or unknown query.".to_string(),
            Self::Server { .. } => "Server error occurred. Please try again later.".to_string(),
            Self::UnexpectedStatus { .. } => "Error: Unknown network error.".to_string(),
            Self::Transport(_) => {
                "Error: Could not reach the service. Check your connection.".to_string()
            }
            Self::Decode(_) => "Error: Received an unexpected response.".to_string(),
            Self::EmptyAssetQuery(msg) | Self::InputFormat(msg) => format!("Error: {msg}"),
            Self::MissingCredentials { service } => format!(
                "Error: No API key configured for {service} (run `lookout configure {service}`)."
            ),
        }
    }
}

/// Map a response status to its failure class. `Ok(())` for 2xx.
pub fn classify_status(status: StatusCode) -> Result<(), LookoutError> {
    match status.as_u16() {
        200..=299 => Ok(()),
        400..=499 => Err(LookoutError::Client { status }),
        500..=599 => Err(LookoutError::Server { status }),
        _ => Err(LookoutError::UnexpectedStatus { status }),
    }
}

impl From<reqwest::Error> for LookoutError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            // redact the query string, it carries API keys
            Self::Transport(err.without_url().to_string())
        }
    }
}
