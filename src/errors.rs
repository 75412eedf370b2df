use std::fmt;

/// Message shown when `GET /meta` answers with a non-success status.
pub const META_FETCH_FAILED: &str = "Failed to fetch /meta";

/// Message shown when `POST /predict` fails without a usable `detail`.
pub const PREDICTION_FAILED: &str = "Prediction failed";

/// Message shown when an in-flight prediction is aborted.
pub const PREDICTION_CANCELLED: &str = "Prediction cancelled";

/// Application-specific error types.
///
/// `Display` renders the exact message the views put in front of the user, so no
/// variant adds a prefix of its own.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// `GET /meta` returned a non-success status.
    MetadataFetch,
    /// `POST /predict` returned a non-success status. Carries the backend `detail`
    /// or the generic prediction failure message.
    Prediction(String),
    /// The request never produced an HTTP response, or its body could not be read.
    Transport(String),
    /// Client-side validation rejected the form before any request was made.
    Validation(String),
    /// The in-flight prediction was aborted by the user.
    Cancelled,
    /// The action is not available in the current page state (e.g. submitting
    /// while a prediction is already running).
    Unavailable(String),
    /// Invalid runtime configuration.
    Config(String),
}

impl fmt::Display for AppError {
    /// Formats the error for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::MetadataFetch => f.write_str(META_FETCH_FAILED),
            AppError::Prediction(msg) => f.write_str(msg),
            AppError::Transport(msg) => f.write_str(msg),
            AppError::Validation(msg) => f.write_str(msg),
            AppError::Cancelled => f.write_str(PREDICTION_CANCELLED),
            AppError::Unavailable(msg) => f.write_str(msg),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<reqwest::Error> for AppError {
    /// Converts a `reqwest::Error` into an `AppError`.
    fn from(err: reqwest::Error) -> Self {
        AppError::Transport(err.to_string())
    }
}
