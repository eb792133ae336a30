use reqwest::StatusCode;
use thiserror::Error;

pub type SetupResult<T> = Result<T, SetupError>;

/// Errors raised while validating settings or talking to the ad server
#[derive(Debug, Error)]
pub enum SetupError {
    /// A required setting is absent
    #[error("Missing setting: {0}")]
    MissingSetting(String),
    /// A setting is present but malformed
    #[error("Bad setting: {0}")]
    BadSetting(String),
    /// A lookup by name returned nothing
    #[error("{kind} not found: {name}")]
    ObjectNotFound { kind: &'static str, name: String },
    /// An object we were asked to create already exists
    #[error("{kind} already exists: {name}")]
    ObjectExists { kind: &'static str, name: String },
    /// Ad server answered with a non-success status
    #[error("Upstream error ({status}): {message}")]
    Upstream { status: StatusCode, message: String },
    /// HTTP request error
    #[error("HTTP request error: {0}")]
    HttpRequest(#[from] reqwest::Error),
    /// Response body did not have the expected shape
    #[error("Decode error: {0}")]
    Decode(String),
}

impl SetupError {
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Self::ObjectNotFound {
            kind,
            name: name.into(),
        }
    }

    /// Whether this error came from settings validation rather than the ad server
    pub fn is_settings_error(&self) -> bool {
        matches!(self, Self::MissingSetting(_) | Self::BadSetting(_))
    }
}

impl From<serde_json::Error> for SetupError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(format!("JSON error: {}", err))
    }
}
