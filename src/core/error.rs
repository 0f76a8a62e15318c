//! Errors raised while wiring effects to a page.
//!
//! None of these are fatal: the runtime logs them and disables the affected
//! subsystem, leaving the rest of the page untouched.

/// Recoverable failures of the effects layer
#[derive(Debug, thiserror::Error)]
pub enum EffectError {
    #[error("required element not found: {selector}")]
    MissingElement { selector: &'static str },

    #[error("invalid effect settings: {0}")]
    InvalidSettings(#[source] serde_json::Error),

    #[error("invalid effect setting {field}: {reason}")]
    SettingOutOfRange {
        field: &'static str,
        reason: &'static str,
    },

    #[error("invalid technology catalogue: {0}")]
    InvalidCatalog(#[source] serde_json::Error),

    #[error("unknown theme: {0}")]
    UnknownTheme(String),

    #[error("preference storage unavailable: {0}")]
    Storage(String),

    #[error("failed to read settings file {path}: {message}")]
    SettingsFile { path: String, message: String },
}

pub type EffectResult<T> = Result<T, EffectError>;
