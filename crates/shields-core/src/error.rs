use thiserror::Error;

/// Errors raised while handling a preference change
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("unknown preference key: {0}")]
    UnknownKey(String),

    #[error("preference {0} is managed by policy")]
    ManagedByPolicy(&'static str),

    #[error("preference {0} is not shown on this screen")]
    NotOnScreen(&'static str),

    #[error("preference {0} cannot be toggled from this screen")]
    NotToggleable(&'static str),

    #[error("preference {0} is currently disabled")]
    Disabled(&'static str),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Reasons a telemetry event was dropped after passing the opt-in gate
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to serialize event properties: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("event properties must serialize to a JSON object")]
    NotAnObject,

    #[error("failed to read preferences for event: {0}")]
    Preferences(String),

    #[error("analytics client error: {0}")]
    Client(String),
}
