use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted browser preference row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserPref {
    pub key: String,
    pub value: bool,
    /// Pinned by enterprise/device policy; the user cannot change it
    pub managed: bool,
    pub updated_at: DateTime<Utc>,
}

/// A persisted app-level key/value entry (stored as text)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppPref {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}
