//! Storage seams consumed by the screen controller and telemetry emitter.

use anyhow::Result;
use serde::Serialize;
use shields_storage::Database;

use crate::prefs::{PrivacyPref, PREF_JAVASCRIPT};

/// Browser preference store: boolean settings that policy may pin
pub trait PreferenceStore {
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read
    fn get_bool(&self, key: &str, default: bool) -> Result<bool>;

    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written
    fn set_bool(&self, key: &str, value: bool) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read
    fn is_managed(&self, key: &str) -> Result<bool>;
}

/// Process-local app preferences (opt-in flag, distinct id timestamp)
pub trait AppPreferences {
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read
    fn get_bool(&self, key: &str, default: bool) -> Result<bool>;

    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written
    fn set_bool(&self, key: &str, value: bool) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read
    fn get_i64(&self, key: &str) -> Result<Option<i64>>;

    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written
    fn set_i64(&self, key: &str, value: i64) -> Result<()>;
}

impl PreferenceStore for Database {
    fn get_bool(&self, key: &str, default: bool) -> Result<bool> {
        self.get_bool_pref(key, default)
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<()> {
        self.set_bool_pref(key, value)
    }

    fn is_managed(&self, key: &str) -> Result<bool> {
        self.is_pref_managed(key)
    }
}

impl AppPreferences for Database {
    fn get_bool(&self, key: &str, default: bool) -> Result<bool> {
        self.get_app_bool(key, default)
    }

    fn set_bool(&self, key: &str, value: bool) -> Result<()> {
        self.set_app_bool(key, value)
    }

    fn get_i64(&self, key: &str) -> Result<Option<i64>> {
        self.get_app_i64(key)
    }

    fn set_i64(&self, key: &str, value: i64) -> Result<()> {
        self.set_app_i64(key, value)
    }
}

/// Read a privacy preference with its default applied
///
/// # Errors
///
/// Returns an error if the store cannot be read
pub fn read_pref(store: &dyn PreferenceStore, pref: PrivacyPref) -> Result<bool> {
    store.get_bool(pref.key(), pref.default_value())
}

/// Feature toggles reported with the app start event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureSnapshot {
    #[serde(rename = "HTTPS Everywhere")]
    pub https_everywhere: bool,
    #[serde(rename = "Tracking Protection Mode")]
    pub tracking_protection: bool,
    #[serde(rename = "Ad Block")]
    pub ad_block: bool,
    #[serde(rename = "Regional Ad Block")]
    pub regional_ad_block: bool,
    #[serde(rename = "Fingerprinting Protection")]
    pub fingerprinting_protection: bool,
    #[serde(rename = "JavaScript")]
    pub javascript: bool,
}

impl FeatureSnapshot {
    /// Capture the current toggles
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read
    pub fn capture(store: &dyn PreferenceStore) -> Result<Self> {
        Ok(Self {
            https_everywhere: read_pref(store, PrivacyPref::Httpse)?,
            tracking_protection: read_pref(store, PrivacyPref::TrackingProtection)?,
            ad_block: read_pref(store, PrivacyPref::AdBlock)?,
            regional_ad_block: read_pref(store, PrivacyPref::AdBlockRegional)?,
            fingerprinting_protection: read_pref(store, PrivacyPref::FingerprintingProtection)?,
            javascript: store.get_bool(PREF_JAVASCRIPT, true)?,
        })
    }
}
