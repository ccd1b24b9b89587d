//! Opt-in gated telemetry.
//!
//! The emitter owns at most one analytics client. The client is built lazily
//! on the first event sent while the user is opted in, and its identity is
//! rotated once the stored distinct-id timestamp is older than
//! [`DISTINCT_ID_REGENERATE_PERIOD_MS`]. Sending never fails from the
//! caller's point of view: every problem becomes a [`SendOutcome`].

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::analytics::{AnalyticsClient, ClientFactory};
use crate::error::TelemetryError;
use crate::store::{AppPreferences, FeatureSnapshot, PreferenceStore};

pub const PREF_SEND_METRICS: &str = "send_metrics";
pub const PREF_DISTINCT_ID_GENERATED_TIME: &str = "mixpanel_distinct_id_generated_time";
/// 60 days
pub const DISTINCT_ID_REGENERATE_PERIOD_MS: i64 = 60 * 24 * 60 * 60 * 1000;
pub const APP_START_EVENT: &str = "Brave App Start";

/// Source of wall-clock time in milliseconds since the epoch
pub trait Clock {
    fn now_millis(&self) -> i64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// What to do with the analytics identity when a client is created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityAction {
    Keep,
    /// No timestamp yet: record one
    Stamp,
    /// Identity expired: reset it and record a new timestamp
    ResetAndStamp,
}

/// Decide the identity action for a stored generation time (0 = never)
#[must_use]
pub fn identity_action(stored_millis: i64, now_millis: i64) -> IdentityAction {
    if stored_millis == 0 {
        IdentityAction::Stamp
    } else if stored_millis > 0
        && now_millis.saturating_sub(stored_millis) >= DISTINCT_ID_REGENERATE_PERIOD_MS
    {
        IdentityAction::ResetAndStamp
    } else {
        IdentityAction::Keep
    }
}

/// Result of a send call
#[must_use]
#[derive(Debug)]
pub enum SendOutcome {
    Sent,
    /// The user opted out of usage statistics
    OptedOut,
    /// No token configured or the client could not be built
    Unavailable,
    Dropped(TelemetryError),
}

impl SendOutcome {
    #[must_use]
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent)
    }
}

type Properties = Map<String, Value>;

/// Sends analytics events on behalf of the application
pub struct TelemetryEmitter {
    token: Option<String>,
    factory: Box<dyn ClientFactory>,
    clock: Box<dyn Clock>,
    client: Option<Box<dyn AnalyticsClient>>,
}

impl TelemetryEmitter {
    #[must_use]
    pub fn new(
        token: Option<String>,
        factory: Box<dyn ClientFactory>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            token,
            factory,
            clock,
            client: None,
        }
    }

    /// Whether the user allows usage statistics. Unreadable storage counts as opted out.
    #[must_use]
    pub fn opt_in(prefs: &dyn AppPreferences) -> bool {
        prefs.get_bool(PREF_SEND_METRICS, true).unwrap_or_else(|e| {
            log::debug!("Could not read {PREF_SEND_METRICS}, treating as opted out: {e}");
            false
        })
    }

    /// Persist the opt-in flag. Subsequent sends see it immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the flag cannot be written
    pub fn set_opt_in(prefs: &dyn AppPreferences, enabled: bool) -> Result<()> {
        prefs.set_bool(PREF_SEND_METRICS, enabled)?;
        log::info!(
            "Usage statistics {}",
            if enabled { "enabled" } else { "disabled" }
        );
        Ok(())
    }

    #[must_use]
    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }

    #[must_use]
    pub fn distinct_id(&self) -> Option<&str> {
        self.client.as_deref().map(|client| client.distinct_id())
    }

    /// Drop the current client; the next send builds a new one
    pub fn reset_client(&mut self) {
        self.client = None;
    }

    /// Build the analytics client if allowed and not built yet.
    ///
    /// Returns whether a client is available afterwards.
    pub fn ensure_client(&mut self, prefs: &dyn AppPreferences) -> bool {
        if self.client.is_some() {
            return true;
        }
        if !Self::opt_in(prefs) {
            return false;
        }
        let Some(token) = self.token.as_deref().filter(|t| !t.is_empty()) else {
            log::debug!("No analytics token configured");
            return false;
        };

        let mut client = match self.factory.create(token) {
            Ok(client) => client,
            Err(e) => {
                log::debug!("Failed to create analytics client: {e}");
                return false;
            }
        };

        let now = self.clock.now_millis();
        let stored = prefs
            .get_i64(PREF_DISTINCT_ID_GENERATED_TIME)
            .unwrap_or_else(|e| {
                log::debug!("Could not read {PREF_DISTINCT_ID_GENERATED_TIME}: {e}");
                None
            })
            .unwrap_or(0);

        match identity_action(stored, now) {
            IdentityAction::Keep => {}
            IdentityAction::Stamp => stamp_identity(prefs, now),
            IdentityAction::ResetAndStamp => {
                client.reset();
                stamp_identity(prefs, now);
            }
        }

        self.client = Some(client);
        true
    }

    /// Send an event with no properties
    pub fn send_event(&mut self, prefs: &dyn AppPreferences, event: &str) -> SendOutcome {
        self.dispatch(prefs, event, || Ok(None))
    }

    /// Send an event with a single property
    pub fn send_event_with<T: Serialize + ?Sized>(
        &mut self,
        prefs: &dyn AppPreferences,
        event: &str,
        property: &str,
        value: &T,
    ) -> SendOutcome {
        self.dispatch(prefs, event, || {
            let mut properties = Map::new();
            properties.insert(property.to_string(), serde_json::to_value(value)?);
            Ok(Some(properties))
        })
    }

    /// Send the app start event with a snapshot of the privacy toggles
    pub fn send_app_start_event(
        &mut self,
        prefs: &dyn AppPreferences,
        browser_prefs: &dyn PreferenceStore,
    ) -> SendOutcome {
        self.dispatch(prefs, APP_START_EVENT, || {
            let snapshot = FeatureSnapshot::capture(browser_prefs)
                .map_err(|e| TelemetryError::Preferences(e.to_string()))?;
            match serde_json::to_value(snapshot)? {
                Value::Object(properties) => Ok(Some(properties)),
                _ => Err(TelemetryError::NotAnObject),
            }
        })
    }

    fn dispatch<F>(&mut self, prefs: &dyn AppPreferences, event: &str, properties: F) -> SendOutcome
    where
        F: FnOnce() -> Result<Option<Properties>, TelemetryError>,
    {
        if !Self::opt_in(prefs) {
            log::debug!("Skipping {event}: usage statistics disabled");
            return SendOutcome::OptedOut;
        }
        if !self.ensure_client(prefs) {
            return SendOutcome::Unavailable;
        }
        let Some(client) = self.client.as_mut() else {
            return SendOutcome::Unavailable;
        };

        let properties = match properties() {
            Ok(properties) => properties,
            Err(e) => {
                log::debug!("Dropping {event}: {e}");
                return SendOutcome::Dropped(e);
            }
        };

        match client.track(event, properties.as_ref()) {
            Ok(()) => SendOutcome::Sent,
            Err(e) => {
                log::debug!("Dropping {event}: {e}");
                SendOutcome::Dropped(TelemetryError::Client(e.to_string()))
            }
        }
    }
}

fn stamp_identity(prefs: &dyn AppPreferences, now: i64) {
    if let Err(e) = prefs.set_i64(PREF_DISTINCT_ID_GENERATED_TIME, now) {
        log::debug!("Failed to store distinct id generation time: {e}");
    }
}
