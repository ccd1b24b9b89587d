pub mod analytics;
pub mod app;
pub mod config;
pub mod error;
pub mod prefs;
pub mod privacy;
pub mod screen;
pub mod store;
pub mod telemetry;

#[cfg(test)]
mod testing;

pub use app::Application;
pub use error::{PreferenceError, TelemetryError};
pub use prefs::PrivacyPref;
pub use screen::{PreferenceScreen, PrivacyPreferences, ScreenOptions};
pub use telemetry::{SendOutcome, TelemetryEmitter};
