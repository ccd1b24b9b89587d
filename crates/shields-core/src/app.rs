use anyhow::Result;
use shields_storage::Database;
use std::path::Path;

use crate::analytics::JournalClientFactory;
use crate::config::Config;
use crate::privacy::PrivacyManager;
use crate::screen::ScreenOptions;
use crate::telemetry::{SendOutcome, SystemClock, TelemetryEmitter};

/// Top-level application context. Owns the preference store and the
/// telemetry emitter (and through it, the analytics client).
pub struct Application {
    pub store: Database,
    pub telemetry: TelemetryEmitter,
    pub privacy: PrivacyManager,
    pub screen_options: ScreenOptions,
}

impl Application {
    #[must_use]
    pub fn new(
        store: Database,
        telemetry: TelemetryEmitter,
        privacy: PrivacyManager,
        screen_options: ScreenOptions,
    ) -> Self {
        Self {
            store,
            telemetry,
            privacy,
            screen_options,
        }
    }

    /// Wire up the application from a config and data directory
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened
    pub fn from_config(config: &Config, data_dir: &Path) -> Result<Self> {
        let store = Database::new(Some(data_dir.join("shields.db")))?;
        let factory = JournalClientFactory::new(config.journal_path(data_dir));
        let telemetry = TelemetryEmitter::new(
            config.telemetry.token.clone(),
            Box::new(factory),
            Box::new(SystemClock),
        );
        let privacy = PrivacyManager::new(config.adblock.regional_list.clone());

        Ok(Self::new(
            store,
            telemetry,
            privacy,
            ScreenOptions::from(&config.features),
        ))
    }

    /// Report an app start with the current privacy toggles
    pub fn record_app_start(&mut self) -> SendOutcome {
        self.telemetry
            .send_app_start_event(&self.store, &self.store)
    }
}
