//! Privacy preference screen.
//!
//! A UI-free model of the privacy settings page: which controls are shown,
//! what they display, and what happens when the user toggles one.

use anyhow::Result;

use crate::app::Application;
use crate::config::FeatureConfig;
use crate::error::PreferenceError;
use crate::prefs::PrivacyPref;
use crate::store::{read_pref, AppPreferences, PreferenceStore};
use crate::telemetry::{TelemetryEmitter, PREF_SEND_METRICS};

pub const SCREEN_TITLE: &str = "Privacy";
pub const TEXT_ON: &str = "On";
pub const TEXT_OFF: &str = "Off";
pub const SITE_SUGGESTIONS_TITLE: &str = "Site suggestions";
pub const SITE_SUGGESTIONS_SUMMARY: &str =
    "Show suggested sites and articles based on your browsing";
pub const REGIONAL_SUMMARY: &str = "Also block ads with a list tailored to your region";
pub const REGIONAL_SUMMARY_NO_LIST: &str = "No regional ad block list is available for your region";

/// Feature toggles that change the screen layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenOptions {
    pub contextual_search_available: bool,
    pub content_suggestions_settings: bool,
}

impl From<&FeatureConfig> for ScreenOptions {
    fn from(features: &FeatureConfig) -> Self {
        Self {
            contextual_search_available: features.contextual_search,
            content_suggestions_settings: features.content_suggestions_settings,
        }
    }
}

impl Default for ScreenOptions {
    fn default() -> Self {
        Self::from(&FeatureConfig::default())
    }
}

/// One row on the screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub pref: PrivacyPref,
    pub title: String,
    pub summary: Option<String>,
    pub checked: bool,
    pub enabled: bool,
    pub managed: bool,
    pub has_listener: bool,
}

impl Control {
    fn new(pref: PrivacyPref) -> Self {
        Self {
            pref,
            title: pref.title().to_string(),
            summary: None,
            checked: false,
            enabled: true,
            managed: false,
            has_listener: pref.is_checkbox(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceScreen {
    pub title: &'static str,
    controls: Vec<Control>,
}

impl PreferenceScreen {
    #[must_use]
    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    #[must_use]
    pub fn find(&self, pref: PrivacyPref) -> Option<&Control> {
        self.controls.iter().find(|c| c.pref == pref)
    }

    fn find_mut(&mut self, pref: PrivacyPref) -> Option<&mut Control> {
        self.controls.iter_mut().find(|c| c.pref == pref)
    }
}

/// Controller for the privacy screen. Lives as long as the screen is shown.
pub struct PrivacyPreferences<'a> {
    app: &'a mut Application,
    screen: PreferenceScreen,
}

impl<'a> PrivacyPreferences<'a> {
    /// Build the screen and load every control from storage
    ///
    /// # Errors
    ///
    /// Returns an error if preferences cannot be read
    pub fn create(app: &'a mut Application) -> Result<Self> {
        let options = app.screen_options;
        let mut controls = Vec::with_capacity(PrivacyPref::ALL.len());

        for pref in PrivacyPref::ALL {
            if pref == PrivacyPref::ContextualSearch && !options.contextual_search_available {
                continue;
            }

            let mut control = Control::new(pref);
            if pref == PrivacyPref::SearchSuggestions && options.content_suggestions_settings {
                control.title = SITE_SUGGESTIONS_TITLE.to_string();
                control.summary = Some(SITE_SUGGESTIONS_SUMMARY.to_string());
            }
            if pref.is_checkbox() {
                control.checked = load_checked(&app.store, pref)?;
                control.managed = controlled_by_policy(&app.store, pref)?;
            }
            controls.push(control);
        }

        let mut this = Self {
            app,
            screen: PreferenceScreen {
                title: SCREEN_TITLE,
                controls,
            },
        };
        this.update_summaries()?;

        log::debug!(
            "Privacy screen created with {} controls",
            this.screen.controls.len()
        );
        Ok(this)
    }

    #[must_use]
    pub fn screen(&self) -> &PreferenceScreen {
        &self.screen
    }

    /// Whether policy currently pins `pref`
    ///
    /// # Errors
    ///
    /// Returns an error if the policy state cannot be read
    pub fn is_controlled_by_policy(&self, pref: PrivacyPref) -> Result<bool> {
        controlled_by_policy(&self.app.store, pref)
    }

    /// Handle a user toggle. Returns whether the new value was accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the control is missing, pinned by policy, disabled,
    /// or the value cannot be stored
    pub fn on_preference_change(
        &mut self,
        pref: PrivacyPref,
        value: bool,
    ) -> Result<bool, PreferenceError> {
        let control = self
            .screen
            .find(pref)
            .ok_or(PreferenceError::NotOnScreen(pref.key()))?;
        if !control.has_listener {
            return Err(PreferenceError::NotToggleable(pref.key()));
        }
        if control.managed {
            return Err(PreferenceError::ManagedByPolicy(pref.key()));
        }
        if !control.enabled {
            return Err(PreferenceError::Disabled(pref.key()));
        }

        let app = &mut *self.app;
        if pref == PrivacyPref::SendMetrics {
            // Written straight to app prefs so the next send sees it
            TelemetryEmitter::set_opt_in(&app.store, value)?;
        } else {
            PreferenceStore::set_bool(&app.store, pref.key(), value)?;
            if let Some(telemetry) = pref.telemetry() {
                let outcome = app.telemetry.send_event_with(
                    &app.store,
                    telemetry.event,
                    telemetry.property,
                    &value,
                );
                log::debug!("{}: {outcome:?}", telemetry.event);
            }
        }

        if let Some(control) = self.screen.find_mut(pref) {
            control.checked = value;
        }
        log::info!("{pref} set to {value}");
        Ok(true)
    }

    /// Refresh displayed state when the screen comes back to the foreground
    ///
    /// # Errors
    ///
    /// Returns an error if preferences cannot be read
    pub fn on_resume(&mut self) -> Result<()> {
        self.update_summaries()
    }

    /// Reload values that may have changed behind the screen's back
    ///
    /// # Errors
    ///
    /// Returns an error if preferences cannot be read
    pub fn update_summaries(&mut self) -> Result<()> {
        let store = &self.app.store;

        for pref in [
            PrivacyPref::NavigationError,
            PrivacyPref::SearchSuggestions,
            PrivacyPref::SafeBrowsing,
            PrivacyPref::NetworkPredictions,
            PrivacyPref::SendMetrics,
        ] {
            let checked = load_checked(store, pref)?;
            let managed = controlled_by_policy(store, pref)?;
            if let Some(control) = self.screen.find_mut(pref) {
                control.checked = checked;
                control.managed = managed;
            }
        }

        if self.screen.find(PrivacyPref::ContextualSearch).is_some() {
            let enabled = read_pref(store, PrivacyPref::ContextualSearch)?;
            if let Some(control) = self.screen.find_mut(PrivacyPref::ContextualSearch) {
                control.summary = Some(if enabled { TEXT_ON } else { TEXT_OFF }.to_string());
            }
        }

        let regional_available = self.app.privacy.is_regional_ad_block_available();
        if let Some(control) = self.screen.find_mut(PrivacyPref::AdBlockRegional) {
            control.enabled = regional_available;
            control.summary = Some(
                if regional_available {
                    REGIONAL_SUMMARY
                } else {
                    REGIONAL_SUMMARY_NO_LIST
                }
                .to_string(),
            );
        }

        Ok(())
    }
}

fn load_checked(store: &shields_storage::Database, pref: PrivacyPref) -> Result<bool> {
    if pref == PrivacyPref::SendMetrics {
        AppPreferences::get_bool(store, PREF_SEND_METRICS, true)
    } else {
        read_pref(store, pref)
    }
}

fn controlled_by_policy(store: &dyn PreferenceStore, pref: PrivacyPref) -> Result<bool> {
    if !pref.policy_controllable() {
        return Ok(false);
    }
    store.is_managed(pref.key())
}

#[cfg(test)]
mod tests;
