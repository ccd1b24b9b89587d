//! The fixed set of privacy preferences shown on the privacy screen.

use crate::error::PreferenceError;

/// Telemetry description for a preference whose changes are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefTelemetry {
    pub event: &'static str,
    pub property: &'static str,
}

/// Privacy preference keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrivacyPref {
    NetworkPredictions,
    NavigationError,
    SearchSuggestions,
    ContextualSearch,
    SafeBrowsing,
    FingerprintingProtection,
    Httpse,
    TrackingProtection,
    AdBlock,
    AdBlockRegional,
    SendMetrics,
}

/// Browser pref read for the app-start snapshot; not shown on the privacy screen
pub const PREF_JAVASCRIPT: &str = "javascript";

impl PrivacyPref {
    /// Screen order
    pub const ALL: [Self; 11] = [
        Self::NetworkPredictions,
        Self::NavigationError,
        Self::SearchSuggestions,
        Self::ContextualSearch,
        Self::SafeBrowsing,
        Self::FingerprintingProtection,
        Self::Httpse,
        Self::TrackingProtection,
        Self::AdBlock,
        Self::AdBlockRegional,
        Self::SendMetrics,
    ];

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::NetworkPredictions => "network_predictions",
            Self::NavigationError => "navigation_error",
            Self::SearchSuggestions => "search_suggestions",
            Self::ContextualSearch => "contextual_search",
            Self::SafeBrowsing => "safe_browsing",
            Self::FingerprintingProtection => "fingerprinting_protection",
            Self::Httpse => "httpse",
            Self::TrackingProtection => "tracking_protection",
            Self::AdBlock => "ad_block",
            Self::AdBlockRegional => "ad_block_regional",
            Self::SendMetrics => "send_metrics",
        }
    }

    /// Value used when nothing has been persisted yet
    #[must_use]
    pub fn default_value(self) -> bool {
        self != Self::FingerprintingProtection
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::NetworkPredictions => "Prefetch pages for faster browsing",
            Self::NavigationError => "Suggest similar pages when a page can't be found",
            Self::SearchSuggestions => "Search and URL suggestions",
            Self::ContextualSearch => "Touch to Search",
            Self::SafeBrowsing => "Safe Browsing",
            Self::FingerprintingProtection => "Fingerprinting Protection",
            Self::Httpse => "HTTPS Everywhere",
            Self::TrackingProtection => "Tracking Protection",
            Self::AdBlock => "Ad Block",
            Self::AdBlockRegional => "Regional Ad Block",
            Self::SendMetrics => "Send anonymous usage statistics",
        }
    }

    /// Event reported when the user changes this preference
    #[must_use]
    pub fn telemetry(self) -> Option<PrefTelemetry> {
        let (event, property) = match self {
            Self::FingerprintingProtection => (
                "Fingerprinting Protection Option Changed",
                "Fingerprinting Protection",
            ),
            Self::Httpse => ("HTTPS Everywhere Option Changed", "HTTPS Everywhere"),
            Self::TrackingProtection => (
                "Tracking Protection Mode Option Changed",
                "Tracking Protection Mode",
            ),
            Self::AdBlock => ("Ad Block Option Changed", "Ad Block"),
            Self::AdBlockRegional => ("Regional Ad Block Option Changed", "Regional Ad Block"),
            _ => return None,
        };
        Some(PrefTelemetry { event, property })
    }

    /// Preferences an administrator policy may pin
    #[must_use]
    pub fn policy_controllable(self) -> bool {
        matches!(
            self,
            Self::NavigationError
                | Self::SearchSuggestions
                | Self::SafeBrowsing
                | Self::NetworkPredictions
        )
    }

    /// Whether the screen shows this preference as a checkbox.
    /// Contextual search is a link with an On/Off summary.
    #[must_use]
    pub fn is_checkbox(self) -> bool {
        self != Self::ContextualSearch
    }
}

impl std::fmt::Display for PrivacyPref {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for PrivacyPref {
    type Err = PreferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|pref| pref.key() == s)
            .ok_or_else(|| PreferenceError::UnknownKey(s.to_string()))
    }
}
