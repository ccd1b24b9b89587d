use super::*;
use crate::privacy::PrivacyManager;
use crate::testing::{emitter, Recorder};
use serde_json::Value;
use shields_storage::Database;

fn app_with(privacy: PrivacyManager, options: ScreenOptions) -> (Application, Recorder) {
    let (telemetry, recorder, _) = emitter();
    let app = Application::new(Database::open_in_memory().unwrap(), telemetry, privacy, options);
    (app, recorder)
}

fn app() -> (Application, Recorder) {
    app_with(PrivacyManager::new(None), ScreenOptions::default())
}

fn regional_list() -> (tempfile::TempDir, PrivacyManager) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("regional.txt");
    std::fs::write(&path, "||ads.example^\n").unwrap();
    (dir, PrivacyManager::new(Some(path)))
}

// ============================================================================
// Screen creation
// ============================================================================

#[test]
fn test_create_loads_persisted_values() {
    let (mut app, _) = app();
    app.store.set_bool_pref("ad_block", false).unwrap();
    app.store.set_bool_pref("network_predictions", false).unwrap();
    app.store.set_app_bool(PREF_SEND_METRICS, false).unwrap();

    let screen = PrivacyPreferences::create(&mut app).unwrap();
    let screen = screen.screen();

    assert_eq!(screen.title, SCREEN_TITLE);
    assert!(!screen.find(PrivacyPref::AdBlock).unwrap().checked);
    assert!(!screen.find(PrivacyPref::NetworkPredictions).unwrap().checked);
    assert!(!screen.find(PrivacyPref::SendMetrics).unwrap().checked);
    assert!(screen.find(PrivacyPref::Httpse).unwrap().checked);
    assert!(!screen.find(PrivacyPref::FingerprintingProtection).unwrap().checked);
}

#[test]
fn test_create_attaches_listener_to_checkboxes() {
    let (mut app, _) = app();
    let screen = PrivacyPreferences::create(&mut app).unwrap();

    for control in screen.screen().controls() {
        assert_eq!(control.has_listener, control.pref.is_checkbox(), "{}", control.pref);
    }
    assert_eq!(screen.screen().controls().len(), PrivacyPref::ALL.len());
}

#[test]
fn test_contextual_search_removed_when_unavailable() {
    let options = ScreenOptions {
        contextual_search_available: false,
        content_suggestions_settings: false,
    };
    let (mut app, _) = app_with(PrivacyManager::new(None), options);
    let screen = PrivacyPreferences::create(&mut app).unwrap();

    assert!(screen.screen().find(PrivacyPref::ContextualSearch).is_none());
    assert_eq!(screen.screen().controls().len(), PrivacyPref::ALL.len() - 1);
}

#[test]
fn test_contextual_search_summary() {
    let (mut app, _) = app();
    let screen = PrivacyPreferences::create(&mut app).unwrap();
    let control = screen.screen().find(PrivacyPref::ContextualSearch).unwrap();
    assert_eq!(control.summary.as_deref(), Some(TEXT_ON));

    drop(screen);
    app.store.set_bool_pref("contextual_search", false).unwrap();
    let screen = PrivacyPreferences::create(&mut app).unwrap();
    let control = screen.screen().find(PrivacyPref::ContextualSearch).unwrap();
    assert_eq!(control.summary.as_deref(), Some(TEXT_OFF));
}

#[test]
fn test_site_suggestions_wording() {
    let options = ScreenOptions {
        contextual_search_available: true,
        content_suggestions_settings: true,
    };
    let (mut app, _) = app_with(PrivacyManager::new(None), options);
    let screen = PrivacyPreferences::create(&mut app).unwrap();

    let control = screen.screen().find(PrivacyPref::SearchSuggestions).unwrap();
    assert_eq!(control.title, SITE_SUGGESTIONS_TITLE);
    assert_eq!(control.summary.as_deref(), Some(SITE_SUGGESTIONS_SUMMARY));
}

// ============================================================================
// Change handler
// ============================================================================

#[test]
fn test_ad_block_change_emits_one_event() {
    let (mut app, recorder) = app();
    let mut screen = PrivacyPreferences::create(&mut app).unwrap();

    assert!(screen.on_preference_change(PrivacyPref::AdBlock, true).unwrap());
    assert!(screen.screen().find(PrivacyPref::AdBlock).unwrap().checked);
    drop(screen);

    let events = recorder.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].0, "Ad Block Option Changed");
    let properties = events[0].1.as_ref().unwrap();
    assert_eq!(properties.len(), 1);
    assert_eq!(properties["Ad Block"], Value::Bool(true));
    assert!(app.store.get_bool_pref("ad_block", false).unwrap());
}

#[test]
fn test_reported_prefs_emit_their_event() {
    let (_dir, privacy) = regional_list();
    let (mut app, recorder) = app_with(privacy, ScreenOptions::default());
    let mut screen = PrivacyPreferences::create(&mut app).unwrap();

    for pref in [
        PrivacyPref::FingerprintingProtection,
        PrivacyPref::Httpse,
        PrivacyPref::TrackingProtection,
        PrivacyPref::AdBlockRegional,
    ] {
        screen.on_preference_change(pref, false).unwrap();
    }

    let names: Vec<String> = recorder.events().into_iter().map(|(name, _)| name).collect();
    assert_eq!(
        names,
        vec![
            "Fingerprinting Protection Option Changed",
            "HTTPS Everywhere Option Changed",
            "Tracking Protection Mode Option Changed",
            "Regional Ad Block Option Changed",
        ]
    );
}

#[test]
fn test_unreported_prefs_are_silent() {
    let (mut app, recorder) = app();
    let mut screen = PrivacyPreferences::create(&mut app).unwrap();

    for pref in [
        PrivacyPref::NetworkPredictions,
        PrivacyPref::NavigationError,
        PrivacyPref::SearchSuggestions,
        PrivacyPref::SafeBrowsing,
    ] {
        assert!(screen.on_preference_change(pref, false).unwrap());
    }
    drop(screen);

    assert!(recorder.events().is_empty());
    assert!(!app.store.get_bool_pref("safe_browsing", true).unwrap());
    assert!(!app.store.get_bool_pref("navigation_error", true).unwrap());
}

#[test]
fn test_send_metrics_off_suppresses_later_events() {
    let (mut app, recorder) = app();
    let mut screen = PrivacyPreferences::create(&mut app).unwrap();

    screen.on_preference_change(PrivacyPref::AdBlock, false).unwrap();
    screen.on_preference_change(PrivacyPref::SendMetrics, false).unwrap();
    screen.on_preference_change(PrivacyPref::AdBlock, true).unwrap();
    screen.on_preference_change(PrivacyPref::Httpse, false).unwrap();
    drop(screen);

    assert_eq!(recorder.events().len(), 1);
    assert!(app.telemetry.has_client());
    assert!(!app.store.get_app_bool(PREF_SEND_METRICS, true).unwrap());
    // the opt-in flag does not live in the browser pref store
    assert!(app.store.get_browser_pref(PREF_SEND_METRICS).unwrap().is_none());
}

#[test]
fn test_send_metrics_back_on_resumes_events() {
    let (mut app, recorder) = app();
    app.store.set_app_bool(PREF_SEND_METRICS, false).unwrap();
    let mut screen = PrivacyPreferences::create(&mut app).unwrap();

    screen.on_preference_change(PrivacyPref::AdBlock, false).unwrap();
    screen.on_preference_change(PrivacyPref::SendMetrics, true).unwrap();
    screen.on_preference_change(PrivacyPref::AdBlock, true).unwrap();

    assert_eq!(recorder.created(), 1);
    assert_eq!(recorder.events().len(), 1);
}

#[test]
fn test_managed_pref_rejects_change() {
    let (mut app, _) = app();
    app.store.set_pref_managed("safe_browsing", true, true).unwrap();
    let mut screen = PrivacyPreferences::create(&mut app).unwrap();

    assert!(screen.is_controlled_by_policy(PrivacyPref::SafeBrowsing).unwrap());
    assert!(screen.screen().find(PrivacyPref::SafeBrowsing).unwrap().managed);

    let err = screen
        .on_preference_change(PrivacyPref::SafeBrowsing, false)
        .unwrap_err();
    assert!(matches!(err, PreferenceError::ManagedByPolicy("safe_browsing")));
    drop(screen);
    assert!(app.store.get_bool_pref("safe_browsing", false).unwrap());
}

#[test]
fn test_policy_ignored_for_uncontrollable_pref() {
    let (mut app, _) = app();
    app.store.set_pref_managed("ad_block", true, true).unwrap();
    let mut screen = PrivacyPreferences::create(&mut app).unwrap();

    assert!(!screen.is_controlled_by_policy(PrivacyPref::AdBlock).unwrap());
    assert!(screen.on_preference_change(PrivacyPref::AdBlock, false).unwrap());
}

#[test]
fn test_contextual_search_not_toggleable() {
    let (mut app, _) = app();
    let mut screen = PrivacyPreferences::create(&mut app).unwrap();

    let err = screen
        .on_preference_change(PrivacyPref::ContextualSearch, false)
        .unwrap_err();
    assert!(matches!(err, PreferenceError::NotToggleable(_)));
}

#[test]
fn test_removed_control_not_on_screen() {
    let options = ScreenOptions {
        contextual_search_available: false,
        content_suggestions_settings: false,
    };
    let (mut app, _) = app_with(PrivacyManager::new(None), options);
    let mut screen = PrivacyPreferences::create(&mut app).unwrap();

    let err = screen
        .on_preference_change(PrivacyPref::ContextualSearch, true)
        .unwrap_err();
    assert!(matches!(err, PreferenceError::NotOnScreen(_)));
}

// ============================================================================
// Regional ad block and resume
// ============================================================================

#[test]
fn test_regional_disabled_without_list() {
    let (mut app, recorder) = app();
    let mut screen = PrivacyPreferences::create(&mut app).unwrap();

    let control = screen.screen().find(PrivacyPref::AdBlockRegional).unwrap();
    assert!(!control.enabled);
    assert_eq!(control.summary.as_deref(), Some(REGIONAL_SUMMARY_NO_LIST));

    let err = screen
        .on_preference_change(PrivacyPref::AdBlockRegional, false)
        .unwrap_err();
    assert!(matches!(err, PreferenceError::Disabled(_)));
    assert!(recorder.events().is_empty());
}

#[test]
fn test_regional_enabled_with_list() {
    let (_dir, privacy) = regional_list();
    let (mut app, _) = app_with(privacy, ScreenOptions::default());
    let screen = PrivacyPreferences::create(&mut app).unwrap();

    let control = screen.screen().find(PrivacyPref::AdBlockRegional).unwrap();
    assert!(control.enabled);
    assert_eq!(control.summary.as_deref(), Some(REGIONAL_SUMMARY));
}

#[test]
fn test_resume_picks_up_external_changes() {
    let (mut app, _) = app();
    let mut screen = PrivacyPreferences::create(&mut app).unwrap();
    assert!(screen.screen().find(PrivacyPref::NavigationError).unwrap().checked);

    // Policy lands while the screen is in the background
    screen
        .app
        .store
        .set_pref_managed("navigation_error", true, false)
        .unwrap();
    screen.on_resume().unwrap();

    let control = screen.screen().find(PrivacyPref::NavigationError).unwrap();
    assert!(!control.checked);
    assert!(control.managed);
}

#[test]
fn test_resume_reloads_send_metrics() {
    let (mut app, _) = app();
    let mut screen = PrivacyPreferences::create(&mut app).unwrap();
    assert!(screen.screen().find(PrivacyPref::SendMetrics).unwrap().checked);

    screen.app.store.set_app_bool(PREF_SEND_METRICS, false).unwrap();
    screen.on_resume().unwrap();

    let control = screen.screen().find(PrivacyPref::SendMetrics).unwrap();
    assert!(!control.checked);
    assert!(!control.managed);
}
