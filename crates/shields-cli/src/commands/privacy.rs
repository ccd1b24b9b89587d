/// Privacy preference command handlers
use anyhow::Result;
use shields_core::config::parse_flag;
use shields_core::screen::Control;
use shields_core::{PrivacyPref, PrivacyPreferences};
use tabled::{Table, Tabled};

use super::Context;

#[derive(Tabled)]
struct ControlRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Summary")]
    summary: String,
}

impl From<&Control> for ControlRow {
    fn from(control: &Control) -> Self {
        let value = if control.pref.is_checkbox() {
            let label = if control.checked { "on" } else { "off" };
            label.to_string()
        } else {
            "-".to_string()
        };
        let state = if control.managed {
            "policy"
        } else if !control.enabled {
            "disabled"
        } else {
            ""
        };
        Self {
            key: control.pref.key().to_string(),
            title: control.title.clone(),
            value,
            state: state.to_string(),
            summary: control.summary.clone().unwrap_or_default(),
        }
    }
}

pub fn handle_privacy_show(ctx: &Context) -> Result<()> {
    let mut app = ctx.application()?;
    let screen = PrivacyPreferences::create(&mut app)?;

    println!("{}", screen.screen().title);
    let rows: Vec<ControlRow> = screen.screen().controls().iter().map(ControlRow::from).collect();
    println!("{}", Table::new(rows));
    Ok(())
}

#[derive(Tabled)]
struct StoredRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Value")]
    value: bool,
    #[tabled(rename = "Policy")]
    managed: bool,
    #[tabled(rename = "Updated")]
    updated_at: String,
}

pub fn handle_privacy_stored(ctx: &Context) -> Result<()> {
    let app = ctx.application()?;
    let prefs = app.store.list_browser_prefs()?;

    if prefs.is_empty() {
        println!("No preferences stored yet (all defaults)");
        return Ok(());
    }

    let rows: Vec<StoredRow> = prefs
        .iter()
        .map(|pref| StoredRow {
            key: pref.key.clone(),
            value: pref.value,
            managed: pref.managed,
            updated_at: pref.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
        .collect();
    println!("{}", Table::new(rows));
    Ok(())
}

pub fn handle_privacy_set(ctx: &Context, key: &str, value: &str) -> Result<()> {
    let pref: PrivacyPref = key.parse()?;
    let value = parse_flag(value)?;

    let mut app = ctx.application()?;
    let mut screen = PrivacyPreferences::create(&mut app)?;
    screen.on_preference_change(pref, value)?;

    println!("{pref} = {value}");
    Ok(())
}

pub fn handle_privacy_policy(ctx: &Context, key: &str, value: &str, lift: bool) -> Result<()> {
    let pref: PrivacyPref = key.parse()?;
    if !pref.policy_controllable() {
        anyhow::bail!("{pref} cannot be controlled by policy");
    }
    let value = parse_flag(value)?;

    let app = ctx.application()?;
    app.store.set_pref_managed(pref.key(), !lift, value)?;

    if lift {
        println!("Policy lifted for {pref} (value {value})");
    } else {
        println!("{pref} pinned to {value} by policy");
    }
    Ok(())
}
