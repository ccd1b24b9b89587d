/// Usage statistics command handlers
use anyhow::Result;
use chrono::{DateTime, Utc};
use shields_core::analytics::{read_journal, JournalEntry};
use shields_core::telemetry::{PREF_DISTINCT_ID_GENERATED_TIME, DISTINCT_ID_REGENERATE_PERIOD_MS};
use shields_core::{SendOutcome, TelemetryEmitter};
use tabled::{Table, Tabled};

use super::helpers::truncate_str;
use super::Context;

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Event")]
    event: String,
    #[tabled(rename = "Distinct ID")]
    distinct_id: String,
    #[tabled(rename = "Properties")]
    properties: String,
}

impl From<&JournalEntry> for EventRow {
    fn from(entry: &JournalEntry) -> Self {
        let properties = entry
            .properties
            .as_ref()
            .map(|p| serde_json::Value::Object(p.clone()).to_string())
            .unwrap_or_default();
        Self {
            time: entry.time.format("%Y-%m-%d %H:%M:%S").to_string(),
            event: entry.event.clone(),
            distinct_id: truncate_str(&entry.distinct_id, 8),
            properties: truncate_str(&properties, 60),
        }
    }
}

fn outcome_message(event: &str, outcome: &SendOutcome, distinct_id: Option<&str>) -> String {
    match outcome {
        SendOutcome::Sent => match distinct_id {
            Some(id) => format!("Sent: {event} (distinct id {id})"),
            None => format!("Sent: {event}"),
        },
        SendOutcome::OptedOut => "Not sent: usage statistics are disabled".to_string(),
        SendOutcome::Unavailable => {
            "Not sent: no analytics token configured (config set telemetry.token <token>)"
                .to_string()
        }
        SendOutcome::Dropped(e) => format!("Dropped: {e}"),
    }
}

fn report(event: &str, outcome: &SendOutcome, distinct_id: Option<&str>) {
    log::debug!("{event}: {outcome:?}");
    println!("{}", outcome_message(event, outcome, distinct_id));
}

pub fn handle_status(ctx: &Context) -> Result<()> {
    let config = ctx.config()?;
    let app = ctx.application()?;

    println!("Usage statistics");
    println!("\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}");
    println!(
        "Opt-in: {}",
        if TelemetryEmitter::opt_in(&app.store) {
            "enabled"
        } else {
            "disabled"
        }
    );
    println!(
        "Token: {}",
        match config.telemetry.token.as_deref() {
            Some(token) if !token.is_empty() => {
                format!("{}***", token.chars().take(4).collect::<String>())
            }
            _ => "not configured".to_string(),
        }
    );

    match app.store.get_app_i64(PREF_DISTINCT_ID_GENERATED_TIME)? {
        Some(stamp) if stamp > 0 => {
            let generated = DateTime::<Utc>::from_timestamp_millis(stamp)
                .map_or_else(|| stamp.to_string(), |dt| dt.to_rfc3339());
            let rotates = DateTime::<Utc>::from_timestamp_millis(
                stamp.saturating_add(DISTINCT_ID_REGENERATE_PERIOD_MS),
            )
            .map_or_else(|| "-".to_string(), |dt| dt.format("%Y-%m-%d").to_string());
            println!("Identity generated: {generated}");
            println!("Identity rotates after: {rotates}");
        }
        _ => println!("Identity generated: never"),
    }

    println!("Journal: {}", config.journal_path(&ctx.data_dir).display());
    Ok(())
}

pub fn handle_app_start(ctx: &Context) -> Result<()> {
    let mut app = ctx.application()?;
    let outcome = app.record_app_start();
    report(
        shields_core::telemetry::APP_START_EVENT,
        &outcome,
        app.telemetry.distinct_id(),
    );
    Ok(())
}

pub fn handle_send(ctx: &Context, event: &str) -> Result<()> {
    let mut app = ctx.application()?;
    let outcome = app.telemetry.send_event(&app.store, event);
    report(event, &outcome, app.telemetry.distinct_id());
    Ok(())
}

pub fn handle_events(ctx: &Context, limit: Option<usize>) -> Result<()> {
    let config = ctx.config()?;
    let entries = read_journal(&config.journal_path(&ctx.data_dir))?;

    if entries.is_empty() {
        println!("No events recorded");
        return Ok(());
    }

    let skip = limit.map_or(0, |n| entries.len().saturating_sub(n));
    let rows: Vec<EventRow> = entries.iter().skip(skip).map(EventRow::from).collect();
    println!("{}", Table::new(rows));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shields_core::config::Config;

    fn context_with_token(dir: &tempfile::TempDir) -> Context {
        let ctx = Context::resolve(Some(dir.path().to_path_buf())).unwrap();
        let mut config = Config::default();
        config.set("telemetry.token", "test-token").unwrap();
        config.save(&ctx.config_path).unwrap();
        ctx
    }

    #[test]
    fn test_sent_message_names_distinct_id() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context_with_token(&dir);
        let mut app = ctx.application().unwrap();

        let outcome = app.telemetry.send_event(&app.store, "Test Event");
        assert!(outcome.is_sent());

        let id = app.telemetry.distinct_id().unwrap().to_string();
        let message = outcome_message("Test Event", &outcome, app.telemetry.distinct_id());
        assert_eq!(message, format!("Sent: Test Event (distinct id {id})"));
    }

    #[test]
    fn test_unsent_messages() {
        assert_eq!(
            outcome_message("X", &SendOutcome::OptedOut, None),
            "Not sent: usage statistics are disabled"
        );
        assert!(outcome_message("X", &SendOutcome::Unavailable, None).contains("telemetry.token"));
    }

    #[test]
    fn test_send_writes_journal() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context_with_token(&dir);

        handle_send(&ctx, "Test Event").unwrap();

        let entries = read_journal(&ctx.config().unwrap().journal_path(&ctx.data_dir)).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].event, "Test Event");
    }
}
