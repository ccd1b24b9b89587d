/// Configuration management command handlers
use anyhow::Result;
use shields_core::config::Config;

use super::Context;

pub fn handle_config_get(ctx: &Context, key: &str) -> Result<()> {
    let config = ctx.config()?;
    match config.get(key)? {
        Some(v) => println!("{key} = {v}"),
        None => println!("{key} is not set"),
    }
    Ok(())
}

pub fn handle_config_set(ctx: &Context, key: &str, value: &str) -> Result<()> {
    let mut config = ctx.config()?;
    config.set(key, value)?;
    config.save(&ctx.config_path)?;
    if value.is_empty() {
        println!("Cleared {key}");
    } else {
        println!("Set {key} = {}", display_value(key, value));
    }
    Ok(())
}

pub fn handle_config_list(ctx: &Context) -> Result<()> {
    let config = ctx.config()?;

    println!("Configuration ({}):", ctx.config_path.display());
    println!("\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}\u{2550}");

    let mut section = "";
    for key in Config::KEYS {
        let (prefix, field) = key.split_once('.').unwrap_or(("", key));
        if prefix != section {
            println!("\n[{prefix}]");
            section = prefix;
        }
        match config.get(key)? {
            Some(v) => println!("  {field} = {}", display_value(key, &v)),
            None => println!("  {field} = (unset)"),
        }
    }

    Ok(())
}

/// Mask secrets for display
fn display_value(key: &str, value: &str) -> String {
    if key == "telemetry.token" {
        format!("{}***", value.chars().take(4).collect::<String>())
    } else {
        value.to_string()
    }
}
