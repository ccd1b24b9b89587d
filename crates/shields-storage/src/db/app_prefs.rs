//! App-level key/value preferences

use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use super::helpers::{parse_bool, parse_datetime};
use super::Database;
use crate::models::AppPref;

impl Database {
    /// Get the raw stored entry for an app preference
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub fn get_app_pref(&self, key: &str) -> Result<Option<AppPref>> {
        let pref = self
            .conn
            .query_row(
                "SELECT key, value, updated_at FROM app_prefs WHERE key = ?1",
                [key],
                |row| {
                    Ok(AppPref {
                        key: row.get(0)?,
                        value: row.get(1)?,
                        updated_at: parse_datetime(&row.get::<_, String>(2)?)?,
                    })
                },
            )
            .optional()?;
        Ok(pref)
    }

    fn put_app_pref(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO app_prefs (key, value, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Read a boolean app preference
    ///
    /// Malformed stored values are logged and treated as `default`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub fn get_app_bool(&self, key: &str, default: bool) -> Result<bool> {
        let Some(pref) = self.get_app_pref(key)? else {
            return Ok(default);
        };
        Ok(parse_bool(&pref.value).unwrap_or_else(|| {
            log::warn!("Ignoring malformed boolean for {key}: {:?}", pref.value);
            default
        }))
    }

    /// Write a boolean app preference
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails
    pub fn set_app_bool(&self, key: &str, value: bool) -> Result<()> {
        self.put_app_pref(key, if value { "true" } else { "false" })
    }

    /// Read an integer app preference
    ///
    /// Malformed stored values are logged and treated as unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub fn get_app_i64(&self, key: &str) -> Result<Option<i64>> {
        let Some(pref) = self.get_app_pref(key)? else {
            return Ok(None);
        };
        match pref.value.trim().parse::<i64>() {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                log::warn!("Ignoring malformed integer for {key}: {e}");
                Ok(None)
            }
        }
    }

    /// Write an integer app preference
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails
    pub fn set_app_i64(&self, key: &str, value: i64) -> Result<()> {
        self.put_app_pref(key, &value.to_string())
    }
}
