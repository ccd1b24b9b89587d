//! Browser preference operations (privacy toggles and their policy state)

use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, OptionalExtension};

use super::helpers::parse_datetime;
use super::Database;
use crate::models::BrowserPref;

impl Database {
    /// Get a single browser preference row
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub fn get_browser_pref(&self, key: &str) -> Result<Option<BrowserPref>> {
        let pref = self
            .conn
            .query_row(
                "SELECT key, value, managed, updated_at FROM browser_prefs WHERE key = ?1",
                [key],
                Self::row_to_browser_pref,
            )
            .optional()?;
        Ok(pref)
    }

    /// Read a boolean preference, falling back to `default` when unset
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub fn get_bool_pref(&self, key: &str, default: bool) -> Result<bool> {
        Ok(self.get_browser_pref(key)?.map_or(default, |pref| pref.value))
    }

    /// Write a boolean preference. The policy flag of an existing row is left alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails
    pub fn set_bool_pref(&self, key: &str, value: bool) -> Result<()> {
        self.conn.execute(
            "INSERT INTO browser_prefs (key, value, managed, updated_at)
             VALUES (?1, ?2, 0, ?3)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at",
            params![key, i32::from(value), Utc::now().to_rfc3339()],
        )?;
        log::debug!("browser pref {key} = {value}");
        Ok(())
    }

    /// Whether a preference is currently pinned by policy
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub fn is_pref_managed(&self, key: &str) -> Result<bool> {
        Ok(self
            .get_browser_pref(key)?
            .is_some_and(|pref| pref.managed))
    }

    /// Apply (or lift) a policy on a preference
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails
    pub fn set_pref_managed(&self, key: &str, managed: bool, value: bool) -> Result<()> {
        self.conn.execute(
            "INSERT INTO browser_prefs (key, value, managed, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                managed = excluded.managed,
                updated_at = excluded.updated_at",
            params![
                key,
                i32::from(value),
                i32::from(managed),
                Utc::now().to_rfc3339()
            ],
        )?;
        log::info!("Policy for {key}: managed={managed}, value={value}");
        Ok(())
    }

    /// List every stored browser preference, ordered by key
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub fn list_browser_prefs(&self) -> Result<Vec<BrowserPref>> {
        let mut stmt = self.conn.prepare(
            "SELECT key, value, managed, updated_at FROM browser_prefs ORDER BY key",
        )?;

        let prefs = stmt
            .query_map([], Self::row_to_browser_pref)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(prefs)
    }

    fn row_to_browser_pref(row: &rusqlite::Row) -> rusqlite::Result<BrowserPref> {
        Ok(BrowserPref {
            key: row.get(0)?,
            value: row.get::<_, i32>(1)? != 0,
            managed: row.get::<_, i32>(2)? != 0,
            updated_at: parse_datetime(&row.get::<_, String>(3)?)?,
        })
    }
}
