use anyhow::Result;
use rusqlite::Connection;

/// Initialize database schema
///
/// # Errors
///
/// Returns an error if database table creation or index creation fails
pub fn init_schema(conn: &Connection) -> Result<()> {
    // Browser prefs table - privacy toggles, optionally pinned by policy
    conn.execute(
        "CREATE TABLE IF NOT EXISTS browser_prefs (
            key TEXT PRIMARY KEY,
            value INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    // Add new columns to existing browser_prefs table if they don't exist
    let columns_to_add = [("managed", "INTEGER NOT NULL DEFAULT 0")];

    for (column_name, column_type) in columns_to_add {
        let column_exists: Result<i32, rusqlite::Error> = conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM pragma_table_info('browser_prefs') WHERE name='{column_name}'"
            ),
            [],
            |row| row.get(0),
        );

        if column_exists.unwrap_or(0) == 0 {
            conn.execute(
                &format!("ALTER TABLE browser_prefs ADD COLUMN {column_name} {column_type}"),
                [],
            )?;
            log::info!("Added {column_name} column to browser_prefs table");
        }
    }

    // App prefs table - process-local key/value entries (opt-in flag, id timestamps)
    conn.execute(
        "CREATE TABLE IF NOT EXISTS app_prefs (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_browser_prefs_managed ON browser_prefs(managed)",
        [],
    )?;

    Ok(())
}
