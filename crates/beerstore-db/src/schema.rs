//! The `beer` table definition.

use rusqlite::Connection;

const SCHEMA: &str = include_str!("schema.sql");

/// Creates the `beer` table if it does not exist yet.
///
/// Safe to call on every startup; an existing table and its rows are left
/// alone.
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)?;
    tracing::debug!("beer schema ready");
    Ok(())
}
