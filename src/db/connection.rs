use crate::config::DatabaseConfig;
use duckdb::{Connection, Result as DbResult};
use std::sync::{Arc, Mutex};
use tracing::info;

pub type DbPool = Arc<Mutex<Connection>>;

const SCHEMA: &str = r#"
CREATE SEQUENCE IF NOT EXISTS seq_sessions_id;
CREATE SEQUENCE IF NOT EXISTS seq_messages_id;

CREATE TABLE IF NOT EXISTS sessions (
    id BIGINT PRIMARY KEY DEFAULT nextval('seq_sessions_id'),
    name VARCHAR NOT NULL,
    created_at VARCHAR NOT NULL
);

CREATE TABLE IF NOT EXISTS messages (
    id BIGINT PRIMARY KEY DEFAULT nextval('seq_messages_id'),
    session_id BIGINT NOT NULL REFERENCES sessions(id),
    content TEXT NOT NULL,
    role VARCHAR NOT NULL,
    created_at VARCHAR NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_messages_session ON messages(session_id, created_at);
"#;

/// Opens the database and returns it behind a shared handle.
///
/// The schema is not touched here; call [`ensure_schema`] once at startup.
pub fn get_connection(config: &DatabaseConfig) -> DbResult<DbPool> {
    let conn = if config.path == ":memory:" {
        info!("Opening in-memory DuckDB");
        Connection::open_in_memory()?
    } else {
        info!("Connecting to DuckDB at {}", config.path);
        Connection::open(&config.path)?
    };

    Ok(Arc::new(Mutex::new(conn)))
}

/// Creates the tables and sequences if they do not exist yet. Safe to call repeatedly.
pub fn ensure_schema(conn: &Connection) -> DbResult<()> {
    info!("Ensuring database schema");
    conn.execute_batch(SCHEMA)?;
    Ok(())
}
