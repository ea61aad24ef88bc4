use crate::db::models::{Message, Role, Session, SessionId};
use crate::db::StoreError;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use duckdb::{params, types::Type, Connection, Result as DbResult, Row};

pub struct DbService;

/// RFC 3339 in UTC with fixed precision, so text order matches time order.
fn now_timestamp() -> (String, DateTime<Utc>) {
    let now = Utc::now().trunc_subsecs(6);
    (now.to_rfc3339_opts(SecondsFormat::Micros, true), now)
}

fn parse_timestamp(idx: usize, raw: &str) -> DbResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| duckdb::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

impl DbService {
    fn row_to_session(row: &Row) -> DbResult<Session> {
        let created: String = row.get(2)?;
        Ok(Session {
            id: row.get(0)?,
            name: row.get(1)?,
            created_at: parse_timestamp(2, &created)?,
        })
    }

    fn row_to_message(row: &Row) -> DbResult<Message> {
        let role: String = row.get(3)?;
        let created: String = row.get(4)?;
        Ok(Message {
            id: row.get(0)?,
            session_id: row.get(1)?,
            content: row.get(2)?,
            role: role
                .parse::<Role>()
                .map_err(|e| duckdb::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?,
            created_at: parse_timestamp(4, &created)?,
        })
    }

    // --- Session Operations ---

    pub fn insert_session(conn: &Connection, name: &str) -> Result<Session, StoreError> {
        let (created_str, created_at) = now_timestamp();

        let id: SessionId = conn.query_row(
            "INSERT INTO sessions (name, created_at) VALUES (?, ?) RETURNING id",
            params![name, created_str],
            |row| row.get(0),
        )?;

        Ok(Session {
            id,
            name: name.to_string(),
            created_at,
        })
    }

    pub fn get_session(conn: &Connection, id: SessionId) -> Result<Option<Session>, StoreError> {
        let mut stmt = conn.prepare("SELECT id, name, created_at FROM sessions WHERE id = ?")?;
        let mut rows = stmt.query_map(params![id], Self::row_to_session)?;

        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    // --- Message Operations ---

    pub fn insert_message(
        conn: &Connection,
        session_id: SessionId,
        content: &str,
        role: Role,
    ) -> Result<Message, StoreError> {
        if Self::get_session(conn, session_id)?.is_none() {
            return Err(StoreError::SessionNotFound(session_id));
        }

        let (created_str, created_at) = now_timestamp();

        let id: i64 = conn.query_row(
            "INSERT INTO messages (session_id, content, role, created_at)
             VALUES (?, ?, ?, ?)
             RETURNING id",
            params![session_id, content, role.as_str(), created_str],
            |row| row.get(0),
        )?;

        Ok(Message {
            id,
            session_id,
            content: content.to_string(),
            role,
            created_at,
        })
    }

    /// All messages of a session, oldest first. Ties on the timestamp fall back to insertion order.
    pub fn get_history(conn: &Connection, session_id: SessionId) -> Result<Vec<Message>, StoreError> {
        let mut stmt = conn.prepare(
            "SELECT id, session_id, content, role, created_at
             FROM messages
             WHERE session_id = ?
             ORDER BY created_at ASC, id ASC",
        )?;

        let rows = stmt.query_map(params![session_id], Self::row_to_message)?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row?);
        }
        Ok(messages)
    }
}
