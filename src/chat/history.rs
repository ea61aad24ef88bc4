use crate::db::HistoryRow;
use crate::llm::models::Message;

/// Stored rows as prior-turn context for the model, order preserved.
pub fn project_history(rows: &[HistoryRow]) -> Vec<Message> {
    rows.iter()
        .map(|row| Message::new(row.role, row.content.clone()))
        .collect()
}
