#[cfg(test)]
mod tests {
    use chatrelay::chat::MessageStore;
    use chatrelay::config::DatabaseConfig;
    use chatrelay::db::{connection, service::DbService, DbPool, DbStore, Role, StoreError};

    fn get_test_db() -> DbPool {
        let config = DatabaseConfig {
            path: ":memory:".to_string(),
        };
        let pool = connection::get_connection(&config).unwrap();
        connection::ensure_schema(&pool.lock().unwrap()).unwrap();
        pool
    }

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let pool = get_test_db();
        let conn = pool.lock().unwrap();
        connection::ensure_schema(&conn).unwrap();
        connection::ensure_schema(&conn).unwrap();
    }

    #[test]
    fn test_session_lifecycle() {
        let pool = get_test_db();
        let conn = pool.lock().unwrap();

        let first = DbService::insert_session(&conn, "Session").unwrap();
        let second = DbService::insert_session(&conn, "Other").unwrap();
        assert_eq!(first.name, "Session");
        assert_ne!(first.id, second.id);

        let fetched = DbService::get_session(&conn, first.id).unwrap().unwrap();
        assert_eq!(fetched.id, first.id);
        assert_eq!(fetched.name, "Session");
        assert_eq!(fetched.created_at, first.created_at);

        assert!(DbService::get_session(&conn, second.id + 1000).unwrap().is_none());
    }

    #[test]
    fn test_message_history_is_ordered() {
        let pool = get_test_db();
        let conn = pool.lock().unwrap();
        let session = DbService::insert_session(&conn, "Session").unwrap();

        let msg1 = DbService::insert_message(&conn, session.id, "You are a bot", Role::System).unwrap();
        DbService::insert_message(&conn, session.id, "Hello!", Role::User).unwrap();
        DbService::insert_message(&conn, session.id, "Hi there", Role::Assistant).unwrap();

        assert_eq!(msg1.role, Role::System);
        assert_eq!(msg1.session_id, session.id);

        let history = DbService::get_history(&conn, session.id).unwrap();
        let roles: Vec<Role> = history.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant]);
        assert_eq!(history[1].content, "Hello!");
        assert!(history.windows(2).all(|w| w[0].created_at <= w[1].created_at));
    }

    #[test]
    fn test_history_is_scoped_to_session() {
        let pool = get_test_db();
        let conn = pool.lock().unwrap();
        let a = DbService::insert_session(&conn, "A").unwrap();
        let b = DbService::insert_session(&conn, "B").unwrap();

        DbService::insert_message(&conn, a.id, "for a", Role::User).unwrap();
        DbService::insert_message(&conn, b.id, "for b", Role::User).unwrap();

        let history = DbService::get_history(&conn, a.id).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].content, "for a");
    }

    #[test]
    fn test_insert_message_requires_session() {
        let pool = get_test_db();
        let conn = pool.lock().unwrap();

        let err = DbService::insert_message(&conn, 42, "orphan", Role::User).unwrap_err();
        assert!(matches!(err, StoreError::SessionNotFound(42)));
    }

    #[tokio::test]
    async fn test_store_round_trips_history_rows() {
        let pool = get_test_db();
        let session = DbService::insert_session(&pool.lock().unwrap(), "Session").unwrap();
        let store = DbStore::new(pool.clone());

        store.append_message(session.id, "Hi", Role::User).await.unwrap();
        store.append_message(session.id, "Hello", Role::Assistant).await.unwrap();

        let rows = store.load_history(session.id).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].role, rows[0].content.as_str()), (Role::User, "Hi"));
        assert_eq!((rows[1].role, rows[1].content.as_str()), (Role::Assistant, "Hello"));
    }

    #[tokio::test]
    async fn test_store_append_unknown_session_fails() {
        let store = DbStore::new(get_test_db());
        let err = store.append_message(7, "Hi", Role::User).await.unwrap_err();
        assert!(matches!(err, StoreError::SessionNotFound(7)));
    }
}
