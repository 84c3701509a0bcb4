use rusqlite::{Connection, OptionalExtension, Result as SqlResult, params};
use std::path::Path;

use super::models::StoredSession;

/// On-disk cache: the persisted login session plus per-room last-message
/// previews for the room list.
pub struct LocalStore {
    conn: Connection,
}

impl LocalStore {
    pub fn open<P: AsRef<Path>>(path: P) -> SqlResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    pub fn in_memory() -> SqlResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> SqlResult<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS session (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                token TEXT NOT NULL,
                user_id TEXT NOT NULL,
                name TEXT NOT NULL,
                role TEXT NOT NULL,
                saved_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
            )",
            [],
        )?;
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS last_messages (
                room_id TEXT PRIMARY KEY,
                content TEXT NOT NULL,
                updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
            )",
            [],
        )?;
        Ok(())
    }

    /// Stores the session, replacing any previous one (single-row table).
    pub fn save_session(&self, session: &StoredSession) -> SqlResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO session (id, token, user_id, name, role, saved_at)
             VALUES (1, ?1, ?2, ?3, ?4, strftime('%s', 'now'))",
            params![session.token, session.user_id, session.name, session.role],
        )?;
        Ok(())
    }

    pub fn load_session(&self) -> SqlResult<Option<StoredSession>> {
        self.conn
            .query_row(
                "SELECT token, user_id, name, role FROM session WHERE id = 1",
                [],
                |row| {
                    Ok(StoredSession {
                        token: row.get(0)?,
                        user_id: row.get(1)?,
                        name: row.get(2)?,
                        role: row.get(3)?,
                    })
                },
            )
            .optional()
    }

    pub fn clear_session(&self) -> SqlResult<()> {
        self.conn.execute("DELETE FROM session", [])?;
        Ok(())
    }

    pub fn cache_last_message(&self, room_id: &str, content: &str) -> SqlResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO last_messages (room_id, content, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now'))",
            params![room_id, content],
        )?;
        Ok(())
    }

    pub fn last_message(&self, room_id: &str) -> SqlResult<Option<String>> {
        self.conn
            .query_row(
                "SELECT content FROM last_messages WHERE room_id = ?1",
                params![room_id],
                |row| row.get(0),
            )
            .optional()
    }

    /// All cached previews at once, for painting the room list.
    pub fn all_last_messages(&self) -> SqlResult<Vec<(String, String)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT room_id, content FROM last_messages")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<SqlResult<Vec<_>>>()?;
        Ok(rows)
    }

    pub fn remove_last_message(&self, room_id: &str) -> SqlResult<()> {
        self.conn.execute(
            "DELETE FROM last_messages WHERE room_id = ?1",
            params![room_id],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> StoredSession {
        StoredSession {
            token: "tok-1".to_string(),
            user_id: "12".to_string(),
            name: "Jun".to_string(),
            role: "USER".to_string(),
        }
    }

    #[test]
    fn session_roundtrips_and_clears() {
        let store = LocalStore::in_memory().unwrap();
        assert!(store.load_session().unwrap().is_none());

        store.save_session(&session()).unwrap();
        assert_eq!(store.load_session().unwrap(), Some(session()));

        store.clear_session().unwrap();
        assert!(store.load_session().unwrap().is_none());
    }

    #[test]
    fn second_save_replaces_the_session() {
        let store = LocalStore::in_memory().unwrap();
        store.save_session(&session()).unwrap();
        let mut other = session();
        other.token = "tok-2".to_string();
        store.save_session(&other).unwrap();
        assert_eq!(store.load_session().unwrap().unwrap().token, "tok-2");
    }

    #[test]
    fn last_message_is_per_room() {
        let store = LocalStore::in_memory().unwrap();
        store.cache_last_message("r1", "hello").unwrap();
        store.cache_last_message("r2", "bye").unwrap();
        store.cache_last_message("r1", "newer").unwrap();

        assert_eq!(store.last_message("r1").unwrap().as_deref(), Some("newer"));
        assert_eq!(store.last_message("r2").unwrap().as_deref(), Some("bye"));
        assert_eq!(store.all_last_messages().unwrap().len(), 2);

        store.remove_last_message("r1").unwrap();
        assert!(store.last_message("r1").unwrap().is_none());
    }
}
