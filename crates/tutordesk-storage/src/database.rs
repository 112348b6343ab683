//! Database connection and operations

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, Row};
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::StorageError;
use crate::migrations::run_migrations;
use crate::record::{Record, Table};
use crate::Result;

pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;

        // Enable foreign keys
        conn.pragma_update(None, "foreign_keys", "ON")?;

        // WAL mode for better concurrent performance
        let _: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;

        // Run migrations
        run_migrations(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        run_migrations(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn with_connection<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock();
        f(&conn)
    }

    pub fn transaction<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let result = f(&tx)?;
        tx.commit()?;
        Ok(result)
    }

    // === Entity tables ===

    /// Insert a new record. A string `id` in `data` is kept, otherwise one
    /// is generated; either way the stored object carries its id.
    pub fn insert(&self, table: Table, data: Value) -> Result<Record> {
        let mut object = into_object(data)?;
        let id = match object.get("id").and_then(Value::as_str) {
            Some(id) if !id.trim().is_empty() => id.to_string(),
            _ => Uuid::new_v4().to_string(),
        };
        object.insert("id".to_string(), Value::String(id.clone()));

        let now = Utc::now();
        let record = Record {
            id,
            data: Value::Object(object),
            created_at: now,
            updated_at: now,
        };
        let body = serde_json::to_string(&record.data)?;

        self.with_connection(|conn| {
            conn.execute(
                &format!(
                    "INSERT INTO {} (id, data, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
                    table.as_str()
                ),
                rusqlite::params![
                    record.id,
                    body,
                    record.created_at.to_rfc3339(),
                    record.updated_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })?;

        tracing::info!(table = %table, id = %record.id, "Inserted record");

        Ok(record)
    }

    /// All records of a table, oldest first
    pub fn select(&self, table: Table) -> Result<Vec<Record>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT id, data, created_at, updated_at FROM {} ORDER BY created_at, rowid",
                table.as_str()
            ))?;

            let rows = stmt.query_map([], read_row)?;
            let mut records = Vec::new();
            for row in rows {
                records.push(row??);
            }

            tracing::debug!(table = %table, count = records.len(), "Selected records");
            Ok(records)
        })
    }

    pub fn get(&self, table: Table, id: &str) -> Result<Option<Record>> {
        self.with_connection(|conn| {
            let record = conn
                .query_row(
                    &format!(
                        "SELECT id, data, created_at, updated_at FROM {} WHERE id = ?1",
                        table.as_str()
                    ),
                    [id],
                    read_row,
                )
                .optional()?;

            record.transpose()
        })
    }

    /// Merge the top-level keys of `patch` into an existing record
    pub fn update(&self, table: Table, id: &str, patch: Value) -> Result<Record> {
        let patch = into_object(patch)?;

        self.transaction(|conn| {
            let existing = conn
                .query_row(
                    &format!(
                        "SELECT id, data, created_at, updated_at FROM {} WHERE id = ?1",
                        table.as_str()
                    ),
                    [id],
                    read_row,
                )
                .optional()?
                .transpose()?
                .ok_or_else(|| StorageError::NotFound {
                    table: table.to_string(),
                    id: id.to_string(),
                })?;

            let mut object = into_object(existing.data)?;
            for (key, value) in patch {
                object.insert(key, value);
            }
            // The id is the row key and cannot be patched
            object.insert("id".to_string(), Value::String(existing.id.clone()));

            let record = Record {
                id: existing.id,
                data: Value::Object(object),
                created_at: existing.created_at,
                updated_at: Utc::now(),
            };

            conn.execute(
                &format!(
                    "UPDATE {} SET data = ?1, updated_at = ?2 WHERE id = ?3",
                    table.as_str()
                ),
                rusqlite::params![
                    serde_json::to_string(&record.data)?,
                    record.updated_at.to_rfc3339(),
                    record.id,
                ],
            )?;

            Ok(record)
        })
    }

    /// Delete a record; returns whether a row was removed
    pub fn delete(&self, table: Table, id: &str) -> Result<bool> {
        let removed = self.with_connection(|conn| {
            let count = conn.execute(
                &format!("DELETE FROM {} WHERE id = ?1", table.as_str()),
                [id],
            )?;
            Ok(count > 0)
        })?;

        if removed {
            tracing::info!(table = %table, id = %id, "Deleted record");
        }

        Ok(removed)
    }

    // === Settings ===

    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        self.with_connection(|conn| {
            let value = conn
                .query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| {
                    row.get(0)
                })
                .optional()?;
            Ok(value)
        })
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        let updated_at = Utc::now().to_rfc3339();
        self.with_connection(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO settings (key, value, updated_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![key, value, updated_at],
            )?;
            Ok(())
        })?;

        Ok(())
    }

    pub fn delete_setting(&self, key: &str) -> Result<()> {
        self.with_connection(|conn| {
            conn.execute("DELETE FROM settings WHERE key = ?1", [key])?;
            Ok(())
        })
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: Arc::clone(&self.conn),
        }
    }
}

fn into_object(value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(object) => Ok(object),
        other => Err(StorageError::InvalidRecord(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::InvalidRecord(format!("bad timestamp {:?}: {}", value, e)))
}

/// Row decoder; decode errors are carried out separately from SQLite errors
fn read_row(row: &Row<'_>) -> rusqlite::Result<Result<Record>> {
    let id: String = row.get(0)?;
    let body: String = row.get(1)?;
    let created_str: String = row.get(2)?;
    let updated_str: String = row.get(3)?;

    Ok(decode_record(id, &body, &created_str, &updated_str))
}

fn decode_record(id: String, body: &str, created: &str, updated: &str) -> Result<Record> {
    Ok(Record {
        id,
        data: serde_json::from_str(body)?,
        created_at: parse_timestamp(created)?,
        updated_at: parse_timestamp(updated)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory().unwrap();
        db.with_connection(|conn| {
            let count: i32 =
                conn.query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))?;
            assert_eq!(count, 0);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn test_insert_and_select() {
        let db = Database::open_in_memory().unwrap();

        let first = db
            .insert(Table::Students, json!({ "firstName": "Alex", "phone": "5551234567" }))
            .unwrap();
        let second = db
            .insert(Table::Students, json!({ "id": "student-2", "firstName": "Emma" }))
            .unwrap();

        assert_eq!(second.id, "student-2");
        assert_eq!(first.data["id"], json!(first.id));

        let records = db.select(Table::Students).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, first.id);
        // Raw values are stored as given
        assert_eq!(records[0].data["phone"], "5551234567");

        assert!(db.select(Table::Tutors).unwrap().is_empty());
    }

    #[test]
    fn test_update_merges_fields() {
        let db = Database::open_in_memory().unwrap();
        let record = db
            .insert(Table::Sessions, json!({ "subject": "Physics", "durationMinutes": 60 }))
            .unwrap();

        let updated = db
            .update(
                Table::Sessions,
                &record.id,
                json!({ "durationMinutes": 90, "id": "hijack" }),
            )
            .unwrap();

        assert_eq!(updated.id, record.id);
        assert_eq!(updated.data["subject"], "Physics");
        assert_eq!(updated.data["durationMinutes"], 90);
        assert_eq!(updated.data["id"], json!(record.id));

        let stored = db.get(Table::Sessions, &record.id).unwrap().unwrap();
        assert_eq!(stored.data, updated.data);
    }

    #[test]
    fn test_update_missing_record() {
        let db = Database::open_in_memory().unwrap();
        let err = db
            .update(Table::Notes, "missing", json!({ "body": "x" }))
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
    }

    #[test]
    fn test_rejects_non_object_data() {
        let db = Database::open_in_memory().unwrap();
        let err = db.insert(Table::Notes, json!(["not", "an", "object"])).unwrap_err();
        assert!(matches!(err, StorageError::InvalidRecord(_)));
    }

    #[test]
    fn test_corrupt_timestamp_is_an_error() {
        let db = Database::open_in_memory().unwrap();
        let record = db.insert(Table::Notes, json!({ "body": "Bring workbook" })).unwrap();

        db.with_connection(|conn| {
            conn.execute(
                "UPDATE notes SET created_at = 'garbage' WHERE id = ?1",
                [&record.id],
            )?;
            Ok(())
        })
        .unwrap();

        let err = db.get(Table::Notes, &record.id).unwrap_err();
        assert!(matches!(err, StorageError::InvalidRecord(ref msg) if msg.contains("garbage")));
        assert!(matches!(
            db.select(Table::Notes),
            Err(StorageError::InvalidRecord(_))
        ));
    }

    #[test]
    fn test_delete() {
        let db = Database::open_in_memory().unwrap();
        let record = db.insert(Table::Users, json!({ "email": "t@example.com" })).unwrap();

        assert!(db.delete(Table::Users, &record.id).unwrap());
        assert!(!db.delete(Table::Users, &record.id).unwrap());
        assert!(db.get(Table::Users, &record.id).unwrap().is_none());
    }

    #[test]
    fn test_settings() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.get_setting("mask_preferences").unwrap(), None);

        db.set_setting("mask_preferences", "{}").unwrap();
        assert_eq!(
            db.get_setting("mask_preferences").unwrap().as_deref(),
            Some("{}")
        );

        db.delete_setting("mask_preferences").unwrap();
        assert_eq!(db.get_setting("mask_preferences").unwrap(), None);
    }
}
