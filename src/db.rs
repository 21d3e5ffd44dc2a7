// 💾 SQLite Store - Key-value persistence for the ledger
// Map and registry are JSON blobs under fixed keys; events are an append-only table

use crate::error::StoreError;
use crate::model::{ParkingMap, Vehicle};
use crate::store::{Event, ParkingStore};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

pub const MAP_KEY: &str = "map";
pub const VEHICLES_KEY: &str = "vehicles";

pub fn setup_database(conn: &Connection) -> Result<(), StoreError> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    // ==========================================================================
    // Key-value table (one JSON document per named structure)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    // ==========================================================================
    // Events Table (audit trail)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            event_id TEXT UNIQUE NOT NULL,
            timestamp TEXT NOT NULL,
            event_type TEXT NOT NULL,
            entity_id TEXT NOT NULL,
            data TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_events_entity ON events(entity_id)",
        [],
    )?;

    Ok(())
}

fn get_value(conn: &Connection, key: &str) -> Result<Option<String>, StoreError> {
    let value = conn
        .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
        .optional()?;
    Ok(value)
}

fn put_value(conn: &Connection, key: &str, value: &str) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO kv (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
        params![key, value],
    )?;
    Ok(())
}

/// [`ParkingStore`] backed by a SQLite database
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    pub fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        setup_database(&conn)?;
        Ok(SqliteStore { conn })
    }

    /// Audit trail in insertion order, optionally filtered to one entity
    pub fn get_events(&self, entity_id: Option<&str>) -> Result<Vec<Event>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT event_id, timestamp, event_type, entity_id, data
             FROM events
             WHERE ?1 IS NULL OR entity_id = ?1
             ORDER BY id ASC",
        )?;

        let events = stmt
            .query_map(params![entity_id], |row| {
                let timestamp_str: String = row.get(1)?;
                let data_json: String = row.get(4)?;

                Ok(Event {
                    event_id: row.get(0)?,
                    timestamp: DateTime::parse_from_rfc3339(&timestamp_str)
                        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?
                        .with_timezone(&Utc),
                    event_type: row.get(2)?,
                    entity_id: row.get(3)?,
                    data: serde_json::from_str(&data_json)
                        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(events)
    }
}

impl ParkingStore for SqliteStore {
    fn get_map(&self) -> Result<Option<ParkingMap>, StoreError> {
        match get_value(&self.conn, MAP_KEY)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn put_map(&mut self, map: &ParkingMap) -> Result<(), StoreError> {
        put_value(&self.conn, MAP_KEY, &serde_json::to_string(map)?)
    }

    fn get_vehicles(&self) -> Result<Vec<Vehicle>, StoreError> {
        match get_value(&self.conn, VEHICLES_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    fn put_vehicles(&mut self, vehicles: &[Vehicle]) -> Result<(), StoreError> {
        put_value(&self.conn, VEHICLES_KEY, &serde_json::to_string(vehicles)?)
    }

    /// Both documents are written in one SQL transaction
    fn commit(&mut self, map: &ParkingMap, vehicles: &[Vehicle]) -> Result<(), StoreError> {
        let map_json = serde_json::to_string(map)?;
        let vehicles_json = serde_json::to_string(vehicles)?;

        let tx = self.conn.transaction()?;
        put_value(&tx, MAP_KEY, &map_json)?;
        put_value(&tx, VEHICLES_KEY, &vehicles_json)?;
        tx.commit()?;

        Ok(())
    }

    fn append_event(&mut self, event: &Event) -> Result<(), StoreError> {
        let data_json = serde_json::to_string(&event.data)?;

        self.conn.execute(
            "INSERT INTO events (event_id, timestamp, event_type, entity_id, data)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                event.event_id,
                event.timestamp.to_rfc3339(),
                event.event_type,
                event.entity_id,
                data_json,
            ],
        )?;

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
