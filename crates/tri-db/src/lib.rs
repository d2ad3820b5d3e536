//! Storage layer for the race calendar.
//!
//! Provides persistence for races using `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` can be moved between threads but not shared without external
//! synchronization (e.g. a `Mutex<Database>`).
//!
//! # Schema
//!
//! Values are stored as TEXT:
//! - `date`: `YYYY-MM-DD`, so lexicographic order matches chronological order
//! - `time`: `HH:MM`, or NULL when the start time is unknown
//! - `distance`: one of `sprint`, `olympic`, `middle`, `long`
//! - `created_at` / `updated_at`: RFC 3339 in UTC
//!
//! ## Legacy `type` column
//!
//! Early databases stored the distance category in a column called `type`.
//! [`Database::open`] moves those values into `distance` and drops the old
//! column, so nothing above this crate ever sees `type`.

use std::path::Path;

use chrono::{DateTime, NaiveDate, NaiveTime, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use thiserror::Error;
use tri_core::{CoreError, Race, RaceDistance, RaceId, parse_start_time};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// No race with the given id.
    #[error("race not found: {0}")]
    NotFound(String),
    /// A stored row could not be turned into a race.
    #[error("invalid race row {race_id}: {message}")]
    InvalidRow { race_id: String, message: String },
    /// A stored distance is not one of the known categories.
    #[error("invalid distance for race {race_id}")]
    InvalidCategory {
        race_id: String,
        #[source]
        source: CoreError,
    },
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// Raw column values for one `races` row.
struct RaceRow {
    id: String,
    title: String,
    date: String,
    time: Option<String>,
    distance: Option<String>,
    location: Option<String>,
    description: Option<String>,
    created_at: String,
    updated_at: String,
}

const RACE_COLUMNS: &str =
    "id, title, date, time, distance, location, description, created_at, updated_at";

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The schema is initialized (and legacy columns migrated) on open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let mut db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&mut self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS races (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                date TEXT NOT NULL,
                time TEXT,
                distance TEXT,
                location TEXT,
                description TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_races_date ON races(date);
            ",
        )?;
        self.migrate_legacy_type_column()
    }

    fn migrate_legacy_type_column(&mut self) -> Result<(), DbError> {
        let columns = table_columns(&self.conn, "races")?;
        let has_distance = columns.iter().any(|c| c == "distance");
        let has_type = columns.iter().any(|c| c == "type");
        if has_distance && !has_type {
            return Ok(());
        }

        let tx = self.conn.transaction()?;
        if !has_distance {
            tx.execute_batch("ALTER TABLE races ADD COLUMN distance TEXT;")?;
        }
        if has_type {
            let moved = tx.execute(
                "UPDATE races SET distance = type WHERE distance IS NULL OR distance = ''",
                [],
            )?;
            tx.execute_batch("ALTER TABLE races DROP COLUMN type;")?;
            tracing::debug!(moved, "migrated legacy race type column to distance");
        }
        tx.commit()?;
        Ok(())
    }

    /// Inserts a new race.
    pub fn insert_race(&self, race: &Race) -> Result<(), DbError> {
        self.conn.execute(
            "
            INSERT INTO races
            (id, title, date, time, distance, location, description, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
            params![
                race.id.as_str(),
                race.title,
                format_date(race.date),
                race.time.map(format_time),
                race.distance.as_str(),
                race.location,
                race.description,
                format_timestamp(race.created_at),
                format_timestamp(race.updated_at),
            ],
        )?;
        Ok(())
    }

    /// Inserts a batch of races, ignoring ids that already exist.
    ///
    /// Returns the number of rows actually inserted.
    pub fn insert_races(&mut self, races: &[Race]) -> Result<usize, DbError> {
        if races.is_empty() {
            return Ok(0);
        }
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "
                INSERT OR IGNORE INTO races
                (id, title, date, time, distance, location, description, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                ",
            )?;
            for race in races {
                inserted += stmt.execute(params![
                    race.id.as_str(),
                    race.title,
                    format_date(race.date),
                    race.time.map(format_time),
                    race.distance.as_str(),
                    race.location,
                    race.description,
                    format_timestamp(race.created_at),
                    format_timestamp(race.updated_at),
                ])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    /// Overwrites every stored field of an existing race except `created_at`.
    pub fn update_race(&self, race: &Race) -> Result<(), DbError> {
        let updated = self.conn.execute(
            "
            UPDATE races
            SET title = ?, date = ?, time = ?, distance = ?, location = ?,
                description = ?, updated_at = ?
            WHERE id = ?
            ",
            params![
                race.title,
                format_date(race.date),
                race.time.map(format_time),
                race.distance.as_str(),
                race.location,
                race.description,
                format_timestamp(race.updated_at),
                race.id.as_str(),
            ],
        )?;
        if updated == 0 {
            return Err(DbError::NotFound(race.id.to_string()));
        }
        Ok(())
    }

    /// Deletes a race. Returns `false` if no race had that id.
    pub fn delete_race(&self, id: &RaceId) -> Result<bool, DbError> {
        let deleted = self
            .conn
            .execute("DELETE FROM races WHERE id = ?", params![id.as_str()])?;
        Ok(deleted > 0)
    }

    /// Fetches a single race by id.
    pub fn get_race(&self, id: &RaceId) -> Result<Option<Race>, DbError> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {RACE_COLUMNS} FROM races WHERE id = ?"),
                params![id.as_str()],
                race_row,
            )
            .optional()?;
        row.map(RaceRow::into_race).transpose()
    }

    /// Lists all races ordered by date, start time, title, then id.
    pub fn list_races(&self) -> Result<Vec<Race>, DbError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {RACE_COLUMNS} FROM races ORDER BY date ASC, time ASC, title ASC, id ASC"
        ))?;
        let rows = stmt.query_map([], race_row)?;
        let mut races = Vec::new();
        for row in rows {
            races.push(row?.into_race()?);
        }
        Ok(races)
    }

    /// Lists races dated within a range.
    ///
    /// The range is inclusive of both `start` and `end`.
    pub fn list_races_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Race>, DbError> {
        if end < start {
            return Ok(Vec::new());
        }
        let mut stmt = self.conn.prepare(&format!(
            "
            SELECT {RACE_COLUMNS}
            FROM races
            WHERE date >= ? AND date <= ?
            ORDER BY date ASC, time ASC, title ASC, id ASC
            "
        ))?;
        let rows = stmt.query_map([format_date(start), format_date(end)], race_row)?;
        let mut races = Vec::new();
        for row in rows {
            races.push(row?.into_race()?);
        }
        Ok(races)
    }

    /// Counts stored races.
    pub fn count_races(&self) -> Result<usize, DbError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM races", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

fn race_row(row: &Row<'_>) -> rusqlite::Result<RaceRow> {
    Ok(RaceRow {
        id: row.get(0)?,
        title: row.get(1)?,
        date: row.get(2)?,
        time: row.get(3)?,
        distance: row.get(4)?,
        location: row.get(5)?,
        description: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

impl RaceRow {
    fn into_race(self) -> Result<Race, DbError> {
        let invalid = |message: String| DbError::InvalidRow {
            race_id: self.id.clone(),
            message,
        };

        let id = RaceId::new(self.id.clone()).map_err(|e| invalid(e.to_string()))?;
        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT)
            .map_err(|e| invalid(format!("date {:?}: {e}", self.date)))?;
        let time = self
            .time
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(|t| parse_start_time(t).map_err(|e| invalid(e.to_string())))
            .transpose()?;
        let distance: RaceDistance = self
            .distance
            .as_deref()
            .unwrap_or_default()
            .parse()
            .map_err(|source| DbError::InvalidCategory {
                race_id: self.id.clone(),
                source,
            })?;
        let created_at = parse_timestamp(&self.created_at).map_err(&invalid)?;
        let updated_at = parse_timestamp(&self.updated_at).map_err(&invalid)?;

        Ok(Race {
            id,
            title: self.title,
            date,
            time,
            distance,
            location: self.location,
            description: self.description,
            created_at,
            updated_at,
        })
    }
}

fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>, DbError> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(1))?;
    let mut columns = Vec::new();
    for row in rows {
        columns.push(row?);
    }
    Ok(columns)
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_timestamp(timestamp: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("timestamp {timestamp:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn race(id: &str, title: &str, date: &str, distance: RaceDistance) -> Race {
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
        Race {
            id: RaceId::new(id).unwrap(),
            title: title.to_string(),
            date: NaiveDate::parse_from_str(date, DATE_FORMAT).unwrap(),
            time: None,
            distance,
            location: None,
            description: None,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn open_in_memory_database() {
        let db = Database::open_in_memory().expect("open in-memory db");
        assert_eq!(db.count_races().unwrap(), 0);
    }

    #[test]
    fn schema_matches_data_model() {
        let db = Database::open_in_memory().unwrap();
        let columns = table_columns(&db.conn, "races").unwrap();
        assert_eq!(
            columns,
            vec![
                "id",
                "title",
                "date",
                "time",
                "distance",
                "location",
                "description",
                "created_at",
                "updated_at"
            ]
        );
    }

    #[test]
    fn insert_and_get_roundtrip_all_fields() {
        let db = Database::open_in_memory().unwrap();
        let mut r = race("r1", "Lake 70.3", "2025-08-24", RaceDistance::Middle);
        r.time = NaiveTime::from_hms_opt(7, 15, 0);
        r.location = Some("Lake Placid".to_string());
        r.description = Some("A-race".to_string());
        db.insert_race(&r).unwrap();

        let fetched = db.get_race(&r.id).unwrap().expect("race exists");
        assert_eq!(fetched, r);
    }

    #[test]
    fn get_missing_race_returns_none() {
        let db = Database::open_in_memory().unwrap();
        let missing = RaceId::new("nope").unwrap();
        assert!(db.get_race(&missing).unwrap().is_none());
    }

    #[test]
    fn duplicate_insert_is_an_error() {
        let db = Database::open_in_memory().unwrap();
        let r = race("r1", "A", "2025-07-05", RaceDistance::Sprint);
        db.insert_race(&r).unwrap();
        assert!(matches!(db.insert_race(&r), Err(DbError::Sqlite(_))));
    }

    #[test]
    fn insert_races_ignores_existing_ids() {
        let mut db = Database::open_in_memory().unwrap();
        db.insert_race(&race("r1", "A", "2025-07-05", RaceDistance::Sprint))
            .unwrap();

        let inserted = db
            .insert_races(&[
                race("r1", "A again", "2025-07-05", RaceDistance::Sprint),
                race("r2", "B", "2025-07-20", RaceDistance::Olympic),
            ])
            .unwrap();
        assert_eq!(inserted, 1);
        assert_eq!(db.count_races().unwrap(), 2);
        assert_eq!(db.get_race(&RaceId::new("r1").unwrap()).unwrap().unwrap().title, "A");
    }

    #[test]
    fn list_races_orders_by_date_then_time() {
        let db = Database::open_in_memory().unwrap();
        let mut late = race("r1", "Late", "2025-07-05", RaceDistance::Sprint);
        late.time = NaiveTime::from_hms_opt(10, 0, 0);
        let mut early = race("r2", "Early", "2025-07-05", RaceDistance::Sprint);
        early.time = NaiveTime::from_hms_opt(7, 0, 0);
        let first = race("r3", "First", "2025-06-01", RaceDistance::Olympic);
        for r in [&late, &early, &first] {
            db.insert_race(r).unwrap();
        }

        let ids: Vec<String> = db
            .list_races()
            .unwrap()
            .into_iter()
            .map(|r| r.id.to_string())
            .collect();
        assert_eq!(ids, vec!["r3", "r2", "r1"]);
    }

    #[test]
    fn list_races_in_range_is_inclusive() {
        let db = Database::open_in_memory().unwrap();
        for (id, date) in [
            ("a", "2025-06-30"),
            ("b", "2025-07-01"),
            ("c", "2025-07-31"),
            ("d", "2025-08-01"),
        ] {
            db.insert_race(&race(id, id, date, RaceDistance::Sprint)).unwrap();
        }
        let start = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 7, 31).unwrap();

        let ids: Vec<String> = db
            .list_races_in_range(start, end)
            .unwrap()
            .into_iter()
            .map(|r| r.id.to_string())
            .collect();
        assert_eq!(ids, vec!["b", "c"]);
        assert!(db.list_races_in_range(end, start).unwrap().is_empty());
    }

    #[test]
    fn update_race_changes_fields_but_not_created_at() {
        let db = Database::open_in_memory().unwrap();
        let original = race("r1", "A", "2025-07-05", RaceDistance::Sprint);
        db.insert_race(&original).unwrap();

        let mut edited = original.clone();
        edited.title = "A (moved)".to_string();
        edited.date = NaiveDate::from_ymd_opt(2025, 7, 12).unwrap();
        edited.distance = RaceDistance::Olympic;
        edited.created_at = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        edited.updated_at = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        db.update_race(&edited).unwrap();

        let fetched = db.get_race(&original.id).unwrap().unwrap();
        assert_eq!(fetched.title, "A (moved)");
        assert_eq!(fetched.distance, RaceDistance::Olympic);
        assert_eq!(fetched.created_at, original.created_at);
        assert_eq!(fetched.updated_at, edited.updated_at);
    }

    #[test]
    fn update_missing_race_is_not_found() {
        let db = Database::open_in_memory().unwrap();
        let err = db
            .update_race(&race("ghost", "A", "2025-07-05", RaceDistance::Sprint))
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound(id) if id == "ghost"));
    }

    #[test]
    fn delete_race_reports_whether_removed() {
        let db = Database::open_in_memory().unwrap();
        let r = race("r1", "A", "2025-07-05", RaceDistance::Sprint);
        db.insert_race(&r).unwrap();

        assert!(db.delete_race(&r.id).unwrap());
        assert!(!db.delete_race(&r.id).unwrap());
        assert_eq!(db.count_races().unwrap(), 0);
    }

    #[test]
    fn unknown_stored_distance_is_invalid_category() {
        let db = Database::open_in_memory().unwrap();
        db.conn
            .execute(
                "INSERT INTO races (id, title, date, distance, created_at, updated_at)
                 VALUES ('r1', 'A', '2025-07-05', 'ultra', '2025-01-01T00:00:00Z', '2025-01-01T00:00:00Z')",
                [],
            )
            .unwrap();

        let err = db.list_races().unwrap_err();
        assert!(matches!(err, DbError::InvalidCategory { ref race_id, .. } if race_id == "r1"));
    }

    #[test]
    fn malformed_stored_date_is_invalid_row() {
        let db = Database::open_in_memory().unwrap();
        db.conn
            .execute(
                "INSERT INTO races (id, title, date, distance, created_at, updated_at)
                 VALUES ('r1', 'A', '2025-02-30', 'sprint', '2025-01-01T00:00:00Z', '2025-01-01T00:00:00Z')",
                [],
            )
            .unwrap();

        let err = db.list_races().unwrap_err();
        assert!(err.to_string().starts_with("invalid race row r1: date"));
    }

    #[test]
    fn stored_time_with_seconds_is_invalid_row() {
        let db = Database::open_in_memory().unwrap();
        db.conn
            .execute(
                "INSERT INTO races (id, title, date, time, distance, created_at, updated_at)
                 VALUES ('r1', 'A', '2025-07-05', '08:00:30', 'sprint',
                         '2025-01-01T00:00:00Z', '2025-01-01T00:00:00Z')",
                [],
            )
            .unwrap();

        let err = db.list_races().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid race row r1: invalid start time \"08:00:30\": use HH:MM"
        );
    }

    #[test]
    fn legacy_type_column_is_migrated_on_open() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("legacy.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(
                "
                CREATE TABLE races (
                    id TEXT PRIMARY KEY,
                    title TEXT NOT NULL,
                    date TEXT NOT NULL,
                    time TEXT,
                    type TEXT NOT NULL,
                    location TEXT,
                    description TEXT,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                );
                INSERT INTO races VALUES
                    ('r1', 'Old Sprint', '2024-05-04', '08:00', 'sprint', NULL, NULL,
                     '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z');
                ",
            )
            .unwrap();
        }

        let db = Database::open(&path).unwrap();
        let columns = table_columns(&db.conn, "races").unwrap();
        assert!(columns.iter().any(|c| c == "distance"));
        assert!(!columns.iter().any(|c| c == "type"));

        let races = db.list_races().unwrap();
        assert_eq!(races.len(), 1);
        assert_eq!(races[0].distance, RaceDistance::Sprint);
        assert_eq!(races[0].time, NaiveTime::from_hms_opt(8, 0, 0));

        db.insert_race(&race("r2", "New", "2025-07-05", RaceDistance::Long))
            .unwrap();
    }

    #[test]
    fn reopening_is_idempotent() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("races.db");
        {
            let db = Database::open(&path).unwrap();
            db.insert_race(&race("r1", "A", "2025-07-05", RaceDistance::Sprint))
                .unwrap();
        }
        let db = Database::open(&path).unwrap();
        assert_eq!(db.count_races().unwrap(), 1);
    }
}
