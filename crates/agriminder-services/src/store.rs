// crates/agriminder-services/src/store.rs

use chrono::NaiveDateTime;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

use agriminder_core::{DatabaseError, ValidationError};

use crate::error::{StoreError, StoreResult};
use crate::reminder::{format_remind_at, parse_remind_at, NewReminder, Reminder};
use crate::scheme::{Scheme, SEEDED_SCHEMES};
use crate::settings::{Language, Settings, SETTINGS_ID};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS reminders (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        description TEXT,
        remind_at TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS schemes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        eligible INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS settings (
        id INTEGER PRIMARY KEY,
        farmer_name TEXT NOT NULL,
        land_size REAL NOT NULL DEFAULT 0,
        crops TEXT NOT NULL DEFAULT '',
        city TEXT NOT NULL DEFAULT '',
        language TEXT NOT NULL DEFAULT 'English'
    );

    CREATE INDEX IF NOT EXISTS idx_reminders_remind_at ON reminders(remind_at);
";

/// Local SQLite storage for reminders, schemes, and settings.
///
/// Holds only the file path: every operation opens its own connection and
/// drops it before returning.
#[derive(Debug, Clone)]
pub struct AgriStore {
    path: PathBuf,
}

impl AgriStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> StoreResult<Connection> {
        Connection::open(&self.path).map_err(|e| {
            StoreError::Database(DatabaseError::ConnectionFailed(format!(
                "{}: {}",
                self.path.display(),
                e
            )))
        })
    }

    /// Create tables and seed defaults. Safe to call on every start.
    pub fn initialize(&self) -> StoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::ConnectionFailed(format!("{}: {}", parent.display(), e))
            })?;
        }

        let mut conn = self.connect()?;
        conn.execute_batch(SCHEMA)?;

        let tx = conn.transaction()?;

        let scheme_count: i64 = tx.query_row("SELECT COUNT(*) FROM schemes", [], |row| row.get(0))?;
        if scheme_count == 0 {
            let mut stmt = tx.prepare("INSERT INTO schemes (name, eligible) VALUES (?1, 0)")?;
            for name in SEEDED_SCHEMES {
                stmt.execute([name])?;
            }
            tracing::info!("Seeded {} schemes", SEEDED_SCHEMES.len());
        }

        let settings_count: i64 =
            tx.query_row("SELECT COUNT(*) FROM settings", [], |row| row.get(0))?;
        if settings_count == 0 {
            let defaults = Settings::default();
            tx.execute(
                "INSERT INTO settings (id, farmer_name, land_size, crops, city, language)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    SETTINGS_ID,
                    defaults.farmer_name,
                    defaults.land_size,
                    defaults.crops,
                    defaults.default_city,
                    defaults.language.as_str(),
                ],
            )?;
            tracing::info!("Seeded default settings");
        }

        tx.commit()?;
        tracing::debug!("Store initialized at {}", self.path.display());
        Ok(())
    }

    // ---- reminders ----

    /// Store a new reminder. The title must not be blank.
    pub fn add_reminder(&self, reminder: &NewReminder) -> StoreResult<Reminder> {
        if reminder.title.trim().is_empty() {
            return Err(ValidationError::new("title", "Title required.").into());
        }

        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO reminders (title, description, remind_at) VALUES (?1, ?2, ?3)",
            params![
                reminder.title,
                reminder.description,
                format_remind_at(&reminder.remind_at),
            ],
        )?;
        let id = conn.last_insert_rowid();

        tracing::info!("Added reminder {} for {}", id, reminder.remind_at);
        Ok(Reminder {
            id,
            title: reminder.title.clone(),
            description: reminder.description.clone(),
            remind_at: reminder.remind_at,
        })
    }

    /// All reminders, earliest first
    pub fn list_reminders(&self) -> StoreResult<Vec<Reminder>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, description, remind_at
             FROM reminders ORDER BY remind_at, id",
        )?;

        let reminders = stmt
            .query_map([], Self::row_to_reminder)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(reminders)
    }

    /// Reminders due at or after `now`, earliest first, at most `limit`
    pub fn upcoming_reminders(&self, now: NaiveDateTime, limit: usize) -> StoreResult<Vec<Reminder>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, description, remind_at
             FROM reminders WHERE remind_at >= ?1
             ORDER BY remind_at, id LIMIT ?2",
        )?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let reminders = stmt
            .query_map(params![format_remind_at(&now), limit], Self::row_to_reminder)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(reminders)
    }

    /// Delete a reminder. Returns false when the id didn't exist.
    pub fn delete_reminder(&self, id: i64) -> StoreResult<bool> {
        let conn = self.connect()?;
        let removed = conn.execute("DELETE FROM reminders WHERE id = ?1", [id])?;
        if removed > 0 {
            tracing::info!("Deleted reminder {}", id);
        }
        Ok(removed > 0)
    }

    fn row_to_reminder(row: &rusqlite::Row) -> rusqlite::Result<Reminder> {
        let remind_at: String = row.get(3)?;
        let remind_at = parse_remind_at(&remind_at)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

        Ok(Reminder {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            remind_at,
        })
    }

    // ---- schemes ----

    pub fn list_schemes(&self) -> StoreResult<Vec<Scheme>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT id, name, eligible FROM schemes ORDER BY id")?;

        let schemes = stmt
            .query_map([], |row| {
                Ok(Scheme {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    eligible: row.get::<_, i64>(2)? != 0,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(schemes)
    }

    /// Store a scheme's eligibility flag. Unknown ids are a no-op (false).
    pub fn set_scheme_eligibility(&self, id: i64, eligible: bool) -> StoreResult<bool> {
        let conn = self.connect()?;
        let changed = conn.execute(
            "UPDATE schemes SET eligible = ?1 WHERE id = ?2",
            params![eligible as i64, id],
        )?;
        if changed > 0 {
            tracing::info!("Scheme {} eligibility set to {}", id, eligible);
        } else {
            tracing::debug!("No scheme with id {}", id);
        }
        Ok(changed > 0)
    }

    // ---- settings ----

    pub fn get_settings(&self) -> StoreResult<Settings> {
        let conn = self.connect()?;
        let settings = conn
            .query_row(
                "SELECT farmer_name, land_size, crops, city, language
                 FROM settings WHERE id = ?1",
                [SETTINGS_ID],
                |row| {
                    let language: String = row.get(4)?;
                    Ok(Settings {
                        farmer_name: row.get(0)?,
                        land_size: row.get(1)?,
                        crops: row.get(2)?,
                        default_city: row.get(3)?,
                        language: language.parse().unwrap_or_else(|_| {
                            tracing::warn!("Unknown stored language {:?}, using English", language);
                            Language::default()
                        }),
                    })
                },
            )
            .optional()?;

        settings.ok_or(StoreError::NotInitialized("settings"))
    }

    /// Replace the settings record.
    pub fn update_settings(&self, settings: &Settings) -> StoreResult<()> {
        settings.validate()?;

        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO settings (id, farmer_name, land_size, crops, city, language)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
                farmer_name = excluded.farmer_name,
                land_size = excluded.land_size,
                crops = excluded.crops,
                city = excluded.city,
                language = excluded.language",
            params![
                SETTINGS_ID,
                settings.farmer_name,
                settings.land_size,
                settings.crops,
                settings.default_city,
                settings.language.as_str(),
            ],
        )?;

        tracing::info!("Settings updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 9, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_initialize_creates_missing_directories() {
        let dir = tempdir().unwrap();
        let store = AgriStore::new(dir.path().join("nested/data/agri.db"));
        store.initialize().unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_blank_title_rejected() {
        let dir = tempdir().unwrap();
        let store = AgriStore::new(dir.path().join("test.db"));
        store.initialize().unwrap();

        let err = store
            .add_reminder(&NewReminder::new("   ", None, at(21, 9)))
            .unwrap_err();

        match err {
            StoreError::Validation(v) => assert_eq!(v.field, "title"),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(store.list_reminders().unwrap().is_empty());
    }

    #[test]
    fn test_upcoming_reminders() {
        let dir = tempdir().unwrap();
        let store = AgriStore::new(dir.path().join("test.db"));
        store.initialize().unwrap();

        store.add_reminder(&NewReminder::new("Past", None, at(20, 9))).unwrap();
        store.add_reminder(&NewReminder::new("Third", None, at(24, 9))).unwrap();
        store.add_reminder(&NewReminder::new("First", None, at(21, 9))).unwrap();
        store.add_reminder(&NewReminder::new("Second", None, at(22, 9))).unwrap();

        let upcoming = store.upcoming_reminders(at(21, 9), 2).unwrap();
        let titles: Vec<_> = upcoming.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[test]
    fn test_settings_before_initialize() {
        let dir = tempdir().unwrap();
        let store = AgriStore::new(dir.path().join("test.db"));
        let conn = store.connect().unwrap();
        conn.execute_batch(SCHEMA).unwrap();

        assert!(matches!(
            store.get_settings(),
            Err(StoreError::NotInitialized("settings"))
        ));
    }

    #[test]
    fn test_corrupt_timestamp_surfaces_as_database_error() {
        let dir = tempdir().unwrap();
        let store = AgriStore::new(dir.path().join("test.db"));
        store.initialize().unwrap();
        store
            .connect()
            .unwrap()
            .execute(
                "INSERT INTO reminders (title, remind_at) VALUES ('Bad', 'soon')",
                [],
            )
            .unwrap();

        assert!(matches!(store.list_reminders(), Err(StoreError::Database(_))));
    }
}
