// SQLite persistence layer for league documents.

use std::sync::{Mutex, MutexGuard};

use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::league::League;

/// SQLite-backed persistence for whole League documents.
///
/// The league aggregate is the unit of persistence: every mutation reads
/// the full document, mutates in memory, and writes the full document
/// back. No partial-field updates exist. The `name` column duplicates the
/// document's name so delete-by-name does not have to parse JSON.
pub struct LeagueStore {
    conn: Mutex<Connection>,
}

impl LeagueStore {
    /// Open (or create) a SQLite database at `path` and ensure the schema
    /// exists. Pass `":memory:"` for an ephemeral database (useful for
    /// tests).
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to set database pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS leagues (
                id       TEXT PRIMARY KEY,
                name     TEXT NOT NULL,
                document TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_leagues_name ON leagues(name);
            ",
        )
        .context("failed to create database schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Acquire the database connection.
    ///
    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock). This should never happen in normal operation.
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("database mutex poisoned")
    }

    /// Insert a new league document. Fails if the ID already exists.
    pub fn insert_league(&self, league: &League) -> Result<()> {
        let conn = self.conn();
        let document =
            serde_json::to_string(league).context("failed to serialize league document")?;
        conn.execute(
            "INSERT INTO leagues (id, name, document) VALUES (?1, ?2, ?3)",
            params![league.id, league.name, document],
        )
        .context("failed to insert league")?;
        Ok(())
    }

    /// Load a league document by ID. Returns `None` if no such league.
    pub fn fetch_league(&self, league_id: &str) -> Result<Option<League>> {
        let conn = self.conn();
        let document: Option<String> = conn
            .query_row(
                "SELECT document FROM leagues WHERE id = ?1",
                params![league_id],
                |row| row.get(0),
            )
            .optional()
            .context("failed to query league")?;

        match document {
            Some(json) => {
                let league = serde_json::from_str(&json)
                    .context("failed to deserialize league document")?;
                Ok(Some(league))
            }
            None => Ok(None),
        }
    }

    /// Load all league documents in insertion order, bounded by `limit`.
    pub fn fetch_all_leagues(&self, limit: usize) -> Result<Vec<League>> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT document FROM leagues ORDER BY rowid LIMIT ?1")
            .context("failed to prepare league listing query")?;

        let leagues = stmt
            .query_map(params![limit as i64], |row| {
                let json: String = row.get(0)?;
                Ok(json)
            })
            .context("failed to query leagues")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to read league rows")?
            .into_iter()
            .map(|json| {
                serde_json::from_str(&json).context("failed to deserialize league document")
            })
            .collect::<Result<Vec<League>>>()?;

        Ok(leagues)
    }

    /// Overwrite the stored document for `league.id` with the given state.
    /// Whole-document replace; the row must already exist.
    pub fn replace_league(&self, league: &League) -> Result<()> {
        let conn = self.conn();
        let document =
            serde_json::to_string(league).context("failed to serialize league document")?;
        let updated = conn
            .execute(
                "UPDATE leagues SET name = ?2, document = ?3 WHERE id = ?1",
                params![league.id, league.name, document],
            )
            .context("failed to replace league")?;
        if updated == 0 {
            bail!("no stored league with id {}", league.id);
        }
        Ok(())
    }

    /// Delete every league whose name matches exactly. Returns the number
    /// of leagues removed.
    pub fn delete_leagues_named(&self, name: &str) -> Result<usize> {
        let conn = self.conn();
        let deleted = conn
            .execute("DELETE FROM leagues WHERE name = ?1", params![name])
            .context("failed to delete leagues by name")?;
        Ok(deleted)
    }
}
