use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::models::{now_millis, GtmData};

/// Stores the whole tracker state as one JSON document, keeping prior versions as snapshots.
pub struct Database {
    conn: Connection,
    path: PathBuf,
    snapshot_keep: usize,
}

pub const DEFAULT_SNAPSHOT_KEEP: usize = 50;

#[derive(Debug, Clone)]
pub struct Snapshot {
    pub id: i64,
    pub captured_at: String,
    pub record_count: Option<usize>, // None when the stored blob no longer parses
    pub bytes: usize,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        debug!(path = %path.display(), "opened database");
        Ok(Self {
            conn,
            path: path.to_path_buf(),
            snapshot_keep: DEFAULT_SNAPSHOT_KEEP,
        })
    }

    /// How many earlier versions `save` retains.
    pub fn with_snapshot_keep(mut self, keep: usize) -> Self {
        self.snapshot_keep = keep;
        self
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
            path: PathBuf::from(":memory:"),
            snapshot_keep: DEFAULT_SNAPSHOT_KEEP,
        })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS gtm_state (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                data TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE IF NOT EXISTS state_snapshots (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                data TEXT NOT NULL,
                captured_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )?;
        Ok(())
    }

    pub fn ensure_initialized(&self) -> Result<()> {
        let tables: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='gtm_state'",
            [],
            |row| row.get(0),
        )?;
        if tables == 0 {
            return Err(anyhow!("Database not initialized. Run 'gtm init' first."));
        }
        Ok(())
    }

    fn stored_blob(&self) -> Result<Option<String>> {
        self.conn
            .query_row("SELECT data FROM gtm_state WHERE id = 1", [], |row| row.get(0))
            .optional()
            .context("Failed to read tracker state")
    }

    /// Returns the saved state, or a fresh empty one if nothing has been saved yet.
    pub fn load(&self) -> Result<GtmData> {
        match self.stored_blob()? {
            Some(blob) => {
                let data: GtmData =
                    serde_json::from_str(&blob).context("Stored tracker state is corrupt")?;
                debug!(records = data.record_count(), "loaded tracker state");
                Ok(data)
            }
            None => Ok(GtmData::empty()),
        }
    }

    pub fn save(&self, data: &mut GtmData) -> Result<()> {
        data.last_updated = now_millis();
        let blob = serde_json::to_string(data)?;

        let tx = self.conn.unchecked_transaction()?;
        if let Some(previous) = self.stored_blob()? {
            tx.execute("INSERT INTO state_snapshots (data) VALUES (?1)", [&previous])?;
        }
        tx.execute(
            "INSERT INTO gtm_state (id, data, updated_at) VALUES (1, ?1, datetime('now'))
             ON CONFLICT(id) DO UPDATE SET data = excluded.data, updated_at = excluded.updated_at",
            [&blob],
        )?;
        let pruned = Self::prune_in(&tx, self.snapshot_keep)?;
        tx.commit()?;
        if pruned > 0 {
            debug!(pruned, keep = self.snapshot_keep, "trimmed snapshot history");
        }

        debug!(records = data.record_count(), bytes = blob.len(), "saved tracker state");
        Ok(())
    }

    /// Replaces the current state with `data`; the replaced state is kept as a snapshot.
    pub fn replace(&self, mut data: GtmData) -> Result<GtmData> {
        self.save(&mut data)?;
        info!(records = data.record_count(), "replaced tracker state");
        Ok(data)
    }

    pub fn snapshots(&self, limit: usize) -> Result<Vec<Snapshot>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, data, captured_at FROM state_snapshots ORDER BY id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map([limit as i64], |row| {
            let id: i64 = row.get(0)?;
            let data: String = row.get(1)?;
            let captured_at: String = row.get(2)?;
            Ok((id, data, captured_at))
        })?;

        let mut snapshots = Vec::new();
        for row in rows {
            let (id, data, captured_at) = row?;
            let record_count = match serde_json::from_str::<GtmData>(&data) {
                Ok(parsed) => Some(parsed.record_count()),
                Err(e) => {
                    warn!(snapshot = id, error = %e, "snapshot is unreadable");
                    None
                }
            };
            snapshots.push(Snapshot {
                id,
                captured_at,
                record_count,
                bytes: data.len(),
            });
        }
        Ok(snapshots)
    }

    pub fn restore_snapshot(&self, id: i64) -> Result<GtmData> {
        let blob: String = self
            .conn
            .query_row(
                "SELECT data FROM state_snapshots WHERE id = ?1",
                [id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| anyhow!("Snapshot #{} not found", id))?;
        let data: GtmData = serde_json::from_str(&blob)
            .with_context(|| format!("Snapshot #{} is corrupt", id))?;
        self.replace(data)
    }

    /// Drops all but the newest `keep` snapshots. Returns how many were removed.
    pub fn prune_snapshots(&self, keep: usize) -> Result<usize> {
        let removed = Self::prune_in(&self.conn, keep)?;
        if removed > 0 {
            info!(removed, keep, "pruned snapshots");
        }
        Ok(removed)
    }

    fn prune_in(conn: &Connection, keep: usize) -> Result<usize> {
        let removed = conn.execute(
            "DELETE FROM state_snapshots WHERE id NOT IN
             (SELECT id FROM state_snapshots ORDER BY id DESC LIMIT ?1)",
            params![keep as i64],
        )?;
        Ok(removed)
    }
}
