// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database handle: open, PRAGMA setup, migrations, close.
//!
//! Within one process every statement runs on tokio-rusqlite's background
//! thread. Across processes, WAL plus `busy_timeout` lets writers wait for
//! each other instead of failing with `SQLITE_BUSY`.

use std::path::Path;

use logram_core::LogramError;
use tracing::debug;

use crate::migrations::run_migrations;

/// Milliseconds a writer waits on a lock held by another connection.
const BUSY_TIMEOUT_MS: u32 = 5000;

/// An open queue database.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Opens (creating if needed) the database at `path` and migrates it.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, LogramError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| LogramError::Storage {
                source: Box::new(e),
            })?;
        }

        let conn = tokio_rusqlite::Connection::open(&path)
            .await
            .map_err(|e| LogramError::Storage {
                source: Box::new(e),
            })?;
        let db = Self { conn };
        db.prepare().await?;
        debug!(path = %path.display(), "queue database opened");
        Ok(db)
    }

    /// An in-memory database, private to this handle.
    pub async fn open_in_memory() -> Result<Self, LogramError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(|e| LogramError::Storage {
                source: Box::new(e),
            })?;
        let db = Self { conn };
        db.prepare().await?;
        Ok(db)
    }

    async fn prepare(&self) -> Result<(), LogramError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch(&format!(
                    "PRAGMA journal_mode = WAL;
                     PRAGMA synchronous = NORMAL;
                     PRAGMA busy_timeout = {BUSY_TIMEOUT_MS};"
                ))
            })
            .await
            .map_err(map_tr_err)?;

        self.conn
            .call(|conn| -> Result<Result<(), LogramError>, rusqlite::Error> {
                Ok(run_migrations(conn))
            })
            .await
            .map_err(map_tr_err)?
    }

    /// The underlying async connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoints the WAL and closes the connection.
    pub async fn close(self) -> Result<(), LogramError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")
            })
            .await
            .map_err(map_tr_err)?;
        self.conn.close().await.map_err(|e| LogramError::Storage {
            source: Box::new(e),
        })?;
        debug!("queue database closed");
        Ok(())
    }
}

/// Maps a tokio-rusqlite failure onto [`LogramError::Storage`].
pub fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> LogramError {
    LogramError::Storage {
        source: Box::new(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn open_applies_wal_and_schema() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("nested/queue.db"))
            .await
            .unwrap();

        let (mode, tables): (String, i64) = db
            .connection()
            .call(|conn| -> Result<(String, i64), rusqlite::Error> {
                let mode = conn.query_row("PRAGMA journal_mode", [], |row| row.get(0))?;
                let tables = conn.query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'queue'",
                    [],
                    |row| row.get(0),
                )?;
                Ok((mode, tables))
            })
            .await
            .unwrap();

        assert_eq!(mode.to_lowercase(), "wal");
        assert_eq!(tables, 1);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn reopening_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("queue.db");
        Database::open(&path).await.unwrap().close().await.unwrap();
        let db = Database::open(&path).await.unwrap();
        db.close().await.unwrap();
    }
}
