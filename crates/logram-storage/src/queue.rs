// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! [`PendingQueue`] over the `queue` table.

use async_trait::async_trait;
use logram_core::{LogramError, PendingQueue};
use rusqlite::{OptionalExtension, params};

use crate::database::{Database, map_tr_err};

/// A FIFO of payloads sharing one `queue_key` in a [`Database`].
#[derive(Clone)]
pub struct SqliteQueue {
    db: Database,
    key: String,
}

impl SqliteQueue {
    pub fn new(db: Database, key: impl Into<String>) -> Self {
        Self {
            db,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

#[async_trait]
impl PendingQueue for SqliteQueue {
    async fn push(&self, payload: &str) -> Result<(), LogramError> {
        let key = self.key.clone();
        let payload = payload.to_string();
        self.db
            .connection()
            .call(move |conn| -> Result<(), rusqlite::Error> {
                conn.execute(
                    "INSERT INTO queue (queue_key, payload) VALUES (?1, ?2)",
                    params![key, payload],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    async fn pop(&self) -> Result<Option<String>, LogramError> {
        let key = self.key.clone();
        // Single statement: find and remove happen under one write lock.
        self.db
            .connection()
            .call(move |conn| -> Result<Option<String>, rusqlite::Error> {
                conn.query_row(
                    "DELETE FROM queue
                     WHERE id = (SELECT MIN(id) FROM queue WHERE queue_key = ?1)
                     RETURNING payload",
                    params![key],
                    |row| row.get::<_, String>(0),
                )
                .optional()
            })
            .await
            .map_err(map_tr_err)
    }

    async fn len(&self) -> Result<usize, LogramError> {
        let key = self.key.clone();
        let count: i64 = self
            .db
            .connection()
            .call(move |conn| {
                conn.query_row(
                    "SELECT COUNT(*) FROM queue WHERE queue_key = ?1",
                    params![key],
                    |row| row.get(0),
                )
            })
            .await
            .map_err(map_tr_err)?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}
