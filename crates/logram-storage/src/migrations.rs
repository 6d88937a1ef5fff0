// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded schema migrations (refinery).

use logram_core::LogramError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Applies pending migrations. Applied versions are tracked in
/// `refinery_schema_history`.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), LogramError> {
    embedded::migrations::runner()
        .run(conn)
        .map_err(|e| LogramError::Storage {
            source: Box::new(e),
        })?;
    Ok(())
}
