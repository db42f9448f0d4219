use rusqlite::Connection;

use super::StorageError;

/// Applied in order; `PRAGMA user_version` records how many have run.
const MIGRATIONS: &[&str] = &[include_str!("migrations/001_initial.sql")];

pub fn run_migrations(conn: &mut Connection) -> Result<(), StorageError> {
    let applied: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    let applied = usize::try_from(applied).unwrap_or(0);

    for (index, sql) in MIGRATIONS.iter().enumerate().skip(applied) {
        let version = index + 1;
        tracing::info!("Applying schedule store migration {}", version);

        let tx = conn.transaction()?;
        tx.execute_batch(sql)
            .and_then(|_| tx.pragma_update(None, "user_version", version as i64))
            .map_err(|source| StorageError::Migration { version, source })?;
        tx.commit()?;
    }

    Ok(())
}
