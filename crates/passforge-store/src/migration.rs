//! Schema migrations.
//!
//! Each migration is a static SQL batch keyed by version. Applied versions
//! are recorded in `_migrations`, so opening an existing database only runs
//! what it has not seen yet. Every migration runs in its own transaction.

use rusqlite::{Connection, params};
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};

struct Migration {
    version: u32,
    description: &'static str,
    sql: &'static str,
}

/// All migrations in order. Append only.
static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    description: "credentials table",
    sql: r#"
        CREATE TABLE credentials (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            account_name TEXT NOT NULL CHECK(length(account_name) > 0),
            secret       TEXT NOT NULL CHECK(length(secret) > 0),
            created_at   INTEGER NOT NULL
        );
        CREATE INDEX idx_credentials_recent ON credentials(created_at DESC, id DESC);
    "#,
}];

/// Latest schema version known to this build.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |m| m.version)
}

/// Apply every migration newer than the database's current version.
///
/// Synchronous; call it through [`crate::Database::run_migrations`].
pub fn run_all(conn: &mut Connection) -> StoreResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _migrations (
            version     INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at  INTEGER NOT NULL
        );",
    )
    .map_err(|e| StoreError::Migration {
        version: 0,
        message: format!("failed to create _migrations table: {e}"),
    })?;

    let current = current_version(conn)?;
    if current > latest_version() {
        return Err(StoreError::Migration {
            version: current,
            message: format!(
                "database schema v{current} is newer than this build (v{})",
                latest_version()
            ),
        });
    }

    let pending = MIGRATIONS.iter().filter(|m| m.version > current);
    let mut applied = 0usize;
    for migration in pending {
        apply(conn, migration)?;
        applied += 1;
    }

    if applied == 0 {
        debug!(version = current, "schema is up to date");
    } else {
        info!(from = current, to = latest_version(), applied, "schema migrated");
    }
    Ok(())
}

/// Highest applied migration version, or 0 on a fresh database.
pub fn current_version(conn: &Connection) -> StoreResult<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM _migrations",
        [],
        |row| row.get(0),
    )
    .map_err(|e| StoreError::Migration {
        version: 0,
        message: format!("failed to read current version: {e}"),
    })
}

fn apply(conn: &mut Connection, migration: &Migration) -> StoreResult<()> {
    info!(
        version = migration.version,
        description = migration.description,
        "applying migration"
    );

    let fail = |message: String| StoreError::Migration {
        version: migration.version,
        message,
    };

    let tx = conn
        .transaction()
        .map_err(|e| fail(format!("failed to begin transaction: {e}")))?;

    let result = tx
        .execute_batch(migration.sql)
        .map_err(|e| fail(format!("SQL execution failed: {e}")))
        .and_then(|()| {
            tx.execute(
                "INSERT INTO _migrations (version, description, applied_at) VALUES (?1, ?2, ?3)",
                params![
                    migration.version,
                    migration.description,
                    chrono::Utc::now().timestamp()
                ],
            )
            .map(|_| ())
            .map_err(|e| fail(format!("failed to record migration: {e}")))
        });

    match result {
        Ok(()) => tx
            .commit()
            .map_err(|e| fail(format!("failed to commit: {e}"))),
        Err(err) => {
            // Dropping the transaction rolls it back.
            warn!(version = migration.version, %err, "migration failed, rolling back");
            Err(err)
        }
    }
}

// ── tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> Connection {
        Connection::open_in_memory().unwrap()
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(window[1].version > window[0].version);
        }
    }

    #[test]
    fn run_all_on_fresh_db() {
        let mut conn = fresh();
        run_all(&mut conn).unwrap();
        assert_eq!(current_version(&conn).unwrap(), latest_version());
    }

    #[test]
    fn run_all_is_idempotent() {
        let mut conn = fresh();
        run_all(&mut conn).unwrap();
        run_all(&mut conn).unwrap();

        let rows: i64 = conn
            .query_row("SELECT count(*) FROM _migrations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, MIGRATIONS.len() as i64);
    }

    #[test]
    fn credentials_columns_match_record_shape() {
        let mut conn = fresh();
        run_all(&mut conn).unwrap();

        let mut stmt = conn.prepare("PRAGMA table_info(credentials)").unwrap();
        let columns: Vec<String> = stmt
            .query_map([], |row| row.get(1))
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(columns, ["id", "account_name", "secret", "created_at"]);
    }

    #[test]
    fn empty_fields_are_rejected_by_schema() {
        let mut conn = fresh();
        run_all(&mut conn).unwrap();

        let empty_name = conn.execute(
            "INSERT INTO credentials (account_name, secret, created_at) VALUES ('', 'x', 0)",
            [],
        );
        assert!(empty_name.is_err());

        let empty_secret = conn.execute(
            "INSERT INTO credentials (account_name, secret, created_at) VALUES ('x', '', 0)",
            [],
        );
        assert!(empty_secret.is_err());
    }

    #[test]
    fn newer_schema_is_refused() {
        let mut conn = fresh();
        run_all(&mut conn).unwrap();
        conn.execute(
            "INSERT INTO _migrations (version, description, applied_at) VALUES (999, 'future', 0)",
            [],
        )
        .unwrap();

        let err = run_all(&mut conn).unwrap_err();
        assert!(matches!(err, StoreError::Migration { version: 999, .. }));
    }
}
