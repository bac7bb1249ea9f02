//! Database migrations
//!
//! Schema creation for users, health records and AI insights.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// Bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Migration v1: initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- USERS
        -- One row per external identity
        -- ============================================
        CREATE TABLE users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            azure_id TEXT NOT NULL UNIQUE,       -- identity provider subject
            name TEXT,
            email TEXT UNIQUE,
            profile_pic TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE UNIQUE INDEX idx_users_azure_id ON users(azure_id);

        -- ============================================
        -- HEALTH RECORDS
        -- One submission of the ten vital metrics
        -- ============================================
        CREATE TABLE health_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL REFERENCES users(azure_id) ON DELETE CASCADE,

            gender TEXT NOT NULL,
            age REAL NOT NULL,
            height REAL NOT NULL,                -- inches
            weight REAL NOT NULL,                -- kg
            blood_pressure_sys REAL NOT NULL,    -- mmHg
            blood_pressure_dia REAL NOT NULL,    -- mmHg
            heart_rate REAL NOT NULL,            -- bpm
            sleep_hours REAL NOT NULL,           -- hrs/day
            water_intake REAL NOT NULL,          -- L/day
            workout_minutes REAL NOT NULL,       -- min/day

            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_health_records_user ON health_records(user_id, created_at);

        -- ============================================
        -- HEALTH INSIGHTS
        -- Normalized AI assessment for a record
        -- ============================================
        CREATE TABLE health_insights (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id TEXT NOT NULL REFERENCES users(azure_id) ON DELETE CASCADE,
            health_record_id INTEGER REFERENCES health_records(id) ON DELETE CASCADE,

            summary TEXT NOT NULL DEFAULT '',
            risk_level TEXT NOT NULL DEFAULT '',
            diet TEXT NOT NULL DEFAULT '',
            fitness TEXT NOT NULL DEFAULT '',
            goals TEXT NOT NULL DEFAULT '',

            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_health_insights_user ON health_insights(user_id, created_at);
        CREATE INDEX idx_health_insights_record ON health_insights(health_record_id);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    Ok(get_schema_version(conn)? < SCHEMA_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        assert_eq!(get_schema_version(&conn).unwrap(), SCHEMA_VERSION);
        assert!(!needs_migration(&conn).unwrap());
    }

    #[test]
    fn test_schema_has_core_tables() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        for table in ["users", "health_records", "health_insights"] {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "missing table {}", table);
        }
    }
}
