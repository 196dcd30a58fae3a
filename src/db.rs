use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;

pub const DB_FILE: &str = "easybudget.db";

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS entries (
    id INTEGER PRIMARY KEY,
    date TEXT NOT NULL,               -- ISO YYYY-MM-DD
    amount_cents INTEGER NOT NULL,    -- signed minor units ($12.34 = 1234)
    note TEXT NOT NULL DEFAULT '',
    rule_id INTEGER REFERENCES recurring_rules(id)
);

CREATE INDEX IF NOT EXISTS idx_entries_date ON entries(date);

CREATE TABLE IF NOT EXISTS recurring_rules (
    id INTEGER PRIMARY KEY,
    start_date TEXT NOT NULL,
    amount_cents INTEGER NOT NULL,
    note TEXT NOT NULL DEFAULT '',
    every_n INTEGER NOT NULL CHECK (every_n >= 1),
    unit TEXT NOT NULL CHECK (unit IN ('day', 'week', 'month')),
    last_generated_date TEXT
);
";

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON; PRAGMA busy_timeout=3000;")?;
    Ok(conn)
}

/// Create tables and run upgrades. Safe to call on every start.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;

    // Databases created before recurring rules existed lack the rule_id column.
    let cols: Vec<String> = conn
        .prepare("PRAGMA table_info('entries')")?
        .query_map([], |row| row.get(1))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    if !cols.iter().any(|c| c == "rule_id") {
        conn.execute(
            "ALTER TABLE entries ADD COLUMN rule_id INTEGER REFERENCES recurring_rules(id)",
            [],
        )?;
    }

    // Identity of an entry is its full tuple. SQLite treats NULLs as distinct
    // in unique indexes, so a bare rule_id column would let identical manual
    // entries pile up; COALESCE to 0, which no real rule id can take.
    conn.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS ux_entries_identity \
         ON entries(date, amount_cents, note, COALESCE(rule_id, 0))",
        [],
    )?;
    Ok(())
}
