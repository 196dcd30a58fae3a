use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row};

use crate::error::{BudgetError, Result};
use crate::models::Entry;

fn entry_from_row(row: &Row) -> rusqlite::Result<Entry> {
    Ok(Entry {
        id: row.get(0)?,
        date: row.get(1)?,
        amount_cents: row.get(2)?,
        note: row.get(3)?,
        rule_id: row.get(4)?,
    })
}

/// Insert an entry, or return the id of the identical existing one.
///
/// The INSERT OR IGNORE plus the unique identity index makes this the single
/// de-duplication point: rule expansion can be retried or replayed and the
/// same tuple always resolves to the same row.
pub fn insert_entry(
    conn: &Connection,
    date: NaiveDate,
    amount_cents: i64,
    note: &str,
    rule_id: Option<i64>,
) -> Result<i64> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO entries (date, amount_cents, note, rule_id) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![date, amount_cents, note, rule_id],
    )?;
    if inserted > 0 {
        return Ok(conn.last_insert_rowid());
    }

    // Tuple already present; IS matches both NULL and concrete rule ids.
    let id = conn.query_row(
        "SELECT id FROM entries WHERE date = ?1 AND amount_cents = ?2 AND note = ?3 AND rule_id IS ?4",
        rusqlite::params![date, amount_cents, note, rule_id],
        |row| row.get(0),
    )?;
    Ok(id)
}

/// Overwrite date/amount/note of an existing entry. Never touches rule_id.
pub fn update_entry(
    conn: &Connection,
    id: i64,
    date: NaiveDate,
    amount_cents: i64,
    note: &str,
) -> Result<()> {
    let changed = conn.execute(
        "UPDATE entries SET date = ?1, amount_cents = ?2, note = ?3 WHERE id = ?4",
        rusqlite::params![date, amount_cents, note, id],
    )?;
    if changed == 0 {
        return Err(BudgetError::NotFound("entry", id));
    }
    Ok(())
}

/// Delete one entry. Deleting an id that is already gone is a success.
pub fn delete_entry(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("DELETE FROM entries WHERE id = ?1", [id])?;
    Ok(())
}

/// All entries on a single day, most recently inserted first.
pub fn list_by_date(conn: &Connection, date: NaiveDate) -> Result<Vec<Entry>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, amount_cents, note, rule_id FROM entries \
         WHERE date = ?1 ORDER BY id DESC",
    )?;
    let entries = stmt
        .query_map([date], entry_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(entries)
}

pub fn get_entry(conn: &Connection, id: i64) -> Result<Option<Entry>> {
    let entry = conn
        .query_row(
            "SELECT id, date, amount_cents, note, rule_id FROM entries WHERE id = ?1",
            [id],
            entry_from_row,
        )
        .optional()?;
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{get_connection, init_db};

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn add_rule(conn: &Connection) -> i64 {
        conn.execute(
            "INSERT INTO recurring_rules (start_date, amount_cents, note, every_n, unit) \
             VALUES ('2025-01-01', -5000, 'rent', 1, 'month')",
            [],
        )
        .unwrap();
        conn.last_insert_rowid()
    }

    #[test]
    fn test_insert_is_idempotent() {
        let (_dir, conn) = test_db();
        let first = insert_entry(&conn, d("2025-01-15"), -1234, "coffee", None).unwrap();
        let second = insert_entry(&conn, d("2025-01-15"), -1234, "coffee", None).unwrap();
        assert_eq!(first, second);
        let count: i64 = conn
            .query_row("SELECT count(*) FROM entries", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_insert_idempotent_for_generated_entries() {
        let (_dir, conn) = test_db();
        let rule = add_rule(&conn);
        let first = insert_entry(&conn, d("2025-01-01"), -5000, "rent", Some(rule)).unwrap();
        let second = insert_entry(&conn, d("2025-01-01"), -5000, "rent", Some(rule)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_manual_and_generated_tuples_are_distinct() {
        let (_dir, conn) = test_db();
        let rule = add_rule(&conn);
        let manual = insert_entry(&conn, d("2025-01-01"), -5000, "rent", None).unwrap();
        let generated = insert_entry(&conn, d("2025-01-01"), -5000, "rent", Some(rule)).unwrap();
        assert_ne!(manual, generated);
        let count: i64 = conn
            .query_row("SELECT count(*) FROM entries", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_update_entry() {
        let (_dir, conn) = test_db();
        let id = insert_entry(&conn, d("2025-01-15"), -1234, "coffee", None).unwrap();
        update_entry(&conn, id, d("2025-01-16"), -1500, "lunch").unwrap();
        let entry = get_entry(&conn, id).unwrap().unwrap();
        assert_eq!(entry.date, d("2025-01-16"));
        assert_eq!(entry.amount_cents, -1500);
        assert_eq!(entry.note, "lunch");
        assert_eq!(entry.rule_id, None);
    }

    #[test]
    fn test_update_missing_entry_is_not_found() {
        let (_dir, conn) = test_db();
        let err = update_entry(&conn, 999, d("2025-01-01"), 0, "").unwrap_err();
        assert!(matches!(err, BudgetError::NotFound("entry", 999)));
    }

    #[test]
    fn test_delete_entry_is_idempotent() {
        let (_dir, conn) = test_db();
        let id = insert_entry(&conn, d("2025-01-15"), 100, "", None).unwrap();
        delete_entry(&conn, id).unwrap();
        delete_entry(&conn, id).unwrap();
        assert!(get_entry(&conn, id).unwrap().is_none());
    }

    #[test]
    fn test_list_by_date_newest_first() {
        let (_dir, conn) = test_db();
        let a = insert_entry(&conn, d("2025-01-15"), 100, "a", None).unwrap();
        let b = insert_entry(&conn, d("2025-01-15"), 200, "b", None).unwrap();
        insert_entry(&conn, d("2025-01-16"), 300, "other day", None).unwrap();
        let entries = list_by_date(&conn, d("2025-01-15")).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, b);
        assert_eq!(entries[1].id, a);
    }

    #[test]
    fn test_get_missing_entry() {
        let (_dir, conn) = test_db();
        assert!(get_entry(&conn, 42).unwrap().is_none());
    }
}
