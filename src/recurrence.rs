use chrono::{Datelike, Duration, NaiveDate};
use rusqlite::{Connection, OptionalExtension, Row};

use crate::error::{BudgetError, Result};
use crate::models::{Rule, Unit};
use crate::store::insert_entry;

fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

pub fn last_day_of_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => unreachable!("month is always 1..=12"),
    }
}

pub fn end_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, last_day_of_month(year, month))
        .expect("last day always fits its month")
}

/// Add N months, clamping the day to the end of the target month
/// (Jan 31 + 1 month = Feb 28, or Feb 29 in a leap year).
pub fn add_months(d: NaiveDate, months: i64) -> NaiveDate {
    let idx = d.year() as i64 * 12 + (d.month() as i64 - 1) + months;
    let year = idx.div_euclid(12) as i32;
    let month = (idx.rem_euclid(12) + 1) as u32;
    let day = d.day().min(last_day_of_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).expect("clamped day always fits its month")
}

/// Next occurrence after `d` for a rule with this interval.
pub fn advance(d: NaiveDate, every_n: i64, unit: Unit) -> NaiveDate {
    match unit {
        Unit::Day => d + Duration::days(every_n),
        Unit::Week => d + Duration::days(every_n * 7),
        Unit::Month => add_months(d, every_n),
    }
}

fn rule_from_row(row: &Row) -> rusqlite::Result<Rule> {
    Ok(Rule {
        id: row.get(0)?,
        start_date: row.get(1)?,
        amount_cents: row.get(2)?,
        note: row.get(3)?,
        every_n: row.get(4)?,
        unit: row.get(5)?,
        last_generated_date: row.get(6)?,
    })
}

const RULE_COLUMNS: &str =
    "id, start_date, amount_cents, note, every_n, unit, last_generated_date";

pub fn create_rule(
    conn: &Connection,
    start_date: NaiveDate,
    amount_cents: i64,
    note: &str,
    every_n: i64,
    unit: Unit,
) -> Result<i64> {
    if every_n < 1 {
        return Err(BudgetError::NonPositiveInterval(every_n));
    }
    conn.execute(
        "INSERT INTO recurring_rules (start_date, amount_cents, note, every_n, unit, last_generated_date) \
         VALUES (?1, ?2, ?3, ?4, ?5, NULL)",
        rusqlite::params![start_date, amount_cents, note, every_n, unit],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_rule(conn: &Connection, rule_id: i64) -> Result<Option<Rule>> {
    let rule = conn
        .query_row(
            &format!("SELECT {RULE_COLUMNS} FROM recurring_rules WHERE id = ?1"),
            [rule_id],
            rule_from_row,
        )
        .optional()?;
    Ok(rule)
}

pub fn rules_all(conn: &Connection) -> Result<Vec<Rule>> {
    let mut stmt =
        conn.prepare(&format!("SELECT {RULE_COLUMNS} FROM recurring_rules ORDER BY id"))?;
    let rules = stmt
        .query_map([], rule_from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rules)
}

/// Materialize a rule's occurrences up to and including `horizon`.
///
/// Resumes one step past the stored cursor, so repeated calls with a growing
/// horizon only ever pay for the new occurrences; the idempotent insert
/// guarantees no duplicates even if the same horizon is replayed. Returns the
/// number of occurrences produced. Missing rule is a no-op.
pub fn generate_until(conn: &mut Connection, rule_id: i64, horizon: NaiveDate) -> Result<usize> {
    let Some(rule) = get_rule(conn, rule_id)? else {
        return Ok(0);
    };

    let mut next = match rule.last_generated_date {
        Some(cursor) => advance(cursor, rule.every_n, rule.unit),
        None => rule.start_date,
    };
    if next > horizon {
        return Ok(0);
    }

    let tx = conn.transaction()?;
    let mut produced = 0usize;
    let mut last_created = None;
    while next <= horizon {
        insert_entry(&tx, next, rule.amount_cents, &rule.note, Some(rule.id))?;
        last_created = Some(next);
        produced += 1;
        next = advance(next, rule.every_n, rule.unit);
    }
    if let Some(date) = last_created {
        // Cursor is the last occurrence actually produced, not one past it.
        tx.execute(
            "UPDATE recurring_rules SET last_generated_date = ?1 WHERE id = ?2",
            rusqlite::params![date, rule.id],
        )?;
    }
    tx.commit()?;
    Ok(produced)
}

/// Merge a manually entered first occurrence into a freshly created rule.
///
/// If the user recorded the payment by hand and then set up a rule starting
/// on that same date with the same amount and note, exactly one entry must
/// survive. Run this after `create_rule` and before the first
/// `generate_until`.
pub fn coalesce_manual_start(conn: &mut Connection, rule_id: i64) -> Result<()> {
    let Some(rule) = get_rule(conn, rule_id)? else {
        return Ok(());
    };

    let tx = conn.transaction()?;
    let manual: Option<i64> = tx
        .query_row(
            "SELECT id FROM entries WHERE date = ?1 AND amount_cents = ?2 AND note = ?3 \
             AND rule_id IS NULL LIMIT 1",
            rusqlite::params![rule.start_date, rule.amount_cents, rule.note],
            |r| r.get(0),
        )
        .optional()?;
    let Some(manual_id) = manual else {
        return Ok(());
    };

    let generated: Option<i64> = tx
        .query_row(
            "SELECT id FROM entries WHERE date = ?1 AND amount_cents = ?2 AND note = ?3 \
             AND rule_id = ?4 LIMIT 1",
            rusqlite::params![rule.start_date, rule.amount_cents, rule.note, rule.id],
            |r| r.get(0),
        )
        .optional()?;

    if generated.is_some() {
        // Expansion already materialized this date; the generated row wins
        // because it carries the rule linkage.
        tx.execute("DELETE FROM entries WHERE id = ?1", [manual_id])?;
    } else {
        // Re-parent instead of delete+reinsert so the entry keeps its id.
        tx.execute(
            "UPDATE entries SET rule_id = ?1 WHERE id = ?2",
            rusqlite::params![rule.id, manual_id],
        )?;
    }
    tx.commit()?;
    Ok(())
}

/// Delete a rule together with every entry it generated. Manual entries and
/// other rules' entries are untouched. Returns how many entries were removed.
pub fn delete_rule_and_entries(conn: &mut Connection, rule_id: i64) -> Result<usize> {
    let tx = conn.transaction()?;
    let removed = tx.execute("DELETE FROM entries WHERE rule_id = ?1", [rule_id])?;
    tx.execute("DELETE FROM recurring_rules WHERE id = ?1", [rule_id])?;
    tx.commit()?;
    Ok(removed)
}
