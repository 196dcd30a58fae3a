use std::collections::HashMap;

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::error::Result;

/// Sum of all entries dated on or before `date`.
pub fn balance_through(conn: &Connection, date: NaiveDate) -> Result<i64> {
    let balance = conn.query_row(
        "SELECT COALESCE(SUM(amount_cents), 0) FROM entries WHERE date <= ?1",
        [date],
        |row| row.get(0),
    )?;
    Ok(balance)
}

#[derive(Debug, Clone, Copy)]
pub struct DayBalance {
    pub date: NaiveDate,
    pub day_total: i64,
    pub ending_balance: i64,
}

/// Day-by-day running balance across a date range.
///
/// Seeds from the balance through the day before `start`, then accumulates
/// forward using a single per-day aggregate query for the range, so cost is
/// O(range) rather than one full-history scan per visible day.
pub fn running_balances(
    conn: &Connection,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<DayBalance>> {
    if end < start {
        return Ok(Vec::new());
    }

    let mut running = match start.pred_opt() {
        Some(day_before) => balance_through(conn, day_before)?,
        None => 0,
    };

    let mut stmt = conn.prepare(
        "SELECT date, SUM(amount_cents) FROM entries WHERE date BETWEEN ?1 AND ?2 GROUP BY date",
    )?;
    let day_totals: HashMap<NaiveDate, i64> = stmt
        .query_map(rusqlite::params![start, end], |row| {
            Ok((row.get(0)?, row.get(1)?))
        })?
        .collect::<std::result::Result<HashMap<_, _>, _>>()?;

    let mut days = Vec::new();
    let mut day = start;
    loop {
        let day_total = day_totals.get(&day).copied().unwrap_or(0);
        running += day_total;
        days.push(DayBalance {
            date: day,
            day_total,
            ending_balance: running,
        });
        match day.succ_opt() {
            Some(next) if next <= end => day = next,
            _ => break,
        }
    }
    Ok(days)
}
