use chrono::{Datelike, NaiveDate};
use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::balance::running_balances;
use crate::cli::{open_db, parse_month};
use crate::error::{BudgetError, Result};
use crate::fmt::money;
use crate::recurrence::{add_months, end_of_month, generate_until, rules_all};
use crate::settings::load_settings;

pub fn run(month: &str) -> Result<()> {
    let (year, month_no) = parse_month(month)?;
    let first = NaiveDate::from_ymd_opt(year, month_no, 1)
        .ok_or_else(|| BudgetError::InvalidDate(month.to_string()))?;
    let last = end_of_month(year, month_no);

    let mut conn = open_db()?;

    // Extend every rule well past the viewed month before computing balances,
    // the same refresh the original app ran when painting its month grid.
    // Each rule resumes from its own cursor, so this only pays for new
    // occurrences no matter how often it runs.
    let ahead = add_months(first, load_settings().ahead_months as i64);
    let far_horizon = end_of_month(ahead.year(), ahead.month());
    for rule in rules_all(&conn)? {
        generate_until(&mut conn, rule.id, far_horizon)?;
    }

    let days = running_balances(&conn, first, last)?;

    let mut table = Table::new();
    table.set_header(vec!["Date", "Day total", "Ending balance"]);
    for day in &days {
        table.add_row(vec![
            Cell::new(day.date),
            Cell::new(if day.day_total == 0 {
                String::new()
            } else {
                money(day.day_total)
            }),
            Cell::new(money(day.ending_balance)),
        ]);
    }
    println!("{month}\n{table}");

    if let Some(end) = days.last() {
        let shown = money(end.ending_balance);
        let shown = if end.ending_balance < 0 { shown.red() } else { shown.green() };
        println!("Month-end balance: {shown}");
    }
    Ok(())
}
