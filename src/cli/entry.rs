use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::balance::balance_through;
use crate::cli::{open_db, parse_date};
use crate::error::{BudgetError, Result};
use crate::fmt::{money, parse_amount};
use crate::store;

pub fn add(date: &str, amount: &str, note: &str) -> Result<()> {
    let date = parse_date(date)?;
    let cents = parse_amount(amount)?;
    let conn = open_db()?;
    let id = store::insert_entry(&conn, date, cents, note, None)?;
    println!("Added entry {id}: {} on {date}", money(cents));
    Ok(())
}

pub fn edit(id: i64, date: Option<&str>, amount: Option<&str>, note: Option<&str>) -> Result<()> {
    let conn = open_db()?;
    let current = store::get_entry(&conn, id)?.ok_or(BudgetError::NotFound("entry", id))?;

    let new_date = match date {
        Some(s) => parse_date(s)?,
        None => current.date,
    };
    let new_cents = match amount {
        Some(s) => parse_amount(s)?,
        None => current.amount_cents,
    };
    let new_note = note.unwrap_or(&current.note);

    store::update_entry(&conn, id, new_date, new_cents, new_note)?;
    println!("Updated entry {id}: {} on {new_date}", money(new_cents));
    Ok(())
}

pub fn remove(id: i64) -> Result<()> {
    let conn = open_db()?;
    store::delete_entry(&conn, id)?;
    println!("Deleted entry {id}");
    Ok(())
}

pub fn day(date: &str) -> Result<()> {
    let date = parse_date(date)?;
    let conn = open_db()?;
    let entries = store::list_by_date(&conn, date)?;

    if entries.is_empty() {
        println!("No entries on {date}");
    } else {
        let mut table = Table::new();
        table.set_header(vec!["ID", "Amount", "Note", ""]);
        for entry in &entries {
            table.add_row(vec![
                Cell::new(entry.id),
                Cell::new(money(entry.amount_cents)),
                Cell::new(&entry.note),
                // Recurring marker, same glyph the original calendar used.
                Cell::new(if entry.rule_id.is_some() { "⟲" } else { "" }),
            ]);
        }
        println!("{date}\n{table}");
    }

    let balance = balance_through(&conn, date)?;
    let shown = money(balance);
    let shown = if balance < 0 { shown.red() } else { shown.green() };
    println!("Ending balance: {shown}");
    Ok(())
}

pub fn balance(date: &str) -> Result<()> {
    let date = parse_date(date)?;
    let conn = open_db()?;
    let balance = balance_through(&conn, date)?;
    let shown = money(balance);
    let shown = if balance < 0 { shown.red() } else { shown.green() };
    println!("Balance through {date}: {shown}");
    Ok(())
}
