use chrono::Datelike;
use comfy_table::{Cell, Table};

use crate::cli::{open_db, parse_date};
use crate::error::Result;
use crate::fmt::{money, parse_amount};
use crate::recurrence::{
    add_months, coalesce_manual_start, create_rule, delete_rule_and_entries, end_of_month,
    generate_until, rules_all,
};
use crate::settings::load_settings;

pub fn add(
    start: &str,
    amount: &str,
    note: &str,
    every: i64,
    unit: &str,
    through: Option<&str>,
) -> Result<()> {
    let start = parse_date(start)?;
    let cents = parse_amount(amount)?;
    let unit = unit.parse()?;
    let horizon = match through {
        Some(s) => parse_date(s)?,
        None => {
            let ahead = add_months(start, load_settings().ahead_months as i64);
            end_of_month(ahead.year(), ahead.month())
        }
    };

    let mut conn = open_db()?;
    let rule_id = create_rule(&conn, start, cents, note, every, unit)?;
    // Merge a hand-entered first occurrence before bulk expansion, so exactly
    // one entry survives on the start date.
    coalesce_manual_start(&mut conn, rule_id)?;
    let produced = generate_until(&mut conn, rule_id, horizon)?;

    println!(
        "Added rule {rule_id}: {} every {every} {unit}(s) from {start}; {produced} entries through {horizon}",
        money(cents)
    );
    Ok(())
}

pub fn list() -> Result<()> {
    let conn = open_db()?;
    let rules = rules_all(&conn)?;
    if rules.is_empty() {
        println!("No recurring rules");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Start", "Amount", "Note", "Repeats", "Generated through"]);
    for rule in rules {
        table.add_row(vec![
            Cell::new(rule.id),
            Cell::new(rule.start_date),
            Cell::new(money(rule.amount_cents)),
            Cell::new(&rule.note),
            Cell::new(format!("every {} {}(s)", rule.every_n, rule.unit)),
            Cell::new(
                rule.last_generated_date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ]);
    }
    println!("Recurring rules\n{table}");
    Ok(())
}

pub fn remove(id: i64) -> Result<()> {
    let mut conn = open_db()?;
    let removed = delete_rule_and_entries(&mut conn, id)?;
    println!("Deleted rule {id} and {removed} generated entries");
    Ok(())
}

pub fn generate(through: &str) -> Result<()> {
    let horizon = parse_date(through)?;
    let mut conn = open_db()?;
    let mut produced = 0;
    for rule in rules_all(&conn)? {
        produced += generate_until(&mut conn, rule.id, horizon)?;
    }
    println!("Generated {produced} entries through {horizon}");
    Ok(())
}
