use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use crate::error::BudgetError;

/// Repeat unit for a recurring rule. Only these three values are ever
/// persisted; the schema carries a matching CHECK constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Day,
    Week,
    Month,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Day => "day",
            Unit::Week => "week",
            Unit::Month => "month",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = BudgetError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "day" => Ok(Unit::Day),
            "week" => Ok(Unit::Week),
            "month" => Ok(Unit::Month),
            other => Err(BudgetError::InvalidUnit(other.to_string())),
        }
    }
}

impl ToSql for Unit {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for Unit {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        s.parse().map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// One ledger line. `rule_id` is the sole discriminator between manual
/// entries (None) and entries materialized from a recurring rule.
#[derive(Debug, Clone)]
pub struct Entry {
    pub id: i64,
    pub date: NaiveDate,
    pub amount_cents: i64,
    pub note: String,
    pub rule_id: Option<i64>,
}

/// A recurrence template. `last_generated_date` is the expansion cursor:
/// the date of the most recently materialized occurrence, or None if the
/// rule has never been expanded.
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: i64,
    pub start_date: NaiveDate,
    pub amount_cents: i64,
    pub note: String,
    pub every_n: i64,
    pub unit: Unit,
    pub last_generated_date: Option<NaiveDate>,
}
