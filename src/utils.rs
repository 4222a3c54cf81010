// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rust_decimal::Decimal;

use crate::models::{AccountKind, BillFrequency, TxKind};

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// CLI dates are calendar days; records store instants. Midnight UTC.
pub fn date_to_instant(d: NaiveDate) -> DateTime<Utc> {
    d.and_time(NaiveTime::MIN).and_utc()
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn parse_tx_kind(s: &str) -> Result<TxKind> {
    match s.to_lowercase().as_str() {
        "income" => Ok(TxKind::Income),
        "expense" => Ok(TxKind::Expense),
        other => Err(anyhow::anyhow!(
            "Invalid transaction type '{}' (use income|expense)",
            other
        )),
    }
}

pub fn parse_account_kind(s: &str) -> Result<AccountKind> {
    match s.to_lowercase().as_str() {
        "general" => Ok(AccountKind::General),
        "savings" => Ok(AccountKind::Savings),
        other => Err(anyhow::anyhow!(
            "Invalid account type '{}' (use general|savings)",
            other
        )),
    }
}

pub fn parse_frequency(s: &str) -> Result<BillFrequency> {
    match s.to_lowercase().as_str() {
        "weekly" => Ok(BillFrequency::Weekly),
        "monthly" => Ok(BillFrequency::Monthly),
        "quarterly" => Ok(BillFrequency::Quarterly),
        "yearly" => Ok(BillFrequency::Yearly),
        other => Err(anyhow::anyhow!(
            "Invalid frequency '{}' (use weekly|monthly|quarterly|yearly)",
            other
        )),
    }
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
