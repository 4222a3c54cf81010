// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::models::BudgetPatch;
use crate::session::Session;
use crate::store::KvStore;
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};

pub fn handle<S: KvStore>(session: &mut Session<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let total = parse_decimal(sub.get_one::<String>("total").unwrap())?;
            let budget = session.update_budget(BudgetPatch {
                total: Some(total),
                ..Default::default()
            })?;
            println!(
                "Budget total set to {} (remaining {})",
                fmt_money(&budget.total),
                fmt_money(&budget.remaining)
            );
        }
        Some(("status", sub)) => {
            let json_flag = sub.get_flag("json");
            let jsonl_flag = sub.get_flag("jsonl");
            let budget = session.calculate_budget_stats()?.clone();
            if !maybe_print_json(json_flag, jsonl_flag, &budget)? {
                println!(
                    "Total {}  Spent {}  Remaining {}",
                    fmt_money(&budget.total),
                    fmt_money(&budget.spent),
                    fmt_money(&budget.remaining)
                );
                let rows: Vec<Vec<String>> = budget
                    .categories
                    .iter()
                    .map(|c| {
                        vec![
                            c.name.clone(),
                            fmt_money(&c.budget),
                            fmt_money(&c.spent),
                            fmt_money(&(c.budget - c.spent)),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Category", "Budget", "Spent", "Left"], rows)
                );
            }
        }
        _ => {}
    }
    Ok(())
}
