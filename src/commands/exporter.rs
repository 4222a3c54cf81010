// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use serde_json::json;

use crate::models::TxKind;
use crate::session::Session;
use crate::store::KvStore;

pub fn handle<S: KvStore>(session: &Session<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(session, sub),
        _ => Ok(()),
    }
}

fn export_transactions<S: KvStore>(session: &Session<S>, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut txs = session.transactions().to_vec();
    txs.sort_by(|a, b| a.date.cmp(&b.date));

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "id", "date", "type", "amount", "category", "account_id", "description", "notes",
            ])?;
            for t in &txs {
                wtr.write_record([
                    t.id.clone(),
                    t.date.to_rfc3339(),
                    match t.kind {
                        TxKind::Income => "income".into(),
                        TxKind::Expense => "expense".into(),
                    },
                    t.amount.to_string(),
                    t.category.clone(),
                    t.account_id.clone(),
                    t.description.clone(),
                    t.notes.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = txs.iter().map(|t| json!(t)).collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported {} transactions to {}", txs.len(), out);
    Ok(())
}
