// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;

use crate::models::{NewTransaction, Transaction, TxKind};
use crate::session::Session;
use crate::store::KvStore;
use crate::utils::{
    date_to_instant, fmt_money, maybe_print_json, parse_date, parse_decimal, parse_tx_kind,
    pretty_table,
};

pub fn handle<S: KvStore>(session: &mut Session<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(session, sub)?,
        Some(("list", sub)) => list(session, sub)?,
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap();
            session.delete_transaction(id)?;
            println!("Removed transaction '{}'", id);
        }
        _ => {}
    }
    Ok(())
}

fn add<S: KvStore>(session: &mut Session<S>, sub: &clap::ArgMatches) -> Result<()> {
    let kind = parse_tx_kind(sub.get_one::<String>("type").unwrap())?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let account_id = sub.get_one::<String>("account").unwrap().clone();
    let date = match sub.get_one::<String>("date") {
        Some(s) => date_to_instant(parse_date(s)?),
        None => Utc::now(),
    };

    let posted = session.add_transaction(NewTransaction {
        kind,
        category: sub.get_one::<String>("category").unwrap().clone(),
        amount,
        date,
        description: sub.get_one::<String>("description").unwrap().clone(),
        account_id: account_id.clone(),
        custom_category_description: None,
        notes: sub.get_one::<String>("notes").cloned(),
    })?;

    match posted {
        Some(tx) => println!(
            "Recorded {} {} ({}) against account {}",
            match tx.kind {
                TxKind::Income => "income",
                TxKind::Expense => "expense",
            },
            fmt_money(&tx.amount),
            tx.id,
            account_id
        ),
        None => println!("No account with id '{}'; nothing recorded", account_id),
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub kind: String,
    pub amount: String,
    pub category: String,
    pub account_id: String,
    pub description: String,
}

pub fn query_rows(transactions: &[Transaction], sub: &clap::ArgMatches) -> Vec<TransactionRow> {
    let account = sub.get_one::<String>("account");
    let category = sub.get_one::<String>("category");

    let mut filtered: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| account.is_none_or(|a| &t.account_id == a))
        .filter(|t| category.is_none_or(|c| &t.category == c))
        .collect();
    filtered.sort_by(|a, b| b.date.cmp(&a.date));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        filtered.truncate(*limit);
    }

    filtered
        .into_iter()
        .map(|t| TransactionRow {
            id: t.id.clone(),
            date: t.date.format("%Y-%m-%d").to_string(),
            kind: match t.kind {
                TxKind::Income => "income".into(),
                TxKind::Expense => "expense".into(),
            },
            amount: fmt_money(&t.amount),
            category: t.category.clone(),
            account_id: t.account_id.clone(),
            description: t.description.clone(),
        })
        .collect()
}

fn list<S: KvStore>(session: &Session<S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(session.transactions(), sub);
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.clone(),
                    r.date.clone(),
                    r.kind.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.account_id.clone(),
                    r.description.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Type", "Amount", "Category", "Account", "Description"],
                rows,
            )
        );
    }
    Ok(())
}
