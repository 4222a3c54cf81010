// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::models::{AccountKind, NewAccount};
use crate::session::Session;
use crate::store::KvStore;
use crate::utils::{fmt_money, maybe_print_json, parse_account_kind, parse_decimal, pretty_table};

pub fn handle<S: KvStore>(session: &mut Session<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().clone();
            let kind = parse_account_kind(sub.get_one::<String>("type").unwrap())?;
            let balance = parse_decimal(sub.get_one::<String>("balance").unwrap())?;
            let goal_balance = sub
                .get_one::<String>("goal")
                .map(|s| parse_decimal(s))
                .transpose()?;
            let account = session.add_account(NewAccount {
                name,
                kind,
                balance,
                icon: sub.get_one::<String>("icon").unwrap().clone(),
                color: sub.get_one::<String>("color").unwrap().clone(),
                goal_balance,
            })?;
            println!(
                "Added account '{}' ({}) with balance {}",
                account.name,
                account.id,
                fmt_money(&account.balance)
            );
        }
        Some(("list", sub)) => {
            let json_flag = sub.get_flag("json");
            let jsonl_flag = sub.get_flag("jsonl");
            let accounts = session.accounts();
            if !maybe_print_json(json_flag, jsonl_flag, &accounts)? {
                let rows: Vec<Vec<String>> = accounts
                    .iter()
                    .map(|a| {
                        vec![
                            a.id.clone(),
                            a.name.clone(),
                            match a.kind {
                                AccountKind::General => "general".into(),
                                AccountKind::Savings => "savings".into(),
                            },
                            fmt_money(&a.balance),
                            a.goal_balance
                                .as_ref()
                                .map(fmt_money)
                                .unwrap_or_default(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Id", "Name", "Type", "Balance", "Goal"], rows)
                );
            }
        }
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap();
            session.delete_account(id)?;
            println!("Removed account '{}' and its postings", id);
        }
        Some(("recompute", sub)) => {
            let id = sub.get_one::<String>("id").unwrap();
            match session.recompute_account_balance(id)? {
                Some(account) => println!(
                    "Recomputed balance for '{}': {}",
                    account.name,
                    fmt_money(&account.balance)
                ),
                None => println!("No account with id '{}'", id),
            }
        }
        _ => {}
    }
    Ok(())
}
