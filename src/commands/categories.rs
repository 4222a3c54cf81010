// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::models::NewCategory;
use crate::session::Session;
use crate::store::KvStore;
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};

pub fn handle<S: KvStore>(session: &mut Session<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let cat = session.add_category(NewCategory {
                name: sub.get_one::<String>("name").unwrap().clone(),
                icon: sub.get_one::<String>("icon").unwrap().clone(),
                color: sub.get_one::<String>("color").unwrap().clone(),
                budget: parse_decimal(sub.get_one::<String>("budget").unwrap())?,
                account_id: sub.get_one::<String>("account").cloned(),
            })?;
            println!("Added category '{}' ({})", cat.name, cat.id);
        }
        Some(("list", sub)) => {
            let json_flag = sub.get_flag("json");
            let jsonl_flag = sub.get_flag("jsonl");
            let categories = session.categories();
            if !maybe_print_json(json_flag, jsonl_flag, &categories)? {
                let rows: Vec<Vec<String>> = categories
                    .iter()
                    .map(|c| {
                        vec![
                            c.id.clone(),
                            c.name.clone(),
                            fmt_money(&c.budget),
                            fmt_money(&c.spent),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Id", "Name", "Budget", "Spent"], rows)
                );
            }
        }
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap();
            session.delete_category(id)?;
            println!("Removed category '{}'", id);
        }
        _ => {}
    }
    Ok(())
}
