// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::models::{BillStatus, NewBill};
use crate::session::Session;
use crate::store::KvStore;
use crate::utils::{
    fmt_money, maybe_print_json, parse_date, parse_decimal, parse_frequency, pretty_table,
};

fn status_str(s: BillStatus) -> &'static str {
    match s {
        BillStatus::Pending => "pending",
        BillStatus::Paid => "paid",
        BillStatus::Overdue => "overdue",
    }
}

pub fn handle<S: KvStore>(session: &mut Session<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let frequency = sub
                .get_one::<String>("frequency")
                .map(|s| parse_frequency(s))
                .transpose()?;
            let bill = session.add_bill(NewBill {
                name: sub.get_one::<String>("name").unwrap().clone(),
                amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
                due_date: parse_date(sub.get_one::<String>("due").unwrap())?,
                category: sub.get_one::<String>("category").unwrap().clone(),
                recurring: sub.get_flag("recurring"),
                frequency,
                automatic_payment: sub.get_flag("autopay"),
                payment_method: sub.get_one::<String>("method").cloned(),
                payment_account_id: None,
            })?;
            println!(
                "Added bill '{}' ({}) due {}",
                bill.name, bill.id, bill.due_date
            );
        }
        Some(("list", sub)) => {
            let json_flag = sub.get_flag("json");
            let jsonl_flag = sub.get_flag("jsonl");
            let status = sub.get_one::<String>("status").map(|s| s.to_lowercase());
            let bills: Vec<_> = session
                .bills()
                .iter()
                .filter(|b| {
                    status
                        .as_deref()
                        .is_none_or(|s| status_str(b.status) == s)
                })
                .cloned()
                .collect();
            if !maybe_print_json(json_flag, jsonl_flag, &bills)? {
                let rows: Vec<Vec<String>> = bills
                    .iter()
                    .map(|b| {
                        vec![
                            b.id.clone(),
                            b.name.clone(),
                            fmt_money(&b.amount),
                            b.due_date.to_string(),
                            b.category.clone(),
                            status_str(b.status).to_string(),
                            if b.recurring { "yes".into() } else { "no".into() },
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(
                        &["Id", "Name", "Amount", "Due", "Category", "Status", "Recurring"],
                        rows,
                    )
                );
            }
        }
        Some(("pay", sub)) => {
            let id = sub.get_one::<String>("id").unwrap();
            let account = sub.get_one::<String>("account").unwrap();
            match session.pay_bill(id, account)? {
                Some(bill) => println!(
                    "Paid bill '{}' ({}) from account {}",
                    bill.name,
                    fmt_money(&bill.amount),
                    account
                ),
                None => println!("Bill '{}' or account '{}' not found", id, account),
            }
        }
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap();
            session.delete_bill(id)?;
            println!("Removed bill '{}'", id);
        }
        _ => {}
    }
    Ok(())
}
