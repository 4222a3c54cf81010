// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rust_decimal::Decimal;

use crate::models::AccountKind;
use crate::session::Session;
use crate::store::KvStore;
use crate::utils::{fmt_money, pretty_table};

/// Checks the invariants the data layer relies on: denormalized balances
/// matching the sum of signed postings, and no dangling account references
/// left behind by a cascade that never ran.
pub fn handle<S: KvStore>(session: &mut Session<S>, m: &clap::ArgMatches) -> Result<()> {
    let fix = m.get_flag("fix");
    let mut rows = Vec::new();

    // 1) Balance drift. Only general accounts are posting-backed: savings
    // balances hold goal deposits with no transaction trail, so comparing
    // them against postings (or "repairing" them) would wipe real money.
    let mut drifted = Vec::new();
    for account in session.accounts() {
        if account.kind == AccountKind::Savings {
            continue;
        }
        let posted: Decimal = session
            .transactions()
            .iter()
            .filter(|t| t.account_id == account.id)
            .map(|t| t.kind.sign() * t.amount)
            .sum();
        if posted != account.balance {
            rows.push(vec![
                "balance_drift".into(),
                format!(
                    "{}: stored {} posted {}",
                    account.name,
                    fmt_money(&account.balance),
                    fmt_money(&posted)
                ),
            ]);
            drifted.push(account.id.clone());
        }
    }

    // 2) Postings against accounts that no longer exist
    for t in session.transactions() {
        if !session.accounts().iter().any(|a| a.id == t.account_id) {
            rows.push(vec![
                "dangling_account_ref".into(),
                format!("transaction {} -> {}", t.id, t.account_id),
            ]);
        }
    }

    // 3) Bills pointing at a missing payment account
    for b in session.bills() {
        if let Some(acct) = &b.payment_account_id {
            if !session.accounts().iter().any(|a| &a.id == acct) {
                rows.push(vec![
                    "dangling_account_ref".into(),
                    format!("bill {} -> {}", b.id, acct),
                ]);
            }
        }
    }

    if rows.is_empty() {
        println!("doctor: no issues found");
        return Ok(());
    }
    println!("{}", pretty_table(&["Issue", "Detail"], rows));

    if fix {
        for id in drifted {
            if let Some(account) = session.recompute_account_balance(&id)? {
                println!(
                    "Repaired balance for '{}': {}",
                    account.name,
                    fmt_money(&account.balance)
                );
            }
        }
    }
    Ok(())
}
