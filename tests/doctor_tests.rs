// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;

use billfold::models::*;
use billfold::repo::FinanceRepo;
use billfold::session::Session;
use billfold::store::MemoryStore;
use billfold::{cli, commands};

fn setup() -> Session<MemoryStore> {
    let mut session = Session::new(FinanceRepo::new(MemoryStore::new()));
    session.attach("local").unwrap();
    session
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn draft_account(name: &str, kind: AccountKind, balance: &str) -> NewAccount {
    NewAccount {
        name: name.into(),
        kind,
        balance: dec(balance),
        icon: "wallet".into(),
        color: "#4caf50".into(),
        goal_balance: None,
    }
}

fn run_doctor_fix(session: &mut Session<MemoryStore>) {
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["billfold", "doctor", "--fix"]);
    if let Some(("doctor", sub)) = matches.subcommand() {
        commands::doctor::handle(session, sub).unwrap();
    } else {
        panic!("no doctor subcommand");
    }
}

#[test]
fn fix_leaves_savings_opening_balances_alone() {
    let mut session = setup();
    session
        .add_account(draft_account("Vacation", AccountKind::Savings, "500"))
        .unwrap();

    // Savings deposits have no posting trail; they are not drift.
    run_doctor_fix(&mut session);
    assert_eq!(session.accounts()[0].balance, dec("500"));
}

#[test]
fn fix_repairs_drifted_general_balances() {
    let mut session = setup();
    let a = session
        .add_account(draft_account("Checking", AccountKind::General, "100"))
        .unwrap();

    // Desync the denormalized balance away from its postings.
    session
        .update_account(
            &a.id,
            AccountPatch {
                balance: Some(dec("999")),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();

    run_doctor_fix(&mut session);
    assert_eq!(session.accounts()[0].balance, dec("100"));
}
