// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use billfold::models::*;
use billfold::repo::FinanceRepo;
use billfold::session::Session;
use billfold::store::MemoryStore;

fn setup() -> Session<MemoryStore> {
    let mut session = Session::new(FinanceRepo::new(MemoryStore::new()));
    session.attach("local").unwrap();
    session
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn draft_bill(name: &str, amount: &str) -> NewBill {
    NewBill {
        name: name.into(),
        amount: dec(amount),
        due_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
        category: "Utilities".into(),
        recurring: true,
        frequency: Some(BillFrequency::Monthly),
        automatic_payment: false,
        payment_method: None,
        payment_account_id: None,
    }
}

#[test]
fn new_bills_start_pending_and_unpaid() {
    let mut session = setup();
    let bill = session.add_bill(draft_bill("Electricity", "60")).unwrap();
    assert_eq!(bill.status, BillStatus::Pending);
    assert!(bill.paid_at.is_none());
    assert_eq!(session.bills().len(), 1);
}

#[test]
fn bill_crud_leaves_budget_untouched() {
    let mut session = setup();
    let bill = session.add_bill(draft_bill("Electricity", "60")).unwrap();
    session
        .update_bill(
            &bill.id,
            BillPatch {
                status: Some(BillStatus::Overdue),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(session.bills()[0].status, BillStatus::Overdue);
    assert_eq!(session.budget().spent, Decimal::ZERO);

    session.delete_bill(&bill.id).unwrap();
    assert!(session.bills().is_empty());
}

#[test]
fn pay_bill_marks_paid_and_posts_the_expense_once() {
    let mut session = setup();
    let account = session
        .add_account(NewAccount {
            name: "Checking".into(),
            kind: AccountKind::General,
            balance: dec("100"),
            icon: "wallet".into(),
            color: "#4caf50".into(),
            goal_balance: None,
        })
        .unwrap();
    let bill = session.add_bill(draft_bill("Electricity", "40")).unwrap();

    let paid = session.pay_bill(&bill.id, &account.id).unwrap().unwrap();
    assert_eq!(paid.status, BillStatus::Paid);
    assert!(paid.paid_at.is_some());
    assert_eq!(paid.payment_account_id.as_deref(), Some(account.id.as_str()));

    // opening income + exactly one payment expense
    let expenses: Vec<_> = session
        .transactions()
        .iter()
        .filter(|t| t.kind == TxKind::Expense)
        .collect();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].amount, dec("40"));
    assert_eq!(expenses[0].category, "Utilities");

    assert_eq!(session.accounts()[0].balance, dec("60"));
    assert_eq!(session.budget().spent, dec("40"));
}

#[test]
fn pay_bill_with_unknown_target_aborts() {
    let mut session = setup();
    let account = session
        .add_account(NewAccount {
            name: "Checking".into(),
            kind: AccountKind::General,
            balance: dec("0"),
            icon: "wallet".into(),
            color: "#4caf50".into(),
            goal_balance: None,
        })
        .unwrap();
    let bill = session.add_bill(draft_bill("Electricity", "40")).unwrap();

    assert!(session.pay_bill("ghost", &account.id).unwrap().is_none());
    assert!(session.pay_bill(&bill.id, "ghost").unwrap().is_none());

    // nothing was marked or posted
    assert_eq!(session.bills()[0].status, BillStatus::Pending);
    assert!(
        session
            .transactions()
            .iter()
            .all(|t| t.kind != TxKind::Expense)
    );
}

#[test]
fn paying_twice_posts_the_expense_only_once() {
    let mut session = setup();
    let account = session
        .add_account(NewAccount {
            name: "Checking".into(),
            kind: AccountKind::General,
            balance: dec("100"),
            icon: "wallet".into(),
            color: "#4caf50".into(),
            goal_balance: None,
        })
        .unwrap();
    let bill = session.add_bill(draft_bill("Electricity", "40")).unwrap();

    session.pay_bill(&bill.id, &account.id).unwrap().unwrap();
    let second = session.pay_bill(&bill.id, &account.id).unwrap();
    assert!(second.is_none());

    let expenses = session
        .transactions()
        .iter()
        .filter(|t| t.kind == TxKind::Expense)
        .count();
    assert_eq!(expenses, 1);
    assert_eq!(session.accounts()[0].balance, dec("60"));
    assert_eq!(session.budget().spent, dec("40"));
}

#[test]
fn update_fields_merge_shallowly() {
    let mut session = setup();
    let bill = session.add_bill(draft_bill("Internet", "35")).unwrap();
    let updated = session
        .update_bill(
            &bill.id,
            BillPatch {
                amount: Some(dec("39")),
                payment_method: Some("card".into()),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(updated.amount, dec("39"));
    assert_eq!(updated.payment_method.as_deref(), Some("card"));
    assert_eq!(updated.name, "Internet");
    assert_eq!(updated.frequency, Some(BillFrequency::Monthly));
}
