// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde_json::Value;

use billfold::models::*;
use billfold::repo::FinanceRepo;
use billfold::session::{Session, SessionError};
use billfold::store::{KvStore, MemoryStore, StoreError};

/// Store wrapper that fails reads or writes for configured keys; the fault
/// sets stay shared with the test so they can be flipped mid-scenario.
#[derive(Clone, Default)]
struct Faults {
    reads: Rc<RefCell<HashSet<String>>>,
    writes: Rc<RefCell<HashSet<String>>>,
}

struct FlakyStore {
    inner: MemoryStore,
    faults: Faults,
}

impl FlakyStore {
    fn new(faults: Faults) -> Self {
        Self {
            inner: MemoryStore::new(),
            faults,
        }
    }
}

impl KvStore for FlakyStore {
    fn save(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        if self.faults.writes.borrow().contains(key) {
            return Err(StoreError::Backend(format!(
                "injected write failure for '{key}'"
            )));
        }
        self.inner.save(key, value)
    }

    fn get(&mut self, key: &str) -> Result<Option<Value>, StoreError> {
        if self.faults.reads.borrow().contains(key) {
            return Err(StoreError::Backend(format!(
                "injected read failure for '{key}'"
            )));
        }
        self.inner.get(key)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.inner.remove(key)
    }

    fn clear_all(&mut self) -> Result<(), StoreError> {
        self.inner.clear_all()
    }
}

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

fn draft_tx(account_id: &str, kind: TxKind, amount: &str, category: &str) -> NewTransaction {
    NewTransaction {
        kind,
        category: category.into(),
        amount: dec(amount),
        date: Utc::now(),
        description: String::new(),
        account_id: account_id.into(),
        custom_category_description: None,
        notes: None,
    }
}

#[test]
fn balance_follows_postings() {
    let mut session = setup();
    let a = session
        .add_account(draft_account("Checking", AccountKind::General, "100"))
        .unwrap();

    session
        .add_transaction(draft_tx(&a.id, TxKind::Income, "50", "Salary"))
        .unwrap()
        .unwrap();
    let balance = session.accounts()[0].balance;
    assert_eq!(balance, dec("150"));

    session
        .add_transaction(draft_tx(&a.id, TxKind::Expense, "30", "Groceries"))
        .unwrap()
        .unwrap();
    let balance = session.accounts()[0].balance;
    assert_eq!(balance, dec("120"));

    assert_eq!(session.budget().spent, dec("30"));

    // the stored balance equals the sum of signed postings end to end
    let repaired = session.recompute_account_balance(&a.id).unwrap().unwrap();
    assert_eq!(repaired.balance, dec("120"));
}

#[test]
fn general_account_opens_with_synthetic_income() {
    let mut session = setup();
    let a = session
        .add_account(draft_account("Checking", AccountKind::General, "100"))
        .unwrap();

    let txs = session.transactions();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].kind, TxKind::Income);
    assert_eq!(txs[0].amount, dec("100"));
    assert_eq!(txs[0].account_id, a.id);
}

#[test]
fn savings_and_zero_balance_accounts_get_no_opening_posting() {
    let mut session = setup();
    session
        .add_account(draft_account("Vacation", AccountKind::Savings, "500"))
        .unwrap();
    session
        .add_account(draft_account("Empty", AccountKind::General, "0"))
        .unwrap();
    assert!(session.transactions().is_empty());
}

#[test]
fn add_transaction_against_unknown_account_aborts() {
    let mut session = setup();
    let posted = session
        .add_transaction(draft_tx("ghost", TxKind::Income, "50", "Salary"))
        .unwrap();
    assert!(posted.is_none());
    assert!(session.transactions().is_empty());
}

#[test]
fn update_transaction_refreshes_budget() {
    let mut session = setup();
    let a = session
        .add_account(draft_account("Checking", AccountKind::General, "0"))
        .unwrap();
    let tx = session
        .add_transaction(draft_tx(&a.id, TxKind::Expense, "30", "Groceries"))
        .unwrap()
        .unwrap();
    assert_eq!(session.budget().spent, dec("30"));

    session
        .update_transaction(
            &tx.id,
            TransactionPatch {
                amount: Some(dec("45")),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(session.budget().spent, dec("45"));

    session.delete_transaction(&tx.id).unwrap();
    assert_eq!(session.budget().spent, Decimal::ZERO);
}

#[test]
fn update_missing_transaction_is_a_logged_no_op() {
    let mut session = setup();
    let result = session
        .update_transaction(
            "nonexistent-id",
            TransactionPatch {
                amount: Some(dec("5")),
                ..Default::default()
            },
        )
        .unwrap();
    assert!(result.is_none());
    assert!(session.transactions().is_empty());
}

#[test]
fn delete_account_cascades_through_the_cache() {
    let mut session = setup();
    let a = session
        .add_account(draft_account("Checking", AccountKind::General, "0"))
        .unwrap();
    let keep = session
        .add_account(draft_account("Other", AccountKind::General, "0"))
        .unwrap();
    session
        .add_transaction(draft_tx(&a.id, TxKind::Expense, "30", "Groceries"))
        .unwrap()
        .unwrap();
    session
        .add_transaction(draft_tx(&keep.id, TxKind::Expense, "7", "Fuel"))
        .unwrap()
        .unwrap();
    session
        .add_category(NewCategory {
            name: "Owned".into(),
            icon: "tag".into(),
            color: "#fff".into(),
            budget: dec("0"),
            account_id: Some(a.id.clone()),
        })
        .unwrap();

    session.delete_account(&a.id).unwrap();

    assert!(session.accounts().iter().all(|x| x.id != a.id));
    assert!(session.transactions().iter().all(|t| t.account_id != a.id));
    assert!(
        session
            .categories()
            .iter()
            .all(|c| c.account_id.as_deref() != Some(a.id.as_str()))
    );
    // the surviving account's posting is untouched
    assert_eq!(session.transactions().len(), 1);
    assert_eq!(session.budget().spent, dec("7"));
}

#[test]
fn budget_stats_mirror_into_categories() {
    let mut session = setup();
    let a = session
        .add_account(draft_account("Checking", AccountKind::General, "0"))
        .unwrap();
    session
        .add_category(NewCategory {
            name: "Groceries".into(),
            icon: "cart".into(),
            color: "#fff".into(),
            budget: dec("100"),
            account_id: None,
        })
        .unwrap();
    session
        .update_budget(BudgetPatch {
            total: Some(dec("300")),
            ..Default::default()
        })
        .unwrap();
    session
        .add_transaction(draft_tx(&a.id, TxKind::Expense, "40", "Groceries"))
        .unwrap()
        .unwrap();

    let budget = session.budget();
    assert_eq!(budget.total, dec("300"));
    assert_eq!(budget.spent, dec("40"));
    assert_eq!(budget.remaining, dec("260"));
    assert_eq!(session.categories()[0].spent, dec("40"));
}

#[test]
fn detach_clears_the_snapshot_but_not_the_store() {
    let mut session = setup();
    session
        .add_account(draft_account("Checking", AccountKind::General, "100"))
        .unwrap();

    session.detach();
    assert!(!session.is_attached());
    assert!(session.accounts().is_empty());
    assert!(session.transactions().is_empty());

    // re-attaching reloads what was persisted
    session.attach("local").unwrap();
    assert_eq!(session.accounts().len(), 1);
    assert_eq!(session.transactions().len(), 1);
}

#[test]
fn wipe_tears_down_the_store() {
    let mut session = setup();
    session
        .add_account(draft_account("Checking", AccountKind::General, "100"))
        .unwrap();

    session.wipe().unwrap();
    session.attach("local").unwrap();
    assert!(session.accounts().is_empty());
    assert!(session.transactions().is_empty());
}

#[test]
fn mutations_require_an_attached_session() {
    let mut session = Session::new(FinanceRepo::new(MemoryStore::new()));
    let err = session
        .add_account(draft_account("Checking", AccountKind::General, "0"))
        .unwrap_err();
    assert!(matches!(err, SessionError::NotAttached));

    let err = session
        .add_transaction(draft_tx("x", TxKind::Income, "1", "Salary"))
        .unwrap_err();
    assert!(matches!(err, SessionError::NotAttached));
}

#[test]
fn attach_is_best_effort_when_a_read_fails() {
    let faults = Faults::default();
    let mut session = Session::new(FinanceRepo::new(FlakyStore::new(faults.clone())));
    session.attach("local").unwrap();
    session
        .add_account(draft_account("Checking", AccountKind::General, "100"))
        .unwrap();
    session.detach();

    // Transactions refuse to load; the session still attaches with that
    // field at its empty default and the rest populated.
    faults.reads.borrow_mut().insert("transactions".into());
    session.attach("local").unwrap();
    assert!(session.is_attached());
    assert!(session.transactions().is_empty());
    assert_eq!(session.accounts().len(), 1);
    assert_eq!(session.accounts()[0].balance, dec("100"));
}

#[test]
fn failed_persist_leaves_the_snapshot_untouched() {
    let faults = Faults::default();
    let mut session = Session::new(FinanceRepo::new(FlakyStore::new(faults.clone())));
    session.attach("local").unwrap();
    let a = session
        .add_account(draft_account("Checking", AccountKind::General, "0"))
        .unwrap();

    faults.writes.borrow_mut().insert("transactions".into());
    let err = session
        .add_transaction(draft_tx(&a.id, TxKind::Income, "50", "Salary"))
        .unwrap_err();
    assert!(matches!(err, SessionError::Store(StoreError::Backend(_))));

    // Nothing was applied in memory and the balance never moved.
    assert!(session.transactions().is_empty());
    assert_eq!(session.accounts()[0].balance, Decimal::ZERO);

    // Once the store recovers the same posting goes through.
    faults.writes.borrow_mut().clear();
    session
        .add_transaction(draft_tx(&a.id, TxKind::Income, "50", "Salary"))
        .unwrap()
        .unwrap();
    assert_eq!(session.accounts()[0].balance, dec("50"));
}

#[test]
fn attach_records_the_user_identity() {
    let mut session = setup();
    assert_eq!(session.user_id(), Some("local"));
    session.detach();
    assert_eq!(session.user_id(), None);
}
