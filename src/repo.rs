// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Typed CRUD over the five record collections, each persisted as one
//! whole-collection document through the store adapter.
//!
//! Pure data access: no cross-collection consistency beyond the account
//! deletion cascade. Balance upkeep and budget mirroring live in the
//! session layer.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::models::*;
use crate::store::{KvStore, StoreError};

/// Collection keys in the underlying store.
pub mod keys {
    pub const TRANSACTIONS: &str = "transactions";
    pub const CATEGORIES: &str = "categories";
    pub const ACCOUNTS: &str = "accounts";
    pub const BILLS: &str = "bills";
    pub const BUDGETS: &str = "budgets";
    pub const USER_DATA: &str = "user_data";
}

/// Best-effort unique id: unix millis plus a random hex suffix. Collisions
/// are not detected.
pub fn new_record_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", Utc::now().timestamp_millis(), &suffix[..6])
}

pub struct FinanceRepo<S: KvStore> {
    store: S,
}

impl<S: KvStore> FinanceRepo<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    fn read_list<T: DeserializeOwned>(&mut self, key: &str) -> Result<Vec<T>, StoreError> {
        match self.store.get(key)? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(Vec::new()),
        }
    }

    fn write_list<T: Serialize>(&mut self, key: &str, list: &[T]) -> Result<(), StoreError> {
        self.store.save(key, serde_json::to_value(list)?)
    }

    // Transactions

    pub fn transactions(&mut self) -> Result<Vec<Transaction>, StoreError> {
        self.read_list(keys::TRANSACTIONS)
    }

    pub fn add_transaction(&mut self, new: NewTransaction) -> Result<Transaction, StoreError> {
        let mut list = self.transactions()?;
        let tx = Transaction {
            id: new_record_id(),
            kind: new.kind,
            category: new.category,
            amount: new.amount,
            date: new.date,
            description: new.description,
            account_id: new.account_id,
            custom_category_description: new.custom_category_description,
            notes: new.notes,
        };
        list.push(tx.clone());
        self.write_list(keys::TRANSACTIONS, &list)?;
        Ok(tx)
    }

    pub fn update_transaction(
        &mut self,
        id: &str,
        patch: TransactionPatch,
    ) -> Result<Option<Transaction>, StoreError> {
        let mut list = self.transactions()?;
        let Some(tx) = list.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        patch.apply(tx);
        let updated = tx.clone();
        self.write_list(keys::TRANSACTIONS, &list)?;
        Ok(Some(updated))
    }

    /// Unknown ids are not an error; the list is simply rewritten unchanged.
    pub fn delete_transaction(&mut self, id: &str) -> Result<(), StoreError> {
        let mut list = self.transactions()?;
        list.retain(|t| t.id != id);
        self.write_list(keys::TRANSACTIONS, &list)
    }

    // Categories

    pub fn categories(&mut self) -> Result<Vec<Category>, StoreError> {
        self.read_list(keys::CATEGORIES)
    }

    pub fn add_category(&mut self, new: NewCategory) -> Result<Category, StoreError> {
        let mut list = self.categories()?;
        let cat = Category {
            id: new_record_id(),
            name: new.name,
            icon: new.icon,
            color: new.color,
            budget: new.budget,
            spent: Decimal::ZERO,
            account_id: new.account_id,
        };
        list.push(cat.clone());
        self.write_list(keys::CATEGORIES, &list)?;
        Ok(cat)
    }

    pub fn update_category(
        &mut self,
        id: &str,
        patch: CategoryPatch,
    ) -> Result<Option<Category>, StoreError> {
        let mut list = self.categories()?;
        let Some(cat) = list.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        patch.apply(cat);
        let updated = cat.clone();
        self.write_list(keys::CATEGORIES, &list)?;
        Ok(Some(updated))
    }

    pub fn delete_category(&mut self, id: &str) -> Result<(), StoreError> {
        let mut list = self.categories()?;
        list.retain(|c| c.id != id);
        self.write_list(keys::CATEGORIES, &list)
    }

    // Accounts

    pub fn accounts(&mut self) -> Result<Vec<Account>, StoreError> {
        self.read_list(keys::ACCOUNTS)
    }

    pub fn add_account(&mut self, new: NewAccount) -> Result<Account, StoreError> {
        let mut list = self.accounts()?;
        let account = Account {
            id: new_record_id(),
            name: new.name,
            kind: new.kind,
            balance: new.balance,
            icon: new.icon,
            color: new.color,
            goal_balance: new.goal_balance,
        };
        list.push(account.clone());
        self.write_list(keys::ACCOUNTS, &list)?;
        Ok(account)
    }

    pub fn update_account(
        &mut self,
        id: &str,
        patch: AccountPatch,
    ) -> Result<Option<Account>, StoreError> {
        let mut list = self.accounts()?;
        let Some(account) = list.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        patch.apply(account);
        let updated = account.clone();
        self.write_list(keys::ACCOUNTS, &list)?;
        Ok(Some(updated))
    }

    /// Removes the account and cascades to transactions and categories that
    /// reference it. The three persists run in sequence with no rollback; a
    /// failure partway leaves the store partially cascaded.
    pub fn delete_account(&mut self, id: &str) -> Result<(), StoreError> {
        let mut accounts = self.accounts()?;
        accounts.retain(|a| a.id != id);
        self.write_list(keys::ACCOUNTS, &accounts)?;

        let mut txs = self.transactions()?;
        txs.retain(|t| t.account_id != id);
        self.write_list(keys::TRANSACTIONS, &txs)?;

        let mut cats = self.categories()?;
        cats.retain(|c| c.account_id.as_deref() != Some(id));
        self.write_list(keys::CATEGORIES, &cats)
    }

    /// Repair path for the denormalized balance: sum the signed postings
    /// against the account and persist the result. `None` if the account
    /// does not exist.
    pub fn recompute_account_balance(
        &mut self,
        id: &str,
    ) -> Result<Option<Account>, StoreError> {
        let txs = self.transactions()?;
        let balance: Decimal = txs
            .iter()
            .filter(|t| t.account_id == id)
            .map(|t| t.kind.sign() * t.amount)
            .sum();
        self.update_account(
            id,
            AccountPatch {
                balance: Some(balance),
                ..Default::default()
            },
        )
    }

    // Bills

    pub fn bills(&mut self) -> Result<Vec<Bill>, StoreError> {
        self.read_list(keys::BILLS)
    }

    pub fn add_bill(&mut self, new: NewBill) -> Result<Bill, StoreError> {
        let mut list = self.bills()?;
        let bill = Bill {
            id: new_record_id(),
            name: new.name,
            amount: new.amount,
            due_date: new.due_date,
            category: new.category,
            status: BillStatus::Pending,
            recurring: new.recurring,
            frequency: new.frequency,
            automatic_payment: new.automatic_payment,
            payment_method: new.payment_method,
            payment_account_id: new.payment_account_id,
            paid_at: None,
        };
        list.push(bill.clone());
        self.write_list(keys::BILLS, &list)?;
        Ok(bill)
    }

    pub fn update_bill(&mut self, id: &str, patch: BillPatch) -> Result<Option<Bill>, StoreError> {
        let mut list = self.bills()?;
        let Some(bill) = list.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };
        patch.apply(bill);
        let updated = bill.clone();
        self.write_list(keys::BILLS, &list)?;
        Ok(Some(updated))
    }

    pub fn delete_bill(&mut self, id: &str) -> Result<(), StoreError> {
        let mut list = self.bills()?;
        list.retain(|b| b.id != id);
        self.write_list(keys::BILLS, &list)
    }

    // Budget singleton

    pub fn budget(&mut self) -> Result<Budget, StoreError> {
        match self.store.get(keys::BUDGETS)? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(Budget::default()),
        }
    }

    pub fn update_budget(&mut self, patch: BudgetPatch) -> Result<Budget, StoreError> {
        let mut budget = self.budget()?;
        patch.apply(&mut budget);
        budget.remaining = budget.total - budget.spent;
        self.store
            .save(keys::BUDGETS, serde_json::to_value(&budget)?)?;
        Ok(budget)
    }

    /// Wholesale recomputation: overall spend from expense postings,
    /// per-category spend from expense postings matched by category name.
    /// Prior values are replaced, never incremented. Persists both the
    /// categories collection and the budget record.
    pub fn calculate_budget_stats(&mut self) -> Result<Budget, StoreError> {
        let txs = self.transactions()?;
        let mut cats = self.categories()?;
        let mut budget = self.budget()?;

        let expenses: Vec<&Transaction> =
            txs.iter().filter(|t| t.kind == TxKind::Expense).collect();

        budget.spent = expenses.iter().map(|t| t.amount).sum();
        budget.remaining = budget.total - budget.spent;
        for cat in &mut cats {
            cat.spent = expenses
                .iter()
                .filter(|t| t.category == cat.name)
                .map(|t| t.amount)
                .sum();
        }
        budget.categories = cats.clone();

        self.write_list(keys::CATEGORIES, &cats)?;
        self.store
            .save(keys::BUDGETS, serde_json::to_value(&budget)?)?;
        Ok(budget)
    }

    // Session identity

    pub fn save_user(&mut self, user_id: &str) -> Result<(), StoreError> {
        self.store
            .save(keys::USER_DATA, serde_json::json!({ "id": user_id }))
    }

    pub fn load_user(&mut self) -> Result<Option<String>, StoreError> {
        let Some(value) = self.store.get(keys::USER_DATA)? else {
            return Ok(None);
        };
        Ok(value
            .get("id")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string()))
    }

    pub fn clear_user(&mut self) -> Result<(), StoreError> {
        self.store.remove(keys::USER_DATA)
    }
}
