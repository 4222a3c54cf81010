// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! In-memory snapshot of the five collections for the active user, kept in
//! sync with the repository on every mutation.
//!
//! Every mutation goes through the repository first; the snapshot is only
//! touched after the persist succeeds, so a failed save never leaves the
//! cache ahead of the store. Derived values (account balances, budget
//! statistics) are refreshed as part of the mutation, never lazily.
//!
//! Missing-target policy: a mutation whose target record does not exist is
//! aborted with a warning and reported as `Ok(None)`. It is not an error
//! and it never panics.

use chrono::Utc;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::*;
use crate::repo::FinanceRepo;
use crate::store::{KvStore, StoreError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no user attached")]
    NotAttached,
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionState {
    Empty,
    Ready { user_id: String },
}

pub struct Session<S: KvStore> {
    repo: FinanceRepo<S>,
    state: SessionState,
    transactions: Vec<Transaction>,
    categories: Vec<Category>,
    accounts: Vec<Account>,
    bills: Vec<Bill>,
    budget: Budget,
}

impl<S: KvStore> Session<S> {
    pub fn new(repo: FinanceRepo<S>) -> Self {
        Self {
            repo,
            state: SessionState::Empty,
            transactions: Vec::new(),
            categories: Vec::new(),
            accounts: Vec::new(),
            bills: Vec::new(),
            budget: Budget::default(),
        }
    }

    // Read-only snapshot access.

    pub fn is_attached(&self) -> bool {
        matches!(self.state, SessionState::Ready { .. })
    }

    pub fn user_id(&self) -> Option<&str> {
        match &self.state {
            SessionState::Ready { user_id } => Some(user_id),
            SessionState::Empty => None,
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn bills(&self) -> &[Bill] {
        &self.bills
    }

    pub fn budget(&self) -> &Budget {
        &self.budget
    }

    /// Loads all five collections for the given user. Best effort: a failed
    /// read is logged and leaves that field at its empty default; the
    /// session still attaches.
    pub fn attach(&mut self, user_id: &str) -> Result<(), SessionError> {
        self.repo.save_user(user_id)?;

        self.transactions = self.repo.transactions().unwrap_or_else(|e| {
            warn!("failed to load transactions: {e}");
            Vec::new()
        });
        self.categories = self.repo.categories().unwrap_or_else(|e| {
            warn!("failed to load categories: {e}");
            Vec::new()
        });
        self.accounts = self.repo.accounts().unwrap_or_else(|e| {
            warn!("failed to load accounts: {e}");
            Vec::new()
        });
        self.bills = self.repo.bills().unwrap_or_else(|e| {
            warn!("failed to load bills: {e}");
            Vec::new()
        });
        self.budget = self.repo.budget().unwrap_or_else(|e| {
            warn!("failed to load budget: {e}");
            Budget::default()
        });

        self.state = SessionState::Ready {
            user_id: user_id.to_string(),
        };
        debug!("session attached for user {user_id}");
        Ok(())
    }

    /// Clears the persisted identity and every in-memory field. Stored
    /// collections are untouched; use `wipe` for the hard teardown. The
    /// transition to empty is unconditional, so a failure to remove the
    /// identity key is logged rather than surfaced.
    pub fn detach(&mut self) {
        if let Err(e) = self.repo.clear_user() {
            warn!("failed to clear stored identity: {e}");
        }
        self.reset();
    }

    /// Session teardown: wipes every key in the store, then detaches.
    pub fn wipe(&mut self) -> Result<(), SessionError> {
        self.repo.store_mut().clear_all()?;
        self.reset();
        Ok(())
    }

    fn reset(&mut self) {
        self.state = SessionState::Empty;
        self.transactions.clear();
        self.categories.clear();
        self.accounts.clear();
        self.bills.clear();
        self.budget = Budget::default();
    }

    fn ensure_attached(&self) -> Result<(), SessionError> {
        if self.is_attached() {
            Ok(())
        } else {
            Err(SessionError::NotAttached)
        }
    }

    // Transactions

    /// Posts a transaction against its account: persists the record, applies
    /// the signed balance delta, then recalculates budget statistics. Three
    /// persisted writes per call. Aborts with `Ok(None)` when the account is
    /// unknown.
    pub fn add_transaction(
        &mut self,
        new: NewTransaction,
    ) -> Result<Option<Transaction>, SessionError> {
        self.ensure_attached()?;
        let Some(account) = self.accounts.iter().find(|a| a.id == new.account_id) else {
            warn!(
                "add_transaction aborted: account {} not found",
                new.account_id
            );
            return Ok(None);
        };
        let new_balance = account.balance + new.kind.sign() * new.amount;
        let account_id = account.id.clone();

        let tx = self.repo.add_transaction(new)?;
        self.transactions.push(tx.clone());

        let updated = self.repo.update_account(
            &account_id,
            AccountPatch {
                balance: Some(new_balance),
                ..Default::default()
            },
        )?;
        if let Some(updated) = updated {
            self.mirror_account(updated);
        }

        self.refresh_budget_stats()?;
        Ok(Some(tx))
    }

    pub fn update_transaction(
        &mut self,
        id: &str,
        patch: TransactionPatch,
    ) -> Result<Option<Transaction>, SessionError> {
        self.ensure_attached()?;
        let Some(updated) = self.repo.update_transaction(id, patch)? else {
            warn!("update_transaction aborted: transaction {id} not found");
            return Ok(None);
        };
        if let Some(tx) = self.transactions.iter_mut().find(|t| t.id == id) {
            *tx = updated.clone();
        }
        self.refresh_budget_stats()?;
        Ok(Some(updated))
    }

    pub fn delete_transaction(&mut self, id: &str) -> Result<(), SessionError> {
        self.ensure_attached()?;
        self.repo.delete_transaction(id)?;
        self.transactions.retain(|t| t.id != id);
        self.refresh_budget_stats()?;
        Ok(())
    }

    // Categories
    //
    // Category mutations re-read the persisted budget wholesale rather than
    // recomputing it.

    pub fn add_category(&mut self, new: NewCategory) -> Result<Category, SessionError> {
        self.ensure_attached()?;
        let cat = self.repo.add_category(new)?;
        self.categories.push(cat.clone());
        self.budget = self.repo.budget()?;
        Ok(cat)
    }

    pub fn update_category(
        &mut self,
        id: &str,
        patch: CategoryPatch,
    ) -> Result<Option<Category>, SessionError> {
        self.ensure_attached()?;
        let Some(updated) = self.repo.update_category(id, patch)? else {
            warn!("update_category aborted: category {id} not found");
            return Ok(None);
        };
        if let Some(cat) = self.categories.iter_mut().find(|c| c.id == id) {
            *cat = updated.clone();
        }
        self.budget = self.repo.budget()?;
        Ok(Some(updated))
    }

    pub fn delete_category(&mut self, id: &str) -> Result<(), SessionError> {
        self.ensure_attached()?;
        self.repo.delete_category(id)?;
        self.categories.retain(|c| c.id != id);
        self.budget = self.repo.budget()?;
        Ok(())
    }

    // Accounts

    /// Creates the account; for a general account opened with a nonzero
    /// balance, also synthesizes the opening income transaction so the
    /// balance matches the sum of postings from day one. Failure to create
    /// that synthetic posting is logged and swallowed; the account is kept.
    pub fn add_account(&mut self, new: NewAccount) -> Result<Account, SessionError> {
        self.ensure_attached()?;
        let account = self.repo.add_account(new)?;
        self.accounts.push(account.clone());

        if account.kind == AccountKind::General && account.balance != Decimal::ZERO {
            let opening = NewTransaction {
                kind: TxKind::Income,
                category: "Initial balance".to_string(),
                amount: account.balance,
                date: Utc::now(),
                description: format!("Opening balance for {}", account.name),
                account_id: account.id.clone(),
                custom_category_description: None,
                notes: None,
            };
            match self.repo.add_transaction(opening) {
                Ok(tx) => self.transactions.push(tx),
                Err(e) => warn!(
                    "failed to record opening balance for account {}: {e}",
                    account.id
                ),
            }
        }

        self.refresh_budget_stats()?;
        Ok(account)
    }

    pub fn update_account(
        &mut self,
        id: &str,
        patch: AccountPatch,
    ) -> Result<Option<Account>, SessionError> {
        self.ensure_attached()?;
        let Some(updated) = self.repo.update_account(id, patch)? else {
            warn!("update_account aborted: account {id} not found");
            return Ok(None);
        };
        self.mirror_account(updated.clone());
        Ok(Some(updated))
    }

    /// Deletes the account, cascading to its transactions and categories,
    /// then re-reads both collections so the cache never holds records the
    /// cascade removed.
    pub fn delete_account(&mut self, id: &str) -> Result<(), SessionError> {
        self.ensure_attached()?;
        self.repo.delete_account(id)?;
        self.accounts.retain(|a| a.id != id);
        self.transactions = self.repo.transactions()?;
        self.categories = self.repo.categories()?;
        self.refresh_budget_stats()?;
        Ok(())
    }

    /// Mirrors the repository's balance repair into the cache.
    pub fn recompute_account_balance(
        &mut self,
        id: &str,
    ) -> Result<Option<Account>, SessionError> {
        self.ensure_attached()?;
        let Some(updated) = self.repo.recompute_account_balance(id)? else {
            warn!("recompute_account_balance aborted: account {id} not found");
            return Ok(None);
        };
        self.mirror_account(updated.clone());
        Ok(Some(updated))
    }

    // Bills
    //
    // Bill CRUD is independent of the budget pipeline; only `pay_bill`
    // touches an account, and it does so through the normal posting path.

    pub fn add_bill(&mut self, new: NewBill) -> Result<Bill, SessionError> {
        self.ensure_attached()?;
        let bill = self.repo.add_bill(new)?;
        self.bills.push(bill.clone());
        Ok(bill)
    }

    pub fn update_bill(
        &mut self,
        id: &str,
        patch: BillPatch,
    ) -> Result<Option<Bill>, SessionError> {
        self.ensure_attached()?;
        let Some(updated) = self.repo.update_bill(id, patch)? else {
            warn!("update_bill aborted: bill {id} not found");
            return Ok(None);
        };
        if let Some(bill) = self.bills.iter_mut().find(|b| b.id == id) {
            *bill = updated.clone();
        }
        Ok(Some(updated))
    }

    pub fn delete_bill(&mut self, id: &str) -> Result<(), SessionError> {
        self.ensure_attached()?;
        self.repo.delete_bill(id)?;
        self.bills.retain(|b| b.id != id);
        Ok(())
    }

    /// Marks the bill paid and posts the matching expense against the paying
    /// account in one call. Payment orchestration lives here, and only here,
    /// so the balance delta and budget recalculation run exactly once per
    /// payment. Aborts with `Ok(None)` when the bill or the account is
    /// unknown, or when the bill is already paid.
    pub fn pay_bill(
        &mut self,
        bill_id: &str,
        account_id: &str,
    ) -> Result<Option<Bill>, SessionError> {
        self.ensure_attached()?;
        let Some(bill) = self.bills.iter().find(|b| b.id == bill_id).cloned() else {
            warn!("pay_bill aborted: bill {bill_id} not found");
            return Ok(None);
        };
        if bill.status == BillStatus::Paid {
            warn!("pay_bill aborted: bill {bill_id} already paid");
            return Ok(None);
        }
        if !self.accounts.iter().any(|a| a.id == account_id) {
            warn!("pay_bill aborted: account {account_id} not found");
            return Ok(None);
        }

        let paid = self.update_bill(
            bill_id,
            BillPatch {
                status: Some(BillStatus::Paid),
                paid_at: Some(Utc::now()),
                payment_account_id: Some(account_id.to_string()),
                ..Default::default()
            },
        )?;

        self.add_transaction(NewTransaction {
            kind: TxKind::Expense,
            category: bill.category.clone(),
            amount: bill.amount,
            date: Utc::now(),
            description: format!("Bill payment: {}", bill.name),
            account_id: account_id.to_string(),
            custom_category_description: None,
            notes: None,
        })?;

        Ok(paid)
    }

    // Budget

    pub fn update_budget(&mut self, patch: BudgetPatch) -> Result<&Budget, SessionError> {
        self.ensure_attached()?;
        self.budget = self.repo.update_budget(patch)?;
        Ok(&self.budget)
    }

    /// Recomputes spend totals wholesale and mirrors the result, including
    /// the refreshed per-category spend, into the cache.
    pub fn calculate_budget_stats(&mut self) -> Result<&Budget, SessionError> {
        self.ensure_attached()?;
        self.refresh_budget_stats()?;
        Ok(&self.budget)
    }

    fn refresh_budget_stats(&mut self) -> Result<(), StoreError> {
        self.budget = self.repo.calculate_budget_stats()?;
        self.categories = self.budget.categories.clone();
        Ok(())
    }

    fn mirror_account(&mut self, updated: Account) {
        if let Some(account) = self.accounts.iter_mut().find(|a| a.id == updated.id) {
            *account = updated;
        }
    }
}
