// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of a posted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Income,
    Expense,
}

impl TxKind {
    /// Sign applied to the amount when folding into an account balance.
    pub fn sign(self) -> Decimal {
        match self {
            TxKind::Income => Decimal::ONE,
            TxKind::Expense => -Decimal::ONE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TxKind,
    pub category: String,
    /// Non-negative magnitude; the sign comes from `kind`.
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    pub description: String,
    /// Weak reference: may dangle if the account cascade never ran.
    pub account_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_category_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    General,
    Savings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AccountKind,
    /// Denormalized net of postings. Maintained by the session on every
    /// posting; repaired by `recompute_account_balance`.
    pub balance: Decimal,
    pub icon: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_balance: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub color: String,
    /// Allocated ceiling.
    pub budget: Decimal,
    /// Denormalized; overwritten wholesale by each budget recalculation.
    pub spent: Decimal,
    /// Weak reference to an owning account, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    Pending,
    Paid,
    Overdue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillFrequency {
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: String,
    pub name: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub category: String,
    /// Caller-managed; nothing flips this automatically when the due date
    /// passes.
    pub status: BillStatus,
    pub recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<BillFrequency>,
    pub automatic_payment: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
}

/// Per-session singleton, not a collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub total: Decimal,
    /// Sum of expense transaction amounts.
    pub spent: Decimal,
    /// `total - spent`.
    pub remaining: Decimal,
    /// Snapshot of categories with recomputed `spent`.
    #[serde(default)]
    pub categories: Vec<Category>,
}

// Draft types: a record minus its generated id (and, for categories, minus
// the denormalized spend).

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub kind: TxKind,
    pub category: String,
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    pub description: String,
    pub account_id: String,
    pub custom_category_description: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub kind: AccountKind,
    pub balance: Decimal,
    pub icon: String,
    pub color: String,
    pub goal_balance: Option<Decimal>,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub icon: String,
    pub color: String,
    pub budget: Decimal,
    pub account_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewBill {
    pub name: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
    pub category: String,
    pub recurring: bool,
    pub frequency: Option<BillFrequency>,
    pub automatic_payment: bool,
    pub payment_method: Option<String>,
    pub payment_account_id: Option<String>,
}

// Patch types: shallow merges. A `None` field is left untouched; `Some`
// replaces the stored value.

#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub kind: Option<TxKind>,
    pub category: Option<String>,
    pub amount: Option<Decimal>,
    pub date: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub account_id: Option<String>,
    pub custom_category_description: Option<String>,
    pub notes: Option<String>,
}

impl TransactionPatch {
    pub fn apply(self, t: &mut Transaction) {
        if let Some(v) = self.kind {
            t.kind = v;
        }
        if let Some(v) = self.category {
            t.category = v;
        }
        if let Some(v) = self.amount {
            t.amount = v;
        }
        if let Some(v) = self.date {
            t.date = v;
        }
        if let Some(v) = self.description {
            t.description = v;
        }
        if let Some(v) = self.account_id {
            t.account_id = v;
        }
        if let Some(v) = self.custom_category_description {
            t.custom_category_description = Some(v);
        }
        if let Some(v) = self.notes {
            t.notes = Some(v);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
    pub name: Option<String>,
    pub kind: Option<AccountKind>,
    pub balance: Option<Decimal>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub goal_balance: Option<Decimal>,
}

impl AccountPatch {
    pub fn apply(self, a: &mut Account) {
        if let Some(v) = self.name {
            a.name = v;
        }
        if let Some(v) = self.kind {
            a.kind = v;
        }
        if let Some(v) = self.balance {
            a.balance = v;
        }
        if let Some(v) = self.icon {
            a.icon = v;
        }
        if let Some(v) = self.color {
            a.color = v;
        }
        if let Some(v) = self.goal_balance {
            a.goal_balance = Some(v);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub budget: Option<Decimal>,
    pub spent: Option<Decimal>,
    pub account_id: Option<String>,
}

impl CategoryPatch {
    pub fn apply(self, c: &mut Category) {
        if let Some(v) = self.name {
            c.name = v;
        }
        if let Some(v) = self.icon {
            c.icon = v;
        }
        if let Some(v) = self.color {
            c.color = v;
        }
        if let Some(v) = self.budget {
            c.budget = v;
        }
        if let Some(v) = self.spent {
            c.spent = v;
        }
        if let Some(v) = self.account_id {
            c.account_id = Some(v);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BillPatch {
    pub name: Option<String>,
    pub amount: Option<Decimal>,
    pub due_date: Option<NaiveDate>,
    pub category: Option<String>,
    pub status: Option<BillStatus>,
    pub recurring: Option<bool>,
    pub frequency: Option<BillFrequency>,
    pub automatic_payment: Option<bool>,
    pub payment_method: Option<String>,
    pub payment_account_id: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl BillPatch {
    pub fn apply(self, b: &mut Bill) {
        if let Some(v) = self.name {
            b.name = v;
        }
        if let Some(v) = self.amount {
            b.amount = v;
        }
        if let Some(v) = self.due_date {
            b.due_date = v;
        }
        if let Some(v) = self.category {
            b.category = v;
        }
        if let Some(v) = self.status {
            b.status = v;
        }
        if let Some(v) = self.recurring {
            b.recurring = v;
        }
        if let Some(v) = self.frequency {
            b.frequency = Some(v);
        }
        if let Some(v) = self.automatic_payment {
            b.automatic_payment = v;
        }
        if let Some(v) = self.payment_method {
            b.payment_method = Some(v);
        }
        if let Some(v) = self.payment_account_id {
            b.payment_account_id = Some(v);
        }
        if let Some(v) = self.paid_at {
            b.paid_at = Some(v);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BudgetPatch {
    pub total: Option<Decimal>,
    pub spent: Option<Decimal>,
}

impl BudgetPatch {
    pub fn apply(self, b: &mut Budget) {
        if let Some(v) = self.total {
            b.total = v;
        }
        if let Some(v) = self.spent {
            b.spent = v;
        }
    }
}
