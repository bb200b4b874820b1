//! In-memory transaction list and its derived aggregates.

use std::collections::BTreeMap;

use pursebook_domain::{NewTransaction, Transaction, TransactionKind, TransactionPatch};
use uuid::Uuid;

use crate::CoreError;

/// Income, expense and balance over the whole list.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

/// One slice of the expense breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShare {
    pub category: String,
    pub amount: f64,
    /// Fraction of the total expense, between 0 and 1.
    pub share: f64,
}

/// Ordered list of transactions, newest first.
#[derive(Debug, Clone, Default)]
pub struct TransactionStore {
    transactions: Vec<Transaction>,
}

impl TransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    pub fn list(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == id)
    }

    /// Validates the draft, assigns a fresh id and prepends it.
    pub fn add(&mut self, draft: NewTransaction) -> Result<Uuid, CoreError> {
        let draft = draft.normalized();
        draft.validate()?;
        let txn = Transaction::from_new(draft);
        let id = txn.id;
        self.transactions.insert(0, txn);
        Ok(id)
    }

    /// Merges `patch` into the entry identified by `id`. Returns `Ok(false)` when no
    /// such entry exists.
    pub fn edit(&mut self, id: Uuid, patch: &TransactionPatch) -> Result<bool, CoreError> {
        let Some(slot) = self.transactions.iter_mut().find(|txn| txn.id == id) else {
            return Ok(false);
        };
        let merged = patch.merged_into(slot);
        merged.validate()?;
        *slot = merged;
        Ok(true)
    }

    pub fn remove(&mut self, id: Uuid) -> Option<Transaction> {
        let index = self.transactions.iter().position(|txn| txn.id == id)?;
        Some(self.transactions.remove(index))
    }

    /// Prepends a batch, keeping the batch's relative order. Either every draft is
    /// valid and all are added, or nothing changes.
    pub fn bulk_add(&mut self, drafts: Vec<NewTransaction>) -> Result<Vec<Uuid>, CoreError> {
        let drafts = drafts
            .into_iter()
            .map(NewTransaction::normalized)
            .collect::<Vec<_>>();
        for draft in &drafts {
            draft.validate()?;
        }
        let batch = drafts
            .into_iter()
            .map(Transaction::from_new)
            .collect::<Vec<_>>();
        let ids = batch.iter().map(|txn| txn.id).collect();
        self.transactions.splice(0..0, batch);
        Ok(ids)
    }

    pub fn totals(&self) -> Totals {
        let mut totals = Totals::default();
        for txn in &self.transactions {
            match txn.kind {
                TransactionKind::Income => totals.income += txn.amount,
                TransactionKind::Expense => totals.expense += txn.amount,
            }
        }
        totals.balance = totals.income - totals.expense;
        totals
    }

    pub fn expenses_by_category(&self) -> BTreeMap<String, f64> {
        let mut sums = BTreeMap::new();
        for txn in self
            .transactions
            .iter()
            .filter(|txn| txn.kind == TransactionKind::Expense)
        {
            *sums.entry(txn.category.clone()).or_insert(0.0) += txn.amount;
        }
        sums
    }

    /// Expense categories sorted by amount, largest first, with their share of the
    /// total expense.
    pub fn category_breakdown(&self) -> Vec<CategoryShare> {
        let sums = self.expenses_by_category();
        let total: f64 = sums.values().sum();
        let mut shares = sums
            .into_iter()
            .map(|(category, amount)| CategoryShare {
                share: if total > 0.0 { amount / total } else { 0.0 },
                category,
                amount,
            })
            .collect::<Vec<_>>();
        shares.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        shares
    }
}
