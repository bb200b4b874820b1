//! Domain models for income and expense transactions.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{common::*, ValidationError};

/// Direction of money movement.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "income" | "receita" => Some(TransactionKind::Income),
            "expense" | "despesa" => Some(TransactionKind::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        };
        f.write_str(label)
    }
}

/// A recorded income or expense entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub amount: f64,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Transaction {
    /// Materializes a validated draft under a freshly generated identifier.
    pub fn from_new(draft: NewTransaction) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind: draft.kind,
            amount: draft.amount,
            category: draft.category,
            description: draft.description,
            date: draft.date,
            notes: draft.notes,
        }
    }

    /// Checks the amount and category invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(self.kind, self.amount, &self.category)
    }

    /// Signed contribution to the balance.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        if self.description.is_empty() {
            format!("{} [{}]", self.category, self.kind)
        } else {
            format!("{} - {} [{}]", self.description, self.category, self.kind)
        }
    }
}

/// A transaction that has not been assigned an identifier yet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub amount: f64,
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewTransaction {
    pub fn new(
        kind: TransactionKind,
        amount: f64,
        category: impl Into<String>,
        description: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            kind,
            amount,
            category: category.into(),
            description: description.into(),
            date,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Trims free-text fields, maps the category onto its canonical spelling and
    /// drops blank notes.
    pub fn normalized(mut self) -> Self {
        self.description = self.description.trim().to_string();
        let category = self.category.trim();
        self.category = self
            .kind
            .canonical_category(category)
            .map(str::to_string)
            .unwrap_or_else(|| category.to_string());
        self.notes = normalize_notes(self.notes);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(self.kind, self.amount, &self.category)
    }
}

/// Partial update applied by an edit. `None` leaves a field unchanged; for notes
/// `Some(None)` clears them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub notes: Option<Option<String>>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.date.is_none()
            && self.notes.is_none()
    }

    /// Returns a copy of `base` with the patch merged in. Identifier and kind are
    /// never touched.
    pub fn merged_into(&self, base: &Transaction) -> Transaction {
        let mut merged = base.clone();
        if let Some(amount) = self.amount {
            merged.amount = amount;
        }
        if let Some(category) = &self.category {
            let trimmed = category.trim();
            merged.category = merged
                .kind
                .canonical_category(trimmed)
                .map(str::to_string)
                .unwrap_or_else(|| trimmed.to_string());
        }
        if let Some(description) = &self.description {
            merged.description = description.trim().to_string();
        }
        if let Some(date) = self.date {
            merged.date = date;
        }
        if let Some(notes) = &self.notes {
            merged.notes = normalize_notes(notes.clone());
        }
        merged
    }
}

fn validate_fields(
    kind: TransactionKind,
    amount: f64,
    category: &str,
) -> Result<(), ValidationError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ValidationError::NonPositiveAmount(amount));
    }
    if category.trim().is_empty() {
        return Err(ValidationError::EmptyCategory);
    }
    if !kind.accepts_category(category) {
        return Err(ValidationError::UnknownCategory {
            kind,
            category: category.to_string(),
        });
    }
    Ok(())
}

fn normalize_notes(notes: Option<String>) -> Option<String> {
    notes
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rejects_non_positive_and_nan_amounts() {
        for amount in [0.0, -12.5, f64::NAN, f64::INFINITY] {
            let draft = NewTransaction::new(
                TransactionKind::Expense,
                amount,
                "Lazer",
                "",
                date(2024, 1, 1),
            );
            assert!(matches!(
                draft.validate(),
                Err(ValidationError::NonPositiveAmount(_))
            ));
        }
    }

    #[test]
    fn rejects_category_of_the_other_kind() {
        let draft = NewTransaction::new(
            TransactionKind::Income,
            10.0,
            "Transporte",
            "",
            date(2024, 1, 1),
        );
        let err = draft.validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownCategory {
                kind: TransactionKind::Income,
                category: "Transporte".into()
            }
        );
    }

    #[test]
    fn normalized_canonicalizes_category_and_drops_blank_notes() {
        let draft = NewTransaction::new(
            TransactionKind::Expense,
            12.0,
            " saúde ",
            "  Farmácia ",
            date(2024, 3, 2),
        )
        .with_notes("   ")
        .normalized();
        assert_eq!(draft.category, "Saúde");
        assert_eq!(draft.description, "Farmácia");
        assert_eq!(draft.notes, None);
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn patch_keeps_id_and_kind() {
        let original = Transaction::from_new(NewTransaction::new(
            TransactionKind::Expense,
            30.0,
            "Lazer",
            "Cinema",
            date(2024, 2, 1),
        ));
        let patch = TransactionPatch {
            amount: Some(42.0),
            notes: Some(Some("com amigos".into())),
            ..TransactionPatch::default()
        };
        let merged = patch.merged_into(&original);
        assert_eq!(merged.id, original.id);
        assert_eq!(merged.kind, TransactionKind::Expense);
        assert_eq!(merged.amount, 42.0);
        assert_eq!(merged.description, "Cinema");
        assert_eq!(merged.notes.as_deref(), Some("com amigos"));
    }

    #[test]
    fn transaction_round_trips_through_json() {
        let txn = Transaction::from_new(
            NewTransaction::new(
                TransactionKind::Income,
                3500.0,
                "Salário",
                "Salário mensal",
                date(2024, 1, 5),
            )
            .with_notes("janeiro"),
        );
        let json = serde_json::to_string(&txn).unwrap();
        assert!(json.contains("\"kind\":\"income\""));
        let back: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, txn);
    }
}
