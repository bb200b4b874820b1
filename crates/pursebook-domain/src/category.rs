//! Fixed category taxonomies for income and expense entries.

use crate::TransactionKind;

/// Categories offered for expense entries.
pub const EXPENSE_CATEGORIES: [&str; 9] = [
    "Alimentação",
    "Transporte",
    "Moradia",
    "Saúde",
    "Educação",
    "Lazer",
    "Compras",
    "Contas",
    "Outros",
];

/// Categories offered for income entries.
pub const INCOME_CATEGORIES: [&str; 4] = ["Salário", "Freelance", "Investimentos", "Outros"];

impl TransactionKind {
    /// Returns the category set associated with this kind.
    pub fn categories(self) -> &'static [&'static str] {
        match self {
            TransactionKind::Income => &INCOME_CATEGORIES,
            TransactionKind::Expense => &EXPENSE_CATEGORIES,
        }
    }

    /// Returns `true` when `category` belongs to this kind's set.
    pub fn accepts_category(self, category: &str) -> bool {
        self.categories().iter().any(|known| *known == category)
    }

    /// Resolves a category ignoring case and surrounding whitespace, returning the
    /// canonical spelling.
    pub fn canonical_category(self, raw: &str) -> Option<&'static str> {
        let needle = raw.trim().to_lowercase();
        self.categories()
            .iter()
            .copied()
            .find(|known| known.to_lowercase() == needle)
    }
}
