//! Statement import: sources of transaction-like records and the import report.

use chrono::{Days, NaiveDate};
use pursebook_domain::{NewTransaction, TransactionKind};
use uuid::Uuid;

use crate::CoreError;

/// One record read from a statement, or the reason it could not be read.
pub type StatementLine = Result<NewTransaction, String>;

/// Anything that can produce statement records for import.
pub trait StatementSource {
    /// Short label used in logs.
    fn name(&self) -> String;

    /// Reads every record. An `Err` means the source as a whole is unusable;
    /// per-record problems are reported through the individual lines.
    fn lines(&mut self) -> Result<Vec<StatementLine>, CoreError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRecord {
    /// 1-based position of the record within the source.
    pub position: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    pub imported: Vec<Uuid>,
    pub rejected: Vec<RejectedRecord>,
}

impl ImportReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Simulated bank statement extraction: four fixed records dated relative to
/// `today`.
#[derive(Debug, Clone, Copy)]
pub struct SampleStatement {
    pub today: NaiveDate,
}

impl SampleStatement {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    fn days_ago(&self, days: u64) -> NaiveDate {
        self.today
            .checked_sub_days(Days::new(days))
            .unwrap_or(self.today)
    }
}

impl StatementSource for SampleStatement {
    fn name(&self) -> String {
        "sample statement".into()
    }

    fn lines(&mut self) -> Result<Vec<StatementLine>, CoreError> {
        let records = [
            (TransactionKind::Expense, 45.90, "Alimentação", "Supermercado", 2),
            (TransactionKind::Expense, 120.00, "Transporte", "Combustível", 5),
            (TransactionKind::Expense, 89.90, "Contas", "Internet", 8),
            (TransactionKind::Income, 3500.00, "Salário", "Salário mensal", 10),
        ];
        Ok(records
            .into_iter()
            .map(|(kind, amount, category, description, ago)| {
                Ok(NewTransaction::new(
                    kind,
                    amount,
                    category,
                    description,
                    self.days_ago(ago),
                )
                .with_notes("Imported from statement"))
            })
            .collect())
    }
}

/// Parses an amount written with either `.` or `,` as decimal separator.
/// Thousands separators are accepted when both appear (`1.234,56`, `1,234.56`).
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches("R$")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (Some(_), None) => cleaned.replace(',', "."),
        _ => cleaned,
    };
    normalized.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Parses `YYYY-MM-DD` or `DD/MM/YYYY`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d/%m/%Y"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_statement_dates_are_relative_to_today() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 12).unwrap();
        let lines = SampleStatement::new(today).lines().unwrap();
        let drafts: Vec<_> = lines.into_iter().map(Result::unwrap).collect();
        assert_eq!(drafts.len(), 4);
        assert_eq!(drafts[0].date, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        assert_eq!(drafts[3].kind, TransactionKind::Income);
        assert_eq!(drafts[3].date, NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
        assert!(drafts.iter().all(|draft| draft.validate().is_ok()));
    }

    #[test]
    fn amounts_accept_both_decimal_separators() {
        assert_eq!(parse_amount("45.90"), Some(45.90));
        assert_eq!(parse_amount("45,90"), Some(45.90));
        assert_eq!(parse_amount("R$ 1.234,56"), Some(1234.56));
        assert_eq!(parse_amount("1,234.56"), Some(1234.56));
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn dates_accept_iso_and_day_first() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 2);
        assert_eq!(parse_date("2024-01-02"), expected);
        assert_eq!(parse_date("02/01/2024"), expected);
        assert_eq!(parse_date("2024/01/02"), None);
    }
}
