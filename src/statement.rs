//! CSV bank statement reader.
//!
//! Expected header: `date,kind,amount,category,description,notes`. `kind`,
//! `description` and `notes` may be omitted; a missing kind means an expense.

use std::{fs::File, io, path::Path};

use csv::{ReaderBuilder, StringRecord, Trim};
use pursebook_core::{parse_amount, parse_date, CoreError, StatementLine, StatementSource};
use pursebook_domain::{NewTransaction, TransactionKind};
use serde::Deserialize;

use crate::errors::CliError;

const REQUIRED_COLUMNS: [&str; 3] = ["date", "amount", "category"];

#[derive(Debug, Deserialize)]
struct CsvRecord {
    date: String,
    #[serde(default)]
    kind: String,
    amount: String,
    category: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    notes: Option<String>,
}

impl CsvRecord {
    fn into_draft(self) -> Result<NewTransaction, String> {
        let date = parse_date(&self.date).ok_or_else(|| format!("invalid date '{}'", self.date))?;
        let amount =
            parse_amount(&self.amount).ok_or_else(|| format!("invalid amount '{}'", self.amount))?;
        let kind = if self.kind.trim().is_empty() {
            TransactionKind::Expense
        } else {
            TransactionKind::parse(&self.kind)
                .ok_or_else(|| format!("invalid kind '{}'", self.kind))?
        };
        let mut draft = NewTransaction::new(kind, amount, self.category, self.description, date);
        if let Some(notes) = self.notes {
            draft = draft.with_notes(notes);
        }
        Ok(draft)
    }
}

pub struct CsvStatement<R> {
    name: String,
    reader: csv::Reader<R>,
}

impl CsvStatement<File> {
    pub fn from_path(path: &Path) -> Result<Self, CliError> {
        let reader = builder().from_path(path)?;
        Ok(Self {
            name: path.display().to_string(),
            reader,
        })
    }
}

impl<R: io::Read> CsvStatement<R> {
    pub fn from_reader(name: impl Into<String>, input: R) -> Self {
        Self {
            name: name.into(),
            reader: builder().from_reader(input),
        }
    }

    fn check_headers(&mut self) -> Result<StringRecord, CoreError> {
        let headers = self
            .reader
            .headers()
            .map_err(|err| CoreError::Serde(err.to_string()))?
            .clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|header| header == column) {
                return Err(CoreError::InvalidOperation(format!(
                    "{}: missing column '{column}'",
                    self.name
                )));
            }
        }
        Ok(headers)
    }
}

impl<R: io::Read> StatementSource for CsvStatement<R> {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn lines(&mut self) -> Result<Vec<StatementLine>, CoreError> {
        let headers = self.check_headers()?;
        let mut lines = Vec::new();
        for row in self.reader.records() {
            let line = row
                .and_then(|record| record.deserialize::<CsvRecord>(Some(&headers)))
                .map_err(|err| err.to_string())
                .and_then(CsvRecord::into_draft);
            lines.push(line);
        }
        Ok(lines)
    }
}

fn builder() -> ReaderBuilder {
    let mut builder = ReaderBuilder::new();
    builder.has_headers(true).flexible(true).trim(Trim::All);
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn read(data: &str) -> Result<Vec<StatementLine>, CoreError> {
        CsvStatement::from_reader("test.csv", data.as_bytes()).lines()
    }

    #[test]
    fn reads_both_date_and_amount_styles() {
        let lines = read(
            "date,kind,amount,category,description,notes\n\
             2024-01-02,expense,45.90,Alimentação,Mercado,\n\
             05/01/2024,income,\"3500,00\",Salário,Salário mensal,janeiro\n",
        )
        .unwrap();
        let drafts: Vec<_> = lines.into_iter().map(Result::unwrap).collect();
        assert_eq!(drafts[0].amount, 45.90);
        assert_eq!(drafts[0].notes, None);
        assert_eq!(drafts[1].kind, TransactionKind::Income);
        assert_eq!(drafts[1].date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(drafts[1].amount, 3500.0);
        assert_eq!(drafts[1].notes.as_deref(), Some("janeiro"));
    }

    #[test]
    fn bad_rows_become_reasons() {
        let lines = read(
            "date,amount,category\n\
             yesterday,10,Lazer\n\
             2024-01-02,ten,Lazer\n\
             2024-01-02,10,Lazer\n",
        )
        .unwrap();
        assert!(lines[0].as_ref().unwrap_err().contains("invalid date"));
        assert!(lines[1].as_ref().unwrap_err().contains("invalid amount"));
        assert_eq!(lines[2].as_ref().unwrap().kind, TransactionKind::Expense);
    }

    #[test]
    fn missing_required_column_rejects_the_file() {
        let err = read("date,description\n2024-01-02,x\n").unwrap_err();
        assert!(err.to_string().contains("missing column 'amount'"));
    }
}
