use colored::Colorize;
use std::fmt;
use std::sync::{OnceLock, RwLock};

use pursebook_core::{
    AmountFormatter, CategoryShare, DateFormatter, DayMonthYear, ImportReport, ReminderDecision,
    SaveOutcome, SymbolFormatter, TickOutcome, Totals,
};
use pursebook_domain::{Transaction, TransactionKind};

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Section,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct OutputPreferences {
    pub plain: bool,
}

static PREFERENCES: OnceLock<RwLock<OutputPreferences>> = OnceLock::new();

pub fn set_preferences(prefs: OutputPreferences) {
    colored::control::set_override(!prefs.plain);
    let lock = PREFERENCES.get_or_init(|| RwLock::new(OutputPreferences::default()));
    if let Ok(mut guard) = lock.write() {
        *guard = prefs;
    }
}

fn preferences() -> OutputPreferences {
    PREFERENCES
        .get_or_init(|| RwLock::new(OutputPreferences::default()))
        .read()
        .map(|guard| *guard)
        .unwrap_or_default()
}

fn apply_style(kind: MessageKind, message: impl fmt::Display, prefs: &OutputPreferences) -> String {
    let text = message.to_string();
    let formatted = match kind {
        MessageKind::Section => format!("=== {} ===", text.trim()),
        MessageKind::Info => text,
        MessageKind::Success => format!("[ok] {text}"),
        MessageKind::Warning => format!("[!] {text}"),
        MessageKind::Error => format!("[x] {text}"),
    };
    if prefs.plain {
        return formatted;
    }
    match kind {
        MessageKind::Success => formatted.bright_green().to_string(),
        MessageKind::Warning => formatted.bright_yellow().to_string(),
        MessageKind::Error => formatted.bright_red().to_string(),
        MessageKind::Section => formatted.bold().to_string(),
        MessageKind::Info => formatted,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let formatted = apply_style(kind, message, &preferences());
    match kind {
        MessageKind::Error => eprintln!("{formatted}"),
        MessageKind::Section => println!("\n{formatted}"),
        _ => println!("{formatted}"),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// Warns when a change could not be written to disk.
pub fn saved(outcome: SaveOutcome) {
    if outcome == SaveOutcome::MemoryOnly {
        warning("Could not save to disk; the change only lasts for this session.");
    }
}

/// Formats amounts and dates the way the user configured them.
pub struct Presenter {
    amounts: SymbolFormatter,
    dates: DayMonthYear,
}

impl Presenter {
    pub fn new(currency_symbol: &str) -> Self {
        Self {
            amounts: SymbolFormatter::new(currency_symbol),
            dates: DayMonthYear,
        }
    }

    pub fn amount(&self, value: f64) -> String {
        self.amounts.format_amount(value)
    }

    pub fn signed(&self, txn: &Transaction) -> String {
        let text = match txn.kind {
            TransactionKind::Income => format!("+{}", self.amount(txn.amount)),
            TransactionKind::Expense => format!("-{}", self.amount(txn.amount)),
        };
        if preferences().plain {
            return text;
        }
        match txn.kind {
            TransactionKind::Income => text.green().to_string(),
            TransactionKind::Expense => text.red().to_string(),
        }
    }

    pub fn date(&self, txn: &Transaction) -> String {
        self.dates.format_date(txn.date)
    }

    pub fn transaction_rows(&self, transactions: &[Transaction]) -> Vec<String> {
        transactions
            .iter()
            .map(|txn| {
                let id = txn.id.simple().to_string();
                let mut row = format!(
                    "{}  {}  {:<13} {:>14}  {}",
                    &id[..8],
                    self.date(txn),
                    txn.category,
                    self.signed(txn),
                    txn.description
                );
                if let Some(notes) = &txn.notes {
                    row.push_str(&format!(" ({notes})"));
                }
                row
            })
            .collect()
    }

    pub fn totals_rows(&self, totals: &Totals) -> Vec<String> {
        vec![
            format!("Income:   {}", self.amount(totals.income)),
            format!("Expenses: {}", self.amount(totals.expense)),
            format!("Balance:  {}", self.amount(totals.balance)),
        ]
    }

    pub fn breakdown_rows(&self, shares: &[CategoryShare]) -> Vec<String> {
        shares
            .iter()
            .map(|slice| {
                format!(
                    "{:<13} {:>14}  {:>5.1}%",
                    slice.category,
                    self.amount(slice.amount),
                    slice.share * 100.0
                )
            })
            .collect()
    }

    pub fn import_rows(&self, report: &ImportReport) -> Vec<String> {
        let mut rows = vec![format!("Imported {} transaction(s).", report.imported.len())];
        for rejected in &report.rejected {
            rows.push(format!(
                "Record {} skipped: {}",
                rejected.position, rejected.reason
            ));
        }
        rows
    }
}

/// One-line description of a scheduler check.
pub fn describe_outcome(outcome: &TickOutcome) -> String {
    match outcome {
        TickOutcome::Inactive => "Reminders are off.".into(),
        TickOutcome::Fired { time, .. } => format!("Reminder sent ({time})."),
        TickOutcome::Blocked(state) => {
            format!("A reminder is due but notification permission is {state}.")
        }
        TickOutcome::DeliveryFailed => "A reminder is due but could not be shown.".into(),
        TickOutcome::Skipped(decision) => match decision {
            ReminderDecision::Disabled => "Reminders are off.".into(),
            ReminderDecision::NoTimes => "Reminders are on but no time of day is set.".into(),
            ReminderDecision::NotEligible { eligible_on } => format!(
                "No reminder due; next eligible day is {}.",
                eligible_on.format("%d/%m/%Y")
            ),
            ReminderDecision::WaitingForTime => {
                "No reminder due right now; waiting for a configured time.".into()
            }
            ReminderDecision::Due(time) => format!("Reminder due at {time}."),
        },
    }
}
