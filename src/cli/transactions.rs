use chrono::{Local, NaiveDate};
use pursebook_core::{parse_amount, parse_date, Change, SampleStatement, StatementSource};
use pursebook_domain::{Displayable, NewTransaction, TransactionKind, TransactionPatch};
use uuid::Uuid;

use super::{AddArgs, App, EditArgs, ImportArgs};
use crate::{errors::CliError, output, statement::CsvStatement};

const MIN_ID_PREFIX: usize = 4;

pub fn add(app: &mut App, args: AddArgs) -> Result<(), CliError> {
    let kind = parse_kind(&args.kind)?;
    let amount = amount_arg(&args.amount)?;
    let date = match args.date.as_deref() {
        Some(raw) => date_arg(raw)?,
        None => Local::now().date_naive(),
    };
    let mut draft = NewTransaction::new(kind, amount, args.category, args.description, date);
    if let Some(notes) = args.notes {
        draft = draft.with_notes(notes);
    }

    let (id, saved) = app.tracker.add_transaction(draft)?;
    output::success(format!("Transaction {} recorded.", short_id(id)));
    output::saved(saved);
    Ok(())
}

pub fn edit(app: &mut App, args: EditArgs) -> Result<(), CliError> {
    let Some(id) = resolve_id(app, &args.id)? else {
        output::warning(format!("No transaction matches '{}'.", args.id));
        return Ok(());
    };
    let patch = TransactionPatch {
        amount: args.amount.as_deref().map(amount_arg).transpose()?,
        category: args.category,
        description: args.description,
        date: args.date.as_deref().map(date_arg).transpose()?,
        notes: if args.clear_notes {
            Some(None)
        } else {
            args.notes.map(Some)
        },
    };
    if patch.is_empty() {
        return Err(CliError::input("nothing to change; pass at least one field"));
    }

    match app.tracker.edit_transaction(id, &patch)? {
        Change::Applied(saved) => {
            output::success(format!("Transaction {} updated.", short_id(id)));
            output::saved(saved);
        }
        Change::NotFound => output::warning(format!("No transaction matches '{}'.", args.id)),
    }
    Ok(())
}

pub fn remove(app: &mut App, raw: &str) -> Result<(), CliError> {
    let Some(id) = resolve_id(app, raw)? else {
        output::warning(format!("No transaction matches '{raw}'."));
        return Ok(());
    };
    let label = app.tracker.store().get(id).map(Displayable::display_label);
    match app.tracker.remove_transaction(id) {
        Change::Applied(saved) => {
            output::success(format!(
                "Transaction {} removed: {}.",
                short_id(id),
                label.unwrap_or_default()
            ));
            output::saved(saved);
        }
        Change::NotFound => output::warning(format!("No transaction matches '{raw}'.")),
    }
    Ok(())
}

pub fn list(app: &App, limit: Option<usize>, json: bool) -> Result<(), CliError> {
    let transactions = app.tracker.transactions();
    let shown = &transactions[..limit.unwrap_or(transactions.len()).min(transactions.len())];
    if json {
        let text = serde_json::to_string_pretty(shown)
            .map_err(|err| CliError::input(format!("cannot render JSON: {err}")))?;
        println!("{text}");
        return Ok(());
    }
    if shown.is_empty() {
        output::info("No transactions yet.");
        return Ok(());
    }
    output::section("Transactions");
    for row in app.presenter.transaction_rows(shown) {
        output::info(row);
    }
    Ok(())
}

pub fn summary(app: &App) -> Result<(), CliError> {
    output::section("Summary");
    for row in app.presenter.totals_rows(&app.tracker.totals()) {
        output::info(row);
    }
    let breakdown = app.tracker.category_breakdown();
    if !breakdown.is_empty() {
        output::section("Expenses by category");
        for row in app.presenter.breakdown_rows(&breakdown) {
            output::info(row);
        }
    }
    Ok(())
}

pub fn categories(kind: Option<&str>) -> Result<(), CliError> {
    let kinds = match kind {
        Some(raw) => vec![parse_kind(raw)?],
        None => vec![TransactionKind::Expense, TransactionKind::Income],
    };
    for kind in kinds {
        output::section(format!("{kind} categories"));
        for category in kind.categories() {
            output::info(category);
        }
    }
    Ok(())
}

pub fn import(app: &mut App, args: ImportArgs) -> Result<(), CliError> {
    let mut source: Box<dyn StatementSource> = match args.path {
        Some(path) => Box::new(CsvStatement::from_path(&path)?),
        None => Box::new(SampleStatement::new(Local::now().date_naive())),
    };
    let (report, saved) = app.tracker.import(source.as_mut())?;
    let rows = app.presenter.import_rows(&report);
    if report.imported.is_empty() {
        output::warning(&rows[0]);
    } else {
        output::success(&rows[0]);
    }
    for row in &rows[1..] {
        output::warning(row);
    }
    output::saved(saved);
    Ok(())
}

fn parse_kind(raw: &str) -> Result<TransactionKind, CliError> {
    TransactionKind::parse(raw)
        .ok_or_else(|| CliError::input(format!("unknown kind '{raw}'; use income or expense")))
}

fn amount_arg(raw: &str) -> Result<f64, CliError> {
    parse_amount(raw).ok_or_else(|| CliError::input(format!("'{raw}' is not an amount")))
}

fn date_arg(raw: &str) -> Result<NaiveDate, CliError> {
    parse_date(raw).ok_or_else(|| {
        CliError::input(format!("'{raw}' is not a date; use YYYY-MM-DD or DD/MM/YYYY"))
    })
}

fn short_id(id: Uuid) -> String {
    id.simple().to_string()[..8].to_string()
}

/// Accepts a full id or an unambiguous prefix of its simple form.
fn resolve_id(app: &App, raw: &str) -> Result<Option<Uuid>, CliError> {
    if let Ok(id) = Uuid::parse_str(raw) {
        return Ok(Some(id));
    }
    let prefix = raw.trim().to_ascii_lowercase().replace('-', "");
    if prefix.len() < MIN_ID_PREFIX {
        return Err(CliError::input(format!(
            "id prefix '{raw}' is too short; use at least {MIN_ID_PREFIX} characters"
        )));
    }
    let matches: Vec<Uuid> = app
        .tracker
        .transactions()
        .iter()
        .map(|txn| txn.id)
        .filter(|id| id.simple().to_string().starts_with(&prefix))
        .collect();
    match matches.as_slice() {
        [] => Ok(None),
        [id] => Ok(Some(*id)),
        _ => Err(CliError::input(format!("id prefix '{raw}' is ambiguous"))),
    }
}
