use chrono::NaiveDate;

/// Formats currency amounts for presentation.
pub trait AmountFormatter: Send + Sync {
    fn format_amount(&self, amount: f64) -> String;
}

/// Formats dates for presentation.
pub trait DateFormatter: Send + Sync {
    fn format_date(&self, date: NaiveDate) -> String;
}

/// Prefixes a currency symbol and renders two decimals: `R$ 45.90`, `-R$ 3.00`.
#[derive(Debug, Clone)]
pub struct SymbolFormatter {
    pub symbol: String,
}

impl SymbolFormatter {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
        }
    }
}

impl Default for SymbolFormatter {
    fn default() -> Self {
        Self::new("R$")
    }
}

impl AmountFormatter for SymbolFormatter {
    fn format_amount(&self, amount: f64) -> String {
        let sign = if amount < 0.0 { "-" } else { "" };
        format!("{sign}{} {:.2}", self.symbol, amount.abs())
    }
}

/// `DD/MM/YYYY`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DayMonthYear;

impl DateFormatter for DayMonthYear {
    fn format_date(&self, date: NaiveDate) -> String {
        date.format("%d/%m/%Y").to_string()
    }
}
