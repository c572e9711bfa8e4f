//! Pure computations over transaction sequences: totals, breakdowns and currency display.
//!
//! Nothing here owns or mutates data. Every function takes the transactions it works on and
//! returns freshly computed results.

use crate::model::{month_label, Transaction};
use crate::Result;
use anyhow::Context;
use chrono::Datelike;
use num_format::{Locale, ToFormattedString};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Income, expense and balance totals over a set of transactions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub income: Decimal,
    pub expenses: Decimal,
    /// `income - expenses`, negative when spending exceeds income.
    pub balance: Decimal,
}

/// Sums `transactions` by type. An empty input yields all zeros.
pub fn summarize<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Summary {
    let (income, expenses) = transactions.into_iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(income, expenses), t| {
            if t.is_income() {
                (income + t.amount().value(), expenses)
            } else {
                (income, expenses + t.amount().value())
            }
        },
    );
    Summary {
        income,
        expenses,
        balance: income - expenses,
    }
}

/// The total spent in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Decimal,
}

/// Expense totals grouped by category, largest first. Ties are ordered by category name.
pub fn expenses_by_category<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> Vec<CategoryTotal> {
    let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
    for t in transactions.into_iter().filter(|t| t.is_expense()) {
        *totals.entry(t.category()).or_default() += t.amount().value();
    }
    let mut totals: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, amount)| CategoryTotal {
            category: category.to_string(),
            amount,
        })
        .collect();
    totals.sort_by(|a, b| {
        b.amount
            .cmp(&a.amount)
            .then_with(|| a.category.cmp(&b.category))
    });
    totals
}

/// The summary of one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthTotal {
    /// e.g. `Jan-24`
    pub month: String,
    pub summary: Summary,
}

/// A `Summary` per month, oldest month first.
pub fn totals_by_month<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> Vec<MonthTotal> {
    // Keyed on (year, month) so that the order is chronological rather than by label.
    let mut months: BTreeMap<(i32, u32), Vec<&Transaction>> = BTreeMap::new();
    for t in transactions {
        let date = t.date();
        months
            .entry((date.year(), date.month()))
            .or_default()
            .push(t);
    }
    months
        .into_values()
        .filter_map(|group| {
            let first = group.first()?;
            Some(MonthTotal {
                month: month_label(first.date()),
                summary: summarize(group.iter().copied()),
            })
        })
        .collect()
}

/// The first `n` transactions. Collections are kept newest first, so these are the most recent.
pub fn recent(transactions: &[Transaction], n: usize) -> &[Transaction] {
    &transactions[..n.min(transactions.len())]
}

/// How monetary amounts are displayed: a currency symbol and a `num-format` locale that decides
/// digit grouping and separators.
///
/// The default is Indian Rupees in the `en-IN` locale, e.g. `₹1,23,456.79`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyFormat {
    symbol: String,
    locale: String,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: "₹".to_string(),
            locale: Locale::en_IN.name().to_string(),
        }
    }
}

impl CurrencyFormat {
    /// Creates a format, failing if `locale` is not a locale name known to `num-format`.
    pub fn new(symbol: impl Into<String>, locale: impl Into<String>) -> Result<Self> {
        let format = Self {
            symbol: symbol.into(),
            locale: locale.into(),
        };
        format.validate()?;
        Ok(format)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Fails if the locale name is unknown.
    pub fn validate(&self) -> Result<()> {
        find_locale(&self.locale).map(|_| ())
    }

    /// Renders `amount` with two decimal places (rounded half away from zero), grouped digits and
    /// the currency symbol. Negative amounts are prefixed with `-`.
    pub fn format(&self, amount: Decimal) -> String {
        let locale = find_locale(&self.locale).unwrap_or(Locale::en_IN);
        let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };
        let abs = rounded.abs();
        let whole = abs.trunc();
        let grouped = match whole.to_u128() {
            Some(w) => w.to_formatted_string(&locale),
            None => whole.to_string(),
        };
        let cents = ((abs - whole) * Decimal::ONE_HUNDRED)
            .to_u32()
            .unwrap_or_default();
        format!(
            "{sign}{}{grouped}{}{cents:02}",
            self.symbol,
            locale.decimal()
        )
    }
}

/// Renders `amount` in the default currency format, e.g. `₹1,23,456.79` or `-₹300.00`.
pub fn format_currency(amount: Decimal) -> String {
    CurrencyFormat::default().format(amount)
}

/// Looks up a `num-format` locale, accepting either `-` or `_` as the separator.
fn find_locale(name: &str) -> Result<Locale> {
    Locale::from_name(name)
        .or_else(|_| Locale::from_name(name.replace('_', "-")))
        .or_else(|_| Locale::from_name(name.replace('-', "_")))
        .with_context(|| format!("Unknown currency locale '{name}'"))
}
