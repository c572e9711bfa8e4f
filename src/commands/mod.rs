//! Command handlers for the spendbook CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod add;
mod delete;
mod init;
mod list;
mod summary;

use crate::aggregate::{CurrencyFormat, Summary};
use serde::Serialize;
use std::fmt::Debug;
use tracing::info;

pub use add::add;
pub use delete::{confirmation_prompt, delete};
pub use init::init;
pub use list::{list, months, payees, Listing};
pub use summary::{summary, Overview};

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to stdout.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                println!("{json}");
            }
        }
    }
}

/// A `Summary` together with its amounts rendered for display.
#[derive(Debug, Clone, Serialize)]
pub struct Totals {
    pub summary: Summary,
    pub income: String,
    pub expenses: String,
    pub balance: String,
}

impl Totals {
    pub(crate) fn new(summary: Summary, currency: &CurrencyFormat) -> Self {
        Self {
            income: currency.format(summary.income),
            expenses: currency.format(summary.expenses),
            balance: currency.format(summary.balance),
            summary,
        }
    }
}

/// Returns `"s"` unless `count` is one.
fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
