//! These structs provide the CLI interface for the spendbook CLI.

use crate::filter::{Filter, Selection};
use crate::model::{Amount, NewTransaction, TransactionId, TransactionType};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// spendbook: A command-line tool for recording personal income and expenses.
///
/// Transactions are kept in a local data directory. Each one is either an expense or an income,
/// has a date, an amount and a category, and may name a payee. You can list them with filters,
/// and see totals of income, expenses and the resulting balance.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the home directory and initialize the configuration file.
    ///
    /// This is the first command you should run. By default the home directory is
    /// $HOME/spendbook; pass --home or set SPENDBOOK_HOME to put it somewhere else.
    Init,
    /// Record a new transaction.
    Add(AddArgs),
    /// Delete a transaction by its ID.
    Delete(DeleteArgs),
    /// List transactions, most recently added first, with totals for the listed transactions.
    List(ListArgs),
    /// Show overall totals, spending by category, per-month totals and recent transactions.
    Summary,
    /// List the months that have transactions, for use with `list --month`.
    Months(MonthsArgs),
    /// List the payees that are configured or in use, for use with `list --payee`.
    Payees,
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where spendbook data and configuration is held. Defaults to ~/spendbook
    #[arg(long, env = "SPENDBOOK_HOME", default_value_t = default_home())]
    home: DisplayPath,
}

impl Common {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// Args for the `spendbook add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// Whether this is an "expense" or an "income".
    #[arg(long = "type", value_name = "TYPE", default_value_t = TransactionType::Expense)]
    kind: TransactionType,

    /// The date of the transaction, e.g. 2024-01-15.
    #[arg(long)]
    date: NaiveDate,

    /// The amount, which must not be negative, e.g. 1250.50
    #[arg(long)]
    amount: Amount,

    /// A label such as Groceries or Salary.
    #[arg(long)]
    category: String,

    /// Who was paid (for an expense) or who paid (for an income).
    #[arg(long)]
    payee: Option<String>,

    /// A brief description.
    #[arg(long)]
    description: Option<String>,

    /// Additional notes.
    #[arg(long)]
    note: Option<String>,
}

impl AddArgs {
    pub fn new(candidate: NewTransaction) -> Self {
        let optional = |s: String| if s.is_empty() { None } else { Some(s) };
        Self {
            kind: candidate.r#type,
            date: candidate.date,
            amount: candidate.amount,
            category: candidate.category,
            payee: optional(candidate.payee),
            description: optional(candidate.description),
            note: optional(candidate.note),
        }
    }

    pub fn payee(&self) -> Option<&str> {
        self.payee.as_deref()
    }

    /// The transaction these arguments describe.
    pub fn candidate(&self) -> NewTransaction {
        NewTransaction {
            r#type: self.kind,
            date: self.date,
            amount: self.amount,
            category: self.category.clone(),
            payee: self.payee.clone().unwrap_or_default(),
            description: self.description.clone().unwrap_or_default(),
            note: self.note.clone().unwrap_or_default(),
        }
    }
}

/// Args for the `spendbook delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The ID of the transaction to delete.
    id: String,

    /// Delete without asking for confirmation.
    #[arg(long, short)]
    yes: bool,
}

impl DeleteArgs {
    pub fn new(id: impl Into<String>, yes: bool) -> Self {
        Self { id: id.into(), yes }
    }

    pub fn id(&self) -> TransactionId {
        TransactionId::from(self.id.as_str())
    }

    pub fn yes(&self) -> bool {
        self.yes
    }
}

/// Args for the `spendbook list` command.
#[derive(Debug, Default, Parser, Clone)]
pub struct ListArgs {
    /// Only list "expense" or "income" transactions, or "all".
    #[arg(long = "type", value_name = "TYPE", default_value = "all")]
    kind: Selection<TransactionType>,

    /// Only list transactions in this month, e.g. Jan-24, or "all".
    #[arg(long, default_value = "all")]
    month: Selection<String>,

    /// Only list transactions with this payee, or "all".
    #[arg(long, default_value = "all")]
    payee: Selection<String>,
}

impl ListArgs {
    pub fn new(filter: Filter) -> Self {
        Self {
            kind: filter.kind,
            month: filter.month,
            payee: filter.payee,
        }
    }

    pub fn filter(&self) -> Filter {
        Filter {
            kind: self.kind.clone(),
            month: self.month.clone(),
            payee: self.payee.clone(),
        }
    }
}

/// Args for the `spendbook months` command.
#[derive(Debug, Default, Parser, Clone)]
pub struct MonthsArgs {
    /// Order the months by date rather than alphabetically by label.
    #[arg(long)]
    chronological: bool,
}

impl MonthsArgs {
    pub fn new(chronological: bool) -> Self {
        Self { chronological }
    }

    pub fn chronological(&self) -> bool {
        self.chronological
    }
}

fn default_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("spendbook"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or SPENDBOOK_HOME instead of relying on the default \
                home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("spendbook")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add() {
        let args = Args::try_parse_from([
            "spendbook",
            "--home",
            "/tmp/sb",
            "add",
            "--type",
            "income",
            "--date",
            "2024-01-15",
            "--amount",
            "500",
            "--category",
            "Salary",
            "--payee",
            "Mom",
        ])
        .unwrap();
        assert_eq!(args.common().home().path(), Path::new("/tmp/sb"));
        let Command::Add(add) = args.command() else {
            panic!("expected the add command");
        };
        let candidate = add.candidate();
        assert_eq!(candidate.r#type, TransactionType::Income);
        assert_eq!(candidate.amount, Amount::from(500));
        assert_eq!(candidate.payee, "Mom");
        assert_eq!(candidate.note, "");
    }

    #[test]
    fn test_parse_add_rejects_negative_amount() {
        let result = Args::try_parse_from([
            "spendbook",
            "add",
            "--date",
            "2024-01-15",
            "--amount=-5",
            "--category",
            "Food",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_list_defaults_to_all() {
        let args = Args::try_parse_from(["spendbook", "list"]).unwrap();
        let Command::List(list) = args.command() else {
            panic!("expected the list command");
        };
        assert_eq!(list.filter(), Filter::all());
    }

    #[test]
    fn test_parse_list_filters() {
        let args = Args::try_parse_from([
            "spendbook",
            "list",
            "--type",
            "expense",
            "--month",
            "Jan-24",
            "--payee",
            "Jay",
        ])
        .unwrap();
        let Command::List(list) = args.command() else {
            panic!("expected the list command");
        };
        assert_eq!(
            list.filter(),
            Filter::all()
                .kind(TransactionType::Expense)
                .month("Jan-24")
                .payee("Jay")
        );
    }

    #[test]
    fn test_parse_delete() {
        let args = Args::try_parse_from(["spendbook", "delete", "abc", "--yes"]).unwrap();
        let Command::Delete(delete) = args.command() else {
            panic!("expected the delete command");
        };
        assert_eq!(delete.id(), TransactionId::from("abc"));
        assert!(delete.yes());
    }
}
