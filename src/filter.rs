//! Derives filtered views of a transaction collection, and the choices offered for filtering.

use crate::model::{Transaction, TransactionType};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The text that selects every value of a criterion.
pub const ALL: &str = "all";

/// One filter criterion: either everything, or only records whose value equals `T`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection<T> {
    #[default]
    All,
    Only(T),
}

impl<T> Selection<T> {
    /// Returns true if `value` satisfies this criterion.
    pub fn matches<U>(&self, value: &U) -> bool
    where
        T: PartialEq<U>,
        U: ?Sized,
    {
        match self {
            Selection::All => true,
            Selection::Only(expected) => expected == value,
        }
    }
}

impl<T> From<Option<T>> for Selection<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Selection::Only(v),
            None => Selection::All,
        }
    }
}

impl<T: Display> Display for Selection<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Selection::All => f.write_str(ALL),
            Selection::Only(v) => Display::fmt(v, f),
        }
    }
}

/// Parses `all` (in any case) as `Selection::All` and anything else as a label.
impl FromStr for Selection<String> {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case(ALL) {
            Ok(Selection::All)
        } else {
            Ok(Selection::Only(s.to_string()))
        }
    }
}

/// Parses `all` (in any case) as `Selection::All`, otherwise `expense` or `income`.
impl FromStr for Selection<TransactionType> {
    type Err = serde_plain::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(ALL) {
            Ok(Selection::All)
        } else {
            TransactionType::from_str(&s.to_ascii_lowercase()).map(Selection::Only)
        }
    }
}

/// The criteria that narrow a transaction list. A record is kept only if it satisfies every
/// criterion.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub kind: Selection<TransactionType>,
    /// A month label such as `Jan-24`.
    pub month: Selection<String>,
    pub payee: Selection<String>,
}

impl Filter {
    /// A filter that keeps everything.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: impl Into<Selection<TransactionType>>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn month(mut self, month: impl Into<Selection<String>>) -> Self {
        self.month = month.into();
        self
    }

    pub fn payee(mut self, payee: impl Into<Selection<String>>) -> Self {
        self.payee = payee.into();
        self
    }

    /// Returns true if `t` satisfies every criterion.
    pub fn matches(&self, t: &Transaction) -> bool {
        self.kind.matches(&t.r#type())
            && self.month.matches(t.month().as_str())
            && self.payee.matches(t.payee())
    }

    /// The records of `transactions` that satisfy every criterion, in their original order.
    pub fn apply<'a>(
        &self,
        transactions: impl IntoIterator<Item = &'a Transaction>,
    ) -> Vec<&'a Transaction> {
        transactions
            .into_iter()
            .filter(|t| self.matches(t))
            .collect()
    }
}

impl From<TransactionType> for Selection<TransactionType> {
    fn from(value: TransactionType) -> Self {
        Selection::Only(value)
    }
}

impl From<&str> for Selection<String> {
    fn from(value: &str) -> Self {
        Selection::Only(value.to_string())
    }
}

/// The distinct month labels present, sorted as text. Note that `Feb-24` sorts before `Jan-24`;
/// use `distinct_months_chronological` for calendar order.
pub fn distinct_months<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Vec<String> {
    transactions
        .into_iter()
        .map(|t| t.month())
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

/// The distinct month labels present, oldest month first.
pub fn distinct_months_chronological<'a>(
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> Vec<String> {
    transactions
        .into_iter()
        .map(|t| ((t.date().year(), t.date().month()), t.month()))
        .collect::<BTreeMap<(i32, u32), String>>()
        .into_values()
        .collect()
}

/// The distinct non-empty payees present, sorted.
pub fn distinct_payees<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Vec<String> {
    transactions
        .into_iter()
        .map(|t| t.payee())
        .filter(|p| !p.is_empty())
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
