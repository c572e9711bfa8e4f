use crate::model::Amount;
use crate::Result;
use anyhow::ensure;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Whether money came in or went out.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    #[default]
    Expense,
    Income,
}

serde_plain::derive_display_from_serialize!(TransactionType);
serde_plain::derive_fromstr_from_deserialize!(TransactionType);

/// The unique identifier of a `Transaction`.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    /// Generates a fresh, random identifier.
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TransactionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TransactionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The display label for the month of `date`, e.g. `Jan-24` for 2024-01-15.
pub fn month_label(date: NaiveDate) -> String {
    date.format("%b-%y").to_string()
}

/// The display label for the year of `date`, e.g. `2024`.
pub fn year_label(date: NaiveDate) -> String {
    format!("{:04}", date.year())
}

/// The fields of a transaction before it has been given an id by the store.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    #[serde(rename = "type")]
    pub r#type: TransactionType,
    pub date: NaiveDate,
    pub amount: Amount,
    pub category: String,
    #[serde(default)]
    pub payee: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub note: String,
}

impl NewTransaction {
    /// Creates a candidate with the required fields and empty optional fields.
    pub fn new(
        r#type: TransactionType,
        date: NaiveDate,
        amount: Amount,
        category: impl Into<String>,
    ) -> Self {
        Self {
            r#type,
            date,
            amount,
            category: category.into(),
            payee: String::new(),
            description: String::new(),
            note: String::new(),
        }
    }

    pub fn payee(mut self, payee: impl Into<String>) -> Self {
        self.payee = payee.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// Checks the invariants that every persisted transaction must hold. `date` and `amount` are
    /// enforced by their types, so only the category is checked here.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.category.trim().is_empty(),
            "A transaction requires a non-empty category"
        );
        Ok(())
    }

    pub(crate) fn into_transaction(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            r#type: self.r#type,
            date: self.date,
            amount: self.amount,
            category: self.category,
            payee: self.payee,
            description: self.description,
            note: self.note,
        }
    }
}

/// A single recorded income or expense event.
///
/// The `month` and `year` labels are derived from `date` whenever they are requested. They are
/// written alongside the other fields when persisted and recomputed when read back.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(into = "TransactionRecord", try_from = "TransactionRecord")]
pub struct Transaction {
    id: TransactionId,
    r#type: TransactionType,
    date: NaiveDate,
    amount: Amount,
    category: String,
    payee: String,
    description: String,
    note: String,
}

impl Transaction {
    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    pub fn r#type(&self) -> TransactionType {
        self.r#type
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// e.g. `Jan-24`
    pub fn month(&self) -> String {
        month_label(self.date)
    }

    /// e.g. `2024`
    pub fn year(&self) -> String {
        year_label(self.date)
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn payee(&self) -> &str {
        &self.payee
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn is_income(&self) -> bool {
        self.r#type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.r#type == TransactionType::Expense
    }
}

/// The persisted shape of a `Transaction`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TransactionRecord {
    id: TransactionId,
    #[serde(rename = "type")]
    r#type: TransactionType,
    date: NaiveDate,
    #[serde(default)]
    month: String,
    #[serde(default)]
    year: String,
    amount: Amount,
    category: String,
    #[serde(default)]
    payee: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    note: String,
}

impl From<Transaction> for TransactionRecord {
    fn from(t: Transaction) -> Self {
        Self {
            month: t.month(),
            year: t.year(),
            id: t.id,
            r#type: t.r#type,
            date: t.date,
            amount: t.amount,
            category: t.category,
            payee: t.payee,
            description: t.description,
            note: t.note,
        }
    }
}

impl TryFrom<TransactionRecord> for Transaction {
    type Error = String;

    fn try_from(r: TransactionRecord) -> std::result::Result<Self, Self::Error> {
        if r.id.as_str().is_empty() {
            return Err("Transaction id must not be empty".to_string());
        }
        if r.category.trim().is_empty() {
            return Err(format!("Transaction {} has an empty category", r.id));
        }
        // `month` and `year` are ignored: they are always recomputed from `date`.
        Ok(Self {
            id: r.id,
            r#type: r.r#type,
            date: r.date,
            amount: r.amount,
            category: r.category,
            payee: r.payee,
            description: r.description,
            note: r.note,
        })
    }
}
