//! Types that represent the core data model, such as `Transaction` and `Amount`.
mod amount;
mod transaction;

pub use amount::{Amount, AmountError};
pub use transaction::{
    month_label, year_label, NewTransaction, Transaction, TransactionId, TransactionType,
};
