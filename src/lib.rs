//! spendbook keeps a local record of personal income and expense transactions.
//!
//! The [`Store`] owns the transactions and persists them to a [`storage::Storage`] medium on
//! every change. [`filter`] derives narrowed views of a collection and [`aggregate`] computes
//! totals over them.

pub mod aggregate;
pub mod args;
pub mod backup;
pub mod commands;
mod config;
mod error;
pub mod filter;
pub mod model;
pub mod storage;
mod store;
mod utils;

#[cfg(test)]
mod test;

pub use config::Config;
pub use error::{error_type, Error, ErrorType, Result};
pub use store::{Store, TRANSACTIONS_KEY};
