//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::model::{Amount, NewTransaction, Transaction, TransactionType};
use crate::Config;
use chrono::NaiveDate;
use std::str::FromStr;
use tempfile::TempDir;

/// Test environment that sets up a spendbook home directory with a created Config.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    /// Creates a test environment with a default Config and an empty store.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("spendbook");
        let config = Config::create(&root).await.unwrap();

        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    /// Creates a test environment whose config offers the given payees.
    pub async fn with_payees(payees: &[&str]) -> Self {
        let env = Self::new().await;
        let path = env.config.config_path();
        let mut json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        json["payees"] = serde_json::json!(payees);
        std::fs::write(path, serde_json::to_string_pretty(&json).unwrap()).unwrap();

        let config = Config::load(env.config.root()).await.unwrap();
        Self {
            _temp_dir: env._temp_dir,
            config,
        }
    }

    /// Returns a clone of the Config.
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    /// Adds one expense of 9.99 in `category` directly through the store and returns it.
    pub async fn insert_test_transaction(&self, category: &str) -> Transaction {
        let mut store = self.config.store().await;
        store
            .add(NewTransaction::new(
                TransactionType::Expense,
                NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                Amount::from_str("9.99").unwrap(),
                category,
            ))
            .await
            .unwrap()
    }

    /// Adds four transactions, in this order:
    ///
    /// | type    | date       | amount | category  | payee |
    /// |---------|------------|--------|-----------|-------|
    /// | expense | 2024-01-10 | 200    | Groceries | Mom   |
    /// | income  | 2024-01-31 | 1000   | Salary    | Jay   |
    /// | expense | 2024-02-02 | 50.50  | Fuel      | Jay   |
    /// | income  | 2024-02-14 | 500    | Gift      | Mom   |
    pub async fn insert_sample_transactions(&self) -> Vec<Transaction> {
        let samples = [
            (TransactionType::Expense, "2024-01-10", "200", "Groceries", "Mom"),
            (TransactionType::Income, "2024-01-31", "1000", "Salary", "Jay"),
            (TransactionType::Expense, "2024-02-02", "50.50", "Fuel", "Jay"),
            (TransactionType::Income, "2024-02-14", "500", "Gift", "Mom"),
        ];
        let mut store = self.config.store().await;
        let mut added = Vec::new();
        for (kind, date, amount, category, payee) in samples {
            let candidate = NewTransaction::new(
                kind,
                NaiveDate::from_str(date).unwrap(),
                Amount::from_str(amount).unwrap(),
                category,
            )
            .payee(payee);
            added.push(store.add(candidate).await.unwrap());
        }
        added
    }
}
