//! The transaction store: the canonical, ordered collection of transactions and its persistence.

use crate::backup::Backup;
use crate::error::{ErrorType, IntoResult};
use crate::model::{NewTransaction, Transaction, TransactionId, TransactionType};
use crate::storage::Storage;
use crate::Result;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// The storage key that holds the whole transaction collection.
pub const TRANSACTIONS_KEY: &str = "transactions";

/// The version written into the persisted envelope.
const SCHEMA_VERSION: u32 = 1;

/// Owns the canonical transaction collection, newest first.
///
/// Every mutation serializes the entire collection and writes it to `Storage` before returning.
/// If that write fails the mutation is undone and the error is returned, so the in-memory
/// collection always matches what was last persisted.
pub struct Store {
    storage: Arc<dyn Storage>,
    backup: Backup,
    transactions: Vec<Transaction>,
}

/// The persisted layout.
#[derive(Debug, Serialize)]
struct Envelope<'a> {
    version: u32,
    transactions: &'a [Transaction],
}

/// Layouts accepted when reading. The unversioned bare array predates the envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Persisted {
    Versioned {
        version: u32,
        transactions: Vec<Transaction>,
    },
    Legacy(Vec<Transaction>),
}

impl Store {
    /// Loads the persisted collection from `storage`.
    ///
    /// This never fails. A missing value yields an empty store. A value that cannot be read is
    /// copied to a backup key through `backup` and the store starts empty.
    pub async fn initialize(storage: Arc<dyn Storage>, backup: Backup) -> Self {
        let transactions = match storage.get(TRANSACTIONS_KEY).await {
            Ok(Some(raw)) => match parse(&raw) {
                Ok(transactions) => transactions,
                Err(e) => {
                    warn!("The stored transactions could not be read, starting empty: {e:#}");
                    match backup.save_corrupt(TRANSACTIONS_KEY, &raw).await {
                        Ok(key) => warn!("The unreadable data was preserved under '{key}'"),
                        Err(e) => warn!("Unable to preserve the unreadable data: {e:#}"),
                    }
                    Vec::new()
                }
            },
            Ok(None) => {
                debug!("No stored transactions, starting empty");
                Vec::new()
            }
            Err(e) => {
                warn!("Unable to read the stored transactions, starting empty: {e:#}");
                Vec::new()
            }
        };
        debug!("Loaded {} transactions", transactions.len());
        Self {
            storage,
            backup,
            transactions,
        }
    }

    /// Validates `candidate`, gives it a new id, places it first in the collection and persists.
    ///
    /// # Errors
    /// - `ErrorType::Validation` if the candidate does not satisfy the record invariants. Nothing
    ///   is changed.
    /// - `ErrorType::Storage` if the collection could not be written. The collection is left as it
    ///   was before the call.
    pub async fn add(&mut self, candidate: NewTransaction) -> Result<Transaction> {
        candidate.validate().pub_result(ErrorType::Validation)?;

        let id = self.unused_id();
        let transaction = candidate.into_transaction(id);
        self.transactions.insert(0, transaction.clone());

        if let Err(e) = self.persist().await {
            self.transactions.remove(0);
            return Err(e);
        }
        debug!("Added transaction {}", transaction.id());
        Ok(transaction)
    }

    /// Removes the transaction with `id` and persists.
    ///
    /// Returns the removed transaction, or `None` (and writes nothing) if no transaction has `id`.
    ///
    /// # Errors
    /// - `ErrorType::Storage` if the collection could not be written. The transaction is restored.
    pub async fn delete(&mut self, id: &TransactionId) -> Result<Option<Transaction>> {
        let Some(position) = self.transactions.iter().position(|t| t.id() == id) else {
            debug!("No transaction {id} to delete");
            return Ok(None);
        };
        let removed = self.transactions.remove(position);

        if let Err(e) = self.persist().await {
            self.transactions.insert(position, removed);
            return Err(e);
        }
        debug!("Deleted transaction {id}");
        Ok(Some(removed))
    }

    /// All transactions, most recently added first.
    pub fn all(&self) -> &[Transaction] {
        &self.transactions
    }

    /// The transactions of the given type, in collection order.
    pub fn by_type(&self, r#type: TransactionType) -> Vec<&Transaction> {
        self.transactions
            .iter()
            .filter(|t| t.r#type() == r#type)
            .collect()
    }

    /// The transaction with `id`, if any.
    pub fn get(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id() == id)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn backup(&self) -> &Backup {
        &self.backup
    }

    fn unused_id(&self) -> TransactionId {
        loop {
            let id = TransactionId::generate();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    async fn persist(&self) -> Result<()> {
        let envelope = Envelope {
            version: SCHEMA_VERSION,
            transactions: &self.transactions,
        };
        let json = serde_json::to_string(&envelope)
            .context("Failed to serialize transactions")
            .pub_result(ErrorType::Storage)?;
        self.storage
            .set(TRANSACTIONS_KEY, &json)
            .await
            .context("Failed to save transactions")
            .pub_result(ErrorType::Storage)
    }
}

/// Parses a persisted value in either accepted layout.
fn parse(raw: &str) -> Result<Vec<Transaction>> {
    let persisted: Persisted =
        serde_json::from_str(raw).context("The stored value is not a list of transactions")?;
    let transactions = match persisted {
        Persisted::Versioned {
            version,
            transactions,
        } => {
            if version != SCHEMA_VERSION {
                bail!("Unsupported schema version {version}");
            }
            transactions
        }
        Persisted::Legacy(transactions) => {
            debug!("Read transactions in the unversioned layout");
            transactions
        }
    };

    let mut seen = HashSet::new();
    for t in &transactions {
        if !seen.insert(t.id()) {
            bail!("Duplicate transaction id {}", t.id());
        }
    }
    Ok(transactions)
}
