//! Add command handler.

use crate::args::AddArgs;
use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::model::Transaction;
use crate::{Config, Result};
use anyhow::anyhow;

/// Records a new transaction in the store.
///
/// A unique ID is generated by the store and returned with the stored transaction.
///
/// # Arguments
///
/// - `config` - The application configuration, which locates the store.
/// - `args` - The transaction data. `date`, `amount` and `category` are required; all other
///   fields are optional.
///
/// # Errors
///
/// - `ErrorType::Validation` if the category is blank, or if payees are configured and the payee
///   is not one of them.
/// - `ErrorType::Storage` if the store could not be written.
pub async fn add(config: Config, args: AddArgs) -> Result<Out<Transaction>> {
    if let Some(payee) = args.payee() {
        let payees = config.payees();
        if !payees.is_empty() && !payees.iter().any(|p| p == payee) {
            return Err(anyhow!(
                "Unknown payee '{payee}', expected one of: {}",
                payees.join(", ")
            ))
            .pub_result(ErrorType::Validation);
        }
    }

    let mut store = config.store().await;
    let transaction = store.add(args.candidate()).await?;

    let message = format!(
        "Added {} of {} on {} with ID: {}",
        transaction.r#type(),
        config.currency().format(transaction.amount().value()),
        transaction.date(),
        transaction.id()
    );
    Ok(Out::new(message, transaction))
}
