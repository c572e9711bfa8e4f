//! Delete command handler.

use crate::aggregate::CurrencyFormat;
use crate::args::DeleteArgs;
use crate::commands::Out;
use crate::model::Transaction;
use crate::{Config, Result};

/// Deletes one transaction by ID.
///
/// Unless `args.yes()` is set, `confirm` is called with the transaction about to be deleted and
/// the deletion only goes ahead if it returns `true`. Deleting an ID that does not exist is not
/// an error; the returned structure is `None` in that case, and when the deletion is declined.
///
/// # Errors
///
/// - Returns an error if `confirm` fails.
/// - `ErrorType::Storage` if the store could not be written. The transaction is not deleted.
pub async fn delete<F>(
    config: Config,
    args: DeleteArgs,
    confirm: F,
) -> Result<Out<Option<Transaction>>>
where
    F: FnOnce(&Transaction) -> Result<bool>,
{
    let id = args.id();
    let mut store = config.store().await;

    let Some(existing) = store.get(&id) else {
        return Ok(Out::new(format!("No transaction with ID {id}"), None));
    };
    if !args.yes() && !confirm(existing)? {
        return Ok(Out::new("Deletion cancelled", None));
    }

    let deleted = store.delete(&id).await?;
    Ok(Out::new(format!("Deleted transaction {id}"), deleted))
}

/// The question put to the user before `transaction` is deleted.
pub fn confirmation_prompt(transaction: &Transaction, currency: &CurrencyFormat) -> String {
    format!(
        "Delete the {} of {} on {} ({})? [y/N]",
        transaction.r#type(),
        currency.format(transaction.amount().value()),
        transaction.date(),
        transaction.category()
    )
}
