//! Summary command handler.

use crate::aggregate::{
    expenses_by_category, recent, summarize, totals_by_month, CategoryTotal, MonthTotal,
};
use crate::commands::{Out, Totals};
use crate::model::Transaction;
use crate::{Config, Result};
use serde::Serialize;

/// How many of the newest transactions the summary includes.
const RECENT: usize = 5;

/// The output of `summary`.
#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub totals: Totals,
    pub expenses_by_category: Vec<CategoryTotal>,
    pub months: Vec<MonthTotal>,
    pub recent: Vec<Transaction>,
}

/// Summarizes every transaction in the store.
pub async fn summary(config: Config) -> Result<Out<Overview>> {
    let store = config.store().await;
    let all = store.all();
    let totals = Totals::new(summarize(all), config.currency());

    let message = format!(
        "Income: {}, Expenses: {}, Balance: {}",
        totals.income, totals.expenses, totals.balance
    );
    let overview = Overview {
        totals,
        expenses_by_category: expenses_by_category(all),
        months: totals_by_month(all),
        recent: recent(all, RECENT).to_vec(),
    };
    Ok(Out::new(message, overview))
}
