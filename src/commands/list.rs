//! Commands that list transactions and the choices available for filtering them.

use crate::aggregate::summarize;
use crate::args::{ListArgs, MonthsArgs};
use crate::commands::{plural, Out, Totals};
use crate::filter::{distinct_months, distinct_months_chronological, distinct_payees, Filter};
use crate::model::Transaction;
use crate::{Config, Result};
use serde::Serialize;
use std::collections::BTreeSet;

/// The output of `list`: the filter applied, totals of the matching transactions and the
/// transactions themselves, most recently added first.
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub filter: Filter,
    pub totals: Totals,
    pub transactions: Vec<Transaction>,
}

/// Lists the transactions that match every filter criterion in `args`.
pub async fn list(config: Config, args: ListArgs) -> Result<Out<Listing>> {
    let store = config.store().await;
    let filter = args.filter();
    let matching = filter.apply(store.all());
    let totals = Totals::new(summarize(matching.iter().copied()), config.currency());

    let message = format!(
        "{} transaction{} (income {}, expenses {}, balance {})",
        matching.len(),
        plural(matching.len()),
        totals.income,
        totals.expenses,
        totals.balance
    );
    let listing = Listing {
        filter,
        totals,
        transactions: matching.into_iter().cloned().collect(),
    };
    Ok(Out::new(message, listing))
}

/// Lists the distinct month labels present in the store.
pub async fn months(config: Config, args: MonthsArgs) -> Result<Out<Vec<String>>> {
    let store = config.store().await;
    let months = if args.chronological() {
        distinct_months_chronological(store.all())
    } else {
        distinct_months(store.all())
    };
    let message = format!("{} month{}", months.len(), plural(months.len()));
    Ok(Out::new(message, months))
}

/// Lists the configured payees together with any other payees already in use, sorted.
pub async fn payees(config: Config) -> Result<Out<Vec<String>>> {
    let store = config.store().await;
    let payees: Vec<String> = config
        .payees()
        .iter()
        .cloned()
        .chain(distinct_payees(store.all()))
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect();
    let message = format!("{} payee{}", payees.len(), plural(payees.len()));
    Ok(Out::new(message, payees))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TransactionType;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_list_all() {
        let env = TestEnv::new().await;
        env.insert_sample_transactions().await;

        let out = list(env.config(), ListArgs::default()).await.unwrap();
        let listing = out.structure().unwrap();
        assert_eq!(listing.transactions.len(), 4);
        // Newest first: the last inserted sample comes first.
        assert_eq!(listing.transactions[0].category(), "Gift");
        assert_eq!(listing.totals.income, "₹1,500.00");
        assert_eq!(listing.totals.expenses, "₹250.50");
        assert_eq!(listing.totals.balance, "₹1,249.50");
        assert!(out.message().starts_with("4 transactions"));
    }

    #[tokio::test]
    async fn test_list_filtered_totals() {
        let env = TestEnv::new().await;
        env.insert_sample_transactions().await;

        let filter = Filter::all()
            .kind(TransactionType::Expense)
            .month("Jan-24")
            .payee("Mom");
        let out = list(env.config(), ListArgs::new(filter)).await.unwrap();
        let listing = out.structure().unwrap();
        assert_eq!(listing.transactions.len(), 1);
        assert_eq!(listing.transactions[0].category(), "Groceries");
        assert_eq!(listing.totals.expenses, "₹200.00");
        assert_eq!(listing.totals.balance, "-₹200.00");
        assert!(out.message().starts_with("1 transaction "));
    }

    #[tokio::test]
    async fn test_list_empty_store() {
        let env = TestEnv::new().await;
        let out = list(env.config(), ListArgs::default()).await.unwrap();
        let listing = out.structure().unwrap();
        assert!(listing.transactions.is_empty());
        assert_eq!(listing.totals.balance, "₹0.00");
    }

    #[tokio::test]
    async fn test_months() {
        let env = TestEnv::new().await;
        env.insert_sample_transactions().await;

        let out = months(env.config(), MonthsArgs::new(false)).await.unwrap();
        assert_eq!(out.structure().unwrap(), &vec!["Feb-24", "Jan-24"]);

        let out = months(env.config(), MonthsArgs::new(true)).await.unwrap();
        assert_eq!(out.structure().unwrap(), &vec!["Jan-24", "Feb-24"]);
    }

    #[tokio::test]
    async fn test_payees_merges_configured_and_used() {
        let env = TestEnv::with_payees(&["Mom", "Mansi"]).await;
        env.insert_sample_transactions().await;

        let out = payees(env.config()).await.unwrap();
        assert_eq!(out.structure().unwrap(), &vec!["Jay", "Mansi", "Mom"]);
    }
}
