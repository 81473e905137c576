//! Summary command handler.

use crate::args::SummaryArgs;
use crate::book::Mode;
use crate::commands::Out;
use crate::model::{Expense, Investment, Items};
use crate::store::{Collection, RecordStore};
use crate::summary::{month_summary, MonthSummary};
use crate::{Config, Result};

/// Computes and prints the summary metrics for one month: total salary, total other investments,
/// total expenses, and the savings that remain. Savings may be negative and are reported as-is.
pub async fn summary(config: Config, mode: Mode, args: SummaryArgs) -> Result<Out<MonthSummary>> {
    let mut store = RecordStore::open(&config, mode).await?;

    let investments =
        Items::<Investment>::from_table(&store.read_all(Collection::Investments).await?)?;
    let expenses = Items::<Expense>::from_table(&store.read_all(Collection::Expenses).await?)?;

    let summary = month_summary(investments.data(), expenses.data(), &args.month);
    let message = format!(
        "{}: salary {}, investments {}, expenses {}, savings {}",
        summary.month,
        summary.total_salary.display_inr(),
        summary.total_investments.display_inr(),
        summary.total_expenses.display_inr(),
        summary.savings.display_inr(),
    );
    Ok(Out::new(message, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, Frequency, Record};
    use crate::test::TestEnv;
    use chrono::NaiveDate;
    use std::str::FromStr;

    #[tokio::test]
    async fn test_summary_worked_example() {
        let env = TestEnv::new().await;
        let mut store = env.store().await;
        store.ensure_collection(Collection::Expenses).await.unwrap();
        store.ensure_collection(Collection::Investments).await.unwrap();

        for (kind, amount) in [("Salary", "50000"), ("SIP", "5000")] {
            let investment = Investment::new(
                NaiveDate::from_str("2024-06-01").unwrap(),
                kind,
                Amount::from_str(amount).unwrap(),
                Frequency::Monthly,
                "",
            );
            store
                .append(
                    Collection::Investments,
                    investment.to_row(Collection::Investments.headers()),
                )
                .await
                .unwrap();
        }
        let expense = Expense::new(
            NaiveDate::from_str("2024-06-10").unwrap(),
            Amount::from_str("12000").unwrap(),
            "Bills",
            "",
        );
        store
            .append(
                Collection::Expenses,
                expense.to_row(Collection::Expenses.headers()),
            )
            .await
            .unwrap();

        let args = SummaryArgs {
            month: "June 2024".to_string(),
        };
        let out = summary(env.config(), Mode::Test, args).await.unwrap();
        let s = out.structure().unwrap();
        assert_eq!(s.total_salary, Amount::from_str("50000").unwrap());
        assert_eq!(s.total_investments, Amount::from_str("5000").unwrap());
        assert_eq!(s.total_expenses, Amount::from_str("12000").unwrap());
        assert_eq!(s.savings, Amount::from_str("33000").unwrap());
        assert!(out.message().contains("savings ₹33,000.00"));
    }

    #[tokio::test]
    async fn test_summary_requires_initialized_collections() {
        let env = TestEnv::new().await;
        let args = SummaryArgs {
            month: "June 2024".to_string(),
        };
        assert!(summary(env.config(), Mode::Test, args).await.is_err());
    }
}
