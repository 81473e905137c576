//! Insert command handlers.

use crate::args::{
    InsertCategoryArgs, InsertExpenseArgs, InsertInvestmentArgs, InsertMedicineArgs,
};
use crate::book::Mode;
use crate::categories;
use crate::commands::Out;
use crate::error::StoreError;
use crate::model::{Expense, Investment, Medicine, Record};
use crate::store::{Collection, RecordStore};
use crate::{Config, Result};

/// Records an expense.
///
/// The `Month` cell is derived from the date by the record store; the caller never supplies it.
/// With the strict duplicate policy active (the default for the csv backend), an expense
/// identical in (date, amount, category, notes) to an existing row is rejected.
///
/// # Errors
///
/// - `ValidationFailed` when the amount is not greater than zero.
/// - `DuplicateRecord` when the strict duplicate policy rejects the row.
pub async fn insert_expense(
    config: Config,
    mode: Mode,
    args: InsertExpenseArgs,
) -> Result<Out<String>> {
    if !args.amount.is_positive() {
        return Err(
            StoreError::ValidationFailed("the amount must be greater than zero".into()).into(),
        );
    }

    let mut store = RecordStore::open(&config, mode).await?;
    store.ensure_collection(Collection::Expenses).await?;

    let expense = Expense::new(args.date, args.amount, args.category, args.notes);
    let row = expense.to_row(Collection::Expenses.headers());
    store.append(Collection::Expenses, row).await?;

    let message = format!(
        "Added expense: {} {} ({})",
        expense.date,
        expense.amount.display_inr(),
        expense.category
    );
    Ok(Out::new(message, expense.month))
}

/// Records a medicine purchase.
///
/// # Errors
///
/// - `ValidationFailed` when the name is blank, the quantity is zero, or the cost is negative.
pub async fn insert_medicine(
    config: Config,
    mode: Mode,
    args: InsertMedicineArgs,
) -> Result<Out<String>> {
    if args.medicine.trim().is_empty() {
        return Err(
            StoreError::ValidationFailed("the medicine name must not be blank".into()).into(),
        );
    }
    if args.quantity == 0 {
        return Err(
            StoreError::ValidationFailed("the quantity must be at least 1".into()).into(),
        );
    }
    if args.cost.is_negative() {
        return Err(
            StoreError::ValidationFailed("the cost must not be negative".into()).into(),
        );
    }

    let mut store = RecordStore::open(&config, mode).await?;
    store.ensure_collection(Collection::Medicines).await?;

    let medicine = Medicine::new(
        args.date,
        args.medicine.trim(),
        args.quantity,
        args.cost,
        args.notes,
    );
    let row = medicine.to_row(Collection::Medicines.headers());
    store.append(Collection::Medicines, row).await?;

    let message = format!(
        "Added medicine: {} x{} for {}",
        medicine.medicine,
        medicine.quantity,
        medicine.cost.display_inr()
    );
    Ok(Out::new(message, medicine.medicine))
}

/// Records an investment.
///
/// # Errors
///
/// - `ValidationFailed` when the amount is not greater than zero.
pub async fn insert_investment(
    config: Config,
    mode: Mode,
    args: InsertInvestmentArgs,
) -> Result<Out<String>> {
    if !args.amount.is_positive() {
        return Err(
            StoreError::ValidationFailed("the amount must be greater than zero".into()).into(),
        );
    }

    let mut store = RecordStore::open(&config, mode).await?;
    store.ensure_collection(Collection::Investments).await?;

    let investment = Investment::new(
        args.date,
        args.investment_type,
        args.amount,
        args.frequency,
        args.notes,
    );
    let row = investment.to_row(Collection::Investments.headers());
    store.append(Collection::Investments, row).await?;

    let message = format!(
        "Added investment: {} {} ({})",
        investment.investment_type,
        investment.amount.display_inr(),
        investment.frequency
    );
    Ok(Out::new(message, investment.investment_type))
}

/// Adds a value to one of the category lists. A blank or already-present value is a no-op, not
/// an error; the message says which happened.
pub async fn insert_category(
    config: Config,
    mode: Mode,
    args: InsertCategoryArgs,
) -> Result<Out<bool>> {
    let mut store = RecordStore::open(&config, mode).await?;
    let added = categories::add(&mut store, args.kind, &args.value).await?;
    let message = if added {
        format!("Added {} category: {}", args.kind, args.value.trim())
    } else {
        format!(
            "No change; '{}' is blank or already present in the {} categories",
            args.value.trim(),
            args.kind
        )
    };
    Ok(Out::new(message, added))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::CategoryKind;
    use crate::model::Amount;
    use crate::model::Frequency;
    use crate::test::TestEnv;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::from_str(s).unwrap()
    }

    fn expense_args(amount: &str) -> InsertExpenseArgs {
        InsertExpenseArgs {
            date: date("2024-06-05"),
            amount: Amount::from_str(amount).unwrap(),
            category: "Food".to_string(),
            notes: "lunch".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_expense_success() {
        let env = TestEnv::new().await;

        let out = insert_expense(env.config(), Mode::Test, expense_args("120"))
            .await
            .unwrap();
        assert!(out.message().contains("Added expense"));

        let mut store = env.store().await;
        let table = store.read_all(Collection::Expenses).await.unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.rows[0],
            vec!["2024-06-05", "120", "Food", "lunch", "June 2024"]
        );
    }

    #[tokio::test]
    async fn test_insert_expense_rejects_zero_amount() {
        let env = TestEnv::new().await;
        let result = insert_expense(env.config(), Mode::Test, expense_args("0")).await;
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::ValidationFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_insert_medicine_success() {
        let env = TestEnv::new().await;
        let args = InsertMedicineArgs {
            date: date("2024-02-11"),
            medicine: " Paracetamol ".to_string(),
            quantity: 2,
            cost: Amount::from_str("45").unwrap(),
            notes: String::new(),
        };

        insert_medicine(env.config(), Mode::Test, args).await.unwrap();

        let mut store = env.store().await;
        let table = store.read_all(Collection::Medicines).await.unwrap();
        assert_eq!(
            table.rows[0],
            vec!["2024-02-11", "Paracetamol", "2", "45", ""]
        );
    }

    #[tokio::test]
    async fn test_insert_medicine_rejects_blank_name() {
        let env = TestEnv::new().await;
        let args = InsertMedicineArgs {
            date: date("2024-02-11"),
            medicine: "   ".to_string(),
            quantity: 1,
            cost: Amount::from_str("45").unwrap(),
            notes: String::new(),
        };
        assert!(insert_medicine(env.config(), Mode::Test, args).await.is_err());
    }

    #[tokio::test]
    async fn test_insert_investment_success() {
        let env = TestEnv::new().await;
        let args = InsertInvestmentArgs {
            date: date("2024-06-01"),
            investment_type: "SIP".to_string(),
            amount: Amount::from_str("5000").unwrap(),
            frequency: Frequency::Monthly,
            notes: String::new(),
        };

        insert_investment(env.config(), Mode::Test, args).await.unwrap();

        let mut store = env.store().await;
        let table = store.read_all(Collection::Investments).await.unwrap();
        assert_eq!(
            table.rows[0],
            vec!["2024-06-01", "SIP", "5000", "Monthly", ""]
        );
    }

    #[tokio::test]
    async fn test_insert_category_and_duplicate() {
        let env = TestEnv::new().await;
        let args = InsertCategoryArgs {
            kind: CategoryKind::Expense,
            value: "Travel".to_string(),
        };

        let out = insert_category(env.config(), Mode::Test, args.clone())
            .await
            .unwrap();
        assert_eq!(out.structure(), Some(&true));

        let out = insert_category(env.config(), Mode::Test, args).await.unwrap();
        assert_eq!(out.structure(), Some(&false));
        assert!(out.message().contains("No change"));
    }
}
