//! Update command handlers.
//!
//! Records have no stable identity, so an update is a read of the full collection, a patch of
//! one in-memory row, and a rewrite of every data row.

use crate::args::{UpdateExpenseArgs, UpdateInvestmentArgs, UpdateMedicineArgs};
use crate::book::Mode;
use crate::commands::{row_index, Out};
use crate::error::StoreError;
use crate::store::{Collection, RecordStore};
use crate::{Config, Result};

/// Updates one expense row in place. Only the provided fields change; the `Month` cell is
/// recomputed from the date cell by the record store during the rewrite, whether or not the date
/// changed.
pub async fn update_expense(
    config: Config,
    mode: Mode,
    args: UpdateExpenseArgs,
) -> Result<Out<String>> {
    if let Some(amount) = &args.amount {
        if !amount.is_positive() {
            return Err(
                StoreError::ValidationFailed("the amount must be greater than zero".into()).into(),
            );
        }
    }

    let mut store = RecordStore::open(&config, mode).await?;
    let collection = Collection::Expenses;
    let table = store.read_all(collection).await?;
    let ix = row_index(args.row, table.rows.len())?;

    let mut rows = table.rows;
    let row = &mut rows[ix];
    if let Some(date) = args.date {
        set_cell(row, 0, date.to_string());
    }
    if let Some(amount) = args.amount {
        set_cell(row, 1, amount.to_string());
    }
    if let Some(category) = args.category {
        set_cell(row, 2, category);
    }
    if let Some(notes) = args.notes {
        set_cell(row, 3, notes);
    }

    store.rewrite_all(collection, rows).await?;
    Ok(Out::new_message(format!("Updated expense row {}", args.row)))
}

/// Updates one medicine row in place. Only the provided fields change.
pub async fn update_medicine(
    config: Config,
    mode: Mode,
    args: UpdateMedicineArgs,
) -> Result<Out<String>> {
    if let Some(medicine) = &args.medicine {
        if medicine.trim().is_empty() {
            return Err(
                StoreError::ValidationFailed("the medicine name must not be blank".into()).into(),
            );
        }
    }
    if args.quantity == Some(0) {
        return Err(
            StoreError::ValidationFailed("the quantity must be at least 1".into()).into(),
        );
    }
    if let Some(cost) = &args.cost {
        if cost.is_negative() {
            return Err(
                StoreError::ValidationFailed("the cost must not be negative".into()).into(),
            );
        }
    }

    let mut store = RecordStore::open(&config, mode).await?;
    let collection = Collection::Medicines;
    let table = store.read_all(collection).await?;
    let ix = row_index(args.row, table.rows.len())?;

    let mut rows = table.rows;
    let row = &mut rows[ix];
    if let Some(date) = args.date {
        set_cell(row, 0, date.to_string());
    }
    if let Some(medicine) = args.medicine {
        set_cell(row, 1, medicine.trim().to_string());
    }
    if let Some(quantity) = args.quantity {
        set_cell(row, 2, quantity.to_string());
    }
    if let Some(cost) = args.cost {
        set_cell(row, 3, cost.to_string());
    }
    if let Some(notes) = args.notes {
        set_cell(row, 4, notes);
    }

    store.rewrite_all(collection, rows).await?;
    Ok(Out::new_message(format!(
        "Updated medicine row {}",
        args.row
    )))
}

/// Updates one investment row in place. Only the provided fields change.
pub async fn update_investment(
    config: Config,
    mode: Mode,
    args: UpdateInvestmentArgs,
) -> Result<Out<String>> {
    if let Some(amount) = &args.amount {
        if !amount.is_positive() {
            return Err(
                StoreError::ValidationFailed("the amount must be greater than zero".into()).into(),
            );
        }
    }

    let mut store = RecordStore::open(&config, mode).await?;
    let collection = Collection::Investments;
    let table = store.read_all(collection).await?;
    let ix = row_index(args.row, table.rows.len())?;

    let mut rows = table.rows;
    let row = &mut rows[ix];
    if let Some(date) = args.date {
        set_cell(row, 0, date.to_string());
    }
    if let Some(investment_type) = args.investment_type {
        set_cell(row, 1, investment_type);
    }
    if let Some(amount) = args.amount {
        set_cell(row, 2, amount.to_string());
    }
    if let Some(frequency) = args.frequency {
        set_cell(row, 3, frequency.to_string());
    }
    if let Some(notes) = args.notes {
        set_cell(row, 4, notes);
    }

    store.rewrite_all(collection, rows).await?;
    Ok(Out::new_message(format!(
        "Updated investment row {}",
        args.row
    )))
}

/// Sets a cell, extending the row with blanks when a stored row is shorter than the header.
fn set_cell(row: &mut Vec<String>, ix: usize, value: String) {
    while row.len() <= ix {
        row.push(String::new());
    }
    row[ix] = value;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, Expense, Record};
    use crate::test::TestEnv;
    use chrono::NaiveDate;
    use std::str::FromStr;

    async fn seed_expense(env: &TestEnv, date: &str, amount: &str) {
        let mut store = env.store().await;
        store.ensure_collection(Collection::Expenses).await.unwrap();
        let expense = Expense::new(
            NaiveDate::from_str(date).unwrap(),
            Amount::from_str(amount).unwrap(),
            "Food",
            "",
        );
        store
            .append(
                Collection::Expenses,
                expense.to_row(Collection::Expenses.headers()),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_expense_recomputes_month() {
        let env = TestEnv::new().await;
        seed_expense(&env, "2024-06-01", "100").await;

        let args = UpdateExpenseArgs {
            row: 1,
            date: Some(NaiveDate::from_str("2024-07-15").unwrap()),
            amount: None,
            category: None,
            notes: None,
        };
        update_expense(env.config(), Mode::Test, args).await.unwrap();

        let mut store = env.store().await;
        let table = store.read_all(Collection::Expenses).await.unwrap();
        assert_eq!(table.rows[0][0], "2024-07-15");
        assert_eq!(table.rows[0][4], "July 2024");
        // The untouched cells survive.
        assert_eq!(table.rows[0][1], "100");
        assert_eq!(table.rows[0][2], "Food");
    }

    #[tokio::test]
    async fn test_update_expense_bad_row() {
        let env = TestEnv::new().await;
        seed_expense(&env, "2024-06-01", "100").await;

        let args = UpdateExpenseArgs {
            row: 2,
            date: None,
            amount: None,
            category: None,
            notes: None,
        };
        assert!(update_expense(env.config(), Mode::Test, args).await.is_err());
    }

    #[tokio::test]
    async fn test_update_expense_rejects_non_positive_amount() {
        let env = TestEnv::new().await;
        seed_expense(&env, "2024-06-01", "100").await;

        let args = UpdateExpenseArgs {
            row: 1,
            date: None,
            amount: Some(Amount::from_str("0").unwrap()),
            category: None,
            notes: None,
        };
        let err = update_expense(env.config(), Mode::Test, args).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::ValidationFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_update_preserves_other_rows() {
        let env = TestEnv::new().await;
        seed_expense(&env, "2024-06-01", "100").await;
        seed_expense(&env, "2024-06-02", "200").await;
        seed_expense(&env, "2024-06-03", "300").await;

        let args = UpdateExpenseArgs {
            row: 2,
            date: None,
            amount: Some(Amount::from_str("250").unwrap()),
            category: None,
            notes: None,
        };
        update_expense(env.config(), Mode::Test, args).await.unwrap();

        let mut store = env.store().await;
        let table = store.read_all(Collection::Expenses).await.unwrap();
        let amounts: Vec<&str> = table.rows.iter().map(|r| r[1].as_str()).collect();
        assert_eq!(amounts, vec!["100", "250", "300"]);
    }
}
