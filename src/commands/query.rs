//! Query command handler.

use crate::args::QueryArgs;
use crate::book::Mode;
use crate::commands::Out;
use crate::model::matches_month;
use crate::store::{RecordStore, Table};
use crate::{Config, Result};
use comfy_table::CellAlignment;

/// Displays a collection as a table with one-based row numbers, the handles used by `update` and
/// `delete`. With `--month`, only records whose date falls in that month are shown; the row
/// numbers still refer to positions in the full collection.
pub async fn query(config: Config, mode: Mode, args: QueryArgs) -> Result<Out<Table>> {
    let mut store = RecordStore::open(&config, mode).await?;
    let collection = args.entity.collection();
    let table = store.read_all(collection).await?;

    let numbered: Vec<(usize, &Vec<String>)> = match &args.month {
        Some(month) if collection.has_dates() => table
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| {
                matches_month(row.first().map(String::as_str).unwrap_or(""), month)
            })
            .collect(),
        _ => table.rows.iter().enumerate().collect(),
    };

    let message = if numbered.is_empty() {
        "No records yet.".to_string()
    } else {
        render_table(&table.headers, &numbered)
    };

    let rows = numbered.into_iter().map(|(_, row)| row.clone()).collect();
    Ok(Out::new(
        message,
        Table {
            headers: table.headers.clone(),
            rows,
        },
    ))
}

/// Renders rows the way the original sheets were shown: content-fitted columns with every cell
/// centered. Cosmetic only; the stored data is never touched.
fn render_table(headers: &[String], numbered: &[(usize, &Vec<String>)]) -> String {
    let mut table = comfy_table::Table::new();

    let mut header_row = vec!["#".to_string()];
    header_row.extend(headers.iter().cloned());
    table.set_header(header_row);

    for (ix, row) in numbered {
        let mut cells = vec![(ix + 1).to_string()];
        cells.extend(row.iter().cloned());
        table.add_row(cells);
    }

    for column in table.column_iter_mut() {
        column.set_cell_alignment(CellAlignment::Center);
    }

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::QueryEntity;
    use crate::model::Amount;
    use crate::store::Collection;
    use crate::test::TestEnv;
    use chrono::NaiveDate;
    use std::str::FromStr;

    async fn seed_expenses(env: &TestEnv) {
        let mut store = env.store().await;
        store.ensure_collection(Collection::Expenses).await.unwrap();
        for (date, amount, category) in [
            ("2024-06-01", "100", "Food"),
            ("2024-07-01", "200", "Bills"),
            ("2024-06-15", "300", "Shopping"),
        ] {
            let expense = crate::model::Expense::new(
                NaiveDate::from_str(date).unwrap(),
                Amount::from_str(amount).unwrap(),
                category,
                "",
            );
            store
                .append(
                    Collection::Expenses,
                    crate::model::Record::to_row(&expense, Collection::Expenses.headers()),
                )
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_query_all_rows() {
        let env = TestEnv::new().await;
        seed_expenses(&env).await;

        let args = QueryArgs {
            entity: QueryEntity::Expenses,
            month: None,
        };
        let out = query(env.config(), Mode::Test, args).await.unwrap();
        assert_eq!(out.structure().unwrap().rows.len(), 3);
        assert!(out.message().contains("Category"));
        assert!(out.message().contains("Food"));
    }

    #[tokio::test]
    async fn test_query_month_filter() {
        let env = TestEnv::new().await;
        seed_expenses(&env).await;

        let args = QueryArgs {
            entity: QueryEntity::Expenses,
            month: Some("June 2024".to_string()),
        };
        let out = query(env.config(), Mode::Test, args).await.unwrap();
        let rows = &out.structure().unwrap().rows;
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r[4] == "June 2024"));
        // The July row's position (2) is skipped, so the row numbers are 1 and 3.
        assert!(out.message().contains('3'));
    }

    #[tokio::test]
    async fn test_query_empty_collection() {
        let env = TestEnv::new().await;
        let mut store = env.store().await;
        store.ensure_collection(Collection::Medicines).await.unwrap();

        let args = QueryArgs {
            entity: QueryEntity::Medicines,
            month: None,
        };
        let out = query(env.config(), Mode::Test, args).await.unwrap();
        assert_eq!(out.message(), "No records yet.");
        assert!(out.structure().unwrap().rows.is_empty());
    }
}
