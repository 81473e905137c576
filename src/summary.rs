//! The monthly summary: salary, other investments and expenses for one month, and the savings
//! that remain.

use crate::model::{matches_month, Amount, Expense, Investment};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The investment type whose amounts count as income rather than outflow.
pub const SALARY_TYPE: &str = "Salary";

/// The computed metrics for one month.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MonthSummary {
    /// The month key the metrics were computed for, e.g. `June 2024`.
    pub month: String,
    /// Sum of investment amounts with type `Salary`.
    pub total_salary: Amount,
    /// Sum of investment amounts with any other type.
    pub total_investments: Amount,
    /// Sum of expense amounts.
    pub total_expenses: Amount,
    /// `total_salary - (total_investments + total_expenses)`. May be negative.
    pub savings: Amount,
}

/// Computes the summary for `month` over the given records. A record belongs to a month when the
/// month key derived from its date cell matches; records whose date cell cannot be parsed do not
/// match any month.
pub fn month_summary(
    investments: &[Investment],
    expenses: &[Expense],
    month: &str,
) -> MonthSummary {
    let mut total_salary = Decimal::ZERO;
    let mut total_investments = Decimal::ZERO;
    let mut total_expenses = Decimal::ZERO;

    for investment in investments {
        if !matches_month(&investment.date, month) {
            continue;
        }
        if investment.investment_type == SALARY_TYPE {
            total_salary += investment.amount.value();
        } else {
            total_investments += investment.amount.value();
        }
    }

    for expense in expenses {
        if matches_month(&expense.date, month) {
            total_expenses += expense.amount.value();
        }
    }

    let savings = total_salary - (total_investments + total_expenses);
    MonthSummary {
        month: month.to_string(),
        total_salary: Amount::new(total_salary),
        total_investments: Amount::new(total_investments),
        total_expenses: Amount::new(total_expenses),
        savings: Amount::new(savings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Frequency;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn amount(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    #[test]
    fn test_worked_example() {
        let investments = vec![
            Investment::new(date(2024, 6, 1), "Salary", amount("50000"), Frequency::Monthly, ""),
            Investment::new(date(2024, 6, 5), "SIP", amount("5000"), Frequency::Monthly, ""),
        ];
        let expenses = vec![Expense::new(date(2024, 6, 10), amount("12000"), "Bills", "")];

        let summary = month_summary(&investments, &expenses, "June 2024");
        assert_eq!(summary.total_salary, amount("50000"));
        assert_eq!(summary.total_investments, amount("5000"));
        assert_eq!(summary.total_expenses, amount("12000"));
        assert_eq!(summary.savings, amount("33000"));
    }

    #[test]
    fn test_other_months_are_excluded() {
        let investments = vec![
            Investment::new(date(2024, 6, 1), "Salary", amount("50000"), Frequency::Monthly, ""),
            Investment::new(date(2024, 7, 1), "Salary", amount("50000"), Frequency::Monthly, ""),
        ];
        let expenses = vec![
            Expense::new(date(2024, 6, 2), amount("100"), "Food", ""),
            Expense::new(date(2024, 5, 2), amount("900"), "Food", ""),
        ];

        let summary = month_summary(&investments, &expenses, "June 2024");
        assert_eq!(summary.total_salary, amount("50000"));
        assert_eq!(summary.total_expenses, amount("100"));
    }

    #[test]
    fn test_negative_savings_are_valid() {
        let investments = vec![Investment::new(
            date(2024, 6, 1),
            "Salary",
            amount("1000"),
            Frequency::Monthly,
            "",
        )];
        let expenses = vec![Expense::new(date(2024, 6, 2), amount("2500"), "Bills", "")];

        let summary = month_summary(&investments, &expenses, "June 2024");
        assert_eq!(summary.savings, amount("-1500"));
    }

    #[test]
    fn test_unparseable_dates_match_nothing() {
        let mut investment = Investment::new(
            date(2024, 6, 1),
            "Salary",
            amount("1000"),
            Frequency::Monthly,
            "",
        );
        investment.date = "soonish".to_string();

        let summary = month_summary(&[investment], &[], "June 2024");
        assert!(summary.total_salary.is_zero());
    }

    #[test]
    fn test_empty_month_is_all_zero() {
        let summary = month_summary(&[], &[], "June 2024");
        assert!(summary.total_salary.is_zero());
        assert!(summary.total_investments.is_zero());
        assert!(summary.total_expenses.is_zero());
        assert!(summary.savings.is_zero());
    }
}
