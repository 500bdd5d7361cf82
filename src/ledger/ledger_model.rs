use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::goals::goals_model::{Goal, GoalStatus};
use crate::transactions::transactions_model::Transaction;

/// Income, expense and net balance over a set of transactions
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct LedgerTotals {
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
}

/// Snapshot of a user's finances for dashboards
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccountOverview {
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
    pub reserved_in_goals: f64,
    pub available_balance: f64,
    pub monthly_income: f64,
    pub monthly_expense: f64,
    pub monthly_balance: f64,
}

/// Sums signed transaction amounts into income, expense and balance.
/// Expense amounts are stored negative, so the expense total is the sum
/// of their magnitudes.
pub fn totals(transactions: &[Transaction]) -> LedgerTotals {
    let mut acc = LedgerTotals::default();
    for transaction in transactions {
        if transaction.is_income() {
            acc.total_income += transaction.amount;
        } else {
            acc.total_expense += transaction.amount.abs();
        }
    }
    acc.balance = acc.total_income - acc.total_expense;
    acc
}

/// Totals restricted to transactions dated in the given calendar month
pub fn monthly_totals(transactions: &[Transaction], month: u32, year: i32) -> LedgerTotals {
    let in_month: Vec<Transaction> = transactions
        .iter()
        .filter(|t| t.date.year() == year && t.date.month() == month)
        .cloned()
        .collect();
    totals(&in_month)
}

/// Money already committed to active goals
pub fn reserved_in_goals(goals: &[Goal]) -> f64 {
    goals
        .iter()
        .filter(|g| g.status == GoalStatus::Active)
        .map(|g| g.current_amount)
        .sum()
}

/// Balance minus the amounts reserved in active goals
pub fn available_balance(totals: &LedgerTotals, reserved: f64) -> f64 {
    totals.balance - reserved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transactions::transactions_model::{PaymentMethod, TransactionType};
    use chrono::Utc;

    fn transaction(kind: TransactionType, amount: f64) -> Transaction {
        let now = Utc::now();
        Transaction {
            id: "t".to_string(),
            user_id: "u".to_string(),
            category_id: "c".to_string(),
            transaction_type: kind,
            amount,
            description: "test".to_string(),
            date: now,
            tags: Vec::new(),
            location: None,
            notes: None,
            payment_method: PaymentMethod::Cash,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_totals_sums_income_and_expense_magnitudes() {
        let transactions = vec![
            transaction(TransactionType::Income, 5000.0),
            transaction(TransactionType::Expense, -1200.0),
            transaction(TransactionType::Expense, -300.0),
        ];

        let result = totals(&transactions);
        assert_eq!(result.total_income, 5000.0);
        assert_eq!(result.total_expense, 1500.0);
        assert_eq!(result.balance, 3500.0);
    }

    #[test]
    fn test_totals_of_empty_set_are_zero() {
        let result = totals(&[]);
        assert_eq!(result, LedgerTotals::default());
    }

    #[test]
    fn test_available_balance_subtracts_goal_reservations() {
        let transactions = vec![
            transaction(TransactionType::Income, 5000.0),
            transaction(TransactionType::Expense, -1500.0),
        ];
        let result = totals(&transactions);
        assert_eq!(available_balance(&result, 500.0), 3000.0);
    }

    #[test]
    fn test_monthly_totals_filters_by_calendar_month() {
        let now = Utc::now();
        let mut old = transaction(TransactionType::Income, 1000.0);
        old.date = now - chrono::Duration::days(60);
        let transactions = vec![old, transaction(TransactionType::Income, 250.0)];

        let result = monthly_totals(&transactions, now.month(), now.year());
        assert_eq!(result.total_income, 250.0);

        let past = now - chrono::Duration::days(60);
        let previous = monthly_totals(&transactions, past.month(), past.year());
        assert_eq!(previous.total_income, 1000.0);
    }
}
