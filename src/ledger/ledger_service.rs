use chrono::{Datelike, Utc};
use std::sync::Arc;

use crate::errors::Result;
use crate::goals::goals_model::Goal;
use crate::goals::goals_traits::GoalRepositoryTrait;
use crate::ledger::ledger_model::{
    available_balance, monthly_totals, reserved_in_goals, totals, AccountOverview, LedgerTotals,
};
use crate::transactions::transactions_model::Transaction;
use crate::transactions::transactions_traits::TransactionRepositoryTrait;

/// Trait for ledger service operations
pub trait LedgerServiceTrait: Send + Sync {
    fn get_totals(&self, user_id: &str) -> Result<LedgerTotals>;
    fn get_monthly_totals(&self, user_id: &str, month: u32, year: i32) -> Result<LedgerTotals>;
    fn get_available_balance(&self, user_id: &str) -> Result<f64>;
    fn get_overview(&self, user_id: &str) -> Result<AccountOverview>;
}

pub struct LedgerService {
    transaction_repo: Arc<dyn TransactionRepositoryTrait>,
    goal_repo: Arc<dyn GoalRepositoryTrait>,
}

impl LedgerService {
    pub fn new(
        transaction_repo: Arc<dyn TransactionRepositoryTrait>,
        goal_repo: Arc<dyn GoalRepositoryTrait>,
    ) -> Self {
        LedgerService {
            transaction_repo,
            goal_repo,
        }
    }

    fn load_transactions(&self, user_id: &str) -> Result<Vec<Transaction>> {
        self.transaction_repo
            .list_active(user_id)?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }

    fn load_goals(&self, user_id: &str) -> Result<Vec<Goal>> {
        self.goal_repo
            .list_goals(user_id)?
            .into_iter()
            .map(Goal::try_from)
            .collect()
    }
}

impl LedgerServiceTrait for LedgerService {
    fn get_totals(&self, user_id: &str) -> Result<LedgerTotals> {
        Ok(totals(&self.load_transactions(user_id)?))
    }

    fn get_monthly_totals(&self, user_id: &str, month: u32, year: i32) -> Result<LedgerTotals> {
        Ok(monthly_totals(
            &self.load_transactions(user_id)?,
            month,
            year,
        ))
    }

    fn get_available_balance(&self, user_id: &str) -> Result<f64> {
        let all_totals = totals(&self.load_transactions(user_id)?);
        let reserved = reserved_in_goals(&self.load_goals(user_id)?);
        Ok(available_balance(&all_totals, reserved))
    }

    fn get_overview(&self, user_id: &str) -> Result<AccountOverview> {
        let transactions = self.load_transactions(user_id)?;
        let goals = self.load_goals(user_id)?;

        let all = totals(&transactions);
        let now = Utc::now();
        let month = monthly_totals(&transactions, now.month(), now.year());
        let reserved = reserved_in_goals(&goals);

        Ok(AccountOverview {
            total_income: all.total_income,
            total_expense: all.total_expense,
            available_balance: available_balance(&all, reserved),
            reserved_in_goals: reserved,
            balance: all.balance,
            monthly_income: month.total_income,
            monthly_expense: month.total_expense,
            monthly_balance: month.balance,
        })
    }
}
