use chrono::Utc;
use log::debug;
use std::sync::Arc;

use crate::budgets::budgets_model::{
    Budget, BudgetInput, BudgetPatch, BudgetWithProgress, NewBudget, UpdateBudget,
};
use crate::budgets::budgets_traits::{BudgetRepositoryTrait, BudgetServiceTrait};
use crate::categories::categories_model::CategoryType;
use crate::categories::categories_traits::CategoryRepositoryTrait;
use crate::errors::{Error, Result, ValidationError};
use crate::transactions::transactions_model::Transaction;
use crate::transactions::transactions_traits::TransactionRepositoryTrait;

pub struct BudgetService {
    budget_repo: Arc<dyn BudgetRepositoryTrait>,
    category_repo: Arc<dyn CategoryRepositoryTrait>,
    transaction_repo: Arc<dyn TransactionRepositoryTrait>,
}

impl BudgetService {
    pub fn new(
        budget_repo: Arc<dyn BudgetRepositoryTrait>,
        category_repo: Arc<dyn CategoryRepositoryTrait>,
        transaction_repo: Arc<dyn TransactionRepositoryTrait>,
    ) -> Self {
        BudgetService {
            budget_repo,
            category_repo,
            transaction_repo,
        }
    }

    fn get_owned_budget(&self, user_id: &str, budget_id: &str) -> Result<Budget> {
        let budget = self
            .budget_repo
            .get_budget_by_id(budget_id)?
            .ok_or_else(|| Error::NotFound("Budget".to_string()))?;

        if budget.user_id != user_id {
            return Err(Error::NotFound("Budget".to_string()));
        }

        Ok(budget)
    }

    fn check_expense_category(&self, user_id: &str, category_id: &str) -> Result<()> {
        let category = self
            .category_repo
            .get_category_by_id(category_id)?
            .ok_or_else(|| Error::NotFound("Category".to_string()))?;

        if category.user_id != user_id || !category.is_active {
            return Err(Error::NotFound("Category".to_string()));
        }
        if category.category_type != CategoryType::Expense.as_str() {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Budgets only apply to expense categories, '{}' is an income category",
                category.name
            ))));
        }

        Ok(())
    }

    fn with_progress(&self, budget: Budget) -> Result<BudgetWithProgress> {
        let (start, end) = budget.window();
        let expenses: Vec<Transaction> = self
            .transaction_repo
            .list_for_category_between(&budget.user_id, &budget.category_id, start, end)?
            .into_iter()
            .map(Transaction::try_from)
            .collect::<Result<_>>()?;

        let progress = budget.calculate_progress(&expenses);
        Ok(BudgetWithProgress { budget, progress })
    }
}

impl BudgetServiceTrait for BudgetService {
    fn get_budgets(&self, user_id: &str) -> Result<Vec<BudgetWithProgress>> {
        self.budget_repo
            .list_budgets(user_id)?
            .into_iter()
            .map(|b| self.with_progress(b))
            .collect()
    }

    fn get_budget(&self, user_id: &str, budget_id: &str) -> Result<BudgetWithProgress> {
        let budget = self.get_owned_budget(user_id, budget_id)?;
        self.with_progress(budget)
    }

    fn create_budget(&self, user_id: &str, input: BudgetInput) -> Result<BudgetWithProgress> {
        input.validate()?;
        self.check_expense_category(user_id, &input.category_id)?;

        let now = Utc::now();
        let period = input.period.unwrap_or_default();
        let start_date = input.start_date.unwrap_or(now);
        let end_date = input
            .end_date
            .unwrap_or_else(|| period.end_date_from(start_date));

        if let Some(existing) =
            self.budget_repo
                .find_overlapping(user_id, &input.category_id, start_date, end_date)?
        {
            return Err(Error::PreconditionFailed(format!(
                "A budget for this category already covers {} to {}",
                existing.start_date.date(),
                existing.end_date.date()
            )));
        }

        let new_budget = NewBudget {
            id: None,
            user_id: user_id.to_string(),
            category_id: input.category_id.clone(),
            amount: input.amount,
            period: period.as_str().to_string(),
            start_date: start_date.naive_utc(),
            end_date: end_date.naive_utc(),
            alert_threshold: input.alert_threshold_or_default(),
            notify_email: input.notify_email,
            notify_push: input.notify_push,
            created_at: now.naive_utc(),
            updated_at: now.naive_utc(),
        };

        debug!(
            "Creating {} budget of {:.2} for user {}",
            period, input.amount, user_id
        );
        let budget = self.budget_repo.insert_budget(new_budget)?;
        self.with_progress(budget)
    }

    fn update_budget(
        &self,
        user_id: &str,
        budget_id: &str,
        patch: BudgetPatch,
    ) -> Result<BudgetWithProgress> {
        patch.validate()?;
        self.get_owned_budget(user_id, budget_id)?;

        let update = UpdateBudget {
            amount: patch.amount,
            alert_threshold: patch.alert_threshold,
            notify_email: patch.notify_email,
            notify_push: patch.notify_push,
            updated_at: Utc::now().naive_utc(),
        };

        let budget = self.budget_repo.update_budget(budget_id, update)?;
        self.with_progress(budget)
    }

    fn delete_budget(&self, user_id: &str, budget_id: &str) -> Result<usize> {
        self.get_owned_budget(user_id, budget_id)?;
        self.budget_repo.delete_budget(budget_id)
    }
}
