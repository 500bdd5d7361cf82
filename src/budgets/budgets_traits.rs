use chrono::{DateTime, Utc};

use crate::budgets::budgets_model::{
    Budget, BudgetInput, BudgetPatch, BudgetWithProgress, NewBudget, UpdateBudget,
};
use crate::errors::Result;

/// Trait for budget repository operations
pub trait BudgetRepositoryTrait: Send + Sync {
    fn list_budgets(&self, user_id: &str) -> Result<Vec<Budget>>;
    fn get_budget_by_id(&self, budget_id: &str) -> Result<Option<Budget>>;
    fn find_overlapping(
        &self,
        user_id: &str,
        category_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Option<Budget>>;
    fn insert_budget(&self, new_budget: NewBudget) -> Result<Budget>;
    fn update_budget(&self, budget_id: &str, update: UpdateBudget) -> Result<Budget>;
    fn delete_budget(&self, budget_id: &str) -> Result<usize>;
}

/// Trait for budget service operations
pub trait BudgetServiceTrait: Send + Sync {
    fn get_budgets(&self, user_id: &str) -> Result<Vec<BudgetWithProgress>>;
    fn get_budget(&self, user_id: &str, budget_id: &str) -> Result<BudgetWithProgress>;
    fn create_budget(&self, user_id: &str, input: BudgetInput) -> Result<BudgetWithProgress>;
    fn update_budget(
        &self,
        user_id: &str,
        budget_id: &str,
        patch: BudgetPatch,
    ) -> Result<BudgetWithProgress>;
    fn delete_budget(&self, user_id: &str, budget_id: &str) -> Result<usize>;
}
