use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::budgets::budgets_model::{Budget, NewBudget, UpdateBudget};
use crate::budgets::budgets_traits::BudgetRepositoryTrait;
use crate::db::get_connection;
use crate::errors::Result;
use crate::schema::budgets;

pub struct BudgetRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl BudgetRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        BudgetRepository { pool }
    }
}

impl BudgetRepositoryTrait for BudgetRepository {
    fn list_budgets(&self, user_id: &str) -> Result<Vec<Budget>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(budgets::table
            .filter(budgets::user_id.eq(user_id))
            .order(budgets::start_date.desc())
            .load::<Budget>(&mut conn)?)
    }

    fn get_budget_by_id(&self, budget_id: &str) -> Result<Option<Budget>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(budgets::table
            .find(budget_id)
            .first::<Budget>(&mut conn)
            .optional()?)
    }

    fn find_overlapping(
        &self,
        user_id: &str,
        category_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Option<Budget>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(budgets::table
            .filter(budgets::user_id.eq(user_id))
            .filter(budgets::category_id.eq(category_id))
            .filter(budgets::start_date.le(end.naive_utc()))
            .filter(budgets::end_date.ge(start.naive_utc()))
            .first::<Budget>(&mut conn)
            .optional()?)
    }

    fn insert_budget(&self, mut new_budget: NewBudget) -> Result<Budget> {
        let mut conn = get_connection(&self.pool)?;

        if new_budget.id.is_none() {
            new_budget.id = Some(Uuid::new_v4().to_string());
        }

        Ok(diesel::insert_into(budgets::table)
            .values(&new_budget)
            .returning(budgets::all_columns)
            .get_result(&mut conn)?)
    }

    fn update_budget(&self, budget_id: &str, update: UpdateBudget) -> Result<Budget> {
        let mut conn = get_connection(&self.pool)?;

        diesel::update(budgets::table.find(budget_id))
            .set(&update)
            .execute(&mut conn)?;

        Ok(budgets::table.find(budget_id).first::<Budget>(&mut conn)?)
    }

    fn delete_budget(&self, budget_id: &str) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;
        Ok(diesel::delete(budgets::table.find(budget_id)).execute(&mut conn)?)
    }
}
