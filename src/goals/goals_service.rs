use chrono::Utc;
use log::{debug, info};
use std::sync::Arc;

use crate::categories::categories_traits::CategoryRepositoryTrait;
use crate::errors::{Error, Result, ValidationError};
use crate::goals::goals_model::{
    Goal, GoalContribution, GoalDB, GoalInput, GoalPatch, GoalProgress, GoalStats, GoalStatus,
    GoalWithProgress, NewGoalDB, UpdateGoalDB,
};
use crate::goals::goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
use crate::ledger;
use crate::transactions::transactions_model::Transaction;
use crate::transactions::transactions_traits::TransactionRepositoryTrait;

pub struct GoalService {
    goal_repo: Arc<dyn GoalRepositoryTrait>,
    transaction_repo: Arc<dyn TransactionRepositoryTrait>,
    category_repo: Arc<dyn CategoryRepositoryTrait>,
}

impl GoalService {
    pub fn new(
        goal_repo: Arc<dyn GoalRepositoryTrait>,
        transaction_repo: Arc<dyn TransactionRepositoryTrait>,
        category_repo: Arc<dyn CategoryRepositoryTrait>,
    ) -> Self {
        GoalService {
            goal_repo,
            transaction_repo,
            category_repo,
        }
    }

    fn get_owned_goal(&self, user_id: &str, goal_id: &str) -> Result<Goal> {
        let row = self
            .goal_repo
            .get_goal_by_id(goal_id)?
            .ok_or_else(|| Error::NotFound("Goal".to_string()))?;

        if row.user_id != user_id {
            return Err(Error::NotFound("Goal".to_string()));
        }

        Goal::try_from(row)
    }

    fn check_category(&self, user_id: &str, category_id: &str) -> Result<()> {
        let category = self
            .category_repo
            .get_category_by_id(category_id)?
            .ok_or_else(|| Error::NotFound("Category".to_string()))?;

        if category.user_id != user_id || !category.is_active {
            return Err(Error::NotFound("Category".to_string()));
        }

        Ok(())
    }

    fn available_balance(&self, user_id: &str) -> Result<f64> {
        let transactions: Vec<Transaction> = self
            .transaction_repo
            .list_active(user_id)?
            .into_iter()
            .map(Transaction::try_from)
            .collect::<Result<_>>()?;
        let goals: Vec<Goal> = self
            .goal_repo
            .list_goals(user_id)?
            .into_iter()
            .map(Goal::try_from)
            .collect::<Result<_>>()?;

        let totals = ledger::totals(&transactions);
        let reserved = ledger::reserved_in_goals(&goals);
        Ok(ledger::available_balance(&totals, reserved))
    }

    fn domain_goals(&self, rows: Vec<GoalDB>) -> Result<Vec<Goal>> {
        rows.into_iter().map(Goal::try_from).collect()
    }
}

impl GoalServiceTrait for GoalService {
    fn get_goals(&self, user_id: &str, status: Option<GoalStatus>) -> Result<Vec<Goal>> {
        let rows = match status {
            Some(status) => self.goal_repo.list_by_status(user_id, status)?,
            None => self.goal_repo.list_goals(user_id)?,
        };
        self.domain_goals(rows)
    }

    fn get_goals_with_progress(
        &self,
        user_id: &str,
        status: Option<GoalStatus>,
    ) -> Result<Vec<GoalWithProgress>> {
        let now = Utc::now();
        Ok(self
            .get_goals(user_id, status)?
            .into_iter()
            .map(|goal| {
                let progress = goal.calculate_progress(now);
                GoalWithProgress { goal, progress }
            })
            .collect())
    }

    fn get_goal(&self, user_id: &str, goal_id: &str) -> Result<Goal> {
        self.get_owned_goal(user_id, goal_id)
    }

    fn get_goal_progress(&self, user_id: &str, goal_id: &str) -> Result<GoalProgress> {
        let goal = self.get_owned_goal(user_id, goal_id)?;
        Ok(goal.calculate_progress(Utc::now()))
    }

    fn create_goal(&self, user_id: &str, input: GoalInput) -> Result<Goal> {
        let now = Utc::now();
        input.validate(now)?;

        if let Some(ref category_id) = input.category_id {
            self.check_category(user_id, category_id)?;
        }

        let milestones = Goal::default_milestones();
        let start_date = input.start_date.unwrap_or(now);

        let new_goal = NewGoalDB {
            id: None,
            user_id: user_id.to_string(),
            category_id: input.category_id,
            title: input.title.trim().to_string(),
            description: input.description,
            target_amount: input.target_amount,
            current_amount: 0.0,
            start_date: start_date.naive_utc(),
            target_date: input.target_date.naive_utc(),
            goal_type: input.goal_type.unwrap_or_default().as_str().to_string(),
            priority: input.priority.unwrap_or_default().as_str().to_string(),
            status: GoalStatus::Active.as_str().to_string(),
            is_recurring: input.is_recurring,
            recurring_amount: input.recurring_amount,
            milestones: serde_json::to_string(&milestones)?,
            created_at: now.naive_utc(),
            updated_at: now.naive_utc(),
        };

        debug!("Creating goal '{}' for user {}", new_goal.title, user_id);
        Goal::try_from(self.goal_repo.insert_goal(new_goal)?)
    }

    fn update_goal(&self, user_id: &str, goal_id: &str, patch: GoalPatch) -> Result<Goal> {
        patch.validate()?;

        let mut goal = self.get_owned_goal(user_id, goal_id)?;
        if goal.status.is_terminal() {
            return Err(Error::PreconditionFailed(format!(
                "Cannot edit a {} goal",
                goal.status
            )));
        }

        if let Some(ref category_id) = patch.category_id {
            self.check_category(user_id, category_id)?;
        }
        if let Some(target_date) = patch.target_date {
            if target_date <= goal.start_date {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Target date must be after the start date".to_string(),
                )));
            }
            goal.target_date = target_date;
        }

        let now = Utc::now();
        let mut status = None;
        let mut milestones_json = None;
        if let Some(new_target) = patch.target_amount {
            // A lower target can push the saved percentage over thresholds
            goal.target_amount = new_target;
            goal.check_milestones(now);
            milestones_json = Some(goal.milestones_json()?);

            if goal.is_completed() && goal.status == GoalStatus::Active {
                goal.status = GoalStatus::Completed;
                status = Some(GoalStatus::Completed.as_str().to_string());
            }
        }

        let update = UpdateGoalDB {
            category_id: patch.category_id.map(Some),
            title: patch.title.map(|t| t.trim().to_string()),
            description: patch.description.map(Some),
            target_amount: patch.target_amount,
            current_amount: None,
            target_date: patch.target_date.map(|d| d.naive_utc()),
            priority: patch.priority.map(|p| p.as_str().to_string()),
            status,
            milestones: milestones_json,
            updated_at: Some(now.naive_utc()),
        };

        Goal::try_from(self.goal_repo.update_goal(goal_id, update)?)
    }

    fn add_amount(&self, user_id: &str, goal_id: &str, amount: f64) -> Result<GoalContribution> {
        if amount <= 0.0 {
            return Err(Error::Validation(ValidationError::InvalidAmount(amount)));
        }

        let mut goal = self.get_owned_goal(user_id, goal_id)?;
        if goal.status != GoalStatus::Active {
            return Err(Error::PreconditionFailed(format!(
                "Amounts can only be added to active goals, this one is {}",
                goal.status
            )));
        }

        let available = self.available_balance(user_id)?;
        if amount > available {
            return Err(Error::PreconditionFailed(format!(
                "Insufficient available balance: {:.2} requested, {:.2} available",
                amount, available
            )));
        }

        let now = Utc::now();
        goal.current_amount += amount;
        let achieved_milestones = goal.check_milestones(now);

        let mut status = None;
        if goal.is_completed() {
            goal.status = GoalStatus::Completed;
            status = Some(GoalStatus::Completed.as_str().to_string());
            info!("Goal '{}' reached its target", goal.title);
        }

        let update = UpdateGoalDB {
            current_amount: Some(goal.current_amount),
            status,
            milestones: Some(goal.milestones_json()?),
            updated_at: Some(now.naive_utc()),
            ..Default::default()
        };

        let goal = Goal::try_from(self.goal_repo.update_goal(goal_id, update)?)?;
        let progress = goal.calculate_progress(now);

        Ok(GoalContribution {
            goal,
            progress,
            achieved_milestones,
        })
    }

    fn change_status(&self, user_id: &str, goal_id: &str, status: GoalStatus) -> Result<Goal> {
        let goal = self.get_owned_goal(user_id, goal_id)?;

        if !goal.status.can_transition_to(status) {
            return Err(Error::PreconditionFailed(format!(
                "Cannot change goal status from {} to {}",
                goal.status, status
            )));
        }

        let update = UpdateGoalDB {
            status: Some(status.as_str().to_string()),
            updated_at: Some(Utc::now().naive_utc()),
            ..Default::default()
        };

        Goal::try_from(self.goal_repo.update_goal(goal_id, update)?)
    }

    fn delete_goal(&self, user_id: &str, goal_id: &str) -> Result<usize> {
        self.get_owned_goal(user_id, goal_id)?;
        self.goal_repo.delete_goal(goal_id)
    }

    fn get_stats(&self, user_id: &str) -> Result<GoalStats> {
        let goals = self.domain_goals(self.goal_repo.list_goals(user_id)?)?;

        // Amount sums cover active goals only; counts span every status.
        let active: Vec<&Goal> = goals
            .iter()
            .filter(|g| g.status == GoalStatus::Active)
            .collect();
        let total_target_amount: f64 = active.iter().map(|g| g.target_amount).sum();
        let total_current_amount: f64 = active.iter().map(|g| g.current_amount).sum();
        let overall_percentage = if total_target_amount > 0.0 {
            (total_current_amount / total_target_amount * 100.0).min(100.0)
        } else {
            0.0
        };

        Ok(GoalStats {
            total_goals: goals.len() as i64,
            active_goals: active.len() as i64,
            completed_goals: goals
                .iter()
                .filter(|g| g.status == GoalStatus::Completed)
                .count() as i64,
            total_target_amount,
            total_current_amount,
            overall_percentage,
        })
    }
}
