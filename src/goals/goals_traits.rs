use crate::errors::Result;
use crate::goals::goals_model::{
    Goal, GoalContribution, GoalDB, GoalInput, GoalPatch, GoalProgress, GoalStats, GoalStatus,
    GoalWithProgress, NewGoalDB, UpdateGoalDB,
};

/// Trait for goal repository operations
pub trait GoalRepositoryTrait: Send + Sync {
    fn list_goals(&self, user_id: &str) -> Result<Vec<GoalDB>>;
    fn list_by_status(&self, user_id: &str, status: GoalStatus) -> Result<Vec<GoalDB>>;
    fn get_goal_by_id(&self, goal_id: &str) -> Result<Option<GoalDB>>;
    fn insert_goal(&self, new_goal: NewGoalDB) -> Result<GoalDB>;
    fn update_goal(&self, goal_id: &str, update: UpdateGoalDB) -> Result<GoalDB>;
    fn delete_goal(&self, goal_id: &str) -> Result<usize>;
}

/// Trait for goal service operations
pub trait GoalServiceTrait: Send + Sync {
    fn get_goals(&self, user_id: &str, status: Option<GoalStatus>) -> Result<Vec<Goal>>;
    fn get_goals_with_progress(
        &self,
        user_id: &str,
        status: Option<GoalStatus>,
    ) -> Result<Vec<GoalWithProgress>>;
    fn get_goal(&self, user_id: &str, goal_id: &str) -> Result<Goal>;
    fn get_goal_progress(&self, user_id: &str, goal_id: &str) -> Result<GoalProgress>;
    fn create_goal(&self, user_id: &str, input: GoalInput) -> Result<Goal>;
    fn update_goal(&self, user_id: &str, goal_id: &str, patch: GoalPatch) -> Result<Goal>;
    fn add_amount(&self, user_id: &str, goal_id: &str, amount: f64) -> Result<GoalContribution>;
    fn change_status(&self, user_id: &str, goal_id: &str, status: GoalStatus) -> Result<Goal>;
    fn delete_goal(&self, user_id: &str, goal_id: &str) -> Result<usize>;
    fn get_stats(&self, user_id: &str) -> Result<GoalStats>;
}
