use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::get_connection;
use crate::errors::Result;
use crate::goals::goals_model::{GoalDB, GoalStatus, NewGoalDB, UpdateGoalDB};
use crate::goals::goals_traits::GoalRepositoryTrait;
use crate::schema::goals;

pub struct GoalRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl GoalRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        GoalRepository { pool }
    }
}

impl GoalRepositoryTrait for GoalRepository {
    fn list_goals(&self, user_id: &str) -> Result<Vec<GoalDB>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(goals::table
            .filter(goals::user_id.eq(user_id))
            .order(goals::created_at.desc())
            .load::<GoalDB>(&mut conn)?)
    }

    fn list_by_status(&self, user_id: &str, status: GoalStatus) -> Result<Vec<GoalDB>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(goals::table
            .filter(goals::user_id.eq(user_id))
            .filter(goals::status.eq(status.as_str()))
            .order(goals::created_at.desc())
            .load::<GoalDB>(&mut conn)?)
    }

    fn get_goal_by_id(&self, goal_id: &str) -> Result<Option<GoalDB>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(goals::table
            .find(goal_id)
            .first::<GoalDB>(&mut conn)
            .optional()?)
    }

    fn insert_goal(&self, mut new_goal: NewGoalDB) -> Result<GoalDB> {
        let mut conn = get_connection(&self.pool)?;

        if new_goal.id.is_none() {
            new_goal.id = Some(Uuid::new_v4().to_string());
        }

        Ok(diesel::insert_into(goals::table)
            .values(&new_goal)
            .returning(goals::all_columns)
            .get_result(&mut conn)?)
    }

    fn update_goal(&self, goal_id: &str, update: UpdateGoalDB) -> Result<GoalDB> {
        let mut conn = get_connection(&self.pool)?;

        diesel::update(goals::table.find(goal_id))
            .set(&update)
            .execute(&mut conn)?;

        Ok(goals::table.find(goal_id).first::<GoalDB>(&mut conn)?)
    }

    fn delete_goal(&self, goal_id: &str) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;
        Ok(diesel::delete(goals::table.find(goal_id)).execute(&mut conn)?)
    }
}
