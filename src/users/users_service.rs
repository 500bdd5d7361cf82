use chrono::Utc;
use log::info;
use std::collections::HashMap;
use std::sync::Arc;

use crate::budgets::budgets_traits::BudgetRepositoryTrait;
use crate::categories::categories_traits::CategoryServiceTrait;
use crate::errors::{Error, Result, ValidationError};
use crate::goals::goals_model::Goal;
use crate::goals::goals_traits::GoalRepositoryTrait;
use crate::transactions::transactions_model::Transaction;
use crate::transactions::transactions_traits::TransactionRepositoryTrait;
use crate::users::users_model::{
    ExportData, NewUserDB, NotificationSettings, Preferences, UpdateUserDB, User, UserInput,
    UserPatch,
};
use crate::users::users_traits::{UserRepositoryTrait, UserServiceTrait};

pub struct UserService {
    user_repo: Arc<dyn UserRepositoryTrait>,
    category_service: Arc<dyn CategoryServiceTrait>,
    transaction_repo: Arc<dyn TransactionRepositoryTrait>,
    budget_repo: Arc<dyn BudgetRepositoryTrait>,
    goal_repo: Arc<dyn GoalRepositoryTrait>,
}

impl UserService {
    pub fn new(
        user_repo: Arc<dyn UserRepositoryTrait>,
        category_service: Arc<dyn CategoryServiceTrait>,
        transaction_repo: Arc<dyn TransactionRepositoryTrait>,
        budget_repo: Arc<dyn BudgetRepositoryTrait>,
        goal_repo: Arc<dyn GoalRepositoryTrait>,
    ) -> Self {
        UserService {
            user_repo,
            category_service,
            transaction_repo,
            budget_repo,
            goal_repo,
        }
    }

    fn get_active_user(&self, user_id: &str) -> Result<User> {
        let row = self
            .user_repo
            .get_user_by_id(user_id)?
            .ok_or_else(|| Error::NotFound("User".to_string()))?;

        if !row.is_active {
            return Err(Error::NotFound("User".to_string()));
        }

        User::try_from(row)
    }
}

impl UserServiceTrait for UserService {
    fn create_user(&self, input: UserInput) -> Result<User> {
        input.validate()?;

        let email = input.normalized_email();
        if self.user_repo.find_by_email(&email)?.is_some() {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "A user with email '{}' already exists",
                email
            ))));
        }

        let now = Utc::now().naive_utc();
        let new_user = NewUserDB {
            id: None,
            name: input.name.trim().to_string(),
            email,
            preferences: serde_json::to_string(&Preferences::default())?,
            custom_labels: serde_json::to_string(&HashMap::<String, String>::new())?,
            notifications: serde_json::to_string(&NotificationSettings::default())?,
            is_active: true,
            last_login: None,
            created_at: now,
            updated_at: now,
        };

        let user = User::try_from(self.user_repo.insert_user(new_user)?)?;
        let seeded = self.category_service.seed_default_categories(&user.id)?;
        info!("Created user {} with {} stock categories", user.id, seeded);

        Ok(user)
    }

    fn get_user(&self, user_id: &str) -> Result<User> {
        self.get_active_user(user_id)
    }

    fn update_user(&self, user_id: &str, patch: UserPatch) -> Result<User> {
        patch.validate()?;
        self.get_active_user(user_id)?;

        let preferences = match patch.preferences {
            Some(ref p) => Some(serde_json::to_string(p)?),
            None => None,
        };
        let custom_labels = match patch.custom_labels {
            Some(ref l) => Some(serde_json::to_string(l)?),
            None => None,
        };
        let notifications = match patch.notifications {
            Some(ref n) => Some(serde_json::to_string(n)?),
            None => None,
        };

        let update = UpdateUserDB {
            name: patch.name.map(|n| n.trim().to_string()),
            preferences,
            custom_labels,
            notifications,
            updated_at: Some(Utc::now().naive_utc()),
            ..Default::default()
        };

        User::try_from(self.user_repo.update_user(user_id, update)?)
    }

    fn record_login(&self, user_id: &str) -> Result<User> {
        self.get_active_user(user_id)?;

        let now = Utc::now().naive_utc();
        let update = UpdateUserDB {
            last_login: Some(now),
            updated_at: Some(now),
            ..Default::default()
        };

        User::try_from(self.user_repo.update_user(user_id, update)?)
    }

    fn deactivate_user(&self, user_id: &str) -> Result<User> {
        self.get_active_user(user_id)?;

        let update = UpdateUserDB {
            is_active: Some(false),
            updated_at: Some(Utc::now().naive_utc()),
            ..Default::default()
        };

        User::try_from(self.user_repo.update_user(user_id, update)?)
    }

    fn export_data(&self, user_id: &str) -> Result<ExportData> {
        let user = self.get_active_user(user_id)?;

        let categories = self.category_service.get_categories(user_id, None)?;
        let transactions: Vec<Transaction> = self
            .transaction_repo
            .list_active(user_id)?
            .into_iter()
            .map(Transaction::try_from)
            .collect::<Result<_>>()?;
        let budgets = self.budget_repo.list_budgets(user_id)?;
        let goals: Vec<Goal> = self
            .goal_repo
            .list_goals(user_id)?
            .into_iter()
            .map(Goal::try_from)
            .collect::<Result<_>>()?;

        Ok(ExportData {
            user,
            categories,
            transactions,
            budgets,
            goals,
            exported_at: Utc::now(),
        })
    }
}
