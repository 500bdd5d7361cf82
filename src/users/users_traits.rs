use crate::errors::Result;
use crate::users::users_model::{ExportData, NewUserDB, UpdateUserDB, User, UserDB, UserInput, UserPatch};

/// Trait for user repository operations
pub trait UserRepositoryTrait: Send + Sync {
    fn get_user_by_id(&self, user_id: &str) -> Result<Option<UserDB>>;
    fn find_by_email(&self, email: &str) -> Result<Option<UserDB>>;
    fn insert_user(&self, new_user: NewUserDB) -> Result<UserDB>;
    fn update_user(&self, user_id: &str, update: UpdateUserDB) -> Result<UserDB>;
}

/// Trait for user service operations
pub trait UserServiceTrait: Send + Sync {
    fn create_user(&self, input: UserInput) -> Result<User>;
    fn get_user(&self, user_id: &str) -> Result<User>;
    fn update_user(&self, user_id: &str, patch: UserPatch) -> Result<User>;
    fn record_login(&self, user_id: &str) -> Result<User>;
    fn deactivate_user(&self, user_id: &str) -> Result<User>;
    fn export_data(&self, user_id: &str) -> Result<ExportData>;
}
