use crate::categories::categories_model::{
    Category, CategoryInput, CategoryPatch, CategoryType, NewCategory, UpdateCategory,
};
use crate::errors::Result;

/// Trait for category repository operations
pub trait CategoryRepositoryTrait: Send + Sync {
    fn list_categories(
        &self,
        user_id: &str,
        category_type: Option<CategoryType>,
    ) -> Result<Vec<Category>>;
    fn get_category_by_id(&self, category_id: &str) -> Result<Option<Category>>;
    fn find_by_name(
        &self,
        user_id: &str,
        name: &str,
        category_type: CategoryType,
    ) -> Result<Option<Category>>;
    fn max_sort_order(&self, user_id: &str, category_type: CategoryType) -> Result<i32>;
    fn insert_category(&self, new_category: NewCategory) -> Result<Category>;
    fn insert_categories(&self, new_categories: Vec<NewCategory>) -> Result<usize>;
    fn update_category(&self, category_id: &str, update: UpdateCategory) -> Result<Category>;
    fn set_default_category(&self, category_id: &str) -> Result<Category>;
    fn soft_delete_category(&self, category_id: &str) -> Result<usize>;
    fn count_active_transactions(&self, category_id: &str) -> Result<i64>;
}

/// Trait for category service operations
pub trait CategoryServiceTrait: Send + Sync {
    fn get_categories(
        &self,
        user_id: &str,
        category_type: Option<CategoryType>,
    ) -> Result<Vec<Category>>;
    fn get_category(&self, user_id: &str, category_id: &str) -> Result<Category>;
    fn create_category(&self, user_id: &str, input: CategoryInput) -> Result<Category>;
    fn update_category(
        &self,
        user_id: &str,
        category_id: &str,
        patch: CategoryPatch,
    ) -> Result<Category>;
    fn set_default_category(&self, user_id: &str, category_id: &str) -> Result<Category>;
    fn delete_category(&self, user_id: &str, category_id: &str) -> Result<usize>;
    fn seed_default_categories(&self, user_id: &str) -> Result<usize>;
}
