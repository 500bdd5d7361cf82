use crate::categories::categories_model::{
    Category, CategoryInput, CategoryPatch, CategoryType, NewCategory, UpdateCategory,
    SEED_CATEGORIES,
};
use crate::categories::categories_traits::{CategoryRepositoryTrait, CategoryServiceTrait};
use crate::errors::{Error, Result, ValidationError};
use chrono::Utc;
use log::debug;
use std::str::FromStr;
use std::sync::Arc;

pub struct CategoryService {
    category_repo: Arc<dyn CategoryRepositoryTrait>,
}

impl CategoryService {
    pub fn new(category_repo: Arc<dyn CategoryRepositoryTrait>) -> Self {
        CategoryService { category_repo }
    }

    fn get_owned_category(&self, user_id: &str, category_id: &str) -> Result<Category> {
        let category = self
            .category_repo
            .get_category_by_id(category_id)?
            .ok_or_else(|| Error::NotFound("Category".to_string()))?;

        if category.user_id != user_id || !category.is_active {
            return Err(Error::NotFound("Category".to_string()));
        }

        Ok(category)
    }

    fn ensure_name_available(
        &self,
        user_id: &str,
        name: &str,
        category_type: CategoryType,
        exclude_id: Option<&str>,
    ) -> Result<()> {
        if let Some(existing) = self.category_repo.find_by_name(user_id, name, category_type)? {
            if exclude_id != Some(existing.id.as_str()) {
                return Err(Error::Validation(ValidationError::InvalidInput(format!(
                    "A {} category named '{}' already exists",
                    category_type, name
                ))));
            }
        }
        Ok(())
    }
}

impl CategoryServiceTrait for CategoryService {
    fn get_categories(
        &self,
        user_id: &str,
        category_type: Option<CategoryType>,
    ) -> Result<Vec<Category>> {
        self.category_repo.list_categories(user_id, category_type)
    }

    fn get_category(&self, user_id: &str, category_id: &str) -> Result<Category> {
        self.get_owned_category(user_id, category_id)
    }

    fn create_category(&self, user_id: &str, input: CategoryInput) -> Result<Category> {
        input.validate()?;

        let name = input.name.trim().to_string();
        self.ensure_name_available(user_id, &name, input.category_type, None)?;

        let sort_order = self.category_repo.max_sort_order(user_id, input.category_type)? + 1;
        let now = Utc::now().naive_utc();

        let new_category = NewCategory {
            id: None,
            user_id: user_id.to_string(),
            name,
            category_type: input.category_type.as_str().to_string(),
            icon: input.icon_or_default(),
            color: input.color_or_default(),
            is_default: false,
            is_active: true,
            sort_order,
            created_at: now,
            updated_at: now,
        };

        debug!(
            "Creating {} category '{}' for user {}",
            input.category_type, new_category.name, user_id
        );
        self.category_repo.insert_category(new_category)
    }

    fn update_category(
        &self,
        user_id: &str,
        category_id: &str,
        patch: CategoryPatch,
    ) -> Result<Category> {
        patch.validate()?;

        let category = self.get_owned_category(user_id, category_id)?;
        let category_type = CategoryType::from_str(&category.category_type)
            .map_err(ValidationError::InvalidInput)?;

        let name = patch.name.as_ref().map(|n| n.trim().to_string());
        if let Some(ref new_name) = name {
            if !new_name.eq_ignore_ascii_case(&category.name) {
                self.ensure_name_available(user_id, new_name, category_type, Some(category_id))?;
            }
        }

        let update = UpdateCategory {
            name,
            icon: patch.icon,
            color: patch.color,
            sort_order: patch.sort_order,
            updated_at: Utc::now().naive_utc(),
        };

        self.category_repo.update_category(category_id, update)
    }

    fn set_default_category(&self, user_id: &str, category_id: &str) -> Result<Category> {
        self.get_owned_category(user_id, category_id)?;
        self.category_repo.set_default_category(category_id)
    }

    fn delete_category(&self, user_id: &str, category_id: &str) -> Result<usize> {
        let category = self.get_owned_category(user_id, category_id)?;

        if category.is_default {
            return Err(Error::PreconditionFailed(
                "Default categories cannot be deleted".to_string(),
            ));
        }

        let in_use = self.category_repo.count_active_transactions(category_id)?;
        if in_use > 0 {
            return Err(Error::PreconditionFailed(format!(
                "Cannot delete category: {} transactions are assigned to it",
                in_use
            )));
        }

        self.category_repo.soft_delete_category(category_id)
    }

    fn seed_default_categories(&self, user_id: &str) -> Result<usize> {
        let now = Utc::now().naive_utc();

        let mut income_order = 0;
        let mut expense_order = 0;
        let rows: Vec<NewCategory> = SEED_CATEGORIES
            .iter()
            .map(|seed| {
                let sort_order = match seed.category_type {
                    CategoryType::Income => {
                        income_order += 1;
                        income_order
                    }
                    CategoryType::Expense => {
                        expense_order += 1;
                        expense_order
                    }
                };
                NewCategory {
                    id: None,
                    user_id: user_id.to_string(),
                    name: seed.name.to_string(),
                    category_type: seed.category_type.as_str().to_string(),
                    icon: seed.icon.to_string(),
                    color: seed.color.to_string(),
                    is_default: seed.is_default,
                    is_active: true,
                    sort_order,
                    created_at: now,
                    updated_at: now,
                }
            })
            .collect();

        debug!("Seeding {} stock categories for user {}", rows.len(), user_id);
        self.category_repo.insert_categories(rows)
    }
}
