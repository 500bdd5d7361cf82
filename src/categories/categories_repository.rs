use crate::categories::categories_model::{Category, CategoryType, NewCategory, UpdateCategory};
use crate::categories::categories_traits::CategoryRepositoryTrait;
use crate::db::get_connection;
use crate::errors::{Error, Result};
use crate::schema::{categories, transactions};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

diesel::define_sql_function! {
    fn lower(x: diesel::sql_types::Text) -> diesel::sql_types::Text;
}

pub struct CategoryRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl CategoryRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        CategoryRepository { pool }
    }
}

impl CategoryRepositoryTrait for CategoryRepository {
    fn list_categories(
        &self,
        user_id: &str,
        category_type: Option<CategoryType>,
    ) -> Result<Vec<Category>> {
        let mut conn = get_connection(&self.pool)?;
        let mut query = categories::table
            .filter(categories::user_id.eq(user_id))
            .filter(categories::is_active.eq(true))
            .into_boxed();

        if let Some(kind) = category_type {
            query = query.filter(categories::category_type.eq(kind.as_str()));
        }

        Ok(query
            .order((
                categories::category_type.asc(),
                categories::sort_order.asc(),
                categories::name.asc(),
            ))
            .load::<Category>(&mut conn)?)
    }

    fn get_category_by_id(&self, category_id: &str) -> Result<Option<Category>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(categories::table
            .find(category_id)
            .first::<Category>(&mut conn)
            .optional()?)
    }

    fn find_by_name(
        &self,
        user_id: &str,
        name: &str,
        category_type: CategoryType,
    ) -> Result<Option<Category>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(categories::table
            .filter(categories::user_id.eq(user_id))
            .filter(categories::category_type.eq(category_type.as_str()))
            .filter(categories::is_active.eq(true))
            .filter(lower(categories::name).eq(name.to_lowercase()))
            .first::<Category>(&mut conn)
            .optional()?)
    }

    fn max_sort_order(&self, user_id: &str, category_type: CategoryType) -> Result<i32> {
        use diesel::dsl::max;

        let mut conn = get_connection(&self.pool)?;
        let highest: Option<i32> = categories::table
            .filter(categories::user_id.eq(user_id))
            .filter(categories::category_type.eq(category_type.as_str()))
            .select(max(categories::sort_order))
            .first(&mut conn)?;
        Ok(highest.unwrap_or(0))
    }

    fn insert_category(&self, mut new_category: NewCategory) -> Result<Category> {
        let mut conn = get_connection(&self.pool)?;

        if new_category.id.is_none() {
            new_category.id = Some(Uuid::new_v4().to_string());
        }

        Ok(diesel::insert_into(categories::table)
            .values(&new_category)
            .returning(categories::all_columns)
            .get_result(&mut conn)?)
    }

    fn insert_categories(&self, new_categories: Vec<NewCategory>) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;

        let rows: Vec<NewCategory> = new_categories
            .into_iter()
            .map(|mut c| {
                if c.id.is_none() {
                    c.id = Some(Uuid::new_v4().to_string());
                }
                c
            })
            .collect();

        conn.transaction(|conn| {
            Ok(diesel::insert_into(categories::table)
                .values(&rows)
                .execute(conn)?)
        })
    }

    fn update_category(&self, category_id: &str, update: UpdateCategory) -> Result<Category> {
        let mut conn = get_connection(&self.pool)?;

        diesel::update(categories::table.find(category_id))
            .set(&update)
            .execute(&mut conn)?;

        Ok(categories::table
            .find(category_id)
            .first::<Category>(&mut conn)?)
    }

    fn set_default_category(&self, category_id: &str) -> Result<Category> {
        let mut conn = get_connection(&self.pool)?;

        conn.transaction(|conn| {
            let category: Category = categories::table
                .find(category_id)
                .first::<Category>(conn)
                .optional()?
                .ok_or_else(|| Error::NotFound("Category".to_string()))?;

            // Clear the previous default of the same kind before promoting this one
            diesel::update(
                categories::table
                    .filter(categories::user_id.eq(&category.user_id))
                    .filter(categories::category_type.eq(&category.category_type))
                    .filter(categories::is_default.eq(true)),
            )
            .set(categories::is_default.eq(false))
            .execute(conn)?;

            diesel::update(categories::table.find(category_id))
                .set((
                    categories::is_default.eq(true),
                    categories::updated_at.eq(chrono::Utc::now().naive_utc()),
                ))
                .execute(conn)?;

            Ok(categories::table
                .find(category_id)
                .first::<Category>(conn)?)
        })
    }

    fn soft_delete_category(&self, category_id: &str) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;
        Ok(diesel::update(categories::table.find(category_id))
            .set((
                categories::is_active.eq(false),
                categories::updated_at.eq(chrono::Utc::now().naive_utc()),
            ))
            .execute(&mut conn)?)
    }

    fn count_active_transactions(&self, category_id: &str) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        Ok(transactions::table
            .filter(transactions::category_id.eq(category_id))
            .filter(transactions::is_active.eq(true))
            .count()
            .get_result(&mut conn)?)
    }
}
