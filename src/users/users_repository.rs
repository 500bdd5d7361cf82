use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::get_connection;
use crate::errors::Result;
use crate::schema::users;
use crate::users::users_model::{NewUserDB, UpdateUserDB, UserDB};
use crate::users::users_traits::UserRepositoryTrait;

pub struct UserRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl UserRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        UserRepository { pool }
    }
}

impl UserRepositoryTrait for UserRepository {
    fn get_user_by_id(&self, user_id: &str) -> Result<Option<UserDB>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(users::table
            .find(user_id)
            .first::<UserDB>(&mut conn)
            .optional()?)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<UserDB>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(users::table
            .filter(users::email.eq(email))
            .first::<UserDB>(&mut conn)
            .optional()?)
    }

    fn insert_user(&self, mut new_user: NewUserDB) -> Result<UserDB> {
        let mut conn = get_connection(&self.pool)?;

        if new_user.id.is_none() {
            new_user.id = Some(Uuid::new_v4().to_string());
        }

        Ok(diesel::insert_into(users::table)
            .values(&new_user)
            .returning(users::all_columns)
            .get_result(&mut conn)?)
    }

    fn update_user(&self, user_id: &str, update: UpdateUserDB) -> Result<UserDB> {
        let mut conn = get_connection(&self.pool)?;

        diesel::update(users::table.find(user_id))
            .set(&update)
            .execute(&mut conn)?;

        Ok(users::table.find(user_id).first::<UserDB>(&mut conn)?)
    }
}
