use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::get_connection;
use crate::errors::Result;
use crate::schema::transactions;
use crate::transactions::transactions_model::{
    NewTransactionDB, TransactionDB, TransactionFilters, UpdateTransactionDB,
};
use crate::transactions::transactions_traits::TransactionRepositoryTrait;

pub struct TransactionRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl TransactionRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        TransactionRepository { pool }
    }

    fn filtered<'a>(
        user_id: &'a str,
        filters: &'a TransactionFilters,
    ) -> transactions::BoxedQuery<'a, diesel::sqlite::Sqlite> {
        let mut query = transactions::table
            .filter(transactions::user_id.eq(user_id))
            .filter(transactions::is_active.eq(true))
            .into_boxed();

        if let Some(ref category_id) = filters.category_id {
            query = query.filter(transactions::category_id.eq(category_id));
        }
        if let Some(kind) = filters.transaction_type {
            query = query.filter(transactions::transaction_type.eq(kind.as_str()));
        }
        if let Some(start) = filters.start_date {
            query = query.filter(transactions::date.ge(start.naive_utc()));
        }
        if let Some(end) = filters.end_date {
            query = query.filter(transactions::date.le(end.naive_utc()));
        }

        query
    }
}

impl TransactionRepositoryTrait for TransactionRepository {
    fn list_page(
        &self,
        user_id: &str,
        filters: &TransactionFilters,
    ) -> Result<(Vec<TransactionDB>, i64)> {
        let mut conn = get_connection(&self.pool)?;

        let total: i64 = Self::filtered(user_id, filters)
            .count()
            .get_result(&mut conn)?;

        let limit = filters.limit();
        let offset = (filters.page() - 1) * limit;
        let rows = Self::filtered(user_id, filters)
            .order(transactions::date.desc())
            .limit(limit)
            .offset(offset)
            .load::<TransactionDB>(&mut conn)?;

        Ok((rows, total))
    }

    fn list_matching(
        &self,
        user_id: &str,
        filters: &TransactionFilters,
    ) -> Result<Vec<TransactionDB>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(Self::filtered(user_id, filters)
            .order(transactions::date.desc())
            .load::<TransactionDB>(&mut conn)?)
    }

    fn list_active(&self, user_id: &str) -> Result<Vec<TransactionDB>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(transactions::table
            .filter(transactions::user_id.eq(user_id))
            .filter(transactions::is_active.eq(true))
            .order(transactions::date.desc())
            .load::<TransactionDB>(&mut conn)?)
    }

    fn list_for_category_between(
        &self,
        user_id: &str,
        category_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TransactionDB>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(transactions::table
            .filter(transactions::user_id.eq(user_id))
            .filter(transactions::category_id.eq(category_id))
            .filter(transactions::is_active.eq(true))
            .filter(transactions::date.ge(start.naive_utc()))
            .filter(transactions::date.le(end.naive_utc()))
            .order(transactions::date.asc())
            .load::<TransactionDB>(&mut conn)?)
    }

    fn get_transaction_by_id(&self, transaction_id: &str) -> Result<Option<TransactionDB>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(transactions::table
            .find(transaction_id)
            .first::<TransactionDB>(&mut conn)
            .optional()?)
    }

    fn insert_transaction(&self, mut new_transaction: NewTransactionDB) -> Result<TransactionDB> {
        let mut conn = get_connection(&self.pool)?;

        if new_transaction.id.is_none() {
            new_transaction.id = Some(Uuid::new_v4().to_string());
        }

        Ok(diesel::insert_into(transactions::table)
            .values(&new_transaction)
            .returning(transactions::all_columns)
            .get_result(&mut conn)?)
    }

    fn update_transaction(
        &self,
        transaction_id: &str,
        update: UpdateTransactionDB,
    ) -> Result<TransactionDB> {
        let mut conn = get_connection(&self.pool)?;

        diesel::update(transactions::table.find(transaction_id))
            .set(&update)
            .execute(&mut conn)?;

        Ok(transactions::table
            .find(transaction_id)
            .first::<TransactionDB>(&mut conn)?)
    }

    fn soft_delete_transaction(&self, transaction_id: &str) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;
        Ok(diesel::update(transactions::table.find(transaction_id))
            .set((
                transactions::is_active.eq(false),
                transactions::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(&mut conn)?)
    }
}
