use chrono::{DateTime, Utc};

use crate::errors::Result;
use crate::ledger::LedgerTotals;
use crate::transactions::transactions_model::{
    NewTransactionDB, Transaction, TransactionDB, TransactionFilters, TransactionInput,
    TransactionPage, TransactionPatch, UpdateTransactionDB,
};

/// Trait for transaction repository operations
pub trait TransactionRepositoryTrait: Send + Sync {
    fn list_page(
        &self,
        user_id: &str,
        filters: &TransactionFilters,
    ) -> Result<(Vec<TransactionDB>, i64)>;
    fn list_matching(
        &self,
        user_id: &str,
        filters: &TransactionFilters,
    ) -> Result<Vec<TransactionDB>>;
    fn list_active(&self, user_id: &str) -> Result<Vec<TransactionDB>>;
    fn list_for_category_between(
        &self,
        user_id: &str,
        category_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<TransactionDB>>;
    fn get_transaction_by_id(&self, transaction_id: &str) -> Result<Option<TransactionDB>>;
    fn insert_transaction(&self, new_transaction: NewTransactionDB) -> Result<TransactionDB>;
    fn update_transaction(
        &self,
        transaction_id: &str,
        update: UpdateTransactionDB,
    ) -> Result<TransactionDB>;
    fn soft_delete_transaction(&self, transaction_id: &str) -> Result<usize>;
}

/// Trait for transaction service operations
pub trait TransactionServiceTrait: Send + Sync {
    fn get_transactions(
        &self,
        user_id: &str,
        filters: TransactionFilters,
    ) -> Result<TransactionPage>;
    fn get_transaction(&self, user_id: &str, transaction_id: &str) -> Result<Transaction>;
    fn create_transaction(&self, user_id: &str, input: TransactionInput) -> Result<Transaction>;
    fn update_transaction(
        &self,
        user_id: &str,
        transaction_id: &str,
        patch: TransactionPatch,
    ) -> Result<Transaction>;
    fn delete_transaction(&self, user_id: &str, transaction_id: &str) -> Result<usize>;
    fn get_summary(
        &self,
        user_id: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<LedgerTotals>;
}
