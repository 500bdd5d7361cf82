use chrono::{DateTime, Utc};
use log::debug;
use std::str::FromStr;
use std::sync::Arc;

use crate::categories::categories_traits::CategoryRepositoryTrait;
use crate::errors::{Error, Result, ValidationError};
use crate::goals::goals_model::Goal;
use crate::goals::goals_traits::GoalRepositoryTrait;
use crate::ledger::{self, LedgerTotals};
use crate::transactions::transactions_model::{
    NewTransactionDB, Pagination, Transaction, TransactionDB, TransactionFilters,
    TransactionInput, TransactionPage, TransactionPatch, TransactionType, UpdateTransactionDB,
};
use crate::transactions::transactions_traits::{
    TransactionRepositoryTrait, TransactionServiceTrait,
};

pub struct TransactionService {
    transaction_repo: Arc<dyn TransactionRepositoryTrait>,
    category_repo: Arc<dyn CategoryRepositoryTrait>,
    goal_repo: Arc<dyn GoalRepositoryTrait>,
}

impl TransactionService {
    pub fn new(
        transaction_repo: Arc<dyn TransactionRepositoryTrait>,
        category_repo: Arc<dyn CategoryRepositoryTrait>,
        goal_repo: Arc<dyn GoalRepositoryTrait>,
    ) -> Self {
        TransactionService {
            transaction_repo,
            category_repo,
            goal_repo,
        }
    }

    fn get_owned_transaction(&self, user_id: &str, transaction_id: &str) -> Result<TransactionDB> {
        let row = self
            .transaction_repo
            .get_transaction_by_id(transaction_id)?
            .ok_or_else(|| Error::NotFound("Transaction".to_string()))?;

        if row.user_id != user_id || !row.is_active {
            return Err(Error::NotFound("Transaction".to_string()));
        }

        Ok(row)
    }

    fn check_category(&self, user_id: &str, category_id: &str, kind: TransactionType) -> Result<()> {
        let category = self
            .category_repo
            .get_category_by_id(category_id)?
            .ok_or_else(|| Error::NotFound("Category".to_string()))?;

        if category.user_id != user_id || !category.is_active {
            return Err(Error::NotFound("Category".to_string()));
        }
        if category.category_type != kind.as_str() {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Category '{}' is a {} category, not {}",
                category.name, category.category_type, kind
            ))));
        }

        Ok(())
    }

    fn available_balance(&self, user_id: &str) -> Result<f64> {
        let transactions = self.domain_transactions(self.transaction_repo.list_active(user_id)?)?;
        let goals: Vec<Goal> = self
            .goal_repo
            .list_goals(user_id)?
            .into_iter()
            .map(Goal::try_from)
            .collect::<Result<_>>()?;

        let totals = ledger::totals(&transactions);
        let reserved = ledger::reserved_in_goals(&goals);
        Ok(ledger::available_balance(&totals, reserved))
    }

    fn ensure_can_spend(&self, user_id: &str, magnitude: f64) -> Result<()> {
        let available = self.available_balance(user_id)?;
        if magnitude > available {
            return Err(Error::PreconditionFailed(format!(
                "Insufficient available balance: {:.2} requested, {:.2} available",
                magnitude, available
            )));
        }
        Ok(())
    }

    fn domain_transactions(&self, rows: Vec<TransactionDB>) -> Result<Vec<Transaction>> {
        rows.into_iter().map(Transaction::try_from).collect()
    }
}

impl TransactionServiceTrait for TransactionService {
    fn get_transactions(
        &self,
        user_id: &str,
        filters: TransactionFilters,
    ) -> Result<TransactionPage> {
        let (rows, total) = self.transaction_repo.list_page(user_id, &filters)?;
        let page_transactions = self.domain_transactions(rows)?;

        let matching = self.domain_transactions(self.transaction_repo.list_matching(user_id, &filters)?)?;
        let summary = ledger::totals(&matching);

        let limit = filters.limit();
        let pages = if total == 0 { 0 } else { (total + limit - 1) / limit };

        Ok(TransactionPage {
            transactions: page_transactions,
            pagination: Pagination {
                current: filters.page(),
                pages,
                total,
                limit,
            },
            summary,
        })
    }

    fn get_transaction(&self, user_id: &str, transaction_id: &str) -> Result<Transaction> {
        Transaction::try_from(self.get_owned_transaction(user_id, transaction_id)?)
    }

    fn create_transaction(&self, user_id: &str, input: TransactionInput) -> Result<Transaction> {
        let now = Utc::now();
        input.validate(now)?;
        self.check_category(user_id, &input.category_id, input.transaction_type)?;

        let amount = input.transaction_type.signed_amount(input.amount);
        if input.transaction_type == TransactionType::Expense {
            self.ensure_can_spend(user_id, amount.abs())?;
        }

        let tags = match input.tags {
            Some(ref tags) if !tags.is_empty() => Some(serde_json::to_string(tags)?),
            _ => None,
        };

        let new_transaction = NewTransactionDB {
            id: None,
            user_id: user_id.to_string(),
            category_id: input.category_id,
            transaction_type: input.transaction_type.as_str().to_string(),
            amount,
            description: input.description.trim().to_string(),
            date: input.date.naive_utc(),
            tags,
            location: input.location,
            notes: input.notes,
            payment_method: input.payment_method.unwrap_or_default().as_str().to_string(),
            is_active: true,
            created_at: now.naive_utc(),
            updated_at: now.naive_utc(),
        };

        debug!(
            "Recording {} of {:.2} for user {}",
            input.transaction_type, amount, user_id
        );
        Transaction::try_from(self.transaction_repo.insert_transaction(new_transaction)?)
    }

    fn update_transaction(
        &self,
        user_id: &str,
        transaction_id: &str,
        patch: TransactionPatch,
    ) -> Result<Transaction> {
        let now = Utc::now();
        patch.validate(now)?;

        let existing = self.get_owned_transaction(user_id, transaction_id)?;
        let old_kind = TransactionType::from_str(&existing.transaction_type)
            .map_err(ValidationError::InvalidInput)?;
        let kind = patch.transaction_type.unwrap_or(old_kind);

        if patch.category_id.is_some() || kind != old_kind {
            let category_id = patch.category_id.as_deref().unwrap_or(&existing.category_id);
            self.check_category(user_id, category_id, kind)?;
        }

        // The sign is always re-derived from the effective type
        let magnitude = patch.amount.unwrap_or(existing.amount.abs());
        let amount = if patch.amount.is_some() || kind != old_kind {
            Some(kind.signed_amount(magnitude))
        } else {
            None
        };

        // Spending more than before must still fit the available balance
        let old_spend = if old_kind == TransactionType::Expense {
            existing.amount.abs()
        } else {
            0.0
        };
        let new_spend = if kind == TransactionType::Expense {
            magnitude
        } else {
            0.0
        };
        if new_spend > old_spend {
            self.ensure_can_spend(user_id, new_spend - old_spend)?;
        }

        let tags = match patch.tags {
            Some(ref tags) if !tags.is_empty() => Some(Some(serde_json::to_string(tags)?)),
            Some(_) => Some(None),
            None => None,
        };

        let update = UpdateTransactionDB {
            category_id: patch.category_id,
            transaction_type: (kind != old_kind).then(|| kind.as_str().to_string()),
            amount,
            description: patch.description.map(|d| d.trim().to_string()),
            date: patch.date.map(|d| d.naive_utc()),
            tags,
            location: patch.location.map(Some),
            notes: patch.notes.map(Some),
            payment_method: patch.payment_method.map(|m| m.as_str().to_string()),
            updated_at: Some(now.naive_utc()),
        };

        Transaction::try_from(self.transaction_repo.update_transaction(transaction_id, update)?)
    }

    fn delete_transaction(&self, user_id: &str, transaction_id: &str) -> Result<usize> {
        self.get_owned_transaction(user_id, transaction_id)?;
        self.transaction_repo.soft_delete_transaction(transaction_id)
    }

    fn get_summary(
        &self,
        user_id: &str,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<LedgerTotals> {
        let filters = TransactionFilters {
            start_date: start,
            end_date: end,
            ..Default::default()
        };
        let rows = self.transaction_repo.list_matching(user_id, &filters)?;
        Ok(ledger::totals(&self.domain_transactions(rows)?))
    }
}
