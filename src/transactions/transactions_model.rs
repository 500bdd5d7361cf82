use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{MAX_DESCRIPTION_LEN, MAX_NOTES_LEN, MIN_TRANSACTION_AMOUNT};
use crate::errors::{Error, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// Expenses are stored negative, income positive, regardless of the
    /// sign the caller supplied.
    pub fn signed_amount(&self, magnitude: f64) -> f64 {
        match self {
            TransactionType::Income => magnitude.abs(),
            TransactionType::Expense => -magnitude.abs(),
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Cash,
    CreditCard,
    DebitCard,
    Pix,
    BankTransfer,
    Other,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::CreditCard => "credit_card",
            PaymentMethod::DebitCard => "debit_card",
            PaymentMethod::Pix => "pix",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Other => "other",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(PaymentMethod::Cash),
            "credit_card" => Ok(PaymentMethod::CreditCard),
            "debit_card" => Ok(PaymentMethod::DebitCard),
            "pix" => Ok(PaymentMethod::Pix),
            "bank_transfer" => Ok(PaymentMethod::BankTransfer),
            "other" => Ok(PaymentMethod::Other),
            _ => Err(format!("Unknown payment method: {}", s)),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Database model for transactions
#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub id: String,
    pub user_id: String,
    pub category_id: String,
    pub transaction_type: String,
    pub amount: f64,
    pub description: String,
    pub date: NaiveDateTime,
    pub tags: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub payment_method: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Domain model for transactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub category_id: String,
    pub transaction_type: TransactionType,
    /// Signed amount: positive for income, negative for expense
    pub amount: f64,
    pub description: String,
    pub date: DateTime<Utc>,
    pub tags: Vec<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub payment_method: PaymentMethod,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    pub fn magnitude(&self) -> f64 {
        self.amount.abs()
    }

    pub fn is_income(&self) -> bool {
        self.transaction_type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.transaction_type == TransactionType::Expense
    }
}

impl TryFrom<TransactionDB> for Transaction {
    type Error = Error;

    fn try_from(db: TransactionDB) -> Result<Self, Self::Error> {
        let transaction_type = TransactionType::from_str(&db.transaction_type)
            .map_err(ValidationError::InvalidInput)?;
        let payment_method =
            PaymentMethod::from_str(&db.payment_method).map_err(ValidationError::InvalidInput)?;
        let tags: Vec<String> = match db.tags {
            Some(ref raw) => serde_json::from_str(raw)?,
            None => Vec::new(),
        };

        Ok(Transaction {
            id: db.id,
            user_id: db.user_id,
            category_id: db.category_id,
            transaction_type,
            amount: db.amount,
            description: db.description,
            date: Utc.from_utc_datetime(&db.date),
            tags,
            location: db.location,
            notes: db.notes,
            payment_method,
            is_active: db.is_active,
            created_at: Utc.from_utc_datetime(&db.created_at),
            updated_at: Utc.from_utc_datetime(&db.updated_at),
        })
    }
}

/// Model for inserting a new transaction row
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
pub struct NewTransactionDB {
    pub id: Option<String>,
    pub user_id: String,
    pub category_id: String,
    pub transaction_type: String,
    pub amount: f64,
    pub description: String,
    pub date: NaiveDateTime,
    pub tags: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub payment_method: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Model for updating a transaction
#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = crate::schema::transactions)]
pub struct UpdateTransactionDB {
    pub category_id: Option<String>,
    pub transaction_type: Option<String>,
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub date: Option<NaiveDateTime>,
    pub tags: Option<Option<String>>,
    pub location: Option<Option<String>>,
    pub notes: Option<Option<String>>,
    pub payment_method: Option<String>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Client input for recording a transaction
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TransactionInput {
    pub category_id: String,
    pub transaction_type: TransactionType,
    /// Positive magnitude; the stored sign is derived from the type
    pub amount: f64,
    pub description: String,
    pub date: DateTime<Utc>,
    pub tags: Option<Vec<String>>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub payment_method: Option<PaymentMethod>,
}

impl TransactionInput {
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), ValidationError> {
        if self.amount < MIN_TRANSACTION_AMOUNT {
            return Err(ValidationError::InvalidAmount(self.amount));
        }
        validate_description(&self.description)?;
        validate_notes(self.notes.as_deref())?;
        if self.date > now {
            return Err(ValidationError::InvalidInput(
                "Transaction date cannot be in the future".to_string(),
            ));
        }
        Ok(())
    }
}

/// Client input for amending a transaction
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPatch {
    pub category_id: Option<String>,
    pub transaction_type: Option<TransactionType>,
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub tags: Option<Vec<String>>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub payment_method: Option<PaymentMethod>,
}

impl TransactionPatch {
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), ValidationError> {
        if let Some(amount) = self.amount {
            if amount < MIN_TRANSACTION_AMOUNT {
                return Err(ValidationError::InvalidAmount(amount));
            }
        }
        if let Some(ref description) = self.description {
            validate_description(description)?;
        }
        validate_notes(self.notes.as_deref())?;
        if let Some(date) = self.date {
            if date > now {
                return Err(ValidationError::InvalidInput(
                    "Transaction date cannot be in the future".to_string(),
                ));
            }
        }
        Ok(())
    }
}

fn validate_description(description: &str) -> Result<(), ValidationError> {
    let description = description.trim();
    if description.is_empty() {
        return Err(ValidationError::MissingField("description".to_string()));
    }
    if description.len() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::InvalidInput(format!(
            "Description cannot exceed {} characters",
            MAX_DESCRIPTION_LEN
        )));
    }
    Ok(())
}

fn validate_notes(notes: Option<&str>) -> Result<(), ValidationError> {
    if let Some(notes) = notes {
        if notes.len() > MAX_NOTES_LEN {
            return Err(ValidationError::InvalidInput(format!(
                "Notes cannot exceed {} characters",
                MAX_NOTES_LEN
            )));
        }
    }
    Ok(())
}

/// Query filters for listing transactions
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilters {
    pub category_id: Option<String>,
    pub transaction_type: Option<TransactionType>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl TransactionFilters {
    pub fn page(&self) -> i64 {
        self.page.filter(|p| *p >= 1).unwrap_or(1)
    }

    pub fn limit(&self) -> i64 {
        self.limit.filter(|l| *l >= 1).unwrap_or(20).min(100)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current: i64,
    pub pages: i64,
    pub total: i64,
    pub limit: i64,
}

/// One page of transactions plus aggregates over the whole filtered set
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    pub pagination: Pagination,
    pub summary: crate::ledger::LedgerTotals,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_amount_derivation() {
        assert_eq!(TransactionType::Expense.signed_amount(120.0), -120.0);
        assert_eq!(TransactionType::Expense.signed_amount(-120.0), -120.0);
        assert_eq!(TransactionType::Income.signed_amount(500.0), 500.0);
        assert_eq!(TransactionType::Income.signed_amount(-500.0), 500.0);
    }

    #[test]
    fn test_filters_clamp_pagination() {
        let filters = TransactionFilters {
            page: Some(0),
            limit: Some(500),
            ..Default::default()
        };
        assert_eq!(filters.page(), 1);
        assert_eq!(filters.limit(), 100);

        let defaults = TransactionFilters::default();
        assert_eq!(defaults.page(), 1);
        assert_eq!(defaults.limit(), 20);
    }

    #[test]
    fn test_input_rejects_non_positive_amount() {
        let input = TransactionInput {
            category_id: "cat-1".to_string(),
            transaction_type: TransactionType::Expense,
            amount: 0.0,
            description: "Groceries".to_string(),
            date: Utc::now(),
            tags: None,
            location: None,
            notes: None,
            payment_method: None,
        };
        assert!(matches!(
            input.validate(Utc::now()),
            Err(ValidationError::InvalidAmount(_))
        ));
    }
}
