use chrono::{DateTime, Duration, Months, NaiveDateTime, TimeZone, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::DEFAULT_ALERT_THRESHOLD;
use crate::errors::ValidationError;
use crate::transactions::transactions_model::Transaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl BudgetPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetPeriod::Weekly => "weekly",
            BudgetPeriod::Monthly => "monthly",
            BudgetPeriod::Yearly => "yearly",
        }
    }

    /// End of the window that starts at `start`: +7 days for weekly,
    /// same day next month or next year otherwise. Chrono clamps the
    /// day when the target month is shorter, Jan 31 + 1 month = Feb 28.
    pub fn end_date_from(&self, start: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            BudgetPeriod::Weekly => start + Duration::days(7),
            BudgetPeriod::Monthly => start
                .checked_add_months(Months::new(1))
                .unwrap_or(start + Duration::days(30)),
            BudgetPeriod::Yearly => start
                .checked_add_months(Months::new(12))
                .unwrap_or(start + Duration::days(365)),
        }
    }
}

impl FromStr for BudgetPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(BudgetPeriod::Weekly),
            "monthly" => Ok(BudgetPeriod::Monthly),
            "yearly" => Ok(BudgetPeriod::Yearly),
            _ => Err(format!("Unknown budget period: {}", s)),
        }
    }
}

impl fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Database model for budgets
#[derive(
    Queryable,
    Identifiable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::budgets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: String,
    pub user_id: String,
    pub category_id: String,
    pub amount: f64,
    pub period: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub alert_threshold: f64,
    pub notify_email: bool,
    pub notify_push: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Budget {
    pub fn window(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            Utc.from_utc_datetime(&self.start_date),
            Utc.from_utc_datetime(&self.end_date),
        )
    }

    /// Spend figures over the transactions already matched to this
    /// budget's category and window. `amount > 0` is enforced at
    /// creation, so the percentage is always defined.
    pub fn calculate_progress(&self, transactions: &[Transaction]) -> BudgetProgress {
        let spent: f64 = transactions.iter().map(|t| t.amount.abs()).sum();
        let percentage = (spent / self.amount * 100.0).min(100.0);

        BudgetProgress {
            budget: self.amount,
            spent,
            remaining: self.amount - spent,
            percentage,
            is_over_budget: spent > self.amount,
            alert_triggered: percentage >= self.alert_threshold,
        }
    }
}

/// Spend snapshot for one budget window
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetProgress {
    pub budget: f64,
    pub spent: f64,
    /// May be negative when the budget is blown
    pub remaining: f64,
    pub percentage: f64,
    pub is_over_budget: bool,
    pub alert_triggered: bool,
}

/// Budget plus its computed progress, for listings
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BudgetWithProgress {
    #[serde(flatten)]
    pub budget: Budget,
    pub progress: BudgetProgress,
}

/// Model for inserting a new budget row
#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::budgets)]
#[serde(rename_all = "camelCase")]
pub struct NewBudget {
    pub id: Option<String>,
    pub user_id: String,
    pub category_id: String,
    pub amount: f64,
    pub period: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub alert_threshold: f64,
    pub notify_email: bool,
    pub notify_push: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Model for updating a budget
#[derive(AsChangeset, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::budgets)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBudget {
    pub amount: Option<f64>,
    pub alert_threshold: Option<f64>,
    pub notify_email: Option<bool>,
    pub notify_push: Option<bool>,
    pub updated_at: NaiveDateTime,
}

/// Client input for creating a budget
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BudgetInput {
    pub category_id: String,
    pub amount: f64,
    pub period: Option<BudgetPeriod>,
    pub start_date: Option<DateTime<Utc>>,
    /// Derived from the period when absent
    pub end_date: Option<DateTime<Utc>>,
    pub alert_threshold: Option<f64>,
    #[serde(default)]
    pub notify_email: bool,
    #[serde(default)]
    pub notify_push: bool,
}

impl BudgetInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.amount <= 0.0 {
            return Err(ValidationError::InvalidAmount(self.amount));
        }
        validate_alert_threshold(self.alert_threshold)?;
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end <= start {
                return Err(ValidationError::InvalidInput(
                    "Budget end date must be after the start date".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn alert_threshold_or_default(&self) -> f64 {
        self.alert_threshold.unwrap_or(DEFAULT_ALERT_THRESHOLD)
    }
}

/// Client input for amending a budget
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct BudgetPatch {
    pub amount: Option<f64>,
    pub alert_threshold: Option<f64>,
    pub notify_email: Option<bool>,
    pub notify_push: Option<bool>,
}

impl BudgetPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(amount) = self.amount {
            if amount <= 0.0 {
                return Err(ValidationError::InvalidAmount(amount));
            }
        }
        validate_alert_threshold(self.alert_threshold)
    }
}

fn validate_alert_threshold(threshold: Option<f64>) -> Result<(), ValidationError> {
    if let Some(threshold) = threshold {
        if !(0.0..=100.0).contains(&threshold) || threshold == 0.0 {
            return Err(ValidationError::InvalidInput(format!(
                "Alert threshold must be between 0 and 100, got {}",
                threshold
            )));
        }
    }
    Ok(())
}
