use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_MILESTONE_STEPS, MAX_GOAL_DESCRIPTION_LEN, MAX_GOAL_TITLE_LEN,
};
use crate::errors::{Error, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    #[default]
    Savings,
    DebtPayment,
    Purchase,
    Investment,
    Other,
}

impl GoalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::Savings => "savings",
            GoalType::DebtPayment => "debt_payment",
            GoalType::Purchase => "purchase",
            GoalType::Investment => "investment",
            GoalType::Other => "other",
        }
    }
}

impl FromStr for GoalType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "savings" => Ok(GoalType::Savings),
            "debt_payment" => Ok(GoalType::DebtPayment),
            "purchase" => Ok(GoalType::Purchase),
            "investment" => Ok(GoalType::Investment),
            "other" => Ok(GoalType::Other),
            _ => Err(format!("Unknown goal type: {}", s)),
        }
    }
}

impl fmt::Display for GoalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GoalPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl GoalPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalPriority::Low => "low",
            GoalPriority::Medium => "medium",
            GoalPriority::High => "high",
            GoalPriority::Urgent => "urgent",
        }
    }
}

impl FromStr for GoalPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(GoalPriority::Low),
            "medium" => Ok(GoalPriority::Medium),
            "high" => Ok(GoalPriority::High),
            "urgent" => Ok(GoalPriority::Urgent),
            _ => Err(format!("Unknown goal priority: {}", s)),
        }
    }
}

impl fmt::Display for GoalPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GoalStatus {
    #[default]
    Active,
    Paused,
    Completed,
    Cancelled,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Active => "active",
            GoalStatus::Paused => "paused",
            GoalStatus::Completed => "completed",
            GoalStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, GoalStatus::Completed | GoalStatus::Cancelled)
    }

    /// Active goals may pause or finish; paused goals may resume.
    /// Any non-terminal goal may be cancelled. Terminal states are final.
    pub fn can_transition_to(&self, next: GoalStatus) -> bool {
        match (self, next) {
            (GoalStatus::Active, GoalStatus::Paused) => true,
            (GoalStatus::Active, GoalStatus::Completed) => true,
            (GoalStatus::Paused, GoalStatus::Active) => true,
            (current, GoalStatus::Cancelled) if !current.is_terminal() => true,
            _ => false,
        }
    }
}

impl FromStr for GoalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(GoalStatus::Active),
            "paused" => Ok(GoalStatus::Paused),
            "completed" => Ok(GoalStatus::Completed),
            "cancelled" => Ok(GoalStatus::Cancelled),
            _ => Err(format!("Unknown goal status: {}", s)),
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A percentage checkpoint on the way to a goal's target amount
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub percentage: f64,
    pub description: String,
    pub achieved: bool,
    pub achieved_at: Option<DateTime<Utc>>,
}

/// Database model for goals
#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GoalDB {
    pub id: String,
    pub user_id: String,
    pub category_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub target_amount: f64,
    pub current_amount: f64,
    pub start_date: NaiveDateTime,
    pub target_date: NaiveDateTime,
    pub goal_type: String,
    pub priority: String,
    pub status: String,
    pub is_recurring: bool,
    pub recurring_amount: Option<f64>,
    pub milestones: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Domain model for goals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub user_id: String,
    pub category_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub target_amount: f64,
    pub current_amount: f64,
    pub start_date: DateTime<Utc>,
    pub target_date: DateTime<Utc>,
    pub goal_type: GoalType,
    pub priority: GoalPriority,
    pub status: GoalStatus,
    pub is_recurring: bool,
    pub recurring_amount: Option<f64>,
    pub milestones: Vec<Milestone>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Progress snapshot derived from a goal's amounts and dates
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub percentage: f64,
    pub remaining: f64,
    pub days_remaining: i64,
    pub is_completed: bool,
    pub is_overdue: bool,
}

impl Goal {
    /// Quartile milestones every new goal starts with
    pub fn default_milestones() -> Vec<Milestone> {
        DEFAULT_MILESTONE_STEPS
            .iter()
            .map(|&step| Milestone {
                percentage: step,
                description: format!("{}% of target", step),
                achieved: false,
                achieved_at: None,
            })
            .collect()
    }

    pub fn is_completed(&self) -> bool {
        self.current_amount >= self.target_amount
    }

    /// Pure computation; calling it repeatedly never changes the goal.
    pub fn calculate_progress(&self, now: DateTime<Utc>) -> GoalProgress {
        let percentage = if self.target_amount > 0.0 {
            (self.current_amount / self.target_amount * 100.0).min(100.0)
        } else {
            0.0
        };
        let remaining = self.target_amount - self.current_amount;

        let seconds_left = (self.target_date - now).num_seconds();
        let raw_days = (seconds_left as f64 / 86_400.0).ceil() as i64;
        let is_completed = self.is_completed();

        GoalProgress {
            percentage,
            remaining,
            days_remaining: raw_days.max(0),
            is_completed,
            is_overdue: raw_days < 0 && !is_completed,
        }
    }

    /// Marks every unachieved milestone whose threshold the current
    /// percentage has crossed and returns the newly achieved ones.
    /// Achieved milestones are never unset.
    pub fn check_milestones(&mut self, now: DateTime<Utc>) -> Vec<Milestone> {
        let percentage = self.calculate_progress(now).percentage;
        let mut newly_achieved = Vec::new();
        for milestone in &mut self.milestones {
            if !milestone.achieved && milestone.percentage <= percentage {
                milestone.achieved = true;
                milestone.achieved_at = Some(now);
                newly_achieved.push(milestone.clone());
            }
        }
        newly_achieved
    }

    pub fn milestones_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.milestones)
    }
}

impl TryFrom<GoalDB> for Goal {
    type Error = Error;

    fn try_from(db: GoalDB) -> Result<Self, Self::Error> {
        let goal_type = GoalType::from_str(&db.goal_type).map_err(ValidationError::InvalidInput)?;
        let priority =
            GoalPriority::from_str(&db.priority).map_err(ValidationError::InvalidInput)?;
        let status = GoalStatus::from_str(&db.status).map_err(ValidationError::InvalidInput)?;
        let milestones: Vec<Milestone> = serde_json::from_str(&db.milestones)?;

        Ok(Goal {
            id: db.id,
            user_id: db.user_id,
            category_id: db.category_id,
            title: db.title,
            description: db.description,
            target_amount: db.target_amount,
            current_amount: db.current_amount,
            start_date: Utc.from_utc_datetime(&db.start_date),
            target_date: Utc.from_utc_datetime(&db.target_date),
            goal_type,
            priority,
            status,
            is_recurring: db.is_recurring,
            recurring_amount: db.recurring_amount,
            milestones,
            created_at: Utc.from_utc_datetime(&db.created_at),
            updated_at: Utc.from_utc_datetime(&db.updated_at),
        })
    }
}

/// Model for inserting a new goal row
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::goals)]
pub struct NewGoalDB {
    pub id: Option<String>,
    pub user_id: String,
    pub category_id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub target_amount: f64,
    pub current_amount: f64,
    pub start_date: NaiveDateTime,
    pub target_date: NaiveDateTime,
    pub goal_type: String,
    pub priority: String,
    pub status: String,
    pub is_recurring: bool,
    pub recurring_amount: Option<f64>,
    pub milestones: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Model for updating a goal
#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = crate::schema::goals)]
pub struct UpdateGoalDB {
    pub category_id: Option<Option<String>>,
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub target_amount: Option<f64>,
    pub current_amount: Option<f64>,
    pub target_date: Option<NaiveDateTime>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub milestones: Option<String>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Client input for creating a goal
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GoalInput {
    pub title: String,
    pub description: Option<String>,
    pub target_amount: f64,
    pub start_date: Option<DateTime<Utc>>,
    pub target_date: DateTime<Utc>,
    pub category_id: Option<String>,
    pub goal_type: Option<GoalType>,
    pub priority: Option<GoalPriority>,
    #[serde(default)]
    pub is_recurring: bool,
    pub recurring_amount: Option<f64>,
}

impl GoalInput {
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), ValidationError> {
        validate_title(&self.title)?;
        validate_goal_description(self.description.as_deref())?;
        if self.target_amount <= 0.0 {
            return Err(ValidationError::InvalidAmount(self.target_amount));
        }
        if let Some(amount) = self.recurring_amount {
            if amount <= 0.0 {
                return Err(ValidationError::InvalidAmount(amount));
            }
        }
        let start = self.start_date.unwrap_or(now);
        if self.target_date <= start {
            return Err(ValidationError::InvalidInput(
                "Target date must be after the start date".to_string(),
            ));
        }
        Ok(())
    }
}

/// Client input for amending a goal
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct GoalPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub target_amount: Option<f64>,
    pub target_date: Option<DateTime<Utc>>,
    pub category_id: Option<String>,
    pub priority: Option<GoalPriority>,
}

impl GoalPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(ref title) = self.title {
            validate_title(title)?;
        }
        validate_goal_description(self.description.as_deref())?;
        if let Some(amount) = self.target_amount {
            if amount <= 0.0 {
                return Err(ValidationError::InvalidAmount(amount));
            }
        }
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<(), ValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ValidationError::MissingField("title".to_string()));
    }
    if title.len() > MAX_GOAL_TITLE_LEN {
        return Err(ValidationError::InvalidInput(format!(
            "Goal title cannot exceed {} characters",
            MAX_GOAL_TITLE_LEN
        )));
    }
    Ok(())
}

fn validate_goal_description(description: Option<&str>) -> Result<(), ValidationError> {
    if let Some(description) = description {
        if description.len() > MAX_GOAL_DESCRIPTION_LEN {
            return Err(ValidationError::InvalidInput(format!(
                "Goal description cannot exceed {} characters",
                MAX_GOAL_DESCRIPTION_LEN
            )));
        }
    }
    Ok(())
}

/// Goal plus its computed progress, for listings
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GoalWithProgress {
    #[serde(flatten)]
    pub goal: Goal,
    pub progress: GoalProgress,
}

/// Outcome of adding money to a goal
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GoalContribution {
    pub goal: Goal,
    pub progress: GoalProgress,
    pub achieved_milestones: Vec<Milestone>,
}

/// Aggregates across all of a user's goals
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GoalStats {
    pub total_goals: i64,
    pub active_goals: i64,
    pub completed_goals: i64,
    pub total_target_amount: f64,
    pub total_current_amount: f64,
    pub overall_percentage: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn goal(target: f64, current: f64, days_out: i64) -> Goal {
        let now = Utc::now();
        Goal {
            id: "g".to_string(),
            user_id: "u".to_string(),
            category_id: None,
            title: "Emergency fund".to_string(),
            description: None,
            target_amount: target,
            current_amount: current,
            start_date: now - Duration::days(30),
            target_date: now + Duration::days(days_out),
            goal_type: GoalType::Savings,
            priority: GoalPriority::Medium,
            status: GoalStatus::Active,
            is_recurring: false,
            recurring_amount: None,
            milestones: Goal::default_milestones(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_progress_percentage_and_remaining() {
        let g = goal(15000.0, 8500.0, 180);
        let progress = g.calculate_progress(Utc::now());

        assert!((progress.percentage - 56.666_666).abs() < 0.001);
        assert_eq!(progress.remaining, 6500.0);
        assert!(!progress.is_completed);
        assert!(!progress.is_overdue);
        assert_eq!(progress.days_remaining, 180);
    }

    #[test]
    fn test_progress_caps_percentage_at_hundred() {
        let g = goal(1000.0, 1500.0, 10);
        let progress = g.calculate_progress(Utc::now());

        assert_eq!(progress.percentage, 100.0);
        assert_eq!(progress.remaining, -500.0);
        assert!(progress.is_completed);
    }

    #[test]
    fn test_overdue_only_when_incomplete() {
        let now = Utc::now();
        let mut g = goal(1000.0, 200.0, 5);
        g.target_date = now - Duration::days(3);

        let progress = g.calculate_progress(now);
        assert!(progress.is_overdue);
        assert_eq!(progress.days_remaining, 0);

        g.current_amount = 1000.0;
        let progress = g.calculate_progress(now);
        assert!(!progress.is_overdue);
        assert!(progress.is_completed);
    }

    #[test]
    fn test_progress_is_idempotent() {
        let g = goal(2000.0, 750.0, 60);
        let now = Utc::now();
        assert_eq!(g.calculate_progress(now), g.calculate_progress(now));
    }

    #[test]
    fn test_milestones_achieve_monotonically() {
        let now = Utc::now();
        let mut g = goal(1000.0, 0.0, 90);

        g.current_amount = 260.0;
        let first = g.check_milestones(now);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].percentage, 25.0);

        // Re-checking with the same amount reports nothing new
        assert!(g.check_milestones(now).is_empty());

        g.current_amount = 1000.0;
        let rest = g.check_milestones(now);
        assert_eq!(rest.len(), 3);
        assert!(g.milestones.iter().all(|m| m.achieved));
    }

    #[test]
    fn test_status_transitions() {
        assert!(GoalStatus::Active.can_transition_to(GoalStatus::Paused));
        assert!(GoalStatus::Paused.can_transition_to(GoalStatus::Active));
        assert!(GoalStatus::Active.can_transition_to(GoalStatus::Completed));
        assert!(GoalStatus::Paused.can_transition_to(GoalStatus::Cancelled));
        assert!(!GoalStatus::Paused.can_transition_to(GoalStatus::Completed));
        assert!(!GoalStatus::Completed.can_transition_to(GoalStatus::Active));
        assert!(!GoalStatus::Cancelled.can_transition_to(GoalStatus::Cancelled));
    }

    #[test]
    fn test_default_milestones_are_quartiles() {
        let milestones = Goal::default_milestones();
        let thresholds: Vec<f64> = milestones.iter().map(|m| m.percentage).collect();
        assert_eq!(thresholds, vec![25.0, 50.0, 75.0, 100.0]);
        assert!(milestones.iter().all(|m| !m.achieved && m.achieved_at.is_none()));
    }
}
