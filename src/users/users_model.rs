use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::{
    DEFAULT_CURRENCY, DEFAULT_LANGUAGE, DEFAULT_THEME, MAX_LABEL_LEN, SUPPORTED_CURRENCIES,
    SUPPORTED_LANGUAGES, SUPPORTED_THEMES,
};
use crate::errors::{Error, ValidationError};

/// Display preferences stored as JSON on the user row
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub currency: String,
    pub language: String,
    pub theme: String,
}

impl Preferences {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !SUPPORTED_CURRENCIES.contains(&self.currency.as_str()) {
            return Err(ValidationError::InvalidInput(format!(
                "Unsupported currency: {}",
                self.currency
            )));
        }
        if !SUPPORTED_LANGUAGES.contains(&self.language.as_str()) {
            return Err(ValidationError::InvalidInput(format!(
                "Unsupported language: {}",
                self.language
            )));
        }
        if !SUPPORTED_THEMES.contains(&self.theme.as_str()) {
            return Err(ValidationError::InvalidInput(format!(
                "Unsupported theme: {}",
                self.theme
            )));
        }
        Ok(())
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            currency: DEFAULT_CURRENCY.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            theme: DEFAULT_THEME.to_string(),
        }
    }
}

/// Which notification channels are enabled, stored as JSON
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub email: bool,
    pub push: bool,
    pub budget_alerts: bool,
    pub goal_milestones: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        NotificationSettings {
            email: true,
            push: true,
            budget_alerts: true,
            goal_milestones: true,
        }
    }
}

/// Database model for users
#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserDB {
    pub id: String,
    pub name: String,
    pub email: String,
    pub preferences: String,
    pub custom_labels: String,
    pub notifications: String,
    pub is_active: bool,
    pub last_login: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Domain model for users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub preferences: Preferences,
    pub custom_labels: HashMap<String, String>,
    pub notifications: NotificationSettings,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserDB> for User {
    type Error = Error;

    fn try_from(db: UserDB) -> Result<Self, Self::Error> {
        Ok(User {
            id: db.id,
            name: db.name,
            email: db.email,
            preferences: serde_json::from_str(&db.preferences)?,
            custom_labels: serde_json::from_str(&db.custom_labels)?,
            notifications: serde_json::from_str(&db.notifications)?,
            is_active: db.is_active,
            last_login: db.last_login.map(|t| Utc.from_utc_datetime(&t)),
            created_at: Utc.from_utc_datetime(&db.created_at),
            updated_at: Utc.from_utc_datetime(&db.updated_at),
        })
    }
}

/// Model for inserting a new user row
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUserDB {
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    pub preferences: String,
    pub custom_labels: String,
    pub notifications: String,
    pub is_active: bool,
    pub last_login: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Model for updating a user
#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = crate::schema::users)]
pub struct UpdateUserDB {
    pub name: Option<String>,
    pub preferences: Option<String>,
    pub custom_labels: Option<String>,
    pub notifications: Option<String>,
    pub is_active: Option<bool>,
    pub last_login: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Client input for registering a user
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    pub name: String,
    pub email: String,
}

impl UserInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name".to_string()));
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err(ValidationError::MissingField("email".to_string()));
        }
        if !is_plausible_email(email) {
            return Err(ValidationError::InvalidInput(format!(
                "'{}' is not a valid email address",
                email
            )));
        }
        Ok(())
    }

    /// Emails are stored lowercase so uniqueness is case-insensitive
    pub fn normalized_email(&self) -> String {
        self.email.trim().to_lowercase()
    }
}

/// Client input for updating profile and settings
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub name: Option<String>,
    pub preferences: Option<Preferences>,
    pub custom_labels: Option<HashMap<String, String>>,
    pub notifications: Option<NotificationSettings>,
}

impl UserPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(ref name) = self.name {
            if name.trim().is_empty() {
                return Err(ValidationError::MissingField("name".to_string()));
            }
        }
        if let Some(ref preferences) = self.preferences {
            preferences.validate()?;
        }
        if let Some(ref labels) = self.custom_labels {
            for (key, value) in labels {
                if key.len() > MAX_LABEL_LEN || value.len() > MAX_LABEL_LEN {
                    return Err(ValidationError::InvalidInput(format!(
                        "Custom labels cannot exceed {} characters",
                        MAX_LABEL_LEN
                    )));
                }
            }
        }
        Ok(())
    }
}

fn is_plausible_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// Everything a user owns, for data export
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    pub user: User,
    pub categories: Vec<crate::categories::Category>,
    pub transactions: Vec<crate::transactions::Transaction>,
    pub budgets: Vec<crate::budgets::Budget>,
    pub goals: Vec<crate::goals::Goal>,
    pub exported_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_plausible_email("ana@example.com"));
        assert!(!is_plausible_email("ana"));
        assert!(!is_plausible_email("@example.com"));
        assert!(!is_plausible_email("ana@com"));
        assert!(!is_plausible_email("ana@example."));
    }

    #[test]
    fn test_email_is_normalized_lowercase() {
        let input = UserInput {
            name: "Ana".to_string(),
            email: "  Ana@Example.COM ".to_string(),
        };
        assert_eq!(input.normalized_email(), "ana@example.com");
    }

    #[test]
    fn test_preferences_reject_unsupported_values() {
        assert!(Preferences::default().validate().is_ok());

        let prefs = Preferences {
            currency: "BRL".to_string(),
            language: "pt-BR".to_string(),
            theme: "dark".to_string(),
        };
        assert!(prefs.validate().is_ok());

        let bad_theme = Preferences {
            theme: "sepia".to_string(),
            ..Preferences::default()
        };
        assert!(bad_theme.validate().is_err());

        let bad_currency = Preferences {
            currency: "DOGE".to_string(),
            ..Preferences::default()
        };
        assert!(bad_currency.validate().is_err());
    }
}
