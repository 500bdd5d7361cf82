use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_CATEGORY_COLOR, DEFAULT_CATEGORY_ICON, MAX_CATEGORY_NAME_LEN, MAX_ICON_LEN,
};
use crate::errors::ValidationError;

/// Whether a category collects income or expense transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    Income,
    Expense,
}

impl CategoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryType::Income => "income",
            CategoryType::Expense => "expense",
        }
    }
}

impl FromStr for CategoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(CategoryType::Income),
            "expense" => Ok(CategoryType::Expense),
            _ => Err(format!("Unknown category type: {}", s)),
        }
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Database model for categories
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
#[diesel(table_name = crate::schema::categories)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub category_type: String,
    pub icon: String,
    pub color: String,
    pub is_default: bool,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

impl Category {
    pub fn is_income(&self) -> bool {
        self.category_type == CategoryType::Income.as_str()
    }

    pub fn is_expense(&self) -> bool {
        self.category_type == CategoryType::Expense.as_str()
    }
}

/// Model for inserting a new category row
#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::categories)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub id: Option<String>,
    pub user_id: String,
    pub name: String,
    pub category_type: String,
    pub icon: String,
    pub color: String,
    pub is_default: bool,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

/// Model for updating a category
#[derive(AsChangeset, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::categories)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub sort_order: Option<i32>,
    pub updated_at: chrono::NaiveDateTime,
}

/// Client input for creating a category
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    pub name: String,
    pub category_type: CategoryType,
    pub icon: Option<String>,
    pub color: Option<String>,
}

impl CategoryInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField("name".to_string()));
        }
        if name.len() > MAX_CATEGORY_NAME_LEN {
            return Err(ValidationError::InvalidInput(format!(
                "Category name cannot exceed {} characters",
                MAX_CATEGORY_NAME_LEN
            )));
        }
        validate_icon(self.icon.as_deref())?;
        validate_color(self.color.as_deref())?;
        Ok(())
    }

    pub fn icon_or_default(&self) -> String {
        self.icon
            .clone()
            .unwrap_or_else(|| DEFAULT_CATEGORY_ICON.to_string())
    }

    pub fn color_or_default(&self) -> String {
        self.color
            .clone()
            .unwrap_or_else(|| DEFAULT_CATEGORY_COLOR.to_string())
    }
}

/// Client input for patching a category
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub sort_order: Option<i32>,
}

impl CategoryPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(ref name) = self.name {
            let name = name.trim();
            if name.is_empty() || name.len() > MAX_CATEGORY_NAME_LEN {
                return Err(ValidationError::InvalidInput(format!(
                    "Category name must be between 1 and {} characters",
                    MAX_CATEGORY_NAME_LEN
                )));
            }
        }
        validate_icon(self.icon.as_deref())?;
        validate_color(self.color.as_deref())?;
        Ok(())
    }
}

fn validate_icon(icon: Option<&str>) -> Result<(), ValidationError> {
    if let Some(icon) = icon {
        if icon.chars().count() > MAX_ICON_LEN {
            return Err(ValidationError::InvalidInput(format!(
                "Icon cannot exceed {} characters",
                MAX_ICON_LEN
            )));
        }
    }
    Ok(())
}

fn validate_color(color: Option<&str>) -> Result<(), ValidationError> {
    if let Some(color) = color {
        if !is_valid_hex_color(color) {
            return Err(ValidationError::InvalidInput(format!(
                "Color must be a valid hex code, got '{}'",
                color
            )));
        }
    }
    Ok(())
}

/// Accepts `#RGB` and `#RRGGBB`
pub fn is_valid_hex_color(s: &str) -> bool {
    let Some(hex) = s.strip_prefix('#') else {
        return false;
    };
    (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
}

/// Stock categories seeded for every new user
pub struct SeedCategory {
    pub name: &'static str,
    pub category_type: CategoryType,
    pub icon: &'static str,
    pub color: &'static str,
    pub is_default: bool,
}

lazy_static::lazy_static! {
    pub static ref SEED_CATEGORIES: Vec<SeedCategory> = vec![
        // Income categories
        SeedCategory { name: "Salary", category_type: CategoryType::Income, icon: "\u{1F4B0}", color: "#4CAF50", is_default: true },
        SeedCategory { name: "Freelance", category_type: CategoryType::Income, icon: "\u{1F4BC}", color: "#2196F3", is_default: false },
        SeedCategory { name: "Investments", category_type: CategoryType::Income, icon: "\u{1F4C8}", color: "#FF9800", is_default: false },
        SeedCategory { name: "Other", category_type: CategoryType::Income, icon: "\u{1F4B5}", color: "#9C27B0", is_default: false },

        // Expense categories
        SeedCategory { name: "Food", category_type: CategoryType::Expense, icon: "\u{1F37D}\u{FE0F}", color: "#F44336", is_default: true },
        SeedCategory { name: "Transport", category_type: CategoryType::Expense, icon: "\u{1F697}", color: "#607D8B", is_default: false },
        SeedCategory { name: "Housing", category_type: CategoryType::Expense, icon: "\u{1F3E0}", color: "#795548", is_default: false },
        SeedCategory { name: "Health", category_type: CategoryType::Expense, icon: "\u{1F3E5}", color: "#E91E63", is_default: false },
        SeedCategory { name: "Education", category_type: CategoryType::Expense, icon: "\u{1F4DA}", color: "#3F51B5", is_default: false },
        SeedCategory { name: "Entertainment", category_type: CategoryType::Expense, icon: "\u{1F3AC}", color: "#9C27B0", is_default: false },
        SeedCategory { name: "Clothing", category_type: CategoryType::Expense, icon: "\u{1F455}", color: "#FF5722", is_default: false },
        SeedCategory { name: "Other", category_type: CategoryType::Expense, icon: "\u{1F4C1}", color: "#808080", is_default: false },
    ];
}
