use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ApiError;

/// Maximum category name length accepted by the server
pub const MAX_CATEGORY_NAME_LENGTH: usize = 100;

/// Whether money flows in or out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
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

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for CategoryType {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(CategoryType::Income),
            "expense" => Ok(CategoryType::Expense),
            other => Err(ApiError::Validation(format!(
                "category type must be 'income' or 'expense', got {:?}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryType,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body for creating or replacing a category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryType,
}

impl CategoryInput {
    pub fn new(name: impl Into<String>, kind: CategoryType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ApiError::Validation("Category name is required.".to_string()));
        }
        if name.chars().count() > MAX_CATEGORY_NAME_LENGTH {
            return Err(ApiError::Validation(format!(
                "Category name must be at most {} characters.",
                MAX_CATEGORY_NAME_LENGTH
            )));
        }
        Ok(())
    }
}
