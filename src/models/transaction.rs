use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::category::CategoryType;
use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub category: i64,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub category_type: Option<CategoryType>,
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Amount with its sign: expenses negative, income positive
    pub fn signed_amount(&self) -> Decimal {
        match self.category_type {
            Some(CategoryType::Expense) => -self.amount,
            _ => self.amount,
        }
    }
}

/// Body for creating or replacing a transaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionInput {
    pub category: i64,
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl TransactionInput {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.amount <= Decimal::ZERO {
            return Err(ApiError::Validation("Amount must be positive.".to_string()));
        }
        Ok(())
    }
}

/// Query filters for `GET /transactions/`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub category: Option<i64>,
    pub min_amount: Option<Decimal>,
    pub max_amount: Option<Decimal>,
    pub kind: Option<CategoryType>,
}

impl TransactionFilter {
    pub fn query_pairs(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("page", self.page.map(|v| v.to_string())),
            ("page_size", self.page_size.map(|v| v.to_string())),
            ("start_date", self.start_date.map(|d| d.to_string())),
            ("end_date", self.end_date.map(|d| d.to_string())),
            ("category", self.category.map(|v| v.to_string())),
            ("min_amount", self.min_amount.map(|v| v.to_string())),
            ("max_amount", self.max_amount.map(|v| v.to_string())),
            ("type", self.kind.map(|k| k.to_string())),
        ]
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(ApiError::Validation(
                    "start_date must not be after end_date".to_string(),
                ));
            }
        }
        if let (Some(min), Some(max)) = (self.min_amount, self.max_amount) {
            if min > max {
                return Err(ApiError::Validation(
                    "min_amount must not exceed max_amount".to_string(),
                ));
            }
        }
        if self.page == Some(0) || self.page_size == Some(0) {
            return Err(ApiError::Validation("page and page_size start at 1".to_string()));
        }
        Ok(())
    }
}

/// One day of `GET /transactions/stats/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStats {
    pub day: NaiveDate,
    #[serde(default)]
    pub total_income: Option<Decimal>,
    #[serde(default)]
    pub total_expenses: Option<Decimal>,
}

impl DailyStats {
    pub fn net(&self) -> Decimal {
        self.total_income.unwrap_or_default() - self.total_expenses.unwrap_or_default()
    }
}
