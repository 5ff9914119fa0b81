use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub year: i32,
    pub month: u32,
    pub amount: Decimal,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body for creating or replacing a monthly budget
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetInput {
    pub year: i32,
    pub month: u32,
    pub amount: Decimal,
}

impl BudgetInput {
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_month(self.month)?;
        if self.amount < Decimal::ZERO {
            return Err(ApiError::Validation(
                "Budget amount cannot be negative.".to_string(),
            ));
        }
        Ok(())
    }
}

pub(crate) fn validate_month(month: u32) -> Result<(), ApiError> {
    if !(1..=12).contains(&month) {
        return Err(ApiError::Validation(
            "Month must be between 1 and 12.".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_parse_budget() {
        let json = r#"{"id": 1, "year": 2024, "month": 3, "amount": "1500.00",
            "created_at": "2024-03-01T00:00:00Z"}"#;
        let budget: Budget = serde_json::from_str(json).unwrap();
        assert_eq!(budget.month, 3);
        assert_eq!(budget.amount, Decimal::from_str("1500.00").unwrap());
    }

    #[test]
    fn test_budget_input_validation() {
        let mut input = BudgetInput {
            year: 2024,
            month: 12,
            amount: Decimal::ZERO,
        };
        assert!(input.validate().is_ok());

        input.month = 13;
        assert!(input.validate().is_err());
        input.month = 0;
        assert!(input.validate().is_err());

        input.month = 1;
        input.amount = Decimal::from_str("-1").unwrap();
        assert!(input.validate().is_err());
    }
}
