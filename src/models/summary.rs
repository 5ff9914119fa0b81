use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::category::CategoryType;

/// Monthly dashboard figures from `GET /summary/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
    #[serde(default)]
    pub by_category: Vec<CategoryAmount>,
    #[serde(default)]
    pub monthly_budget: Option<Decimal>,
    #[serde(default)]
    pub budget_variance: Option<Decimal>,
}

/// One transaction's contribution; the server sends one entry per transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAmount {
    pub category: String,
    #[serde(rename = "type")]
    pub kind: CategoryType,
    pub amount: Decimal,
}

impl Summary {
    /// Per-category totals for one direction, largest first
    pub fn totals_by_category(&self, kind: CategoryType) -> Vec<(String, Decimal)> {
        let mut totals: Vec<(String, Decimal)> = Vec::new();
        for entry in self.by_category.iter().filter(|e| e.kind == kind) {
            match totals.iter_mut().find(|(name, _)| *name == entry.category) {
                Some((_, total)) => *total += entry.amount,
                None => totals.push((entry.category.clone(), entry.amount)),
            }
        }
        totals.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        totals
    }

    /// Share of the monthly budget already spent, in percent
    pub fn budget_used_percent(&self) -> Option<Decimal> {
        match self.monthly_budget {
            Some(budget) if budget > Decimal::ZERO => {
                Some((self.total_expenses * Decimal::ONE_HUNDRED / budget).round_dp(1))
            }
            _ => None,
        }
    }

    pub fn is_over_budget(&self) -> bool {
        self.budget_variance
            .map(|variance| variance < Decimal::ZERO)
            .unwrap_or(false)
    }
}
