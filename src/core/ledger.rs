//! Ledger aggregation business logic.
//!
//! Pure functions that map a month's expense records to per-category totals
//! and remaining balances. Amounts are whole currency units (`i64`), so the
//! sums are exact and order-independent. Remaining values may be negative -
//! overspending is a valid, expected state, not an error.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    core::policy::Budget,
    errors::{Error, Result},
};

/// Money in whole currency units.
pub type Money = i64;

/// The closed set of budget categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Essential spending (housing, groceries, utilities)
    Needs,
    /// Discretionary spending (leisure, travel, dining out)
    Wants,
    /// Money set aside (emergency fund, investments, debt payments)
    Savings,
}

impl Category {
    /// Canonical lowercase name, matching the stored column value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Needs => "needs",
            Self::Wants => "wants",
            Self::Savings => "savings",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "needs" => Ok(Self::Needs),
            "wants" => Ok(Self::Wants),
            "savings" => Ok(Self::Savings),
            other => Err(Error::Validation {
                message: format!("unknown category '{other}'"),
            }),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single expense record as the aggregator and the API see it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Record identifier, stringly typed for the wire format
    pub id: String,
    /// Budget category
    pub category: Category,
    /// Free-form label within the category
    pub subcategory: String,
    /// Human-readable description, empty when none was given
    pub description: String,
    /// Positive amount in whole currency units
    pub amount: Money,
    /// Calendar date of the expense
    pub date: NaiveDate,
}

/// One amount per category; used for both totals and remaining balances.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryAmounts {
    /// Amount in the needs category
    pub needs: Money,
    /// Amount in the wants category
    pub wants: Money,
    /// Amount in the savings category
    pub savings: Money,
}

impl CategoryAmounts {
    /// Scalar sum across the three categories.
    #[must_use]
    pub const fn total(&self) -> Money {
        self.needs + self.wants + self.savings
    }
}

/// Sums expense amounts grouped by category.
///
/// Categories absent from the input sum to 0. The result does not depend on
/// the order of the input list.
#[must_use]
pub fn compute_totals(expenses: &[Expense]) -> CategoryAmounts {
    let mut totals = CategoryAmounts::default();
    for expense in expenses {
        match expense.category {
            Category::Needs => totals.needs += expense.amount,
            Category::Wants => totals.wants += expense.amount,
            Category::Savings => totals.savings += expense.amount,
        }
    }
    totals
}

/// Computes remaining balances: budget minus totals per category, with the
/// carried-over savings principal added to the savings remainder only.
#[must_use]
pub const fn compute_remaining(
    budget: &Budget,
    totals: &CategoryAmounts,
    accumulated_savings: Money,
) -> CategoryAmounts {
    CategoryAmounts {
        needs: budget.needs - totals.needs,
        wants: budget.wants - totals.wants,
        savings: budget.savings - totals.savings + accumulated_savings,
    }
}
