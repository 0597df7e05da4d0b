//! Allocation policy business logic.
//!
//! Recommends a needs/wants/savings split for a given net income and derives
//! concrete budget amounts from a policy. Both functions are pure lookups
//! over fixed policy constants; nothing here is configurable at runtime and
//! nothing here validates - the API boundary checks that submitted
//! percentages sum to 100 before they are ever stored.

use serde::{Deserialize, Serialize};

use crate::core::ledger::Money;

/// Percentage split of net income across needs, wants, and savings.
///
/// Conventionally sums to 100; storage does not hard-enforce this.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationPolicy {
    /// Percentage allocated to needs
    pub needs_percentage: u8,
    /// Percentage allocated to wants
    pub wants_percentage: u8,
    /// Percentage allocated to savings
    pub savings_percentage: u8,
}

/// Derived money amounts for one month.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Amount allocated to needs
    pub needs: Money,
    /// Amount allocated to wants
    pub wants: Money,
    /// Amount allocated to savings
    pub savings: Money,
}

impl Budget {
    /// Sum of the three category allocations.
    #[must_use]
    pub const fn total(&self) -> Money {
        self.needs + self.wants + self.savings
    }
}

/// The classic 50/30/20 split, recommended for high incomes.
pub const DEFAULT_POLICY: AllocationPolicy = AllocationPolicy {
    needs_percentage: 50,
    wants_percentage: 30,
    savings_percentage: 20,
};

/// Recommends an allocation policy for a net income figure.
///
/// Threshold-based lookup over fixed bands: lower incomes weight basic needs
/// more heavily, higher incomes converge on the classic 50/30/20 method.
/// Defined for `net_income >= 0`.
#[must_use]
pub const fn recommend_policy(net_income: Money) -> AllocationPolicy {
    if net_income < 500_000 {
        AllocationPolicy {
            needs_percentage: 70,
            wants_percentage: 20,
            savings_percentage: 10,
        }
    } else if net_income < 800_000 {
        AllocationPolicy {
            needs_percentage: 60,
            wants_percentage: 30,
            savings_percentage: 10,
        }
    } else if net_income < 1_200_000 {
        AllocationPolicy {
            needs_percentage: 60,
            wants_percentage: 20,
            savings_percentage: 20,
        }
    } else {
        DEFAULT_POLICY
    }
}

/// Computes category budget amounts from a net income and a policy.
///
/// Each component is `round(net_income * percentage / 100)` with
/// round-half-away-from-zero (`f64::round`). The three rounded parts may not
/// sum exactly to the income; the off-by-rounding difference is accepted,
/// not corrected.
#[must_use]
pub fn compute_budget(net_income: Money, policy: &AllocationPolicy) -> Budget {
    // Incomes are well below 2^53 so the f64 round-trip is lossless.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    fn part(net_income: Money, percentage: u8) -> Money {
        (net_income as f64 * (f64::from(percentage) / 100.0)).round() as Money
    }

    Budget {
        needs: part(net_income, policy.needs_percentage),
        wants: part(net_income, policy.wants_percentage),
        savings: part(net_income, policy.savings_percentage),
    }
}
