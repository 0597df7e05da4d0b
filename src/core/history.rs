//! Monthly history business logic.
//!
//! Assembles month-keyed snapshots of budget versus actual spending and keeps
//! the per-user history list consistent under insert-or-update semantics.
//! The canonical month key is `"YYYY-MM"` with a zero-padded month; because
//! the format is fixed-width, plain lexicographic string comparison orders
//! months chronologically, and the history relies on that.

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
    core::{
        ledger::{self, CategoryAmounts, Expense, Money},
        policy::{AllocationPolicy, Budget},
    },
    errors::{Error, Result},
};

/// Spanish month names, indexed by `month - 1`. User-visible; the display
/// name format is `"{MonthName} {Year}"`.
const MONTH_NAMES: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

/// A materialized summary of one month: the inputs the month was computed
/// from plus every derived figure. Re-derivable at any time from the budget,
/// its expenses, and the accumulated savings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    /// Canonical month key (`"YYYY-MM"`)
    pub month: String,
    /// Calendar year
    pub year: i32,
    /// Localized display name, e.g. `"Enero 2024"`
    pub month_name: String,
    /// Net income for the month
    pub income: Money,
    /// The month's expense records
    pub expenses: Vec<Expense>,
    /// Budget amounts the month was planned with
    pub budget: Budget,
    /// Policy the budget was derived from
    pub config: AllocationPolicy,
    /// Savings principal carried over from prior periods
    pub accumulated_savings: Money,
    /// Spent per category
    pub totals: CategoryAmounts,
    /// Remaining per category (savings includes the carry-over)
    pub remaining: CategoryAmounts,
    /// Scalar sum of the three totals
    pub total_spent: Money,
    /// Scalar sum of the three remainders
    pub total_remaining: Money,
}

/// Display classification of a month's spending level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetStatus {
    /// At most 80% of the total budget spent
    Excellent,
    /// At most 95% of the total budget spent
    Good,
    /// More than 95% of the total budget spent
    Exceeded,
}

/// Canonical `"YYYY-MM"` key for a calendar date.
#[must_use]
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Month key for the current local calendar date.
#[must_use]
pub fn current_month_key() -> String {
    month_key(Local::now().date_naive())
}

/// Localized display name for a month key, e.g. `"2024-01"` -> `"Enero 2024"`.
pub fn month_display_name(key: &str) -> Result<String> {
    let (year, month) = key.split_once('-').ok_or_else(|| Error::Validation {
        message: format!("malformed month key '{key}'"),
    })?;
    let month_index: usize = month
        .parse::<usize>()
        .ok()
        .and_then(|m| m.checked_sub(1))
        .filter(|m| *m < 12)
        .ok_or_else(|| Error::Validation {
            message: format!("malformed month key '{key}'"),
        })?;

    Ok(format!("{} {year}", MONTH_NAMES[month_index]))
}

/// Builds the summary for one month by running the ledger aggregator over
/// the month's expenses and budget.
///
/// # Errors
/// Fails with [`Error::Validation`] when the month key is malformed.
pub fn build_snapshot(
    config: AllocationPolicy,
    income: Money,
    budget: Budget,
    expenses: Vec<Expense>,
    accumulated_savings: Money,
    key: &str,
) -> Result<MonthlySummary> {
    let month_name = month_display_name(key)?;
    let year = key
        .split_once('-')
        .and_then(|(y, _)| y.parse::<i32>().ok())
        .ok_or_else(|| Error::Validation {
            message: format!("malformed month key '{key}'"),
        })?;

    let totals = ledger::compute_totals(&expenses);
    let remaining = ledger::compute_remaining(&budget, &totals, accumulated_savings);

    Ok(MonthlySummary {
        month: key.to_string(),
        year,
        month_name,
        income,
        expenses,
        budget,
        config,
        accumulated_savings,
        totals,
        remaining,
        total_spent: totals.total(),
        total_remaining: remaining.total(),
    })
}

/// Inserts a snapshot into the history, replacing any entry with the same
/// month key, then orders the list most-recent-first.
///
/// Upserting the same snapshot twice yields the same list as upserting it
/// once.
#[must_use]
pub fn upsert_history(
    mut history: Vec<MonthlySummary>,
    snapshot: MonthlySummary,
) -> Vec<MonthlySummary> {
    match history.iter_mut().find(|m| m.month == snapshot.month) {
        Some(existing) => *existing = snapshot,
        None => history.push(snapshot),
    }

    // Descending lexicographic sort is chronological for "YYYY-MM" keys.
    history.sort_by(|a, b| b.month.cmp(&a.month));
    history
}

/// Fraction of the total budget spent, in `[0, 1]` under normal spending.
///
/// Returns `None` for a zero total budget; callers must guard that month
/// before classifying it.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percentage_used(total_spent: Money, budget: &Budget) -> Option<f64> {
    let total_budget = budget.total();
    if total_budget == 0 {
        return None;
    }
    Some(total_spent as f64 / total_budget as f64)
}

impl BudgetStatus {
    /// Classifies a spent fraction as produced by [`percentage_used`].
    #[must_use]
    pub fn classify(fraction_used: f64) -> Self {
        if fraction_used <= 0.80 {
            Self::Excellent
        } else if fraction_used <= 0.95 {
            Self::Good
        } else {
            Self::Exceeded
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::policy::DEFAULT_POLICY;

    fn snapshot_for(key: &str) -> MonthlySummary {
        let budget = Budget {
            needs: 500,
            wants: 300,
            savings: 200,
        };
        build_snapshot(DEFAULT_POLICY, 1_000, budget, Vec::new(), 0, key).unwrap()
    }

    #[test]
    fn test_month_key_zero_pads() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(month_key(date), "2024-03");

        let date = NaiveDate::from_ymd_opt(2024, 11, 30).unwrap();
        assert_eq!(month_key(date), "2024-11");
    }

    #[test]
    fn test_month_display_name_table() {
        assert_eq!(month_display_name("2024-01").unwrap(), "Enero 2024");
        assert_eq!(month_display_name("2024-09").unwrap(), "Septiembre 2024");
        assert_eq!(month_display_name("2023-12").unwrap(), "Diciembre 2023");
    }

    #[test]
    fn test_month_display_name_rejects_malformed_keys() {
        assert!(month_display_name("2024").is_err());
        assert!(month_display_name("2024-13").is_err());
        assert!(month_display_name("2024-00").is_err());
        assert!(month_display_name("2024-xx").is_err());
    }

    #[test]
    fn test_build_snapshot_derives_scalars() {
        let budget = Budget {
            needs: 500,
            wants: 300,
            savings: 200,
        };
        let expenses = vec![Expense {
            id: "1".to_string(),
            category: crate::core::ledger::Category::Needs,
            subcategory: "Vivienda".to_string(),
            description: String::new(),
            amount: 400,
            date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
        }];

        let summary =
            build_snapshot(DEFAULT_POLICY, 1_000, budget, expenses, 50, "2024-05").unwrap();

        assert_eq!(summary.month_name, "Mayo 2024");
        assert_eq!(summary.year, 2024);
        assert_eq!(summary.total_spent, 400);
        // needs 100 + wants 300 + savings (200 + 50) = 650
        assert_eq!(summary.total_remaining, 650);
    }

    #[test]
    fn test_upsert_history_appends_new_month() {
        let history = upsert_history(Vec::new(), snapshot_for("2024-01"));
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].month, "2024-01");
    }

    #[test]
    fn test_upsert_history_is_idempotent() {
        let history = upsert_history(Vec::new(), snapshot_for("2024-01"));
        let mut replacement = snapshot_for("2024-01");
        replacement.income = 2_000;

        let history = upsert_history(history, replacement.clone());
        let history = upsert_history(history, replacement);

        assert_eq!(history.len(), 1);
        assert_eq!(history[0].income, 2_000);
    }

    #[test]
    fn test_upsert_history_orders_most_recent_first() {
        let history = upsert_history(Vec::new(), snapshot_for("2024-01"));
        let history = upsert_history(history, snapshot_for("2024-03"));
        let history = upsert_history(history, snapshot_for("2024-02"));

        let keys: Vec<&str> = history.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(keys, vec!["2024-03", "2024-02", "2024-01"]);
    }

    #[test]
    fn test_upsert_history_orders_across_years() {
        let history = upsert_history(Vec::new(), snapshot_for("2023-12"));
        let history = upsert_history(history, snapshot_for("2024-01"));

        assert_eq!(history[0].month, "2024-01");
        assert_eq!(history[1].month, "2023-12");
    }

    #[test]
    fn test_percentage_used_zero_budget_is_guarded() {
        let budget = Budget {
            needs: 0,
            wants: 0,
            savings: 0,
        };
        assert!(percentage_used(100, &budget).is_none());
    }

    #[test]
    fn test_status_classification_bands() {
        let budget = Budget {
            needs: 500,
            wants: 300,
            savings: 200,
        };

        let used = percentage_used(800, &budget).unwrap();
        assert_eq!(BudgetStatus::classify(used), BudgetStatus::Excellent);

        let used = percentage_used(950, &budget).unwrap();
        assert_eq!(BudgetStatus::classify(used), BudgetStatus::Good);

        let used = percentage_used(951, &budget).unwrap();
        assert_eq!(BudgetStatus::classify(used), BudgetStatus::Exceeded);
    }
}
