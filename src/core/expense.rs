//! Expense-domain operations.
//!
//! Drives the pure policy/ledger/history logic against the persistence
//! gateway. Every mutating operation here is atomic with respect to its own
//! record set: budget creation, expense add, and expense delete each run
//! inside one database transaction, and the cached monthly summary is
//! recomputed within the same transaction so a failed mutation never leaves
//! a stale aggregate behind.

use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    core::{
        history::{self, MonthlySummary},
        ledger::{self, Category, Expense, Money},
        policy::{self, AllocationPolicy, Budget},
    },
    entities::{expense, expense_config, monthly_budget, monthly_data},
    errors::{Error, Result},
};

/// Net income wrapper, kept as an object for wire-format compatibility.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Income {
    /// Net (after-tax) income
    pub net: Money,
}

/// A new expense as submitted by the user, before it has an id or an owning
/// budget.
#[derive(Clone, Debug, Deserialize)]
pub struct NewExpense {
    /// Budget category
    pub category: Category,
    /// Free-form label within the category
    pub subcategory: String,
    /// Optional description
    pub description: Option<String>,
    /// Positive amount in whole currency units
    pub amount: Money,
    /// Calendar date of the expense
    pub date: NaiveDate,
}

/// The canonical value shape emitted to API clients: the user's current
/// policy, month, expenses, and full monthly history.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseData {
    /// Current allocation policy
    pub config: AllocationPolicy,
    /// Net income of the current month
    pub income: Income,
    /// Current month's budget amounts
    pub budget: Budget,
    /// Current month's expenses, newest first
    pub expenses: Vec<Expense>,
    /// Savings principal carried into the current month
    pub accumulated_savings: Money,
    /// Monthly history, most recent month first
    pub monthly_history: Vec<MonthlySummary>,
    /// When this view was assembled
    pub last_updated: chrono::DateTime<Utc>,
}

fn to_expense_dto(model: expense::Model) -> Result<Expense> {
    Ok(Expense {
        id: model.id.to_string(),
        category: Category::from_str(&model.category)?,
        subcategory: model.subcategory,
        description: model.description.unwrap_or_default(),
        amount: model.amount,
        date: model.date,
    })
}

fn to_policy(model: &expense_config::Model) -> Result<AllocationPolicy> {
    let pct = |value: i32, which: &str| -> Result<u8> {
        u8::try_from(value).map_err(|_| Error::InconsistentState {
            message: format!("stored {which} percentage {value} is out of range"),
        })
    };
    Ok(AllocationPolicy {
        needs_percentage: pct(model.needs_percentage, "needs")?,
        wants_percentage: pct(model.wants_percentage, "wants")?,
        savings_percentage: pct(model.savings_percentage, "savings")?,
    })
}

const fn to_budget(model: &monthly_budget::Model) -> Budget {
    Budget {
        needs: model.needs_budget,
        wants: model.wants_budget,
        savings: model.savings_budget,
    }
}

/// Returns the user's current allocation policy: the most recently created
/// configuration row, or None when the user has not completed setup.
pub async fn current_policy(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Option<AllocationPolicy>> {
    let row = expense_config::Entity::find()
        .filter(expense_config::Column::UserId.eq(user_id))
        .order_by_desc(expense_config::Column::CreatedAt)
        .order_by_desc(expense_config::Column::Id)
        .one(db)
        .await?;

    row.as_ref().map(to_policy).transpose()
}

/// Stores a new allocation policy row for the user. Reconfiguration
/// supersedes the previous policy; rows are never merged or updated.
pub async fn create_expense_config(
    db: &DatabaseConnection,
    user_id: i32,
    policy: AllocationPolicy,
) -> Result<expense_config::Model> {
    let config = expense_config::ActiveModel {
        user_id: Set(user_id),
        needs_percentage: Set(i32::from(policy.needs_percentage)),
        wants_percentage: Set(i32::from(policy.wants_percentage)),
        savings_percentage: Set(i32::from(policy.savings_percentage)),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let result = config.insert(db).await?;
    info!(user_id, "stored allocation policy");
    Ok(result)
}

/// Finds the user's budget for a given month key.
pub async fn find_monthly_budget<C>(
    conn: &C,
    user_id: i32,
    month_key: &str,
) -> Result<Option<monthly_budget::Model>>
where
    C: ConnectionTrait,
{
    monthly_budget::Entity::find()
        .filter(monthly_budget::Column::UserId.eq(user_id))
        .filter(monthly_budget::Column::Month.eq(month_key))
        .one(conn)
        .await
        .map_err(Into::into)
}

/// Creates the budget for the current month from an income and a policy.
///
/// At most one budget may exist per `(user, month)` pair: if one already
/// exists for the current month the call fails with `AlreadyExists` and the
/// existing record is left untouched. The exists-check and the insert run in
/// one transaction.
pub async fn create_monthly_budget(
    db: &DatabaseConnection,
    user_id: i32,
    income: Income,
    policy: &AllocationPolicy,
    accumulated_savings: Money,
) -> Result<monthly_budget::Model> {
    let month_key = history::current_month_key();
    let year = month_key
        .split_once('-')
        .and_then(|(y, _)| y.parse::<i32>().ok())
        .ok_or_else(|| Error::Validation {
            message: format!("malformed month key '{month_key}'"),
        })?;
    let budget = policy::compute_budget(income.net, policy);

    let txn = db.begin().await?;

    if find_monthly_budget(&txn, user_id, &month_key).await?.is_some() {
        return Err(Error::AlreadyExists {
            what: format!("monthly budget for {month_key}"),
        });
    }

    let model = monthly_budget::ActiveModel {
        user_id: Set(user_id),
        month: Set(month_key.clone()),
        year: Set(year),
        income: Set(income.net),
        needs_budget: Set(budget.needs),
        wants_budget: Set(budget.wants),
        savings_budget: Set(budget.savings),
        accumulated_savings: Set(accumulated_savings),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let result = model.insert(&txn).await?;
    txn.commit().await?;

    info!(user_id, month = %month_key, "created monthly budget");
    Ok(result)
}

/// Records an expense against the current month's budget and recomputes the
/// cached monthly summary, all in one transaction.
///
/// Fails with `NotFound` when no budget exists for the current month and
/// `Validation` for a non-positive amount or empty subcategory.
pub async fn add_expense(
    db: &DatabaseConnection,
    user_id: i32,
    new_expense: NewExpense,
) -> Result<Expense> {
    if new_expense.amount <= 0 {
        return Err(Error::Validation {
            message: format!("expense amount must be positive, got {}", new_expense.amount),
        });
    }
    if new_expense.subcategory.trim().is_empty() {
        return Err(Error::Validation {
            message: "expense subcategory cannot be empty".to_string(),
        });
    }

    let month_key = history::current_month_key();
    let txn = db.begin().await?;

    let budget = find_monthly_budget(&txn, user_id, &month_key)
        .await?
        .ok_or_else(|| Error::NotFound {
            what: format!("monthly budget for {month_key}"),
        })?;

    let model = expense::ActiveModel {
        user_id: Set(user_id),
        monthly_budget_id: Set(budget.id),
        category: Set(new_expense.category.as_str().to_string()),
        subcategory: Set(new_expense.subcategory.trim().to_string()),
        description: Set(new_expense.description),
        amount: Set(new_expense.amount),
        date: Set(new_expense.date),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let inserted = model.insert(&txn).await?;
    recompute_monthly_data(&txn, budget.id).await?;
    txn.commit().await?;

    info!(user_id, expense_id = inserted.id, "recorded expense");
    to_expense_dto(inserted)
}

/// Deletes one of the user's expenses and recomputes the owning month's
/// cached summary, in one transaction.
///
/// Fails with `NotFound` when the expense is absent or owned by another
/// user; the ownership filter keeps one user from deleting another's record.
pub async fn delete_expense(db: &DatabaseConnection, user_id: i32, expense_id: i32) -> Result<()> {
    let txn = db.begin().await?;

    let record = expense::Entity::find_by_id(expense_id)
        .filter(expense::Column::UserId.eq(user_id))
        .one(&txn)
        .await?
        .ok_or_else(|| Error::NotFound {
            what: format!("expense {expense_id}"),
        })?;

    let monthly_budget_id = record.monthly_budget_id;
    record.delete(&txn).await?;
    recompute_monthly_data(&txn, monthly_budget_id).await?;
    txn.commit().await?;

    info!(user_id, expense_id, "deleted expense");
    Ok(())
}

/// Recomputes the materialized monthly summary for a budget and upserts it.
///
/// This is a pure projection over (budget, its expenses, accumulated
/// savings); it is recomputed from scratch on every write rather than
/// incrementally maintained. A recompute whose parent budget is missing is a
/// hard `InconsistentState` failure, surfaced to the caller, never retried.
pub async fn recompute_monthly_data<C>(conn: &C, monthly_budget_id: i32) -> Result<()>
where
    C: ConnectionTrait,
{
    let budget_row = monthly_budget::Entity::find_by_id(monthly_budget_id)
        .one(conn)
        .await?
        .ok_or_else(|| Error::InconsistentState {
            message: format!("monthly budget {monthly_budget_id} vanished during recompute"),
        })?;

    let expenses = expense::Entity::find()
        .filter(expense::Column::MonthlyBudgetId.eq(monthly_budget_id))
        .all(conn)
        .await?
        .into_iter()
        .map(to_expense_dto)
        .collect::<Result<Vec<_>>>()?;

    let budget = to_budget(&budget_row);
    let totals = ledger::compute_totals(&expenses);
    let remaining = ledger::compute_remaining(&budget, &totals, budget_row.accumulated_savings);
    let month_name = history::month_display_name(&budget_row.month)?;

    let existing = monthly_data::Entity::find()
        .filter(monthly_data::Column::MonthlyBudgetId.eq(monthly_budget_id))
        .one(conn)
        .await?;

    if let Some(row) = existing {
        let mut active: monthly_data::ActiveModel = row.into();
        active.needs_total = Set(totals.needs);
        active.wants_total = Set(totals.wants);
        active.savings_total = Set(totals.savings);
        active.needs_remaining = Set(remaining.needs);
        active.wants_remaining = Set(remaining.wants);
        active.savings_remaining = Set(remaining.savings);
        active.total_spent = Set(totals.total());
        active.total_remaining = Set(remaining.total());
        active.update(conn).await?;
    } else {
        let row = monthly_data::ActiveModel {
            user_id: Set(budget_row.user_id),
            monthly_budget_id: Set(monthly_budget_id),
            month: Set(budget_row.month.clone()),
            year: Set(budget_row.year),
            month_name: Set(month_name),
            income: Set(budget_row.income),
            needs_total: Set(totals.needs),
            wants_total: Set(totals.wants),
            savings_total: Set(totals.savings),
            needs_remaining: Set(remaining.needs),
            wants_remaining: Set(remaining.wants),
            savings_remaining: Set(remaining.savings),
            total_spent: Set(totals.total()),
            total_remaining: Set(remaining.total()),
            ..Default::default()
        };
        row.insert(conn).await?;
    }

    Ok(())
}

/// Assembles the full view a client consumes: current policy, current-month
/// budget and expenses, and the complete monthly history rebuilt from source
/// rows (not from the cached summaries, which exist for direct queries).
///
/// Fails with `NotFound` when the user has no policy or no budget for the
/// current month - that is the "setup required" signal.
pub async fn get_user_expense_data(db: &DatabaseConnection, user_id: i32) -> Result<ExpenseData> {
    let month_key = history::current_month_key();

    let config = current_policy(db, user_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            what: "expense configuration".to_string(),
        })?;

    let current_budget = find_monthly_budget(db, user_id, &month_key)
        .await?
        .ok_or_else(|| Error::NotFound {
            what: format!("monthly budget for {month_key}"),
        })?;

    let current_expenses = expense::Entity::find()
        .filter(expense::Column::MonthlyBudgetId.eq(current_budget.id))
        .order_by_desc(expense::Column::Date)
        .order_by_desc(expense::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(to_expense_dto)
        .collect::<Result<Vec<_>>>()?;

    let budgets = monthly_budget::Entity::find()
        .filter(monthly_budget::Column::UserId.eq(user_id))
        .all(db)
        .await?;

    let mut monthly_history = Vec::new();
    for budget_row in &budgets {
        let month_expenses = expense::Entity::find()
            .filter(expense::Column::MonthlyBudgetId.eq(budget_row.id))
            .order_by_desc(expense::Column::Date)
            .all(db)
            .await?
            .into_iter()
            .map(to_expense_dto)
            .collect::<Result<Vec<_>>>()?;

        let snapshot = history::build_snapshot(
            config,
            budget_row.income,
            to_budget(budget_row),
            month_expenses,
            budget_row.accumulated_savings,
            &budget_row.month,
        )?;
        monthly_history = history::upsert_history(monthly_history, snapshot);
    }

    Ok(ExpenseData {
        config,
        income: Income {
            net: current_budget.income,
        },
        budget: to_budget(&current_budget),
        expenses: current_expenses,
        accumulated_savings: current_budget.accumulated_savings,
        monthly_history,
        last_updated: Utc::now(),
    })
}

/// Deletes every expense-domain record the user owns, atomically, in an
/// order that respects foreign keys: expenses and cached summaries first,
/// then budgets, then configuration rows. The user account itself survives;
/// afterwards the user is back in the "no configuration" state.
pub async fn reset_expense_data(db: &DatabaseConnection, user_id: i32) -> Result<()> {
    let txn = db.begin().await?;

    expense::Entity::delete_many()
        .filter(expense::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    monthly_data::Entity::delete_many()
        .filter(monthly_data::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    monthly_budget::Entity::delete_many()
        .filter(monthly_budget::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    expense_config::Entity::delete_many()
        .filter(expense_config::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;
    info!(user_id, "reset expense data");
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        core::policy::DEFAULT_POLICY,
        entities,
        test_utils::{create_test_user, new_test_expense, setup_test_db, setup_with_budget},
    };

    #[tokio::test]
    async fn test_current_policy_none_before_setup() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "nadie@example.com").await?;

        assert!(current_policy(&db, user.id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_current_policy_latest_row_wins() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "ana@example.com").await?;

        create_expense_config(&db, user.id, DEFAULT_POLICY).await?;
        let newer = AllocationPolicy {
            needs_percentage: 70,
            wants_percentage: 20,
            savings_percentage: 10,
        };
        create_expense_config(&db, user.id, newer).await?;

        assert_eq!(current_policy(&db, user.id).await?, Some(newer));
        Ok(())
    }

    #[tokio::test]
    async fn test_create_monthly_budget_derives_amounts() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "ana@example.com").await?;

        let budget =
            create_monthly_budget(&db, user.id, Income { net: 1_000_000 }, &DEFAULT_POLICY, 0)
                .await?;

        assert_eq!(budget.needs_budget, 500_000);
        assert_eq!(budget.wants_budget, 300_000);
        assert_eq!(budget.savings_budget, 200_000);
        assert_eq!(budget.month, history::current_month_key());
        Ok(())
    }

    #[tokio::test]
    async fn test_duplicate_monthly_budget_rejected() -> Result<()> {
        let (db, user, original) = setup_with_budget().await?;

        let result =
            create_monthly_budget(&db, user.id, Income { net: 999 }, &DEFAULT_POLICY, 0).await;
        assert!(matches!(result, Err(Error::AlreadyExists { .. })));

        // The existing record must be untouched
        let kept = entities::MonthlyBudget::find_by_id(original.id)
            .one(&db)
            .await?
            .unwrap();
        assert_eq!(kept.income, original.income);
        assert_eq!(kept.needs_budget, original.needs_budget);
        Ok(())
    }

    #[tokio::test]
    async fn test_add_expense_requires_budget() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "ana@example.com").await?;

        let result = add_expense(&db, user.id, new_test_expense(Category::Needs, 100)).await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_add_expense_validates_amount() -> Result<()> {
        let (db, user, _budget) = setup_with_budget().await?;

        let result = add_expense(&db, user.id, new_test_expense(Category::Needs, 0)).await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let result = add_expense(&db, user.id, new_test_expense(Category::Needs, -5)).await;
        assert!(matches!(result, Err(Error::Validation { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_add_expense_recomputes_monthly_data() -> Result<()> {
        let (db, user, budget) = setup_with_budget().await?;

        add_expense(&db, user.id, new_test_expense(Category::Needs, 120)).await?;
        add_expense(&db, user.id, new_test_expense(Category::Savings, 50)).await?;

        let data = entities::MonthlyData::find()
            .filter(entities::MonthlyDataColumn::MonthlyBudgetId.eq(budget.id))
            .one(&db)
            .await?
            .unwrap();

        assert_eq!(data.needs_total, 120);
        assert_eq!(data.savings_total, 50);
        assert_eq!(data.total_spent, 170);
        assert_eq!(data.needs_remaining, budget.needs_budget - 120);
        assert_eq!(
            data.savings_remaining,
            budget.savings_budget - 50 + budget.accumulated_savings
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_expense_recomputes_monthly_data() -> Result<()> {
        let (db, user, budget) = setup_with_budget().await?;

        let kept = add_expense(&db, user.id, new_test_expense(Category::Wants, 80)).await?;
        let dropped = add_expense(&db, user.id, new_test_expense(Category::Wants, 20)).await?;

        delete_expense(&db, user.id, dropped.id.parse().unwrap()).await?;

        let data = entities::MonthlyData::find()
            .filter(entities::MonthlyDataColumn::MonthlyBudgetId.eq(budget.id))
            .one(&db)
            .await?
            .unwrap();
        assert_eq!(data.wants_total, 80);
        assert_eq!(data.total_spent, 80);

        // The kept expense is still there
        let remaining = entities::Expense::find_by_id(kept.id.parse::<i32>().unwrap())
            .one(&db)
            .await?;
        assert!(remaining.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_expense_enforces_ownership() -> Result<()> {
        let (db, owner, _budget) = setup_with_budget().await?;
        let other = create_test_user(&db, "otro@example.com").await?;

        let recorded = add_expense(&db, owner.id, new_test_expense(Category::Needs, 10)).await?;
        let expense_id: i32 = recorded.id.parse().unwrap();

        let result = delete_expense(&db, other.id, expense_id).await;
        assert!(matches!(result, Err(Error::NotFound { .. })));

        // Still present for the rightful owner
        assert!(
            entities::Expense::find_by_id(expense_id)
                .one(&db)
                .await?
                .is_some()
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_recompute_missing_budget_is_inconsistent_state() -> Result<()> {
        let db = setup_test_db().await?;

        let result = recompute_monthly_data(&db, 4_242).await;
        assert!(matches!(result, Err(Error::InconsistentState { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_get_user_expense_data_shape() -> Result<()> {
        let (db, user, budget) = setup_with_budget().await?;
        add_expense(&db, user.id, new_test_expense(Category::Needs, 200)).await?;

        let data = get_user_expense_data(&db, user.id).await?;

        assert_eq!(data.income.net, budget.income);
        assert_eq!(data.budget.needs, budget.needs_budget);
        assert_eq!(data.expenses.len(), 1);
        assert_eq!(data.monthly_history.len(), 1);
        assert_eq!(data.monthly_history[0].month, budget.month);
        assert_eq!(data.monthly_history[0].totals.needs, 200);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_user_expense_data_requires_setup() -> Result<()> {
        let db = setup_test_db().await?;
        let user = create_test_user(&db, "ana@example.com").await?;

        let result = get_user_expense_data(&db, user.id).await;
        assert!(matches!(result, Err(Error::NotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_reset_expense_data_cascades() -> Result<()> {
        let (db, user, _budget) = setup_with_budget().await?;
        add_expense(&db, user.id, new_test_expense(Category::Wants, 60)).await?;

        reset_expense_data(&db, user.id).await?;

        // Direct re-query of all four tables
        assert_eq!(
            entities::Expense::find()
                .filter(entities::ExpenseColumn::UserId.eq(user.id))
                .count(&db)
                .await?,
            0
        );
        assert_eq!(
            entities::MonthlyData::find()
                .filter(entities::MonthlyDataColumn::UserId.eq(user.id))
                .count(&db)
                .await?,
            0
        );
        assert_eq!(
            entities::MonthlyBudget::find()
                .filter(entities::MonthlyBudgetColumn::UserId.eq(user.id))
                .count(&db)
                .await?,
            0
        );
        assert_eq!(
            entities::ExpenseConfig::find()
                .filter(entities::ExpenseConfigColumn::UserId.eq(user.id))
                .count(&db)
                .await?,
            0
        );

        // The account itself survives a reset
        assert!(entities::User::find_by_id(user.id).one(&db).await?.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_reset_does_not_touch_other_users() -> Result<()> {
        let (db, first, _budget) = setup_with_budget().await?;
        let second = create_test_user(&db, "otra@example.com").await?;
        create_expense_config(&db, second.id, DEFAULT_POLICY).await?;

        reset_expense_data(&db, first.id).await?;

        assert!(current_policy(&db, second.id).await?.is_some());
        Ok(())
    }
}
