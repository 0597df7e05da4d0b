//! Expense-domain handlers.
//!
//! Each handler maps one user operation onto the matching core function:
//! setup stores a policy, budget creation derives and persists the month's
//! amounts, expense add/delete mutate records and their cached summary
//! atomically, and reset tears the expense domain down.

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};

use crate::{
    core::{
        expense::{self, ExpenseData, NewExpense},
        ledger::Expense,
        policy::{self, AllocationPolicy},
    },
    entities::monthly_budget,
    errors::Error,
};

use super::{
    auth::CurrentUser,
    routes::AppState,
    types::{ApiResponse, ApiResult, CreateBudgetRequest, RecommendationQuery, validate_policy},
};

/// `GET /api/expense/data` - the full view a client renders from.
pub async fn get_data(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<ExpenseData> {
    let data = expense::get_user_expense_data(&state.db, user.id).await?;
    Ok(ApiResponse::ok("Datos obtenidos correctamente", data))
}

/// `GET /api/expense/recommendation` - suggested split for a net income.
pub async fn recommendation(
    Query(query): Query<RecommendationQuery>,
) -> ApiResult<AllocationPolicy> {
    let policy = policy::recommend_policy(query.net_income);
    Ok(ApiResponse::ok("Recomendación calculada", policy))
}

/// `POST /api/expense/config` - stores a new allocation policy.
///
/// The percentages-sum-to-100 rule is enforced here, before anything is
/// written; storage itself does not re-check it.
pub async fn create_config(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(policy): Json<AllocationPolicy>,
) -> ApiResult<AllocationPolicy> {
    validate_policy(&policy)?;
    expense::create_expense_config(&state.db, user.id, policy).await?;
    Ok(ApiResponse::ok("Configuración creada correctamente", policy))
}

/// `POST /api/expense/budget` - creates the current month's budget from the
/// stored current policy. Rejects a duplicate month with the 409 envelope.
pub async fn create_budget(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(request): Json<CreateBudgetRequest>,
) -> ApiResult<monthly_budget::Model> {
    let policy = expense::current_policy(&state.db, user.id)
        .await?
        .ok_or_else(|| Error::NotFound {
            what: "expense configuration".to_string(),
        })?;

    let budget = expense::create_monthly_budget(
        &state.db,
        user.id,
        request.income,
        &policy,
        request.accumulated_savings,
    )
    .await?;

    Ok(ApiResponse::ok(
        "Presupuesto mensual creado correctamente",
        budget,
    ))
}

/// `POST /api/expense` - records an expense against the current month.
pub async fn add_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Json(new_expense): Json<NewExpense>,
) -> ApiResult<Expense> {
    let recorded = expense::add_expense(&state.db, user.id, new_expense).await?;
    Ok(ApiResponse::ok("Gasto agregado correctamente", recorded))
}

/// `DELETE /api/expense/:id` - deletes one of the requester's expenses.
pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Path(expense_id): Path<i32>,
) -> ApiResult<()> {
    expense::delete_expense(&state.db, user.id, expense_id).await?;
    Ok(ApiResponse::ok_empty("Gasto eliminado correctamente"))
}

/// `POST /api/expense/reset` - destructive: removes the requester's entire
/// expense domain, returning them to the unconfigured state.
pub async fn reset(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<()> {
    expense::reset_expense_data(&state.db, user.id).await?;
    Ok(ApiResponse::ok_empty("Datos reiniciados correctamente"))
}
