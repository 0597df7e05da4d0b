//! Wire types for the JSON API.
//!
//! Every endpoint responds with the same tagged envelope so clients can
//! branch on `success` without inspecting status codes, mirroring the
//! structured-result propagation policy: errors cross the boundary as data,
//! never as partial payloads.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    core::{expense::Income, ledger::Money, policy::AllocationPolicy},
    errors::Error,
};

/// The response envelope: `success` plus a human-readable message, with
/// `data` present only on success.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the operation succeeded
    pub success: bool,
    /// Human-readable outcome message
    pub message: String,
    /// Payload, omitted on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// A successful response with a payload.
    pub fn ok(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data: Some(data),
        })
    }

    /// A successful response with no payload.
    pub fn ok_empty(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data: None,
        })
    }
}

/// Login payload.
#[derive(Clone, Debug, Deserialize)]
pub struct LoginRequest {
    /// Login email
    pub email: String,
    /// Plaintext password
    pub password: String,
}

/// Session issued after register/login.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    /// Bearer token for subsequent requests
    pub token: String,
    /// The authenticated user
    pub user: UserSummary,
}

/// Public view of a user account.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    /// User id
    pub id: i32,
    /// First name
    pub name: String,
    /// Last name
    pub last_name: String,
    /// Login email
    pub email: String,
}

/// Monthly budget creation payload. The allocation policy is the user's
/// stored current policy, not client-supplied.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBudgetRequest {
    /// Net income for the month
    pub income: Income,
    /// Savings principal carried over from prior periods
    #[serde(default)]
    pub accumulated_savings: Money,
}

/// Query for a policy recommendation.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationQuery {
    /// Net income to recommend a split for
    pub net_income: Money,
}

/// Checks that a submitted policy's percentages sum to exactly 100.
///
/// This is the entry-form rule enforced at the boundary; neither the policy
/// engine nor storage re-checks it.
pub fn validate_policy(policy: &AllocationPolicy) -> Result<(), Error> {
    let sum = u32::from(policy.needs_percentage)
        + u32::from(policy.wants_percentage)
        + u32::from(policy.savings_percentage);
    if sum == 100 {
        Ok(())
    } else {
        Err(Error::Validation {
            message: format!("allocation percentages must sum to 100, got {sum}"),
        })
    }
}

/// Error wrapper that renders as the failure envelope with a matching
/// status code.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::Unauthenticated | Error::Token(_) => StatusCode::UNAUTHORIZED,
            Error::Unauthorized { .. } => StatusCode::FORBIDDEN,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::AlreadyExists { .. } => StatusCode::CONFLICT,
            Error::Validation { .. } => StatusCode::BAD_REQUEST,
            Error::InconsistentState { .. }
            | Error::Database(_)
            | Error::Config { .. }
            | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            warn!(error = %self.0, "request failed");
        }

        let body = ApiResponse::<()> {
            success: false,
            message: self.0.to_string(),
            data: None,
        };
        (status, Json(body)).into_response()
    }
}

/// Handler result alias.
pub type ApiResult<T> = std::result::Result<Json<ApiResponse<T>>, ApiError>;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_validate_policy_accepts_exact_sum() {
        let policy = AllocationPolicy {
            needs_percentage: 50,
            wants_percentage: 30,
            savings_percentage: 20,
        };
        assert!(validate_policy(&policy).is_ok());
    }

    #[test]
    fn test_validate_policy_rejects_other_sums() {
        let policy = AllocationPolicy {
            needs_percentage: 50,
            wants_percentage: 30,
            savings_percentage: 30,
        };
        assert!(matches!(
            validate_policy(&policy),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn test_failure_envelope_omits_data() {
        let body = ApiResponse::<()> {
            success: false,
            message: "no active session".to_string(),
            data: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_success_envelope_field_names() {
        let Json(body) = ApiResponse::ok("listo", 7);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "listo");
        assert_eq!(json["data"], 7);
    }
}
