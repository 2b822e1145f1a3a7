//! Credit management routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;
use validator::Validate;

use crate::{AppState, middleware::CurrentUser};
use tally_db::repositories::{
    CreateCreditInput, CreditError, CreditFilter, CreditRepository, UpdateCreditInput,
};
use tally_shared::types::pagination::QueryOptions;

/// Creates the credit routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/credits", post(create_credit))
        .route("/credits", get(list_credits))
        .route("/credits/{credit_id}", get(get_credit))
        .route("/credits/{credit_id}", patch(update_credit))
        .route("/credits/{credit_id}", delete(delete_credit))
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for creating a credit.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCreditRequest {
    /// Account that the credit belongs to.
    #[validate(length(min = 1, message = "accountId must not be empty"))]
    pub account_id: String,
    /// Who paid the credit.
    #[validate(length(min = 1, message = "from must not be empty"))]
    pub from: String,
    /// Explanation of the credit.
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,
    /// Amount of the credit.
    pub amount: Decimal,
    /// When the credit happened.
    pub date: DateTime<FixedOffset>,
}

/// Request body for updating a credit. At least one field must be supplied.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCreditRequest {
    /// Who paid the credit.
    #[validate(length(min = 1, message = "from must not be empty"))]
    pub from: Option<String>,
    /// Explanation of the credit.
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: Option<String>,
    /// Amount of the credit.
    pub amount: Option<Decimal>,
    /// When the credit happened.
    pub date: Option<DateTime<FixedOffset>>,
}

/// Query parameters for listing credits.
///
/// Deserialization doubles as the filter whitelist: only these keys ever
/// reach the repository, and absent keys stay absent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCreditsQuery {
    /// Match on counterparty.
    pub from: Option<String>,
    /// Match on amount.
    pub amount: Option<Decimal>,
    /// Match on occurrence date.
    pub date: Option<DateTime<FixedOffset>>,
    /// Sort specification, e.g. `amount:desc,date`.
    pub sort_by: Option<String>,
    /// Page size.
    pub limit: Option<i64>,
    /// Page number (1-indexed).
    pub page: Option<i64>,
}

impl ListCreditsQuery {
    /// Splits the raw query into the filter and the pagination options.
    fn into_parts(self) -> (CreditFilter, QueryOptions) {
        let filter = CreditFilter {
            from: self.from,
            amount: self.amount,
            date: self.date,
        };
        let options = QueryOptions {
            sort_by: self.sort_by,
            limit: self.limit,
            page: self.page,
        };
        (filter, options)
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/credits` - Create a new credit.
async fn create_credit(
    State(state): State<AppState>,
    auth: CurrentUser,
    Json(payload): Json<CreateCreditRequest>,
) -> impl IntoResponse {
    if let Err(errors) = payload.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": errors.to_string()
            })),
        )
            .into_response();
    }

    let repo = CreditRepository::new((*state.db).clone());

    let input = CreateCreditInput {
        account_id: payload.account_id,
        from: payload.from,
        description: payload.description,
        amount: payload.amount,
        date: payload.date,
    };

    match repo.create(input).await {
        Ok(credit) => {
            info!(
                credit_id = %credit.id,
                user_id = %auth.user_id(),
                "Credit created"
            );
            (StatusCode::CREATED, Json(credit)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create credit");
            internal_error()
        }
    }
}

/// GET `/credits` - List credits with filters and pagination.
async fn list_credits(
    State(state): State<AppState>,
    Query(query): Query<ListCreditsQuery>,
) -> impl IntoResponse {
    let repo = CreditRepository::new((*state.db).clone());
    let (filter, options) = query.into_parts();

    match repo.query(filter, &options).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list credits");
            internal_error()
        }
    }
}

/// GET `/credits/{credit_id}` - Get a single credit.
async fn get_credit(
    State(state): State<AppState>,
    Path(credit_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = CreditRepository::new((*state.db).clone());

    match repo.find_by_id(credit_id).await {
        Ok(Some(credit)) => (StatusCode::OK, Json(credit)).into_response(),
        Ok(None) => not_found(),
        Err(e) => {
            error!(error = %e, "Failed to get credit");
            internal_error()
        }
    }
}

/// PATCH `/credits/{credit_id}` - Partially update a credit.
async fn update_credit(
    State(state): State<AppState>,
    auth: CurrentUser,
    Path(credit_id): Path<Uuid>,
    Json(payload): Json<UpdateCreditRequest>,
) -> impl IntoResponse {
    if let Err(errors) = payload.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": errors.to_string()
            })),
        )
            .into_response();
    }

    let input = UpdateCreditInput {
        from: payload.from,
        description: payload.description,
        amount: payload.amount,
        date: payload.date,
    };

    if input.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "empty_update",
                "message": "At least one field must be provided"
            })),
        )
            .into_response();
    }

    let repo = CreditRepository::new((*state.db).clone());

    match repo.update(credit_id, input).await {
        Ok(credit) => {
            info!(
                credit_id = %credit_id,
                user_id = %auth.user_id(),
                "Credit updated"
            );
            (StatusCode::OK, Json(credit)).into_response()
        }
        Err(CreditError::NotFound(_)) => not_found(),
        Err(e) => {
            error!(error = %e, "Failed to update credit");
            internal_error()
        }
    }
}

/// DELETE `/credits/{credit_id}` - Delete a credit.
async fn delete_credit(
    State(state): State<AppState>,
    auth: CurrentUser,
    Path(credit_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = CreditRepository::new((*state.db).clone());

    match repo.delete(credit_id).await {
        Ok(_) => {
            info!(
                credit_id = %credit_id,
                user_id = %auth.user_id(),
                "Credit deleted"
            );
            (StatusCode::NO_CONTENT, ()).into_response()
        }
        Err(CreditError::NotFound(_)) => not_found(),
        Err(e) => {
            error!(error = %e, "Failed to delete credit");
            internal_error()
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn not_found() -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "not_found",
            "message": "Credit not found"
        })),
    )
        .into_response()
}

fn internal_error() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": "An error occurred"
        })),
    )
        .into_response()
}
