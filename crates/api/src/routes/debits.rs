//! Debit management routes.
//!
//! Mirrors the credit routes with `to` as the counterparty field.

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
    CreateDebitInput, DebitError, DebitFilter, DebitRepository, UpdateDebitInput,
};
use tally_shared::types::pagination::QueryOptions;

/// Creates the debit routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/debits", post(create_debit))
        .route("/debits", get(list_debits))
        .route("/debits/{debit_id}", get(get_debit))
        .route("/debits/{debit_id}", patch(update_debit))
        .route("/debits/{debit_id}", delete(delete_debit))
}

// ============================================================================
// Request Types
// ============================================================================

/// Request body for creating a debit.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDebitRequest {
    /// Account that the debit belongs to.
    #[validate(length(min = 1, message = "accountId must not be empty"))]
    pub account_id: String,
    /// Who the debit was paid to.
    #[validate(length(min = 1, message = "to must not be empty"))]
    pub to: String,
    /// Explanation of the debit.
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,
    /// Amount of the debit.
    pub amount: Decimal,
    /// When the debit happened.
    pub date: DateTime<FixedOffset>,
}

/// Request body for updating a debit. At least one field must be supplied.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDebitRequest {
    /// Who the debit was paid to.
    #[validate(length(min = 1, message = "to must not be empty"))]
    pub to: Option<String>,
    /// Explanation of the debit.
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: Option<String>,
    /// Amount of the debit.
    pub amount: Option<Decimal>,
    /// When the debit happened.
    pub date: Option<DateTime<FixedOffset>>,
}

/// Query parameters for listing debits.
///
/// Deserialization doubles as the filter whitelist: only these keys ever
/// reach the repository, and absent keys stay absent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDebitsQuery {
    /// Match on counterparty.
    pub to: Option<String>,
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

impl ListDebitsQuery {
    /// Splits the raw query into the filter and the pagination options.
    fn into_parts(self) -> (DebitFilter, QueryOptions) {
        let filter = DebitFilter {
            to: self.to,
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

/// POST `/debits` - Create a new debit.
async fn create_debit(
    State(state): State<AppState>,
    auth: CurrentUser,
    Json(payload): Json<CreateDebitRequest>,
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

    let repo = DebitRepository::new((*state.db).clone());

    let input = CreateDebitInput {
        account_id: payload.account_id,
        to: payload.to,
        description: payload.description,
        amount: payload.amount,
        date: payload.date,
    };

    match repo.create(input).await {
        Ok(debit) => {
            info!(
                debit_id = %debit.id,
                user_id = %auth.user_id(),
                "Debit created"
            );
            (StatusCode::CREATED, Json(debit)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create debit");
            internal_error()
        }
    }
}

/// GET `/debits` - List debits with filters and pagination.
async fn list_debits(
    State(state): State<AppState>,
    Query(query): Query<ListDebitsQuery>,
) -> impl IntoResponse {
    let repo = DebitRepository::new((*state.db).clone());
    let (filter, options) = query.into_parts();

    match repo.query(filter, &options).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list debits");
            internal_error()
        }
    }
}

/// GET `/debits/{debit_id}` - Get a single debit.
async fn get_debit(
    State(state): State<AppState>,
    Path(debit_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = DebitRepository::new((*state.db).clone());

    match repo.find_by_id(debit_id).await {
        Ok(Some(debit)) => (StatusCode::OK, Json(debit)).into_response(),
        Ok(None) => not_found(),
        Err(e) => {
            error!(error = %e, "Failed to get debit");
            internal_error()
        }
    }
}

/// PATCH `/debits/{debit_id}` - Partially update a debit.
async fn update_debit(
    State(state): State<AppState>,
    auth: CurrentUser,
    Path(debit_id): Path<Uuid>,
    Json(payload): Json<UpdateDebitRequest>,
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

    let input = UpdateDebitInput {
        to: payload.to,
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

    let repo = DebitRepository::new((*state.db).clone());

    match repo.update(debit_id, input).await {
        Ok(debit) => {
            info!(
                debit_id = %debit_id,
                user_id = %auth.user_id(),
                "Debit updated"
            );
            (StatusCode::OK, Json(debit)).into_response()
        }
        Err(DebitError::NotFound(_)) => not_found(),
        Err(e) => {
            error!(error = %e, "Failed to update debit");
            internal_error()
        }
    }
}

/// DELETE `/debits/{debit_id}` - Delete a debit.
async fn delete_debit(
    State(state): State<AppState>,
    auth: CurrentUser,
    Path(debit_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = DebitRepository::new((*state.db).clone());

    match repo.delete(debit_id).await {
        Ok(_) => {
            info!(
                debit_id = %debit_id,
                user_id = %auth.user_id(),
                "Debit deleted"
            );
            (StatusCode::NO_CONTENT, ()).into_response()
        }
        Err(DebitError::NotFound(_)) => not_found(),
        Err(e) => {
            error!(error = %e, "Failed to delete debit");
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
            "message": "Debit not found"
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

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_list_query_whitelists_debit_filter_keys() {
        let query = ListDebitsQuery {
            to: Some("Initech".to_string()),
            amount: None,
            date: None,
            sort_by: None,
            limit: None,
            page: None,
        };

        let (filter, options) = query.into_parts();
        assert_eq!(filter.to.as_deref(), Some("Initech"));
        assert!(filter.amount.is_none());
        assert_eq!(options.limit(), 10);
        assert_eq!(options.page(), 1);
    }

    #[test]
    fn test_create_request_rejects_empty_counterparty() {
        let payload = CreateDebitRequest {
            account_id: "acct-1".to_string(),
            to: String::new(),
            description: "hosting".to_string(),
            amount: dec!(10),
            date: chrono::Utc::now().into(),
        };
        assert!(payload.validate().is_err());
    }
}
