// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Budget HTTP handlers.

use axum::{
	extract::{Path, Query, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use chrono::NaiveDate;
use tally_server_auth::types::{BudgetId, CategoryId};
use tally_server_db::{BudgetPatch, NewBudget};

pub use tally_server_api::budgets::*;

use crate::{
	api::AppState,
	api_response::{bad_request, db_error, forbidden, not_found},
	auth_middleware::RequireAuth,
	impl_api_error_response,
	pagination::PaginationParams,
	scope_query::{resolve_request_scope, ScopeParams},
};

impl_api_error_response!(BudgetErrorResponse);

fn validate_budget_fields(
	amount: f64,
	period_start: NaiveDate,
	period_end: Option<NaiveDate>,
) -> Result<(), (StatusCode, Json<BudgetErrorResponse>)> {
	if !amount.is_finite() || amount <= 0.0 {
		return Err(bad_request(
			"invalid_amount",
			"amount must be a positive number",
		));
	}
	if let Some(end) = period_end {
		if end < period_start {
			return Err(bad_request(
				"invalid_period",
				"period_end must not be before period_start",
			));
		}
	}
	Ok(())
}

#[utoipa::path(
    get,
    path = "/budgets",
    params(
        ("group_id" = Option<i64>, Query, description = "Operate in this group's scope"),
        ("limit" = Option<i32>, Query, description = "Page size"),
        ("offset" = Option<i32>, Query, description = "Page offset")
    ),
    responses(
        (status = 200, description = "Budgets owned by the scope", body = ListBudgetsResponse),
        (status = 401, description = "Not authenticated", body = BudgetErrorResponse),
        (status = 403, description = "Not a member of the group", body = BudgetErrorResponse)
    ),
    tag = "budgets"
)]
/// GET /budgets - List budgets in the current scope.
#[tracing::instrument(skip(state))]
pub async fn list_budgets(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Query(scope_params): Query<ScopeParams>,
	Query(pagination): Query<PaginationParams>,
) -> impl IntoResponse {
	let scope = match resolve_request_scope::<BudgetErrorResponse>(
		&state,
		current_user.user_id(),
		&scope_params,
	)
	.await
	{
		Ok(scope) => scope,
		Err(response) => return response,
	};

	let limit = pagination.limit_clamped(50, 200);
	let offset = pagination.offset_or_default();

	match state.budget_repo.list(&scope, limit, offset).await {
		Ok(budgets) => (
			StatusCode::OK,
			Json(ListBudgetsResponse {
				budgets: budgets.into_iter().map(Into::into).collect(),
			}),
		)
			.into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to list budgets");
			db_error::<BudgetErrorResponse>(&e).into_response()
		}
	}
}

#[utoipa::path(
    get,
    path = "/budgets/exceeded",
    params(
        ("group_id" = Option<i64>, Query, description = "Operate in this group's scope")
    ),
    responses(
        (status = 200, description = "Budgets whose spending strictly exceeds the limit", body = ListBudgetsResponse),
        (status = 401, description = "Not authenticated", body = BudgetErrorResponse),
        (status = 403, description = "Not a member of the group", body = BudgetErrorResponse)
    ),
    tag = "budgets"
)]
/// GET /budgets/exceeded - Budgets whose matching expenses exceed the limit.
///
/// An expense matches when it shares the budget's category and scope and
/// its date falls within the period. The comparison is strict: a budget
/// spent exactly to its limit is not exceeded.
#[tracing::instrument(skip(state))]
pub async fn list_exceeded_budgets(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Query(scope_params): Query<ScopeParams>,
) -> impl IntoResponse {
	let scope = match resolve_request_scope::<BudgetErrorResponse>(
		&state,
		current_user.user_id(),
		&scope_params,
	)
	.await
	{
		Ok(scope) => scope,
		Err(response) => return response,
	};

	match state.budget_repo.list_exceeded(&scope).await {
		Ok(budgets) => (
			StatusCode::OK,
			Json(ListBudgetsResponse {
				budgets: budgets.into_iter().map(Into::into).collect(),
			}),
		)
			.into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to list exceeded budgets");
			db_error::<BudgetErrorResponse>(&e).into_response()
		}
	}
}

#[utoipa::path(
    post,
    path = "/budgets",
    params(
        ("group_id" = Option<i64>, Query, description = "Operate in this group's scope")
    ),
    request_body = CreateBudgetRequest,
    responses(
        (status = 201, description = "Budget created", body = BudgetResponse),
        (status = 400, description = "Invalid fields or cross-scope category", body = BudgetErrorResponse),
        (status = 401, description = "Not authenticated", body = BudgetErrorResponse),
        (status = 403, description = "Read-only role or not a member", body = BudgetErrorResponse)
    ),
    tag = "budgets"
)]
/// POST /budgets - Create a budget in the current scope.
#[tracing::instrument(skip(state, payload))]
pub async fn create_budget(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Query(scope_params): Query<ScopeParams>,
	Json(payload): Json<CreateBudgetRequest>,
) -> impl IntoResponse {
	let scope = match resolve_request_scope::<BudgetErrorResponse>(
		&state,
		current_user.user_id(),
		&scope_params,
	)
	.await
	{
		Ok(scope) => scope,
		Err(response) => return response,
	};

	if !scope.can_write() {
		return forbidden::<BudgetErrorResponse>("read_only", "viewer role cannot modify data")
			.into_response();
	}

	if let Err(response) =
		validate_budget_fields(payload.amount, payload.period_start, payload.period_end)
	{
		return response.into_response();
	}

	let new_budget = NewBudget {
		category_id: CategoryId::new(payload.category_id),
		amount: payload.amount,
		period_start: payload.period_start,
		period_end: payload.period_end,
	};

	match state.budget_repo.create(&scope, new_budget).await {
		Ok(budget) => (StatusCode::CREATED, Json(BudgetResponse::from(budget))).into_response(),
		Err(e) => db_error::<BudgetErrorResponse>(&e).into_response(),
	}
}

#[utoipa::path(
    get,
    path = "/budgets/{id}",
    params(
        ("id" = i64, Path, description = "Budget ID"),
        ("group_id" = Option<i64>, Query, description = "Operate in this group's scope")
    ),
    responses(
        (status = 200, description = "Budget", body = BudgetResponse),
        (status = 401, description = "Not authenticated", body = BudgetErrorResponse),
        (status = 404, description = "Absent or out of scope", body = BudgetErrorResponse)
    ),
    tag = "budgets"
)]
/// GET /budgets/{id} - Fetch a budget owned by the current scope.
#[tracing::instrument(skip(state))]
pub async fn get_budget(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<i64>,
	Query(scope_params): Query<ScopeParams>,
) -> impl IntoResponse {
	let scope = match resolve_request_scope::<BudgetErrorResponse>(
		&state,
		current_user.user_id(),
		&scope_params,
	)
	.await
	{
		Ok(scope) => scope,
		Err(response) => return response,
	};

	match state.budget_repo.get(&scope, BudgetId::new(id)).await {
		Ok(Some(budget)) => (StatusCode::OK, Json(BudgetResponse::from(budget))).into_response(),
		Ok(None) => not_found::<BudgetErrorResponse>("budget not found").into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to get budget");
			db_error::<BudgetErrorResponse>(&e).into_response()
		}
	}
}

#[utoipa::path(
    put,
    path = "/budgets/{id}",
    params(
        ("id" = i64, Path, description = "Budget ID"),
        ("group_id" = Option<i64>, Query, description = "Operate in this group's scope")
    ),
    request_body = UpdateBudgetRequest,
    responses(
        (status = 200, description = "Budget updated", body = BudgetResponse),
        (status = 400, description = "Invalid fields or cross-scope category", body = BudgetErrorResponse),
        (status = 401, description = "Not authenticated", body = BudgetErrorResponse),
        (status = 403, description = "Read-only role or not a member", body = BudgetErrorResponse),
        (status = 404, description = "Absent or out of scope", body = BudgetErrorResponse)
    ),
    tag = "budgets"
)]
/// PUT /budgets/{id} - Partially update an owned budget.
#[tracing::instrument(skip(state, payload))]
pub async fn update_budget(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<i64>,
	Query(scope_params): Query<ScopeParams>,
	Json(payload): Json<UpdateBudgetRequest>,
) -> impl IntoResponse {
	let scope = match resolve_request_scope::<BudgetErrorResponse>(
		&state,
		current_user.user_id(),
		&scope_params,
	)
	.await
	{
		Ok(scope) => scope,
		Err(response) => return response,
	};

	if !scope.can_write() {
		return forbidden::<BudgetErrorResponse>("read_only", "viewer role cannot modify data")
			.into_response();
	}

	if let Some(amount) = payload.amount {
		if !amount.is_finite() || amount <= 0.0 {
			return bad_request::<BudgetErrorResponse>(
				"invalid_amount",
				"amount must be a positive number",
			)
			.into_response();
		}
	}

	let patch = BudgetPatch {
		category_id: payload.category_id.map(CategoryId::new),
		amount: payload.amount,
		period_start: payload.period_start,
		period_end: payload.period_end,
	};

	match state.budget_repo.update(&scope, BudgetId::new(id), patch).await {
		Ok(Some(budget)) => (StatusCode::OK, Json(BudgetResponse::from(budget))).into_response(),
		Ok(None) => not_found::<BudgetErrorResponse>("budget not found").into_response(),
		Err(e) => db_error::<BudgetErrorResponse>(&e).into_response(),
	}
}

#[utoipa::path(
    delete,
    path = "/budgets/{id}",
    params(
        ("id" = i64, Path, description = "Budget ID"),
        ("group_id" = Option<i64>, Query, description = "Operate in this group's scope")
    ),
    responses(
        (status = 204, description = "Budget deleted"),
        (status = 401, description = "Not authenticated", body = BudgetErrorResponse),
        (status = 403, description = "Read-only role or not a member", body = BudgetErrorResponse),
        (status = 404, description = "Absent or out of scope", body = BudgetErrorResponse)
    ),
    tag = "budgets"
)]
/// DELETE /budgets/{id} - Delete an owned budget.
#[tracing::instrument(skip(state))]
pub async fn delete_budget(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<i64>,
	Query(scope_params): Query<ScopeParams>,
) -> impl IntoResponse {
	let scope = match resolve_request_scope::<BudgetErrorResponse>(
		&state,
		current_user.user_id(),
		&scope_params,
	)
	.await
	{
		Ok(scope) => scope,
		Err(response) => return response,
	};

	if !scope.can_write() {
		return forbidden::<BudgetErrorResponse>("read_only", "viewer role cannot modify data")
			.into_response();
	}

	match state.budget_repo.delete(&scope, BudgetId::new(id)).await {
		Ok(true) => StatusCode::NO_CONTENT.into_response(),
		Ok(false) => not_found::<BudgetErrorResponse>("budget not found").into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to delete budget");
			db_error::<BudgetErrorResponse>(&e).into_response()
		}
	}
}
