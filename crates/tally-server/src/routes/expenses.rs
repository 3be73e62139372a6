// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Expense HTTP handlers.

use axum::{
	extract::{Path, Query, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use tally_server_auth::types::{CategoryId, ExpenseId};
use tally_server_db::{ExpenseFilter, ExpensePatch, NewExpense};

pub use tally_server_api::expenses::*;

use crate::{
	api::AppState,
	api_response::{bad_request, db_error, forbidden, not_found},
	auth_middleware::RequireAuth,
	impl_api_error_response,
	pagination::PaginationParams,
	scope_query::{resolve_request_scope, ScopeParams},
};

impl_api_error_response!(ExpenseErrorResponse);

fn validate_amount(amount: f64) -> Result<(), (StatusCode, Json<ExpenseErrorResponse>)> {
	if !amount.is_finite() || amount <= 0.0 {
		return Err(bad_request(
			"invalid_amount",
			"amount must be a positive number",
		));
	}
	Ok(())
}

#[utoipa::path(
    get,
    path = "/expenses",
    params(
        ListExpensesParams,
        ("group_id" = Option<i64>, Query, description = "Operate in this group's scope"),
        ("limit" = Option<i32>, Query, description = "Page size"),
        ("offset" = Option<i32>, Query, description = "Page offset")
    ),
    responses(
        (status = 200, description = "Expenses owned by the scope", body = ListExpensesResponse),
        (status = 401, description = "Not authenticated", body = ExpenseErrorResponse),
        (status = 403, description = "Not a member of the group", body = ExpenseErrorResponse)
    ),
    tag = "expenses"
)]
/// GET /expenses - List expenses in the current scope, newest first.
#[tracing::instrument(skip(state))]
pub async fn list_expenses(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Query(scope_params): Query<ScopeParams>,
	Query(pagination): Query<PaginationParams>,
	Query(params): Query<ListExpensesParams>,
) -> impl IntoResponse {
	let scope = match resolve_request_scope::<ExpenseErrorResponse>(
		&state,
		current_user.user_id(),
		&scope_params,
	)
	.await
	{
		Ok(scope) => scope,
		Err(response) => return response,
	};

	let filter = ExpenseFilter {
		category_id: params.category_id.map(CategoryId::new),
		start_date: params.start_date,
		end_date: params.end_date,
		min_amount: params.min_amount,
		max_amount: params.max_amount,
	};
	let limit = pagination.limit_clamped(50, 200);
	let offset = pagination.offset_or_default();

	match state.expense_repo.list(&scope, &filter, limit, offset).await {
		Ok(expenses) => (
			StatusCode::OK,
			Json(ListExpensesResponse {
				expenses: expenses.into_iter().map(Into::into).collect(),
			}),
		)
			.into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to list expenses");
			db_error::<ExpenseErrorResponse>(&e).into_response()
		}
	}
}

#[utoipa::path(
    post,
    path = "/expenses",
    params(
        ("group_id" = Option<i64>, Query, description = "Operate in this group's scope")
    ),
    request_body = CreateExpenseRequest,
    responses(
        (status = 201, description = "Expense recorded", body = ExpenseResponse),
        (status = 400, description = "Invalid fields or cross-scope category", body = ExpenseErrorResponse),
        (status = 401, description = "Not authenticated", body = ExpenseErrorResponse),
        (status = 403, description = "Read-only role or not a member", body = ExpenseErrorResponse)
    ),
    tag = "expenses"
)]
/// POST /expenses - Record an expense in the current scope.
///
/// The category must be visible in the same scope; referencing another
/// scope's category is a validation failure, not a 404, so callers can
/// distinguish a bad reference from a missing expense.
#[tracing::instrument(skip(state, payload))]
pub async fn create_expense(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Query(scope_params): Query<ScopeParams>,
	Json(payload): Json<CreateExpenseRequest>,
) -> impl IntoResponse {
	let scope = match resolve_request_scope::<ExpenseErrorResponse>(
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
		return forbidden::<ExpenseErrorResponse>("read_only", "viewer role cannot modify data")
			.into_response();
	}

	if let Err(response) = validate_amount(payload.amount) {
		return response.into_response();
	}

	let new_expense = NewExpense {
		amount: payload.amount,
		date: payload.date,
		description: payload.description,
		category_id: CategoryId::new(payload.category_id),
	};

	match state.expense_repo.create(&scope, new_expense).await {
		Ok(expense) => (StatusCode::CREATED, Json(ExpenseResponse::from(expense))).into_response(),
		Err(e) => db_error::<ExpenseErrorResponse>(&e).into_response(),
	}
}

#[utoipa::path(
    get,
    path = "/expenses/{id}",
    params(
        ("id" = i64, Path, description = "Expense ID"),
        ("group_id" = Option<i64>, Query, description = "Operate in this group's scope")
    ),
    responses(
        (status = 200, description = "Expense", body = ExpenseResponse),
        (status = 401, description = "Not authenticated", body = ExpenseErrorResponse),
        (status = 404, description = "Absent or out of scope", body = ExpenseErrorResponse)
    ),
    tag = "expenses"
)]
/// GET /expenses/{id} - Fetch an expense owned by the current scope.
#[tracing::instrument(skip(state))]
pub async fn get_expense(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<i64>,
	Query(scope_params): Query<ScopeParams>,
) -> impl IntoResponse {
	let scope = match resolve_request_scope::<ExpenseErrorResponse>(
		&state,
		current_user.user_id(),
		&scope_params,
	)
	.await
	{
		Ok(scope) => scope,
		Err(response) => return response,
	};

	match state.expense_repo.get(&scope, ExpenseId::new(id)).await {
		Ok(Some(expense)) => (StatusCode::OK, Json(ExpenseResponse::from(expense))).into_response(),
		Ok(None) => not_found::<ExpenseErrorResponse>("expense not found").into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to get expense");
			db_error::<ExpenseErrorResponse>(&e).into_response()
		}
	}
}

#[utoipa::path(
    put,
    path = "/expenses/{id}",
    params(
        ("id" = i64, Path, description = "Expense ID"),
        ("group_id" = Option<i64>, Query, description = "Operate in this group's scope")
    ),
    request_body = UpdateExpenseRequest,
    responses(
        (status = 200, description = "Expense updated", body = ExpenseResponse),
        (status = 400, description = "Invalid fields or cross-scope category", body = ExpenseErrorResponse),
        (status = 401, description = "Not authenticated", body = ExpenseErrorResponse),
        (status = 403, description = "Read-only role or not a member", body = ExpenseErrorResponse),
        (status = 404, description = "Absent or out of scope", body = ExpenseErrorResponse)
    ),
    tag = "expenses"
)]
/// PUT /expenses/{id} - Partially update an owned expense.
#[tracing::instrument(skip(state, payload))]
pub async fn update_expense(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<i64>,
	Query(scope_params): Query<ScopeParams>,
	Json(payload): Json<UpdateExpenseRequest>,
) -> impl IntoResponse {
	let scope = match resolve_request_scope::<ExpenseErrorResponse>(
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
		return forbidden::<ExpenseErrorResponse>("read_only", "viewer role cannot modify data")
			.into_response();
	}

	if let Some(amount) = payload.amount {
		if let Err(response) = validate_amount(amount) {
			return response.into_response();
		}
	}

	let patch = ExpensePatch {
		amount: payload.amount,
		date: payload.date,
		description: payload.description,
		category_id: payload.category_id.map(CategoryId::new),
	};

	match state.expense_repo.update(&scope, ExpenseId::new(id), patch).await {
		Ok(Some(expense)) => (StatusCode::OK, Json(ExpenseResponse::from(expense))).into_response(),
		Ok(None) => not_found::<ExpenseErrorResponse>("expense not found").into_response(),
		Err(e) => db_error::<ExpenseErrorResponse>(&e).into_response(),
	}
}

#[utoipa::path(
    delete,
    path = "/expenses/{id}",
    params(
        ("id" = i64, Path, description = "Expense ID"),
        ("group_id" = Option<i64>, Query, description = "Operate in this group's scope")
    ),
    responses(
        (status = 204, description = "Expense deleted"),
        (status = 401, description = "Not authenticated", body = ExpenseErrorResponse),
        (status = 403, description = "Read-only role or not a member", body = ExpenseErrorResponse),
        (status = 404, description = "Absent or out of scope", body = ExpenseErrorResponse)
    ),
    tag = "expenses"
)]
/// DELETE /expenses/{id} - Delete an owned expense.
#[tracing::instrument(skip(state))]
pub async fn delete_expense(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<i64>,
	Query(scope_params): Query<ScopeParams>,
) -> impl IntoResponse {
	let scope = match resolve_request_scope::<ExpenseErrorResponse>(
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
		return forbidden::<ExpenseErrorResponse>("read_only", "viewer role cannot modify data")
			.into_response();
	}

	match state.expense_repo.delete(&scope, ExpenseId::new(id)).await {
		Ok(true) => StatusCode::NO_CONTENT.into_response(),
		Ok(false) => not_found::<ExpenseErrorResponse>("expense not found").into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to delete expense");
			db_error::<ExpenseErrorResponse>(&e).into_response()
		}
	}
}
