// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Category HTTP handlers.
//!
//! All routes take an optional `group_id` query parameter selecting the
//! scope. Reads see owned categories plus the shared defaults; writes only
//! ever reach owned rows, so shared defaults 404 on mutation.

use axum::{
	extract::{Path, Query, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use tally_server_auth::types::CategoryId;

pub use tally_server_api::categories::*;

use crate::{
	api::AppState,
	api_response::{bad_request, db_error, forbidden, not_found},
	auth_middleware::RequireAuth,
	impl_api_error_response,
	pagination::PaginationParams,
	scope_query::{resolve_request_scope, ScopeParams},
};

impl_api_error_response!(CategoryErrorResponse);

#[utoipa::path(
    get,
    path = "/categories",
    params(
        ("group_id" = Option<i64>, Query, description = "Operate in this group's scope"),
        ("limit" = Option<i32>, Query, description = "Page size"),
        ("offset" = Option<i32>, Query, description = "Page offset")
    ),
    responses(
        (status = 200, description = "Categories visible in scope", body = ListCategoriesResponse),
        (status = 401, description = "Not authenticated", body = CategoryErrorResponse),
        (status = 403, description = "Not a member of the group", body = CategoryErrorResponse)
    ),
    tag = "categories"
)]
/// GET /categories - List categories visible in the current scope.
#[tracing::instrument(skip(state))]
pub async fn list_categories(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Query(scope_params): Query<ScopeParams>,
	Query(pagination): Query<PaginationParams>,
) -> impl IntoResponse {
	let scope = match resolve_request_scope::<CategoryErrorResponse>(
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

	match state.category_repo.list(&scope, limit, offset).await {
		Ok(categories) => (
			StatusCode::OK,
			Json(ListCategoriesResponse {
				categories: categories.into_iter().map(Into::into).collect(),
			}),
		)
			.into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to list categories");
			db_error::<CategoryErrorResponse>(&e).into_response()
		}
	}
}

#[utoipa::path(
    post,
    path = "/categories",
    params(
        ("group_id" = Option<i64>, Query, description = "Operate in this group's scope")
    ),
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Invalid name", body = CategoryErrorResponse),
        (status = 401, description = "Not authenticated", body = CategoryErrorResponse),
        (status = 403, description = "Read-only role or not a member", body = CategoryErrorResponse)
    ),
    tag = "categories"
)]
/// POST /categories - Create a category in the current scope.
#[tracing::instrument(skip(state, payload))]
pub async fn create_category(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Query(scope_params): Query<ScopeParams>,
	Json(payload): Json<CreateCategoryRequest>,
) -> impl IntoResponse {
	let scope = match resolve_request_scope::<CategoryErrorResponse>(
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
		return forbidden::<CategoryErrorResponse>("read_only", "viewer role cannot modify data")
			.into_response();
	}

	let name = payload.name.trim();
	if name.is_empty() {
		return bad_request::<CategoryErrorResponse>("invalid_name", "category name is required")
			.into_response();
	}

	match state.category_repo.create(&scope, name).await {
		Ok(category) => {
			(StatusCode::CREATED, Json(CategoryResponse::from(category))).into_response()
		}
		Err(e) => {
			tracing::error!(error = %e, "failed to create category");
			db_error::<CategoryErrorResponse>(&e).into_response()
		}
	}
}

#[utoipa::path(
    get,
    path = "/categories/{id}",
    params(
        ("id" = i64, Path, description = "Category ID"),
        ("group_id" = Option<i64>, Query, description = "Operate in this group's scope")
    ),
    responses(
        (status = 200, description = "Category", body = CategoryResponse),
        (status = 401, description = "Not authenticated", body = CategoryErrorResponse),
        (status = 404, description = "Absent or out of scope", body = CategoryErrorResponse)
    ),
    tag = "categories"
)]
/// GET /categories/{id} - Fetch a category visible in the current scope.
#[tracing::instrument(skip(state))]
pub async fn get_category(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<i64>,
	Query(scope_params): Query<ScopeParams>,
) -> impl IntoResponse {
	let scope = match resolve_request_scope::<CategoryErrorResponse>(
		&state,
		current_user.user_id(),
		&scope_params,
	)
	.await
	{
		Ok(scope) => scope,
		Err(response) => return response,
	};

	match state.category_repo.get(&scope, CategoryId::new(id)).await {
		Ok(Some(category)) => (StatusCode::OK, Json(CategoryResponse::from(category))).into_response(),
		Ok(None) => not_found::<CategoryErrorResponse>("category not found").into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to get category");
			db_error::<CategoryErrorResponse>(&e).into_response()
		}
	}
}

#[utoipa::path(
    put,
    path = "/categories/{id}",
    params(
        ("id" = i64, Path, description = "Category ID"),
        ("group_id" = Option<i64>, Query, description = "Operate in this group's scope")
    ),
    request_body = UpdateCategoryRequest,
    responses(
        (status = 200, description = "Category renamed", body = CategoryResponse),
        (status = 400, description = "Invalid name", body = CategoryErrorResponse),
        (status = 401, description = "Not authenticated", body = CategoryErrorResponse),
        (status = 403, description = "Read-only role or not a member", body = CategoryErrorResponse),
        (status = 404, description = "Absent, shared, or out of scope", body = CategoryErrorResponse)
    ),
    tag = "categories"
)]
/// PUT /categories/{id} - Rename an owned category.
///
/// Shared default categories are not owned by any scope and therefore 404
/// here, same as rows belonging to someone else.
#[tracing::instrument(skip(state, payload))]
pub async fn update_category(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<i64>,
	Query(scope_params): Query<ScopeParams>,
	Json(payload): Json<UpdateCategoryRequest>,
) -> impl IntoResponse {
	let scope = match resolve_request_scope::<CategoryErrorResponse>(
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
		return forbidden::<CategoryErrorResponse>("read_only", "viewer role cannot modify data")
			.into_response();
	}

	let name = payload.name.trim();
	if name.is_empty() {
		return bad_request::<CategoryErrorResponse>("invalid_name", "category name is required")
			.into_response();
	}

	match state
		.category_repo
		.rename(&scope, CategoryId::new(id), name)
		.await
	{
		Ok(Some(category)) => (StatusCode::OK, Json(CategoryResponse::from(category))).into_response(),
		Ok(None) => not_found::<CategoryErrorResponse>("category not found").into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to rename category");
			db_error::<CategoryErrorResponse>(&e).into_response()
		}
	}
}

#[utoipa::path(
    delete,
    path = "/categories/{id}",
    params(
        ("id" = i64, Path, description = "Category ID"),
        ("group_id" = Option<i64>, Query, description = "Operate in this group's scope")
    ),
    responses(
        (status = 204, description = "Category deleted, dependents reassigned"),
        (status = 401, description = "Not authenticated", body = CategoryErrorResponse),
        (status = 403, description = "Read-only role or not a member", body = CategoryErrorResponse),
        (status = 404, description = "Absent, shared, or out of scope", body = CategoryErrorResponse)
    ),
    tag = "categories"
)]
/// DELETE /categories/{id} - Delete an owned category.
///
/// Expenses and budgets referencing it are reassigned to the shared
/// fallback category in the same transaction.
#[tracing::instrument(skip(state))]
pub async fn delete_category(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<i64>,
	Query(scope_params): Query<ScopeParams>,
) -> impl IntoResponse {
	let scope = match resolve_request_scope::<CategoryErrorResponse>(
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
		return forbidden::<CategoryErrorResponse>("read_only", "viewer role cannot modify data")
			.into_response();
	}

	match state
		.category_repo
		.delete(&scope, CategoryId::new(id), state.fallback_category_id)
		.await
	{
		Ok(true) => StatusCode::NO_CONTENT.into_response(),
		Ok(false) => not_found::<CategoryErrorResponse>("category not found").into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to delete category");
			db_error::<CategoryErrorResponse>(&e).into_response()
		}
	}
}
