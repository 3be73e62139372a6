// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! OpenAPI document for the tally HTTP API.

use axum::Json;
use utoipa::OpenApi;

use crate::routes;
use tally_server_api::{
	auth::{AuthErrorResponse, TokenRequest, TokenResponse},
	budgets::{
		BudgetErrorResponse, BudgetResponse, CreateBudgetRequest, ListBudgetsResponse,
		UpdateBudgetRequest,
	},
	categories::{
		CategoryErrorResponse, CategoryResponse, CreateCategoryRequest, ListCategoriesResponse,
		UpdateCategoryRequest,
	},
	expenses::{
		CreateExpenseRequest, ExpenseErrorResponse, ExpenseResponse, ListExpensesResponse,
		UpdateExpenseRequest,
	},
	groups::{
		AddMemberRequest, CreateGroupRequest, GroupErrorResponse, GroupMemberResponse,
		GroupResponse, GroupRoleApi, ListGroupMembersResponse, ListGroupsResponse,
		UpdateGroupRequest, UpdateMemberRoleRequest,
	},
	users::{RegisterRequest, UserErrorResponse, UserResponse},
};

#[derive(OpenApi)]
#[openapi(
	paths(
		routes::health::health_check,
		routes::auth::issue_token,
		routes::users::register,
		routes::users::me,
		routes::categories::list_categories,
		routes::categories::create_category,
		routes::categories::get_category,
		routes::categories::update_category,
		routes::categories::delete_category,
		routes::expenses::list_expenses,
		routes::expenses::create_expense,
		routes::expenses::get_expense,
		routes::expenses::update_expense,
		routes::expenses::delete_expense,
		routes::budgets::list_budgets,
		routes::budgets::list_exceeded_budgets,
		routes::budgets::create_budget,
		routes::budgets::get_budget,
		routes::budgets::update_budget,
		routes::budgets::delete_budget,
		routes::groups::list_groups,
		routes::groups::create_group,
		routes::groups::get_group,
		routes::groups::update_group,
		routes::groups::delete_group,
		routes::groups::list_members,
		routes::groups::add_member,
		routes::groups::update_member_role,
		routes::groups::remove_member,
	),
	components(schemas(
		routes::health::HealthResponse,
		TokenRequest,
		TokenResponse,
		AuthErrorResponse,
		RegisterRequest,
		UserResponse,
		UserErrorResponse,
		CreateCategoryRequest,
		UpdateCategoryRequest,
		CategoryResponse,
		ListCategoriesResponse,
		CategoryErrorResponse,
		CreateExpenseRequest,
		UpdateExpenseRequest,
		ExpenseResponse,
		ListExpensesResponse,
		ExpenseErrorResponse,
		CreateBudgetRequest,
		UpdateBudgetRequest,
		BudgetResponse,
		ListBudgetsResponse,
		BudgetErrorResponse,
		CreateGroupRequest,
		UpdateGroupRequest,
		GroupResponse,
		ListGroupsResponse,
		GroupRoleApi,
		AddMemberRequest,
		UpdateMemberRoleRequest,
		GroupMemberResponse,
		ListGroupMembersResponse,
		GroupErrorResponse,
	)),
	tags(
		(name = "health", description = "Liveness and readiness"),
		(name = "auth", description = "Credential exchange"),
		(name = "users", description = "Registration and profile"),
		(name = "categories", description = "Expense categories"),
		(name = "expenses", description = "Expense records"),
		(name = "budgets", description = "Spending limits"),
		(name = "groups", description = "Shared groups and membership"),
	)
)]
pub struct ApiDoc;

/// GET /api/openapi.json - Serve the OpenAPI document.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
	Json(ApiDoc::openapi())
}
