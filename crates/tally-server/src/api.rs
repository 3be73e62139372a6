// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Application state and router construction.

use axum::routing::{get, post};
use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;
use tally_server_auth::{types::CategoryId, TokenCodec};
use tally_server_config::ServerConfig;
use tally_server_db::{
	migrations::require_fallback_category_id, BudgetRepository, CategoryRepository, DbError,
	ExpenseRepository, GroupRepository, UserRepository,
};

use crate::{api_docs, routes};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
	pub pool: SqlitePool,
	pub user_repo: Arc<UserRepository>,
	pub group_repo: Arc<GroupRepository>,
	pub category_repo: Arc<CategoryRepository>,
	pub expense_repo: Arc<ExpenseRepository>,
	pub budget_repo: Arc<BudgetRepository>,
	pub token_codec: Arc<TokenCodec>,
	pub token_ttl_minutes: i64,
	pub fallback_category_id: CategoryId,
}

/// Creates the application state.
///
/// Migrations must have run already: the shared fallback category is
/// resolved here and cached for the life of the process.
pub async fn create_app_state(pool: SqlitePool, config: &ServerConfig) -> Result<AppState, DbError> {
	let fallback_category_id = CategoryId::new(require_fallback_category_id(&pool).await?);

	Ok(AppState {
		user_repo: Arc::new(UserRepository::new(pool.clone())),
		group_repo: Arc::new(GroupRepository::new(pool.clone())),
		category_repo: Arc::new(CategoryRepository::new(pool.clone())),
		expense_repo: Arc::new(ExpenseRepository::new(pool.clone())),
		budget_repo: Arc::new(BudgetRepository::new(pool.clone())),
		token_codec: Arc::new(TokenCodec::new(
			&config.auth.token_secret,
			config.auth.token_ttl_minutes,
		)),
		token_ttl_minutes: config.auth.token_ttl_minutes,
		fallback_category_id,
		pool,
	})
}

/// Build the full application router.
pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(routes::health::health_check))
		.route("/api/openapi.json", get(api_docs::openapi_json))
		.route("/auth/token", post(routes::auth::issue_token))
		.route("/users", post(routes::users::register))
		.route("/users/me", get(routes::users::me))
		.route(
			"/categories",
			get(routes::categories::list_categories).post(routes::categories::create_category),
		)
		.route(
			"/categories/{id}",
			get(routes::categories::get_category)
				.put(routes::categories::update_category)
				.delete(routes::categories::delete_category),
		)
		.route(
			"/expenses",
			get(routes::expenses::list_expenses).post(routes::expenses::create_expense),
		)
		.route(
			"/expenses/{id}",
			get(routes::expenses::get_expense)
				.put(routes::expenses::update_expense)
				.delete(routes::expenses::delete_expense),
		)
		.route(
			"/budgets",
			get(routes::budgets::list_budgets).post(routes::budgets::create_budget),
		)
		.route("/budgets/exceeded", get(routes::budgets::list_exceeded_budgets))
		.route(
			"/budgets/{id}",
			get(routes::budgets::get_budget)
				.put(routes::budgets::update_budget)
				.delete(routes::budgets::delete_budget),
		)
		.route(
			"/groups",
			get(routes::groups::list_groups).post(routes::groups::create_group),
		)
		.route(
			"/groups/{id}",
			get(routes::groups::get_group)
				.put(routes::groups::update_group)
				.delete(routes::groups::delete_group),
		)
		.route(
			"/groups/{id}/members",
			get(routes::groups::list_members).post(routes::groups::add_member),
		)
		.route(
			"/groups/{id}/members/{user_id}",
			axum::routing::put(routes::groups::update_member_role)
				.delete(routes::groups::remove_member),
		)
		.with_state(state)
}
