// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Integration tests for the HTTP API.
//!
//! Tests cover:
//! - Registration and token issuance
//! - Bearer authentication (header and failure modes)
//! - Personal scope isolation between users
//! - Shared default categories (visible everywhere, mutable nowhere)
//! - Category deletion reassigning dependents to the fallback
//! - Budget exceeded reporting
//! - Group scoping and role enforcement

use axum::{
	body::Body,
	http::{Request, StatusCode},
};
use tally_server::{create_app_state, create_router, ServerConfig};
use tempfile::tempdir;
use tower::ServiceExt;

/// Creates a test app with an isolated database.
async fn setup_test_app() -> (axum::Router, tempfile::TempDir) {
	let dir = tempdir().unwrap();
	let db_path = dir.path().join("test_tally.db");
	let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
	let pool = tally_server_db::create_pool(&db_url).await.unwrap();
	tally_server_db::run_migrations(&pool).await.unwrap();
	let config = ServerConfig::default();
	let state = create_app_state(pool, &config).await.unwrap();
	(create_router(state), dir)
}

/// Send a request and return (status, parsed JSON body or Null).
async fn send(
	app: &axum::Router,
	method: &str,
	uri: &str,
	token: Option<&str>,
	body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
	let mut builder = Request::builder().method(method).uri(uri);
	if let Some(token) = token {
		builder = builder.header("authorization", format!("Bearer {token}"));
	}
	let request = match body {
		Some(json) => builder
			.header("content-type", "application/json")
			.body(Body::from(json.to_string()))
			.unwrap(),
		None => builder.body(Body::empty()).unwrap(),
	};

	let response = app.clone().oneshot(request).await.unwrap();
	let status = response.status();
	let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();
	let json = if bytes.is_empty() {
		serde_json::Value::Null
	} else {
		serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
	};
	(status, json)
}

/// Register an account and return (user id, bearer token).
async fn register_and_login(app: &axum::Router, email: &str) -> (i64, String) {
	let (status, user) = send(
		app,
		"POST",
		"/users",
		None,
		Some(serde_json::json!({ "email": email, "password": "hunter2hunter2" })),
	)
	.await;
	assert_eq!(status, StatusCode::CREATED, "register failed: {user}");
	let user_id = user["id"].as_i64().unwrap();

	let (status, token) = send(
		app,
		"POST",
		"/auth/token",
		None,
		Some(serde_json::json!({ "email": email, "password": "hunter2hunter2" })),
	)
	.await;
	assert_eq!(status, StatusCode::OK, "login failed: {token}");
	(user_id, token["access_token"].as_str().unwrap().to_string())
}

async fn create_category(app: &axum::Router, token: &str, uri: &str, name: &str) -> i64 {
	let (status, body) = send(
		app,
		"POST",
		uri,
		Some(token),
		Some(serde_json::json!({ "name": name })),
	)
	.await;
	assert_eq!(status, StatusCode::CREATED, "create category failed: {body}");
	body["id"].as_i64().unwrap()
}

async fn create_expense(
	app: &axum::Router,
	token: &str,
	uri: &str,
	amount: f64,
	date: &str,
	category_id: i64,
) -> (StatusCode, serde_json::Value) {
	send(
		app,
		"POST",
		uri,
		Some(token),
		Some(serde_json::json!({
			"amount": amount,
			"date": date,
			"description": null,
			"category_id": category_id,
		})),
	)
	.await
}

// ============================================================================
// Registration and authentication
// ============================================================================

#[tokio::test]
async fn test_register_login_me_flow() {
	let (app, _dir) = setup_test_app().await;

	let (_, token) = register_and_login(&app, "alice@example.com").await;

	let (status, me) = send(&app, "GET", "/users/me", Some(&token), None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(me["email"], "alice@example.com");
	assert!(me.get("password_hash").is_none());
}

#[tokio::test]
async fn test_duplicate_email_returns_409() {
	let (app, _dir) = setup_test_app().await;

	register_and_login(&app, "alice@example.com").await;

	let (status, _) = send(
		&app,
		"POST",
		"/users",
		None,
		Some(serde_json::json!({ "email": "alice@example.com", "password": "hunter2hunter2" })),
	)
	.await;
	assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_short_password_returns_400() {
	let (app, _dir) = setup_test_app().await;

	let (status, _) = send(
		&app,
		"POST",
		"/users",
		None,
		Some(serde_json::json!({ "email": "alice@example.com", "password": "short" })),
	)
	.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_wrong_password_returns_401() {
	let (app, _dir) = setup_test_app().await;

	register_and_login(&app, "alice@example.com").await;

	let (status, body) = send(
		&app,
		"POST",
		"/auth/token",
		None,
		Some(serde_json::json!({ "email": "alice@example.com", "password": "wrong-password" })),
	)
	.await;
	assert_eq!(status, StatusCode::UNAUTHORIZED);
	assert_eq!(body["error"], "invalid_credentials");
}

#[tokio::test]
async fn test_unknown_email_and_wrong_password_are_indistinguishable() {
	let (app, _dir) = setup_test_app().await;

	register_and_login(&app, "alice@example.com").await;

	let (status_unknown, body_unknown) = send(
		&app,
		"POST",
		"/auth/token",
		None,
		Some(serde_json::json!({ "email": "nobody@example.com", "password": "whatever123" })),
	)
	.await;
	let (status_wrong, body_wrong) = send(
		&app,
		"POST",
		"/auth/token",
		None,
		Some(serde_json::json!({ "email": "alice@example.com", "password": "whatever123" })),
	)
	.await;

	assert_eq!(status_unknown, StatusCode::UNAUTHORIZED);
	assert_eq!(status_wrong, StatusCode::UNAUTHORIZED);
	assert_eq!(body_unknown["error"], body_wrong["error"]);
}

#[tokio::test]
async fn test_protected_routes_require_token() {
	let (app, _dir) = setup_test_app().await;

	for uri in ["/users/me", "/categories", "/expenses", "/budgets", "/groups"] {
		let (status, _) = send(&app, "GET", uri, None, None).await;
		assert_eq!(status, StatusCode::UNAUTHORIZED, "expected 401 for {uri}");
	}
}

#[tokio::test]
async fn test_garbage_token_returns_401() {
	let (app, _dir) = setup_test_app().await;

	let (status, body) = send(&app, "GET", "/users/me", Some("not.a.jwt"), None).await;
	assert_eq!(status, StatusCode::UNAUTHORIZED);
	assert_eq!(body["error"], "invalid_token");
}

// ============================================================================
// Personal scope isolation
// ============================================================================

#[tokio::test]
async fn test_personal_scope_isolation() {
	let (app, _dir) = setup_test_app().await;

	let (_, alice) = register_and_login(&app, "alice@example.com").await;
	let (_, bob) = register_and_login(&app, "bob@example.com").await;

	let food = create_category(&app, &alice, "/categories", "Food").await;
	let (status, expense) = create_expense(&app, &alice, "/expenses", 12.5, "2025-01-10", food).await;
	assert_eq!(status, StatusCode::CREATED);
	let expense_id = expense["id"].as_i64().unwrap();

	// Bob sees none of Alice's data.
	let (status, body) = send(&app, "GET", "/expenses", Some(&bob), None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["expenses"].as_array().unwrap().len(), 0);

	let (status, _) = send(&app, "GET", &format!("/expenses/{expense_id}"), Some(&bob), None).await;
	assert_eq!(status, StatusCode::NOT_FOUND);

	let (status, _) = send(&app, "GET", &format!("/categories/{food}"), Some(&bob), None).await;
	assert_eq!(status, StatusCode::NOT_FOUND);

	// Bob cannot delete Alice's expense either.
	let (status, _) = send(
		&app,
		"DELETE",
		&format!("/expenses/{expense_id}"),
		Some(&bob),
		None,
	)
	.await;
	assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cross_scope_category_reference_returns_400() {
	let (app, _dir) = setup_test_app().await;

	let (_, alice) = register_and_login(&app, "alice@example.com").await;
	let (_, bob) = register_and_login(&app, "bob@example.com").await;

	let alices_category = create_category(&app, &alice, "/categories", "Food").await;

	let (status, body) =
		create_expense(&app, &bob, "/expenses", 5.0, "2025-01-10", alices_category).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error"], "validation_failed");
}

// ============================================================================
// Shared default categories and deletion
// ============================================================================

async fn fallback_category_id(app: &axum::Router, token: &str) -> i64 {
	let (status, body) = send(app, "GET", "/categories", Some(token), None).await;
	assert_eq!(status, StatusCode::OK);
	body["categories"]
		.as_array()
		.unwrap()
		.iter()
		.find(|c| c["shared"] == true)
		.expect("fallback category should be visible")["id"]
		.as_i64()
		.unwrap()
}

#[tokio::test]
async fn test_shared_category_visible_but_immutable() {
	let (app, _dir) = setup_test_app().await;

	let (_, alice) = register_and_login(&app, "alice@example.com").await;
	let fallback = fallback_category_id(&app, &alice).await;

	// Visible to a fresh account with no data of its own.
	let (status, body) = send(&app, "GET", &format!("/categories/{fallback}"), Some(&alice), None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["shared"], true);

	// Mutations 404: the shared row is owned by no scope.
	let (status, _) = send(
		&app,
		"PUT",
		&format!("/categories/{fallback}"),
		Some(&alice),
		Some(serde_json::json!({ "name": "Hijacked" })),
	)
	.await;
	assert_eq!(status, StatusCode::NOT_FOUND);

	let (status, _) = send(
		&app,
		"DELETE",
		&format!("/categories/{fallback}"),
		Some(&alice),
		None,
	)
	.await;
	assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_category_delete_reassigns_dependents_to_fallback() {
	let (app, _dir) = setup_test_app().await;

	let (_, alice) = register_and_login(&app, "alice@example.com").await;
	let fallback = fallback_category_id(&app, &alice).await;
	let food = create_category(&app, &alice, "/categories", "Food").await;

	let (status, expense) = create_expense(&app, &alice, "/expenses", 9.0, "2025-01-05", food).await;
	assert_eq!(status, StatusCode::CREATED);
	let expense_id = expense["id"].as_i64().unwrap();

	let (status, _) = send(&app, "DELETE", &format!("/categories/{food}"), Some(&alice), None).await;
	assert_eq!(status, StatusCode::NO_CONTENT);

	// The expense survives, repointed at the shared fallback.
	let (status, body) = send(&app, "GET", &format!("/expenses/{expense_id}"), Some(&alice), None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["category_id"].as_i64().unwrap(), fallback);
}

// ============================================================================
// Expense filters and updates
// ============================================================================

#[tokio::test]
async fn test_expense_list_filters() {
	let (app, _dir) = setup_test_app().await;

	let (_, alice) = register_and_login(&app, "alice@example.com").await;
	let food = create_category(&app, &alice, "/categories", "Food").await;
	let travel = create_category(&app, &alice, "/categories", "Travel").await;

	create_expense(&app, &alice, "/expenses", 10.0, "2025-01-05", food).await;
	create_expense(&app, &alice, "/expenses", 50.0, "2025-02-10", food).await;
	create_expense(&app, &alice, "/expenses", 200.0, "2025-02-20", travel).await;

	let (status, body) = send(
		&app,
		"GET",
		&format!("/expenses?category_id={food}"),
		Some(&alice),
		None,
	)
	.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["expenses"].as_array().unwrap().len(), 2);

	let (status, body) = send(
		&app,
		"GET",
		"/expenses?start_date=2025-02-01&end_date=2025-02-28&min_amount=100",
		Some(&alice),
		None,
	)
	.await;
	assert_eq!(status, StatusCode::OK);
	let expenses = body["expenses"].as_array().unwrap();
	assert_eq!(expenses.len(), 1);
	assert_eq!(expenses[0]["amount"].as_f64().unwrap(), 200.0);
}

#[tokio::test]
async fn test_expense_partial_update() {
	let (app, _dir) = setup_test_app().await;

	let (_, alice) = register_and_login(&app, "alice@example.com").await;
	let food = create_category(&app, &alice, "/categories", "Food").await;
	let (_, expense) = create_expense(&app, &alice, "/expenses", 10.0, "2025-01-05", food).await;
	let id = expense["id"].as_i64().unwrap();

	let (status, body) = send(
		&app,
		"PUT",
		&format!("/expenses/{id}"),
		Some(&alice),
		Some(serde_json::json!({ "amount": 12.0 })),
	)
	.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["amount"].as_f64().unwrap(), 12.0);
	// Untouched fields survive the merge.
	assert_eq!(body["date"], "2025-01-05");
	assert_eq!(body["category_id"].as_i64().unwrap(), food);
}

#[tokio::test]
async fn test_negative_amount_returns_400() {
	let (app, _dir) = setup_test_app().await;

	let (_, alice) = register_and_login(&app, "alice@example.com").await;
	let food = create_category(&app, &alice, "/categories", "Food").await;

	let (status, _) = create_expense(&app, &alice, "/expenses", -5.0, "2025-01-05", food).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Budgets
// ============================================================================

#[tokio::test]
async fn test_budget_exceeded_reporting() {
	let (app, _dir) = setup_test_app().await;

	let (_, alice) = register_and_login(&app, "alice@example.com").await;
	let food = create_category(&app, &alice, "/categories", "Food").await;

	let (status, budget) = send(
		&app,
		"POST",
		"/budgets",
		Some(&alice),
		Some(serde_json::json!({
			"category_id": food,
			"amount": 100.0,
			"period_start": "2025-01-01",
			"period_end": "2025-01-31",
		})),
	)
	.await;
	assert_eq!(status, StatusCode::CREATED);
	let budget_id = budget["id"].as_i64().unwrap();

	// 40 + 40 = 80 <= 100: not exceeded yet.
	create_expense(&app, &alice, "/expenses", 40.0, "2025-01-05", food).await;
	create_expense(&app, &alice, "/expenses", 40.0, "2025-01-15", food).await;

	let (status, body) = send(&app, "GET", "/budgets/exceeded", Some(&alice), None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["budgets"].as_array().unwrap().len(), 0);

	// Third expense pushes the total to 120 > 100.
	create_expense(&app, &alice, "/expenses", 40.0, "2025-01-25", food).await;

	let (status, body) = send(&app, "GET", "/budgets/exceeded", Some(&alice), None).await;
	assert_eq!(status, StatusCode::OK);
	let exceeded = body["budgets"].as_array().unwrap();
	assert_eq!(exceeded.len(), 1);
	assert_eq!(exceeded[0]["id"].as_i64().unwrap(), budget_id);

	// Spending outside the period does not count.
	create_expense(&app, &alice, "/expenses", 500.0, "2025-02-01", food).await;
	let (_, body) = send(&app, "GET", "/budgets/exceeded", Some(&alice), None).await;
	assert_eq!(body["budgets"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_budget_update_cannot_invert_period() {
	let (app, _dir) = setup_test_app().await;

	let (_, alice) = register_and_login(&app, "alice@example.com").await;
	let food = create_category(&app, &alice, "/categories", "Food").await;

	let (status, budget) = send(
		&app,
		"POST",
		"/budgets",
		Some(&alice),
		Some(serde_json::json!({
			"category_id": food,
			"amount": 100.0,
			"period_start": "2025-01-01",
			"period_end": "2025-01-31",
		})),
	)
	.await;
	assert_eq!(status, StatusCode::CREATED);
	let budget_id = budget["id"].as_i64().unwrap();

	// Moving period_end behind the existing start must be rejected.
	let (status, body) = send(
		&app,
		"PUT",
		&format!("/budgets/{budget_id}"),
		Some(&alice),
		Some(serde_json::json!({ "period_end": "2024-06-01" })),
	)
	.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error"], "validation_failed");

	// The stored period is untouched.
	let (status, body) = send(&app, "GET", &format!("/budgets/{budget_id}"), Some(&alice), None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["period_start"], "2025-01-01");
	assert_eq!(body["period_end"], "2025-01-31");
}

#[tokio::test]
async fn test_budget_period_end_before_start_returns_400() {
	let (app, _dir) = setup_test_app().await;

	let (_, alice) = register_and_login(&app, "alice@example.com").await;
	let food = create_category(&app, &alice, "/categories", "Food").await;

	let (status, _) = send(
		&app,
		"POST",
		"/budgets",
		Some(&alice),
		Some(serde_json::json!({
			"category_id": food,
			"amount": 100.0,
			"period_start": "2025-02-01",
			"period_end": "2025-01-01",
		})),
	)
	.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Groups
// ============================================================================

#[tokio::test]
async fn test_group_scoping_and_roles() {
	let (app, _dir) = setup_test_app().await;

	let (_, alice) = register_and_login(&app, "alice@example.com").await;
	let (bob_id, bob) = register_and_login(&app, "bob@example.com").await;
	let (_, carol) = register_and_login(&app, "carol@example.com").await;

	let (status, group) = send(
		&app,
		"POST",
		"/groups",
		Some(&alice),
		Some(serde_json::json!({ "name": "household" })),
	)
	.await;
	assert_eq!(status, StatusCode::CREATED);
	let group_id = group["id"].as_i64().unwrap();

	let (status, _) = send(
		&app,
		"POST",
		&format!("/groups/{group_id}/members"),
		Some(&alice),
		Some(serde_json::json!({ "user_id": bob_id, "role": "viewer" })),
	)
	.await;
	assert_eq!(status, StatusCode::CREATED);

	// Alice creates a group category; Bob the viewer can see it.
	let rent = create_category(&app, &alice, &format!("/categories?group_id={group_id}"), "Rent").await;
	let (status, body) = send(
		&app,
		"GET",
		&format!("/categories?group_id={group_id}"),
		Some(&bob),
		None,
	)
	.await;
	assert_eq!(status, StatusCode::OK);
	assert!(body["categories"]
		.as_array()
		.unwrap()
		.iter()
		.any(|c| c["id"].as_i64() == Some(rent)));

	// Viewer role is read-only.
	let (status, body) = send(
		&app,
		"POST",
		&format!("/categories?group_id={group_id}"),
		Some(&bob),
		Some(serde_json::json!({ "name": "Groceries" })),
	)
	.await;
	assert_eq!(status, StatusCode::FORBIDDEN, "viewer write: {body}");

	// Non-members cannot use the group scope at all.
	let (status, _) = send(
		&app,
		"GET",
		&format!("/expenses?group_id={group_id}"),
		Some(&carol),
		None,
	)
	.await;
	assert_eq!(status, StatusCode::FORBIDDEN);

	// Promote Bob to editor; writes now work.
	let (status, _) = send(
		&app,
		"PUT",
		&format!("/groups/{group_id}/members/{bob_id}"),
		Some(&alice),
		Some(serde_json::json!({ "role": "editor" })),
	)
	.await;
	assert_eq!(status, StatusCode::OK);

	let (status, _) = create_expense(
		&app,
		&bob,
		&format!("/expenses?group_id={group_id}"),
		30.0,
		"2025-03-01",
		rent,
	)
	.await;
	assert_eq!(status, StatusCode::CREATED);

	// Member management stays admin-only even for editors.
	let (status, _) = send(
		&app,
		"POST",
		&format!("/groups/{group_id}/members"),
		Some(&bob),
		Some(serde_json::json!({ "user_id": bob_id, "role": "viewer" })),
	)
	.await;
	assert_eq!(status, StatusCode::FORBIDDEN);

	// Group data never leaks into personal scope.
	let (status, body) = send(&app, "GET", "/expenses", Some(&bob), None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["expenses"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_group_hidden_from_non_members() {
	let (app, _dir) = setup_test_app().await;

	let (_, alice) = register_and_login(&app, "alice@example.com").await;
	let (_, carol) = register_and_login(&app, "carol@example.com").await;

	let (_, group) = send(
		&app,
		"POST",
		"/groups",
		Some(&alice),
		Some(serde_json::json!({ "name": "household" })),
	)
	.await;
	let group_id = group["id"].as_i64().unwrap();

	// 404, not 403: non-members cannot learn the group exists.
	let (status, _) = send(&app, "GET", &format!("/groups/{group_id}"), Some(&carol), None).await;
	assert_eq!(status, StatusCode::NOT_FOUND);

	let (status, _) = send(
		&app,
		"PUT",
		&format!("/groups/{group_id}"),
		Some(&carol),
		Some(serde_json::json!({ "name": "stolen" })),
	)
	.await;
	assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_group_admin_cannot_be_removed_or_demoted() {
	let (app, _dir) = setup_test_app().await;

	let (alice_id, alice) = register_and_login(&app, "alice@example.com").await;

	let (_, group) = send(
		&app,
		"POST",
		"/groups",
		Some(&alice),
		Some(serde_json::json!({ "name": "household" })),
	)
	.await;
	let group_id = group["id"].as_i64().unwrap();

	let (status, _) = send(
		&app,
		"PUT",
		&format!("/groups/{group_id}/members/{alice_id}"),
		Some(&alice),
		Some(serde_json::json!({ "role": "viewer" })),
	)
	.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);

	let (status, _) = send(
		&app,
		"DELETE",
		&format!("/groups/{group_id}/members/{alice_id}"),
		Some(&alice),
		None,
	)
	.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_group_delete_removes_owned_data_only() {
	let (app, _dir) = setup_test_app().await;

	let (_, alice) = register_and_login(&app, "alice@example.com").await;

	let personal_food = create_category(&app, &alice, "/categories", "Food").await;
	let (_, personal_expense) =
		create_expense(&app, &alice, "/expenses", 5.0, "2025-01-01", personal_food).await;
	let personal_expense_id = personal_expense["id"].as_i64().unwrap();

	let (_, group) = send(
		&app,
		"POST",
		"/groups",
		Some(&alice),
		Some(serde_json::json!({ "name": "household" })),
	)
	.await;
	let group_id = group["id"].as_i64().unwrap();
	let rent = create_category(&app, &alice, &format!("/categories?group_id={group_id}"), "Rent").await;
	create_expense(
		&app,
		&alice,
		&format!("/expenses?group_id={group_id}"),
		100.0,
		"2025-01-02",
		rent,
	)
	.await;

	let (status, _) = send(&app, "DELETE", &format!("/groups/{group_id}"), Some(&alice), None).await;
	assert_eq!(status, StatusCode::NO_CONTENT);

	// Personal data is untouched.
	let (status, body) = send(
		&app,
		"GET",
		&format!("/expenses/{personal_expense_id}"),
		Some(&alice),
		None,
	)
	.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["category_id"].as_i64().unwrap(), personal_food);

	// The group scope is gone.
	let (status, _) = send(
		&app,
		"GET",
		&format!("/expenses?group_id={group_id}"),
		Some(&alice),
		None,
	)
	.await;
	assert_eq!(status, StatusCode::FORBIDDEN);
}

// ============================================================================
// Health and docs
// ============================================================================

#[tokio::test]
async fn test_health_check() {
	let (app, _dir) = setup_test_app().await;

	let (status, body) = send(&app, "GET", "/health", None, None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["status"], "ok");
	assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
	let (app, _dir) = setup_test_app().await;

	let (status, body) = send(&app, "GET", "/api/openapi.json", None, None).await;
	assert_eq!(status, StatusCode::OK);
	assert!(body["openapi"].is_string());
	assert!(body["paths"]["/budgets/exceeded"].is_object());
}
