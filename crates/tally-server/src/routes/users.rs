// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! User registration and profile HTTP handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tally_server_auth::hash_password;

pub use tally_server_api::users::*;

use crate::{
	api::AppState,
	api_response::{bad_request, db_error, internal_error},
	auth_middleware::RequireAuth,
	impl_api_error_response,
};

impl_api_error_response!(UserErrorResponse);

#[utoipa::path(
    post,
    path = "/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid email or password", body = UserErrorResponse),
        (status = 409, description = "Email already registered", body = UserErrorResponse)
    ),
    tag = "users"
)]
/// POST /users - Register a new account.
#[tracing::instrument(skip(state, payload))]
pub async fn register(
	State(state): State<AppState>,
	Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
	let email = payload.email.trim().to_lowercase();
	if email.is_empty() || !email.contains('@') {
		return bad_request::<UserErrorResponse>("invalid_email", "a valid email is required")
			.into_response();
	}
	if payload.password.len() < 8 {
		return bad_request::<UserErrorResponse>(
			"invalid_password",
			"password must be at least 8 characters",
		)
		.into_response();
	}

	let password_hash = match hash_password(&payload.password) {
		Ok(hash) => hash,
		Err(e) => {
			tracing::error!(error = %e, "password hashing failed");
			return internal_error::<UserErrorResponse>("internal server error").into_response();
		}
	};

	match state.user_repo.create_user(&email, &password_hash).await {
		Ok(user) => (StatusCode::CREATED, Json(UserResponse::from(user))).into_response(),
		Err(e) => db_error::<UserErrorResponse>(&e).into_response(),
	}
}

#[utoipa::path(
    get,
    path = "/users/me",
    responses(
        (status = 200, description = "Current user profile", body = UserResponse),
        (status = 401, description = "Not authenticated", body = UserErrorResponse)
    ),
    tag = "users"
)]
/// GET /users/me - The authenticated user's profile.
#[tracing::instrument(skip_all)]
pub async fn me(RequireAuth(current_user): RequireAuth) -> impl IntoResponse {
	(StatusCode::OK, Json(UserResponse::from(current_user.user)))
}
