// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Credential exchange HTTP handlers.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tally_server_auth::verify_password;

pub use tally_server_api::auth::*;

use crate::{
	api::AppState,
	api_response::{internal_error, unauthorized},
	impl_api_error_response,
};

impl_api_error_response!(AuthErrorResponse);

#[utoipa::path(
    post,
    path = "/auth/token",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Invalid credentials", body = AuthErrorResponse)
    ),
    tag = "auth"
)]
/// POST /auth/token - Exchange email and password for a bearer token.
///
/// Unknown emails, wrong passwords, and deactivated accounts all return
/// the same 401 so the endpoint does not leak which accounts exist.
#[tracing::instrument(skip(state, payload))]
pub async fn issue_token(
	State(state): State<AppState>,
	Json(payload): Json<TokenRequest>,
) -> impl IntoResponse {
	let invalid =
		|| unauthorized::<AuthErrorResponse>("invalid_credentials", "invalid email or password");

	// Same normalization as registration.
	let email = payload.email.trim().to_lowercase();
	let user = match state.user_repo.get_user_by_email(&email).await {
		Ok(Some(user)) => user,
		Ok(None) => return invalid().into_response(),
		Err(e) => {
			tracing::error!(error = %e, "user lookup failed");
			return internal_error::<AuthErrorResponse>("internal server error").into_response();
		}
	};

	// A malformed stored hash verifies as false rather than erroring out.
	let password_ok = matches!(
		verify_password(&payload.password, &user.password_hash),
		Ok(true)
	);
	if !user.is_active || !password_ok {
		return invalid().into_response();
	}

	match state.token_codec.issue(&user.email) {
		Ok(token) => (
			StatusCode::OK,
			Json(TokenResponse {
				access_token: token,
				token_type: "bearer".to_string(),
				expires_in_minutes: state.token_ttl_minutes,
			}),
		)
			.into_response(),
		Err(e) => {
			tracing::error!(error = %e, "token issuance failed");
			internal_error::<AuthErrorResponse>("internal server error").into_response()
		}
	}
}
