// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Request authentication extractor.
//!
//! [`RequireAuth`] resolves the bearer token on every request: decode the
//! JWT, re-read the user row, check `is_active`. There is no session table;
//! a deactivated user's outstanding tokens stop working on their next
//! request. Every failure along the chain is a 401.

use axum::{
	extract::FromRequestParts,
	http::{request::Parts, StatusCode},
	response::{IntoResponse, Response},
	Json,
};
use tally_server_auth::{middleware::token_from_request, CurrentUser};

use crate::api::AppState;

/// Extractor that rejects unauthenticated requests with 401.
pub struct RequireAuth(pub CurrentUser);

fn unauthorized_response(error: &str, message: &str) -> Response {
	(
		StatusCode::UNAUTHORIZED,
		Json(serde_json::json!({ "error": error, "message": message })),
	)
		.into_response()
}

impl FromRequestParts<AppState> for RequireAuth {
	type Rejection = Response;

	async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
		let Some(token) = token_from_request(&parts.headers) else {
			return Err(unauthorized_response(
				"missing_token",
				"authentication required",
			));
		};

		let claims = match state.token_codec.decode(&token) {
			Ok(claims) => claims,
			Err(_) => {
				return Err(unauthorized_response(
					"invalid_token",
					"token is invalid or expired",
				));
			}
		};

		let user = match state.user_repo.get_user_by_email(&claims.sub).await {
			Ok(Some(user)) => user,
			Ok(None) => {
				return Err(unauthorized_response(
					"invalid_token",
					"token is invalid or expired",
				));
			}
			Err(e) => {
				// Fail closed: a lookup error never authenticates.
				tracing::error!(error = %e, "user lookup failed during authentication");
				return Err(unauthorized_response(
					"invalid_token",
					"authentication failed",
				));
			}
		};

		if !user.is_active {
			return Err(unauthorized_response(
				"account_disabled",
				"account is disabled",
			));
		}

		Ok(Self(CurrentUser::new(user)))
	}
}
