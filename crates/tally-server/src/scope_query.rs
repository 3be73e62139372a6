// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Per-request scope selection.
//!
//! Every scoped route accepts an optional `group_id` query parameter.
//! Absent, the request operates in the caller's personal scope; present,
//! the caller's membership is resolved and the request operates in the
//! group's scope with the member's role. Non-members get a 403 and learn
//! nothing about the group's contents.

use axum::response::{IntoResponse, Response};
use tally_server_auth::{
	resolve_scope,
	types::{GroupId, UserId},
	Scope, ScopeError,
};

use crate::{
	api::AppState,
	api_response::{forbidden, internal_error, ApiErrorResponse},
};

/// Query parameter selecting the scope a request operates in.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ScopeParams {
	pub group_id: Option<i64>,
}

/// Resolve the caller's scope for this request.
///
/// The error type parameter picks the route's wire error shape so scope
/// failures look like every other error from that route.
pub async fn resolve_request_scope<T: ApiErrorResponse>(
	state: &AppState,
	user_id: UserId,
	params: &ScopeParams,
) -> Result<Scope, Response> {
	let requested_group = params.group_id.map(GroupId::new);

	let membership = match requested_group {
		Some(group_id) => match state.group_repo.membership_role(group_id, user_id).await {
			Ok(role) => role,
			Err(e) => {
				tracing::error!(error = %e, %group_id, "membership lookup failed");
				return Err(internal_error::<T>("internal server error").into_response());
			}
		},
		None => None,
	};

	resolve_scope(user_id, requested_group, membership).map_err(|e| match e {
		ScopeError::NotAMember(group_id) => {
			tracing::debug!(%group_id, %user_id, "scope rejected, not a member");
			forbidden::<T>("not_a_member", "not a member of this group").into_response()
		}
	})
}
