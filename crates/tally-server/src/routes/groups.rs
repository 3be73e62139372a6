// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Group and membership HTTP handlers.
//!
//! Visibility is membership: non-members get a 404 for the group itself,
//! never a 403, so the existence of a group is not leaked. Mutating the
//! group record or its membership requires the admin role.

use axum::{
	extract::{Path, Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use tally_server_auth::{
	types::{GroupId, UserId},
	GroupRole,
};
use tally_server_db::Group;

pub use tally_server_api::groups::*;

use crate::{
	api::AppState,
	api_response::{bad_request, db_error, forbidden, internal_error, not_found},
	auth_middleware::RequireAuth,
	impl_api_error_response,
	pagination::PaginationParams,
};

impl_api_error_response!(GroupErrorResponse);

/// Load a group the user can see, or produce the right error response.
async fn visible_group(state: &AppState, group_id: GroupId, user_id: UserId) -> Result<Group, Response> {
	match state.group_repo.get_group_for_user(group_id, user_id).await {
		Ok(Some(group)) => Ok(group),
		Ok(None) => Err(not_found::<GroupErrorResponse>("group not found").into_response()),
		Err(e) => {
			tracing::error!(error = %e, %group_id, "failed to get group");
			Err(internal_error::<GroupErrorResponse>("internal server error").into_response())
		}
	}
}

/// Load a group and require the caller to hold the admin role in it.
async fn admin_group(state: &AppState, group_id: GroupId, user_id: UserId) -> Result<Group, Response> {
	let group = visible_group(state, group_id, user_id).await?;

	match state.group_repo.membership_role(group_id, user_id).await {
		Ok(Some(GroupRole::Admin)) => Ok(group),
		Ok(_) => Err(
			forbidden::<GroupErrorResponse>("admin_required", "only a group admin can do this")
				.into_response(),
		),
		Err(e) => {
			tracing::error!(error = %e, %group_id, "membership lookup failed");
			Err(internal_error::<GroupErrorResponse>("internal server error").into_response())
		}
	}
}

#[utoipa::path(
    get,
    path = "/groups",
    params(
        ("limit" = Option<i32>, Query, description = "Page size"),
        ("offset" = Option<i32>, Query, description = "Page offset")
    ),
    responses(
        (status = 200, description = "Groups the caller belongs to", body = ListGroupsResponse),
        (status = 401, description = "Not authenticated", body = GroupErrorResponse)
    ),
    tag = "groups"
)]
/// GET /groups - List groups the caller administers or belongs to.
#[tracing::instrument(skip(state))]
pub async fn list_groups(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Query(pagination): Query<PaginationParams>,
) -> impl IntoResponse {
	let limit = pagination.limit_clamped(50, 200);
	let offset = pagination.offset_or_default();

	match state
		.group_repo
		.list_groups_for_user(current_user.user_id(), limit, offset)
		.await
	{
		Ok(groups) => (
			StatusCode::OK,
			Json(ListGroupsResponse {
				groups: groups.into_iter().map(Into::into).collect(),
			}),
		)
			.into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to list groups");
			db_error::<GroupErrorResponse>(&e).into_response()
		}
	}
}

#[utoipa::path(
    post,
    path = "/groups",
    request_body = CreateGroupRequest,
    responses(
        (status = 201, description = "Group created with the caller as admin", body = GroupResponse),
        (status = 400, description = "Invalid name", body = GroupErrorResponse),
        (status = 401, description = "Not authenticated", body = GroupErrorResponse)
    ),
    tag = "groups"
)]
/// POST /groups - Create a group. The caller becomes its admin and first
/// member.
#[tracing::instrument(skip(state, payload))]
pub async fn create_group(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Json(payload): Json<CreateGroupRequest>,
) -> impl IntoResponse {
	let name = payload.name.trim();
	if name.is_empty() {
		return bad_request::<GroupErrorResponse>("invalid_name", "group name is required")
			.into_response();
	}

	match state
		.group_repo
		.create_group(name, current_user.user_id())
		.await
	{
		Ok(group) => (StatusCode::CREATED, Json(GroupResponse::from(group))).into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to create group");
			db_error::<GroupErrorResponse>(&e).into_response()
		}
	}
}

#[utoipa::path(
    get,
    path = "/groups/{id}",
    params(
        ("id" = i64, Path, description = "Group ID")
    ),
    responses(
        (status = 200, description = "Group", body = GroupResponse),
        (status = 401, description = "Not authenticated", body = GroupErrorResponse),
        (status = 404, description = "Absent or not a member", body = GroupErrorResponse)
    ),
    tag = "groups"
)]
/// GET /groups/{id} - Fetch a group the caller belongs to.
#[tracing::instrument(skip(state))]
pub async fn get_group(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<i64>,
) -> impl IntoResponse {
	match visible_group(&state, GroupId::new(id), current_user.user_id()).await {
		Ok(group) => (StatusCode::OK, Json(GroupResponse::from(group))).into_response(),
		Err(response) => response,
	}
}

#[utoipa::path(
    put,
    path = "/groups/{id}",
    params(
        ("id" = i64, Path, description = "Group ID")
    ),
    request_body = UpdateGroupRequest,
    responses(
        (status = 200, description = "Group renamed", body = GroupResponse),
        (status = 400, description = "Invalid name", body = GroupErrorResponse),
        (status = 401, description = "Not authenticated", body = GroupErrorResponse),
        (status = 403, description = "Caller is not the group admin", body = GroupErrorResponse),
        (status = 404, description = "Absent or not a member", body = GroupErrorResponse)
    ),
    tag = "groups"
)]
/// PUT /groups/{id} - Rename a group. Admin only.
#[tracing::instrument(skip(state, payload))]
pub async fn update_group(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<i64>,
	Json(payload): Json<UpdateGroupRequest>,
) -> impl IntoResponse {
	let group_id = GroupId::new(id);
	if let Err(response) = admin_group(&state, group_id, current_user.user_id()).await {
		return response;
	}

	let name = payload.name.trim();
	if name.is_empty() {
		return bad_request::<GroupErrorResponse>("invalid_name", "group name is required")
			.into_response();
	}

	match state.group_repo.rename_group(group_id, name).await {
		Ok(Some(group)) => (StatusCode::OK, Json(GroupResponse::from(group))).into_response(),
		Ok(None) => not_found::<GroupErrorResponse>("group not found").into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to rename group");
			db_error::<GroupErrorResponse>(&e).into_response()
		}
	}
}

#[utoipa::path(
    delete,
    path = "/groups/{id}",
    params(
        ("id" = i64, Path, description = "Group ID")
    ),
    responses(
        (status = 204, description = "Group and its owned data deleted"),
        (status = 401, description = "Not authenticated", body = GroupErrorResponse),
        (status = 403, description = "Caller is not the group admin", body = GroupErrorResponse),
        (status = 404, description = "Absent or not a member", body = GroupErrorResponse)
    ),
    tag = "groups"
)]
/// DELETE /groups/{id} - Delete a group and everything it owns. Admin only.
#[tracing::instrument(skip(state))]
pub async fn delete_group(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<i64>,
) -> impl IntoResponse {
	let group_id = GroupId::new(id);
	if let Err(response) = admin_group(&state, group_id, current_user.user_id()).await {
		return response;
	}

	match state.group_repo.delete_group(group_id).await {
		Ok(true) => StatusCode::NO_CONTENT.into_response(),
		Ok(false) => not_found::<GroupErrorResponse>("group not found").into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to delete group");
			db_error::<GroupErrorResponse>(&e).into_response()
		}
	}
}

#[utoipa::path(
    get,
    path = "/groups/{id}/members",
    params(
        ("id" = i64, Path, description = "Group ID"),
        ("limit" = Option<i32>, Query, description = "Page size"),
        ("offset" = Option<i32>, Query, description = "Page offset")
    ),
    responses(
        (status = 200, description = "Group members", body = ListGroupMembersResponse),
        (status = 401, description = "Not authenticated", body = GroupErrorResponse),
        (status = 404, description = "Absent or not a member", body = GroupErrorResponse)
    ),
    tag = "groups"
)]
/// GET /groups/{id}/members - List a group's members. Any member may look.
#[tracing::instrument(skip(state))]
pub async fn list_members(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<i64>,
	Query(pagination): Query<PaginationParams>,
) -> impl IntoResponse {
	let group_id = GroupId::new(id);
	if let Err(response) = visible_group(&state, group_id, current_user.user_id()).await {
		return response;
	}

	let limit = pagination.limit_clamped(50, 200);
	let offset = pagination.offset_or_default();

	match state.group_repo.list_members(group_id, limit, offset).await {
		Ok(members) => (
			StatusCode::OK,
			Json(ListGroupMembersResponse {
				members: members.into_iter().map(Into::into).collect(),
			}),
		)
			.into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to list members");
			db_error::<GroupErrorResponse>(&e).into_response()
		}
	}
}

#[utoipa::path(
    post,
    path = "/groups/{id}/members",
    params(
        ("id" = i64, Path, description = "Group ID")
    ),
    request_body = AddMemberRequest,
    responses(
        (status = 201, description = "Member added", body = GroupMemberResponse),
        (status = 401, description = "Not authenticated", body = GroupErrorResponse),
        (status = 403, description = "Caller is not the group admin", body = GroupErrorResponse),
        (status = 404, description = "Group or user not found", body = GroupErrorResponse),
        (status = 409, description = "Already a member", body = GroupErrorResponse)
    ),
    tag = "groups"
)]
/// POST /groups/{id}/members - Add a member. Admin only.
#[tracing::instrument(skip(state, payload))]
pub async fn add_member(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<i64>,
	Json(payload): Json<AddMemberRequest>,
) -> impl IntoResponse {
	let group_id = GroupId::new(id);
	if let Err(response) = admin_group(&state, group_id, current_user.user_id()).await {
		return response;
	}

	let member_id = UserId::new(payload.user_id);
	match state.user_repo.get_user_by_id(member_id).await {
		Ok(Some(_)) => {}
		Ok(None) => return not_found::<GroupErrorResponse>("user not found").into_response(),
		Err(e) => {
			tracing::error!(error = %e, "user lookup failed");
			return internal_error::<GroupErrorResponse>("internal server error").into_response();
		}
	}

	match state
		.group_repo
		.add_member(group_id, member_id, payload.role.into())
		.await
	{
		Ok(member) => (StatusCode::CREATED, Json(GroupMemberResponse::from(member))).into_response(),
		Err(e) => db_error::<GroupErrorResponse>(&e).into_response(),
	}
}

#[utoipa::path(
    put,
    path = "/groups/{id}/members/{user_id}",
    params(
        ("id" = i64, Path, description = "Group ID"),
        ("user_id" = i64, Path, description = "Member user ID")
    ),
    request_body = UpdateMemberRoleRequest,
    responses(
        (status = 200, description = "Role updated", body = GroupMemberResponse),
        (status = 400, description = "Cannot change the group admin's role", body = GroupErrorResponse),
        (status = 401, description = "Not authenticated", body = GroupErrorResponse),
        (status = 403, description = "Caller is not the group admin", body = GroupErrorResponse),
        (status = 404, description = "Group or membership not found", body = GroupErrorResponse)
    ),
    tag = "groups"
)]
/// PUT /groups/{id}/members/{user_id} - Change a member's role. Admin only.
#[tracing::instrument(skip(state, payload))]
pub async fn update_member_role(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path((id, user_id)): Path<(i64, i64)>,
	Json(payload): Json<UpdateMemberRoleRequest>,
) -> impl IntoResponse {
	let group_id = GroupId::new(id);
	let group = match admin_group(&state, group_id, current_user.user_id()).await {
		Ok(group) => group,
		Err(response) => return response,
	};

	let member_id = UserId::new(user_id);
	if member_id == group.admin_id {
		return bad_request::<GroupErrorResponse>(
			"admin_role_fixed",
			"the group admin's role cannot be changed",
		)
		.into_response();
	}

	match state
		.group_repo
		.update_member_role(group_id, member_id, payload.role.into())
		.await
	{
		Ok(Some(member)) => (StatusCode::OK, Json(GroupMemberResponse::from(member))).into_response(),
		Ok(None) => not_found::<GroupErrorResponse>("membership not found").into_response(),
		Err(e) => db_error::<GroupErrorResponse>(&e).into_response(),
	}
}

#[utoipa::path(
    delete,
    path = "/groups/{id}/members/{user_id}",
    params(
        ("id" = i64, Path, description = "Group ID"),
        ("user_id" = i64, Path, description = "Member user ID")
    ),
    responses(
        (status = 204, description = "Member removed"),
        (status = 400, description = "Cannot remove the group admin", body = GroupErrorResponse),
        (status = 401, description = "Not authenticated", body = GroupErrorResponse),
        (status = 403, description = "Caller is not the group admin", body = GroupErrorResponse),
        (status = 404, description = "Group or membership not found", body = GroupErrorResponse)
    ),
    tag = "groups"
)]
/// DELETE /groups/{id}/members/{user_id} - Remove a member. Admin only.
#[tracing::instrument(skip(state))]
pub async fn remove_member(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path((id, user_id)): Path<(i64, i64)>,
) -> impl IntoResponse {
	let group_id = GroupId::new(id);
	let group = match admin_group(&state, group_id, current_user.user_id()).await {
		Ok(group) => group,
		Err(response) => return response,
	};

	let member_id = UserId::new(user_id);
	if member_id == group.admin_id {
		return bad_request::<GroupErrorResponse>(
			"admin_not_removable",
			"the group admin cannot be removed; delete the group instead",
		)
		.into_response();
	}

	match state.group_repo.remove_member(group_id, member_id).await {
		Ok(true) => StatusCode::NO_CONTENT.into_response(),
		Ok(false) => not_found::<GroupErrorResponse>("membership not found").into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to remove member");
			db_error::<GroupErrorResponse>(&e).into_response()
		}
	}
}
