// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally_server_auth::GroupRole;
use tally_server_db::{Group, GroupMember};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// A member role as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub enum GroupRoleApi {
	Admin,
	Editor,
	Viewer,
}

impl From<GroupRole> for GroupRoleApi {
	fn from(role: GroupRole) -> Self {
		match role {
			GroupRole::Admin => Self::Admin,
			GroupRole::Editor => Self::Editor,
			GroupRole::Viewer => Self::Viewer,
		}
	}
}

impl From<GroupRoleApi> for GroupRole {
	fn from(role: GroupRoleApi) -> Self {
		match role {
			GroupRoleApi::Admin => Self::Admin,
			GroupRoleApi::Editor => Self::Editor,
			GroupRoleApi::Viewer => Self::Viewer,
		}
	}
}

/// Request to create a group. The caller becomes the admin.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CreateGroupRequest {
	pub name: String,
}

/// Request to rename a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UpdateGroupRequest {
	pub name: String,
}

/// A group in API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct GroupResponse {
	pub id: i64,
	pub name: String,
	pub admin_id: i64,
	pub created_at: DateTime<Utc>,
}

impl From<Group> for GroupResponse {
	fn from(group: Group) -> Self {
		Self {
			id: group.id.into_inner(),
			name: group.name,
			admin_id: group.admin_id.into_inner(),
			created_at: group.created_at,
		}
	}
}

/// Response containing the caller's groups.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ListGroupsResponse {
	pub groups: Vec<GroupResponse>,
}

/// Request to add a member to a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AddMemberRequest {
	pub user_id: i64,
	pub role: GroupRoleApi,
}

/// Request to change a member's role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UpdateMemberRoleRequest {
	pub role: GroupRoleApi,
}

/// A group membership in API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct GroupMemberResponse {
	pub group_id: i64,
	pub user_id: i64,
	pub role: GroupRoleApi,
	pub added_at: DateTime<Utc>,
}

impl From<GroupMember> for GroupMemberResponse {
	fn from(member: GroupMember) -> Self {
		Self {
			group_id: member.group_id.into_inner(),
			user_id: member.user_id.into_inner(),
			role: member.role.into(),
			added_at: member.added_at,
		}
	}
}

/// Response containing a group's members.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ListGroupMembersResponse {
	pub members: Vec<GroupMemberResponse>,
}

/// Error response for group operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct GroupErrorResponse {
	pub error: String,
	pub message: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_role_round_trips_through_wire_form() {
		for role in GroupRole::all() {
			let api: GroupRoleApi = (*role).into();
			assert_eq!(GroupRole::from(api), *role);
		}
	}

	#[test]
	fn test_role_serializes_lowercase() {
		let json = serde_json::to_string(&GroupRoleApi::Editor).unwrap();
		assert_eq!(json, "\"editor\"");
	}
}
