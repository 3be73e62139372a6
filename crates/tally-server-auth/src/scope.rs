// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Scope resolution: the ownership boundary that determines visibility and
//! mutability of categories, expenses, and budgets.
//!
//! A request operates in exactly one scope:
//! - **Personal**: rows owned by the calling user (`user_id = caller`)
//! - **Group**: rows owned by a group the caller belongs to (`group_id = g`)
//!
//! Shared default categories (no owner at all) overlay both scopes: they are
//! visible in every listing but never mutable. When both a personal and a
//! shared row match a query, both are returned; only the personal row
//! accepts mutation.

use serde::{Deserialize, Serialize};

use crate::types::{GroupId, GroupRole, UserId};

/// The resolved ownership boundary for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scope {
	/// Rows owned directly by this user.
	Personal(UserId),
	/// Rows owned by this group; the caller holds the given role.
	Group { id: GroupId, role: GroupRole },
}

impl Scope {
	/// Personal scope for the given user.
	pub fn personal(user_id: UserId) -> Self {
		Scope::Personal(user_id)
	}

	/// Group scope with the caller's membership role.
	pub fn group(id: GroupId, role: GroupRole) -> Self {
		Scope::Group { id, role }
	}

	/// The `user_id` owner column value rows created in this scope carry.
	pub fn owner_user_id(&self) -> Option<UserId> {
		match self {
			Scope::Personal(user_id) => Some(*user_id),
			Scope::Group { .. } => None,
		}
	}

	/// The `group_id` owner column value rows created in this scope carry.
	pub fn owner_group_id(&self) -> Option<GroupId> {
		match self {
			Scope::Personal(_) => None,
			Scope::Group { id, .. } => Some(*id),
		}
	}

	/// Whether the caller may create/update/delete rows in this scope.
	///
	/// Personal rows are always writable by their owner; group rows require
	/// at least the `editor` role.
	pub fn can_write(&self) -> bool {
		match self {
			Scope::Personal(_) => true,
			Scope::Group { role, .. } => role.can_edit(),
		}
	}

	/// Whether the caller administers this scope (member management etc.).
	pub fn is_admin(&self) -> bool {
		match self {
			Scope::Personal(_) => true,
			Scope::Group { role, .. } => *role == GroupRole::Admin,
		}
	}
}

/// Failure to resolve a requested scope.
#[derive(Debug, thiserror::Error)]
pub enum ScopeError {
	/// The caller is not a member of the requested group.
	#[error("user is not a member of group {0}")]
	NotAMember(GroupId),
}

/// Resolve the scope for a request.
///
/// `membership` is the caller's role in `requested_group` as looked up by
/// the database layer (`None` when not a member). When no group is
/// requested, the scope is personal.
pub fn resolve_scope(
	user_id: UserId,
	requested_group: Option<GroupId>,
	membership: Option<GroupRole>,
) -> Result<Scope, ScopeError> {
	match requested_group {
		None => Ok(Scope::personal(user_id)),
		Some(group_id) => match membership {
			Some(role) => Ok(Scope::group(group_id, role)),
			None => Err(ScopeError::NotAMember(group_id)),
		},
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_personal_scope_is_writable() {
		let scope = Scope::personal(UserId::new(1));
		assert!(scope.can_write());
		assert!(scope.is_admin());
		assert_eq!(scope.owner_user_id(), Some(UserId::new(1)));
		assert_eq!(scope.owner_group_id(), None);
	}

	#[test]
	fn test_group_scope_roles() {
		let viewer = Scope::group(GroupId::new(3), GroupRole::Viewer);
		assert!(!viewer.can_write());
		assert!(!viewer.is_admin());

		let editor = Scope::group(GroupId::new(3), GroupRole::Editor);
		assert!(editor.can_write());
		assert!(!editor.is_admin());

		let admin = Scope::group(GroupId::new(3), GroupRole::Admin);
		assert!(admin.can_write());
		assert!(admin.is_admin());
		assert_eq!(admin.owner_group_id(), Some(GroupId::new(3)));
		assert_eq!(admin.owner_user_id(), None);
	}

	#[test]
	fn test_resolve_personal_when_no_group_requested() {
		let scope = resolve_scope(UserId::new(1), None, None).unwrap();
		assert_eq!(scope, Scope::personal(UserId::new(1)));
	}

	#[test]
	fn test_resolve_group_requires_membership() {
		let err = resolve_scope(UserId::new(1), Some(GroupId::new(9)), None).unwrap_err();
		assert!(matches!(err, ScopeError::NotAMember(g) if g == GroupId::new(9)));

		let scope =
			resolve_scope(UserId::new(1), Some(GroupId::new(9)), Some(GroupRole::Viewer)).unwrap();
		assert_eq!(scope, Scope::group(GroupId::new(9), GroupRole::Viewer));
	}
}
