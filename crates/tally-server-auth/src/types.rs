// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core type definitions for authentication and authorization.
//!
//! This module defines the foundational types used throughout the auth system:
//!
//! - **ID newtypes**: Type-safe wrappers around row ids for different entity
//!   types ([`UserId`], [`GroupId`], [`CategoryId`], etc.) preventing
//!   accidental mixing
//! - **Role enum**: Hierarchical roles within a group ([`GroupRole`])
//!
//! All ID types serialize transparently as integers.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// ID Newtypes
// =============================================================================

macro_rules! define_id_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(i64);

		impl $name {
			/// Create a new ID from a raw row id.
			pub fn new(id: i64) -> Self {
				Self(id)
			}

			/// Get the inner row id.
			pub fn into_inner(self) -> i64 {
				self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl From<i64> for $name {
			fn from(id: i64) -> Self {
				Self(id)
			}
		}

		impl From<$name> for i64 {
			fn from(id: $name) -> Self {
				id.0
			}
		}
	};
}

define_id_type!(UserId, "Unique identifier for a user.");
define_id_type!(GroupId, "Unique identifier for a group.");
define_id_type!(CategoryId, "Unique identifier for a category.");
define_id_type!(ExpenseId, "Unique identifier for an expense.");
define_id_type!(BudgetId, "Unique identifier for a budget.");

// =============================================================================
// Group Roles
// =============================================================================

/// Roles within a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupRole {
	/// Full group control: manage members, mutate the group and everything in it.
	Admin,
	/// May create and mutate group-owned entities, cannot manage members.
	Editor,
	/// Read-only access to group-owned entities.
	Viewer,
}

impl GroupRole {
	/// Returns all available group roles.
	pub fn all() -> &'static [GroupRole] {
		&[GroupRole::Admin, GroupRole::Editor, GroupRole::Viewer]
	}

	/// Returns true if this role has at least the permissions of the given role.
	pub fn has_permission_of(&self, other: &GroupRole) -> bool {
		matches!(
			(self, other),
			(GroupRole::Admin, _)
				| (GroupRole::Editor, GroupRole::Editor | GroupRole::Viewer)
				| (GroupRole::Viewer, GroupRole::Viewer)
		)
	}

	/// Returns true if this role may mutate group-owned entities.
	pub fn can_edit(&self) -> bool {
		self.has_permission_of(&GroupRole::Editor)
	}
}

impl fmt::Display for GroupRole {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			GroupRole::Admin => write!(f, "admin"),
			GroupRole::Editor => write!(f, "editor"),
			GroupRole::Viewer => write!(f, "viewer"),
		}
	}
}

impl std::str::FromStr for GroupRole {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"admin" => Ok(GroupRole::Admin),
			"editor" => Ok(GroupRole::Editor),
			"viewer" => Ok(GroupRole::Viewer),
			other => Err(format!("unknown group role: {other}")),
		}
	}
}
