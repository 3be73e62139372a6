// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Scope-to-SQL predicate construction.
//!
//! Every scoped table carries nullable `user_id` and `group_id` owner
//! columns. The predicates here are the single place the visibility rules
//! are spelled out:
//!
//! - personal scope: `user_id = ? AND group_id IS NULL`
//! - group scope: `group_id = ?`
//! - shared rows (categories only): `user_id IS NULL AND group_id IS NULL`
//!
//! Mutating queries always use [`owned_predicate`], so shared rows can never
//! be updated or deleted through a scope, regardless of the caller.

use tally_server_auth::Scope;

/// A WHERE fragment plus the id it binds.
pub(crate) struct ScopePredicate {
	pub sql: String,
	pub bind: i64,
}

/// Predicate matching rows owned by this scope.
pub(crate) fn owned_predicate(scope: &Scope, alias: &str) -> ScopePredicate {
	match scope {
		Scope::Personal(user_id) => ScopePredicate {
			sql: format!("{alias}.user_id = ? AND {alias}.group_id IS NULL"),
			bind: user_id.into_inner(),
		},
		Scope::Group { id, .. } => ScopePredicate {
			sql: format!("{alias}.group_id = ?"),
			bind: id.into_inner(),
		},
	}
}

/// Predicate matching rows owned by this scope plus shared default rows.
pub(crate) fn visible_predicate(scope: &Scope, alias: &str) -> ScopePredicate {
	let owned = owned_predicate(scope, alias);
	ScopePredicate {
		sql: format!(
			"(({owned}) OR ({alias}.user_id IS NULL AND {alias}.group_id IS NULL))",
			owned = owned.sql
		),
		bind: owned.bind,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use tally_server_auth::{GroupId, GroupRole, UserId};

	#[test]
	fn test_personal_owned_predicate() {
		let p = owned_predicate(&Scope::personal(UserId::new(5)), "e");
		assert_eq!(p.sql, "e.user_id = ? AND e.group_id IS NULL");
		assert_eq!(p.bind, 5);
	}

	#[test]
	fn test_group_owned_predicate() {
		let p = owned_predicate(&Scope::group(GroupId::new(3), GroupRole::Editor), "b");
		assert_eq!(p.sql, "b.group_id = ?");
		assert_eq!(p.bind, 3);
	}

	#[test]
	fn test_visible_predicate_includes_shared() {
		let p = visible_predicate(&Scope::personal(UserId::new(5)), "c");
		assert!(p.sql.contains("c.user_id = ? AND c.group_id IS NULL"));
		assert!(p.sql.contains("c.user_id IS NULL AND c.group_id IS NULL"));
	}
}
