// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication, credential verification, and scope resolution for tally.
//!
//! This crate is framework-agnostic: it depends on `http` header types for
//! token extraction but carries no axum/sqlx dependencies. The server crate
//! wires these pieces into extractors; the db crate consumes [`Scope`] to
//! build row filters.

pub mod error;
pub mod middleware;
pub mod password;
pub mod scope;
pub mod token;
pub mod types;
pub mod user;

pub use error::AuthError;
pub use middleware::{CurrentUser, AUTH_COOKIE_NAME};
pub use password::{hash_password, verify_password};
pub use scope::{resolve_scope, Scope, ScopeError};
pub use token::{Claims, TokenCodec};
pub use types::{BudgetId, CategoryId, ExpenseId, GroupId, GroupRole, UserId};
pub use user::User;
