// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally_server_auth::types::UserId;
use tally_server_db::Category;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Request to create a category in the current scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CreateCategoryRequest {
	pub name: String,
}

/// Request to rename a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UpdateCategoryRequest {
	pub name: String,
}

/// A category in API responses.
///
/// `shared` marks the ownerless default categories that every scope can
/// see but none can modify.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CategoryResponse {
	pub id: i64,
	pub name: String,
	pub user_id: Option<i64>,
	pub group_id: Option<i64>,
	pub shared: bool,
	pub created_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponse {
	fn from(category: Category) -> Self {
		let shared = category.is_shared();
		Self {
			id: category.id.into_inner(),
			name: category.name,
			user_id: category.user_id.map(UserId::into_inner),
			group_id: category.group_id.map(|g| g.into_inner()),
			shared,
			created_at: category.created_at,
		}
	}
}

/// Response containing categories visible in the current scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ListCategoriesResponse {
	pub categories: Vec<CategoryResponse>,
}

/// Error response for category operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CategoryErrorResponse {
	pub error: String,
	pub message: String,
}
