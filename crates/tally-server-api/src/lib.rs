// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request and response types for the tally HTTP API.
//!
//! Wire types are kept separate from the db entities; `From` impls do the
//! mapping so handlers never hand out internal fields like password hashes.

pub mod auth;
pub mod budgets;
pub mod categories;
pub mod expenses;
pub mod groups;
pub mod users;

pub use auth::{AuthErrorResponse, TokenRequest, TokenResponse};
pub use budgets::{
	BudgetErrorResponse, BudgetResponse, CreateBudgetRequest, ListBudgetsResponse,
	UpdateBudgetRequest,
};
pub use categories::{
	CategoryErrorResponse, CategoryResponse, CreateCategoryRequest, ListCategoriesResponse,
	UpdateCategoryRequest,
};
pub use expenses::{
	CreateExpenseRequest, ExpenseErrorResponse, ExpenseResponse, ListExpensesParams,
	ListExpensesResponse, UpdateExpenseRequest,
};
pub use groups::{
	AddMemberRequest, CreateGroupRequest, GroupErrorResponse, GroupMemberResponse, GroupResponse,
	GroupRoleApi, ListGroupMembersResponse, ListGroupsResponse, UpdateGroupRequest,
	UpdateMemberRoleRequest,
};
pub use users::{RegisterRequest, UserErrorResponse, UserResponse};
