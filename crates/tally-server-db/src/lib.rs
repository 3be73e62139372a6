// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQLite persistence for the tally server.
//!
//! Each entity gets a repository struct wrapping the shared pool. All
//! queries against scoped entities (categories, expenses, budgets) go
//! through the scope predicates in [`scoped`], which is how ownership
//! isolation is enforced at the SQL level rather than in handlers.

pub mod budget;
pub mod category;
pub mod error;
pub mod expense;
pub mod group;
pub mod migrations;
pub mod pool;
mod scoped;
pub mod testing;
pub mod user;

pub use budget::{Budget, BudgetPatch, BudgetRepository, NewBudget};
pub use category::{Category, CategoryRepository};
pub use error::{DbError, Result};
pub use expense::{Expense, ExpenseFilter, ExpensePatch, ExpenseRepository, NewExpense};
pub use group::{Group, GroupMember, GroupRepository};
pub use migrations::{
	ensure_fallback_category, require_fallback_category_id, run_migrations, FALLBACK_CATEGORY_NAME,
};
pub use pool::create_pool;
pub use user::UserRepository;
