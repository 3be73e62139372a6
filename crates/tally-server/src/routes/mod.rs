// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! HTTP route handlers.

pub mod auth;
pub mod budgets;
pub mod categories;
pub mod expenses;
pub mod groups;
pub mod health;
pub mod users;
