// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication middleware types and request token extraction.
//!
//! This module provides:
//! - [`CurrentUser`] - authenticated user context extracted from requests
//! - Helper functions for extracting bearer tokens from headers and cookies
//!
//! # Authentication Flow
//!
//! ```text
//! Request → Extract Token (header or cookie) → Decode → Resolve user → CurrentUser
//! ```
//!
//! Each request is resolved independently; any failure along the chain
//! surfaces as an unauthenticated context (401 at the HTTP layer).
//!
//! # Security Notes
//!
//! - Bearer tokens are extracted from the `Authorization` header first, then
//!   the `auth_token` cookie
//! - Token values are never logged

use http::header::{AUTHORIZATION, COOKIE};
use http::HeaderMap;
use serde::{Deserialize, Serialize};

use crate::user::User;

/// Name of the cookie carrying a bearer token for browser clients.
pub const AUTH_COOKIE_NAME: &str = "auth_token";

/// The currently authenticated user, extracted from request context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
	/// The authenticated user.
	pub user: User,
}

impl CurrentUser {
	/// Create a new CurrentUser from a resolved token subject.
	pub fn new(user: User) -> Self {
		Self { user }
	}

	/// The user ID to use for ownership checks.
	pub fn user_id(&self) -> crate::types::UserId {
		self.user.id
	}
}

/// Extract a bearer token from the `Authorization` header.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
	let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
	let token = value.strip_prefix("Bearer ")?;
	if token.is_empty() {
		None
	} else {
		Some(token.to_string())
	}
}

/// Extract a bearer token from the `auth_token` cookie.
pub fn extract_cookie_token(headers: &HeaderMap) -> Option<String> {
	let cookies = headers.get(COOKIE)?.to_str().ok()?;
	for pair in cookies.split(';') {
		let mut parts = pair.trim().splitn(2, '=');
		if parts.next() == Some(AUTH_COOKIE_NAME) {
			let value = parts.next()?;
			if !value.is_empty() {
				return Some(value.to_string());
			}
		}
	}
	None
}

/// Extract a bearer token from a request, header first, cookie fallback.
pub fn token_from_request(headers: &HeaderMap) -> Option<String> {
	extract_bearer_token(headers).or_else(|| extract_cookie_token(headers))
}

#[cfg(test)]
mod tests {
	use super::*;
	use http::HeaderValue;

	fn headers_with(name: http::HeaderName, value: &str) -> HeaderMap {
		let mut headers = HeaderMap::new();
		headers.insert(name, HeaderValue::from_str(value).unwrap());
		headers
	}

	#[test]
	fn test_extract_bearer_token() {
		let headers = headers_with(AUTHORIZATION, "Bearer abc.def.ghi");
		assert_eq!(extract_bearer_token(&headers).as_deref(), Some("abc.def.ghi"));
	}

	#[test]
	fn test_extract_bearer_token_rejects_other_schemes() {
		let headers = headers_with(AUTHORIZATION, "Basic dXNlcjpwYXNz");
		assert!(extract_bearer_token(&headers).is_none());
	}

	#[test]
	fn test_extract_bearer_token_rejects_empty() {
		let headers = headers_with(AUTHORIZATION, "Bearer ");
		assert!(extract_bearer_token(&headers).is_none());
	}

	#[test]
	fn test_extract_cookie_token() {
		let headers = headers_with(COOKIE, "theme=dark; auth_token=abc.def.ghi; lang=en");
		assert_eq!(extract_cookie_token(&headers).as_deref(), Some("abc.def.ghi"));
	}

	#[test]
	fn test_extract_cookie_token_missing() {
		let headers = headers_with(COOKIE, "theme=dark");
		assert!(extract_cookie_token(&headers).is_none());
	}

	#[test]
	fn test_header_takes_precedence_over_cookie() {
		let mut headers = HeaderMap::new();
		headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
		headers.insert(COOKIE, HeaderValue::from_static("auth_token=from-cookie"));
		assert_eq!(token_from_request(&headers).as_deref(), Some("from-header"));
	}

	#[test]
	fn test_no_token_anywhere() {
		assert!(token_from_request(&HeaderMap::new()).is_none());
	}
}
