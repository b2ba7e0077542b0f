// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Response Assertions
//!
//! Assertion helpers for responses with informative failure messages.

use axum::http::StatusCode;

use super::harness::TestResponse;

/// Assertion extensions for [`TestResponse`].
pub trait ResponseAssertions {
    /// Asserts the status code.
    fn assert_status(&self, expected: StatusCode) -> &Self;

    /// Asserts status and the `error` field of the body.
    fn assert_error(&self, expected: StatusCode, message: &str) -> &Self;

    /// Asserts a 401 whose `error` and `message` both equal `message`.
    fn assert_unauthorized(&self, message: &str) -> &Self;

    /// Asserts a 400 listing `field` among the offending fields.
    fn assert_field_error(&self, field: &str) -> &Self;

    /// Asserts the `message` field of a success body.
    fn assert_message(&self, message: &str) -> &Self;
}

impl ResponseAssertions for TestResponse {
    fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status, expected,
            "Expected status {}, got {} with body {}",
            expected, self.status, self.body
        );
        self
    }

    fn assert_error(&self, expected: StatusCode, message: &str) -> &Self {
        self.assert_status(expected);
        assert_eq!(
            self.body["error"], message,
            "Unexpected error body: {}",
            self.body
        );
        self
    }

    fn assert_unauthorized(&self, message: &str) -> &Self {
        self.assert_error(StatusCode::UNAUTHORIZED, message);
        assert_eq!(
            self.body["message"], message,
            "401 bodies repeat the error as message: {}",
            self.body
        );
        self
    }

    fn assert_field_error(&self, field: &str) -> &Self {
        self.assert_status(StatusCode::BAD_REQUEST);
        let fields = self.body["fields"]
            .as_array()
            .unwrap_or_else(|| panic!("Expected a fields array in {}", self.body));
        assert!(
            fields.iter().any(|f| f["field"] == field),
            "Expected field error for '{}' in {}",
            field,
            self.body
        );
        self
    }

    fn assert_message(&self, message: &str) -> &Self {
        assert_eq!(
            self.body["message"], message,
            "Unexpected message in {}",
            self.body
        );
        self
    }
}
