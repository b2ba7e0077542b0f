// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Outbound notifications.
//!
//! The service only composes messages; delivery is delegated to a
//! [`Notifier`]. [`LogNotifier`] writes messages to the tracing pipeline and
//! is the default when no mail transport is configured.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::NotifyError;

// =============================================================================
// EmailMessage
// =============================================================================

/// An outbound email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub text: String,
    /// Optional HTML body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

impl EmailMessage {
    /// Creates a plain-text message.
    pub fn new(to: impl Into<String>, subject: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            text: text.into(),
            html: None,
        }
    }

    /// Attaches an HTML body.
    pub fn with_html(mut self, html: impl Into<String>) -> Self {
        self.html = Some(html.into());
        self
    }

    /// Welcome message for a new account.
    pub fn welcome(to: &str, user_name: &str) -> Self {
        Self::new(
            to,
            "Welcome to Quill!",
            format!("Hello {}, welcome to Quill!", user_name),
        )
        .with_html(format!(
            "<h1>Welcome {}!</h1><p>Thank you for joining.</p>",
            user_name
        ))
    }

    /// Verification code for a new account.
    pub fn verification(to: &str, user_name: &str, code: &str) -> Self {
        Self::new(
            to,
            "Verify your email address",
            format!(
                "Hello {}, your verification code is {}. It expires in 24 hours.",
                user_name, code
            ),
        )
    }

    /// Password reset link.
    pub fn password_reset(to: &str, frontend_url: &str, token: &str) -> Self {
        let url = format!("{}/reset-password?token={}", frontend_url.trim_end_matches('/'), token);
        Self::new(
            to,
            "Password Reset Request",
            format!("Please follow this link to reset your password: {}", url),
        )
    }

    /// New-post announcement.
    pub fn blog_notification(to: &str, blog_subject: &str) -> Self {
        Self::new(
            to,
            format!("New post: {}", blog_subject),
            format!("A new post \"{}\" has been published.", blog_subject),
        )
    }

    fn validate(&self) -> Result<(), NotifyError> {
        if self.to.trim().is_empty() {
            return Err(NotifyError::invalid_message("recipient is empty"));
        }
        if !self.to.contains('@') {
            return Err(NotifyError::invalid_message(format!(
                "recipient '{}' is not an email address",
                self.to
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Notifier
// =============================================================================

/// Delivers messages to users.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends a message.
    async fn send(&self, message: EmailMessage) -> Result<(), NotifyError>;

    /// Name for logging.
    fn name(&self) -> &'static str;
}

/// Logs messages instead of delivering them.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: EmailMessage) -> Result<(), NotifyError> {
        message.validate()?;
        info!(to = %message.to, subject = %message.subject, "Email queued (log transport)");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

// =============================================================================
// Tests
// =============================================================================
