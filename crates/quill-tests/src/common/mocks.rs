// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Mock Implementations
//!
//! Stand-ins for outbound integrations that record what they were asked to do.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use quill_core::{EmailMessage, Notifier, NotifyError};

// =============================================================================
// Recording Notifier
// =============================================================================

/// Notifier that keeps every message instead of sending it.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<EmailMessage>>,
    fail: AtomicBool,
}

impl RecordingNotifier {
    /// Creates a notifier that accepts every message.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a notifier that rejects every message.
    pub fn failing() -> Self {
        let notifier = Self::new();
        notifier.set_failing(true);
        notifier
    }

    /// Toggles failure injection.
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Messages accepted so far.
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().clone()
    }

    /// Messages addressed to `to`.
    pub fn sent_to(&self, to: &str) -> Vec<EmailMessage> {
        self.sent
            .lock()
            .iter()
            .filter(|m| m.to == to)
            .cloned()
            .collect()
    }

    /// Number of messages accepted so far.
    pub fn count(&self) -> usize {
        self.sent.lock().len()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: EmailMessage) -> Result<(), NotifyError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(NotifyError::delivery_failed(&message.to, "injected failure"));
        }
        self.sent.lock().push(message);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
