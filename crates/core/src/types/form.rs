//! Form submission contract.
//!
//! A form posts to a server action, which answers with an [`ActionResult`].
//! The result feeds back into the rendered form: the message becomes a toast,
//! and [`FieldErrors`] render under their inputs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Validation messages keyed by form field name.
///
/// Each field holds its messages in the order they were added. Forms show only
/// the first one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// An empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message for a field.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Builder-style [`add`](Self::add).
    #[must_use]
    pub fn with(mut self, field: &str, message: impl Into<String>) -> Self {
        self.add(field, message);
        self
    }

    /// The first message for a field, if any.
    #[must_use]
    pub fn first(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    /// All messages for a field.
    #[must_use]
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns `true` if a field has at least one message.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.0.get(field).is_some_and(|messages| !messages.is_empty())
    }

    /// Returns `true` if no field has a message.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }

    /// Field names with at least one message.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, messages)| !messages.is_empty())
            .map(|(field, _)| field.as_str())
    }
}

/// The result a server action hands back to its form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    /// Toast text. Empty means "nothing to announce".
    pub message: String,
    /// Whether the action did what it was asked.
    pub success: bool,
    /// Per-field validation messages.
    #[serde(default)]
    pub errors: FieldErrors,
}

impl ActionResult {
    /// The state a form starts in: `{ message: "", success: false, errors: {} }`.
    #[must_use]
    pub fn initial() -> Self {
        Self::default()
    }

    /// A successful result.
    #[must_use]
    pub fn succeeded(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
            errors: FieldErrors::new(),
        }
    }

    /// A failed result without field errors.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
            errors: FieldErrors::new(),
        }
    }

    /// A failed result carrying field errors.
    #[must_use]
    pub fn invalid(message: impl Into<String>, errors: FieldErrors) -> Self {
        Self {
            message: message.into(),
            success: false,
            errors,
        }
    }

    /// Returns `true` if there is a message to show.
    #[must_use]
    pub fn has_message(&self) -> bool {
        !self.message.is_empty()
    }
}

/// Where a form submission stands.
///
/// `Idle → Pending → Succeeded | Failed`, and back to `Pending` on the next
/// submit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestState {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

impl RequestState {
    /// Returns `true` while a submission is in flight.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns `true` once a submission has finished, either way.
    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// The settled state for a result.
    #[must_use]
    pub const fn settled(success: bool) -> Self {
        if success { Self::Succeeded } else { Self::Failed }
    }
}
