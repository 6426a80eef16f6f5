//! Toast notifications.

use serde::{Deserialize, Serialize};
use verdant_market_core::ActionResult;

/// Visual style of a toast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastVariant {
    #[default]
    Default,
    Destructive,
}

impl ToastVariant {
    /// CSS modifier class.
    #[must_use]
    pub const fn class(self) -> &'static str {
        match self {
            Self::Default => "toast-default",
            Self::Destructive => "toast-destructive",
        }
    }
}

/// A transient notification with a title and description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
}

impl Toast {
    /// "Success!" toast.
    #[must_use]
    pub fn success(description: impl Into<String>) -> Self {
        Self {
            title: "Success!".to_string(),
            description: description.into(),
            variant: ToastVariant::Default,
        }
    }

    /// Destructive "Error" toast.
    #[must_use]
    pub fn error(description: impl Into<String>) -> Self {
        Self {
            title: "Error".to_string(),
            description: description.into(),
            variant: ToastVariant::Destructive,
        }
    }

    /// The toast announcing an action's result, if it carried a message.
    #[must_use]
    pub fn for_result(result: &ActionResult) -> Option<Self> {
        if !result.has_message() {
            return None;
        }
        Some(if result.success {
            Self::success(&result.message)
        } else {
            Self::error(&result.message)
        })
    }

    /// Returns `true` for destructive toasts.
    #[must_use]
    pub fn is_destructive(&self) -> bool {
        self.variant == ToastVariant::Destructive
    }
}
