//! Alert messages for displaying success, warning, and error feedback.
//!
//! Endpoints respond with an alert body when an operation cannot complete;
//! htmx swaps it into the alert container declared by the base layout.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

/// Alert message types for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AlertKind {
    Warning,
    Error,
}

impl AlertKind {
    fn container_style(self) -> &'static str {
        match self {
            AlertKind::Warning => {
                "p-4 mb-4 text-sm text-yellow-800 rounded-lg bg-yellow-50 \
                dark:bg-gray-800 dark:text-yellow-300 shadow-lg"
            }
            AlertKind::Error => {
                "p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50 \
                dark:bg-gray-800 dark:text-red-400 shadow-lg"
            }
        }
    }
}

/// A user-facing message with a short title and a longer explanation.
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    kind: AlertKind,
    message: String,
    details: String,
}

impl Alert {
    /// Create a new warning alert for recoverable conditions, e.g. a row
    /// that was deleted by another tab.
    pub fn warning(message: &str, details: &str) -> Self {
        Self {
            kind: AlertKind::Warning,
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Create a new error alert.
    pub fn error(message: &str, details: &str) -> Self {
        Self {
            kind: AlertKind::Error,
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Render the alert as markup for the alert container.
    pub fn render(&self) -> Markup {
        html! {
            div
                class=(self.kind.container_style())
                role="alert"
                onclick="this.parentElement.classList.add('hidden')"
            {
                span class="font-medium" { (self.message) }
                @if !self.details.is_empty() {
                    " " (self.details)
                }
            }

            script { "document.getElementById('alert-container').classList.remove('hidden');" }
        }
    }

    /// Render the alert as a complete response with the given status.
    pub fn into_response(self, status_code: StatusCode) -> Response {
        (status_code, self.render()).into_response()
    }
}
