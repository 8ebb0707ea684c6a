//! Contas is a self-hosted web app for tracking household income and
//! expenses.
//!
//! The system of record is a workbook of CSV worksheets with a fixed column
//! order per sheet, accessed through a small client that treats the column
//! order as the wire contract. This library provides the workbook client,
//! the transaction store built on top of it, the derived-metrics functions,
//! and a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use time::Date;
use tokio::signal;

mod alert;
mod app_state;
mod category;
mod dashboard;
mod endpoints;
mod html;
mod internal_server_error;
mod logging;
mod metrics;
mod navigation;
mod not_found;
mod routing;
mod sheet;
mod timezone;
mod transaction;

pub use app_state::AppState;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use sheet::{RetryPolicy, ServiceCredentials, Workbook, connect_with_policy};
pub use transaction::TransactionStore;

use crate::{
    alert::Alert, internal_server_error::render_internal_server_error,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down
/// gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The service credentials are missing, malformed, or not scoped to the
    /// requested workbook.
    ///
    /// This error is fatal: the server must refuse to start rather than
    /// render pages from a backend it could not authenticate against.
    #[error("could not authenticate against the workbook: {0}")]
    Authentication(String),

    /// The workbook could not be reached.
    ///
    /// Connection establishment retries this error a bounded number of
    /// times; afterwards it becomes fatal.
    #[error("could not open the workbook: {0}")]
    Connection(String),

    /// A single worksheet read or write failed.
    ///
    /// Unlike [Error::Connection] this is never retried: the operation is
    /// reported as failed and the caller decides what to surface.
    #[error("worksheet operation failed: {0}")]
    Sheet(String),

    /// No row with the requested transaction id exists.
    ///
    /// Clients should treat this as a stale-view warning: the row may have
    /// been deleted since the page was rendered.
    #[error("the transaction could not be found")]
    TransactionNotFound,

    /// An empty description was used to create or update a transaction.
    #[error("a transaction needs a non-empty description")]
    EmptyDescription,

    /// A zero or negative amount was used to create a transaction.
    #[error("the amount must be greater than zero")]
    NonPositiveAmount,

    /// A date in the future was used to create a transaction.
    ///
    /// Transactions record events that have already happened, therefore
    /// future dates are not allowed.
    #[error("{0} is a date in the future, which is not allowed")]
    FutureDate(Date),

    /// An error occurred while getting the local timezone from a canonical
    /// timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// Could not acquire the transaction store lock.
    #[error("could not acquire the store lock")]
    StoreLock,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::TransactionNotFound => get_404_not_found_response(),
            Error::InvalidTimezone(timezone) => render_internal_server_error(
                "Invalid Timezone Settings",
                &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to a valid, canonical timezone string"
                ),
            ),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render_internal_server_error(
                    "Sorry, something went wrong.",
                    "Try again later or check the server logs",
                )
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::EmptyDescription => Alert::error(
                "Invalid description",
                "The description cannot be empty. Add a few words about the transaction.",
            )
            .into_response(StatusCode::BAD_REQUEST),
            Error::NonPositiveAmount => {
                Alert::error("Invalid amount", "The amount must be greater than zero.")
                    .into_response(StatusCode::BAD_REQUEST)
            }
            Error::FutureDate(date) => Alert::error(
                "Invalid transaction date",
                &format!("{date} is a date in the future, which is not allowed."),
            )
            .into_response(StatusCode::BAD_REQUEST),
            Error::TransactionNotFound => Alert::warning(
                "Could not find transaction",
                "The transaction could not be found. \
                Try refreshing the page to see if it has already been deleted.",
            )
            .into_response(StatusCode::NOT_FOUND),
            Error::InvalidTimezone(timezone) => Alert::error(
                "Invalid Timezone Settings",
                &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to a valid, canonical timezone string"
                ),
            )
            .into_response(StatusCode::INTERNAL_SERVER_ERROR),
            _ => Alert::error(
                "Something went wrong",
                "An unexpected error occurred, check the server logs for more details.",
            )
            .into_response(StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}
