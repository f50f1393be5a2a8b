//! Salecast is a web app for exploring sales exports: upload a CSV of raw
//! sale records, browse a dashboard of revenue metrics, and project
//! short-term revenue with a rolling moving-average forecast.
//!
//! The crate is split into two layers. The pure core — CSV ingestion
//! ([`parse_and_validate`]) and the aggregation and forecast engines
//! ([`aggregate`], [`forecast`]) — operates on plain value types and performs
//! no I/O, so it can be tested with literal fixtures. The surrounding axum
//! application stores datasets in SQLite and serves the dashboard as HTML.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod csv_import;
mod dashboard;
mod database_id;
mod dataset;
mod db;
mod endpoints;
mod export;
mod html;
mod internal_server_error;
mod navigation;
mod not_found;
mod routing;
mod sale;

pub use app_state::AppState;
pub use csv_import::{ParseOutcome, parse_and_validate};
pub use dashboard::{
    DailyPoint, DashboardSummary, Kpis, LabelTotal, PointKind, PredictionPoint, RangeFilter, Sale,
    UNSPECIFIED_LABEL, aggregate, forecast,
};
pub use database_id::DatabaseId;
pub use db::initialize as initialize_db;
pub use routing::build_router;
pub use sale::SaleRecord;

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
    /// The CSV header row lacks a date column, an amount column, or both.
    ///
    /// The string lists the missing column names for display to the user.
    /// This check runs once against the header, before any rows are read.
    #[error("the CSV file is missing required columns: {0}")]
    MissingColumns(String),

    /// The CSV file has a header row but no data rows.
    #[error("the CSV file contains no data rows")]
    EmptyCsv,

    /// Every data row in the CSV file was dropped by per-row validation.
    ///
    /// Individual bad rows (blank date, unparseable amount) are skipped
    /// silently; only the aggregate "zero valid rows" condition is an error.
    #[error("every row in the CSV file failed validation")]
    NoValidRows,

    /// The CSV had structural issues that prevented it from being read.
    #[error("could not read the CSV file: {0}")]
    InvalidCsv(String),

    /// The uploaded multipart field was not a CSV file.
    #[error("file is not a CSV")]
    NotCsv,

    /// The multipart form could not be parsed.
    #[error("could not parse multipart form: {0}")]
    MultipartError(String),

    /// A CSV export could not be written.
    #[error("could not write CSV: {0}")]
    CsvWriteError(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the
    /// parameters (e.g., the dataset ID) are correct and that the resource
    /// has been created.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to delete a dataset that does not exist.
    #[error("tried to delete a dataset that is not in the database")]
    DeleteMissingDataset,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            // Any errors that are not handled above are not intended to be
            // shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                render_internal_server_error(Default::default())
            }
        }
    }
}

impl Error {
    /// Render the error as an HTML alert fragment for htmx error targets.
    fn into_alert_response(self) -> Response {
        match self {
            Error::MissingColumns(columns) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Missing required columns".to_owned(),
                    details: format!(
                        "The CSV file must have a date column and an amount column \
                        (amount, revenue, or total). Missing: {columns}."
                    ),
                }
                .into_html(),
            )
                .into_response(),
            Error::EmptyCsv => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "No data to import".to_owned(),
                    details: "The CSV file only contains a header row. \
                        Export a file that includes sale rows and try again."
                        .to_owned(),
                }
                .into_html(),
            )
                .into_response(),
            Error::NoValidRows => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "No valid rows".to_owned(),
                    details: "Every row was missing its date or had an amount that \
                        could not be read as a number, so nothing was imported."
                        .to_owned(),
                }
                .into_html(),
            )
                .into_response(),
            Error::InvalidCsv(details) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Failed to parse CSV".to_owned(),
                    details,
                }
                .into_html(),
            )
                .into_response(),
            Error::NotCsv => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "File type must be CSV.".to_owned(),
                }
                .into_html(),
            )
                .into_response(),
            Error::MultipartError(_) => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "Could not read the uploaded file.".to_owned(),
                }
                .into_html(),
            )
                .into_response(),
            Error::DeleteMissingDataset => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete dataset".to_owned(),
                    details: "The dataset could not be found.".to_owned(),
                }
                .into_html(),
            )
                .into_response(),
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::ErrorSimple {
                        message: "An unexpected error occurred, please try again later."
                            .to_owned(),
                    }
                    .into_html(),
                )
                    .into_response()
            }
        }
    }
}
