//! CSV downloads of the dashboard's derived data.
//!
//! Two exports per dataset: the combined history-and-forecast revenue
//! series, and the all-time top products table. Both are small enough to
//! build in memory with the `csv` crate's writer.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    dashboard::{
        FORECAST_HORIZON_DAYS, LabelTotal, PredictionPoint, RangeFilter, aggregate, forecast,
        get_daily_revenue, get_sales_for_dataset,
    },
    database_id::DatabaseId,
    dataset::get_dataset,
};

/// The state needed for the CSV export endpoints.
#[derive(Debug, Clone)]
pub struct ExportState {
    /// The database connection for reading datasets and sales.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Download the dataset's revenue series with its forecast as
/// `date,revenue,kind` rows, where kind is `history` or `forecast`.
///
/// A dataset without enough history for a forecast downloads as a
/// header-only file.
pub async fn export_forecast_csv(
    State(state): State<ExportState>,
    Path(dataset_id): Path<DatabaseId>,
) -> Result<Response, Error> {
    let predictions = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        // 404 before an empty download when the dataset itself is missing.
        get_dataset(dataset_id, &connection)?;

        let daily = get_daily_revenue(dataset_id, &connection)
            .inspect_err(|error| tracing::error!("could not get daily revenue: {error}"))?;

        forecast(&daily, FORECAST_HORIZON_DAYS)
    };

    let csv_text = write_forecast_csv(&predictions)?;

    Ok(csv_download_response(
        &format!("dataset-{dataset_id}-forecast.csv"),
        csv_text,
    ))
}

/// Download the dataset's all-time top products as `product,revenue` rows.
pub async fn export_products_csv(
    State(state): State<ExportState>,
    Path(dataset_id): Path<DatabaseId>,
) -> Result<Response, Error> {
    let top_products = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_dataset(dataset_id, &connection)?;

        let sales = get_sales_for_dataset(dataset_id, &connection)
            .inspect_err(|error| tracing::error!("could not get sales: {error}"))?;

        aggregate(&sales, RangeFilter::All)
            .map(|summary| summary.top_products)
            .unwrap_or_default()
    };

    let csv_text = write_products_csv(&top_products)?;

    Ok(csv_download_response(
        &format!("dataset-{dataset_id}-top-products.csv"),
        csv_text,
    ))
}

fn write_forecast_csv(predictions: &[PredictionPoint]) -> Result<String, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(["date", "revenue", "kind"])
        .map_err(|error| Error::CsvWriteError(error.to_string()))?;

    for point in predictions {
        writer
            .write_record([
                point.date.to_string(),
                point.revenue.to_string(),
                point.kind.to_string(),
            ])
            .map_err(|error| Error::CsvWriteError(error.to_string()))?;
    }

    into_csv_string(writer)
}

fn write_products_csv(top_products: &[LabelTotal]) -> Result<String, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(["product", "revenue"])
        .map_err(|error| Error::CsvWriteError(error.to_string()))?;

    for entry in top_products {
        writer
            .write_record([entry.label.as_str(), &entry.revenue.to_string()])
            .map_err(|error| Error::CsvWriteError(error.to_string()))?;
    }

    into_csv_string(writer)
}

fn into_csv_string(writer: csv::Writer<Vec<u8>>) -> Result<String, Error> {
    let bytes = writer
        .into_inner()
        .map_err(|error| Error::CsvWriteError(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| Error::CsvWriteError(error.to_string()))
}

fn csv_download_response(file_name: &str, csv_text: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, "text/csv".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        csv_text,
    )
        .into_response()
}
