//! The endpoint that turns an uploaded CSV file into a dataset.

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};

use axum::{
    extract::{FromRef, Multipart, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    alert::Alert,
    dataset::insert_dataset,
    html::format_count,
    sale::insert_sales,
};

use super::csv::parse_and_validate;

/// The state needed for importing sales CSV files.
#[derive(Debug, Clone)]
pub struct ImportState {
    /// The database connection for storing datasets and sales.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ImportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The fields read out of the upload form.
struct UploadForm {
    dataset_name: String,
    csv_text: String,
}

/// Create a dataset from an uploaded CSV file.
///
/// The multipart form must have a `dataset_name` text field and a `file`
/// field with content type `text/csv`. The dataset row and its sales are
/// written in one transaction, so a file that fails validation leaves no
/// trace in the database.
///
/// Responds with an alert fragment either way: a success alert with the
/// imported and skipped row counts, or an error alert saying what to fix.
pub async fn import_sales(State(state): State<ImportState>, multipart: Multipart) -> Response {
    let start_time = Instant::now();

    let form = match read_upload_form(multipart).await {
        Ok(form) => form,
        Err(error) => {
            tracing::debug!("rejected upload: {error}");
            return error.into_alert_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let import_result = import_into_db(&form, &connection);

    match import_result {
        Ok((imported, skipped)) => {
            let duration_ms = format_count(start_time.elapsed().as_millis() as usize);
            tracing::debug!(
                "imported {imported} sales ({skipped} skipped) into dataset \
                {:?} in {duration_ms}ms",
                form.dataset_name
            );

            Alert::Success {
                message: format!(
                    "Imported {} sales into \"{}\".",
                    format_count(imported),
                    form.dataset_name
                ),
                details: match skipped {
                    0 => format!("Completed in {duration_ms}ms."),
                    skipped => format!(
                        "Skipped {} rows that were missing a date or amount. \
                        Completed in {duration_ms}ms.",
                        format_count(skipped)
                    ),
                },
            }
            .into_html()
            .into_response()
        }
        Err(error) => {
            tracing::debug!("import failed: {error}");
            error.into_alert_response()
        }
    }
}

/// Parse the CSV and write the dataset and its sales in one transaction.
fn import_into_db(form: &UploadForm, connection: &Connection) -> Result<(usize, usize), Error> {
    let transaction = connection.unchecked_transaction()?;

    let dataset = insert_dataset(&form.dataset_name, &transaction)?;
    let outcome = parse_and_validate(&form.csv_text, dataset.id)?;
    let imported = insert_sales(&outcome.sales, &transaction)?;

    transaction.commit()?;

    Ok((imported, outcome.skipped_rows))
}

/// Read the dataset name and CSV text out of the multipart form.
async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, Error> {
    let mut dataset_name = String::new();
    let mut file_name = String::new();
    let mut csv_text = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| Error::MultipartError(error.to_string()))?
    {
        match field.name() {
            Some("dataset_name") => {
                dataset_name = field
                    .text()
                    .await
                    .map_err(|error| Error::MultipartError(error.to_string()))?
                    .trim()
                    .to_owned();
            }
            Some("file") => {
                if field.content_type() != Some("text/csv") {
                    return Err(Error::NotCsv);
                }

                file_name = field.file_name().unwrap_or_default().to_owned();
                csv_text = Some(
                    field
                        .text()
                        .await
                        .map_err(|error| Error::MultipartError(error.to_string()))?,
                );
            }
            _ => continue,
        }
    }

    let Some(csv_text) = csv_text else {
        return Err(Error::MultipartError("no file field in form".to_owned()));
    };

    if dataset_name.is_empty() {
        dataset_name = match file_name.trim_end_matches(".csv") {
            "" => "Untitled dataset".to_owned(),
            stem => stem.to_owned(),
        };
    }

    Ok(UploadForm {
        dataset_name,
        csv_text,
    })
}
