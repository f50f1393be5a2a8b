//! The endpoint for deleting a dataset.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{Error, database_id::DatabaseId};

use super::{core::delete_dataset, datasets_page::DatasetState};

/// Delete the dataset with `dataset_id` and all of its sale rows.
///
/// On success the response body is empty so the htmx caller can remove the
/// dataset's table row; on failure an alert fragment is returned.
pub async fn delete_dataset_endpoint(
    State(state): State<DatasetState>,
    Path(dataset_id): Path<DatabaseId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_dataset(dataset_id, &connection) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(error) => {
            tracing::error!("could not delete dataset {dataset_id}: {error}");
            error.into_alert_response()
        }
    }
}
