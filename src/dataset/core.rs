//! The dataset domain model and its database operations.

use rusqlite::{Connection, Row};
use time::{Date, OffsetDateTime};

use crate::{Error, database_id::DatabaseId};

/// One uploaded CSV file's worth of sale records.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// The dataset's database ID.
    pub id: DatabaseId,
    /// The name given to the dataset at upload time.
    pub name: String,
    /// The date the dataset was uploaded.
    pub created_at: Date,
}

/// A dataset together with the number of sale rows it holds, for the
/// datasets listing page.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct DatasetListing {
    pub dataset: Dataset,
    pub sale_count: usize,
}

/// Create the dataset table.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub(crate) fn create_dataset_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS dataset (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL
        );",
    )
}

/// Insert a new dataset named `name`, stamped with today's date.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an unexpected SQL error.
pub(crate) fn insert_dataset(name: &str, connection: &Connection) -> Result<Dataset, Error> {
    let created_at = OffsetDateTime::now_utc().date();

    connection
        .query_row(
            "INSERT INTO dataset (name, created_at) VALUES (?1, ?2)
             RETURNING id, name, created_at",
            (name, created_at),
            map_dataset_row,
        )
        .map_err(|error| error.into())
}

/// Get the dataset with `id`.
///
/// # Errors
/// Returns [Error::NotFound] if no dataset has `id`, or [Error::SqlError]
/// for unexpected SQL errors.
pub(crate) fn get_dataset(id: DatabaseId, connection: &Connection) -> Result<Dataset, Error> {
    connection
        .query_row(
            "SELECT id, name, created_at FROM dataset WHERE id = ?1",
            [id],
            map_dataset_row,
        )
        .map_err(|error| error.into())
}

/// Get all datasets with their sale row counts, most recently created first.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an unexpected SQL error.
pub(super) fn get_all_datasets(connection: &Connection) -> Result<Vec<DatasetListing>, Error> {
    connection
        .prepare(
            "SELECT d.id, d.name, d.created_at, COUNT(s.id)
             FROM dataset d
             LEFT JOIN sale s ON s.dataset_id = d.id
             GROUP BY d.id
             ORDER BY d.id DESC",
        )?
        .query_map([], |row| {
            Ok(DatasetListing {
                dataset: map_dataset_row(row)?,
                sale_count: row.get::<_, i64>(3)? as usize,
            })
        })?
        .map(|maybe_listing| maybe_listing.map_err(|error| error.into()))
        .collect()
}

/// Delete the dataset with `id` and, via the cascading foreign key, all of
/// its sale rows.
///
/// # Errors
/// Returns [Error::DeleteMissingDataset] if no dataset has `id`, or
/// [Error::SqlError] for unexpected SQL errors.
pub(super) fn delete_dataset(id: DatabaseId, connection: &Connection) -> Result<(), Error> {
    let rows_deleted = connection.execute("DELETE FROM dataset WHERE id = ?1", [id])?;

    if rows_deleted == 0 {
        return Err(Error::DeleteMissingDataset);
    }

    Ok(())
}

fn map_dataset_row(row: &Row) -> Result<Dataset, rusqlite::Error> {
    Ok(Dataset {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
    })
}

#[cfg(test)]
mod dataset_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        db::initialize,
        sale::{SaleRecord, count_sales, insert_sales},
    };

    use super::{delete_dataset, get_all_datasets, get_dataset, insert_dataset};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    #[test]
    fn inserts_and_gets_dataset() {
        let conn = get_test_connection();

        let inserted = insert_dataset("Q1 sales", &conn).unwrap();
        let got = get_dataset(inserted.id, &conn).unwrap();

        assert_eq!(inserted, got);
        assert_eq!(got.name, "Q1 sales");
    }

    #[test]
    fn get_missing_dataset_returns_not_found() {
        let conn = get_test_connection();

        let result = get_dataset(404, &conn);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn lists_datasets_with_row_counts() {
        let conn = get_test_connection();
        let first = insert_dataset("first", &conn).unwrap();
        let second = insert_dataset("second", &conn).unwrap();
        insert_sales(
            &[SaleRecord {
                dataset_id: first.id,
                date: date!(2024 - 01 - 01),
                amount: 12.0,
                product: None,
                category: None,
                customer_id: None,
            }],
            &conn,
        )
        .unwrap();

        let listings = get_all_datasets(&conn).unwrap();

        assert_eq!(listings.len(), 2);
        // Most recent first.
        assert_eq!(listings[0].dataset.id, second.id);
        assert_eq!(listings[0].sale_count, 0);
        assert_eq!(listings[1].dataset.id, first.id);
        assert_eq!(listings[1].sale_count, 1);
    }

    #[test]
    fn delete_cascades_to_sales() {
        let conn = get_test_connection();
        let dataset = insert_dataset("doomed", &conn).unwrap();
        insert_sales(
            &[SaleRecord {
                dataset_id: dataset.id,
                date: date!(2024 - 01 - 01),
                amount: 5.0,
                product: None,
                category: None,
                customer_id: None,
            }],
            &conn,
        )
        .unwrap();

        delete_dataset(dataset.id, &conn).unwrap();

        assert_eq!(get_dataset(dataset.id, &conn), Err(Error::NotFound));
        assert_eq!(count_sales(dataset.id, &conn).unwrap(), 0);
    }

    #[test]
    fn delete_missing_dataset_returns_error() {
        let conn = get_test_connection();

        let result = delete_dataset(404, &conn);

        assert_eq!(result, Err(Error::DeleteMissingDataset));
    }
}
