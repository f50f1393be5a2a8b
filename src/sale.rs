//! The sale record domain model and its database operations.

use rusqlite::Connection;
use time::Date;

use crate::{Error, database_id::DatabaseId};

/// One sale transaction line, scoped to a single dataset.
///
/// Rows are immutable once created; they are only removed when their dataset
/// is deleted, which cascades to them.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleRecord {
    /// The dataset this sale belongs to.
    pub dataset_id: DatabaseId,
    /// The calendar date of the sale (day granularity).
    pub date: Date,
    /// The monetary value of the sale in the dataset's implicit currency.
    pub amount: f64,
    /// The product label, if the export had one.
    pub product: Option<String>,
    /// The category label, if the export had one.
    pub category: Option<String>,
    /// An opaque customer identifier, if the export had one. Unvalidated.
    pub customer_id: Option<String>,
}

/// Create the sale table.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub(crate) fn create_sale_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS sale (
            id INTEGER PRIMARY KEY,
            dataset_id INTEGER NOT NULL REFERENCES dataset(id) ON DELETE CASCADE,
            date TEXT NOT NULL,
            amount REAL NOT NULL,
            product TEXT,
            category TEXT,
            customer_id TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_sale_dataset_date ON sale (dataset_id, date);",
    )
}

/// Insert `sales` using a single prepared statement.
///
/// **Note**: If you want transactional integrity (all or nothing), pass in a
/// transaction for `connection`.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an unexpected SQL error.
pub(crate) fn insert_sales(sales: &[SaleRecord], connection: &Connection) -> Result<usize, Error> {
    let mut stmt = connection.prepare(
        "INSERT INTO sale (dataset_id, date, amount, product, category, customer_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )?;

    for sale in sales {
        stmt.execute((
            sale.dataset_id,
            sale.date,
            sale.amount,
            &sale.product,
            &sale.category,
            &sale.customer_id,
        ))?;
    }

    Ok(sales.len())
}

/// Count all sale rows belonging to `dataset_id`.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an unexpected SQL error.
pub(crate) fn count_sales(dataset_id: DatabaseId, connection: &Connection) -> Result<usize, Error> {
    let count = connection.query_row(
        "SELECT COUNT(*) FROM sale WHERE dataset_id = ?1",
        [dataset_id],
        |row| row.get::<_, i64>(0),
    )?;

    Ok(count as usize)
}

#[cfg(test)]
mod sale_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{dataset::insert_dataset, db::initialize};

    use super::{SaleRecord, count_sales, insert_sales};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn sample_sale(dataset_id: i64, amount: f64) -> SaleRecord {
        SaleRecord {
            dataset_id,
            date: date!(2024 - 01 - 15),
            amount,
            product: Some("Widget".to_owned()),
            category: None,
            customer_id: Some("c-001".to_owned()),
        }
    }

    #[test]
    fn inserts_and_counts_sales() {
        let conn = get_test_connection();
        let dataset = insert_dataset("January export", &conn).unwrap();

        let inserted = insert_sales(
            &[sample_sale(dataset.id, 10.0), sample_sale(dataset.id, 25.5)],
            &conn,
        )
        .unwrap();

        assert_eq!(inserted, 2);
        assert_eq!(count_sales(dataset.id, &conn).unwrap(), 2);
    }

    #[test]
    fn rejects_unknown_dataset() {
        let conn = get_test_connection();

        let result = insert_sales(&[sample_sale(999, 10.0)], &conn);

        assert!(result.is_err(), "insert with bad foreign key should fail");
    }
}
