//! Read queries feeding the dashboard.

use rusqlite::Connection;
use time::Date;

use crate::{Error, database_id::DatabaseId};

use super::aggregation::DailyPoint;

/// A sale as the aggregation engine sees it: just the fields the dashboard
/// summarizes, detached from the storage row.
#[derive(Debug, Clone, PartialEq)]
pub struct Sale {
    /// The calendar date of the sale.
    pub date: Date,
    /// The monetary value of the sale.
    pub amount: f64,
    /// The product label, if the source export had one.
    pub product: Option<String>,
    /// The category label, if the source export had one.
    pub category: Option<String>,
}

/// Get every sale in `dataset_id`, in insertion order.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an unexpected SQL error.
pub(crate) fn get_sales_for_dataset(
    dataset_id: DatabaseId,
    connection: &Connection,
) -> Result<Vec<Sale>, Error> {
    connection
        .prepare("SELECT date, amount, product, category FROM sale WHERE dataset_id = ?1")?
        .query_map([dataset_id], |row| {
            Ok(Sale {
                date: row.get(0)?,
                amount: row.get(1)?,
                product: row.get(2)?,
                category: row.get(3)?,
            })
        })?
        .map(|maybe_sale| maybe_sale.map_err(|error| error.into()))
        .collect()
}

/// Get `dataset_id`'s revenue summed per day, ascending by date.
///
/// This is the forecast engine's input: the full daily series regardless of
/// the dashboard's range selection.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an unexpected SQL error.
pub(crate) fn get_daily_revenue(
    dataset_id: DatabaseId,
    connection: &Connection,
) -> Result<Vec<DailyPoint>, Error> {
    connection
        .prepare(
            "SELECT date, SUM(amount) FROM sale
             WHERE dataset_id = ?1
             GROUP BY date
             ORDER BY date ASC",
        )?
        .query_map([dataset_id], |row| {
            Ok(DailyPoint {
                date: row.get(0)?,
                revenue: row.get(1)?,
            })
        })?
        .map(|maybe_point| maybe_point.map_err(|error| error.into()))
        .collect()
}

#[cfg(test)]
mod dashboard_sale_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        dataset::insert_dataset,
        db::initialize,
        sale::{SaleRecord, insert_sales},
    };

    use super::{get_daily_revenue, get_sales_for_dataset};

    fn seeded_connection() -> (Connection, i64) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let dataset = insert_dataset("test", &conn).unwrap();

        let rows = [
            (date!(2024 - 01 - 02), 5.0),
            (date!(2024 - 01 - 01), 10.0),
            (date!(2024 - 01 - 02), 15.0),
        ]
        .map(|(date, amount)| SaleRecord {
            dataset_id: dataset.id,
            date,
            amount,
            product: Some("Widget".to_owned()),
            category: None,
            customer_id: None,
        });
        insert_sales(&rows, &conn).unwrap();

        (conn, dataset.id)
    }

    #[test]
    fn gets_all_sales_for_dataset() {
        let (conn, dataset_id) = seeded_connection();

        let sales = get_sales_for_dataset(dataset_id, &conn).unwrap();

        assert_eq!(sales.len(), 3);
        assert_eq!(sales[0].product.as_deref(), Some("Widget"));
        assert_eq!(sales[0].category, None);
    }

    #[test]
    fn daily_revenue_sums_per_day_ascending() {
        let (conn, dataset_id) = seeded_connection();

        let daily = get_daily_revenue(dataset_id, &conn).unwrap();

        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].date, date!(2024 - 01 - 01));
        assert_eq!(daily[0].revenue, 10.0);
        assert_eq!(daily[1].date, date!(2024 - 01 - 02));
        assert_eq!(daily[1].revenue, 20.0);
    }

    #[test]
    fn unknown_dataset_yields_empty_series() {
        let (conn, _) = seeded_connection();

        assert!(get_sales_for_dataset(999, &conn).unwrap().is_empty());
        assert!(get_daily_revenue(999, &conn).unwrap().is_empty());
    }
}
