//! Parsing and validation of uploaded sales CSV files.
//!
//! Sales exports come from many tools, so the parser is deliberately
//! tolerant: header names are matched loosely against a synonym table,
//! amounts may carry currency symbols and thousands separators, and rows
//! that cannot be read are skipped rather than failing the whole file.

use csv::{ReaderBuilder, StringRecord, Trim};
use time::{Date, macros::format_description};

use crate::{Error, database_id::DatabaseId, sale::SaleRecord};

/// The result of parsing a sales CSV file.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    /// The rows that passed validation, in file order.
    pub sales: Vec<SaleRecord>,
    /// The number of data rows dropped by per-row validation.
    pub skipped_rows: usize,
}

/// Where each logical column lives in the header row.
struct ColumnMap {
    date: usize,
    amount: usize,
    product: Option<usize>,
    category: Option<usize>,
    customer_id: Option<usize>,
}

/// Parse the text of a sales CSV export into validated [SaleRecord]s tagged
/// with `dataset_id`.
///
/// The file must have a header row with a date column and an amount column
/// (`amount`, `revenue`, or `total`). Product, category, and customer ID
/// columns are optional. Header matching ignores case, whitespace, and
/// underscores, so `Customer ID` and `customer_id` are the same column.
///
/// Rows whose date or amount is missing or unreadable are skipped and
/// counted in [ParseOutcome::skipped_rows]; the valid rows come back in the
/// order they appear in the file.
///
/// # Errors
/// Returns:
/// - [Error::MissingColumns] if the header lacks a date or amount column,
/// - [Error::EmptyCsv] if there are no data rows at all,
/// - [Error::NoValidRows] if every data row was skipped,
/// - [Error::InvalidCsv] if the file could not be read as CSV.
pub fn parse_and_validate(text: &str, dataset_id: DatabaseId) -> Result<ParseOutcome, Error> {
    if text.trim().is_empty() {
        return Err(Error::EmptyCsv);
    }

    let mut reader = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|error| Error::InvalidCsv(error.to_string()))?
        .clone();
    let columns = resolve_columns(&headers)?;
    let header_length = headers.len();

    let date_format = format_description!("[year]-[month]-[day]");
    let mut sales = Vec::new();
    let mut row_count = 0;

    for record in reader.records() {
        let record = record.map_err(|error| Error::InvalidCsv(error.to_string()))?;

        if record.iter().all(str::is_empty) {
            continue;
        }

        row_count += 1;

        // A row with more fields than the header almost always means the
        // amount had an unquoted thousands separator, e.g. `$1,000.00`.
        // Fold the surplus fields back into the amount column and shift the
        // columns to its right.
        let surplus = record.len().saturating_sub(header_length);
        let field = |column: usize| {
            let index = if column > columns.amount {
                column + surplus
            } else {
                column
            };

            record.get(index).filter(|value| !value.is_empty())
        };

        let Some(date) = field(columns.date)
            .and_then(|value| Date::parse(value, date_format).ok())
        else {
            continue;
        };

        let amount_text: String = (columns.amount..=columns.amount + surplus)
            .filter_map(|index| record.get(index))
            .collect();
        let Some(amount) = parse_amount(&amount_text) else {
            continue;
        };

        sales.push(SaleRecord {
            dataset_id,
            date,
            amount,
            product: columns.product.and_then(field).map(str::to_owned),
            category: columns.category.and_then(field).map(str::to_owned),
            customer_id: columns.customer_id.and_then(field).map(str::to_owned),
        });
    }

    if row_count == 0 {
        return Err(Error::EmptyCsv);
    }

    if sales.is_empty() {
        return Err(Error::NoValidRows);
    }

    let skipped_rows = row_count - sales.len();

    Ok(ParseOutcome {
        sales,
        skipped_rows,
    })
}

/// Find the logical columns in the header row.
///
/// Synonyms are checked in priority order, so a file with both an `amount`
/// and a `total` column reads from `amount`.
fn resolve_columns(headers: &StringRecord) -> Result<ColumnMap, Error> {
    let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
    let find = |synonyms: &[&str]| {
        synonyms
            .iter()
            .find_map(|synonym| normalized.iter().position(|header| header == synonym))
    };

    let date = find(&["date"]);
    let amount = find(&["amount", "revenue", "total"]);

    let (Some(date), Some(amount)) = (date, amount) else {
        let mut missing = Vec::new();

        if date.is_none() {
            missing.push("date");
        }

        if amount.is_none() {
            missing.push("amount");
        }

        return Err(Error::MissingColumns(missing.join(", ")));
    };

    Ok(ColumnMap {
        date,
        amount,
        product: find(&["product", "productname", "item"]),
        category: find(&["category", "type"]),
        customer_id: find(&["customerid", "customer"]),
    })
}

fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|char| !char.is_whitespace() && *char != '_')
        .collect::<String>()
        .to_lowercase()
}

/// Parse a monetary amount, tolerating a currency symbol and thousands
/// separators. Returns `None` for blank, unparseable, or non-finite values.
fn parse_amount(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|char| *char != '$' && *char != ',')
        .collect();

    cleaned
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
}

#[cfg(test)]
mod parse_and_validate_tests {
    use time::macros::date;

    use crate::Error;

    use super::parse_and_validate;

    const DATASET_ID: i64 = 1;

    #[test]
    fn parses_rows_in_file_order() {
        let text = "date,amount\n2024-01-02,20\n2024-01-01,10\n";

        let outcome = parse_and_validate(text, DATASET_ID).unwrap();

        assert_eq!(outcome.skipped_rows, 0);
        assert_eq!(outcome.sales.len(), 2);
        assert_eq!(outcome.sales[0].date, date!(2024 - 01 - 02));
        assert_eq!(outcome.sales[0].amount, 20.0);
        assert_eq!(outcome.sales[1].date, date!(2024 - 01 - 01));
    }

    #[test]
    fn matches_headers_ignoring_case_whitespace_and_underscores() {
        let text = "Date, Revenue ,Product Name,Type,Customer ID\n\
            2024-03-05,42.50,Widget,Hardware,c-17\n";

        let outcome = parse_and_validate(text, DATASET_ID).unwrap();

        let sale = &outcome.sales[0];
        assert_eq!(sale.amount, 42.5);
        assert_eq!(sale.product.as_deref(), Some("Widget"));
        assert_eq!(sale.category.as_deref(), Some("Hardware"));
        assert_eq!(sale.customer_id.as_deref(), Some("c-17"));
    }

    #[test]
    fn amount_synonym_wins_over_total() {
        let text = "date,total,amount\n2024-01-01,999,5\n";

        let outcome = parse_and_validate(text, DATASET_ID).unwrap();

        assert_eq!(outcome.sales[0].amount, 5.0);
    }

    #[test]
    fn reports_missing_required_columns() {
        let text = "product,customer\nWidget,c-1\n";

        let result = parse_and_validate(text, DATASET_ID);

        assert_eq!(result, Err(Error::MissingColumns("date, amount".to_owned())));
    }

    #[test]
    fn reports_missing_amount_column_alone() {
        let text = "date,product\n2024-01-01,Widget\n";

        let result = parse_and_validate(text, DATASET_ID);

        assert_eq!(result, Err(Error::MissingColumns("amount".to_owned())));
    }

    #[test]
    fn handles_quoted_commas_and_newlines() {
        let text = "date,amount,product\n\
            2024-01-01,\"$1,234.50\",\"Widget, Deluxe\"\n\
            2024-01-02,5,\"Two\nLines\"\n";

        let outcome = parse_and_validate(text, DATASET_ID).unwrap();

        assert_eq!(outcome.sales[0].amount, 1234.5);
        assert_eq!(outcome.sales[0].product.as_deref(), Some("Widget, Deluxe"));
        assert_eq!(outcome.sales[1].product.as_deref(), Some("Two\nLines"));
    }

    #[test]
    fn folds_unquoted_thousands_separator_into_amount() {
        let text = "date,amount\n2024-01-01,$1,000.00\n";

        let outcome = parse_and_validate(text, DATASET_ID).unwrap();

        assert_eq!(outcome.sales[0].amount, 1000.0);
        assert_eq!(outcome.skipped_rows, 0);
    }

    #[test]
    fn folds_unquoted_thousands_separator_before_other_columns() {
        let text = "date,amount,product\n2024-01-01,$2,500,Widget\n";

        let outcome = parse_and_validate(text, DATASET_ID).unwrap();

        assert_eq!(outcome.sales[0].amount, 2500.0);
        assert_eq!(outcome.sales[0].product.as_deref(), Some("Widget"));
    }

    #[test]
    fn skips_bad_rows_and_counts_them() {
        let text = "date,amount\n\
            2024-01-01,10\n\
            ,20\n\
            2024-01-03,not a number\n\
            01/04/2024,40\n";

        let outcome = parse_and_validate(text, DATASET_ID).unwrap();

        assert_eq!(outcome.sales.len(), 1);
        assert_eq!(outcome.skipped_rows, 3);
    }

    #[test]
    fn header_only_file_is_empty() {
        let result = parse_and_validate("date,amount\n", DATASET_ID);

        assert_eq!(result, Err(Error::EmptyCsv));
    }

    #[test]
    fn blank_file_is_empty() {
        let result = parse_and_validate("  \n", DATASET_ID);

        assert_eq!(result, Err(Error::EmptyCsv));
    }

    #[test]
    fn all_rows_skipped_is_an_error() {
        let text = "date,amount\n,10\n2024-01-01,\n";

        let result = parse_and_validate(text, DATASET_ID);

        assert_eq!(result, Err(Error::NoValidRows));
    }

    #[test]
    fn blank_optional_labels_become_none() {
        let text = "date,amount,product,category\n2024-01-01,10,,\n";

        let outcome = parse_and_validate(text, DATASET_ID).unwrap();

        assert_eq!(outcome.sales[0].product, None);
        assert_eq!(outcome.sales[0].category, None);
    }

    #[test]
    fn keeps_negative_amounts() {
        let text = "date,amount\n2024-01-01,-12.50\n";

        let outcome = parse_and_validate(text, DATASET_ID).unwrap();

        assert_eq!(outcome.sales[0].amount, -12.5);
    }

    #[test]
    fn skips_non_finite_amounts() {
        let text = "date,amount\n2024-01-01,inf\n2024-01-02,10\n";

        let outcome = parse_and_validate(text, DATASET_ID).unwrap();

        assert_eq!(outcome.sales.len(), 1);
        assert_eq!(outcome.skipped_rows, 1);
    }
}
