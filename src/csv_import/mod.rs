//! CSV import module
//!
//! Handles everything between "the user picked a file" and "the sales are in
//! the database": the upload form, the multipart endpoint, and the parsing
//! and validation of the CSV text itself.

mod csv;
mod import_page;
mod import_sales;

pub use csv::{ParseOutcome, parse_and_validate};
pub use import_page::get_import_page;
pub use import_sales::import_sales;
