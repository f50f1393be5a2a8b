//! Dataset module
//!
//! A dataset is one uploaded CSV file's worth of sale records. Datasets own
//! their sales: deleting a dataset cascades to every row imported with it.

mod core;
mod datasets_page;
mod delete_endpoint;

pub(crate) use core::{Dataset, create_dataset_table, get_dataset, insert_dataset};
pub use datasets_page::get_datasets_page;
pub use delete_endpoint::delete_dataset_endpoint;
