//! The application's endpoint URIs.
//!
//! For endpoints that take a parameter, e.g. '/datasets/{dataset_id}', use
//! [format_endpoint].

/// The root route which redirects to the datasets page.
pub const ROOT: &str = "/";
/// The page listing all uploaded datasets.
pub const DATASETS_VIEW: &str = "/datasets";
/// The page for uploading a sales CSV as a new dataset.
pub const UPLOAD_VIEW: &str = "/upload";
/// The dashboard page for a single dataset.
pub const DASHBOARD_VIEW: &str = "/datasets/{dataset_id}/dashboard";

/// The route to upload a CSV file and create a dataset from it.
pub const IMPORT: &str = "/api/import";
/// The route to delete a dataset and its sales.
pub const DELETE_DATASET: &str = "/api/datasets/{dataset_id}";
/// The route serving the dashboard content partial for htmx range changes.
pub const DASHBOARD_CONTENT: &str = "/api/datasets/{dataset_id}/dashboard";
/// The route to download the revenue forecast as a CSV file.
pub const EXPORT_FORECAST: &str = "/api/datasets/{dataset_id}/export/forecast";
/// The route to download the top products table as a CSV file.
pub const EXPORT_PRODUCTS: &str = "/api/datasets/{dataset_id}/export/products";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace. For
/// example, in the endpoint path '/datasets/{dataset_id}', '{dataset_id}' is
/// the parameter.
///
/// This function assumes that an endpoint path only contains ASCII
/// characters and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let Some(param_end) = endpoint_path[param_start..].find('}') else {
        return endpoint_path.to_owned();
    };

    let mut formatted = endpoint_path[..param_start].to_owned();
    formatted.push_str(&id.to_string());
    formatted.push_str(&endpoint_path[param_start + param_end + 1..]);

    formatted
}
