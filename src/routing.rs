//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{delete, get, post},
};

use crate::{
    AppState,
    csv_import::{get_import_page, import_sales},
    dashboard::{get_dashboard_content, get_dashboard_page},
    dataset::{delete_dataset_endpoint, get_datasets_page},
    endpoints,
    export::{export_forecast_csv, export_products_csv},
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DATASETS_VIEW, get(get_datasets_page))
        .route(endpoints::UPLOAD_VIEW, get(get_import_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page));

    let api_routes = Router::new()
        .route(endpoints::IMPORT, post(import_sales))
        .route(endpoints::DELETE_DATASET, delete(delete_dataset_endpoint))
        .route(endpoints::DASHBOARD_CONTENT, get(get_dashboard_content))
        .route(endpoints::EXPORT_FORECAST, get(export_forecast_csv))
        .route(endpoints::EXPORT_PRODUCTS, get(export_products_csv));

    page_routes
        .merge(api_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the datasets page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DATASETS_VIEW)
}
