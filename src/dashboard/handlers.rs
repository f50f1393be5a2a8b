//! The dashboard page and its htmx content partial.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    dataset::{Dataset, get_dataset},
    database_id::DatabaseId,
    endpoints,
    html::{HeadElement, PAGE_CONTAINER_STYLE, base, link},
    navigation::NavBar,
};

use super::{
    aggregation::{DashboardSummary, RangeFilter, aggregate},
    charts::{
        DashboardChart, charts_inline_script, charts_script, charts_view, revenue_forecast_chart,
        top_products_chart,
    },
    forecast::{FORECAST_HORIZON_DAYS, PredictionPoint, forecast},
    sale::{get_daily_revenue, get_sales_for_dataset},
    tables::label_totals_table,
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading datasets and sales.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The dashboard's query string: which trailing window to summarize.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// The selected range, defaulting to all time.
    #[serde(default)]
    pub range: RangeFilter,
}

/// Holds all the data needed to render the dashboard.
struct DashboardData {
    dataset: Dataset,
    summary: Option<DashboardSummary>,
    predictions: Vec<PredictionPoint>,
}

/// Display the dashboard page for one dataset.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Path(dataset_id): Path<DatabaseId>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let data = build_dashboard_data(dataset_id, query.range, &state)?;

    Ok(dashboard_view(&data, query.range).into_response())
}

/// The htmx endpoint serving the dashboard content partial when the range
/// selector changes.
pub async fn get_dashboard_content(
    State(state): State<DashboardState>,
    Path(dataset_id): Path<DatabaseId>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let data = build_dashboard_data(dataset_id, query.range, &state)?;

    Ok(dashboard_content(&data).into_response())
}

/// Fetches the dataset, its sales, and the forecast series, then runs the
/// aggregation for `range`.
///
/// # Errors
/// Returns [Error::NotFound] if the dataset does not exist, or other
/// variants for database failures.
fn build_dashboard_data(
    dataset_id: DatabaseId,
    range: RangeFilter,
    state: &DashboardState,
) -> Result<DashboardData, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let dataset = get_dataset(dataset_id, &connection)
        .inspect_err(|error| tracing::debug!("could not get dataset {dataset_id}: {error}"))?;

    let sales = get_sales_for_dataset(dataset_id, &connection)
        .inspect_err(|error| tracing::error!("could not get sales: {error}"))?;

    // The forecast always runs over the full daily series; the range
    // selector only narrows the summary.
    let daily = get_daily_revenue(dataset_id, &connection)
        .inspect_err(|error| tracing::error!("could not get daily revenue: {error}"))?;

    Ok(DashboardData {
        dataset,
        summary: aggregate(&sales, range),
        predictions: forecast(&daily, FORECAST_HORIZON_DAYS),
    })
}

fn build_dashboard_charts(data: &DashboardData) -> Vec<DashboardChart> {
    let mut charts = Vec::new();

    if !data.predictions.is_empty() {
        charts.push(DashboardChart {
            id: "revenue-chart",
            options: revenue_forecast_chart(&data.predictions).to_string(),
        });
    }

    if let Some(summary) = &data.summary {
        charts.push(DashboardChart {
            id: "top-products-chart",
            options: top_products_chart(&summary.top_products).to_string(),
        });
    }

    charts
}

/// Renders the full dashboard page: nav bar, range selector, and content.
fn dashboard_view(data: &DashboardData, range: RangeFilter) -> Markup {
    let nav_bar = NavBar::new(endpoints::DATASETS_VIEW).into_html();
    let charts = build_dashboard_charts(data);

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-xl"
            {
                div class="flex flex-wrap items-center justify-between gap-4 mb-4"
                {
                    h2 class="text-xl font-bold" { (data.dataset.name) }

                    (range_selector(data.dataset.id, range))
                }

                div id="dashboard-content"
                {
                    (dashboard_content(data))
                }
            }
        }
    };

    let scripts = [
        HeadElement::ScriptLink(
            "https://cdn.jsdelivr.net/npm/echarts@5.6.0/dist/echarts.min.js".to_owned(),
        ),
        charts_script(&charts),
    ];

    base("Dashboard", &scripts, &content)
}

/// The range selector form. Changing the selection swaps the dashboard
/// content partial without a full page load.
fn range_selector(dataset_id: DatabaseId, range: RangeFilter) -> Markup {
    let content_endpoint = endpoints::format_endpoint(endpoints::DASHBOARD_CONTENT, dataset_id);

    html! {
        form
            hx-get=(content_endpoint)
            hx-target="#dashboard-content"
            hx-target-error="#alert-container"
            hx-swap="innerHTML"
            hx-trigger="change"
        {
            label for="range" class="text-sm mr-2" { "Range" }
            select
                name="range"
                id="range"
                class="p-2 rounded text-sm text-gray-900 dark:text-white bg-gray-50 \
                    dark:bg-gray-700 border border-gray-300 dark:border-gray-600"
            {
                option value="30" selected[range == RangeFilter::Last30Days] { "Last 30 days" }
                option value="90" selected[range == RangeFilter::Last90Days] { "Last 90 days" }
                option value="all" selected[range == RangeFilter::All] { "All time" }
            }
        }
    }
}

/// Renders the dashboard content: KPI cards, charts, tables, and export
/// links, or a prompt when the range holds no sales.
fn dashboard_content(data: &DashboardData) -> Markup {
    let Some(summary) = &data.summary else {
        return dashboard_no_data_view();
    };

    let charts = build_dashboard_charts(data);
    let forecast_export = endpoints::format_endpoint(endpoints::EXPORT_FORECAST, data.dataset.id);
    let products_export = endpoints::format_endpoint(endpoints::EXPORT_PRODUCTS, data.dataset.id);

    html! {
        (super::cards::kpi_cards(&summary.kpis))

        div class="my-4"
        {
            (charts_view(&charts))
        }

        div class="grid grid-cols-1 xl:grid-cols-2 gap-4 mb-4"
        {
            (label_totals_table("Top products", "Product", &summary.top_products))
            (label_totals_table("Top categories", "Category", &summary.top_categories))
        }

        p class="text-sm"
        {
            "Download: "
            (link(&forecast_export, "forecast CSV"))
            " | "
            (link(&products_export, "top products CSV"))
        }

        (charts_inline_script(&charts))
    }
}

/// Renders the dashboard content when the dataset has no sales to show.
fn dashboard_no_data_view() -> Markup {
    let upload_link = link(endpoints::UPLOAD_VIEW, "uploading a CSV");

    html! {
        div class="flex flex-col items-center py-8"
        {
            h3 class="text-lg font-bold" { "Nothing here yet..." }

            p
            {
                "Charts will show up here once this dataset has some sales. \
                You can add data by " (upload_link) "."
            }
        }
    }
}
