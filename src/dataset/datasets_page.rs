//! The page listing all uploaded datasets.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_DELETE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, format_count, link,
    },
    navigation::NavBar,
};

use super::core::{DatasetListing, get_all_datasets};

/// The state needed for displaying the datasets page.
#[derive(Debug, Clone)]
pub struct DatasetState {
    /// The database connection for reading datasets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DatasetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display the list of uploaded datasets.
pub async fn get_datasets_page(State(state): State<DatasetState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let listings = get_all_datasets(&connection)
        .inspect_err(|error| tracing::error!("could not get datasets: {error}"))?;

    Ok(datasets_view(&listings).into_response())
}

fn datasets_view(listings: &[DatasetListing]) -> Markup {
    let nav_bar = NavBar::new(endpoints::DATASETS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold mb-4" { "Datasets" }

            @if listings.is_empty() {
                p
                {
                    "Nothing here yet. Upload a sales CSV on the "
                    (link(endpoints::UPLOAD_VIEW, "upload page"))
                    " to create your first dataset."
                }
            } @else {
                div class="overflow-x-auto rounded-lg shadow w-full max-w-screen-lg"
                {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Uploaded" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Rows" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "" }
                            }
                        }

                        tbody
                        {
                            @for listing in listings {
                                (dataset_row(listing))
                            }
                        }
                    }
                }
            }
        }
    };

    base("Datasets", &[], &content)
}

fn dataset_row(listing: &DatasetListing) -> Markup {
    let dashboard_endpoint = endpoints::format_endpoint(endpoints::DASHBOARD_VIEW, listing.dataset.id);
    let delete_endpoint = endpoints::format_endpoint(endpoints::DELETE_DATASET, listing.dataset.id);

    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            td class=(TABLE_CELL_STYLE) { (listing.dataset.name) }
            td class=(TABLE_CELL_STYLE) { (listing.dataset.created_at) }
            td class=(TABLE_CELL_STYLE) { (format_count(listing.sale_count)) }
            td class=(TABLE_CELL_STYLE)
            {
                a href=(dashboard_endpoint) class=(LINK_STYLE) { "Dashboard" }
                " "
                button
                    type="button"
                    class=(BUTTON_DELETE_STYLE)
                    hx-delete=(delete_endpoint)
                    hx-target="closest tr"
                    hx-swap="outerHTML"
                    hx-target-error="#alert-container"
                    hx-confirm="Delete this dataset and all of its sales?"
                {
                    "Delete"
                }
            }
        }
    }
}
