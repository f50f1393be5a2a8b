//! The 404 not found page.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::html;

use crate::{
    endpoints,
    html::{PAGE_CONTAINER_STYLE, base, link},
    navigation::NavBar,
};

/// Build a response with the 404 not found page.
pub fn get_404_not_found_response() -> Response {
    let nav_bar = NavBar::new("").into_html();
    let datasets_link = link(endpoints::DATASETS_VIEW, "datasets page");

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold" { "Page not found" }

            p
            {
                "The page you were looking for does not exist. \
                Head back to the " (datasets_link) "."
            }
        }
    };

    (
        StatusCode::NOT_FOUND,
        base("Page Not Found", &[], &content),
    )
        .into_response()
}

/// Route handler for unmatched paths.
pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}
