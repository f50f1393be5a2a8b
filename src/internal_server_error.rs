//! The 500 internal server error page.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::html;

use crate::{
    html::{PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
};

/// The text shown on the internal server error page.
pub struct InternalServerErrorPage<'a> {
    /// A short description of what went wrong.
    pub description: &'a str,
    /// What the user can do about it.
    pub fix: &'a str,
}

impl Default for InternalServerErrorPage<'_> {
    fn default() -> Self {
        Self {
            description: "Something went wrong",
            fix: "An unexpected error occurred on the server. Please try again later.",
        }
    }
}

/// Build a 500 response with the internal server error page.
pub fn render_internal_server_error(page: InternalServerErrorPage) -> Response {
    let nav_bar = NavBar::new("").into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            h2 class="text-xl font-bold" { (page.description) }

            p { (page.fix) }
        }
    };

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        base("Internal Server Error", &[], &content),
    )
        .into_response()
}
