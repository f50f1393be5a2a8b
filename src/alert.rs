//! Alert fragments for displaying success and error messages to the user.
//!
//! Alerts are rendered into the `#alert-container` element, which htmx
//! handlers target for out-of-band error display.

use maud::{Markup, html};

const SUCCESS_STYLE: &str = "p-4 mb-4 text-sm text-green-800 rounded-lg \
    bg-green-50 dark:bg-gray-800 dark:text-green-400";
const ERROR_STYLE: &str = "p-4 mb-4 text-sm text-red-800 rounded-lg \
    bg-red-50 dark:bg-gray-800 dark:text-red-400";

/// A message displayed to the user after an action completes or fails.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// The action completed.
    Success {
        /// The headline shown in bold.
        message: String,
        /// Supporting detail shown below the headline.
        details: String,
    },
    /// The action failed.
    Error {
        /// The headline shown in bold.
        message: String,
        /// Supporting detail shown below the headline.
        details: String,
    },
    /// The action failed, with no further detail to show.
    ErrorSimple {
        /// The headline shown in bold.
        message: String,
    },
}

impl Alert {
    /// Render the alert as an HTML fragment targeting `#alert-container`.
    pub fn into_html(self) -> Markup {
        let (style, message, details) = match self {
            Alert::Success { message, details } => (SUCCESS_STYLE, message, details),
            Alert::Error { message, details } => (ERROR_STYLE, message, details),
            Alert::ErrorSimple { message } => (ERROR_STYLE, message, String::new()),
        };

        html! {
            div id="alert-container" {
                div class=(style) role="alert" {
                    p class="font-bold" { (message) }

                    @if !details.is_empty() {
                        p { (details) }
                    }
                }
            }
        }
    }
}
