//! The page for uploading a sales CSV as a new dataset.

use maud::{Markup, html};

use crate::{
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, base,
        loading_spinner,
    },
    navigation::NavBar,
};

/// Display the CSV upload form.
pub async fn get_import_page() -> Markup {
    let nav_bar = NavBar::new(endpoints::UPLOAD_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-md p-6 space-y-4 bg-white rounded-lg shadow dark:bg-gray-800 dark:border dark:border-gray-700"
            {
                h2 class="text-xl font-bold" { "Upload a sales export" }

                p class="text-sm text-gray-500 dark:text-gray-400"
                {
                    "The CSV file needs a date column and an amount column \
                    (amount, revenue, or total). Product, category, and \
                    customer ID columns are optional."
                }

                form
                    hx-post=(endpoints::IMPORT)
                    hx-encoding="multipart/form-data"
                    hx-target="#alert-container"
                    hx-target-error="#alert-container"
                    hx-swap="outerHTML"
                    hx-indicator="#indicator"
                    class="space-y-4"
                {
                    div
                    {
                        label for="dataset_name" class=(FORM_LABEL_STYLE) { "Dataset name" }
                        input
                            type="text"
                            name="dataset_name"
                            id="dataset_name"
                            placeholder="e.g. March sales"
                            required
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    div
                    {
                        label for="file" class=(FORM_LABEL_STYLE) { "Sales CSV" }
                        input
                            type="file"
                            name="file"
                            id="file"
                            accept="text/csv"
                            required
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    button type="submit" id="indicator" class=(BUTTON_PRIMARY_STYLE)
                    {
                        "Import "
                        span class="htmx-indicator" { (loading_spinner()) }
                    }
                }
            }
        }
    };

    base("Upload", &[], &content)
}

#[cfg(test)]
mod import_page_tests {
    use scraper::{Html, Selector};

    use crate::endpoints;

    use super::get_import_page;

    #[tokio::test]
    async fn renders_multipart_upload_form() {
        let markup = get_import_page().await;

        let html = Html::parse_document(&markup.into_string());
        assert!(html.errors.is_empty(), "Got HTML errors: {:?}", html.errors);

        let form_selector = Selector::parse("form").unwrap();
        let form = html.select(&form_selector).next().expect("no form found");

        assert_eq!(form.attr("hx-post"), Some(endpoints::IMPORT));
        assert_eq!(form.attr("hx-encoding"), Some("multipart/form-data"));

        let file_input = Selector::parse("input[type=file][name=file]").unwrap();
        assert!(html.select(&file_input).next().is_some());

        let name_input = Selector::parse("input[type=text][name=dataset_name]").unwrap();
        assert!(html.select(&name_input).next().is_some());
    }
}
