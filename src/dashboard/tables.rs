//! The ranked product and category tables.

use maud::{Markup, html};

use crate::html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency};

use super::aggregation::LabelTotal;

/// Render a two-column table of labels and their revenue totals.
pub(super) fn label_totals_table(title: &str, label_header: &str, rows: &[LabelTotal]) -> Markup {
    html! {
        div class="overflow-x-auto rounded-lg shadow w-full"
        {
            table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                caption class="p-4 text-lg font-semibold text-left text-gray-900 \
                    bg-white dark:text-white dark:bg-gray-800"
                {
                    (title)
                }

                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { (label_header) }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Revenue" }
                    }
                }

                tbody
                {
                    @for row in rows {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (row.label) }
                            td class=(TABLE_CELL_STYLE) { (format_currency(row.revenue)) }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod label_totals_table_tests {
    use scraper::{Html, Selector};

    use crate::dashboard::aggregation::LabelTotal;

    use super::label_totals_table;

    #[test]
    fn renders_one_row_per_label() {
        let rows = [
            LabelTotal {
                label: "Widget".to_owned(),
                revenue: 100.0,
            },
            LabelTotal {
                label: "Gadget".to_owned(),
                revenue: 50.5,
            },
        ];

        let markup = label_totals_table("Top products", "Product", &rows);
        let html = Html::parse_fragment(&markup.into_string());

        let row_selector = Selector::parse("tbody tr").unwrap();
        assert_eq!(html.select(&row_selector).count(), 2);

        let text: String = html.root_element().text().collect();
        assert!(text.contains("Top products"));
        assert!(text.contains("Widget"));
        assert!(text.contains("$50.50"));
    }
}
