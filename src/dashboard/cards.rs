//! The KPI cards shown at the top of the dashboard.

use maud::{Markup, html};

use crate::html::{format_count, format_currency};

use super::aggregation::Kpis;

const CARD_STYLE: &str = "p-4 bg-white rounded-lg shadow dark:bg-gray-800 \
    dark:border dark:border-gray-700";
const CARD_LABEL_STYLE: &str = "text-sm text-gray-500 dark:text-gray-400";
const CARD_VALUE_STYLE: &str = "text-2xl font-bold";

/// Render the row of headline-number cards.
pub(super) fn kpi_cards(kpis: &Kpis) -> Markup {
    let top_product_share = format!("{:.0}% of revenue", kpis.top_product_share * 100.0);

    html! {
        div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4 w-full"
        {
            (card("Total revenue", &format_currency(kpis.total_revenue), None))
            (card("Orders", &format_count(kpis.order_count), None))
            (card("Average ticket", &format_currency(kpis.avg_ticket), None))
            (card("Top product", &kpis.top_product, Some(&top_product_share)))
        }
    }
}

fn card(label: &str, value: &str, detail: Option<&str>) -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            p class=(CARD_LABEL_STYLE) { (label) }
            p class=(CARD_VALUE_STYLE) { (value) }

            @if let Some(detail) = detail {
                p class=(CARD_LABEL_STYLE) { (detail) }
            }
        }
    }
}
