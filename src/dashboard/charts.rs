//! Chart generation for the dashboard.
//!
//! Two ECharts visualizations: the daily revenue line with its forecast
//! continuation, and a bar chart of the top products. Each chart is built
//! with charming and serialized to an ECharts option string, then paired
//! with a container div and initialization JavaScript.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, LineStyle, LineStyleType,
        Tooltip, Trigger,
    },
    series::{Bar, Line},
};
use charming::datatype::CompositeValue;
use maud::{Markup, PreEscaped, html};

use crate::html::HeadElement;

use super::{aggregation::LabelTotal, forecast::PointKind, forecast::PredictionPoint};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates the chart initialization JavaScript for a full page load,
/// deferred until the DOM is ready.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        init_script(charts)
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// Renders the chart initialization JavaScript as an inline script tag.
///
/// htmx executes scripts in swapped-in content, so including this in the
/// dashboard content partial re-draws the charts after a range change.
pub(super) fn charts_inline_script(charts: &[DashboardChart]) -> Markup {
    html!( script { (PreEscaped(init_script(charts))) } )
}

fn init_script(charts: &[DashboardChart]) -> String {
    charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// The daily revenue series with the forecast drawn as a dashed
/// continuation of the solid history line.
pub(super) fn revenue_forecast_chart(predictions: &[PredictionPoint]) -> Chart {
    let labels: Vec<String> = predictions
        .iter()
        .map(|point| point.date.to_string())
        .collect();

    let history: Vec<CompositeValue> = predictions
        .iter()
        .map(|point| match point.kind {
            PointKind::History => point.revenue.into(),
            PointKind::Forecast => "-".into(),
        })
        .collect();

    // The forecast series repeats the last history point so the dashed line
    // joins the solid one instead of starting from a gap.
    let forecast: Vec<CompositeValue> = predictions
        .iter()
        .enumerate()
        .map(|(index, point)| match point.kind {
            PointKind::Forecast => point.revenue.into(),
            PointKind::History
                if predictions
                    .get(index + 1)
                    .is_some_and(|next| next.kind == PointKind::Forecast) =>
            {
                point.revenue.into()
            }
            PointKind::History => "-".into(),
        })
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("Daily revenue")
                .subtext("Observed and forecast"),
        )
        .tooltip(currency_tooltip())
        .legend(Legend::new().top("1%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Line::new().name("Revenue").data(history))
        .series(
            Line::new()
                .name("Forecast")
                .line_style(LineStyle::new().type_(LineStyleType::Dashed))
                .data(forecast),
        )
}

/// A bar chart of the highest-revenue products.
pub(super) fn top_products_chart(products: &[LabelTotal]) -> Chart {
    let labels: Vec<String> = products.iter().map(|entry| entry.label.clone()).collect();
    let values: Vec<f64> = products.iter().map(|entry| entry.revenue).collect();

    Chart::new()
        .title(Title::new().text("Top products").subtext("By revenue"))
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Bar::new().name("Revenue").data(values))
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

#[cfg(test)]
mod charts_tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::dashboard::{
        aggregation::LabelTotal,
        forecast::{PointKind, PredictionPoint},
    };

    use super::{DashboardChart, charts_view, revenue_forecast_chart, top_products_chart};

    #[test]
    fn revenue_chart_includes_both_series() {
        let predictions = vec![
            PredictionPoint {
                date: date!(2024 - 01 - 01),
                revenue: 10.0,
                kind: PointKind::History,
            },
            PredictionPoint {
                date: date!(2024 - 01 - 02),
                revenue: 12.0,
                kind: PointKind::Forecast,
            },
        ];

        let options = revenue_forecast_chart(&predictions).to_string();

        assert!(options.contains("2024-01-01"));
        assert!(options.contains("2024-01-02"));
        assert!(options.contains("Revenue"));
        assert!(options.contains("Forecast"));
    }

    #[test]
    fn top_products_chart_includes_labels() {
        let products = [LabelTotal {
            label: "Widget".to_owned(),
            revenue: 99.0,
        }];

        let options = top_products_chart(&products).to_string();

        assert!(options.contains("Widget"));
    }

    #[test]
    fn charts_view_renders_container_per_chart() {
        let charts = [
            DashboardChart {
                id: "revenue-chart",
                options: "{}".to_owned(),
            },
            DashboardChart {
                id: "top-products-chart",
                options: "{}".to_owned(),
            },
        ];

        let html = Html::parse_fragment(&charts_view(&charts).into_string());

        assert!(
            html.select(&Selector::parse("#revenue-chart").unwrap())
                .next()
                .is_some()
        );
        assert!(
            html.select(&Selector::parse("#top-products-chart").unwrap())
                .next()
                .is_some()
        );
    }
}
