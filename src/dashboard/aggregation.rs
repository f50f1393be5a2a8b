//! The aggregation engine behind the dashboard.
//!
//! [aggregate] reduces a slice of sales to the numbers the dashboard
//! displays in a single pass. It is a pure function over plain values so the
//! tie-break and windowing rules can be tested with literal fixtures.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use time::{Date, Duration};

use super::sale::Sale;

/// The label used for sales whose product or category is missing or blank.
pub const UNSPECIFIED_LABEL: &str = "Unspecified";

/// How many products and categories the ranked tables keep.
const TOP_N: usize = 5;

/// The trailing time window to aggregate over.
///
/// Windows are anchored to the latest sale date in the data, not the current
/// date, so a stale dataset still shows its final weeks of activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum RangeFilter {
    /// The 30 days ending on the latest sale date.
    #[serde(rename = "30")]
    Last30Days,
    /// The 90 days ending on the latest sale date.
    #[serde(rename = "90")]
    Last90Days,
    /// No time filtering.
    #[default]
    #[serde(rename = "all")]
    All,
}

impl RangeFilter {
    /// The window length in days, or `None` for no filtering.
    fn days(self) -> Option<i64> {
        match self {
            RangeFilter::Last30Days => Some(30),
            RangeFilter::Last90Days => Some(90),
            RangeFilter::All => None,
        }
    }
}

/// Revenue summed over one calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyPoint {
    /// The calendar day.
    pub date: Date,
    /// The summed revenue for the day.
    pub revenue: f64,
}

/// A product or category label with its summed revenue.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelTotal {
    /// The product or category name.
    pub label: String,
    /// The summed revenue for the label.
    pub revenue: f64,
}

/// The headline numbers shown in the dashboard's KPI cards.
#[derive(Debug, Clone, PartialEq)]
pub struct Kpis {
    /// The sum of all sale amounts in the window.
    pub total_revenue: f64,
    /// The number of sales in the window.
    pub order_count: usize,
    /// Mean revenue per sale, 0 when there are no sales.
    pub avg_ticket: f64,
    /// The product with the highest summed revenue. Ties keep the product
    /// that appears first in the input.
    pub top_product: String,
    /// The top product's fraction of total revenue, 0 when the total is 0.
    pub top_product_share: f64,
}

/// Everything the dashboard needs to render for one range selection.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    /// The headline numbers.
    pub kpis: Kpis,
    /// Daily revenue, ascending by date.
    pub chart_data: Vec<DailyPoint>,
    /// The highest-revenue products, descending, at most five.
    pub top_products: Vec<LabelTotal>,
    /// The highest-revenue categories, descending, at most five.
    pub top_categories: Vec<LabelTotal>,
}

/// Sums revenue per label while remembering the order labels first appeared,
/// so that equal totals rank in input order.
#[derive(Default)]
struct LabelTotals {
    index: HashMap<String, usize>,
    entries: Vec<LabelTotal>,
}

impl LabelTotals {
    fn add(&mut self, label: &str, amount: f64) {
        match self.index.get(label) {
            Some(&position) => self.entries[position].revenue += amount,
            None => {
                self.index.insert(label.to_owned(), self.entries.len());
                self.entries.push(LabelTotal {
                    label: label.to_owned(),
                    revenue: amount,
                });
            }
        }
    }

    /// The entries sorted by revenue descending. The sort is stable, so
    /// equal revenues keep first-appearance order.
    fn into_ranked(mut self, limit: usize) -> Vec<LabelTotal> {
        self.entries
            .sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
        self.entries.truncate(limit);
        self.entries
    }
}

/// Summarize `sales` over the trailing window selected by `range`.
///
/// Returns `None` when there are no sales at all or none fall inside the
/// window, so callers can tell "no data" apart from a summary of zeros.
pub fn aggregate(sales: &[Sale], range: RangeFilter) -> Option<DashboardSummary> {
    let latest_date = sales.iter().map(|sale| sale.date).max()?;
    let cutoff = range
        .days()
        .map(|days| latest_date - Duration::days(days - 1));

    let mut total_revenue = 0.0;
    let mut order_count = 0;
    let mut products = LabelTotals::default();
    let mut categories = LabelTotals::default();
    let mut daily: BTreeMap<Date, f64> = BTreeMap::new();

    for sale in sales {
        if let Some(cutoff) = cutoff
            && sale.date < cutoff
        {
            continue;
        }

        total_revenue += sale.amount;
        order_count += 1;
        products.add(label_or_unspecified(sale.product.as_deref()), sale.amount);
        categories.add(label_or_unspecified(sale.category.as_deref()), sale.amount);
        *daily.entry(sale.date).or_insert(0.0) += sale.amount;
    }

    if order_count == 0 {
        return None;
    }

    let (top_product, top_revenue) = products
        .entries
        .iter()
        .fold(None::<(&str, f64)>, |best, entry| match best {
            Some((_, revenue)) if entry.revenue > revenue => {
                Some((&entry.label, entry.revenue))
            }
            None => Some((&entry.label, entry.revenue)),
            best => best,
        })
        .map(|(label, revenue)| (label.to_owned(), revenue))?;

    let avg_ticket = total_revenue / order_count as f64;
    let top_product_share = if total_revenue == 0.0 {
        0.0
    } else {
        top_revenue / total_revenue
    };

    // BTreeMap iteration is ordered, so the series comes out ascending.
    let chart_data = daily
        .into_iter()
        .map(|(date, revenue)| DailyPoint { date, revenue })
        .collect();

    Some(DashboardSummary {
        kpis: Kpis {
            total_revenue,
            order_count,
            avg_ticket,
            top_product,
            top_product_share,
        },
        chart_data,
        top_products: products.into_ranked(TOP_N),
        top_categories: categories.into_ranked(TOP_N),
    })
}

fn label_or_unspecified(label: Option<&str>) -> &str {
    match label {
        Some(label) if !label.trim().is_empty() => label,
        _ => UNSPECIFIED_LABEL,
    }
}

#[cfg(test)]
mod aggregate_tests {
    use time::{Date, macros::date};

    use super::{RangeFilter, Sale, UNSPECIFIED_LABEL, aggregate};

    fn sale(date: Date, amount: f64, product: &str, category: &str) -> Sale {
        Sale {
            date,
            amount,
            product: (!product.is_empty()).then(|| product.to_owned()),
            category: (!category.is_empty()).then(|| category.to_owned()),
        }
    }

    #[test]
    fn empty_input_gives_none() {
        assert_eq!(aggregate(&[], RangeFilter::All), None);
    }

    #[test]
    fn sums_kpis_over_all_sales() {
        let sales = [
            sale(date!(2024 - 01 - 01), 10.0, "Widget", "Hardware"),
            sale(date!(2024 - 01 - 02), 30.0, "Gadget", "Hardware"),
        ];

        let summary = aggregate(&sales, RangeFilter::All).unwrap();

        assert_eq!(summary.kpis.total_revenue, 40.0);
        assert_eq!(summary.kpis.order_count, 2);
        assert_eq!(summary.kpis.avg_ticket, 20.0);
        assert_eq!(summary.kpis.top_product, "Gadget");
        assert_eq!(summary.kpis.top_product_share, 0.75);
    }

    #[test]
    fn window_is_anchored_to_latest_sale_date() {
        // Stale data: nothing within 30 days of today, but the window
        // anchors to 2024-03-31 so the March sale is included.
        let sales = [
            sale(date!(2024 - 01 - 01), 100.0, "Old", ""),
            sale(date!(2024 - 03 - 31), 50.0, "New", ""),
        ];

        let summary = aggregate(&sales, RangeFilter::Last30Days).unwrap();

        assert_eq!(summary.kpis.order_count, 1);
        assert_eq!(summary.kpis.total_revenue, 50.0);
        assert_eq!(summary.kpis.top_product, "New");
    }

    #[test]
    fn window_boundary_is_inclusive() {
        // 2024-03-02 is exactly 29 days before 2024-03-31, so it is the
        // oldest day inside the 30-day window; 2024-03-01 is outside.
        let sales = [
            sale(date!(2024 - 03 - 01), 1.0, "", ""),
            sale(date!(2024 - 03 - 02), 2.0, "", ""),
            sale(date!(2024 - 03 - 31), 4.0, "", ""),
        ];

        let summary = aggregate(&sales, RangeFilter::Last30Days).unwrap();

        assert_eq!(summary.kpis.total_revenue, 6.0);
        assert_eq!(summary.kpis.order_count, 2);
    }

    #[test]
    fn missing_labels_use_the_unspecified_sentinel() {
        let sales = [
            sale(date!(2024 - 01 - 01), 10.0, "", ""),
            sale(date!(2024 - 01 - 01), 5.0, "  ", ""),
        ];

        let summary = aggregate(&sales, RangeFilter::All).unwrap();

        assert_eq!(summary.kpis.top_product, UNSPECIFIED_LABEL);
        assert_eq!(summary.top_products.len(), 1);
        assert_eq!(summary.top_products[0].label, UNSPECIFIED_LABEL);
        assert_eq!(summary.top_products[0].revenue, 15.0);
        assert_eq!(summary.top_categories[0].label, UNSPECIFIED_LABEL);
    }

    #[test]
    fn top_product_ties_keep_first_seen() {
        let sales = [
            sale(date!(2024 - 01 - 01), 10.0, "First", ""),
            sale(date!(2024 - 01 - 02), 10.0, "Second", ""),
        ];

        let summary = aggregate(&sales, RangeFilter::All).unwrap();

        assert_eq!(summary.kpis.top_product, "First");
        // The ranked table keeps the same order for the tie.
        assert_eq!(summary.top_products[0].label, "First");
        assert_eq!(summary.top_products[1].label, "Second");
    }

    #[test]
    fn ranked_tables_are_descending_and_capped_at_five() {
        let sales: Vec<Sale> = (1..=7)
            .map(|n| {
                sale(
                    date!(2024 - 01 - 01),
                    n as f64,
                    &format!("Product {n}"),
                    &format!("Category {n}"),
                )
            })
            .collect();

        let summary = aggregate(&sales, RangeFilter::All).unwrap();

        assert_eq!(summary.top_products.len(), 5);
        assert_eq!(summary.top_products[0].label, "Product 7");
        assert_eq!(summary.top_products[4].label, "Product 3");
        assert_eq!(summary.top_categories.len(), 5);
    }

    #[test]
    fn chart_data_sums_per_day_ascending() {
        let sales = [
            sale(date!(2024 - 01 - 02), 5.0, "", ""),
            sale(date!(2024 - 01 - 01), 10.0, "", ""),
            sale(date!(2024 - 01 - 02), 15.0, "", ""),
        ];

        let summary = aggregate(&sales, RangeFilter::All).unwrap();

        assert_eq!(summary.chart_data.len(), 2);
        assert_eq!(summary.chart_data[0].date, date!(2024 - 01 - 01));
        assert_eq!(summary.chart_data[0].revenue, 10.0);
        assert_eq!(summary.chart_data[1].date, date!(2024 - 01 - 02));
        assert_eq!(summary.chart_data[1].revenue, 20.0);
    }

    #[test]
    fn zero_total_revenue_gives_zero_share() {
        let sales = [sale(date!(2024 - 01 - 01), 0.0, "Widget", "")];

        let summary = aggregate(&sales, RangeFilter::All).unwrap();

        assert_eq!(summary.kpis.top_product_share, 0.0);
        assert_eq!(summary.kpis.avg_ticket, 0.0);
    }
}
