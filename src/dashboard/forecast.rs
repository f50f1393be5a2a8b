//! The revenue forecast engine.
//!
//! A simple moving average: each projected day is the mean of the previous
//! seven days' revenue, and projections feed back into the window so
//! multi-day forecasts decay toward a steady state instead of repeating the
//! last observed mean.

use std::{collections::VecDeque, fmt};

use time::Date;

use super::aggregation::DailyPoint;

/// The number of trailing days averaged for each projected day.
const SMA_WINDOW: usize = 7;

/// How far past the end of the data the revenue forecast extends.
pub(crate) const FORECAST_HORIZON_DAYS: usize = 14;

/// Whether a prediction point is observed history or a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointKind {
    /// An observed daily revenue total.
    History,
    /// A projected daily revenue total.
    Forecast,
}

impl fmt::Display for PointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointKind::History => write!(f, "history"),
            PointKind::Forecast => write!(f, "forecast"),
        }
    }
}

/// One day in the combined history-plus-forecast series.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionPoint {
    /// The calendar day.
    pub date: Date,
    /// The observed or projected revenue, never negative for projections.
    pub revenue: f64,
    /// Whether the point was observed or projected.
    pub kind: PointKind,
}

/// Project daily revenue `horizon_days` past the end of `history`.
///
/// The output is the history (ascending by date, unchanged values) followed
/// by one projected point per day of the horizon, each the mean of the
/// seven revenues before it, clamped at zero. Histories shorter than seven
/// days return an empty vec: there is not enough signal to average.
pub fn forecast(history: &[DailyPoint], horizon_days: usize) -> Vec<PredictionPoint> {
    if history.len() < SMA_WINDOW {
        return Vec::new();
    }

    let mut points = history.to_vec();
    points.sort_by_key(|point| point.date);

    let mut predictions: Vec<PredictionPoint> = points
        .iter()
        .map(|point| PredictionPoint {
            date: point.date,
            revenue: point.revenue,
            kind: PointKind::History,
        })
        .collect();

    let mut window: VecDeque<f64> = points[points.len() - SMA_WINDOW..]
        .iter()
        .map(|point| point.revenue)
        .collect();
    let Some(mut date) = points.last().map(|point| point.date) else {
        return predictions;
    };

    for _ in 0..horizon_days {
        let mean = window.iter().sum::<f64>() / window.len() as f64;
        let revenue = mean.max(0.0);

        // Stop rather than wrap at the calendar's supported range.
        let Some(next_date) = date.next_day() else {
            break;
        };
        date = next_date;

        predictions.push(PredictionPoint {
            date,
            revenue,
            kind: PointKind::Forecast,
        });

        window.pop_front();
        window.push_back(revenue);
    }

    predictions
}
