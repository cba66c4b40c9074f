//! Reduce the raw 3-hourly series to one reading per day.

use chrono::{NaiveTime, Timelike};
use std::collections::HashSet;

use crate::types::{ForecastDay, ForecastEntry};

/// Days kept from a forecast
pub const MAX_FORECAST_DAYS: usize = 5;

/// Slots per day in a 3-hourly series
const FALLBACK_STRIDE: usize = 8;

fn is_noon(time: NaiveTime) -> bool {
    time.hour() == 12 && time.minute() == 0 && time.second() == 0
}

/// Pick each day's 12:00:00 reading, at most five days, in series order.
///
/// If the series has no noon slot at all, every 8th entry from the first is
/// used instead so that any non-empty series yields a forecast. Sampled
/// entries without a timestamp are kept with no date.
pub fn reduce_forecast(entries: &[ForecastEntry]) -> Vec<ForecastDay> {
    let days = noon_readings(entries);
    if !days.is_empty() {
        return days;
    }

    if !entries.is_empty() {
        tracing::debug!(
            "No noon slots in {} entries, sampling every {}th",
            entries.len(),
            FALLBACK_STRIDE
        );
    }
    strided_readings(entries)
}

fn noon_readings(entries: &[ForecastEntry]) -> Vec<ForecastDay> {
    let mut seen = HashSet::new();
    let mut days = Vec::with_capacity(MAX_FORECAST_DAYS);

    for entry in entries {
        let Some(ts) = entry.timestamp() else {
            continue;
        };
        if !is_noon(ts.time()) {
            continue;
        }
        // First noon slot of a date wins
        if seen.insert(ts.date()) {
            days.push(entry.to_day(Some(ts.date())));
            if days.len() >= MAX_FORECAST_DAYS {
                break;
            }
        }
    }

    days
}

fn strided_readings(entries: &[ForecastEntry]) -> Vec<ForecastDay> {
    let mut seen = HashSet::new();

    entries
        .iter()
        .step_by(FALLBACK_STRIDE)
        .take(MAX_FORECAST_DAYS)
        .map(|entry| (entry, entry.timestamp().map(|ts| ts.date())))
        // Undated entries can't collide
        .filter(|(_, date)| match date {
            Some(d) => seen.insert(*d),
            None => true,
        })
        .map(|(entry, date)| entry.to_day(date))
        .collect()
}
