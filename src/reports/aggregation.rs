//! Aggregation over expense snapshots
//!
//! Pure functions that turn an in-memory list of expenses into totals,
//! per-category sums and per-day buckets. Nothing here touches storage; the
//! caller passes whatever snapshot it already holds.
//!
//! Windows are inclusive at both instants. Day buckets run from
//! `00:00:00.000` to `23:59:59.999` local time.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

use crate::models::{CategoryTotal, Expense};

/// Label format for day buckets, e.g. "Jan 05"
pub const DAY_LABEL_FORMAT: &str = "%b %d";

/// Total spent on one calendar day
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTotal {
    pub date: NaiveDate,
    /// Short label such as "Jan 05"
    pub label: String,
    pub total: f64,
}

/// First instant of the day
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Last instant of the day at millisecond precision
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    let last = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    date.and_time(last)
}

/// First instant of the `days`-day window ending on `reference`
///
/// `days == 0` is treated as one day. Clamped to the earliest representable
/// date.
pub fn window_start(reference: NaiveDate, days: u32) -> NaiveDateTime {
    let back = u64::from(days.max(1) - 1);
    start_of_day(
        reference
            .checked_sub_days(Days::new(back))
            .unwrap_or(NaiveDate::MIN),
    )
}

/// Inclusive window test
///
/// The equality arms overlap with the strict comparison on purpose; an
/// instant on either boundary is inside the window.
pub fn in_window(date: NaiveDateTime, start: NaiveDateTime, end: NaiveDateTime) -> bool {
    (date > start && date < end) || date == start || date == end
}

/// Sum of amounts for records dated within `[start, end]`
pub fn total_for_range(records: &[Expense], start: NaiveDateTime, end: NaiveDateTime) -> f64 {
    records
        .iter()
        .filter(|e| in_window(e.date, start, end))
        .map(|e| e.amount)
        .sum()
}

/// Sum of amounts for the calendar day containing `now`
pub fn total_for_today(records: &[Expense], now: NaiveDateTime) -> f64 {
    let today = now.date();
    total_for_range(records, start_of_day(today), end_of_day(today))
}

/// Per-category sums for records within `[start, end]`, sorted by category
///
/// Groups on the raw stored category text, one entry per distinct value.
pub fn category_breakdown(
    records: &[Expense],
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Vec<CategoryTotal> {
    let mut sums: BTreeMap<&str, f64> = BTreeMap::new();
    for expense in records.iter().filter(|e| in_window(e.date, start, end)) {
        *sums.entry(expense.category.as_str()).or_insert(0.0) += expense.amount;
    }

    sums.into_iter()
        .map(|(category, total)| CategoryTotal::new(category, total))
        .collect()
}

/// Per-day totals for the `days` calendar days ending on `reference`'s date
///
/// Oldest day first. `days == 0` yields an empty list. Days before the
/// earliest representable date are left out.
pub fn daily_totals(records: &[Expense], days: u32, reference: NaiveDateTime) -> Vec<DailyTotal> {
    let reference_day = reference.date();

    (0..days)
        .rev()
        .filter_map(|offset| reference_day.checked_sub_days(Days::new(u64::from(offset))))
        .map(|date| {
            DailyTotal {
                date,
                label: date.format(DAY_LABEL_FORMAT).to_string(),
                total: total_for_range(records, start_of_day(date), end_of_day(date)),
            }
        })
        .collect()
}

/// Number of records in the snapshot
pub fn expense_count(records: &[Expense]) -> usize {
    records.len()
}

/// `part` as a percentage of `whole`; 0 when `whole` is not positive
pub fn percentage_of(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}
