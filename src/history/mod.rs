//! Longitudinal per-label time series keyed by calendar date.
//!
//! A [`History`] holds strictly increasing dates and, for every label ever
//! observed, one count per date. The core invariant is that every series has
//! exactly as many values as there are dates. [`merge_day`] is the only way
//! to add data, and it refuses to touch a history that already violates the
//! invariant.
//!
//! Merge rules:
//!
//! - **New date** (after the latest): append it; every label gains one value,
//!   zero when absent from the day's counts. Labels seen for the first time are
//!   back-filled with zeros for all earlier dates.
//! - **Latest date again** (a re-run): overwrite the last value of each label
//!   in the day's counts; other labels keep what was recorded.
//! - **Earlier date**: rejected. History is append-only.

pub mod store;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{HistoryError, HistoryResult};
use crate::tally::DailyCounts;
use crate::vocab::Vocabulary;

pub use store::HistoryStore;

/// Dates plus one aligned count series per label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    #[serde(default)]
    dates: Vec<NaiveDate>,
    #[serde(default)]
    series: BTreeMap<String, Vec<u64>>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a history from raw parts, validating the invariant.
    pub fn from_parts(
        dates: Vec<NaiveDate>,
        series: BTreeMap<String, Vec<u64>>,
    ) -> HistoryResult<Self> {
        let history = Self { dates, series };
        history.validate()?;
        Ok(history)
    }

    /// Check date ordering and series alignment.
    pub fn validate(&self) -> HistoryResult<()> {
        if let Some(pair) = self.dates.windows(2).find(|w| w[0] >= w[1]) {
            return Err(HistoryError::Corrupt {
                message: format!(
                    "dates not strictly increasing: {} followed by {}",
                    pair[0], pair[1]
                ),
            });
        }
        for (label, values) in &self.series {
            if values.len() != self.dates.len() {
                return Err(HistoryError::Corrupt {
                    message: format!(
                        "series \"{label}\" has {} values for {} dates",
                        values.len(),
                        self.dates.len()
                    ),
                });
            }
        }
        Ok(())
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn series(&self, label: &str) -> Option<&[u64]> {
        self.series.get(label).map(Vec::as_slice)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    pub fn iter_series(&self) -> impl Iterator<Item = (&str, &[u64])> {
        self.series.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of recorded dates.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Fold one day's counts into this history. On error nothing changes.
    pub fn record_day(&mut self, date: NaiveDate, counts: &DailyCounts) -> HistoryResult<()> {
        *self = merge_day(self, date, counts)?;
        Ok(())
    }

    /// Sub-history with dates inside the inclusive range; `None` leaves a side open.
    pub fn window(&self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> History {
        let start = from.map_or(0, |f| self.dates.partition_point(|d| *d < f));
        let end = to.map_or(self.dates.len(), |t| self.dates.partition_point(|d| *d <= t));
        let end = end.max(start);

        History {
            dates: self.dates[start..end].to_vec(),
            series: self
                .series
                .iter()
                .map(|(label, values)| (label.clone(), values[start..end].to_vec()))
                .collect(),
        }
    }

    /// Sub-history covering one calendar month.
    pub fn month(&self, year: i32, month: u32) -> HistoryResult<History> {
        let (first, last) = month_bounds(year, month)?;
        Ok(self.window(Some(first), Some(last)))
    }

    /// Counts recorded on the latest date, zeros included.
    pub fn latest_counts(&self) -> DailyCounts {
        self.series
            .iter()
            .filter_map(|(label, values)| values.last().map(|n| (label.clone(), *n)))
            .collect()
    }

    /// Per-label sums over every recorded date.
    pub fn totals(&self) -> DailyCounts {
        self.series
            .iter()
            .map(|(label, values)| (label.clone(), values.iter().sum::<u64>()))
            .collect()
    }

    /// Per-category sums on the latest date, in vocabulary category order.
    ///
    /// Categories whose total is zero are left out.
    pub fn category_totals<'v>(&self, vocab: &'v Vocabulary) -> Vec<(&'v str, u64)> {
        let latest = self.latest_counts();
        vocab
            .categories()
            .into_iter()
            .map(|(category, labels)| {
                let total = labels.iter().map(|l| latest.get(l)).sum::<u64>();
                (category, total)
            })
            .filter(|(_, total)| *total > 0)
            .collect()
    }

    /// Drop series that are zero on every date. Returns how many were removed.
    pub fn prune_zero_series(&mut self) -> usize {
        let before = self.series.len();
        self.series.retain(|_, values| values.iter().any(|n| *n > 0));
        before - self.series.len()
    }
}

/// First and last day of a calendar month.
pub fn month_bounds(year: i32, month: u32) -> HistoryResult<(NaiveDate, NaiveDate)> {
    let invalid = || HistoryError::InvalidMonth { year, month };
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let last = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .ok_or_else(invalid)?;
    Ok((first, last))
}

/// Pure merge of one day's counts into `history`. See the module docs.
pub fn merge_day(history: &History, date: NaiveDate, counts: &DailyCounts) -> HistoryResult<History> {
    history.validate()?;

    let mut next = history.clone();
    match next.latest_date() {
        Some(latest) if date < latest => {
            return Err(HistoryError::OutOfOrder {
                date: date.to_string(),
                latest: latest.to_string(),
            });
        }
        Some(latest) if date == latest => {
            let len = next.dates.len();
            for (label, n) in counts.iter() {
                let values = next
                    .series
                    .entry(label.to_string())
                    .or_insert_with(|| vec![0; len]);
                if let Some(last) = values.last_mut() {
                    *last = n;
                }
            }
        }
        _ => {
            let prior = next.dates.len();
            next.dates.push(date);
            for label in counts.labels() {
                next.series
                    .entry(label.to_string())
                    .or_insert_with(|| vec![0; prior]);
            }
            for (label, values) in next.series.iter_mut() {
                values.push(counts.get(label));
            }
        }
    }

    debug_assert!(next.validate().is_ok());
    Ok(next)
}
