use std::{collections::VecDeque, fmt::Display};

use glucosense_types::{HistoryEntry, HistoryPoint, Sample};
use serde::Serialize;

use crate::{
    TimeFormatter, VitalsClassifier,
    helpers::math::{mean, round_float},
};

/// Trailing window of valid glucose readings for the trend chart.
///
/// Holds at most `capacity` points in arrival order; the oldest point is
/// evicted first.
#[derive(Debug, Clone)]
pub struct HistoryWindow {
    formatter: TimeFormatter,
    capacity: usize,
    points: VecDeque<HistoryPoint>,
}

impl HistoryWindow {
    pub const DEFAULT_CAPACITY: usize = 20;

    pub fn new(formatter: TimeFormatter) -> Self {
        Self::with_capacity(formatter, Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(formatter: TimeFormatter, capacity: usize) -> Self {
        Self {
            formatter,
            capacity,
            points: VecDeque::with_capacity(capacity.min(Self::DEFAULT_CAPACITY)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryPoint> {
        self.points.iter()
    }

    pub fn points(&self) -> Vec<HistoryPoint> {
        self.points.iter().cloned().collect()
    }

    /// Replaces the window with the tail of a full feed snapshot.
    pub fn rebuild(&mut self, samples: &[Sample]) {
        self.points = window_tail(&self.formatter, samples, self.capacity).into();
    }

    /// Appends one reading, evicting the oldest point when full. Returns
    /// `false` when the reading is not valid for charting.
    pub fn push(&mut self, sample: &Sample) -> bool {
        if !sample.is_valid() || self.capacity == 0 {
            return false;
        }

        while self.points.len() >= self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(point(&self.formatter, sample));
        true
    }

    /// Pushes every reading in order and returns how many were accepted.
    pub fn extend<'a, I>(&mut self, samples: I) -> usize
    where
        I: IntoIterator<Item = &'a Sample>,
    {
        samples.into_iter().filter(|s| self.push(s)).count()
    }

    pub fn summary(&self) -> Option<TrendSummary> {
        let values: Vec<f64> = self.points.iter().map(|p| p.value).collect();
        TrendSummary::new(&values)
    }
}

/// Rebuilds the trend window from a full snapshot: valid readings only, the
/// last [`HistoryWindow::DEFAULT_CAPACITY`] in arrival order.
pub fn update_history(formatter: &TimeFormatter, samples: &[Sample]) -> Vec<HistoryPoint> {
    window_tail(formatter, samples, HistoryWindow::DEFAULT_CAPACITY)
}

/// Every valid reading, newest first, with its glucose status.
pub fn history_table(formatter: &TimeFormatter, samples: &[Sample]) -> Vec<HistoryEntry> {
    samples
        .iter()
        .rev()
        .filter(|s| s.is_valid())
        .map(|s| HistoryEntry {
            display_time: formatter.format(s.timestamp),
            glucose: s.estimated_glucose,
            status: VitalsClassifier::glucose(s.estimated_glucose),
        })
        .collect()
}

fn window_tail(formatter: &TimeFormatter, samples: &[Sample], capacity: usize) -> Vec<HistoryPoint> {
    let valid: Vec<&Sample> = samples.iter().filter(|s| s.is_valid()).collect();
    let skip = valid.len().saturating_sub(capacity);

    valid[skip..].iter().map(|s| point(formatter, s)).collect()
}

fn point(formatter: &TimeFormatter, sample: &Sample) -> HistoryPoint {
    HistoryPoint {
        display_time: formatter.format(sample.timestamp),
        value: sample.estimated_glucose,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendSummary {
    pub latest: f64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl TrendSummary {
    pub fn new(values: &[f64]) -> Option<Self> {
        let latest = *values.last()?;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            latest,
            min,
            max,
            mean: round_float(mean(values)),
        })
    }
}

impl Display for TrendSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "Latest: {}, Min: {}, Max: {}, Mean: {}",
            self.latest, self.min, self.max, self.mean
        ))
    }
}
