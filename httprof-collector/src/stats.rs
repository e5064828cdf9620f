use crate::collector::{CallRecord, Snapshot};
use hdrhistogram::Histogram;
use std::fmt;

/// A labelled percentile for latency reporting.
#[derive(Debug, Clone)]
pub struct Percentile {
    label: String,
    percentile: f64,
}

impl Percentile {
    pub fn new<S: Into<String>>(label: S, percentile: f64) -> Percentile {
        Percentile {
            label: label.into(),
            percentile,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn percentile(&self) -> f64 {
        self.percentile
    }
}

impl fmt::Display for Percentile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

pub fn default_percentiles() -> Vec<Percentile> {
    vec![
        Percentile::new("p50", 50.0),
        Percentile::new("p75", 75.0),
        Percentile::new("p90", 90.0),
        Percentile::new("p95", 95.0),
        Percentile::new("p99", 99.0),
        Percentile::new("p99.9", 99.9),
    ]
}

/// Distribution of per-call total times within one snapshot. Values stay
/// in the journal's unit-agnostic ticks.
#[derive(Debug, Clone)]
pub struct LatencyStats {
    min: u64,
    max: u64,
    mean: u64,
    stdev: u64,
    percentiles: Vec<(Percentile, u64)>,
}

impl LatencyStats {
    /// `None` when the snapshot holds no calls.
    pub fn from_snapshot(snapshot: &Snapshot) -> Option<LatencyStats> {
        LatencyStats::from_calls(&snapshot.calls)
    }

    pub fn from_calls(calls: &[CallRecord]) -> Option<LatencyStats> {
        if calls.is_empty() {
            return None;
        }
        let mut histo = Histogram::<u64>::new(3).ok()?;
        for call in calls {
            histo.saturating_record(call.time.total);
        }
        Some(LatencyStats::from_histo(&histo, default_percentiles()))
    }

    fn from_histo(histo: &Histogram<u64>, percentiles: Vec<Percentile>) -> LatencyStats {
        let values = percentiles
            .into_iter()
            .map(|p| {
                let perc = p.percentile;
                (p, histo.value_at_percentile(perc))
            })
            .collect();
        LatencyStats {
            min: histo.min(),
            max: histo.max(),
            mean: histo.mean().trunc() as u64,
            stdev: histo.stdev().trunc() as u64,
            percentiles: values,
        }
    }

    pub fn min(&self) -> u64 {
        self.min
    }

    pub fn max(&self) -> u64 {
        self.max
    }

    pub fn mean(&self) -> u64 {
        self.mean
    }

    pub fn stdev(&self) -> u64 {
        self.stdev
    }

    pub fn percentiles(&self) -> &[(Percentile, u64)] {
        &self.percentiles
    }
}
