#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Point-in-time statistics of a whole report.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReportStatistics {
    pub identifier: String,
    pub sample_count: usize,
    pub error_count: usize,
    pub endpoint_count: usize,
    pub error_rate: f64,
    pub average_duration: u64,
    pub median_duration: u64,
    pub p90_duration: u64,
    pub min_duration: Option<u64>,
    pub max_duration: Option<u64>,
    pub average_size_kb: f64,
    pub total_traffic_kb: f64,
}

/// Point-in-time statistics of a single endpoint.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EndpointStatistics {
    pub key: String,
    pub raw_identifier: String,
    pub sample_count: usize,
    pub error_count: usize,
    pub error_rate: f64,
    pub average_duration: u64,
    pub median_duration: u64,
    pub p90_duration: u64,
    pub min_duration: Option<u64>,
    pub max_duration: Option<u64>,
    pub average_size_kb: f64,
}

/// Change of the headline statistics relative to a baseline.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BaselineDiff {
    pub average: i64,
    pub median: i64,
    pub error_rate: f64,
    pub sample_count: i64,
}

impl fmt::Display for ReportStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: Samples={}, Endpoints={}, ErrorRate={:.2}, avg={}, p50={}, p90={}, min={}, max={}, avgSize={}KB",
            self.identifier,
            self.sample_count,
            self.endpoint_count,
            self.error_rate,
            millis(self.average_duration),
            millis(self.median_duration),
            millis(self.p90_duration),
            optional_millis(self.min_duration),
            optional_millis(self.max_duration),
            self.average_size_kb,
        )
    }
}

impl fmt::Display for EndpointStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: Samples={}, ErrorRate={:.2}, avg={}, p50={}, p90={}, min={}, max={}",
            self.raw_identifier,
            self.sample_count,
            self.error_rate,
            millis(self.average_duration),
            millis(self.median_duration),
            millis(self.p90_duration),
            optional_millis(self.min_duration),
            optional_millis(self.max_duration),
        )
    }
}

impl fmt::Display for BaselineDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "avg={:+}ms, p50={:+}ms, ErrorRate={:+.2}, Samples={:+}",
            self.average, self.median, self.error_rate, self.sample_count
        )
    }
}

fn millis(ms: u64) -> humantime::FormattedDuration {
    humantime::format_duration(Duration::from_millis(ms))
}

fn optional_millis(ms: Option<u64>) -> String {
    match ms {
        Some(ms) => millis(ms).to_string(),
        None => "-".to_string(),
    }
}
