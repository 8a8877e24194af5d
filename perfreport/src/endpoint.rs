use crate::percentile::{check_percentile, nearest_rank, SortedDurations};
use crate::totals::{signed_diff, RunningTotals};
use perfreport_core::{EndpointStatistics, ReportError, SampleRecord, MEDIAN, P90};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
#[allow(unused_imports)]
use tracing::{debug, error, info, trace, warn};

/// All samples recorded for one endpoint of a report.
///
/// Endpoints are created and fed by their [`ReportAggregate`](crate::ReportAggregate); callers
/// only ever hold read handles.
pub struct EndpointAggregate {
    key: String,
    raw_identifier: String,
    state: Mutex<EndpointState>,
    baseline: OnceLock<Arc<EndpointAggregate>>,
}

#[derive(Debug, Default)]
struct EndpointState {
    totals: RunningTotals,
    durations: Vec<u64>,
    sorted: SortedDurations,
}

impl EndpointState {
    fn duration_at(&mut self, percentile: f64) -> u64 {
        if self.totals.sample_count == 0 {
            return 0;
        }
        let Self {
            durations, sorted, ..
        } = self;
        nearest_rank(sorted.get_or_build(|| durations.clone()), percentile)
    }
}

impl EndpointAggregate {
    pub(crate) fn new(key: &str, raw_identifier: &str) -> Self {
        Self {
            key: key.to_string(),
            raw_identifier: raw_identifier.to_string(),
            state: Mutex::new(EndpointState::default()),
            baseline: OnceLock::new(),
        }
    }

    pub(crate) fn add_sample(&self, sample: &SampleRecord) {
        let mut state = self.lock();
        state.durations.push(sample.duration);
        state.totals.record(sample);
        state.sorted.invalidate();
    }

    /// Append this endpoint's durations to `out`, in recording order.
    pub(crate) fn extend_durations(&self, out: &mut Vec<u64>) {
        out.extend_from_slice(&self.lock().durations);
    }

    /// Link this endpoint to its counterpart in a previous report.
    ///
    /// Only the first link is kept; returns `false` if one was already set or if `baseline`
    /// leads back to this endpoint.
    pub fn set_baseline_endpoint(&self, baseline: Arc<EndpointAggregate>) -> bool {
        let mut ancestor = Some(&baseline);
        while let Some(endpoint) = ancestor {
            if std::ptr::eq(self, Arc::as_ptr(endpoint)) {
                warn!("Endpoint {} cannot be a baseline of itself", self.key);
                return false;
            }
            ancestor = endpoint.baseline.get();
        }
        match self.baseline.set(baseline) {
            Ok(()) => true,
            Err(_) => {
                warn!("Baseline for endpoint {} is already set; ignoring", self.key);
                false
            }
        }
    }

    pub fn baseline(&self) -> Option<&Arc<EndpointAggregate>> {
        self.baseline.get()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The identifier as first seen, before normalization.
    pub fn raw_identifier(&self) -> &str {
        &self.raw_identifier
    }

    /// Recorded durations in the order they were added.
    pub fn durations(&self) -> Vec<u64> {
        self.lock().durations.clone()
    }

    pub fn sample_count(&self) -> usize {
        self.lock().totals.sample_count
    }

    pub fn error_count(&self) -> usize {
        self.lock().totals.error_count
    }

    pub fn external_error_weight(&self) -> f64 {
        self.lock().totals.external_error_weight
    }

    pub fn average_duration(&self) -> u64 {
        self.lock().totals.average_duration()
    }

    pub fn average_size_kb(&self) -> f64 {
        self.lock().totals.average_size_kb()
    }

    pub fn total_traffic_kb(&self) -> f64 {
        self.lock().totals.total_traffic_kb()
    }

    pub fn min_duration(&self) -> Option<u64> {
        self.lock().totals.min_duration
    }

    pub fn max_duration(&self) -> Option<u64> {
        self.lock().totals.max_duration
    }

    /// Unsuccessful samples as a percentage; 0 when empty.
    pub fn error_rate(&self) -> f64 {
        self.lock().totals.error_percent()
    }

    pub fn duration_at_percentile(&self, percentile: f64) -> Result<u64, ReportError> {
        let percentile = check_percentile(percentile)?;
        Ok(self.lock().duration_at(percentile))
    }

    pub fn median_duration(&self) -> u64 {
        self.lock().duration_at(MEDIAN)
    }

    pub fn p90_duration(&self) -> u64 {
        self.lock().duration_at(P90)
    }

    pub fn average_diff(&self) -> i64 {
        self.baseline().map_or(0, |baseline| {
            signed_diff(self.average_duration(), baseline.average_duration())
        })
    }

    pub fn median_diff(&self) -> i64 {
        self.baseline().map_or(0, |baseline| {
            signed_diff(self.median_duration(), baseline.median_duration())
        })
    }

    pub fn error_rate_diff(&self) -> f64 {
        self.baseline()
            .map_or(0., |baseline| self.error_rate() - baseline.error_rate())
    }

    pub fn sample_count_diff(&self) -> i64 {
        self.baseline().map_or(0, |baseline| {
            signed_diff(self.sample_count() as u64, baseline.sample_count() as u64)
        })
    }

    pub fn statistics(&self) -> EndpointStatistics {
        let mut state = self.lock();
        EndpointStatistics {
            key: self.key.clone(),
            raw_identifier: self.raw_identifier.clone(),
            sample_count: state.totals.sample_count,
            error_count: state.totals.error_count,
            error_rate: state.totals.error_percent(),
            average_duration: state.totals.average_duration(),
            median_duration: state.duration_at(MEDIAN),
            p90_duration: state.duration_at(P90),
            min_duration: state.totals.min_duration,
            max_duration: state.totals.max_duration,
            average_size_kb: state.totals.average_size_kb(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, EndpointState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for EndpointAggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointAggregate")
            .field("key", &self.key)
            .field("raw_identifier", &self.raw_identifier)
            .field("sample_count", &self.sample_count())
            .field("has_baseline", &self.baseline.get().is_some())
            .finish()
    }
}
