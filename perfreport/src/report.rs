//! Report-wide aggregation
//!
//! A [`ReportAggregate`] routes every sample to the [`EndpointAggregate`] for its normalized key
//! while keeping report-wide totals of its own. Percentiles and the ordered endpoint listing are
//! derived lazily and cached until the next sample arrives.
//!
//! # Locking
//!
//! One mutex per report guards the endpoint map, the totals and both caches. Each endpoint has a
//! mutex of its own. Locks are always taken report first, endpoint second; endpoint queries never
//! touch the report lock.
use crate::error_rate::{ErrorRateStrategy, NeverSummarized, ParserModeOracle};
use crate::ordering::EndpointOrdering;
use crate::percentile::{check_percentile, nearest_rank, SortedDurations};
use crate::sink::{DiagnosticSink, TracingSink};
use crate::totals::{signed_diff, RunningTotals};
use crate::EndpointAggregate;
use perfreport_core::{
    endpoint_key, BaselineDiff, Diagnostic, ReportError, ReportStatistics, SampleRecord, MEDIAN,
    P90,
};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
#[allow(unused_imports)]
use tracing::{debug, error, info, instrument, trace, warn};

/// Statistics of one report file, split by endpoint.
///
/// # Example
/// ```
/// use perfreport::prelude::*;
///
/// let report = ReportAggregate::new("results.jtl");
/// for duration in [100, 200, 300, 400, 500] {
///     report.add_sample(&SampleRecord::new("http://host/login", duration, 1.5, true));
/// }
///
/// assert_eq!(report.median_duration(), 300);
/// assert_eq!(report.p90_duration(), 500);
/// assert!(report.endpoint("_host_login").is_some());
/// ```
pub struct ReportAggregate {
    identifier: String,
    state: Mutex<ReportState>,
    parser_mode: Arc<dyn ParserModeOracle>,
    sink: Arc<dyn DiagnosticSink>,
    baseline: OnceLock<Arc<ReportAggregate>>,
}

#[derive(Default)]
struct ReportState {
    /// In order of first appearance.
    endpoints: Vec<Arc<EndpointAggregate>>,
    by_key: HashMap<String, Arc<EndpointAggregate>>,
    totals: RunningTotals,
    sorted: SortedDurations,
    ordered: Option<Vec<Arc<EndpointAggregate>>>,
    ordering: EndpointOrdering,
}

impl ReportState {
    fn endpoint_or_insert(&mut self, key: &str, raw_identifier: &str) -> Arc<EndpointAggregate> {
        if let Some(endpoint) = self.by_key.get(key) {
            return endpoint.clone();
        }

        debug!("New endpoint {key} ({raw_identifier})");
        let endpoint = Arc::new(EndpointAggregate::new(key, raw_identifier));
        self.by_key.insert(key.to_string(), endpoint.clone());
        self.endpoints.push(endpoint.clone());
        endpoint
    }

    fn invalidate(&mut self) {
        self.sorted.invalidate();
        self.ordered = None;
    }

    fn duration_at(&mut self, percentile: f64) -> u64 {
        let sample_count = self.totals.sample_count;
        if sample_count == 0 {
            return 0;
        }

        let Self {
            endpoints, sorted, ..
        } = self;
        let sorted = sorted.get_or_build(|| {
            let mut all = Vec::with_capacity(sample_count);
            for endpoint in endpoints.iter() {
                endpoint.extend_durations(&mut all);
            }
            all
        });
        nearest_rank(sorted, percentile)
    }

    fn ordered(&mut self) -> &[Arc<EndpointAggregate>] {
        let Self {
            endpoints,
            ordered,
            ordering,
            ..
        } = self;
        ordered.get_or_insert_with(|| {
            let mut view = endpoints.clone();
            ordering.sort_descending(&mut view);
            trace!("Rebuilt ordered view of {} endpoints", view.len());
            view
        })
    }
}

impl ReportAggregate {
    pub fn new(identifier: &str) -> Self {
        Self {
            identifier: identifier.to_string(),
            state: Mutex::new(ReportState::default()),
            parser_mode: Arc::new(NeverSummarized),
            sink: Arc::new(TracingSink),
            baseline: OnceLock::new(),
        }
    }

    /// Decide between per-sample and summarized error rates with `oracle`.
    pub fn with_parser_mode<O>(mut self, oracle: O) -> Self
    where
        O: ParserModeOracle + 'static,
    {
        self.parser_mode = Arc::new(oracle);
        self
    }

    /// Send ingestion diagnostics to `sink` instead of `tracing`.
    pub fn with_sink<S>(mut self, sink: S) -> Self
    where
        S: DiagnosticSink + 'static,
    {
        self.sink = Arc::new(sink);
        self
    }

    pub fn with_ordering(self, ordering: EndpointOrdering) -> Self {
        self.set_ordering(ordering);
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn set_identifier(&mut self, identifier: &str) {
        self.identifier = identifier.to_string();
    }

    pub fn ordering(&self) -> EndpointOrdering {
        self.lock().ordering
    }

    pub fn set_ordering(&self, ordering: EndpointOrdering) {
        let mut state = self.lock();
        state.ordering = ordering;
        state.ordered = None;
    }

    /// Record one sample.
    ///
    /// Samples without an endpoint identifier are reported to the diagnostic sink and dropped.
    pub fn add_sample(&self, sample: &SampleRecord) {
        let Some(identifier) = sample.identifier() else {
            self.sink.emit(
                &self.identifier,
                &Diagnostic::MissingIdentifier {
                    duration: sample.duration,
                },
            );

            #[cfg(feature = "metrics")]
            metrics::counter!(perfreport_core::SAMPLES_DROPPED_METRIC).increment(1);

            return;
        };

        let key = endpoint_key(identifier);
        {
            let mut state = self.lock();
            state.endpoint_or_insert(&key, identifier).add_sample(sample);
            state.totals.record(sample);
            state.invalidate();
        }

        #[cfg(feature = "metrics")]
        {
            metrics::counter!(perfreport_core::SAMPLES_METRIC).increment(1);
            if !sample.successful {
                metrics::counter!(perfreport_core::SAMPLE_ERRORS_METRIC).increment(1);
            }
            metrics::histogram!(perfreport_core::SAMPLE_DURATION_METRIC)
                .record(sample.duration as f64);
        }
    }

    pub fn sample_count(&self) -> usize {
        self.lock().totals.sample_count
    }

    pub fn error_count(&self) -> usize {
        self.lock().totals.error_count
    }

    /// Sum of the external error weight over every sample.
    pub fn external_error_weight(&self) -> f64 {
        self.lock().totals.external_error_weight
    }

    pub fn endpoint_count(&self) -> usize {
        self.lock().endpoints.len()
    }

    /// Total duration divided by sample count, truncated; 0 when empty.
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

    /// Nearest-rank duration at `percentile` (between 0 and 1 inclusive) over every endpoint.
    ///
    /// Returns 0 for an empty report.
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

    pub fn error_rate_strategy(&self) -> ErrorRateStrategy {
        ErrorRateStrategy::select(self.parser_mode.as_ref(), &self.identifier)
    }

    /// Error percentage for per-sample parsers, or the mean external error weight per endpoint
    /// for summarizing parsers.
    pub fn error_rate(&self) -> f64 {
        let strategy = self.error_rate_strategy();
        let state = self.lock();
        strategy.rate(&state.totals, state.endpoints.len())
    }

    /// Endpoints in order of first appearance.
    pub fn endpoints(&self) -> Vec<Arc<EndpointAggregate>> {
        self.lock().endpoints.clone()
    }

    /// Endpoints sorted worst first according to the configured [`EndpointOrdering`].
    pub fn endpoints_ordered(&self) -> Vec<Arc<EndpointAggregate>> {
        self.lock().ordered().to_vec()
    }

    pub fn endpoint(&self, key: &str) -> Option<Arc<EndpointAggregate>> {
        self.lock().by_key.get(key).cloned()
    }

    /// Compare this report against `baseline`, usually the same file from the previous build.
    ///
    /// Endpoints present in both reports are linked by key. Must only be called once both reports
    /// are fully ingested. Returns `false` and changes nothing if a baseline is already set or
    /// `baseline` is this report or has this report somewhere in its own baseline chain.
    ///
    /// Concurrent calls linking two reports to each other are not detected.
    pub fn set_baseline(&self, baseline: Arc<ReportAggregate>) -> bool {
        let mut ancestor = Some(&baseline);
        while let Some(report) = ancestor {
            if std::ptr::eq(self, Arc::as_ptr(report)) {
                warn!(
                    "Report {} cannot be a baseline of itself, ignoring {}",
                    self.identifier, baseline.identifier
                );
                return false;
            }
            ancestor = report.baseline.get();
        }

        if let Err(rejected) = self.baseline.set(baseline) {
            warn!(
                "Baseline for report {} is already set; ignoring {}",
                self.identifier, rejected.identifier
            );
            return false;
        }

        let Some(baseline) = self.baseline.get() else {
            return false;
        };

        let mut linked = 0;
        for endpoint in self.endpoints() {
            if let Some(previous) = baseline.endpoint(endpoint.key()) {
                if endpoint.set_baseline_endpoint(previous) {
                    linked += 1;
                }
            }
        }
        debug!(
            "Linked {linked} endpoints of {} to baseline {}",
            self.identifier, baseline.identifier
        );

        true
    }

    pub fn baseline(&self) -> Option<&Arc<ReportAggregate>> {
        self.baseline.get()
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

    /// All baseline deltas at once, or `None` if no baseline is set.
    pub fn diff(&self) -> Option<BaselineDiff> {
        self.baseline()?;
        Some(BaselineDiff {
            average: self.average_diff(),
            median: self.median_diff(),
            error_rate: self.error_rate_diff(),
            sample_count: self.sample_count_diff(),
        })
    }

    /// A consistent snapshot of the headline statistics.
    pub fn statistics(&self) -> ReportStatistics {
        let strategy = self.error_rate_strategy();
        let mut state = self.lock();
        ReportStatistics {
            identifier: self.identifier.clone(),
            sample_count: state.totals.sample_count,
            error_count: state.totals.error_count,
            endpoint_count: state.endpoints.len(),
            error_rate: strategy.rate(&state.totals, state.endpoints.len()),
            average_duration: state.totals.average_duration(),
            median_duration: state.duration_at(MEDIAN),
            p90_duration: state.duration_at(P90),
            min_duration: state.totals.min_duration,
            max_duration: state.totals.max_duration,
            average_size_kb: state.totals.average_size_kb(),
            total_traffic_kb: state.totals.total_traffic_kb(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ReportState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Instance identity. Two reports with the same identifier are never equal, yet [`Ord`] ranks
/// them `Equal`, so keep identifiers unique before putting reports in a `BTreeSet` or calling
/// `dedup`.
impl PartialEq for ReportAggregate {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for ReportAggregate {}

impl PartialOrd for ReportAggregate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Reports order by identifier. Distinct reports sharing an identifier compare `Equal` here but
/// not under [`PartialEq`], so identifiers should be unique among the reports being sorted.
impl Ord for ReportAggregate {
    fn cmp(&self, other: &Self) -> Ordering {
        if std::ptr::eq(self, other) {
            return Ordering::Equal;
        }
        self.identifier.cmp(&other.identifier)
    }
}

impl fmt::Debug for ReportAggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("ReportAggregate")
            .field("identifier", &self.identifier)
            .field("sample_count", &state.totals.sample_count)
            .field("endpoints", &state.endpoints.len())
            .field("has_baseline", &self.baseline.get().is_some())
            .finish()
    }
}
