/// Scheme marker removed from raw identifiers when deriving an endpoint key.
pub const SCHEME_MARKER: &str = "http:/";

/// Path separator replaced in raw identifiers when deriving an endpoint key.
pub const PATH_SEPARATOR: char = '/';

/// Replacement for [`PATH_SEPARATOR`] in endpoint keys.
pub const KEY_SEPARATOR: &str = "_";

pub const MEDIAN: f64 = 0.5;
pub const P90: f64 = 0.9;

/// Decimal places kept for kilobyte averages and traffic totals.
pub const SIZE_DECIMAL_PLACES: u32 = 2;

/// Number of leading glob characters (`**/*.`) ignored when matching summarized-parser patterns.
pub const GLOB_PREFIX_LEN: usize = 5;

pub const MISSING_IDENTIFIER_MESSAGE: &str = "label cannot be empty, please ensure your test plan \
specifies a name for each sample: skipping sample";

pub const SAMPLES_METRIC: &str = "perfreport_samples";
pub const SAMPLES_DROPPED_METRIC: &str = "perfreport_samples_dropped";
pub const SAMPLE_ERRORS_METRIC: &str = "perfreport_sample_errors";
pub const SAMPLE_DURATION_METRIC: &str = "perfreport_sample_duration";
