use crate::EndpointAggregate;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Comparator behind [`ReportAggregate::endpoints_ordered`](crate::ReportAggregate::endpoints_ordered).
///
/// Each variant names the *natural* ascending order; listings use its reverse so the worst
/// endpoint comes first. Ties are broken by ascending key.
#[derive(Clone, Copy, Default)]
pub enum EndpointOrdering {
    /// Slowest average first.
    #[default]
    AverageDuration,
    /// Keys in reverse lexicographic order.
    Key,
    /// Busiest endpoint first.
    SampleCount,
    /// Most unsuccessful samples first.
    ErrorCount,
    Custom(fn(&EndpointAggregate, &EndpointAggregate) -> Ordering),
}

impl EndpointOrdering {
    pub fn compare(&self, a: &EndpointAggregate, b: &EndpointAggregate) -> Ordering {
        match self {
            Self::AverageDuration => a.average_duration().cmp(&b.average_duration()),
            Self::Key => a.key().cmp(b.key()),
            Self::SampleCount => a.sample_count().cmp(&b.sample_count()),
            Self::ErrorCount => a.error_count().cmp(&b.error_count()),
            Self::Custom(compare) => compare(a, b),
        }
    }

    pub(crate) fn sort_descending(&self, endpoints: &mut [Arc<EndpointAggregate>]) {
        endpoints.sort_by(|a, b| self.compare(b, a).then_with(|| a.key().cmp(b.key())));
    }
}

impl fmt::Debug for EndpointOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AverageDuration => write!(f, "AverageDuration"),
            Self::Key => write!(f, "Key"),
            Self::SampleCount => write!(f, "SampleCount"),
            Self::ErrorCount => write!(f, "ErrorCount"),
            Self::Custom(_) => write!(f, "Custom"),
        }
    }
}
