use perfreport_core::ReportError;
#[allow(unused_imports)]
use tracing::{debug, error, info, trace, warn};

/// Lazily built, ascending copy of a set of durations.
///
/// The owner calls [`SortedDurations::invalidate`] on every mutation of the underlying data and
/// must hold its own lock across both the invalidation and any rebuild.
#[derive(Debug, Default)]
pub(crate) struct SortedDurations {
    sorted: Option<Vec<u64>>,
}

impl SortedDurations {
    pub fn invalidate(&mut self) {
        self.sorted = None;
    }

    #[cfg(test)]
    pub fn is_built(&self) -> bool {
        self.sorted.is_some()
    }

    pub fn get_or_build<F>(&mut self, collect: F) -> &[u64]
    where
        F: FnOnce() -> Vec<u64>,
    {
        self.sorted.get_or_insert_with(|| {
            let mut durations = collect();
            durations.sort_unstable();
            trace!("Rebuilt sorted duration cache with {} entries", durations.len());
            durations
        })
    }
}

pub(crate) fn check_percentile(percentile: f64) -> Result<f64, ReportError> {
    if (0.0..=1.0).contains(&percentile) {
        Ok(percentile)
    } else {
        Err(ReportError::InvalidPercentile(percentile))
    }
}

/// Nearest-rank order statistic: the value at `floor(n * percentile)`, clamped to the last index.
///
/// No interpolation is done; reports compared across runs rely on this exact rule.
pub(crate) fn nearest_rank(sorted: &[u64], percentile: f64) -> u64 {
    let Some(last) = sorted.len().checked_sub(1) else {
        return 0;
    };
    let index = ((sorted.len() as f64 * percentile) as usize).min(last);
    sorted[index]
}
