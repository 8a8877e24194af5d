use perfreport_core::{round_decimal, RoundingMode, SampleRecord, SIZE_DECIMAL_PLACES};

/// Running totals kept by both endpoints and reports.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct RunningTotals {
    pub sample_count: usize,
    pub error_count: usize,
    pub external_error_weight: f64,
    /// Wide enough that no sequence of `u64` durations can overflow it.
    pub total_duration: u128,
    pub total_size_kb: f64,
    pub min_duration: Option<u64>,
    pub max_duration: Option<u64>,
}

impl RunningTotals {
    pub fn record(&mut self, sample: &SampleRecord) {
        self.sample_count += 1;
        if !sample.successful {
            self.error_count += 1;
        }
        self.external_error_weight += sample.external_error_weight;
        self.total_duration += u128::from(sample.duration);
        self.total_size_kb += sample.size_kb;
        self.min_duration = Some(
            self.min_duration
                .map_or(sample.duration, |min| min.min(sample.duration)),
        );
        self.max_duration = Some(
            self.max_duration
                .map_or(sample.duration, |max| max.max(sample.duration)),
        );
    }

    pub fn average_duration(&self) -> u64 {
        match self.sample_count {
            0 => 0,
            // The mean never exceeds the largest duration, so it fits back into a u64.
            n => u64::try_from(self.total_duration / n as u128).unwrap_or(u64::MAX),
        }
    }

    pub fn average_size_kb(&self) -> f64 {
        match self.sample_count {
            0 => 0.,
            n => round_size(self.total_size_kb / n as f64),
        }
    }

    pub fn total_traffic_kb(&self) -> f64 {
        round_size(self.total_size_kb)
    }

    /// Unsuccessful samples as a percentage of all samples.
    pub fn error_percent(&self) -> f64 {
        match self.sample_count {
            0 => 0.,
            n => self.error_count as f64 / n as f64 * 100.,
        }
    }
}

/// `current - previous`, saturating at the bounds of `i64`.
pub(crate) fn signed_diff(current: u64, previous: u64) -> i64 {
    let diff = i128::from(current) - i128::from(previous);
    i64::try_from(diff).unwrap_or(if diff < 0 { i64::MIN } else { i64::MAX })
}

fn round_size(kb: f64) -> f64 {
    round_decimal(kb, SIZE_DECIMAL_PLACES, RoundingMode::HalfUp)
}
