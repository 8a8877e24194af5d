use crate::totals::RunningTotals;
use perfreport_core::ParserConfig;

/// Answers whether a report file was produced by a summarizing parser.
///
/// Consulted on every error rate query, so implementations should be cheap lookups.
pub trait ParserModeOracle: Send + Sync {
    fn is_summarized(&self, report_identifier: &str) -> bool;
}

/// Oracle for reports that always come from per-sample parsers.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverSummarized;

impl ParserModeOracle for NeverSummarized {
    fn is_summarized(&self, _report_identifier: &str) -> bool {
        false
    }
}

impl ParserModeOracle for ParserConfig {
    fn is_summarized(&self, report_identifier: &str) -> bool {
        ParserConfig::is_summarized(self, report_identifier)
    }
}

/// Adapts a plain predicate into a [`ParserModeOracle`].
#[derive(Debug, Clone, Copy)]
pub struct PredicateOracle<F>(pub F);

impl<F> ParserModeOracle for PredicateOracle<F>
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_summarized(&self, report_identifier: &str) -> bool {
        (self.0)(report_identifier)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorRateStrategy {
    /// Unsuccessful samples as a percentage of all samples.
    ErrorPercent,
    /// Summed external error weight averaged over distinct endpoints.
    SummarizedWeight,
}

impl ErrorRateStrategy {
    pub fn select(oracle: &dyn ParserModeOracle, report_identifier: &str) -> Self {
        if oracle.is_summarized(report_identifier) {
            Self::SummarizedWeight
        } else {
            Self::ErrorPercent
        }
    }

    pub(crate) fn rate(&self, totals: &RunningTotals, endpoint_count: usize) -> f64 {
        match self {
            Self::ErrorPercent => totals.error_percent(),
            Self::SummarizedWeight => match endpoint_count {
                0 => 0.,
                n => totals.external_error_weight / n as f64,
            },
        }
    }
}
