use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReportError {
    #[error("Argument 'percentile' must be a value between 0 and 1 (inclusive), got {0}")]
    InvalidPercentile(f64),
}
