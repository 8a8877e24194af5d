#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod endpoint;
mod error;
mod error_rate;
pub mod ingest;
mod ordering;
mod percentile;
mod report;
mod sink;
mod totals;

pub use endpoint::EndpointAggregate;
pub use error::IngestError;
pub use error_rate::{ErrorRateStrategy, NeverSummarized, ParserModeOracle, PredicateOracle};
pub use ordering::EndpointOrdering;
pub use report::ReportAggregate;
pub use sink::{DiagnosticSink, TracingSink};

pub use perfreport_core as core;

pub mod prelude {
    pub use crate::ingest::ingest_concurrently;
    pub use crate::{
        DiagnosticSink, EndpointAggregate, EndpointOrdering, ErrorRateStrategy, ParserModeOracle,
        PredicateOracle, ReportAggregate,
    };
    pub use perfreport_core::{
        endpoint_key, BaselineDiff, Diagnostic, EndpointStatistics, ParserConfig, ParserKind,
        ReportError, ReportStatistics, SampleRecord,
    };
}
