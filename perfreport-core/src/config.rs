use crate::GLOB_PREFIX_LEN;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Which parser produced a report file.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ParserKind {
    /// Per-interval summary lines; errors are reported as a weight per endpoint.
    JmeterSummarizer,
    /// Iago output is always summarized.
    Iago,
    Other(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParserEntry {
    pub kind: ParserKind,
    /// File patterns handled by this parser, separated by `;`, `:` or `,`.
    pub glob: String,
}

impl ParserEntry {
    pub fn new(kind: ParserKind, glob: &str) -> Self {
        Self {
            kind,
            glob: glob.to_string(),
        }
    }

    fn patterns(&self) -> impl Iterator<Item = &str> {
        self.glob
            .split([';', ':', ','])
            .map(str::trim)
            .filter(|pattern| !pattern.is_empty())
    }
}

/// Parsers configured for a publishing job, in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParserConfig {
    pub parsers: Vec<ParserEntry>,
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parser(mut self, kind: ParserKind, glob: &str) -> Self {
        self.parsers.push(ParserEntry::new(kind, glob));
        self
    }

    /// Whether `filename` was produced by a summarizing parser.
    ///
    /// Parsers are checked in order. An Iago parser answers immediately; a JMeter summarizer
    /// answers when one of its patterns (minus the leading `**/*.`) is a suffix of the filename.
    pub fn is_summarized(&self, filename: &str) -> bool {
        for entry in &self.parsers {
            match &entry.kind {
                ParserKind::JmeterSummarizer => {
                    let matched = entry
                        .patterns()
                        .filter_map(|pattern| pattern.get(GLOB_PREFIX_LEN..))
                        .any(|suffix| filename.ends_with(suffix));
                    if matched {
                        trace!("{filename} matched summarizer pattern {}", entry.glob);
                        return true;
                    }
                }
                ParserKind::Iago => return true,
                ParserKind::Other(_) => {}
            }
        }
        false
    }
}
