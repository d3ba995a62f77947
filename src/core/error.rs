//! Error taxonomy for rule loading and classification.
//!
//! Structural defects (bad rule syntax, inconsistent ordering) are hard
//! failures. A path that no rule matches is a coverage gap: fatal for a single
//! `classify` call, collectable in batch scans.

use std::{path::PathBuf, sync::Arc};

use miette::{Diagnostic, SourceSpan};

/// Malformed rule table line. Aborts loading.
#[derive(Debug, Clone, Diagnostic, thiserror::Error)]
#[error("rule table line {line_no}: {reason}")]
#[diagnostic(code(pathheader::rule_load))]
pub struct RuleLoadError
{
    /// 1-based line number in the rule source
    pub line_no: usize,

    /// What was wrong with the line
    pub reason: String,

    #[source_code]
    pub line: String,

    #[label("while reading this line")]
    pub span: SourceSpan,
}

impl RuleLoadError
{
    pub fn new(
        line_no: usize,
        line: &str,
        reason: impl Into<String>,
    ) -> Self
    {
        Self {
            line_no,
            reason: reason.into(),
            line: line.to_string(),
            span: (0, line.len()).into(),
        }
    }
}

/// Chronological ordering or cache consistency defect. Never swallowed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderingError
{
    #[error("`*{value}` in {scope} refers to a value that was never registered")]
    UnseenReference
    {
        scope: String,
        value: String,
    },

    #[error("path {path} was classified as `{cached}` and later as `{computed}`")]
    CacheCollision
    {
        path: String,
        cached: String,
        computed: String,
    },
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum PathHeaderError
{
    #[error(transparent)]
    RuleLoad(#[from] Box<RuleLoadError>),

    #[error("no rule matches path {path}")]
    NoMatch
    {
        path: String,
    },

    #[error("ordering consistency: {0}")]
    OrderingConsistency(#[from] OrderingError),

    #[error("function &{name}({arg}) failed: {reason}")]
    Function
    {
        name: String,
        arg: String,
        reason: String,
    },

    #[error("unknown {kind}: {value}")]
    InvalidId
    {
        kind: &'static str,
        value: String,
    },

    #[error("failed to read rule table {}: {source}", path.display())]
    Io
    {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },
}

impl PathHeaderError
{
    /// Coverage gaps may be aggregated; everything else must propagate.
    pub fn is_recoverable(&self) -> bool
    {
        matches!(self, Self::NoMatch { .. })
    }
}

impl From<RuleLoadError> for PathHeaderError
{
    fn from(err: RuleLoadError) -> Self
    {
        Self::RuleLoad(Box::new(err))
    }
}

pub type Result<T, E = PathHeaderError> = std::result::Result<T, E>;
