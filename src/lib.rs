//! **pathheader** - Classify locale data paths into Section/Page/Header/Code
//!
//! A tab-separated rule table maps every path to a display location plus an
//! editability status. Results are cached per path and sort in a stable,
//! chronological display order.

/// Command-line interface with clap integration
pub mod cli;

/// Shell completion generation
pub mod completion;

/// Classification engine
pub mod core {
    /// Section, page and status identifiers
    pub mod ids;
    pub use ids::{PageId, SectionId, SurveyToolStatus};

    /// Error taxonomy with miette diagnostics for rule loading
    pub mod error;
    pub use error::{OrderingError, PathHeaderError, Result, RuleLoadError};

    /// Classified value and its display ordering
    pub mod header;
    pub use header::{PathHeader, Suborder};

    /// Chronological order registration for header and code text
    pub mod registrar;
    pub use registrar::OrderingRegistrar;

    /// Named transforms callable from templates as `&name(...)`
    pub mod functions;
    pub use functions::{FunctionError, FunctionRegistry, OrderHint, TransformFn, Transformed};

    /// Template fields parsed once at load time
    pub mod template;
    pub use template::{Field, Template};

    /// Rule table parsing with variables and a RegexSet over all patterns
    pub mod rules;
    pub use rules::{BUILTIN_RULES, Rule, RuleTable};

    /// Path cleanup and first-match lookup
    pub mod matcher;

    /// Cached, thread-safe classifier
    pub mod factory;
    pub use factory::{BatchReport, DisplayCollision, NoMatchPolicy, PathHeaderFactory};
}

/// Infrastructure - configuration and input I/O
pub mod infra {
    /// Layered configuration (file + PATHHEADER_* env vars)
    pub mod config;
    pub use config::{CollisionPolicy, Config, init as config_init, load_config};

    /// Path list reading with memory mapping for large inputs
    pub mod io;
    pub use io::{FileContent, read_file_smart, read_paths};
}

/// Subcommand implementations
pub mod cli_ext {
    pub mod classify_cmd;
    pub mod rules_cmd;
    pub mod tree_cmd;
}

pub use crate::cli::{AppContext, Cli, Commands};
pub use crate::core::{
    FunctionRegistry, NoMatchPolicy, PageId, PathHeader, PathHeaderError, PathHeaderFactory,
    SectionId, SurveyToolStatus, TransformFn,
};
pub use crate::infra::{Config, load_config};
