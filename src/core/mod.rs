//! Matching forms to input formats and filling the list

pub mod batch;
pub mod context;
pub mod matcher;
pub mod template;

pub use batch::{run, Batch, BatchOptions, BatchSummary};
pub use context::Context;
pub use matcher::{match_document, parse_condition, CellSource, MatchOutcome};
pub use template::{CompiledConfig, TemplateSet};
