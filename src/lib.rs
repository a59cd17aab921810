//! form2list - collect values from a folder of Excel forms into one Excel list
//!
//! A YAML config (`spec.yml`) describes where each field sits in the input
//! forms and what goes into each column of the output list. Every `.xlsx` form
//! found under a directory becomes one row.
//!
//! # Features
//!
//! - Several candidate input layouts, chosen per form by a Jinja condition
//! - Jinja cell templates with `row`, `column`, `cell`, `dirname`, `basename`
//! - Multiple output sheets, each with its own row offset
//! - All-or-nothing: the list is only written when every form matched
//!
//! # Example
//!
//! ```no_run
//! use form2list::core::{run, BatchOptions};
//! use std::path::PathBuf;
//!
//! let summary = run(&BatchOptions {
//!     config: PathBuf::from("spec.yml"),
//!     output: Some(PathBuf::from("list.xlsx")),
//!     input_dir: PathBuf::from("forms"),
//! })?;
//!
//! println!("Rows written: {}", summary.documents);
//! # Ok::<(), form2list::error::Form2ListError>(())
//! ```

pub mod cli;
pub mod core;
pub mod discover;
pub mod error;
pub mod excel;
pub mod parser;
pub mod types;
pub mod writer;

// Re-export commonly used types
pub use error::{Form2ListError, Form2ListResult};
pub use types::{CellValue, ColumnSpec, Config, FormatSpec, SheetSpec};
