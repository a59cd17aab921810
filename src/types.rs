use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

//==============================================================================
// Configuration (as written in spec.yml)
//==============================================================================

/// Raw conversion config, deserialized straight from YAML
///
/// ```yaml
/// template: list_template.xlsx
/// columnOffset: 0
/// inputFormats:
///   - items:
///       name: B2
///     condition: "{{ name is not none }}"
/// sheets:
///   - name: List
///     rowOffset: 1
///     columns:
///       - value: "{{ name }}"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Output skeleton workbook, loaded at start and saved as the result
    pub template: PathBuf,

    /// Default destination when the command line gives none
    #[serde(default)]
    pub output: Option<PathBuf>,

    #[serde(default)]
    pub column_offset: u32,

    /// Row offset for sheets that don't set their own
    #[serde(default)]
    pub row_offset: i64,

    #[serde(default)]
    pub input_formats: Vec<FormatSpec>,

    #[serde(default)]
    pub sheets: Vec<SheetSpec>,
}

/// One candidate layout of the input forms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatSpec {
    /// Field name → source cell address
    pub items: BTreeMap<String, String>,

    #[serde(default = "default_condition")]
    pub condition: String,
}

fn default_condition() -> String {
    "True".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetSpec {
    pub name: String,

    #[serde(default)]
    pub row_offset: Option<i64>,

    pub columns: Vec<ColumnSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub value: String,
}

//==============================================================================
// Cell values
//==============================================================================

/// A single cell value, as read from a workbook
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Dates and times, kept in their display form (`2024-04-01 00:00:00`)
    DateTime(String),
    /// Spreadsheet error values such as `#DIV/0!`
    Error(String),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Numbers without a fractional part become integers, so `3.0` renders as `3`
    pub fn from_number(n: f64) -> Self {
        if n.fract() == 0.0 && n.abs() < 9.0e15 {
            CellValue::Int(n as i64)
        } else {
            CellValue::Float(n)
        }
    }

    /// Convert to a template value; empty cells become `none`
    pub fn to_template_value(&self) -> minijinja::Value {
        match self {
            CellValue::Empty => minijinja::Value::from(()),
            CellValue::Text(s) | CellValue::DateTime(s) | CellValue::Error(s) => {
                minijinja::Value::from(s.as_str())
            }
            CellValue::Int(i) => minijinja::Value::from(*i),
            CellValue::Float(f) => minijinja::Value::from(*f),
            CellValue::Bool(b) => minijinja::Value::from(*b),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) | CellValue::DateTime(s) | CellValue::Error(s) => {
                write!(f, "{}", s)
            }
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
        }
    }
}
