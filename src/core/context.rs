//! Render context handed to cell templates and conditions

use crate::types::CellValue;
use minijinja::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// String-keyed template variables.
///
/// Scopes are layered by copying: a document context is extended into a row
/// context, which is extended into a cell context. Extending never touches the
/// parent, so keys written for one sheet or column cannot leak into the next.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    vars: BTreeMap<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a variable
    pub fn set<V: Into<Value>>(&mut self, key: impl Into<String>, value: V) {
        self.vars.insert(key.into(), value.into());
    }

    /// Insert a cell value read from a workbook
    pub fn set_cell(&mut self, key: impl Into<String>, value: &CellValue) {
        self.vars.insert(key.into(), value.to_template_value());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.vars.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// A copy of this context for a narrower scope
    pub fn extend(&self) -> Self {
        self.clone()
    }

    /// Add `path`, `dirname`, `basename` and `stem` for an input file
    pub fn with_file_path(mut self, path: &Path) -> Self {
        let dirname = path
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();
        let basename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = path
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.set("path", path.to_string_lossy().into_owned());
        self.set("dirname", dirname);
        self.set("basename", basename);
        self.set("stem", stem);
        self
    }

    pub(crate) fn vars(&self) -> &BTreeMap<String, Value> {
        &self.vars
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.vars.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {:?}", key, value)?;
        }
        write!(f, "}}")
    }
}
