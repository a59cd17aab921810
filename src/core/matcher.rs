//! Selecting the input format that fits a form

use crate::core::context::Context;
use crate::core::template::CompiledConfig;
use crate::error::{Form2ListError, Form2ListResult};
use crate::excel::CellRef;
use crate::types::CellValue;
use std::collections::BTreeMap;
use tracing::debug;

/// Read access to the cells of one input document
pub trait CellSource {
    /// Value at `cell`; cells outside the used range are [`CellValue::Empty`]
    fn cell_value(&self, cell: CellRef) -> CellValue;
}

impl CellSource for BTreeMap<CellRef, CellValue> {
    fn cell_value(&self, cell: CellRef) -> CellValue {
        self.get(&cell).cloned().unwrap_or(CellValue::Empty)
    }
}

/// Result of a successful match
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    /// Index into `inputFormats`; `None` when no formats are configured
    pub format_index: Option<usize>,
    /// Every field read while trying formats, up to and including the match
    pub context: Context,
}

/// Interpret a rendered condition.
///
/// Only `true` and `false` are accepted (ASCII case-insensitive, surrounding
/// whitespace ignored), which covers both `True` from a literal condition and
/// `true` from an expression like `{{ a == b }}`.
pub fn parse_condition(rendered: &str) -> Form2ListResult<bool> {
    let text = rendered.trim();
    if text.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if text.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(Form2ListError::Render(format!(
            "condition must render to true or false, got {:?}",
            rendered
        )))
    }
}

/// Try each input format in order and return the first whose condition holds.
///
/// Fields read for a rejected format stay in the context, so a later format
/// sharing the same cells sees them too. `Ok(None)` means no format matched.
pub fn match_document<S: CellSource + ?Sized>(
    config: &CompiledConfig,
    source: &S,
) -> Form2ListResult<Option<MatchOutcome>> {
    let mut context = Context::new();

    if config.formats.is_empty() {
        return Ok(Some(MatchOutcome {
            format_index: None,
            context,
        }));
    }

    for (index, format) in config.formats.iter().enumerate() {
        for (field, cell) in &format.items {
            context.set_cell(field.clone(), &source.cell_value(*cell));
        }

        let rendered = config.templates.render(format.condition, &context)?;
        debug!(
            format_index = index,
            condition = %format.condition_source,
            rendered = %rendered,
            "Check condition on context {}",
            context
        );

        if parse_condition(&rendered)? {
            return Ok(Some(MatchOutcome {
                format_index: Some(index),
                context,
            }));
        }
    }

    Ok(None)
}
