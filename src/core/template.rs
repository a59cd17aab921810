//! Compiling the config's conditions and cell values into templates

use crate::core::context::Context;
use crate::error::{Form2ListError, Form2ListResult};
use crate::excel::CellRef;
use crate::types::Config;
use minijinja::Environment;
use std::path::PathBuf;

/// Handle to a compiled template inside a [`TemplateSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateId(usize);

/// Owns every compiled template of a run
pub struct TemplateSet {
    env: Environment<'static>,
    names: Vec<String>,
}

impl TemplateSet {
    /// Empty cells (`none`) render as nothing rather than the word "none"
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_formatter(|out, state, value| {
            if value.is_none() {
                return Ok(());
            }
            minijinja::escape_formatter(out, state, value)
        });
        Self {
            env,
            names: Vec::new(),
        }
    }

    /// Compile `source` once; `label` names it in error messages
    pub fn compile(&mut self, label: &str, source: &str) -> Form2ListResult<TemplateId> {
        self.env
            .add_template_owned(label.to_string(), source.to_string())
            .map_err(|e| Form2ListError::TemplateSyntax(format!("{}: {}", label, e)))?;
        self.names.push(label.to_string());
        Ok(TemplateId(self.names.len() - 1))
    }

    /// Render a compiled template against a context
    pub fn render(&self, id: TemplateId, ctx: &Context) -> Form2ListResult<String> {
        let name = self
            .names
            .get(id.0)
            .ok_or_else(|| Form2ListError::Render(format!("unknown template #{}", id.0)))?;
        let template = self
            .env
            .get_template(name)
            .map_err(|e| Form2ListError::Render(format!("{}: {}", name, e)))?;
        template
            .render(ctx.vars())
            .map_err(|e| Form2ListError::Render(format!("{}: {}", name, e)))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TemplateSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateSet")
            .field("names", &self.names)
            .finish()
    }
}

/// One input format with its condition compiled
#[derive(Debug, Clone)]
pub struct CompiledFormat {
    /// Field name → source cell
    pub items: Vec<(String, CellRef)>,
    pub condition_source: String,
    pub condition: TemplateId,
}

#[derive(Debug, Clone)]
pub struct CompiledColumn {
    pub value_source: String,
    pub value: TemplateId,
}

#[derive(Debug, Clone)]
pub struct CompiledSheet {
    pub name: String,
    pub row_offset: i64,
    pub columns: Vec<CompiledColumn>,
}

/// Read-only result of compiling a [`Config`]
#[derive(Debug)]
pub struct CompiledConfig {
    pub template: PathBuf,
    pub output: Option<PathBuf>,
    pub column_offset: u32,
    pub formats: Vec<CompiledFormat>,
    pub sheets: Vec<CompiledSheet>,
    pub templates: TemplateSet,
}

impl CompiledConfig {
    /// Compile every condition and column value of `config`.
    ///
    /// Source cell addresses are validated here too, so a typo in `items`
    /// fails before any input file is opened.
    pub fn compile(config: &Config) -> Form2ListResult<Self> {
        let mut templates = TemplateSet::new();

        let mut formats = Vec::with_capacity(config.input_formats.len());
        for (i, spec) in config.input_formats.iter().enumerate() {
            let mut items = Vec::with_capacity(spec.items.len());
            for (field, address) in &spec.items {
                let cell = CellRef::parse(address).map_err(|_| {
                    Form2ListError::ConfigMalformed(format!(
                        "inputFormats[{}].items.{}: invalid cell address '{}'",
                        i, field, address
                    ))
                })?;
                items.push((field.clone(), cell));
            }

            let label = format!("inputFormats[{}].condition", i);
            let condition = templates.compile(&label, &spec.condition)?;
            formats.push(CompiledFormat {
                items,
                condition_source: spec.condition.clone(),
                condition,
            });
        }

        let mut sheets = Vec::with_capacity(config.sheets.len());
        for (i, spec) in config.sheets.iter().enumerate() {
            let mut columns = Vec::with_capacity(spec.columns.len());
            for (j, column) in spec.columns.iter().enumerate() {
                let label = format!("sheets[{}].columns[{}].value", i, j);
                let value = templates.compile(&label, &column.value)?;
                columns.push(CompiledColumn {
                    value_source: column.value.clone(),
                    value,
                });
            }
            sheets.push(CompiledSheet {
                name: spec.name.clone(),
                row_offset: spec.row_offset.unwrap_or(config.row_offset),
                columns,
            });
        }

        Ok(Self {
            template: config.template.clone(),
            output: config.output.clone(),
            column_offset: config.column_offset,
            formats,
            sheets,
            templates,
        })
    }
}
