//! Running a whole folder of forms into one list

use crate::core::context::Context;
use crate::core::matcher::{match_document, CellSource};
use crate::core::template::CompiledConfig;
use crate::discover::find_input_files;
use crate::error::{Form2ListError, Form2ListResult};
use crate::excel::{InputDocument, OutputWorkbook};
use crate::parser::parse_config;
use crate::writer::write_row;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Destination used when neither the command line nor the config names one
pub const DEFAULT_OUTPUT: &str = "list.xlsx";

/// Inputs of one run
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub config: PathBuf,
    /// Overrides the config's `output`
    pub output: Option<PathBuf>,
    pub input_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub output: PathBuf,
    pub documents: usize,
    pub cells_written: usize,
    /// Documents matched per input format, indexed like `inputFormats`
    pub format_counts: Vec<usize>,
}

/// Fills the output workbook document by document.
///
/// Row numbers start at 1 and advance once per processed document. The first
/// error poisons the batch: the workbook is only handed back by
/// [`Batch::finish`], so a caller that stops on error never saves it.
#[derive(Debug)]
pub struct Batch<'a> {
    config: &'a CompiledConfig,
    workbook: OutputWorkbook,
    next_row: u32,
    cells_written: usize,
    format_counts: Vec<usize>,
}

impl<'a> Batch<'a> {
    /// Start a batch; every configured sheet must exist in `workbook`
    pub fn new(config: &'a CompiledConfig, workbook: OutputWorkbook) -> Form2ListResult<Self> {
        if let Some(missing) = config
            .sheets
            .iter()
            .find(|sheet| !workbook.has_sheet(&sheet.name))
        {
            return Err(Form2ListError::SheetNotFound(missing.name.clone()));
        }

        Ok(Self {
            config,
            workbook,
            next_row: 1,
            cells_written: 0,
            format_counts: vec![0; config.formats.len()],
        })
    }

    /// Row number the next document will get
    pub fn next_row(&self) -> u32 {
        self.next_row
    }

    /// Match one document and write its row
    pub fn process<S: CellSource + ?Sized>(
        &mut self,
        path: &Path,
        source: &S,
    ) -> Form2ListResult<()> {
        let row_number = self.next_row;
        self.next_row += 1;

        debug!(row = row_number, "Processing file: {}", path.display());

        let outcome = match_document(self.config, source)?
            .ok_or_else(|| Form2ListError::DocumentUnmatched(path.to_path_buf()))?;
        if let Some(index) = outcome.format_index {
            self.format_counts[index] += 1;
        }

        let document: Context = outcome.context.with_file_path(path);
        self.cells_written += write_row(self.config, &mut self.workbook, &document, row_number)?;
        Ok(())
    }

    /// Number of documents processed so far
    pub fn documents(&self) -> usize {
        (self.next_row - 1) as usize
    }

    /// Hand back the filled workbook with the run's counters
    pub fn finish(self, output: PathBuf) -> (OutputWorkbook, BatchSummary) {
        let summary = BatchSummary {
            output,
            documents: self.documents(),
            cells_written: self.cells_written,
            format_counts: self.format_counts,
        };
        (self.workbook, summary)
    }
}

/// Resolve the destination: command line, then config, then `list.xlsx`
pub fn resolve_output(options: &BatchOptions, config: &CompiledConfig) -> PathBuf {
    options
        .output
        .clone()
        .or_else(|| config.output.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT))
}

/// Run a full conversion.
///
/// The output workbook is written exactly once, after every input form has
/// matched and been written; any error returns before that.
pub fn run(options: &BatchOptions) -> Form2ListResult<BatchSummary> {
    let raw = parse_config(&options.config)?;
    let config = CompiledConfig::compile(&raw)?;
    info!(
        formats = config.formats.len(),
        sheets = config.sheets.len(),
        "Loaded config {}",
        options.config.display()
    );

    let output = resolve_output(options, &config);
    let files = find_input_files(&options.input_dir, Some(output.as_path()))?;
    info!("Found {} input files in {}", files.len(), options.input_dir.display());

    let workbook = OutputWorkbook::load(&config.template)?;
    let mut batch = Batch::new(&config, workbook)?;

    for path in &files {
        let document = InputDocument::open(path)?;
        batch.process(path, &document)?;
    }

    let (workbook, summary) = batch.finish(output);
    workbook.save(&summary.output)?;
    info!(
        documents = summary.documents,
        cells = summary.cells_written,
        "Saved {}",
        summary.output.display()
    );

    Ok(summary)
}
