use crate::core::{run, BatchOptions, BatchSummary};
use crate::error::{Form2ListError, Form2ListResult};
use colored::Colorize;
use std::path::PathBuf;

/// Execute a conversion: every form under `directory` becomes a row of the list
pub fn convert(
    directory: PathBuf,
    config: PathBuf,
    output: Option<PathBuf>,
    verbose: bool,
) -> Form2ListResult<BatchSummary> {
    println!("{}", "📋 form2list - Collecting forms".bold().green());
    println!("   Input:  {}", directory.display());
    println!("   Config: {}", config.display());
    if let Some(ref o) = output {
        println!("   Output: {}", o.display());
    }
    println!();

    let options = BatchOptions {
        config,
        output,
        input_dir: directory,
    };

    let summary = match run(&options) {
        Ok(summary) => summary,
        Err(e) => {
            println!("{}", format!("❌ {}", failure_headline(&e)).bold().red());
            println!("{}", "   Output file was not written".yellow());
            return Err(e);
        }
    };

    if verbose {
        for line in format_counts_lines(&summary.format_counts) {
            println!("   {}", line.cyan());
        }
        println!();
    }

    println!("{}", "✅ Conversion Complete!".bold().green());
    println!("   Rows:  {}", summary.documents.to_string().bold());
    println!("   Cells: {}", summary.cells_written);
    println!("   List:  {}\n", summary.output.display());

    Ok(summary)
}

/// Short, operator-facing description of why a run stopped
fn failure_headline(error: &Form2ListError) -> &'static str {
    match error {
        Form2ListError::NoInputFilesFound(_) => "No input files found",
        Form2ListError::ConfigNotFound(_) => "Config file not found",
        Form2ListError::ConfigMalformed(_) | Form2ListError::Yaml(_) => "Config is malformed",
        Form2ListError::TemplateWorkbookNotFound(_) => "Template workbook not found",
        Form2ListError::DocumentUnmatched(_) => "A form matched no input format",
        Form2ListError::SheetNotFound(_) => "Output sheet missing from template",
        Form2ListError::TemplateSyntax(_) | Form2ListError::Render(_) => "Template error",
        Form2ListError::InvalidCellAddress(_) => "Invalid cell address",
        Form2ListError::Workbook(_) | Form2ListError::Io(_) => "Could not read or write a workbook",
    }
}

/// One line per input format: `format #1: 3 forms`
fn format_counts_lines(counts: &[usize]) -> Vec<String> {
    counts
        .iter()
        .enumerate()
        .map(|(i, n)| {
            format!(
                "format #{}: {} {}",
                i + 1,
                n,
                if *n == 1 { "form" } else { "forms" }
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_counts_lines() {
        assert_eq!(
            format_counts_lines(&[1, 0, 4]),
            vec![
                "format #1: 1 form".to_string(),
                "format #2: 0 forms".to_string(),
                "format #3: 4 forms".to_string(),
            ]
        );
        assert!(format_counts_lines(&[]).is_empty());
    }

    #[test]
    fn test_failure_headline() {
        assert_eq!(
            failure_headline(&Form2ListError::DocumentUnmatched(PathBuf::from("a.xlsx"))),
            "A form matched no input format"
        );
        assert_eq!(
            failure_headline(&Form2ListError::NoInputFilesFound(PathBuf::from("forms"))),
            "No input files found"
        );
    }

    #[test]
    fn test_convert_reports_missing_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = convert(
            dir.path().to_path_buf(),
            dir.path().join("missing.yml"),
            None,
            false,
        )
        .unwrap_err();
        assert!(matches!(err, Form2ListError::ConfigNotFound(_)));
    }
}
