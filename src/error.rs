use std::path::PathBuf;
use thiserror::Error;

pub type Form2ListResult<T> = Result<T, Form2ListError>;

#[derive(Error, Debug)]
pub enum Form2ListError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Malformed config: {0}")]
    ConfigMalformed(String),

    #[error("Template workbook not found: {}", .0.display())]
    TemplateWorkbookNotFound(PathBuf),

    #[error("No input files found in: {}", .0.display())]
    NoInputFilesFound(PathBuf),

    #[error("Fail to load values from: {}", .0.display())]
    DocumentUnmatched(PathBuf),

    #[error("Sheet not found in output workbook: {0}")]
    SheetNotFound(String),

    #[error("Template syntax error: {0}")]
    TemplateSyntax(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Invalid cell address: {0}")]
    InvalidCellAddress(String),

    #[error("Workbook error: {0}")]
    Workbook(String),
}
