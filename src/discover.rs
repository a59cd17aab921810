//! Finding the input forms under a directory

use crate::error::{Form2ListError, Form2ListResult};
use std::fs;
use std::path::{Path, PathBuf};

/// File extension of input forms
pub const INPUT_EXTENSION: &str = "xlsx";

/// Recursively collect `.xlsx` files below `dir`, sorted by path.
///
/// Excel lock files (`~$name.xlsx`) are skipped, as is `exclude` (the
/// destination list, when it lives inside the input tree). A missing directory
/// or one without any form is [`Form2ListError::NoInputFilesFound`].
pub fn find_input_files(dir: &Path, exclude: Option<&Path>) -> Form2ListResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Form2ListError::NoInputFilesFound(dir.to_path_buf()));
    }

    let exclude = exclude.and_then(|p| fs::canonicalize(p).ok());

    let mut files = Vec::new();
    collect(dir, &mut files)?;
    files.retain(|path| match &exclude {
        Some(excluded) => fs::canonicalize(path).map_or(true, |p| &p != excluded),
        None => true,
    });
    files.sort();

    if files.is_empty() {
        return Err(Form2ListError::NoInputFilesFound(dir.to_path_buf()));
    }
    Ok(files)
}

fn collect(dir: &Path, files: &mut Vec<PathBuf>) -> Form2ListResult<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            collect(&path, files)?;
        } else if is_input_file(&path) {
            files.push(path);
        }
    }
    Ok(())
}

fn is_input_file(path: &Path) -> bool {
    let is_lock_file = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("~$"));
    let has_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(INPUT_EXTENSION));

    has_extension && !is_lock_file
}
