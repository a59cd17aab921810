//! Fixture builders shared by the integration tests

#![allow(dead_code)]

use calamine::{open_workbook, Data, Reader, Xlsx};
use rust_xlsxwriter::Workbook;
use std::fs;
use std::path::{Path, PathBuf};

/// Write a one-sheet form with text cells given as (A1 address, value)
pub fn write_form(path: &Path, cells: &[(&str, &str)]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (address, value) in cells {
        let (row, col) = zero_based(address);
        sheet.write_string(row, col, *value).unwrap();
    }
    workbook.save(path).unwrap();
}

/// Write an empty output skeleton with the given sheets
pub fn write_template(path: &Path, sheets: &[&str]) {
    let mut workbook = Workbook::new();
    for name in sheets {
        workbook.add_worksheet().set_name(*name).unwrap();
    }
    workbook.save(path).unwrap();
}

/// Write `spec.yml` into `dir` and return its path
pub fn write_config(dir: &Path, yaml: &str) -> PathBuf {
    let path = dir.join("spec.yml");
    fs::write(&path, yaml).unwrap();
    path
}

/// Read one cell of a saved workbook as text; empty or missing cells are `None`
pub fn read_cell(path: &Path, sheet: &str, address: &str) -> Option<String> {
    let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
    let range = workbook.worksheet_range(sheet).unwrap();
    let (row, col) = zero_based(address);
    match range.get_value((row, col as u32))? {
        Data::Empty => None,
        other => Some(other.to_string()),
    }
}

fn zero_based(address: &str) -> (u32, u16) {
    let cell = form2list::excel::CellRef::parse(address).unwrap();
    let (row, col) = cell.zero_based();
    (row, col as u16)
}
