//! The output list workbook: loaded from the template, filled, saved once

use crate::error::{Form2ListError, Form2ListResult};
use crate::excel::importer::{cell_from_data, format_datetime};
use crate::excel::CellRef;
use crate::types::CellValue;
use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use rust_xlsxwriter::{Format, Formula, Workbook, Worksheet};
use std::collections::BTreeMap;
use std::path::Path;

/// Largest column rust_xlsxwriter can address (XFD)
const MAX_COLUMN: u32 = 16_384;
/// Largest row rust_xlsxwriter can address
const MAX_ROW: u32 = 1_048_576;

const DATE_FORMAT: &str = "yyyy-mm-dd";
const DATETIME_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

#[derive(Debug, Clone, PartialEq)]
pub enum OutputCell {
    Value(CellValue),
    /// Date carried over from the template, as an Excel serial number
    Date(f64),
    /// Formula text without the leading `=`
    Formula(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputSheet {
    name: String,
    cells: BTreeMap<CellRef, OutputCell>,
}

impl OutputSheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: BTreeMap::new(),
        }
    }

    pub fn get(&self, cell: CellRef) -> Option<&OutputCell> {
        self.cells.get(&cell)
    }
}

/// In-memory copy of the output workbook.
///
/// Values and formulas of the template are carried over; styling is not.
/// Nothing touches the destination file until [`OutputWorkbook::save`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputWorkbook {
    sheets: Vec<OutputSheet>,
}

impl OutputWorkbook {
    /// An empty workbook with the given sheets, in order
    pub fn with_sheets<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sheets: names.into_iter().map(OutputSheet::new).collect(),
        }
    }

    /// Load the template (skeleton) workbook
    pub fn load(path: &Path) -> Form2ListResult<Self> {
        if !path.is_file() {
            return Err(Form2ListError::TemplateWorkbookNotFound(path.to_path_buf()));
        }

        let mut workbook: Xlsx<_> = open_workbook(path).map_err(|e| {
            Form2ListError::Workbook(format!(
                "Failed to open template workbook {}: {}",
                path.display(),
                e
            ))
        })?;

        let mut sheets = Vec::new();
        for name in workbook.sheet_names().to_vec() {
            let mut sheet = OutputSheet::new(name.clone());

            let range = workbook.worksheet_range(&name).map_err(|e| {
                Form2ListError::Workbook(format!("Failed to read sheet '{}': {}", name, e))
            })?;
            if let Some((row0, col0)) = range.start() {
                for (row, col, data) in range.used_cells() {
                    let cell = CellRef::new(row0 + row as u32 + 1, col0 + col as u32 + 1);
                    sheet.cells.insert(cell, template_cell(data));
                }
            }

            // Formulas win over their cached values
            let formulas = workbook.worksheet_formula(&name).map_err(|e| {
                Form2ListError::Workbook(format!(
                    "Failed to read formulas of sheet '{}': {}",
                    name, e
                ))
            })?;
            if let Some((row0, col0)) = formulas.start() {
                for (row, col, formula) in formulas.used_cells() {
                    let cell = CellRef::new(row0 + row as u32 + 1, col0 + col as u32 + 1);
                    let formula = formula.strip_prefix('=').unwrap_or(formula);
                    sheet
                        .cells
                        .insert(cell, OutputCell::Formula(formula.to_string()));
                }
            }

            sheets.push(sheet);
        }

        Ok(Self { sheets })
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheets.iter().any(|s| s.name == name)
    }

    pub fn sheet(&self, name: &str) -> Option<&OutputSheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Write a text value; a later write to the same cell replaces it
    pub fn set_text(&mut self, sheet: &str, cell: CellRef, text: String) -> Form2ListResult<()> {
        if cell.row == 0 || cell.row > MAX_ROW || cell.column == 0 || cell.column > MAX_COLUMN {
            return Err(Form2ListError::InvalidCellAddress(format!(
                "{}!R{}C{}",
                sheet, cell.row, cell.column
            )));
        }

        let target = self
            .sheets
            .iter_mut()
            .find(|s| s.name == sheet)
            .ok_or_else(|| Form2ListError::SheetNotFound(sheet.to_string()))?;
        target
            .cells
            .insert(cell, OutputCell::Value(CellValue::Text(text)));
        Ok(())
    }

    /// Text of a cell, for inspection
    pub fn text(&self, sheet: &str, cell: CellRef) -> Option<String> {
        match self.sheet(sheet)?.get(cell)? {
            OutputCell::Value(value) => Some(value.to_string()),
            OutputCell::Date(serial) => Some(
                serial_to_datetime(*serial)
                    .map(format_datetime)
                    .unwrap_or_else(|| serial.to_string()),
            ),
            OutputCell::Formula(formula) => Some(format!("={}", formula)),
        }
    }

    /// Serialize the whole workbook, then write it to `path` in one go
    pub fn save(&self, path: &Path) -> Form2ListResult<()> {
        let mut workbook = Workbook::new();

        for sheet in &self.sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&sheet.name).map_err(|e| {
                Form2ListError::Workbook(format!(
                    "Failed to set worksheet name '{}': {}",
                    sheet.name, e
                ))
            })?;

            for (cell, value) in &sheet.cells {
                Self::write_cell(worksheet, *cell, value).map_err(|e| {
                    Form2ListError::Workbook(format!(
                        "Failed to write {}!{}: {}",
                        sheet.name, cell, e
                    ))
                })?;
            }
        }

        let buffer = workbook
            .save_to_buffer()
            .map_err(|e| Form2ListError::Workbook(format!("Failed to build Excel file: {}", e)))?;
        std::fs::write(path, buffer)?;

        Ok(())
    }

    fn write_cell(
        worksheet: &mut Worksheet,
        cell: CellRef,
        value: &OutputCell,
    ) -> Result<(), rust_xlsxwriter::XlsxError> {
        let (row, col) = cell.zero_based();
        let col = col as u16;

        match value {
            OutputCell::Formula(formula) => {
                worksheet.write_formula(row, col, Formula::new(formula))?;
            }
            OutputCell::Date(serial) => {
                let num_format = if serial.fract() == 0.0 {
                    DATE_FORMAT
                } else {
                    DATETIME_FORMAT
                };
                let format = Format::new().set_num_format(num_format);
                worksheet.write_number_with_format(row, col, *serial, &format)?;
            }
            OutputCell::Value(CellValue::Empty) => {}
            OutputCell::Value(CellValue::Int(i)) => {
                worksheet.write_number(row, col, *i as f64)?;
            }
            OutputCell::Value(CellValue::Float(f)) => {
                worksheet.write_number(row, col, *f)?;
            }
            OutputCell::Value(CellValue::Bool(b)) => {
                worksheet.write_boolean(row, col, *b)?;
            }
            OutputCell::Value(
                CellValue::Text(s) | CellValue::DateTime(s) | CellValue::Error(s),
            ) => {
                worksheet.write_string(row, col, s)?;
            }
        }

        Ok(())
    }
}

/// Template cells keep their type; dates stay numeric
fn template_cell(data: &Data) -> OutputCell {
    match data {
        Data::DateTime(dt) if !dt.is_duration() => OutputCell::Date(dt.as_f64()),
        other => OutputCell::Value(cell_from_data(other)),
    }
}

/// Excel serial (1900 date system) to a calendar date and time
fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(Duration::milliseconds(millis))
}
