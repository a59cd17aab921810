//! Reading input forms (.xlsx) through calamine

use crate::core::matcher::CellSource;
use crate::error::{Form2ListError, Form2ListResult};
use crate::excel::CellRef;
use crate::types::CellValue;
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use chrono::NaiveDateTime;
use std::path::Path;

/// The fields sheet of one input workbook, held in memory
///
/// The workbook file is closed as soon as the sheet has been read.
pub struct InputDocument {
    range: Range<Data>,
}

impl InputDocument {
    /// Open `path` and read its first sheet.
    ///
    /// Fields are meant to come from the sheet that was active when the form
    /// was saved. calamine does not expose the selected tab, so the first
    /// sheet in workbook order stands in for it; forms saved with another tab
    /// selected are still read from their first sheet.
    pub fn open<P: AsRef<Path>>(path: P) -> Form2ListResult<Self> {
        let path = path.as_ref();
        let mut workbook: Xlsx<_> = open_workbook(path).map_err(|e| {
            Form2ListError::Workbook(format!(
                "Failed to open Excel file {}: {}",
                path.display(),
                e
            ))
        })?;

        let sheet_name = workbook.sheet_names().first().cloned().ok_or_else(|| {
            Form2ListError::Workbook(format!("No worksheet in {}", path.display()))
        })?;

        let range = workbook.worksheet_range(&sheet_name).map_err(|e| {
            Form2ListError::Workbook(format!(
                "Failed to read sheet '{}' of {}: {}",
                sheet_name,
                path.display(),
                e
            ))
        })?;

        Ok(Self { range })
    }
}

impl CellSource for InputDocument {
    fn cell_value(&self, cell: CellRef) -> CellValue {
        let (row, column) = cell.zero_based();
        self.range
            .get_value((row, column))
            .map(cell_from_data)
            .unwrap_or(CellValue::Empty)
    }
}

/// Convert a calamine cell to a [`CellValue`]
pub(crate) fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::from_number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => CellValue::DateTime(format_datetime(datetime)),
            None => CellValue::from_number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::DateTime(s.clone()),
        Data::Error(e) => CellValue::Error(e.to_string()),
    }
}

pub(crate) fn format_datetime(datetime: NaiveDateTime) -> String {
    datetime.format("%Y-%m-%d %H:%M:%S").to_string()
}
