//! Excel access for form2list
//!
//! - Import: input forms (.xlsx) are read through calamine
//! - Export: the output list is loaded from its template and saved with rust_xlsxwriter

pub mod address;
mod exporter;
mod importer;

pub use address::{cell_address, column_name_to_number, column_number_to_name, CellRef};
pub use exporter::{OutputCell, OutputSheet, OutputWorkbook};
pub use importer::InputDocument;
