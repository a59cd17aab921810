use crate::core::context::Context;
use crate::core::template::{CompiledConfig, CompiledSheet};
use crate::error::{Form2ListError, Form2ListResult};
use crate::excel::{cell_address, column_number_to_name, CellRef, OutputWorkbook};
use tracing::debug;

/// Write one document's row into every configured sheet.
///
/// `document` is the matched context with the file path keys already set.
/// Returns the number of cells written.
pub fn write_row(
    config: &CompiledConfig,
    workbook: &mut OutputWorkbook,
    document: &Context,
    row_number: u32,
) -> Form2ListResult<usize> {
    let mut written = 0;
    for sheet in &config.sheets {
        written += write_sheet_row(config, sheet, workbook, document, row_number)?;
    }
    Ok(written)
}

fn write_sheet_row(
    config: &CompiledConfig,
    sheet: &CompiledSheet,
    workbook: &mut OutputWorkbook,
    document: &Context,
    row_number: u32,
) -> Form2ListResult<usize> {
    let row = i64::from(row_number) + sheet.row_offset;
    let row = u32::try_from(row)
        .ok()
        .filter(|r| *r >= 1)
        .ok_or_else(|| {
            Form2ListError::InvalidCellAddress(format!(
                "sheet '{}': row {} (row offset {})",
                sheet.name, row, sheet.row_offset
            ))
        })?;

    if !workbook.has_sheet(&sheet.name) {
        return Err(Form2ListError::SheetNotFound(sheet.name.clone()));
    }

    let mut row_ctx = document.extend();
    row_ctx.set("row_number", row);
    row_ctx.set("row", row.to_string());

    for (i, column) in sheet.columns.iter().enumerate() {
        let column_number = u32::try_from(i + 1)
            .ok()
            .and_then(|n| n.checked_add(config.column_offset))
            .ok_or_else(|| {
                Form2ListError::InvalidCellAddress(format!(
                    "sheet '{}': column {} (column offset {})",
                    sheet.name,
                    i + 1,
                    config.column_offset
                ))
            })?;
        let letters = column_number_to_name(column_number);
        let address = cell_address(&letters, row);

        let mut cell_ctx = row_ctx.extend();
        cell_ctx.set("column_number", column_number);
        cell_ctx.set("column", letters);
        cell_ctx.set("cell", address.clone());

        let text = config.templates.render(column.value, &cell_ctx)?;
        debug!(
            sheet = %sheet.name,
            cell = %address,
            value = %column.value_source,
            "Write {:?}",
            text
        );
        workbook.set_text(&sheet.name, CellRef::new(row, column_number), text)?;
    }

    Ok(sheet.columns.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_config_str;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn compile(yaml: &str) -> CompiledConfig {
        CompiledConfig::compile(&parse_config_str(yaml, Path::new("")).unwrap()).unwrap()
    }

    fn a1(addr: &str) -> CellRef {
        CellRef::parse(addr).unwrap()
    }

    fn document() -> Context {
        let mut ctx = Context::new().with_file_path(Path::new("forms/alice.xlsx"));
        ctx.set("name", "Alice");
        ctx
    }

    #[test]
    fn test_writes_columns_in_order() {
        let config = compile(
            r#"
template: t.xlsx
sheets:
  - name: List
    columns:
      - value: "{{ name }}"
      - value: "{{ basename }}"
      - value: "{{ row }}/{{ column }}/{{ cell }}/{{ column_number }}"
"#,
        );
        let mut wb = OutputWorkbook::with_sheets(["List"]);
        let written = write_row(&config, &mut wb, &document(), 1).unwrap();

        assert_eq!(written, 3);
        assert_eq!(wb.text("List", a1("A1")).as_deref(), Some("Alice"));
        assert_eq!(wb.text("List", a1("B1")).as_deref(), Some("alice.xlsx"));
        assert_eq!(wb.text("List", a1("C1")).as_deref(), Some("1/C/C1/3"));
    }

    #[test]
    fn test_row_and_column_offsets() {
        let config = compile(
            r#"
template: t.xlsx
columnOffset: 2
rowOffset: 1
sheets:
  - name: List
    columns:
      - value: "{{ cell }}"
  - name: Log
    rowOffset: 10
    columns:
      - value: "{{ row_number }}"
"#,
        );
        let mut wb = OutputWorkbook::with_sheets(["List", "Log"]);
        write_row(&config, &mut wb, &document(), 2).unwrap();

        assert_eq!(wb.text("List", a1("C3")).as_deref(), Some("C3"));
        assert_eq!(wb.text("Log", a1("C12")).as_deref(), Some("12"));
    }

    #[test]
    fn test_missing_sheet() {
        let config = compile(
            "template: t.xlsx\nsheets:\n  - name: Nope\n    columns:\n      - value: x\n",
        );
        let mut wb = OutputWorkbook::with_sheets(["List"]);
        let err = write_row(&config, &mut wb, &document(), 1).unwrap_err();
        assert!(matches!(err, Form2ListError::SheetNotFound(ref s) if s == "Nope"));
    }

    #[test]
    fn test_row_below_one_is_rejected() {
        let config = compile(
            "template: t.xlsx\nsheets:\n  - name: List\n    rowOffset: -5\n    columns:\n      - value: x\n",
        );
        let mut wb = OutputWorkbook::with_sheets(["List"]);
        let err = write_row(&config, &mut wb, &document(), 1).unwrap_err();
        assert!(matches!(err, Form2ListError::InvalidCellAddress(_)));
    }

    #[test]
    fn test_column_offset_overflow_is_rejected() {
        let config = compile(
            "template: t.xlsx\ncolumnOffset: 4294967295\nsheets:\n  - name: List\n    columns:\n      - value: x\n",
        );
        let mut wb = OutputWorkbook::with_sheets(["List"]);
        let err = write_row(&config, &mut wb, &document(), 1).unwrap_err();
        assert!(matches!(err, Form2ListError::InvalidCellAddress(_)));
        assert!(wb.sheet("List").unwrap().get(a1("A1")).is_none());
    }

    #[test]
    fn test_same_row_twice_is_idempotent() {
        let config = compile(
            "template: t.xlsx\nsheets:\n  - name: List\n    columns:\n      - value: '{{ name }}'\n",
        );
        let mut wb = OutputWorkbook::with_sheets(["List"]);
        write_row(&config, &mut wb, &document(), 4).unwrap();
        let once = wb.clone();
        write_row(&config, &mut wb, &document(), 4).unwrap();
        assert_eq!(wb, once);
    }

    #[test]
    fn test_document_context_untouched() {
        let config = compile(
            "template: t.xlsx\nsheets:\n  - name: List\n    columns:\n      - value: '{{ name }}'\n",
        );
        let doc = document();
        let before = doc.clone();
        let mut wb = OutputWorkbook::with_sheets(["List"]);
        write_row(&config, &mut wb, &doc, 1).unwrap();
        assert_eq!(doc, before);
        assert!(!doc.contains("cell"));
    }
}
