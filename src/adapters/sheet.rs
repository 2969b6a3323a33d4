use crate::domain::model::Table;
use crate::utils::error::{ConvertError, Result};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use rust_xlsxwriter::{DocProperties, ExcelDateTime, Format, Workbook};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::{Path, PathBuf};

pub const RESULTS_SHEET: &str = "Individual Results";

/// Format of the consolidated intermediate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum IntermediateFormat {
    #[default]
    Csv,
    Xlsx,
}

impl IntermediateFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xlsx => "xlsx",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SheetFormat {
    Csv,
    Workbook,
}

fn sheet_format(path: &Path) -> Option<SheetFormat> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "csv" => Some(SheetFormat::Csv),
        "xls" | "xlsx" | "xlsm" | "xlsb" | "ods" => Some(SheetFormat::Workbook),
        _ => None,
    }
}

/// True for the extensions [`read_table`] understands.
pub fn is_sheet(path: &Path) -> bool {
    sheet_format(path).is_some()
}

/// Extensions tried, in order, when looking for an export by base name.
pub const SOURCE_EXTENSIONS: [&str; 4] = ["xls", "xlsx", "ods", "csv"];

/// Parses file bytes into a [`Table`]; the first row is the header.
/// Workbooks are read from their first worksheet.
pub fn read_table(path: &Path, data: Vec<u8>) -> Result<Table> {
    let format = sheet_format(path).ok_or_else(|| ConvertError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let mut records = match format {
        SheetFormat::Csv => read_csv_records(&data)?,
        SheetFormat::Workbook => read_workbook_records(path, data)?,
    }
    .into_iter();

    let headers: Vec<String> = records
        .next()
        .filter(|h| h.iter().any(|c| !c.trim().is_empty()))
        .ok_or_else(|| ConvertError::EmptyTable {
            path: path.to_path_buf(),
        })?
        .into_iter()
        .map(|h| h.trim().to_string())
        .collect();

    let table = Table::from_records(PathBuf::from(path), headers, records.collect());
    tracing::debug!("read {} rows from {}", table.len(), path.display());
    Ok(table)
}

fn read_csv_records(data: &[u8]) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(data);

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        records.push(record.iter().map(str::to_string).collect());
    }
    Ok(records)
}

fn read_workbook_records(path: &Path, data: Vec<u8>) -> Result<Vec<Vec<String>>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(data))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ConvertError::EmptyTable {
            path: path.to_path_buf(),
        })??;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| dt.as_f64().to_string()),
        other => other.to_string(),
    }
}

/// Serialises a header row plus data rows as CSV or XLSX, chosen by the
/// extension of `path`. XLSX output carries a fixed creation timestamp, so
/// the same rows always produce the same bytes.
pub fn write_table(path: &Path, headers: &[&str], rows: &[Vec<String>]) -> Result<Vec<u8>> {
    match sheet_format(path) {
        Some(SheetFormat::Csv) => write_csv(headers, rows),
        Some(SheetFormat::Workbook) if has_extension(path, "xlsx") => write_xlsx(headers, rows),
        _ => Err(ConvertError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

fn write_csv(headers: &[&str], rows: &[Vec<String>]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| ConvertError::IoError(e.into_error()))
}

fn write_xlsx(headers: &[&str], rows: &[Vec<String>]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let properties =
        DocProperties::new().set_creation_datetime(&ExcelDateTime::from_ymd(2000, 1, 1)?);
    workbook.set_properties(&properties);

    let header_format = Format::new().set_bold().set_text_wrap();
    let cell_format = Format::new().set_text_wrap();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(RESULTS_SHEET)?;
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }
    for (r, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            if !value.is_empty() {
                worksheet.write_string_with_format(r as u32 + 1, col as u16, value, &cell_format)?;
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}
