use crate::adapters::sheet::{is_sheet, read_table};
use crate::domain::columns::{
    parse_relay_rows, parse_result_rows, result_headers, result_row_cells,
};
use crate::domain::model::Table;
use crate::utils::error::{Result, RowIssue};
use std::fmt::Write as _;
use std::path::Path;

/// How `print` shows a spreadsheet. `.sd3` files are always shown as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum SheetView {
    /// Cells exactly as exported
    #[default]
    Raw,
    /// Rows read as individual results, in consolidated columns
    Individual,
    /// Rows read as relay results
    Relay,
}

/// Text dump of an .sd3 file or a spreadsheet.
pub fn render_file(path: &Path, data: Vec<u8>, view: SheetView) -> Result<String> {
    if !is_sheet(path) {
        return Ok(String::from_utf8_lossy(&data)
            .lines()
            .map(|line| format!("{}\n", line))
            .collect());
    }

    let table = read_table(path, data)?;
    tracing::debug!("printing {} as {:?}", path.display(), view);
    match view {
        SheetView::Raw => Ok(render_raw(&table)),
        SheetView::Individual => render_individual(&table),
        SheetView::Relay => render_relays(&table),
    }
}

fn one_line(cell: &str) -> String {
    cell.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" / ")
}

fn render_raw(table: &Table) -> String {
    let mut out = String::new();
    let headers: Vec<String> = table.headers.iter().map(|h| one_line(h)).collect();
    let _ = writeln!(out, "row | {}", headers.join(" | "));
    for row in &table.rows {
        let cells: Vec<String> = table
            .headers
            .iter()
            .map(|h| one_line(row.get(h).unwrap_or("")))
            .collect();
        let _ = writeln!(out, "{:>3} | {}", row.number, cells.join(" | "));
    }
    out
}

fn push_issues(out: &mut String, issues: &[RowIssue]) {
    for issue in issues {
        let _ = writeln!(out, "rejected: {}", issue);
    }
}

fn render_individual(table: &Table) -> Result<String> {
    let (rows, issues) = parse_result_rows(table)?;
    let mut out = String::new();
    let _ = writeln!(out, "{}", result_headers().join(" | "));
    for row in &rows {
        let _ = writeln!(out, "{}", result_row_cells(row).join(" | "));
    }
    push_issues(&mut out, &issues);
    Ok(out)
}

fn render_relays(table: &Table) -> Result<String> {
    let (relays, issues) = parse_relay_rows(table)?;
    let mut out = String::new();
    for relay in &relays {
        let result = relay
            .final_time
            .map(|t| t.to_clock())
            .unwrap_or_else(|| relay.status.label().to_string());
        let _ = writeln!(
            out,
            "{}-{} | {} | {} | {}",
            relay.team.as_deref().unwrap_or("(home)"),
            relay.relay_letter,
            relay.event,
            result,
            relay.swimmers.join(" / ")
        );
    }
    push_issues(&mut out, &issues);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const PORTAL_CSV: &str = "\"Athlete\nName\",Event,\"Finals\nTime\"\n\
\"Doe, Jane\n010114JANXDOEX\",\"Female (9-10) \n50 Free\",35.67\n\
,50 Free,36.00\n";

    #[test]
    fn test_sd3_lines_are_printed_as_is() {
        let text = render_file(
            &PathBuf::from("meet.sd3"),
            b"A01V3   \r\nZ01     \r\n".to_vec(),
            SheetView::Individual,
        )
        .unwrap();
        assert_eq!(text, "A01V3   \nZ01     \n");
    }

    #[test]
    fn test_raw_view_keeps_cells() {
        let text = render_file(
            &PathBuf::from("meet_free.csv"),
            PORTAL_CSV.as_bytes().to_vec(),
            SheetView::Raw,
        )
        .unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "row | Athlete / Name | Event | Finals / Time");
        assert_eq!(
            lines[1],
            "  1 | Doe, Jane / 010114JANXDOEX | Female (9-10) / 50 Free | 35.67"
        );
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_individual_view_reads_rows_and_lists_rejects() {
        let text = render_file(
            &PathBuf::from("meet_free.csv"),
            PORTAL_CSV.as_bytes().to_vec(),
            SheetView::Individual,
        )
        .unwrap();
        assert!(text.contains("Doe, Jane | 010114JANXDOEX |"));
        assert!(text.contains("| Female (9-10) 50 Free |"));
        assert!(text.contains("rejected: meet_free.csv row 2: Name (empty)"));
    }

    #[test]
    fn test_relay_view() {
        let csv = "Relay,Event,Swimmers,Final Time\nWWST-A,Girls 9-10 200 Free Relay,Jane Doe;Ann Roe;Kim Poe;Amy Loe,2:20.00\n";
        let text = render_file(
            &PathBuf::from("meet_relay.csv"),
            csv.as_bytes().to_vec(),
            SheetView::Relay,
        )
        .unwrap();
        assert_eq!(
            text,
            "WWST-A | Girls 9-10 200 Free Relay | 2:20.00 | Jane Doe / Ann Roe / Kim Poe / Amy Loe\n"
        );
    }
}
