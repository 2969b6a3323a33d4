use crate::sdif::layout::FieldValue;
use crate::sdif::records::layout_for;
use crate::utils::error::ConvertError;
use std::collections::BTreeMap;

/// One line read back through its record layout.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecord {
    pub line: usize,
    pub code: String,
    pub fields: Vec<(&'static str, FieldValue)>,
}

impl DecodedRecord {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }
}

/// Result-count check against the Z0 trailer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailerCheck {
    pub declared: u64,
    pub actual: u64,
}

impl TrailerCheck {
    pub fn is_consistent(&self) -> bool {
        self.declared == self.actual
    }
}

#[derive(Debug, Default)]
pub struct SdifReport {
    pub records: Vec<DecodedRecord>,
    /// Lines per record code, including codes this crate has no layout for.
    pub counts: BTreeMap<String, usize>,
    pub errors: Vec<ConvertError>,
}

impl SdifReport {
    pub fn count(&self, code: &str) -> usize {
        self.counts.get(code).copied().unwrap_or(0)
    }

    /// Compares the trailer's D0 + E0 totals with the records present.
    /// `None` when the file has no readable Z0.
    pub fn trailer_check(&self) -> Option<TrailerCheck> {
        let z0 = self.records.iter().rev().find(|r| r.code == "Z0")?;
        let declared = z0.get("d_records").and_then(FieldValue::as_number).unwrap_or(0)
            + z0.get("e_records").and_then(FieldValue::as_number).unwrap_or(0);
        let actual = (self.count("D0") + self.count("E0")) as u64;
        Some(TrailerCheck { declared, actual })
    }
}

fn looks_like_record_code(code: &str) -> bool {
    let mut chars = code.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(a), Some(b)) if a.is_ascii_uppercase() && b.is_ascii_digit()
    )
}

/// Decodes every line of an SDIF file. Bad lines are collected in
/// `errors`; reading continues past them.
pub fn read_sdif(text: &str) -> SdifReport {
    let mut report = SdifReport::default();

    for (index, raw) in text.split('\n').enumerate() {
        let line_no = index + 1;
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        let code: String = line.chars().take(2).collect();
        if !looks_like_record_code(&code) {
            report.errors.push(ConvertError::InvalidRecord {
                record: code,
                line: line_no,
                reason: "line does not start with a record code".to_string(),
            });
            continue;
        }
        *report.counts.entry(code.clone()).or_insert(0) += 1;

        let Some(layout) = layout_for(&code) else {
            tracing::debug!("line {}: no layout for {} records, counted only", line_no, code);
            continue;
        };
        match layout.decode(line, line_no) {
            Ok(fields) => report.records.push(DecodedRecord {
                line: line_no,
                code,
                fields,
            }),
            Err(e) => report.errors.push(e),
        }
    }

    report
}
