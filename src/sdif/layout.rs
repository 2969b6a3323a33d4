use crate::domain::swim_time::SwimTime;
use crate::sdif::codes::TimeCode;
use crate::utils::error::{ConvertError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Every SDIF record is exactly this many columns, before the CRLF.
pub const RECORD_LENGTH: usize = 160;

/// How swim times are written into time fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeStyle {
    /// Zero-padded hundredths, right-justified: `  003567`.
    #[default]
    Hundredths,
    /// `mm:ss.hh`, right-justified: `   35.67`.
    Clock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, left-justified, cut to width.
    Alpha,
    /// Code from a fixed table, left-justified, must fit.
    Code,
    /// Unsigned integer, zero-padded.
    Numeric,
    /// Decimal number kept as text, right-justified.
    Decimal,
    /// `MMDDYYYY`.
    Date,
    /// Swim time or a time code such as `DQ`.
    Time,
    /// `T` / `F`.
    Logical,
}

/// One field of a record layout. `start` is the 1-based column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub start: usize,
    pub len: usize,
    pub kind: FieldKind,
}

pub const fn field(name: &'static str, start: usize, len: usize, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        start,
        len,
        kind,
    }
}

impl FieldSpec {
    fn range(&self) -> std::ops::Range<usize> {
        self.start - 1..self.start - 1 + self.len
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Blank,
    Text(String),
    Number(u64),
    Date(NaiveDate),
    Time(SwimTime),
    TimeCode(TimeCode),
    Flag(bool),
}

impl FieldValue {
    /// Blank for an empty string.
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            Self::Blank
        } else {
            Self::Text(value)
        }
    }

    pub fn opt_text(value: Option<&str>) -> Self {
        value.map_or(Self::Blank, Self::text)
    }

    pub fn char(value: char) -> Self {
        Self::Text(value.to_string())
    }

    pub fn opt_number<N: Into<u64>>(value: Option<N>) -> Self {
        value.map_or(Self::Blank, |n| Self::Number(n.into()))
    }

    pub fn opt_date(value: Option<NaiveDate>) -> Self {
        value.map_or(Self::Blank, Self::Date)
    }

    pub fn as_number(&self) -> Option<u64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// The field table of one record type. Columns 1-2 always carry `code`.
#[derive(Debug)]
pub struct RecordLayout {
    pub code: &'static str,
    pub fields: &'static [FieldSpec],
}

impl RecordLayout {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Renders `values` (one per field, in layout order) as a
    /// `RECORD_LENGTH`-column line without the line terminator.
    pub fn encode(&self, values: &[FieldValue], style: TimeStyle) -> Result<String> {
        if values.len() != self.fields.len() {
            return Err(ConvertError::InvalidRecord {
                record: self.code.to_string(),
                line: 0,
                reason: format!(
                    "{} values for {} fields",
                    values.len(),
                    self.fields.len()
                ),
            });
        }

        let mut line = vec![' '; RECORD_LENGTH];
        for (slot, c) in line.iter_mut().zip(self.code.chars()) {
            *slot = c;
        }
        for (spec, value) in self.fields.iter().zip(values) {
            let text = self.encode_field(spec, value, style)?;
            for (slot, c) in line[spec.range()].iter_mut().zip(text.chars()) {
                *slot = c;
            }
        }
        Ok(line.into_iter().collect())
    }

    fn encode_field(&self, spec: &FieldSpec, value: &FieldValue, style: TimeStyle) -> Result<String> {
        let width = spec.len;
        let overflow = |value: String| ConvertError::FieldOverflow {
            record: self.code,
            field: spec.name,
            value,
            width,
        };
        let fit_left = |value: String| {
            if value.chars().count() > width {
                Err(overflow(value))
            } else {
                Ok(format!("{:<width$}", value))
            }
        };
        let fit_right = |value: String| {
            if value.chars().count() > width {
                Err(overflow(value))
            } else {
                Ok(format!("{:>width$}", value))
            }
        };

        match value {
            FieldValue::Blank => Ok(" ".repeat(width)),
            FieldValue::Text(text) => {
                let text = ascii(text.trim());
                match spec.kind {
                    FieldKind::Alpha => Ok(format!("{:<width$.width$}", text)),
                    FieldKind::Decimal | FieldKind::Numeric => fit_right(text),
                    _ => fit_left(text),
                }
            }
            FieldValue::Number(n) => {
                let text = format!("{:0width$}", n);
                if text.len() > width {
                    Err(overflow(text))
                } else {
                    Ok(text)
                }
            }
            FieldValue::Date(date) => fit_left(date.format("%m%d%Y").to_string()),
            FieldValue::Time(time) => match style {
                TimeStyle::Hundredths => fit_right(format!("{:06}", time.hundredths())),
                TimeStyle::Clock => fit_right(time.to_clock()),
            },
            FieldValue::TimeCode(code) => fit_left(code.as_str().to_string()),
            FieldValue::Flag(flag) => fit_left(if *flag { "T" } else { "F" }.to_string()),
        }
    }

    /// Splits a line into named field values. Short lines are padded, so
    /// files with trailing blanks stripped still read.
    pub fn decode(&self, line: &str, line_no: usize) -> Result<Vec<(&'static str, FieldValue)>> {
        let invalid = |reason: String| ConvertError::InvalidRecord {
            record: self.code.to_string(),
            line: line_no,
            reason,
        };

        let mut chars: Vec<char> = line.chars().collect();
        if chars.len() > RECORD_LENGTH {
            return Err(invalid(format!(
                "{} columns, expected {}",
                chars.len(),
                RECORD_LENGTH
            )));
        }
        chars.resize(RECORD_LENGTH, ' ');

        self.fields
            .iter()
            .map(|spec| {
                let raw: String = chars[spec.range()].iter().collect();
                decode_field(spec, &raw)
                    .map(|value| (spec.name, value))
                    .map_err(|reason| invalid(format!("{}: {}", spec.name, reason)))
            })
            .collect()
    }
}

fn ascii(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect()
}

fn decode_field(spec: &FieldSpec, raw: &str) -> std::result::Result<FieldValue, String> {
    let text = raw.trim();
    if text.is_empty() {
        return Ok(FieldValue::Blank);
    }
    match spec.kind {
        FieldKind::Alpha | FieldKind::Code => Ok(FieldValue::Text(text.to_string())),
        FieldKind::Decimal => text
            .parse::<f64>()
            .map(|_| FieldValue::Text(text.to_string()))
            .map_err(|_| format!("'{}' is not a number", text)),
        FieldKind::Numeric => text
            .parse::<u64>()
            .map(FieldValue::Number)
            .map_err(|_| format!("'{}' is not a number", text)),
        FieldKind::Date => NaiveDate::parse_from_str(text, "%m%d%Y")
            .map(FieldValue::Date)
            .map_err(|_| format!("'{}' is not an MMDDYYYY date", text)),
        FieldKind::Time => {
            if let Some(code) = TimeCode::parse(text) {
                Ok(FieldValue::TimeCode(code))
            } else if text.chars().all(|c| c.is_ascii_digit()) {
                text.parse::<u32>()
                    .map(|h| FieldValue::Time(SwimTime::from_hundredths(h)))
                    .map_err(|_| format!("'{}' is not a time", text))
            } else {
                text.parse::<SwimTime>()
                    .map(FieldValue::Time)
                    .map_err(|e| e.to_string())
            }
        }
        FieldKind::Logical => match text {
            "T" | "Y" => Ok(FieldValue::Flag(true)),
            "F" | "N" => Ok(FieldValue::Flag(false)),
            other => Err(format!("'{}' is not T or F", other)),
        },
    }
}
