use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// One rejected source row. Collected across a whole merge so the operator
/// sees every problem in one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowIssue {
    pub file: PathBuf,
    /// 1-based data row index (header row excluded).
    pub row: usize,
    pub field: String,
    pub reason: String,
}

impl fmt::Display for RowIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} row {}: {} ({})",
            self.file.display(),
            self.row,
            self.field,
            self.reason
        )
    }
}

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Spreadsheet read error: {0}")]
    SpreadsheetError(#[from] calamine::Error),

    #[error("Spreadsheet write error: {0}")]
    XlsxError(#[from] rust_xlsxwriter::XlsxError),

    #[error("Unsupported spreadsheet format: {}", .path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("{} has no worksheet or header row", .path.display())]
    EmptyTable { path: PathBuf },

    #[error("No source files found for base name '{base}' (looked for {expected})")]
    EmptyInput { base: String, expected: String },

    #[error("Required column '{column}' is missing from {}", .file.display())]
    MissingField { file: PathBuf, column: String },

    #[error("{} malformed row(s): {}", .issues.len(), join_issues(.issues))]
    MalformedInput { issues: Vec<RowIssue> },

    #[error("Unknown event \"{description}\": no entry in the event template")]
    UnknownEvent { description: String },

    #[error("Event \"{description}\" matches several template events: {candidates}")]
    AmbiguousEvent {
        description: String,
        candidates: String,
    },

    #[error("Relay {team} in \"{event}\" has {found} swimmer(s), expected {expected}")]
    RelayComposition {
        team: String,
        event: String,
        expected: usize,
        found: usize,
    },

    #[error("Value '{value}' does not fit {record}.{field} ({width} columns)")]
    FieldOverflow {
        record: &'static str,
        field: &'static str,
        value: String,
        width: usize,
    },

    #[error("Invalid {record} record on line {line}: {reason}")]
    InvalidRecord {
        record: String,
        line: usize,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid configuration value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

fn join_issues(issues: &[RowIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Input,
    Mapping,
    Encoding,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit status for a failed run; never 0.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::High => 1,
            Self::Critical => 3,
        }
    }
}

impl ConvertError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::IoError(_) => ErrorCategory::Io,
            Self::CsvError(_)
            | Self::SpreadsheetError(_)
            | Self::UnsupportedFormat { .. }
            | Self::EmptyTable { .. }
            | Self::EmptyInput { .. }
            | Self::MissingField { .. }
            | Self::MalformedInput { .. } => ErrorCategory::Input,
            Self::UnknownEvent { .. }
            | Self::AmbiguousEvent { .. }
            | Self::RelayComposition { .. } => ErrorCategory::Mapping,
            Self::XlsxError(_) | Self::FieldOverflow { .. } | Self::InvalidRecord { .. } => {
                ErrorCategory::Encoding
            }
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Io | ErrorCategory::Configuration => ErrorSeverity::Critical,
            ErrorCategory::Input | ErrorCategory::Mapping | ErrorCategory::Encoding => {
                ErrorSeverity::High
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::EmptyInput { base, .. } => {
                format!("No per-stroke exports were found for '{}'", base)
            }
            Self::MissingField { file, column } => format!(
                "{} has no '{}' column, so its rows cannot be identified",
                file.display(),
                column
            ),
            Self::MalformedInput { issues } => {
                let mut message = format!("{} row(s) were rejected:", issues.len());
                for issue in issues {
                    message.push_str("\n  - ");
                    message.push_str(&issue.to_string());
                }
                message
            }
            Self::UnknownEvent { description } => {
                format!("The event \"{}\" is not in the event template", description)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::IoError(_) => "Check that the paths exist and are readable/writable",
            Self::CsvError(_) | Self::SpreadsheetError(_) => {
                "Re-export the spreadsheet from the results portal and try again"
            }
            Self::UnsupportedFormat { .. } => "Save the export as .xls, .xlsx, .ods or .csv",
            Self::EmptyTable { .. } => "Make sure the first worksheet has a header row",
            Self::XlsxError(_) => "Write the consolidated table as CSV with --format csv",
            Self::EmptyInput { .. } => {
                "Name the exports <base>_free, <base>_back, <base>_breast, <base>_fly, <base>_im"
            }
            Self::MissingField { .. } => {
                "Export the results with the swimmer name and event columns included"
            }
            Self::MalformedInput { .. } => {
                "Correct the listed cells in the named files and run the same command again"
            }
            Self::UnknownEvent { .. } | Self::AmbiguousEvent { .. } => {
                "Fix the event description or add the event to [[events]] in the config file"
            }
            Self::RelayComposition { .. } => "List every leg swimmer in the relay export",
            Self::FieldOverflow { .. } => "Shorten the value in the source spreadsheet",
            Self::InvalidRecord { .. } => "The file is not a valid SDIF v3 file",
            Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Fix the configuration file and retry",
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_input_lists_every_row() {
        let err = ConvertError::MalformedInput {
            issues: vec![
                RowIssue {
                    file: PathBuf::from("meet_free.csv"),
                    row: 2,
                    field: "Name".to_string(),
                    reason: "empty".to_string(),
                },
                RowIssue {
                    file: PathBuf::from("meet_back.csv"),
                    row: 7,
                    field: "Event".to_string(),
                    reason: "empty".to_string(),
                },
            ],
        };

        let text = err.to_string();
        assert!(text.contains("meet_free.csv row 2: Name"));
        assert!(text.contains("meet_back.csv row 7: Event"));
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
    }

    #[test]
    fn test_unknown_event_names_the_description() {
        let err = ConvertError::UnknownEvent {
            description: "200 Medley Freestyle".to_string(),
        };
        assert!(err.to_string().contains("\"200 Medley Freestyle\""));
        assert!(err.user_friendly_message().contains("200 Medley Freestyle"));
        assert_eq!(err.category(), ErrorCategory::Mapping);
    }

    #[test]
    fn test_config_errors_are_critical() {
        let err = ConvertError::MissingConfigError {
            field: "team.code".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.severity().exit_code(), 3);
    }

    #[test]
    fn test_every_failure_exits_non_zero() {
        let errors = [
            ConvertError::UnknownEvent {
                description: "200 Medley Freestyle".to_string(),
            },
            ConvertError::MalformedInput { issues: Vec::new() },
            ConvertError::IoError(std::io::Error::other("disk full")),
        ];
        for err in errors {
            assert_ne!(err.severity().exit_code(), 0, "{err}");
        }
    }

    #[test]
    fn test_malformed_input_advice_fits_any_stage() {
        let err = ConvertError::MalformedInput { issues: Vec::new() };
        assert!(!err.recovery_suggestion().contains("concat"));
    }
}
