use crate::adapters::sheet::{read_table, write_table, IntermediateFormat};
use crate::core::merge::{discover_sources, merge_tables, relay_source, MergeOutcome};
use crate::core::{Pipeline, Storage};
use crate::domain::columns::{parse_relay_rows, result_headers, result_row_cells};
use crate::domain::model::Table;
use crate::utils::error::{ConvertError, Result};
use std::path::{Path, PathBuf};

/// Source tables for one `concat` run.
#[derive(Debug, Clone)]
pub struct MergeSources {
    pub tables: Vec<Table>,
    pub relay: Option<Table>,
}

#[derive(Debug, Clone)]
pub struct MergeReport {
    pub outcome: MergeOutcome,
    /// Rows in `<base>_relay.<ext>`, when that file exists.
    pub relay_rows: Option<usize>,
}

/// `concat`: per-stroke exports in, one consolidated table out.
pub struct MergePipeline<S: Storage> {
    storage: S,
    base: String,
    format: IntermediateFormat,
}

impl<S: Storage> MergePipeline<S> {
    pub fn new(storage: S, base: impl Into<String>, format: IntermediateFormat) -> Self {
        Self {
            storage,
            base: base.into(),
            format,
        }
    }

    /// `<base>_concat.csv` or `<base>_concat.xlsx`.
    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(format!("{}_concat.{}", self.base, self.format.extension()))
    }

    fn read(&self, path: &Path) -> Result<Table> {
        let data = self.storage.read_file(path)?;
        read_table(path, data)
    }
}

impl<S: Storage> Pipeline for MergePipeline<S> {
    type Extracted = MergeSources;
    type Transformed = MergeReport;

    fn name(&self) -> &str {
        "concat"
    }

    fn extract(&self) -> Result<MergeSources> {
        let sources = discover_sources(&self.storage, &self.base)?;
        let tables = sources
            .iter()
            .map(|path| self.read(path))
            .collect::<Result<Vec<_>>>()?;

        let relay = match relay_source(&self.storage, &self.base) {
            Some(path) => Some(self.read(&path)?),
            None => {
                tracing::info!("no relay export for {}", self.base);
                None
            }
        };
        Ok(MergeSources { tables, relay })
    }

    fn transform(&self, data: MergeSources) -> Result<MergeReport> {
        let outcome = merge_tables(&data.tables)?;
        tracing::info!(
            "merged {} file(s) into {} row(s): {} repeat(s) dropped, {} conflict(s)",
            outcome.sources,
            outcome.rows.len(),
            outcome.duplicates,
            outcome.conflicts.len()
        );

        let relay_rows = match &data.relay {
            Some(table) => {
                let (relays, issues) = parse_relay_rows(table)?;
                if !issues.is_empty() {
                    return Err(ConvertError::MalformedInput { issues });
                }
                tracing::info!("{}: {} relay row(s)", table.source.display(), relays.len());
                Some(relays.len())
            }
            None => None,
        };

        Ok(MergeReport {
            outcome,
            relay_rows,
        })
    }

    fn load(&self, result: MergeReport) -> Result<String> {
        let path = self.output_path();
        let rows: Vec<Vec<String>> = result.outcome.rows.iter().map(result_row_cells).collect();
        let bytes = write_table(&path, &result_headers(), &rows)?;
        self.storage.write_file(&path, &bytes)?;
        Ok(path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::LocalStorage;
    use crate::core::EtlEngine;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_concat_writes_consolidated_csv() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("meet_free.csv"),
            "Name,Age,Event,Final Time\nJane Doe,10,50 Freestyle,35.67\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("meet_back.csv"),
            "Name,Age,Event,Final Time\nJane Doe,10,50 Backstroke,40.01\n",
        )
        .unwrap();

        let pipeline =
            MergePipeline::new(LocalStorage::new(dir.path()), "meet", IntermediateFormat::Csv);
        let output = EtlEngine::new(pipeline).run().unwrap();
        assert_eq!(output, "meet_concat.csv");

        let text = fs::read_to_string(dir.path().join("meet_concat.csv")).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Name,USS ID,Age"));
        // meet_back.csv sorts first.
        assert!(lines[1].contains("50 Backstroke"));
        assert!(lines[2].contains("35.67"));
    }

    #[test]
    fn test_bad_relay_file_fails_before_writing() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("meet_free.csv"),
            "Name,Event,Final Time\nJane Doe,50 Free,35.67\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("meet_relay.csv"),
            "Relay,Event,Final Time\nWWST-A,200 Free Relay,abc\n",
        )
        .unwrap();

        let pipeline =
            MergePipeline::new(LocalStorage::new(dir.path()), "meet", IntermediateFormat::Csv);
        let err = EtlEngine::new(pipeline).run().unwrap_err();
        assert!(matches!(err, ConvertError::MalformedInput { .. }));
        assert!(!dir.path().join("meet_concat.csv").exists());
    }
}
