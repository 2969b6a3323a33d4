use crate::adapters::sheet::read_table;
use crate::config::toml_config::SwimTeamConfig;
use crate::core::encode::{EncodeOptions, EncodeSummary, MeetEncoder};
use crate::core::merge::relay_source;
use crate::core::{Pipeline, Storage};
use crate::domain::columns::{parse_relay_rows, parse_result_rows};
use crate::domain::model::{RelayRow, ResultRow};
use crate::domain::template::EventTable;
use crate::utils::error::{ConvertError, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

const CONCAT_SUFFIX: &str = "_concat";

#[derive(Debug, Clone)]
pub struct BuildInput {
    pub results: Vec<ResultRow>,
    pub relays: Vec<RelayRow>,
}

#[derive(Debug, Clone)]
pub struct BuiltFile {
    pub text: String,
    pub summary: EncodeSummary,
}

/// `meet_concat.csv` -> `meet`, keeping the directory.
pub fn base_of(consolidated: &Path) -> PathBuf {
    let stem = consolidated
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let base = stem.strip_suffix(CONCAT_SUFFIX).unwrap_or(&stem).to_string();
    consolidated.with_file_name(base)
}

/// `build`: consolidated table plus relay table in, `.sd3` file out.
pub struct BuildPipeline<S: Storage> {
    storage: S,
    config: SwimTeamConfig,
    events: EventTable,
    consolidated: PathBuf,
    relay: Option<PathBuf>,
    output: PathBuf,
    options: EncodeOptions,
}

impl<S: Storage> BuildPipeline<S> {
    /// Output defaults to `<base>.sd3` beside the consolidated table, the
    /// relay table to `<base>_relay.<ext>` if one exists, and the creation
    /// date to `created_on`.
    pub fn new(
        storage: S,
        config: SwimTeamConfig,
        consolidated: impl Into<PathBuf>,
        created_on: NaiveDate,
    ) -> Result<Self> {
        let consolidated = consolidated.into();
        let events = config.event_table()?;
        let base = base_of(&consolidated);
        let meet_name = base
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            storage,
            config,
            events,
            output: base.with_extension("sd3"),
            consolidated,
            relay: None,
            options: EncodeOptions {
                created_on,
                meet_name,
            },
        })
    }

    pub fn with_relay(mut self, relay: impl Into<PathBuf>) -> Self {
        self.relay = Some(relay.into());
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn output_path(&self) -> &Path {
        &self.output
    }

    fn relay_path(&self) -> Option<PathBuf> {
        self.relay.clone().or_else(|| {
            let base = base_of(&self.consolidated);
            relay_source(&self.storage, &base.to_string_lossy())
        })
    }
}

impl<S: Storage> Pipeline for BuildPipeline<S> {
    type Extracted = BuildInput;
    type Transformed = BuiltFile;

    fn name(&self) -> &str {
        "build"
    }

    fn extract(&self) -> Result<BuildInput> {
        let data = self.storage.read_file(&self.consolidated)?;
        let table = read_table(&self.consolidated, data)?;
        let (results, mut issues) = parse_result_rows(&table)?;

        let relays = match self.relay_path() {
            Some(path) => {
                let data = self.storage.read_file(&path)?;
                let table = read_table(&path, data)?;
                let (relays, mut bad) = parse_relay_rows(&table)?;
                issues.append(&mut bad);
                relays
            }
            None => {
                tracing::warn!("no relay table given or found; encoding individual results only");
                Vec::new()
            }
        };

        if !issues.is_empty() {
            return Err(ConvertError::MalformedInput { issues });
        }
        tracing::info!(
            "read {} individual and {} relay row(s)",
            results.len(),
            relays.len()
        );
        Ok(BuildInput { results, relays })
    }

    fn transform(&self, data: BuildInput) -> Result<BuiltFile> {
        let meet = MeetEncoder::new(&self.config, &self.events).encode(
            &data.results,
            &data.relays,
            &self.options,
        )?;
        let text = meet.file.render(self.config.output.time_style)?;
        Ok(BuiltFile {
            text,
            summary: meet.summary,
        })
    }

    fn load(&self, result: BuiltFile) -> Result<String> {
        self.storage
            .write_file(&self.output, result.text.as_bytes())?;
        tracing::info!(
            "{} event(s), {} result(s) written",
            result.summary.events,
            result.summary.individual_results + result.summary.relay_results
        );
        Ok(self.output.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::LocalStorage;
    use crate::core::EtlEngine;
    use std::fs;
    use tempfile::TempDir;

    fn created_on() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 20).unwrap()
    }

    #[test]
    fn test_base_of_strips_concat_suffix() {
        assert_eq!(
            base_of(Path::new("data/meet_concat.xlsx")),
            PathBuf::from("data/meet")
        );
        assert_eq!(base_of(Path::new("results.csv")), PathBuf::from("results"));
    }

    #[test]
    fn test_build_finds_relay_file_by_convention() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("meet_concat.csv"),
            "Name,Age,Gender,Event,Final Time\nJane Doe,10,F,50 Freestyle,35.67\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("meet_relay.csv"),
            "Relay,Event,Swimmers,Final Time\nA,Girls 9-10 200 Medley Relay,A B;C D;E F;G H,2:40.00\n",
        )
        .unwrap();

        let pipeline = BuildPipeline::new(
            LocalStorage::new(dir.path()),
            SwimTeamConfig::default(),
            "meet_concat.csv",
            created_on(),
        )
        .unwrap();
        let output = EtlEngine::new(pipeline).run().unwrap();
        assert_eq!(output, "meet.sd3");

        let text = fs::read_to_string(dir.path().join("meet.sd3")).unwrap();
        assert_eq!(text.matches("\r\nE0").count(), 1);
        assert_eq!(text.matches("\r\nF0").count(), 4);
        assert!(text.contains("  003567"));
    }

    #[test]
    fn test_encode_failure_leaves_no_output() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("meet_concat.csv"),
            "Name,Event,Final Time\nJane Doe,200 Medley Freestyle,35.67\n",
        )
        .unwrap();

        let pipeline = BuildPipeline::new(
            LocalStorage::new(dir.path()),
            SwimTeamConfig::default(),
            "meet_concat.csv",
            created_on(),
        )
        .unwrap()
        .with_output("out/meet.sd3");
        let err = EtlEngine::new(pipeline).run().unwrap_err();
        assert!(
            matches!(err, ConvertError::UnknownEvent { ref description } if description == "200 Medley Freestyle")
        );
        assert!(!dir.path().join("out/meet.sd3").exists());
    }
}
