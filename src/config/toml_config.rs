use crate::domain::template::EventTable;
use crate::sdif::codes::{Course, MeetType};
use crate::sdif::layout::TimeStyle;
use crate::sdif::records::Address;
use crate::utils::error::{ConvertError, Result};
use crate::utils::validation::{
    validate_code, validate_max_len, validate_non_empty_string, validate_range,
    validate_required_field, validate_url, Validate,
};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "swim-team.toml";
pub const DEFAULT_TOUCHPAD_URL: &str = "https://www.touchpadlive.com/rest/touchpadlive";

/// Contents of `swim-team.toml`. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SwimTeamConfig {
    #[serde(default)]
    pub team: TeamSection,
    #[serde(default)]
    pub meet: MeetSection,
    #[serde(default)]
    pub software: SoftwareSection,
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub touchpad: TouchpadSection,
    #[serde(default)]
    pub events: Vec<EventEntry>,
}

/// The home team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamSection {
    pub full_name: String,
    pub abbreviation: String,
    #[serde(alias = "local_swim_committee")]
    pub lsc: String,
    #[serde(alias = "team_unify_team_code")]
    pub code: String,
    pub address_line_1: String,
    pub address_line_2: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl Default for TeamSection {
    fn default() -> Self {
        Self {
            full_name: "An ODSL Swim Team".to_string(),
            abbreviation: "Swimmers".to_string(),
            lsc: "OD".to_string(),
            code: "XXX".to_string(),
            address_line_1: "1 Main Street".to_string(),
            address_line_2: String::new(),
            city: "Ashburn".to_string(),
            state: "VA".to_string(),
            postal_code: "20148".to_string(),
            country: "USA".to_string(),
        }
    }
}

impl TeamSection {
    pub fn address(&self) -> Address {
        Address {
            line_1: self.address_line_1.clone(),
            line_2: self.address_line_2.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            postal_code: self.postal_code.clone(),
            country: self.country.clone(),
        }
    }
}

/// Meet header. Missing address fields fall back to the home team's.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeetSection {
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub course: Course,
    pub meet_type: MeetType,
    pub altitude_ft: Option<u32>,
    pub address_line_1: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoftwareSection {
    pub name: String,
    pub version: String,
    pub contact_name: String,
    pub contact_phone: String,
}

impl Default for SoftwareSection {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            contact_name: String::new(),
            contact_phone: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    pub time_style: TimeStyle,
    pub summer_league: bool,
    pub citizen: String,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            time_style: TimeStyle::Hundredths,
            summer_league: true,
            citizen: "USA".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TouchpadSection {
    pub base_url: String,
    pub retries: u32,
    pub backoff_ms: u64,
}

impl Default for TouchpadSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_TOUCHPAD_URL.to_string(),
            retries: 5,
            backoff_ms: 1000,
        }
    }
}

/// One `[[events]]` entry replacing the standard template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEntry {
    pub number: u16,
    pub description: String,
}

impl SwimTeamConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ConvertError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ConvertError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Reads and validates `path`, or falls back to the built-in defaults
    /// when the file does not exist.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(
                "config file {} not found, using built-in team defaults",
                path.display()
            );
            return Ok(Self::default());
        }
        let config = Self::from_file(path)?;
        config.validate()?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are
    /// left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ConvertError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// `[[events]]` when given, otherwise the standard dual-meet template.
    pub fn event_table(&self) -> Result<EventTable> {
        if self.events.is_empty() {
            return Ok(EventTable::standard());
        }
        EventTable::from_descriptions(
            self.events
                .iter()
                .map(|e| (e.number, e.description.as_str())),
        )
    }

    pub fn meet_address(&self) -> Address {
        let mut address = self.team.address();
        if let Some(line) = &self.meet.address_line_1 {
            address.line_1 = line.clone();
            address.line_2 = String::new();
        }
        if let Some(city) = &self.meet.city {
            address.city = city.clone();
        }
        if let Some(state) = &self.meet.state {
            address.state = state.clone();
        }
        if let Some(postal) = &self.meet.postal_code {
            address.postal_code = postal.clone();
        }
        address
    }
}

impl Validate for SwimTeamConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("team.full_name", &self.team.full_name)?;
        validate_code("team.lsc", &self.team.lsc, 2, 2)?;
        validate_code("team.code", &self.team.code, 1, 5)?;
        validate_max_len("team.state", &self.team.state, 2)?;
        validate_max_len("team.country", &self.team.country, 3)?;
        validate_max_len("software.contact_phone", &self.software.contact_phone, 12)?;
        validate_code("output.citizen", &self.output.citizen, 3, 3)?;
        validate_url("touchpad.base_url", &self.touchpad.base_url)?;

        if let Some(end) = self.meet.end_date {
            let start = *validate_required_field("meet.start_date", &self.meet.start_date)?;
            if end < start {
                return Err(ConvertError::InvalidConfigValueError {
                    field: "meet.end_date".to_string(),
                    value: end.to_string(),
                    reason: format!("ends before start date {}", start),
                });
            }
        }

        for event in &self.events {
            validate_range("events.number", event.number, 1, 9999)?;
        }
        self.event_table()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::EventSex;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[team]
full_name = "Wild Wood Stingrays"
abbreviation = "Stingrays"
local_swim_committee = "OD"
team_unify_team_code = "WWST"
city = "Reston"

[meet]
name = "Stingrays vs Sharks"
start_date = "2024-06-15"
course = "S"
meet_type = "dual"

[output]
time_style = "clock"

[[events]]
number = 1
description = "Girls 9-10 50 Free"

[[events]]
number = 2
description = "Boys 9-10 50 Free"
"#;

        let config = SwimTeamConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.team.code, "WWST");
        assert_eq!(config.team.lsc, "OD");
        assert_eq!(config.team.state, "VA");
        assert_eq!(config.meet.course, Course::Scm);
        assert_eq!(config.output.time_style, TimeStyle::Clock);
        assert!(config.output.summer_league);
        assert!(config.validate().is_ok());

        let table = config.event_table().unwrap();
        assert_eq!(table.events().len(), 2);
        assert_eq!(table.get(1).unwrap().sex, EventSex::Female);
    }

    #[test]
    fn test_empty_config_is_all_defaults() {
        let config = SwimTeamConfig::from_toml_str("").unwrap();
        assert_eq!(config, SwimTeamConfig::default());
        assert_eq!(config.event_table().unwrap().events().len(), 64);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SDIF_ETL_TEST_TEAM", "WWST");

        let config =
            SwimTeamConfig::from_toml_str("[team]\ncode = \"${SDIF_ETL_TEST_TEAM}\"\n").unwrap();
        assert_eq!(config.team.code, "WWST");

        std::env::remove_var("SDIF_ETL_TEST_TEAM");
    }

    #[test]
    fn test_config_validation() {
        let config = SwimTeamConfig::from_toml_str("[team]\ncode = \"WW-ST\"\n").unwrap();
        assert!(config.validate().is_err());

        let config = SwimTeamConfig::from_toml_str(
            "[meet]\nstart_date = \"2024-06-15\"\nend_date = \"2024-06-14\"\n",
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = SwimTeamConfig::from_toml_str("[meet]\nend_date = \"2024-06-14\"\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConvertError::MissingConfigError { .. })
        ));

        let config = SwimTeamConfig::from_toml_str(
            "[[events]]\nnumber = 3\ndescription = \"200 Medley Freestyle\"\n",
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_toml_is_a_config_error() {
        let err = SwimTeamConfig::from_toml_str("[team\n").unwrap_err();
        assert!(matches!(err, ConvertError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file_and_missing_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[team]\nfull_name = \"File Team\"\ncode = \"FT\"\n")
            .unwrap();
        let config = SwimTeamConfig::load_or_default(temp_file.path()).unwrap();
        assert_eq!(config.team.full_name, "File Team");

        let dir = tempfile::TempDir::new().unwrap();
        let config = SwimTeamConfig::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.team.code, "XXX");
    }

    #[test]
    fn test_meet_address_overrides() {
        let config =
            SwimTeamConfig::from_toml_str("[meet]\naddress_line_1 = \"Pool Road\"\n").unwrap();
        let address = config.meet_address();
        assert_eq!(address.line_1, "Pool Road");
        assert_eq!(address.city, "Ashburn");
    }
}
