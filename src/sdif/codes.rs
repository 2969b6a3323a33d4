//! SDIF v3 code tables used by this crate.

use crate::domain::event::{EventSex, Stroke};
use serde::{Deserialize, Serialize};

/// ORG Code 001: USA Swimming.
pub const ORG_USS: char = '1';
/// FILE Code 003: meet results.
pub const FILE_MEET_RESULTS: &str = "02";
pub const SDIF_VERSION: &str = "V3";
/// ATTACH Code 016: attached to the team.
pub const ATTACHED: char = 'A';
pub const CITIZEN_USA: &str = "USA";

/// STROKE Code 012.
pub fn stroke_code(stroke: Stroke) -> u8 {
    match stroke {
        Stroke::Freestyle => 1,
        Stroke::Backstroke => 2,
        Stroke::Breaststroke => 3,
        Stroke::Butterfly => 4,
        Stroke::IndividualMedley => 5,
        Stroke::FreeRelay => 6,
        Stroke::MedleyRelay => 7,
    }
}

/// EVENT SEX Code 011.
pub fn event_sex_code(sex: EventSex) -> char {
    match sex {
        EventSex::Male => 'M',
        EventSex::Female => 'F',
        EventSex::Mixed => 'X',
    }
}

/// COURSE Code 013.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Course {
    #[default]
    #[serde(alias = "S", alias = "short_meters")]
    Scm,
    #[serde(alias = "Y", alias = "yards")]
    Scy,
    #[serde(alias = "L", alias = "long_meters")]
    Lcm,
}

impl Course {
    pub fn code(self) -> char {
        match self {
            Self::Scm => 'S',
            Self::Scy => 'Y',
            Self::Lcm => 'L',
        }
    }
}

/// MEET Code 005.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetType {
    Invitational,
    Regional,
    LscChampionship,
    Zone,
    ZoneChampionship,
    NationalChampionship,
    Juniors,
    Seniors,
    #[default]
    Dual,
    TimeTrials,
    International,
    Open,
    League,
}

impl MeetType {
    pub fn code(self) -> char {
        match self {
            Self::Invitational => '1',
            Self::Regional => '2',
            Self::LscChampionship => '3',
            Self::Zone => '4',
            Self::ZoneChampionship => '5',
            Self::NationalChampionship => '6',
            Self::Juniors => '7',
            Self::Seniors => '8',
            Self::Dual => '9',
            Self::TimeTrials => '0',
            Self::International => 'A',
            Self::Open => 'B',
            Self::League => 'C',
        }
    }
}

/// Time-field markers that stand in for a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeCode {
    NoTime,
    NoSwim,
    DidNotFinish,
    Disqualified,
    Scratch,
}

impl TimeCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoTime => "NT",
            Self::NoSwim => "NS",
            Self::DidNotFinish => "DNF",
            Self::Disqualified => "DQ",
            Self::Scratch => "SCR",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "NT" => Some(Self::NoTime),
            "NS" => Some(Self::NoSwim),
            "DNF" => Some(Self::DidNotFinish),
            "DQ" => Some(Self::Disqualified),
            "SCR" => Some(Self::Scratch),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_accepts_letters_and_names() {
        #[derive(Deserialize)]
        struct Wrap {
            course: Course,
        }
        let w: Wrap = toml::from_str("course = \"S\"").unwrap();
        assert_eq!(w.course, Course::Scm);
        let w: Wrap = toml::from_str("course = \"scy\"").unwrap();
        assert_eq!(w.course.code(), 'Y');
    }

    #[test]
    fn test_meet_type_codes() {
        assert_eq!(MeetType::default().code(), '9');
        #[derive(Deserialize)]
        struct Wrap {
            meet_type: MeetType,
        }
        let w: Wrap = toml::from_str("meet_type = \"time_trials\"").unwrap();
        assert_eq!(w.meet_type.code(), '0');
    }

    #[test]
    fn test_time_codes() {
        for code in ["NT", "NS", "DNF", "DQ", "SCR"] {
            assert_eq!(TimeCode::parse(code).unwrap().as_str(), code);
        }
        assert!(TimeCode::parse("35.67").is_none());
    }
}
