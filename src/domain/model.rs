use crate::domain::event::EventSex;
use crate::domain::swim_time::SwimTime;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "m" | "male" | "boy" | "boys" => Some(Self::Male),
            "f" | "female" | "girl" | "girls" | "w" => Some(Self::Female),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            Self::Male => 'M',
            Self::Female => 'F',
        }
    }

    pub fn event_sex(self) -> EventSex {
        match self {
            Self::Male => EventSex::Male,
            Self::Female => EventSex::Female,
        }
    }
}

/// Outcome of a swim other than a plain finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ResultStatus {
    #[default]
    Finished,
    Disqualified,
    Scratched,
    NoShow,
    DidNotFinish,
}

impl ResultStatus {
    /// Reads the markers the results portal and SDIF both use. An empty cell,
    /// `OK` and `NT` are all plain finishes.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "" | "OK" | "NT" | "FINISHED" => Some(Self::Finished),
            "DQ" | "DSQ" | "DISQUALIFIED" => Some(Self::Disqualified),
            "SCR" | "SCRATCH" | "SCRATCHED" => Some(Self::Scratched),
            "NS" | "NO SHOW" | "NOSHOW" => Some(Self::NoShow),
            "DNF" => Some(Self::DidNotFinish),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Finished => "",
            Self::Disqualified => "DQ",
            Self::Scratched => "SCR",
            Self::NoShow => "NS",
            Self::DidNotFinish => "DNF",
        }
    }
}

/// A swimmer name split the way SDIF wants it: `Last, First M`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SwimmerName {
    pub last: String,
    pub first: String,
    pub middle_initial: Option<char>,
}

impl SwimmerName {
    /// Accepts `Last, First M` and `First [M] Last`. A single word is taken
    /// as the last name.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if raw.is_empty() {
            return None;
        }

        let (last, given) = match raw.split_once(',') {
            Some((last, given)) => (last.trim().to_string(), given.trim().to_string()),
            None => match raw.rsplit_once(' ') {
                Some((given, last)) => (last.to_string(), given.to_string()),
                None => (raw.clone(), String::new()),
            },
        };

        let mut words: Vec<&str> = given.split_whitespace().collect();
        let middle_initial = if words.len() > 1 && words.last().is_some_and(|w| is_initial(w)) {
            words
                .pop()
                .and_then(|w| w.chars().next())
                .map(|c| c.to_ascii_uppercase())
        } else {
            None
        };

        Some(Self {
            last,
            first: words.join(" "),
            middle_initial,
        })
    }

    /// Lower-cased comparison form used to match the same swimmer across files.
    pub fn key(&self) -> String {
        self.to_string().to_lowercase()
    }
}

fn is_initial(word: &str) -> bool {
    let letters: Vec<char> = word.trim_end_matches('.').chars().collect();
    letters.len() == 1 && letters[0].is_alphabetic()
}

impl fmt::Display for SwimmerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.last)?;
        if !self.first.is_empty() {
            write!(f, ", {}", self.first)?;
        }
        if let Some(initial) = self.middle_initial {
            write!(f, " {}", initial)?;
        }
        Ok(())
    }
}

/// One swimmer's result in one individual event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    pub name: String,
    pub uss_id: Option<String>,
    pub age: Option<u8>,
    pub gender: Option<Gender>,
    pub team: Option<String>,
    pub event: String,
    pub date: Option<NaiveDate>,
    pub seed_time: Option<SwimTime>,
    pub final_time: Option<SwimTime>,
    pub place: Option<u16>,
    pub points: Option<String>,
    pub status: ResultStatus,
}

/// One relay team's result in one relay event. `swimmers` is in leg order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayRow {
    pub team: Option<String>,
    pub relay_letter: char,
    pub event: String,
    pub swimmers: Vec<String>,
    pub date: Option<NaiveDate>,
    pub final_time: Option<SwimTime>,
    pub place: Option<u16>,
    pub points: Option<String>,
    pub status: ResultStatus,
}

/// A team reference as it appears in an export: `WWST` or `OD-WWST`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TeamRef {
    pub lsc: Option<String>,
    pub code: String,
}

impl TeamRef {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let (lsc, code) = match raw.split_once('-') {
            Some((lsc, code)) if !code.trim().is_empty() => {
                (Some(lsc.trim().to_ascii_uppercase()), code.trim())
            }
            _ => (None, raw),
        };
        Some(Self {
            lsc,
            code: code.to_ascii_uppercase(),
        })
    }
}

/// One worksheet: header row plus data rows keyed by header text.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub source: PathBuf,
    pub headers: Vec<String>,
    pub rows: Vec<SheetRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetRow {
    /// 1-based data row index (header excluded).
    pub number: usize,
    pub cells: BTreeMap<String, String>,
}

impl SheetRow {
    pub fn get(&self, header: &str) -> Option<&str> {
        self.cells.get(header).map(String::as_str)
    }
}

impl Table {
    pub fn from_records(source: PathBuf, headers: Vec<String>, records: Vec<Vec<String>>) -> Self {
        let rows = records
            .into_iter()
            .enumerate()
            .filter(|(_, cells)| cells.iter().any(|c| !c.trim().is_empty()))
            .map(|(i, cells)| SheetRow {
                number: i + 1,
                cells: headers
                    .iter()
                    .cloned()
                    .zip(cells.into_iter().chain(std::iter::repeat(String::new())))
                    .collect(),
            })
            .collect();
        Self {
            source,
            headers,
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
