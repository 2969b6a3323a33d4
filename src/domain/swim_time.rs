use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A race time in whole hundredths of a second. Serialised as its clock
/// text (`"1:05.20"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SwimTime(u32);

impl SwimTime {
    pub fn from_hundredths(hundredths: u32) -> Self {
        Self(hundredths)
    }

    pub fn hundredths(self) -> u32 {
        self.0
    }

    /// Right-justified `m:ss.hh` / `ss.hh`, the form the results portal shows.
    pub fn to_clock(self) -> String {
        let minutes = self.0 / 6000;
        let seconds = (self.0 % 6000) / 100;
        let hundredths = self.0 % 100;
        if minutes > 0 {
            format!("{}:{:02}.{:02}", minutes, seconds, hundredths)
        } else {
            format!("{}.{:02}", seconds, hundredths)
        }
    }
}

impl fmt::Display for SwimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_clock())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTimeError(pub String);

impl fmt::Display for ParseTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a swim time", self.0)
    }
}

impl std::error::Error for ParseTimeError {}

impl FromStr for SwimTime {
    type Err = ParseTimeError;

    /// Accepts `35.67`, `1:05.2`, `1:05`, `35`, with an optional trailing
    /// course letter (`35.67Y`).
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let err = || ParseTimeError(raw.to_string());
        let text = raw
            .trim()
            .trim_end_matches(|c: char| matches!(c, 'Y' | 'y' | 'S' | 's' | 'L' | 'l'));
        if text.is_empty() {
            return Err(err());
        }

        let (minutes, rest) = match text.split_once(':') {
            Some((m, rest)) => (m.parse::<u32>().map_err(|_| err())?, rest),
            None => (0, text),
        };
        let (seconds, fraction) = match rest.split_once('.') {
            Some((s, f)) => (s, f),
            None => (rest, ""),
        };
        let seconds: u32 = seconds.parse().map_err(|_| err())?;
        if minutes > 0 && seconds >= 60 {
            return Err(err());
        }
        if fraction.len() > 2 || !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(err());
        }
        let hundredths = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<u32>().map_err(|_| err())? * 10,
            _ => fraction.parse::<u32>().map_err(|_| err())?,
        };

        minutes
            .checked_mul(6000)
            .and_then(|m| seconds.checked_mul(100)?.checked_add(m))
            .and_then(|t| t.checked_add(hundredths))
            .map(Self)
            .ok_or_else(err)
    }
}

impl TryFrom<String> for SwimTime {
    type Error = ParseTimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SwimTime> for String {
    fn from(time: SwimTime) -> Self {
        time.to_clock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seconds_only() {
        let t: SwimTime = "35.67".parse().unwrap();
        assert_eq!(t.hundredths(), 3567);
    }

    #[test]
    fn test_parse_minutes_and_tenths() {
        let t: SwimTime = "1:05.2".parse().unwrap();
        assert_eq!(t.hundredths(), 6520);
        assert_eq!(t.to_clock(), "1:05.20");
    }

    #[test]
    fn test_parse_course_suffix() {
        let t: SwimTime = " 28.04Y ".parse().unwrap();
        assert_eq!(t.hundredths(), 2804);
    }

    #[test]
    fn test_rejects_status_codes_and_garbage() {
        assert!("DQ".parse::<SwimTime>().is_err());
        assert!("".parse::<SwimTime>().is_err());
        assert!("1:75.00".parse::<SwimTime>().is_err());
        assert!("35.678".parse::<SwimTime>().is_err());
    }

    #[test]
    fn test_oversized_times_are_rejected() {
        assert!("50000000".parse::<SwimTime>().is_err());
        assert!("99999999:00.00".parse::<SwimTime>().is_err());
        assert_eq!(
            "42949672.95".parse::<SwimTime>().unwrap().hundredths(),
            u32::MAX
        );
    }

    #[test]
    fn test_serde_uses_clock_text() {
        let t = SwimTime::from_hundredths(6520);
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"1:05.20\"");
        let back: SwimTime = serde_json::from_str("\"1:05.20\"").unwrap();
        assert_eq!(back, t);
        assert!(serde_json::from_str::<SwimTime>("\"fast\"").is_err());
    }

    #[test]
    fn test_clock_under_a_minute() {
        assert_eq!(SwimTime::from_hundredths(3567).to_string(), "35.67");
        assert_eq!(SwimTime::from_hundredths(905).to_string(), "9.05");
    }
}
