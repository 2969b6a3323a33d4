use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stroke {
    Freestyle,
    Backstroke,
    Breaststroke,
    Butterfly,
    IndividualMedley,
    FreeRelay,
    MedleyRelay,
}

impl Stroke {
    pub fn is_relay(self) -> bool {
        matches!(self, Self::FreeRelay | Self::MedleyRelay)
    }

    /// Swimmers per result: one, or four legs for a relay.
    pub fn legs(self) -> usize {
        if self.is_relay() {
            4
        } else {
            1
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Freestyle => "Free",
            Self::Backstroke => "Back",
            Self::Breaststroke => "Breast",
            Self::Butterfly => "Fly",
            Self::IndividualMedley => "IM",
            Self::FreeRelay => "Free Relay",
            Self::MedleyRelay => "Medley Relay",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSex {
    Male,
    Female,
    Mixed,
}

impl EventSex {
    pub fn label(self) -> &'static str {
        match self {
            Self::Male => "Boys",
            Self::Female => "Girls",
            Self::Mixed => "Mixed",
        }
    }
}

/// Inclusive age bracket. `None` on either side means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgeGroup {
    pub min: Option<u8>,
    pub max: Option<u8>,
}

impl AgeGroup {
    pub const OPEN: AgeGroup = AgeGroup {
        min: None,
        max: None,
    };

    pub const fn new(min: Option<u8>, max: Option<u8>) -> Self {
        Self { min, max }
    }

    pub const fn range(min: u8, max: u8) -> Self {
        Self::new(Some(min), Some(max))
    }

    pub const fn and_under(max: u8) -> Self {
        Self::new(None, Some(max))
    }

    pub const fn and_over(min: u8) -> Self {
        Self::new(Some(min), None)
    }

    pub fn contains(self, age: u8) -> bool {
        self.min.map_or(true, |min| age >= min) && self.max.map_or(true, |max| age <= max)
    }

    /// Four-character SDIF event age: `UNOV`, `UN08`, `15OV`, `0910`.
    pub fn code(self) -> String {
        let lower = self.min.map_or("UN".to_string(), |a| format!("{:02}", a));
        let upper = self.max.map_or("OV".to_string(), |a| format!("{:02}", a));
        format!("{}{}", lower, upper)
    }

    pub fn label(self) -> String {
        match (self.min, self.max) {
            (None, None) => "Open".to_string(),
            (None, Some(max)) => format!("{} & Under", max),
            (Some(min), None) => format!("{} & Over", min),
            (Some(min), Some(max)) => format!("{}-{}", min, max),
        }
    }
}

/// What an event description says, field by field. Sex and age bracket are
/// optional because the results portal often leaves them out of per-stroke
/// exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventKey {
    pub sex: Option<EventSex>,
    pub ages: Option<AgeGroup>,
    pub distance: u16,
    pub stroke: Stroke,
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(sex) = self.sex {
            write!(f, "{} ", sex.label())?;
        }
        if let Some(ages) = self.ages {
            write!(f, "{} ", ages.label())?;
        }
        write!(f, "{} {}", self.distance, self.stroke.label())
    }
}

fn age_patterns() -> &'static [(Regex, AgeForm); 5] {
    static PATTERNS: OnceLock<[(Regex, AgeForm); 5]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let build = |p: &str| Regex::new(p).expect("age pattern is a valid regex");
        [
            (build(r"\b(\d{1,2})\s*-\s*(\d{1,2})\b"), AgeForm::Range),
            (build(r"\b(\d{1,2})\s*(?:&|and)\s*(?:under|u)\b"), AgeForm::Under),
            (build(r"\b(\d{1,2})\s*(?:&|and)\s*(?:over|older|o)\b"), AgeForm::Over),
            (build(r"\b(\d{1,2})\s*(?:u|under)\b"), AgeForm::Under),
            (build(r"\bopen\b"), AgeForm::Open),
        ]
    })
}

#[derive(Clone, Copy)]
enum AgeForm {
    Range,
    Under,
    Over,
    Open,
}

/// Pulls the age bracket out of `text`, returning it with the remaining text.
fn take_age_group(text: &str) -> Option<(AgeGroup, String)> {
    for (pattern, form) in age_patterns() {
        let Some(caps) = pattern.captures(text) else {
            continue;
        };
        let number = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u8>().ok());
        let group = match form {
            AgeForm::Range => AgeGroup::new(number(1), number(2)),
            AgeForm::Under => AgeGroup::new(None, number(1)),
            AgeForm::Over => AgeGroup::new(number(1), None),
            AgeForm::Open => AgeGroup::OPEN,
        };
        let whole = caps.get(0)?;
        let mut rest = text.to_string();
        rest.replace_range(whole.range(), " ");
        return Some((group, rest));
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StrokeWord {
    Free,
    Back,
    Breast,
    Fly,
    Medley,
}

fn stroke_word(token: &str) -> Option<StrokeWord> {
    match token {
        "free" | "freestyle" | "fr" => Some(StrokeWord::Free),
        "back" | "backstroke" | "bk" => Some(StrokeWord::Back),
        "breast" | "breaststroke" | "br" => Some(StrokeWord::Breast),
        "fly" | "butterfly" | "bf" | "fl" => Some(StrokeWord::Fly),
        "im" | "medley" => Some(StrokeWord::Medley),
        _ => None,
    }
}

fn sex_word(token: &str) -> Option<EventSex> {
    match token {
        "girls" | "girl" | "female" | "women" | "woman" | "ladies" => Some(EventSex::Female),
        "boys" | "boy" | "male" | "men" | "man" => Some(EventSex::Male),
        "mixed" | "coed" => Some(EventSex::Mixed),
        _ => None,
    }
}

const NOISE_WORDS: &[&str] = &[
    "event", "individual", "m", "meter", "meters", "metre", "metres", "y", "yd", "yds", "yard",
    "yards", "scm", "scy", "lcm",
];

/// Parses `"4x50"`, `"200"` and `"50m"` style distance tokens.
fn distance_token(token: &str) -> Option<u16> {
    if let Some((legs, each)) = token.split_once('x') {
        let legs: u16 = legs.parse().ok()?;
        let each: u16 = each.trim_end_matches(char::is_alphabetic).parse().ok()?;
        return legs.checked_mul(each);
    }
    let digits = token.trim_end_matches(|c: char| matches!(c, 'm' | 'y'));
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Reduces a free-form event description to its fields.
///
/// Case, punctuation and word order are ignored, as are unit words such as
/// "meter". Returns `None` when the distance or stroke is missing, when two
/// distances or conflicting strokes appear, or when an unrecognised word is
/// present: `"200 Medley Freestyle"` does not describe any single event.
pub fn normalize_event_description(description: &str) -> Option<EventKey> {
    let mut text = description.to_lowercase();
    text.retain(|c| c != '\'' && c != '.');
    let text: String = text
        .chars()
        .map(|c| match c {
            '(' | ')' | ',' | '/' | ':' => ' ',
            other => other,
        })
        .collect();

    let (ages, rest) = match take_age_group(&text) {
        Some((group, rest)) => (Some(group), rest),
        None => (None, text),
    };

    let mut sex = None;
    let mut distance = None;
    let mut strokes: Vec<StrokeWord> = Vec::new();
    let mut relay = false;
    let mut medley_relay = false;

    for token in rest.split_whitespace() {
        let token = token.trim_start_matches('#');
        if token.is_empty() || NOISE_WORDS.contains(&token) {
            continue;
        }
        if let Some(s) = sex_word(token) {
            if sex.is_some_and(|seen| seen != s) {
                return None;
            }
            sex = Some(s);
        } else if let Some(d) = distance_token(token) {
            if distance.is_some() {
                return None;
            }
            distance = Some(d);
        } else if let Some(word) = stroke_word(token) {
            if !strokes.contains(&word) {
                strokes.push(word);
            }
        } else if token == "relay" || token == "relays" {
            relay = true;
        } else if token == "mr" {
            relay = true;
            medley_relay = true;
        } else {
            return None;
        }
    }

    let stroke = match (relay, medley_relay, strokes.as_slice()) {
        (true, true, []) | (true, true, [StrokeWord::Medley]) => Stroke::MedleyRelay,
        (true, false, [StrokeWord::Free]) => Stroke::FreeRelay,
        (true, false, [StrokeWord::Medley]) => Stroke::MedleyRelay,
        (false, _, [StrokeWord::Free]) => Stroke::Freestyle,
        (false, _, [StrokeWord::Back]) => Stroke::Backstroke,
        (false, _, [StrokeWord::Breast]) => Stroke::Breaststroke,
        (false, _, [StrokeWord::Fly]) => Stroke::Butterfly,
        (false, _, [StrokeWord::Medley]) => Stroke::IndividualMedley,
        _ => return None,
    };

    Some(EventKey {
        sex,
        ages,
        distance: distance?,
        stroke,
    })
}

/// Key used to decide whether two rows describe the same event: the
/// normalised fields when the description parses, otherwise the trimmed,
/// lower-cased text.
pub fn event_match_key(description: &str) -> String {
    match normalize_event_description(description) {
        Some(key) => key.to_string().to_lowercase(),
        None => description
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase(),
    }
}
