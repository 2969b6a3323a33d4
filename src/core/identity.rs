use crate::domain::model::SwimmerName;
use chrono::{Datelike, NaiveDate};

pub const USS_ID_LENGTH: usize = 14;

fn name_part(value: &str, len: usize) -> String {
    let mut part: String = value
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase())
        .take(len)
        .collect();
    while part.len() < len {
        part.push('*');
    }
    part
}

/// Legacy 14-character member ID: birthdate as `MMDDYY`, three letters of
/// the first name, middle initial, four letters of the last name. Short
/// parts are padded with `*`.
pub fn derive_uss_id(name: &SwimmerName, birthdate: NaiveDate) -> String {
    format!(
        "{}{}{}{}",
        birthdate.format("%m%d%y"),
        name_part(&name.first, 3),
        name.middle_initial
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('*'),
        name_part(&name.last, 4)
    )
}

/// Upper-cases and strips whitespace; empty IDs become `None`.
pub fn clean_uss_id(raw: &str) -> Option<String> {
    let id: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .take(USS_ID_LENGTH)
        .collect();
    (!id.is_empty()).then_some(id)
}

/// Birthdate encoded in a member ID's `MMDDYY` prefix. Two-digit years
/// after `swim_year` are read as the previous century.
pub fn birthdate_from_uss_id(uss_id: &str, swim_year: i32) -> Option<NaiveDate> {
    let prefix = uss_id.get(..6)?;
    if !prefix.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let month: u32 = prefix[0..2].parse().ok()?;
    let day: u32 = prefix[2..4].parse().ok()?;
    let yy: i32 = prefix[4..6].parse().ok()?;
    let century = if 2000 + yy <= swim_year { 2000 } else { 1900 };
    NaiveDate::from_ymd_opt(century + yy, month, day)
}

/// Best available birthdate: the ID prefix when it decodes, otherwise
/// January 1 of the swim year minus the swimmer's age.
pub fn birthdate_for(uss_id: Option<&str>, age: Option<u8>, swim_date: NaiveDate) -> Option<NaiveDate> {
    let year = swim_date.year();
    uss_id
        .and_then(|id| birthdate_from_uss_id(id, year))
        .or_else(|| age.and_then(|a| NaiveDate::from_ymd_opt(year - i32::from(a), 1, 1)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_derive_uss_id_pads_short_names() {
        let name = SwimmerName::parse("Doe, Jo").unwrap();
        assert_eq!(derive_uss_id(&name, date(2014, 3, 9)), "030914JO**DOE*");

        let name = SwimmerName::parse("Jane Q Smithson").unwrap();
        assert_eq!(derive_uss_id(&name, date(2013, 12, 1)), "120113JANQSMIT");
    }

    #[test]
    fn test_birthdate_prefers_uss_prefix() {
        let swim = date(2024, 6, 15);
        assert_eq!(
            birthdate_for(Some("010114JANXDOEX"), Some(10), swim),
            Some(date(2014, 1, 1))
        );
        assert_eq!(
            birthdate_for(Some("063099ABCDEFGH"), None, swim),
            Some(date(1999, 6, 30))
        );
        assert_eq!(birthdate_for(Some("ABC"), Some(10), swim), Some(date(2014, 1, 1)));
        assert_eq!(birthdate_for(None, None, swim), None);
        assert_eq!(birthdate_for(Some("139914XXXXXXXX"), None, swim), None);
    }

    #[test]
    fn test_clean_uss_id() {
        assert_eq!(clean_uss_id(" 0101 14janxdoex "), Some("010114JANXDOEX".to_string()));
        assert_eq!(clean_uss_id("  "), None);
    }
}
