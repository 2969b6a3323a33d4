use crate::domain::model::{Gender, RelayRow, ResultRow, ResultStatus, SheetRow, Table};
use crate::domain::swim_time::SwimTime;
use crate::utils::error::{ConvertError, Result, RowIssue};
use chrono::NaiveDate;

/// A logical column and the header spellings that mean it. Aliases are
/// compared after [`normalize_header`].
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub canonical: &'static str,
    pub aliases: &'static [&'static str],
}

pub const NAME: ColumnSpec = ColumnSpec {
    canonical: "Name",
    aliases: &["name", "athlete name", "athlete", "swimmer", "swimmer name"],
};
pub const USS_ID: ColumnSpec = ColumnSpec {
    canonical: "USS ID",
    aliases: &["uss id", "uss#", "uss", "ussn", "usa swimming id", "member id"],
};
pub const AGE: ColumnSpec = ColumnSpec {
    canonical: "Age",
    aliases: &["age", "eventage current", "event age", "age at meet"],
};
pub const GENDER: ColumnSpec = ColumnSpec {
    canonical: "Gender",
    aliases: &["gender", "sex"],
};
pub const TEAM: ColumnSpec = ColumnSpec {
    canonical: "Team",
    aliases: &["team", "lsc-team", "club", "team code"],
};
pub const EVENT: ColumnSpec = ColumnSpec {
    canonical: "Event",
    aliases: &["event", "event name", "event description"],
};
pub const DATE: ColumnSpec = ColumnSpec {
    canonical: "Date",
    aliases: &["date", "date of sport", "swim date", "meet date"],
};
pub const SEED_TIME: ColumnSpec = ColumnSpec {
    canonical: "Seed Time",
    aliases: &["seed time", "seed", "entry time"],
};
pub const FINAL_TIME: ColumnSpec = ColumnSpec {
    canonical: "Final Time",
    aliases: &["final time", "finals time", "final", "finals", "time"],
};
pub const PLACE: ColumnSpec = ColumnSpec {
    canonical: "Place",
    aliases: &["place", "finals pos", "pos", "finals place", "rank"],
};
pub const POINTS: ColumnSpec = ColumnSpec {
    canonical: "Points",
    aliases: &["points", "pts", "finals points"],
};
pub const STATUS: ColumnSpec = ColumnSpec {
    canonical: "Status",
    aliases: &["status", "result status"],
};
pub const RELAY: ColumnSpec = ColumnSpec {
    canonical: "Relay",
    aliases: &["relay team", "relay", "relay name", "relay letter"],
};
pub const SWIMMERS: ColumnSpec = ColumnSpec {
    canonical: "Swimmers",
    aliases: &["swimmers", "relay swimmers", "athletes", "legs"],
};

/// Column order of the consolidated individual-results table.
pub const RESULT_COLUMNS: [ColumnSpec; 12] = [
    NAME, USS_ID, AGE, GENDER, TEAM, EVENT, DATE, SEED_TIME, FINAL_TIME, PLACE, POINTS, STATUS,
];

pub fn result_headers() -> Vec<&'static str> {
    RESULT_COLUMNS.iter().map(|c| c.canonical).collect()
}

/// Lower-cases and collapses whitespace, so `"Athlete\nName"` and
/// `"athlete name"` compare equal.
pub fn normalize_header(header: &str) -> String {
    header
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches(':')
        .to_lowercase()
}

fn find_column(table: &Table, spec: &ColumnSpec) -> Option<String> {
    let canonical = normalize_header(spec.canonical);
    table
        .headers
        .iter()
        .find(|h| {
            let h = normalize_header(h);
            h == canonical || spec.aliases.contains(&h.as_str())
        })
        .cloned()
}

fn require_column(table: &Table, spec: &ColumnSpec) -> Result<String> {
    find_column(table, spec).ok_or_else(|| ConvertError::MissingField {
        file: table.source.clone(),
        column: spec.canonical.to_string(),
    })
}

fn first_line(value: &str) -> &str {
    value.lines().map(str::trim).find(|l| !l.is_empty()).unwrap_or("")
}

/// Non-empty lines joined by single spaces: `"Female (9-10) \n50 Free"`
/// becomes `"Female (9-10) 50 Free"`.
fn joined_lines(value: &str) -> String {
    value
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collects every bad cell of one row.
struct RowReader<'a> {
    table: &'a Table,
    row: &'a SheetRow,
    issues: Vec<RowIssue>,
}

impl<'a> RowReader<'a> {
    fn new(table: &'a Table, row: &'a SheetRow) -> Self {
        Self {
            table,
            row,
            issues: Vec::new(),
        }
    }

    fn raw(&self, column: &Option<String>) -> &'a str {
        column
            .as_deref()
            .and_then(|c| self.row.get(c))
            .unwrap_or("")
            .trim()
    }

    fn issue(&mut self, field: &str, reason: impl Into<String>) {
        self.issues.push(RowIssue {
            file: self.table.source.clone(),
            row: self.row.number,
            field: field.to_string(),
            reason: reason.into(),
        });
    }

    fn required(&mut self, column: &Option<String>, spec: &ColumnSpec) -> String {
        let value = first_line(self.raw(column)).to_string();
        if value.is_empty() {
            self.issue(spec.canonical, "empty");
        }
        value
    }

    /// Event cells wrap across lines; every line is part of the value.
    fn event(&mut self, column: &Option<String>) -> String {
        let value = joined_lines(self.raw(column));
        if value.is_empty() {
            self.issue(EVENT.canonical, "empty");
        }
        value
    }

    fn optional_text(&self, column: &Option<String>) -> Option<String> {
        let value = first_line(self.raw(column));
        (!value.is_empty()).then(|| value.to_string())
    }

    fn age(&mut self, column: &Option<String>) -> Option<u8> {
        let value = first_line(self.raw(column));
        if value.is_empty() {
            return None;
        }
        match value.parse::<u8>() {
            Ok(age) if age <= 99 => Some(age),
            _ => {
                self.issue(AGE.canonical, format!("'{}' is not an age", value));
                None
            }
        }
    }

    fn gender(&mut self, column: &Option<String>) -> Option<Gender> {
        let value = first_line(self.raw(column));
        if value.is_empty() {
            return None;
        }
        let gender = Gender::parse(value);
        if gender.is_none() {
            self.issue(GENDER.canonical, format!("'{}' is not M or F", value));
        }
        gender
    }

    fn date(&mut self, column: &Option<String>) -> Option<NaiveDate> {
        let value = first_line(self.raw(column));
        if value.is_empty() {
            return None;
        }
        let date = parse_date(value);
        if date.is_none() {
            self.issue(DATE.canonical, format!("'{}' is not a date", value));
        }
        date
    }

    fn seed_time(&mut self, column: &Option<String>) -> Option<SwimTime> {
        let value = first_line(self.raw(column));
        if value.is_empty() || value.eq_ignore_ascii_case("NT") {
            return None;
        }
        match value.parse::<SwimTime>() {
            Ok(time) => Some(time),
            Err(e) => {
                self.issue(SEED_TIME.canonical, e.to_string());
                None
            }
        }
    }

    /// A final-time cell holds either a time or a status marker.
    fn final_time(&mut self, column: &Option<String>) -> (Option<SwimTime>, ResultStatus) {
        let value = first_line(self.raw(column));
        if let Some(status) = ResultStatus::parse(value) {
            return (None, status);
        }
        match value.parse::<SwimTime>() {
            Ok(time) => (Some(time), ResultStatus::Finished),
            Err(e) => {
                self.issue(FINAL_TIME.canonical, e.to_string());
                (None, ResultStatus::Finished)
            }
        }
    }

    fn status(&mut self, column: &Option<String>, from_time: ResultStatus) -> ResultStatus {
        let value = first_line(self.raw(column));
        match ResultStatus::parse(value) {
            Some(ResultStatus::Finished) => from_time,
            Some(status) => status,
            None => {
                self.issue(STATUS.canonical, format!("unknown status '{}'", value));
                from_time
            }
        }
    }

    fn place(&mut self, column: &Option<String>) -> Option<u16> {
        let value = first_line(self.raw(column));
        let digits = value
            .trim_end_matches('*')
            .trim_end_matches(|c: char| c.is_ascii_alphabetic());
        if digits.is_empty() || digits == "-" {
            return None;
        }
        match digits.parse::<u16>() {
            Ok(place) => Some(place),
            Err(_) => {
                self.issue(PLACE.canonical, format!("'{}' is not a place", value));
                None
            }
        }
    }

    fn points(&mut self, column: &Option<String>) -> Option<String> {
        let value = first_line(self.raw(column));
        if value.is_empty() || value == "-" {
            return None;
        }
        if value.parse::<f64>().is_ok_and(|p| p >= 0.0) {
            Some(value.to_string())
        } else {
            self.issue(POINTS.canonical, format!("'{}' is not a points value", value));
            None
        }
    }

    fn finish<T>(self, value: T) -> std::result::Result<T, Vec<RowIssue>> {
        if self.issues.is_empty() {
            Ok(value)
        } else {
            Err(self.issues)
        }
    }
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.split_whitespace().next()?;
    ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%m-%d-%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

/// Header text in `table` for each individual-results column.
#[derive(Debug, Clone)]
pub struct ResultColumns {
    name: Option<String>,
    uss_id: Option<String>,
    age: Option<String>,
    gender: Option<String>,
    team: Option<String>,
    event: Option<String>,
    date: Option<String>,
    seed_time: Option<String>,
    final_time: Option<String>,
    place: Option<String>,
    points: Option<String>,
    status: Option<String>,
}

impl ResultColumns {
    /// Fails with `MissingField` when a row could not be identified at all.
    pub fn locate(table: &Table) -> Result<Self> {
        Ok(Self {
            name: Some(require_column(table, &NAME)?),
            event: Some(require_column(table, &EVENT)?),
            uss_id: find_column(table, &USS_ID),
            age: find_column(table, &AGE),
            gender: find_column(table, &GENDER),
            team: find_column(table, &TEAM),
            date: find_column(table, &DATE),
            seed_time: find_column(table, &SEED_TIME),
            final_time: find_column(table, &FINAL_TIME),
            place: find_column(table, &PLACE),
            points: find_column(table, &POINTS),
            status: find_column(table, &STATUS),
        })
    }

    pub fn parse_row(&self, table: &Table, row: &SheetRow) -> std::result::Result<ResultRow, Vec<RowIssue>> {
        let mut reader = RowReader::new(table, row);

        // The portal puts the USS ID on the second line of the name cell.
        let name_cell = reader.raw(&self.name);
        let embedded_id = name_cell
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .nth(1)
            .map(str::to_string);

        let name = reader.required(&self.name, &NAME);
        let event = reader.event(&self.event);
        let uss_id = reader.optional_text(&self.uss_id).or(embedded_id);
        let age = reader.age(&self.age);
        let gender = reader.gender(&self.gender);
        let team = reader.optional_text(&self.team);
        let date = reader.date(&self.date);
        let seed_time = reader.seed_time(&self.seed_time);
        let (final_time, from_time) = reader.final_time(&self.final_time);
        let status = reader.status(&self.status, from_time);
        let place = reader.place(&self.place);
        let points = reader.points(&self.points);

        reader.finish(ResultRow {
            name,
            uss_id,
            age,
            gender,
            team,
            event,
            date,
            seed_time,
            final_time,
            place,
            points,
            status,
        })
    }
}

/// Parses every data row of an individual-results table. Missing key
/// columns fail immediately; bad cells are returned so the caller can report
/// them together with other files' problems.
pub fn parse_result_rows(table: &Table) -> Result<(Vec<ResultRow>, Vec<RowIssue>)> {
    let columns = ResultColumns::locate(table)?;
    let mut rows = Vec::with_capacity(table.len());
    let mut issues = Vec::new();
    for row in &table.rows {
        match columns.parse_row(table, row) {
            Ok(parsed) => rows.push(parsed),
            Err(mut bad) => issues.append(&mut bad),
        }
    }
    Ok((rows, issues))
}

/// Cell values of `row` in [`RESULT_COLUMNS`] order.
pub fn result_row_cells(row: &ResultRow) -> Vec<String> {
    vec![
        row.name.clone(),
        row.uss_id.clone().unwrap_or_default(),
        row.age.map(|a| a.to_string()).unwrap_or_default(),
        row.gender.map(|g| g.code().to_string()).unwrap_or_default(),
        row.team.clone().unwrap_or_default(),
        row.event.clone(),
        row.date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        row.seed_time.map(|t| t.to_clock()).unwrap_or_default(),
        row.final_time.map(|t| t.to_clock()).unwrap_or_default(),
        row.place.map(|p| p.to_string()).unwrap_or_default(),
        row.points.clone().unwrap_or_default(),
        row.status.label().to_string(),
    ]
}

/// Leg columns such as `Swimmer 1` .. `Swimmer 4`, in leg order.
fn leg_columns(table: &Table) -> Vec<String> {
    let mut legs: Vec<(u8, String)> = table
        .headers
        .iter()
        .filter_map(|h| {
            let normalized = normalize_header(h);
            let (word, number) = normalized.rsplit_once(' ')?;
            if !matches!(word, "swimmer" | "leg" | "athlete") {
                return None;
            }
            Some((number.parse().ok()?, h.clone()))
        })
        .collect();
    legs.sort();
    legs.into_iter().map(|(_, h)| h).collect()
}

fn clean_leg(name: &str) -> String {
    name.trim()
        .trim_start_matches('»')
        .trim_end_matches('»')
        .trim()
        .to_string()
}

/// Splits a relay cell's first line (`WWST-A`, `OD-WWST-A`, `A`) into the
/// team prefix and relay letter.
fn split_relay_label(label: &str) -> (Option<String>, Option<char>) {
    let label = label.trim();
    let letter = label
        .chars()
        .last()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase());
    let team = match label.rsplit_once('-') {
        Some((team, tail)) if tail.trim().chars().count() == 1 && !team.trim().is_empty() => {
            Some(team.trim().to_string())
        }
        _ => None,
    };
    (team, letter)
}

/// Parses a relay-results table. Legs come from a `Swimmers` column, from
/// numbered leg columns, or from the lines under the relay label in the
/// relay cell.
pub fn parse_relay_rows(table: &Table) -> Result<(Vec<RelayRow>, Vec<RowIssue>)> {
    let event_col = Some(require_column(table, &EVENT)?);
    let team_col = find_column(table, &TEAM);
    let relay_col = find_column(table, &RELAY).or_else(|| team_col.clone());
    if relay_col.is_none() {
        return Err(ConvertError::MissingField {
            file: table.source.clone(),
            column: RELAY.canonical.to_string(),
        });
    }
    let swimmers_col = find_column(table, &SWIMMERS);
    let legs_cols = leg_columns(table);
    let date_col = find_column(table, &DATE);
    let final_col = find_column(table, &FINAL_TIME);
    let place_col = find_column(table, &PLACE);
    let points_col = find_column(table, &POINTS);
    let status_col = find_column(table, &STATUS);

    let mut relays = Vec::new();
    let mut issues = Vec::new();

    for row in &table.rows {
        let mut reader = RowReader::new(table, row);
        let event = reader.event(&event_col);

        let relay_cell = reader.raw(&relay_col);
        let mut lines = relay_cell.lines().map(str::trim).filter(|l| !l.is_empty());
        let label = lines.next().unwrap_or("");
        let (label_team, letter) = split_relay_label(label);
        let cell_legs: Vec<String> = lines.map(clean_leg).filter(|l| !l.is_empty()).collect();

        let swimmers: Vec<String> = if let Some(col) = &swimmers_col {
            row.get(col)
                .unwrap_or("")
                .split(['\n', ';'])
                .map(clean_leg)
                .filter(|l| !l.is_empty())
                .collect()
        } else if !legs_cols.is_empty() {
            legs_cols
                .iter()
                .filter_map(|c| row.get(c))
                .map(clean_leg)
                .filter(|l| !l.is_empty())
                .collect()
        } else {
            cell_legs
        };

        let team = match (&team_col, &relay_col) {
            (Some(t), Some(r)) if t != r => reader.optional_text(&team_col),
            _ => label_team,
        };
        let relay_letter = match letter {
            Some(letter) => letter,
            None => {
                reader.issue(RELAY.canonical, format!("no relay letter in '{}'", label));
                'A'
            }
        };
        let date = reader.date(&date_col);
        let (final_time, from_time) = reader.final_time(&final_col);
        let status = reader.status(&status_col, from_time);
        let place = reader.place(&place_col);
        let points = reader.points(&points_col);

        match reader.finish(RelayRow {
            team,
            relay_letter,
            event,
            swimmers,
            date,
            final_time,
            place,
            points,
            status,
        }) {
            Ok(relay) => relays.push(relay),
            Err(mut bad) => issues.append(&mut bad),
        }
    }

    Ok((relays, issues))
}
