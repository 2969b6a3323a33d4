use crate::config::toml_config::SwimTeamConfig;
use crate::core::identity::{birthdate_for, clean_uss_id, derive_uss_id};
use crate::domain::event::{normalize_event_description, EventSex};
use crate::domain::model::{Gender, RelayRow, ResultRow, ResultStatus, SwimmerName, TeamRef};
use crate::domain::swim_time::SwimTime;
use crate::domain::template::{EventDefinition, EventTable, MatchHint};
use crate::sdif::codes::{
    event_sex_code, stroke_code, TimeCode, ATTACHED, FILE_MEET_RESULTS, ORG_USS, SDIF_VERSION,
};
use crate::sdif::records::{
    Address, EventFields, FileDescription, IndividualEvent, IndividualInfo, Mark, MeetInfo,
    RelayEvent, RelayName, SdifRecord, SwimmerId, TeamId,
};
use crate::sdif::MeetFile;
use crate::utils::error::{ConvertError, Result, RowIssue};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

/// Per-run values that do not come from the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    /// A0 creation date, and the swim date of last resort.
    pub created_on: NaiveDate,
    /// Meet name used when `[meet].name` is not set.
    pub meet_name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeSummary {
    pub teams: usize,
    pub swimmers: usize,
    pub events: usize,
    pub individual_results: usize,
    pub relay_results: usize,
}

#[derive(Debug, Clone)]
pub struct EncodedMeet {
    pub file: MeetFile,
    pub summary: EncodeSummary,
}

#[derive(Debug, Clone)]
struct TeamEntry {
    lsc: String,
    code: String,
    name: String,
    abbreviation: String,
    address: Address,
}

impl TeamEntry {
    /// LSC plus the first four characters of the club code, and the fifth
    /// character when there is one.
    fn sdif_code(&self) -> (String, Option<char>) {
        let head: String = self.code.chars().take(4).collect();
        (format!("{}{}", self.lsc, head), self.code.chars().nth(4))
    }
}

#[derive(Debug, Clone)]
struct Swimmer {
    name: SwimmerName,
    uss_id: Option<String>,
    age: Option<u8>,
    gender: Option<Gender>,
    first_swim: Option<NaiveDate>,
}

type SwimmerKey = (String, String);

/// Teams and swimmers seen during the first pass.
struct Registry {
    home: String,
    teams: BTreeMap<String, TeamEntry>,
    swimmers: BTreeMap<SwimmerKey, Swimmer>,
}

impl Registry {
    fn new(config: &SwimTeamConfig) -> Self {
        let team = &config.team;
        let home = team.code.trim().to_ascii_uppercase();
        let mut teams = BTreeMap::new();
        teams.insert(
            home.clone(),
            TeamEntry {
                lsc: team.lsc.trim().to_ascii_uppercase(),
                code: home.clone(),
                name: team.full_name.clone(),
                abbreviation: team.abbreviation.clone(),
                address: team.address(),
            },
        );
        Self {
            home,
            teams,
            swimmers: BTreeMap::new(),
        }
    }

    fn is_home(&self, raw: &str, team_ref: &TeamRef) -> bool {
        let raw = raw.trim();
        team_ref.code == self.home
            || self.teams.get(&self.home).is_some_and(|t| {
                raw.eq_ignore_ascii_case(&t.name) || raw.eq_ignore_ascii_case(&t.abbreviation)
            })
    }

    /// Club code for a team cell. Empty cells and the home team's own code
    /// or name map to the home team.
    fn team_for(&mut self, raw: Option<&str>) -> String {
        let Some(team_ref) = raw.and_then(TeamRef::parse) else {
            return self.home.clone();
        };
        if raw.is_some_and(|r| self.is_home(r, &team_ref)) {
            return self.home.clone();
        }

        let home_lsc = self.teams[&self.home].lsc.clone();
        let home_address = self.teams[&self.home].address.clone();
        self.teams
            .entry(team_ref.code.clone())
            .or_insert_with(|| {
                let lsc = team_ref.lsc.clone().unwrap_or(home_lsc);
                tracing::debug!("opposing team {}-{}", lsc, team_ref.code);
                TeamEntry {
                    name: format!("{}-{}", lsc, team_ref.code),
                    abbreviation: team_ref.code.clone(),
                    address: Address {
                        state: home_address.state,
                        country: home_address.country,
                        ..Address::default()
                    },
                    lsc,
                    code: team_ref.code.clone(),
                }
            })
            .code
            .clone()
    }

    /// Records a result row's swimmer. Values from the first row win; later
    /// rows only fill gaps.
    fn add_result(&mut self, team: &str, name: &SwimmerName, row: &ResultRow, sex: EventSex) {
        let gender = row.gender.or_else(|| gender_of(sex));
        let swimmer = self
            .swimmers
            .entry((team.to_string(), name.key()))
            .or_insert_with(|| Swimmer {
                name: name.clone(),
                uss_id: None,
                age: None,
                gender: None,
                first_swim: None,
            });
        swimmer.uss_id = swimmer
            .uss_id
            .take()
            .or_else(|| row.uss_id.as_deref().and_then(clean_uss_id));
        swimmer.age = swimmer.age.or(row.age);
        swimmer.gender = swimmer.gender.or(gender);
        swimmer.first_swim = match (swimmer.first_swim, row.date) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
    }

    fn swimmer(&self, team: &str, name: &SwimmerName) -> Option<&Swimmer> {
        self.swimmers.get(&(team.to_string(), name.key()))
    }

    /// A relay leg with no individual result of its own; sex comes from the
    /// event when the event is single-sex.
    fn add_leg(&mut self, team: &str, name: &SwimmerName, sex: EventSex) {
        let key = (team.to_string(), name.key());
        if self.swimmers.contains_key(&key) {
            return;
        }
        tracing::warn!(
            "relay swimmer {} ({}) has no individual result; age and birth date left blank",
            name,
            team
        );
        self.swimmers.insert(
            key,
            Swimmer {
                name: name.clone(),
                uss_id: None,
                age: None,
                gender: gender_of(sex),
                first_swim: None,
            },
        );
    }

    /// Home team first, then the others by code.
    fn ordered_teams(&self) -> Vec<&TeamEntry> {
        let mut teams = vec![&self.teams[&self.home]];
        teams.extend(
            self.teams
                .iter()
                .filter(|(code, _)| **code != self.home)
                .map(|(_, team)| team),
        );
        teams
    }
}

fn gender_of(sex: EventSex) -> Option<Gender> {
    match sex {
        EventSex::Male => Some(Gender::Male),
        EventSex::Female => Some(Gender::Female),
        EventSex::Mixed => None,
    }
}

struct ResolvedResult<'r> {
    team: String,
    name: SwimmerName,
    row: &'r ResultRow,
    event: EventDefinition,
}

struct ResolvedRelay<'r> {
    team: String,
    legs: Vec<SwimmerName>,
    row: &'r RelayRow,
    event: EventDefinition,
}

/// Time-field entry for a finals result.
pub fn finals_mark(status: ResultStatus, time: Option<SwimTime>) -> Mark {
    match (status, time) {
        (ResultStatus::Finished, Some(time)) => Mark::Time(time),
        (ResultStatus::Finished, None) => Mark::Code(TimeCode::NoTime),
        (ResultStatus::Disqualified, _) => Mark::Code(TimeCode::Disqualified),
        (ResultStatus::Scratched, _) => Mark::Code(TimeCode::Scratch),
        (ResultStatus::NoShow, _) => Mark::Code(TimeCode::NoSwim),
        (ResultStatus::DidNotFinish, _) => Mark::Code(TimeCode::DidNotFinish),
    }
}

fn parse_name(raw: &str, row: usize, field: &str) -> Result<SwimmerName> {
    SwimmerName::parse(raw).ok_or_else(|| ConvertError::MalformedInput {
        issues: vec![RowIssue {
            file: PathBuf::new(),
            row,
            field: field.to_string(),
            reason: "empty swimmer name".to_string(),
        }],
    })
}

/// Turns merged rows into an SDIF record stream.
///
/// The first pass resolves every event and registers every team and
/// swimmer, failing on the first row that cannot be placed. The second pass
/// emits one C1 block per team: D0 results in (event number, name) order,
/// each swimmer's first D0 followed by a D3, then E0 relays in (event
/// number, relay letter) order with their F0 legs.
pub struct MeetEncoder<'a> {
    config: &'a SwimTeamConfig,
    events: &'a EventTable,
}

impl<'a> MeetEncoder<'a> {
    pub fn new(config: &'a SwimTeamConfig, events: &'a EventTable) -> Self {
        Self { config, events }
    }

    pub fn encode(
        &self,
        results: &[ResultRow],
        relays: &[RelayRow],
        options: &EncodeOptions,
    ) -> Result<EncodedMeet> {
        let mut registry = Registry::new(self.config);
        let individual = self.resolve_results(&mut registry, results)?;
        let relay_results = self.resolve_relays(&mut registry, relays)?;

        let mut file = MeetFile::new();
        file.push(SdifRecord::FileDescription(self.file_description(options)));
        file.push(SdifRecord::Meet(self.meet_info(results, relays, options)));

        for team in registry.ordered_teams() {
            self.emit_team(&mut file, &registry, team, &individual, &relay_results, options);
        }

        let file = file.finish();
        let counts = file.counts();
        let summary = EncodeSummary {
            teams: counts.teams as usize,
            swimmers: counts.swimmers as usize,
            events: file.event_count(),
            individual_results: counts.d_records as usize,
            relay_results: counts.e_records as usize,
        };
        tracing::info!(
            "encoded {} individual and {} relay result(s) for {} swimmer(s) on {} team(s)",
            summary.individual_results,
            summary.relay_results,
            summary.swimmers,
            summary.teams
        );
        Ok(EncodedMeet { file, summary })
    }

    fn resolve_results<'r>(
        &self,
        registry: &mut Registry,
        rows: &'r [ResultRow],
    ) -> Result<Vec<ResolvedResult<'r>>> {
        let mut resolved = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            let name = parse_name(&row.name, index + 1, "Name")?;
            let team = registry.team_for(row.team.as_deref());
            let known = registry.swimmer(&team, &name);
            let hint = MatchHint {
                sex: row
                    .gender
                    .or_else(|| known.and_then(|s| s.gender))
                    .map(Gender::event_sex),
                age: row.age.or_else(|| known.and_then(|s| s.age)),
            };

            let event = self.events.resolve(&row.event, hint)?;
            if event.stroke.is_relay() {
                return Err(ConvertError::UnknownEvent {
                    description: row.event.trim().to_string(),
                });
            }
            tracing::debug!("{} / \"{}\" -> {}", name, row.event, event.description());

            registry.add_result(&team, &name, row, event.sex);
            resolved.push(ResolvedResult {
                team,
                name,
                row,
                event: event.clone(),
            });
        }
        Ok(resolved)
    }

    fn resolve_relays<'r>(
        &self,
        registry: &mut Registry,
        rows: &'r [RelayRow],
    ) -> Result<Vec<ResolvedRelay<'r>>> {
        let mut resolved = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            let unknown = || ConvertError::UnknownEvent {
                description: row.event.trim().to_string(),
            };
            let key = normalize_event_description(&row.event)
                .filter(|k| k.stroke.is_relay())
                .ok_or_else(unknown)?;

            let team = registry.team_for(row.team.as_deref());
            let expected = key.stroke.legs();
            if row.swimmers.len() != expected {
                return Err(ConvertError::RelayComposition {
                    team: format!("{}-{}", team, row.relay_letter),
                    event: row.event.trim().to_string(),
                    expected,
                    found: row.swimmers.len(),
                });
            }

            let legs = row
                .swimmers
                .iter()
                .map(|leg| parse_name(leg, index + 1, "Swimmers"))
                .collect::<Result<Vec<_>>>()?;
            let event = self
                .events
                .resolve_key(&row.event, &key, relay_hint(registry, &team, &legs))?
                .clone();
            if event.legs() != legs.len() {
                return Err(ConvertError::RelayComposition {
                    team: format!("{}-{}", team, row.relay_letter),
                    event: row.event.trim().to_string(),
                    expected: event.legs(),
                    found: legs.len(),
                });
            }

            for leg in &legs {
                registry.add_leg(&team, leg, event.sex);
            }
            resolved.push(ResolvedRelay {
                team,
                legs,
                row,
                event,
            });
        }
        Ok(resolved)
    }

    fn emit_team(
        &self,
        file: &mut MeetFile,
        registry: &Registry,
        team: &TeamEntry,
        individual: &[ResolvedResult<'_>],
        relays: &[ResolvedRelay<'_>],
        options: &EncodeOptions,
    ) {
        let (team_code, team_code5) = team.sdif_code();
        file.push(SdifRecord::TeamId(TeamId {
            organization: ORG_USS,
            team_code: team_code.clone(),
            name: team.name.clone(),
            abbreviation: team.abbreviation.clone(),
            address: team.address.clone(),
            region: None,
            team_code5,
        }));

        let mut results: Vec<&ResolvedResult> =
            individual.iter().filter(|r| r.team == team.code).collect();
        results.sort_by(|a, b| {
            (a.event.number, a.name.key()).cmp(&(b.event.number, b.name.key()))
        });

        let mut described = HashSet::new();
        for result in results {
            let swim_date = self.swim_date(result.row.date, options);
            let Some(swimmer) = registry.swimmer(&result.team, &result.name) else {
                continue;
            };
            let id = self.swimmer_id(swimmer, result.row.age, swim_date);
            let row = result.row;
            let finals = finals_mark(row.status, row.final_time);

            file.push(SdifRecord::IndividualEvent(IndividualEvent {
                organization: ORG_USS,
                attach_code: ATTACHED,
                event: event_fields(&result.event, swim_date),
                seed_time: row.seed_time.map(Mark::Time),
                seed_course: row.seed_time.map(|_| self.config.meet.course),
                finals_time: Some(finals),
                finals_course: matches!(finals, Mark::Time(_)).then_some(self.config.meet.course),
                finals_place: row.place,
                points: row.points.clone(),
                swimmer: id.clone(),
            }));

            if described.insert(result.name.key()) {
                file.push(SdifRecord::IndividualInfo(IndividualInfo {
                    uss_number: id.uss_number,
                    preferred_first_name: None,
                    summer_league: self.config.output.summer_league,
                }));
            }
        }

        let mut team_relays: Vec<&ResolvedRelay> =
            relays.iter().filter(|r| r.team == team.code).collect();
        team_relays.sort_by_key(|r| (r.event.number, r.row.relay_letter));

        for relay in team_relays {
            let row = relay.row;
            let swim_date = self.swim_date(row.date, options);
            let legs: Vec<SwimmerId> = relay
                .legs
                .iter()
                .filter_map(|leg| registry.swimmer(&relay.team, leg))
                .map(|swimmer| self.swimmer_id(swimmer, None, swim_date))
                .collect();
            let total_age = legs
                .iter()
                .map(|leg| leg.age.map(u16::from))
                .sum::<Option<u16>>();
            let finals = finals_mark(row.status, row.final_time);

            file.push(SdifRecord::RelayEvent(RelayEvent {
                organization: ORG_USS,
                relay_team_name: row.relay_letter.to_ascii_uppercase(),
                team_code: team_code.clone(),
                leg_count: legs.len() as u8,
                event: event_fields(&relay.event, swim_date),
                total_age,
                finals_time: Some(finals),
                finals_course: matches!(finals, Mark::Time(_)).then_some(self.config.meet.course),
                finals_place: row.place,
                points: row.points.clone(),
            }));
            for (order, swimmer) in legs.into_iter().enumerate() {
                file.push(SdifRecord::RelayName(RelayName {
                    organization: ORG_USS,
                    team_code: team_code.clone(),
                    relay_team_name: row.relay_letter.to_ascii_uppercase(),
                    swimmer,
                    finals_order: order as u8 + 1,
                }));
            }
        }
    }

    fn swim_date(&self, row_date: Option<NaiveDate>, options: &EncodeOptions) -> NaiveDate {
        row_date
            .or(self.config.meet.start_date)
            .unwrap_or(options.created_on)
    }

    fn swimmer_id(&self, swimmer: &Swimmer, age: Option<u8>, swim_date: NaiveDate) -> SwimmerId {
        let age = age.or(swimmer.age);
        let birth_reference = swimmer.first_swim.unwrap_or(swim_date);
        let birthdate = birthdate_for(swimmer.uss_id.as_deref(), age, birth_reference);
        let uss_number = swimmer
            .uss_id
            .clone()
            .or_else(|| birthdate.map(|b| derive_uss_id(&swimmer.name, b)))
            .unwrap_or_default();

        SwimmerId {
            name: swimmer.name.to_string(),
            uss_number,
            citizen: self.config.output.citizen.clone(),
            birthdate,
            age,
            sex: swimmer.gender.map(Gender::code),
        }
    }

    fn file_description(&self, options: &EncodeOptions) -> FileDescription {
        let software = &self.config.software;
        FileDescription {
            organization: ORG_USS,
            sdif_version: SDIF_VERSION.to_string(),
            file_code: FILE_MEET_RESULTS.to_string(),
            software_name: software.name.clone(),
            software_version: software.version.clone(),
            contact_name: software.contact_name.clone(),
            contact_phone: software.contact_phone.clone(),
            file_creation: options.created_on,
            submitted_by_lsc: Some(self.config.team.lsc.trim().to_ascii_uppercase()),
        }
    }

    /// Meet dates span the swim dates in the data, falling back to the
    /// configured dates and then the creation date.
    fn meet_info(
        &self,
        results: &[ResultRow],
        relays: &[RelayRow],
        options: &EncodeOptions,
    ) -> MeetInfo {
        let meet = &self.config.meet;
        let dates: Vec<NaiveDate> = results
            .iter()
            .filter_map(|r| r.date)
            .chain(relays.iter().filter_map(|r| r.date))
            .collect();
        let start = dates
            .iter()
            .min()
            .copied()
            .or(meet.start_date)
            .unwrap_or(options.created_on);
        let end = dates
            .iter()
            .max()
            .copied()
            .or(meet.end_date)
            .unwrap_or(start)
            .max(start);

        MeetInfo {
            organization: ORG_USS,
            name: meet.name.clone().unwrap_or_else(|| options.meet_name.clone()),
            address: self.config.meet_address(),
            meet_code: meet.meet_type.code(),
            start,
            end,
            altitude_ft: meet.altitude_ft,
            course: meet.course,
        }
    }
}

fn event_fields(event: &EventDefinition, swim_date: NaiveDate) -> EventFields {
    EventFields {
        event_sex: event_sex_code(event.sex),
        distance: event.distance,
        stroke: stroke_code(event.stroke),
        event_number: event.number,
        event_age: event.ages.code(),
        date_of_swim: swim_date,
    }
}

/// Sex and age hints for a relay: all-girls, all-boys or mixed from the
/// legs' known genders, and the oldest known leg's age.
fn relay_hint(registry: &Registry, team: &str, legs: &[SwimmerName]) -> MatchHint {
    let known: Vec<&Swimmer> = legs
        .iter()
        .filter_map(|leg| registry.swimmer(team, leg))
        .collect();
    let genders: HashSet<Gender> = known.iter().filter_map(|s| s.gender).collect();
    let sex = match (genders.len(), genders.iter().next()) {
        (1, Some(gender)) => Some(gender.event_sex()),
        (0, _) => None,
        _ => Some(EventSex::Mixed),
    };
    MatchHint {
        sex,
        age: known.iter().filter_map(|s| s.age).max(),
    }
}
