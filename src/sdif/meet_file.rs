use crate::sdif::codes::{FILE_MEET_RESULTS, ORG_USS};
use crate::sdif::layout::TimeStyle;
use crate::sdif::records::{FileTerminator, RecordCounts, SdifRecord};
use crate::utils::error::Result;
use std::collections::BTreeSet;

/// An ordered SDIF record stream, held in memory until it is complete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeetFile {
    records: Vec<SdifRecord>,
}

impl MeetFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: SdifRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[SdifRecord] {
        &self.records
    }

    /// Totals over the records pushed so far. Swimmers are counted once
    /// per team block (the records after each C1), whether they appear on
    /// D0 or F0 records. Clubs whose SDIF codes share a prefix stay apart.
    pub fn counts(&self) -> RecordCounts {
        let mut counts = RecordCounts::default();
        let mut swimmers = BTreeSet::new();
        let mut team_block = 0usize;

        for record in &self.records {
            match record {
                SdifRecord::Meet(_) => {
                    counts.b_records += 1;
                    counts.meets += 1;
                }
                SdifRecord::TeamId(_) => {
                    counts.c_records += 1;
                    counts.teams += 1;
                    team_block += 1;
                }
                SdifRecord::IndividualEvent(d0) => {
                    counts.d_records += 1;
                    swimmers.insert((team_block, d0.swimmer.name.clone()));
                }
                SdifRecord::RelayEvent(_) => counts.e_records += 1,
                SdifRecord::RelayName(f0) => {
                    counts.f_records += 1;
                    swimmers.insert((team_block, f0.swimmer.name.clone()));
                }
                SdifRecord::FileDescription(_)
                | SdifRecord::IndividualInfo(_)
                | SdifRecord::FileTerminator(_) => {}
            }
        }
        counts.swimmers = swimmers.len() as u32;
        counts
    }

    /// Distinct event numbers with at least one result.
    pub fn event_count(&self) -> usize {
        self.records
            .iter()
            .filter_map(|r| match r {
                SdifRecord::IndividualEvent(d0) => Some(d0.event.event_number),
                SdifRecord::RelayEvent(e0) => Some(e0.event.event_number),
                _ => None,
            })
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Appends the Z0 trailer, computed from the records already pushed.
    pub fn finish(mut self) -> Self {
        let counts = self.counts();
        let notes = format!(
            "{} EVENTS {} RESULTS",
            self.event_count(),
            counts.d_records + counts.e_records
        );
        self.push(SdifRecord::FileTerminator(FileTerminator {
            organization: ORG_USS,
            file_code: FILE_MEET_RESULTS.to_string(),
            notes,
            counts,
        }));
        self
    }

    /// Every record as a fixed-width line, each ended by CRLF.
    pub fn render(&self, style: TimeStyle) -> Result<String> {
        let mut out = String::with_capacity(self.records.len() * 162);
        for record in &self.records {
            out.push_str(&record.encode(style)?);
            out.push_str("\r\n");
        }
        Ok(out)
    }
}
