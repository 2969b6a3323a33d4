use crate::touchpad::client::{MeetQuery, TouchPadClient};
use crate::touchpad::model::{Meet, MeetTeam};
use crate::touchpad::{FetchError, FetchResult};
use std::collections::HashMap;

/// Most frequent team id across the team lists. Ties go to the id seen
/// first.
pub fn infer_team_id<'a, I>(team_lists: I) -> Option<u64>
where
    I: IntoIterator<Item = &'a [MeetTeam]>,
{
    let mut counts: HashMap<u64, (usize, usize)> = HashMap::new();
    let mut seen = 0;
    for team in team_lists.into_iter().flatten() {
        let entry = counts.entry(team.team_id).or_insert((0, seen));
        entry.0 += 1;
        seen += 1;
    }
    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(id, _)| id)
}

/// `<id>_<id>_meets.json`.
pub fn meets_file_name(team_ids: &[u64]) -> String {
    let ids: Vec<String> = team_ids.iter().map(u64::to_string).collect();
    format!("{}_meets.json", ids.join("_"))
}

pub struct MeetFinder {
    client: TouchPadClient,
}

impl MeetFinder {
    pub fn new(client: TouchPadClient) -> Self {
        Self { client }
    }

    /// Meets matching `pattern` in `state` over `years`.
    pub async fn fetch_meets(
        &self,
        pattern: &str,
        state: &str,
        years: &[i32],
    ) -> FetchResult<Vec<Meet>> {
        let mut meets = Vec::new();
        for &year in years {
            let query = MeetQuery {
                pattern: pattern.to_string(),
                state: state.to_string(),
                year,
            };
            meets.extend(self.client.all_meets(&query).await?);
        }
        Ok(meets)
    }

    /// Team id for a team name: the id entered most often in the meets the
    /// name search returned.
    pub async fn team_id_for(&self, pattern: &str, meets: &[Meet]) -> FetchResult<u64> {
        let mut lists = Vec::with_capacity(meets.len());
        for meet in meets {
            lists.push(self.client.meet_teams(meet.id).await?);
        }
        let id = infer_team_id(lists.iter().map(Vec::as_slice)).ok_or_else(|| {
            FetchError::NoTeamId {
                pattern: pattern.to_string(),
            }
        })?;
        tracing::info!("inferred team id {} for '{}'", id, pattern);
        Ok(id)
    }

    /// Keeps the meets that list at least one of `team_ids`, with each
    /// kept meet's page `url` filled in. Meets with no teams are dropped.
    pub async fn filter_by_team_ids(
        &self,
        meets: Vec<Meet>,
        team_ids: &[u64],
    ) -> FetchResult<Vec<Meet>> {
        let total = meets.len();
        let mut empty = 0;
        let mut kept = Vec::new();

        for meet in meets {
            let teams = self.client.meet_teams(meet.id).await?;
            if teams.is_empty() {
                empty += 1;
                continue;
            }
            if teams.iter().any(|t| team_ids.contains(&t.team_id)) {
                kept.push(Meet {
                    url: Some(meet.page_url()),
                    ..meet
                });
            }
        }

        tracing::info!(
            "kept {} of {} meet(s): {} empty, {} without team(s) {:?}",
            kept.len(),
            total,
            empty,
            total - empty - kept.len(),
            team_ids
        );
        Ok(kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    fn teams(ids: &[u64]) -> Vec<MeetTeam> {
        ids.iter()
            .map(|&team_id| MeetTeam {
                team_id,
                extra: Map::new(),
            })
            .collect()
    }

    #[test]
    fn test_infer_team_id_mode_and_ties() {
        let lists = [teams(&[5, 9]), teams(&[9, 3]), teams(&[9])];
        assert_eq!(infer_team_id(lists.iter().map(Vec::as_slice)), Some(9));

        let tie = [teams(&[4, 2]), teams(&[2, 4])];
        assert_eq!(infer_team_id(tie.iter().map(Vec::as_slice)), Some(4));

        let none: [Vec<MeetTeam>; 0] = [];
        assert_eq!(infer_team_id(none.iter().map(Vec::as_slice)), None);
    }

    #[test]
    fn test_meets_file_name() {
        assert_eq!(meets_file_name(&[12, 40]), "12_40_meets.json");
    }
}
