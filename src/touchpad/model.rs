use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Public page for a meet id.
pub const MEET_PAGE_URL: &str = "http://www.touchpadlive.com";

/// A meet as returned by the search endpoint. Meets nest: a championship can
/// carry its sessions as child meets. Fields this crate does not use are
/// kept in `extra` and written back out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meet {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "start")]
    pub start_date: Option<String>,
    #[serde(default, alias = "end")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default, alias = "childMeets", skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Meet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Meet {
    pub fn page_url(&self) -> String {
        format!("{}/{}", MEET_PAGE_URL, self.id)
    }
}

/// One entry of `/meets/{id}/teams`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetTeam {
    #[serde(rename = "teamID")]
    pub team_id: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meet_keeps_unknown_fields_and_children() {
        let json = serde_json::json!({
            "id": 7,
            "name": "Stingrays vs Sharks",
            "startDate": "2024-06-15",
            "location": "Reston",
            "season": 2024,
            "childMeets": [{"id": 8, "name": "Session 2"}]
        });
        let meet: Meet = serde_json::from_value(json).unwrap();
        assert_eq!(meet.start_date.as_deref(), Some("2024-06-15"));
        assert_eq!(meet.children.len(), 1);
        assert_eq!(meet.children[0].id, 8);
        assert_eq!(meet.extra.get("season"), Some(&Value::from(2024)));
        assert_eq!(meet.page_url(), "http://www.touchpadlive.com/7");

        let back = serde_json::to_value(&meet).unwrap();
        assert_eq!(back["season"], 2024);
        assert_eq!(back["startDate"], "2024-06-15");
    }

    #[test]
    fn test_team_id_field_name() {
        let team: MeetTeam =
            serde_json::from_value(serde_json::json!({"teamID": 42, "name": "WWST"})).unwrap();
        assert_eq!(team.team_id, 42);
    }
}
