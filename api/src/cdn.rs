/// NBA live-data CDN wire types (scoreboard, box score, play-by-play).
use serde::{Deserialize, Deserializer};

// ---------------------------------------------------------------------------
// Scoreboard  (scoreboard/todaysScoreboard_00.json)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
pub struct ScoreboardResponse {
    pub scoreboard: Scoreboard,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Scoreboard {
    pub games: Vec<CdnGame>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CdnGame {
    pub game_id: String, // "0022300915"
    pub game_status: u8, // 1 scheduled, 2 live, 3 final
    #[serde(default)]
    pub game_status_text: String,
    #[serde(rename = "gameTimeUTC")]
    pub game_time_utc: String,
    pub home_team: CdnTeam,
    pub away_team: CdnTeam,
    pub arena: Option<CdnArena>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CdnTeam {
    pub team_id: u64,
    pub team_name: String,
    #[serde(default)]
    pub team_city: String,
    pub team_tricode: String,
    pub wins: Option<u32>,
    pub losses: Option<u32>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub score: u32,
    /// Box score only.
    pub statistics: Option<CdnTeamStatistics>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CdnArena {
    #[serde(default)]
    pub arena_name: String,
    #[serde(default)]
    pub arena_city: String,
    #[serde(default)]
    pub arena_state: String,
}

// ---------------------------------------------------------------------------
// Box score  (boxscore/boxscore_{id}.json)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
pub struct BoxscoreResponse {
    pub game: BoxscoreGame,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BoxscoreGame {
    pub home_team: CdnTeam,
    pub away_team: CdnTeam,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CdnTeamStatistics {
    pub points: u32,
    pub rebounds_total: u32,
    pub assists: u32,
    pub steals: u32,
    pub blocks: u32,
    pub turnovers: u32,
    pub field_goals_made: u32,
    pub field_goals_attempted: u32,
    pub three_pointers_made: u32,
    pub three_pointers_attempted: u32,
    pub free_throws_made: u32,
    pub free_throws_attempted: u32,
}

// ---------------------------------------------------------------------------
// Play-by-play  (playbyplay/playbyplay_{id}.json)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
pub struct PlayByPlayResponse {
    pub game: PlayByPlayGame,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlayByPlayGame {
    pub actions: Vec<CdnAction>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CdnAction {
    pub period: u8,
    pub clock: String, // ISO 8601 duration, "PT05M12.00S"
    pub time_actual: String,
    pub action_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "number_or_string")]
    pub score_home: u32,
    #[serde(deserialize_with = "number_or_string")]
    pub score_away: u32,
}

/// The CDN sends scores as numbers on some feeds and strings on others.
fn number_or_string<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) if s.trim().is_empty() => Ok(0),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_scores_accept_numbers_and_strings() {
        let raw = r#"{"period":4,"clock":"PT01M02.00S","timeActual":"2024-03-15T02:10:00Z",
            "actionType":"2pt","description":"Tatum layup","scoreHome":"101","scoreAway":99}"#;
        let action: CdnAction = serde_json::from_str(raw).unwrap();
        assert_eq!(action.score_home, 101);
        assert_eq!(action.score_away, 99);
    }

    #[test]
    fn missing_team_score_defaults_to_zero() {
        let raw = r#"{"teamId":1610612738,"teamName":"Celtics","teamTricode":"BOS"}"#;
        let team: CdnTeam = serde_json::from_str(raw).unwrap();
        assert_eq!(team.score, 0);
        assert!(team.statistics.is_none());
    }
}
