pub mod cache;
pub mod cdn;
pub mod client;
pub mod config;
pub mod espn;
pub mod rapid;
pub mod service;
pub mod synthetic;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use client::{ApiError, ApiResult, NbaApi};
pub use config::{ApiConfig, SettingsStore};
pub use service::SportsData;

pub type GameId = u64;
pub type TeamId = u64;

// ---------------------------------------------------------------------------
// Domain types, independent of any provider's wire format
// ---------------------------------------------------------------------------

/// Where a value came from. Every adapter operation succeeds; this records
/// whether it did so with live data or had to degrade to generated data.
#[derive(Debug, Clone, PartialEq)]
pub enum Sourced<T> {
    Live(T),
    Synthetic(T),
}

impl<T> Sourced<T> {
    pub fn value(&self) -> &T {
        match self {
            Sourced::Live(v) | Sourced::Synthetic(v) => v,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Sourced::Live(v) | Sourced::Synthetic(v) => v,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, Sourced::Synthetic(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Sourced<U> {
        match self {
            Sourced::Live(v) => Sourced::Live(f(v)),
            Sourced::Synthetic(v) => Sourced::Synthetic(f(v)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,         // "Boston Celtics"
    pub abbreviation: String, // "BOS"
    pub record: String,       // "64-18"
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Scheduled,
    Live,
    Completed,
}

impl GameStatus {
    pub fn label(&self) -> &'static str {
        match self {
            GameStatus::Scheduled => "scheduled",
            GameStatus::Live => "live",
            GameStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub date: DateTime<Utc>,
    pub home_team: Team,
    pub away_team: Team,
    pub home_score: u32,
    pub away_score: u32,
    pub status: GameStatus,
    pub current_period: Option<String>, // "Q3 04:45"
    pub arena: String,
    pub location: String,
}

impl Game {
    pub fn is_live(&self) -> bool {
        self.status == GameStatus::Live
    }

    pub fn matchup(&self) -> String {
        format!("{} @ {}", self.away_team.abbreviation, self.home_team.abbreviation)
    }
}

/// Per-team box score totals for one game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub team: Team,
    pub points: u32,
    pub rebounds: u32,
    pub assists: u32,
    pub steals: u32,
    pub blocks: u32,
    pub turnovers: u32,
    pub field_goals_made: u32,
    pub field_goals_attempted: u32,
    pub three_points_made: u32,
    pub three_points_attempted: u32,
    pub free_throws_made: u32,
    pub free_throws_attempted: u32,
}

impl TeamStats {
    pub fn field_goal_pct(&self) -> f64 {
        pct(self.field_goals_made, self.field_goals_attempted)
    }

    pub fn three_point_pct(&self) -> f64 {
        pct(self.three_points_made, self.three_points_attempted)
    }

    pub fn free_throw_pct(&self) -> f64 {
        pct(self.free_throws_made, self.free_throws_attempted)
    }
}

fn pct(made: u32, attempted: u32) -> f64 {
    if attempted == 0 {
        0.0
    } else {
        f64::from(made) * 100.0 / f64::from(attempted)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStats {
    pub game_id: GameId,
    pub home: TeamStats,
    pub away: TeamStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightPlayer {
    pub id: u64,
    pub name: String,
    pub team: String, // team code, e.g. "LAL"
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayHighlight {
    pub id: u64,
    pub game_id: GameId,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub timestamp: String, // display string, e.g. "Q2 7:14"
    pub player: Option<HighlightPlayer>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorePair {
    pub home: u32,
    pub away: u32,
}

/// One play-by-play action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveGameUpdate {
    pub game_id: GameId,
    pub timestamp: DateTime<Utc>,
    pub action: String,
    pub description: String,
    pub score: ScorePair,
    pub period: String,         // "Q4"
    pub time_remaining: String, // "5:12"
}

/// Season averages. Percentages are 0-100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub ppg: f32,
    pub rpg: f32,
    pub apg: f32,
    pub spg: f32,
    pub bpg: f32,
    pub fg_pct: f32,
    pub three_pct: f32,
    pub ft_pct: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: u64,
    pub name: String,
    pub position: String, // "PG", "SF", "C"
    pub team: Team,
    pub stats: PlayerStats,
}

/// Per-game averages a leaderboard can be ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatCategory {
    Points,
    Rebounds,
    Assists,
    Steals,
    Blocks,
}

impl StatCategory {
    pub const ALL: [StatCategory; 5] = [
        StatCategory::Points,
        StatCategory::Rebounds,
        StatCategory::Assists,
        StatCategory::Steals,
        StatCategory::Blocks,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StatCategory::Points => "PPG",
            StatCategory::Rebounds => "RPG",
            StatCategory::Assists => "APG",
            StatCategory::Steals => "SPG",
            StatCategory::Blocks => "BPG",
        }
    }

    pub fn value(&self, stats: &PlayerStats) -> f32 {
        match self {
            StatCategory::Points => stats.ppg,
            StatCategory::Rebounds => stats.rpg,
            StatCategory::Assists => stats.apg,
            StatCategory::Steals => stats.spg,
            StatCategory::Blocks => stats.bpg,
        }
    }
}

/// Leaderboard size when ranking by a category.
pub const LEADERBOARD_SIZE: usize = 10;

/// Players whose name or team name contains `query` (case-insensitive).
/// With a category the result is sorted best first and cut to
/// [`LEADERBOARD_SIZE`]; without one the list order is kept.
pub fn rank_players<'a>(players: &'a [Player], query: &str, category: Option<StatCategory>) -> Vec<&'a Player> {
    let query = query.trim().to_lowercase();
    let mut matching: Vec<&Player> = players
        .iter()
        .filter(|p| {
            query.is_empty()
                || p.name.to_lowercase().contains(&query)
                || p.team.name.to_lowercase().contains(&query)
        })
        .collect();

    if let Some(category) = category {
        matching.sort_by(|a, b| category.value(&b.stats).total_cmp(&category.value(&a.stats)));
        matching.truncate(LEADERBOARD_SIZE);
    }
    matching
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub image_url: Option<String>,
    pub published: String,
    pub author: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentages_are_derived_from_made_and_attempted() {
        let stats = TeamStats {
            field_goals_made: 40,
            field_goals_attempted: 80,
            three_points_made: 12,
            three_points_attempted: 30,
            ..Default::default()
        };
        assert_eq!(stats.field_goal_pct(), 50.0);
        assert_eq!(stats.three_point_pct(), 40.0);
        assert_eq!(stats.free_throw_pct(), 0.0, "no attempts reads as zero");
    }

    #[test]
    fn sourced_tracks_provenance_through_map() {
        let live = Sourced::Live(2).map(|n| n * 10);
        let fake = Sourced::Synthetic("x").map(str::len);
        assert_eq!(live, Sourced::Live(20));
        assert!(!live.is_synthetic());
        assert!(fake.is_synthetic());
        assert_eq!(fake.into_inner(), 1);
    }

    fn player(name: &str, team: &str, ppg: f32, bpg: f32) -> Player {
        Player {
            id: 0,
            name: name.into(),
            position: "F".into(),
            team: Team {
                name: team.into(),
                ..Default::default()
            },
            stats: PlayerStats {
                ppg,
                bpg,
                ..Default::default()
            },
        }
    }

    #[test]
    fn ranking_sorts_best_first_and_keeps_ten() {
        let players: Vec<Player> = (0..15)
            .map(|i| player(&format!("Player {i}"), "Boston Celtics", i as f32, 15.0 - i as f32))
            .collect();

        let scorers = rank_players(&players, "", Some(StatCategory::Points));
        assert_eq!(scorers.len(), LEADERBOARD_SIZE);
        assert_eq!(scorers[0].name, "Player 14");
        assert!(scorers.windows(2).all(|w| w[0].stats.ppg >= w[1].stats.ppg));

        let blockers = rank_players(&players, "", Some(StatCategory::Blocks));
        assert_eq!(blockers[0].name, "Player 0");

        let everyone = rank_players(&players, "", None);
        assert_eq!(everyone.len(), 15, "no cut without a category");
        assert_eq!(everyone[3].name, "Player 3");
    }

    #[test]
    fn ranking_filters_on_player_or_team_name() {
        let players = vec![
            player("Jayson Tatum", "Boston Celtics", 27.0, 0.6),
            player("Jaylen Brown", "Boston Celtics", 23.0, 0.5),
            player("Stephen Curry", "Golden State Warriors", 29.0, 0.4),
        ];
        let celtics = rank_players(&players, "  celtics ", Some(StatCategory::Points));
        let names: Vec<_> = celtics.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Jayson Tatum", "Jaylen Brown"]);

        assert_eq!(rank_players(&players, "CURRY", None).len(), 1);
        assert!(rank_players(&players, "zzz", None).is_empty());
    }

    #[test]
    fn status_labels_match_wire_vocabulary() {
        assert_eq!(GameStatus::Live.to_string(), "live");
        assert_eq!(
            serde_json::to_string(&GameStatus::Completed).unwrap(),
            "\"completed\""
        );
    }
}
