/// RapidAPI (api-nba-v1) wire types for the metered provider.
/// Non-optional fields are required: a payload without them fails to parse.
use serde::Deserialize;

/// Every RapidAPI endpoint wraps its payload in `{ "response": [...] }`.
#[derive(Debug, Deserialize, Clone)]
pub struct Envelope<T> {
    pub response: Vec<T>,
}

// ---------------------------------------------------------------------------
// Games  (/games?date=YYYY-MM-DD)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
pub struct RapidGame {
    pub id: u64,
    pub date: RapidGameDate,
    pub status: Option<RapidStatus>,
    pub periods: Option<RapidPeriods>,
    pub arena: Option<RapidArena>,
    pub teams: RapidMatchup,
    pub scores: Option<RapidScores>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RapidGameDate {
    pub start: String, // ISO 8601
}

#[derive(Debug, Deserialize, Clone)]
pub struct RapidStatus {
    pub long: Option<String>, // "Scheduled", "In Play", "Finished"
    pub clock: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RapidPeriods {
    pub current: Option<u8>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RapidArena {
    pub name: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RapidMatchup {
    pub home: RapidTeam,
    pub visitors: RapidTeam,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RapidTeam {
    pub id: u64,
    pub name: String,
    pub code: Option<String>,
    pub win: Option<u32>,
    pub loss: Option<u32>,
    /// Only present on the /teams endpoint.
    #[serde(rename = "nbaFranchise")]
    pub nba_franchise: Option<bool>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RapidScores {
    pub home: Option<RapidLineScore>,
    pub visitors: Option<RapidLineScore>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RapidLineScore {
    pub points: Option<u32>,
}

// ---------------------------------------------------------------------------
// Highlights  (/games/highlights?id=…)  and recent videos  (/videos/recent?game=…)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RapidHighlight {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub video_url: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub timestamp: String,
    pub player: Option<RapidHighlightPlayer>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RapidHighlightPlayer {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub team: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RapidVideo {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub url: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub published: String,
}
