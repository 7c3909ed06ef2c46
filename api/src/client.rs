use crate::cdn::{BoxscoreResponse, CdnAction, CdnGame, CdnTeam, PlayByPlayResponse, ScoreboardResponse};
use crate::config::ApiConfig;
use crate::espn::{EspnArticle, NewsResponse};
use crate::rapid::{Envelope, RapidGame, RapidHighlight, RapidTeam, RapidVideo};
use crate::{
    Game, GameId, GameStats, GameStatus, HighlightPlayer, LiveGameUpdate, NewsItem, PlayHighlight,
    ScorePair, Team, TeamStats,
};
use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use reqwest::{Client, RequestBuilder};
use std::fmt;

pub type ApiResult<T> = Result<T, ApiError>;

/// Number of play-by-play actions kept from the end of the feed.
pub const PLAY_BY_PLAY_LIMIT: usize = 10;

/// HTTP client for the schedule, live-data, highlight and news providers.
#[derive(Debug, Clone)]
pub struct NbaApi {
    client: Client,
    config: ApiConfig,
}

impl Default for NbaApi {
    fn default() -> Self {
        Self::new(ApiConfig::default())
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    NotFound(String),
    Offline(String),
    Settings(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
            ApiError::Offline(url) => write!(f, "Demo mode, skipped {url}"),
            ApiError::Settings(msg) => write!(f, "Settings error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl NbaApi {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: Client::builder()
                .user_agent("hoopdash/0.1 (terminal nba dashboard)")
                .build()
                .unwrap_or_default(),
            config,
        }
    }

    /// Games scheduled on `date` from the metered schedule provider.
    pub async fn fetch_games(&self, date: NaiveDate) -> ApiResult<Vec<Game>> {
        let url = format!("{}/games?date={}", self.config.rapid_base, date.format("%Y-%m-%d"));
        let raw: Envelope<RapidGame> = self.get(self.rapid(&url), &url).await?;
        if raw.response.is_empty() {
            return Err(ApiError::NotFound(format!("no games listed for {date}")));
        }
        Ok(raw.response.iter().map(map_rapid_game).collect())
    }

    pub async fn fetch_teams(&self) -> ApiResult<Vec<Team>> {
        let url = format!("{}/teams?league=standard", self.config.rapid_base);
        let raw: Envelope<RapidTeam> = self.get(self.rapid(&url), &url).await?;
        let teams: Vec<Team> = raw
            .response
            .iter()
            .filter(|t| t.nba_franchise == Some(true))
            .map(map_rapid_team)
            .collect();
        if teams.is_empty() {
            return Err(ApiError::NotFound("no NBA franchises in teams response".into()));
        }
        Ok(teams)
    }

    /// Today's scoreboard from the live-data CDN, every status included.
    pub async fn fetch_scoreboard(&self) -> ApiResult<Vec<Game>> {
        let url = format!("{}/scoreboard/todaysScoreboard_00.json", self.config.cdn_base);
        let raw: ScoreboardResponse = self.get(self.client.get(&url), &url).await?;
        raw.scoreboard.games.iter().map(map_cdn_game).collect()
    }

    pub async fn fetch_box_score(&self, game_id: GameId) -> ApiResult<GameStats> {
        let url = format!("{}/boxscore/boxscore_{}.json", self.config.cdn_base, cdn_game_id(game_id));
        let raw: BoxscoreResponse = self.get(self.client.get(&url), &url).await?;
        map_box_score(game_id, &raw.game.home_team, &raw.game.away_team)
            .ok_or_else(|| ApiError::NotFound(format!("box score for {game_id} has no team statistics")))
    }

    /// The most recent `limit` actions, newest first.
    pub async fn fetch_play_by_play(&self, game_id: GameId, limit: usize) -> ApiResult<Vec<LiveGameUpdate>> {
        let url = format!("{}/playbyplay/playbyplay_{}.json", self.config.cdn_base, cdn_game_id(game_id));
        let raw: PlayByPlayResponse = self.get(self.client.get(&url), &url).await?;
        let actions = raw.game.actions;
        let start = actions.len().saturating_sub(limit);
        actions[start..]
            .iter()
            .rev()
            .map(|a| map_action(game_id, a))
            .collect()
    }

    pub async fn fetch_highlights(&self, game_id: GameId) -> ApiResult<Vec<PlayHighlight>> {
        let url = format!("{}/games/highlights?id={game_id}", self.config.rapid_base);
        let raw: Envelope<RapidHighlight> = self.get(self.rapid(&url), &url).await?;
        if raw.response.is_empty() {
            return Err(ApiError::NotFound(format!("no highlights for game {game_id}")));
        }
        Ok(raw
            .response
            .into_iter()
            .enumerate()
            .map(|(i, h)| map_highlight(game_id, i, h))
            .collect())
    }

    pub async fn fetch_recent_videos(&self, game_id: GameId) -> ApiResult<Vec<PlayHighlight>> {
        let url = format!("{}/videos/recent?game={game_id}", self.config.rapid_base);
        let raw: Envelope<RapidVideo> = self.get(self.rapid(&url), &url).await?;
        if raw.response.is_empty() {
            return Err(ApiError::NotFound(format!("no recent videos for game {game_id}")));
        }
        Ok(raw
            .response
            .into_iter()
            .enumerate()
            .map(|(i, v)| map_video(game_id, i, v))
            .collect())
    }

    pub async fn fetch_news(&self) -> ApiResult<Vec<NewsItem>> {
        let url = format!("{}/news", self.config.espn_base);
        let raw: NewsResponse = self.get(self.client.get(&url), &url).await?;
        Ok(raw.articles.into_iter().map(map_article).collect())
    }

    /// Attach the metered provider's credentials.
    fn rapid(&self, url: &str) -> RequestBuilder {
        self.client
            .get(url)
            .header("X-RapidAPI-Key", &self.config.api_key)
            .header("X-RapidAPI-Host", &self.config.rapid_host)
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, request: RequestBuilder, url: &str) -> ApiResult<T> {
        if self.config.demo {
            return Err(ApiError::Offline(url.to_owned()));
        }
        debug!("GET {url}");
        let response = request
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) => Err(ApiError::Api(e, url.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping: RapidAPI wire types → clean domain types
// ---------------------------------------------------------------------------

fn map_rapid_team(t: &RapidTeam) -> Team {
    let record = match (t.win, t.loss) {
        (Some(w), Some(l)) => format!("{w}-{l}"),
        _ => "0-0".to_owned(),
    };
    Team {
        id: t.id,
        name: t.name.clone(),
        abbreviation: t.code.clone().unwrap_or_default(),
        record,
    }
}

fn map_rapid_game(g: &RapidGame) -> Game {
    let status = g
        .status
        .as_ref()
        .and_then(|s| s.long.as_deref())
        .map(parse_status)
        .unwrap_or_default();

    let current_period = g
        .periods
        .as_ref()
        .and_then(|p| p.current)
        .filter(|&n| n > 0)
        .map(|n| {
            let clock = g.status.as_ref().and_then(|s| s.clock.as_deref()).unwrap_or("");
            format!("Q{n} {clock}").trim_end().to_owned()
        });

    let scores = g.scores.as_ref();
    let home_score = scores.and_then(|s| s.home.as_ref()).and_then(|s| s.points).unwrap_or(0);
    let away_score = scores.and_then(|s| s.visitors.as_ref()).and_then(|s| s.points).unwrap_or(0);

    let arena = g.arena.clone().unwrap_or_default();
    let location = match (&arena.city, &arena.state) {
        (Some(city), Some(state)) => format!("{city}, {state}"),
        (Some(city), None) => city.clone(),
        _ => String::new(),
    };

    Game {
        id: g.id,
        date: parse_timestamp(&g.date.start),
        home_team: map_rapid_team(&g.teams.home),
        away_team: map_rapid_team(&g.teams.visitors),
        home_score,
        away_score,
        status,
        current_period,
        arena: arena.name.unwrap_or_default(),
        location,
    }
}

fn map_highlight(game_id: GameId, index: usize, h: RapidHighlight) -> PlayHighlight {
    PlayHighlight {
        id: highlight_id(game_id, index),
        game_id,
        title: h.title,
        description: h.description,
        video_url: h.video_url,
        thumbnail_url: h.thumbnail_url,
        timestamp: h.timestamp,
        player: h.player.map(|p| HighlightPlayer {
            id: p.id,
            name: p.name,
            team: p.team,
        }),
    }
}

fn map_video(game_id: GameId, index: usize, v: RapidVideo) -> PlayHighlight {
    PlayHighlight {
        id: highlight_id(game_id, index),
        game_id,
        title: v.title,
        description: v.description,
        video_url: v.url,
        thumbnail_url: v.thumbnail,
        timestamp: v.published,
        player: None,
    }
}

pub(crate) fn highlight_id(game_id: GameId, index: usize) -> u64 {
    game_id.saturating_mul(100).saturating_add(index as u64)
}

/// Map a free-text status to the three-state enumeration.
pub fn parse_status(s: &str) -> GameStatus {
    let lower = s.to_lowercase();
    if lower.contains("in play") || lower.contains("ao vivo") {
        GameStatus::Live
    } else if lower.contains("finished") || lower.contains("final") {
        GameStatus::Completed
    } else {
        GameStatus::Scheduled
    }
}

fn parse_timestamp(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Mapping: live-data CDN wire types → clean domain types
// ---------------------------------------------------------------------------

/// CDN ids are zero-padded ten-digit strings.
fn cdn_game_id(game_id: GameId) -> String {
    format!("{game_id:010}")
}

fn parse_game_id(raw: &str) -> ApiResult<GameId> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::NotFound(format!("unusable game id {raw:?}")))
}

fn map_cdn_team(t: &CdnTeam) -> Team {
    let record = match (t.wins, t.losses) {
        (Some(w), Some(l)) => format!("{w}-{l}"),
        _ => "0-0".to_owned(),
    };
    let name = if t.team_city.is_empty() {
        t.team_name.clone()
    } else {
        format!("{} {}", t.team_city, t.team_name)
    };
    Team {
        id: t.team_id,
        name,
        abbreviation: t.team_tricode.clone(),
        record,
    }
}

fn map_cdn_game(g: &CdnGame) -> ApiResult<Game> {
    let status = match g.game_status {
        2 => GameStatus::Live,
        3 => GameStatus::Completed,
        _ => GameStatus::Scheduled,
    };
    let arena = g.arena.clone().unwrap_or_default();
    let location = match (arena.arena_city.is_empty(), arena.arena_state.is_empty()) {
        (false, false) => format!("{}, {}", arena.arena_city, arena.arena_state),
        (false, true) => arena.arena_city.clone(),
        _ => String::new(),
    };

    Ok(Game {
        id: parse_game_id(&g.game_id)?,
        date: parse_timestamp(&g.game_time_utc),
        home_team: map_cdn_team(&g.home_team),
        away_team: map_cdn_team(&g.away_team),
        home_score: g.home_team.score,
        away_score: g.away_team.score,
        status,
        current_period: Some(g.game_status_text.trim().to_owned()).filter(|s| !s.is_empty()),
        arena: arena.arena_name,
        location,
    })
}

fn map_box_score(game_id: GameId, home: &CdnTeam, away: &CdnTeam) -> Option<GameStats> {
    let line = |t: &CdnTeam| -> Option<TeamStats> {
        let s = t.statistics.as_ref()?;
        Some(TeamStats {
            team: map_cdn_team(t),
            points: s.points,
            rebounds: s.rebounds_total,
            assists: s.assists,
            steals: s.steals,
            blocks: s.blocks,
            turnovers: s.turnovers,
            field_goals_made: s.field_goals_made,
            field_goals_attempted: s.field_goals_attempted,
            three_points_made: s.three_pointers_made,
            three_points_attempted: s.three_pointers_attempted,
            free_throws_made: s.free_throws_made,
            free_throws_attempted: s.free_throws_attempted,
        })
    };
    Some(GameStats {
        game_id,
        home: line(home)?,
        away: line(away)?,
    })
}

fn map_action(game_id: GameId, a: &CdnAction) -> ApiResult<LiveGameUpdate> {
    let timestamp = DateTime::parse_from_rfc3339(&a.time_actual)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ApiError::NotFound(format!("bad action timestamp {:?}", a.time_actual)))?;
    Ok(LiveGameUpdate {
        game_id,
        timestamp,
        action: a.action_type.clone(),
        description: a.description.clone(),
        score: ScorePair {
            home: a.score_home,
            away: a.score_away,
        },
        period: format!("Q{}", a.period),
        time_remaining: format_clock(&a.clock),
    })
}

/// Render an ISO-8601 game clock ("PT05M12.00S") as "5:12". Anything that
/// doesn't look like a duration is passed through unchanged.
pub fn format_clock(raw: &str) -> String {
    let Some(rest) = raw.strip_prefix("PT") else {
        return raw.to_owned();
    };
    let (minutes, seconds) = match rest.split_once('M') {
        Some((m, s)) => (m, s),
        None => ("0", rest),
    };
    let minutes = minutes.parse::<u32>().ok();
    let seconds = seconds
        .trim_end_matches('S')
        .split('.')
        .next()
        .and_then(|s| if s.is_empty() { Some(0) } else { s.parse::<u32>().ok() });
    match (minutes, seconds) {
        (Some(m), Some(s)) => format!("{m}:{s:02}"),
        _ => raw.to_owned(),
    }
}

// ---------------------------------------------------------------------------
// Mapping: ESPN news
// ---------------------------------------------------------------------------

fn map_article(a: EspnArticle) -> NewsItem {
    let id = match a.id {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => format!("{:x}", fnv1a(&a.headline)),
    };
    NewsItem {
        id,
        url: a
            .links
            .and_then(|l| l.web)
            .and_then(|w| w.href)
            .unwrap_or_default(),
        image_url: a.images.into_iter().find_map(|i| i.url),
        title: a.headline,
        description: a.description,
        published: a.published,
        author: a.byline.filter(|b| !b.trim().is_empty()).unwrap_or_else(|| "ESPN".into()),
    }
}

/// Stable id for articles that arrive without one.
fn fnv1a(s: &str) -> u64 {
    s.bytes()
        .fold(0xcbf2_9ce4_8422_2325, |h, b| (h ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("In Play"), GameStatus::Live);
        assert_eq!(parse_status("AO VIVO - 3º Quarto"), GameStatus::Live);
        assert_eq!(parse_status("Finished"), GameStatus::Completed);
        assert_eq!(parse_status("Final/OT"), GameStatus::Completed);
        assert_eq!(parse_status("Scheduled"), GameStatus::Scheduled);
        assert_eq!(parse_status(""), GameStatus::Scheduled);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock("PT05M12.00S"), "5:12");
        assert_eq!(format_clock("PT00M00.40S"), "0:00");
        assert_eq!(format_clock("PT12M00.00S"), "12:00");
        assert_eq!(format_clock("PT45.20S"), "0:45");
        assert_eq!(format_clock("4:32"), "4:32");
    }

    #[test]
    fn cdn_ids_are_zero_padded() {
        assert_eq!(cdn_game_id(22300915), "0022300915");
        assert_eq!(parse_game_id("0022300915").unwrap(), 22300915);
        assert!(parse_game_id("abc").is_err());
    }

    #[test]
    fn rapid_game_with_missing_scores_reads_zero() {
        let raw = r#"{
            "id": 12478,
            "date": {"start": "2024-03-15T23:30:00.000Z"},
            "status": {"long": "Scheduled", "clock": null},
            "periods": {"current": 0},
            "arena": {"name": "TD Garden", "city": "Boston", "state": "MA"},
            "teams": {
                "home": {"id": 2, "name": "Boston Celtics", "code": "BOS"},
                "visitors": {"id": 17, "name": "Los Angeles Lakers", "code": "LAL", "win": 36, "loss": 30}
            },
            "scores": {"home": {"points": null}, "visitors": {}}
        }"#;
        let game = map_rapid_game(&serde_json::from_str(raw).unwrap());
        assert_eq!(game.id, 12478);
        assert_eq!((game.home_score, game.away_score), (0, 0));
        assert_eq!(game.status, GameStatus::Scheduled);
        assert_eq!(game.current_period, None);
        assert_eq!(game.home_team.record, "0-0");
        assert_eq!(game.away_team.record, "36-30");
        assert_eq!(game.location, "Boston, MA");
    }

    #[test]
    fn rapid_game_in_play_carries_period_label() {
        let raw = r#"{
            "id": 1,
            "date": {"start": "2024-03-15T23:30:00Z"},
            "status": {"long": "In Play", "clock": "4:45"},
            "periods": {"current": 3},
            "teams": {
                "home": {"id": 2, "name": "Boston Celtics", "code": "BOS"},
                "visitors": {"id": 17, "name": "Los Angeles Lakers", "code": "LAL"}
            },
            "scores": {"home": {"points": 77}, "visitors": {"points": 70}}
        }"#;
        let game = map_rapid_game(&serde_json::from_str(raw).unwrap());
        assert!(game.is_live());
        assert_eq!(game.current_period.as_deref(), Some("Q3 4:45"));
        assert_eq!((game.home_score, game.away_score), (77, 70));
        assert_eq!(game.arena, "");
    }

    #[test]
    fn rapid_game_without_teams_fails_to_parse() {
        let raw = r#"{"id": 1, "date": {"start": "2024-03-15T23:30:00Z"}}"#;
        assert!(serde_json::from_str::<RapidGame>(raw).is_err());
    }

    #[test]
    fn cdn_game_status_codes_map_to_three_states() {
        let raw = |status: u8| {
            format!(
                r#"{{"gameId":"0022300915","gameStatus":{status},"gameStatusText":"Q2 5:01",
                "gameTimeUTC":"2024-03-15T23:30:00Z",
                "homeTeam":{{"teamId":1,"teamName":"Celtics","teamCity":"Boston","teamTricode":"BOS","wins":50,"losses":14,"score":55}},
                "awayTeam":{{"teamId":2,"teamName":"Lakers","teamCity":"Los Angeles","teamTricode":"LAL","wins":36,"losses":30,"score":51}}}}"#
            )
        };
        let parse = |status| map_cdn_game(&serde_json::from_str(&raw(status)).unwrap()).unwrap();
        assert_eq!(parse(1).status, GameStatus::Scheduled);
        assert_eq!(parse(3).status, GameStatus::Completed);

        let live = parse(2);
        assert_eq!(live.status, GameStatus::Live);
        assert_eq!(live.id, 22300915);
        assert_eq!(live.home_team.name, "Boston Celtics");
        assert_eq!(live.home_team.record, "50-14");
        assert_eq!(live.current_period.as_deref(), Some("Q2 5:01"));
    }

    #[test]
    fn article_without_byline_or_id_gets_defaults() {
        let raw = r#"{"headline":"Celtics clinch","links":{"web":{"href":"https://espn.com/a"}},"images":[]}"#;
        let item = map_article(serde_json::from_str(raw).unwrap());
        assert_eq!(item.author, "ESPN");
        assert_eq!(item.url, "https://espn.com/a");
        assert!(item.image_url.is_none());
        assert!(!item.id.is_empty());
    }
}
