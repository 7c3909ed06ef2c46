use crate::cache::{LiveFeed, ResponseCache};
use crate::client::{NbaApi, PLAY_BY_PLAY_LIMIT};
use crate::config::ApiConfig;
use crate::synthetic;
use crate::{
    ApiResult, Game, GameId, GameStats, LiveGameUpdate, NewsItem, PlayHighlight, Player, Sourced,
    Team,
};
use chrono::{NaiveDate, Utc};
use log::{debug, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Instant;

/// Adapter the dashboard talks to. Every lookup except news succeeds,
/// falling back from cache to the live providers to generated data.
pub struct SportsData {
    api: NbaApi,
    cache: ResponseCache,
    rng: StdRng,
}

impl SportsData {
    pub fn new(config: ApiConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_rng(config: ApiConfig, rng: StdRng) -> Self {
        let cache = ResponseCache::new(config.freshness);
        Self {
            api: NbaApi::new(config),
            cache,
            rng,
        }
    }

    pub async fn games_for_date(&mut self, date: NaiveDate) -> Sourced<Arc<Vec<Game>>> {
        if let Some(games) = self.cache.games(date, Instant::now()) {
            debug!("games for {date} served from cache");
            return games;
        }

        let games = match self.api.fetch_games(date).await {
            Ok(games) => Sourced::Live(Arc::new(games)),
            Err(e) => {
                warn!("schedule for {date} unavailable, generating: {e}");
                let generated = synthetic::games(date, synthetic::SCHEDULE_GAMES, Utc::now(), &mut self.rng);
                Sourced::Synthetic(Arc::new(generated))
            }
        };
        self.cache.put_games(date, games.clone(), Instant::now());
        games
    }

    /// Games currently in progress. The result may be empty. Never touches
    /// the schedule entries; the scoreboard only feeds box score labels.
    pub async fn live_games(&mut self) -> Sourced<Vec<Game>> {
        let (scoreboard, synthetic) = match self.api.fetch_scoreboard().await {
            Ok(scoreboard) => (scoreboard, false),
            Err(e) => {
                warn!("scoreboard unavailable, generating: {e}");
                let today = Utc::now().date_naive();
                let pool = synthetic::games(today, synthetic::LIVE_POOL_GAMES, Utc::now(), &mut self.rng);
                (pool, true)
            }
        };
        let live: Vec<Game> = scoreboard.iter().filter(|g| g.is_live()).cloned().collect();
        self.cache.put_scoreboard(scoreboard);
        if synthetic {
            Sourced::Synthetic(live)
        } else {
            Sourced::Live(live)
        }
    }

    pub async fn game_stats(&mut self, game_id: GameId) -> Sourced<Arc<GameStats>> {
        if let Some(stats) = self.cache.stats(game_id) {
            debug!("stats for {game_id} served from cache");
            return stats;
        }

        let stats = match self.api.fetch_box_score(game_id).await {
            Ok(stats) => Sourced::Live(Arc::new(stats)),
            Err(e) => {
                warn!("box score for {game_id} unavailable, generating: {e}");
                let (home, away) = match self.cache.find_game(game_id) {
                    Some(game) => (game.home_team.clone(), game.away_team.clone()),
                    None => synthetic::random_matchup(&mut self.rng),
                };
                Sourced::Synthetic(Arc::new(synthetic::game_stats(game_id, home, away, &mut self.rng)))
            }
        };
        self.cache.put_stats(game_id, stats.clone());
        stats
    }

    /// Latest play-by-play batch, newest first. Also folded into the
    /// game's live feed.
    pub async fn live_updates(&mut self, game_id: GameId) -> Sourced<Vec<LiveGameUpdate>> {
        let updates = match self.api.fetch_play_by_play(game_id, PLAY_BY_PLAY_LIMIT).await {
            Ok(updates) if !updates.is_empty() => Sourced::Live(updates),
            Ok(_) => {
                warn!("play-by-play for {game_id} is empty, generating");
                self.synthetic_updates(game_id)
            }
            Err(e) => {
                warn!("play-by-play for {game_id} unavailable, generating: {e}");
                self.synthetic_updates(game_id)
            }
        };
        self.cache.merge_live_updates(game_id, updates.value());
        updates
    }

    fn synthetic_updates(&mut self, game_id: GameId) -> Sourced<Vec<LiveGameUpdate>> {
        Sourced::Synthetic(synthetic::live_updates(
            game_id,
            synthetic::LIVE_UPDATE_COUNT,
            Utc::now(),
            &mut self.rng,
        ))
    }

    pub fn live_feed(&self, game_id: GameId) -> Vec<LiveGameUpdate> {
        self.cache.live_feed(game_id).map(LiveFeed::to_vec).unwrap_or_default()
    }

    pub async fn highlights(&mut self, game_id: GameId) -> Sourced<Arc<Vec<PlayHighlight>>> {
        if let Some(highlights) = self.cache.highlights(game_id) {
            debug!("highlights for {game_id} served from cache");
            return highlights;
        }

        let highlights = match self.api.fetch_highlights(game_id).await {
            Ok(items) => Sourced::Live(items),
            Err(e) => {
                warn!("highlights for {game_id} unavailable, trying recent videos: {e}");
                match self.api.fetch_recent_videos(game_id).await {
                    Ok(items) => Sourced::Live(items),
                    Err(e) => {
                        warn!("recent videos for {game_id} unavailable, generating: {e}");
                        Sourced::Synthetic(synthetic::highlights(
                            game_id,
                            synthetic::HIGHLIGHT_COUNT,
                            &mut self.rng,
                        ))
                    }
                }
            }
        }
        .map(Arc::new);
        self.cache.put_highlights(game_id, highlights.clone());
        highlights
    }

    pub async fn teams(&mut self) -> Sourced<Arc<Vec<Team>>> {
        if let Some(teams) = self.cache.teams(Instant::now()) {
            debug!("teams served from cache");
            return teams;
        }

        let teams = match self.api.fetch_teams().await {
            Ok(teams) => Sourced::Live(Arc::new(teams)),
            Err(e) => {
                warn!("teams unavailable, using the built-in league: {e}");
                Sourced::Synthetic(Arc::new(synthetic::league_teams()))
            }
        };
        self.cache.put_teams(teams.clone(), Instant::now());
        teams
    }

    /// Season leaders. No provider serves these, so the board is generated
    /// once and kept for the session.
    pub fn players(&mut self) -> Sourced<Arc<Vec<Player>>> {
        if let Some(players) = self.cache.players() {
            return players;
        }
        let players = Sourced::Synthetic(Arc::new(synthetic::top_players(&mut self.rng)));
        self.cache.put_players(players.clone());
        players
    }

    /// League news. There is no generated stand-in, so failures surface.
    pub async fn news(&mut self) -> ApiResult<Arc<Vec<NewsItem>>> {
        if let Some(news) = self.cache.news(Instant::now()) {
            debug!("news served from cache");
            return Ok(news);
        }

        let news = Arc::new(self.api.fetch_news().await?);
        self.cache.put_news(news.clone(), Instant::now());
        Ok(news)
    }

    /// Drop every cached entry so the next lookups go back to the sources.
    pub fn invalidate(&mut self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo() -> SportsData {
        let config = ApiConfig {
            demo: true,
            ..ApiConfig::default()
        };
        SportsData::with_rng(config, StdRng::seed_from_u64(42))
    }

    #[tokio::test]
    async fn demo_stats_reuse_cached_schedule_teams() {
        let mut data = demo();
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let games = data.games_for_date(date).await;
        assert!(games.is_synthetic());
        let game = games.value()[0].clone();

        let stats = data.game_stats(game.id).await;
        assert!(stats.is_synthetic());
        assert_eq!(stats.value().home.team, game.home_team);
        assert_eq!(stats.value().away.team, game.away_team);
    }

    #[tokio::test]
    async fn live_feed_accumulates_across_polls() {
        let mut data = demo();
        let first = data.live_updates(9).await;
        assert_eq!(first.value().len(), 10);
        let second = data.live_updates(9).await;
        assert!(second.is_synthetic());

        let feed = data.live_feed(9);
        assert!(feed.len() > 10 && feed.len() <= 20);
        assert!(data.live_feed(10).is_empty());
    }

    #[tokio::test]
    async fn invalidate_forgets_cached_stats() {
        let mut data = demo();
        let first = data.game_stats(3).await;
        data.invalidate();
        let second = data.game_stats(3).await;
        assert!(!Arc::ptr_eq(first.value(), second.value()));
    }

    #[test]
    fn player_board_is_generated_once_per_session() {
        let mut data = demo();
        let first = data.players();
        assert!(first.is_synthetic());
        assert_eq!(first.value().len(), 20);
        assert!(Arc::ptr_eq(first.value(), data.players().value()));

        data.invalidate();
        assert!(!Arc::ptr_eq(first.value(), data.players().value()));
    }

    #[tokio::test]
    async fn news_in_demo_mode_is_an_error() {
        let mut data = demo();
        assert!(data.news().await.is_err());
    }
}
