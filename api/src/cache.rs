//! In-memory memo of adapter results, keyed per operation.

use crate::{Game, GameId, GameStats, LiveGameUpdate, NewsItem, PlayHighlight, Player, Sourced, Team};
use chrono::NaiveDate;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Most recent play-by-play events kept per game.
pub const LIVE_FEED_CAPACITY: usize = 50;

#[derive(Debug, Clone)]
pub struct Timed<T> {
    pub value: T,
    pub fetched_at: Instant,
}

impl<T> Timed<T> {
    pub fn new(value: T, fetched_at: Instant) -> Self {
        Self { value, fetched_at }
    }

    pub fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.fetched_at) < ttl
    }
}

/// Bounded, newest-first event log for one game.
#[derive(Debug, Clone, Default)]
pub struct LiveFeed {
    events: VecDeque<LiveGameUpdate>,
}

impl LiveFeed {
    /// Fold a newest-first batch into the feed. Events already present are
    /// skipped and the oldest are evicted past capacity.
    pub fn merge(&mut self, batch: &[LiveGameUpdate]) {
        for update in batch.iter().rev() {
            if self.events.iter().any(|e| same_event(e, update)) {
                continue;
            }
            self.events.push_front(update.clone());
        }
        self.events.truncate(LIVE_FEED_CAPACITY);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn latest(&self) -> Option<&LiveGameUpdate> {
        self.events.front()
    }

    pub fn to_vec(&self) -> Vec<LiveGameUpdate> {
        self.events.iter().cloned().collect()
    }
}

fn same_event(a: &LiveGameUpdate, b: &LiveGameUpdate) -> bool {
    a.period == b.period && a.time_remaining == b.time_remaining && a.description == b.description
}

#[derive(Debug)]
pub struct ResponseCache {
    ttl: Duration,
    games: HashMap<NaiveDate, Timed<Sourced<Arc<Vec<Game>>>>>,
    teams: Option<Timed<Sourced<Arc<Vec<Team>>>>>,
    news: Option<Timed<Arc<Vec<NewsItem>>>>,
    stats: HashMap<GameId, Sourced<Arc<GameStats>>>,
    highlights: HashMap<GameId, Sourced<Arc<Vec<PlayHighlight>>>>,
    live_feeds: HashMap<GameId, LiveFeed>,
    players: Option<Sourced<Arc<Vec<Player>>>>,
    /// Last scoreboard, kept apart from the schedules: its ids come from
    /// another provider.
    scoreboard: Vec<Game>,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            games: HashMap::new(),
            teams: None,
            news: None,
            stats: HashMap::new(),
            highlights: HashMap::new(),
            live_feeds: HashMap::new(),
            players: None,
            scoreboard: Vec::new(),
        }
    }

    pub fn games(&self, date: NaiveDate, now: Instant) -> Option<Sourced<Arc<Vec<Game>>>> {
        self.games
            .get(&date)
            .filter(|entry| entry.is_fresh(self.ttl, now))
            .map(|entry| entry.value.clone())
    }

    pub fn put_games(&mut self, date: NaiveDate, games: Sourced<Arc<Vec<Game>>>, now: Instant) {
        self.games.insert(date, Timed::new(games, now));
    }

    pub fn put_scoreboard(&mut self, games: Vec<Game>) {
        self.scoreboard = games;
    }

    /// Look a game up in any cached schedule, fresh or not, then in the
    /// last scoreboard.
    pub fn find_game(&self, game_id: GameId) -> Option<&Game> {
        self.games
            .values()
            .flat_map(|entry| entry.value.value().iter())
            .chain(self.scoreboard.iter())
            .find(|g| g.id == game_id)
    }

    pub fn teams(&self, now: Instant) -> Option<Sourced<Arc<Vec<Team>>>> {
        self.teams
            .as_ref()
            .filter(|entry| entry.is_fresh(self.ttl, now))
            .map(|entry| entry.value.clone())
    }

    pub fn put_teams(&mut self, teams: Sourced<Arc<Vec<Team>>>, now: Instant) {
        self.teams = Some(Timed::new(teams, now));
    }

    pub fn news(&self, now: Instant) -> Option<Arc<Vec<NewsItem>>> {
        self.news
            .as_ref()
            .filter(|entry| entry.is_fresh(self.ttl, now))
            .map(|entry| entry.value.clone())
    }

    pub fn put_news(&mut self, news: Arc<Vec<NewsItem>>, now: Instant) {
        self.news = Some(Timed::new(news, now));
    }

    pub fn stats(&self, game_id: GameId) -> Option<Sourced<Arc<GameStats>>> {
        self.stats.get(&game_id).cloned()
    }

    pub fn put_stats(&mut self, game_id: GameId, stats: Sourced<Arc<GameStats>>) {
        self.stats.insert(game_id, stats);
    }

    pub fn highlights(&self, game_id: GameId) -> Option<Sourced<Arc<Vec<PlayHighlight>>>> {
        self.highlights.get(&game_id).cloned()
    }

    pub fn put_highlights(&mut self, game_id: GameId, highlights: Sourced<Arc<Vec<PlayHighlight>>>) {
        self.highlights.insert(game_id, highlights);
    }

    pub fn players(&self) -> Option<Sourced<Arc<Vec<Player>>>> {
        self.players.clone()
    }

    pub fn put_players(&mut self, players: Sourced<Arc<Vec<Player>>>) {
        self.players = Some(players);
    }

    pub fn live_feed(&self, game_id: GameId) -> Option<&LiveFeed> {
        self.live_feeds.get(&game_id)
    }

    pub fn merge_live_updates(&mut self, game_id: GameId, batch: &[LiveGameUpdate]) -> &LiveFeed {
        let feed = self.live_feeds.entry(game_id).or_default();
        feed.merge(batch);
        feed
    }

    pub fn clear(&mut self) {
        self.games.clear();
        self.teams = None;
        self.news = None;
        self.stats.clear();
        self.highlights.clear();
        self.live_feeds.clear();
        self.players = None;
        self.scoreboard.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScorePair;
    use chrono::{TimeZone, Utc};

    fn update(clock: &str, home: u32) -> LiveGameUpdate {
        LiveGameUpdate {
            game_id: 1,
            timestamp: Utc.with_ymd_and_hms(2024, 3, 15, 23, 0, 0).unwrap(),
            action: "2pt".into(),
            description: format!("basket at {clock}"),
            score: ScorePair { home, away: 0 },
            period: "Q1".into(),
            time_remaining: clock.into(),
        }
    }

    #[test]
    fn entries_expire_after_ttl() {
        let start = Instant::now();
        let mut cache = ResponseCache::new(Duration::from_secs(300));
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        cache.put_games(date, Sourced::Live(Arc::new(Vec::new())), start);

        assert!(cache.games(date, start + Duration::from_secs(299)).is_some());
        assert!(cache.games(date, start + Duration::from_secs(300)).is_none());
        assert!(cache.games(date.succ_opt().unwrap(), start).is_none());
    }

    #[test]
    fn zero_ttl_never_serves_from_cache() {
        let now = Instant::now();
        let mut cache = ResponseCache::new(Duration::ZERO);
        cache.put_teams(Sourced::Live(Arc::new(Vec::new())), now);
        assert!(cache.teams(now).is_none());
    }

    #[test]
    fn stats_never_expire_and_keep_identity() {
        let mut cache = ResponseCache::new(Duration::ZERO);
        let stats = Arc::new(GameStats::default());
        cache.put_stats(7, Sourced::Synthetic(stats.clone()));
        let cached = cache.stats(7).unwrap();
        assert!(cached.is_synthetic());
        assert!(Arc::ptr_eq(cached.value(), &stats));
    }

    #[test]
    fn live_feed_is_newest_first_and_deduplicated() {
        let mut feed = LiveFeed::default();
        feed.merge(&[update("11:00", 4), update("11:30", 2)]);
        feed.merge(&[update("10:40", 6), update("11:00", 4)]);

        let clocks: Vec<_> = feed.to_vec().into_iter().map(|u| u.time_remaining).collect();
        assert_eq!(clocks, vec!["10:40", "11:00", "11:30"]);
        assert_eq!(feed.latest().map(|u| u.score.home), Some(6));
    }

    #[test]
    fn live_feed_is_bounded() {
        let mut feed = LiveFeed::default();
        for batch in 0..8 {
            let events: Vec<_> = (0..10)
                .rev()
                .map(|i| update(&format!("{batch}:{i:02}"), batch * 10 + i))
                .collect();
            feed.merge(&events);
        }
        assert_eq!(feed.len(), LIVE_FEED_CAPACITY);
        assert_eq!(feed.latest().map(|u| u.score.home), Some(79));
    }
}
