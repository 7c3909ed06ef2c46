use crate::app::MenuItem;
use chrono::{Local, NaiveDate};
use nba_api::{
    Game, GameId, GameStats, LiveGameUpdate, NewsItem, PlayHighlight, Player, Sourced, StatCategory,
    Team, rank_players,
};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Schedule: one day of games
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ScheduleState {
    pub date: NaiveDate,
    pub games: Option<Sourced<Arc<Vec<Game>>>>,
    pub selected: usize,
}

impl Default for ScheduleState {
    fn default() -> Self {
        Self {
            date: Local::now().date_naive(),
            games: None,
            selected: 0,
        }
    }
}

impl ScheduleState {
    pub fn next_day(&mut self) -> NaiveDate {
        self.set_date(self.date.succ_opt().unwrap_or(self.date))
    }

    pub fn prev_day(&mut self) -> NaiveDate {
        self.set_date(self.date.pred_opt().unwrap_or(self.date))
    }

    pub fn set_date(&mut self, date: NaiveDate) -> NaiveDate {
        if date != self.date {
            self.date = date;
            self.games = None;
            self.selected = 0;
        }
        self.date
    }

    /// Responses for a day the user already moved away from are dropped.
    pub fn load(&mut self, date: NaiveDate, games: Sourced<Arc<Vec<Game>>>) {
        if date != self.date {
            return;
        }
        self.selected = self.selected.min(games.value().len().saturating_sub(1));
        self.games = Some(games);
    }

    pub fn selected_game(&self) -> Option<&Game> {
        self.games.as_ref()?.value().get(self.selected)
    }

    pub fn move_down(&mut self) {
        let len = self.games.as_ref().map_or(0, |g| g.value().len());
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

// ---------------------------------------------------------------------------
// Live: games in progress plus the selected game's box score and plays
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct LiveState {
    pub games: Option<Sourced<Vec<Game>>>,
    pub selected: usize,
    pub detail: Option<GameDetail>,
}

#[derive(Debug)]
pub struct GameDetail {
    pub game_id: GameId,
    pub stats: Sourced<Arc<GameStats>>,
    pub plays: Vec<LiveGameUpdate>,
    pub plays_synthetic: bool,
}

impl LiveState {
    /// Replace the game list, keeping the selection on the same game when
    /// it is still live. Returns the selected id if it changed.
    pub fn load_games(&mut self, games: Sourced<Vec<Game>>) -> Option<GameId> {
        let previous = self.selected_game_id();
        self.selected = previous
            .and_then(|id| games.value().iter().position(|g| g.id == id))
            .unwrap_or(0);
        self.games = Some(games);

        let current = self.selected_game_id();
        if current != previous {
            self.detail = None;
        }
        current.filter(|id| Some(*id) != previous)
    }

    pub fn load_detail(
        &mut self,
        game_id: GameId,
        stats: Sourced<Arc<GameStats>>,
        updates: &Sourced<Vec<LiveGameUpdate>>,
        feed: Vec<LiveGameUpdate>,
    ) {
        if self.selected_game_id() != Some(game_id) {
            return;
        }
        self.detail = Some(GameDetail {
            game_id,
            stats,
            plays: feed,
            plays_synthetic: updates.is_synthetic(),
        });
    }

    pub fn selected_game_id(&self) -> Option<GameId> {
        self.games.as_ref()?.value().get(self.selected).map(|g| g.id)
    }

    pub fn move_down(&mut self) -> Option<GameId> {
        let len = self.games.as_ref().map_or(0, |g| g.value().len());
        if self.selected + 1 < len {
            self.selected += 1;
            self.detail = None;
            return self.selected_game_id();
        }
        None
    }

    pub fn move_up(&mut self) -> Option<GameId> {
        if self.selected > 0 {
            self.selected -= 1;
            self.detail = None;
            return self.selected_game_id();
        }
        None
    }

    pub fn is_synthetic(&self) -> bool {
        self.games.as_ref().is_some_and(Sourced::is_synthetic)
            || self
                .detail
                .as_ref()
                .is_some_and(|d| d.stats.is_synthetic() || d.plays_synthetic)
    }
}

// ---------------------------------------------------------------------------
// Highlights for one schedule game
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct HighlightsState {
    pub game: Option<Game>,
    pub items: Option<Sourced<Arc<Vec<PlayHighlight>>>>,
    pub selected: usize,
}

impl HighlightsState {
    /// Point the view at a game. Returns true when a load is needed.
    pub fn focus(&mut self, game: Game) -> bool {
        if self.game.as_ref().map(|g| g.id) == Some(game.id) && self.items.is_some() {
            return false;
        }
        self.game = Some(game);
        self.items = None;
        self.selected = 0;
        true
    }

    pub fn load(&mut self, game_id: GameId, items: Sourced<Arc<Vec<PlayHighlight>>>) {
        if self.game.as_ref().map(|g| g.id) == Some(game_id) {
            self.items = Some(items);
        }
    }

    pub fn move_down(&mut self) {
        let len = self.items.as_ref().map_or(0, |i| i.value().len());
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

// ---------------------------------------------------------------------------
// Teams and news: plain scrolling lists
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct TeamsState {
    pub teams: Option<Sourced<Arc<Vec<Team>>>>,
    pub scroll_offset: u16,
}

#[derive(Debug, Default)]
pub struct NewsState {
    pub items: Option<Arc<Vec<NewsItem>>>,
    pub error: Option<String>,
    pub selected: usize,
}

impl NewsState {
    pub fn load(&mut self, items: Arc<Vec<NewsItem>>) {
        self.error = None;
        self.selected = self.selected.min(items.len().saturating_sub(1));
        self.items = Some(items);
    }

    pub fn fail(&mut self, message: String) {
        self.error = Some(message);
    }

    pub fn move_down(&mut self) {
        let len = self.items.as_ref().map_or(0, |i| i.len());
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

// ---------------------------------------------------------------------------
// Players: searchable leaderboard
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct PlayersState {
    pub players: Option<Sourced<Arc<Vec<Player>>>>,
    pub query: String,
    /// Keystrokes go to the search box.
    pub searching: bool,
    /// `None` lists everyone in board order.
    pub category: Option<StatCategory>,
    pub selected: usize,
}

impl PlayersState {
    pub fn load(&mut self, players: Sourced<Arc<Vec<Player>>>) {
        self.players = Some(players);
        self.clamp_selection();
    }

    pub fn visible(&self) -> Vec<&Player> {
        match &self.players {
            Some(players) => rank_players(players.value(), &self.query, self.category),
            None => Vec::new(),
        }
    }

    /// Cycle All -> PPG -> ... -> BPG -> All.
    pub fn next_category(&mut self) {
        let position = self.category.and_then(|c| StatCategory::ALL.iter().position(|x| *x == c));
        self.category = match position {
            None => StatCategory::ALL.first().copied(),
            Some(i) => StatCategory::ALL.get(i + 1).copied(),
        };
        self.selected = 0;
    }

    pub fn prev_category(&mut self) {
        let position = self.category.and_then(|c| StatCategory::ALL.iter().position(|x| *x == c));
        self.category = match position {
            None => StatCategory::ALL.last().copied(),
            Some(0) => None,
            Some(i) => StatCategory::ALL.get(i - 1).copied(),
        };
        self.selected = 0;
    }

    pub fn push_char(&mut self, c: char) {
        self.query.push(c);
        self.clamp_selection();
    }

    pub fn pop_char(&mut self) {
        self.query.pop();
        self.clamp_selection();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
        self.searching = false;
        self.clamp_selection();
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.visible().len() {
            self.selected += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.visible().len().saturating_sub(1));
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub schedule: ScheduleState,
    pub live: LiveState,
    pub highlights: HighlightsState,
    pub teams: TeamsState,
    pub players: PlayersState,
    pub news: NewsState,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use nba_api::{GameStatus, synthetic};
    use rand::SeedableRng;

    fn game(id: GameId) -> Game {
        let teams = synthetic::league_teams();
        Game {
            id,
            date: Utc.with_ymd_and_hms(2024, 3, 15, 23, 30, 0).unwrap(),
            home_team: teams[0].clone(),
            away_team: teams[1].clone(),
            home_score: 50,
            away_score: 48,
            status: GameStatus::Live,
            current_period: Some("Q3 04:45".into()),
            arena: "State Farm Arena".into(),
            location: "Atlanta".into(),
        }
    }

    #[test]
    fn changing_day_clears_the_loaded_schedule() {
        let mut schedule = ScheduleState {
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            ..Default::default()
        };
        let day = schedule.date;
        schedule.load(day, Sourced::Live(Arc::new(vec![game(1), game(2)])));
        schedule.move_down();
        assert_eq!(schedule.selected_game().map(|g| g.id), Some(2));

        assert_eq!(schedule.next_day(), NaiveDate::from_ymd_opt(2024, 3, 16).unwrap());
        assert!(schedule.games.is_none());
        assert_eq!(schedule.selected, 0);

        // A late answer for the previous day is ignored.
        schedule.load(day, Sourced::Live(Arc::new(vec![game(1)])));
        assert!(schedule.games.is_none());
    }

    #[test]
    fn live_selection_follows_the_same_game_across_refreshes() {
        let mut live = LiveState::default();
        assert_eq!(live.load_games(Sourced::Live(vec![game(1), game(2)])), Some(1));
        assert_eq!(live.move_down(), Some(2));

        assert_eq!(live.load_games(Sourced::Live(vec![game(3), game(2)])), None);
        assert_eq!(live.selected_game_id(), Some(2));

        assert_eq!(live.load_games(Sourced::Live(vec![game(3)])), Some(3));
        assert_eq!(live.load_games(Sourced::Synthetic(Vec::new())), None);
        assert_eq!(live.selected_game_id(), None);
        assert!(live.is_synthetic());
    }

    #[test]
    fn detail_for_a_stale_selection_is_dropped() {
        let mut live = LiveState::default();
        live.load_games(Sourced::Live(vec![game(1), game(2)]));
        let stats = Sourced::Live(Arc::new(GameStats::default()));
        live.load_detail(2, stats.clone(), &Sourced::Live(Vec::new()), Vec::new());
        assert!(live.detail.is_none());

        live.load_detail(1, stats, &Sourced::Synthetic(Vec::new()), Vec::new());
        assert!(live.detail.as_ref().is_some_and(|d| d.plays_synthetic));
        assert!(live.is_synthetic());
    }

    #[test]
    fn highlights_reload_only_for_a_new_game() {
        let mut highlights = HighlightsState::default();
        assert!(highlights.focus(game(5)));
        highlights.load(6, Sourced::Live(Arc::new(Vec::new())));
        assert!(highlights.items.is_none());

        highlights.load(5, Sourced::Live(Arc::new(Vec::new())));
        assert!(!highlights.focus(game(5)));
        assert!(highlights.focus(game(6)));
    }

    #[test]
    fn player_board_cycles_categories_and_filters() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(11);
        let mut players = PlayersState::default();
        players.load(Sourced::Synthetic(Arc::new(synthetic::top_players(&mut rng))));
        assert_eq!(players.visible().len(), 20);

        players.next_category();
        assert_eq!(players.category, Some(StatCategory::Points));
        let leaders = players.visible();
        assert_eq!(leaders.len(), 10);
        assert!(leaders.windows(2).all(|w| w[0].stats.ppg >= w[1].stats.ppg));

        players.prev_category();
        assert_eq!(players.category, None);
        players.prev_category();
        assert_eq!(players.category, Some(StatCategory::Blocks));
        players.next_category();
        assert_eq!(players.category, None);

        for _ in 0..30 {
            players.move_down();
        }
        assert_eq!(players.selected, 19);
        "lakers".chars().for_each(|c| players.push_char(c));
        let names: Vec<_> = players.visible().iter().map(|p| p.name.clone()).collect();
        assert_eq!(names, ["LeBron James", "Anthony Davis"]);
        assert_eq!(players.selected, 1);

        players.clear_query();
        assert_eq!(players.visible().len(), 20);
    }

    #[test]
    fn news_error_is_cleared_by_a_successful_load() {
        let mut news = NewsState::default();
        news.fail("offline".into());
        assert!(news.error.is_some());
        news.load(Arc::new(Vec::new()));
        assert!(news.error.is_none());
    }
}
