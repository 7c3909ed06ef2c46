use crate::state::app_settings::AppSettings;
use crate::state::app_state::AppState;
use crate::state::messages::NetworkRequest;
use crate::state::refresher::{GAME_DETAIL_PERIOD, LIVE_GAMES_PERIOD, Poller};
use chrono::{Local, NaiveDate};
use nba_api::{
    Game, GameId, GameStats, LiveGameUpdate, NewsItem, PlayHighlight, Player, Sourced, Team,
};
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Schedule,
    Live,
    Highlights,
    Teams,
    Players,
    News,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
    /// Serving generated data only.
    pub demo: bool,
    network_requests: mpsc::Sender<NetworkRequest>,
    live_poller: Option<Poller>,
    game_poller: Option<Poller>,
}

impl App {
    pub fn new(network_requests: mpsc::Sender<NetworkRequest>, demo: bool) -> Self {
        let settings = AppSettings::load();

        let app = Self {
            state: AppState::new(),
            settings,
            demo,
            network_requests,
            live_poller: None,
            game_poller: None,
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    /// Requests that fill the active view from scratch.
    pub fn initial_requests(&self) -> Vec<NetworkRequest> {
        match self.state.active_tab {
            MenuItem::Schedule => vec![NetworkRequest::LoadSchedule { date: self.state.schedule.date }],
            MenuItem::Live => {
                let mut requests = vec![NetworkRequest::LoadLiveGames];
                if let Some(game_id) = self.state.live.selected_game_id() {
                    requests.push(NetworkRequest::LoadGameDetail { game_id });
                }
                requests
            }
            MenuItem::Highlights => self
                .state
                .highlights
                .game
                .as_ref()
                .map(|g| vec![NetworkRequest::LoadHighlights { game_id: g.id }])
                .unwrap_or_default(),
            MenuItem::Teams => vec![NetworkRequest::LoadTeams],
            MenuItem::Players => vec![NetworkRequest::LoadPlayers],
            MenuItem::News => vec![NetworkRequest::LoadNews],
            MenuItem::Help => Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_schedule_loaded(&mut self, date: NaiveDate, games: Sourced<Arc<Vec<Game>>>) {
        self.state.schedule.load(date, games);
    }

    /// Returns a detail request when the selected live game changed. With
    /// nothing left to select the detail poller stops.
    pub fn on_live_games_loaded(&mut self, games: Sourced<Vec<Game>>) -> Option<NetworkRequest> {
        let changed = self.state.live.load_games(games);
        if self.state.live.selected_game_id().is_none() {
            self.game_poller = None;
            return None;
        }
        self.watch_game(changed?)
    }

    pub fn on_game_detail_loaded(
        &mut self,
        game_id: GameId,
        stats: Sourced<Arc<GameStats>>,
        updates: Sourced<Vec<LiveGameUpdate>>,
        feed: Vec<LiveGameUpdate>,
    ) {
        self.state.live.load_detail(game_id, stats, &updates, feed);
    }

    pub fn on_highlights_loaded(&mut self, game_id: GameId, highlights: Sourced<Arc<Vec<PlayHighlight>>>) {
        self.state.highlights.load(game_id, highlights);
    }

    pub fn on_teams_loaded(&mut self, teams: Sourced<Arc<Vec<Team>>>) {
        self.state.teams.teams = Some(teams);
    }

    pub fn on_players_loaded(&mut self, players: Sourced<Arc<Vec<Player>>>) {
        self.state.players.load(players);
    }

    pub fn on_news_loaded(&mut self, news: Arc<Vec<NewsItem>>) {
        self.state.news.load(news);
    }

    pub fn on_error(&mut self, message: String) {
        self.state.news.fail(message);
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    /// Switch views. Returns the requests the new view needs.
    pub fn update_tab(&mut self, next: MenuItem) -> Vec<NetworkRequest> {
        if self.state.active_tab == next {
            return Vec::new();
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;

        if self.state.previous_tab == MenuItem::Live {
            self.stop_live_polling();
        }
        if next == MenuItem::Live {
            self.start_live_polling();
        }
        self.initial_requests()
    }

    /// Back to the view help was opened from, restarting its pollers.
    pub fn exit_help(&mut self) -> Vec<NetworkRequest> {
        if self.state.active_tab != MenuItem::Help {
            return Vec::new();
        }
        self.update_tab(self.state.previous_tab)
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // Schedule navigation
    // -----------------------------------------------------------------------

    pub fn schedule_next_day(&mut self) -> NetworkRequest {
        NetworkRequest::LoadSchedule { date: self.state.schedule.next_day() }
    }

    pub fn schedule_prev_day(&mut self) -> NetworkRequest {
        NetworkRequest::LoadSchedule { date: self.state.schedule.prev_day() }
    }

    pub fn schedule_today(&mut self) -> NetworkRequest {
        NetworkRequest::LoadSchedule {
            date: self.state.schedule.set_date(Local::now().date_naive()),
        }
    }

    /// Open the highlights view on the selected schedule game.
    pub fn show_highlights(&mut self) -> Vec<NetworkRequest> {
        let Some(game) = self.state.schedule.selected_game().cloned() else {
            return Vec::new();
        };
        let game_id = game.id;
        let needs_load = self.state.highlights.focus(game);
        let mut requests = self.update_tab(MenuItem::Highlights);
        if needs_load && requests.is_empty() {
            requests.push(NetworkRequest::LoadHighlights { game_id });
        }
        requests
    }

    // -----------------------------------------------------------------------
    // Live view polling
    // -----------------------------------------------------------------------

    pub fn live_move_down(&mut self) -> Option<NetworkRequest> {
        let game_id = self.state.live.move_down()?;
        self.watch_game(game_id)
    }

    pub fn live_move_up(&mut self) -> Option<NetworkRequest> {
        let game_id = self.state.live.move_up()?;
        self.watch_game(game_id)
    }

    /// Re-point the detail poller at `game_id`. Only polls while the Live
    /// view is showing.
    fn watch_game(&mut self, game_id: GameId) -> Option<NetworkRequest> {
        if self.state.active_tab != MenuItem::Live {
            return None;
        }
        self.game_poller = Some(Poller::start(
            "game detail",
            GAME_DETAIL_PERIOD,
            self.network_requests.clone(),
            move || NetworkRequest::LoadGameDetail { game_id },
        ));
        Some(NetworkRequest::LoadGameDetail { game_id })
    }

    fn start_live_polling(&mut self) {
        self.live_poller = Some(Poller::start(
            "live games",
            LIVE_GAMES_PERIOD,
            self.network_requests.clone(),
            || NetworkRequest::LoadLiveGames,
        ));
        if let Some(game_id) = self.state.live.selected_game_id() {
            self.game_poller = Some(Poller::start(
                "game detail",
                GAME_DETAIL_PERIOD,
                self.network_requests.clone(),
                move || NetworkRequest::LoadGameDetail { game_id },
            ));
        }
    }

    fn stop_live_polling(&mut self) {
        self.live_poller = None;
        self.game_poller = None;
    }

    pub fn is_polling(&self) -> bool {
        self.live_poller.as_ref().is_some_and(Poller::is_running)
    }

    pub fn is_polling_game(&self) -> bool {
        self.game_poller.as_ref().is_some_and(Poller::is_running)
    }

    /// Whether the active view is showing generated data.
    pub fn showing_synthetic(&self) -> bool {
        match self.state.active_tab {
            MenuItem::Schedule => self.state.schedule.games.as_ref().is_some_and(Sourced::is_synthetic),
            MenuItem::Live => self.state.live.is_synthetic(),
            MenuItem::Highlights => self.state.highlights.items.as_ref().is_some_and(Sourced::is_synthetic),
            MenuItem::Teams => self.state.teams.teams.as_ref().is_some_and(Sourced::is_synthetic),
            MenuItem::Players => self.state.players.players.as_ref().is_some_and(Sourced::is_synthetic),
            MenuItem::News | MenuItem::Help => false,
        }
    }
}
