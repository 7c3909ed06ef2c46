use crate::state::network::LoadingState;
use chrono::NaiveDate;
use crossterm::event::KeyEvent;
use nba_api::{
    Game, GameId, GameStats, LiveGameUpdate, NewsItem, PlayHighlight, Player, Sourced, Team,
};
use std::sync::Arc;
use tokio::sync::oneshot;

#[derive(Debug)]
pub enum NetworkRequest {
    LoadSchedule { date: NaiveDate },
    LoadLiveGames,
    /// Box score plus the latest play-by-play for one game.
    LoadGameDetail { game_id: GameId },
    LoadHighlights { game_id: GameId },
    LoadTeams,
    LoadPlayers,
    LoadNews,
    /// Forget everything cached so the following loads hit the sources.
    Invalidate,
    /// One polling cycle. `done` fires once the inner request was answered.
    Poll {
        request: Box<NetworkRequest>,
        done: oneshot::Sender<()>,
    },
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    ScheduleLoaded { date: NaiveDate, games: Sourced<Arc<Vec<Game>>> },
    LiveGamesLoaded { games: Sourced<Vec<Game>> },
    GameDetailLoaded {
        game_id: GameId,
        stats: Sourced<Arc<GameStats>>,
        updates: Sourced<Vec<LiveGameUpdate>>,
        /// Everything seen for this game so far, newest first.
        feed: Vec<LiveGameUpdate>,
    },
    HighlightsLoaded { game_id: GameId, highlights: Sourced<Arc<Vec<PlayHighlight>>> },
    TeamsLoaded { teams: Sourced<Arc<Vec<Team>>> },
    PlayersLoaded { players: Sourced<Arc<Vec<Player>>> },
    NewsLoaded { news: Arc<Vec<NewsItem>> },
    Invalidated,
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
