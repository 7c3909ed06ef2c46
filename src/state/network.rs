use crate::state::messages::{NetworkRequest, NetworkResponse};
use log::{debug, error};
use nba_api::{ApiError, SportsData};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

/// Owns the data adapter and serves requests one at a time, so the cache
/// is only ever touched from this task.
pub struct NetworkWorker {
    data: SportsData,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        data: SportsData,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            data,
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            let (request, done) = match request {
                NetworkRequest::Poll { request, done } => (*request, Some(done)),
                request => (request, None),
            };

            let delivered = self.serve(request).await;
            if let Some(done) = done {
                let _ = done.send(());
            }
            if !delivered {
                break;
            }
        }
    }

    /// Answer one request. Returns false once the UI side has gone away.
    async fn serve(&mut self, request: NetworkRequest) -> bool {
        self.start_loading_animation().await;
        let result = self.handle(request).await;
        debug!("network request complete");
        self.stop_loading_animation(result.is_ok()).await;

        let response = result.unwrap_or_else(|err| NetworkResponse::Error {
            message: err.to_string(),
        });

        if let Err(e) = self.responses.send(response).await {
            error!("Failed to send network response: {e}");
            return false;
        }
        true
    }

    async fn handle(&mut self, request: NetworkRequest) -> Result<NetworkResponse, ApiError> {
        let response = match request {
            NetworkRequest::LoadSchedule { date } => {
                debug!("loading schedule for {date}");
                let games = self.data.games_for_date(date).await;
                NetworkResponse::ScheduleLoaded { date, games }
            }
            NetworkRequest::LoadLiveGames => {
                debug!("loading live games");
                NetworkResponse::LiveGamesLoaded { games: self.data.live_games().await }
            }
            NetworkRequest::LoadGameDetail { game_id } => {
                debug!("loading box score and plays for {game_id}");
                let stats = self.data.game_stats(game_id).await;
                let updates = self.data.live_updates(game_id).await;
                NetworkResponse::GameDetailLoaded {
                    game_id,
                    stats,
                    updates,
                    feed: self.data.live_feed(game_id),
                }
            }
            NetworkRequest::LoadHighlights { game_id } => {
                debug!("loading highlights for {game_id}");
                let highlights = self.data.highlights(game_id).await;
                NetworkResponse::HighlightsLoaded { game_id, highlights }
            }
            NetworkRequest::LoadTeams => NetworkResponse::TeamsLoaded { teams: self.data.teams().await },
            NetworkRequest::LoadPlayers => NetworkResponse::PlayersLoaded { players: self.data.players() },
            NetworkRequest::LoadNews => NetworkResponse::NewsLoaded { news: self.data.news().await? },
            NetworkRequest::Invalidate => {
                debug!("dropping cached responses");
                self.data.invalidate();
                NetworkResponse::Invalidated
            }
            NetworkRequest::Poll { done, .. } => {
                let _ = done.send(());
                return Err(ApiError::NotFound("poll requests cannot be nested".into()));
            }
        };
        Ok(response)
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nba_api::ApiConfig;
    use tokio::sync::oneshot;

    fn demo_worker() -> (mpsc::Sender<NetworkRequest>, mpsc::Receiver<NetworkResponse>) {
        let config = ApiConfig { demo: true, ..ApiConfig::default() };
        let (req_tx, req_rx) = mpsc::channel(16);
        let (resp_tx, resp_rx) = mpsc::channel(256);
        tokio::spawn(NetworkWorker::new(SportsData::new(config), req_rx, resp_tx).run());
        (req_tx, resp_rx)
    }

    async fn next_data(responses: &mut mpsc::Receiver<NetworkResponse>) -> NetworkResponse {
        loop {
            match responses.recv().await {
                Some(NetworkResponse::LoadingStateChanged { .. }) => continue,
                Some(other) => return other,
                None => panic!("worker stopped"),
            }
        }
    }

    #[tokio::test]
    async fn poll_cycle_signals_completion_after_response() {
        let (requests, mut responses) = demo_worker();
        let (done_tx, done_rx) = oneshot::channel();
        requests
            .send(NetworkRequest::Poll {
                request: Box::new(NetworkRequest::LoadGameDetail { game_id: 12 }),
                done: done_tx,
            })
            .await
            .unwrap();

        match next_data(&mut responses).await {
            NetworkResponse::GameDetailLoaded { game_id, stats, updates, feed } => {
                assert_eq!(game_id, 12);
                assert!(stats.is_synthetic());
                assert_eq!(updates.value().len(), 10);
                assert_eq!(feed.len(), 10);
            }
            other => panic!("unexpected response {other:?}"),
        }
        done_rx.await.unwrap();
    }

    #[tokio::test]
    async fn news_failure_becomes_an_error_response() {
        let (requests, mut responses) = demo_worker();
        requests.send(NetworkRequest::LoadNews).await.unwrap();
        assert!(matches!(next_data(&mut responses).await, NetworkResponse::Error { .. }));
    }
}
