mod app;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::error;
use nba_api::{ApiConfig, SettingsStore, SportsData};
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tui::{Terminal, backend::CrosstermBackend};

/// What the command line asked for.
#[derive(Debug, PartialEq)]
enum Launch {
    Dashboard { demo: bool },
    Exit,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Launch::Dashboard { demo } = handle_cli_args(std::env::args().skip(1))? else {
        return Ok(());
    };

    better_panic::install();

    let mut config = ApiConfig::from_env();
    config.demo |= demo;
    let demo = config.demo;

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    tui_logger::init_logger(log::LevelFilter::Error)?;
    tui_logger::set_default_level(log::LevelFilter::Error);

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);

    let app = Arc::new(Mutex::new(App::new(network_req_tx.clone(), demo)));

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Network thread
    let network_worker = NetworkWorker::new(SportsData::new(config), network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    let result = main_ui_loop(terminal, app, ui_event_rx, network_req_tx, network_resp_rx).await;

    input_handler.abort();
    network_task.abort();
    cleanup_terminal();

    result
}

fn handle_cli_args(args: impl Iterator<Item = String>) -> anyhow::Result<Launch> {
    let mut args = args;
    let mut demo = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                println!("{}", usage_text());
                return Ok(Launch::Exit);
            }
            "-V" | "--version" => {
                println!("hoopdash {}", env!("CARGO_PKG_VERSION"));
                return Ok(Launch::Exit);
            }
            "--demo" => demo = true,
            "--set-api-key" => {
                let Some(key) = args.next() else {
                    anyhow::bail!("--set-api-key needs a value\n\n{}", usage_text());
                };
                let store = SettingsStore::default_location();
                store.set_api_key(&key)?;
                println!("API key saved to {}", store.path().display());
                return Ok(Launch::Exit);
            }
            "--clear-api-key" => {
                let store = SettingsStore::default_location();
                store.clear_api_key()?;
                println!("API key removed from {}", store.path().display());
                return Ok(Launch::Exit);
            }
            _ => anyhow::bail!("Unknown argument: {arg}\n\n{}", usage_text()),
        }
    }

    Ok(Launch::Dashboard { demo })
}

fn usage_text() -> &'static str {
    "hoopdash - NBA scores, box scores, highlights, player leaders and news in your terminal

Usage:
  hoopdash [--demo]
  hoopdash --set-api-key KEY
  hoopdash --clear-api-key
  hoopdash --help
  hoopdash --version

Options:
  --demo              Use generated data only, never touch the network
  --set-api-key KEY   Store the RapidAPI key in the settings file
  --clear-api-key     Remove the stored key

Environment:
  NBA_API_KEY         RapidAPI key, takes precedence over the settings file
  HOOPDASH_DEMO       Set to 1 to start in demo mode
  HOOPDASH_LOG        Log level for the log pane (error, warn, info, debug)"
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
) -> anyhow::Result<()> {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw = handle_ui_event(ui_event, &app, &network_requests).await;
                if should_redraw && !loading.is_loading {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading)?;
                }
            }

            Some(response) = network_responses.recv() => {
                let should_redraw =
                    handle_network_response(response, &app, &network_requests, &mut loading).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading)?;
                }
            }

            else => return Ok(()),
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            let requests = app.lock().await.initial_requests();
            for request in requests {
                let _ = network_requests.send(request).await;
            }
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests).await;
            true
        }
        UiEvent::Resize => true,
    }
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
    loading: &mut LoadingState,
) -> bool {
    match response {
        NetworkResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
            return true;
        }
        NetworkResponse::ScheduleLoaded { date, games } => {
            app.lock().await.on_schedule_loaded(date, games);
        }
        NetworkResponse::LiveGamesLoaded { games } => {
            let follow_up = app.lock().await.on_live_games_loaded(games);
            if let Some(request) = follow_up {
                let _ = network_requests.send(request).await;
            }
        }
        NetworkResponse::GameDetailLoaded { game_id, stats, updates, feed } => {
            app.lock().await.on_game_detail_loaded(game_id, stats, updates, feed);
        }
        NetworkResponse::HighlightsLoaded { game_id, highlights } => {
            app.lock().await.on_highlights_loaded(game_id, highlights);
        }
        NetworkResponse::TeamsLoaded { teams } => {
            app.lock().await.on_teams_loaded(teams);
        }
        NetworkResponse::PlayersLoaded { players } => {
            app.lock().await.on_players_loaded(players);
        }
        NetworkResponse::NewsLoaded { news } => {
            app.lock().await.on_news_loaded(news);
        }
        NetworkResponse::Invalidated => {}
        NetworkResponse::Error { message } => {
            error!("Network error: {message}");
            app.lock().await.on_error(message);
        }
    }
    !loading.is_loading
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        let event = match tokio::task::spawn_blocking(crossterm_event::read).await {
            Ok(Ok(event)) => event,
            Ok(Err(e)) => {
                error!("terminal input failed: {e}");
                break;
            }
            Err(_) => break,
        };

        let ui_event = match event {
            Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
            Event::Resize(_, _) => Some(UiEvent::Resize),
            _ => None,
        };

        if let Some(ui_event) = ui_event
            && ui_events.send(ui_event).await.is_err()
        {
            break;
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, cursor::Hide)?;
    execute!(stdout, terminal::EnterAlternateScreen)?;
    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    terminal::enable_raw_mode()
}

/// Best effort: also runs from the panic hook, where errors can't go anywhere.
pub fn cleanup_terminal() {
    let mut stdout = io::stdout();
    let _ = execute!(stdout, cursor::MoveTo(0, 0));
    let _ = execute!(stdout, terminal::Clear(terminal::ClearType::All));
    let _ = execute!(stdout, terminal::LeaveAlternateScreen);
    let _ = execute!(stdout, cursor::Show);
    let _ = terminal::disable_raw_mode();
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<Launch> {
        handle_cli_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn no_arguments_starts_the_dashboard() {
        assert_eq!(parse(&[]).unwrap(), Launch::Dashboard { demo: false });
        assert_eq!(parse(&["--demo"]).unwrap(), Launch::Dashboard { demo: true });
    }

    #[test]
    fn informational_flags_exit() {
        assert_eq!(parse(&["--version"]).unwrap(), Launch::Exit);
        assert_eq!(parse(&["-h"]).unwrap(), Launch::Exit);
    }

    #[test]
    fn bad_arguments_are_errors() {
        assert!(parse(&["--bogus"]).is_err());
        assert!(parse(&["--set-api-key"]).is_err());
    }
}
