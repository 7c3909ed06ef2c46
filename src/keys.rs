use crate::app::{App, MenuItem};
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;
    let mut requests: Vec<NetworkRequest> = Vec::new();

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('c'), KeyModifiers::CONTROL) => quit(),

        // Player search box takes every other key while open
        (MenuItem::Players, code, _) if guard.state.players.searching => match code {
            Char(c) => guard.state.players.push_char(c),
            KeyCode::Backspace => guard.state.players.pop_char(),
            KeyCode::Enter => guard.state.players.searching = false,
            KeyCode::Esc => guard.state.players.clear_query(),
            _ => {}
        },

        (_, Char('q'), _) => quit(),

        // Tab switching
        (_, Char('1'), _) => requests = guard.update_tab(MenuItem::Schedule),
        (_, Char('2'), _) => requests = guard.update_tab(MenuItem::Live),
        (_, Char('3'), _) => requests = guard.update_tab(MenuItem::Highlights),
        (_, Char('4'), _) => requests = guard.update_tab(MenuItem::Teams),
        (_, Char('5'), _) => requests = guard.update_tab(MenuItem::Players),
        (_, Char('6'), _) => requests = guard.update_tab(MenuItem::News),
        (_, Char('?'), _) => requests = guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => requests = guard.exit_help(),

        // Refresh drops every cached answer, then reloads the view
        (_, Char('r'), _) => {
            requests.push(NetworkRequest::Invalidate);
            requests.extend(guard.initial_requests());
        }

        // Schedule
        (MenuItem::Schedule, Char('l') | KeyCode::Right, _) => requests.push(guard.schedule_next_day()),
        (MenuItem::Schedule, Char('h') | KeyCode::Left, _) => requests.push(guard.schedule_prev_day()),
        (MenuItem::Schedule, Char('t'), _) => requests.push(guard.schedule_today()),
        (MenuItem::Schedule, Char('j') | KeyCode::Down, _) => guard.state.schedule.move_down(),
        (MenuItem::Schedule, Char('k') | KeyCode::Up, _) => guard.state.schedule.move_up(),
        (MenuItem::Schedule, KeyCode::Enter, _) => requests = guard.show_highlights(),

        // Live
        (MenuItem::Live, Char('j') | KeyCode::Down, _) => requests.extend(guard.live_move_down()),
        (MenuItem::Live, Char('k') | KeyCode::Up, _) => requests.extend(guard.live_move_up()),

        // Highlights
        (MenuItem::Highlights, Char('j') | KeyCode::Down, _) => guard.state.highlights.move_down(),
        (MenuItem::Highlights, Char('k') | KeyCode::Up, _) => guard.state.highlights.move_up(),
        (MenuItem::Highlights, KeyCode::Esc, _) => requests = guard.update_tab(MenuItem::Schedule),

        // Teams
        (MenuItem::Teams, Char('j') | KeyCode::Down, _) => {
            guard.state.teams.scroll_offset = guard.state.teams.scroll_offset.saturating_add(1);
        }
        (MenuItem::Teams, Char('k') | KeyCode::Up, _) => {
            guard.state.teams.scroll_offset = guard.state.teams.scroll_offset.saturating_sub(1);
        }

        // Players
        (MenuItem::Players, Char('/'), _) => guard.state.players.searching = true,
        (MenuItem::Players, Char('l') | KeyCode::Right | KeyCode::Tab, _) => {
            guard.state.players.next_category();
        }
        (MenuItem::Players, Char('h') | KeyCode::Left | KeyCode::BackTab, _) => {
            guard.state.players.prev_category();
        }
        (MenuItem::Players, Char('j') | KeyCode::Down, _) => guard.state.players.move_down(),
        (MenuItem::Players, Char('k') | KeyCode::Up, _) => guard.state.players.move_up(),
        (MenuItem::Players, KeyCode::Esc, _) => guard.state.players.clear_query(),

        // News
        (MenuItem::News, Char('j') | KeyCode::Down, _) => guard.state.news.move_down(),
        (MenuItem::News, Char('k') | KeyCode::Up, _) => guard.state.news.move_up(),

        // Global
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }

    drop(guard);
    for request in requests {
        let _ = network_requests.send(request).await;
    }
}

fn quit() -> ! {
    crate::cleanup_terminal();
    std::process::exit(0);
}
