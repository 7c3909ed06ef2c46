use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Tabs, Wrap};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::state::app_state::GameDetail;
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use chrono::Local;
use nba_api::{Game, GameStatus, Player, StatCategory, TeamStats};

static TABS: &[&str; 6] = &["Schedule", "Live", "Highlights", "Teams", "Players", "News"];

const DEMO_MARKER: &str = "[demo data]";

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState) -> anyhow::Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return Ok(());
    }

    let mut layout = LayoutAreas::new(current_size);

    terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Schedule => draw_schedule(f, layout.main, app),
            MenuItem::Live => draw_live(f, layout.main, app),
            MenuItem::Highlights => draw_highlights(f, layout.main, app),
            MenuItem::Teams => draw_teams(f, layout.main, app),
            MenuItem::Players => draw_players(f, layout.main, app),
            MenuItem::News => draw_news(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main),
        }

        if app.state.show_logs {
            draw_logs(f, layout.logs);
        }

        draw_loading_spinner(f, f.area(), app, loading);
    })?;
    Ok(())
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

/// Bordered block whose title carries the demo marker when `synthetic`.
fn view_block<'a>(title: String, synthetic: bool) -> Block<'a> {
    let block = default_border(Color::White).title(format!(" {title} "));
    if synthetic {
        block.title(Line::from(Span::styled(
            format!(" {DEMO_MARKER} "),
            Style::default().fg(Color::Yellow),
        )))
    } else {
        block
    }
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Schedule => 0,
        MenuItem::Live => 1,
        MenuItem::Highlights => 2,
        MenuItem::Teams => 3,
        MenuItem::Players => 4,
        MenuItem::News => 5,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS
        .iter()
        .enumerate()
        .map(|(i, t)| Line::from(format!("{} {t}", i + 1)))
        .collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = if app.demo { "demo  Help: ? " } else { "Help: ? " };
    let help = Paragraph::new(help)
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

fn status_label(game: &Game) -> String {
    match game.status {
        GameStatus::Completed => "FINAL".to_string(),
        GameStatus::Live => format!("LIVE {}", game.current_period.as_deref().unwrap_or_default()),
        GameStatus::Scheduled => game.date.with_timezone(&Local).format("%I:%M%p").to_string(),
    }
}

fn game_line(game: &Game, selected: bool) -> String {
    let marker = if selected { ">" } else { " " };
    let score = match game.status {
        GameStatus::Scheduled => "  -  ".to_string(),
        _ => format!("{:>3}-{:<3}", game.away_score, game.home_score),
    };
    format!(
        "{marker} {:<4} @ {:<4} {score}  [{}]",
        game.away_team.abbreviation,
        game.home_team.abbreviation,
        status_label(game)
    )
}

fn draw_schedule(f: &mut Frame, area: Rect, app: &App) {
    let schedule = &app.state.schedule;
    let synthetic = app.showing_synthetic();
    let block = view_block(format!("Schedule {}", schedule.date.format("%a %b %d, %Y")), synthetic);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(games) = schedule.games.as_ref() else {
        f.render_widget(
            Paragraph::new("Loading schedule...")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    };

    let mut lines = Vec::with_capacity(games.value().len() + 2);
    lines.push("h/l change day, t today, j/k move, Enter for highlights".to_string());
    lines.push(String::new());
    for (idx, game) in games.value().iter().enumerate() {
        let mut line = game_line(game, idx == schedule.selected);
        if !game.arena.is_empty() {
            line.push_str(&format!("  {}", game.arena));
        }
        lines.push(line);
    }

    f.render_widget(Paragraph::new(lines.join("\n")), inner);
}

fn draw_live(f: &mut Frame, area: Rect, app: &App) {
    let live = &app.state.live;
    let block = view_block("Live".to_string(), app.showing_synthetic());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(games) = live.games.as_ref() else {
        f.render_widget(
            Paragraph::new("Loading live games...")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    };

    if games.value().is_empty() {
        f.render_widget(
            Paragraph::new("No games in progress right now")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let [list_area, detail_area] =
        Layout::horizontal([Constraint::Length(34), Constraint::Fill(1)]).areas(inner);

    let lines: Vec<String> = games
        .value()
        .iter()
        .enumerate()
        .map(|(idx, game)| game_line(game, idx == live.selected))
        .collect();
    f.render_widget(
        Paragraph::new(lines.join("\n")).block(default_border(Color::DarkGray).title(" Games ")),
        list_area,
    );

    match live.detail.as_ref() {
        Some(detail) => draw_game_detail(f, detail_area, detail),
        None => f.render_widget(
            Paragraph::new("Loading box score...")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .block(default_border(Color::DarkGray)),
            detail_area,
        ),
    }
}

fn draw_game_detail(f: &mut Frame, area: Rect, detail: &GameDetail) {
    let [box_area, plays_area] =
        Layout::vertical([Constraint::Length(11), Constraint::Fill(1)]).areas(area);

    let stats = detail.stats.value();
    let (away, home) = (&stats.away, &stats.home);
    let row = |label: &str, away: String, home: String| format!("{label:<8}{away:>14}{home:>14}");
    let shooting = |made: u32, attempted: u32, pct: f64| format!("{made}/{attempted} {pct:.1}%");
    let lines = [
        row("", away.team.abbreviation.clone(), home.team.abbreviation.clone()),
        row("PTS", away.points.to_string(), home.points.to_string()),
        row("REB", away.rebounds.to_string(), home.rebounds.to_string()),
        row("AST", away.assists.to_string(), home.assists.to_string()),
        row("STL/BLK", steals_blocks(away), steals_blocks(home)),
        row("TOV", away.turnovers.to_string(), home.turnovers.to_string()),
        row(
            "FG",
            shooting(away.field_goals_made, away.field_goals_attempted, away.field_goal_pct()),
            shooting(home.field_goals_made, home.field_goals_attempted, home.field_goal_pct()),
        ),
        row(
            "3PT",
            shooting(away.three_points_made, away.three_points_attempted, away.three_point_pct()),
            shooting(home.three_points_made, home.three_points_attempted, home.three_point_pct()),
        ),
        row(
            "FT",
            shooting(away.free_throws_made, away.free_throws_attempted, away.free_throw_pct()),
            shooting(home.free_throws_made, home.free_throws_attempted, home.free_throw_pct()),
        ),
    ];
    f.render_widget(
        Paragraph::new(lines.join("\n")).block(default_border(Color::DarkGray).title(" Box Score ")),
        box_area,
    );

    let block = default_border(Color::DarkGray).title(" Recent Plays ");
    let inner = block.inner(plays_area);
    f.render_widget(block, plays_area);

    let plays: Vec<Line> = detail
        .plays
        .iter()
        .take(inner.height as usize)
        .enumerate()
        .map(|(idx, play)| {
            let style = if idx == 0 {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };
            let text = format!(
                "{} {:>5}  {}-{}  {}",
                play.period, play.time_remaining, play.score.away, play.score.home, play.description
            );
            let clipped: String = text.chars().take(inner.width as usize).collect();
            Line::from(Span::styled(clipped, style))
        })
        .collect();
    f.render_widget(Paragraph::new(plays), inner);
}

fn steals_blocks(stats: &TeamStats) -> String {
    format!("{}/{}", stats.steals, stats.blocks)
}

fn draw_highlights(f: &mut Frame, area: Rect, app: &App) {
    let highlights = &app.state.highlights;
    let title = highlights
        .game
        .as_ref()
        .map(|g| format!("Highlights {}", g.matchup()))
        .unwrap_or_else(|| "Highlights".to_string());
    let block = view_block(title, app.showing_synthetic());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(items) = highlights.items.as_ref() else {
        let msg = if highlights.game.is_some() {
            "Loading highlights..."
        } else {
            "Pick a game on the Schedule tab and press Enter"
        };
        f.render_widget(
            Paragraph::new(msg)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    };

    let mut lines = Vec::new();
    for (idx, item) in items.value().iter().enumerate() {
        let selected = idx == highlights.selected;
        let title_style = if selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let marker = if selected { "> " } else { "  " };
        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(item.title.clone(), title_style),
            Span::styled(format!("  {}", item.timestamp), Style::default().fg(Color::DarkGray)),
        ]));
        if selected {
            if let Some(player) = &item.player {
                lines.push(Line::from(format!("    {} ({})", player.name, player.team)));
            }
            lines.push(Line::from(format!("    {}", item.description)));
            lines.push(Line::from(Span::styled(
                format!("    {}", item.video_url),
                Style::default().fg(Color::Cyan),
            )));
        }
    }
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn draw_teams(f: &mut Frame, area: Rect, app: &App) {
    let block = view_block("Teams".to_string(), app.showing_synthetic());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(teams) = app.state.teams.teams.as_ref() else {
        f.render_widget(
            Paragraph::new("Loading teams...")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    };

    let lines: Vec<String> = teams
        .value()
        .iter()
        .map(|t| format!("{:<4} {:<26} {:>7}", t.abbreviation, t.name, t.record))
        .collect();
    f.render_widget(
        Paragraph::new(lines.join("\n")).scroll((app.state.teams.scroll_offset, 0)),
        inner,
    );
}

fn player_line(rank: usize, player: &Player, selected: bool) -> String {
    let marker = if selected { ">" } else { " " };
    let s = &player.stats;
    format!(
        "{marker}{rank:>2}. {:<24} {:<3} {:<4}{:>6.1}{:>6.1}{:>6.1}{:>6.1}{:>6.1}{:>7.1}{:>7.1}",
        player.name,
        player.position,
        player.team.abbreviation,
        s.ppg,
        s.rpg,
        s.apg,
        s.spg,
        s.bpg,
        s.fg_pct,
        s.three_pct
    )
}

fn draw_players(f: &mut Frame, area: Rect, app: &App) {
    let players = &app.state.players;
    let block = view_block("Players".to_string(), app.showing_synthetic());
    let inner = block.inner(area);
    f.render_widget(block, area);

    if players.players.is_none() {
        f.render_widget(
            Paragraph::new("Loading players...")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let active = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let idle = Style::default().fg(Color::DarkGray);
    let mut sort = vec![Span::raw("Sort: ")];
    sort.push(Span::styled("All", if players.category.is_none() { active } else { idle }));
    for category in StatCategory::ALL {
        let style = if players.category == Some(category) { active } else { idle };
        sort.push(Span::raw("  "));
        sort.push(Span::styled(category.label(), style));
    }

    let search = if players.searching {
        Line::from(vec![
            Span::raw("Search: "),
            Span::styled(format!("{}_", players.query), Style::default().fg(Color::Yellow)),
        ])
    } else if players.query.is_empty() {
        Line::from(Span::styled("/ search, h/l sort, j/k move", idle))
    } else {
        Line::from(format!("Search: {}  (Esc clears)", players.query))
    };

    let mut lines = vec![
        Line::from(sort),
        search,
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "     {:<24} {:<3} {:<4}{:>6}{:>6}{:>6}{:>6}{:>6}{:>7}{:>7}",
                "PLAYER", "POS", "TEAM", "PPG", "RPG", "APG", "SPG", "BPG", "FG%", "3P%"
            ),
            idle,
        )),
    ];

    let visible = players.visible();
    if visible.is_empty() {
        lines.push(Line::from(Span::styled("No players match", idle)));
    }
    for (idx, player) in visible.iter().enumerate() {
        let selected = idx == players.selected;
        let style = if selected { active } else { Style::default().fg(Color::White) };
        lines.push(Line::from(Span::styled(player_line(idx + 1, player, selected), style)));
    }
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_news(f: &mut Frame, area: Rect, app: &App) {
    let news = &app.state.news;
    let block = view_block("News".to_string(), false);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(items) = news.items.as_ref() else {
        let (msg, color) = match news.error.as_deref() {
            Some(err) => (format!("News unavailable:\n{err}"), Color::Red),
            None => ("Loading news...".to_string(), Color::DarkGray),
        };
        f.render_widget(
            Paragraph::new(msg)
                .style(Style::default().fg(color))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            inner,
        );
        return;
    };

    let mut lines = Vec::new();
    if let Some(err) = news.error.as_deref() {
        lines.push(Line::from(Span::styled(
            format!("Refresh failed: {err}"),
            Style::default().fg(Color::Red),
        )));
    }
    for (idx, item) in items.iter().enumerate() {
        let selected = idx == news.selected;
        let style = if selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(Span::styled(
            format!("{}{}", if selected { "> " } else { "  " }, item.title),
            style,
        )));
        if selected {
            lines.push(Line::from(format!("    {} | {}", item.author, item.published)));
            lines.push(Line::from(format!("    {}", item.description)));
            lines.push(Line::from(Span::styled(
                format!("    {}", item.url),
                Style::default().fg(Color::Cyan),
            )));
        }
    }
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::DarkGray).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let text = [
        "1-6      switch tab (Schedule, Live, Highlights, Teams, Players, News)",
        "j/k      move selection",
        "h/l      previous/next day (Schedule)",
        "t        today (Schedule)",
        "Enter    highlights for the selected game (Schedule)",
        "h/l      change sort category (Players)",
        "/        search players by name or team, Enter/Esc to close (Players)",
        "r        refresh, bypassing the cache",
        "f        full screen",
        "\"        toggle log pane",
        "?        this help, Esc to go back",
        "q        quit",
        "",
        "Data marked [demo data] is generated locally because the live source was unavailable.",
    ];
    f.render_widget(Paragraph::new(text.join("\n")).wrap(Wrap { trim: false }), inner);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Cyan))
        .style_debug(Style::default().fg(Color::Gray));
    f.render_widget(logs, area);
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use nba_api::synthetic;

    fn game(status: GameStatus) -> Game {
        let teams = synthetic::league_teams();
        Game {
            id: 1,
            date: Utc.with_ymd_and_hms(2024, 3, 15, 23, 30, 0).unwrap(),
            home_team: teams[1].clone(),
            away_team: teams[13].clone(),
            home_score: 101,
            away_score: 99,
            status,
            current_period: Some("Q4 0:35".into()),
            arena: "TD Garden".into(),
            location: "Boston".into(),
        }
    }

    #[test]
    fn game_lines_show_away_at_home() {
        let line = game_line(&game(GameStatus::Live), true);
        assert!(line.starts_with("> LAL  @ BOS"), "{line}");
        assert!(line.contains(" 99-101"));
        assert!(line.ends_with("[LIVE Q4 0:35]"));

        let line = game_line(&game(GameStatus::Completed), false);
        assert!(line.ends_with("[FINAL]"));
    }

    #[test]
    fn player_lines_carry_rank_and_averages() {
        let player = Player {
            id: 1628369,
            name: "Jayson Tatum".into(),
            position: "SF".into(),
            team: synthetic::league_teams()[1].clone(),
            stats: nba_api::PlayerStats {
                ppg: 27.5,
                rpg: 8.9,
                three_pct: 37.0,
                ..Default::default()
            },
        };
        let line = player_line(3, &player, true);
        assert!(line.starts_with("> 3. Jayson Tatum"), "{line}");
        assert!(line.contains("SF  BOS"), "{line}");
        assert!(line.contains("  27.5   8.9"), "{line}");
        assert!(line.ends_with("   37.0"), "{line}");
    }

    #[test]
    fn scheduled_games_hide_the_score() {
        let line = game_line(&game(GameStatus::Scheduled), false);
        assert!(line.contains("  -  "));
        assert!(!line.contains("101"));
    }
}
