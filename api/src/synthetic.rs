//! Generated stand-in data with the same shapes as the live providers.
//!
//! Nothing here can fail. Values are random but internally consistent:
//! made shots never exceed attempts, points add up from the shot totals and
//! play-by-play scores only ever go up.

use crate::client::highlight_id;
use crate::{
    Game, GameId, GameStats, GameStatus, HighlightPlayer, LiveGameUpdate, PlayHighlight, Player,
    PlayerStats, ScorePair, Team, TeamStats,
};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;

pub const SCHEDULE_GAMES: usize = 5;
pub const LIVE_POOL_GAMES: usize = 10;
pub const HIGHLIGHT_COUNT: usize = 4;
pub const LIVE_UPDATE_COUNT: usize = 10;

const FIRST_GAME_ID: GameId = 1_000_000;

/// (id, name, abbreviation, record, arena, city)
const LEAGUE: [(u64, &str, &str, &str, &str, &str); 30] = [
    (1610612737, "Atlanta Hawks", "ATL", "36-46", "State Farm Arena", "Atlanta"),
    (1610612738, "Boston Celtics", "BOS", "64-18", "TD Garden", "Boston"),
    (1610612751, "Brooklyn Nets", "BKN", "32-50", "Barclays Center", "Brooklyn"),
    (1610612766, "Charlotte Hornets", "CHA", "21-61", "Spectrum Center", "Charlotte"),
    (1610612741, "Chicago Bulls", "CHI", "39-43", "United Center", "Chicago"),
    (1610612739, "Cleveland Cavaliers", "CLE", "48-34", "Rocket Mortgage FieldHouse", "Cleveland"),
    (1610612742, "Dallas Mavericks", "DAL", "50-32", "American Airlines Center", "Dallas"),
    (1610612743, "Denver Nuggets", "DEN", "57-25", "Ball Arena", "Denver"),
    (1610612765, "Detroit Pistons", "DET", "14-68", "Little Caesars Arena", "Detroit"),
    (1610612744, "Golden State Warriors", "GSW", "46-36", "Chase Center", "San Francisco"),
    (1610612745, "Houston Rockets", "HOU", "41-41", "Toyota Center", "Houston"),
    (1610612754, "Indiana Pacers", "IND", "47-35", "Gainbridge Fieldhouse", "Indianapolis"),
    (1610612746, "Los Angeles Clippers", "LAC", "51-31", "Intuit Dome", "Los Angeles"),
    (1610612747, "Los Angeles Lakers", "LAL", "47-35", "Crypto.com Arena", "Los Angeles"),
    (1610612763, "Memphis Grizzlies", "MEM", "27-55", "FedExForum", "Memphis"),
    (1610612748, "Miami Heat", "MIA", "46-36", "Kaseya Center", "Miami"),
    (1610612749, "Milwaukee Bucks", "MIL", "49-33", "Fiserv Forum", "Milwaukee"),
    (1610612750, "Minnesota Timberwolves", "MIN", "56-26", "Target Center", "Minneapolis"),
    (1610612740, "New Orleans Pelicans", "NOP", "49-33", "Smoothie King Center", "New Orleans"),
    (1610612752, "New York Knicks", "NYK", "50-32", "Madison Square Garden", "New York"),
    (1610612760, "Oklahoma City Thunder", "OKC", "57-25", "Paycom Center", "Oklahoma City"),
    (1610612753, "Orlando Magic", "ORL", "47-35", "Kia Center", "Orlando"),
    (1610612755, "Philadelphia 76ers", "PHI", "47-35", "Wells Fargo Center", "Philadelphia"),
    (1610612756, "Phoenix Suns", "PHX", "49-33", "Footprint Center", "Phoenix"),
    (1610612757, "Portland Trail Blazers", "POR", "21-61", "Moda Center", "Portland"),
    (1610612758, "Sacramento Kings", "SAC", "46-36", "Golden 1 Center", "Sacramento"),
    (1610612759, "San Antonio Spurs", "SAS", "22-60", "Frost Bank Center", "San Antonio"),
    (1610612761, "Toronto Raptors", "TOR", "25-57", "Scotiabank Arena", "Toronto"),
    (1610612762, "Utah Jazz", "UTA", "31-51", "Delta Center", "Salt Lake City"),
    (1610612764, "Washington Wizards", "WAS", "15-67", "Capital One Arena", "Washington"),
];

const HIGHLIGHT_ACTIONS: [&str; 10] = [
    "Thunderous dunk",
    "Monster block",
    "Deep three",
    "No-look pass",
    "Steal and score",
    "Fast-break finish",
    "Clutch free throws",
    "Post-up bucket",
    "Behind-the-back assist",
    "Buzzer beater",
];

const PLAYER_NAMES: [&str; 12] = [
    "LeBron James",
    "Stephen Curry",
    "Kevin Durant",
    "Giannis Antetokounmpo",
    "Luka Dončić",
    "Nikola Jokić",
    "Joel Embiid",
    "Jayson Tatum",
    "Ja Morant",
    "Damian Lillard",
    "Anthony Edwards",
    "Shai Gilgeous-Alexander",
];

type Range = (f32, f32);

/// (person id, name, position, team code, [ppg, rpg, apg, spg, bpg, fg%, 3p%, ft%])
#[rustfmt::skip]
const STARS: [(u64, &str, &str, &str, [Range; 8]); 20] = [
    (2544, "LeBron James", "SF", "LAL",
        [(25.0, 30.0), (7.0, 9.0), (7.0, 10.0), (1.0, 1.8), (0.5, 1.2), (50.0, 55.0), (35.0, 40.0), (70.0, 80.0)]),
    (201939, "Stephen Curry", "PG", "GSW",
        [(26.0, 32.0), (4.0, 6.0), (5.0, 7.0), (1.0, 1.5), (0.2, 0.5), (45.0, 50.0), (40.0, 45.0), (90.0, 95.0)]),
    (203507, "Giannis Antetokounmpo", "PF", "MIL",
        [(28.0, 33.0), (11.0, 14.0), (5.0, 7.0), (1.0, 1.5), (1.0, 2.0), (55.0, 62.0), (25.0, 32.0), (65.0, 75.0)]),
    (203999, "Nikola Jokić", "C", "DEN",
        [(25.0, 29.0), (11.0, 13.0), (8.0, 10.0), (1.0, 1.5), (0.5, 1.0), (55.0, 60.0), (32.0, 38.0), (80.0, 85.0)]),
    (201142, "Kevin Durant", "SF", "PHX",
        [(27.0, 32.0), (6.0, 8.0), (4.0, 6.0), (0.5, 1.0), (1.0, 1.8), (50.0, 55.0), (38.0, 42.0), (88.0, 92.0)]),
    (1628369, "Jayson Tatum", "SF", "BOS",
        [(27.0, 31.0), (8.0, 10.0), (4.0, 6.0), (0.8, 1.2), (0.5, 1.0), (45.0, 50.0), (35.0, 40.0), (80.0, 85.0)]),
    (203954, "Joel Embiid", "C", "PHI",
        [(30.0, 35.0), (10.0, 13.0), (4.0, 6.0), (1.0, 1.5), (1.5, 2.2), (50.0, 55.0), (30.0, 36.0), (82.0, 88.0)]),
    (1629029, "Luka Dončić", "PG", "DAL",
        [(32.0, 36.0), (8.0, 10.0), (8.0, 10.0), (1.0, 1.5), (0.3, 0.7), (45.0, 50.0), (35.0, 40.0), (75.0, 82.0)]),
    (203076, "Anthony Davis", "PF", "LAL",
        [(24.0, 28.0), (11.0, 14.0), (2.0, 4.0), (1.0, 1.5), (2.0, 3.0), (52.0, 58.0), (25.0, 32.0), (75.0, 82.0)]),
    (202695, "Kawhi Leonard", "SF", "LAC",
        [(24.0, 28.0), (6.0, 8.0), (3.0, 5.0), (1.5, 2.0), (0.5, 1.0), (48.0, 52.0), (38.0, 42.0), (85.0, 90.0)]),
    (1629630, "Ja Morant", "PG", "MEM",
        [(25.0, 30.0), (5.0, 7.0), (7.0, 9.0), (1.0, 1.5), (0.3, 0.6), (45.0, 50.0), (30.0, 35.0), (75.0, 82.0)]),
    (203081, "Damian Lillard", "PG", "MIL",
        [(27.0, 32.0), (4.0, 6.0), (6.0, 8.0), (0.8, 1.2), (0.2, 0.5), (43.0, 48.0), (36.0, 40.0), (90.0, 95.0)]),
    (1629027, "Trae Young", "PG", "ATL",
        [(26.0, 30.0), (2.0, 4.0), (9.0, 12.0), (0.8, 1.2), (0.1, 0.3), (42.0, 47.0), (35.0, 40.0), (85.0, 90.0)]),
    (1626164, "Devin Booker", "SG", "PHX",
        [(27.0, 31.0), (4.0, 6.0), (5.0, 7.0), (0.8, 1.2), (0.2, 0.5), (45.0, 50.0), (35.0, 40.0), (85.0, 90.0)]),
    (1641705, "Victor Wembanyama", "PF", "SAS",
        [(20.0, 25.0), (10.0, 12.0), (3.0, 5.0), (1.0, 1.5), (3.0, 4.0), (45.0, 50.0), (30.0, 35.0), (75.0, 80.0)]),
    (1628983, "Shai Gilgeous-Alexander", "SG", "OKC",
        [(30.0, 33.0), (5.0, 7.0), (5.0, 7.0), (1.5, 2.0), (0.8, 1.2), (50.0, 55.0), (35.0, 40.0), (85.0, 90.0)]),
    (1630162, "Anthony Edwards", "SG", "MIN",
        [(25.0, 29.0), (5.0, 7.0), (4.0, 6.0), (1.0, 1.5), (0.5, 1.0), (45.0, 50.0), (35.0, 40.0), (80.0, 85.0)]),
    (1627759, "Jaylen Brown", "SG", "BOS",
        [(22.0, 26.0), (5.0, 7.0), (3.0, 5.0), (1.0, 1.3), (0.3, 0.7), (47.0, 52.0), (35.0, 40.0), (75.0, 80.0)]),
    (1629627, "Zion Williamson", "PF", "NOP",
        [(25.0, 29.0), (6.0, 8.0), (4.0, 6.0), (1.0, 1.5), (0.5, 1.0), (58.0, 65.0), (25.0, 35.0), (65.0, 75.0)]),
    (1628389, "Bam Adebayo", "C", "MIA",
        [(18.0, 22.0), (9.0, 11.0), (3.0, 5.0), (1.0, 1.5), (0.8, 1.2), (50.0, 55.0), (15.0, 25.0), (75.0, 80.0)]),
];

const LIVE_PERIODS: [&str; 5] = ["Q1", "Q2", "Q3", "Q4", "OT"];
const LIVE_CLOCKS: [&str; 5] = ["12:00", "08:24", "04:45", "01:15", "00:35"];

pub fn league_teams() -> Vec<Team> {
    LEAGUE
        .iter()
        .map(|&(id, name, abbreviation, record, _, _)| Team {
            id,
            name: name.to_owned(),
            abbreviation: abbreviation.to_owned(),
            record: record.to_owned(),
        })
        .collect()
}

fn team_for(abbreviation: &str) -> Option<Team> {
    league_teams().into_iter().find(|t| t.abbreviation == abbreviation)
}

/// Home arena and city for a team code.
pub fn arena_for(abbreviation: &str) -> Option<(&'static str, &'static str)> {
    LEAGUE
        .iter()
        .find(|t| t.2 == abbreviation)
        .map(|&(_, _, _, _, arena, city)| (arena, city))
}

/// Up to `count` games on `date`, each team appearing at most once.
pub fn games<R: Rng + ?Sized>(date: NaiveDate, count: usize, now: DateTime<Utc>, rng: &mut R) -> Vec<Game> {
    let mut teams = league_teams();
    teams.shuffle(rng);

    teams
        .chunks_exact(2)
        .take(count)
        .enumerate()
        .map(|(i, pair)| {
            let home_team = pair[0].clone();
            let away_team = pair[1].clone();

            let hour = rng.gen_range(17..=22);
            let minute = if rng.gen_bool(0.5) { 0 } else { 30 };
            let tip_off = NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default();
            let start = date.and_time(tip_off).and_utc();

            let (status, home_score, away_score, current_period) = if start < now {
                (GameStatus::Completed, rng.gen_range(85..=124), rng.gen_range(85..=124), None)
            } else if rng.gen_bool(0.2) {
                let period = LIVE_PERIODS.choose(rng).copied().unwrap_or("Q1");
                let clock = LIVE_CLOCKS.choose(rng).copied().unwrap_or("12:00");
                (
                    GameStatus::Live,
                    rng.gen_range(40..=99),
                    rng.gen_range(40..=99),
                    Some(format!("{period} {clock}")),
                )
            } else {
                (GameStatus::Scheduled, 0, 0, None)
            };

            let (arena, city) = arena_for(&home_team.abbreviation).unwrap_or(("TBD", "TBD"));
            Game {
                id: FIRST_GAME_ID + i as u64,
                date: start,
                home_team,
                away_team,
                home_score,
                away_score,
                status,
                current_period,
                arena: arena.to_owned(),
                location: city.to_owned(),
            }
        })
        .collect()
}

/// Two distinct teams drawn from the league, for stats with no known matchup.
pub fn random_matchup<R: Rng + ?Sized>(rng: &mut R) -> (Team, Team) {
    let teams = league_teams();
    let mut picked = teams.choose_multiple(rng, 2).cloned();
    let home = picked.next().unwrap_or_default();
    let away = picked.next().unwrap_or_default();
    (home, away)
}

pub fn game_stats<R: Rng + ?Sized>(game_id: GameId, home: Team, away: Team, rng: &mut R) -> GameStats {
    GameStats {
        game_id,
        home: team_stats(home, rng),
        away: team_stats(away, rng),
    }
}

fn team_stats<R: Rng + ?Sized>(team: Team, rng: &mut R) -> TeamStats {
    let field_goals_made = rng.gen_range(30..=45);
    let field_goals_attempted = field_goals_made + rng.gen_range(25..=40);
    let three_points_made: u32 = rng.gen_range(8..=18);
    let three_points_attempted = three_points_made + rng.gen_range(10..=20);
    let free_throws_made = rng.gen_range(12..=25);
    let free_throws_attempted = free_throws_made + rng.gen_range(3..=10);

    TeamStats {
        team,
        points: 2 * (field_goals_made - three_points_made) + 3 * three_points_made + free_throws_made,
        rebounds: rng.gen_range(35..=50),
        assists: rng.gen_range(20..=35),
        steals: rng.gen_range(5..=12),
        blocks: rng.gen_range(3..=8),
        turnovers: rng.gen_range(8..=18),
        field_goals_made,
        field_goals_attempted,
        three_points_made,
        three_points_attempted,
        free_throws_made,
        free_throws_attempted,
    }
}

pub fn highlights<R: Rng + ?Sized>(game_id: GameId, count: usize, rng: &mut R) -> Vec<PlayHighlight> {
    (0..count)
        .map(|i| {
            let action = HIGHLIGHT_ACTIONS.choose(rng).copied().unwrap_or("Highlight");
            let player = PLAYER_NAMES.choose(rng).copied().unwrap_or("Unknown");
            let (_, team_name, team_code, _, _, _) = LEAGUE[rng.gen_range(0..LEAGUE.len())];
            let id = highlight_id(game_id, i);

            PlayHighlight {
                id,
                game_id,
                title: format!("{action} by {player}"),
                description: format!("{player} with a {} for the {team_name}.", action.to_lowercase()),
                video_url: "https://www.youtube.com/watch?v=MhmyrUjGq9A".to_owned(),
                thumbnail_url: format!("https://picsum.photos/seed/{id}/400/225"),
                timestamp: format!(
                    "Q{} {}:{:02}",
                    rng.gen_range(1..=4),
                    rng.gen_range(0..12),
                    rng.gen_range(0..60)
                ),
                player: Some(HighlightPlayer {
                    id: player_id(player),
                    name: player.to_owned(),
                    team: team_code.to_owned(),
                }),
            }
        })
        .collect()
}

/// The league's headline players with season averages drawn from each
/// player's usual range, rounded to one decimal.
pub fn top_players<R: Rng + ?Sized>(rng: &mut R) -> Vec<Player> {
    STARS
        .iter()
        .filter_map(|&(id, name, position, team, ranges)| {
            let [ppg, rpg, apg, spg, bpg, fg_pct, three_pct, ft_pct] =
                ranges.map(|(lo, hi)| (rng.gen_range(lo..=hi) * 10.0).round() / 10.0);
            Some(Player {
                id,
                name: name.to_owned(),
                position: position.to_owned(),
                team: team_for(team)?,
                stats: PlayerStats { ppg, rpg, apg, spg, bpg, fg_pct, three_pct, ft_pct },
            })
        })
        .collect()
}

/// Stable made-up player id derived from the name.
fn player_id(name: &str) -> u64 {
    let first = name.chars().next().map(u64::from).unwrap_or(0);
    first * 1000 + name.chars().count() as u64
}

/// `count` play-by-play events ending at `now`, newest first.
pub fn live_updates<R: Rng + ?Sized>(
    game_id: GameId,
    count: usize,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<LiveGameUpdate> {
    let mut home = rng.gen_range(70..=99);
    let mut away = rng.gen_range(70..=99);
    let period = format!("Q{}", rng.gen_range(1..=4));
    let mut clock_secs: u32 = rng.gen_range(600..=719);

    let mut updates: Vec<LiveGameUpdate> = (0..count)
        .map(|i| {
            let points = [0, 0, 1, 2, 2, 2, 3].choose(rng).copied().unwrap_or(0);
            if rng.gen_bool(0.5) {
                home += points;
            } else {
                away += points;
            }
            let player = PLAYER_NAMES.choose(rng).copied().unwrap_or("Unknown");
            let (action, description) = match points {
                0 => ("Miss", format!("{player} misses the shot.")),
                1 => ("Free Throw", format!("{player} makes the free throw.")),
                2 => ("Basket", format!("{player} scores 2 points.")),
                _ => ("Three Pointer", format!("{player} hits from deep!")),
            };
            clock_secs = clock_secs.saturating_sub(rng.gen_range(10..=50));
            let seconds_ago = ((count - 1 - i) * 30) as i64;

            LiveGameUpdate {
                game_id,
                timestamp: now - Duration::seconds(seconds_ago),
                action: action.to_owned(),
                description,
                score: ScorePair { home, away },
                period: period.clone(),
                time_remaining: format!("{}:{:02}", clock_secs / 60, clock_secs % 60),
            }
        })
        .collect();

    updates.reverse();
    updates
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn march_15() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn league_has_thirty_distinct_teams_with_arenas() {
        let teams = league_teams();
        assert_eq!(teams.len(), 30);
        let codes: HashSet<_> = teams.iter().map(|t| t.abbreviation.as_str()).collect();
        assert_eq!(codes.len(), 30);
        assert!(teams.iter().all(|t| arena_for(&t.abbreviation).is_some()));
    }

    #[test]
    fn schedule_pairs_teams_without_repetition() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let games = games(march_15(), SCHEDULE_GAMES, now, &mut rng);
            assert_eq!(games.len(), 5);
            let ids: HashSet<u64> = games
                .iter()
                .flat_map(|g| [g.home_team.id, g.away_team.id])
                .collect();
            assert_eq!(ids.len(), 10, "seed {seed} repeated a team");
            assert!(games.iter().all(|g| g.date.date_naive() == march_15()));
        }
    }

    #[test]
    fn schedule_never_exceeds_league_size() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(games(march_15(), 40, now, &mut rng).len(), 15);
    }

    #[test]
    fn past_games_are_completed_and_future_games_are_not() {
        let mut rng = StdRng::seed_from_u64(9);
        let after = Utc.with_ymd_and_hms(2024, 3, 16, 12, 0, 0).unwrap();
        let played = games(march_15(), SCHEDULE_GAMES, after, &mut rng);
        assert!(played.iter().all(|g| g.status == GameStatus::Completed));
        assert!(played.iter().all(|g| g.home_score >= 85 && g.away_score >= 85));

        let before = Utc.with_ymd_and_hms(2024, 3, 14, 12, 0, 0).unwrap();
        let upcoming = games(march_15(), SCHEDULE_GAMES, before, &mut rng);
        for g in &upcoming {
            match g.status {
                GameStatus::Scheduled => assert_eq!((g.home_score, g.away_score), (0, 0)),
                GameStatus::Live => assert!(g.current_period.is_some()),
                GameStatus::Completed => panic!("future game marked completed"),
            }
        }
    }

    #[test]
    fn stats_are_internally_consistent() {
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let (home, away) = random_matchup(&mut rng);
            assert_ne!(home.id, away.id);
            let stats = game_stats(42, home, away, &mut rng);
            for side in [&stats.home, &stats.away] {
                assert!(side.field_goals_made <= side.field_goals_attempted);
                assert!(side.three_points_made <= side.three_points_attempted);
                assert!(side.three_points_made <= side.field_goals_made);
                assert!(side.free_throws_made <= side.free_throws_attempted);
                assert_eq!(
                    side.points,
                    2 * (side.field_goals_made - side.three_points_made)
                        + 3 * side.three_points_made
                        + side.free_throws_made
                );
            }
        }
    }

    #[test]
    fn highlights_are_keyed_by_game() {
        let mut rng = StdRng::seed_from_u64(3);
        let items = highlights(77, HIGHLIGHT_COUNT, &mut rng);
        assert_eq!(items.len(), 4);
        let ids: Vec<u64> = items.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![7700, 7701, 7702, 7703]);
        assert!(items.iter().all(|h| h.game_id == 77 && h.player.is_some()));
    }

    #[test]
    fn live_updates_are_newest_first_with_rising_scores() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 23, 0, 0).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let updates = live_updates(5, LIVE_UPDATE_COUNT, now, &mut rng);
        assert_eq!(updates.len(), 10);
        assert_eq!(updates[0].timestamp, now);

        for pair in updates.windows(2) {
            let (newer, older) = (&pair[0], &pair[1]);
            assert!(newer.timestamp > older.timestamp);
            assert!(newer.score.home >= older.score.home);
            assert!(newer.score.away >= older.score.away);
            assert_eq!(newer.period, older.period);
        }
    }

    #[test]
    fn top_players_stay_inside_their_ranges() {
        let mut rng = StdRng::seed_from_u64(3);
        let players = top_players(&mut rng);
        assert_eq!(players.len(), STARS.len());

        let league: HashSet<u64> = league_teams().iter().map(|t| t.id).collect();
        for (player, (_, name, _, team, ranges)) in players.iter().zip(STARS.iter()) {
            assert_eq!(player.name, *name);
            assert_eq!(player.team.abbreviation, *team);
            assert!(league.contains(&player.team.id));

            let s = player.stats;
            let values = [s.ppg, s.rpg, s.apg, s.spg, s.bpg, s.fg_pct, s.three_pct, s.ft_pct];
            for (value, (lo, hi)) in values.iter().zip(ranges.iter()) {
                // Rounding to one decimal can nudge a value by 0.05.
                assert!(*value >= lo - 0.05 && *value <= hi + 0.05, "{name}: {value} not in {lo}..={hi}");
            }
        }
    }
}
