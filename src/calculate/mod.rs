//! Statistics calculation engine.
//!
//! Computes per-deck and per-player placing statistics from recorded games:
//! - Filtering games by participant count
//! - Grouping places by deck or player
//! - Win rate and best/worst/average/median/mode placing
//!
//! Everything here is a pure function of its inputs, so it can be called
//! concurrently from any number of requests.

use std::collections::BTreeMap;

use tracing::debug;

use crate::models::{DeckId, Filter, Game, Play, PlayStats, PlayerId, Stats};

/// Keep the games whose participant count is admitted by the filter.
///
/// Order-preserving. An empty `filter.players` excludes every game.
pub fn filter_games<'a>(games: &'a [Game], filter: &Filter) -> Vec<&'a Game> {
    let size = filter.players.iter().max().map_or(0, |&max| max as usize + 1);
    let mut eligible = vec![false; size];
    for &count in &filter.players {
        eligible[count as usize] = true;
    }

    games
        .iter()
        .filter(|g| eligible.get(g.player_count()).copied().unwrap_or(false))
        .collect()
}

/// Group the places of every play by the key `key_of` selects.
///
/// Places are appended in game order, then play order within a game.
pub fn extract_placings<'a, K, F>(
    games: impl IntoIterator<Item = &'a Game>,
    key_of: F,
) -> BTreeMap<K, Vec<u32>>
where
    K: Ord,
    F: Fn(&Play) -> K,
{
    let mut placings: BTreeMap<K, Vec<u32>> = BTreeMap::new();
    for game in games {
        for play in &game.plays {
            placings.entry(key_of(play)).or_default().push(play.place);
        }
    }
    placings
}

/// Places grouped by deck.
pub fn deck_placings<'a>(games: impl IntoIterator<Item = &'a Game>) -> BTreeMap<DeckId, Vec<u32>> {
    extract_placings(games, |p| p.deck)
}

/// Places grouped by player.
pub fn player_placings<'a>(
    games: impl IntoIterator<Item = &'a Game>,
) -> BTreeMap<PlayerId, Vec<u32>> {
    extract_placings(games, |p| p.player)
}

/// Median of an ascending slice. NaN for an empty slice.
pub fn median_sorted(sorted: &[u32]) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0
    } else {
        sorted[mid] as f64
    }
}

/// Most frequent value of an ascending slice; the smallest value wins ties.
pub fn mode_sorted(sorted: &[u32]) -> Option<u32> {
    let mut best: Option<(u32, usize)> = None;
    for run in sorted.chunk_by(|a, b| a == b) {
        if best.map_or(true, |(_, len)| run.len() > len) {
            best = Some((run[0], run.len()));
        }
    }
    best.map(|(value, _)| value)
}

/// Summarize one entity's places. `None` for an empty list.
pub fn play_stats(places: &[u32]) -> Option<PlayStats> {
    let mut sorted = places.to_vec();
    sorted.sort_unstable();

    let best = *sorted.first()?;
    let worst = *sorted.last()?;
    let mode = mode_sorted(&sorted)?;

    let games = sorted.len() as u32;
    let wins = sorted.iter().filter(|&&p| p == 1).count() as u32;
    let sum: u64 = sorted.iter().map(|&p| p as u64).sum();

    Some(PlayStats {
        games,
        wins,
        win_rate: wins as f64 / games as f64,
        placing_best: best,
        placing_worst: worst,
        placing_average: sum as f64 / games as f64,
        placing_median: median_sorted(&sorted),
        placing_mode: mode,
    })
}

/// Compute stats for every entity with at least `min_placings` places.
///
/// Entities below the minimum are left out of the result entirely, as are
/// entities with no places at all regardless of the minimum.
pub fn calculate_play_stats<K>(
    placings: &BTreeMap<K, Vec<u32>>,
    min_placings: u32,
) -> BTreeMap<K, PlayStats>
where
    K: Ord + Copy,
{
    placings
        .iter()
        .filter(|(_, places)| places.len() >= min_placings as usize)
        .filter_map(|(&key, places)| play_stats(places).map(|stats| (key, stats)))
        .collect()
}

/// Filter the games, then compute deck and player stats over what is left.
pub fn calculate(games: &[Game], filter: &Filter) -> Stats {
    let eligible = filter_games(games, filter);
    debug!(
        "{} of {} games eligible for player counts {:?}",
        eligible.len(),
        games.len(),
        filter.players
    );

    Stats {
        decks: calculate_play_stats(
            &deck_placings(eligible.iter().copied()),
            filter.min_plays_per_deck,
        ),
        players: calculate_play_stats(
            &player_placings(eligible.iter().copied()),
            filter.min_plays_per_player,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GameId;
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    const ALICE: PlayerId = PlayerId(1);
    const BOB: PlayerId = PlayerId(2);
    const CAROL: PlayerId = PlayerId(3);
    const DAVE: PlayerId = PlayerId(4);
    const DECK_X: DeckId = DeckId(10);
    const DECK_Y: DeckId = DeckId(20);
    const DECK_Z: DeckId = DeckId(30);
    const DECK_W: DeckId = DeckId(40);

    /// Build a game from (player, deck) seats in finishing order.
    fn make_game(id: u32, seats: &[(PlayerId, DeckId)]) -> Game {
        let plays = seats
            .iter()
            .enumerate()
            .map(|(i, &(player, deck))| Play::new(player, deck, i as u32 + 1))
            .collect();
        let when = Utc.with_ymd_and_hms(2025, 1, 1, 18, 0, 0).unwrap() + Duration::days(id as i64);
        Game::new(GameId(id), when, plays)
    }

    fn two_game_fixture() -> Vec<Game> {
        vec![
            make_game(1, &[(ALICE, DECK_X), (BOB, DECK_Y)]),
            make_game(2, &[(BOB, DECK_Y), (ALICE, DECK_X)]),
        ]
    }

    fn mixed_fixture() -> Vec<Game> {
        vec![
            make_game(1, &[(ALICE, DECK_X), (BOB, DECK_Y)]),
            make_game(2, &[(CAROL, DECK_Z), (ALICE, DECK_X), (BOB, DECK_Y)]),
            make_game(3, &[(DAVE, DECK_W), (CAROL, DECK_Z), (BOB, DECK_Y), (ALICE, DECK_X)]),
            make_game(4, &[(BOB, DECK_Y), (ALICE, DECK_W)]),
            make_game(5, &[(ALICE, DECK_X), (DAVE, DECK_W), (CAROL, DECK_Z), (BOB, DECK_Y)]),
            make_game(6, &[(CAROL, DECK_Z), (DAVE, DECK_W), (ALICE, DECK_X)]),
        ]
    }

    fn ids(games: &[&Game]) -> Vec<GameId> {
        games.iter().map(|g| g.id).collect()
    }

    // ── Filter ───────────────────────────────────────────────────

    #[test]
    fn test_filter_games_by_player_count() {
        let games = mixed_fixture();
        let filter = Filter::new([2, 4], 0, 0);

        let kept = filter_games(&games, &filter);

        assert_eq!(ids(&kept), vec![GameId(1), GameId(3), GameId(4), GameId(5)]);
    }

    #[test]
    fn test_filter_games_empty_players_excludes_all() {
        let games = mixed_fixture();
        let filter = Filter::new(Vec::<u32>::new(), 0, 0);

        assert!(filter_games(&games, &filter).is_empty());
    }

    #[test]
    fn test_filter_games_count_above_table_excluded() {
        let games = mixed_fixture();
        let filter = Filter::new([2], 0, 0);

        let kept = filter_games(&games, &filter);

        assert_eq!(ids(&kept), vec![GameId(1), GameId(4)]);
    }

    #[test]
    fn test_filter_games_unknown_count_is_noop() {
        let games = mixed_fixture();
        let filter = Filter::new([3, 9], 0, 0);

        let kept = filter_games(&games, &filter);

        assert_eq!(ids(&kept), vec![GameId(2), GameId(6)]);
    }

    #[test]
    fn test_filter_games_matches_membership() {
        let games = mixed_fixture();
        for players in [vec![], vec![1], vec![2], vec![3, 4], vec![2, 3, 4], vec![0, 5]] {
            let filter = Filter::new(players.clone(), 0, 0);
            let expected: Vec<GameId> = games
                .iter()
                .filter(|g| players.contains(&(g.player_count() as u32)))
                .map(|g| g.id)
                .collect();
            assert_eq!(ids(&filter_games(&games, &filter)), expected);
        }
    }

    // ── Placing extraction ───────────────────────────────────────

    #[test]
    fn test_extract_placings_order() {
        let games = mixed_fixture();

        let decks = deck_placings(&games);
        let players = player_placings(&games);

        assert_eq!(decks[&DECK_X], vec![1, 2, 4, 1, 3]);
        assert_eq!(decks[&DECK_W], vec![1, 2, 2, 2]);
        assert_eq!(players[&ALICE], vec![1, 2, 4, 2, 1, 3]);
        assert_eq!(players[&DAVE], vec![1, 2, 2]);
    }

    #[test]
    fn test_extract_placings_completeness() {
        let games = mixed_fixture();
        let total_plays: usize = games.iter().map(|g| g.plays.len()).sum();

        let decks = deck_placings(&games);
        let players = player_placings(&games);

        assert_eq!(decks.len(), 4);
        assert_eq!(players.len(), 4);
        assert_eq!(decks.values().map(Vec::len).sum::<usize>(), total_plays);
        assert_eq!(players.values().map(Vec::len).sum::<usize>(), total_plays);

        for (deck, places) in &decks {
            let appearances = games
                .iter()
                .flat_map(|g| &g.plays)
                .filter(|p| p.deck == *deck)
                .count();
            assert_eq!(places.len(), appearances);
        }
    }

    #[test]
    fn test_extract_placings_empty() {
        let placings = deck_placings(Vec::<Game>::new().iter());
        assert!(placings.is_empty());
    }

    // ── Median / mode ────────────────────────────────────────────

    #[test]
    fn test_median_sorted() {
        assert_eq!(median_sorted(&[1, 1, 2]), 1.0);
        assert_eq!(median_sorted(&[1, 2]), 1.5);
        assert_eq!(median_sorted(&[1, 2, 3, 4]), 2.5);
        assert_eq!(median_sorted(&[7]), 7.0);
        assert!(median_sorted(&[]).is_nan());
    }

    #[test]
    fn test_mode_sorted_smallest_on_tie() {
        assert_eq!(mode_sorted(&[1, 2]), Some(1));
        assert_eq!(mode_sorted(&[1, 2, 2, 3, 3]), Some(2));
        assert_eq!(mode_sorted(&[1, 1, 2]), Some(1));
        assert_eq!(mode_sorted(&[2, 3, 3, 3]), Some(3));
        assert_eq!(mode_sorted(&[]), None);
    }

    #[test]
    fn test_play_stats_sorts_numerically() {
        // Large tables: 10 must sort after 2, not before it.
        let stats = play_stats(&[10, 2, 9, 2, 11]).unwrap();

        assert_eq!(stats.placing_best, 2);
        assert_eq!(stats.placing_worst, 11);
        assert_eq!(stats.placing_median, 9.0);
        assert_eq!(stats.placing_mode, 2);
    }

    // ── Statistics ───────────────────────────────────────────────

    #[test]
    fn test_two_player_swap_scenario() {
        let games = two_game_fixture();
        let filter = Filter::new([2], 1, 1);

        let stats = calculate(&games, &filter);

        let expected = PlayStats {
            games: 2,
            wins: 1,
            win_rate: 0.5,
            placing_best: 1,
            placing_worst: 2,
            placing_average: 1.5,
            placing_median: 1.5,
            placing_mode: 1,
        };
        assert_eq!(stats.player(ALICE), Some(&expected));
        assert_eq!(stats.player(BOB), Some(&expected));
        assert_eq!(stats.deck(DECK_X), Some(&expected));
        assert_eq!(stats.deck(DECK_Y), Some(&expected));
    }

    #[test]
    fn test_minimum_omits_players() {
        let games = two_game_fixture();
        let filter = Filter::new([2], 1, 3);

        let stats = calculate(&games, &filter);

        assert!(stats.players.is_empty());
        assert_eq!(stats.decks.len(), 2);
    }

    #[test]
    fn test_excluded_game_contributes_nothing() {
        let mut games = two_game_fixture();
        games.push(make_game(3, &[(CAROL, DECK_Z), (ALICE, DECK_X), (BOB, DECK_Y)]));
        let filter = Filter::new([2], 1, 1);

        let stats = calculate(&games, &filter);

        assert!(stats.player(CAROL).is_none());
        assert!(stats.deck(DECK_Z).is_none());
        assert_eq!(stats.player(ALICE).map(|s| s.games), Some(2));
    }

    #[test]
    fn test_single_deck_stats() {
        let placings = BTreeMap::from([(DECK_X, vec![1, 1, 2])]);

        let stats = calculate_play_stats(&placings, 3);
        let deck = &stats[&DECK_X];

        assert_eq!(deck.games, 3);
        assert_eq!(deck.wins, 2);
        assert!((deck.win_rate - 0.667).abs() < 0.001);
        assert_eq!(deck.placing_best, 1);
        assert_eq!(deck.placing_worst, 2);
        assert!((deck.placing_average - 1.333).abs() < 0.001);
        assert_eq!(deck.placing_median, 1.0);
        assert_eq!(deck.placing_mode, 1);
    }

    #[test]
    fn test_winless_entity_has_zero_rate() {
        let placings = BTreeMap::from([(DECK_Y, vec![3, 2, 4])]);

        let stats = calculate_play_stats(&placings, 1);

        assert_eq!(stats[&DECK_Y].wins, 0);
        assert_eq!(stats[&DECK_Y].win_rate, 0.0);
    }

    #[test]
    fn test_empty_placings_omitted_even_with_zero_minimum() {
        let placings = BTreeMap::from([(DECK_X, vec![]), (DECK_Y, vec![2])]);

        let stats = calculate_play_stats(&placings, 0);

        assert!(!stats.contains_key(&DECK_X));
        assert!(stats.contains_key(&DECK_Y));
    }

    #[test]
    fn test_omission_below_minimum() {
        let games = mixed_fixture();
        let placings = player_placings(&games);

        for min in 0..8 {
            let stats = calculate_play_stats(&placings, min);
            for (player, places) in &placings {
                assert_eq!(
                    stats.contains_key(player),
                    places.len() >= min as usize,
                    "player {} with min {}",
                    player,
                    min
                );
            }
        }
    }

    #[test]
    fn test_stats_bounds_hold() {
        let games = mixed_fixture();
        let filter = Filter::default_for(&games)
            .with_min_plays_per_deck(1)
            .with_min_plays_per_player(1);

        let stats = calculate(&games, &filter);

        let all = stats.decks.values().chain(stats.players.values());
        for s in all {
            assert!((0.0..=1.0).contains(&s.win_rate));
            assert!(s.placing_best as f64 <= s.placing_median);
            assert!(s.placing_median <= s.placing_worst as f64);
            assert!(s.placing_best as f64 <= s.placing_average);
            assert!(s.placing_average <= s.placing_worst as f64);
            assert!(s.placing_mode >= s.placing_best && s.placing_mode <= s.placing_worst);
        }
    }

    #[test]
    fn test_calculate_is_idempotent() {
        let games = mixed_fixture();
        let filter = Filter::new([2, 3, 4], 2, 2);

        assert_eq!(calculate(&games, &filter), calculate(&games, &filter));
    }

    #[test]
    fn test_calculate_uses_separate_minimums() {
        let games = mixed_fixture();
        // Decks: X 5, Y 5, Z 4, W 4 placings. Players: Alice 6, Bob 5, Carol 4, Dave 3.
        let filter = Filter::new([2, 3, 4], 5, 4);

        let stats = calculate(&games, &filter);

        assert_eq!(stats.decks.keys().copied().collect::<Vec<_>>(), vec![DECK_X, DECK_Y]);
        assert_eq!(
            stats.players.keys().copied().collect::<Vec<_>>(),
            vec![ALICE, BOB, CAROL]
        );
    }
}
