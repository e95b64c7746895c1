//! Leaderboard: aggregate every scored match and order the players.
//!
//! Ordering is points, set balance (wins - losses), game balance, then for a
//! pair of tied players their head-to-head wins, and finally name. Larger tie
//! groups, and pairs head-to-head cannot separate, go to the mini-league.
//! Within a group of three or more, head-to-head between two members is not
//! consulted on its own; those meetings only count through the mini-league
//! standings.

use crate::logic::mini_league::{self, MiniLeague};
use crate::models::{Player, PlayerId, Round};
use log::debug;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Points awarded per match won.
pub const POINTS_PER_WIN: u32 = 3;

/// Per-player totals over all scored matches.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Stat {
    pub wins: u32,
    pub losses: u32,
    pub games_for: u32,
    pub games_against: u32,
}

/// What one player did against one opponent, across all matches where they
/// were on opposite teams.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct PairRecord {
    pub games_for: u32,
    pub games_against: u32,
    /// Matches won against this opponent.
    pub wins: u32,
}

/// Stats and opponent records rebuilt from the round history on every pass.
#[derive(Clone, Debug, Default)]
pub struct MatchHistory {
    stats: HashMap<PlayerId, Stat>,
    pairs: HashMap<(PlayerId, PlayerId), PairRecord>,
}

impl MatchHistory {
    /// Scan every round. Matches without both game counts are skipped.
    pub fn from_rounds(rounds: &[Round]) -> Self {
        let mut history = Self::default();
        for m in rounds.iter().flat_map(|r| r.matches.iter()) {
            let Some((games_a, games_b)) = m.score() else {
                continue;
            };
            history.add_side(&m.team_a, &m.team_b, games_a, games_b);
            history.add_side(&m.team_b, &m.team_a, games_b, games_a);
        }
        history
    }

    fn add_side(&mut self, side: &[PlayerId; 2], opponents: &[PlayerId; 2], won: u32, lost: u32) {
        for &me in side {
            let stat = self.stats.entry(me).or_default();
            stat.games_for += won;
            stat.games_against += lost;
            match won.cmp(&lost) {
                Ordering::Greater => stat.wins += 1,
                Ordering::Less => stat.losses += 1,
                Ordering::Equal => {}
            }
            for &opp in opponents {
                let record = self.pairs.entry((me, opp)).or_default();
                record.games_for += won;
                record.games_against += lost;
                if won > lost {
                    record.wins += 1;
                }
            }
        }
    }

    pub fn stat(&self, id: PlayerId) -> Stat {
        self.stats.get(&id).copied().unwrap_or_default()
    }

    /// Record of `me` against `opponent`; None if they never faced each other.
    pub fn pair(&self, me: PlayerId, opponent: PlayerId) -> Option<PairRecord> {
        self.pairs.get(&(me, opponent)).copied()
    }

    /// Matches `me` won against `opponent`.
    pub fn head_to_head(&self, me: PlayerId, opponent: PlayerId) -> u32 {
        self.pair(me, opponent).map(|r| r.wins).unwrap_or(0)
    }
}

/// One ranked player with their computed totals.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LeaderboardRow {
    #[serde(flatten)]
    pub player: Player,
    #[serde(rename = "P")]
    pub points: u32,
    #[serde(rename = "SV")]
    pub set_balance: i32,
    #[serde(rename = "SG")]
    pub game_balance: i32,
    #[serde(rename = "W")]
    pub wins: u32,
    #[serde(rename = "L")]
    pub losses: u32,
    /// Present only for players that went through a mini-league.
    #[serde(flatten)]
    pub mini: Option<MiniLeague>,
}

impl LeaderboardRow {
    pub fn new(player: Player, stat: Stat) -> Self {
        Self {
            player,
            points: stat.wins * POINTS_PER_WIN,
            set_balance: stat.wins as i32 - stat.losses as i32,
            game_balance: stat.games_for as i32 - stat.games_against as i32,
            wins: stat.wins,
            losses: stat.losses,
            mini: None,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.player.id
    }

    pub fn name(&self) -> &str {
        &self.player.name
    }

    fn primary_key(&self) -> (u32, i32, i32) {
        (self.points, self.set_balance, self.game_balance)
    }
}

/// Points, set balance and game balance descending, then name ascending.
fn primary_order(a: &LeaderboardRow, b: &LeaderboardRow) -> Ordering {
    b.primary_key()
        .cmp(&a.primary_key())
        .then_with(|| a.name().cmp(b.name()))
        .then_with(|| a.id().cmp(&b.id()))
}

/// Rank every player in the pool from the full round history.
///
/// Pure: the same inputs always produce the same rows in the same order.
/// Matches may reference players no longer in the pool; those players are
/// not listed but their results still count for their opponents.
pub fn rank(players: &[Player], rounds: &[Round]) -> Vec<LeaderboardRow> {
    let history = MatchHistory::from_rounds(rounds);
    let mut rows: Vec<LeaderboardRow> = players
        .iter()
        .map(|p| LeaderboardRow::new(p.clone(), history.stat(p.id)))
        .collect();
    rows.sort_by(primary_order);

    let mut ranked = Vec::with_capacity(rows.len());
    for tied in rows.chunk_by(|a, b| a.primary_key() == b.primary_key()) {
        match tied {
            [single] => ranked.push(single.clone()),
            [x, y] if history.head_to_head(x.id(), y.id()) != history.head_to_head(y.id(), x.id()) => {
                if history.head_to_head(y.id(), x.id()) > history.head_to_head(x.id(), y.id()) {
                    ranked.extend([y.clone(), x.clone()]);
                } else {
                    ranked.extend([x.clone(), y.clone()]);
                }
            }
            run => {
                debug!(
                    "Mini-league for {} players tied at P={} SV={} SG={}",
                    run.len(),
                    run[0].points,
                    run[0].set_balance,
                    run[0].game_balance
                );
                ranked.extend(mini_league::resolve(run.to_vec(), &history));
            }
        }
    }
    ranked
}
