//! Mini-league: re-rank a group of players tied on the primary keys using only
//! the matches they played against each other.
//!
//! Game balance among the group decides first. Players still level are then
//! split by wins minus losses against the rest of the group, then by name.
//! There is no further nesting.

use crate::logic::leaderboard::{LeaderboardRow, MatchHistory};
use serde::Serialize;
use std::cmp::Ordering;

fn is_zero<T: Default + PartialEq>(v: &T) -> bool {
    *v == T::default()
}

/// Sub-metrics shown next to a player whose place was decided in a mini-league.
/// Zero values are left out when serialized.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct MiniLeague {
    #[serde(rename = "miniSV", skip_serializing_if = "is_zero")]
    pub set_balance: i32,
    #[serde(rename = "miniSG", skip_serializing_if = "is_zero")]
    pub game_balance: i32,
    #[serde(rename = "GPmini", skip_serializing_if = "is_zero")]
    pub games_for: u32,
    #[serde(rename = "GCmini", skip_serializing_if = "is_zero")]
    pub games_against: u32,
    #[serde(rename = "miniW", skip_serializing_if = "is_zero")]
    pub wins: u32,
    #[serde(rename = "miniL", skip_serializing_if = "is_zero")]
    pub losses: u32,
    /// Names of the tied players this player actually faced.
    #[serde(rename = "oppMini", skip_serializing_if = "Vec::is_empty")]
    pub opponents: Vec<String>,
}

impl MiniLeague {
    /// Totals for `me` against every other member of `group` it has faced.
    fn compute(me: &LeaderboardRow, group: &[LeaderboardRow], history: &MatchHistory) -> Self {
        let mut mini = MiniLeague::default();
        for other in group.iter().filter(|o| o.id() != me.id()) {
            let Some(record) = history.pair(me.id(), other.id()) else {
                continue;
            };
            mini.games_for += record.games_for;
            mini.games_against += record.games_against;
            mini.wins += record.wins;
            mini.losses += history.head_to_head(other.id(), me.id());
            mini.opponents.push(other.name().to_string());
        }
        mini.game_balance = mini.games_for as i32 - mini.games_against as i32;
        mini.set_balance = mini.wins as i32 - mini.losses as i32;
        mini
    }
}

fn metric(row: &LeaderboardRow, f: impl Fn(&MiniLeague) -> i32) -> i32 {
    row.mini.as_ref().map(f).unwrap_or(0)
}

fn by_metric_then_name(a: &LeaderboardRow, b: &LeaderboardRow, f: impl Fn(&MiniLeague) -> i32 + Copy) -> Ordering {
    metric(b, f)
        .cmp(&metric(a, f))
        .then_with(|| a.name().cmp(b.name()))
        .then_with(|| a.id().cmp(&b.id()))
}

/// Order a tied group and attach each member's mini-league figures.
pub fn resolve(mut group: Vec<LeaderboardRow>, history: &MatchHistory) -> Vec<LeaderboardRow> {
    let minis: Vec<MiniLeague> = group
        .iter()
        .map(|row| MiniLeague::compute(row, &group, history))
        .collect();
    for (row, mini) in group.iter_mut().zip(minis) {
        row.mini = Some(mini);
    }

    group.sort_by(|a, b| by_metric_then_name(a, b, |m| m.game_balance));

    let mut ordered = Vec::with_capacity(group.len());
    for level in group.chunk_by(|a, b| metric(a, |m| m.game_balance) == metric(b, |m| m.game_balance)) {
        let mut level = level.to_vec();
        level.sort_by(|a, b| by_metric_then_name(a, b, |m| m.set_balance));
        ordered.extend(level);
    }
    ordered
}
