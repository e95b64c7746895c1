//! Data structures for the doubles league: players, matches, rounds, league state.

mod game;
mod league;
mod player;

pub use game::{GameMatch, MatchId, Round, RoundId, Team};
pub use league::{League, LeagueError, LeagueId};
pub use player::{Player, PlayerId};
