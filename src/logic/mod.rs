//! League business logic: round generation, score entry, and the leaderboard.

pub mod leaderboard;
pub mod mini_league;
mod round_generator;
mod scoring;

pub use leaderboard::{rank, LeaderboardRow, MatchHistory, PairRecord, Stat, POINTS_PER_WIN};
pub use mini_league::MiniLeague;
pub use round_generator::{
    apply_round, generate_round, plan_matches, regenerate_last_round, revert_round, GeneratorOptions,
    PLAYERS_PER_MATCH,
};
pub use scoring::{clear_score, record_score};
