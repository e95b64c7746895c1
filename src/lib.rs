//! Doubles league web app: library with models and business logic.

pub mod config;
pub mod logic;
pub mod models;
pub mod roster;

pub use logic::{
    apply_round, clear_score, generate_round, plan_matches, rank, record_score,
    regenerate_last_round, revert_round, GeneratorOptions, LeaderboardRow, MatchHistory,
    MiniLeague, PLAYERS_PER_MATCH,
};
pub use models::{
    GameMatch, League, LeagueError, LeagueId, MatchId, Player, PlayerId, Round, RoundId, Team,
};

