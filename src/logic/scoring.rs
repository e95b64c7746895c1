//! Score entry: record or clear the game counts of a generated match.

use crate::models::{League, LeagueError, MatchId, RoundId};
use log::info;

/// Record the games won by each team. Equal game counts are rejected.
pub fn record_score(
    league: &mut League,
    round_id: RoundId,
    match_id: MatchId,
    games_a: u32,
    games_b: u32,
) -> Result<(), LeagueError> {
    if games_a == games_b {
        return Err(LeagueError::TiedScore);
    }
    let league_id = league.id;
    let round = league
        .get_round_mut(round_id)
        .ok_or(LeagueError::RoundNotFound(round_id))?;
    let number = round.number;
    round
        .get_match_mut(match_id)
        .ok_or(LeagueError::MatchNotFound(match_id))?
        .set_score(games_a, games_b);
    info!(
        "Recorded {}-{} in round {} of league {}",
        games_a, games_b, number, league_id
    );
    Ok(())
}

/// Remove a recorded score so the match no longer counts towards the leaderboard.
pub fn clear_score(league: &mut League, round_id: RoundId, match_id: MatchId) -> Result<(), LeagueError> {
    league
        .get_round_mut(round_id)
        .ok_or(LeagueError::RoundNotFound(round_id))?
        .get_match_mut(match_id)
        .ok_or(LeagueError::MatchNotFound(match_id))?
        .clear_score();
    Ok(())
}
