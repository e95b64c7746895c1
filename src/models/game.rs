//! Match (game), Team, and Round for 2v2 doubles play.

use crate::models::player::PlayerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Unique identifier for a round.
pub type RoundId = Uuid;

/// Which side of a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Team {
    A,
    B,
}

/// A single doubles match on one court.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub team_a: [PlayerId; 2],
    pub team_b: [PlayerId; 2],
    /// Games won by team A. None until a score is recorded.
    pub games_a: Option<u32>,
    /// Games won by team B. None until a score is recorded.
    pub games_b: Option<u32>,
    /// None while unscored or when both sides won the same number of games.
    pub winner: Option<Team>,
}

impl GameMatch {
    pub fn new(team_a: [PlayerId; 2], team_b: [PlayerId; 2]) -> Self {
        Self {
            id: Uuid::new_v4(),
            team_a,
            team_b,
            games_a: None,
            games_b: None,
            winner: None,
        }
    }

    /// Both game counts, if the match has been scored.
    pub fn score(&self) -> Option<(u32, u32)> {
        Some((self.games_a?, self.games_b?))
    }

    pub fn is_scored(&self) -> bool {
        self.score().is_some()
    }

    /// Record the game counts and derive the winner.
    pub fn set_score(&mut self, games_a: u32, games_b: u32) {
        self.games_a = Some(games_a);
        self.games_b = Some(games_b);
        self.winner = match games_a.cmp(&games_b) {
            std::cmp::Ordering::Greater => Some(Team::A),
            std::cmp::Ordering::Less => Some(Team::B),
            std::cmp::Ordering::Equal => None,
        };
    }

    pub fn clear_score(&mut self) {
        self.games_a = None;
        self.games_b = None;
        self.winner = None;
    }

    /// All four player ids, team A first.
    pub fn players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.team_a.iter().chain(self.team_b.iter()).copied()
    }
}

/// One batch of concurrently played matches, at most one per court.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub id: RoundId,
    /// 1-based position in the league's history.
    pub number: u32,
    pub created_at: DateTime<Utc>,
    pub matches: Vec<GameMatch>,
}

impl Round {
    pub fn new(number: u32, matches: Vec<GameMatch>) -> Self {
        Self {
            id: Uuid::new_v4(),
            number,
            created_at: Utc::now(),
            matches,
        }
    }

    pub fn get_match_mut(&mut self, id: MatchId) -> Option<&mut GameMatch> {
        self.matches.iter_mut().find(|m| m.id == id)
    }

    /// True once any match in the round has a recorded score.
    pub fn has_scores(&self) -> bool {
        self.matches.iter().any(GameMatch::is_scored)
    }
}
