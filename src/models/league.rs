//! League: the player pool, round history, and court count for one group.

use crate::logic::{rank, LeaderboardRow};
use crate::models::game::{MatchId, Round, RoundId};
use crate::models::player::{Player, PlayerId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during league operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LeagueError {
    /// Fewer active players than `courts * 4`.
    InsufficientPlayers { required: usize, available: usize },
    /// Court count must be at least 1.
    NoCourts,
    /// Player not found in the pool.
    PlayerNotFound(PlayerId),
    /// A player with this name already exists (names are unique, case-insensitive).
    DuplicatePlayerName,
    /// Player name is empty after trimming.
    InvalidPlayerName,
    /// Skill level must be at least 1.
    InvalidLevel,
    RoundNotFound(RoundId),
    MatchNotFound(MatchId),
    /// Both teams won the same number of games.
    TiedScore,
    /// No round has been generated yet.
    NoRounds,
    /// The round already has recorded scores and can no longer be regenerated.
    RoundAlreadyScored(RoundId),
}

impl std::fmt::Display for LeagueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeagueError::InsufficientPlayers { required, available } => write!(
                f,
                "Need at least {} active players for the selected courts (have {})",
                required, available
            ),
            LeagueError::NoCourts => write!(f, "At least one court is required"),
            LeagueError::PlayerNotFound(_) => write!(f, "Player not found"),
            LeagueError::DuplicatePlayerName => write!(f, "A player with this name already exists"),
            LeagueError::InvalidPlayerName => write!(f, "Player name must not be empty"),
            LeagueError::InvalidLevel => write!(f, "Level must be at least 1"),
            LeagueError::RoundNotFound(_) => write!(f, "Round not found"),
            LeagueError::MatchNotFound(_) => write!(f, "Match not found"),
            LeagueError::TiedScore => write!(f, "A match cannot end with equal games"),
            LeagueError::NoRounds => write!(f, "No round has been generated yet"),
            LeagueError::RoundAlreadyScored(_) => {
                write!(f, "The round already has results and cannot be regenerated")
            }
        }
    }
}

impl std::error::Error for LeagueError {}

/// Unique identifier for a league.
pub type LeagueId = Uuid;

/// Full league state: players, rounds so far, and courts available per round.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct League {
    pub id: LeagueId,
    pub name: String,
    pub players: Vec<Player>,
    /// Generated rounds, oldest first.
    pub rounds: Vec<Round>,
    pub courts: u32,
}

impl League {
    /// Create an empty league. Fails if `courts` is zero.
    pub fn new(name: impl Into<String>, courts: u32) -> Result<Self, LeagueError> {
        if courts == 0 {
            return Err(LeagueError::NoCourts);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.into(),
            players: Vec::new(),
            rounds: Vec::new(),
            courts,
        })
    }

    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn get_player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    pub fn get_round_mut(&mut self, id: RoundId) -> Option<&mut Round> {
        self.rounds.iter_mut().find(|r| r.id == id)
    }

    pub fn active_player_count(&self) -> usize {
        self.players.iter().filter(|p| p.active).count()
    }

    /// Register a player. Names must be unique (case-insensitive). Returns the new id.
    pub fn add_player(&mut self, name: impl Into<String>, level: u32) -> Result<PlayerId, LeagueError> {
        let name = name.into();
        let name_trimmed = name.trim();
        if name_trimmed.is_empty() {
            return Err(LeagueError::InvalidPlayerName);
        }
        if level == 0 {
            return Err(LeagueError::InvalidLevel);
        }
        let is_duplicate = self
            .players
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(name_trimmed));
        if is_duplicate {
            return Err(LeagueError::DuplicatePlayerName);
        }
        let player = Player::new(name_trimmed, level);
        let id = player.id;
        self.players.push(player);
        Ok(id)
    }

    /// Remove a player from the pool. Past rounds keep referencing the id;
    /// the leaderboard simply no longer lists them.
    pub fn remove_player(&mut self, player_id: PlayerId) -> Result<(), LeagueError> {
        let idx = self
            .players
            .iter()
            .position(|p| p.id == player_id)
            .ok_or(LeagueError::PlayerNotFound(player_id))?;
        self.players.remove(idx);
        Ok(())
    }

    pub fn set_player_active(&mut self, player_id: PlayerId, active: bool) -> Result<(), LeagueError> {
        self.get_player_mut(player_id)
            .ok_or(LeagueError::PlayerNotFound(player_id))?
            .active = active;
        Ok(())
    }

    pub fn set_player_level(&mut self, player_id: PlayerId, level: u32) -> Result<(), LeagueError> {
        if level == 0 {
            return Err(LeagueError::InvalidLevel);
        }
        self.get_player_mut(player_id)
            .ok_or(LeagueError::PlayerNotFound(player_id))?
            .level = level;
        Ok(())
    }

    pub fn set_courts(&mut self, courts: u32) -> Result<(), LeagueError> {
        if courts == 0 {
            return Err(LeagueError::NoCourts);
        }
        self.courts = courts;
        Ok(())
    }

    /// Current standings, recomputed from the full round history.
    pub fn leaderboard(&self) -> Vec<LeaderboardRow> {
        rank(&self.players, &self.rounds)
    }
}
