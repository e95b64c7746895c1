//! Player data structure: identity, skill level, and participation history.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier for a player (used in matches and lookups).
pub type PlayerId = Uuid;

/// A registered player in the league pool.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Skill level, 1 or higher. Higher is stronger.
    pub level: u32,
    /// Only active players are considered when generating a round.
    pub active: bool,
    /// Number of generated matches this player took part in.
    pub match_count: u32,
    /// How many times this player was teamed with each other player.
    #[serde(default)]
    pub partner_counts: HashMap<PlayerId, u32>,
}

impl Player {
    /// Create a new active player with no history.
    pub fn new(name: impl Into<String>, level: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            level,
            active: true,
            match_count: 0,
            partner_counts: HashMap::new(),
        }
    }

    /// Times this player has been teamed with `other`.
    pub fn times_partnered_with(&self, other: PlayerId) -> u32 {
        self.partner_counts.get(&other).copied().unwrap_or(0)
    }

    /// Record one more match played alongside `partner`.
    pub fn record_partner(&mut self, partner: PlayerId) {
        *self.partner_counts.entry(partner).or_insert(0) += 1;
    }

    /// Undo one partnership with `partner`. Entries that reach zero are dropped.
    pub fn forget_partner(&mut self, partner: PlayerId) {
        if let Some(count) = self.partner_counts.get_mut(&partner) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.partner_counts.remove(&partner);
            }
        }
    }
}
