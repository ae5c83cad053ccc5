//! Player state and resource management.

use crate::board::PlayerId;
use serde::{Deserialize, Serialize};

/// Influence units each player starts with. The pool only ever decreases;
/// moving influence shifts committed units between tiles without refunding
/// the pool.
pub const STARTING_INFLUENCE: u32 = 8;

/// Closed set of resource kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Resource {
    /// Paid out by controlled Work tiles (economy expansion).
    Labor,
    /// Movement currency under the order expansion.
    Coin,
}

impl Resource {
    /// All resource kinds.
    pub const ALL: [Resource; 2] = [Resource::Labor, Resource::Coin];
}

/// Per-kind resource counts for one player.
///
/// A fixed struct rather than a keyed map, so every balance is statically
/// present and typed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceHand {
    pub labor: u32,
    pub coin: u32,
}

impl ResourceHand {
    /// Create an empty hand.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the balance of one resource kind.
    pub fn get(&self, resource: Resource) -> u32 {
        match resource {
            Resource::Labor => self.labor,
            Resource::Coin => self.coin,
        }
    }

    /// Add to one balance.
    pub fn add(&mut self, resource: Resource, amount: u32) {
        match resource {
            Resource::Labor => self.labor += amount,
            Resource::Coin => self.coin += amount,
        }
    }

    /// Subtract from one balance, returning false (and leaving the hand
    /// untouched) if the balance is insufficient.
    pub fn try_spend(&mut self, resource: Resource, amount: u32) -> bool {
        let balance = self.get(resource);
        if balance < amount {
            return false;
        }
        match resource {
            Resource::Labor => self.labor = balance - amount,
            Resource::Coin => self.coin = balance - amount,
        }
        true
    }

    /// Sum across all resource kinds.
    pub fn total(&self) -> u32 {
        self.labor + self.coin
    }
}

/// One player's mutable state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Stable seat index.
    pub id: PlayerId,
    /// Uncommitted influence units remaining.
    pub influence_pool: u32,
    /// Resource balances.
    pub resources: ResourceHand,
    /// Number of formalize actions this player has taken.
    pub formalizations: u32,
}

impl PlayerState {
    /// Create a player with the starting influence pool and no resources.
    pub fn new(id: PlayerId) -> Self {
        Self {
            id,
            influence_pool: STARTING_INFLUENCE,
            resources: ResourceHand::new(),
            formalizations: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_player_has_starting_pool() {
        let p = PlayerState::new(2);
        assert_eq!(p.id, 2);
        assert_eq!(p.influence_pool, STARTING_INFLUENCE);
        assert_eq!(p.resources.total(), 0);
        assert_eq!(p.formalizations, 0);
    }

    #[test]
    fn hand_add_and_get() {
        let mut hand = ResourceHand::new();
        hand.add(Resource::Labor, 3);
        hand.add(Resource::Coin, 1);
        assert_eq!(hand.get(Resource::Labor), 3);
        assert_eq!(hand.get(Resource::Coin), 1);
        assert_eq!(hand.total(), 4);
    }

    #[test]
    fn try_spend_checks_balance() {
        let mut hand = ResourceHand::new();
        hand.add(Resource::Coin, 2);
        assert!(hand.try_spend(Resource::Coin, 1));
        assert_eq!(hand.coin, 1);
        assert!(!hand.try_spend(Resource::Coin, 2));
        assert_eq!(hand.coin, 1);
        assert!(!hand.try_spend(Resource::Labor, 1));
    }
}
