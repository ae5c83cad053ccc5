//! Actions players can take, and their stable identifiers.
//!
//! Actions are ephemeral: the generator produces a fresh, deterministically
//! ordered set every turn, an agent picks one, the applier consumes it. Each
//! carries an `aid` assigned only by the generator; the applier accepts
//! nothing else.

use crate::board::{TileId, TileType};
use crate::coord::GridCoord;
use crate::player::Resource;
use serde::{Deserialize, Serialize};

/// Generator-issued action identifier, valid only against the exact state
/// snapshot it was generated from.
pub type ActionId = u32;

/// First id assigned in every legal-action set.
pub const AID_BASE: ActionId = 1000;

/// A legal action together with its identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub aid: ActionId,
    pub kind: ActionKind,
}

/// All possible action kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    /// Do nothing this turn.
    Pass,
    /// Place the next deck tile at an empty board-adjacent cell.
    PlaceTile { tile_type: TileType, at: GridCoord },
    /// Commit one influence unit from the pool onto a tile.
    PlaceInfluence { tile: TileId },
    /// Move one committed influence unit between tiles.
    MoveInfluence { from: TileId, to: TileId },
    /// Recompute majority control across the whole board.
    FormalizeInfluence,
    /// Convert resources of one kind into another.
    ConvertResources {
        from: Resource,
        to: Resource,
        amount: u32,
    },
}

impl ActionKind {
    /// Rank of the kind within the composite sort key.
    fn rank(&self) -> u8 {
        match self {
            ActionKind::Pass => 0,
            ActionKind::PlaceTile { .. } => 1,
            ActionKind::PlaceInfluence { .. } => 2,
            ActionKind::MoveInfluence { .. } => 3,
            ActionKind::FormalizeInfluence => 4,
            ActionKind::ConvertResources { .. } => 5,
        }
    }

    /// Composite sort key: (kind, tile id, tile type, placement cell,
    /// source, destination). Fields a kind does not carry contribute fixed
    /// defaults, so the total order is independent of how candidates were
    /// collected.
    pub fn sort_key(&self) -> (u8, TileId, u8, GridCoord, TileId, TileId) {
        let mut key = (self.rank(), 0, 0, GridCoord::ORIGIN, 0, 0);
        match *self {
            ActionKind::Pass | ActionKind::FormalizeInfluence => {}
            ActionKind::PlaceTile { tile_type, at } => {
                key.2 = tile_type as u8;
                key.3 = at;
            }
            ActionKind::PlaceInfluence { tile } => key.1 = tile,
            ActionKind::MoveInfluence { from, to } => {
                key.4 = from;
                key.5 = to;
            }
            ActionKind::ConvertResources { .. } => {}
        }
        key
    }
}

/// Sort a candidate set and assign sequential ids.
///
/// Two passes on purpose: ids are reassigned after the sort so they reflect
/// final order, never the iteration order candidates happened to be
/// collected in. Regenerating from the same state therefore yields identical
/// (kind, aid) tuples in identical order.
pub fn assign_action_ids(actions: &mut [Action]) {
    for (i, action) in actions.iter_mut().enumerate() {
        action.aid = AID_BASE + i as ActionId;
    }
    // Stable sort: candidates with equal keys keep insertion order.
    actions.sort_by_key(|action| action.kind.sort_key());
    for (i, action) in actions.iter_mut().enumerate() {
        action.aid = AID_BASE + i as ActionId;
    }
}
