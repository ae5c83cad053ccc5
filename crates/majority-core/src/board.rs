//! Board representation: tiles, the position index, influence, and control.
//!
//! The board is an unbounded 4-connected grid that starts with a single
//! settlement tile at the origin and grows one tile at a time from the deck.
//! Alongside the tiles themselves it tracks, per tile, the influence each
//! player has committed and who currently controls it.

use crate::coord::{coord_key_map, GridCoord};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Player identifier - index into the player list.
pub type PlayerId = u8;

/// Unique tile identifier, assigned sequentially at deck construction.
pub type TileId = u32;

/// Closed set of tile types.
///
/// `City` is the base game; `Work` ships with the economy expansion and
/// `Order` with the order expansion. The derived `Ord` fixes the tile-type
/// component of the legal-action sort key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum TileType {
    /// Base settlement tile.
    City,
    /// Economy expansion: pays labor to its controller each round.
    Work,
    /// Order expansion tile.
    Order,
}

/// A tile that has been placed on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileOnBoard {
    pub id: TileId,
    pub tile_type: TileType,
    pub pos: GridCoord,
    /// Reserved; not consulted by control resolution.
    pub orientation: u8,
}

/// The board aggregate.
///
/// Invariant: `tiles`, `influence`, and `control` always share the same key
/// set, and `pos_index` is the exact inverse of tile positions. All mutation
/// goes through [`BoardState::place_tile`], which maintains this.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    /// All placed tiles by id.
    pub tiles: BTreeMap<TileId, TileOnBoard>,
    /// Occupied cell -> tile id, inverse of tile positions.
    #[serde(with = "coord_key_map")]
    pub pos_index: BTreeMap<GridCoord, TileId>,
    /// Tile id -> influence counts, one slot per player.
    pub influence: BTreeMap<TileId, Vec<u32>>,
    /// Tile id -> current controller, if any.
    pub control: BTreeMap<TileId, Option<PlayerId>>,
}

impl BoardState {
    /// Create an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any tile has been placed.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Whether a cell is occupied.
    pub fn is_occupied(&self, pos: GridCoord) -> bool {
        self.pos_index.contains_key(&pos)
    }

    /// Register a tile at a cell, with a zeroed influence vector and no
    /// controller. The cell must be unoccupied.
    pub fn place_tile(&mut self, id: TileId, tile_type: TileType, pos: GridCoord, num_players: u8) {
        debug_assert!(!self.is_occupied(pos), "cell already occupied");
        self.tiles.insert(
            id,
            TileOnBoard {
                id,
                tile_type,
                pos,
                orientation: 0,
            },
        );
        self.pos_index.insert(pos, id);
        self.influence.insert(id, vec![0; num_players as usize]);
        self.control.insert(id, None);
    }

    /// Empty cells edge-adjacent to at least one occupied cell, in
    /// coordinate order.
    pub fn frontier(&self) -> BTreeSet<GridCoord> {
        let mut frontier = BTreeSet::new();
        for pos in self.pos_index.keys() {
            for neighbor in pos.neighbors() {
                if !self.is_occupied(neighbor) {
                    frontier.insert(neighbor);
                }
            }
        }
        frontier
    }

    /// Type of a placed tile, if it exists.
    pub fn tile_type(&self, id: TileId) -> Option<TileType> {
        self.tiles.get(&id).map(|t| t.tile_type)
    }
}

/// The ordered tile bag, fixed at game start after shuffling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckState {
    /// Shuffled (tile id, tile type) sequence.
    pub tiles: Vec<(TileId, TileType)>,
    /// Cursor into `tiles`; only ever increases.
    pub index: usize,
}

impl DeckState {
    /// The next tile to be placed, if any remain.
    pub fn peek(&self) -> Option<(TileId, TileType)> {
        self.tiles.get(self.index).copied()
    }

    /// Number of tiles left to draw.
    pub fn remaining(&self) -> usize {
        self.tiles.len() - self.index
    }
}

/// City tiles in the base bag.
pub const BASE_CITY_TILES: usize = 10;
/// Work tiles added by the economy expansion.
pub const ECONOMY_WORK_TILES: usize = 6;
/// Order tiles added by the order expansion.
pub const ORDER_EXPANSION_TILES: usize = 4;

/// Build the unshuffled tile bag for an expansion configuration.
///
/// Pure: ids are assigned sequentially from 1 in bag order, so the same
/// configuration always yields the same bag.
pub fn build_deck(economy: bool, order: bool) -> Vec<(TileId, TileType)> {
    let mut bag = Vec::new();
    bag.extend(std::iter::repeat(TileType::City).take(BASE_CITY_TILES));
    if economy {
        bag.extend(std::iter::repeat(TileType::Work).take(ECONOMY_WORK_TILES));
    }
    if order {
        bag.extend(std::iter::repeat(TileType::Order).take(ORDER_EXPANSION_TILES));
    }
    bag.into_iter()
        .enumerate()
        .map(|(i, tile_type)| (i as TileId + 1, tile_type))
        .collect()
}
