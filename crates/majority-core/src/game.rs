//! Core game state and transition function.
//!
//! This module contains the `GameState` aggregate and the three public
//! operations the driver consumes: legal-action enumeration, action
//! application, and control resolution, plus scoring and the canonical
//! state fingerprint used for determinism verification.
//!
//! The engine is fully synchronous and single-threaded. A `GameState` is
//! exclusively owned by one run; the applier takes `&mut self` and never
//! aliases state across calls, so separate games can run in parallel with
//! zero coordination.

use crate::actions::{assign_action_ids, Action, ActionId, ActionKind};
use crate::board::{build_deck, BoardState, DeckState, PlayerId, TileId, TileType};
use crate::coord::GridCoord;
use crate::player::{PlayerState, Resource};
use crate::rng::{GameRng, GameRngState};
use crate::rules::RuleSet;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use thiserror::Error;

/// Which optional rule modules are enabled. Immutable after game creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionsConfig {
    /// Work tiles, labor payouts, and resource conversion.
    pub economy: bool,
    /// Order tiles, movement costs, and defender stickiness.
    pub order: bool,
}

/// Fixed, fully-enumerated counters and series.
///
/// Every metric is statically present and typed; nothing is inserted under
/// dynamic keys at runtime. Counters are additive and never reset. Read by
/// external collaborators only - the engine itself never branches on them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    /// Pass actions applied.
    pub pass_count: u64,
    /// Influence units moved between tiles.
    pub influence_moves: u64,
    /// Resource conversions applied.
    pub conversions: u64,
    /// Per-tile majority checks run by formalize actions.
    pub majority_checks: u64,
    /// Majority checks that produced a controller.
    pub majority_checks_effective: u64,
    /// Majority checks blocked by a tie.
    pub majority_checks_blocked: u64,
    /// Control changes across all tiles.
    pub control_changes_total: u64,
    /// Control changes on Work tiles specifically.
    pub control_changes_work_tiles: u64,
    /// Labor credited by the economy rule's round-end payout.
    pub labor_paid_total: u64,
    /// Rounds completed; written by the driver at end of run.
    pub rounds_played: u32,
    /// Per-round totals of influence on the board, one entry per player.
    pub series_influence_by_player: Vec<Vec<u32>>,
    /// Per-round resource sums, one entry per player.
    pub series_resources_by_player: Vec<Vec<u32>>,
}

/// Errors from the action applier.
///
/// Every variant indicates caller misuse: an agent or driver submitted
/// something the generator did not offer. None of these are recoverable game
/// events - they propagate to the caller and are never coerced to a pass.
/// All are deterministic functions of state and action.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum GameError {
    #[error("action id {aid} is not in the current legal set")]
    NotInLegalSet { aid: ActionId },

    #[error("no tiles left to place")]
    DeckExhausted,

    #[error("cell {0} is already occupied")]
    PositionOccupied(GridCoord),

    #[error("unknown tile {0}")]
    UnknownTile(TileId),

    #[error("no influence available in the pool")]
    NoInfluenceAvailable,

    #[error("no influence on source tile {0}")]
    NoInfluenceOnSource(TileId),

    #[error("insufficient {resource:?}: {needed} required")]
    InsufficientResources { resource: Resource, needed: u32 },

    #[error("conversion amount must be positive, got {0}")]
    InvalidConversionAmount(u32),
}

/// The complete game state for one run.
///
/// Created once per game, exclusively owned by the driver, mutated in place
/// by [`GameState::apply_action`] and by rule hooks, and discarded after
/// scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Seed the game was created from. Immutable.
    pub seed: u64,
    /// RNG stream snapshot. Serialized with the state but excluded from the
    /// canonical fingerprint.
    pub rng_state: GameRngState,
    /// Current round; monotonically non-decreasing, advanced by the driver.
    pub round: u32,
    /// Applied-action count; increases by exactly 1 per action.
    pub turn: u32,
    /// Whose turn it is; advances round-robin.
    pub current_player: PlayerId,
    /// Number of seats. Fixed at creation.
    pub num_players: u8,
    /// Seat-ordered player states; never reordered.
    pub players: Vec<PlayerState>,
    /// The board.
    pub board: BoardState,
    /// The shuffled tile bag and its cursor.
    pub deck: DeckState,
    /// Enabled rule modules.
    pub expansions: ExpansionsConfig,
    /// Balance counters and series.
    pub metrics: Metrics,
}

impl GameState {
    /// Create a new game. Deterministic given identical inputs.
    ///
    /// Builds the tile bag for the expansion configuration, shuffles it once
    /// with the seeded RNG, and forces a starting tile onto the origin cell
    /// so the board begins connected: the first City in the shuffled bag is
    /// moved to the front (or the first tile stays put if there is no City)
    /// and placed, leaving the deck cursor at 1.
    pub fn new(seed: u64, expansions: ExpansionsConfig, num_players: u8) -> Self {
        assert!(
            (2..=8).contains(&num_players),
            "Must have 2-8 players"
        );

        let mut rng = GameRng::new(seed);
        let mut tiles = build_deck(expansions.economy, expansions.order);
        rng.shuffle(&mut tiles);

        let players: Vec<PlayerState> = (0..num_players).map(PlayerState::new).collect();
        let mut board = BoardState::new();
        let mut deck = DeckState { tiles, index: 0 };

        if !deck.tiles.is_empty() {
            let start = deck
                .tiles
                .iter()
                .position(|(_, t)| *t == TileType::City)
                .unwrap_or(0);
            let (id, tile_type) = deck.tiles.remove(start);
            deck.tiles.insert(0, (id, tile_type));
            deck.index = 1;
            board.place_tile(id, tile_type, GridCoord::ORIGIN, num_players);
        }

        Self {
            seed,
            rng_state: rng.state(),
            round: 1,
            turn: 0,
            current_player: 0,
            num_players,
            players,
            board,
            deck,
            expansions,
            metrics: Metrics::default(),
        }
    }

    /// Enumerate every legally applicable action for the current player.
    ///
    /// Side-effect-free. The returned sequence is deterministically ordered
    /// and each action carries an id valid only against this exact state
    /// snapshot; regenerating from the same state yields identical actions
    /// in identical order.
    pub fn legal_actions(&self) -> Vec<Action> {
        let mut actions = vec![Action {
            aid: 0,
            kind: ActionKind::Pass,
        }];

        // Place the next deck tile at any board-adjacent empty cell, or the
        // origin if the board is empty.
        if let Some((_, tile_type)) = self.deck.peek() {
            let candidates: BTreeSet<GridCoord> = if self.board.is_empty() {
                BTreeSet::from([GridCoord::ORIGIN])
            } else {
                self.board.frontier()
            };
            for at in candidates {
                actions.push(Action {
                    aid: 0,
                    kind: ActionKind::PlaceTile { tile_type, at },
                });
            }
        }

        let player = &self.players[self.current_player as usize];

        if player.influence_pool > 0 {
            for &tile in self.board.tiles.keys() {
                actions.push(Action {
                    aid: 0,
                    kind: ActionKind::PlaceInfluence { tile },
                });
            }
        }

        // Movement from any tile holding the player's influence to any
        // other tile, including tiles nobody has a stake in yet. Under the
        // order expansion movement additionally requires a coin.
        let can_move = !self.expansions.order || player.resources.get(Resource::Coin) > 0;
        if can_move {
            for (&from, counts) in &self.board.influence {
                if counts[self.current_player as usize] == 0 {
                    continue;
                }
                for &to in self.board.tiles.keys() {
                    if to != from {
                        actions.push(Action {
                            aid: 0,
                            kind: ActionKind::MoveInfluence { from, to },
                        });
                    }
                }
            }
        }

        actions.push(Action {
            aid: 0,
            kind: ActionKind::FormalizeInfluence,
        });

        if self.expansions.economy && player.resources.get(Resource::Labor) > 0 {
            actions.push(Action {
                aid: 0,
                kind: ActionKind::ConvertResources {
                    from: Resource::Labor,
                    to: Resource::Coin,
                    amount: 1,
                },
            });
        }

        assign_action_ids(&mut actions);
        actions
    }

    /// Apply one action, mutating the state in place.
    ///
    /// The legal set is recomputed first and the action is rejected unless
    /// its id is among the recomputed ids; this defends against stale or
    /// foreign actions and doubles as a generator/applier consistency check.
    /// After the type-specific effect the turn always advances, including
    /// for a pass.
    pub fn apply_action(&mut self, action: &Action) -> Result<(), GameError> {
        let legal = self.legal_actions();
        if !legal.iter().any(|a| a.aid == action.aid) {
            return Err(GameError::NotInLegalSet { aid: action.aid });
        }

        let player = self.current_player;

        match action.kind {
            ActionKind::Pass => {
                self.metrics.pass_count += 1;
            }

            ActionKind::PlaceTile { at, .. } => {
                // The tile placed is whatever is next in the deck; the
                // action names only the destination cell.
                let (id, tile_type) = self.deck.peek().ok_or(GameError::DeckExhausted)?;
                if self.board.is_occupied(at) {
                    return Err(GameError::PositionOccupied(at));
                }
                self.board.place_tile(id, tile_type, at, self.num_players);
                self.deck.index += 1;
            }

            ActionKind::PlaceInfluence { tile } => {
                if self.players[player as usize].influence_pool == 0 {
                    return Err(GameError::NoInfluenceAvailable);
                }
                let counts = self
                    .board
                    .influence
                    .get_mut(&tile)
                    .ok_or(GameError::UnknownTile(tile))?;
                counts[player as usize] += 1;
                self.players[player as usize].influence_pool -= 1;
            }

            ActionKind::MoveInfluence { from, to } => {
                if !self.board.influence.contains_key(&to) {
                    return Err(GameError::UnknownTile(to));
                }
                let source = self
                    .board
                    .influence
                    .get(&from)
                    .ok_or(GameError::UnknownTile(from))?;
                if source[player as usize] == 0 {
                    return Err(GameError::NoInfluenceOnSource(from));
                }
                // Order expansion: movement costs 1 coin.
                if self.expansions.order
                    && !self.players[player as usize]
                        .resources
                        .try_spend(Resource::Coin, 1)
                {
                    return Err(GameError::InsufficientResources {
                        resource: Resource::Coin,
                        needed: 1,
                    });
                }
                if let Some(counts) = self.board.influence.get_mut(&from) {
                    counts[player as usize] -= 1;
                }
                if let Some(counts) = self.board.influence.get_mut(&to) {
                    counts[player as usize] += 1;
                }
                self.metrics.influence_moves += 1;
            }

            ActionKind::FormalizeInfluence => {
                // Resolve majority control for every tile on the board,
                // under a context every active rule contributed to. This is
                // the only action that can change control.
                let ctx = RuleSet::from_config(self.expansions).majority_context();
                let tiles: Vec<TileId> = self.board.tiles.keys().copied().collect();
                for id in tiles {
                    self.metrics.majority_checks += 1;
                    let previous = self.board.control.get(&id).copied().flatten();
                    let next = self.resolve_control(id, ctx.stickiness);
                    match next {
                        Some(_) => self.metrics.majority_checks_effective += 1,
                        None => self.metrics.majority_checks_blocked += 1,
                    }
                    if previous != next {
                        self.metrics.control_changes_total += 1;
                        if self.board.tile_type(id) == Some(TileType::Work) {
                            self.metrics.control_changes_work_tiles += 1;
                        }
                    }
                    self.board.control.insert(id, next);
                }
                self.players[player as usize].formalizations += 1;
            }

            ActionKind::ConvertResources { from, to, amount } => {
                if amount == 0 {
                    return Err(GameError::InvalidConversionAmount(amount));
                }
                if !self.players[player as usize].resources.try_spend(from, amount) {
                    return Err(GameError::InsufficientResources {
                        resource: from,
                        needed: amount,
                    });
                }
                self.players[player as usize].resources.add(to, amount);
                self.metrics.conversions += 1;
            }
        }

        self.turn += 1;
        self.current_player = (self.current_player + 1) % self.num_players;

        Ok(())
    }

    /// Resolve majority control for one tile.
    ///
    /// Side-effect-free. The incumbent controller, if any, gets `stickiness`
    /// added to their raw influence count (defender's advantage). Control
    /// goes to the unique maximum; any tie for the maximum leaves the tile
    /// uncontrolled regardless of the previous incumbent. A tie is the only
    /// path to losing control via formalization - a sole non-zero
    /// contributor always wins.
    pub fn resolve_control(&self, tile: TileId, stickiness: u32) -> Option<PlayerId> {
        let counts = self.board.influence.get(&tile)?;
        let mut adjusted = counts.clone();
        if let Some(incumbent) = self.board.control.get(&tile).copied().flatten() {
            if let Some(slot) = adjusted.get_mut(incumbent as usize) {
                *slot += stickiness;
            }
        }

        let best = *adjusted.iter().max()?;
        let mut at_max = adjusted.iter().enumerate().filter(|(_, v)| **v == best);
        let (winner, _) = at_max.next()?;
        if at_max.next().is_some() {
            return None;
        }
        Some(winner as PlayerId)
    }

    /// Controlled-tile count per player.
    pub fn score(&self) -> Vec<u32> {
        let mut scores = vec![0; self.num_players as usize];
        for controller in self.board.control.values().flatten() {
            scores[*controller as usize] += 1;
        }
        scores
    }

    /// Canonical fingerprint of the public state.
    ///
    /// SHA-256 over a canonical JSON serialization of everything except the
    /// RNG stream snapshot (the seed itself is included). Map iteration
    /// order is fixed by `BTreeMap` and position keys serialize as `"x,y"`,
    /// so two semantically identical states always produce identical
    /// digests. Used purely for determinism verification, never gameplay.
    pub fn fingerprint(&self) -> String {
        #[derive(Serialize)]
        struct Canonical<'a> {
            seed: u64,
            round: u32,
            turn: u32,
            current_player: PlayerId,
            num_players: u8,
            players: &'a [PlayerState],
            board: &'a BoardState,
            deck: &'a DeckState,
            expansions: ExpansionsConfig,
            metrics: &'a Metrics,
        }

        let canonical = Canonical {
            seed: self.seed,
            round: self.round,
            turn: self.turn,
            current_player: self.current_player,
            num_players: self.num_players,
            players: &self.players,
            board: &self.board,
            deck: &self.deck,
            expansions: self.expansions,
            metrics: &self.metrics,
        };

        // Plain data structs with string-keyed maps; serialization cannot
        // fail.
        let bytes = serde_json::to_vec(&canonical).expect("canonical state serializes");
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        hex::encode(hasher.finalize())
    }
}

/// Pick the winner from per-player scores: maximum count, lowest player
/// index on ties.
pub fn winner(scores: &[u32]) -> PlayerId {
    let mut best = 0;
    for (i, score) in scores.iter().enumerate().skip(1) {
        if *score > scores[best] {
            best = i;
        }
    }
    best as PlayerId
}
