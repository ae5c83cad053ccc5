//! Majority - a deterministic territory-control simulation engine.
//!
//! This crate is the core of a balance-evaluation harness for a tile-and-
//! influence board game: players draw tiles from a shuffled deck, commit
//! influence onto them, and periodically "formalize", which recomputes
//! majority control across the whole board. Optional expansion rules
//! (economy, order) alter deck composition, movement costs, and tie-break
//! stickiness without the core depending on their concrete logic.
//!
//! The engine is single-threaded, fully synchronous, and bit-for-bit
//! deterministic: a fixed seed, expansion configuration, player count, and
//! agent policy reproduce the exact same sequence of legal-action sets and
//! states, verifiable via canonical state fingerprints.
//!
//! # Modules
//!
//! - [`rng`]: seeded deterministic randomness (used once, for the shuffle)
//! - [`coord`]: 4-connected grid coordinates
//! - [`board`]: tiles, deck construction, influence, and control
//! - [`player`]: player state and resources
//! - [`actions`]: the action vocabulary and stable action ids
//! - [`rules`]: composable expansion rule hooks
//! - [`game`]: the state aggregate, legal-action generator, applier,
//!   control resolver, scoring, and fingerprinting
//!
//! Decision-making agents and the round-loop driver live outside this
//! crate; they consume `legal_actions`, `apply_action`, and `score` and
//! nothing more.

pub mod actions;
pub mod board;
pub mod coord;
pub mod game;
pub mod player;
pub mod rng;
pub mod rules;

// Re-export commonly used types
pub use actions::{assign_action_ids, Action, ActionId, ActionKind, AID_BASE};
pub use board::{
    build_deck, BoardState, DeckState, PlayerId, TileId, TileOnBoard, TileType,
};
pub use coord::GridCoord;
pub use game::{winner, ExpansionsConfig, GameError, GameState, Metrics};
pub use player::{PlayerState, Resource, ResourceHand, STARTING_INFLUENCE};
pub use rng::{EmptyDomainError, GameRng, GameRngState};
pub use rules::{MajorityContext, Rule, RuleSet};
