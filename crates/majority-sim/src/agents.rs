//! Decision-making agents.
//!
//! Agents are pure, non-learning policies: given the state and the legal
//! set, pick exactly one element of that set. Returning a reference into
//! the provided slice enforces the contract that agents never fabricate
//! actions. All agents here are deterministic so runs stay reproducible.

use majority_core::{Action, ActionKind, GameState};

/// A decision-making policy.
pub trait Agent {
    /// Short name for CLI selection and reporting.
    fn name(&self) -> &'static str;

    /// Select one action from the legal set.
    ///
    /// `legal` is never empty (a pass is always legal) and is sorted by
    /// ascending action id.
    fn choose_action<'a>(&self, state: &GameState, legal: &'a [Action]) -> &'a Action;
}

/// Lowest-aid fallback shared by the heuristics.
fn first(legal: &[Action]) -> &Action {
    &legal[0]
}

/// Always picks the lowest-aid action. The baseline policy used for
/// determinism checks.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowestAidAgent;

impl Agent for LowestAidAgent {
    fn name(&self) -> &'static str {
        "lowest-aid"
    }

    fn choose_action<'a>(&self, _state: &GameState, legal: &'a [Action]) -> &'a Action {
        first(legal)
    }
}

/// Spreads choices across the legal set by indexing with the turn number.
/// Pseudo-random in effect but a pure function of state, so identical seeds
/// replay identically.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomLegalAgent;

impl Agent for RandomLegalAgent {
    fn name(&self) -> &'static str {
        "random"
    }

    fn choose_action<'a>(&self, state: &GameState, legal: &'a [Action]) -> &'a Action {
        &legal[state.turn as usize % legal.len()]
    }
}

/// Consolidator: prefers formalizing control, then committing influence,
/// then expanding the board.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstitutionAgent;

impl Agent for InstitutionAgent {
    fn name(&self) -> &'static str {
        "institution"
    }

    fn choose_action<'a>(&self, _state: &GameState, legal: &'a [Action]) -> &'a Action {
        legal
            .iter()
            .find(|a| matches!(a.kind, ActionKind::FormalizeInfluence))
            .or_else(|| {
                legal
                    .iter()
                    .find(|a| matches!(a.kind, ActionKind::PlaceInfluence { .. }))
            })
            .or_else(|| {
                legal
                    .iter()
                    .find(|a| matches!(a.kind, ActionKind::PlaceTile { .. }))
            })
            .unwrap_or_else(|| first(legal))
    }
}

/// Disruptor: prefers moving influence to contest tiles, then expanding.
#[derive(Debug, Clone, Copy, Default)]
pub struct NetworkAgent;

impl Agent for NetworkAgent {
    fn name(&self) -> &'static str {
        "network"
    }

    fn choose_action<'a>(&self, _state: &GameState, legal: &'a [Action]) -> &'a Action {
        legal
            .iter()
            .find(|a| matches!(a.kind, ActionKind::MoveInfluence { .. }))
            .or_else(|| {
                legal
                    .iter()
                    .find(|a| matches!(a.kind, ActionKind::PlaceTile { .. }))
            })
            .unwrap_or_else(|| first(legal))
    }
}

/// Economist: prefers committing influence to secure payouts, then
/// converting resources.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductionAgent;

impl Agent for ProductionAgent {
    fn name(&self) -> &'static str {
        "production"
    }

    fn choose_action<'a>(&self, _state: &GameState, legal: &'a [Action]) -> &'a Action {
        legal
            .iter()
            .find(|a| matches!(a.kind, ActionKind::PlaceInfluence { .. }))
            .or_else(|| {
                legal
                    .iter()
                    .find(|a| matches!(a.kind, ActionKind::ConvertResources { .. }))
            })
            .unwrap_or_else(|| first(legal))
    }
}

/// Build an agent from its CLI name.
pub fn agent_by_name(name: &str) -> Option<Box<dyn Agent>> {
    match name {
        "lowest-aid" => Some(Box::new(LowestAidAgent)),
        "random" => Some(Box::new(RandomLegalAgent)),
        "institution" => Some(Box::new(InstitutionAgent)),
        "network" => Some(Box::new(NetworkAgent)),
        "production" => Some(Box::new(ProductionAgent)),
        _ => None,
    }
}
