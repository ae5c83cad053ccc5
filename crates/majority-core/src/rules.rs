//! Expansion rule hooks.
//!
//! Rules are a closed set of variants over a fixed capability surface
//! (turn start, action applied, round end, majority-context modification)
//! rather than trait objects: the engine never depends on a rule's concrete
//! logic, only on dispatching the lifecycle calls in a fixed order. A
//! [`RuleSet`] is built once per game from the expansion configuration -
//! base rule first, then economy, then order - and order matters only for
//! majority-context contributions, which are additive.

use crate::actions::Action;
use crate::board::TileType;
use crate::game::{ExpansionsConfig, GameState};
use crate::player::Resource;
use serde::{Deserialize, Serialize};

/// Per-formalize context the resolver consults, built by letting every
/// active rule contribute before any tile is resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MajorityContext {
    /// Flat bonus added to the incumbent controller's influence count
    /// before majority comparison. One value for the whole formalize
    /// action, not per tile.
    pub stickiness: u32,
}

/// One rule module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rule {
    /// Core rules; every hook is a no-op.
    Base,
    /// Economy expansion: controlled Work tiles pay labor at round end.
    Economy,
    /// Order expansion: defenders get +1 stickiness during formalization.
    Order,
}

impl Rule {
    /// Called by the driver before each turn's legal set is generated.
    pub fn on_turn_start(&self, _state: &mut GameState) {}

    /// Called by the driver after an action has been applied.
    pub fn on_action_applied(&self, _state: &mut GameState, _action: &Action) {}

    /// Called by the driver after every player has acted in a round.
    pub fn on_round_end(&self, state: &mut GameState) {
        if let Rule::Economy = self {
            // Each controlled Work tile pays its controller +1 labor.
            let controllers: Vec<_> = state
                .board
                .control
                .iter()
                .filter(|(tid, _)| state.board.tile_type(**tid) == Some(TileType::Work))
                .filter_map(|(_, ctrl)| *ctrl)
                .collect();
            for player in controllers {
                state.players[player as usize].resources.add(Resource::Labor, 1);
                state.metrics.labor_paid_total += 1;
            }
        }
    }

    /// Contribute to the shared majority context for one formalize action.
    pub fn modify_majority_context(&self, ctx: &mut MajorityContext) {
        if let Rule::Order = self {
            // Flipping control gets slightly harder: defender gains +1
            // effective influence.
            ctx.stickiness += 1;
        }
    }
}

/// The ordered list of active rules for one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    expansions: ExpansionsConfig,
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Build the rule list for an expansion configuration. Base always
    /// comes first, then economy, then order.
    pub fn from_config(expansions: ExpansionsConfig) -> Self {
        let mut rules = vec![Rule::Base];
        if expansions.economy {
            rules.push(Rule::Economy);
        }
        if expansions.order {
            rules.push(Rule::Order);
        }
        Self { expansions, rules }
    }

    /// The configuration this set was built from.
    pub fn expansions(&self) -> ExpansionsConfig {
        self.expansions
    }

    /// Dispatch turn start to every rule in order.
    pub fn on_turn_start(&self, state: &mut GameState) {
        for rule in &self.rules {
            rule.on_turn_start(state);
        }
    }

    /// Dispatch action applied to every rule in order.
    pub fn on_action_applied(&self, state: &mut GameState, action: &Action) {
        for rule in &self.rules {
            rule.on_action_applied(state, action);
        }
    }

    /// Dispatch round end to every rule in order.
    pub fn on_round_end(&self, state: &mut GameState) {
        for rule in &self.rules {
            rule.on_round_end(state);
        }
    }

    /// Build the majority context for one formalize action.
    pub fn majority_context(&self) -> MajorityContext {
        let mut ctx = MajorityContext::default();
        for rule in &self.rules {
            rule.modify_majority_context(&mut ctx);
        }
        ctx
    }
}
