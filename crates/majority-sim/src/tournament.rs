//! Multi-seed tournament runner.
//!
//! Iterates a fixed agent lineup over a list of seeds, rotating seats each
//! game so no policy keeps a positional advantage, and aggregates wins per
//! agent for the balance summary.

use crate::agents::Agent;
use crate::runner::{run_game, GameReport};
use majority_core::{ExpansionsConfig, GameError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// Aggregated results across all games of a tournament.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentReport {
    pub expansions: ExpansionsConfig,
    pub rounds_per_game: u32,
    pub games: Vec<GameReport>,
    /// Wins per agent name, across all seat rotations.
    pub wins_by_agent: BTreeMap<String, u32>,
}

/// Run one game per seed with seat rotation: in game `i`, seat `j` is taken
/// by agent `(j + i) % n` of the lineup.
pub fn run_tournament(
    expansions: ExpansionsConfig,
    agents: &[Box<dyn Agent>],
    seeds: &[u64],
    rounds: u32,
) -> Result<TournamentReport, GameError> {
    let n = agents.len();
    let mut games = Vec::with_capacity(seeds.len());
    let mut wins_by_agent: BTreeMap<String, u32> =
        agents.iter().map(|a| (a.name().to_string(), 0)).collect();

    for (i, &seed) in seeds.iter().enumerate() {
        let seated: Vec<&dyn Agent> = (0..n).map(|j| agents[(j + i) % n].as_ref()).collect();
        let report = run_game(expansions, &seated, seed, rounds)?;
        info!(
            seed,
            winner = report.winner,
            winner_agent = %report.agents[report.winner as usize],
            scores = ?report.scores,
            "game finished"
        );
        if let Some(wins) = wins_by_agent.get_mut(&report.agents[report.winner as usize]) {
            *wins += 1;
        }
        games.push(report);
    }

    Ok(TournamentReport {
        expansions,
        rounds_per_game: rounds,
        games,
        wins_by_agent,
    })
}
