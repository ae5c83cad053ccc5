//! Result export: JSON and CSV report files.

use crate::runner::GameReport;
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Write any serializable report as pretty-printed JSON, creating parent
/// directories as needed.
pub fn write_json<T: Serialize>(path: &Path, report: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Write one CSV row per game with the headline balance columns.
pub fn write_csv(path: &Path, games: &[GameReport]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    let mut out = String::from(
        "seed,winner,winner_agent,scores,pass_count,influence_moves,conversions,\
         control_changes_total,labor_paid_total,fingerprint\n",
    );
    for game in games {
        let scores = game
            .scores
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join("|");
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{}\n",
            game.seed,
            game.winner,
            game.agents[game.winner as usize],
            scores,
            game.metrics.pass_count,
            game.metrics.influence_moves,
            game.metrics.conversions,
            game.metrics.control_changes_total,
            game.metrics.labor_paid_total,
            game.fingerprint,
        ));
    }
    fs::write(path, out).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
