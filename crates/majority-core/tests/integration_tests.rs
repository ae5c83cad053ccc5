//! Integration tests for the Majority engine.
//!
//! These drive whole games through the public surface the way an external
//! round-loop driver would: rule hooks, legal-action generation, agent
//! choice, application, scoring.

use majority_core::*;

/// Deterministic policy: always pick the lowest-aid action.
fn lowest_aid(legal: &[Action]) -> Action {
    legal[0].clone()
}

/// Policy that cycles through the legal set by turn number, touching a wide
/// variety of action kinds over a run.
fn turn_indexed(state: &GameState, legal: &[Action]) -> Action {
    legal[state.turn as usize % legal.len()].clone()
}

/// Run a fixed number of rounds the way the driver does: one action per
/// player per round, rule hooks around each turn and at round end.
fn run_rounds<F>(state: &mut GameState, rounds: u32, mut choose: F)
where
    F: FnMut(&GameState, &[Action]) -> Action,
{
    let ruleset = RuleSet::from_config(state.expansions);
    for round in 1..=rounds {
        state.round = round;
        for seat in 0..state.num_players {
            state.current_player = seat;
            ruleset.on_turn_start(state);
            let legal = state.legal_actions();
            let action = choose(state, &legal);
            state
                .apply_action(&action)
                .expect("chosen action came from the legal set");
            ruleset.on_action_applied(state, &action);
        }
        ruleset.on_round_end(state);
    }
    state.metrics.rounds_played = rounds;
}

#[test]
fn identical_runs_produce_identical_fingerprints() {
    let play = |_: ()| {
        let mut state = GameState::new(123, ExpansionsConfig::default(), 3);
        run_rounds(&mut state, 5, |_, legal| lowest_aid(legal));
        state.fingerprint()
    };
    assert_eq!(play(()), play(()));
}

#[test]
fn identical_runs_agree_with_expansions_enabled() {
    let expansions = ExpansionsConfig {
        economy: true,
        order: true,
    };
    let play = |_: ()| {
        let mut state = GameState::new(987, expansions, 4);
        run_rounds(&mut state, 8, turn_indexed);
        state.fingerprint()
    };
    assert_eq!(play(()), play(()));
}

#[test]
fn different_seeds_diverge() {
    let play = |seed: u64| {
        let expansions = ExpansionsConfig {
            economy: true,
            order: true,
        };
        let mut state = GameState::new(seed, expansions, 3);
        run_rounds(&mut state, 5, turn_indexed);
        state.fingerprint()
    };
    assert_ne!(play(1), play(2));
}

#[test]
fn every_legal_action_applies_cleanly() {
    for (economy, order) in [(false, false), (true, false), (true, true)] {
        let expansions = ExpansionsConfig { economy, order };
        let mut state = GameState::new(77, expansions, 3);
        let ruleset = RuleSet::from_config(expansions);

        for round in 1..=4 {
            state.round = round;
            for seat in 0..state.num_players {
                state.current_player = seat;
                ruleset.on_turn_start(&mut state);
                let legal = state.legal_actions();

                // Generator and applier preconditions must agree exactly:
                // no offered action is ever rejected.
                for action in &legal {
                    let mut probe = state.clone();
                    probe.apply_action(action).unwrap_or_else(|e| {
                        panic!("legal action {:?} was rejected: {e}", action.kind)
                    });
                }

                let action = turn_indexed(&state, &legal);
                state.apply_action(&action).unwrap();
                ruleset.on_action_applied(&mut state, &action);
            }
            ruleset.on_round_end(&mut state);
        }
    }
}

#[test]
fn legal_set_is_stable_across_regeneration() {
    let expansions = ExpansionsConfig {
        economy: true,
        order: true,
    };
    let mut state = GameState::new(31, expansions, 3);
    run_rounds(&mut state, 3, turn_indexed);

    let first = state.legal_actions();
    let second = state.legal_actions();
    assert_eq!(first, second);

    // Ids are sequential from the base in final order.
    for (i, action) in first.iter().enumerate() {
        assert_eq!(action.aid, AID_BASE + i as ActionId);
    }
}

#[test]
fn pass_is_always_legal_and_formalize_always_offered() {
    let mut state = GameState::new(5, ExpansionsConfig::default(), 2);
    // Drain the deck cursor to its end; pass and formalize must remain.
    state.deck.index = state.deck.tiles.len();
    state.players[0].influence_pool = 0;
    let legal = state.legal_actions();
    assert!(legal.iter().any(|a| a.kind == ActionKind::Pass));
    assert!(legal
        .iter()
        .any(|a| a.kind == ActionKind::FormalizeInfluence));
    assert!(!legal
        .iter()
        .any(|a| matches!(a.kind, ActionKind::PlaceTile { .. })));
}

#[test]
fn turn_and_player_advance_per_action() {
    let mut state = GameState::new(11, ExpansionsConfig::default(), 3);
    let mut expected_turn = 0;
    for _ in 0..9 {
        let legal = state.legal_actions();
        let before_player = state.current_player;
        state.apply_action(&lowest_aid(&legal)).unwrap();
        expected_turn += 1;
        assert_eq!(state.turn, expected_turn);
        assert_eq!(state.current_player, (before_player + 1) % 3);
    }
}

#[test]
fn move_influence_requires_coin_under_order_expansion() {
    let expansions = ExpansionsConfig {
        economy: false,
        order: true,
    };
    let mut state = GameState::new(42, expansions, 2);
    let source = *state.board.tiles.keys().next().unwrap();
    state.board.place_tile(90, TileType::City, GridCoord::new(1, 0), 2);
    state.board.influence.insert(source, vec![2, 0]);

    // Influence on a tile but no coin: no move action may appear.
    let legal = state.legal_actions();
    assert!(!legal
        .iter()
        .any(|a| matches!(a.kind, ActionKind::MoveInfluence { .. })));

    // With a coin the moves appear, and applying one spends it.
    state.players[0].resources.add(Resource::Coin, 1);
    let legal = state.legal_actions();
    let mv = legal
        .iter()
        .find(|a| a.kind == ActionKind::MoveInfluence { from: source, to: 90 })
        .expect("move should be offered with a coin in hand");
    state.apply_action(mv).unwrap();

    assert_eq!(state.players[0].resources.get(Resource::Coin), 0);
    assert_eq!(state.board.influence.get(&source), Some(&vec![1, 0]));
    assert_eq!(state.board.influence.get(&90), Some(&vec![1, 0]));
    assert_eq!(state.metrics.influence_moves, 1);
}

#[test]
fn move_influence_is_unconditional_without_order_expansion() {
    let mut state = GameState::new(42, ExpansionsConfig::default(), 2);
    let source = *state.board.tiles.keys().next().unwrap();
    state.board.place_tile(90, TileType::City, GridCoord::new(1, 0), 2);
    state.board.influence.insert(source, vec![1, 0]);

    let legal = state.legal_actions();
    assert!(legal
        .iter()
        .any(|a| a.kind == ActionKind::MoveInfluence { from: source, to: 90 }));
}

#[test]
fn destinations_include_unclaimed_tiles() {
    // Influence can be projected onto tiles the mover has no stake in.
    let mut state = GameState::new(6, ExpansionsConfig::default(), 2);
    let source = *state.board.tiles.keys().next().unwrap();
    state.board.place_tile(90, TileType::City, GridCoord::new(1, 0), 2);
    state.board.place_tile(91, TileType::City, GridCoord::new(2, 0), 2);
    state.board.influence.insert(source, vec![1, 0]);

    let destinations: Vec<TileId> = state
        .legal_actions()
        .iter()
        .filter_map(|a| match a.kind {
            ActionKind::MoveInfluence { from, to } if from == source => Some(to),
            _ => None,
        })
        .collect();
    assert_eq!(destinations, vec![90, 91]);
}

#[test]
fn conversion_is_gated_on_economy_and_labor() {
    let expansions = ExpansionsConfig {
        economy: true,
        order: false,
    };
    let mut state = GameState::new(13, expansions, 2);

    // No labor: no conversion offered.
    assert!(!state
        .legal_actions()
        .iter()
        .any(|a| matches!(a.kind, ActionKind::ConvertResources { .. })));

    state.players[0].resources.add(Resource::Labor, 2);
    let legal = state.legal_actions();
    let convert = legal
        .iter()
        .find(|a| matches!(a.kind, ActionKind::ConvertResources { .. }))
        .expect("conversion should be offered with labor in hand");
    state.apply_action(convert).unwrap();

    assert_eq!(state.players[0].resources.get(Resource::Labor), 1);
    assert_eq!(state.players[0].resources.get(Resource::Coin), 1);
    assert_eq!(state.metrics.conversions, 1);
}

#[test]
fn economy_round_end_pays_controlled_work_tiles() {
    let expansions = ExpansionsConfig {
        economy: true,
        order: false,
    };
    let mut state = GameState::new(8, expansions, 2);
    state.board.place_tile(70, TileType::Work, GridCoord::new(1, 0), 2);
    state.board.influence.insert(70, vec![1, 0]);

    // Formalize so player 0 takes the Work tile, then end the round.
    let formalize = state
        .legal_actions()
        .into_iter()
        .find(|a| a.kind == ActionKind::FormalizeInfluence)
        .unwrap();
    state.apply_action(&formalize).unwrap();
    assert_eq!(state.board.control.get(&70), Some(&Some(0)));

    let ruleset = RuleSet::from_config(expansions);
    ruleset.on_round_end(&mut state);
    assert_eq!(state.players[0].resources.get(Resource::Labor), 1);
    assert_eq!(state.players[1].resources.get(Resource::Labor), 0);
    ruleset.on_round_end(&mut state);
    assert_eq!(state.players[0].resources.get(Resource::Labor), 2);
}

#[test]
fn full_run_scores_and_picks_lowest_index_winner() {
    let mut state = GameState::new(123, ExpansionsConfig::default(), 3);
    run_rounds(&mut state, 5, turn_indexed);

    let scores = state.score();
    assert_eq!(scores.len(), 3);
    let w = winner(&scores);
    let best = *scores.iter().max().unwrap();
    assert_eq!(scores[w as usize], best);
    for (i, s) in scores.iter().enumerate() {
        if *s == best {
            assert!(w as usize <= i);
        }
    }
}
