// ═══════════════════════════════════════════════════════════════════════
// Campaign driver: runs the plan-and-execute loop for every AI-held
// faction, then advances the turn. The engine stays authoritative: a
// command the engine rejects is counted and dropped, never forced
// through.
// ═══════════════════════════════════════════════════════════════════════

use march_engine::actions::apply;
use march_engine::rules::{rules_for, MapVariant};
use march_engine::setup::create_initial_state;
use march_engine::turn::advance_turn;
use march_engine::types::{Faction, GameState};
use march_planner::{execute_missions, plan_road_defense, MissionList, PlannerConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use tracing::warn;

/// How many commands each faction may issue per turn.
const COMMANDS_PER_FACTION: usize = 3;

pub struct CampaignResult {
    pub state: GameState,
    pub commands_issued: u32,
    pub commands_rejected: u32,
}

pub fn run_campaign(variant: MapVariant, turns: u32, seed: u64) -> CampaignResult {
    let rules = rules_for(variant);
    let mut state = create_initial_state(variant);
    let cfg = PlannerConfig::default();

    let mut books: HashMap<Faction, MissionList> = HashMap::new();
    let mut rngs: HashMap<Faction, ChaCha8Rng> = HashMap::new();
    for (i, &faction) in Faction::ALL.iter().enumerate() {
        books.insert(faction, MissionList::new());
        rngs.insert(faction, ChaCha8Rng::seed_from_u64(seed.wrapping_add(i as u64)));
    }

    let mut commands_issued = 0u32;
    let mut commands_rejected = 0u32;

    for _ in 0..turns {
        for &faction in &Faction::ALL {
            if !state.faction(faction).ai_controlled {
                continue;
            }
            let book = books.get_mut(&faction).unwrap();
            let rng = rngs.get_mut(&faction).unwrap();

            plan_road_defense(&state, faction, state.turn, book, &cfg, rng);
            let commands = execute_missions(&state, faction, book, COMMANDS_PER_FACTION);

            for action in &commands {
                match apply(&state, faction, action) {
                    Ok(next) => {
                        state = next;
                        commands_issued += 1;
                    }
                    Err(e) => {
                        warn!(%faction, ?action, error = %e, "engine rejected a planned command");
                        commands_rejected += 1;
                    }
                }
            }
        }
        state = advance_turn(&state, rules.as_ref());
    }

    CampaignResult {
        state,
        commands_issued,
        commands_rejected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_campaign_advances_the_requested_number_of_turns() {
        let result = run_campaign(MapVariant::Greymarch, 5, 42);
        assert_eq!(result.state.turn, 5);
    }

    #[test]
    fn test_same_seed_same_campaign() {
        let a = run_campaign(MapVariant::Greymarch, 10, 42);
        let b = run_campaign(MapVariant::Greymarch, 10, 42);
        assert_eq!(a.state, b.state);
        assert_eq!(a.commands_issued, b.commands_issued);
    }
}
