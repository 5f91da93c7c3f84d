// ═══════════════════════════════════════════════════════════════════════
// Road-defense planner: walks a faction's target table and keeps its
// mission book current. Naturally defended stages are reactive: they get
// a garrison mission only when real hostile strength shows up nearby.
// Ordinary stages are proactive: empty ground gets a fortify mission
// at the target priority plus a bounded random jitter.
// ═══════════════════════════════════════════════════════════════════════

use crate::mission::{DefenseObjective, MissionList};
use crate::targets::{road_defense_targets, RoadDefenseTarget};
use march_engine::pathfind;
use march_engine::strength;
use march_engine::types::{Faction, GameState, Road};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

/// Tuning knobs. The qualitative policy is fixed; these set where the
/// reactive threshold sits and how wide the fortify jitter band is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannerConfig {
    /// Hostile effective strength near a naturally defended stage that
    /// triggers a garrison mission.
    pub garrison_threat_threshold: f32,
    /// Half-width of the uniform jitter added to fortify priorities.
    pub fortify_priority_jitter: f32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            garrison_threat_threshold: 500.0,
            fortify_priority_jitter: 10.0,
        }
    }
}

/// One planning pass for one faction. Upserts missions into `missions`;
/// never removes them. A malformed or unreachable target is skipped, it
/// never aborts the rest of the pass.
pub fn plan_road_defense(
    state: &GameState,
    faction: Faction,
    turn: u32,
    missions: &mut MissionList,
    cfg: &PlannerConfig,
    rng: &mut ChaCha8Rng,
) {
    let home = state.faction(faction).home;

    for target in road_defense_targets(faction) {
        let road = match state.try_road(target.road) {
            Some(r) => r,
            None => {
                warn!(
                    %faction,
                    road = target.road.0,
                    "defense target names a road that is not on the map; skipping"
                );
                continue;
            }
        };
        if road.stage_index(target.stage).is_none() {
            warn!(
                %faction,
                stage = target.stage.0,
                road = target.road.0,
                "defense target names a stage its road does not have; skipping"
            );
            continue;
        }

        // A stage we cannot reach through friendly ground is not ours to
        // plan for this turn.
        let reachable = pathfind::find_safe_path(home, road.from, state, faction).is_some()
            || pathfind::find_safe_path(home, road.to, state, faction).is_some();
        if !reachable {
            debug!(%faction, road = road.id.0, "no safe route to road; skipping target");
            continue;
        }

        if target.natural_defense {
            let threat = strength::hostile_strength_near_road(state, road, faction);
            if threat >= cfg.garrison_threat_threshold {
                missions.upsert_road_defense(
                    faction,
                    target.road,
                    target.stage,
                    DefenseObjective::Garrison,
                    target.priority,
                    turn,
                );
                debug!(%faction, stage = target.stage.0, threat, "garrison mission upserted");
            }
        } else if stage_unheld(state, road, target) {
            let jitter =
                rng.gen_range(-cfg.fortify_priority_jitter..=cfg.fortify_priority_jitter);
            missions.upsert_road_defense(
                faction,
                target.road,
                target.stage,
                DefenseObjective::Fortify,
                target.priority + jitter,
                turn,
            );
            debug!(%faction, stage = target.stage.0, "fortify mission upserted");
        }
    }
}

/// A stage is unheld when nothing stands on it: no works raised and no
/// garrisoned army mapping to that stage.
fn stage_unheld(state: &GameState, road: &Road, target: &RoadDefenseTarget) -> bool {
    let idx = match road.stage_index(target.stage) {
        Some(i) => i,
        None => return false,
    };
    if road.stages[idx].fortification > 0 {
        return false;
    }
    let held = state
        .armies
        .iter()
        .any(|a| a.garrisoned && a.stage_index_on(road) == Some(idx));
    !held
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mission::MissionKind;
    use march_engine::map;
    use march_engine::rules::MapVariant;
    use march_engine::setup::create_initial_state;
    use march_engine::types::*;
    use rand::SeedableRng;

    fn planning_rig() -> (GameState, MissionList, PlannerConfig, ChaCha8Rng) {
        (
            create_initial_state(MapVariant::Greymarch),
            MissionList::new(),
            PlannerConfig::default(),
            ChaCha8Rng::seed_from_u64(7),
        )
    }

    fn hostile_army(id: u32, faction: Faction, strength: u32, at: LocationId) -> Army {
        Army {
            id: ArmyId(id),
            faction,
            strength,
            position: ArmyPosition::At(at),
            garrisoned: false,
        }
    }

    fn objective_for(book: &MissionList, stage: StageId) -> Option<DefenseObjective> {
        book.road_defense_for(stage).map(|m| {
            let MissionKind::RoadDefense { objective, .. } = m.kind;
            objective
        })
    }

    #[test]
    fn test_quiet_natural_stage_gets_no_mission() {
        let (state, mut book, cfg, mut rng) = planning_rig();
        plan_road_defense(&state, Faction::Corvayne, 1, &mut book, &cfg, &mut rng);
        assert!(book.road_defense_for(map::OLD_BRIDGE).is_none());
    }

    #[test]
    fn test_threat_at_threshold_triggers_garrison_mission() {
        let (mut state, mut book, cfg, mut rng) = planning_rig();
        state
            .armies
            .push(hostile_army(99, Faction::Drakmar, 500, map::STONEBRIDGE));

        plan_road_defense(&state, Faction::Corvayne, 1, &mut book, &cfg, &mut rng);

        let mission = book.road_defense_for(map::OLD_BRIDGE).expect("garrison mission");
        assert_eq!(
            objective_for(&book, map::OLD_BRIDGE),
            Some(DefenseObjective::Garrison)
        );
        assert_eq!(mission.priority, 80.0);
        assert_eq!(mission.faction, Faction::Corvayne);
    }

    #[test]
    fn test_threat_below_threshold_stays_quiet() {
        let (mut state, mut book, cfg, mut rng) = planning_rig();
        state
            .armies
            .push(hostile_army(99, Faction::Drakmar, 400, map::STONEBRIDGE));

        plan_road_defense(&state, Faction::Corvayne, 1, &mut book, &cfg, &mut rng);
        assert!(book.road_defense_for(map::OLD_BRIDGE).is_none());
    }

    #[test]
    fn test_leader_bonus_counts_toward_the_threat() {
        let (mut state, mut book, cfg, mut rng) = planning_rig();
        state
            .armies
            .push(hostile_army(99, Faction::Drakmar, 450, map::STONEBRIDGE));
        state.characters.push(Character {
            id: CharacterId(99),
            name: "Bannerless Captain".to_string(),
            faction: Faction::Drakmar,
            location: map::STONEBRIDGE,
            army: Some(ArmyId(99)),
            command_bonus: 0.2,
            valor: 5,
            cunning: 5,
        });

        // 450 * 1.2 = 540 effective, over the 500 threshold.
        plan_road_defense(&state, Faction::Corvayne, 1, &mut book, &cfg, &mut rng);
        assert!(book.road_defense_for(map::OLD_BRIDGE).is_some());
    }

    #[test]
    fn test_empty_ordinary_stage_gets_one_fortify_mission_within_the_band() {
        let (state, mut book, cfg, mut rng) = planning_rig();
        plan_road_defense(&state, Faction::Corvayne, 1, &mut book, &cfg, &mut rng);

        let mission = book.road_defense_for(map::REED_CROSSING).expect("fortify mission");
        assert_eq!(
            objective_for(&book, map::REED_CROSSING),
            Some(DefenseObjective::Fortify)
        );
        assert!(mission.priority >= 50.0 && mission.priority <= 70.0);

        let count = book
            .missions
            .iter()
            .filter(|m| matches!(m.kind, MissionKind::RoadDefense { stage, .. } if stage == map::REED_CROSSING))
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_replanning_updates_missions_instead_of_duplicating() {
        let (state, mut book, cfg, mut rng) = planning_rig();
        plan_road_defense(&state, Faction::Corvayne, 1, &mut book, &cfg, &mut rng);
        let before = book.len();
        let id_before = book.road_defense_for(map::REED_CROSSING).unwrap().id;

        plan_road_defense(&state, Faction::Corvayne, 2, &mut book, &cfg, &mut rng);

        assert_eq!(book.len(), before);
        let mission = book.road_defense_for(map::REED_CROSSING).unwrap();
        assert_eq!(mission.id, id_before);
        assert_eq!(mission.turn_updated, 2);
    }

    #[test]
    fn test_garrisoned_stage_is_not_refortified() {
        let (mut state, mut book, cfg, mut rng) = planning_rig();
        // Stand a dug-in army on Reed Crossing: forward on the Causeway
        // with one turn left maps to the second stage.
        state.armies.push(Army {
            id: ArmyId(99),
            faction: Faction::Corvayne,
            strength: 200,
            position: ArmyPosition::OnRoad {
                road: map::CAUSEWAY,
                direction: TravelDirection::Forward,
                destination: None,
                turns_until_arrival: 1,
            },
            garrisoned: true,
        });

        plan_road_defense(&state, Faction::Corvayne, 1, &mut book, &cfg, &mut rng);
        assert!(book.road_defense_for(map::REED_CROSSING).is_none());
    }

    #[test]
    fn test_fortified_stage_is_not_refortified() {
        let (mut state, mut book, cfg, mut rng) = planning_rig();
        let road = &mut state.roads[map::CAUSEWAY.0 as usize];
        let idx = road.stage_index(map::REED_CROSSING).unwrap();
        road.stages[idx].fortification = 1;

        plan_road_defense(&state, Faction::Corvayne, 1, &mut book, &cfg, &mut rng);
        assert!(book.road_defense_for(map::REED_CROSSING).is_none());
    }

    #[test]
    fn test_a_target_with_no_road_skips_without_aborting_the_pass() {
        let (mut state, mut book, cfg, mut rng) = planning_rig();
        // Strip the map down to the Kingsway alone; the other two
        // Corvayne targets now point at roads that do not exist.
        state.roads.truncate(1);

        plan_road_defense(&state, Faction::Corvayne, 1, &mut book, &cfg, &mut rng);

        assert_eq!(book.len(), 1);
        assert!(book.road_defense_for(map::KINGSWAY_MILE).is_some());
    }

    #[test]
    fn test_unreachable_targets_are_not_planned() {
        let (mut state, mut book, cfg, mut rng) = planning_rig();
        // Exile the Corvayne court to Port Myrren: every road out runs
        // through Ilvress ground, so no target has a safe route.
        state.faction_mut(Faction::Corvayne).home = map::PORT_MYRREN;
        state
            .armies
            .push(hostile_army(99, Faction::Drakmar, 600, map::STONEBRIDGE));

        plan_road_defense(&state, Faction::Corvayne, 1, &mut book, &cfg, &mut rng);
        assert!(book.is_empty());
    }
}
