// ═══════════════════════════════════════════════════════════════════════
// Mission execution: turns the highest-priority missions into engine
// commands. A mission that produced a command this turn is consumed;
// one that could not (no gold, no free army) stays in the book for the
// next pass to retry.
// ═══════════════════════════════════════════════════════════════════════

use crate::mission::{DefenseObjective, MissionKind, MissionList};
use march_engine::actions::{GameAction, FORTIFY_STAGE_COST};
use march_engine::types::{ArmyPosition, Faction, GameState, RoadId, StageId};
use tracing::debug;

/// Issue up to `max_commands` commands for `faction`, best missions
/// first. Consumed missions are removed from the book.
pub fn execute_missions(
    state: &GameState,
    faction: Faction,
    missions: &mut MissionList,
    max_commands: usize,
) -> Vec<GameAction> {
    let ranked: Vec<(u32, MissionKind)> = missions
        .by_priority()
        .into_iter()
        .filter(|m| m.faction == faction)
        .map(|m| (m.id, m.kind))
        .collect();

    let mut commands = Vec::new();
    let mut consumed = Vec::new();

    for (id, kind) in ranked {
        if commands.len() >= max_commands {
            break;
        }
        let MissionKind::RoadDefense {
            road,
            stage,
            objective,
        } = kind;
        let command = match objective {
            DefenseObjective::Fortify => plan_fortify(state, faction, road, stage),
            DefenseObjective::Garrison => plan_garrison(state, faction, road),
        };
        if let Some(action) = command {
            debug!(%faction, mission = id, ?action, "mission issued a command");
            commands.push(action);
            consumed.push(id);
        }
    }

    for id in consumed {
        missions.remove(id);
    }
    commands
}

fn plan_fortify(
    state: &GameState,
    faction: Faction,
    road: RoadId,
    stage: StageId,
) -> Option<GameAction> {
    if state.faction(faction).gold < FORTIFY_STAGE_COST {
        return None;
    }
    Some(GameAction::FortifyStage { road, stage })
}

/// Two-step garrison: an army already marching the road digs in where
/// it stands; otherwise a stationed army at an endpoint starts the
/// march and digs in on a later pass.
fn plan_garrison(state: &GameState, faction: Faction, road_id: RoadId) -> Option<GameAction> {
    let road = state.try_road(road_id)?;

    if let Some(army) = state.armies.iter().find(|a| {
        a.faction == faction
            && !a.garrisoned
            && matches!(a.position, ArmyPosition::OnRoad { road: r, .. } if r == road_id)
    }) {
        return Some(GameAction::Garrison { army: army.id });
    }

    let army = state.armies.iter().find(|a| {
        a.faction == faction
            && !a.garrisoned
            && matches!(a.position, ArmyPosition::At(loc) if road.touches(loc))
    })?;
    let here = match army.position {
        ArmyPosition::At(loc) => loc,
        ArmyPosition::OnRoad { .. } => return None,
    };
    let destination = if here == road.from { road.to } else { road.from };
    Some(GameAction::MoveArmy {
        army: army.id,
        destination,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use march_engine::map;
    use march_engine::rules::MapVariant;
    use march_engine::setup::create_initial_state;
    use march_engine::types::*;

    fn fortify_mission(book: &mut MissionList, road: RoadId, stage: StageId, priority: f32) {
        book.upsert_road_defense(
            Faction::Corvayne,
            road,
            stage,
            DefenseObjective::Fortify,
            priority,
            1,
        );
    }

    #[test]
    fn test_fortify_mission_becomes_a_command_and_is_consumed() {
        let state = create_initial_state(MapVariant::Greymarch);
        let mut book = MissionList::new();
        fortify_mission(&mut book, map::CAUSEWAY, map::REED_CROSSING, 60.0);

        let commands = execute_missions(&state, Faction::Corvayne, &mut book, 3);

        assert_eq!(
            commands,
            vec![GameAction::FortifyStage {
                road: map::CAUSEWAY,
                stage: map::REED_CROSSING,
            }]
        );
        assert!(book.is_empty());
    }

    #[test]
    fn test_broke_faction_keeps_the_mission_for_later() {
        let mut state = create_initial_state(MapVariant::Greymarch);
        state.faction_mut(Faction::Corvayne).gold = 0;
        let mut book = MissionList::new();
        fortify_mission(&mut book, map::CAUSEWAY, map::REED_CROSSING, 60.0);

        let commands = execute_missions(&state, Faction::Corvayne, &mut book, 3);

        assert!(commands.is_empty());
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_garrison_mission_marches_a_stationed_army_onto_the_road() {
        let state = create_initial_state(MapVariant::Greymarch);
        let mut book = MissionList::new();
        book.upsert_road_defense(
            Faction::Corvayne,
            map::BRIDGE_ROAD,
            map::OLD_BRIDGE,
            DefenseObjective::Garrison,
            80.0,
            1,
        );

        let commands = execute_missions(&state, Faction::Corvayne, &mut book, 3);

        // The Ravenford field army is the one standing on an endpoint.
        assert_eq!(
            commands,
            vec![GameAction::MoveArmy {
                army: ArmyId(1),
                destination: map::STONEBRIDGE,
            }]
        );
        assert!(book.is_empty());
    }

    #[test]
    fn test_garrison_mission_digs_in_an_army_already_marching() {
        let mut state = create_initial_state(MapVariant::Greymarch);
        state.armies.push(Army {
            id: ArmyId(99),
            faction: Faction::Corvayne,
            strength: 300,
            position: ArmyPosition::OnRoad {
                road: map::BRIDGE_ROAD,
                direction: TravelDirection::Forward,
                destination: Some(map::STONEBRIDGE),
                turns_until_arrival: 1,
            },
            garrisoned: false,
        });
        let mut book = MissionList::new();
        book.upsert_road_defense(
            Faction::Corvayne,
            map::BRIDGE_ROAD,
            map::OLD_BRIDGE,
            DefenseObjective::Garrison,
            80.0,
            1,
        );

        let commands = execute_missions(&state, Faction::Corvayne, &mut book, 3);

        assert_eq!(commands, vec![GameAction::Garrison { army: ArmyId(99) }]);
        assert!(book.is_empty());
    }

    #[test]
    fn test_command_cap_takes_the_best_mission_and_keeps_the_rest() {
        let state = create_initial_state(MapVariant::Greymarch);
        let mut book = MissionList::new();
        fortify_mission(&mut book, map::THE_KINGSWAY, map::KINGSWAY_MILE, 40.0);
        fortify_mission(&mut book, map::CAUSEWAY, map::REED_CROSSING, 60.0);

        let commands = execute_missions(&state, Faction::Corvayne, &mut book, 1);

        assert_eq!(
            commands,
            vec![GameAction::FortifyStage {
                road: map::CAUSEWAY,
                stage: map::REED_CROSSING,
            }]
        );
        assert_eq!(book.len(), 1);
        assert!(book.road_defense_for(map::KINGSWAY_MILE).is_some());
    }

    #[test]
    fn test_missions_for_other_factions_are_left_alone() {
        let state = create_initial_state(MapVariant::Greymarch);
        let mut book = MissionList::new();
        book.upsert_road_defense(
            Faction::Drakmar,
            map::ASH_ROAD,
            map::CINDER_GATE,
            DefenseObjective::Fortify,
            80.0,
            1,
        );

        let commands = execute_missions(&state, Faction::Corvayne, &mut book, 3);

        assert!(commands.is_empty());
        assert_eq!(book.len(), 1);
    }
}
