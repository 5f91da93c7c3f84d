// ═══════════════════════════════════════════════════════════════════════
// Campaign setup: builds the opening state for a map variant.
// ═══════════════════════════════════════════════════════════════════════

use crate::map::{self, LOCATIONS, ROADS};
use crate::rules::{rules_for, MapVariant};
use crate::types::*;
use std::collections::HashMap;

struct FactionSetup {
    faction: Faction,
    home: LocationId,
    holdings: &'static [LocationId],
    treasury: i64,
    ai_controlled: bool,
}

const SETUPS: [FactionSetup; 4] = [
    FactionSetup {
        faction: Faction::Corvayne,
        home: map::WESTHOLD,
        holdings: &[map::WESTHOLD, map::RAVENFORD, map::DUNMERE],
        treasury: 500,
        ai_controlled: false,
    },
    FactionSetup {
        faction: Faction::Drakmar,
        home: map::KHARGAN_HOLD,
        holdings: &[map::CINDERWATCH, map::KHARGAN_HOLD, map::VELST],
        treasury: 500,
        ai_controlled: true,
    },
    FactionSetup {
        faction: Faction::Ilvress,
        home: map::PORT_MYRREN,
        holdings: &[map::PORT_MYRREN, map::GILDMARKET],
        treasury: 600,
        ai_controlled: true,
    },
    FactionSetup {
        faction: Faction::Thornwood,
        home: map::THORNHALL,
        holdings: &[map::THORNHALL],
        treasury: 450,
        ai_controlled: true,
    },
];

/// Opening garrison strengths. Stonebridge, Harrow Cross and Wyrmgate
/// start neutral but not undefended.
fn initial_garrison(loc: LocationId) -> u32 {
    match loc {
        map::WESTHOLD => 800,
        map::RAVENFORD => 250,
        map::DUNMERE => 200,
        map::STONEBRIDGE => 350,
        map::HARROW_CROSS => 300,
        map::CINDERWATCH => 300,
        map::KHARGAN_HOLD => 800,
        map::VELST => 200,
        map::PORT_MYRREN => 600,
        map::GILDMARKET => 300,
        map::THORNHALL => 600,
        map::WYRMGATE => 400,
        _ => 0,
    }
}

fn owner_at_start(loc: LocationId) -> Option<Faction> {
    SETUPS
        .iter()
        .find(|s| s.holdings.contains(&loc))
        .map(|s| s.faction)
}

fn field_army(id: u32, faction: Faction, strength: u32, at: LocationId) -> Army {
    Army {
        id: ArmyId(id),
        faction,
        strength,
        position: ArmyPosition::At(at),
        garrisoned: false,
    }
}

/// A standing road garrison. Wardens hold their stage indefinitely and
/// carry no march bookkeeping until someone orders them off the road.
fn warden(
    id: u32,
    faction: Faction,
    strength: u32,
    road: RoadId,
    direction: TravelDirection,
    turns_until_arrival: u8,
) -> Army {
    Army {
        id: ArmyId(id),
        faction,
        strength,
        position: ArmyPosition::OnRoad {
            road,
            direction,
            destination: None,
            turns_until_arrival,
        },
        garrisoned: true,
    }
}

/// Build the opening campaign state for a variant.
pub fn create_initial_state(variant: MapVariant) -> GameState {
    let rules = rules_for(variant);

    let locations: Vec<Location> = LOCATIONS
        .iter()
        .map(|def| Location {
            id: def.id,
            owner: owner_at_start(def.id),
            garrison: initial_garrison(def.id),
            fortification: 0,
            population: def.population,
            prosperity: def.prosperity,
            food: def.food,
            unrest: 5,
            tax_rate: 10,
            policies: Vec::new(),
        })
        .collect();

    let roads: Vec<Road> = ROADS
        .iter()
        .map(|def| Road {
            id: def.id,
            from: def.from,
            to: def.to,
            stages: def
                .stages
                .iter()
                .map(|s| RoadStage {
                    id: s.id,
                    fortification: 0,
                })
                .collect(),
        })
        .collect();

    let armies = vec![
        field_army(0, Faction::Corvayne, 600, map::WESTHOLD),
        field_army(1, Faction::Corvayne, 400, map::RAVENFORD),
        field_army(2, Faction::Drakmar, 650, map::KHARGAN_HOLD),
        field_army(3, Faction::Drakmar, 450, map::CINDERWATCH),
        field_army(4, Faction::Ilvress, 350, map::PORT_MYRREN),
        field_army(5, Faction::Ilvress, 300, map::GILDMARKET),
        field_army(6, Faction::Thornwood, 500, map::THORNHALL),
        field_army(7, Faction::Thornwood, 250, map::THORNHALL),
        // Corvayne holds the Old Bridge, Drakmar the Cinder Gate.
        warden(8, Faction::Corvayne, 300, map::BRIDGE_ROAD, TravelDirection::Forward, 1),
        warden(9, Faction::Drakmar, 300, map::ASH_ROAD, TravelDirection::Reverse, 2),
    ];
    let next_army_id = armies.len() as u32;

    let characters = rules.initial_characters();

    let factions: HashMap<Faction, FactionState> = SETUPS
        .iter()
        .map(|s| {
            let relations = Faction::ALL
                .iter()
                .filter(|f| **f != s.faction)
                .map(|f| (*f, 0))
                .collect();
            (
                s.faction,
                FactionState {
                    faction: s.faction,
                    gold: s.treasury,
                    home: s.home,
                    ai_controlled: s.ai_controlled,
                    relations,
                },
            )
        })
        .collect();

    GameState {
        turn: 0,
        locations,
        roads,
        armies,
        characters,
        convoys: Vec::new(),
        factions,
        next_army_id,
        next_convoy_id: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_covers_the_whole_map() {
        let state = create_initial_state(MapVariant::Greymarch);
        assert_eq!(state.locations.len(), map::NUM_LOCATIONS);
        assert_eq!(state.roads.len(), map::NUM_ROADS);
        for (i, loc) in state.locations.iter().enumerate() {
            assert_eq!(loc.id.0 as usize, i);
        }
        for (i, road) in state.roads.iter().enumerate() {
            assert_eq!(road.id.0 as usize, i);
        }
    }

    #[test]
    fn test_neutral_center_stays_unclaimed() {
        let state = create_initial_state(MapVariant::Greymarch);
        assert_eq!(state.location(map::STONEBRIDGE).owner, None);
        assert_eq!(state.location(map::HARROW_CROSS).owner, None);
        assert_eq!(state.location(map::WYRMGATE).owner, None);
        assert_eq!(state.location(map::WESTHOLD).owner, Some(Faction::Corvayne));
        assert_eq!(state.location(map::KHARGAN_HOLD).owner, Some(Faction::Drakmar));
    }

    #[test]
    fn test_wardens_hold_their_stages() {
        let state = create_initial_state(MapVariant::Greymarch);
        let bridge_warden = state.army(ArmyId(8)).unwrap();
        assert!(bridge_warden.garrisoned);
        let road = state.road(map::BRIDGE_ROAD);
        let idx = bridge_warden.stage_index_on(road).unwrap();
        assert_eq!(road.stages[idx].id, map::OLD_BRIDGE);

        let gate_warden = state.army(ArmyId(9)).unwrap();
        let road = state.road(map::ASH_ROAD);
        let idx = gate_warden.stage_index_on(road).unwrap();
        assert_eq!(road.stages[idx].id, map::CINDER_GATE);
    }

    #[test]
    fn test_greymarch_seats_its_leaders_and_base_seats_none() {
        let greymarch = create_initial_state(MapVariant::Greymarch);
        assert_eq!(greymarch.characters.len(), 8);
        assert!(greymarch.characters.iter().all(|c| c.army.is_none()));

        let base = create_initial_state(MapVariant::Base);
        assert!(base.characters.is_empty());
    }

    #[test]
    fn test_every_faction_has_a_ledger_and_relations() {
        let state = create_initial_state(MapVariant::Greymarch);
        for f in Faction::ALL {
            let ledger = state.faction(f);
            assert!(ledger.gold > 0);
            assert_eq!(ledger.relations.len(), Faction::ALL.len() - 1);
            assert_eq!(state.location(ledger.home).owner, Some(f));
        }
    }
}
