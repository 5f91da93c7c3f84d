// ═══════════════════════════════════════════════════════════════════════
// Turn step: transit, arrivals, convoys, economy, taxes, upkeep.
// Pure like the action engine: snapshot in, fresh snapshot out.
// ═══════════════════════════════════════════════════════════════════════

use crate::combat;
use crate::policy;
use crate::rules::MapRules;
use crate::strength;
use crate::types::*;
use tracing::{debug, warn};

/// Advance the world by one turn.
pub fn advance_turn(state: &GameState, rules: &dyn MapRules) -> GameState {
    let mut next = state.clone();
    next.turn += 1;

    advance_armies(&mut next);
    advance_convoys(&mut next);
    apply_economy(&mut next, rules);
    collect_taxes(&mut next);
    pay_policy_upkeep(&mut next);

    next
}

// ── Army transit ───────────────────────────────────────────────────────

fn advance_armies(next: &mut GameState) {
    let mut arrivals: Vec<(ArmyId, LocationId)> = Vec::new();

    for i in 0..next.armies.len() {
        if next.armies[i].garrisoned {
            continue;
        }
        let (destination, arrived) = match &mut next.armies[i].position {
            ArmyPosition::OnRoad {
                destination,
                turns_until_arrival,
                ..
            } => {
                *turns_until_arrival = turns_until_arrival.saturating_sub(1);
                (*destination, *turns_until_arrival == 0)
            }
            ArmyPosition::At(_) => continue,
        };
        if arrived {
            match destination {
                Some(dest) => arrivals.push((next.armies[i].id, dest)),
                None => warn!(
                    army = next.armies[i].id.0,
                    "marching army has no destination; it holds its stage"
                ),
            }
        }
    }

    for (army, dest) in arrivals {
        resolve_arrival(next, army, dest);
    }
    cull_destroyed(next);
}

fn resolve_arrival(next: &mut GameState, army_id: ArmyId, dest: LocationId) {
    let attacker = match next.army(army_id) {
        Some(a) => a.clone(),
        None => return,
    };
    let owner = next.location(dest).owner;

    if owner == Some(attacker.faction) {
        station(next, army_id, dest);
        return;
    }

    let defense = combat::defense_at(next, dest);
    if defense <= 0.0 {
        station(next, army_id, dest);
        next.location_mut(dest).owner = Some(attacker.faction);
        debug!(army = army_id.0, location = dest.0, faction = %attacker.faction,
            "undefended location taken");
        return;
    }

    let attack = strength::effective_strength(&attacker, &next.characters);
    let outcome = combat::resolve_assault(attack, defense);
    debug!(army = army_id.0, location = dest.0, attack, defense,
        attacker_won = outcome.attacker_won, "assault resolved");

    if let Some(a) = next.army_mut(army_id) {
        a.strength = scale_down(a.strength, outcome.attacker_casualties);
    }

    if outcome.attacker_won {
        for a in &mut next.armies {
            if a.faction != attacker.faction && a.stationed_at() == Some(dest) {
                a.strength = scale_down(a.strength, outcome.defender_casualties);
            }
        }
        let loc = next.location_mut(dest);
        loc.garrison = scale_down(loc.garrison, outcome.defender_casualties);
        loc.owner = Some(attacker.faction);
        station(next, army_id, dest);
    } else {
        // The defense holds but bleeds for it. The wiped attacker is
        // left in place, so the cull releases its leaders at the gate.
        for a in &mut next.armies {
            if a.faction != attacker.faction && a.stationed_at() == Some(dest) {
                a.strength = scale_down(a.strength, outcome.defender_casualties);
            }
        }
        let loc = next.location_mut(dest);
        loc.garrison = scale_down(loc.garrison, outcome.defender_casualties);
    }
}

fn station(next: &mut GameState, army_id: ArmyId, dest: LocationId) {
    if let Some(a) = next.army_mut(army_id) {
        a.position = ArmyPosition::At(dest);
    }
}

fn scale_down(value: u32, casualties: f32) -> u32 {
    (value as f32 * (1.0 - casualties.clamp(0.0, 1.0))) as u32
}

/// Remove armies ground down to nothing and let their leaders step off
/// at the battle site.
fn cull_destroyed(next: &mut GameState) {
    let dead: Vec<(ArmyId, LocationId)> = next
        .armies
        .iter()
        .filter(|a| a.strength == 0)
        .map(|a| {
            let site = match a.position {
                ArmyPosition::At(loc) => loc,
                ArmyPosition::OnRoad {
                    destination: Some(dest),
                    ..
                } => dest,
                ArmyPosition::OnRoad {
                    road, direction, ..
                } => next.roads[road.0 as usize].endpoint_toward(direction),
            };
            (a.id, site)
        })
        .collect();

    for (army, site) in &dead {
        debug!(army = army.0, "army destroyed");
        for ch in &mut next.characters {
            if ch.army == Some(*army) {
                ch.army = None;
                ch.location = *site;
            }
        }
    }
    next.armies.retain(|a| a.strength > 0);
}

// ── Convoys ────────────────────────────────────────────────────────────

fn advance_convoys(next: &mut GameState) {
    let mut delivered: Vec<(ConvoyId, LocationId, u32)> = Vec::new();

    for i in 0..next.convoys.len() {
        let remaining = next.convoys[i].turns_until_arrival.saturating_sub(1);
        next.convoys[i].turns_until_arrival = remaining;
        if remaining == 0 {
            let road = &next.roads[next.convoys[i].road.0 as usize];
            let dest = road.endpoint_toward(next.convoys[i].direction);
            delivered.push((next.convoys[i].id, dest, next.convoys[i].food));
        }
    }

    for (convoy, dest, food) in delivered {
        next.location_mut(dest).food += food as i32;
        debug!(convoy = convoy.0, location = dest.0, food, "convoy delivered");
    }
    next.convoys.retain(|c| c.turns_until_arrival > 0);
}

// ── Economy ────────────────────────────────────────────────────────────

fn apply_economy(next: &mut GameState, rules: &dyn MapRules) {
    let rebuilt = rules.calculate_economy(next);
    if rebuilt.len() == next.locations.len() {
        next.locations = rebuilt;
    } else {
        warn!(
            expected = next.locations.len(),
            got = rebuilt.len(),
            "economy pass returned a malformed location set; keeping the old one"
        );
    }
}

fn collect_taxes(next: &mut GameState) {
    for i in 0..next.locations.len() {
        if let Some(owner) = next.locations[i].owner {
            let income = next.locations[i].tax_yield();
            if income > 0 {
                next.faction_mut(owner).gold += income;
            }
        }
    }
}

fn pay_policy_upkeep(next: &mut GameState) {
    for i in 0..next.locations.len() {
        let owner = match next.locations[i].owner {
            Some(o) => o,
            None => continue,
        };
        let due: i64 = next.locations[i]
            .policies
            .iter()
            .map(|p| policy::upkeep(*p))
            .sum();
        if due > 0 {
            next.faction_mut(owner).gold -= due;
        }
    }
}
