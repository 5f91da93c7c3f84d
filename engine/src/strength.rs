// ═══════════════════════════════════════════════════════════════════════
// Strength evaluation: the one effective-strength metric shared by
// threat detection, combat odds and the planner.
// ═══════════════════════════════════════════════════════════════════════

use crate::types::{Army, ArmyPosition, Character, Faction, GameState, LocationId, Road};

/// Effective fighting strength of one army: raw strength scaled by the
/// command bonuses of every leader attached to it.
pub fn effective_strength(army: &Army, characters: &[Character]) -> f32 {
    let bonus: f32 = characters
        .iter()
        .filter(|c| c.army == Some(army.id))
        .map(|c| c.command_bonus)
        .sum();
    army.strength as f32 * (1.0 + bonus)
}

/// Combined effective strength of a faction's armies stationed at `loc`.
pub fn faction_strength_at(state: &GameState, loc: LocationId, faction: Faction) -> f32 {
    state
        .armies
        .iter()
        .filter(|a| a.faction == faction && a.stationed_at() == Some(loc))
        .map(|a| effective_strength(a, &state.characters))
        .sum()
}

/// Total effective strength of armies hostile to `faction` that are on
/// `road` or stationed at either of its endpoints.
pub fn hostile_strength_near_road(state: &GameState, road: &Road, faction: Faction) -> f32 {
    state
        .armies
        .iter()
        .filter(|a| a.faction != faction)
        .filter(|a| match a.position {
            ArmyPosition::At(loc) => road.touches(loc),
            ArmyPosition::OnRoad { road: r, .. } => r == road.id,
        })
        .map(|a| effective_strength(a, &state.characters))
        .sum()
}
