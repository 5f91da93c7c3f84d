// ═══════════════════════════════════════════════════════════════════════
// Action engine: the only mutation path into campaign state.
// Every handler validates against the input snapshot first and commits
// onto a clone, so a rejected command leaves the caller's state exactly
// as it was. Validation order: existence, then ownership, then the
// action's own preconditions.
// ═══════════════════════════════════════════════════════════════════════

use crate::policy;
use crate::types::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

// ── Costs and caps ─────────────────────────────────────────────────────

pub const MAX_TAX_RATE: u8 = 25;
pub const MAX_FORTIFICATION: u8 = 5;
pub const MAX_STAGE_FORT: u8 = 3;
pub const RECRUIT_COST_PER_MAN: i64 = 3;
pub const GARRISON_COST_PER_MAN: i64 = 2;
pub const FORT_COST_PER_LEVEL: i64 = 60;
pub const FORTIFY_STAGE_COST: i64 = 30;
pub const INCITE_COST: i64 = 60;
pub const INCITE_UNREST: u8 = 20;
pub const REQUISITION_UNREST: u8 = 10;
pub const NEGOTIATE_BASE_GOODWILL: i32 = 5;

// ── Errors ─────────────────────────────────────────────────────────────

/// Why a command was rejected. The Display text is what gets surfaced to
/// the issuing player.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("not owner: {0}")]
    NotOwner(String),
    #[error("invalid precondition: {0}")]
    InvalidPrecondition(String),
}

pub type ActionResult = Result<GameState, ActionError>;

// ── Commands ───────────────────────────────────────────────────────────

/// Everything a faction can order the engine to do. Exactly one handler
/// exists per variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameAction {
    MoveArmy { army: ArmyId, destination: LocationId },
    Garrison { army: ArmyId },
    RecruitArmy { location: LocationId, strength: u32 },
    MergeArmies { from: ArmyId, into: ArmyId },
    Requisition { location: LocationId, resource: ResourceKind },
    SetTaxRate { location: LocationId, rate: u8 },
    ManageCity { location: LocationId, update: CityUpdate },
    FortifyStage { road: RoadId, stage: StageId },
    InciteUnrest { location: LocationId },
    Negotiate { with: Faction, tribute: u32 },
    AttachLeader { character: CharacterId, army: ArmyId },
    DetachLeader { character: CharacterId },
    MoveLeader { character: CharacterId, destination: LocationId },
    ActivateGovernorPolicy { location: LocationId, policy: GovernorPolicy },
    RevokeGovernorPolicy { location: LocationId, policy: GovernorPolicy },
    DispatchConvoy { from: LocationId, to: LocationId, food: u32 },
    ReverseConvoy { convoy: ConvoyId },
}

/// Apply one command for one faction. On success the new snapshot is
/// returned; on failure the input snapshot is still the current state.
pub fn apply(state: &GameState, faction: Faction, action: &GameAction) -> ActionResult {
    let result = match *action {
        GameAction::MoveArmy { army, destination } => move_army(state, faction, army, destination),
        GameAction::Garrison { army } => toggle_garrison(state, faction, army),
        GameAction::RecruitArmy { location, strength } => {
            recruit_army(state, faction, location, strength)
        }
        GameAction::MergeArmies { from, into } => merge_armies(state, faction, from, into),
        GameAction::Requisition { location, resource } => {
            requisition(state, faction, location, resource)
        }
        GameAction::SetTaxRate { location, rate } => set_tax_rate(state, faction, location, rate),
        GameAction::ManageCity { location, ref update } => {
            manage_city(state, faction, location, update)
        }
        GameAction::FortifyStage { road, stage } => fortify_stage(state, faction, road, stage),
        GameAction::InciteUnrest { location } => incite_unrest(state, faction, location),
        GameAction::Negotiate { with, tribute } => negotiate(state, faction, with, tribute),
        GameAction::AttachLeader { character, army } => {
            attach_leader(state, faction, character, army)
        }
        GameAction::DetachLeader { character } => detach_leader(state, faction, character),
        GameAction::MoveLeader { character, destination } => {
            move_leader(state, faction, character, destination)
        }
        GameAction::ActivateGovernorPolicy { location, policy } => {
            activate_policy(state, faction, location, policy)
        }
        GameAction::RevokeGovernorPolicy { location, policy } => {
            revoke_policy(state, faction, location, policy)
        }
        GameAction::DispatchConvoy { from, to, food } => {
            dispatch_convoy(state, faction, from, to, food)
        }
        GameAction::ReverseConvoy { convoy } => reverse_convoy(state, faction, convoy),
    };

    match &result {
        Ok(_) => debug!(%faction, ?action, "action applied"),
        Err(e) => warn!(%faction, ?action, error = %e, "action rejected"),
    }
    result
}

// ── Shared validation ──────────────────────────────────────────────────

fn owned_location(
    state: &GameState,
    id: LocationId,
    faction: Faction,
) -> Result<&Location, ActionError> {
    let loc = state
        .try_location(id)
        .ok_or_else(|| ActionError::NotFound(format!("no such location: {:?}", id)))?;
    if loc.owner != Some(faction) {
        return Err(ActionError::NotOwner(format!(
            "{} does not hold location {:?}",
            faction, id
        )));
    }
    Ok(loc)
}

fn owned_army(state: &GameState, id: ArmyId, faction: Faction) -> Result<&Army, ActionError> {
    let army = state
        .army(id)
        .ok_or_else(|| ActionError::NotFound(format!("no such army: {:?}", id)))?;
    if army.faction != faction {
        return Err(ActionError::NotOwner(format!(
            "army {:?} answers to {}, not {}",
            id, army.faction, faction
        )));
    }
    Ok(army)
}

fn owned_character(
    state: &GameState,
    id: CharacterId,
    faction: Faction,
) -> Result<&Character, ActionError> {
    let ch = state
        .character(id)
        .ok_or_else(|| ActionError::NotFound(format!("no such character: {:?}", id)))?;
    if ch.faction != faction {
        return Err(ActionError::NotOwner(format!(
            "{} serves {}, not {}",
            ch.name, ch.faction, faction
        )));
    }
    Ok(ch)
}

/// The road directly linking `a` and `b`, with the direction of travel
/// from `a`, or an InvalidPrecondition if no road does.
fn connecting_road(
    state: &GameState,
    a: LocationId,
    b: LocationId,
) -> Result<(RoadId, TravelDirection, u8), ActionError> {
    for road in &state.roads {
        if let Some(dir) = road.direction_between(a, b) {
            return Ok((road.id, dir, road.length()));
        }
    }
    Err(ActionError::InvalidPrecondition(format!(
        "no road links {:?} and {:?}",
        a, b
    )))
}

// ── Movement and garrison ──────────────────────────────────────────────

fn move_army(
    state: &GameState,
    faction: Faction,
    army: ArmyId,
    destination: LocationId,
) -> ActionResult {
    let a = owned_army(state, army, faction)?;
    if a.garrisoned {
        return Err(ActionError::InvalidPrecondition(
            "army is dug in; it must leave garrison before marching".into(),
        ));
    }
    let here = match a.stationed_at() {
        Some(loc) => loc,
        None => {
            return Err(ActionError::InvalidPrecondition(
                "army is already on the march".into(),
            ))
        }
    };
    if state.try_location(destination).is_none() {
        return Err(ActionError::NotFound(format!(
            "no such location: {:?}",
            destination
        )));
    }
    if destination == here {
        return Err(ActionError::InvalidPrecondition(
            "army is already at that location".into(),
        ));
    }
    let (road, direction, length) = connecting_road(state, here, destination)?;

    let mut next = state.clone();
    if let Some(army) = next.army_mut(army) {
        army.position = ArmyPosition::OnRoad {
            road,
            direction,
            destination: Some(destination),
            turns_until_arrival: length.max(1),
        };
    }
    Ok(next)
}

fn toggle_garrison(state: &GameState, faction: Faction, army: ArmyId) -> ActionResult {
    let a = owned_army(state, army, faction)?;

    // An army holding a road stage with no march bookkeeping gets its
    // destination restored when it resumes. Direction decides the endpoint.
    let heal = match a.position {
        ArmyPosition::OnRoad {
            road,
            direction,
            destination: None,
            turns_until_arrival,
        } if a.garrisoned => {
            let road = state
                .try_road(road)
                .ok_or_else(|| ActionError::NotFound(format!("no such road: {:?}", road)))?;
            Some((road.endpoint_toward(direction), turns_until_arrival.max(1)))
        }
        _ => None,
    };

    let mut next = state.clone();
    if let Some(army) = next.army_mut(army) {
        if army.garrisoned {
            army.garrisoned = false;
            if let Some((dest, turns)) = heal {
                if let ArmyPosition::OnRoad {
                    destination,
                    turns_until_arrival,
                    ..
                } = &mut army.position
                {
                    *destination = Some(dest);
                    *turns_until_arrival = turns;
                }
            }
        } else {
            // Entering garrison freezes the march as it stands.
            army.garrisoned = true;
        }
    }
    Ok(next)
}

// ── Raising and merging armies ─────────────────────────────────────────

fn recruit_army(
    state: &GameState,
    faction: Faction,
    location: LocationId,
    strength: u32,
) -> ActionResult {
    let loc = owned_location(state, location, faction)?;
    if strength == 0 {
        return Err(ActionError::InvalidPrecondition(
            "cannot raise an empty army".into(),
        ));
    }
    if strength > loc.population {
        return Err(ActionError::InvalidPrecondition(format!(
            "levy of {} exceeds the population of {}",
            strength, loc.population
        )));
    }
    let cost = strength as i64 * RECRUIT_COST_PER_MAN;
    if state.faction(faction).gold < cost {
        return Err(ActionError::InvalidPrecondition(format!(
            "treasury cannot pay {} gold to raise this army",
            cost
        )));
    }

    let mut next = state.clone();
    let id = next.alloc_army_id();
    next.armies.push(Army {
        id,
        faction,
        strength,
        position: ArmyPosition::At(location),
        garrisoned: false,
    });
    next.location_mut(location).population -= strength;
    next.faction_mut(faction).gold -= cost;
    Ok(next)
}

fn merge_armies(state: &GameState, faction: Faction, from: ArmyId, into: ArmyId) -> ActionResult {
    if from == into {
        return Err(ActionError::InvalidPrecondition(
            "an army cannot merge with itself".into(),
        ));
    }
    let source = owned_army(state, from, faction)?;
    let target = owned_army(state, into, faction)?;
    match (source.stationed_at(), target.stationed_at()) {
        (Some(a), Some(b)) if a == b => {}
        _ => {
            return Err(ActionError::InvalidPrecondition(
                "armies must be stationed at the same location to merge".into(),
            ))
        }
    }

    let extra = source.strength;
    let mut next = state.clone();
    if let Some(target) = next.army_mut(into) {
        target.strength += extra;
    }
    for ch in &mut next.characters {
        if ch.army == Some(from) {
            ch.army = Some(into);
        }
    }
    next.armies.retain(|a| a.id != from);
    Ok(next)
}

// ── Settlement administration ──────────────────────────────────────────

fn requisition(
    state: &GameState,
    faction: Faction,
    location: LocationId,
    resource: ResourceKind,
) -> ActionResult {
    let loc = owned_location(state, location, faction)?;
    if loc.unrest >= 100 {
        return Err(ActionError::InvalidPrecondition(
            "the province is already in revolt; nothing more can be squeezed out".into(),
        ));
    }

    let mut next = state.clone();
    match resource {
        ResourceKind::Gold => {
            let levy = (loc.population / 20) as i64;
            next.faction_mut(faction).gold += levy;
        }
        ResourceKind::Food => {
            let seized = (loc.population / 10) as i32;
            next.location_mut(location).food += seized;
        }
    }
    let loc = next.location_mut(location);
    loc.unrest = loc.unrest.saturating_add(REQUISITION_UNREST).min(100);
    loc.prosperity = (loc.prosperity - 0.05).max(0.1);
    Ok(next)
}

fn set_tax_rate(state: &GameState, faction: Faction, location: LocationId, rate: u8) -> ActionResult {
    owned_location(state, location, faction)?;
    if rate > MAX_TAX_RATE {
        return Err(ActionError::InvalidPrecondition(format!(
            "tax rate {} exceeds the legal maximum of {}",
            rate, MAX_TAX_RATE
        )));
    }
    let mut next = state.clone();
    next.location_mut(location).tax_rate = rate;
    Ok(next)
}

fn manage_city(
    state: &GameState,
    faction: Faction,
    location: LocationId,
    update: &CityUpdate,
) -> ActionResult {
    let loc = owned_location(state, location, faction)?;
    if update.is_empty() {
        return Err(ActionError::InvalidPrecondition(
            "city update orders nothing".into(),
        ));
    }

    let mut cost = 0i64;
    if let Some(n) = update.recruit_garrison {
        if n == 0 {
            return Err(ActionError::InvalidPrecondition(
                "cannot recruit zero garrison troops".into(),
            ));
        }
        if n > loc.population {
            return Err(ActionError::InvalidPrecondition(format!(
                "garrison levy of {} exceeds the population of {}",
                n, loc.population
            )));
        }
        cost += n as i64 * GARRISON_COST_PER_MAN;
    }
    if update.build_fortification {
        if loc.fortification >= MAX_FORTIFICATION {
            return Err(ActionError::InvalidPrecondition(
                "the walls are already at full height".into(),
            ));
        }
        cost += FORT_COST_PER_LEVEL;
    }
    if state.faction(faction).gold < cost {
        return Err(ActionError::InvalidPrecondition(format!(
            "treasury cannot pay {} gold for these works",
            cost
        )));
    }

    let mut next = state.clone();
    let loc = next.location_mut(location);
    if let Some(n) = update.recruit_garrison {
        loc.garrison += n;
        loc.population -= n;
    }
    if update.build_fortification {
        loc.fortification += 1;
    }
    next.faction_mut(faction).gold -= cost;
    Ok(next)
}

fn fortify_stage(state: &GameState, faction: Faction, road: RoadId, stage: StageId) -> ActionResult {
    let r = state
        .try_road(road)
        .ok_or_else(|| ActionError::NotFound(format!("no such road: {:?}", road)))?;
    let idx = r
        .stage_index(stage)
        .ok_or_else(|| ActionError::NotFound(format!("no stage {:?} on road {:?}", stage, road)))?;

    let holds_endpoint = state.location(r.from).owner == Some(faction)
        || state.location(r.to).owner == Some(faction);
    if !holds_endpoint {
        return Err(ActionError::NotOwner(format!(
            "{} holds neither end of road {:?}",
            faction, road
        )));
    }
    if r.stages[idx].fortification >= MAX_STAGE_FORT {
        return Err(ActionError::InvalidPrecondition(
            "the works at this stage are already complete".into(),
        ));
    }
    if state.faction(faction).gold < FORTIFY_STAGE_COST {
        return Err(ActionError::InvalidPrecondition(format!(
            "treasury cannot pay {} gold for road works",
            FORTIFY_STAGE_COST
        )));
    }

    let mut next = state.clone();
    next.road_mut(road).stages[idx].fortification += 1;
    next.faction_mut(faction).gold -= FORTIFY_STAGE_COST;
    Ok(next)
}

// ── Politics ───────────────────────────────────────────────────────────

fn incite_unrest(state: &GameState, faction: Faction, location: LocationId) -> ActionResult {
    let loc = state
        .try_location(location)
        .ok_or_else(|| ActionError::NotFound(format!("no such location: {:?}", location)))?;
    if loc.owner == Some(faction) {
        return Err(ActionError::InvalidPrecondition(
            "cannot stir revolt in our own streets".into(),
        ));
    }
    if state.faction(faction).gold < INCITE_COST {
        return Err(ActionError::InvalidPrecondition(format!(
            "treasury cannot pay {} gold for agitators",
            INCITE_COST
        )));
    }

    let mut next = state.clone();
    let loc = next.location_mut(location);
    loc.unrest = loc.unrest.saturating_add(INCITE_UNREST).min(100);
    next.faction_mut(faction).gold -= INCITE_COST;
    Ok(next)
}

fn negotiate(state: &GameState, faction: Faction, with: Faction, tribute: u32) -> ActionResult {
    if with == faction {
        return Err(ActionError::InvalidPrecondition(
            "cannot negotiate with ourselves".into(),
        ));
    }
    if tribute == 0 {
        return Err(ActionError::InvalidPrecondition(
            "an envoy must carry something to offer".into(),
        ));
    }
    if state.faction(faction).gold < tribute as i64 {
        return Err(ActionError::InvalidPrecondition(format!(
            "treasury cannot cover a tribute of {} gold",
            tribute
        )));
    }

    let mut next = state.clone();
    next.faction_mut(faction).gold -= tribute as i64;
    let goodwill = NEGOTIATE_BASE_GOODWILL + (tribute / 20) as i32;
    let attitude = next.faction_mut(with).relations.entry(faction).or_insert(0);
    *attitude = (*attitude + goodwill).clamp(-100, 100);
    Ok(next)
}

fn attach_leader(
    state: &GameState,
    faction: Faction,
    character: CharacterId,
    army: ArmyId,
) -> ActionResult {
    owned_character(state, character, faction)?;
    owned_army(state, army, faction)?;

    let mut next = state.clone();
    if let Some(ch) = next.character_mut(character) {
        ch.army = Some(army);
    }
    Ok(next)
}

fn detach_leader(state: &GameState, faction: Faction, character: CharacterId) -> ActionResult {
    let ch = owned_character(state, character, faction)?;
    let army_id = match ch.army {
        Some(id) => id,
        None => {
            return Err(ActionError::InvalidPrecondition(format!(
                "{} is not attached to any army",
                ch.name
            )))
        }
    };
    let army = state
        .army(army_id)
        .ok_or_else(|| ActionError::NotFound(format!("no such army: {:?}", army_id)))?;
    let here = match army.stationed_at() {
        Some(loc) => loc,
        None => {
            return Err(ActionError::InvalidPrecondition(
                "a leader cannot abandon an army mid-march".into(),
            ))
        }
    };

    let mut next = state.clone();
    if let Some(ch) = next.character_mut(character) {
        ch.army = None;
        ch.location = here;
    }
    Ok(next)
}

fn move_leader(
    state: &GameState,
    faction: Faction,
    character: CharacterId,
    destination: LocationId,
) -> ActionResult {
    let ch = owned_character(state, character, faction)?;
    if ch.army.is_some() {
        return Err(ActionError::InvalidPrecondition(format!(
            "{} travels with an army; detach first",
            ch.name
        )));
    }
    let dest = state
        .try_location(destination)
        .ok_or_else(|| ActionError::NotFound(format!("no such location: {:?}", destination)))?;
    if dest.owner != Some(faction) {
        return Err(ActionError::InvalidPrecondition(format!(
            "no safe conduct to location {:?}",
            destination
        )));
    }

    let mut next = state.clone();
    if let Some(ch) = next.character_mut(character) {
        ch.location = destination;
    }
    Ok(next)
}

// ── Governor policies ──────────────────────────────────────────────────

fn activate_policy(
    state: &GameState,
    faction: Faction,
    location: LocationId,
    new_policy: GovernorPolicy,
) -> ActionResult {
    let loc = owned_location(state, location, faction)?;
    if let Some(conflict) = policy::activation_conflict(&loc.policies, new_policy) {
        return Err(ActionError::InvalidPrecondition(conflict));
    }
    let first_installment = policy::upkeep(new_policy);
    if state.faction(faction).gold < first_installment {
        return Err(ActionError::InvalidPrecondition(format!(
            "treasury cannot cover the first {} gold of upkeep",
            first_installment
        )));
    }

    let mut next = state.clone();
    next.location_mut(location).policies.push(new_policy);
    next.faction_mut(faction).gold -= first_installment;
    Ok(next)
}

fn revoke_policy(
    state: &GameState,
    faction: Faction,
    location: LocationId,
    old_policy: GovernorPolicy,
) -> ActionResult {
    let loc = owned_location(state, location, faction)?;
    if !loc.policies.contains(&old_policy) {
        return Err(ActionError::InvalidPrecondition(format!(
            "{} is not in force there",
            old_policy
        )));
    }

    let mut next = state.clone();
    next.location_mut(location)
        .policies
        .retain(|p| *p != old_policy);
    Ok(next)
}

// ── Convoys ────────────────────────────────────────────────────────────

fn dispatch_convoy(
    state: &GameState,
    faction: Faction,
    from: LocationId,
    to: LocationId,
    food: u32,
) -> ActionResult {
    let origin = owned_location(state, from, faction)?;
    if state.try_location(to).is_none() {
        return Err(ActionError::NotFound(format!("no such location: {:?}", to)));
    }
    if food == 0 {
        return Err(ActionError::InvalidPrecondition(
            "a convoy needs cargo".into(),
        ));
    }
    let (road, direction, length) = connecting_road(state, from, to)?;
    if origin.food < food as i32 {
        return Err(ActionError::InvalidPrecondition(format!(
            "stores of {} cannot fill wagons with {}",
            origin.food, food
        )));
    }

    let mut next = state.clone();
    next.location_mut(from).food -= food as i32;
    let id = next.alloc_convoy_id();
    next.convoys.push(Convoy {
        id,
        faction,
        road,
        direction,
        turns_until_arrival: length.max(1),
        food,
    });
    Ok(next)
}

fn reverse_convoy(state: &GameState, faction: Faction, convoy: ConvoyId) -> ActionResult {
    let c = state
        .convoy(convoy)
        .ok_or_else(|| ActionError::NotFound(format!("no such convoy: {:?}", convoy)))?;
    if c.faction != faction {
        return Err(ActionError::NotOwner(format!(
            "convoy {:?} belongs to {}",
            convoy, c.faction
        )));
    }
    let road = state
        .try_road(c.road)
        .ok_or_else(|| ActionError::NotFound(format!("no such road: {:?}", c.road)))?;
    let turns_back = road.length().saturating_sub(c.turns_until_arrival).max(1);

    let mut next = state.clone();
    if let Some(c) = next.convoy_mut(convoy) {
        c.direction = c.direction.flipped();
        c.turns_until_arrival = turns_back;
    }
    Ok(next)
}
