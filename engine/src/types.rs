// ═══════════════════════════════════════════════════════════════════════
// Core types: factions, world graph state, armies, characters, convoys
// ═══════════════════════════════════════════════════════════════════════

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ── Enums ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Corvayne,
    Drakmar,
    Ilvress,
    Thornwood,
}

impl Faction {
    pub const ALL: [Faction; 4] = [
        Faction::Corvayne,
        Faction::Drakmar,
        Faction::Ilvress,
        Faction::Thornwood,
    ];
}

impl std::fmt::Display for Faction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Faction::Corvayne => write!(f, "Corvayne"),
            Faction::Drakmar => write!(f, "Drakmar"),
            Faction::Ilvress => write!(f, "Ilvress"),
            Faction::Thornwood => write!(f, "Thornwood"),
        }
    }
}

/// Travel direction along a road. Forward runs from the road's `from`
/// endpoint toward its `to` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TravelDirection {
    Forward,
    Reverse,
}

impl TravelDirection {
    pub fn flipped(self) -> TravelDirection {
        match self {
            TravelDirection::Forward => TravelDirection::Reverse,
            TravelDirection::Reverse => TravelDirection::Forward,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    Gold,
    Food,
}

/// Governor policies a faction can enact in a location it owns.
/// Upkeep costs and the exclusion classes live in `policy.rs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GovernorPolicy {
    MartialLaw,
    OpenMarkets,
    Conscription,
    RoadWatch,
    GrainDole,
    WarDoctrine,
    TradeDoctrine,
}

impl GovernorPolicy {
    pub const ALL: [GovernorPolicy; 7] = [
        GovernorPolicy::MartialLaw,
        GovernorPolicy::OpenMarkets,
        GovernorPolicy::Conscription,
        GovernorPolicy::RoadWatch,
        GovernorPolicy::GrainDole,
        GovernorPolicy::WarDoctrine,
        GovernorPolicy::TradeDoctrine,
    ];
}

impl std::fmt::Display for GovernorPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GovernorPolicy::MartialLaw => write!(f, "Martial Law"),
            GovernorPolicy::OpenMarkets => write!(f, "Open Markets"),
            GovernorPolicy::Conscription => write!(f, "Conscription"),
            GovernorPolicy::RoadWatch => write!(f, "Road Watch"),
            GovernorPolicy::GrainDole => write!(f, "Grain Dole"),
            GovernorPolicy::WarDoctrine => write!(f, "War Doctrine"),
            GovernorPolicy::TradeDoctrine => write!(f, "Trade Doctrine"),
        }
    }
}

// ── Identifiers ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct LocationId(pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct RoadId(pub u8);

/// Stage ids are unique across the whole map, not per road.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct StageId(pub u16);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct ArmyId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct CharacterId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct ConvoyId(pub u32);

// ── Locations ──────────────────────────────────────────────────────────

/// Dynamic state of one settlement. The node set itself never changes;
/// ownership and everything else does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    /// None = neutral / unclaimed.
    pub owner: Option<Faction>,
    /// Static defensive troops, distinct from garrisoned field armies.
    pub garrison: u32,
    pub fortification: u8,
    pub population: u32,
    /// Economy multiplier, drifts toward the region's base value.
    pub prosperity: f32,
    /// Local food stockpile. Can go negative in a famine turn.
    pub food: i32,
    /// 0-100.
    pub unrest: u8,
    /// Tax rate in percent of assessed wealth, bounded by MAX_TAX_RATE.
    pub tax_rate: u8,
    pub policies: Vec<GovernorPolicy>,
}

impl Location {
    /// Gold this location yields its owner per turn.
    pub fn tax_yield(&self) -> i64 {
        let base = self.population as f32 * (self.tax_rate as f32 / 100.0);
        (base * self.prosperity / 10.0) as i64
    }
}

// ── Roads and stages ───────────────────────────────────────────────────

/// One leg of a road. Fortification here is built by FortifyStage and is
/// independent of the endpoints' defenses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadStage {
    pub id: StageId,
    pub fortification: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Road {
    pub id: RoadId,
    pub from: LocationId,
    pub to: LocationId,
    pub stages: Vec<RoadStage>,
}

impl Road {
    /// Number of stages, which is also the travel time in turns.
    pub fn length(&self) -> u8 {
        self.stages.len() as u8
    }

    /// The endpoint a traveler heading in `dir` will arrive at.
    pub fn endpoint_toward(&self, dir: TravelDirection) -> LocationId {
        match dir {
            TravelDirection::Forward => self.to,
            TravelDirection::Reverse => self.from,
        }
    }

    /// Travel direction for a march from `a` to `b`, if this road links them.
    pub fn direction_between(&self, a: LocationId, b: LocationId) -> Option<TravelDirection> {
        if self.from == a && self.to == b {
            Some(TravelDirection::Forward)
        } else if self.to == a && self.from == b {
            Some(TravelDirection::Reverse)
        } else {
            None
        }
    }

    pub fn touches(&self, loc: LocationId) -> bool {
        self.from == loc || self.to == loc
    }

    pub fn stage_index(&self, stage: StageId) -> Option<usize> {
        self.stages.iter().position(|s| s.id == stage)
    }
}

// ── Armies ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ArmyPosition {
    At(LocationId),
    OnRoad {
        road: RoadId,
        direction: TravelDirection,
        /// Endpoint the army will occupy on arrival. None only for armies
        /// holding a stage as a standing garrison; the Garrison handler
        /// restores it when such an army resumes the march.
        destination: Option<LocationId>,
        turns_until_arrival: u8,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Army {
    pub id: ArmyId,
    pub faction: Faction,
    pub strength: u32,
    pub position: ArmyPosition,
    /// Garrisoned armies hold their ground and do not advance.
    pub garrisoned: bool,
}

impl Army {
    /// Location this army is stationed at, if it is not on a road.
    pub fn stationed_at(&self) -> Option<LocationId> {
        match self.position {
            ArmyPosition::At(loc) => Some(loc),
            ArmyPosition::OnRoad { .. } => None,
        }
    }

    /// Index of the stage this army currently occupies on `road`, derived
    /// from its travel direction and remaining turns. None if the army is
    /// not on that road.
    pub fn stage_index_on(&self, road: &Road) -> Option<usize> {
        match self.position {
            ArmyPosition::OnRoad { road: r, direction, turns_until_arrival, .. }
                if r == road.id =>
            {
                let len = road.stages.len() as i32;
                if len == 0 {
                    return None;
                }
                let idx = match direction {
                    TravelDirection::Forward => len - turns_until_arrival as i32,
                    TravelDirection::Reverse => turns_until_arrival as i32 - 1,
                };
                Some(idx.clamp(0, len - 1) as usize)
            }
            _ => None,
        }
    }
}

// ── Characters ─────────────────────────────────────────────────────────

/// A named leader. Attachment is a non-owning reference: attaching and
/// detaching never creates or destroys the character or the army.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    pub faction: Faction,
    /// Court location, meaningful while unattached. An attached leader
    /// moves with its army and takes the army's location on detach.
    pub location: LocationId,
    pub army: Option<ArmyId>,
    /// Fractional bonus to the strength of the army this leader commands.
    pub command_bonus: f32,
    pub valor: u8,
    pub cunning: u8,
}

// ── Convoys ────────────────────────────────────────────────────────────

/// A supply column moving food along a road. Direction is reversible
/// mid-route; cargo is deposited at the endpoint it is traveling toward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Convoy {
    pub id: ConvoyId,
    pub faction: Faction,
    pub road: RoadId,
    pub direction: TravelDirection,
    pub turns_until_arrival: u8,
    pub food: u32,
}

// ── City management ────────────────────────────────────────────────────

/// Batched settlement update carried by the ManageCity action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CityUpdate {
    /// Raise the static garrison by this many troops, drawn from population.
    pub recruit_garrison: Option<u32>,
    /// Add one fortification level.
    pub build_fortification: bool,
}

impl CityUpdate {
    pub fn is_empty(&self) -> bool {
        self.recruit_garrison.is_none() && !self.build_fortification
    }
}

// ── Factions ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactionState {
    pub faction: Faction,
    /// Treasury. Upkeep can push it negative; income digs it back out.
    pub gold: i64,
    pub home: LocationId,
    pub ai_controlled: bool,
    /// This faction's attitude toward each other faction, clamped to ±100.
    pub relations: HashMap<Faction, i32>,
}

// ── Game state ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub turn: u32,
    /// Indexed by LocationId.
    pub locations: Vec<Location>,
    /// Indexed by RoadId.
    pub roads: Vec<Road>,
    pub armies: Vec<Army>,
    pub characters: Vec<Character>,
    pub convoys: Vec<Convoy>,
    pub factions: HashMap<Faction, FactionState>,
    pub next_army_id: u32,
    pub next_convoy_id: u32,
}

impl GameState {
    /// Get location state by id. Panics on a foreign id; use `try_location`
    /// when the id comes from a command.
    pub fn location(&self, id: LocationId) -> &Location {
        &self.locations[id.0 as usize]
    }

    pub fn location_mut(&mut self, id: LocationId) -> &mut Location {
        &mut self.locations[id.0 as usize]
    }

    pub fn try_location(&self, id: LocationId) -> Option<&Location> {
        self.locations.get(id.0 as usize)
    }

    pub fn road(&self, id: RoadId) -> &Road {
        &self.roads[id.0 as usize]
    }

    pub fn road_mut(&mut self, id: RoadId) -> &mut Road {
        &mut self.roads[id.0 as usize]
    }

    pub fn try_road(&self, id: RoadId) -> Option<&Road> {
        self.roads.get(id.0 as usize)
    }

    pub fn army(&self, id: ArmyId) -> Option<&Army> {
        self.armies.iter().find(|a| a.id == id)
    }

    pub fn army_mut(&mut self, id: ArmyId) -> Option<&mut Army> {
        self.armies.iter_mut().find(|a| a.id == id)
    }

    pub fn character(&self, id: CharacterId) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    pub fn character_mut(&mut self, id: CharacterId) -> Option<&mut Character> {
        self.characters.iter_mut().find(|c| c.id == id)
    }

    pub fn convoy(&self, id: ConvoyId) -> Option<&Convoy> {
        self.convoys.iter().find(|c| c.id == id)
    }

    pub fn convoy_mut(&mut self, id: ConvoyId) -> Option<&mut Convoy> {
        self.convoys.iter_mut().find(|c| c.id == id)
    }

    /// Get the faction ledger. All four factions exist from setup on.
    pub fn faction(&self, f: Faction) -> &FactionState {
        &self.factions[&f]
    }

    pub fn faction_mut(&mut self, f: Faction) -> &mut FactionState {
        self.factions.get_mut(&f).unwrap()
    }

    /// The road directly linking two locations, if any.
    pub fn road_between(&self, a: LocationId, b: LocationId) -> Option<&Road> {
        self.roads
            .iter()
            .find(|r| r.direction_between(a, b).is_some())
    }

    /// Allocate a fresh army id.
    pub fn alloc_army_id(&mut self) -> ArmyId {
        let id = ArmyId(self.next_army_id);
        self.next_army_id += 1;
        id
    }

    /// Allocate a fresh convoy id.
    pub fn alloc_convoy_id(&mut self) -> ConvoyId {
        let id = ConvoyId(self.next_convoy_id);
        self.next_convoy_id += 1;
        id
    }
}
