// ═══════════════════════════════════════════════════════════════════════
// Static map data: the Greymarch world graph.
// Location and road properties that never change during a campaign.
// ═══════════════════════════════════════════════════════════════════════

use crate::types::{LocationId, RoadId, StageId, TravelDirection};

/// Broad terrain band a settlement sits in. Map rules key economy
/// multipliers off this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Westmark,
    Embervale,
    Saltshore,
    Pinereach,
    TheMarch,
}

/// Static description of a settlement (compile-time constant).
#[derive(Debug, Clone)]
pub struct LocationDef {
    pub id: LocationId,
    pub name: &'static str,
    pub region: Region,
    pub population: u32,
    pub prosperity: f32,
    pub food: i32,
}

/// Static description of one road stage.
#[derive(Debug, Clone)]
pub struct StageDef {
    pub id: StageId,
    pub name: &'static str,
}

/// Static description of a road between two settlements. Stage order runs
/// from `from` to `to`; travel time equals the stage count.
#[derive(Debug, Clone)]
pub struct RoadDef {
    pub id: RoadId,
    pub name: &'static str,
    pub from: LocationId,
    pub to: LocationId,
    pub stages: &'static [StageDef],
}

// ── Location ID constants ──────────────────────────────────────────────
// Ordered: Westmark (0-2), the March (3-4), Embervale (5-7),
// Saltshore (8-9), Pinereach (10), Wyrmgate pass (11)

// WESTMARK: Corvayne country
pub const WESTHOLD: LocationId        = LocationId(0);
pub const RAVENFORD: LocationId       = LocationId(1);
pub const DUNMERE: LocationId         = LocationId(2);
// THE MARCH: contested middle ground
pub const STONEBRIDGE: LocationId     = LocationId(3);
pub const HARROW_CROSS: LocationId    = LocationId(4);
// EMBERVALE: Drakmar country
pub const CINDERWATCH: LocationId     = LocationId(5);
pub const KHARGAN_HOLD: LocationId    = LocationId(6);
pub const VELST: LocationId           = LocationId(7);
// SALTSHORE: Ilvress country
pub const PORT_MYRREN: LocationId     = LocationId(8);
pub const GILDMARKET: LocationId      = LocationId(9);
// PINEREACH: Thornwood country
pub const THORNHALL: LocationId       = LocationId(10);
// THE PASS
pub const WYRMGATE: LocationId        = LocationId(11);

pub const NUM_LOCATIONS: usize = 12;

// ── Road ID constants ──────────────────────────────────────────────────

pub const THE_KINGSWAY: RoadId        = RoadId(0);
pub const BRIDGE_ROAD: RoadId         = RoadId(1);
pub const MARKET_ROAD: RoadId         = RoadId(2);
pub const ASH_ROAD: RoadId            = RoadId(3);
pub const IRON_TRACK: RoadId          = RoadId(4);
pub const FEN_PATH: RoadId            = RoadId(5);
pub const CAUSEWAY: RoadId            = RoadId(6);
pub const SALT_ROAD: RoadId           = RoadId(7);
pub const HARBOR_ROAD: RoadId         = RoadId(8);
pub const HIGH_PASS: RoadId           = RoadId(9);
pub const PINE_TRACK: RoadId          = RoadId(10);
pub const EAST_TRACK: RoadId          = RoadId(11);
pub const SCREE_ROAD: RoadId          = RoadId(12);
pub const RIVER_WALK: RoadId          = RoadId(13);

pub const NUM_ROADS: usize = 14;

// ── Stage ID constants ─────────────────────────────────────────────────
// Numbered in road order; ids are unique across the whole map.

pub const KINGSWAY_MILE: StageId      = StageId(0);
pub const RAVEN_SPAN: StageId         = StageId(1);
pub const OLD_BRIDGE: StageId         = StageId(2);
pub const MARKET_MILE: StageId        = StageId(3);
pub const ASH_MILE: StageId           = StageId(4);
pub const CINDER_GATE: StageId        = StageId(5);
pub const IRON_MILE: StageId          = StageId(6);
pub const LOW_FEN_PATH: StageId       = StageId(7);
pub const FEN_CAUSEWAY: StageId       = StageId(8);
pub const REED_CROSSING: StageId      = StageId(9);
pub const SALT_MILE: StageId          = StageId(10);
pub const TOLL_ARCH: StageId          = StageId(11);
pub const HARBOR_MILE: StageId        = StageId(12);
pub const HIGH_SADDLE: StageId        = StageId(13);
pub const WYRM_STEPS: StageId         = StageId(14);
pub const PINE_MILE: StageId          = StageId(15);
pub const THORN_HOLLOW: StageId       = StageId(16);
pub const EAST_MILE: StageId          = StageId(17);
pub const SCREE_SLOPE: StageId        = StageId(18);
pub const COLD_SHOULDER: StageId      = StageId(19);
pub const RIVER_MILE: StageId         = StageId(20);

pub const NUM_STAGES: usize = 21;

/// Lookup settlement name by LocationId.
pub fn location_name(id: LocationId) -> &'static str {
    LOCATIONS[id.0 as usize].name
}

/// Lookup road name by RoadId.
pub fn road_name(id: RoadId) -> &'static str {
    ROADS[id.0 as usize].name
}

/// Lookup stage name by StageId (stages are globally unique).
pub fn stage_name(id: StageId) -> &'static str {
    for road in &ROADS {
        for stage in road.stages {
            if stage.id == id {
                return stage.name;
            }
        }
    }
    "unknown stage"
}

pub fn location_def(id: LocationId) -> &'static LocationDef {
    &LOCATIONS[id.0 as usize]
}

pub fn road_def(id: RoadId) -> &'static RoadDef {
    &ROADS[id.0 as usize]
}

impl RoadDef {
    pub fn endpoint_toward(&self, dir: TravelDirection) -> LocationId {
        match dir {
            TravelDirection::Forward => self.to,
            TravelDirection::Reverse => self.from,
        }
    }
}

// ── Static location definitions ────────────────────────────────────────

macro_rules! loc {
    ($name:expr, $id:expr, region: $r:ident, pop: $pop:expr, prosperity: $pros:expr, food: $food:expr) => {
        LocationDef {
            id: $id, name: $name, region: Region::$r,
            population: $pop, prosperity: $pros, food: $food,
        }
    };
}

pub static LOCATIONS: [LocationDef; NUM_LOCATIONS] = [
    // ═══ WESTMARK ═══

    // 0: Westhold
    loc!("Westhold", WESTHOLD, region: Westmark, pop: 4200, prosperity: 1.0, food: 300),
    // 1: Ravenford
    loc!("Ravenford", RAVENFORD, region: Westmark, pop: 2100, prosperity: 0.9, food: 220),
    // 2: Dunmere
    loc!("Dunmere", DUNMERE, region: Westmark, pop: 1400, prosperity: 0.8, food: 260),

    // ═══ THE MARCH ═══

    // 3: Stonebridge
    loc!("Stonebridge", STONEBRIDGE, region: TheMarch, pop: 1800, prosperity: 1.1, food: 180),
    // 4: Harrow Cross
    loc!("Harrow Cross", HARROW_CROSS, region: TheMarch, pop: 1600, prosperity: 1.0, food: 150),

    // ═══ EMBERVALE ═══

    // 5: Cinderwatch
    loc!("Cinderwatch", CINDERWATCH, region: Embervale, pop: 1900, prosperity: 0.9, food: 160),
    // 6: Khargan Hold
    loc!("Khargan Hold", KHARGAN_HOLD, region: Embervale, pop: 3800, prosperity: 1.0, food: 280),
    // 7: Velst
    loc!("Velst", VELST, region: Embervale, pop: 1300, prosperity: 0.8, food: 140),

    // ═══ SALTSHORE ═══

    // 8: Port Myrren
    loc!("Port Myrren", PORT_MYRREN, region: Saltshore, pop: 3500, prosperity: 1.3, food: 240),
    // 9: Gildmarket
    loc!("Gildmarket", GILDMARKET, region: Saltshore, pop: 2600, prosperity: 1.2, food: 190),

    // ═══ PINEREACH ═══

    // 10: Thornhall
    loc!("Thornhall", THORNHALL, region: Pinereach, pop: 2900, prosperity: 0.9, food: 320),

    // ═══ THE PASS ═══

    // 11: Wyrmgate
    loc!("Wyrmgate", WYRMGATE, region: TheMarch, pop: 900, prosperity: 0.7, food: 90),
];

// ── Static road definitions ────────────────────────────────────────────

macro_rules! road {
    ($name:expr, $id:expr, $from:expr => $to:expr, stages: [$(($sid:expr, $sname:expr)),+ $(,)?]) => {
        RoadDef {
            id: $id, name: $name, from: $from, to: $to,
            stages: &[$(StageDef { id: $sid, name: $sname }),+],
        }
    };
}

pub static ROADS: [RoadDef; NUM_ROADS] = [
    // 0: The Kingsway
    road!("The Kingsway", THE_KINGSWAY, WESTHOLD => RAVENFORD,
        stages: [(KINGSWAY_MILE, "Kingsway Mile")]),
    // 1: Bridge Road
    road!("Bridge Road", BRIDGE_ROAD, RAVENFORD => STONEBRIDGE,
        stages: [(RAVEN_SPAN, "Raven Span"), (OLD_BRIDGE, "Old Bridge")]),
    // 2: Market Road
    road!("Market Road", MARKET_ROAD, STONEBRIDGE => HARROW_CROSS,
        stages: [(MARKET_MILE, "Market Mile")]),
    // 3: Ash Road
    road!("Ash Road", ASH_ROAD, HARROW_CROSS => CINDERWATCH,
        stages: [(ASH_MILE, "Ash Mile"), (CINDER_GATE, "Cinder Gate")]),
    // 4: Iron Track
    road!("Iron Track", IRON_TRACK, CINDERWATCH => KHARGAN_HOLD,
        stages: [(IRON_MILE, "Iron Mile")]),
    // 5: Fen Path
    road!("Fen Path", FEN_PATH, DUNMERE => WESTHOLD,
        stages: [(LOW_FEN_PATH, "Low Fen Path")]),
    // 6: The Causeway
    road!("The Causeway", CAUSEWAY, DUNMERE => STONEBRIDGE,
        stages: [(FEN_CAUSEWAY, "Fen Causeway"), (REED_CROSSING, "Reed Crossing")]),
    // 7: Salt Road
    road!("Salt Road", SALT_ROAD, HARROW_CROSS => GILDMARKET,
        stages: [(SALT_MILE, "Salt Mile"), (TOLL_ARCH, "Toll Arch")]),
    // 8: Harbor Road
    road!("Harbor Road", HARBOR_ROAD, GILDMARKET => PORT_MYRREN,
        stages: [(HARBOR_MILE, "Harbor Mile")]),
    // 9: High Pass
    road!("High Pass", HIGH_PASS, HARROW_CROSS => WYRMGATE,
        stages: [(HIGH_SADDLE, "High Saddle"), (WYRM_STEPS, "Wyrm Steps")]),
    // 10: Pine Track
    road!("Pine Track", PINE_TRACK, WYRMGATE => THORNHALL,
        stages: [(PINE_MILE, "Pine Mile"), (THORN_HOLLOW, "Thorn Hollow")]),
    // 11: East Track
    road!("East Track", EAST_TRACK, VELST => KHARGAN_HOLD,
        stages: [(EAST_MILE, "East Mile")]),
    // 12: Scree Road
    road!("Scree Road", SCREE_ROAD, VELST => WYRMGATE,
        stages: [(SCREE_SLOPE, "Scree Slope"), (COLD_SHOULDER, "Cold Shoulder")]),
    // 13: River Walk
    road!("River Walk", RIVER_WALK, GILDMARKET => STONEBRIDGE,
        stages: [(RIVER_MILE, "River Mile")]),
];
