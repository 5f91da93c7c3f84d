// ═══════════════════════════════════════════════════════════════════════
// Road-defense target tables: each faction's standing list of frontier
// stages worth holding. Consumed only by the mission planner.
// ═══════════════════════════════════════════════════════════════════════

use march_engine::map;
use march_engine::types::{Faction, RoadId, StageId};

/// One stage a faction keeps a watchful eye on.
#[derive(Debug, Clone, Copy)]
pub struct RoadDefenseTarget {
    pub road: RoadId,
    pub stage: StageId,
    pub priority: f32,
    /// Stages on natural defensive ground are left alone until a real
    /// threat appears; the rest get fortified whenever they sit empty.
    pub natural_defense: bool,
}

macro_rules! target {
    ($road:expr, $stage:expr, priority: $p:expr, natural: $n:expr) => {
        RoadDefenseTarget {
            road: $road,
            stage: $stage,
            priority: $p,
            natural_defense: $n,
        }
    };
}

static CORVAYNE_TARGETS: [RoadDefenseTarget; 3] = [
    target!(map::BRIDGE_ROAD, map::OLD_BRIDGE, priority: 80.0, natural: true),
    target!(map::CAUSEWAY, map::REED_CROSSING, priority: 60.0, natural: false),
    target!(map::THE_KINGSWAY, map::KINGSWAY_MILE, priority: 40.0, natural: false),
];

static DRAKMAR_TARGETS: [RoadDefenseTarget; 3] = [
    target!(map::ASH_ROAD, map::CINDER_GATE, priority: 80.0, natural: true),
    target!(map::SCREE_ROAD, map::COLD_SHOULDER, priority: 65.0, natural: true),
    target!(map::IRON_TRACK, map::IRON_MILE, priority: 45.0, natural: false),
];

static ILVRESS_TARGETS: [RoadDefenseTarget; 3] = [
    target!(map::SALT_ROAD, map::TOLL_ARCH, priority: 70.0, natural: false),
    target!(map::RIVER_WALK, map::RIVER_MILE, priority: 55.0, natural: false),
    target!(map::HARBOR_ROAD, map::HARBOR_MILE, priority: 50.0, natural: false),
];

static THORNWOOD_TARGETS: [RoadDefenseTarget; 3] = [
    target!(map::HIGH_PASS, map::WYRM_STEPS, priority: 85.0, natural: true),
    target!(map::PINE_TRACK, map::PINE_MILE, priority: 55.0, natural: false),
    target!(map::PINE_TRACK, map::THORN_HOLLOW, priority: 50.0, natural: false),
];

pub fn road_defense_targets(faction: Faction) -> &'static [RoadDefenseTarget] {
    match faction {
        Faction::Corvayne => &CORVAYNE_TARGETS,
        Faction::Drakmar => &DRAKMAR_TARGETS,
        Faction::Ilvress => &ILVRESS_TARGETS,
        Faction::Thornwood => &THORNWOOD_TARGETS,
    }
}
