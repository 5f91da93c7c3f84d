pub mod execute;
pub mod mission;
pub mod road_defense;
pub mod targets;

pub use execute::execute_missions;
pub use mission::{DefenseObjective, Mission, MissionKind, MissionList};
pub use road_defense::{plan_road_defense, PlannerConfig};
pub use targets::{road_defense_targets, RoadDefenseTarget};
