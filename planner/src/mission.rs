// ═══════════════════════════════════════════════════════════════════════
// Missions: standing tasks the planner maintains for one faction.
// The book lives outside GameState; planners update it, the faction's
// turn logic consumes it.
// ═══════════════════════════════════════════════════════════════════════

use march_engine::types::{Faction, RoadId, StageId};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefenseObjective {
    /// Put a garrisoned army on the stage.
    Garrison,
    /// Raise works on the stage.
    Fortify,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MissionKind {
    RoadDefense {
        road: RoadId,
        stage: StageId,
        objective: DefenseObjective,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub id: u32,
    pub faction: Faction,
    pub kind: MissionKind,
    pub priority: f32,
    pub turn_updated: u32,
}

/// One faction's mission book. Entry order is stable; re-planning updates
/// entries in place instead of appending duplicates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissionList {
    pub missions: Vec<Mission>,
    next_id: u32,
}

impl MissionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.missions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.missions.is_empty()
    }

    /// The road-defense mission covering `stage`, if one exists.
    pub fn road_defense_for(&self, stage: StageId) -> Option<&Mission> {
        self.missions.iter().find(|m| {
            matches!(m.kind, MissionKind::RoadDefense { stage: s, .. } if s == stage)
        })
    }

    /// Insert a road-defense mission for a stage, or update the entry
    /// already covering it. Existing entries keep their id and position.
    pub fn upsert_road_defense(
        &mut self,
        faction: Faction,
        road: RoadId,
        stage: StageId,
        objective: DefenseObjective,
        priority: f32,
        turn: u32,
    ) {
        let kind = MissionKind::RoadDefense {
            road,
            stage,
            objective,
        };
        if let Some(m) = self.missions.iter_mut().find(|m| {
            matches!(m.kind, MissionKind::RoadDefense { stage: s, .. } if s == stage)
        }) {
            m.kind = kind;
            m.priority = priority;
            m.turn_updated = turn;
            return;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.missions.push(Mission {
            id,
            faction,
            kind,
            priority,
            turn_updated: turn,
        });
    }

    pub fn remove(&mut self, id: u32) {
        self.missions.retain(|m| m.id != id);
    }

    /// Missions most urgent first.
    pub fn by_priority(&self) -> Vec<&Mission> {
        let mut sorted: Vec<&Mission> = self.missions.iter().collect();
        sorted.sort_by(|a, b| {
            b.priority
                .partial_cmp(&a.priority)
                .unwrap_or(Ordering::Equal)
        });
        sorted
    }
}
