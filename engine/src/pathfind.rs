// ═══════════════════════════════════════════════════════════════════════
// Pathfinding: road-count distance and faction-safe routes.
// Two separate traversals: distance ignores ownership entirely, safe
// routing restricts intermediate stops to friendly ground. They are not
// interchangeable and neither falls back to the other.
// ═══════════════════════════════════════════════════════════════════════

use crate::types::{Faction, GameState, LocationId, Road, RoadId};
use std::collections::VecDeque;

/// Sentinel distance for unreachable pairs. Callers treat this as
/// "no route", never as an error.
pub const UNREACHABLE: u32 = 999;

/// One past the highest location index the road set can touch.
fn node_bound(start: LocationId, end: LocationId, roads: &[Road]) -> usize {
    let mut bound = start.0.max(end.0) as usize;
    for road in roads {
        bound = bound.max(road.from.0 as usize).max(road.to.0 as usize);
    }
    bound + 1
}

/// Shortest number of roads between two locations, ignoring ownership.
/// Returns 0 when start and end coincide and UNREACHABLE when no chain
/// of roads links them.
pub fn get_distance(start: LocationId, end: LocationId, roads: &[Road]) -> u32 {
    if start == end {
        return 0;
    }

    let bound = node_bound(start, end, roads);
    let mut visited = vec![false; bound];
    let mut queue: VecDeque<(LocationId, u32)> = VecDeque::new();

    visited[start.0 as usize] = true;
    queue.push_back((start, 0));

    while let Some((current, dist)) = queue.pop_front() {
        for road in roads {
            let next = if road.from == current {
                road.to
            } else if road.to == current {
                road.from
            } else {
                continue;
            };

            if next == end {
                return dist + 1;
            }
            if !visited[next.0 as usize] {
                visited[next.0 as usize] = true;
                queue.push_back((next, dist + 1));
            }
        }
    }

    UNREACHABLE
}

/// Shortest route from `start` to `end` whose intermediate stops are all
/// owned by `faction`. The destination itself may belong to anyone, which
/// is what lets a relief column march up to a contested gate. Returns the
/// roads to take in order, or None when no such route exists.
pub fn find_safe_path(
    start: LocationId,
    end: LocationId,
    state: &GameState,
    faction: Faction,
) -> Option<Vec<RoadId>> {
    if start == end {
        return Some(Vec::new());
    }

    let bound = state.locations.len();
    if start.0 as usize >= bound || end.0 as usize >= bound {
        return None;
    }

    let mut visited = vec![false; bound];
    let mut parent: Vec<Option<(LocationId, RoadId)>> = vec![None; bound];
    let mut queue: VecDeque<LocationId> = VecDeque::new();

    visited[start.0 as usize] = true;
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        for road in &state.roads {
            let next = if road.from == current {
                road.to
            } else if road.to == current {
                road.from
            } else {
                continue;
            };

            if visited[next.0 as usize] {
                continue;
            }

            if next == end {
                parent[next.0 as usize] = Some((current, road.id));
                return Some(reconstruct(&parent, start, end));
            }

            // Intermediate stops must be friendly ground.
            if state.location(next).owner == Some(faction) {
                visited[next.0 as usize] = true;
                parent[next.0 as usize] = Some((current, road.id));
                queue.push_back(next);
            }
        }
    }

    None
}

fn reconstruct(
    parent: &[Option<(LocationId, RoadId)>],
    start: LocationId,
    end: LocationId,
) -> Vec<RoadId> {
    let mut path = Vec::new();
    let mut current = end;
    while current != start {
        match parent[current.0 as usize] {
            Some((prev, road)) => {
                path.push(road);
                current = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}
