// ═══════════════════════════════════════════════════════════════════════
// Combat: the engagement contract between arriving armies and defenders.
// The turn step depends only on these signatures.
// ═══════════════════════════════════════════════════════════════════════

use crate::strength;
use crate::types::{GameState, LocationId};

/// Outcome of one assault, expressed as casualty fractions so callers can
/// scale raw army strengths and the static garrison uniformly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssaultOutcome {
    pub attacker_won: bool,
    /// Fraction of raw strength the attacker loses, 0.0 to 1.0.
    pub attacker_casualties: f32,
    /// Fraction of raw strength the defense loses, 0.0 to 1.0.
    pub defender_casualties: f32,
}

fn fort_multiplier(fortification: u8) -> f32 {
    1.0 + 0.15 * fortification as f32
}

/// Total defensive strength at a location: the owner's stationed armies
/// plus the static garrison, scaled by the walls.
pub fn defense_at(state: &GameState, loc: LocationId) -> f32 {
    let location = state.location(loc);
    let armies = match location.owner {
        Some(owner) => strength::faction_strength_at(state, loc, owner),
        None => 0.0,
    };
    (armies + location.garrison as f32) * fort_multiplier(location.fortification)
}

/// Resolve an assault deterministically from two effective strengths.
/// Ties hold for the defender. The losing side is wiped out; the winner
/// bleeds in proportion to how even the fight was.
pub fn resolve_assault(attack: f32, defense: f32) -> AssaultOutcome {
    if attack <= 0.0 {
        return AssaultOutcome {
            attacker_won: false,
            attacker_casualties: 0.0,
            defender_casualties: 0.0,
        };
    }

    if attack > defense {
        let ratio = defense / attack;
        AssaultOutcome {
            attacker_won: true,
            attacker_casualties: (ratio * 0.5).min(0.9),
            defender_casualties: 1.0,
        }
    } else {
        let ratio = attack / defense.max(1.0);
        AssaultOutcome {
            attacker_won: false,
            attacker_casualties: 1.0,
            defender_casualties: (ratio * 0.5).min(0.9),
        }
    }
}
