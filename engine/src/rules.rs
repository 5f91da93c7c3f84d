// ═══════════════════════════════════════════════════════════════════════
// Map rules: the per-variant extension point.
// A variant contributes its opening character roster and its economy
// pass; everything else in the engine is variant-independent and selects
// a rule set by configuration, never by type checks.
// ═══════════════════════════════════════════════════════════════════════

use crate::map::{self, Region};
use crate::types::*;
use serde::{Deserialize, Serialize};

pub trait MapRules: Send + Sync {
    /// Human-readable name of this rule set.
    fn name(&self) -> &str;

    /// Named leaders present at campaign start.
    fn initial_characters(&self) -> Vec<Character>;

    /// Recompute every location's economy for one turn. Must return one
    /// entry per location, in location order; the turn step discards a
    /// malformed result and keeps the previous locations.
    fn calculate_economy(&self, state: &GameState) -> Vec<Location>;
}

/// Which rule set a campaign runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapVariant {
    Base,
    Greymarch,
}

pub fn rules_for(variant: MapVariant) -> Box<dyn MapRules> {
    match variant {
        MapVariant::Base => Box::new(BaseRules),
        MapVariant::Greymarch => Box::new(GreymarchRules),
    }
}

// ── Base rules ─────────────────────────────────────────────────────────

/// Featureless rule set: no named leaders, economy left exactly as it is.
/// Useful as a control and as the template for new variants.
pub struct BaseRules;

impl MapRules for BaseRules {
    fn name(&self) -> &str {
        "base"
    }

    fn initial_characters(&self) -> Vec<Character> {
        Vec::new()
    }

    fn calculate_economy(&self, state: &GameState) -> Vec<Location> {
        state.locations.clone()
    }
}

// ── Greymarch rules ────────────────────────────────────────────────────

/// The campaign rule set for the Greymarch map.
pub struct GreymarchRules;

/// Regional prosperity norms. Location prosperity drifts one tenth of the
/// gap toward its region's norm each turn.
fn region_multiplier(region: Region) -> f32 {
    match region {
        Region::Westmark => 1.0,
        Region::Embervale => 1.0,
        Region::Saltshore => 1.2,
        Region::Pinereach => 0.9,
        Region::TheMarch => 1.1,
    }
}

impl MapRules for GreymarchRules {
    fn name(&self) -> &str {
        "greymarch"
    }

    fn initial_characters(&self) -> Vec<Character> {
        let roster: [(&str, Faction, LocationId, f32, u8, u8); 8] = [
            ("Lord Aldric Corvayne", Faction::Corvayne, map::WESTHOLD, 0.20, 7, 5),
            ("Ser Branno Vale", Faction::Corvayne, map::RAVENFORD, 0.10, 6, 4),
            ("Warlord Kesh Drakmar", Faction::Drakmar, map::KHARGAN_HOLD, 0.20, 8, 3),
            ("Captain Irge", Faction::Drakmar, map::CINDERWATCH, 0.10, 6, 5),
            ("Syndic Mavena Ilvress", Faction::Ilvress, map::PORT_MYRREN, 0.15, 4, 8),
            ("Master Quill", Faction::Ilvress, map::GILDMARKET, 0.05, 3, 7),
            ("Elder Rowan Thornwood", Faction::Thornwood, map::THORNHALL, 0.15, 6, 6),
            ("Hatcha of the Pines", Faction::Thornwood, map::THORNHALL, 0.10, 7, 4),
        ];
        roster
            .iter()
            .enumerate()
            .map(|(i, &(name, faction, location, command_bonus, valor, cunning))| Character {
                id: CharacterId(i as u32),
                name: name.to_string(),
                faction,
                location,
                army: None,
                command_bonus,
                valor,
                cunning,
            })
            .collect()
    }

    fn calculate_economy(&self, state: &GameState) -> Vec<Location> {
        state
            .locations
            .iter()
            .map(|loc| {
                let def = map::location_def(loc.id);
                let mut out = loc.clone();

                // Harvest against mouths to feed.
                let harvest = (loc.population / 40) as i32;
                let eaten = (loc.population / 50) as i32 + (loc.garrison / 10) as i32;
                out.food = loc.food + harvest - eaten;

                // Prosperity drifts toward the regional norm.
                let norm = def.prosperity * region_multiplier(def.region);
                out.prosperity = loc.prosperity + (norm - loc.prosperity) * 0.1;
                if loc.unrest > 80 {
                    out.prosperity -= 0.02;
                }

                // Unrest rises under heavy taxation and decays otherwise.
                if loc.tax_rate > 15 {
                    out.unrest = loc.unrest.saturating_add(1).min(100);
                } else {
                    out.unrest = loc.unrest.saturating_sub(1);
                }

                // Policy effects.
                for p in &loc.policies {
                    match p {
                        GovernorPolicy::MartialLaw => {
                            out.unrest = out.unrest.saturating_sub(3);
                            out.prosperity -= 0.01;
                        }
                        GovernorPolicy::OpenMarkets => {
                            out.prosperity += 0.02;
                        }
                        GovernorPolicy::Conscription => {
                            let drafted = loc.population / 400;
                            out.garrison += drafted;
                            out.population = loc.population.saturating_sub(drafted);
                        }
                        GovernorPolicy::GrainDole => {
                            out.unrest = out.unrest.saturating_sub(2);
                            out.food -= (loc.population / 80) as i32;
                        }
                        GovernorPolicy::RoadWatch => {}
                        GovernorPolicy::WarDoctrine => {}
                        GovernorPolicy::TradeDoctrine => {}
                    }
                }

                out.prosperity = out.prosperity.clamp(0.1, 2.0);
                out
            })
            .collect()
    }
}
