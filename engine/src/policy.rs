// ═══════════════════════════════════════════════════════════════════════
// Governor policies: upkeep table and the exclusion rule.
// Full-time policies occupy the governor and tolerate only doctrines
// beside them; doctrines coexist with anything.
// ═══════════════════════════════════════════════════════════════════════

use crate::types::GovernorPolicy;

/// Gold upkeep per turn, deducted from the owner's treasury.
/// Doctrines are standing orders and cost nothing here.
pub fn upkeep(policy: GovernorPolicy) -> i64 {
    match policy {
        GovernorPolicy::MartialLaw => 40,
        GovernorPolicy::OpenMarkets => 25,
        GovernorPolicy::Conscription => 30,
        GovernorPolicy::RoadWatch => 10,
        GovernorPolicy::GrainDole => 15,
        GovernorPolicy::WarDoctrine => 0,
        GovernorPolicy::TradeDoctrine => 0,
    }
}

/// Policies that demand the governor's full attention.
pub const FULL_TIME: [GovernorPolicy; 3] = [
    GovernorPolicy::MartialLaw,
    GovernorPolicy::OpenMarkets,
    GovernorPolicy::Conscription,
];

/// Doctrines, exempt from the exclusion rule in both directions.
pub const DOCTRINES: [GovernorPolicy; 2] = [
    GovernorPolicy::WarDoctrine,
    GovernorPolicy::TradeDoctrine,
];

pub fn is_full_time(policy: GovernorPolicy) -> bool {
    FULL_TIME.contains(&policy)
}

pub fn is_doctrine(policy: GovernorPolicy) -> bool {
    DOCTRINES.contains(&policy)
}

/// Why `policy` may not join the `active` set, or None if it may.
pub fn activation_conflict(
    active: &[GovernorPolicy],
    policy: GovernorPolicy,
) -> Option<String> {
    if active.contains(&policy) {
        return Some(format!("{} is already in force", policy));
    }
    if is_doctrine(policy) {
        return None;
    }
    if let Some(ft) = active.iter().find(|p| is_full_time(**p)) {
        return Some(format!("{} occupies the governor full-time", ft));
    }
    if is_full_time(policy) {
        if let Some(other) = active.iter().find(|p| !is_doctrine(**p)) {
            return Some(format!("{} cannot share the governor with {}", policy, other));
        }
    }
    None
}
