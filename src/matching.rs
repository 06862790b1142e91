// src/matching.rs
//
// Pure filtering/selection over the in-memory load list. The only
// non-determinism is the random pick among equally-good candidates.
use crate::db::loads::Load;
use chrono::NaiveDateTime;
use rand::seq::SliceRandom;

/// Upper-cased state component of a `City, ST` string, or empty.
pub fn extract_state(location: &str) -> String {
    location
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .next_back()
        .map(|segment| segment.to_uppercase())
        .unwrap_or_default()
}

fn normalize_equipment(equipment: &str) -> String {
    equipment.trim().to_lowercase()
}

/// Accept both `2024-05-02T08:00` and `2024-05-02T08:00:00`.
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .ok()
}

/// Choose a load in the carrier's origin state, preferring matching
/// equipment; random among equally-good candidates.
pub fn select_load<'a>(loads: &'a [Load], origin_state: &str, equipment: &str) -> Option<&'a Load> {
    if origin_state.is_empty() {
        return None;
    }

    let state_matches: Vec<&Load> = loads
        .iter()
        .filter(|load| extract_state(&load.origin) == origin_state)
        .collect();
    if state_matches.is_empty() {
        return None;
    }

    let wanted = normalize_equipment(equipment);
    let equipment_matches: Vec<&Load> = state_matches
        .iter()
        .copied()
        .filter(|load| normalize_equipment(&load.equipment_type) == wanted)
        .collect();

    let candidates = if equipment_matches.is_empty() {
        &state_matches
    } else {
        &equipment_matches
    };
    candidates.choose(&mut rand::thread_rng()).copied()
}

/// Linear filter: equipment type exact (case-insensitive), optional origin
/// substring, optional pickup-after cutoff. Best-paying five loads first.
pub fn search_loads(
    loads: &[Load],
    equipment_type: &str,
    origin: Option<&str>,
    pickup_after: Option<NaiveDateTime>,
) -> Vec<Load> {
    let wanted = normalize_equipment(equipment_type);
    let origin_query = origin.map(|o| o.to_lowercase());

    let mut filtered: Vec<Load> = loads
        .iter()
        .filter(|load| {
            if normalize_equipment(&load.equipment_type) != wanted {
                return false;
            }
            if let Some(query) = &origin_query {
                if !load.origin.to_lowercase().contains(query) {
                    return false;
                }
            }
            if let Some(cutoff) = pickup_after {
                match parse_datetime(&load.pickup_datetime) {
                    Some(pickup) if pickup >= cutoff => {}
                    _ => return false,
                }
            }
            true
        })
        .cloned()
        .collect();

    filtered.sort_by(|a, b| {
        b.loadboard_rate
            .partial_cmp(&a.loadboard_rate)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    filtered.truncate(5);
    filtered
}
