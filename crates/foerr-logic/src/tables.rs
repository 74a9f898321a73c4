//! Static conversion tables — location names, background names, liquids,
//! backform backwall symbols and back-object extras.
//!
//! Plain `const` slices with lookup helpers; nothing here is mutable.

use std::collections::HashSet;

use thiserror::Error;

/// Legacy room-file basename → output location id.
pub const LOCATION_NAMES: &[(&str, &str)] = &[
    ("rooms_art", "fort_focks"),
    ("rooms_begin", "technical_tunnels"),
    ("rooms_canter", "canterlot_ruins"),
    ("rooms_comm", "command_post"),
    ("rooms_core", "stable_88_core"),
    ("rooms_covert", "covertsign"),
    ("rooms_encl", "enclave_base"),
    ("rooms_garages", "hankey_garages"),
    ("rooms_grave", "funeral"),
    ("rooms_hql", "legion_hq"),
    ("rooms_mane", "manehattan_ruins"),
    ("rooms_mbase", "bunker"),
    ("rooms_minst", "moi"),
    ("rooms_mtn", "mas"),
    ("rooms_nio", "dsr"),
    ("rooms_pis", "stable_pi_entrance"),
    ("rooms_pi", "stable_pi"),
    ("rooms_plant", "factory"),
    ("rooms_post", "enclave_outpost"),
    ("rooms_prob", "trials_bosses"),
    ("rooms_raiders", "falls_springs"),
    ("rooms_rbl", "prancing_pony"),
    ("rooms_sewer", "sewers"),
    ("rooms_src", "water_treatment_plant"),
    ("rooms_stable", "abandoned_stable"),
    ("rooms_surf", "surface"),
    ("rooms_thunder", "thunderhead"),
    ("rooms_way", "way_to_canterlot"),
    ("rooms_workshop", "gun_workshop"),
];

/// Basenames that are known not to be real locations (room template, test map).
pub const UNTRANSLATED_LOCATIONS: &[&str] = &["z_shablon", "rooms2"];

/// GameData `fon` id → full-background id.
pub const BACKGROUND_FULL_NAMES: &[(&str, &str)] = &[
    ("fonCanter", "canterlot"),
    ("fonClear", "desert_day"),
    ("fonDarkClouds", "surface"),
    ("fonEnclave", "clouds"),
    ("fonFinalb", "its_a_fine_night"),
    ("fonFire", "hell_clouds"),
    ("fonRuins", "manehattan"),
    ("fonWay", "crystal_mountains"),
];

/// `wtip` liquid type → canonical liquid symbol. Type 0 is the default.
pub const LIQUID_TYPES: &[(i32, char)] = &[
    (0, '*'), // water
    (1, '&'), // radioactive
    (2, '%'), // pink
    (3, '$'), // blood
];

/// Backwall texture → background symbol injected by backform patterns.
pub const BACKFORM_BACKWALL_SYMBOLS: &[(&str, char)] = &[("windows", 'u'), ("leaking", 'v')];

/// Back objects drawn as holes in the backwall.
pub const HOLE_IDS: &[&str] = &["hole", "hole2", "hole3", "hole4", "hole5"];

/// Back objects that are variants of another object: id → (base id, variant index).
pub const BACK_OBJ_VARIANTS: &[(&str, &str, u32)] = &[
    ("hole2", "hole", 1),
    ("hole3", "hole", 2),
    ("hole4", "hole", 3),
    ("hole5", "hole", 4),
];

pub fn location_id(basename: &str) -> Option<&'static str> {
    LOCATION_NAMES
        .iter()
        .find(|(legacy, _)| *legacy == basename)
        .map(|(_, id)| *id)
}

pub fn is_expected_untranslated(basename: &str) -> bool {
    UNTRANSLATED_LOCATIONS.contains(&basename)
}

pub fn background_full_name(fon: &str) -> Option<&'static str> {
    BACKGROUND_FULL_NAMES
        .iter()
        .find(|(legacy, _)| *legacy == fon)
        .map(|(_, name)| *name)
}

pub fn liquid_symbol(wtip: i32) -> Option<char> {
    LIQUID_TYPES
        .iter()
        .find(|(ty, _)| *ty == wtip)
        .map(|(_, symbol)| *symbol)
}

pub fn default_liquid_symbol() -> char {
    LIQUID_TYPES[0].1
}

pub fn backform_backwall_symbol(backwall: &str) -> Option<char> {
    BACKFORM_BACKWALL_SYMBOLS
        .iter()
        .find(|(name, _)| *name == backwall)
        .map(|(_, symbol)| *symbol)
}

pub fn is_hole(obj_id: &str) -> bool {
    HOLE_IDS.contains(&obj_id)
}

pub fn back_obj_variant(obj_id: &str) -> Option<(&'static str, u32)> {
    BACK_OBJ_VARIANTS
        .iter()
        .find(|(id, _, _)| *id == obj_id)
        .map(|(_, base, variant)| (*base, *variant))
}

/// Table consistency errors, fatal at start-up.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("location names map contains non-unique values ({0:?})")]
    DuplicateLocationId(&'static str),
    #[error("liquid types map contains non-unique values ({0:?})")]
    DuplicateLiquid(char),
}

/// Check that every table which must be injective actually is.
pub fn validate() -> Result<(), TableError> {
    let mut ids = HashSet::new();
    for (_, id) in LOCATION_NAMES {
        if !ids.insert(*id) {
            return Err(TableError::DuplicateLocationId(id));
        }
    }

    let mut liquids = HashSet::new();
    for (_, symbol) in LIQUID_TYPES {
        if !liquids.insert(*symbol) {
            return Err(TableError::DuplicateLiquid(*symbol));
        }
    }
    Ok(())
}
