//! Material table — canonical symbol → material descriptor.
//!
//! Loaded from `materials.json`, which holds two maps (`solids` and `other`)
//! keyed by single-character canonical symbols. Lookups against a symbol that
//! is not in the table are errors, never defaults.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::constants::{keys, symbols};
use crate::json;

/// Which of the two material maps a symbol belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialMap {
    /// First character of every cell.
    Solids,
    /// Every character after the first.
    Other,
}

impl MaterialMap {
    pub fn key(self) -> &'static str {
        match self {
            MaterialMap::Solids => keys::SOLIDS,
            MaterialMap::Other => keys::OTHER,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MaterialMap::Solids => "Solids",
            MaterialMap::Other => "Other",
        }
    }
}

/// Material kind, stored as the `type` integer in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "u8")]
pub enum MaterialKind {
    Solid = 1,
    Background = 2,
    Ladder = 3,
    Platform = 4,
    Stairs = 5,
    Liquid = 6,
}

impl TryFrom<u8> for MaterialKind {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(MaterialKind::Solid),
            2 => Ok(MaterialKind::Background),
            3 => Ok(MaterialKind::Ladder),
            4 => Ok(MaterialKind::Platform),
            5 => Ok(MaterialKind::Stairs),
            6 => Ok(MaterialKind::Liquid),
            other => Err(format!("unknown material type {other}")),
        }
    }
}

/// One material. Only `type` is required; the rest depends on the kind.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MaterialDescriptor {
    #[serde(rename = "type")]
    pub kind: MaterialKind,
    #[serde(rename = "txt", default)]
    pub texture: Option<String>,
    /// Symbol used by Remains when it differs from the canonical one.
    #[serde(default)]
    pub legacy_symbol: Option<String>,
    /// Ladders and stairs.
    #[serde(default)]
    pub is_right: Option<bool>,
    #[serde(default)]
    pub offset_left: Option<i32>,
    #[serde(rename = "txt_delim", default)]
    pub texture_delim: Option<String>,
    #[serde(rename = "txt_delim_offset", default)]
    pub texture_delim_offset: Option<[i32; 2]>,
}

impl MaterialDescriptor {
    pub fn new(kind: MaterialKind) -> Self {
        Self {
            kind,
            texture: None,
            legacy_symbol: None,
            is_right: None,
            offset_left: None,
            texture_delim: None,
            texture_delim_offset: None,
        }
    }

    pub fn with_legacy(mut self, legacy: &str) -> Self {
        self.legacy_symbol = Some(legacy.to_owned());
        self
    }
}

/// Material loading / lookup errors.
#[derive(Debug, Error)]
pub enum MaterialError {
    #[error("materials file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("materials root is not an object")]
    NotAnObject,
    #[error("\"{0}\" map missing from materials")]
    MissingMap(&'static str),
    #[error("\"{map}\" map is not an object")]
    MapNotAnObject { map: &'static str },
    #[error("{map} material key {key:?} is not a single character")]
    KeyNotOneChar { map: &'static str, key: String },
    #[error("{map} material {symbol:?} is invalid: {source}")]
    Descriptor {
        map: &'static str,
        symbol: char,
        source: serde_json::Error,
    },
    #[error("{map} material symbol {symbol:?} collides with a reserved character")]
    ReservedSymbol { map: &'static str, symbol: char },
    #[error("no material for symbol {symbol:?} in {map} map")]
    UnknownSymbol { map: &'static str, symbol: char },
}

/// Both material maps, keyed by canonical symbol.
#[derive(Debug, Clone, Default)]
pub struct MaterialTable {
    solids: BTreeMap<char, MaterialDescriptor>,
    other: BTreeMap<char, MaterialDescriptor>,
}

impl MaterialTable {
    /// Parse `materials.json` text. Duplicate keys anywhere are rejected.
    pub fn from_json_str(text: &str) -> Result<Self, MaterialError> {
        let root = json::parse_strict(text)?;
        Self::from_value(&root)
    }

    pub fn from_value(root: &Value) -> Result<Self, MaterialError> {
        let root = root.as_object().ok_or(MaterialError::NotAnObject)?;
        Ok(Self {
            solids: load_map(root, MaterialMap::Solids)?,
            other: load_map(root, MaterialMap::Other)?,
        })
    }

    /// Add or replace a material.
    pub fn insert(
        &mut self,
        map: MaterialMap,
        symbol: char,
        material: MaterialDescriptor,
    ) -> Result<(), MaterialError> {
        if symbols::RESERVED.contains(&symbol) {
            return Err(MaterialError::ReservedSymbol {
                map: map.key(),
                symbol,
            });
        }
        self.map_mut(map).insert(symbol, material);
        Ok(())
    }

    pub fn lookup(
        &self,
        map: MaterialMap,
        symbol: char,
    ) -> Result<&MaterialDescriptor, MaterialError> {
        self.map(map)
            .get(&symbol)
            .ok_or(MaterialError::UnknownSymbol {
                map: map.key(),
                symbol,
            })
    }

    pub fn entries(&self, map: MaterialMap) -> impl Iterator<Item = (char, &MaterialDescriptor)> {
        self.map(map).iter().map(|(symbol, mat)| (*symbol, mat))
    }

    pub fn len(&self, map: MaterialMap) -> usize {
        self.map(map).len()
    }

    fn map(&self, map: MaterialMap) -> &BTreeMap<char, MaterialDescriptor> {
        match map {
            MaterialMap::Solids => &self.solids,
            MaterialMap::Other => &self.other,
        }
    }

    fn map_mut(&mut self, map: MaterialMap) -> &mut BTreeMap<char, MaterialDescriptor> {
        match map {
            MaterialMap::Solids => &mut self.solids,
            MaterialMap::Other => &mut self.other,
        }
    }
}

fn load_map(
    root: &Map<String, Value>,
    map: MaterialMap,
) -> Result<BTreeMap<char, MaterialDescriptor>, MaterialError> {
    let node = root.get(map.key()).ok_or(MaterialError::MissingMap(map.key()))?;
    let node = node
        .as_object()
        .ok_or(MaterialError::MapNotAnObject { map: map.key() })?;

    let mut out = BTreeMap::new();
    for (key, item) in node {
        let mut chars = key.chars();
        let symbol = match (chars.next(), chars.next()) {
            (Some(c), None) => c,
            _ => {
                return Err(MaterialError::KeyNotOneChar {
                    map: map.key(),
                    key: key.clone(),
                })
            }
        };
        if symbols::RESERVED.contains(&symbol) {
            return Err(MaterialError::ReservedSymbol {
                map: map.key(),
                symbol,
            });
        }
        let material = MaterialDescriptor::deserialize(item).map_err(|source| {
            MaterialError::Descriptor {
                map: map.key(),
                symbol,
                source,
            }
        })?;
        out.insert(symbol, material);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "api_version": 1,
        "version": 1,
        "solids": {
            "A": {"txt": "wall", "type": 1},
            "~": {"txt": "border", "type": 1, "legacy_symbol": "B"}
        },
        "other": {
            "a": {"txt": "plat", "type": 4, "legacy_symbol": "-"},
            "g": {"txt": "ladder", "type": 3, "is_right": false, "offset_left": -2,
                  "txt_delim": "ladder_delim", "txt_delim_offset": [-2, -30]},
            "*": {"type": 6}
        }
    }"#;

    #[test]
    fn test_load_sample() {
        let table = MaterialTable::from_json_str(SAMPLE).unwrap();
        assert_eq!(table.len(MaterialMap::Solids), 2);
        assert_eq!(table.len(MaterialMap::Other), 3);

        let ladder = table.lookup(MaterialMap::Other, 'g').unwrap();
        assert_eq!(ladder.kind, MaterialKind::Ladder);
        assert_eq!(ladder.is_right, Some(false));
        assert_eq!(ladder.offset_left, Some(-2));
        assert_eq!(ladder.texture_delim_offset, Some([-2, -30]));

        let liquid = table.lookup(MaterialMap::Other, '*').unwrap();
        assert_eq!(liquid.kind, MaterialKind::Liquid);
        assert!(liquid.texture.is_none());
    }

    #[test]
    fn test_unknown_symbol_is_error() {
        let table = MaterialTable::from_json_str(SAMPLE).unwrap();
        let err = table.lookup(MaterialMap::Solids, 'Z').unwrap_err();
        assert!(matches!(err, MaterialError::UnknownSymbol { symbol: 'Z', .. }));
        // maps are separate
        assert!(table.lookup(MaterialMap::Solids, 'a').is_err());
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let text = r#"{"solids": {"A": {"type": 1}, "A": {"type": 1}}, "other": {}}"#;
        assert!(matches!(
            MaterialTable::from_json_str(text),
            Err(MaterialError::Json(_))
        ));
    }

    #[test]
    fn test_missing_map() {
        let err = MaterialTable::from_json_str(r#"{"solids": {}}"#).unwrap_err();
        assert!(matches!(err, MaterialError::MissingMap("other")));
    }

    #[test]
    fn test_multi_char_key_rejected() {
        let text = r#"{"solids": {"AB": {"type": 1}}, "other": {}}"#;
        assert!(matches!(
            MaterialTable::from_json_str(text),
            Err(MaterialError::KeyNotOneChar { .. })
        ));
    }

    #[test]
    fn test_reserved_key_rejected() {
        let text = r#"{"solids": {}, "other": {"|": {"type": 2}}}"#;
        assert!(matches!(
            MaterialTable::from_json_str(text),
            Err(MaterialError::ReservedSymbol { symbol: '|', .. })
        ));
    }

    #[test]
    fn test_bad_type_rejected() {
        let text = r#"{"solids": {"A": {"type": 9}}, "other": {}}"#;
        assert!(matches!(
            MaterialTable::from_json_str(text),
            Err(MaterialError::Descriptor { symbol: 'A', .. })
        ));
    }

    #[test]
    fn test_insert_reserved_rejected() {
        let mut table = MaterialTable::default();
        let err = table
            .insert(MaterialMap::Other, '_', MaterialDescriptor::new(MaterialKind::Background))
            .unwrap_err();
        assert!(matches!(err, MaterialError::ReservedSymbol { .. }));
    }
}
