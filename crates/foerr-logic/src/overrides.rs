//! Solid overrides — per-cell patches for known authoring errors in unique
//! locations.
//!
//! ```json
//! { "sewers": [ { "room": [1, 0, 0], "cell": [12, 20], "symbol": "A" } ] }
//! ```

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use thiserror::Error;

use crate::constants::{grid, symbols};
use crate::geometry::RoomCoords;
use crate::json;

#[derive(Debug, Error)]
pub enum OverrideError {
    #[error("overrides file is not valid: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{location}: override symbol {symbol:?} is not a single character")]
    SymbolNotOneChar { location: String, symbol: String },
    #[error("{location}: override symbol {symbol:?} is a delimiter")]
    Delimiter { location: String, symbol: char },
    #[error("{location}: override cell ({x}, {y}) is outside the room grid")]
    OutOfGrid { location: String, x: usize, y: usize },
    #[error("{location}: cell ({x}, {y}) of room {room} is overridden twice")]
    Duplicate {
        location: String,
        room: RoomCoords,
        x: usize,
        y: usize,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct OverrideEntry {
    room: [i32; 3],
    cell: [usize; 2],
    symbol: String,
}

/// Overrides for one location.
#[derive(Debug, Clone, Default)]
pub struct SolidOverrides {
    cells: HashMap<(RoomCoords, usize, usize), char>,
}

impl SolidOverrides {
    /// Replacement solid symbol for cell `(x, y)` of `room`, if any.
    pub fn get(&self, room: RoomCoords, x: usize, y: usize) -> Option<char> {
        self.cells.get(&(room, x, y)).copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Parse the overrides file, keyed by output location id.
pub fn parse_overrides(text: &str) -> Result<BTreeMap<String, SolidOverrides>, OverrideError> {
    let raw: BTreeMap<String, Vec<OverrideEntry>> = json::from_str_strict(text)?;

    let mut out = BTreeMap::new();
    for (location, entries) in raw {
        let mut overrides = SolidOverrides::default();
        for entry in entries {
            let mut chars = entry.symbol.chars();
            let symbol = match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => {
                    return Err(OverrideError::SymbolNotOneChar {
                        location,
                        symbol: entry.symbol,
                    })
                }
            };
            if symbol == symbols::IN_DELIM || symbol == symbols::OUT_DELIM {
                return Err(OverrideError::Delimiter { location, symbol });
            }

            let [x, y] = entry.cell;
            if x >= grid::WIDTH || y >= grid::HEIGHT {
                return Err(OverrideError::OutOfGrid { location, x, y });
            }

            let [rx, ry, rz] = entry.room;
            let room = RoomCoords::new(rx, ry, rz);
            if overrides.cells.insert((room, x, y), symbol).is_some() {
                return Err(OverrideError::Duplicate { location, room, x, y });
            }
        }
        out.insert(location, overrides);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let text = r#"{
            "sewers": [
                {"room": [1, 0, 0], "cell": [12, 20], "symbol": "A"},
                {"room": [1, 0, 0], "cell": [13, 20], "symbol": "_"}
            ],
            "surface": []
        }"#;
        let all = parse_overrides(text).unwrap();
        let sewers = &all["sewers"];
        assert_eq!(sewers.len(), 2);
        assert_eq!(sewers.get(RoomCoords::new(1, 0, 0), 12, 20), Some('A'));
        assert_eq!(sewers.get(RoomCoords::new(1, 0, 0), 12, 21), None);
        assert_eq!(sewers.get(RoomCoords::new(0, 0, 0), 12, 20), None);
        assert!(all["surface"].is_empty());
    }

    #[test]
    fn test_duplicate_location_key_rejected() {
        let text = r#"{"sewers": [], "sewers": []}"#;
        assert!(matches!(parse_overrides(text), Err(OverrideError::Json(_))));
    }

    #[test]
    fn test_duplicate_cell_rejected() {
        let text = r#"{"sewers": [
            {"room": [0, 0, 0], "cell": [1, 1], "symbol": "A"},
            {"room": [0, 0, 0], "cell": [1, 1], "symbol": "B"}
        ]}"#;
        assert!(matches!(parse_overrides(text), Err(OverrideError::Duplicate { x: 1, y: 1, .. })));
    }

    #[test]
    fn test_bad_entries_rejected() {
        let long = r#"{"a": [{"room": [0, 0, 0], "cell": [1, 1], "symbol": "AB"}]}"#;
        assert!(matches!(parse_overrides(long), Err(OverrideError::SymbolNotOneChar { .. })));

        let delim = r#"{"a": [{"room": [0, 0, 0], "cell": [1, 1], "symbol": "|"}]}"#;
        assert!(matches!(parse_overrides(delim), Err(OverrideError::Delimiter { .. })));

        let outside = r#"{"a": [{"room": [0, 0, 0], "cell": [48, 1], "symbol": "A"}]}"#;
        assert!(matches!(parse_overrides(outside), Err(OverrideError::OutOfGrid { x: 48, .. })));
    }
}
