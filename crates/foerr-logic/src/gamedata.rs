//! Location options (GameData) and back-object layers (AllData).
//!
//! Both files are extracted from the Remains sources as plain XML. Only the
//! attributes the translator needs are kept; everything else is ignored.

use std::collections::{BTreeMap, HashMap};

use xmltree::Element;

use crate::constants::BACKWALL_SKY;
use crate::diagnostics::Diagnostics;
use crate::tables;
use crate::xml::{attr, attr_int, children_named};

/// Per-location defaults, keyed by the room-file basename.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationOptions {
    /// Already translated when the id is known.
    pub background_full: Option<String>,
    /// Raw backwall texture id; `sky` is stored as `None`.
    pub backwall: Option<String>,
    /// `(locx, locy)`; `z` is never given and is always 0.
    pub start_room: Option<(i32, i32)>,
    pub liquid_symbol: Option<char>,
}

/// Read every `<land>` element of GameData.
pub fn parse_game_data(
    root: &Element,
    diag: &mut Diagnostics,
) -> BTreeMap<String, LocationOptions> {
    let mut out = BTreeMap::new();
    for land in children_named(root, "land") {
        let Some(file) = attr(land, "file") else {
            diag.warn("gamedata", "GameData <land/> is missing \"file\" attribute, skipping");
            continue;
        };

        let mut options = LocationOptions::default();

        let locx = attr_int(land, "locx", file, diag);
        let locy = attr_int(land, "locy", file, diag);
        match (locx, locy) {
            (Some(x), Some(y)) => options.start_room = Some((x, y)),
            (None, None) => {}
            _ => diag.warn(
                "gamedata",
                format!("{file}: start room needs both \"locx\" and \"locy\", ignoring"),
            ),
        }

        if let Some(node) = land.get_child("options") {
            if let Some(fon) = attr(node, "fon") {
                let name = match tables::background_full_name(fon) {
                    Some(name) => name.to_owned(),
                    None => {
                        diag.warn("gamedata", format!("Background name \"{fon}\" not translated"));
                        fon.to_owned()
                    }
                };
                options.background_full = Some(name);
            }

            // both mean "no backwall"
            options.backwall = attr(node, "backwall")
                .filter(|b| !b.is_empty() && *b != BACKWALL_SKY)
                .map(str::to_owned);

            if let Some(wtip) = attr_int(node, "wtip", file, diag) {
                match tables::liquid_symbol(wtip) {
                    Some(symbol) => options.liquid_symbol = Some(symbol),
                    None => diag.warn(
                        "gamedata",
                        format!("{file} has an unknown liquid, ignoring"),
                    ),
                }
            }
        }

        if out.insert(file.to_owned(), options).is_some() {
            diag.warn(
                "gamedata",
                format!("Duplicate <land/> file=\"{file}\" in GameData, keeping last"),
            );
        }
    }
    log::debug!("Loaded options for {} locations", out.len());
    out
}

/// Back-object id → drawing layer. Negative layers are behind the backwall.
#[derive(Debug, Clone, Default)]
pub struct LayerTable {
    layers: HashMap<String, i32>,
}

/// Layer assumed when AllData does not give one.
pub const UNDEFINED_LAYER: i32 = 0;

impl LayerTable {
    pub fn get(&self, id: &str) -> Option<i32> {
        self.layers.get(id).copied()
    }

    pub fn insert(&mut self, id: impl Into<String>, layer: i32) {
        self.layers.insert(id.into(), layer);
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// Read every `<back>` element of AllData.
pub fn parse_all_data(root: &Element, diag: &mut Diagnostics) -> LayerTable {
    let mut table = LayerTable::default();
    for back in children_named(root, "back") {
        let Some(id) = attr(back, "id") else {
            diag.warn("alldata", "AllData <back/> is missing \"id\" attribute, skipping");
            continue;
        };
        // AllData stores comments as entries with an empty id
        if id.is_empty() {
            continue;
        }

        let owner = format!("AllData <back/> id=\"{id}\"");
        let layer = match attr(back, "s") {
            Some(_) => attr_int(back, "s", &owner, diag).unwrap_or(UNDEFINED_LAYER),
            None => {
                diag.verbose(
                    "alldata",
                    format!("{owner} is missing \"s\" attribute, assuming {UNDEFINED_LAYER}"),
                );
                UNDEFINED_LAYER
            }
        };

        if table.get(id).is_some() {
            diag.warn("alldata", format!("Duplicate <back/> id=\"{id}\" in AllData, skipping"));
            continue;
        }
        table.insert(id, layer);
    }
    log::debug!("Loaded layers for {} back objects", table.len());
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use crate::xml::parse_document;

    const GAME_DATA: &str = r#"<all>
        <land id="sewer" file="rooms_sewer" locx="2" locy="3">
            <options fon="fonRuins" backwall="tBricks" wtip="3"/>
        </land>
        <land id="surf" file="rooms_surf">
            <options fon="fonUnknown" backwall="sky" wtip="9"/>
        </land>
        <land id="bare" file="rooms_bare">
            <options backwall=""/>
        </land>
        <land id="broken" locx="1"/>
        <land id="half" file="rooms_half" locx="1"/>
    </all>"#;

    #[test]
    fn test_game_data() {
        let root = parse_document(GAME_DATA).unwrap();
        let mut diag = Diagnostics::new();
        let locs = parse_game_data(&root, &mut diag);

        assert_eq!(locs.len(), 4);
        let sewer = &locs["rooms_sewer"];
        assert_eq!(sewer.background_full.as_deref(), Some("manehattan"));
        assert_eq!(sewer.backwall.as_deref(), Some("tBricks"));
        assert_eq!(sewer.start_room, Some((2, 3)));
        assert_eq!(sewer.liquid_symbol, Some('$'));

        let surf = &locs["rooms_surf"];
        assert_eq!(surf.background_full.as_deref(), Some("fonUnknown"));
        assert_eq!(surf.backwall, None);
        assert_eq!(surf.start_room, None);
        assert_eq!(surf.liquid_symbol, None);

        assert_eq!(locs["rooms_bare"].backwall, None);
        assert_eq!(locs["rooms_half"].start_room, None);

        // untranslated fon, unknown wtip, missing file, half a start room
        assert_eq!(diag.count(Severity::Warning), 4);
    }

    #[test]
    fn test_all_data() {
        let root = parse_document(
            r#"<all>
                <back id="lamp" s="2"/>
                <back id="far" s="-1"/>
                <back id="noLayer"/>
                <back id=""/>
                <back s="3"/>
                <back id="lamp" s="5"/>
            </all>"#,
        )
        .unwrap();
        let mut diag = Diagnostics::new();
        let layers = parse_all_data(&root, &mut diag);

        assert_eq!(layers.len(), 3);
        assert_eq!(layers.get("lamp"), Some(2));
        assert_eq!(layers.get("far"), Some(-1));
        assert_eq!(layers.get("noLayer"), Some(0));
        assert_eq!(layers.get("missing"), None);
        assert_eq!(diag.count(Severity::Warning), 2);
        assert_eq!(diag.count(Severity::Verbose), 1);
    }
}
