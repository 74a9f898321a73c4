//! Location driver — one Remains room file → one RR location document.
//!
//! Resolves the output id and location options, decodes every room, runs
//! geometry validation for unique locations and assembles the document.
//! Geometry errors are reported but keep the document; a missing start room
//! rejects the whole location.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;
use xmltree::Element;

use crate::cell::CellEncoder;
use crate::config::ImportConfig;
use crate::constants::versions;
use crate::diagnostics::Diagnostics;
use crate::gamedata::{LayerTable, LocationOptions};
use crate::geometry::{GeometryValidator, RoomCoords};
use crate::overrides::SolidOverrides;
use crate::room::{RoomDecoder, RoomOutcome, RoomRecord};
use crate::symbols::SymbolTables;
use crate::tables;
use crate::xml::{attr, children_named};

const CATEGORY: &str = "location";

/// The output document of one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationDocument {
    pub api_version: u32,
    pub version: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_full: Option<String>,
    pub rooms: Vec<RoomRecord>,
}

#[derive(Debug, Clone)]
pub struct TranslatedLocation {
    pub id: &'static str,
    pub document: LocationDocument,
    /// Longest encoded cell over all rooms (0 when padding).
    pub max_cell_len: usize,
    pub skipped_rooms: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("GameData does not contain data for {0}")]
    MissingOptions(String),
    #[error("starting room not specified")]
    StartRoomNotSpecified,
    #[error("start room {0} specified but not found")]
    StartRoomNotFound(RoomCoords),
}

#[derive(Debug, Clone)]
pub enum LocationOutcome {
    Translated(TranslatedLocation),
    Rejected(RejectReason),
    /// No output id for this basename; nothing was read.
    Untranslated,
}

/// Everything loaded once and shared by every location of a run.
pub struct ImportContext<'a> {
    pub symbols: &'a SymbolTables,
    pub locations: &'a BTreeMap<String, LocationOptions>,
    pub layers: &'a LayerTable,
    /// Keyed by output location id.
    pub overrides: &'a BTreeMap<String, SolidOverrides>,
    pub config: &'a ImportConfig,
}

/// Map a room-file basename to its output location id.
pub fn output_id(basename: &str, diag: &mut Diagnostics) -> Option<&'static str> {
    if let Some(id) = tables::location_id(basename) {
        return Some(id);
    }
    let message = format!("Location name \"{basename}\" not translated, skipping");
    if tables::is_expected_untranslated(basename) {
        diag.verbose(CATEGORY, message);
    } else {
        diag.warn(CATEGORY, message);
    }
    None
}

/// Unique locations are marked with `<land serial="1">`, either as the
/// document root or as its child.
pub fn is_unique(root: &Element) -> bool {
    let land = if root.name == "land" {
        Some(root)
    } else {
        root.get_child("land")
    };
    land.and_then(|l| attr(l, "serial")) == Some("1")
}

fn reject(reason: RejectReason, diag: &mut Diagnostics) -> LocationOutcome {
    diag.error(CATEGORY, format!("{reason}, skipping location"));
    LocationOutcome::Rejected(reason)
}

/// Translate the rooms document `root` read from `basename`.
pub fn translate_location(
    basename: &str,
    root: &Element,
    ctx: &ImportContext<'_>,
    diag: &mut Diagnostics,
) -> LocationOutcome {
    let Some(id) = output_id(basename, diag) else {
        return LocationOutcome::Untranslated;
    };
    let Some(options) = ctx.locations.get(basename) else {
        return reject(RejectReason::MissingOptions(basename.to_owned()), diag);
    };

    let unique = is_unique(root);
    let start_room = if unique {
        diag.info(CATEGORY, "Detected unique location");
        match options.start_room {
            // locz is never given
            Some((x, y)) => Some(RoomCoords::new(x, y, 0)),
            None => return reject(RejectReason::StartRoomNotSpecified, diag),
        }
    } else {
        diag.info(CATEGORY, "Detected grind location");
        None
    };

    let decoder = RoomDecoder {
        encoder: CellEncoder::new(ctx.symbols),
        layers: ctx.layers,
        location: options,
        unique,
        overrides: ctx.overrides.get(id),
        pad: ctx.config.pad,
    };

    let mut geometry = GeometryValidator::new();
    let mut rooms = Vec::new();
    let mut skipped_rooms = 0;
    let mut max_cell_len = 0;
    let mut start_found = false;

    for node in children_named(root, "room") {
        let mut decoded = match decoder.decode(node, diag) {
            RoomOutcome::Accepted(decoded) => decoded,
            RoomOutcome::Skipped(_) => {
                skipped_rooms += 1;
                continue;
            }
        };

        if let Some(coords) = decoded.record.coords {
            if Some(coords) == start_room {
                decoded.record.is_start = true;
                start_found = true;
            }
            for err in geometry.add_room(coords, &decoded.label, decoded.colliders) {
                diag.push(err.category, err.severity, err.message);
            }
        }

        if ctx.config.pad.is_none() {
            max_cell_len = max_cell_len.max(decoded.max_cell_len);
        }
        rooms.push(decoded.record);
    }

    if let Some(coords) = start_room {
        if !start_found {
            return reject(RejectReason::StartRoomNotFound(coords), diag);
        }
    }

    log::debug!("{id}: {} rooms translated, {skipped_rooms} skipped", rooms.len());

    LocationOutcome::Translated(TranslatedLocation {
        id,
        document: LocationDocument {
            api_version: versions::API_VERSION,
            version: versions::DOCUMENT_VERSION,
            background_full: options.background_full.clone(),
            rooms,
        },
        max_cell_len,
        skipped_rooms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use crate::materials::{MaterialDescriptor, MaterialKind, MaterialMap, MaterialTable};
    use crate::xml::parse_document;

    fn symbols() -> SymbolTables {
        let mut t = MaterialTable::default();
        t.insert(MaterialMap::Solids, 'A', MaterialDescriptor::new(MaterialKind::Solid))
            .unwrap();
        for (_, s) in tables::LIQUID_TYPES {
            t.insert(MaterialMap::Other, *s, MaterialDescriptor::new(MaterialKind::Liquid))
                .unwrap();
        }
        SymbolTables::load(t, &mut Diagnostics::new()).unwrap()
    }

    /// A 48×25 room whose cells are all `cell`.
    fn make_room(attrs: &str, cell: &str) -> String {
        let row = vec![cell; 48].join(".");
        let rows: String = (0..25).map(|_| format!("<a>{row}</a>")).collect();
        format!("<room {attrs}>{rows}</room>")
    }

    struct Fixture {
        symbols: SymbolTables,
        locations: BTreeMap<String, LocationOptions>,
        layers: LayerTable,
        overrides: BTreeMap<String, SolidOverrides>,
        config: ImportConfig,
    }

    impl Fixture {
        fn new(start_room: Option<(i32, i32)>) -> Self {
            let mut locations = BTreeMap::new();
            locations.insert(
                "rooms_sewer".to_owned(),
                LocationOptions {
                    background_full: Some("manehattan".into()),
                    start_room,
                    ..Default::default()
                },
            );
            Self {
                symbols: symbols(),
                locations,
                layers: LayerTable::default(),
                overrides: BTreeMap::new(),
                config: ImportConfig::default(),
            }
        }

        fn run(&self, basename: &str, xml: &str, diag: &mut Diagnostics) -> LocationOutcome {
            let ctx = ImportContext {
                symbols: &self.symbols,
                locations: &self.locations,
                layers: &self.layers,
                overrides: &self.overrides,
                config: &self.config,
            };
            let root = parse_document(xml).unwrap();
            translate_location(basename, &root, &ctx, diag)
        }
    }

    #[test]
    fn test_output_id() {
        let mut diag = Diagnostics::new();
        assert_eq!(output_id("rooms_begin", &mut diag), Some("technical_tunnels"));
        assert_eq!(output_id("z_shablon", &mut diag), None);
        assert_eq!(diag.count(Severity::Verbose), 1);
        assert_eq!(output_id("rooms_nope", &mut diag), None);
        assert_eq!(diag.count(Severity::Warning), 1);
    }

    #[test]
    fn test_unique_detection() {
        assert!(is_unique(&parse_document(r#"<all><land serial="1"/></all>"#).unwrap()));
        assert!(is_unique(&parse_document(r#"<land serial="1"/>"#).unwrap()));
        assert!(!is_unique(&parse_document(r#"<all><land serial="0"/></all>"#).unwrap()));
        assert!(!is_unique(&parse_document("<all/>").unwrap()));
    }

    #[test]
    fn test_untranslated_and_missing_options() {
        let fixture = Fixture::new(None);
        let mut diag = Diagnostics::new();
        assert!(matches!(
            fixture.run("rooms2", "<all/>", &mut diag),
            LocationOutcome::Untranslated
        ));
        assert!(matches!(
            fixture.run("rooms_begin", "<all/>", &mut diag),
            LocationOutcome::Rejected(RejectReason::MissingOptions(_))
        ));
    }

    #[test]
    fn test_grind_location() {
        let fixture = Fixture::new(None);
        let xml = format!(
            "<all>{}{}</all>",
            make_room(r#"name="a""#, "_"),
            make_room(r#"name="b""#, "A")
        );
        let mut diag = Diagnostics::new();
        let LocationOutcome::Translated(loc) = fixture.run("rooms_sewer", &xml, &mut diag) else {
            panic!("location not translated");
        };
        assert_eq!(loc.id, "sewers");
        assert_eq!(loc.document.rooms.len(), 2);
        assert!(loc.document.rooms.iter().all(|r| r.coords.is_none() && !r.is_start));
        assert_eq!(loc.document.background_full.as_deref(), Some("manehattan"));
        assert_eq!(loc.max_cell_len, 1);
        assert_eq!(diag.errors().count(), 0);
    }

    #[test]
    fn test_start_room_marked() {
        let fixture = Fixture::new(Some((1, 0)));
        let xml = format!(
            r#"<all><land serial="1"/>{}{}</all>"#,
            make_room(r#"name="a" x="0" y="0""#, "_"),
            make_room(r#"name="b" x="1" y="0""#, "_")
        );
        let mut diag = Diagnostics::new();
        let LocationOutcome::Translated(loc) = fixture.run("rooms_sewer", &xml, &mut diag) else {
            panic!("location not translated");
        };
        let starts: Vec<_> = loc.document.rooms.iter().map(|r| r.is_start).collect();
        assert_eq!(starts, vec![false, true]);
        assert_eq!(diag.errors().count(), 0);
    }

    #[test]
    fn test_start_room_missing() {
        let fixture = Fixture::new(Some((5, 5)));
        let xml = format!(r#"<all><land serial="1"/>{}</all>"#, make_room(r#"x="0" y="0""#, "_"));
        let mut diag = Diagnostics::new();
        assert!(matches!(
            fixture.run("rooms_sewer", &xml, &mut diag),
            LocationOutcome::Rejected(RejectReason::StartRoomNotFound(_))
        ));

        let fixture = Fixture::new(None);
        assert!(matches!(
            fixture.run("rooms_sewer", &xml, &mut diag),
            LocationOutcome::Rejected(RejectReason::StartRoomNotSpecified)
        ));
    }

    #[test]
    fn test_geometry_errors_reported_not_fatal() {
        let fixture = Fixture::new(Some((0, 0)));
        // solid room next to an open room: every row of the shared edge mismatches
        let xml = format!(
            r#"<all><land serial="1"/>{}{}</all>"#,
            make_room(r#"x="0" y="0""#, "A"),
            make_room(r#"x="1" y="0""#, "_")
        );
        let mut diag = Diagnostics::new();
        let LocationOutcome::Translated(loc) = fixture.run("rooms_sewer", &xml, &mut diag) else {
            panic!("location not translated");
        };
        assert_eq!(loc.document.rooms.len(), 2);
        assert_eq!(diag.errors().count(), 25);
        assert!(diag.errors().all(|d| d.category == "geometry"));
    }

    #[test]
    fn test_skipped_room_counted() {
        let fixture = Fixture::new(None);
        let xml = format!("<all>{}<room name=\"short\"><a>_</a></room></all>", make_room("", "_"));
        let mut diag = Diagnostics::new();
        let LocationOutcome::Translated(loc) = fixture.run("rooms_sewer", &xml, &mut diag) else {
            panic!("location not translated");
        };
        assert_eq!(loc.document.rooms.len(), 1);
        assert_eq!(loc.skipped_rooms, 1);
    }
}
