//! Room decoder — one `<room>` element → one RR room record.
//!
//! A room is either accepted whole or skipped whole. Grid shape problems and
//! missing coordinates skip the room; everything finer-grained degrades the
//! affected cell or object and is reported through [`Diagnostics`].

use serde::Serialize;
use thiserror::Error;
use xmltree::Element;

use crate::cell::{Backform, CellContext, CellEncoder};
use crate::constants::{grid, symbols, BACKWALL_SKY, PLAYER_OBJ_ID};
use crate::diagnostics::Diagnostics;
use crate::gamedata::{LayerTable, LocationOptions, UNDEFINED_LAYER};
use crate::geometry::{ColliderGrid, RoomCoords};
use crate::overrides::SolidOverrides;
use crate::tables;
use crate::xml::{attr, attr_int, children_named};

const CATEGORY: &str = "room";

// ── Output records ──────────────────────────────────────────────────────

/// A background object placed in a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackObject {
    pub coords: [i32; 2],
    pub id: String,
    #[serde(rename = "var", skip_serializing_if = "Option::is_none")]
    pub variant: Option<u32>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// One room of the output document. Field order is the output key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoomRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coords: Option<RoomCoords>,
    #[serde(skip_serializing_if = "is_false")]
    pub is_start: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liquid_level: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liquid_symbol: Option<char>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backwall: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lights_on: Option<i32>,
    pub cells: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub back_objs: Vec<BackObject>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub far_back_objs: Vec<BackObject>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub back_holes: Vec<BackObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spawn_coords: Option<[i32; 2]>,
}

/// Why a room was left out of the document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("missing coordinates")]
    MissingCoords,
    #[error("height is {found}, should be {}", grid::HEIGHT)]
    WrongHeight { found: usize },
    #[error("row {row}: width is {found}, should be {}", grid::WIDTH)]
    WrongWidth { row: usize, found: usize },
}

/// A decoded room plus what the location driver needs besides the record.
#[derive(Debug, Clone)]
pub struct DecodedRoom {
    pub record: RoomRecord,
    /// Human-readable name used in diagnostics.
    pub label: String,
    pub colliders: ColliderGrid,
    /// Longest encoded cell (only meaningful without padding).
    pub max_cell_len: usize,
}

#[derive(Debug, Clone)]
pub enum RoomOutcome {
    Accepted(DecodedRoom),
    Skipped(SkipReason),
}

// ── Options ─────────────────────────────────────────────────────────────

/// Strip the `t` prefix and snake-case a Remains texture id
/// (`tSampleText` → `sample_text`).
pub fn nicify_texture_name(name: &str) -> String {
    let name = name.strip_prefix('t').unwrap_or(name);
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
        }
        out.extend(c.to_lowercase());
    }
    match out.strip_prefix('_') {
        Some(stripped) => stripped.to_owned(),
        None => out,
    }
}

/// Resolved room-wide settings from `<options>` and location defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomOptions {
    pub liquid_symbol: char,
    /// Rows submerged from the bottom; only set when positive.
    pub liquid_level: Option<i32>,
    pub backform: Option<(Backform, char)>,
    /// Normalised backwall, omitted when a backform pattern is active.
    pub backwall: Option<String>,
    pub lights_on: Option<i32>,
}

/// Read a room's `<options>` child, falling back to location defaults.
pub fn parse_room_options(
    room: &Element,
    label: &str,
    location: &LocationOptions,
    diag: &mut Diagnostics,
) -> RoomOptions {
    let declared: Vec<&Element> = children_named(room, "options").collect();
    let node = match declared.as_slice() {
        [] => None,
        [single] => Some(*single),
        _ => {
            diag.error(
                CATEGORY,
                format!("{label}: multiple <options> nodes declared, ignoring all"),
            );
            None
        }
    };

    let mut liquid_symbol = location
        .liquid_symbol
        .unwrap_or_else(tables::default_liquid_symbol);
    let mut liquid_level = None;
    let mut backform = None;
    let mut room_backwall = None;
    let mut lights_on = None;

    if let Some(node) = node {
        if let Some(wtip) = attr_int(node, "wtip", label, diag) {
            match tables::liquid_symbol(wtip) {
                Some(symbol) => liquid_symbol = symbol,
                None => diag.warn(
                    CATEGORY,
                    format!("{label} has an unknown liquid type, ignoring"),
                ),
            }
        }

        // `wlevel` counts from the top (0 = fully submerged)
        if let Some(wlevel) = attr_int(node, "wlevel", label, diag) {
            match (grid::HEIGHT as i32).checked_sub(wlevel) {
                Some(level) if level > 0 => liquid_level = Some(level),
                Some(_) => {}
                None => diag.warn(
                    CATEGORY,
                    format!("{label} declares out of range \"wlevel\" ({wlevel}), ignoring"),
                ),
            }
        }

        if let Some(value) = attr(node, "backform") {
            match Backform::from_attr(value) {
                Some(pattern) => {
                    diag.verbose(
                        CATEGORY,
                        format!("{label} defines backform, adding background to some cells"),
                    );
                    backform = Some(pattern);
                }
                None => {
                    diag.warn(CATEGORY, format!("{label} defines unknown backform, ignoring"))
                }
            }
        }

        room_backwall = attr(node, "backwall");

        if let Some(lon) = attr_int(node, "lon", label, diag) {
            if lon != 1 && lon != -1 {
                diag.warn(CATEGORY, format!("{label} declares unexpected \"lon\" value ({lon})"));
            }
            lights_on = Some(lon);
        }
    }

    let backwall = match room_backwall {
        Some(BACKWALL_SKY) => None,
        Some(value) if !value.is_empty() => Some(value),
        _ => location.backwall.as_deref(),
    }
    .map(nicify_texture_name);

    let (backform, backwall) = match (backform, backwall) {
        (Some(pattern), Some(name)) => match tables::backform_backwall_symbol(&name) {
            Some(symbol) => (Some((pattern, symbol)), None),
            None => {
                diag.error(CATEGORY, format!("{label} no mapping found for {name}"));
                (None, None)
            }
        },
        (_, backwall) => (None, backwall),
    };

    RoomOptions {
        liquid_symbol,
        liquid_level,
        backform,
        backwall,
        lights_on,
    }
}

// ── Decoder ─────────────────────────────────────────────────────────────

/// Decodes the rooms of one location.
pub struct RoomDecoder<'a> {
    pub encoder: CellEncoder<'a>,
    pub layers: &'a LayerTable,
    pub location: &'a LocationOptions,
    /// Unique locations carry room coordinates.
    pub unique: bool,
    pub overrides: Option<&'a SolidOverrides>,
    pub pad: Option<usize>,
}

impl<'a> RoomDecoder<'a> {
    pub fn decode(&self, node: &Element, diag: &mut Diagnostics) -> RoomOutcome {
        let mut label = format!("\"{}\"", attr(node, "name").unwrap_or("?"));

        let coords = if self.unique {
            let x = attr_int(node, "x", &label, diag);
            let y = attr_int(node, "y", &label, diag);
            let (Some(x), Some(y)) = (x, y) else {
                return skip(&label, SkipReason::MissingCoords, diag);
            };
            // z is optional
            let z = attr_int(node, "z", &label, diag).unwrap_or(0);
            let coords = RoomCoords::new(x, y, z);
            label = format!("{label} {coords}");
            Some(coords)
        } else {
            None
        };

        let options = parse_room_options(node, &label, self.location, diag);

        let texts: Vec<String> = children_named(node, "a")
            .map(|row| row.get_text().map(|t| t.into_owned()).unwrap_or_default())
            .collect();
        if texts.len() != grid::HEIGHT {
            return skip(&label, SkipReason::WrongHeight { found: texts.len() }, diag);
        }
        let rows: Vec<Vec<&str>> = texts
            .iter()
            .map(|text| text.split(symbols::IN_DELIM).collect())
            .collect();
        if let Some((row, cells)) = rows.iter().enumerate().find(|(_, c)| c.len() != grid::WIDTH) {
            let reason = SkipReason::WrongWidth {
                row,
                found: cells.len(),
            };
            return skip(&label, reason, diag);
        }

        let ctx = CellContext {
            room: &label,
            liquid_symbol: options.liquid_symbol,
            liquid_level: options.liquid_level,
            backform: options.backform,
            pad: self.pad,
        };

        let delim = symbols::OUT_DELIM.to_string();
        let mut colliders = ColliderGrid::open();
        let mut max_cell_len = 0;
        let mut cells = Vec::with_capacity(grid::HEIGHT);
        for (y, row) in rows.iter().enumerate() {
            let mut strip = Vec::with_capacity(grid::WIDTH);
            for (x, legacy) in row.iter().enumerate() {
                let solid_override = coords
                    .zip(self.overrides)
                    .and_then(|(room, overrides)| overrides.get(room, x, y));
                let cell = self.encoder.encode(legacy, (x, y), &ctx, solid_override, diag);
                max_cell_len = max_cell_len.max(cell.len());
                colliders.set(x, y, cell.has_solid);
                strip.push(cell.symbols);
            }
            cells.push(strip.join(delim.as_str()));
        }

        let (back_objs, far_back_objs, back_holes) = self.back_objects(node, &label, diag);
        let spawn_coords = spawn_coords(node, &label, diag);

        let record = RoomRecord {
            coords,
            is_start: false,
            liquid_level: options.liquid_level,
            liquid_symbol: options.liquid_level.map(|_| options.liquid_symbol),
            backwall: options.backwall,
            lights_on: options.lights_on,
            cells,
            back_objs,
            far_back_objs,
            back_holes,
            spawn_coords,
        };

        RoomOutcome::Accepted(DecodedRoom {
            record,
            label,
            colliders,
            max_cell_len,
        })
    }

    /// Split `<back>` objects into normal, far (negative layer) and hole
    /// lists, each stably sorted by layer.
    fn back_objects(
        &self,
        node: &Element,
        label: &str,
        diag: &mut Diagnostics,
    ) -> (Vec<BackObject>, Vec<BackObject>, Vec<BackObject>) {
        let mut normal = Vec::new();
        let mut far = Vec::new();
        let mut holes = Vec::new();

        for back in children_named(node, "back") {
            let owner = format!("Room {label}: back object");
            let (Some(id), Some(x), Some(y)) = (
                attr(back, "id"),
                attr_int(back, "x", &owner, diag),
                attr_int(back, "y", &owner, diag),
            ) else {
                diag.warn(
                    CATEGORY,
                    format!("{owner} {:?} is missing attributes, skipping", attr(back, "id")),
                );
                continue;
            };

            let layer = self.layers.get(id).unwrap_or_else(|| {
                diag.warn(
                    CATEGORY,
                    format!("{owner} {id} is missing from AllData, assuming layer {UNDEFINED_LAYER}"),
                );
                UNDEFINED_LAYER
            });

            let (id, variant) = match tables::back_obj_variant(id) {
                Some((base, variant)) => (base, Some(variant)),
                None => (id, None),
            };
            let obj = BackObject {
                coords: [x, y],
                id: id.to_owned(),
                variant,
            };

            if tables::is_hole(id) {
                holes.push((layer, obj));
            } else if layer >= 0 {
                normal.push((layer, obj));
            } else {
                far.push((layer, obj));
            }
        }

        (by_layer(normal), by_layer(far), by_layer(holes))
    }
}

fn skip(label: &str, reason: SkipReason, diag: &mut Diagnostics) -> RoomOutcome {
    diag.warn(CATEGORY, format!("Room {label}: {reason}, skipping room"));
    RoomOutcome::Skipped(reason)
}

fn by_layer(mut objs: Vec<(i32, BackObject)>) -> Vec<BackObject> {
    // stable: source order is kept within a layer
    objs.sort_by_key(|(layer, _)| *layer);
    objs.into_iter().map(|(_, obj)| obj).collect()
}

fn spawn_coords(node: &Element, label: &str, diag: &mut Diagnostics) -> Option<[i32; 2]> {
    let mut spawn = None;
    for obj in children_named(node, "obj") {
        let owner = format!("Room {label}: object");
        let (Some(id), Some(x), Some(y)) = (
            attr(obj, "id"),
            attr_int(obj, "x", &owner, diag),
            attr_int(obj, "y", &owner, diag),
        ) else {
            diag.warn(
                CATEGORY,
                format!("{owner} {:?} is missing attributes, skipping", attr(obj, "id")),
            );
            continue;
        };

        if id == PLAYER_OBJ_ID {
            if spawn.is_some() {
                diag.warn(
                    CATEGORY,
                    format!("Room {label}: more than one player spawn, keeping last"),
                );
            }
            spawn = Some([x, y]);
        }
        // TODO: sort the remaining objects into static, movable, enemy, npc and area collections
    }
    spawn
}
