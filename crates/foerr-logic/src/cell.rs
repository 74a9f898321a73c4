//! Cell encoder — one legacy cell token → one RR cell string.
//!
//! A legacy cell is a solid slot followed by a run of feature characters
//! (background, ladder, platform, stairs, liquid, part-height flags). The
//! encoder keeps at most one feature of each kind, drops combinations that
//! make no sense, and never fails: anything it cannot translate becomes the
//! unknown sentinel.

use crate::constants::{backform, grid, part_height, symbols};
use crate::diagnostics::Diagnostics;
use crate::materials::{MaterialKind, MaterialMap};
use crate::symbols::{SymbolTables, Translation};

const CATEGORY: &str = "cell";

/// Partial-backwall pattern selected by a room's `backform` option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backform {
    /// `backform="1"`: left and right strips, 11 cells wide incl. border.
    SideStrips,
    /// `backform="2"`: bottom strip, 9 cells high incl. border.
    BottomStrip,
}

impl Backform {
    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "1" => Some(Backform::SideStrips),
            "2" => Some(Backform::BottomStrip),
            _ => None,
        }
    }

    pub fn covers(self, x: usize, y: usize) -> bool {
        match self {
            Backform::SideStrips => {
                x < backform::LEFT_STRIP_END || x > backform::RIGHT_STRIP_START
            }
            Backform::BottomStrip => y > backform::BOTTOM_STRIP_START,
        }
    }
}

/// Room-level state the encoder needs for every cell.
#[derive(Debug, Clone)]
pub struct CellContext<'a> {
    /// Room label used in diagnostics.
    pub room: &'a str,
    /// Symbol the legacy liquid marker is re-encoded to.
    pub liquid_symbol: char,
    /// Rows submerged from the bottom, if the room declares a liquid level.
    pub liquid_level: Option<i32>,
    /// Active backform pattern and the background symbol it injects.
    pub backform: Option<(Backform, char)>,
    /// Fixed cell width, if padding was requested.
    pub pad: Option<usize>,
}

/// One encoded cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedCell {
    pub symbols: String,
    /// Whether the cell is a collider (used by geometry validation).
    pub has_solid: bool,
}

impl EncodedCell {
    pub fn len(&self) -> usize {
        self.symbols.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[derive(Debug, Default)]
struct Slots {
    solid: bool,
    background: bool,
    ladder: bool,
    platform: bool,
    stairs: bool,
    liquid: bool,
    part_height: bool,
}

/// Stateless encoder over the loaded symbol tables.
#[derive(Debug, Clone, Copy)]
pub struct CellEncoder<'a> {
    tables: &'a SymbolTables,
}

impl<'a> CellEncoder<'a> {
    pub fn new(tables: &'a SymbolTables) -> Self {
        Self { tables }
    }

    /// Encode `legacy` found at `(x, y)`. `solid_override` replaces the solid
    /// slot when a known authoring error is being patched.
    pub fn encode(
        &self,
        legacy: &str,
        (x, y): (usize, usize),
        ctx: &CellContext<'_>,
        solid_override: Option<char>,
        diag: &mut Diagnostics,
    ) -> EncodedCell {
        let prefix = format!("Room {} at ({x}, {y}): ", ctx.room);
        let mut out = String::new();
        let mut slots = Slots::default();

        let mut chars = legacy.chars();
        let first = chars.next();
        let rest = chars.as_str();

        match (solid_override, first) {
            (Some(symbol), _) => {
                out.push(symbol);
                slots.solid = symbol != symbols::EMPTY && symbol != symbols::UNKNOWN;
            }
            (None, None) => {
                diag.warn(CATEGORY, format!("{prefix}empty cell token"));
                out.push(symbols::EMPTY);
            }
            (None, Some(symbols::EMPTY)) => out.push(symbols::EMPTY),
            (None, Some(c)) => {
                slots.solid = self.encode_solid(c, &prefix, &mut out, diag);
            }
        }

        // liquid eligibility and flag skipping depend on any flag in the cell,
        // not just the ones seen so far
        let has_any_part_height = rest.chars().any(part_height::is_flag);
        let skip_height_flags = !slots.solid && has_any_part_height;
        if skip_height_flags {
            diag.warn(
                CATEGORY,
                format!("{prefix}height flag defined, but no solid found, skipping height flag"),
            );
        }

        for c in rest.chars() {
            if part_height::is_flag(c) {
                if skip_height_flags {
                    continue;
                }
                if slots.part_height {
                    diag.warn(
                        CATEGORY,
                        format!("{prefix}more than one height flag defined, skipping rest"),
                    );
                    continue;
                }
                slots.part_height = true;
                out.push(c);
                continue;
            }

            if c == symbols::LEGACY_LIQUID {
                if self.accept_liquid(&mut slots, has_any_part_height, y, ctx, &prefix, diag) {
                    out.push(ctx.liquid_symbol);
                }
                continue;
            }

            let canonical = match self.tables.translate(MaterialMap::Other, c) {
                Translation::Known(canonical) => canonical,
                Translation::Unknown => {
                    diag.warn(CATEGORY, format!("{prefix}unknown symbol: {c:?}"));
                    out.push(symbols::UNKNOWN);
                    continue;
                }
            };
            let kind = match self.tables.material(MaterialMap::Other, canonical) {
                Ok(material) => material.kind,
                Err(err) => {
                    diag.warn(CATEGORY, format!("{prefix}{err}, skipping symbol"));
                    out.push(symbols::UNKNOWN);
                    continue;
                }
            };
            let accepted = self.accept_feature(
                kind,
                c,
                &mut slots,
                has_any_part_height,
                y,
                ctx,
                &prefix,
                diag,
            );
            if accepted {
                out.push(canonical);
            }
        }

        if let Some((pattern, symbol)) = ctx.backform {
            if !slots.background && pattern.covers(x, y) {
                out.push(symbol);
            }
        }

        if let Some(pad) = ctx.pad {
            out = pad_cell(out, pad, &prefix, diag);
        }

        EncodedCell {
            symbols: out,
            has_solid: slots.solid,
        }
    }

    /// Returns whether a real solid was placed.
    fn encode_solid(
        &self,
        legacy: char,
        prefix: &str,
        out: &mut String,
        diag: &mut Diagnostics,
    ) -> bool {
        let canonical = match self.tables.translate(MaterialMap::Solids, legacy) {
            Translation::Known(canonical) => canonical,
            Translation::Unknown => {
                diag.warn(CATEGORY, format!("{prefix}unknown solid: {legacy:?}"));
                out.push(symbols::UNKNOWN);
                return false;
            }
        };
        match self.tables.material(MaterialMap::Solids, canonical) {
            Ok(material) if material.kind == MaterialKind::Solid => {
                out.push(canonical);
                true
            }
            Ok(_) => {
                diag.warn(
                    CATEGORY,
                    format!("{prefix}symbol in solid slot ({canonical:?}) is not a solid, skipping symbol"),
                );
                out.push(symbols::UNKNOWN);
                false
            }
            Err(err) => {
                diag.warn(CATEGORY, format!("{prefix}{err}, skipping symbol"));
                out.push(symbols::UNKNOWN);
                false
            }
        }
    }

    fn accept_liquid(
        &self,
        slots: &mut Slots,
        has_any_part_height: bool,
        y: usize,
        ctx: &CellContext<'_>,
        prefix: &str,
        diag: &mut Diagnostics,
    ) -> bool {
        if slots.liquid {
            diag.warn(CATEGORY, format!("{prefix}more than one liquid defined, skipping rest"));
            return false;
        }
        if slots.solid && !has_any_part_height {
            diag.verbose(
                CATEGORY,
                format!("{prefix}liquid defined for full-sized cell containing a solid, skipping liquid"),
            );
            return false;
        }
        if let Some(level) = ctx.liquid_level {
            if i64::from(level) >= grid::HEIGHT.saturating_sub(y) as i64 {
                diag.verbose(
                    CATEGORY,
                    format!("{prefix}liquid defined, but room-wide liquid level is already {level}, skipping cell liquid"),
                );
                return false;
            }
        }
        slots.liquid = true;
        true
    }

    #[allow(clippy::too_many_arguments)]
    fn accept_feature(
        &self,
        kind: MaterialKind,
        legacy: char,
        slots: &mut Slots,
        has_any_part_height: bool,
        y: usize,
        ctx: &CellContext<'_>,
        prefix: &str,
        diag: &mut Diagnostics,
    ) -> bool {
        match kind {
            MaterialKind::Background => {
                if slots.background {
                    diag.warn(
                        CATEGORY,
                        format!("{prefix}more than one background defined, skipping rest"),
                    );
                    return false;
                }
                slots.background = true;
            }
            MaterialKind::Ladder => {
                if slots.ladder {
                    diag.warn(
                        CATEGORY,
                        format!("{prefix}more than one ladder defined, skipping rest"),
                    );
                    return false;
                }
                if slots.solid {
                    diag.warn(
                        CATEGORY,
                        format!("{prefix}ladder found ({legacy:?}), but a solid is already defined for cell, skipping ladder"),
                    );
                    return false;
                }
                if slots.platform || slots.stairs {
                    diag.warn(
                        CATEGORY,
                        format!("{prefix}ladder found ({legacy:?}), but platform or stairs are already defined for cell, skipping ladder"),
                    );
                    return false;
                }
                slots.ladder = true;
            }
            MaterialKind::Platform => {
                if slots.platform {
                    diag.warn(
                        CATEGORY,
                        format!("{prefix}more than one platform defined, skipping rest"),
                    );
                    return false;
                }
                if slots.solid {
                    // legacy rooms do this; the cell behaves like a plain solid
                    diag.info(
                        CATEGORY,
                        format!("{prefix}platform found ({legacy:?}), but a solid is already defined for cell, skipping platform"),
                    );
                    return false;
                }
                if slots.stairs || slots.ladder {
                    diag.warn(
                        CATEGORY,
                        format!("{prefix}platform found ({legacy:?}), but stairs or ladder are already defined for cell, skipping platform"),
                    );
                    return false;
                }
                slots.platform = true;
            }
            MaterialKind::Stairs => {
                if slots.stairs {
                    diag.warn(
                        CATEGORY,
                        format!("{prefix}more than one stairs defined, skipping rest"),
                    );
                    return false;
                }
                if slots.solid {
                    diag.warn(
                        CATEGORY,
                        format!("{prefix}stairs found ({legacy:?}), but a solid is already defined for cell, skipping stairs"),
                    );
                    return false;
                }
                if slots.platform || slots.ladder {
                    diag.warn(
                        CATEGORY,
                        format!("{prefix}stairs found ({legacy:?}), but platform or ladder are already defined for cell, skipping stairs"),
                    );
                    return false;
                }
                slots.stairs = true;
            }
            MaterialKind::Liquid => {
                return self.accept_liquid(slots, has_any_part_height, y, ctx, prefix, diag);
            }
            MaterialKind::Solid => {
                diag.warn(
                    CATEGORY,
                    format!("{prefix}solid symbol ({legacy:?}) outside of solid slot, skipping"),
                );
                return false;
            }
        }
        true
    }
}

/// Truncate or right-pad `cell` to exactly `pad` characters.
pub fn pad_cell(cell: String, pad: usize, prefix: &str, diag: &mut Diagnostics) -> String {
    let len = cell.chars().count();
    if len > pad {
        diag.warn(
            CATEGORY,
            format!("{prefix}cell is wider than requested pad size, trimming"),
        );
        return cell.chars().take(pad).collect();
    }
    let mut cell = cell;
    cell.extend(std::iter::repeat(symbols::EMPTY).take(pad - len));
    cell
}
