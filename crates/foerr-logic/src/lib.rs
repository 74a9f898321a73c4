//! Pure room-data translation logic for FoERR.
//!
//! Converts Remains room files (XML) into RR location documents (JSON cell
//! grids). Nothing here touches the file system: functions take parsed XML
//! elements, strings and tables, and return records plus collected
//! diagnostics, so the whole pipeline is unit-testable.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`cell`] | Cell encoder: one legacy cell token → one RR cell string |
//! | [`config`] | Import run configuration and validation |
//! | [`constants`] | Grid size, delimiters, sentinels, part-height flags, JSON keys |
//! | [`diagnostics`] | Severity-tagged diagnostics collected alongside logging |
//! | [`gamedata`] | Location options (GameData) and back-object layers (AllData) |
//! | [`geometry`] | Edge and passability checks between neighbouring rooms |
//! | [`json`] | Duplicate-key-rejecting reader, tab-indented writer |
//! | [`location`] | Location driver: output id, start room, document assembly |
//! | [`materials`] | Material table loaded from `materials.json` |
//! | [`overrides`] | Per-cell solid overrides for known authoring errors |
//! | [`padding`] | Re-padding cells of already written documents |
//! | [`room`] | Room decoder: options, cell grid, back objects, spawn |
//! | [`symbols`] | Injective legacy → canonical symbol maps |
//! | [`tables`] | Static name, background, liquid and back-object tables |
//! | [`xml`] | `xmltree` helpers |

pub mod cell;
pub mod config;
pub mod constants;
pub mod diagnostics;
pub mod gamedata;
pub mod geometry;
pub mod json;
pub mod location;
pub mod materials;
pub mod overrides;
pub mod padding;
pub mod room;
pub mod symbols;
pub mod tables;
pub mod xml;
