//! Legacy → canonical symbol translation.
//!
//! Each material may name the symbol Remains used for it (`legacy_symbol`);
//! materials without one keep their canonical symbol. Both maps must be
//! injective, otherwise the whole load fails.

use std::collections::HashMap;

use thiserror::Error;

use crate::diagnostics::Diagnostics;
use crate::materials::{MaterialDescriptor, MaterialError, MaterialKind, MaterialMap, MaterialTable};
use crate::tables;

/// Result of translating one legacy symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Translation {
    Known(char),
    /// No material claims this legacy symbol; encode as the unknown sentinel.
    Unknown,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SymbolError {
    #[error("{map} symbols map contains non-unique values (legacy {legacy:?} claimed by {first:?} and {second:?})")]
    NotInjective {
        map: &'static str,
        legacy: char,
        first: char,
        second: char,
    },
}

/// One legacy → canonical map.
#[derive(Debug, Clone, Default)]
pub struct SymbolMap {
    forward: HashMap<char, char>,
}

impl SymbolMap {
    fn build(
        materials: &MaterialTable,
        map: MaterialMap,
        diag: &mut Diagnostics,
    ) -> Result<Self, SymbolError> {
        let mut forward: HashMap<char, char> = HashMap::new();
        for (canonical, material) in materials.entries(map) {
            let legacy = match legacy_char(material) {
                LegacyChar::Own => canonical,
                LegacyChar::Single(c) => c,
                LegacyChar::Invalid(text) => {
                    // multi-character ids are Remains special objects, not cell symbols
                    diag.warn(
                        "symbols",
                        format!(
                            "{} material {canonical:?} has legacy symbol {text:?} which is not a single character, ignoring",
                            map.label()
                        ),
                    );
                    continue;
                }
            };
            if let Some(first) = forward.get(&legacy) {
                return Err(SymbolError::NotInjective {
                    map: map.label(),
                    legacy,
                    first: *first,
                    second: canonical,
                });
            }
            forward.insert(legacy, canonical);
        }
        Ok(Self { forward })
    }

    pub fn translate(&self, legacy: char) -> Translation {
        match self.forward.get(&legacy) {
            Some(canonical) => Translation::Known(*canonical),
            None => Translation::Unknown,
        }
    }

    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

enum LegacyChar<'a> {
    Own,
    Single(char),
    Invalid(&'a str),
}

fn legacy_char(material: &MaterialDescriptor) -> LegacyChar<'_> {
    let Some(text) = material.legacy_symbol.as_deref() else {
        return LegacyChar::Own;
    };
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => LegacyChar::Single(c),
        _ => LegacyChar::Invalid(text),
    }
}

/// Material table plus both translation maps, immutable after load.
#[derive(Debug, Clone)]
pub struct SymbolTables {
    materials: MaterialTable,
    solids: SymbolMap,
    other: SymbolMap,
}

impl SymbolTables {
    /// Build both maps and sanity-check the liquids the encoder can emit.
    pub fn load(materials: MaterialTable, diag: &mut Diagnostics) -> Result<Self, SymbolError> {
        let solids = SymbolMap::build(&materials, MaterialMap::Solids, diag)?;
        let other = SymbolMap::build(&materials, MaterialMap::Other, diag)?;

        for (wtip, symbol) in tables::LIQUID_TYPES {
            match materials.lookup(MaterialMap::Other, *symbol) {
                Ok(mat) if mat.kind == MaterialKind::Liquid => {}
                Ok(mat) => {
                    let kind = mat.kind;
                    diag.warn(
                        "symbols",
                        format!("liquid type {wtip} symbol {symbol:?} is a {kind:?} material, not a liquid"),
                    )
                }
                Err(_) => diag.warn(
                    "symbols",
                    format!("liquid type {wtip} symbol {symbol:?} is missing from Other materials"),
                ),
            }
        }

        log::debug!(
            "Loaded {} solid and {} other symbols",
            solids.len(),
            other.len()
        );
        Ok(Self {
            materials,
            solids,
            other,
        })
    }

    pub fn translate(&self, map: MaterialMap, legacy: char) -> Translation {
        self.map(map).translate(legacy)
    }

    pub fn material(
        &self,
        map: MaterialMap,
        canonical: char,
    ) -> Result<&MaterialDescriptor, MaterialError> {
        self.materials.lookup(map, canonical)
    }

    pub fn map(&self, map: MaterialMap) -> &SymbolMap {
        match map {
            MaterialMap::Solids => &self.solids,
            MaterialMap::Other => &self.other,
        }
    }
}
