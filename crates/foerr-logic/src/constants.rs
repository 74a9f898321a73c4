//! Format constants — grid size, delimiters, sentinels, flags and JSON keys.
//!
//! These are fixed by the RR room format consumed by the game, so they are
//! plain constants rather than configuration.

/// Room grid dimensions, border cells included.
pub mod grid {
    pub const WIDTH: usize = 48;
    pub const HEIGHT: usize = 25;
}

/// Characters with a structural meaning in legacy and RR cell strings.
pub mod symbols {
    /// Separates legacy cells inside one `<a>` row.
    pub const IN_DELIM: char = '.';
    /// Separates encoded cells inside one output row.
    pub const OUT_DELIM: char = '|';
    /// "Nothing here"; also used to pad cells.
    pub const EMPTY: char = '_';
    /// Placeholder for anything that could not be translated.
    pub const UNKNOWN: char = '?';
    /// The only liquid marker legacy rooms know about.
    pub const LEGACY_LIQUID: char = '*';

    /// Characters that may never be used as canonical material symbols.
    pub const RESERVED: [char; 4] = [IN_DELIM, OUT_DELIM, EMPTY, UNKNOWN];
}

/// Part-height modifiers, placed after the solid symbol.
pub mod part_height {
    pub const THREE_QUARTERS: char = ',';
    pub const HALF: char = ';';
    pub const QUARTER: char = ':';

    pub const ALL: [char; 3] = [THREE_QUARTERS, HALF, QUARTER];

    pub fn is_flag(c: char) -> bool {
        ALL.contains(&c)
    }
}

/// Backform patterns: which cells get a synthetic backwall background.
pub mod backform {
    /// Left strip is `x < LEFT_STRIP_END`, right strip is `x > RIGHT_STRIP_START`.
    pub const LEFT_STRIP_END: usize = 11;
    pub const RIGHT_STRIP_START: usize = 36;
    /// Bottom strip is `y > BOTTOM_STRIP_START`.
    pub const BOTTOM_STRIP_START: usize = 15;
}

/// Document versioning.
pub mod versions {
    pub const API_VERSION: u32 = 1;
    pub const DOCUMENT_VERSION: u32 = 1;
}

/// Upper bound for cell padding.
pub const MAX_PAD_CNT: usize = 10;

/// Object id marking the player spawn point in `<obj>` lists.
pub const PLAYER_OBJ_ID: &str = "player";

/// Background value meaning "draw no backwall".
pub const BACKWALL_SKY: &str = "sky";

/// JSON member names shared by every RR document.
pub mod keys {
    pub const SOLIDS: &str = "solids";
    pub const OTHER: &str = "other";
    pub const ROOMS: &str = "rooms";
    pub const CELLS: &str = "cells";
}
