//! Geometry validation between neighbouring rooms of a unique location.
//!
//! Rooms are added one at a time as they are decoded. Each new room is
//! checked against the already-seen rooms to its left, right, top and bottom
//! (same `z`; vertical connections have no walls), so every shared edge is
//! checked exactly once. Grind locations are never validated.

use std::collections::HashMap;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::constants::grid;
use crate::diagnostics::{Diagnostic, Severity};

const CATEGORY: &str = "geometry";

/// Absolute room address inside a unique location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomCoords {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl RoomCoords {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// `None` when the neighbour would lie outside the `i32` range.
    pub fn neighbour(self, side: Side) -> Option<Self> {
        let (dx, dy) = match side {
            Side::Left => (-1, 0),
            Side::Right => (1, 0),
            Side::Up => (0, -1),
            Side::Down => (0, 1),
        };
        Some(Self::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?, self.z))
    }
}

impl fmt::Display for RoomCoords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl Serialize for RoomCoords {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.x, self.y, self.z].serialize(serializer)
    }
}

/// Side of a room shared with a neighbour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
    Up,
    Down,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Left, Side::Right, Side::Up, Side::Down];

    fn name(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
            Side::Up => "up",
            Side::Down => "down",
        }
    }

    fn neighbour_name(self) -> &'static str {
        match self {
            Side::Left => "left room",
            Side::Right => "right room",
            Side::Up => "upper room",
            Side::Down => "bottom room",
        }
    }

    /// Edge and next-inward positions along this side, in edge order.
    /// Each item is `(edge, inner)` as `(x, y)` pairs.
    fn edge_cells(self) -> Vec<((usize, usize), (usize, usize))> {
        let (w, h) = (grid::WIDTH, grid::HEIGHT);
        match self {
            Side::Left => (0..h).map(|y| ((0, y), (1, y))).collect(),
            Side::Right => (0..h).map(|y| ((w - 1, y), (w - 2, y))).collect(),
            Side::Up => (0..w).map(|x| ((x, 0), (x, 1))).collect(),
            Side::Down => (0..w).map(|x| ((x, h - 1), (x, h - 2))).collect(),
        }
    }

    fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
            Side::Up => Side::Down,
            Side::Down => Side::Up,
        }
    }
}

/// Per-cell "is a collider" grid of one decoded room, `HEIGHT` rows of
/// `WIDTH` cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColliderGrid {
    rows: Vec<Vec<bool>>,
}

impl ColliderGrid {
    pub fn open() -> Self {
        Self {
            rows: vec![vec![false; grid::WIDTH]; grid::HEIGHT],
        }
    }

    pub fn is_collider(&self, x: usize, y: usize) -> bool {
        self.rows[y][x]
    }

    pub fn set(&mut self, x: usize, y: usize, collider: bool) {
        self.rows[y][x] = collider;
    }
}

// ── Edge checks ─────────────────────────────────────────────────────────

fn geometry_error(message: String) -> Diagnostic {
    Diagnostic {
        category: CATEGORY,
        severity: Severity::Error,
        message,
    }
}

/// Compare `room`'s `side` edge with the matching edge of `neighbour`.
///
/// Edge cells must agree on being colliders. Where both are passable, the
/// next cell inward on each side must also be passable, so a 2-cell-wide
/// mover fits through.
pub fn check_shared_edge(
    label: &str,
    room: &ColliderGrid,
    neighbour: &ColliderGrid,
    side: Side,
) -> Vec<Diagnostic> {
    let mut errors = Vec::new();
    let ours = side.edge_cells();
    let theirs = side.opposite().edge_cells();

    for (((ex, ey), (ix, iy)), ((nex, ney), (nix, niy))) in ours.into_iter().zip(theirs) {
        let this_collider = room.is_collider(ex, ey);
        if this_collider != neighbour.is_collider(nex, ney) {
            errors.push(geometry_error(format!(
                "Room {label}: geometry validation failed at ({ex}, {ey}) - {} edge mismatch",
                side.name()
            )));
            continue;
        }
        if this_collider {
            continue;
        }
        if room.is_collider(ix, iy) {
            errors.push(geometry_error(format!(
                "Room {label}: geometry validation failed at ({ix}, {iy}) - insufficient space for the player"
            )));
        }
        if neighbour.is_collider(nix, niy) {
            errors.push(geometry_error(format!(
                "Room {label}: geometry validation failed at ({ix}, {iy}) - insufficient space for the player in {}",
                side.neighbour_name()
            )));
        }
    }
    errors
}

// ── Incremental validator ───────────────────────────────────────────────

/// Collider grids of every room seen so far in one location.
#[derive(Debug, Default)]
pub struct GeometryValidator {
    rooms: HashMap<RoomCoords, ColliderGrid>,
}

impl GeometryValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check `grid` against every already-added neighbour, then remember it.
    pub fn add_room(
        &mut self,
        coords: RoomCoords,
        label: &str,
        grid: ColliderGrid,
    ) -> Vec<Diagnostic> {
        if self.rooms.contains_key(&coords) {
            return vec![geometry_error(format!(
                "Room {label}: another room already occupies {coords}, skipping geometry validation"
            ))];
        }

        let mut errors = Vec::new();
        for side in Side::ALL {
            let Some(at) = coords.neighbour(side) else {
                continue;
            };
            if let Some(neighbour) = self.rooms.get(&at) {
                errors.extend(check_shared_edge(label, &grid, neighbour, side));
            }
        }
        self.rooms.insert(coords, grid);
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Open room with a solid border everywhere except the listed rows of the
    /// left and right walls.
    fn make_room(open_rows: &[usize]) -> ColliderGrid {
        let mut grid = ColliderGrid::open();
        for y in 0..grid::HEIGHT {
            for x in 0..grid::WIDTH {
                let border = x == 0 || y == 0 || x == grid::WIDTH - 1 || y == grid::HEIGHT - 1;
                let side_door = (x == 0 || x == grid::WIDTH - 1) && open_rows.contains(&y);
                grid.set(x, y, border && !side_door);
            }
        }
        grid
    }

    #[test]
    fn test_matching_edges_pass() {
        let mut v = GeometryValidator::new();
        assert!(v.add_room(RoomCoords::new(0, 0, 0), "a", make_room(&[10, 11, 12])).is_empty());
        assert!(v.add_room(RoomCoords::new(1, 0, 0), "b", make_room(&[10, 11, 12])).is_empty());
    }

    #[test]
    fn test_single_mismatch_reported_once() {
        let mut v = GeometryValidator::new();
        v.add_room(RoomCoords::new(0, 0, 0), "a", make_room(&[10, 11, 12]));
        let errs = v.add_room(RoomCoords::new(1, 0, 0), "b", make_room(&[10, 11]));
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].severity, Severity::Error);
        assert!(errs[0].message.contains("(0, 12)"));
        assert!(errs[0].message.contains("left edge mismatch"));
    }

    #[test]
    fn test_mismatch_from_other_direction() {
        let mut v = GeometryValidator::new();
        v.add_room(RoomCoords::new(1, 0, 0), "b", make_room(&[10, 11]));
        let errs = v.add_room(RoomCoords::new(0, 0, 0), "a", make_room(&[10, 11, 12]));
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.contains("(47, 12)"));
        assert!(errs[0].message.contains("right edge mismatch"));
    }

    #[test]
    fn test_insufficient_space() {
        let mut v = GeometryValidator::new();
        v.add_room(RoomCoords::new(0, 0, 0), "a", make_room(&[10, 11]));
        let mut b = make_room(&[10, 11]);
        b.set(1, 10, true);
        let errs = v.add_room(RoomCoords::new(1, 0, 0), "b", b);
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.contains("insufficient space for the player"));
        assert!(!errs[0].message.contains("left room"));

        let mut c = make_room(&[10, 11]);
        c.set(grid::WIDTH - 2, 11, true);
        let mut v = GeometryValidator::new();
        v.add_room(RoomCoords::new(0, 0, 0), "c", c);
        let errs = v.add_room(RoomCoords::new(1, 0, 0), "d", make_room(&[10, 11]));
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.contains("in left room"));
    }

    #[test]
    fn test_vertical_neighbours() {
        let mut v = GeometryValidator::new();
        let mut top = make_room(&[]);
        let mut bottom = make_room(&[]);
        // hole in the floor of `top` without a matching hole in the ceiling of `bottom`
        top.set(20, grid::HEIGHT - 1, false);
        v.add_room(RoomCoords::new(0, 0, 0), "top", top);
        let errs = v.add_room(RoomCoords::new(0, 1, 0), "bottom", bottom.clone());
        assert_eq!(errs.len(), 1);
        assert!(errs[0].message.contains("up edge mismatch"));

        bottom.set(20, 0, false);
        let mut v = GeometryValidator::new();
        let mut top = make_room(&[]);
        top.set(20, grid::HEIGHT - 1, false);
        v.add_room(RoomCoords::new(0, 0, 0), "top", top);
        assert!(v.add_room(RoomCoords::new(0, 1, 0), "bottom", bottom).is_empty());
    }

    #[test]
    fn test_different_z_not_checked() {
        let mut v = GeometryValidator::new();
        v.add_room(RoomCoords::new(0, 0, 0), "a", make_room(&[10]));
        assert!(v.add_room(RoomCoords::new(1, 0, 1), "b", make_room(&[])).is_empty());
    }

    #[test]
    fn test_duplicate_coords() {
        let mut v = GeometryValidator::new();
        v.add_room(RoomCoords::new(0, 0, 0), "a", make_room(&[10]));
        let errs = v.add_room(RoomCoords::new(0, 0, 0), "b", make_room(&[]));
        assert_eq!(errs.len(), 1);

        // the first room stays registered
        let errs = v.add_room(RoomCoords::new(1, 0, 0), "c", make_room(&[10]));
        assert!(errs.is_empty(), "{errs:?}");
    }

    #[test]
    fn test_rooms_at_coordinate_limits() {
        let mut v = GeometryValidator::new();
        assert!(v.add_room(RoomCoords::new(i32::MAX, 0, 0), "max", make_room(&[10])).is_empty());
        let corner = RoomCoords::new(i32::MIN, i32::MIN, 0);
        assert!(v.add_room(corner, "min", make_room(&[])).is_empty());
        let errs = v.add_room(RoomCoords::new(i32::MAX - 1, 0, 0), "next", make_room(&[]));
        assert_eq!(errs.len(), 1);
        assert_eq!(RoomCoords::new(i32::MAX, 0, 0).neighbour(Side::Right), None);
        assert_eq!(
            RoomCoords::new(i32::MAX, 0, 0).neighbour(Side::Left),
            Some(RoomCoords::new(i32::MAX - 1, 0, 0))
        );
    }

    #[test]
    fn test_coords_serialize_as_array() {
        let text = serde_json::to_string(&RoomCoords::new(1, -2, 0)).unwrap();
        assert_eq!(text, "[1,-2,0]");
        assert_eq!(RoomCoords::new(1, -2, 0).to_string(), "(1, -2, 0)");
    }
}
