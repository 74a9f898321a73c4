//! Re-padding of already written location documents.
//!
//! Cells can be stored at their natural length or right-padded with the
//! empty sentinel so that rows line up in a text editor. This converts an
//! existing document between the two forms, in place.

use serde_json::Value;
use thiserror::Error;

use crate::config::{validate_repad, ConfigError};
use crate::constants::{keys, symbols};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PadError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("\"{}\" not found", keys::ROOMS)]
    MissingRooms,
    #[error("room {room}: \"{}\" not found", keys::CELLS)]
    MissingCells { room: usize },
    #[error("room {room}: at row {row}: row is not a string")]
    RowNotString { room: usize, row: usize },
    #[error("room {room}: at row {row}: empty cell")]
    EmptyCell { room: usize, row: usize },
    #[error("room {room}: at row {row}: cell is longer than requested pad size")]
    CellTooLong { room: usize, row: usize },
}

/// Re-pad one cell: keep the solid, strip padding from the rest, then pad
/// to `pad` characters (`0` leaves the cell unpadded).
fn repad_cell(cell: &str, pad: usize) -> Option<String> {
    let mut chars = cell.chars();
    let solid = chars.next()?;
    let rest = chars.as_str().trim_matches(symbols::EMPTY);

    let mut out = String::with_capacity(pad.max(cell.len()));
    out.push(solid);
    out.push_str(rest);
    if pad > 0 {
        let len = out.chars().count();
        out.extend(std::iter::repeat(symbols::EMPTY).take(pad.saturating_sub(len)));
    }
    Some(out)
}

fn repad_row(row: &str, pad: usize, room: usize, row_idx: usize) -> Result<String, PadError> {
    let mut cells = Vec::new();
    for cell in row.split(symbols::OUT_DELIM) {
        let out = repad_cell(cell, pad).ok_or(PadError::EmptyCell { room, row: row_idx })?;
        if pad > 0 && out.chars().count() > pad {
            return Err(PadError::CellTooLong { room, row: row_idx });
        }
        cells.push(out);
    }
    Ok(cells.join(symbols::OUT_DELIM.to_string().as_str()))
}

/// Re-pad every cell of `document`. On error the document is left untouched.
/// Returns the number of rows rewritten.
pub fn repad_document(document: &mut Value, pad: usize) -> Result<usize, PadError> {
    validate_repad(pad)?;

    let mut updated = document.clone();
    let rooms = updated
        .get_mut(keys::ROOMS)
        .and_then(Value::as_array_mut)
        .ok_or(PadError::MissingRooms)?;

    let mut rows_done = 0;
    for (room_idx, room) in rooms.iter_mut().enumerate() {
        let rows = room
            .get_mut(keys::CELLS)
            .and_then(Value::as_array_mut)
            .ok_or(PadError::MissingCells { room: room_idx })?;

        for (row_idx, row) in rows.iter_mut().enumerate() {
            let text = row.as_str().ok_or(PadError::RowNotString {
                room: room_idx,
                row: row_idx,
            })?;
            *row = Value::String(repad_row(text, pad, room_idx, row_idx)?);
            rows_done += 1;
        }
    }

    *document = updated;
    Ok(rows_done)
}
