//! Layout module - the "turtle" slot table
//!
//! Slots are in grid units (half a tile). The base layer is eight rows of
//! 12, 8, 10, 14, 14, 10, 8 and 12 tiles centred on the widest row, plus a
//! wing tile past each end of the two widest rows, sitting half a row down
//! so it touches both. Layers 1-4 are centred blocks of 6x4, 4x2, 2x1 and
//! a single capstone, each resting on the layer below.
//!
//! The raw table holds 125 slots. [`normalize_slots`] forces the count to
//! [`DECK_SIZE`] by padding with copies of base-layer slots (or truncating
//! from the end), so 19 base positions are occupied twice. This is a known
//! simplification of the classic shape.

use std::sync::OnceLock;

use crate::types::{Position, DECK_SIZE, TILE_SPAN};

/// Tile counts of the base rows, top to bottom.
const BASE_ROWS: [i16; 8] = [12, 8, 10, 14, 14, 10, 8, 12];

/// Tile count of the widest base row.
const BASE_WIDEST: i16 = 14;

/// Grid column of the widest base row's first tile; leaves room for the left wing.
const BASE_LEFT: i16 = TILE_SPAN;

/// Base row index after which the wings sit.
const WING_AFTER_ROW: i16 = 3;

/// Rectangular block of tiles on one layer.
#[derive(Debug, Clone, Copy)]
struct Block {
    layer: u8,
    col: i16,
    row: i16,
    cols: i16,
    rows: i16,
}

const UPPER_BLOCKS: [Block; 4] = [
    Block { layer: 1, col: 10, row: 4, cols: 6, rows: 4 },
    Block { layer: 2, col: 12, row: 6, cols: 4, rows: 2 },
    Block { layer: 3, col: 14, row: 7, cols: 2, rows: 1 },
    Block { layer: 4, col: 15, row: 7, cols: 1, rows: 1 },
];

/// Build the turtle table before normalisation.
pub fn raw_turtle() -> Vec<Position> {
    let mut slots = Vec::with_capacity(DECK_SIZE);

    for (r, &width) in BASE_ROWS.iter().enumerate() {
        let row = r as i16 * TILE_SPAN;
        let start = BASE_LEFT + (BASE_WIDEST - width);
        for i in 0..width {
            slots.push(Position::new(start + i * TILE_SPAN, row, 0));
        }
    }

    let wing_row = WING_AFTER_ROW * TILE_SPAN + TILE_SPAN / 2;
    slots.push(Position::new(BASE_LEFT - TILE_SPAN, wing_row, 0));
    slots.push(Position::new(
        BASE_LEFT + BASE_WIDEST * TILE_SPAN,
        wing_row,
        0,
    ));

    for block in UPPER_BLOCKS {
        for r in 0..block.rows {
            for c in 0..block.cols {
                slots.push(Position::new(
                    block.col + c * TILE_SPAN,
                    block.row + r * TILE_SPAN,
                    block.layer,
                ));
            }
        }
    }

    slots
}

/// Force a slot list to exactly `target` entries.
///
/// Longer lists are truncated from the end. Shorter lists are padded with
/// copies of their layer-0 slots, cycling from the first one; a list with no
/// base slot pads with the origin.
pub fn normalize_slots(mut slots: Vec<Position>, target: usize) -> Vec<Position> {
    if slots.len() >= target {
        slots.truncate(target);
        return slots;
    }

    let base: Vec<Position> = slots.iter().copied().filter(|p| p.layer == 0).collect();
    let mut i = 0;
    while slots.len() < target {
        let pad = if base.is_empty() {
            Position::new(0, 0, 0)
        } else {
            base[i % base.len()]
        };
        slots.push(pad);
        i += 1;
    }
    slots
}

/// The normalised turtle, built once per process.
pub fn turtle_layout() -> &'static [Position] {
    static LAYOUT: OnceLock<Vec<Position>> = OnceLock::new();
    LAYOUT.get_or_init(|| normalize_slots(raw_turtle(), DECK_SIZE))
}
