#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use boxes::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use proximity::*;
pub use round::*;
pub use selection::*;
pub use types::*;
pub use viewport::*;

mod boxes;
mod engine;
mod error;
mod generator;
mod proximity;
mod round;
mod selection;
mod types;
mod viewport;

/// Side of one grid cell in pixels at zoom 1.
pub const CELL_PX: f64 = 48.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundConfig {
    pub rows: Coord,
    pub cols: Coord,
    /// Digits are drawn from `0..=max_digit`.
    pub max_digit: Digit,
}

impl RoundConfig {
    pub const DEFAULT: Self = Self::new_unchecked(25, 35, 9);

    pub const fn new_unchecked(rows: Coord, cols: Coord, max_digit: Digit) -> Self {
        Self {
            rows,
            cols,
            max_digit,
        }
    }

    pub fn new(rows: Coord, cols: Coord, max_digit: Digit) -> Self {
        let rows = rows.clamp(1, Coord::MAX);
        let cols = cols.clamp(1, Coord::MAX);
        Self::new_unchecked(rows, cols, max_digit)
    }

    pub const fn total_cells(&self) -> CellIndex {
        mult(self.rows, self.cols)
    }

    /// Unzoomed grid size in pixels.
    pub fn content_size(&self) -> Size {
        Size::new(
            f64::from(self.cols) * CELL_PX,
            f64::from(self.rows) * CELL_PX,
        )
    }
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
