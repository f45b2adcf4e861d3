use ndarray::Array2;

use crate::*;

/// Derived, per-cell view of a round.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CellView {
    pub index: CellIndex,
    pub coords: Coord2,
    pub digit: Digit,
    pub is_target: bool,
    pub is_selected: bool,
}

impl CellView {
    /// A target the player has already picked.
    pub const fn is_found(&self) -> bool {
        self.is_target && self.is_selected
    }
}

/// One generated grid with its target cluster and the player's picks.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Round {
    digits: Array2<Digit>,
    cluster: Cluster,
    selection: Selection,
}

impl Round {
    pub fn new(digits: Array2<Digit>, cluster: Cluster) -> Self {
        Self {
            digits,
            cluster,
            selection: Selection::default(),
        }
    }

    /// `(rows, cols)`
    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.digits.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn total_cells(&self) -> CellIndex {
        let (rows, cols) = self.size();
        mult(rows, cols)
    }

    pub fn cluster(&self) -> &Cluster {
        &self.cluster
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn validate_index(&self, index: CellIndex) -> Result<CellIndex> {
        if index < self.total_cells() {
            Ok(index)
        } else {
            Err(GameError::InvalidIndex)
        }
    }

    pub fn digit_at(&self, coords: Coord2) -> Digit {
        self.digits[coords.to_nd_index()]
    }

    pub fn cell(&self, index: CellIndex) -> Result<CellView> {
        let index = self.validate_index(index)?;
        Ok(self.cell_unchecked(index))
    }

    pub fn cells(&self) -> impl Iterator<Item = CellView> + '_ {
        (0..self.total_cells()).map(|index| self.cell_unchecked(index))
    }

    pub fn is_complete(&self) -> bool {
        self.selection.is_complete(&self.cluster)
    }

    pub fn toggle_or_add(&mut self, index: CellIndex) -> Result<SelectOutcome> {
        let index = self.validate_index(index)?;
        Ok(self.selection.toggle_or_add(index, &self.cluster))
    }

    pub fn begin_drag(&mut self, index: CellIndex) -> Result<SelectOutcome> {
        let index = self.validate_index(index)?;
        Ok(self.selection.begin_drag(index, &self.cluster))
    }

    pub fn drag_over(&mut self, index: CellIndex) -> Result<SelectOutcome> {
        let index = self.validate_index(index)?;
        Ok(self.selection.drag_over(index, &self.cluster))
    }

    pub fn end_drag(&mut self) -> bool {
        self.selection.end_drag()
    }

    fn cell_unchecked(&self, index: CellIndex) -> CellView {
        let (_, cols) = self.size();
        let coords = to_coords(index, cols);
        CellView {
            index,
            coords,
            digit: self.digit_at(coords),
            is_target: self.cluster.contains(index),
            is_selected: self.selection.contains(index),
        }
    }
}
