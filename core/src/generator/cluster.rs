use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Fewest cells a sampled cluster may have.
pub const MIN_CLUSTER: usize = 5;
/// Most cells a sampled cluster may have.
pub const MAX_CLUSTER: usize = 9;
/// Longest side of a cluster's bounding box.
pub const MAX_SIDE: Coord = 3;
/// Bound on the width/height rejection sampling.
pub const MAX_RESAMPLES: u32 = 64;

const MAX_BOX_AREA: usize = (MAX_SIDE as usize) * (MAX_SIDE as usize);

/// Placed bounding rectangle of a cluster, in grid coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterBounds {
    pub row: Coord,
    pub col: Coord,
    pub width: Coord,
    pub height: Coord,
}

impl ClusterBounds {
    pub const fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub const fn contains(&self, (row, col): Coord2) -> bool {
        row >= self.row
            && col >= self.col
            && (row as u16) < self.row as u16 + self.height as u16
            && (col as u16) < self.col as u16 + self.width as u16
    }
}

/// The set of cells the player has to find in a round.
///
/// Indices are kept sorted and unique, so membership is a binary search.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    cells: SmallVec<[CellIndex; MAX_CLUSTER]>,
    bounds: ClusterBounds,
}

impl Cluster {
    pub fn from_cells(cells: impl IntoIterator<Item = CellIndex>, bounds: ClusterBounds) -> Self {
        let mut cells: SmallVec<[CellIndex; MAX_CLUSTER]> = cells.into_iter().collect();
        cells.sort_unstable();
        cells.dedup();
        Self { cells, bounds }
    }

    pub fn contains(&self, index: CellIndex) -> bool {
        self.cells.binary_search(&index).is_ok()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn bounds(&self) -> ClusterBounds {
        self.bounds
    }

    pub fn as_slice(&self) -> &[CellIndex] {
        &self.cells
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = CellIndex> + ExactSizeIterator + '_ {
        self.cells.iter().copied()
    }
}

/// Samples a target cluster for a `rows` x `cols` grid.
///
/// The bounding box sides are drawn from `[1, 3]` until its area reaches
/// [`MIN_CLUSTER`], thinned down to [`MAX_CLUSTER`] cells, then placed uniformly
/// inside the grid. A grid too small for the drawn box yields an empty cluster,
/// see [`fit_cluster`] for the variant that never does.
pub fn sample_cluster<R: Rng + ?Sized>(rng: &mut R, rows: Coord, cols: Coord) -> Cluster {
    let (width, height) = draw_box(rng, MAX_SIDE, MAX_SIDE, MIN_CLUSTER);
    if height > rows || width > cols {
        log::warn!(
            "cluster box {}x{} does not fit in {}x{} grid",
            width,
            height,
            cols,
            rows
        );
        return Cluster::default();
    }
    place_cluster(rng, rows, cols, width, height)
}

/// Like [`sample_cluster`] but shrinks the box to the grid, relaxing the
/// minimum cell count to what fits. Only empty for a grid with no cells.
pub fn fit_cluster<R: Rng + ?Sized>(rng: &mut R, rows: Coord, cols: Coord) -> Cluster {
    let max_width = cols.min(MAX_SIDE);
    let max_height = rows.min(MAX_SIDE);
    if max_width == 0 || max_height == 0 {
        return Cluster::default();
    }

    let min_cells = MIN_CLUSTER.min(usize::from(max_width) * usize::from(max_height));
    let (width, height) = draw_box(rng, max_width, max_height, min_cells);
    place_cluster(rng, rows, cols, width, height)
}

/// Thins a `width` x `height` box down to at most [`MAX_CLUSTER`] cells and
/// places it uniformly inside the grid. A box that is empty, wider than
/// [`MAX_SIDE`] or larger than the grid gives an empty cluster.
pub fn place_cluster<R: Rng + ?Sized>(
    rng: &mut R,
    rows: Coord,
    cols: Coord,
    width: Coord,
    height: Coord,
) -> Cluster {
    if !(1..=MAX_SIDE.min(cols)).contains(&width) || !(1..=MAX_SIDE.min(rows)).contains(&height) {
        log::warn!(
            "{}x{} box does not fit a {}x{} grid",
            width,
            height,
            cols,
            rows
        );
        return Cluster::default();
    }

    let area = usize::from(width) * usize::from(height);
    let mut kept = [false; MAX_BOX_AREA];
    kept[..area].fill(true);

    // positions already cleared are simply drawn again
    let mut kept_count = area;
    while kept_count > MAX_CLUSTER {
        let pick = rng.random_range(0..area);
        if kept[pick] {
            kept[pick] = false;
            kept_count -= 1;
        }
    }

    let row = rng.random_range(0..=rows - height);
    let col = rng.random_range(0..=cols - width);
    let bounds = ClusterBounds {
        row,
        col,
        width,
        height,
    };

    let cells = kept[..area]
        .iter()
        .enumerate()
        .filter(|&(_, &is_kept)| is_kept)
        .map(|(offset, _)| {
            let dr = (offset / usize::from(width)) as Coord;
            let dc = (offset % usize::from(width)) as Coord;
            to_index((row + dr, col + dc), cols)
        });

    Cluster::from_cells(cells, bounds)
}

fn draw_box<R: Rng + ?Sized>(
    rng: &mut R,
    max_width: Coord,
    max_height: Coord,
    min_area: usize,
) -> (Coord, Coord) {
    for _ in 0..MAX_RESAMPLES {
        let width = rng.random_range(1..=max_width);
        let height = rng.random_range(1..=max_height);
        if usize::from(width) * usize::from(height) >= min_area {
            return (width, height);
        }
    }

    log::warn!(
        "cluster box resampling gave up after {} draws, using {}x{}",
        MAX_RESAMPLES,
        max_width,
        max_height
    );
    (max_width, max_height)
}
