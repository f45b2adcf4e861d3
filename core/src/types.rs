/// Single coordinate axis used for grid rows, columns, and positions.
pub type Coord = u8;

/// Flat row-major cell index, `row * cols + col`.
pub type CellIndex = u16;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

/// Value shown in a grid cell.
pub type Digit = u16;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellIndex {
    let a = a as CellIndex;
    let b = b as CellIndex;
    a.saturating_mul(b)
}

pub const fn to_index((row, col): Coord2, cols: Coord) -> CellIndex {
    row as CellIndex * cols as CellIndex + col as CellIndex
}

/// Inverse of [`to_index`]; `cols` must be non-zero.
pub const fn to_coords(index: CellIndex, cols: Coord) -> Coord2 {
    let cols = cols as CellIndex;
    ((index / cols) as Coord, (index % cols) as Coord)
}

/// A point in viewport pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_squared(self, other: Point) -> f64 {
        let (dx, dy) = (self.x - other.x, self.y - other.y);
        dx * dx + dy * dy
    }

    pub fn distance(self, other: Point) -> f64 {
        sqrt(self.distance_squared(other))
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }
}

// core has no f64::sqrt, Newton's method from above is plenty for pixel distances
fn sqrt(sq: f64) -> f64 {
    if sq <= 0.0 || !sq.is_finite() {
        return sq.max(0.0);
    }
    let mut x = if sq > 1.0 { sq / 2.0 } else { 1.0 };
    for _ in 0..64 {
        let next = 0.5 * (x + sq / x);
        let delta = next - x;
        if delta <= f64::EPSILON * next && -delta <= f64::EPSILON * next {
            return next;
        }
        x = next;
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        let delta = a - b;
        -1e-9 < delta && delta < 1e-9
    }

    #[test]
    fn flat_index_round_trips_through_coords() {
        let cols = 35;
        assert_eq!(to_index((0, 0), cols), 0);
        assert_eq!(to_index((2, 4), cols), 74);
        assert_eq!(to_coords(74, cols), (2, 4));
        assert_eq!(to_coords(34, cols), (0, 34));
        assert_eq!(to_coords(35, cols), (1, 0));
    }

    #[test]
    fn distance_matches_pythagoras() {
        let a = Point::new(0.0, 0.0);
        assert!(close(a.distance(Point::new(3.0, 4.0)), 5.0));
        assert_eq!(a.distance(a), 0.0);
        assert!(close(a.distance(Point::new(1.0, 1.0)), core::f64::consts::SQRT_2));
    }
}
