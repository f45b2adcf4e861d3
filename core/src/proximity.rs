use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProximityParams {
    /// Distance in pixels at which cells stop growing.
    pub radius: f64,
    /// Extra scale right under the cursor.
    pub boost: f64,
    /// Minimum scale of a found target cell.
    pub highlight: f64,
}

impl ProximityParams {
    pub const DEFAULT: Self = Self {
        radius: 100.0,
        boost: 0.8,
        highlight: 1.5,
    };
}

impl Default for ProximityParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// `1 + boost * (1 - distance / radius)` inside the radius, `1` outside it or
/// without a cursor.
pub fn proximity_scale(cursor: Option<Point>, center: Point, params: &ProximityParams) -> f64 {
    let Some(cursor) = cursor else {
        return 1.0;
    };

    if cursor.distance_squared(center) >= params.radius * params.radius {
        return 1.0;
    }
    1.0 + params.boost * (1.0 - cursor.distance(center) / params.radius)
}

pub fn cell_scale(cursor: Option<Point>, center: Point, found: bool, params: &ProximityParams) -> f64 {
    let scale = proximity_scale(cursor, center, params);
    if found {
        scale.max(params.highlight)
    } else {
        scale
    }
}
