use alloc::vec;
use alloc::vec::Vec;
use core::ops::RangeInclusive;
use serde::{Deserialize, Serialize};

use crate::*;

/// Fill of one box, in percent.
pub type Fill = u8;

pub const FULL: Fill = 100;
pub const DEFAULT_BOX_COUNT: usize = 4;
/// Range the per-round increment is drawn from.
pub const INCREMENT_RANGE: RangeInclusive<Fill> = 10..=30;

/// Progress containers owned by the surrounding application.
///
/// The engine only reads [`BoxStore::fills`] and requests increments once a
/// deposit has finished animating.
pub trait BoxStore {
    fn fills(&self) -> &[Fill];

    /// Adds `amount` to box `index`, clamped at [`FULL`], and returns the new fill.
    fn commit_increment(&mut self, index: usize, amount: Fill) -> Result<Fill>;

    fn reset_progress(&mut self);

    fn is_all_complete(&self) -> bool {
        self.fills().iter().all(|&fill| fill >= FULL)
    }

    /// Indexes of boxes that still have room.
    fn open_candidates(&self) -> Vec<usize> {
        self.fills()
            .iter()
            .enumerate()
            .filter(|&(_, &fill)| fill < FULL)
            .map(|(index, _)| index)
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredFills")]
pub struct BoxFills {
    fills: Vec<Fill>,
}

/// Wire shape of [`BoxFills`]; loaded data is checked on the way in.
#[derive(Deserialize)]
struct StoredFills {
    fills: Vec<Fill>,
}

impl From<StoredFills> for BoxFills {
    fn from(stored: StoredFills) -> Self {
        Self::from_fills(stored.fills)
    }
}

impl BoxFills {
    pub fn new(count: usize) -> Self {
        Self {
            fills: vec![0; count.max(1)],
        }
    }

    /// Fills above [`FULL`] are clamped. No fills at all gives the default boxes.
    pub fn from_fills(fills: impl IntoIterator<Item = Fill>) -> Self {
        let fills: Vec<Fill> = fills.into_iter().map(|fill| fill.min(FULL)).collect();
        if fills.is_empty() {
            log::warn!("no boxes given, using {}", DEFAULT_BOX_COUNT);
            return Self::default();
        }
        Self { fills }
    }

    pub fn len(&self) -> usize {
        self.fills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fills.is_empty()
    }
}

impl Default for BoxFills {
    fn default() -> Self {
        Self::new(DEFAULT_BOX_COUNT)
    }
}

impl BoxStore for BoxFills {
    fn fills(&self) -> &[Fill] {
        &self.fills
    }

    fn commit_increment(&mut self, index: usize, amount: Fill) -> Result<Fill> {
        let fill = *self.fills.get(index).ok_or(GameError::InvalidBox)?;
        if fill >= FULL {
            return Err(GameError::NoOpenBox);
        }

        let mut next = self.fills.clone();
        next[index] = fill.saturating_add(amount).min(FULL);
        self.fills = next;
        log::debug!("box {} filled {} -> {}", index, fill, self.fills[index]);
        Ok(self.fills[index])
    }

    fn reset_progress(&mut self) {
        log::debug!("box progress reset");
        self.fills.fill(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_clamps_at_full() {
        let mut boxes = BoxFills::from_fills([40, 100, 90]);

        assert_eq!(boxes.commit_increment(2, 15), Ok(100));
        assert_eq!(boxes.fills(), &[40, 100, 100]);
        assert!(!boxes.is_all_complete());
        assert_eq!(boxes.open_candidates(), vec![0]);

        assert_eq!(boxes.commit_increment(0, 30), Ok(70));
        assert_eq!(boxes.commit_increment(0, 30), Ok(100));
        assert!(boxes.is_all_complete());
        assert!(boxes.open_candidates().is_empty());
    }

    #[test]
    fn full_or_missing_boxes_are_rejected() {
        let mut boxes = BoxFills::from_fills([100, 5]);
        assert_eq!(boxes.commit_increment(0, 10), Err(GameError::NoOpenBox));
        assert_eq!(boxes.commit_increment(2, 10), Err(GameError::InvalidBox));
        assert_eq!(boxes.fills(), &[100, 5]);
    }

    #[test]
    fn reset_clears_completion() {
        let mut boxes = BoxFills::from_fills([100, 250, 100]);
        assert_eq!(boxes.fills(), &[100, 100, 100]);
        assert!(boxes.is_all_complete());

        boxes.reset_progress();
        assert_eq!(boxes.fills(), &[0, 0, 0]);
        assert!(!boxes.is_all_complete());
    }

    #[test]
    fn stored_shape_is_a_plain_fill_list() {
        let boxes = BoxFills::from_fills([10, 20, 30, 40]);
        let json = serde_json::to_string(&boxes).unwrap();
        assert_eq!(json, r#"{"fills":[10,20,30,40]}"#);
        assert_eq!(serde_json::from_str::<BoxFills>(&json).unwrap(), boxes);
    }

    #[test]
    fn loaded_fills_are_checked() {
        let boxes: BoxFills = serde_json::from_str(r#"{"fills":[250,0]}"#).unwrap();
        assert_eq!(boxes.fills(), &[100, 0]);
        assert_eq!(boxes.open_candidates(), vec![1]);

        let boxes: BoxFills = serde_json::from_str(r#"{"fills":[]}"#).unwrap();
        assert_eq!(boxes, BoxFills::default());
        assert!(!boxes.is_all_complete());
        assert_eq!(boxes.open_candidates().len(), DEFAULT_BOX_COUNT);
    }
}
