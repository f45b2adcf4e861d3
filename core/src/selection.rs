use hashbrown::HashSet;

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    NoChange,
    Selected,
    /// The pick that made the selection cover the whole cluster.
    Completed,
}

impl SelectOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// Cells picked so far in the live round.
///
/// Only cluster cells are accepted and nothing is ever removed, so the set is
/// always a subset of the cluster and only grows until [`Selection::reset`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    selected: HashSet<CellIndex>,
    dragging: bool,
}

impl Selection {
    /// Click entry point. Re-clicking a picked cell keeps it picked.
    pub fn toggle_or_add(&mut self, index: CellIndex, cluster: &Cluster) -> SelectOutcome {
        self.add_if_target(index, cluster)
    }

    pub fn add_if_target(&mut self, index: CellIndex, cluster: &Cluster) -> SelectOutcome {
        if !cluster.contains(index) || !self.selected.insert(index) {
            return SelectOutcome::NoChange;
        }

        log::trace!("picked cell {} ({}/{})", index, self.selected.len(), cluster.len());
        if self.is_complete(cluster) {
            SelectOutcome::Completed
        } else {
            SelectOutcome::Selected
        }
    }

    /// Never true for an empty cluster.
    pub fn is_complete(&self, cluster: &Cluster) -> bool {
        !cluster.is_empty() && cluster.iter().all(|index| self.selected.contains(&index))
    }

    pub fn begin_drag(&mut self, index: CellIndex, cluster: &Cluster) -> SelectOutcome {
        self.dragging = true;
        self.add_if_target(index, cluster)
    }

    pub fn drag_over(&mut self, index: CellIndex, cluster: &Cluster) -> SelectOutcome {
        if self.dragging {
            self.add_if_target(index, cluster)
        } else {
            SelectOutcome::NoChange
        }
    }

    pub fn end_drag(&mut self) -> bool {
        core::mem::take(&mut self.dragging)
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn contains(&self, index: CellIndex) -> bool {
        self.selected.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = CellIndex> + '_ {
        self.selected.iter().copied()
    }

    pub fn reset(&mut self) {
        self.selected.clear();
        self.dragging = false;
    }
}
