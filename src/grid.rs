use crate::types::EdgeId;

/// Dense rasterized ownership map used as the simulation's only spatial
/// index.
///
/// Each cell holds the id of the edge whose boundary most recently claimed
/// it, or `0` for unclaimed. Layout is row-major:
/// `index = floor(x) + width * floor(y)`.
///
/// Cell contents are advisory for collision detection, not authoritative
/// geometry. All access is bounds-checked in 2D: an out-of-range probe reads
/// as unclaimed and an out-of-range write is dropped.
#[derive(Debug)]
pub struct OwnershipGrid {
    width: usize,
    height: usize,
    cells: Vec<u32>,
}

impl OwnershipGrid {
    /// Creates an all-unclaimed grid of `width × height` cells.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Resets every cell to unclaimed. The dimensions are unchanged.
    pub fn clear(&mut self) {
        for c in &mut self.cells {
            *c = 0;
        }
    }

    /// Maps a continuous position to a cell index, or `None` when the
    /// position falls outside the raster (NaN included).
    fn index_of(&self, x: f32, y: f32) -> Option<usize> {
        if !(x >= 0.0 && y >= 0.0) {
            return None;
        }
        let cx = x.floor() as usize;
        let cy = y.floor() as usize;
        if cx >= self.width || cy >= self.height {
            return None;
        }
        Some(cx + self.width * cy)
    }

    /// Returns the id claiming the cell under `(x, y)`, `0` if unclaimed or
    /// out of range.
    pub fn owner_at(&self, x: f32, y: f32) -> EdgeId {
        self.index_of(x, y).map_or(0, |i| self.cells[i] as EdgeId)
    }

    /// Claims the cell under `(x, y)` for `id`. Returns `false` when the
    /// position is out of range and nothing was written.
    pub(crate) fn claim(&mut self, x: f32, y: f32, id: EdgeId) -> bool {
        match self.index_of(x, y) {
            Some(i) => {
                self.cells[i] = id as u32;
                true
            }
            None => false,
        }
    }

    /// Rewrites the cell under `(x, y)` from `from` to `to`, returning
    /// whether a relabel happened. Cells owned by anyone else (or out of
    /// range) are left alone.
    pub(crate) fn relabel(&mut self, x: f32, y: f32, from: EdgeId, to: EdgeId) -> bool {
        match self.index_of(x, y) {
            Some(i) if self.cells[i] == from as u32 => {
                self.cells[i] = to as u32;
                true
            }
            _ => false,
        }
    }

    /// Read-only view of the raw cells, row-major.
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_unclaimed() {
        let g = OwnershipGrid::new(4, 3);
        assert_eq!(g.cells().len(), 12);
        assert!(g.cells().iter().all(|&c| c == 0));
        assert_eq!(g.owner_at(1.5, 1.5), 0);
    }

    #[test]
    fn claim_and_owner_round_trip() {
        let mut g = OwnershipGrid::new(10, 10);
        assert!(g.claim(3.7, 8.2, 5));
        assert_eq!(g.owner_at(3.0, 8.0), 5);
        assert_eq!(g.owner_at(3.99, 8.99), 5);
        assert_eq!(g.owner_at(4.0, 8.0), 0);
    }

    #[test]
    fn out_of_range_probes_are_inert() {
        let mut g = OwnershipGrid::new(5, 5);
        assert!(!g.claim(-0.1, 2.0, 1));
        assert!(!g.claim(2.0, 5.0, 1));
        assert!(!g.claim(f32::NAN, 2.0, 1));
        assert_eq!(g.owner_at(-1.0, 0.0), 0);
        assert_eq!(g.owner_at(0.0, 17.0), 0);
        assert!(g.cells().iter().all(|&c| c == 0));
    }

    #[test]
    fn relabel_only_touches_matching_cells() {
        let mut g = OwnershipGrid::new(5, 5);
        g.claim(1.0, 1.0, 2);
        g.claim(2.0, 1.0, 3);

        assert!(g.relabel(1.5, 1.5, 2, 7));
        assert_eq!(g.owner_at(1.0, 1.0), 7);

        // Wrong current owner: untouched.
        assert!(!g.relabel(2.5, 1.5, 2, 7));
        assert_eq!(g.owner_at(2.0, 1.0), 3);

        // Out of range: no-op.
        assert!(!g.relabel(-3.0, 1.0, 2, 7));
    }

    #[test]
    fn clear_resets_all_cells() {
        let mut g = OwnershipGrid::new(3, 3);
        g.claim(0.0, 0.0, 1);
        g.claim(2.0, 2.0, 4);
        g.clear();
        assert!(g.cells().iter().all(|&c| c == 0));
        assert_eq!(g.width(), 3);
        assert_eq!(g.height(), 3);
    }
}
