//! Engine-owned scratch lanes.
//!
//! Each engine keeps a fixed number of equally sized `f64` lanes (running
//! left/right interface fluxes, operator outputs, quadrature accumulators).
//! Lanes are sized once at configuration and reused on every sweep, so the
//! hot path never allocates. Small systems stay inline in the engine.

use smallvec::SmallVec;

/// Lanes stored inline before spilling to the heap (4 lanes of width 8).
const INLINE_SLOTS: usize = 32;

/// A fixed number of scratch lanes of a common width.
#[derive(Clone, Debug)]
pub struct ScratchLanes {
    buf: SmallVec<[f64; INLINE_SLOTS]>,
    lanes: usize,
    width: usize,
}

impl ScratchLanes {
    /// Create `lanes` zeroed lanes of `width` values each.
    pub fn new(lanes: usize, width: usize) -> Self {
        let mut buf = SmallVec::new();
        buf.resize(lanes * width, 0.0);
        Self { buf, lanes, width }
    }

    /// Number of lanes.
    pub fn lanes(&self) -> usize {
        self.lanes
    }

    /// Values per lane.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Whether the lanes currently live on the heap.
    pub fn spilled(&self) -> bool {
        self.buf.spilled()
    }

    /// Resize every lane to `width`. Returns `true` if the width changed.
    ///
    /// Lane contents are zeroed on a change and left as-is otherwise.
    pub fn resize(&mut self, width: usize) -> bool {
        if width == self.width && self.buf.len() == self.lanes * width {
            return false;
        }
        self.buf.clear();
        self.buf.resize(self.lanes * width, 0.0);
        self.width = width;
        true
    }

    /// Drop all lane storage. The next [`resize`](Self::resize) reallocates.
    pub fn release(&mut self) {
        self.buf = SmallVec::new();
        self.width = 0;
    }

    /// Borrow lane `k`. Panics if `k >= lanes()`.
    pub fn lane(&self, k: usize) -> &[f64] {
        &self.buf[k * self.width..(k + 1) * self.width]
    }

    /// Borrow the first two lanes disjointly.
    pub fn pair(&mut self) -> (&mut [f64], &mut [f64]) {
        debug_assert!(self.lanes >= 2);
        let w = self.width;
        let (a, rest) = self.buf.split_at_mut(w);
        (a, &mut rest[..w])
    }

    /// Borrow the first four lanes disjointly.
    pub fn quad(&mut self) -> [&mut [f64]; 4] {
        debug_assert!(self.lanes >= 4);
        let w = self.width;
        let (a, rest) = self.buf.split_at_mut(w);
        let (b, rest) = rest.split_at_mut(w);
        let (c, rest) = rest.split_at_mut(w);
        [a, b, c, &mut rest[..w]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_lanes_are_zeroed() {
        let s = ScratchLanes::new(4, 3);
        assert_eq!(s.lanes(), 4);
        assert_eq!(s.width(), 3);
        for k in 0..4 {
            assert_eq!(s.lane(k), &[0.0, 0.0, 0.0]);
        }
        assert!(!s.spilled());
    }

    #[test]
    fn quad_lanes_are_disjoint() {
        let mut s = ScratchLanes::new(4, 2);
        let [a, b, c, d] = s.quad();
        a.fill(1.0);
        b.fill(2.0);
        c.fill(3.0);
        d.fill(4.0);
        assert_eq!(s.lane(0), &[1.0, 1.0]);
        assert_eq!(s.lane(3), &[4.0, 4.0]);
    }

    #[test]
    fn resize_reports_change_and_zeroes() {
        let mut s = ScratchLanes::new(2, 2);
        s.pair().0.fill(9.0);
        assert!(!s.resize(2));
        assert_eq!(s.lane(0), &[9.0, 9.0]);

        assert!(s.resize(3));
        assert_eq!(s.width(), 3);
        assert_eq!(s.lane(0), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn wide_lanes_spill_to_heap() {
        let s = ScratchLanes::new(4, 16);
        assert!(s.spilled());
    }

    #[test]
    fn release_then_resize_reallocates() {
        let mut s = ScratchLanes::new(4, 16);
        s.release();
        assert_eq!(s.width(), 0);
        assert!(s.resize(16));
        assert_eq!(s.lane(3).len(), 16);
    }
}
