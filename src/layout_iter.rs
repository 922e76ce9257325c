use crate::shape::Shape;

/// Lexicographic walk over a box of multi-indices, last index fastest.
///
/// The box is `[lo_r, hi_r)` per dimension. An empty range on any axis
/// yields nothing.
pub struct IndexIter<S: Shape> {
    lo: S::Index,
    hi: S::Index,
    current: S::Index,
    done: bool,
}

impl<S: Shape> IndexIter<S> {
    /// Every in-range index of `shape`
    pub fn new(shape: S) -> Self {
        Self::interior(shape, 0)
    }

    /// Indices at least `halo` away from every face of `shape`
    pub fn interior(shape: S, halo: usize) -> Self {
        let mut lo = shape.dims();
        let mut hi = shape.dims();
        for r in 0..S::RANK {
            lo.as_mut()[r] = halo;
            hi.as_mut()[r] = shape.extent(r).saturating_sub(halo);
        }

        let done = lo
            .as_ref()
            .iter()
            .zip(hi.as_ref())
            .any(|(l, h)| l >= h);

        Self {
            lo,
            hi,
            current: lo,
            done,
        }
    }

    /// Number of indices in the whole box
    pub fn volume(&self) -> usize {
        self.lo
            .as_ref()
            .iter()
            .zip(self.hi.as_ref())
            .map(|(l, h)| h.saturating_sub(*l))
            .product()
    }
}

impl<S: Shape> Iterator for IndexIter<S> {
    type Item = S::Index;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;

        // Increment index lexicographically
        let cur = self.current.as_mut();
        if cur.is_empty() {
            // rank 0 has exactly one index
            self.done = true;
        }
        for i in (0..cur.len()).rev() {
            cur[i] += 1;
            if cur[i] < self.hi.as_ref()[i] {
                break;
            } else {
                cur[i] = self.lo.as_ref()[i];
                if i == 0 {
                    self.done = true;
                }
            }
        }

        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dim::{Const, Dyn};

    #[test]
    fn full_iter_2d() {
        let idx: Vec<_> = IndexIter::new([2usize, 3]).collect();
        assert_eq!(
            idx,
            vec![[0, 0], [0, 1], [0, 2], [1, 0], [1, 1], [1, 2]]
        );
    }

    #[test]
    fn interior_iter_3d() {
        let shape = (Const::<4>, Dyn(5), Const::<6>);
        let it = IndexIter::interior(shape, 1);
        assert_eq!(it.volume(), 2 * 3 * 4);

        let idx: Vec<_> = it.collect();
        assert_eq!(idx.len(), 2 * 3 * 4);
        assert_eq!(idx[0], [1, 1, 1]);
        assert_eq!(idx[1], [1, 1, 2]);
        assert_eq!(*idx.last().unwrap(), [2, 3, 4]);
    }

    #[test]
    fn thin_axis_yields_nothing() {
        assert_eq!(IndexIter::interior([2usize, 9, 9], 1).count(), 0);
        assert_eq!(IndexIter::interior([9usize, 9, 1], 1).count(), 0);
        assert_eq!(IndexIter::interior([9usize, 9, 1], 1).volume(), 0);
        assert_eq!(IndexIter::new([0usize, 3]).count(), 0);
    }

    #[test]
    fn rank_zero_yields_one_index() {
        let it = IndexIter::new([0usize; 0]);
        assert_eq!(it.volume(), 1);
        assert_eq!(it.count(), 1);
        assert_eq!(IndexIter::interior([0usize; 0], 1).count(), 1);
    }

    #[test]
    fn smallest_interior_is_one_point() {
        let idx: Vec<_> = IndexIter::interior([3usize, 3, 3], 1).collect();
        assert_eq!(idx, vec![[1, 1, 1]]);
    }
}
