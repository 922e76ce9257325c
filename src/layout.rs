use core::fmt;
use std::marker::PhantomData;

use crate::error::{MdError, Result};
use crate::shape::Shape;

/// Layout policy: the rule mapping a multi-index onto a linear offset.
///
/// Both policies shipped here are unique, exhaustive and contiguous: over
/// in-range indices the mapping is a bijection onto `[0, shape.size())`.
pub trait LayoutPolicy: Copy + Default + fmt::Debug + 'static {
    /// Short name used in benchmark ids
    const NAME: &'static str;

    /// Linear offset of `crd`. Does not check bounds.
    fn crd2idx<S: Shape>(shape: &S, crd: &S::Index) -> usize;

    /// Inverse of [`LayoutPolicy::crd2idx`]
    ///
    /// # Panics
    /// Panics if `idx` is not below `shape.size()`.
    fn idx2crd<S: Shape>(shape: &S, idx: usize) -> S::Index;

    /// Distance in elements between neighbours along dimension `r`
    fn stride<S: Shape>(shape: &S, r: usize) -> usize;
}

/// Row-major policy: last index varies fastest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowMajor;

/// Column-major policy: first index varies fastest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColMajor;

/// mdspan spelling of [`RowMajor`]
pub type LayoutRight = RowMajor;

/// mdspan spelling of [`ColMajor`]
pub type LayoutLeft = ColMajor;

impl LayoutPolicy for RowMajor {
    const NAME: &'static str = "right";

    #[inline(always)]
    fn crd2idx<S: Shape>(shape: &S, crd: &S::Index) -> usize {
        let crd = crd.as_ref();
        let mut idx = 0;
        for r in 0..S::RANK {
            idx = idx * shape.extent(r) + crd[r];
        }
        idx
    }

    fn idx2crd<S: Shape>(shape: &S, idx: usize) -> S::Index {
        assert!(idx < shape.size(), "offset {} outside span {}", idx, shape.size());
        let mut crd = shape.dims();
        let out = crd.as_mut();
        let mut rem = idx;
        for r in (0..S::RANK).rev() {
            let e = shape.extent(r);
            out[r] = rem % e;
            rem /= e;
        }
        crd
    }

    #[inline(always)]
    fn stride<S: Shape>(shape: &S, r: usize) -> usize {
        (r + 1..S::RANK).map(|d| shape.extent(d)).product()
    }
}

impl LayoutPolicy for ColMajor {
    const NAME: &'static str = "left";

    #[inline(always)]
    fn crd2idx<S: Shape>(shape: &S, crd: &S::Index) -> usize {
        let crd = crd.as_ref();
        let mut idx = 0;
        for r in (0..S::RANK).rev() {
            idx = idx * shape.extent(r) + crd[r];
        }
        idx
    }

    fn idx2crd<S: Shape>(shape: &S, idx: usize) -> S::Index {
        assert!(idx < shape.size(), "offset {} outside span {}", idx, shape.size());
        let mut crd = shape.dims();
        let out = crd.as_mut();
        let mut rem = idx;
        for r in 0..S::RANK {
            let e = shape.extent(r);
            out[r] = rem % e;
            rem /= e;
        }
        crd
    }

    #[inline(always)]
    fn stride<S: Shape>(shape: &S, r: usize) -> usize {
        (0..r).map(|d| shape.extent(d)).product()
    }
}

/// Layout = mapping from coordinates → linear index
#[derive(Debug, Clone, Copy)]
pub struct Layout<S, P = RowMajor> {
    shape: S,
    policy: PhantomData<P>,
}

impl<S: Shape> Layout<S, RowMajor> {
    pub fn row_major(shape: S) -> Self {
        Layout::new(shape)
    }
}

impl<S: Shape> Layout<S, ColMajor> {
    pub fn col_major(shape: S) -> Self {
        Layout::new(shape)
    }
}

impl<S: Shape, P: LayoutPolicy> Layout<S, P> {
    pub fn new(shape: S) -> Self {
        Self {
            shape,
            policy: PhantomData,
        }
    }

    pub fn shape(&self) -> &S {
        &self.shape
    }

    #[inline(always)]
    pub fn extent(&self, r: usize) -> usize {
        self.shape.extent(r)
    }

    pub fn rank(&self) -> usize {
        S::RANK
    }

    /// Number of addressable elements
    pub fn size(&self) -> usize {
        self.shape.size()
    }

    /// Minimum buffer length holding every offset this layout produces
    pub fn required_span_size(&self) -> usize {
        self.shape.size()
    }

    #[inline(always)]
    pub fn stride(&self, r: usize) -> usize {
        P::stride(&self.shape, r)
    }

    pub fn strides(&self) -> S::Index {
        let mut out = self.shape.dims();
        for (r, s) in out.as_mut().iter_mut().enumerate() {
            *s = P::stride(&self.shape, r);
        }
        out
    }

    pub fn is_unique(&self) -> bool {
        true
    }

    pub fn is_exhaustive(&self) -> bool {
        true
    }

    pub fn is_contiguous(&self) -> bool {
        true
    }

    /// Whether every component of `crd` lies inside its extent
    #[inline]
    pub fn contains(&self, crd: &S::Index) -> bool {
        crd.as_ref()
            .iter()
            .enumerate()
            .all(|(r, &c)| c < self.shape.extent(r))
    }

    #[inline(always)]
    pub fn crd2idx(&self, crd: &S::Index) -> usize {
        P::crd2idx(&self.shape, crd)
    }

    pub fn checked_crd2idx(&self, crd: &S::Index) -> Result<usize> {
        if !self.contains(crd) {
            return Err(MdError::IndexOutOfBounds {
                index: crd.as_ref().to_vec(),
                extents: self.shape.dims().as_ref().to_vec(),
            });
        }
        Ok(self.crd2idx(crd))
    }

    pub fn idx2crd(&self, idx: usize) -> S::Index {
        P::idx2crd(&self.shape, idx)
    }
}
