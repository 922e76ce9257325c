use core::fmt;

use crate::dim::Dim;

/// Extent set of a multi-dimensional index space.
///
/// Implemented for tuples of [`Dim`]s, where static extents are zero-sized
/// and only the dynamic ones are stored, and for `[usize; N]` as the fully
/// dynamic form.
pub trait Shape: Copy + fmt::Debug {
    /// Number of dimensions
    const RANK: usize;

    /// Number of dimensions whose extent is only known at runtime
    const RANK_DYNAMIC: usize;

    /// Multi-index type addressing one element, `[usize; RANK]`
    type Index: Copy
        + fmt::Debug
        + PartialEq
        + AsRef<[usize]>
        + AsMut<[usize]>;

    /// Extent of dimension `r`
    fn extent(&self, r: usize) -> usize;

    /// Compile-time extent of dimension `r`, if any
    fn static_extent(r: usize) -> Option<usize>;

    /// All extents as an index-shaped array
    fn dims(&self) -> Self::Index;

    /// Total number of elements
    #[inline(always)]
    fn size(&self) -> usize {
        (0..Self::RANK).map(|r| self.extent(r)).product()
    }

    /// Rank = number of top-level modes
    #[inline(always)]
    fn rank(&self) -> usize {
        Self::RANK
    }
}

impl<const N: usize> Shape for [usize; N] {
    const RANK: usize = N;
    const RANK_DYNAMIC: usize = N;

    type Index = [usize; N];

    #[inline(always)]
    fn extent(&self, r: usize) -> usize {
        self[r]
    }

    fn static_extent(_r: usize) -> Option<usize> {
        None
    }

    #[inline(always)]
    fn dims(&self) -> [usize; N] {
        *self
    }
}

macro_rules! impl_shape_tuple {
    ($rank:expr; $($D:ident $i:tt),+) => {
        impl<$($D: Dim),+> Shape for ($($D,)+) {
            const RANK: usize = $rank;
            const RANK_DYNAMIC: usize = 0 $(+ (<$D as Dim>::STATIC.is_none() as usize))+;

            type Index = [usize; $rank];

            #[inline(always)]
            fn extent(&self, r: usize) -> usize {
                match r {
                    $($i => self.$i.value(),)+
                    _ => panic!("dimension {} out of range for rank {}", r, $rank),
                }
            }

            fn static_extent(r: usize) -> Option<usize> {
                match r {
                    $($i => <$D as Dim>::STATIC,)+
                    _ => None,
                }
            }

            #[inline(always)]
            fn dims(&self) -> [usize; $rank] {
                [$(self.$i.value()),+]
            }
        }
    };
}

impl_shape_tuple!(1; D0 0);
impl_shape_tuple!(2; D0 0, D1 1);
impl_shape_tuple!(3; D0 0, D1 1, D2 2);
impl_shape_tuple!(4; D0 0, D1 1, D2 2, D3 3);

/// Format extents the way `Dim` displays them, e.g. `(_80,80,_80)`
pub fn describe<S: Shape>(shape: &S) -> String {
    let parts: Vec<String> = (0..S::RANK)
        .map(|r| match S::static_extent(r) {
            Some(n) => format!("_{}", n),
            None => shape.extent(r).to_string(),
        })
        .collect();
    format!("({})", parts.join(","))
}
