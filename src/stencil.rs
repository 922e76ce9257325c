//! 3D box-stencil sweeps: one through the view abstraction, one through
//! hand-indexed raw pointers, plus the throughput arithmetic shared by
//! both.
//!
//! The raw sweep spells out the row-major offset itself and must not call
//! into `layout` or `tensor`.

use crate::element::Element;
use crate::layout::LayoutPolicy;
use crate::shape::Shape;
use crate::tensor::{TensorView, TensorViewMut};

/// Halo width, also the stencil radius
pub const HALO: usize = 1;

/// Number of source elements summed per output element, `(2d+1)^3`
pub const fn stencil_volume() -> usize {
    let w = 2 * HALO + 1;
    w * w * w
}

/// Interior points of a box with extents `dims`, zero on any thin axis
pub fn num_inner_elements(dims: [usize; 3]) -> usize {
    dims.iter().map(|e| e.saturating_sub(2 * HALO)).product()
}

/// Bytes read by one sweep over `dims` with element type `T`
pub fn bytes_per_iteration<T>(dims: [usize; 3]) -> u64 {
    (num_inner_elements(dims) * stencil_volume() * std::mem::size_of::<T>()) as u64
}

/// Bytes read by `iterations` sweeps
pub fn bytes_processed<T>(dims: [usize; 3], iterations: u64) -> u64 {
    bytes_per_iteration::<T>(dims) * iterations
}

/// Write into every interior point of `o` the sum of the surrounding
/// `(2d+1)^3` cube of `s`.
///
/// Halo points of `o` are left untouched.
///
/// # Panics
/// Panics if `s` and `o` have different extents.
pub fn stencil_view<T, S, P>(s: &TensorView<'_, T, S, P>, o: &mut TensorViewMut<'_, T, S, P>)
where
    T: Element,
    S: Shape<Index = [usize; 3]>,
    P: LayoutPolicy,
{
    assert_eq!(
        s.layout().shape().dims(),
        o.layout().shape().dims(),
        "stencil_view: extent mismatch"
    );

    let d = HALO;
    for i in d..s.extent(0).saturating_sub(d) {
        for j in d..s.extent(1).saturating_sub(d) {
            for k in d..s.extent(2).saturating_sub(d) {
                let mut sum_local = T::zero();
                for di in i - d..i + d + 1 {
                    for dj in j - d..j + d + 1 {
                        for dk in k - d..k + d + 1 {
                            // SAFETY: (i, j, k) is at least `d` from every face
                            sum_local += unsafe { *s.get_unchecked([di, dj, dk]) };
                        }
                    }
                }
                // SAFETY: interior index, extents checked equal above
                unsafe {
                    *o.get_unchecked_mut([i, j, k]) = sum_local;
                }
            }
        }
    }
}

/// Raw-pointer sweep over row-major `x * y * z` buffers.
///
/// # Safety
/// `s` must be valid for reads and `o` valid for writes of `x * y * z`
/// elements, and the two ranges must not overlap.
pub unsafe fn stencil_raw_right<T: Element>(s: *const T, o: *mut T, x: usize, y: usize, z: usize) {
    let d = HALO;
    for i in d..x.saturating_sub(d) {
        for j in d..y.saturating_sub(d) {
            for k in d..z.saturating_sub(d) {
                let mut sum_local = T::zero();
                for di in i - d..i + d + 1 {
                    for dj in j - d..j + d + 1 {
                        for dk in k - d..k + d + 1 {
                            sum_local += *s.add(dk + dj * z + di * z * y);
                        }
                    }
                }
                *o.add(k + j * z + i * z * y) = sum_local;
            }
        }
    }
}

/// Slice wrapper around [`stencil_raw_right`]
///
/// # Panics
/// Panics if `x * y * z` overflows or either slice is shorter than it.
pub fn stencil_raw<T: Element>(s: &[T], o: &mut [T], [x, y, z]: [usize; 3]) {
    let n = match x.checked_mul(y).and_then(|xy| xy.checked_mul(z)) {
        Some(n) => n,
        None => panic!("stencil_raw: extents {:?} overflow usize", [x, y, z]),
    };
    assert!(s.len() >= n, "stencil_raw: source holds {} < {}", s.len(), n);
    assert!(o.len() >= n, "stencil_raw: output holds {} < {}", o.len(), n);
    // SAFETY: lengths checked; `&` and `&mut` slices cannot overlap
    unsafe { stencil_raw_right(s.as_ptr(), o.as_mut_ptr(), x, y, z) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dim::{Const, Dyn};
    use crate::fill::{fill, fill_random};
    use crate::layout::{ColMajor, Layout, RowMajor};
    use crate::layout_iter::IndexIter;
    use crate::tensor::Tensor;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn volume_and_inner_elements() {
        assert_eq!(stencil_volume(), 27);
        assert_eq!(num_inner_elements([80, 80, 80]), 78 * 78 * 78);
        assert_eq!(num_inner_elements([5, 6, 7]), 3 * 4 * 5);
        assert_eq!(num_inner_elements([2, 80, 80]), 0);
        assert_eq!(num_inner_elements([80, 80, 0]), 0);
    }

    #[test]
    fn throughput_scales_with_iterations() {
        let dims = [80, 80, 80];
        let one = bytes_processed::<i32>(dims, 1);
        assert_eq!(one, (78 * 78 * 78 * 27 * 4) as u64);
        assert_eq!(bytes_processed::<i32>(dims, 20), 2 * bytes_processed::<i32>(dims, 10));
        assert_eq!(bytes_per_iteration::<f64>(dims), 2 * bytes_per_iteration::<f32>(dims));
    }

    #[test]
    fn ones_sum_to_stencil_volume_through_view() {
        let shape = (Const::<5>, Dyn(5), Const::<5>);
        let s = Tensor::<i32, _, RowMajor>::new(vec![1; 125], Layout::new(shape)).unwrap();
        let mut o = Tensor::<i32, _, RowMajor>::zeros(shape).unwrap();

        stencil_view(&s.as_view(), &mut o.as_view_mut());

        let o = o.as_view();
        for [i, j, k] in IndexIter::new([5usize, 5, 5]) {
            let interior = (1..4).contains(&i) && (1..4).contains(&j) && (1..4).contains(&k);
            let expected = if interior { 27 } else { 0 };
            assert_eq!(o[[i, j, k]], expected, "at {:?}", (i, j, k));
        }
    }

    #[test]
    fn ones_sum_to_stencil_volume_through_raw_pointers() {
        let s = vec![1i32; 125];
        let mut o = vec![0i32; 125];

        stencil_raw(&s, &mut o, [5, 5, 5]);

        for [i, j, k] in IndexIter::interior([5usize, 5, 5], HALO) {
            assert_eq!(o[k + j * 5 + i * 25], 27);
        }
        assert_eq!(o.iter().filter(|v| **v == 27).count(), 27);
    }

    #[test]
    fn visited_points_match_interior_count() {
        for dims in [[5usize, 6, 7], [3, 3, 3], [2, 9, 9], [9, 1, 9], [4, 4, 12]] {
            let mut s = Tensor::<i64, _, ColMajor>::zeros(dims).unwrap();
            let mut o = Tensor::<i64, _, ColMajor>::zeros(dims).unwrap();
            fill(&mut s.as_view_mut(), 1);

            stencil_view(&s.as_view(), &mut o.as_view_mut());

            let written = o.data().iter().filter(|v| **v != 0).count();
            assert_eq!(written, num_inner_elements(dims), "extents {:?}", dims);
            assert_eq!(written, IndexIter::interior(dims, HALO).count());
        }
    }

    #[test]
    fn halo_is_left_untouched() {
        let dims = [4usize, 5, 6];
        let mut rng = StdRng::seed_from_u64(3);
        let mut s = Tensor::<i32, _, RowMajor>::zeros(dims).unwrap();
        let mut o = Tensor::<i32, _, RowMajor>::zeros(dims).unwrap();
        fill_random(&mut s.as_view_mut(), &mut rng);
        fill(&mut o.as_view_mut(), -7);

        stencil_view(&s.as_view(), &mut o.as_view_mut());

        let o = o.as_view();
        for [i, j, k] in IndexIter::new(dims) {
            let on_face = i == 0 || j == 0 || k == 0 || i == 3 || j == 4 || k == 5;
            if on_face {
                assert_eq!(o[[i, j, k]], -7);
            }
        }
    }

    #[test]
    #[should_panic(expected = "overflow usize")]
    fn raw_rejects_overflowing_extents() {
        let s = [0i32; 8];
        let mut o = [0i32; 8];
        // product exceeds usize::MAX on every target width
        stencil_raw(&s, &mut o, [1 << (usize::BITS / 2 + 1), 1 << (usize::BITS / 2), 2]);
    }

    #[test]
    #[should_panic(expected = "source holds")]
    fn raw_rejects_short_source() {
        let s = [0i32; 26];
        let mut o = [0i32; 27];
        stencil_raw(&s, &mut o, [3, 3, 3]);
    }

    #[test]
    #[should_panic(expected = "extent mismatch")]
    fn mismatched_extents_panic() {
        let s = Tensor::<i32, _, RowMajor>::zeros([4usize, 4, 4]).unwrap();
        let mut o = Tensor::<i32, _, RowMajor>::zeros([4usize, 4, 5]).unwrap();
        stencil_view(&s.as_view(), &mut o.as_view_mut());
    }

    /// Run the view sweep under layout `P` on the same logical input as the
    /// raw sweep and compare point by point.
    fn view_matches_raw<P: LayoutPolicy>(dims: [usize; 3], seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let n: usize = dims.iter().product();
        let raw_s: Vec<i32> = (0..n).map(|_| i32::sample(&mut rng)).collect();
        let mut raw_o = vec![0i32; n];
        stencil_raw(&raw_s, &mut raw_o, dims);

        let right = Layout::row_major(dims);
        let mut s = Tensor::<i32, _, P>::zeros(dims).unwrap();
        {
            let mut sv = s.as_view_mut();
            for crd in IndexIter::new(dims) {
                sv[crd] = raw_s[right.crd2idx(&crd)];
            }
        }
        let mut o = Tensor::<i32, _, P>::zeros(dims).unwrap();
        stencil_view(&s.as_view(), &mut o.as_view_mut());

        let ov = o.as_view();
        for crd in IndexIter::new(dims) {
            assert_eq!(ov[crd], raw_o[right.crd2idx(&crd)], "at {:?}", crd);
        }
    }

    #[test]
    fn right_view_matches_raw_on_random_input() {
        view_matches_raw::<RowMajor>([6, 7, 8], 11);
    }

    #[test]
    fn left_view_matches_raw_on_random_input() {
        view_matches_raw::<ColMajor>([6, 7, 8], 12);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn view_and_raw_agree(x in 1..9usize, y in 1..9usize, z in 1..9usize, seed in any::<u64>()) {
            view_matches_raw::<RowMajor>([x, y, z], seed);
            view_matches_raw::<ColMajor>([x, y, z], seed);
        }
    }
}
