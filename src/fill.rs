use rand::Rng;

use crate::element::Element;
use crate::layout::LayoutPolicy;
use crate::layout_iter::IndexIter;
use crate::shape::Shape;
use crate::tensor::TensorViewMut;

/// Overwrite every element reachable through `view` with a random value
pub fn fill_random<T, S, P, R>(view: &mut TensorViewMut<'_, T, S, P>, rng: &mut R)
where
    T: Element,
    S: Shape,
    P: LayoutPolicy,
    R: Rng,
{
    let shape = *view.layout().shape();
    for crd in IndexIter::new(shape) {
        // SAFETY: IndexIter only yields in-range indices of `shape`
        unsafe {
            *view.get_unchecked_mut(crd) = T::sample(rng);
        }
    }
}

/// Overwrite every element reachable through `view` with `value`
pub fn fill<T, S, P>(view: &mut TensorViewMut<'_, T, S, P>, value: T)
where
    T: Copy,
    S: Shape,
    P: LayoutPolicy,
{
    let shape = *view.layout().shape();
    for crd in IndexIter::new(shape) {
        // SAFETY: as above
        unsafe {
            *view.get_unchecked_mut(crd) = value;
        }
    }
}
