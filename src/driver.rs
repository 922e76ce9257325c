//! Per-configuration benchmark state: allocate → fill → iterate.

use std::hint::black_box;
use std::sync::atomic::{compiler_fence, Ordering};

use rand::Rng;

use crate::element::Element;
use crate::error::Result;
use crate::fill::fill_random;
use crate::layout::{LayoutPolicy, RowMajor};
use crate::shape::{describe, Shape};
use crate::stencil::{bytes_per_iteration, stencil_raw_right, stencil_view};
use crate::tensor::Tensor;

/// One registered stencil configuration, ready to be timed
pub trait StencilCase {
    /// Extents of the swept box
    fn dims(&self) -> [usize; 3];

    /// One full sweep, fenced so the optimizer cannot merge iterations
    fn run_iteration(&mut self);

    /// Bytes read by one call to `run_iteration`
    fn bytes_per_iteration(&self) -> u64;

    /// Run `iterations` sweeps and return the bytes processed
    fn run(&mut self, iterations: u64) -> u64 {
        for _ in 0..iterations {
            self.run_iteration();
        }
        self.bytes_per_iteration() * iterations
    }
}

/// Stencil driven through [`crate::tensor::TensorView`]
pub struct StencilBench<T, S, P> {
    source: Tensor<T, S, P>,
    output: Tensor<T, S, P>,
}

impl<T, S, P> StencilBench<T, S, P>
where
    T: Element,
    S: Shape<Index = [usize; 3]>,
    P: LayoutPolicy,
{
    /// Allocate source and output for `shape` and fill both with
    /// independent random values
    pub fn new<R: Rng>(shape: S, rng: &mut R) -> Result<Self> {
        let mut source = Tensor::zeros(shape)?;
        fill_random(&mut source.as_view_mut(), rng);

        let mut output = Tensor::zeros(shape)?;
        fill_random(&mut output.as_view_mut(), rng);

        log::info!(
            "stencil setup: layout {} dtype {} extents {}",
            P::NAME,
            T::NAME,
            describe(&shape)
        );

        Ok(Self { source, output })
    }

    /// Wrap buffers that were prepared by the caller
    ///
    /// # Panics
    /// Panics if the two tensors have different extents.
    pub fn from_tensors(source: Tensor<T, S, P>, output: Tensor<T, S, P>) -> Self {
        assert_eq!(
            source.layout().shape().dims(),
            output.layout().shape().dims(),
            "StencilBench: extent mismatch"
        );
        Self { source, output }
    }

    pub fn source(&self) -> &Tensor<T, S, P> {
        &self.source
    }

    pub fn output(&self) -> &Tensor<T, S, P> {
        &self.output
    }
}

impl<T, S, P> StencilCase for StencilBench<T, S, P>
where
    T: Element,
    S: Shape<Index = [usize; 3]>,
    P: LayoutPolicy,
{
    fn dims(&self) -> [usize; 3] {
        self.source.layout().shape().dims()
    }

    #[inline]
    fn run_iteration(&mut self) {
        let s = self.source.as_view();
        let mut o = self.output.as_view_mut();
        black_box(&mut o);
        stencil_view(&s, &mut o);
        compiler_fence(Ordering::SeqCst);
    }

    fn bytes_per_iteration(&self) -> u64 {
        bytes_per_iteration::<T>(self.dims())
    }
}

/// Stencil driven through hand-indexed raw pointers, row-major only
pub struct RawStencilBench<T> {
    source: Vec<T>,
    output: Vec<T>,
    dims: [usize; 3],
}

impl<T: Element> RawStencilBench<T> {
    pub fn new<R: Rng>(x: usize, y: usize, z: usize, rng: &mut R) -> Result<Self> {
        let dims = [x, y, z];

        // fill through a dynamic row-major view, then keep only the buffer
        let mut source = Tensor::<T, _, RowMajor>::zeros(dims)?;
        fill_random(&mut source.as_view_mut(), rng);

        let mut output = Tensor::<T, _, RowMajor>::zeros(dims)?;
        fill_random(&mut output.as_view_mut(), rng);

        log::info!(
            "raw stencil setup: dtype {} extents {}",
            T::NAME,
            describe(&dims)
        );

        Ok(Self {
            source: source.into_data(),
            output: output.into_data(),
            dims,
        })
    }

    pub fn source(&self) -> &[T] {
        &self.source
    }

    pub fn output(&self) -> &[T] {
        &self.output
    }
}

impl<T: Element> StencilCase for RawStencilBench<T> {
    fn dims(&self) -> [usize; 3] {
        self.dims
    }

    #[inline]
    fn run_iteration(&mut self) {
        let [x, y, z] = self.dims;
        let s_ptr = self.source.as_ptr();
        let o_ptr = black_box(self.output.as_mut_ptr());
        // SAFETY: both buffers hold exactly x * y * z elements and are
        // separate allocations
        unsafe { stencil_raw_right(s_ptr, o_ptr, x, y, z) };
        compiler_fence(Ordering::SeqCst);
    }

    fn bytes_per_iteration(&self) -> u64 {
        bytes_per_iteration::<T>(self.dims)
    }
}
