//! Owning buffers and the non-owning multi-dimensional views over them.
//!
//! A view is a pointer plus a [`Layout`]. Indexing comes in two flavours:
//! the checked `get` / `Index` path and the `unsafe` `get_unchecked` path
//! used inside hot loops where the caller already guarantees bounds.

use std::marker::PhantomData;
use std::ops::{Index, IndexMut};
use std::ptr::NonNull;

use num_traits::Zero;

use crate::error::{MdError, Result};
use crate::layout::{Layout, LayoutPolicy, RowMajor};
use crate::shape::Shape;

/* ========================= Tensor ========================= */

/// Heap buffer of exactly `required_span_size()` elements plus its layout
pub struct Tensor<T, S, P = RowMajor> {
    data: Vec<T>,
    layout: Layout<S, P>,
}

impl<T, S: Shape, P: LayoutPolicy> Tensor<T, S, P> {
    pub fn new(data: Vec<T>, layout: Layout<S, P>) -> Result<Self> {
        check_len(data.len(), layout.required_span_size())?;
        Ok(Self { data, layout })
    }

    /// Allocate a zero-filled buffer for `shape`.
    ///
    /// Allocation failure is reported instead of aborting the process.
    pub fn zeros(shape: S) -> Result<Self>
    where
        T: Zero + Clone,
    {
        let layout = Layout::new(shape);
        let elements = layout.required_span_size();

        let mut data = Vec::new();
        data.try_reserve_exact(elements)
            .map_err(|source| MdError::Allocation {
                elements,
                type_name: std::any::type_name::<T>(),
                source,
            })?;
        data.resize(elements, T::zero());

        log::debug!(
            "allocated {} elements ({} bytes) for {:?}",
            elements,
            elements * std::mem::size_of::<T>(),
            shape
        );

        Ok(Self { data, layout })
    }

    pub fn layout(&self) -> &Layout<S, P> {
        &self.layout
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Give up the layout and keep the buffer
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    pub fn required_span_size(&self) -> usize {
        self.layout.required_span_size()
    }

    pub fn as_view(&self) -> TensorView<'_, T, S, P> {
        TensorView {
            ptr: NonNull::from(self.data.as_slice()).cast(),
            layout: self.layout,
            _marker: PhantomData,
        }
    }

    pub fn as_view_mut(&mut self) -> TensorViewMut<'_, T, S, P> {
        TensorViewMut {
            ptr: NonNull::from(self.data.as_mut_slice()).cast(),
            layout: self.layout,
            _marker: PhantomData,
        }
    }
}

fn check_len(len: usize, required: usize) -> Result<()> {
    if len < required {
        return Err(MdError::BufferTooSmall { len, required });
    }
    Ok(())
}

/* ========================= TensorView ========================= */

/// Read-only multi-dimensional view borrowing its buffer for `'a`
pub struct TensorView<'a, T, S, P = RowMajor> {
    ptr: NonNull<T>,
    layout: Layout<S, P>,
    _marker: PhantomData<&'a T>,
}

/// Mutable multi-dimensional view borrowing its buffer for `'a`
pub struct TensorViewMut<'a, T, S, P = RowMajor> {
    ptr: NonNull<T>,
    layout: Layout<S, P>,
    _marker: PhantomData<&'a mut T>,
}

impl<T, S: Shape, P: LayoutPolicy> Clone for TensorView<'_, T, S, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, S: Shape, P: LayoutPolicy> Copy for TensorView<'_, T, S, P> {}

impl<'a, T, S: Shape, P: LayoutPolicy> TensorView<'a, T, S, P> {
    /// View `data` through `shape`; fails if `data` is shorter than the span
    pub fn from_slice(data: &'a [T], shape: S) -> Result<Self> {
        let layout = Layout::new(shape);
        check_len(data.len(), layout.required_span_size())?;
        Ok(Self {
            ptr: NonNull::from(data).cast(),
            layout,
            _marker: PhantomData,
        })
    }

    /// # Safety
    /// `ptr` must be non-null and valid for reads of
    /// `required_span_size()` elements for the whole of `'a`.
    pub unsafe fn from_raw_parts(ptr: *const T, shape: S) -> Self {
        Self {
            ptr: NonNull::new_unchecked(ptr as *mut T),
            layout: Layout::new(shape),
            _marker: PhantomData,
        }
    }

    pub fn layout(&self) -> &Layout<S, P> {
        &self.layout
    }

    #[inline(always)]
    pub fn extent(&self, r: usize) -> usize {
        self.layout.extent(r)
    }

    pub fn rank(&self) -> usize {
        S::RANK
    }

    pub fn required_span_size(&self) -> usize {
        self.layout.required_span_size()
    }

    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    pub fn get(&self, crd: S::Index) -> Result<&'a T> {
        let idx = self.layout.checked_crd2idx(&crd)?;
        Ok(unsafe { &*self.ptr.as_ptr().add(idx) })
    }

    /// # Safety
    /// Every component of `crd` must be below the matching extent.
    #[inline(always)]
    pub unsafe fn get_unchecked(&self, crd: S::Index) -> &'a T {
        let idx = self.layout.crd2idx(&crd);
        &*self.ptr.as_ptr().add(idx)
    }
}

impl<'a, T, S: Shape, P: LayoutPolicy> TensorViewMut<'a, T, S, P> {
    /// View `data` through `shape`; fails if `data` is shorter than the span
    pub fn from_slice(data: &'a mut [T], shape: S) -> Result<Self> {
        let layout = Layout::new(shape);
        check_len(data.len(), layout.required_span_size())?;
        Ok(Self {
            ptr: NonNull::from(data).cast(),
            layout,
            _marker: PhantomData,
        })
    }

    /// # Safety
    /// `ptr` must be non-null, valid for reads and writes of
    /// `required_span_size()` elements for the whole of `'a`, and not
    /// accessed through any other path meanwhile.
    pub unsafe fn from_raw_parts(ptr: *mut T, shape: S) -> Self {
        Self {
            ptr: NonNull::new_unchecked(ptr),
            layout: Layout::new(shape),
            _marker: PhantomData,
        }
    }

    pub fn layout(&self) -> &Layout<S, P> {
        &self.layout
    }

    #[inline(always)]
    pub fn extent(&self, r: usize) -> usize {
        self.layout.extent(r)
    }

    pub fn rank(&self) -> usize {
        S::RANK
    }

    pub fn required_span_size(&self) -> usize {
        self.layout.required_span_size()
    }

    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Reborrow as a read-only view
    pub fn view(&self) -> TensorView<'_, T, S, P> {
        TensorView {
            ptr: self.ptr,
            layout: self.layout,
            _marker: PhantomData,
        }
    }

    pub fn get(&self, crd: S::Index) -> Result<&T> {
        let idx = self.layout.checked_crd2idx(&crd)?;
        Ok(unsafe { &*self.ptr.as_ptr().add(idx) })
    }

    pub fn get_mut(&mut self, crd: S::Index) -> Result<&mut T> {
        let idx = self.layout.checked_crd2idx(&crd)?;
        Ok(unsafe { &mut *self.ptr.as_ptr().add(idx) })
    }

    /// # Safety
    /// Every component of `crd` must be below the matching extent.
    #[inline(always)]
    pub unsafe fn get_unchecked(&self, crd: S::Index) -> &T {
        let idx = self.layout.crd2idx(&crd);
        &*self.ptr.as_ptr().add(idx)
    }

    /// # Safety
    /// Every component of `crd` must be below the matching extent.
    #[inline(always)]
    pub unsafe fn get_unchecked_mut(&mut self, crd: S::Index) -> &mut T {
        let idx = self.layout.crd2idx(&crd);
        &mut *self.ptr.as_ptr().add(idx)
    }
}

impl<T, S: Shape, P: LayoutPolicy> Index<S::Index> for TensorView<'_, T, S, P> {
    type Output = T;

    fn index(&self, crd: S::Index) -> &T {
        match self.get(crd) {
            Ok(v) => v,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T, S: Shape, P: LayoutPolicy> Index<S::Index> for TensorViewMut<'_, T, S, P> {
    type Output = T;

    fn index(&self, crd: S::Index) -> &T {
        match self.get(crd) {
            Ok(v) => v,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T, S: Shape, P: LayoutPolicy> IndexMut<S::Index> for TensorViewMut<'_, T, S, P> {
    fn index_mut(&mut self, crd: S::Index) -> &mut T {
        match self.get_mut(crd) {
            Ok(v) => v,
            Err(err) => panic!("{err}"),
        }
    }
}

/* ========================= Tests ========================= */
