//! Multi-dimensional views with pluggable layouts, and a 3D stencil
//! benchmark comparing them against hand-indexed raw pointers.

pub mod dim;
pub mod shape;
pub mod layout;
pub mod layout_iter;
pub mod tensor;

pub mod element;
pub mod error;
pub mod fill;
pub mod stencil;
pub mod driver;
pub mod config;

pub use dim::{Const, Dim, Dyn};
pub use error::{MdError, Result};
pub use layout::{ColMajor, Layout, LayoutLeft, LayoutPolicy, LayoutRight, RowMajor};
pub use shape::Shape;
pub use tensor::{Tensor, TensorView, TensorViewMut};
