use core::fmt;

/// A single extent of a multi-dimensional index space.
///
/// Implementors are either compile-time constants ([`Const`]) or runtime
/// values ([`Dyn`]). `STATIC` is `Some(n)` for the former so that offset
/// computations can fold the extent away.
pub trait Dim: Copy + fmt::Debug + fmt::Display {
    /// Compile-time value of the extent, if known
    const STATIC: Option<usize>;

    /// Return the concrete value of the dimension
    fn value(self) -> usize;

    /// Returns true if the dimension is compile-time static
    #[inline(always)]
    fn is_static(self) -> bool {
        Self::STATIC.is_some()
    }
}

/// Zero-sized type representing a compile-time constant dimension
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Const<const N: usize>;

/// Dimension known only at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dyn(pub usize);

impl<const N: usize> Dim for Const<N> {
    const STATIC: Option<usize> = Some(N);

    #[inline(always)]
    fn value(self) -> usize {
        N
    }
}

impl Dim for Dyn {
    const STATIC: Option<usize> = None;

    #[inline(always)]
    fn value(self) -> usize {
        self.0
    }
}

impl Dyn {
    /// Widen a static dimension into a runtime one carrying the same value
    pub fn from_static<const N: usize>(_: Const<N>) -> Self {
        Dyn(N)
    }
}

/// Display format:
/// - Static dimensions are prefixed with `_`
/// - Dynamic dimensions print the value
impl<const N: usize> fmt::Display for Const<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_{}", N)
    }
}

impl fmt::Display for Dyn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for Dyn {
    fn from(v: usize) -> Self {
        Dyn(v)
    }
}
