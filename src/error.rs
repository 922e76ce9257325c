use std::collections::TryReserveError;

/// Errors raised by the checked view operations and benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum MdError {
    #[error("index {index:?} out of bounds for extents {extents:?}")]
    IndexOutOfBounds {
        index: Vec<usize>,
        extents: Vec<usize>,
    },

    #[error("buffer of {len} elements is smaller than the required span of {required}")]
    BufferTooSmall { len: usize, required: usize },

    #[error("failed to allocate {elements} elements of {type_name}")]
    Allocation {
        elements: usize,
        type_name: &'static str,
        #[source]
        source: TryReserveError,
    },

    #[error("invalid value {value:?} for {key}")]
    Config { key: &'static str, value: String },
}

/// Convenience alias for `Result<T, MdError>`.
pub type Result<T> = std::result::Result<T, MdError>;
