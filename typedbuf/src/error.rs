use thiserror::Error;

/// Error types for `TypedBuffer` operations
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum TypedBufferError {
    /// A buffer must start with at least one slot
    #[error("Invalid capacity: initial capacity must be positive")]
    ZeroCapacity,
    /// Slots must be at least one byte wide
    #[error("Invalid element size: element size must be positive")]
    ZeroElementSize,
    /// Element is wider than a slot
    #[error("Element too large: {actual} bytes given, slot holds {element_size} bytes")]
    ElementTooLarge {
        /// Length of the rejected element
        actual: usize,
        /// Slot width of the buffer
        element_size: usize,
    },
    /// Destination cannot hold a whole slot
    #[error("Destination too small: {actual} bytes given, slot holds {element_size} bytes")]
    DestinationTooSmall {
        /// Length of the destination
        actual: usize,
        /// Slot width of the buffer
        element_size: usize,
    },
    /// Typed access with a type whose size differs from the slot width
    #[error("Element size mismatch: type is {type_size} bytes, slot holds {element_size} bytes")]
    ElementSizeMismatch {
        /// `size_of` the requested type
        type_size: usize,
        /// Slot width of the buffer
        element_size: usize,
    },
    /// Slot bytes are not a valid value of the requested type
    #[error("Invalid element: slot {index} does not hold a valid value of the requested type")]
    InvalidElement {
        /// Index of the slot that was read
        index: usize,
    },
    /// Index is outside the live elements
    #[error("Index out of bounds: index {index} is beyond buffer length {length}")]
    IndexOutOfBounds {
        /// Index that was accessed
        index: usize,
        /// Current length of the buffer
        length: usize,
    },
    /// Render range is empty or reaches past the live elements
    #[error("Invalid render range: {start}..{end} for buffer length {length}")]
    InvalidRange {
        /// First index of the range
        start: usize,
        /// Exclusive end of the range
        end: usize,
        /// Current length of the buffer
        length: usize,
    },
    /// `render_range` called on a buffer without a renderer
    #[error("No renderer configured for this buffer")]
    MissingRenderer,
    /// Raw byte writes would corrupt the addresses an owning buffer holds
    #[error("Raw byte writes are not allowed on a buffer of owned elements")]
    OwningBufferRawWrite,
    /// Owned-element access on a plain buffer, or with the wrong element type
    #[error("Owned element type mismatch for this buffer")]
    OwnedTypeMismatch,
    /// `capacity * element_size` does not fit in `usize`
    #[error("Capacity overflow: {capacity} slots of {element_size} bytes")]
    CapacityOverflow {
        /// Requested number of slots
        capacity: usize,
        /// Slot width of the buffer
        element_size: usize,
    },
    /// The allocator refused to provide memory
    #[error("Allocation failed: could not allocate {bytes} bytes")]
    AllocationFailed {
        /// Size of the refused request
        bytes: usize,
    },
    /// The renderer could not produce a string for an element
    #[error("Render failed: element at index {index} could not be rendered")]
    RenderFailed {
        /// Index of the element the renderer rejected
        index: usize,
    },
}

/// The three families every `TypedBufferError` belongs to.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ErrorKind {
    /// Bad size, bad index, bad range or an operation the buffer does not allow
    InvalidArgument,
    /// Memory could not be obtained for a create, grow, shrink or render
    AllocationFailure,
    /// A per-element renderer reported failure
    RenderFailure,
}

impl TypedBufferError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CapacityOverflow { .. } | Self::AllocationFailed { .. } => {
                ErrorKind::AllocationFailure
            }
            Self::RenderFailed { .. } => ErrorKind::RenderFailure,
            _ => ErrorKind::InvalidArgument,
        }
    }

    /// Process exit code for harnesses that still terminate on error:
    /// `2` for allocation failures, `1` for everything else.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::AllocationFailure => 2,
            ErrorKind::InvalidArgument | ErrorKind::RenderFailure => 1,
        }
    }
}
