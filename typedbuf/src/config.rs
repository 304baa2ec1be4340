use crate::element::TypeTag;
use crate::render::{ElementRenderer, RenderFormat};

/// Starting capacity that mimics a growable list created empty: one slot.
pub const AUTO_SIZE: usize = 1;

/// Starting capacity used when the caller has no better estimate.
pub const DEFAULT_SIZE: usize = 10;

/// Construction options for `TypedBuffer::from_config`.
///
/// ```
/// # use typedbuf::{BufferConfig, RenderFormat, TypeTag, TypedBuffer, AUTO_SIZE};
/// let config = BufferConfig::new(4)
///     .initial_capacity(AUTO_SIZE)
///     .type_tag(TypeTag::Signed)
///     .format(RenderFormat::from_chars(',', '(', ')'));
/// let buffer = TypedBuffer::from_config(config).unwrap();
/// assert_eq!(buffer.capacity(), 1);
/// assert!(buffer.has_renderer());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BufferConfig {
    pub initial_capacity: usize,
    pub element_size: usize,
    /// Explicit renderer; when `None` the type tag's default renderer is used
    pub renderer: Option<ElementRenderer>,
    pub type_tag: TypeTag,
    pub format: RenderFormat,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_SIZE,
            element_size: 1,
            renderer: None,
            type_tag: TypeTag::Opaque,
            format: RenderFormat::default(),
        }
    }
}

impl BufferConfig {
    /// Default options for slots of `element_size` bytes.
    #[must_use]
    pub fn new(element_size: usize) -> Self {
        Self {
            element_size,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    #[must_use]
    pub fn renderer(mut self, renderer: ElementRenderer) -> Self {
        self.renderer = Some(renderer);
        self
    }

    #[must_use]
    pub fn type_tag(mut self, type_tag: TypeTag) -> Self {
        self.type_tag = type_tag;
        self
    }

    #[must_use]
    pub fn format(mut self, format: RenderFormat) -> Self {
        self.format = format;
        self
    }

    /// The renderer a buffer built from this config ends up with.
    #[must_use]
    pub fn effective_renderer(&self) -> Option<ElementRenderer> {
        self.renderer.or_else(|| self.type_tag.default_renderer())
    }
}
