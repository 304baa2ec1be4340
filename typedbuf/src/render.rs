use alloc::string::String;
use core::ops::Range;

use crate::error::TypedBufferError;
use crate::slots::Slots;

/// Starting size of the output buffer used by `TypedBuffer::render_range`.
pub const RENDER_INITIAL_CAPACITY: usize = 16;

/// Converts the bytes of one slot into display text.
///
/// Returning `None` signals that the slot cannot be rendered; the whole
/// render then fails with `TypedBufferError::RenderFailed`.
pub type ElementRenderer = fn(&[u8]) -> Option<String>;

/// Characters placed around and between rendered elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderFormat {
    /// Emitted between consecutive elements
    pub separator: Option<char>,
    /// Emitted once before the first element
    pub prefix: Option<char>,
    /// Emitted once after the last element
    pub suffix: Option<char>,
}

fn non_nul(c: char) -> Option<char> {
    (c != '\0').then_some(c)
}

impl RenderFormat {
    /// Builds a format from plain characters, where `'\0'` means "emit nothing".
    #[must_use]
    pub fn from_chars(separator: char, prefix: char, suffix: char) -> Self {
        Self {
            separator: non_nul(separator),
            prefix: non_nul(prefix),
            suffix: non_nul(suffix),
        }
    }

    #[must_use]
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = non_nul(separator);
        self
    }

    /// Sets the characters wrapped around the whole output.
    #[must_use]
    pub fn with_delimiters(mut self, prefix: char, suffix: char) -> Self {
        self.prefix = non_nul(prefix);
        self.suffix = non_nul(suffix);
        self
    }
}

/// Output text that grows by doubling, starting at `RENDER_INITIAL_CAPACITY`.
struct RenderOutput {
    text: String,
}

impl RenderOutput {
    fn new() -> Result<Self, TypedBufferError> {
        let mut text = String::new();
        text.try_reserve_exact(RENDER_INITIAL_CAPACITY)
            .map_err(|_| TypedBufferError::AllocationFailed {
                bytes: RENDER_INITIAL_CAPACITY,
            })?;
        Ok(Self { text })
    }

    fn push_str(&mut self, s: &str) -> Result<(), TypedBufferError> {
        let needed = self
            .text
            .len()
            .checked_add(s.len())
            .ok_or(TypedBufferError::AllocationFailed { bytes: usize::MAX })?;
        if needed > self.text.capacity() {
            let mut target = self.text.capacity().max(RENDER_INITIAL_CAPACITY);
            while target < needed {
                target = target
                    .checked_mul(2)
                    .ok_or(TypedBufferError::AllocationFailed { bytes: needed })?;
            }
            self.text
                .try_reserve_exact(target - self.text.len())
                .map_err(|_| TypedBufferError::AllocationFailed { bytes: target })?;
        }
        self.text.push_str(s);
        Ok(())
    }

    fn push_char(&mut self, c: char) -> Result<(), TypedBufferError> {
        let mut utf8 = [0u8; 4];
        self.push_str(c.encode_utf8(&mut utf8))
    }

    fn finish(mut self) -> String {
        self.text.shrink_to_fit();
        self.text
    }
}

/// Renders slots `range` with `renderer`, decorated by `format`.
///
/// The range must already be validated against the live length.
pub(crate) fn render_slots(
    slots: &Slots,
    range: Range<usize>,
    renderer: ElementRenderer,
    format: RenderFormat,
) -> Result<String, TypedBufferError> {
    let mut out = RenderOutput::new()?;
    if let Some(prefix) = format.prefix {
        out.push_char(prefix)?;
    }
    let first = range.start;
    for index in range {
        if index > first {
            if let Some(separator) = format.separator {
                out.push_char(separator)?;
            }
        }
        let slot = slots.get(index).ok_or(TypedBufferError::IndexOutOfBounds {
            index,
            length: slots.capacity(),
        })?;
        let text = renderer(slot).ok_or(TypedBufferError::RenderFailed { index })?;
        out.push_str(&text)?;
    }
    if let Some(suffix) = format.suffix {
        out.push_char(suffix)?;
    }
    Ok(out.finish())
}
