use alloc::boxed::Box;
use alloc::string::String;
use core::fmt::Display;
use core::marker::PhantomData;

use crate::config::{BufferConfig, AUTO_SIZE, DEFAULT_SIZE};
use crate::element::{Element, TypeTag};
use crate::error::TypedBufferError;
use crate::owned::{self, OwnedElements, ADDRESS_SIZE};
use crate::render::{self, ElementRenderer, RenderFormat};
use crate::slots::{fill_slot, Slots};

/// A growable array of fixed-size, type-erased slots
///
/// Capacity doubles when an element is added to a full buffer and halves when
/// a removal leaves the buffer at most a quarter full. Capacity never drops
/// below one slot.
#[derive(Debug)]
pub struct TypedBuffer {
    slots: Slots,
    length: usize,
    renderer: Option<ElementRenderer>,
    type_tag: TypeTag,
    format: RenderFormat,
    owned: Option<OwnedElements>,
    // Owned slots may hold values that must stay on their thread.
    _not_send: PhantomData<*const ()>,
}

impl TypedBuffer {
    /// Creates an empty buffer of `capacity` slots, each `element_size` bytes wide.
    ///
    /// # Errors
    ///
    /// Returns `ZeroCapacity` or `ZeroElementSize` for a zero argument,
    /// `CapacityOverflow` or `AllocationFailed` if the memory cannot be obtained.
    pub fn new(capacity: usize, element_size: usize) -> Result<Self, TypedBufferError> {
        Self::from_config(BufferConfig::new(element_size).initial_capacity(capacity))
    }

    /// Creates a buffer that starts with a single slot (`AUTO_SIZE`).
    ///
    /// # Errors
    ///
    /// Same as [`TypedBuffer::new`].
    pub fn with_auto_capacity(element_size: usize) -> Result<Self, TypedBufferError> {
        Self::new(AUTO_SIZE, element_size)
    }

    /// Creates a buffer that starts with `DEFAULT_SIZE` slots.
    ///
    /// # Errors
    ///
    /// Same as [`TypedBuffer::new`].
    pub fn with_default_capacity(element_size: usize) -> Result<Self, TypedBufferError> {
        Self::new(DEFAULT_SIZE, element_size)
    }

    /// Creates a buffer from a full set of options.
    ///
    /// # Errors
    ///
    /// Same as [`TypedBuffer::new`]. Returns `OwnedTypeMismatch` for
    /// `TypeTag::Owning`: owning buffers need an element type and are built
    /// with [`TypedBuffer::owning`].
    pub fn from_config(config: BufferConfig) -> Result<Self, TypedBufferError> {
        if config.type_tag.owns_elements() {
            return Err(TypedBufferError::OwnedTypeMismatch);
        }
        Self::build(config, None)
    }

    /// Creates a buffer whose slot width, type tag and renderer come from `T`.
    ///
    /// # Errors
    ///
    /// Same as [`TypedBuffer::new`].
    pub fn for_type<T: Element>(capacity: usize) -> Result<Self, TypedBufferError> {
        Self::from_config(
            BufferConfig::new(T::SIZE)
                .initial_capacity(capacity)
                .type_tag(T::TAG),
        )
    }

    /// Creates a buffer that owns boxed `T` values.
    ///
    /// Values are added with [`TypedBuffer::push_owned`] and
    /// [`TypedBuffer::insert_owned`]. A value is dropped when it is removed,
    /// cleared, or when the buffer is released or dropped; it is handed back
    /// instead by [`TypedBuffer::take_owned`].
    ///
    /// # Errors
    ///
    /// Same as [`TypedBuffer::new`].
    pub fn owning<T: Display + 'static>(capacity: usize) -> Result<Self, TypedBufferError> {
        let config = BufferConfig::new(ADDRESS_SIZE)
            .initial_capacity(capacity)
            .type_tag(TypeTag::Owning)
            .renderer(owned::render_boxed::<T>);
        Self::build(config, Some(OwnedElements::of::<T>()))
    }

    fn build(
        config: BufferConfig,
        owned: Option<OwnedElements>,
    ) -> Result<Self, TypedBufferError> {
        if config.initial_capacity == 0 {
            return Err(TypedBufferError::ZeroCapacity);
        }
        if config.element_size == 0 {
            return Err(TypedBufferError::ZeroElementSize);
        }
        let slots = Slots::new(config.initial_capacity, config.element_size)?;
        trace!(
            "created buffer: capacity {}, element size {}, type {:?}",
            config.initial_capacity,
            config.element_size,
            config.type_tag
        );
        Ok(Self {
            slots,
            length: 0,
            renderer: config.effective_renderer(),
            type_tag: config.type_tag,
            format: config.format,
            owned,
            _not_send: PhantomData,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.length
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Number of slots currently allocated.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    #[must_use]
    pub fn element_size(&self) -> usize {
        self.slots.element_size()
    }

    #[must_use]
    pub fn type_tag(&self) -> TypeTag {
        self.type_tag
    }

    #[must_use]
    pub fn format(&self) -> RenderFormat {
        self.format
    }

    #[must_use]
    pub fn has_renderer(&self) -> bool {
        self.renderer.is_some()
    }

    /// The live elements as one contiguous byte slice.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.slots.prefix(self.length)
    }

    fn check_index(&self, index: usize) -> Result<(), TypedBufferError> {
        if index >= self.length {
            return Err(TypedBufferError::IndexOutOfBounds {
                index,
                length: self.length,
            });
        }
        Ok(())
    }

    fn check_plain(&self) -> Result<(), TypedBufferError> {
        if self.owned.is_some() {
            return Err(TypedBufferError::OwningBufferRawWrite);
        }
        Ok(())
    }

    fn check_raw_write(&self, data: &[u8]) -> Result<(), TypedBufferError> {
        self.check_plain()?;
        if data.len() > self.element_size() {
            return Err(TypedBufferError::ElementTooLarge {
                actual: data.len(),
                element_size: self.element_size(),
            });
        }
        Ok(())
    }

    fn check_type<T: Element>(&self) -> Result<(), TypedBufferError> {
        if T::SIZE != self.element_size() {
            return Err(TypedBufferError::ElementSizeMismatch {
                type_size: T::SIZE,
                element_size: self.element_size(),
            });
        }
        Ok(())
    }

    fn owned_as<T: 'static>(&self) -> Result<OwnedElements, TypedBufferError> {
        match self.owned {
            Some(owned) if owned.holds::<T>() => Ok(owned),
            _ => Err(TypedBufferError::OwnedTypeMismatch),
        }
    }

    /// Doubles the capacity if every slot is in use.
    fn grow_if_full(&mut self) -> Result<(), TypedBufferError> {
        let capacity = self.capacity();
        if self.length < capacity {
            return Ok(());
        }
        let doubled = capacity
            .checked_mul(2)
            .ok_or(TypedBufferError::CapacityOverflow {
                capacity,
                element_size: self.element_size(),
            })?;
        self.slots.resize(doubled)?;
        debug!("grew buffer: capacity {} -> {}", capacity, doubled);
        Ok(())
    }

    /// Halves the capacity once if at most a quarter of it is in use.
    fn shrink_if_sparse(&mut self) -> Result<(), TypedBufferError> {
        let capacity = self.capacity();
        if capacity > 1 && self.length <= capacity / 4 {
            let halved = capacity / 2;
            self.slots.resize(halved)?;
            debug!("shrank buffer: capacity {} -> {}", capacity, halved);
        }
        Ok(())
    }

    /// Reserves slot `length` and returns it for writing.
    fn open_end_slot(&mut self) -> Result<&mut [u8], TypedBufferError> {
        self.grow_if_full()?;
        let length = self.length;
        self.slots
            .get_mut(length)
            .ok_or(TypedBufferError::IndexOutOfBounds { index: length, length })
    }

    /// Makes room at `index` by shifting `[index, length)` right and returns
    /// the freed slot for writing.
    fn open_slot_at(&mut self, index: usize) -> Result<&mut [u8], TypedBufferError> {
        // Inserting needs an existing element at `index`; the end of the
        // buffer is only reachable through append.
        if self.length == 0 || index >= self.length {
            return Err(TypedBufferError::IndexOutOfBounds {
                index,
                length: self.length,
            });
        }
        self.grow_if_full()?;
        self.slots.shift_right(index, self.length);
        let length = self.length;
        self.slots
            .get_mut(index)
            .ok_or(TypedBufferError::IndexOutOfBounds { index, length })
    }

    /// Drops slot `index` from the live range and applies the shrink policy.
    fn close_slot_at(&mut self, index: usize) -> Result<(), TypedBufferError> {
        self.slots.shift_left(index, self.length);
        self.length -= 1;
        self.shrink_if_sparse()
    }

    /// Appends one element at index `len()`.
    ///
    /// An element narrower than a slot is zero-padded.
    ///
    /// # Errors
    ///
    /// Returns `ElementTooLarge` if `element` is wider than a slot,
    /// `OwningBufferRawWrite` on an owning buffer, and an allocation error if
    /// the buffer is full and cannot grow. The buffer is unchanged on error.
    pub fn append(&mut self, element: &[u8]) -> Result<(), TypedBufferError> {
        self.check_raw_write(element)?;
        let slot = self.open_end_slot()?;
        fill_slot(slot, element);
        self.length += 1;
        Ok(())
    }

    /// Inserts one element before `index`, shifting later elements right.
    ///
    /// `index` must name an existing element: inserting into an empty buffer,
    /// or at `len()`, is rejected. Use [`TypedBuffer::append`] for the end.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfBounds` for `index >= len()`, otherwise the same
    /// errors as [`TypedBuffer::append`].
    pub fn insert(&mut self, element: &[u8], index: usize) -> Result<(), TypedBufferError> {
        self.check_raw_write(element)?;
        let slot = self.open_slot_at(index)?;
        fill_slot(slot, element);
        self.length += 1;
        Ok(())
    }

    /// Removes the element at `index`, shifting later elements left.
    ///
    /// In an owning buffer the removed value is dropped. The vacated slot is
    /// not cleared.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfBounds` if `index >= len()`, including any index on
    /// an empty buffer.
    pub fn remove(&mut self, index: usize) -> Result<(), TypedBufferError> {
        self.check_index(index)?;
        if let Some(owned) = self.owned {
            if let Some(slot) = self.slots.get(index) {
                owned.release(slot);
                trace!("released owned element at index {}", index);
            }
        }
        self.close_slot_at(index)
    }

    /// Borrows the bytes of element `index`.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfBounds` if `index >= len()`.
    pub fn get(&self, index: usize) -> Result<&[u8], TypedBufferError> {
        self.check_index(index)?;
        self.slots.get(index).ok_or(TypedBufferError::IndexOutOfBounds {
            index,
            length: self.length,
        })
    }

    /// Copies element `index` into the first `element_size()` bytes of
    /// `destination`.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfBounds` if `index >= len()` and
    /// `DestinationTooSmall` if `destination` cannot hold a whole slot.
    pub fn get_copy(&self, destination: &mut [u8], index: usize) -> Result<(), TypedBufferError> {
        let slot = self.get(index)?;
        let available = destination.len();
        let target = destination
            .get_mut(..slot.len())
            .ok_or(TypedBufferError::DestinationTooSmall {
                actual: available,
                element_size: slot.len(),
            })?;
        target.copy_from_slice(slot);
        Ok(())
    }

    /// Overwrites element `index`; a narrower source is zero-padded.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfBounds` if `index >= len()`, plus the size and
    /// owning-buffer errors of [`TypedBuffer::append`].
    pub fn set(&mut self, index: usize, source: &[u8]) -> Result<(), TypedBufferError> {
        self.check_raw_write(source)?;
        self.check_index(index)?;
        if !self.slots.write(index, source) {
            return Err(TypedBufferError::IndexOutOfBounds {
                index,
                length: self.length,
            });
        }
        Ok(())
    }

    /// Releases owned values of live elements and empties the buffer.
    /// Capacity is kept.
    pub fn clear(&mut self) {
        self.release_owned();
    }

    /// Destroys the buffer, dropping every owned value first.
    ///
    /// Returns the number of owned values released (always `0` for plain
    /// buffers). Dropping the buffer has the same effect; this form makes the
    /// release point explicit.
    pub fn release(mut self) -> usize {
        let released = self.release_owned();
        trace!(
            "released buffer: {} owned elements, capacity {}",
            released,
            self.capacity()
        );
        released
    }

    fn release_owned(&mut self) -> usize {
        let length = self.length;
        self.length = 0;
        let Some(owned) = self.owned else {
            return 0;
        };
        let mut released = 0;
        for index in 0..length {
            if let Some(slot) = self.slots.get(index) {
                owned.release(slot);
                released += 1;
            }
        }
        released
    }

    /// Renders elements `[start, end)` with the configured renderer and format.
    ///
    /// ```
    /// # use typedbuf::{RenderFormat, TypedBuffer, BufferConfig, TypeTag};
    /// let config = BufferConfig::new(4)
    ///     .type_tag(TypeTag::Signed)
    ///     .format(RenderFormat::from_chars(' ', '[', ']'));
    /// let mut buffer = TypedBuffer::from_config(config).unwrap();
    /// for v in [1i32, 2, 3] {
    ///     buffer.push(v).unwrap();
    /// }
    /// assert_eq!(buffer.render_range(0, 3).unwrap(), "[1 2 3]");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `MissingRenderer` without a renderer, `InvalidRange` unless
    /// `start < end <= len()`, `RenderFailed` if the renderer rejects an
    /// element, and `AllocationFailed` if the output cannot grow.
    pub fn render_range(&self, start: usize, end: usize) -> Result<String, TypedBufferError> {
        let renderer = self.renderer.ok_or(TypedBufferError::MissingRenderer)?;
        if start >= self.length || end > self.length || start >= end {
            return Err(TypedBufferError::InvalidRange {
                start,
                end,
                length: self.length,
            });
        }
        render::render_slots(&self.slots, start..end, renderer, self.format)
    }

    /// Renders every element.
    ///
    /// # Errors
    ///
    /// Same as [`TypedBuffer::render_range`]; an empty buffer is an `InvalidRange`.
    pub fn render_all(&self) -> Result<String, TypedBufferError> {
        self.render_range(0, self.length)
    }

    /// Appends a typed value.
    ///
    /// # Errors
    ///
    /// Returns `ElementSizeMismatch` unless `T::SIZE == element_size()`,
    /// plus the errors of [`TypedBuffer::append`].
    pub fn push<T: Element>(&mut self, value: T) -> Result<(), TypedBufferError> {
        self.check_plain()?;
        self.check_type::<T>()?;
        value.write_to(self.open_end_slot()?);
        self.length += 1;
        Ok(())
    }

    /// Inserts a typed value before `index`.
    ///
    /// # Errors
    ///
    /// Same as [`TypedBuffer::push`] and [`TypedBuffer::insert`].
    pub fn insert_value<T: Element>(
        &mut self,
        value: T,
        index: usize,
    ) -> Result<(), TypedBufferError> {
        self.check_plain()?;
        self.check_type::<T>()?;
        value.write_to(self.open_slot_at(index)?);
        self.length += 1;
        Ok(())
    }

    /// Reads element `index` as a `T`.
    ///
    /// # Errors
    ///
    /// Returns `ElementSizeMismatch`, `IndexOutOfBounds`, or `InvalidElement`
    /// when the bytes are not a valid `T` (for example a surrogate as `char`).
    pub fn get_value<T: Element>(&self, index: usize) -> Result<T, TypedBufferError> {
        self.check_type::<T>()?;
        T::read_from(self.get(index)?).ok_or(TypedBufferError::InvalidElement { index })
    }

    /// Overwrites element `index` with a typed value.
    ///
    /// # Errors
    ///
    /// Returns `ElementSizeMismatch` or `IndexOutOfBounds`.
    pub fn set_value<T: Element>(
        &mut self,
        index: usize,
        value: T,
    ) -> Result<(), TypedBufferError> {
        self.check_plain()?;
        self.check_type::<T>()?;
        self.check_index(index)?;
        let length = self.length;
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(TypedBufferError::IndexOutOfBounds { index, length })?;
        value.write_to(slot);
        Ok(())
    }

    /// Appends a boxed value to an owning buffer.
    ///
    /// # Errors
    ///
    /// Returns `OwnedTypeMismatch` unless the buffer was built with
    /// `owning::<T>()`, and an allocation error if it cannot grow. The value
    /// is dropped on error.
    pub fn push_owned<T: 'static>(&mut self, value: Box<T>) -> Result<(), TypedBufferError> {
        self.owned_as::<T>()?;
        let slot = self.open_end_slot()?;
        slot.copy_from_slice(&owned::encode_box(value));
        self.length += 1;
        Ok(())
    }

    /// Inserts a boxed value before `index` in an owning buffer.
    ///
    /// # Errors
    ///
    /// Same as [`TypedBuffer::push_owned`] and [`TypedBuffer::insert`].
    pub fn insert_owned<T: 'static>(
        &mut self,
        value: Box<T>,
        index: usize,
    ) -> Result<(), TypedBufferError> {
        self.owned_as::<T>()?;
        let slot = self.open_slot_at(index)?;
        slot.copy_from_slice(&owned::encode_box(value));
        self.length += 1;
        Ok(())
    }

    /// Borrows the owned value at `index`.
    ///
    /// # Errors
    ///
    /// Returns `OwnedTypeMismatch` or `IndexOutOfBounds`.
    #[allow(unsafe_code)]
    pub fn get_owned<T: 'static>(&self, index: usize) -> Result<&T, TypedBufferError> {
        self.owned_as::<T>()?;
        let slot = self.get(index)?;
        // Safe: the buffer holds `T` and live slots only contain addresses
        // written by `push_owned`/`insert_owned`.
        unsafe { owned::borrow_boxed::<T>(slot) }
            .ok_or(TypedBufferError::InvalidElement { index })
    }

    /// Removes the owned value at `index` and hands it back without dropping it.
    ///
    /// # Errors
    ///
    /// Returns `OwnedTypeMismatch` or `IndexOutOfBounds`.
    #[allow(unsafe_code)]
    pub fn take_owned<T: 'static>(&mut self, index: usize) -> Result<Box<T>, TypedBufferError> {
        self.owned_as::<T>()?;
        let slot = self.get(index)?;
        // Safe: as in `get_owned`; the slot leaves the live range right after.
        let value = unsafe { owned::take_boxed::<T>(slot) }
            .ok_or(TypedBufferError::InvalidElement { index })?;
        self.close_slot_at(index)?;
        Ok(value)
    }
}

impl Drop for TypedBuffer {
    fn drop(&mut self) {
        self.release_owned();
    }
}
