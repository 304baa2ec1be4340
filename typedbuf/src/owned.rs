//! Slots that own boxed values.
//!
//! An owning buffer stores the address of a `Box<T>` in each slot. Addresses
//! are only ever written by `encode_box` and only ever read back as `T`, which
//! the buffer checks through the `TypeId` it records here. Raw byte writes are
//! refused on such buffers, so every live slot holds a valid, unreleased box.
#![allow(unsafe_code)]

use alloc::boxed::Box;
use alloc::string::{String, ToString};
use core::any::TypeId;
use core::fmt::{self, Display};
use core::mem::size_of;

/// Slot width of an owning buffer.
pub(crate) const ADDRESS_SIZE: usize = size_of::<usize>();

/// What an owning buffer knows about its element type.
#[derive(Clone, Copy)]
pub(crate) struct OwnedElements {
    type_id: TypeId,
    release: unsafe fn(&[u8]),
}

impl OwnedElements {
    pub fn of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            release: release_boxed::<T>,
        }
    }

    pub fn holds<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Drops the value whose address is stored in `slot`.
    ///
    /// The caller must make sure `slot` is a live slot of the buffer this
    /// descriptor belongs to, and must not read it as an address afterwards.
    pub fn release(&self, slot: &[u8]) {
        // Safe: live slots of an owning buffer hold unreleased addresses of
        // the recorded type.
        unsafe { (self.release)(slot) }
    }
}

impl fmt::Debug for OwnedElements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnedElements")
            .field("type_id", &self.type_id)
            .finish_non_exhaustive()
    }
}

pub(crate) fn encode_box<T>(value: Box<T>) -> [u8; ADDRESS_SIZE] {
    (Box::into_raw(value) as usize).to_ne_bytes()
}

fn decode(slot: &[u8]) -> Option<usize> {
    slot.try_into().ok().map(usize::from_ne_bytes)
}

/// # Safety
///
/// `slot` must hold an address produced by `encode_box::<T>` that has not
/// been released or taken.
pub(crate) unsafe fn borrow_boxed<T>(slot: &[u8]) -> Option<&T> {
    decode(slot).map(|address| unsafe { &*(address as *const T) })
}

/// # Safety
///
/// Same as `borrow_boxed`; afterwards the slot no longer owns the value.
pub(crate) unsafe fn take_boxed<T>(slot: &[u8]) -> Option<Box<T>> {
    decode(slot).map(|address| unsafe { Box::from_raw(address as *mut T) })
}

unsafe fn release_boxed<T>(slot: &[u8]) {
    drop(unsafe { take_boxed::<T>(slot) });
}

/// Renderer installed by `TypedBuffer::owning`; only ever handed live slots
/// of a buffer holding `T`.
pub(crate) fn render_boxed<T: Display>(slot: &[u8]) -> Option<String> {
    // Safe: see the function docs.
    unsafe { borrow_boxed::<T>(slot) }.map(ToString::to_string)
}
