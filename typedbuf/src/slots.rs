use alloc::vec::Vec;

use crate::error::TypedBufferError;

/// Backing memory of a `TypedBuffer`: `capacity` slots of `element_size` bytes
/// stored back to back.
///
/// The byte length is always exactly `capacity * element_size`; new slots are
/// zero-filled, vacated slots keep whatever bytes they held.
#[derive(Debug)]
pub struct Slots {
    bytes: Vec<u8>,
    element_size: usize,
}

fn byte_len(capacity: usize, element_size: usize) -> Result<usize, TypedBufferError> {
    capacity
        .checked_mul(element_size)
        .ok_or(TypedBufferError::CapacityOverflow {
            capacity,
            element_size,
        })
}

/// Copies `element` to the front of `slot` and zeroes the rest.
pub fn fill_slot(slot: &mut [u8], element: &[u8]) {
    let (head, tail) = slot.split_at_mut(element.len());
    head.copy_from_slice(element);
    tail.fill(0);
}

impl Slots {
    /// Allocates `capacity` zeroed slots.
    ///
    /// # Errors
    ///
    /// Returns `CapacityOverflow` if the byte size does not fit in `usize` and
    /// `AllocationFailed` if the allocator refuses the request.
    pub fn new(capacity: usize, element_size: usize) -> Result<Self, TypedBufferError> {
        let len = byte_len(capacity, element_size)?;
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(len)
            .map_err(|_| TypedBufferError::AllocationFailed { bytes: len })?;
        bytes.resize(len, 0);
        Ok(Self {
            bytes,
            element_size,
        })
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len() / self.element_size
    }

    pub fn element_size(&self) -> usize {
        self.element_size
    }

    /// Grows or shrinks the region to `new_capacity` slots, preserving the
    /// leading slots that still fit. On error the region is unchanged.
    pub fn resize(&mut self, new_capacity: usize) -> Result<(), TypedBufferError> {
        let new_len = byte_len(new_capacity, self.element_size)?;
        let old_len = self.bytes.len();
        if new_len > old_len {
            self.bytes
                .try_reserve_exact(new_len - old_len)
                .map_err(|_| TypedBufferError::AllocationFailed { bytes: new_len })?;
            self.bytes.resize(new_len, 0);
        } else {
            self.bytes.truncate(new_len);
            self.bytes.shrink_to(new_len);
        }
        Ok(())
    }

    /// Returns slot `index`, or `None` outside `[0, capacity)`.
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        let start = index.checked_mul(self.element_size)?;
        let end = start.checked_add(self.element_size)?;
        self.bytes.get(start..end)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut [u8]> {
        let start = index.checked_mul(self.element_size)?;
        let end = start.checked_add(self.element_size)?;
        self.bytes.get_mut(start..end)
    }

    /// Writes `data` into slot `index`, zero-filling the tail when `data` is
    /// narrower than a slot. Returns `false` if the slot does not exist or
    /// `data` is wider than a slot.
    pub fn write(&mut self, index: usize, data: &[u8]) -> bool {
        if data.len() > self.element_size {
            return false;
        }
        match self.get_mut(index) {
            Some(slot) => {
                fill_slot(slot, data);
                true
            }
            None => false,
        }
    }

    /// Moves slots `[index, end)` one slot to the right. Slot `end` must exist.
    #[allow(clippy::indexing_slicing)] // Callers keep `end < capacity`
    pub fn shift_right(&mut self, index: usize, end: usize) {
        let size = self.element_size;
        self.bytes.copy_within(index * size..end * size, (index + 1) * size);
    }

    /// Moves slots `(index, end)` one slot to the left, overwriting slot `index`.
    #[allow(clippy::indexing_slicing)] // Callers keep `end <= capacity`
    pub fn shift_left(&mut self, index: usize, end: usize) {
        let size = self.element_size;
        self.bytes.copy_within((index + 1) * size..end * size, index * size);
    }

    /// The first `count` slots as one contiguous byte slice.
    pub fn prefix(&self, count: usize) -> &[u8] {
        let end = count.saturating_mul(self.element_size).min(self.bytes.len());
        self.bytes.get(..end).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zeroed() {
        let slots = Slots::new(3, 4).unwrap();
        assert_eq!(slots.capacity(), 3);
        assert_eq!(slots.prefix(3), &[0u8; 12][..]);
    }

    #[test]
    fn test_new_overflow() {
        let err = Slots::new(usize::MAX, 2).unwrap_err();
        assert_eq!(
            err,
            TypedBufferError::CapacityOverflow {
                capacity: usize::MAX,
                element_size: 2
            }
        );
    }

    #[test]
    fn test_write_zero_fills_tail() {
        let mut slots = Slots::new(2, 4).unwrap();
        assert!(slots.write(0, &[0xFF; 4]));
        assert!(slots.write(0, &[1, 2]));
        assert_eq!(slots.get(0).unwrap(), &[1, 2, 0, 0]);
    }

    #[test]
    fn test_write_rejects_wide_data_and_missing_slot() {
        let mut slots = Slots::new(2, 2).unwrap();
        assert!(!slots.write(0, &[1, 2, 3]));
        assert!(!slots.write(2, &[1, 2]));
        assert!(slots.get(2).is_none());
    }

    #[test]
    fn test_resize_preserves_leading_slots() {
        let mut slots = Slots::new(2, 1).unwrap();
        slots.write(0, &[7]);
        slots.write(1, &[8]);

        slots.resize(4).unwrap();
        assert_eq!(slots.capacity(), 4);
        assert_eq!(slots.prefix(4), &[7, 8, 0, 0]);

        slots.resize(1).unwrap();
        assert_eq!(slots.capacity(), 1);
        assert_eq!(slots.prefix(4), &[7]);
    }

    #[test]
    fn test_shifts() {
        let mut slots = Slots::new(4, 1).unwrap();
        for (i, v) in [1u8, 2, 3].iter().enumerate() {
            slots.write(i, &[*v]);
        }

        slots.shift_right(1, 3);
        assert_eq!(slots.prefix(4), &[1, 2, 2, 3]);

        slots.shift_left(1, 4);
        assert_eq!(slots.prefix(4), &[1, 2, 3, 3]);
    }
}
