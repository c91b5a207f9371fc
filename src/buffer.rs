//! Views over host-owned buffers.
//!
//! The host hands callbacks a raw `(pointer, length)` pair. These functions
//! turn that pair into a slice exactly once, at the boundary; nothing past
//! this module sees a raw pointer. There is no validation beyond the
//! caller-supplied length, since the host is the sole producer of callback
//! sizes.

use std::{ptr::NonNull, slice};

/// Read-only view over `size` bytes starting at `buffer`.
///
/// A null `buffer` or a zero `size` yields an empty slice.
///
/// # Safety
///
/// A non-null `buffer` must point to at least `size` readable bytes that stay
/// valid and unaliased by writers for the returned lifetime.
pub unsafe fn bytes<'a>(buffer: *const u8, size: u64) -> &'a [u8] {
    if buffer.is_null() || size == 0 {
        return &[];
    }
    slice::from_raw_parts(buffer, size as usize)
}

/// Mutable view over `size` bytes starting at `buffer`.
///
/// A null `buffer` or a zero `size` yields an empty slice.
///
/// # Safety
///
/// A non-null `buffer` must point to at least `size` writable bytes that stay
/// valid and unaliased for the returned lifetime.
pub unsafe fn bytes_mut<'a>(buffer: *mut u8, size: u64) -> &'a mut [u8] {
    if buffer.is_null() || size == 0 {
        return slice::from_raw_parts_mut(NonNull::dangling().as_ptr(), 0);
    }
    slice::from_raw_parts_mut(buffer, size as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn views_cover_exactly_the_given_length() {
        let mut data = [1u8, 2, 3, 4, 5];

        let view = unsafe { bytes(data.as_ptr(), 3) };
        assert_eq!(view, &[1, 2, 3]);

        let view = unsafe { bytes_mut(data.as_mut_ptr(), 5) };
        view[0] = 9;
        assert_eq!(data, [9, 2, 3, 4, 5]);
    }

    #[test]
    fn null_and_zero_length_become_empty() {
        assert!(unsafe { bytes(std::ptr::null(), 16) }.is_empty());
        assert!(unsafe { bytes_mut(std::ptr::null_mut(), 16) }.is_empty());

        let data = [1u8, 2];
        assert!(unsafe { bytes(data.as_ptr(), 0) }.is_empty());
    }
}
