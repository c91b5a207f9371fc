//! Script-defined virtual memory providers.

use crate::buffer;

/// A virtual memory source/sink the host can read from and write to once
/// registered through [`crate::ProviderRegistry`].
///
/// Backing storage is entirely provider-defined; the bridge holds no bytes
/// itself. The host may invoke a registered provider on a thread of its
/// choosing, so all capability methods take `&self` and mutation goes through
/// interior mutability.
///
/// The typed `read`/`write` methods are the single source of truth for
/// behavior. The raw overloads exist only to satisfy the host calling
/// convention and immediately delegate through a bounds-known slice view;
/// implementors normally leave them alone.
pub trait MemoryProvider: Send + Sync {
    /// Fills `data` with the provider's bytes starting at `address`.
    fn read(&self, address: u64, data: &mut [u8]);

    /// Writes `data` into the provider at `address`.
    fn write(&self, address: u64, data: &[u8]);

    /// Logical extent of the provider's address space, computed on demand.
    fn get_size(&self) -> u64;

    /// Stable identifier of the provider's kind, used by the host for
    /// menu/category display. Immutable after construction.
    fn type_name(&self) -> &str;

    /// Instance display name. Immutable after construction.
    fn name(&self) -> &str;

    /// # Safety
    ///
    /// A non-null `buffer` must point to at least `size` writable bytes for
    /// the duration of the call.
    unsafe fn read_raw(&self, address: u64, buffer: *mut u8, size: u64) {
        self.read(address, buffer::bytes_mut(buffer, size));
    }

    /// # Safety
    ///
    /// A non-null `buffer` must point to at least `size` readable bytes for
    /// the duration of the call.
    unsafe fn write_raw(&self, address: u64, buffer: *const u8, size: u64) {
        self.write(address, buffer::bytes(buffer, size));
    }
}
