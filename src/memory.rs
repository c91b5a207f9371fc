//! Script-side proxy for host memory access.

use crate::host::HostExports;

/// Synchronous access to the host's memory space and selection state.
///
/// Calls block until the host entry point returns. The host contract has no
/// error channel here: a rejected write is a silent no-op and a partial read
/// leaves the remaining bytes zeroed, with no way to tell at this layer.
pub struct Memory {
    exports: HostExports,
}

impl Memory {
    pub fn new(exports: HostExports) -> Self {
        Self { exports }
    }

    /// Reads `size` bytes of host memory starting at `address`.
    ///
    /// The returned buffer always has exactly `size` bytes. Bytes the host
    /// does not populate keep their initial zero value.
    pub fn read(&self, address: u64, size: u64) -> Vec<u8> {
        bridge_trace!("readMemoryV1 address={address:#x} size={size}");
        let mut bytes = vec![0u8; size as usize];
        unsafe { (self.exports.read_memory)(address, size, bytes.as_mut_ptr()) };
        bytes
    }

    /// Writes `data` into host memory at `address`.
    ///
    /// The data is handed to the host by pointer and length, without copying.
    /// Whether the write took effect is not observable; the host reports
    /// nothing back.
    pub fn write(&self, address: u64, data: &[u8]) {
        bridge_trace!("writeMemoryV1 address={address:#x} size={}", data.len());
        unsafe { (self.exports.write_memory)(address, data.len() as u64, data.as_ptr()) };
    }

    /// Returns the current selection as `(start, end)`, or `None` when the
    /// host reports no active selection.
    ///
    /// The range is queried fresh on every call, never cached. If the host
    /// answers `true` without writing both out-cells the contents are
    /// undefined; do not rely on the cells' zero initialization across hosts.
    pub fn selection(&self) -> Option<(u64, u64)> {
        let mut start = 0u64;
        let mut end = 0u64;
        let has_selection =
            unsafe { (self.exports.get_selection)(&mut start, &mut end) };
        bridge_trace!("getSelectionV1 -> {has_selection} ({start:#x}, {end:#x})");
        has_selection.then_some((start, end))
    }
}
