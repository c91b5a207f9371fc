//! Provider registration and host-callable trampolines.
//!
//! The host only speaks plain function pointers, so each registered provider
//! gets three libffi closures (read, write, getSize) bound to that exact
//! instance. The host keeps the closures' code pointers and may call them at
//! any future time, which dictates the lifetime story: a registered provider
//! and its closures are pinned for the rest of the session. The registry is
//! the bookkeeping table for those registrations; entries are append-only and
//! never removed or moved once appended.

use crate::{
    host::{HostExports, RegisterProviderFn},
    provider::MemoryProvider,
};
use libffi::{
    low::ffi_cif,
    middle::{Cif, Closure, Type},
};
use std::{
    ffi::{c_void, CString},
    sync::Mutex,
};

/// Userdata handed to the libffi closures. Closure userdata travels through a
/// single pointer slot, so the fat `dyn MemoryProvider` reference needs one
/// level of indirection to stay thin.
struct ProviderCell(Box<dyn MemoryProvider>);

/// Bookkeeping record for one completed registration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registration {
    /// Identifier assigned by the host. Opaque to the bridge, including any
    /// host-defined failure sentinel; it is forwarded, never interpreted.
    pub id: i32,
    pub type_name: String,
    pub name: String,
}

/// Append-only table of registered providers.
///
/// Registering pins the provider and its trampolines in memory for the
/// remainder of the session; there is no unregister path in the host
/// contract, so disposal happens implicitly at session teardown. Appends are
/// serialized by a mutex. Host callbacks never touch this table (each
/// trampoline holds a direct reference to its provider), so an in-flight
/// callback can never race or deadlock against a concurrent registration.
pub struct ProviderRegistry {
    register_provider: RegisterProviderFn,
    entries: Mutex<Vec<Registration>>,
}

unsafe extern "C" fn read_trampoline(
    _cif: &ffi_cif,
    _result: &mut c_void,
    args: *const *const c_void,
    cell: &ProviderCell,
) {
    let address = *(*args.add(0) as *const u64);
    let buffer = *(*args.add(1) as *const *mut u8);
    let size = *(*args.add(2) as *const u64);
    cell.0.read_raw(address, buffer, size);
}

unsafe extern "C" fn write_trampoline(
    _cif: &ffi_cif,
    _result: &mut c_void,
    args: *const *const c_void,
    cell: &ProviderCell,
) {
    let address = *(*args.add(0) as *const u64);
    let buffer = *(*args.add(1) as *const *const u8);
    let size = *(*args.add(2) as *const u64);
    cell.0.write_raw(address, buffer, size);
}

unsafe extern "C" fn get_size_trampoline(
    _cif: &ffi_cif,
    result: &mut u64,
    _args: *const *const c_void,
    cell: &ProviderCell,
) {
    *result = cell.0.get_size();
}

/// `(address: u64, buffer: pointer, size: u64) -> void`, the host's data
/// access callback shape.
fn data_access_cif() -> Cif {
    Cif::new(vec![Type::u64(), Type::pointer(), Type::u64()], Type::void())
}

fn code_ptr(closure: &Closure<'static>) -> *const c_void {
    (*closure.code_ptr()) as *const c_void
}

/// LPStr marshaling; an interior NUL truncates the string, matching C
/// semantics on the receiving side.
fn c_string(s: &str) -> CString {
    let bytes: Vec<u8> = s.bytes().take_while(|&b| b != 0).collect();
    // SAFETY: all NUL bytes were stripped above.
    unsafe { CString::from_vec_unchecked(bytes) }
}

impl ProviderRegistry {
    pub fn new(exports: HostExports) -> Self {
        Self {
            register_provider: exports.register_provider,
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Registers `provider` with the host and returns the host-assigned
    /// identifier.
    ///
    /// The instance is pinned first and the trampolines are bound to that
    /// pinned instance, never to a temporary. Registering the same
    /// `(type_name, name)` pair twice yields two independent registrations;
    /// de-duplication, if any, is the host's business.
    pub fn register(&self, provider: Box<dyn MemoryProvider>) -> i32 {
        let cell: &'static ProviderCell = Box::leak(Box::new(ProviderCell(provider)));
        let type_name = cell.0.type_name().to_string();
        let name = cell.0.name().to_string();

        // Leaked alongside the cell: the host holds these code pointers for
        // the rest of the session.
        let read: &'static Closure<'static> =
            Box::leak(Box::new(Closure::new(data_access_cif(), read_trampoline, cell)));
        let write: &'static Closure<'static> =
            Box::leak(Box::new(Closure::new(data_access_cif(), write_trampoline, cell)));
        let get_size: &'static Closure<'static> = Box::leak(Box::new(Closure::new(
            Cif::new(vec![], Type::u64()),
            get_size_trampoline,
            cell,
        )));

        let c_type_name = c_string(&type_name);
        let c_name = c_string(&name);
        let id = unsafe {
            (self.register_provider)(
                c_type_name.as_ptr(),
                c_name.as_ptr(),
                code_ptr(read),
                code_ptr(write),
                code_ptr(get_size),
            )
        };
        bridge_trace!("registerProviderV1 type={type_name:?} name={name:?} -> {id}");

        self.entries.lock().unwrap().push(Registration {
            id,
            type_name,
            name,
        });
        id
    }

    /// Snapshot of every registration made through this registry, in
    /// registration order.
    pub fn registrations(&self) -> Vec<Registration> {
        self.entries.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}
