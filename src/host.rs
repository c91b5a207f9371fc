//! Resolution of the host application's exported entry points.
//!
//! The host ABI is versioned by symbol name: `readMemoryV1`, `writeMemoryV1`,
//! `getSelectionV1` and `registerProviderV1`. Resolution is the only fallible
//! part of the bridge; once a [`HostExports`] table exists, every downstream
//! call is infallible by host contract.

use libloading::{Library, Symbol};
use std::{
    ffi::{c_char, c_void},
    fmt,
    path::Path,
};

/// `readMemoryV1`: fills `buffer` with up to `size` bytes of host memory
/// starting at `address`.
pub type ReadMemoryFn = unsafe extern "C" fn(address: u64, size: u64, buffer: *mut u8);

/// `writeMemoryV1`: writes `size` bytes from `buffer` into host memory at
/// `address`.
pub type WriteMemoryFn = unsafe extern "C" fn(address: u64, size: u64, buffer: *const u8);

/// `getSelectionV1`: returns whether a selection exists; on `true`, populates
/// both out-parameters.
pub type GetSelectionFn = unsafe extern "C" fn(start: *mut u64, end: *mut u64) -> bool;

/// `registerProviderV1`: registers a callback trio under the given names and
/// returns an opaque identifier. The strings are NUL-terminated and only
/// valid for the duration of the call.
pub type RegisterProviderFn = unsafe extern "C" fn(
    type_name: *const c_char,
    name: *const c_char,
    read_fn: *const c_void,
    write_fn: *const c_void,
    get_size_fn: *const c_void,
) -> i32;

#[derive(Debug)]
pub enum HostError {
    LoadError(String, String),
    SymbolNotFound(String),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostError::LoadError(name, err) => {
                write!(f, "Failed to load host library '{}': {}", name, err)
            }
            HostError::SymbolNotFound(sym) => {
                write!(f, "Unable to find entry point '{}' in host exports", sym)
            }
        }
    }
}

impl std::error::Error for HostError {}

/// The host's exported entry points, as plain function pointers.
///
/// Whoever constructs this table vouches that the pointers implement the
/// contracts above; the resolvers below do so for symbols of a loaded host
/// image, and tests build one directly from fake exports.
#[derive(Clone, Copy)]
pub struct HostExports {
    pub read_memory: ReadMemoryFn,
    pub write_memory: WriteMemoryFn,
    pub get_selection: GetSelectionFn,
    pub register_provider: RegisterProviderFn,
}

unsafe fn lookup<T: Copy>(library: &Library, name: &'static str) -> Result<T, HostError> {
    let sym: Symbol<T> = library
        .get(name.as_bytes())
        .map_err(|_| HostError::SymbolNotFound(name.to_string()))?;
    Ok(*sym)
}

impl HostExports {
    /// Resolves all four entry points from an already loaded library.
    ///
    /// The returned pointers are only valid while `library` stays loaded;
    /// [`HostExports::open`] and [`HostExports::from_host_process`] take care
    /// of that for the common cases.
    pub fn resolve(library: &Library) -> Result<Self, HostError> {
        unsafe {
            Ok(Self {
                read_memory: lookup(library, "readMemoryV1")?,
                write_memory: lookup(library, "writeMemoryV1")?,
                get_selection: lookup(library, "getSelectionV1")?,
                register_provider: lookup(library, "registerProviderV1")?,
            })
        }
    }

    /// Loads the host library at `path` and resolves its entry points.
    ///
    /// The library stays loaded for the rest of the session, matching the
    /// lifetime of any provider registrations made through it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, HostError> {
        let path = path.as_ref();
        let library = unsafe { Library::new(path) }
            .map_err(|e| HostError::LoadError(path.display().to_string(), e.to_string()))?;
        let exports = Self::resolve(&library)?;
        Box::leak(Box::new(library));
        Ok(exports)
    }

    /// Resolves the entry points from the current process image, for use when
    /// this crate is loaded as a plugin inside the host itself.
    #[cfg(any(unix, windows))]
    pub fn from_host_process() -> Result<Self, HostError> {
        #[cfg(unix)]
        let library = Library::from(libloading::os::unix::Library::this());
        #[cfg(windows)]
        let library = libloading::os::windows::Library::this()
            .map(Library::from)
            .map_err(|e| HostError::LoadError("<host process>".to_string(), e.to_string()))?;
        let exports = Self::resolve(&library)?;
        // The process image never unloads; dropping the handle on some
        // platforms would run dlclose on it anyway.
        std::mem::forget(library);
        Ok(exports)
    }
}
