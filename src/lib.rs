//! In-process bridge between embedded script code and the memory subsystem of
//! a host application.
//!
//! Outbound, [`Memory`] wraps the host's exported entry points for reading and
//! writing host memory and querying the current selection. Inbound,
//! [`ProviderRegistry`] hands the host function pointers into script-defined
//! [`MemoryProvider`] instances, so the host can treat script objects as
//! virtual memory sources. The host owns ground-truth memory state; this crate
//! is only the call boundary.

#[macro_use]
pub mod trace;

pub mod buffer;
pub mod host;
pub mod memory;
pub mod provider;
pub mod registry;

pub use host::{HostError, HostExports};
pub use memory::Memory;
pub use provider::MemoryProvider;
pub use registry::{ProviderRegistry, Registration};
