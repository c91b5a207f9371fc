//! Interop call tracing.
//!
//! Set `MEMBRIDGE_TRACE=1` to log every host entry-point call and trampoline
//! registration to stderr. The enabled check is a single relaxed atomic load,
//! so tracing costs nothing when off.

use std::sync::atomic::{AtomicU8, Ordering};

const UNCHECKED: u8 = 0;
const DISABLED: u8 = 1;
const ENABLED: u8 = 2;

static STATE: AtomicU8 = AtomicU8::new(UNCHECKED);

pub fn enabled() -> bool {
    match STATE.load(Ordering::Relaxed) {
        ENABLED => true,
        DISABLED => false,
        _ => {
            let on = matches!(
                std::env::var("MEMBRIDGE_TRACE").as_deref(),
                Ok("1") | Ok("true") | Ok("stderr")
            );
            STATE.store(if on { ENABLED } else { DISABLED }, Ordering::Relaxed);
            on
        }
    }
}

#[macro_export]
macro_rules! bridge_trace {
    ($($format:tt)*) => {
        if $crate::trace::enabled() {
            eprintln!("[membridge] {}", format_args!($($format)*));
        }
    };
}
