//! The signal seam: an init
//! step that asks the host runtime to notify on `SIGINT`, and a
//! teardown that reverts to default handling.
//!
//! This crate never installs a signal handler itself — that is
//! platform/host-specific and explicitly out of scope — but it defines
//! the seam a host's signal glue plugs into, and the polling point long
//! loops elsewhere in the interpreter are expected to check.

use std::cell::Cell;

use crate::host::Host;

thread_local! {
    static INTERRUPTED: Cell<bool> = const { Cell::new(false) };
}

/// `init_signals`/`clear_signals` made RAII-shaped: construct at the
/// start of an execution context, drop (or call
/// [`SignalGuard::disarm`] explicitly) at the end.
pub struct SignalGuard {
    armed: bool,
}

impl SignalGuard {
    /// `init_signals`: ask the host whether it wants SIGINT
    /// notifications and, if so, arm the flag this crate's long loops
    /// poll at safe points.
    pub fn arm(host: &dyn Host) -> SignalGuard {
        let armed = host.want_sigint_notifications();
        if armed {
            INTERRUPTED.with(|f| f.set(false));
        }
        SignalGuard { armed }
    }

    /// `clear_signals`: revert to default handling.
    pub fn disarm(self) {
        drop(self);
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }
}

impl Drop for SignalGuard {
    fn drop(&mut self) {
        if self.armed {
            INTERRUPTED.with(|f| f.set(false));
        }
    }
}

/// Raise the interrupt flag — called by whatever glue actually catches
/// `SIGINT` on the host side.
pub fn raise_interrupt() {
    INTERRUPTED.with(|f| f.set(true));
}

/// Long loops are expected to poll the runtime's signal flag at safe
/// points before entering a potentially unbounded iteration. Callers of
/// this crate's own unbounded loops (array iteration, the aggregate
/// comparator's work queue) may poll this between iterations; this
/// crate does not mandate a cadence beyond that guidance.
pub fn poll_interrupted() -> bool {
    INTERRUPTED.with(|f| f.get())
}
