use nix::libc::c_int;
use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal, sigaction};
use std::sync::atomic::{AtomicBool, Ordering};

static SIGHUP_PENDING: AtomicBool = AtomicBool::new(false);

/// Signal handler body: record the hang-up and nothing else.
///
/// Runs in async-signal context, so it must not allocate, lock or print.
extern "C" fn on_sighup(_signum: c_int) {
    SIGHUP_PENDING.store(true, Ordering::Relaxed);
}

/// Install the SIGHUP handler for the lifetime of the process.
///
/// SA_RESTART keeps an in-progress terminal read going; the notification is
/// printed by the loop on its next iteration.
pub fn install_sighup_handler() -> nix::Result<()> {
    let action = SigAction::new(
        SigHandler::Handler(on_sighup),
        SaFlags::SA_RESTART,
        SigSet::empty(),
    );
    unsafe { sigaction(Signal::SIGHUP, &action) }?;
    Ok(())
}

/// Consume a pending reload request, if any.
pub fn take_reload_request() -> bool {
    SIGHUP_PENDING.swap(false, Ordering::Relaxed)
}
