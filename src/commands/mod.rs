pub mod bundle;
pub mod dispatch;
pub mod evaluate;
pub mod format;
pub mod list;
pub mod runs;
pub mod show;
pub mod status;
pub mod summary;
pub mod watch;

use reportdeck_core::poll::CancelFlag;

/// A cancellation flag tripped by Ctrl-C.
///
/// If the handler cannot be installed the flag is still returned; the
/// process then simply dies on the signal.
pub(crate) fn cancel_on_interrupt() -> CancelFlag {
    let cancel = CancelFlag::new();
    let handler_flag = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || handler_flag.cancel()) {
        tracing::warn!(error = %e, "could not install interrupt handler");
    }
    cancel
}
