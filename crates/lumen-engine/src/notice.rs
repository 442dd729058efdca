//! User-facing startup notices.
//!
//! Bootstrap failures are shown to the user as they happen rather than only
//! propagated. The runtime reports through a `Notice` sink; the default sink
//! writes to the log at error level.

use crate::program::BootstrapError;

/// Receives every bootstrap failure at the moment it occurs.
pub trait Notice {
    fn notify(&mut self, err: &BootstrapError);
}

/// Reports notices at error level through the `log` facade.
#[derive(Debug, Copy, Clone, Default)]
pub struct LogNotice;

impl Notice for LogNotice {
    fn notify(&mut self, err: &BootstrapError) {
        log::error!("{err}");
    }
}

/// Collects notices; useful when the caller wants to inspect them later.
impl Notice for Vec<BootstrapError> {
    fn notify(&mut self, err: &BootstrapError) {
        self.push(err.clone());
    }
}
