//! Lifecycle hooks.
//!
//! Every native allocation, release, pin and table fetch is reported to a
//! [`LifecycleObserver`]. The default [`LogObserver`] writes to the `log`
//! facade; tests install their own observer to count events.

use std::fmt;

use crate::tag::Tag;

/// Which constructor produced a font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontOrigin {
    Path,
    Bytes,
    ExternalMemory,
    TableProvider,
}

impl fmt::Display for FontOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FontOrigin::Path => "path",
            FontOrigin::Bytes => "bytes",
            FontOrigin::ExternalMemory => "external memory",
            FontOrigin::TableProvider => "table provider",
        };
        f.write_str(name)
    }
}

/// Why a native font chain was released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseReason {
    /// The host called `dispose()`.
    Disposed,
    /// The owning handle was dropped without being disposed.
    Finalized,
}

/// Observer for native resource events. All methods default to no-ops.
///
/// Methods may be called from a `Drop` impl or from inside a HarfBuzz
/// callback, so implementations must not panic.
pub trait LifecycleObserver: Send + Sync {
    fn font_created(&self, _origin: FontOrigin) {}

    fn font_released(&self, _origin: FontOrigin, _reason: ReleaseReason) {}

    fn root_pinned(&self) {}

    fn root_unpinned(&self) {}

    fn table_fetched(&self, _tag: Tag, _present: bool) {}

    fn table_callback_failed(&self, _tag: Tag) {}

    fn table_registration_released(&self) {}
}

/// Logs every event at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl LifecycleObserver for LogObserver {
    fn font_created(&self, origin: FontOrigin) {
        log::debug!("Created native font from {}", origin);
    }

    fn font_released(&self, origin: FontOrigin, reason: ReleaseReason) {
        log::debug!("Released native font from {} ({:?})", origin, reason);
    }

    fn root_pinned(&self) {
        log::trace!("Pinned host reference");
    }

    fn root_unpinned(&self) {
        log::trace!("Unpinned host reference");
    }

    fn table_fetched(&self, tag: Tag, present: bool) {
        log::trace!("Table '{}' requested, present={}", tag, present);
    }

    fn table_callback_failed(&self, tag: Tag) {
        log::error!("Table provider callback panicked for table '{}'", tag);
    }

    fn table_registration_released(&self) {
        log::debug!("Released table provider registration");
    }
}
