//! Table-provider bridge.
//!
//! A table-provider face has no file behind it: the engine asks for each
//! OpenType table by tag and the host callback answers with bytes or `None`.
//! [`TableRegistration`] pins the callback and its user data for exactly as
//! long as the native face lives. The engine owns the boxed registration and
//! drops it from the face's destroy hook; that drop is the only place the
//! pins are released.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

use crate::host::Root;
use crate::observer::LifecycleObserver;
use crate::tag::Tag;

/// Host user data passed back to every callback invocation.
pub type UserData = dyn Any + Send + Sync;

/// Host callback: `(table tag, user data) -> table bytes`.
pub type TableCallback = dyn Fn(Tag, &UserData) -> Option<Vec<u8>> + Send + Sync;

/// Shared view of whether the host callback has misbehaved.
#[derive(Debug, Default, Clone)]
pub struct FetchStatus {
    failed: Arc<Mutex<Option<Tag>>>,
}

impl FetchStatus {
    /// The first tag whose callback panicked, if any.
    pub fn failed_tag(&self) -> Option<Tag> {
        match self.failed.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    fn record_failure(&self, tag: Tag) {
        let mut guard = match self.failed.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.get_or_insert(tag);
    }
}

pub struct TableRegistration {
    callback: Root<TableCallback>,
    user_data: Root<UserData>,
    status: FetchStatus,
    observer: Arc<dyn LifecycleObserver>,
}

impl TableRegistration {
    /// Pins `callback` and `user_data` until the registration is dropped.
    pub fn new(
        callback: Arc<TableCallback>,
        user_data: Arc<UserData>,
        observer: Arc<dyn LifecycleObserver>,
    ) -> Self {
        Self {
            callback: Root::pin(callback, observer.clone()),
            user_data: Root::pin(user_data, observer.clone()),
            status: FetchStatus::default(),
            observer,
        }
    }

    pub fn status(&self) -> FetchStatus {
        self.status.clone()
    }

    /// Asks the host for one table. Runs synchronously on the calling
    /// thread. A panic in the host callback is caught here, since it must
    /// not unwind into the engine, and is answered as a missing table.
    pub fn fetch(&self, tag: Tag) -> Option<Vec<u8>> {
        let callback = &*self.callback;
        let user_data = &*self.user_data;
        match panic::catch_unwind(AssertUnwindSafe(|| callback(tag, user_data))) {
            Ok(table) => {
                self.observer.table_fetched(tag, table.is_some());
                table
            }
            Err(_) => {
                self.status.record_failure(tag);
                self.observer.table_callback_failed(tag);
                None
            }
        }
    }
}

impl Drop for TableRegistration {
    fn drop(&mut self) {
        self.observer.table_registration_released();
        // `callback` and `user_data` unpin as the fields drop.
    }
}
