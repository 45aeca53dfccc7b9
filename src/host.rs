use std::ops::Deref;
use std::sync::Arc;

use crate::observer::LifecycleObserver;

/// A host value pinned against collection.
///
/// Holding a `Root` keeps one strong reference to the value alive. Pin and
/// unpin are reported to the observer so callers can check that every pin is
/// balanced by exactly one unpin.
pub struct Root<T: ?Sized> {
    value: Arc<T>,
    observer: Arc<dyn LifecycleObserver>,
}

impl<T: ?Sized> Root<T> {
    pub fn pin(value: Arc<T>, observer: Arc<dyn LifecycleObserver>) -> Self {
        observer.root_pinned();
        Self { value, observer }
    }
}

impl<T: ?Sized> Deref for Root<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: ?Sized> Drop for Root<T> {
    fn drop(&mut self) {
        self.observer.root_unpinned();
    }
}
