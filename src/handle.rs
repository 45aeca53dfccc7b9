use std::ffi::c_void;
use std::fmt;
use std::sync::Arc;

use crate::engine::{Engine, NativeFont};
use crate::error::FontError;
use crate::observer::{FontOrigin, LifecycleObserver, ReleaseReason};

/// Sole owner of one native font chain.
///
/// The chain is released at most once: by [`NativeHandle::dispose`], or by
/// `Drop` if the handle is never disposed. Release touches nothing but the
/// engine and observer the handle itself holds, so it is safe in any drop
/// order relative to other handles.
pub struct NativeHandle {
    native: Option<NativeFont>,
    engine: Arc<dyn Engine>,
    observer: Arc<dyn LifecycleObserver>,
    origin: FontOrigin,
}

impl NativeHandle {
    /// Takes ownership of a font chain the engine just created.
    pub fn create(
        ptr: *mut c_void,
        engine: Arc<dyn Engine>,
        observer: Arc<dyn LifecycleObserver>,
        origin: FontOrigin,
    ) -> Result<Self, FontError> {
        let native = NativeFont::new(ptr).ok_or(FontError::InvalidResource)?;
        observer.font_created(origin);
        Ok(Self {
            native: Some(native),
            engine,
            observer,
            origin,
        })
    }

    /// The live chain, or `InvalidResource` once disposed.
    pub fn native(&self) -> Result<NativeFont, FontError> {
        self.native.ok_or(FontError::InvalidResource)
    }

    pub fn engine(&self) -> &dyn Engine {
        self.engine.as_ref()
    }

    pub fn origin(&self) -> FontOrigin {
        self.origin
    }

    pub fn is_disposed(&self) -> bool {
        self.native.is_none()
    }

    /// Releases the chain. Later calls do nothing.
    pub fn dispose(&mut self) {
        self.release(ReleaseReason::Disposed);
    }

    fn release(&mut self, reason: ReleaseReason) {
        if let Some(native) = self.native.take() {
            self.engine.destroy_font(native);
            self.observer.font_released(self.origin, reason);
        }
    }
}

impl Drop for NativeHandle {
    fn drop(&mut self) {
        self.release(ReleaseReason::Finalized);
    }
}

impl fmt::Debug for NativeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeHandle")
            .field("native", &self.native)
            .field("origin", &self.origin)
            .finish()
    }
}
