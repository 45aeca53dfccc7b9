use std::path::Path;
use std::ptr::NonNull;
use std::sync::Arc;

use crate::engine::{Engine, FontData, HarfBuzz};
use crate::error::FontError;
use crate::font::Font;
use crate::handle::NativeHandle;
use crate::observer::{FontOrigin, LifecycleObserver, LogObserver};
use crate::tables::{TableCallback, TableRegistration, UserData};
use crate::tag::Tag;

/// Builds [`Font`]s against one engine and one lifecycle observer.
#[derive(Clone)]
pub struct FontLoader {
    engine: Arc<dyn Engine>,
    observer: Arc<dyn LifecycleObserver>,
}

impl Default for FontLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl FontLoader {
    /// HarfBuzz with a logging observer.
    pub fn new() -> Self {
        Self {
            engine: Arc::new(HarfBuzz::new()),
            observer: Arc::new(LogObserver),
        }
    }

    pub fn with_engine(mut self, engine: Arc<dyn Engine>) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn LifecycleObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn engine(&self) -> &Arc<dyn Engine> {
        &self.engine
    }

    /// Reads the whole file and hands the buffer to the native chain.
    pub fn load_path(&self, path: impl AsRef<Path>, face_index: u32) -> Result<Font, FontError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| FontError::FileNotFound {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Read {} bytes from {}", bytes.len(), path.display());
        self.load_owned(bytes, face_index, FontOrigin::Path)
    }

    /// Copies `data`; the caller may drop its buffer as soon as this returns.
    pub fn load_bytes(&self, data: &[u8], face_index: u32) -> Result<Font, FontError> {
        self.load_owned(data.to_vec(), face_index, FontOrigin::Bytes)
    }

    /// Wraps caller-owned memory without copying it.
    ///
    /// # Safety
    ///
    /// `ptr` must point to `len` readable bytes that stay valid and unchanged
    /// until the returned font is disposed or dropped.
    pub unsafe fn load_external(
        &self,
        ptr: *const u8,
        len: usize,
        face_index: u32,
    ) -> Result<Font, FontError> {
        let ptr = NonNull::new(ptr as *mut u8).ok_or_else(|| {
            FontError::FontLoadFailed("Unable to load font from memory: null pointer".into())
        })?;
        let raw = self
            .engine
            .load_face(FontData::External { ptr, len }, face_index);
        if raw.is_null() {
            log::warn!("Engine rejected {} bytes of external font memory", len);
            return Err(FontError::FontLoadFailed(
                "Unable to load font from memory".into(),
            ));
        }
        self.wrap(raw, FontOrigin::ExternalMemory)
    }

    /// Builds a font whose tables come from `callback` on demand.
    ///
    /// `callback` and `user_data` stay pinned until the native face is
    /// destroyed. A panic inside `callback` during construction fails the
    /// load; the half-built face is still torn down exactly once.
    pub fn load_tables<F, U>(&self, callback: F, user_data: Arc<U>) -> Result<Font, FontError>
    where
        F: Fn(Tag, &U) -> Option<Vec<u8>> + Send + Sync + 'static,
        U: Send + Sync + 'static,
    {
        let callback: Arc<TableCallback> = Arc::new(move |tag: Tag, data: &UserData| {
            data.downcast_ref::<U>().and_then(|data| callback(tag, data))
        });
        let user_data: Arc<UserData> = user_data;
        self.load_tables_erased(callback, user_data)
    }

    /// [`FontLoader::load_tables`] for callers that already hold
    /// type-erased host values.
    pub fn load_tables_erased(
        &self,
        callback: Arc<TableCallback>,
        user_data: Arc<UserData>,
    ) -> Result<Font, FontError> {
        let registration = TableRegistration::new(callback, user_data, self.observer.clone());
        let status = registration.status();

        let raw = self.engine.load_face_from_tables(Box::new(registration));
        if raw.is_null() {
            return Err(FontError::FontLoadFailed(
                "Unable to create font from tables".into(),
            ));
        }
        let font = self.wrap(raw, FontOrigin::TableProvider)?;

        if let Some(tag) = status.failed_tag() {
            // Dropping `font` destroys the face and its registration.
            drop(font);
            return Err(FontError::FontLoadFailed(format!(
                "Table provider callback failed for table '{}'",
                tag
            )));
        }
        Ok(font)
    }

    fn load_owned(
        &self,
        bytes: Vec<u8>,
        face_index: u32,
        origin: FontOrigin,
    ) -> Result<Font, FontError> {
        let len = bytes.len();
        let raw = self.engine.load_face(FontData::Owned(bytes), face_index);
        if raw.is_null() {
            log::warn!("Engine rejected {} bytes of font data ({})", len, origin);
            return Err(FontError::FontLoadFailed(format!(
                "Unable to load font: {} bytes at face index {} were not accepted",
                len, face_index
            )));
        }
        self.wrap(raw, origin)
    }

    fn wrap(&self, raw: *mut std::ffi::c_void, origin: FontOrigin) -> Result<Font, FontError> {
        let handle = NativeHandle::create(raw, self.engine.clone(), self.observer.clone(), origin)?;
        Ok(Font::from_handle(handle))
    }
}
