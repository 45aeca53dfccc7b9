use std::path::Path;
use std::sync::Arc;

use crate::error::FontError;
use crate::handle::NativeHandle;
use crate::loader::FontLoader;
use crate::observer::FontOrigin;
use crate::shaper::{self, normalize_units_per_em, Feature, GlyphRecord};
use crate::tag::Tag;

/// A loaded font, as seen by the host.
///
/// Dropping a `Font` releases its native chain unless [`Font::dispose`]
/// already did. A `Font` may be shared between threads for shaping; it must
/// not be disposed while another thread is shaping with it, which `&mut self`
/// on `dispose` enforces.
#[derive(Debug)]
pub struct Font {
    handle: NativeHandle,
}

impl Font {
    pub(crate) fn from_handle(handle: NativeHandle) -> Self {
        Self { handle }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FontError> {
        FontLoader::new().load_path(path, 0)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, FontError> {
        FontLoader::new().load_bytes(data, 0)
    }

    /// # Safety
    ///
    /// See [`FontLoader::load_external`].
    pub unsafe fn from_external_memory(
        ptr: *const u8,
        len: usize,
        face_index: u32,
    ) -> Result<Self, FontError> {
        unsafe { FontLoader::new().load_external(ptr, len, face_index) }
    }

    pub fn from_table_provider<F, U>(callback: F, user_data: Arc<U>) -> Result<Self, FontError>
    where
        F: Fn(Tag, &U) -> Option<Vec<u8>> + Send + Sync + 'static,
        U: Send + Sync + 'static,
    {
        FontLoader::new().load_tables(callback, user_data)
    }

    /// Shapes `length` characters of `text` starting at character `start`.
    pub fn shape(
        &self,
        text: &str,
        features: &[Feature],
        start: usize,
        length: usize,
    ) -> Result<Vec<GlyphRecord>, FontError> {
        shaper::shape(&self.handle, text, features, start, length)
    }

    /// Design units per em, with the zero guard applied.
    pub fn units_per_em(&self) -> Result<u32, FontError> {
        let native = self.handle.native()?;
        Ok(normalize_units_per_em(
            self.handle.engine().units_per_em(native),
        ))
    }

    pub fn origin(&self) -> FontOrigin {
        self.handle.origin()
    }

    pub fn is_disposed(&self) -> bool {
        self.handle.is_disposed()
    }

    /// Releases the native font now. Safe to call more than once.
    pub fn dispose(&mut self) {
        self.handle.dispose();
    }
}
