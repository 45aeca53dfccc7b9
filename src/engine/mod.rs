//! Contract with the external shaping engine.
//!
//! The bridge never looks inside a native font. It only hands buffers and
//! table callbacks to an [`Engine`], keeps the opaque pointer it gets back,
//! and asks the engine to shape with it or destroy it.

pub mod harfbuzz;

use std::ffi::c_void;
use std::ptr::NonNull;

use crate::tables::TableRegistration;
use crate::tag::Tag;

pub use harfbuzz::HarfBuzz;

/// Sentinel `end` for features that run to the end of the buffer.
pub const FEATURE_GLOBAL_END: u32 = u32::MAX;

/// Opaque pointer to a native blob -> face -> font chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeFont(NonNull<c_void>);

// The chain is made immutable before it is handed out, so the pointer may
// cross threads. Ordering of destroy against shaping is the host's job.
unsafe impl Send for NativeFont {}
unsafe impl Sync for NativeFont {}

impl NativeFont {
    pub fn new(ptr: *mut c_void) -> Option<Self> {
        NonNull::new(ptr).map(Self)
    }

    pub fn as_ptr(self) -> *mut c_void {
        self.0.as_ptr()
    }
}

/// Font bytes handed to [`Engine::load_face`].
pub enum FontData {
    /// Bytes owned by the native chain from now on. The engine frees them
    /// when the chain is destroyed.
    Owned(Vec<u8>),
    /// Caller-owned memory that must stay valid and unchanged for the whole
    /// life of the resulting font. Never copied, never freed by the engine.
    External { ptr: NonNull<u8>, len: usize },
}

impl FontData {
    pub fn len(&self) -> usize {
        match self {
            FontData::Owned(bytes) => bytes.len(),
            FontData::External { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A validated feature in the engine's packed representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedFeature {
    pub tag: Tag,
    pub value: u32,
    pub start: u32,
    pub end: u32,
}

/// One output glyph exactly as the engine produced it, in design units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawGlyph {
    pub glyph_id: u32,
    pub cluster: u32,
    pub x_advance: i32,
    pub y_advance: i32,
    pub x_offset: i32,
    pub y_offset: i32,
}

/// The shaping engine black box.
///
/// Every method runs synchronously on the calling thread.
pub trait Engine: Send + Sync {
    /// Builds a font from a whole font file. Returns null when the engine
    /// rejects the data; ownership of `Owned` bytes passes to the engine
    /// either way.
    fn load_face(&self, data: FontData, face_index: u32) -> *mut c_void;

    /// Builds a font whose tables are pulled from `registration` on demand.
    ///
    /// The engine takes ownership of the registration and must drop it
    /// exactly once, when the face is destroyed, including when construction
    /// fails and null is returned.
    fn load_face_from_tables(&self, registration: Box<TableRegistration>) -> *mut c_void;

    /// Shapes `text[start..start + length]`, using the rest of `text` as
    /// context. `text` is a sequence of Unicode scalar values; clusters are
    /// indices into it.
    fn shape(
        &self,
        font: NativeFont,
        text: &[u32],
        start: usize,
        length: usize,
        features: &[PackedFeature],
    ) -> Vec<RawGlyph>;

    /// Raw design units per em. May be 0 for atypical fonts.
    fn units_per_em(&self, font: NativeFont) -> u32;

    /// Releases the whole chain. Called exactly once per created font.
    fn destroy_font(&self, font: NativeFont);

    fn runtime_version(&self) -> String;

    fn compiled_version(&self) -> String;
}
