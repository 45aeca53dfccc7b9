use std::ffi::{c_char, c_int, c_uint, c_void, CStr};
use std::ptr;

use harfbuzz_sys as hb;

use super::{Engine, FontData, NativeFont, PackedFeature, RawGlyph};
use crate::tables::TableRegistration;
use crate::tag::Tag;

const COMPILED_BINDING: &str = "harfbuzz-sys 0.6";

struct HbBuffer {
    ptr: *mut hb::hb_buffer_t,
}

impl HbBuffer {
    fn new() -> Option<Self> {
        let ptr = unsafe { hb::hb_buffer_create() };
        if ptr.is_null() {
            None
        } else {
            Some(Self { ptr })
        }
    }

    fn add_codepoints(&mut self, text: &[u32], start: usize, length: usize) {
        unsafe {
            hb::hb_buffer_add_codepoints(
                self.ptr,
                text.as_ptr(),
                text.len() as c_int,
                start as c_uint,
                length as c_int,
            );
        }
    }

    fn guess_segment_properties(&mut self) {
        unsafe { hb::hb_buffer_guess_segment_properties(self.ptr) };
    }

    fn get_glyph_infos(&self) -> &[hb::hb_glyph_info_t] {
        let mut len = 0u32;
        let ptr = unsafe { hb::hb_buffer_get_glyph_infos(self.ptr, &mut len) };
        if ptr.is_null() || len == 0 {
            &[]
        } else {
            unsafe { std::slice::from_raw_parts(ptr, len as usize) }
        }
    }

    fn get_glyph_positions(&self) -> &[hb::hb_glyph_position_t] {
        let mut len = 0u32;
        let ptr = unsafe { hb::hb_buffer_get_glyph_positions(self.ptr, &mut len) };
        if ptr.is_null() || len == 0 {
            &[]
        } else {
            unsafe { std::slice::from_raw_parts(ptr, len as usize) }
        }
    }
}

impl Drop for HbBuffer {
    fn drop(&mut self) {
        unsafe { hb::hb_buffer_destroy(self.ptr) };
    }
}

/// Frees the `Vec<u8>` boxed into an owned blob.
unsafe extern "C" fn release_owned_bytes(user_data: *mut c_void) {
    drop(unsafe { Box::from_raw(user_data as *mut Vec<u8>) });
}

unsafe extern "C" fn reference_table(
    _face: *mut hb::hb_face_t,
    tag: hb::hb_tag_t,
    user_data: *mut c_void,
) -> *mut hb::hb_blob_t {
    let registration = unsafe { &*(user_data as *const TableRegistration) };
    match registration.fetch(Tag::from_u32(tag)) {
        // DUPLICATE: the host's bytes are dropped as soon as we return.
        Some(bytes) => unsafe {
            hb::hb_blob_create(
                bytes.as_ptr() as *const c_char,
                bytes.len() as c_uint,
                hb::HB_MEMORY_MODE_DUPLICATE,
                ptr::null_mut(),
                None,
            )
        },
        None => ptr::null_mut(),
    }
}

/// Face destroy hook for table-provider faces.
unsafe extern "C" fn release_registration(user_data: *mut c_void) {
    drop(unsafe { Box::from_raw(user_data as *mut TableRegistration) });
}

/// Wraps `face` in a font. `hb_font_create` installs HarfBuzz's own
/// OpenType font functions and sets the scale to the face's upem, so
/// positions come back in design units. Consumes the caller's face reference.
unsafe fn font_from_face(face: *mut hb::hb_face_t) -> *mut hb::hb_font_t {
    unsafe {
        let font = hb::hb_font_create(face);
        hb::hb_face_destroy(face); // font keeps a reference
        hb::hb_font_make_immutable(font);
        font
    }
}

/// The HarfBuzz shaping engine.
#[derive(Debug, Default, Clone, Copy)]
pub struct HarfBuzz;

impl HarfBuzz {
    pub fn new() -> Self {
        Self
    }
}

impl Engine for HarfBuzz {
    fn load_face(&self, data: FontData, face_index: u32) -> *mut c_void {
        let len = data.len();
        if len > c_uint::MAX as usize {
            log::warn!("Font data of {} bytes is too large for HarfBuzz", len);
            return ptr::null_mut();
        }

        let blob = match data {
            FontData::Owned(bytes) => {
                let boxed = Box::into_raw(Box::new(bytes));
                unsafe {
                    hb::hb_blob_create(
                        (*boxed).as_ptr() as *const c_char,
                        len as c_uint,
                        hb::HB_MEMORY_MODE_WRITABLE,
                        boxed as *mut c_void,
                        Some(release_owned_bytes),
                    )
                }
            }
            FontData::External { ptr: data, .. } => unsafe {
                let blob = hb::hb_blob_create(
                    data.as_ptr() as *const c_char,
                    len as c_uint,
                    hb::HB_MEMORY_MODE_READONLY,
                    ptr::null_mut(),
                    None,
                );
                hb::hb_blob_make_immutable(blob);
                blob
            },
        };

        unsafe {
            let face = hb::hb_face_create(blob, face_index);
            hb::hb_blob_destroy(blob); // face keeps a reference

            if hb::hb_face_get_glyph_count(face) == 0 {
                hb::hb_face_destroy(face);
                return ptr::null_mut();
            }

            font_from_face(face) as *mut c_void
        }
    }

    fn load_face_from_tables(&self, registration: Box<TableRegistration>) -> *mut c_void {
        let user_data = Box::into_raw(registration) as *mut c_void;
        unsafe {
            let face = hb::hb_face_create_for_tables(
                Some(reference_table),
                user_data,
                Some(release_registration),
            );
            // On allocation failure HarfBuzz has already run the destroy
            // hook and handed back its inert singleton.
            if face == hb::hb_face_get_empty() {
                return ptr::null_mut();
            }
            font_from_face(face) as *mut c_void
        }
    }

    fn shape(
        &self,
        font: NativeFont,
        text: &[u32],
        start: usize,
        length: usize,
        features: &[PackedFeature],
    ) -> Vec<RawGlyph> {
        let Some(mut buffer) = HbBuffer::new() else {
            log::error!("Failed to create HarfBuzz buffer");
            return Vec::new();
        };

        buffer.add_codepoints(text, start, length);
        buffer.guess_segment_properties();

        let features: Vec<hb::hb_feature_t> = features
            .iter()
            .map(|feature| hb::hb_feature_t {
                tag: feature.tag.as_u32(),
                value: feature.value,
                start: feature.start,
                end: feature.end,
            })
            .collect();

        unsafe {
            hb::hb_shape(
                font.as_ptr() as *mut hb::hb_font_t,
                buffer.ptr,
                features.as_ptr(),
                features.len() as c_uint,
            );
        }

        let infos = buffer.get_glyph_infos();
        let positions = buffer.get_glyph_positions();

        infos
            .iter()
            .zip(positions.iter())
            .map(|(info, pos)| RawGlyph {
                glyph_id: info.codepoint,
                cluster: info.cluster,
                x_advance: pos.x_advance,
                y_advance: pos.y_advance,
                x_offset: pos.x_offset,
                y_offset: pos.y_offset,
            })
            .collect()
    }

    fn units_per_em(&self, font: NativeFont) -> u32 {
        unsafe {
            let face = hb::hb_font_get_face(font.as_ptr() as *mut hb::hb_font_t);
            hb::hb_face_get_upem(face)
        }
    }

    fn destroy_font(&self, font: NativeFont) {
        unsafe { hb::hb_font_destroy(font.as_ptr() as *mut hb::hb_font_t) };
    }

    fn runtime_version(&self) -> String {
        let ptr = unsafe { hb::hb_version_string() };
        if ptr.is_null() {
            return String::new();
        }
        unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
    }

    fn compiled_version(&self) -> String {
        COMPILED_BINDING.to_string()
    }
}
