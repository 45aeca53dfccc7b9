#![allow(dead_code)]

pub mod fixture;

use std::ffi::c_void;
use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use shapebridge::engine::{Engine, FontData, NativeFont, PackedFeature, RawGlyph};
use shapebridge::tables::TableRegistration;
use shapebridge::{FontLoader, FontOrigin, LifecycleObserver, ReleaseReason, Tag};

/// Counts every lifecycle event.
#[derive(Default)]
pub struct CountingObserver {
    pub created: AtomicUsize,
    pub disposed: AtomicUsize,
    pub finalized: AtomicUsize,
    pub pins: AtomicUsize,
    pub unpins: AtomicUsize,
    pub fetches: AtomicUsize,
    pub callback_failures: AtomicUsize,
    pub registrations_released: AtomicUsize,
}

impl CountingObserver {
    pub fn released(&self) -> usize {
        self.disposed.load(Ordering::SeqCst) + self.finalized.load(Ordering::SeqCst)
    }

    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

impl LifecycleObserver for CountingObserver {
    fn font_created(&self, _origin: FontOrigin) {
        self.created.fetch_add(1, Ordering::SeqCst);
    }

    fn font_released(&self, _origin: FontOrigin, reason: ReleaseReason) {
        match reason {
            ReleaseReason::Disposed => self.disposed.fetch_add(1, Ordering::SeqCst),
            ReleaseReason::Finalized => self.finalized.fetch_add(1, Ordering::SeqCst),
        };
    }

    fn root_pinned(&self) {
        self.pins.fetch_add(1, Ordering::SeqCst);
    }

    fn root_unpinned(&self) {
        self.unpins.fetch_add(1, Ordering::SeqCst);
    }

    fn table_fetched(&self, _tag: Tag, _present: bool) {
        self.fetches.fetch_add(1, Ordering::SeqCst);
    }

    fn table_callback_failed(&self, _tag: Tag) {
        self.callback_failures.fetch_add(1, Ordering::SeqCst);
    }

    fn table_registration_released(&self) {
        self.registrations_released.fetch_add(1, Ordering::SeqCst);
    }
}

struct FakeFont {
    _data: Option<Vec<u8>>,
    _registration: Option<Box<TableRegistration>>,
}

/// Engine stand-in that records every call.
///
/// Shaping maps each character to one glyph whose id is the code point and
/// whose advance is 500 units.
pub struct FakeEngine {
    pub units_per_em: u32,
    pub reject: bool,
    pub loads: AtomicUsize,
    pub destroys: AtomicUsize,
    pub shapes: AtomicUsize,
    pub features_seen: Mutex<Vec<PackedFeature>>,
}

impl FakeEngine {
    pub fn new(units_per_em: u32) -> Self {
        Self {
            units_per_em,
            reject: false,
            loads: AtomicUsize::new(0),
            destroys: AtomicUsize::new(0),
            shapes: AtomicUsize::new(0),
            features_seen: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::new(1000)
        }
    }

    fn alloc(font: FakeFont) -> *mut c_void {
        Box::into_raw(Box::new(font)) as *mut c_void
    }
}

impl Engine for FakeEngine {
    fn load_face(&self, data: FontData, _face_index: u32) -> *mut c_void {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.reject || data.is_empty() {
            return ptr::null_mut();
        }
        let owned = match data {
            FontData::Owned(bytes) => Some(bytes),
            FontData::External { .. } => None,
        };
        Self::alloc(FakeFont {
            _data: owned,
            _registration: None,
        })
    }

    fn load_face_from_tables(&self, registration: Box<TableRegistration>) -> *mut c_void {
        self.loads.fetch_add(1, Ordering::SeqCst);
        // Real engines read a few tables while building the font.
        let _ = registration.fetch(Tag::new(*b"head"));
        let _ = registration.fetch(Tag::new(*b"maxp"));
        if self.reject {
            drop(registration);
            return ptr::null_mut();
        }
        Self::alloc(FakeFont {
            _data: None,
            _registration: Some(registration),
        })
    }

    fn shape(
        &self,
        _font: NativeFont,
        text: &[u32],
        start: usize,
        length: usize,
        features: &[PackedFeature],
    ) -> Vec<RawGlyph> {
        self.shapes.fetch_add(1, Ordering::SeqCst);
        self.features_seen
            .lock()
            .unwrap()
            .extend_from_slice(features);
        text[start..start + length]
            .iter()
            .enumerate()
            .map(|(i, &codepoint)| RawGlyph {
                glyph_id: codepoint,
                cluster: (start + i) as u32,
                x_advance: 500,
                y_advance: 0,
                x_offset: 0,
                y_offset: 0,
            })
            .collect()
    }

    fn units_per_em(&self, _font: NativeFont) -> u32 {
        self.units_per_em
    }

    fn destroy_font(&self, font: NativeFont) {
        self.destroys.fetch_add(1, Ordering::SeqCst);
        drop(unsafe { Box::from_raw(font.as_ptr() as *mut FakeFont) });
    }

    fn runtime_version(&self) -> String {
        "fake".to_string()
    }

    fn compiled_version(&self) -> String {
        "fake".to_string()
    }
}

pub fn fake_loader(engine: &Arc<FakeEngine>, observer: &Arc<CountingObserver>) -> FontLoader {
    FontLoader::new()
        .with_engine(engine.clone())
        .with_observer(observer.clone())
}

pub fn harfbuzz_loader(observer: &Arc<CountingObserver>) -> FontLoader {
    FontLoader::new().with_observer(observer.clone())
}
