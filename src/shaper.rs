use std::str::FromStr;

use crate::engine::{PackedFeature, RawGlyph, FEATURE_GLOBAL_END};
use crate::error::FontError;
use crate::handle::NativeHandle;
use crate::tag::Tag;

/// Substituted when a face reports no usable units-per-em.
pub const DEFAULT_UNITS_PER_EM: u32 = 1000;

/// An OpenType feature setting over a half-open range of character indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    pub tag: String,
    pub value: u32,
    pub start: u32,
    /// `None` runs to the end of the text.
    pub end: Option<u32>,
}

impl Feature {
    /// A feature applied to the whole text.
    pub fn new(tag: impl Into<String>, value: u32) -> Self {
        Self {
            tag: tag.into(),
            value,
            start: 0,
            end: None,
        }
    }

    /// A feature applied to `start..end`. An inverted range is collapsed to
    /// an empty one at `start`.
    pub fn ranged(tag: impl Into<String>, value: u32, start: u32, end: u32) -> Self {
        Self {
            tag: tag.into(),
            value,
            start,
            end: Some(end.max(start)),
        }
    }

    fn pack(&self) -> Result<PackedFeature, FontError> {
        Ok(PackedFeature {
            tag: Tag::parse(&self.tag)?,
            value: self.value,
            start: self.start,
            end: self.end.unwrap_or(FEATURE_GLOBAL_END),
        })
    }
}

/// Parses `liga`, `+liga`, `-liga` and `liga=2`.
impl FromStr for Feature {
    type Err = FontError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (tag, value) = if let Some(tag) = s.strip_prefix('-') {
            (tag, 0)
        } else if let Some(tag) = s.strip_prefix('+') {
            (tag, 1)
        } else if let Some((tag, value)) = s.split_once('=') {
            let value = value
                .trim()
                .parse()
                .map_err(|_| FontError::InvalidFeatureTag(s.to_string()))?;
            (tag.trim(), value)
        } else {
            (s, 1)
        };
        Tag::parse(tag)?;
        Ok(Feature::new(tag, value))
    }
}

/// One positioned glyph. Advances and offsets are in font design units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphRecord {
    pub glyph_id: u32,
    /// Index of the first source character this glyph came from.
    pub cluster: u32,
    pub x_advance: f64,
    pub y_advance: f64,
    pub x_offset: f64,
    pub y_offset: f64,
    pub units_per_em: f64,
}

impl GlyphRecord {
    fn from_raw(raw: RawGlyph, units_per_em: u32) -> Self {
        Self {
            glyph_id: raw.glyph_id,
            cluster: raw.cluster,
            x_advance: raw.x_advance as f64,
            y_advance: raw.y_advance as f64,
            x_offset: raw.x_offset as f64,
            y_offset: raw.y_offset as f64,
            units_per_em: units_per_em as f64,
        }
    }

    /// Pixels per design unit at `point_size`.
    pub fn scale(&self, point_size: f64) -> f64 {
        point_size / self.units_per_em
    }

    pub fn x_advance_px(&self, point_size: f64) -> f64 {
        self.x_advance * self.scale(point_size)
    }

    pub fn y_advance_px(&self, point_size: f64) -> f64 {
        self.y_advance * self.scale(point_size)
    }

    pub fn x_offset_px(&self, point_size: f64) -> f64 {
        self.x_offset * self.scale(point_size)
    }

    pub fn y_offset_px(&self, point_size: f64) -> f64 {
        self.y_offset * self.scale(point_size)
    }
}

/// Replaces a missing or out-of-range design metric with
/// [`DEFAULT_UNITS_PER_EM`]. Some color and bitmap fonts report 0.
pub fn normalize_units_per_em(raw: u32) -> u32 {
    if (16..=16384).contains(&raw) {
        raw
    } else {
        DEFAULT_UNITS_PER_EM
    }
}

/// Clamps a character slice to `0..len`.
fn clamp_slice(len: usize, start: usize, length: usize) -> (usize, usize) {
    let start = start.min(len);
    (start, length.min(len - start))
}

/// Shapes `length` characters of `text` starting at character `start`.
///
/// Each call uses a fresh engine buffer. Features are validated up front and
/// passed to the engine in the given order; nothing reaches the engine if
/// any tag is malformed.
pub fn shape(
    handle: &NativeHandle,
    text: &str,
    features: &[Feature],
    start: usize,
    length: usize,
) -> Result<Vec<GlyphRecord>, FontError> {
    let native = handle.native()?;
    let packed = features
        .iter()
        .map(Feature::pack)
        .collect::<Result<Vec<_>, _>>()?;

    let engine = handle.engine();
    let raw_upem = engine.units_per_em(native);
    let units_per_em = normalize_units_per_em(raw_upem);
    if units_per_em != raw_upem {
        log::warn!(
            "Font reports {} units per em, using {}",
            raw_upem,
            units_per_em
        );
    }

    let codepoints: Vec<u32> = text.chars().map(u32::from).collect();
    let (start, length) = clamp_slice(codepoints.len(), start, length);

    let glyphs = engine
        .shape(native, &codepoints, start, length, &packed)
        .into_iter()
        .map(|raw| GlyphRecord::from_raw(raw, units_per_em))
        .collect();

    Ok(glyphs)
}
