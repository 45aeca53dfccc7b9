//! A tiny but valid TrueType font built in memory.
//!
//! Tables: cmap (format 12), head, hhea, hmtx, maxp. No outlines and no
//! layout tables, which is all HarfBuzz needs to map characters and advance.
//!
//! Glyph layout: 0 `.notdef`, 1 space, 2..=27 `A`..=`Z`, 28..=53 `a`..=`z`.

use std::collections::HashMap;

use shapebridge::Tag;

pub const NUM_GLYPHS: u16 = 54;
pub const NOTDEF_ADVANCE: u16 = 500;
pub const SPACE_ADVANCE: u16 = 250;
pub const LETTER_ADVANCE: u16 = 600;

/// Glyph id the fixture assigns to `ch`, or 0.
pub fn glyph_for(ch: char) -> u32 {
    match ch {
        ' ' => 1,
        'A'..='Z' => 2 + (ch as u32 - 'A' as u32),
        'a'..='z' => 28 + (ch as u32 - 'a' as u32),
        _ => 0,
    }
}

struct Writer(Vec<u8>);

impl Writer {
    fn new() -> Self {
        Self(Vec::new())
    }

    fn u16(&mut self, v: u16) -> &mut Self {
        self.0.extend_from_slice(&v.to_be_bytes());
        self
    }

    fn i16(&mut self, v: i16) -> &mut Self {
        self.0.extend_from_slice(&v.to_be_bytes());
        self
    }

    fn u32(&mut self, v: u32) -> &mut Self {
        self.0.extend_from_slice(&v.to_be_bytes());
        self
    }

    fn i64(&mut self, v: i64) -> &mut Self {
        self.0.extend_from_slice(&v.to_be_bytes());
        self
    }
}

fn cmap() -> Vec<u8> {
    let groups: [(u32, u32, u32); 3] = [(0x20, 0x20, 1), (0x41, 0x5A, 2), (0x61, 0x7A, 28)];
    let mut w = Writer::new();
    w.u16(0).u16(1); // version, numTables
    w.u16(3).u16(10).u32(12); // Windows, UCS-4, offset
    w.u16(12).u16(0); // format, reserved
    w.u32(16 + 12 * groups.len() as u32); // length
    w.u32(0); // language
    w.u32(groups.len() as u32);
    for (first, last, glyph) in groups {
        w.u32(first).u32(last).u32(glyph);
    }
    w.0
}

fn head(units_per_em: u16) -> Vec<u8> {
    let mut w = Writer::new();
    w.u16(1).u16(0); // version
    w.u32(0x0001_0000); // fontRevision
    w.u32(0); // checksumAdjustment
    w.u32(0x5F0F_3CF5); // magicNumber
    w.u16(0); // flags
    w.u16(units_per_em);
    w.i64(0).i64(0); // created, modified
    w.i16(0).i16(-200).i16(LETTER_ADVANCE as i16).i16(800); // bbox
    w.u16(0); // macStyle
    w.u16(8); // lowestRecPPEM
    w.i16(2); // fontDirectionHint
    w.i16(0); // indexToLocFormat
    w.i16(0); // glyphDataFormat
    assert_eq!(w.0.len(), 54);
    w.0
}

fn hhea() -> Vec<u8> {
    let mut w = Writer::new();
    w.u16(1).u16(0); // version
    w.i16(800).i16(-200).i16(0); // ascender, descender, lineGap
    w.u16(LETTER_ADVANCE); // advanceWidthMax
    w.i16(0).i16(0).i16(LETTER_ADVANCE as i16); // minLSB, minRSB, xMaxExtent
    w.i16(1).i16(0).i16(0); // caret slope rise/run, offset
    w.i16(0).i16(0).i16(0).i16(0); // reserved
    w.i16(0); // metricDataFormat
    w.u16(NUM_GLYPHS); // numberOfHMetrics
    assert_eq!(w.0.len(), 36);
    w.0
}

fn hmtx() -> Vec<u8> {
    let mut w = Writer::new();
    for glyph in 0..NUM_GLYPHS {
        let advance = match glyph {
            0 => NOTDEF_ADVANCE,
            1 => SPACE_ADVANCE,
            _ => LETTER_ADVANCE,
        };
        w.u16(advance).i16(0);
    }
    w.0
}

fn maxp() -> Vec<u8> {
    let mut w = Writer::new();
    w.u32(0x0000_5000).u16(NUM_GLYPHS);
    w.0
}

fn checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}

/// The fixture's tables, keyed by tag.
pub fn tables(units_per_em: u16) -> HashMap<Tag, Vec<u8>> {
    HashMap::from([
        (Tag::new(*b"cmap"), cmap()),
        (Tag::new(*b"head"), head(units_per_em)),
        (Tag::new(*b"hhea"), hhea()),
        (Tag::new(*b"hmtx"), hmtx()),
        (Tag::new(*b"maxp"), maxp()),
    ])
}

/// A complete sfnt file.
pub fn font(units_per_em: u16) -> Vec<u8> {
    let mut tables: Vec<(Tag, Vec<u8>)> = tables(units_per_em).into_iter().collect();
    tables.sort_by_key(|(tag, _)| tag.as_u32());

    let num_tables = tables.len() as u16;
    let mut w = Writer::new();
    w.u32(0x0001_0000);
    w.u16(num_tables);
    w.u16(64).u16(2).u16(num_tables * 16 - 64); // searchRange, entrySelector, rangeShift

    let mut offset = 12 + 16 * tables.len();
    for (tag, data) in &tables {
        w.u32(tag.as_u32())
            .u32(checksum(data))
            .u32(offset as u32)
            .u32(data.len() as u32);
        offset += data.len().next_multiple_of(4);
    }

    let mut out = w.0;
    for (_, data) in &tables {
        out.extend_from_slice(data);
        out.resize(out.len().next_multiple_of(4), 0);
    }
    out
}
