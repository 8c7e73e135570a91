/*
 *  glyphs.rs
 *
 *  HybridFace - analog hands, digital heart
 *  (c) 2020-26 Stuart Hunter
 *
 *  Monochrome icon bitmaps
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */
/// Helper function to get a slice for a specific glyph from a binary set
pub fn get_glyph_slice(raw_glyph: &'static [u8], index: usize, w: u32, h: u32) -> &'static [u8] {
    let byte_size = glyph_byte_size(w, h);
    let start_idx = index * byte_size;
    let end_idx = start_idx + byte_size;
    &raw_glyph[start_idx..end_idx]
}

/// Bytes per glyph; rows are padded to a whole byte, MSB first.
pub const fn glyph_byte_size(w: u32, h: u32) -> usize {
    ((w as usize + 7) / 8) * h as usize
}

/// Bluetooth icon strip dimensions (one glyph per link state).
pub const BT_GLYPH_WIDTH: u32 = 25;
pub const BT_GLYPH_HEIGHT: u32 = 24;

/// Glyph index in [`BT_GLYPHS`].
pub const BT_GLYPH_CONNECTED: usize = 0;
pub const BT_GLYPH_DISCONNECTED: usize = 1;

/// Bluetooth rune, connected then struck through.
pub const BT_GLYPHS: [u8; 192] = [
    // connected
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x18, 0x00, 0x00,
    0x00, 0x1c, 0x00, 0x00, 0x00, 0x1e, 0x00, 0x00, 0x00, 0x1b, 0x00, 0x00,
    0x03, 0x19, 0x80, 0x00, 0x01, 0x98, 0xc0, 0x00, 0x00, 0xd9, 0x80, 0x00,
    0x00, 0x7b, 0x00, 0x00, 0x00, 0x3c, 0x00, 0x00, 0x00, 0x18, 0x00, 0x00,
    0x00, 0x3c, 0x00, 0x00, 0x00, 0x6e, 0x00, 0x00, 0x00, 0xcd, 0x80, 0x00,
    0x01, 0x8c, 0xc0, 0x00, 0x03, 0x0c, 0x60, 0x00, 0x00, 0x19, 0x80, 0x00,
    0x00, 0x1b, 0x00, 0x00, 0x00, 0x1e, 0x00, 0x00, 0x00, 0x1c, 0x00, 0x00,
    0x00, 0x18, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    // disconnected
    0x00, 0x00, 0x00, 0x00, 0x20, 0x00, 0x02, 0x00, 0x10, 0x18, 0x04, 0x00,
    0x08, 0x1c, 0x08, 0x00, 0x04, 0x1e, 0x10, 0x00, 0x02, 0x1b, 0x20, 0x00,
    0x03, 0x19, 0x80, 0x00, 0x01, 0x99, 0x00, 0x00, 0x00, 0xda, 0x00, 0x00,
    0x00, 0x78, 0x00, 0x00, 0x00, 0x38, 0x00, 0x00, 0x00, 0x18, 0x00, 0x00,
    0x00, 0x3c, 0x00, 0x00, 0x00, 0x6c, 0x00, 0x00, 0x00, 0xcd, 0x00, 0x00,
    0x01, 0x0c, 0x80, 0x00, 0x02, 0x0c, 0x40, 0x00, 0x04, 0x19, 0xa0, 0x00,
    0x08, 0x1b, 0x10, 0x00, 0x10, 0x1e, 0x08, 0x00, 0x20, 0x1c, 0x04, 0x00,
    0x40, 0x18, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];
