/*
 *  assets.rs
 *
 *  HybridFace - analog hands, digital heart
 *  (c) 2020-26 Stuart Hunter
 *
 *  Bitmap and font assets loaded by identifier
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
use std::cell::Cell;
use std::rc::Rc;

use embedded_graphics::image::{GetPixel, ImageRaw};
use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X13_BOLD, FONT_7X13_BOLD};
use embedded_graphics::mono_font::MonoFont;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, Rectangle};
use log::debug;
use thiserror::Error;

use crate::angle::ANGLE_K;
use crate::constants::*;
use crate::glyphs::{
    get_glyph_slice, glyph_byte_size, BT_GLYPHS, BT_GLYPH_CONNECTED, BT_GLYPH_DISCONNECTED,
    BT_GLYPH_HEIGHT, BT_GLYPH_WIDTH,
};
use crate::trig::rotate_point;
use crate::vframebuf::VarFrameBuf;

/// Build-time asset identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetId {
    /// Full-screen dial background
    Face,
    /// Battery outline the percentage is printed on
    BatteryFrame,
    BluetoothOn,
    BluetoothOff,
}

/// Font identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontId {
    Time,
    Date,
    Battery,
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset {id:?} is malformed: expected {expected} bytes, found {actual}")]
    Malformed { id: AssetId, expected: usize, actual: usize },
}

/// Radius of the light dial area behind the hands.
const DIAL_R: u32 = 40;

/// Hands the assets out and keeps count of live handles.
#[derive(Debug, Default)]
pub struct AssetStore {
    live: Rc<Cell<usize>>,
}

/// A loaded bitmap; released (and uncounted) when dropped.
#[derive(Debug)]
pub struct Bitmap {
    id: AssetId,
    pixels: VarFrameBuf<BinaryColor>,
    live: Rc<Cell<usize>>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bitmaps loaded and not yet dropped
    pub fn live(&self) -> usize {
        self.live.get()
    }

    pub fn load(&self, id: AssetId) -> Result<Bitmap, AssetError> {
        let pixels = match id {
            AssetId::Face => render_face(),
            AssetId::BatteryFrame => render_battery_frame(),
            AssetId::BluetoothOn => decode_glyph(id, BT_GLYPH_CONNECTED)?,
            AssetId::BluetoothOff => decode_glyph(id, BT_GLYPH_DISCONNECTED)?,
        };
        self.live.set(self.live.get() + 1);
        debug!("asset {:?} loaded ({}x{})", id, pixels.width(), pixels.height());
        Ok(Bitmap { id, pixels, live: Rc::clone(&self.live) })
    }

    pub fn font(&self, id: FontId) -> &'static MonoFont<'static> {
        match id {
            FontId::Time => &FONT_10X20,
            FontId::Date => &FONT_7X13_BOLD,
            FontId::Battery => &FONT_6X13_BOLD,
        }
    }
}

impl Bitmap {
    pub fn id(&self) -> AssetId {
        self.id
    }

    pub fn size(&self) -> Size {
        self.pixels.size()
    }

    pub fn pixel(&self, p: Point) -> Option<BinaryColor> {
        self.pixels.pixel(p)
    }

    /// Blit the bitmap with its top-left corner at `origin`
    pub fn draw_at<D>(&self, target: &mut D, origin: Point) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        target.draw_iter(self.pixels.pixels_at(origin))
    }
}

impl Drop for Bitmap {
    fn drop(&mut self) {
        self.live.set(self.live.get().saturating_sub(1));
        debug!("asset {:?} released", self.id);
    }
}

fn decode_glyph(id: AssetId, index: usize) -> Result<VarFrameBuf<BinaryColor>, AssetError> {
    let expected = glyph_byte_size(BT_GLYPH_WIDTH, BT_GLYPH_HEIGHT) * (index + 1);
    if BT_GLYPHS.len() < expected {
        return Err(AssetError::Malformed { id, expected, actual: BT_GLYPHS.len() });
    }

    let raw = ImageRaw::<BinaryColor>::new(
        get_glyph_slice(&BT_GLYPHS, index, BT_GLYPH_WIDTH, BT_GLYPH_HEIGHT),
        BT_GLYPH_WIDTH,
    );
    // white plate, black rune
    let mut fb = VarFrameBuf::new(BT_GLYPH_WIDTH, BT_GLYPH_HEIGHT, BinaryColor::On);
    for y in 0..BT_GLYPH_HEIGHT as i32 {
        for x in 0..BT_GLYPH_WIDTH as i32 {
            let p = Point::new(x, y);
            if raw.pixel(p) == Some(BinaryColor::On) {
                fb.set(p, BinaryColor::Off);
            }
        }
    }
    Ok(fb)
}

/// Black screen with a light dial around the pivot and twelve hour ticks.
fn render_face() -> VarFrameBuf<BinaryColor> {
    let mut fb = VarFrameBuf::new(DISPLAY_WIDTH, DISPLAY_HEIGHT, BinaryColor::Off);
    let pivot = Point::new(HANDS_X, HANDS_Y);

    let _ = Circle::with_center(pivot, DIAL_R * 2 + 1)
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(&mut fb);

    let tick = PrimitiveStyle::with_stroke(BinaryColor::Off, 3);
    for hour in 0..12 {
        let angle = ANGLE_K * hour * 30;
        let outer = rotate_point(Point::new(0, -(DIAL_R as i32) + 1), angle);
        let inner = rotate_point(Point::new(0, -(DIAL_R as i32) + 5), angle);
        let _ = Line::new(pivot + inner, pivot + outer).into_styled(tick).draw(&mut fb);
    }
    fb
}

/// Light battery body with a terminal nub on the right.
fn render_battery_frame() -> VarFrameBuf<BinaryColor> {
    let mut fb = VarFrameBuf::new(BATTERY_W, BATTERY_H, BinaryColor::Off);
    let body = Size::new(BATTERY_W - 4, BATTERY_H);
    let _ = Rectangle::new(Point::zero(), body)
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(&mut fb);
    let _ = Rectangle::new(Point::new(BATTERY_W as i32 - 4, 6), Size::new(3, BATTERY_H - 12))
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(&mut fb);
    fb
}
