/*
 *  display/field.rs
 *
 *  HybridFace - analog hands, digital heart
 *  (c) 2020-26 Stuart Hunter
 *
 *  Text field definitions
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
use embedded_graphics::prelude::*;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_text::alignment::{HorizontalAlignment, VerticalAlignment};
use embedded_text::style::TextBoxStyleBuilder;
use embedded_text::TextBox;

use crate::display::layer::Layer;

/// Field alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl From<Alignment> for HorizontalAlignment {
    fn from(a: Alignment) -> Self {
        match a {
            Alignment::Left => HorizontalAlignment::Left,
            Alignment::Center => HorizontalAlignment::Center,
            Alignment::Right => HorizontalAlignment::Right,
        }
    }
}

/// A named rectangular region that renders one line of text.
///
/// `bg_color` of `None` leaves whatever is underneath visible, which is how
/// the battery percentage sits on its frame bitmap.
#[derive(Debug, Clone)]
pub struct Field {
    /// Field identifier (e.g., "time", "date", "battery")
    pub name: &'static str,

    /// Bounding rectangle (x, y, width, height)
    pub bounds: Rectangle,

    pub font: &'static MonoFont<'static>,

    pub fg_color: BinaryColor,

    /// Background colour, None for transparent
    pub bg_color: Option<BinaryColor>,

    /// Text alignment within the field
    pub alignment: Alignment,
}

impl Field {
    /// Create a new text field, white on transparent, left aligned
    pub fn new_text(
        name: &'static str,
        bounds: Rectangle,
        font: &'static MonoFont<'static>,
    ) -> Self {
        Self {
            name,
            bounds,
            font,
            fg_color: BinaryColor::On,
            bg_color: None,
            alignment: Alignment::Left,
        }
    }

    /// Builder: set alignment
    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Builder: set colors
    pub fn colors(mut self, fg: BinaryColor, bg: Option<BinaryColor>) -> Self {
        self.fg_color = fg;
        self.bg_color = bg;
        self
    }

    /// Get field width
    pub fn width(&self) -> u32 {
        self.bounds.size.width
    }

    /// Get field height
    pub fn height(&self) -> u32 {
        self.bounds.size.height
    }

    /// Get top-left position
    pub fn position(&self) -> Point {
        self.bounds.top_left
    }

    /// Paint the background (if any) and the text, vertically centred
    pub fn render<D>(&self, target: &mut D, text: &str) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        if let Some(bg) = self.bg_color {
            self.bounds
                .into_styled(PrimitiveStyle::with_fill(bg))
                .draw(target)?;
        }

        let character_style = MonoTextStyle::new(self.font, self.fg_color);
        let textbox_style = TextBoxStyleBuilder::new()
            .alignment(self.alignment.into())
            .vertical_alignment(VerticalAlignment::Middle)
            .build();
        TextBox::with_textbox_style(text, self.bounds, character_style, textbox_style)
            .draw(target)?;
        Ok(())
    }
}

/// A field plus the text it currently shows and its dirty state.
#[derive(Debug, Clone)]
pub struct TextLayer {
    field: Field,
    text: String,
    layer: Layer,
    updates: u64,
}

impl TextLayer {
    pub fn new(field: Field) -> Self {
        let layer = Layer::new(field.name, field.bounds);
        Self { field, text: String::new(), layer, updates: 0 }
    }

    /// Replace the text and request a redraw
    pub fn set_text(&mut self, text: &str) {
        self.text.clear();
        self.text.push_str(text);
        self.updates += 1;
        self.layer.mark_dirty();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of set_text calls so far
    pub fn updates(&self) -> u64 {
        self.updates
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn layer(&self) -> &Layer {
        &self.layer
    }

    pub fn layer_mut(&mut self) -> &mut Layer {
        &mut self.layer
    }

    pub fn render<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        self.field.render(target, &self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::mono_font::ascii::FONT_6X10;
    use crate::vframebuf::VarFrameBuf;

    #[test]
    fn test_field_geometry() {
        let f = Field::new_text("date", Rectangle::new(Point::new(7, 46), Size::new(83, 20)), &FONT_6X10)
            .align(Alignment::Center);
        assert_eq!(f.width(), 83);
        assert_eq!(f.height(), 20);
        assert_eq!(f.position(), Point::new(7, 46));
        assert_eq!(f.alignment, Alignment::Center);
    }

    #[test]
    fn test_field_paints_background_and_text() {
        let mut fb = VarFrameBuf::new(40, 20, BinaryColor::On);
        let f = Field::new_text("t", Rectangle::new(Point::new(0, 0), Size::new(40, 20)), &FONT_6X10)
            .colors(BinaryColor::On, Some(BinaryColor::Off));
        f.render(&mut fb, "12").unwrap();
        let on = fb.count(BinaryColor::On);
        assert!(on > 0, "text drawn");
        assert!(on < 40 * 20 / 2, "background painted");
    }

    #[test]
    fn test_transparent_field_keeps_underlay() {
        let mut fb = VarFrameBuf::new(40, 20, BinaryColor::On);
        let f = Field::new_text("t", Rectangle::new(Point::new(0, 0), Size::new(40, 20)), &FONT_6X10)
            .colors(BinaryColor::Off, None);
        f.render(&mut fb, "").unwrap();
        assert_eq!(fb.count(BinaryColor::On), 40 * 20);
    }

    #[test]
    fn test_text_layer_updates_mark_dirty() {
        let field = Field::new_text("battery", Rectangle::new(Point::new(0, 0), Size::new(40, 19)), &FONT_6X10);
        let mut layer = TextLayer::new(field);
        layer.layer_mut().clean();

        layer.set_text("7%");
        assert_eq!(layer.text(), "7%");
        assert_eq!(layer.updates(), 1);
        assert!(layer.layer().is_dirty());
        assert_eq!(layer.field().name, "battery");
    }
}
