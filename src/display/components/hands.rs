/*
 *  display/components/hands.rs
 *
 *  HybridFace - analog hands, digital heart
 *  (c) 2020-26 Stuart Hunter
 *
 *  Analog hand geometry and drawing
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
use embedded_graphics::primitives::{Circle, Line, Polyline, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, Triangle};

use crate::angle::HandAngles;
use crate::constants::*;
use crate::display::layer::Layer;
use crate::trig::rotate_point;

/// Hour hand: a tapered quad pointing at twelve.
pub const HOUR_HAND_PATH: [Point; 4] = [
    Point::new(-HOUR_H, 0),
    Point::new(-2, -HOUR_W),
    Point::new(2, -HOUR_W),
    Point::new(HOUR_H, 0),
];

pub const MINUTE_HAND_PATH: [Point; 4] = [
    Point::new(-MINUTE_H, 0),
    Point::new(-2, -MINUTE_W),
    Point::new(2, -MINUTE_W),
    Point::new(MINUTE_H, 0),
];

/// Second hand: a single stroke.
pub const SECOND_HAND_PATH: [Point; 2] = [Point::new(0, 0), Point::new(0, -SECOND_W)];

/// A fixed outline rotated about a pivot. The shape is never translated
/// relative to the pivot; only its rotation changes.
#[derive(Debug, Clone)]
pub struct HandPath {
    shape: &'static [Point],
    pivot: Point,
    angle: i32,
    points: Vec<Point>,
}

impl HandPath {
    pub fn new(shape: &'static [Point], pivot: Point) -> Self {
        let mut path = Self { shape, pivot, angle: 0, points: Vec::with_capacity(shape.len()) };
        path.rotate_to(0);
        path
    }

    /// Set the absolute rotation (fixed-point angle)
    pub fn rotate_to(&mut self, angle: i32) {
        self.angle = angle;
        self.points.clear();
        self.points.extend(self.shape.iter().map(|&p| self.pivot + rotate_point(p, angle)));
    }

    pub fn angle(&self) -> i32 {
        self.angle
    }

    pub fn pivot(&self) -> Point {
        self.pivot
    }

    /// Screen coordinates after rotation
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Fill the (convex) outline as a triangle fan from the first vertex
    pub fn draw_filled<D>(&self, target: &mut D, color: BinaryColor) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let style = PrimitiveStyle::with_fill(color);
        if let Some((&first, rest)) = self.points.split_first() {
            for pair in rest.windows(2) {
                Triangle::new(first, pair[0], pair[1]).into_styled(style).draw(target)?;
            }
        }
        Ok(())
    }

    /// Stroke the outline; closed for polygons, a single line for segments
    pub fn draw_outline<D>(&self, target: &mut D, color: BinaryColor) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let style = PrimitiveStyle::with_stroke(color, 1);
        match self.points.as_slice() {
            [a, b] => Line::new(*a, *b).into_styled(style).draw(target),
            [first, ..] => {
                let mut closed = self.points.clone();
                closed.push(*first);
                Polyline::new(&closed).into_styled(style).draw(target)
            }
            [] => Ok(()),
        }
    }
}

/// The analog half of the face: three hands and the pivot cap.
#[derive(Debug)]
pub struct Hands {
    hour: HandPath,
    minute: HandPath,
    second: HandPath,
    layer: Layer,
}

impl Default for Hands {
    fn default() -> Self {
        Self::new()
    }
}

impl Hands {
    pub fn new() -> Self {
        let pivot = Point::new(HANDS_X, HANDS_Y);
        Self {
            hour: HandPath::new(&HOUR_HAND_PATH, pivot),
            minute: HandPath::new(&MINUTE_HAND_PATH, pivot),
            second: HandPath::new(&SECOND_HAND_PATH, pivot),
            layer: Layer::new(
                "hands",
                Rectangle::new(Point::zero(), Size::new(DISPLAY_WIDTH, DISPLAY_HEIGHT)),
            ),
        }
    }

    /// Re-rotate the hour and minute hands
    pub fn set_hour_minute(&mut self, angles: &HandAngles) {
        self.hour.rotate_to(angles.hour);
        self.minute.rotate_to(angles.minute);
    }

    pub fn set_second(&mut self, angle: i32) {
        self.second.rotate_to(angle);
    }

    pub fn hour(&self) -> &HandPath { &self.hour }
    pub fn minute(&self) -> &HandPath { &self.minute }
    pub fn second(&self) -> &HandPath { &self.second }

    pub fn layer(&self) -> &Layer { &self.layer }
    pub fn layer_mut(&mut self) -> &mut Layer { &mut self.layer }

    /// Minute, hour, second (always on top), then the pivot cap.
    pub fn render<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        // black body, white edge reads on both light and dark dial areas
        self.minute.draw_filled(target, BinaryColor::Off)?;
        self.minute.draw_outline(target, BinaryColor::On)?;

        self.hour.draw_filled(target, BinaryColor::Off)?;
        self.hour.draw_outline(target, BinaryColor::On)?;

        self.second.draw_outline(target, BinaryColor::Off)?;

        Circle::with_center(self.hour.pivot(), CENTER_R * 2 + 1)
            .into_styled(
                PrimitiveStyleBuilder::new()
                    .fill_color(BinaryColor::Off)
                    .stroke_color(BinaryColor::On)
                    .stroke_width(1)
                    .build(),
            )
            .draw(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::{ANGLE_K, TRIG_MAX_ANGLE};
    use crate::vframebuf::VarFrameBuf;

    fn pivot() -> Point {
        Point::new(HANDS_X, HANDS_Y)
    }

    #[test]
    fn test_unrotated_path_hangs_off_pivot() {
        let hand = HandPath::new(&SECOND_HAND_PATH, pivot());
        assert_eq!(hand.points(), &[pivot(), pivot() + Point::new(0, -SECOND_W)]);
    }

    #[test]
    fn test_rotation_keeps_pivot_fixed() {
        let mut hand = HandPath::new(&SECOND_HAND_PATH, pivot());
        for angle in [0, ANGLE_K * 45, ANGLE_K * 90, ANGLE_K * 270, TRIG_MAX_ANGLE + 7] {
            hand.rotate_to(angle);
            assert_eq!(hand.points()[0], pivot());
            assert_eq!(hand.angle(), angle);
        }
    }

    #[test]
    fn test_quarter_turn_points_at_three() {
        let mut hand = HandPath::new(&MINUTE_HAND_PATH, pivot());
        hand.rotate_to(TRIG_MAX_ANGLE / 4);
        assert_eq!(hand.points()[1], pivot() + Point::new(MINUTE_W, -2));
        assert_eq!(hand.points()[2], pivot() + Point::new(MINUTE_W, 2));
    }

    #[test]
    fn test_filled_hand_covers_its_axis() {
        let mut fb = VarFrameBuf::new(DISPLAY_WIDTH, DISPLAY_HEIGHT, BinaryColor::On);
        let hand = HandPath::new(&HOUR_HAND_PATH, pivot());
        hand.draw_filled(&mut fb, BinaryColor::Off).unwrap();
        assert_eq!(fb.pixel(pivot() + Point::new(0, -10)), Some(BinaryColor::Off));
        assert_eq!(fb.pixel(pivot() + Point::new(10, -10)), Some(BinaryColor::On));
    }

    #[test]
    fn test_render_order_caps_the_pivot() {
        let mut fb = VarFrameBuf::new(DISPLAY_WIDTH, DISPLAY_HEIGHT, BinaryColor::On);
        let mut hands = Hands::new();
        hands.set_hour_minute(&HandAngles::at(90, 0));
        hands.set_second(ANGLE_K * 270);
        hands.render(&mut fb).unwrap();

        // black cap with a white rim
        assert_eq!(fb.pixel(pivot()), Some(BinaryColor::Off));
        assert_eq!(fb.pixel(pivot() + Point::new(CENTER_R as i32, 0)), Some(BinaryColor::On));
        // second hand at nine o'clock, drawn in black over the white dial
        assert_eq!(fb.pixel(pivot() + Point::new(-(SECOND_W - 2), 0)), Some(BinaryColor::Off));
        // minute hand at six o'clock: white edge around a black body
        assert_eq!(fb.pixel(pivot() + Point::new(0, MINUTE_W - 8)), Some(BinaryColor::Off));
    }
}
