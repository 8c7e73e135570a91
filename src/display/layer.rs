/*
 *  display/layer.rs
 *
 *  HybridFace - analog hands, digital heart
 *  (c) 2020-26 Stuart Hunter
 *
 *  Screen layers with dirty tracking
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
use embedded_graphics::primitives::Rectangle;
use log::trace;

/// A region of the screen that is redrawn as a unit.
///
/// Marking a layer dirty is idempotent within a frame: the compositor
/// redraws once and then clears the flag, whatever the number of marks.
#[derive(Debug, Clone)]
pub struct Layer {
    name: &'static str,
    frame: Rectangle,
    dirty: bool,
    dirty_marks: u64,
}

impl Layer {
    pub fn new(name: &'static str, frame: Rectangle) -> Self {
        // a fresh layer has never been drawn
        Self { name, frame, dirty: true, dirty_marks: 0 }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn frame(&self) -> Rectangle {
        self.frame
    }

    /// Request a redraw on the next frame
    pub fn mark_dirty(&mut self) {
        trace!("layer {} marked dirty", self.name);
        self.dirty = true;
        self.dirty_marks += 1;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the flag after a redraw
    pub fn clean(&mut self) {
        self.dirty = false;
    }

    /// Number of explicit redraw requests over the layer's lifetime
    pub fn dirty_marks(&self) -> u64 {
        self.dirty_marks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::prelude::*;

    #[test]
    fn test_layer_dirty_cycle() {
        let mut layer = Layer::new("hands", Rectangle::new(Point::zero(), Size::new(144, 168)));
        assert!(layer.is_dirty());
        assert_eq!(layer.dirty_marks(), 0);

        layer.clean();
        assert!(!layer.is_dirty());

        layer.mark_dirty();
        layer.mark_dirty();
        assert!(layer.is_dirty());
        assert_eq!(layer.dirty_marks(), 2);
        assert_eq!(layer.name(), "hands");
    }
}
