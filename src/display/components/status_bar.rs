/*
 *  display/components/status_bar.rs
 *
 *  HybridFace - analog hands, digital heart
 *  (c) 2020-26 Stuart Hunter
 *
 *  Battery and Bluetooth status glyphs
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
use arrayvec::ArrayString;
use core::fmt::Write;
use embedded_graphics::prelude::*;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::primitives::Rectangle;

use crate::assets::{AssetError, AssetId, AssetStore, Bitmap, FontId};
use crate::constants::*;
use crate::display::field::{Alignment, Field, TextLayer};
use crate::display::layer::Layer;
use crate::services::BatteryChargeState;

/// Battery percentage text, e.g. "7%" (stack allocated)
pub fn format_battery(percent: u8) -> ArrayString<8> {
    let mut buf = ArrayString::new();
    let _ = write!(&mut buf, "{}%", percent);
    buf
}

/// Battery frame with its percentage, and the Bluetooth link icon.
#[derive(Debug)]
pub struct StatusBar {
    battery_frame: Bitmap,
    battery_text: TextLayer,
    bt_on: Bitmap,
    bt_off: Bitmap,
    bt_layer: Layer,
    connected: Option<bool>,
}

impl StatusBar {
    pub fn new(assets: &AssetStore) -> Result<Self, AssetError> {
        let battery_bounds = Rectangle::new(Point::new(BATTERY_X, BATTERY_Y), Size::new(BATTERY_W, BATTERY_H));
        let battery_text = Field::new_text("battery", battery_bounds, assets.font(FontId::Battery))
            .align(Alignment::Center)
            .colors(BinaryColor::Off, None);

        Ok(Self {
            battery_frame: assets.load(AssetId::BatteryFrame)?,
            battery_text: TextLayer::new(battery_text),
            bt_on: assets.load(AssetId::BluetoothOn)?,
            bt_off: assets.load(AssetId::BluetoothOff)?,
            bt_layer: Layer::new(
                "bluetooth",
                Rectangle::new(Point::new(BT_X, BT_Y), Size::new(BT_W, BT_H)),
            ),
            connected: None,
        })
    }

    /// Show the charge percentage
    pub fn set_battery(&mut self, state: &BatteryChargeState) {
        self.battery_text.set_text(&format_battery(state.charge_percent));
    }

    /// Swap the link icon; returns the previous link state
    pub fn set_connected(&mut self, connected: bool) -> Option<bool> {
        let previous = self.connected.replace(connected);
        self.bt_layer.mark_dirty();
        previous
    }

    pub fn connected(&self) -> Option<bool> {
        self.connected
    }

    pub fn battery_text(&self) -> &str {
        self.battery_text.text()
    }

    /// Asset currently shown in the Bluetooth slot
    pub fn bt_icon(&self) -> Option<AssetId> {
        self.current_bt_bitmap().map(Bitmap::id)
    }

    pub fn is_dirty(&self) -> bool {
        self.battery_text.layer().is_dirty() || self.bt_layer.is_dirty()
    }

    pub fn clean(&mut self) {
        self.battery_text.layer_mut().clean();
        self.bt_layer.clean();
    }

    fn current_bt_bitmap(&self) -> Option<&Bitmap> {
        match self.connected {
            Some(true) => Some(&self.bt_on),
            Some(false) => Some(&self.bt_off),
            None => None,
        }
    }

    pub fn render<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        self.battery_frame.draw_at(target, Point::new(BATTERY_X, BATTERY_Y))?;
        self.battery_text.render(target)?;

        if let Some(icon) = self.current_bt_bitmap() {
            icon.draw_at(target, self.bt_layer.frame().top_left)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vframebuf::VarFrameBuf;

    fn battery(percent: u8) -> BatteryChargeState {
        BatteryChargeState { charge_percent: percent, is_charging: false, is_plugged: false }
    }

    #[test]
    fn test_format_battery() {
        assert_eq!(format_battery(7).as_str(), "7%");
        assert_eq!(format_battery(100).as_str(), "100%");
        assert_eq!(format_battery(0).as_str(), "0%");
    }

    #[test]
    fn test_link_icon_swaps() {
        let assets = AssetStore::new();
        let mut status = StatusBar::new(&assets).unwrap();
        assert_eq!(status.bt_icon(), None);

        assert_eq!(status.set_connected(true), None);
        assert_eq!(status.bt_icon(), Some(AssetId::BluetoothOn));

        assert_eq!(status.set_connected(false), Some(true));
        assert_eq!(status.bt_icon(), Some(AssetId::BluetoothOff));
    }

    #[test]
    fn test_battery_text_drawn_on_frame() {
        let assets = AssetStore::new();
        let mut status = StatusBar::new(&assets).unwrap();
        status.set_battery(&battery(7));
        assert_eq!(status.battery_text(), "7%");

        let mut fb = VarFrameBuf::new(DISPLAY_WIDTH, DISPLAY_HEIGHT, BinaryColor::Off);
        status.render(&mut fb).unwrap();
        let frame_px = (BATTERY_W - 4) * BATTERY_H + 3 * (BATTERY_H - 12);
        // black digits punch holes in the light frame
        assert!(fb.count(BinaryColor::On) < frame_px as usize);
        assert!(fb.count(BinaryColor::On) > frame_px as usize / 2);
    }

    #[test]
    fn test_status_bar_holds_three_bitmaps() {
        let assets = AssetStore::new();
        let status = StatusBar::new(&assets).unwrap();
        assert_eq!(assets.live(), 3);
        drop(status);
        assert_eq!(assets.live(), 0);
    }
}
