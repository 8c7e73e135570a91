/*
 *  constants.rs
 *
 *  HybridFace - analog hands, digital heart
 *  (c) 2020-26 Stuart Hunter
 *
 *  Screen geometry and layer frames
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
/// The width of the watch display in pixels.
pub const DISPLAY_WIDTH: u32 = 144;
/// The height of the watch display in pixels.
pub const DISPLAY_HEIGHT: u32 = 168;

// Hands
/// Pivot shared by all three hands.
pub const HANDS_X: i32 = 72;
pub const HANDS_Y: i32 = 126;

/// Hour hand length and half-width at the pivot.
pub const HOUR_W: i32 = 22;
pub const HOUR_H: i32 = 5;
/// Minute hand length and half-width at the pivot.
pub const MINUTE_W: i32 = 35;
pub const MINUTE_H: i32 = 5;
/// Second hand length (single stroke).
pub const SECOND_W: i32 = 34;
/// Radius of the disc masking the hand joints.
pub const CENTER_R: u32 = 5;

// Digital time, white on black
pub const TIME_X: i32 = 24;
pub const TIME_Y: i32 = 18;
pub const TIME_W: u32 = 75;
pub const TIME_H: u32 = 28;

// Date line, white on black
pub const DATE_X: i32 = 7;
pub const DATE_Y: i32 = 46;
pub const DATE_W: u32 = 83;
pub const DATE_H: u32 = 20;

// Battery frame; the percentage text fills the whole frame
pub const BATTERY_X: i32 = 99;
pub const BATTERY_Y: i32 = 74;
pub const BATTERY_W: u32 = 40;
pub const BATTERY_H: u32 = 19;

// Bluetooth icon
pub const BT_X: i32 = 8;
pub const BT_Y: i32 = 72;
pub const BT_W: u32 = 25;
pub const BT_H: u32 = 24;

/// Duration of each segment of the lost-connection vibration, in ms.
pub const LOST_VIBE_SEGMENT_MS: u32 = 1000;
/// Number of segments in the lost-connection vibration.
pub const LOST_VIBE_SEGMENTS: usize = 5;
