/*
 *  lib.rs
 *
 *  HybridFace - analog hands, digital heart
 *  (c) 2020-26 Stuart Hunter
 *
 *  Crate root: watchface model, rendering and services
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
pub mod angle;
pub mod assets;
pub mod clock_sample;
pub mod config;
pub mod constants;
pub mod display;
pub mod glyphs;
pub mod haptics;
pub mod runner;
pub mod services;
pub mod trig;
pub mod vframebuf;
pub mod watchface;

pub use angle::HandAngles;
pub use clock_sample::ClockSample;
pub use watchface::{DisplayCache, Watchface};
