/*
 *  display/mod.rs
 *
 *  HybridFace - analog hands, digital heart
 *  (c) 2020-26 Stuart Hunter
 *
 *  Display subsystem: drivers, layers and UI components
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
// Core trait definitions
pub mod traits;
pub mod error;

pub mod drivers;

// Field and layer primitives
pub mod field;
pub mod layer;

// UI components
pub mod components;

// Re-exports for convenience
pub use traits::{DisplayCapabilities, DisplayDriver};
pub use error::DisplayError;
pub use field::{Alignment, Field, TextLayer};
pub use layer::Layer;
pub use drivers::memory::MemoryDriver;
