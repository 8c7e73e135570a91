/*
 *  display/components/clock.rs
 *
 *  HybridFace - analog hands, digital heart
 *  (c) 2020-26 Stuart Hunter
 *
 *  Digital time and date text
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

use crate::assets::{AssetStore, FontId};
use crate::clock_sample::ClockSample;
use crate::constants::*;
use crate::display::field::{Alignment, Field, TextLayer};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun",
    "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Indexed from Sunday.
const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// "HH:MM", 24-hour, zero padded
pub fn format_time(sample: &ClockSample) -> ArrayString<8> {
    let mut buf = ArrayString::new();
    let _ = write!(&mut buf, "{:02}:{:02}", sample.hour, sample.minute);
    buf
}

/// "D Mon, Wkd", e.g. "16 Oct, Fri"
pub fn format_date(sample: &ClockSample) -> ArrayString<24> {
    let mut buf = ArrayString::new();
    let month = MONTHS.get(sample.month as usize).copied().unwrap_or("???");
    let weekday = WEEKDAYS.get(sample.weekday as usize).copied().unwrap_or("???");
    let _ = write!(&mut buf, "{} {}, {}", sample.day_of_month, month, weekday);
    buf
}

/// Time and date lines, both white on black and centred.
#[derive(Debug)]
pub struct ClockDisplay {
    time: TextLayer,
    date: TextLayer,
}

impl ClockDisplay {
    pub fn new(assets: &AssetStore) -> Self {
        let time = Field::new_text(
            "time",
            Rectangle::new(Point::new(TIME_X, TIME_Y), Size::new(TIME_W, TIME_H)),
            assets.font(FontId::Time),
        )
        .align(Alignment::Center)
        .colors(BinaryColor::On, Some(BinaryColor::Off));

        let date = Field::new_text(
            "date",
            Rectangle::new(Point::new(DATE_X, DATE_Y), Size::new(DATE_W, DATE_H)),
            assets.font(FontId::Date),
        )
        .align(Alignment::Center)
        .colors(BinaryColor::On, Some(BinaryColor::Off));

        Self {
            time: TextLayer::new(time),
            date: TextLayer::new(date),
        }
    }

    /// Reformat and show the time from `sample`
    pub fn set_time(&mut self, sample: &ClockSample) {
        self.time.set_text(&format_time(sample));
    }

    /// Reformat and show the date from `sample`
    pub fn set_date(&mut self, sample: &ClockSample) {
        self.date.set_text(&format_date(sample));
    }

    pub fn time(&self) -> &TextLayer { &self.time }
    pub fn date(&self) -> &TextLayer { &self.date }

    pub fn is_dirty(&self) -> bool {
        self.time.layer().is_dirty() || self.date.layer().is_dirty()
    }

    pub fn clean(&mut self) {
        self.time.layer_mut().clean();
        self.date.layer_mut().clean();
    }

    pub fn render<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        self.time.render(target)?;
        self.date.render(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(hour: u8, minute: u8, day: u8, month: u8, weekday: u8) -> ClockSample {
        ClockSample {
            hour,
            minute,
            second: 0,
            day_of_month: day,
            month,
            weekday,
            day_of_year: 0,
        }
    }

    #[test]
    fn test_format_time_pads() {
        assert_eq!(format_time(&sample(1, 30, 1, 0, 0)).as_str(), "01:30");
        assert_eq!(format_time(&sample(0, 0, 1, 0, 0)).as_str(), "00:00");
        assert_eq!(format_time(&sample(23, 59, 1, 0, 0)).as_str(), "23:59");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(&sample(0, 0, 16, 9, 5)).as_str(), "16 Oct, Fri");
        assert_eq!(format_date(&sample(0, 0, 1, 0, 0)).as_str(), "1 Jan, Sun");
        assert_eq!(format_date(&sample(0, 0, 31, 11, 6)).as_str(), "31 Dec, Sat");
    }

    #[test]
    fn test_clock_display_tracks_updates() {
        let assets = AssetStore::new();
        let mut clock = ClockDisplay::new(&assets);
        clock.clean();
        assert!(!clock.is_dirty());

        clock.set_time(&sample(12, 5, 2, 1, 1));
        assert_eq!(clock.time().text(), "12:05");
        assert_eq!(clock.time().updates(), 1);
        assert_eq!(clock.date().updates(), 0);
        assert!(clock.is_dirty());
    }
}
