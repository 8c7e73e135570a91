/*
 *  clock_sample.rs
 *
 *  HybridFace - analog hands, digital heart
 *  (c) 2020-26 Stuart Hunter
 *
 *  Per-tick wall-clock snapshot
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
use chrono::{Datelike, Timelike};

/// Immutable snapshot of the wall clock, taken once per tick.
///
/// Field conventions follow a broken-down calendar time: `month` counts
/// from 0 (January), `weekday` from 0 (Sunday), `day_of_year` from 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockSample {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub day_of_month: u8,
    pub month: u8,
    pub weekday: u8,
    pub day_of_year: u16,
}

impl ClockSample {
    /// Snapshot any chrono date-time.
    pub fn from_datetime<T: Datelike + Timelike>(dt: &T) -> Self {
        Self {
            hour: dt.hour() as u8,
            minute: dt.minute() as u8,
            // leap seconds report 60; keep the hand on the dial
            second: dt.second().min(59) as u8,
            day_of_month: dt.day() as u8,
            month: dt.month0() as u8,
            weekday: dt.weekday().num_days_from_sunday() as u8,
            day_of_year: dt.ordinal0() as u16,
        }
    }

    #[inline]
    pub fn minutes_of_day(&self) -> u16 {
        self.hour as u16 * 60 + self.minute as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_from_datetime() {
        // Friday 16 October 2026, 13:05:09
        let dt = NaiveDate::from_ymd_opt(2026, 10, 16)
            .and_then(|d| d.and_hms_opt(13, 5, 9))
            .unwrap();
        let s = ClockSample::from_datetime(&dt);
        assert_eq!(s.hour, 13);
        assert_eq!(s.minute, 5);
        assert_eq!(s.second, 9);
        assert_eq!(s.day_of_month, 16);
        assert_eq!(s.month, 9);
        assert_eq!(s.weekday, 5);
        assert_eq!(s.day_of_year, 288);
        assert_eq!(s.minutes_of_day(), 785);
    }

    #[test]
    fn test_first_day_of_year() {
        let dt = NaiveDate::from_ymd_opt(2026, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        let s = ClockSample::from_datetime(&dt);
        assert_eq!(s.day_of_year, 0);
        assert_eq!(s.month, 0);
        assert_eq!(s.minutes_of_day(), 0);
    }
}
