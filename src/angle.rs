/*
 *  angle.rs
 *
 *  HybridFace - analog hands, digital heart
 *  (c) 2020-26 Stuart Hunter
 *
 *  Wall-clock time to fixed-point hand angles
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
//! Hand angles are expressed in the rendering backend's fixed-point unit,
//! where [`TRIG_MAX_ANGLE`] is one full turn. Degree-equivalents are scaled
//! with the integer factor [`ANGLE_K`], so 360 degrees lands slightly short
//! of a full turn; that matches the backend's own conversion.

/// One full turn in the fixed-point angular unit.
pub const TRIG_MAX_ANGLE: i32 = 0x10000;

/// Degree-equivalent to fixed-point conversion factor.
pub const ANGLE_K: i32 = TRIG_MAX_ANGLE / 360;

/// Minutes in a day; `minutes_of_day` is always below this.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Rotation of the three hands for one clock sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandAngles {
    pub hour: i32,
    pub minute: i32,
    pub second: i32,
}

impl HandAngles {
    /// All three angles for a time of day.
    pub fn at(minutes_of_day: u16, seconds: u8) -> Self {
        Self {
            hour: hour_angle(minutes_of_day),
            minute: minute_angle(minutes_of_day),
            second: second_angle(seconds),
        }
    }
}

/// 30 degree-equivalents per hour. The division truncates, so the hour hand
/// moves in half-degree steps every other minute.
#[inline]
pub fn hour_angle(minutes_of_day: u16) -> i32 {
    ANGLE_K * ((minutes_of_day as i32 * 30) / 60)
}

/// 6 degree-equivalents per minute of the hour.
#[inline]
pub fn minute_angle(minutes_of_day: u16) -> i32 {
    ANGLE_K * (minutes_of_day as i32 % 60) * 6
}

/// 6 degree-equivalents per second.
#[inline]
pub fn second_angle(seconds: u8) -> i32 {
    ANGLE_K * seconds as i32 * 6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_angle_k() {
        assert_eq!(ANGLE_K, 182);
    }

    #[test]
    fn test_hour_angle_whole_day() {
        for m in 0..MINUTES_PER_DAY {
            assert_eq!(hour_angle(m), ANGLE_K * ((m as i32 * 30) / 60), "minute {}", m);
        }
        // truncation: 00:01 still points straight up
        assert_eq!(hour_angle(1), 0);
        assert_eq!(hour_angle(2), ANGLE_K);
    }

    #[test]
    fn test_minute_angle_whole_day() {
        for m in 0..MINUTES_PER_DAY {
            assert_eq!(minute_angle(m), ANGLE_K * (m as i32 % 60) * 6, "minute {}", m);
        }
        assert_eq!(minute_angle(60), 0);
        assert_eq!(minute_angle(75), ANGLE_K * 90);
    }

    #[test]
    fn test_second_angle_range() {
        for s in 0..60u8 {
            assert_eq!(second_angle(s), ANGLE_K * s as i32 * 6);
            assert!(second_angle(s) < TRIG_MAX_ANGLE);
        }
    }

    #[test]
    fn test_half_past_one() {
        let a = HandAngles::at(90, 45);
        assert_eq!(a.hour, ANGLE_K * 45);
        assert_eq!(a.minute, ANGLE_K * 180);
        assert_eq!(a.second, ANGLE_K * 270);
    }

    #[test]
    fn test_afternoon_hour_exceeds_one_turn() {
        // 13:00 keeps the raw value; rotation reduces it
        assert_eq!(hour_angle(13 * 60), ANGLE_K * 390);
        assert!(hour_angle(13 * 60) > TRIG_MAX_ANGLE);
    }
}
