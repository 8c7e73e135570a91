/*
 *  haptics.rs
 *
 *  HybridFace - analog hands, digital heart
 *  (c) 2020-26 Stuart Hunter
 *
 *  Vibration patterns and motor back-ends
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
use std::cell::RefCell;
use std::rc::Rc;

use log::info;

use crate::constants::{LOST_VIBE_SEGMENTS, LOST_VIBE_SEGMENT_MS};

/// A named vibration pattern; segments alternate on/off, starting on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VibePattern {
    pub name: &'static str,
    pub durations_ms: Vec<u32>,
}

impl VibePattern {
    /// Played when the phone link drops
    pub fn lost_connection() -> Self {
        Self {
            name: "lost_connection",
            durations_ms: vec![LOST_VIBE_SEGMENT_MS; LOST_VIBE_SEGMENTS],
        }
    }

    pub fn segments(&self) -> usize {
        self.durations_ms.len()
    }

    pub fn total_ms(&self) -> u32 {
        self.durations_ms.iter().sum()
    }
}

/// Anything that can run a vibration pattern.
pub trait HapticDriver {
    /// Queue a pattern behind whatever is playing; never blocks.
    fn enqueue(&mut self, pattern: &VibePattern);
}

/// Host stand-in for the motor: logs each pattern.
#[derive(Debug, Default)]
pub struct LogHaptics;

impl HapticDriver for LogHaptics {
    fn enqueue(&mut self, pattern: &VibePattern) {
        info!(
            "Vibrate '{}': {} segments, {} ms",
            pattern.name,
            pattern.segments(),
            pattern.total_ms()
        );
    }
}

/// Records every enqueued pattern; the log is shared so it can be
/// inspected after the driver has been moved into the watchface.
#[derive(Debug, Default, Clone)]
pub struct RecordingHaptics {
    log: Rc<RefCell<Vec<VibePattern>>>,
}

impl RecordingHaptics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn patterns(&self) -> Vec<VibePattern> {
        self.log.borrow().clone()
    }

    pub fn count(&self) -> usize {
        self.log.borrow().len()
    }
}

impl HapticDriver for RecordingHaptics {
    fn enqueue(&mut self, pattern: &VibePattern) {
        self.log.borrow_mut().push(pattern.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lost_connection_pattern() {
        let p = VibePattern::lost_connection();
        assert_eq!(p.segments(), 5);
        assert!(p.durations_ms.iter().all(|&d| d == 1000));
        assert_eq!(p.total_ms(), 5000);
    }

    #[test]
    fn test_recording_shares_log_across_clones() {
        let rec = RecordingHaptics::new();
        let mut handle = rec.clone();
        handle.enqueue(&VibePattern::lost_connection());
        assert_eq!(rec.count(), 1);
        assert_eq!(rec.patterns()[0].name, "lost_connection");
    }
}
