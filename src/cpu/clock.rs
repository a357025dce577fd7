// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Decides, from wall-clock time, when the next instruction and timer tick are due

use std::time::Instant;

/// Rate at which the delay and sound timers count down, in ticks per second
pub const TIMER_RATE: u32 = 60;
/// Instruction rate after a reset, in instructions per second
pub const DEFAULT_RATE: u32 = 500;
/// Amount [Clock::increase_rate] and [Clock::decrease_rate] adjust the rate by
pub const RATE_STEP: u32 = 10;
/// Fastest allowed instruction rate
pub const MAX_RATE: u32 = 5000;

/// Two independent gates: one for instructions, one for timers.
///
/// A gate fires once at least `1000 / rate` whole milliseconds have passed since it
/// last fired, and remembers the time it *actually* fired. Drift is not corrected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Clock {
    rate: u32,
    last_insn: Option<Instant>,
    last_timer: Option<Instant>,
}

impl Clock {
    /// Gets the instruction rate, in instructions per second
    pub fn rate(&self) -> u32 {
        self.rate
    }

    /// Sets the instruction rate, clamped to `0..=MAX_RATE`.
    ///
    /// A rate of 0 stops instructions, but not timers.
    pub fn set_rate(&mut self, rate: u32) -> u32 {
        self.rate = rate.min(MAX_RATE);
        self.rate
    }

    /// Speeds up by [RATE_STEP]
    /// # Examples
    /// ```rust
    /// # use cricket::prelude::*;
    /// let mut clock = Clock::default();
    /// assert_eq!(clock::DEFAULT_RATE + clock::RATE_STEP, clock.increase_rate());
    /// ```
    pub fn increase_rate(&mut self) -> u32 {
        self.set_rate(self.rate.saturating_add(RATE_STEP))
    }

    /// Slows down by [RATE_STEP], stopping at 0
    pub fn decrease_rate(&mut self) -> u32 {
        self.set_rate(self.rate.saturating_sub(RATE_STEP))
    }

    /// Returns true, and records `now`, if an instruction is due at `now`
    pub fn insn_due(&mut self, now: Instant) -> bool {
        Self::gate(&mut self.last_insn, self.rate, now)
    }

    /// Returns true, and records `now`, if a timer tick is due at `now`
    pub fn timer_due(&mut self, now: Instant) -> bool {
        Self::gate(&mut self.last_timer, TIMER_RATE, now)
    }

    /// Forgets when the gates last fired, and restores [DEFAULT_RATE]
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn gate(last: &mut Option<Instant>, rate: u32, now: Instant) -> bool {
        if rate == 0 {
            return false;
        }
        let due = match *last {
            Some(last) => {
                let elapsed = now.saturating_duration_since(last).as_millis() as f64;
                elapsed >= 1000.0 / rate as f64
            }
            None => true,
        };
        if due {
            *last = Some(now);
        }
        due
    }
}

impl Default for Clock {
    fn default() -> Self {
        Clock {
            rate: DEFAULT_RATE,
            last_insn: None,
            last_timer: None,
        }
    }
}
