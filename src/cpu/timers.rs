// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The delay and sound timers

/// What the sound timer did on a tick
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sound {
    /// The sound timer was already 0
    Silent,
    /// The sound timer counted down, and is still running
    Sustain,
    /// The sound timer counted down to 0 on this tick
    Release,
}

/// The delay and sound timers. Both count down toward 0, and stop there.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timers {
    /// Delay timer, readable by the program through `Fx07`
    pub delay: u8,
    /// Sound timer. A tone sounds while this is nonzero.
    pub sound: u8,
}

impl Timers {
    /// Counts both timers down once
    /// # Examples
    /// ```rust
    /// # use cricket::{Timers, cpu::timers::Sound};
    /// let mut timers = Timers { delay: 1, sound: 2 };
    /// assert_eq!(Sound::Sustain, timers.tick());
    /// assert_eq!(Sound::Release, timers.tick());
    /// assert_eq!(Sound::Silent, timers.tick());
    /// assert_eq!(Timers { delay: 0, sound: 0 }, timers);
    /// ```
    pub fn tick(&mut self) -> Sound {
        self.delay = self.delay.saturating_sub(1);
        match self.sound {
            0 => Sound::Silent,
            1 => {
                self.sound = 0;
                Sound::Release
            }
            _ => {
                self.sound -= 1;
                Sound::Sustain
            }
        }
    }
}
