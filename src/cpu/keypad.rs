// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The 16-key hex keypad, and the latch used by `Fx0A`

use crate::error::{Error, Result};

/// Whether the interpreter is blocked on `Fx0A`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Latch {
    /// Not waiting
    #[default]
    Idle,
    /// Waiting for the next key press, which will be stored in v`reg`
    Waiting {
        /// The register which receives the key
        reg: usize,
    },
}

/// Current press state of each key, plus the [Latch]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Keypad {
    keys: [bool; 16],
    latch: Latch,
}

impl Keypad {
    /// Records a key going up or down.
    ///
    /// If the latch was waiting and the key went down, the latch is released and
    /// `(reg, key)` is returned, so the caller can store the key.
    /// # Examples
    /// ```rust
    /// # use cricket::Keypad;
    /// let mut keypad = Keypad::default();
    /// keypad.wait(3);
    /// assert_eq!(None, keypad.set(0xa, false).unwrap());
    /// assert_eq!(Some((3, 0xa)), keypad.set(0xa, true).unwrap());
    /// assert!(!keypad.is_waiting());
    /// ```
    pub fn set(&mut self, key: usize, pressed: bool) -> Result<Option<(usize, u8)>> {
        let state = self.keys.get_mut(key).ok_or(Error::InvalidKey { key })?;
        *state = pressed;
        match self.latch {
            Latch::Waiting { reg } if pressed => {
                self.latch = Latch::Idle;
                Ok(Some((reg, key as u8)))
            }
            _ => Ok(None),
        }
    }

    /// Returns true if `key` is held. Keys outside `0..=0xF` are never held.
    pub fn is_pressed(&self, key: usize) -> bool {
        self.keys.get(key).copied().unwrap_or(false)
    }

    /// Marks `key` as released without a key event, so one press is only seen once
    pub fn consume(&mut self, key: usize) {
        if let Some(state) = self.keys.get_mut(key) {
            *state = false;
        }
    }

    /// Blocks until the next key press, which will be stored in v`reg`
    pub fn wait(&mut self, reg: usize) {
        self.latch = Latch::Waiting { reg };
    }

    /// Returns true if blocked on `Fx0A`
    pub fn is_waiting(&self) -> bool {
        matches!(self.latch, Latch::Waiting { .. })
    }

    /// Gets the [Latch]
    pub fn latch(&self) -> Latch {
        self.latch
    }

    /// Gets the held state of every key
    pub fn keys(&self) -> &[bool; 16] {
        &self.keys
    }

    /// Releases every key, and the latch
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_key() {
        let mut keypad = Keypad::default();
        assert!(matches!(
            keypad.set(0x10, true),
            Err(Error::InvalidKey { key: 0x10 })
        ));
        assert!(!keypad.is_pressed(0x10));
    }

    #[test]
    fn release_never_satisfies_latch() {
        let mut keypad = Keypad::default();
        keypad.wait(0);
        for key in 0..16 {
            assert_eq!(None, keypad.set(key, false).unwrap());
        }
        assert_eq!(Latch::Waiting { reg: 0 }, keypad.latch());
    }

    #[test]
    fn first_press_wins() {
        let mut keypad = Keypad::default();
        keypad.wait(5);
        assert_eq!(Some((5, 2)), keypad.set(2, true).unwrap());
        assert_eq!(None, keypad.set(7, true).unwrap());
        assert!(keypad.is_pressed(2) && keypad.is_pressed(7));
    }

    #[test]
    fn consume() {
        let mut keypad = Keypad::default();
        keypad.set(0xf, true).unwrap();
        keypad.consume(0xf);
        assert!(!keypad.is_pressed(0xf));
        keypad.consume(0x20);
    }
}
