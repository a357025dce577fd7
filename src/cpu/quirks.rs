// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Controls the [Quirks] behavior of the CPU on a granular level.

/// Controls the quirk behavior of the CPU on a granular level.
///
/// `true` reproduces the behavior ROMs written for this interpreter expect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quirks {
    /// `8xyE` stores `vX & 0x80` in vF, rather than normalizing it to 0 or 1
    pub raw_shift_flag: bool,
    /// `Ex9E` releases the key it skipped on, so each press is only seen once
    pub key_debounce: bool,
    /// `Dxyn` wraps sprites from side to side and top to bottom, instead of clipping them
    pub screen_wrap: bool,
    /// `Fx29` finds the digit by scanning memory, instead of computing its address
    pub font_scan: bool,
}

impl From<bool> for Quirks {
    fn from(value: bool) -> Self {
        Quirks {
            raw_shift_flag: value,
            key_debounce: value,
            screen_wrap: value,
            font_scan: value,
        }
    }
}

impl Default for Quirks {
    fn default() -> Self {
        Self::from(true)
    }
}
