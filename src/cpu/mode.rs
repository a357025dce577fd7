// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Selects a preset set of [Quirks]

use super::quirks::Quirks;
use crate::error::Error;
use std::str::FromStr;

/// Selects a preset set of [Quirks]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mode {
    /// Every quirk on
    #[default]
    Original,
    /// Every quirk off, like most later interpreters
    Modern,
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "original" | "orig" => Ok(Mode::Original),
            "modern" => Ok(Mode::Modern),
            _ => Err(Error::InvalidMode {
                mode: s.to_string(),
            }),
        }
    }
}

impl From<Mode> for Quirks {
    fn from(value: Mode) -> Self {
        Quirks::from(value == Mode::Original)
    }
}
