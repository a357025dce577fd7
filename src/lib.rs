// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! This crate implements a Chip-8 interpreter as a small virtual machine:
//! one state block, driven one [`CPU::cycle`] at a time by the host.
//!
//! The host owns the window, the keyboard and the speaker. The core only
//! talks to them through [`Render`], [`CPU::set_key_state`] and [`Tone`].

pub mod beeper;
pub mod cpu;
pub mod error;
pub mod screen;

pub use beeper::{Beeper, Mute, Tone};
pub use cpu::{
    clock::Clock,
    flags::Flags,
    instruction::{
        disassembler::{Dis, Disassembler},
        Insn,
    },
    keypad::{Keypad, Latch},
    mem::{Mem, Region},
    mode::Mode,
    quirks::Quirks,
    timers::Timers,
    CPU,
};
pub use error::{Error, Result};
pub use screen::{Render, Screen};

/// Common imports for cricket
pub mod prelude {
    pub use super::*;
    pub use cpu::{clock, mem};
    pub use Region::*;
}
