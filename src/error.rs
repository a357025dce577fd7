// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Error type for Cricket

use thiserror::Error;

/// Result type, equivalent to [std::result::Result]<T, [enum@Error]>
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Cricket.
#[derive(Debug, Error)]
pub enum Error {
    /// The program does not fit between the program start and the end of memory
    #[error("program is {size} bytes, but only {limit} bytes of memory are available")]
    ProgramTooLarge {
        /// The size of the rejected program
        size: usize,
        /// The largest program which would have fit
        limit: usize,
    },
    /// Represents an unimplemented operation
    #[error("opcode {word:04x} not recognized")]
    UnknownOpcode {
        /// The offending word
        word: u16,
    },
    /// Tried to fetch an instruction from outside of memory
    #[error("program counter {pc:03x} is out of range")]
    ProgramCounterOutOfRange {
        /// The offending program counter
        pc: u16,
    },
    /// Tried to return from a subroutine with nothing on the stack
    #[error("return at {pc:03x} with an empty call stack")]
    StackUnderflow {
        /// Address of the offending `00ee`
        pc: u16,
    },
    /// Tried to call a subroutine with a full call stack
    #[error("call at {pc:03x} with a full call stack")]
    StackOverflow {
        /// Address of the offending `2aaa`
        pc: u16,
    },
    /// Tried to press a key that doesn't exist
    #[error("tried to press key {key:X} which does not exist")]
    InvalidKey {
        /// The offending key
        key: usize,
    },
    /// Tried to get/set an out-of-bounds register
    #[error("tried to access register v{reg:X} which does not exist")]
    InvalidRegister {
        /// The offending register
        reg: usize,
    },
    /// Tried to convert string into mode, but it did not match.
    #[error("no suitable conversion of \"{mode}\" into Mode")]
    InvalidMode {
        /// The string which failed to become a mode
        mode: String,
    },
    /// The audio worker thread died
    #[error("audio worker stopped unexpectedly")]
    AudioWorker,
    /// Error originated in [std::io]
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}
