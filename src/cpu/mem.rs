// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The Mem represents the CPU's memory
//!
//! Contains some handy utils for reading and writing

use crate::error::{Error, Result};
use std::{
    fmt::{Debug, Display, Formatter},
    ops::Range,
    slice::SliceIndex,
};

/// Total size of addressable memory
pub const MEMORY_SIZE: usize = 0x1000;
/// Where programs are loaded, and where the program counter starts
pub const PROGRAM_START: u16 = 0x200;
/// Where the hex-digit font is loaded
pub const FONT_BASE: u16 = 0x050;
/// Length of a single hex-digit sprite
pub const DIGIT_LEN: usize = 5;

/// The built-in hex-digit font, `0` through `F`
#[rustfmt::skip]
pub const FONT: [u8; 16 * DIGIT_LEN] = [
    0xf0, 0x90, 0x90, 0x90, 0xf0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xf0, 0x10, 0xf0, 0x80, 0xf0, // 2
    0xf0, 0x10, 0xf0, 0x10, 0xf0, // 3
    0x90, 0x90, 0xf0, 0x10, 0x10, // 4
    0xf0, 0x80, 0xf0, 0x10, 0xf0, // 5
    0xf0, 0x80, 0xf0, 0x90, 0xf0, // 6
    0xf0, 0x10, 0x20, 0x40, 0x40, // 7
    0xf0, 0x90, 0xf0, 0x90, 0xf0, // 8
    0xf0, 0x90, 0xf0, 0x10, 0xf0, // 9
    0xf0, 0x90, 0xf0, 0x90, 0x90, // A
    0xe0, 0x90, 0xe0, 0x90, 0xe0, // B
    0xf0, 0x80, 0x80, 0x80, 0xf0, // C
    0xe0, 0x90, 0x90, 0x90, 0xe0, // D
    0xf0, 0x80, 0xf0, 0x80, 0xf0, // E
    0xf0, 0x80, 0xf0, 0x80, 0x80, // F
];

/// Represents a named region in memory
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Region {
    /// Character ROM (but writable!)
    Charset,
    /// Program memory
    Program,
    #[doc(hidden)]
    /// Total number of named regions
    Count,
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Region::Charset => "Charset",
                Region::Program => "Program",
                _ => "",
            }
        )
    }
}

/// Stores memory in a series of named regions with ranges
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mem {
    memory: Vec<u8>,
    region: [Option<Range<usize>>; Region::Count as usize],
}

impl Mem {
    /// Constructs a new mem with the standard memory map, and the font loaded
    /// # Examples
    /// ```rust
    ///# use cricket::prelude::*;
    /// let mem = Mem::new();
    /// assert_eq!(mem::MEMORY_SIZE, mem.len());
    /// assert_eq!(Some(&mem::FONT[..]), mem.get_region(Charset));
    /// ```
    pub fn new() -> Self {
        let font = FONT_BASE as usize;
        let program = PROGRAM_START as usize;
        let mut mem = Mem {
            memory: vec![0; MEMORY_SIZE],
            region: [Some(font..font + FONT.len()), Some(program..MEMORY_SIZE)],
        };
        mem.reset();
        mem
    }

    /// Gets the length of the backing memory
    pub fn len(&self) -> usize {
        self.memory.len()
    }

    /// Returns true if the backing memory contains no elements
    pub fn is_empty(&self) -> bool {
        self.memory.is_empty()
    }

    /// Zeroes all of memory, then reloads the font
    pub fn reset(&mut self) -> &mut Self {
        self.memory.fill(0);
        if let Some(charset) = self.get_region_mut(Region::Charset) {
            charset.copy_from_slice(&FONT);
        }
        self
    }

    /// Gets a slice of memory
    #[inline(always)]
    pub fn get<I>(&self, index: I) -> Option<&<I as SliceIndex<[u8]>>::Output>
    where
        I: SliceIndex<[u8]>,
    {
        self.memory.get(index)
    }

    /// Gets a mutable slice of memory
    #[inline(always)]
    pub fn get_mut<I>(&mut self, index: I) -> Option<&mut <I as SliceIndex<[u8]>>::Output>
    where
        I: SliceIndex<[u8]>,
    {
        self.memory.get_mut(index)
    }

    /// Reads a big-endian word at `addr`, if both bytes are in memory
    /// # Examples
    /// ```rust
    ///# use cricket::prelude::*;
    /// let mem = Mem::new();
    /// assert_eq!(Some(0xf090), mem.read_word(mem::FONT_BASE));
    /// assert_eq!(None, mem.read_word(0xfff));
    /// ```
    pub fn read_word(&self, addr: u16) -> Option<u16> {
        let addr = addr as usize;
        let bytes: [u8; 2] = self.get(addr..addr + 2)?.try_into().ok()?;
        Some(u16::from_be_bytes(bytes))
    }

    /// Writes a byte at `addr`. Writes outside of memory are dropped.
    pub fn write(&mut self, addr: usize, data: u8) {
        if let Some(byte) = self.memory.get_mut(addr) {
            *byte = data;
        }
    }

    /// Finds the first address at which `needle` appears in memory
    /// # Examples
    /// ```rust
    ///# use cricket::prelude::*;
    /// let mem = Mem::new();
    /// assert_eq!(Some(mem::FONT_BASE as usize), mem.find(&mem::FONT[0..5]));
    /// ```
    pub fn find(&self, needle: &[u8]) -> Option<usize> {
        if needle.is_empty() {
            return None;
        }
        self.memory
            .windows(needle.len())
            .position(|window| window == needle)
    }

    /// Loads data into a named [Region].
    ///
    /// If the data doesn't fit, returns [Error::ProgramTooLarge] and leaves memory untouched.
    /// # Examples
    /// ```rust
    ///# use cricket::prelude::*;
    ///# fn main() -> Result<()> {
    ///     let mut mem = Mem::new();
    ///     mem.load_region(Program, b"Hello, world!")?;
    ///     assert_eq!(Some(&b"Hello"[..]), mem.get(0x200..0x205));
    ///#    Ok(())
    ///# }
    /// ```
    pub fn load_region(&mut self, name: Region, data: &[u8]) -> Result<&mut Self> {
        let limit = self.region_len(name);
        let region = match self.get_region_mut(name) {
            Some(region) if data.len() <= limit => region,
            _ => {
                return Err(Error::ProgramTooLarge {
                    size: data.len(),
                    limit,
                })
            }
        };
        region[..data.len()].copy_from_slice(data);
        Ok(self)
    }

    /// Gets the length of a named [Region], or 0 if it doesn't exist
    pub fn region_len(&self, name: Region) -> usize {
        self.get_region(name).map_or(0, <[u8]>::len)
    }

    /// Gets a slice of a named [Region] of memory
    #[inline(always)]
    pub fn get_region(&self, name: Region) -> Option<&[u8]> {
        self.get(self.region.get(name as usize)?.clone()?)
    }

    /// Gets a mutable slice of a named region of memory
    #[inline(always)]
    pub fn get_region_mut(&mut self, name: Region) -> Option<&mut [u8]> {
        self.get_mut(self.region.get(name as usize)?.clone()?)
    }
}

impl Default for Mem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "rhexdump")]
impl Display for Mem {
    /// Hex-dumps every named region
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use rhexdump::Rhexdump;
        let mut rhx = Rhexdump::default();
        rhx.set_bytes_per_group(2).map_err(|_| std::fmt::Error)?;
        rhx.display_duplicate_lines(false);
        for (name, range) in [Region::Charset, Region::Program]
            .into_iter()
            .zip(self.region.iter())
        {
            let Some(range) = range else { continue };
            writeln!(
                f,
                "[{name}] {:03x}..{:03x}\n{}",
                range.start,
                range.end,
                rhx.hexdump(&self.memory[range.clone()])
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_is_loaded() {
        let mem = Mem::new();
        assert_eq!(mem.get(0x50..0xa0), Some(&FONT[..]));
    }

    #[test]
    fn reset_reloads_font() {
        let mut mem = Mem::new();
        mem.get_mut(..).unwrap().fill(0xaa);
        mem.reset();
        assert_eq!(mem.get_region(Region::Charset), Some(&FONT[..]));
        assert!(mem.get_region(Region::Program).unwrap().iter().all(|&b| b == 0));
    }

    #[test]
    fn load_fits_exactly() {
        let mut mem = Mem::new();
        let rom = vec![0x5a; MEMORY_SIZE - PROGRAM_START as usize];
        mem.load_region(Region::Program, &rom).unwrap();
        assert_eq!(mem.get_region(Region::Program), Some(rom.as_slice()));
    }

    #[test]
    fn load_too_large_changes_nothing() {
        let mut mem = Mem::new();
        mem.write(0x200, 0x12);
        let rom = vec![0xff; MEMORY_SIZE - PROGRAM_START as usize + 1];
        let before = mem.clone();
        let err = mem.load_region(Region::Program, &rom).unwrap_err();
        assert!(matches!(err, Error::ProgramTooLarge { size: 0xe01, limit: 0xe00 }));
        assert_eq!(before, mem);
    }

    #[test]
    fn read_word_at_end_of_memory() {
        let mut mem = Mem::new();
        mem.write(0xffe, 0xab);
        mem.write(0xfff, 0xcd);
        assert_eq!(Some(0xabcd), mem.read_word(0xffe));
        assert_eq!(None, mem.read_word(0xfff));
    }

    #[test]
    fn write_out_of_range_is_dropped() {
        let mut mem = Mem::new();
        let before = mem.clone();
        mem.write(0x1000, 0xff);
        assert_eq!(before, mem);
    }

    #[test]
    #[cfg(feature = "rhexdump")]
    fn display() {
        let dump = Mem::new().to_string();
        assert!(dump.starts_with("[Charset] 050..0a0\n"));
        assert!(dump.contains("[Program] 200..1000\n"));
        assert!(dump.to_lowercase().contains("f090"));
    }
}
