// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Decodes and runs instructions


pub mod behavior;
pub mod clock;
pub mod flags;
pub mod instruction;
pub mod keypad;
pub mod mem;
pub mod mode;
pub mod quirks;
pub mod timers;

use self::{
    clock::Clock,
    flags::Flags,
    instruction::{
        disassembler::{Dis, Disassembler},
        Insn, INSN_LEN,
    },
    keypad::{Keypad, Latch},
    mem::{Mem, Region, FONT_BASE, MEMORY_SIZE, PROGRAM_START},
    quirks::Quirks,
    timers::{Sound, Timers},
};
use crate::{
    beeper::Beeper,
    error::{Error, Result},
    screen::{Render, Screen},
};
use owo_colors::OwoColorize;
use std::{fmt::Debug, time::Instant};

/// Deepest the call stack may grow
pub const STACK_DEPTH: usize = 16;

type Reg = usize;
type Adr = u16;
type Nib = u8;

/// Represents the internal state of the CPU interpreter
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CPU {
    /// Flags that control how the CPU behaves, but which aren't inherent to the
    /// chip-8. Includes [Quirks], debug and pause.
    pub flags: Flags,
    // memory map info
    mem: Mem,
    screen: Screen,
    font: Adr,
    // memory
    stack: Vec<Adr>,
    // registers
    pc: Adr,
    i: Adr,
    v: [u8; 16],
    timers: Timers,
    // I/O
    keypad: Keypad,
    // Execution data
    cycle: usize,
    #[cfg_attr(feature = "serde", serde(skip))]
    clock: Clock,
    #[cfg_attr(feature = "serde", serde(skip))]
    beeper: Beeper,
    #[cfg_attr(feature = "serde", serde(skip))]
    disassembler: Dis,
}

// public interface
impl CPU {
    /// Constructs a new CPU with the ROM at `rom` loaded, which beeps through `beeper`
    pub fn new(rom: impl AsRef<std::path::Path>, beeper: Beeper, flags: Flags) -> Result<Self> {
        let mut cpu = Self::with_beeper(beeper, flags);
        // load the provided rom
        cpu.load_program(rom)?;
        Ok(cpu)
    }

    /// Constructs a new CPU with no program loaded, which beeps through `beeper`
    pub fn with_beeper(beeper: Beeper, flags: Flags) -> Self {
        CPU {
            beeper,
            flags,
            ..Default::default()
        }
    }

    /// Loads a program into the CPU's program space, resetting the CPU first
    pub fn load_program(&mut self, rom: impl AsRef<std::path::Path>) -> Result<&mut Self> {
        let rom = rom.as_ref();
        let bytes = std::fs::read(rom)?;
        self.load_program_bytes(&bytes)?;
        log::info!("loaded {} ({} bytes)", rom.display(), bytes.len());
        Ok(self)
    }

    /// Resets the CPU, then loads bytes into the CPU's program space.
    ///
    /// If the program is too large to fit, returns [Error::ProgramTooLarge]
    /// and leaves the CPU as it was.
    /// # Examples
    /// ```rust
    /// # use cricket::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[0x00, 0xe0]).unwrap();
    /// assert!(cpu.load_program_bytes(&[0; 0xe01]).is_err());
    /// ```
    pub fn load_program_bytes(&mut self, rom: &[u8]) -> Result<&mut Self> {
        let limit = self.mem.region_len(Region::Program);
        if rom.len() > limit {
            return Err(Error::ProgramTooLarge {
                size: rom.len(),
                limit,
            });
        }
        self.reset();
        self.mem.load_region(Region::Program, rom)?;
        Ok(self)
    }

    /// Records a key going up or down.
    ///
    /// If the CPU was waiting on `Fx0A` and the key went down,
    /// the key is stored and execution resumes on the next cycle.
    /// If key does not exist, returns [Error::InvalidKey].
    ///
    /// # Examples
    /// ```rust
    /// # use cricket::*;
    /// let mut cpu = CPU::default();
    /// cpu.set_key_state(0x7, true).unwrap();
    /// assert!(cpu.keys()[7]);
    /// cpu.set_key_state(0x7, false).unwrap();
    /// assert!(!cpu.keys()[7]);
    /// assert!(cpu.set_key_state(0x10, true).is_err());
    /// ```
    pub fn set_key_state(&mut self, key: usize, pressed: bool) -> Result<()> {
        if let Some((reg, key)) = self.keypad.set(key, pressed)? {
            log::info!("received key {key:X}");
            self.v[reg] = key;
        }
        Ok(())
    }

    /// Presses a key. See [CPU::set_key_state]
    pub fn press(&mut self, key: usize) -> Result<()> {
        self.set_key_state(key, true)
    }

    /// Releases a key. See [CPU::set_key_state]
    pub fn release(&mut self, key: usize) -> Result<()> {
        self.set_key_state(key, false)
    }

    /// Gets the held state of every key
    pub fn keys(&self) -> &[bool; 16] {
        self.keypad.keys()
    }

    /// Returns true while the CPU is blocked on `Fx0A`
    pub fn is_waiting(&self) -> bool {
        self.keypad.is_waiting()
    }

    /// Sets a general purpose register in the CPU.
    /// If the register doesn't exist, returns [Error::InvalidRegister]
    /// # Examples
    /// ```rust
    /// # use cricket::*;
    /// // Create a new CPU, and set v4 to 0x41
    /// let mut cpu = CPU::default();
    /// cpu.set_v(0x4, 0x41).unwrap();
    /// assert_eq!(0x41, cpu.v()[4]);
    /// assert!(cpu.set_v(0x10, 0).is_err());
    /// ```
    pub fn set_v(&mut self, reg: Reg, value: u8) -> Result<()> {
        if let Some(gpr) = self.v.get_mut(reg) {
            *gpr = value;
            Ok(())
        } else {
            Err(Error::InvalidRegister { reg })
        }
    }

    /// Gets a slice of the entire general purpose registers
    pub fn v(&self) -> &[u8] {
        self.v.as_slice()
    }

    /// Gets the program counter
    /// # Examples
    /// ```rust
    /// # use cricket::*;
    /// let mut cpu = CPU::default();
    /// assert_eq!(0x200, cpu.pc());
    /// ```
    pub fn pc(&self) -> Adr {
        self.pc
    }

    /// Gets the I register
    pub fn i(&self) -> Adr {
        self.i
    }

    /// Gets the value in the Sound Timer register
    pub fn sound(&self) -> u8 {
        self.timers.sound
    }

    /// Gets the value in the Delay Timer register
    pub fn delay(&self) -> u8 {
        self.timers.delay
    }

    /// Gets the call stack, oldest return address first
    pub fn stack(&self) -> &[Adr] {
        &self.stack
    }

    /// Gets the number of instructions the CPU has executed
    pub fn cycles(&self) -> usize {
        self.cycle
    }

    /// Gets the CPU's memory
    pub fn mem(&self) -> &Mem {
        &self.mem
    }

    /// Gets the screen
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Gets the [Beeper] sound-timer ticks are sent to
    pub fn beeper(&self) -> &Beeper {
        &self.beeper
    }

    /// Gets the instruction rate, in instructions per second
    pub fn rate(&self) -> u32 {
        self.clock.rate()
    }

    /// Sets the instruction rate. 0 stops instructions, but not timers.
    pub fn set_rate(&mut self, rate: u32) -> u32 {
        let rate = self.clock.set_rate(rate);
        log::info!("{rate} instructions per second");
        rate
    }

    /// Speeds up by [clock::RATE_STEP] instructions per second
    pub fn increase_rate(&mut self) -> u32 {
        let rate = self.clock.increase_rate();
        log::info!("{rate} instructions per second");
        rate
    }

    /// Slows down by [clock::RATE_STEP] instructions per second
    pub fn decrease_rate(&mut self) -> u32 {
        let rate = self.clock.decrease_rate();
        log::info!("{rate} instructions per second");
        rate
    }

    /// Renders the screen through `ui`, if it changed since it was last rendered.
    /// Returns whether anything was rendered.
    pub fn present<R: Render>(&mut self, ui: &mut R) -> std::result::Result<bool, R::Error> {
        self.screen.present(ui)
    }

    /// Reads and clears the screen's changed flag
    pub fn take_screen_changed(&mut self) -> bool {
        self.screen.take_changed()
    }

    /// Resets the emulator.
    ///
    /// Clears memory (reloading the font), the screen, stack, registers, timers,
    /// keys, latch and cycle count, and restores the default instruction rate.
    ///
    /// Does not touch [Quirks], debug, pause, or the [Beeper].
    pub fn reset(&mut self) {
        self.flags.halted = false;
        self.mem.reset();
        self.screen.reset();
        // clear the stack
        self.stack.truncate(0);
        // Reset the program counter
        self.pc = PROGRAM_START;
        // Zero the registers
        self.i = 0;
        self.v = [0; 16];
        self.timers = Timers::default();
        // I/O
        self.keypad.reset();
        // Execution data
        self.cycle = 0;
        self.clock.reset();
        self.beeper.flush();
    }

    /// Runs one host-loop iteration, at the current time.
    ///
    /// See [CPU::cycle_at]
    pub fn cycle(&mut self) -> Result<&mut Self> {
        self.cycle_at(Instant::now())
    }

    /// Runs one host-loop iteration, as if the time were `now`.
    ///
    /// Executes one instruction if one is due and the CPU isn't waiting for a key,
    /// then ticks the timers if a tick is due.
    ///
    /// Returns [Error::ProgramCounterOutOfRange], [Error::StackUnderflow] or
    /// [Error::StackOverflow] if the program crashed. The CPU then halts until it's reset.
    /// # Examples
    /// ```rust
    /// # use cricket::*;
    /// # use std::time::{Duration, Instant};
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[0x60, 0x05, 0x61, 0x05, 0x80, 0x14]).unwrap();
    /// let start = Instant::now();
    /// for ms in [0, 2, 4] {
    ///     cpu.cycle_at(start + Duration::from_millis(ms)).unwrap();
    /// }
    /// assert_eq!(10, cpu.v()[0]);
    /// ```
    pub fn cycle_at(&mut self, now: Instant) -> Result<&mut Self> {
        // Do nothing if paused
        if self.flags.is_stopped() {
            return Ok(self);
        }
        if !self.keypad.is_waiting() && self.clock.insn_due(now) {
            self.step()?;
        }
        if self.clock.timer_due(now) {
            self.tick_timers();
        }
        Ok(self)
    }

    /// Executes a single instruction, ignoring the clock.
    ///
    /// Does nothing while waiting for a key, or after the CPU halts.
    /// Unknown instructions are reported, and skipped.
    /// # Examples
    /// ```rust
    /// # use cricket::*;
    /// let mut cpu = CPU::default();
    /// cpu.load_program_bytes(&[
    ///     0x00, 0xe0, // cls
    ///     0x12, 0x02, // jump 0x202 (pc)
    /// ]).unwrap();
    /// cpu.step().expect("0x00e0 (cls) should be a valid opcode.");
    /// assert_eq!(0x202, cpu.pc());
    /// assert_eq!(1, cpu.cycles());
    /// ```
    pub fn step(&mut self) -> Result<&mut Self> {
        if self.flags.halted || self.keypad.is_waiting() {
            return Ok(self);
        }
        // fetch opcode
        let opcode = match self.mem.read_word(self.pc) {
            Some(opcode) if (self.pc as usize) < MEMORY_SIZE - 1 => opcode,
            _ => {
                self.flags.halted = true;
                return Err(Error::ProgramCounterOutOfRange { pc: self.pc });
            }
        };
        self.cycle += 1;

        // Print opcode disassembly:
        if self.flags.debug {
            std::println!(
                "{:3} {:03x}: {:<36}",
                self.cycle.bright_black(),
                self.pc,
                self.disassembler.once(opcode)
            );
        }

        self.pc = self.pc.wrapping_add(INSN_LEN);
        // decode opcode
        match Insn::from_word(opcode) {
            Some(insn) => {
                log::trace!("{:03x}: {insn}", self.pc.wrapping_sub(INSN_LEN));
                if let Err(e) = self.execute(insn) {
                    self.flags.halted = true;
                    return Err(e);
                }
            }
            None => {
                log::warn!("{}", Error::UnknownOpcode { word: opcode });
            }
        }
        Ok(self)
    }

    /// Ticks the delay and sound timers once, ignoring the clock
    pub fn tick_timers(&mut self) {
        match self.timers.tick() {
            Sound::Silent => (),
            Sound::Sustain => self.beeper.accumulate(),
            Sound::Release => {
                // play the whole run as one continuous tone
                self.beeper.accumulate();
                self.beeper.flush();
            }
        }
    }

    /// Dumps the current state of all CPU registers, and the cycle count
    /// # Examples
    /// ```rust
    /// # use cricket::*;
    /// let mut cpu = CPU::default();
    /// cpu.dump();
    /// ```
    /// outputs
    /// ```text
    /// PC: 0200, SP: 0000, I: 0000
    /// v0: 00 v1: 00 v2: 00 v3: 00
    /// v4: 00 v5: 00 v6: 00 v7: 00
    /// v8: 00 v9: 00 vA: 00 vB: 00
    /// vC: 00 vD: 00 vE: 00 vF: 00
    /// DLY: 0, SND: 0, CYC:      0
    /// ```
    pub fn dump(&self) {
        let latch = match self.keypad.latch() {
            Latch::Waiting { reg } => format!(", waiting for key into v{reg:X}"),
            Latch::Idle => String::new(),
        };
        std::println!(
            "PC: {:04x}, SP: {:04x}, I: {:04x}\n{}DLY: {}, SND: {}, CYC: {:6}{latch}",
            self.pc,
            self.stack.len(),
            self.i,
            self.v
                .into_iter()
                .enumerate()
                .map(|(i, gpr)| {
                    format!(
                        "v{i:X}: {gpr:02x} {}",
                        match i % 4 {
                            3 => "\n",
                            _ => "",
                        }
                    )
                })
                .collect::<String>(),
            self.timers.delay,
            self.timers.sound,
            self.cycle,
        );
    }
}

impl Debug for CPU {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CPU")
            .field("flags", &self.flags)
            .field("font", &self.font)
            .field("stack", &self.stack)
            .field("pc", &self.pc)
            .field("i", &self.i)
            .field("v", &self.v)
            .field("timers", &self.timers)
            .field("keypad", &self.keypad)
            .field("cycle", &self.cycle)
            .field("clock", &self.clock)
            .field("beeper", &self.beeper)
            .finish_non_exhaustive()
    }
}

impl Default for CPU {
    /// Constructs a new CPU with sane defaults and no sound
    ///
    /// | value  | default | description
    /// |--------|---------|------------
    /// | font   |`0x0050` | Location of font memory.
    /// | pc     |`0x0200` | Start location.
    /// | rate   |  `500`  | Instructions per second.
    ///
    /// # Examples
    /// ```rust
    /// use cricket::*;
    /// let mut cpu = CPU::default();
    /// ```
    fn default() -> Self {
        CPU {
            flags: Flags::default(),
            mem: Mem::new(),
            screen: Screen::default(),
            font: FONT_BASE,
            stack: vec![],
            pc: PROGRAM_START,
            i: 0,
            v: [0; 16],
            timers: Timers::default(),
            keypad: Keypad::default(),
            cycle: 0,
            clock: Clock::default(),
            beeper: Beeper::default(),
            disassembler: Dis::default(),
        }
    }
}
