// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)
#![allow(missing_docs)]
//! Platform-specific IO/UI code, and some debug functionality.

use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use crate::error::Result;
use cricket::{Render, Screen, CPU};
use minifb::*;
use owo_colors::OwoColorize;

#[derive(Clone, Debug)]
pub struct UIBuilder {
    pub width: usize,
    pub height: usize,
    pub name: Option<&'static str>,
    pub rom: Option<PathBuf>,
    pub keymap: KeyMap,
    pub window_options: WindowOptions,
}

impl UIBuilder {
    pub fn new(width: usize, height: usize, rom: impl AsRef<Path>) -> Self {
        UIBuilder {
            width,
            height,
            rom: Some(rom.as_ref().to_owned()),
            ..Default::default()
        }
    }
    pub fn build(&self) -> Result<UI> {
        let ui = UI {
            window: Window::new(
                self.name.unwrap_or_default(),
                self.width,
                self.height,
                self.window_options,
            )?,
            keyboard: Default::default(),
            repeater: Default::default(),
            keymap: self.keymap.clone(),
            fb: FrameBuffer::new(self.width, self.height),
            rom: self.rom.to_owned().unwrap_or_default(),
        };
        Ok(ui)
    }
}

impl Default for UIBuilder {
    fn default() -> Self {
        UIBuilder {
            width: 64,
            height: 32,
            name: Some("Cricket"),
            rom: None,
            keymap: KeyMap::default(),
            window_options: WindowOptions {
                title: true,
                resize: false,
                scale: Scale::X16,
                scale_mode: ScaleMode::AspectRatioStretch,
                none: true,
                ..Default::default()
            },
        }
    }
}

/// Maps host keys onto the hex keypad
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyMap(pub Vec<(Key, usize)>);

impl KeyMap {
    /// Gets the hex key bound to `key`, if any
    pub fn get(&self, key: Key) -> Option<usize> {
        self.0
            .iter()
            .find_map(|&(host, hex)| (host == key).then_some(hex))
    }
}

impl Default for KeyMap {
    /// The left hand side of a QWERTY keyboard, laid out like the COSMAC VIP's keypad
    ///
    /// ```text
    /// 1 2 3 4      1 2 3 C
    /// Q W E R  ->  4 5 6 D
    /// A S D F      7 8 9 E
    /// Z X C V      A 0 B F
    /// ```
    #[rustfmt::skip]
    fn default() -> Self {
        use Key::*;
        KeyMap(vec![
            (Key1, 0x1), (Key2, 0x2), (Key3, 0x3), (Key4, 0xc),
            (Q, 0x4), (W, 0x5), (E, 0x6), (R, 0xd),
            (A, 0x7), (S, 0x8), (D, 0x9), (F, 0xe),
            (Z, 0xa), (X, 0x0), (C, 0xb), (V, 0xf),
        ])
    }
}

/// Turns held keys into a stream of presses, like the host's key repeat
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Repeater {
    /// How long a key is held before it starts repeating
    pub delay: Duration,
    /// Time between repeats
    pub interval: Duration,
    held: Vec<(Key, Instant)>,
}

impl Repeater {
    pub fn new(delay: Duration, interval: Duration) -> Self {
        Repeater {
            delay,
            interval,
            held: vec![],
        }
    }
    /// Gets every key in `keys` which was just pressed, or is due to repeat at `now`.
    ///
    /// Keys missing from `keys` are forgotten.
    pub fn poll(&mut self, keys: &[Key], now: Instant) -> Vec<Key> {
        self.held.retain(|(key, _)| keys.contains(key));
        let mut fired = vec![];
        for &key in keys {
            match self.held.iter_mut().find(|(held, _)| *held == key) {
                Some((_, next)) => {
                    if now >= *next {
                        *next = now + self.interval;
                        fired.push(key);
                    }
                }
                None => {
                    self.held.push((key, now + self.delay));
                    fired.push(key);
                }
            }
        }
        fired
    }
}

impl Default for Repeater {
    fn default() -> Self {
        Self::new(Duration::from_millis(500), Duration::from_millis(33))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameBufferFormat {
    pub fg: u32,
    pub bg: u32,
}

impl Default for FrameBufferFormat {
    fn default() -> Self {
        FrameBufferFormat {
            fg: 0x00ffffff,
            bg: 0x00000000,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameBuffer {
    buffer: Vec<u32>,
    width: usize,
    height: usize,
    format: FrameBufferFormat,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        FrameBuffer {
            buffer: vec![0; width * height],
            width,
            height,
            format: Default::default(),
        }
    }
    /// Copies the screen into the buffer, clipped to the smaller of the two
    pub fn copy_screen(&mut self, screen: &Screen) {
        let format = &self.format;
        for (dst, src) in self
            .buffer
            .chunks_exact_mut(self.width)
            .zip(screen.rows())
        {
            for (px, &lit) in dst.iter_mut().zip(src) {
                *px = if lit { format.fg } else { format.bg };
            }
        }
    }
    pub fn buffer(&self) -> &[u32] {
        &self.buffer
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new(64, 32)
    }
}

#[derive(Debug)]
pub struct UI {
    window: Window,
    keyboard: Vec<Key>,
    repeater: Repeater,
    keymap: KeyMap,
    fb: FrameBuffer,
    rom: PathBuf,
}

impl UI {
    /// Shows the screen, if it changed. Returns false once the window has closed.
    pub fn frame(&mut self, cpu: &mut CPU) -> Result<bool> {
        if !self.window.is_open() {
            return Ok(false);
        }
        if !cpu.present(self)? {
            // still pump the event loop
            self.window.update();
        }
        Ok(true)
    }

    /// Sets the window title from the CPU's state
    pub fn title(&mut self, cpu: &CPU) {
        let name = self
            .rom
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();
        let state = if cpu.flags.pause { " ⏸" } else { "" };
        self.window.set_title(&format!(
            "Cricket: {name}, {} instructions per second{state}",
            cpu.rate()
        ));
    }

    /// Forwards keyboard input to the CPU. Returns false when the user asks to quit.
    ///
    /// Held keypad and rate keys repeat.
    pub fn keys(&mut self, cpu: &mut CPU) -> Result<bool> {
        let now = Instant::now();
        // minifb's get_keys_released misses keys released between updates
        let keys = self.window.get_keys();
        for key in self.keyboard.iter().filter(|key| !keys.contains(key)) {
            if let Some(key) = self.keymap.get(*key) {
                cpu.release(key)?;
            }
        }
        let pressed: Vec<Key> = keys
            .iter()
            .filter(|key| !self.keyboard.contains(key))
            .copied()
            .collect();
        self.keyboard = keys;
        // handle keybinds for the UI
        for key in pressed {
            use Key::*;
            match key {
                Escape => return Ok(false),
                F1 => cpu.dump(),
                F2 => print!("{}", cpu.screen()),
                F3 => print!("{}", cpu.mem()),
                F4 => {
                    cpu.flags.debug();
                    eprintln!(
                        "Debug {}.",
                        if cpu.flags.debug { "enabled" } else { "disabled" }
                    );
                }
                F5 => {
                    cpu.flags.pause();
                    self.title(cpu);
                }
                F6 => {
                    if let Err(e) = cpu.step() {
                        eprintln!("{}", e.bold().red());
                    }
                }
                F9 => {
                    eprintln!("Reset at {:03x}", cpu.pc());
                    if let Err(e) = reload(cpu, &self.rom) {
                        eprintln!("{}", e.bold().red());
                    }
                }
                NumPadMinus | NumPadPlus => (),
                key if self.keymap.get(key).is_none() => {
                    log::info!("{key:?} is not on the keypad")
                }
                _ => (),
            }
        }
        // pressed and repeating keys
        for key in self.repeater.poll(&self.keyboard, now) {
            match key {
                Key::NumPadMinus => {
                    cpu.decrease_rate();
                    self.title(cpu);
                }
                Key::NumPadPlus => {
                    cpu.increase_rate();
                    self.title(cpu);
                }
                key => {
                    if let Some(key) = self.keymap.get(key) {
                        cpu.press(key)?;
                    }
                }
            }
        }
        Ok(true)
    }
}

/// Reloads the ROM at `rom` from disk, keeping the current rate.
///
/// If the ROM can't be loaded, the CPU is left as it was.
pub fn reload(cpu: &mut CPU, rom: &Path) -> Result<()> {
    let rate = cpu.rate();
    cpu.load_program(rom)?;
    cpu.set_rate(rate);
    Ok(())
}

impl Render for UI {
    type Error = minifb::Error;

    fn render(&mut self, screen: &Screen) -> std::result::Result<(), Self::Error> {
        self.fb.copy_screen(screen);
        self.window
            .update_with_buffer(self.fb.buffer(), self.fb.width, self.fb.height)
    }
}
