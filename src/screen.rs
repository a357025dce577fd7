// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Stores and displays the Chip-8's screen memory

use std::fmt::{Display, Formatter, Result};

/// Width of the screen, in pixels
pub const WIDTH: usize = 64;
/// Height of the screen, in pixels
pub const HEIGHT: usize = 32;

/// Something which can show a [Screen] to the user
pub trait Render {
    /// The error type of the host surface
    type Error;
    /// Presents the current contents of the screen
    fn render(&mut self, screen: &Screen) -> std::result::Result<(), Self::Error>;
}

/// A monochrome pixel grid, mutated by `00e0` and `Dxyn`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Screen {
    pixels: Vec<bool>,
    width: usize,
    height: usize,
    changed: bool,
}

impl Screen {
    /// Constructs a blank screen of the given size
    pub fn new(width: usize, height: usize) -> Screen {
        Screen {
            pixels: vec![false; width * height],
            width,
            height,
            changed: false,
        }
    }

    /// Width of the screen, in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the screen, in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Gets the pixel at (x, y). Pixels off the screen are never lit.
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.pixels[y * self.width + x]
    }

    /// Gets the whole screen as a row-major slice
    pub fn pixels(&self) -> &[bool] {
        &self.pixels
    }

    /// Iterates over the rows of the screen
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.pixels.chunks_exact(self.width)
    }

    /// Turns every pixel off
    pub fn clear(&mut self) {
        self.pixels.fill(false);
        self.changed = true;
    }

    /// XORs an 8-pixel-wide sprite onto the screen at (x, y).
    ///
    /// The origin always wraps onto the screen. Pixels which run past the edge
    /// wrap around when `wrap` is set, and are clipped otherwise.
    ///
    /// Returns true if any lit pixel was turned off.
    /// # Examples
    /// ```rust
    /// # use cricket::Screen;
    /// let mut screen = Screen::default();
    /// assert!(!screen.draw(0, 0, &[0xff], true));
    /// assert!(screen.draw(0, 0, &[0x80], true));
    /// assert!(!screen.pixel(0, 0) && screen.pixel(1, 0));
    /// ```
    pub fn draw(&mut self, x: u8, y: u8, sprite: &[u8], wrap: bool) -> bool {
        let (x, y) = (x as usize % self.width, y as usize % self.height);
        let mut collision = false;
        for (row, &byte) in sprite.iter().enumerate() {
            for bit in 0..8 {
                if byte & (0x80 >> bit) == 0 {
                    continue;
                }
                let (px, py) = (x + bit, y + row);
                let (px, py) = if wrap {
                    (px % self.width, py % self.height)
                } else if px < self.width && py < self.height {
                    (px, py)
                } else {
                    continue;
                };
                let pixel = &mut self.pixels[py * self.width + px];
                collision |= *pixel;
                *pixel ^= true;
            }
        }
        self.changed = true;
        collision
    }

    /// Returns true if the screen has changed since the last [Screen::take_changed]
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Reads and clears the changed flag
    pub fn take_changed(&mut self) -> bool {
        std::mem::take(&mut self.changed)
    }

    /// Renders the screen through `ui`, if it changed since it was last rendered.
    ///
    /// Returns whether anything was rendered.
    pub fn present<R: Render>(&mut self, ui: &mut R) -> std::result::Result<bool, R::Error> {
        if !self.take_changed() {
            return Ok(false);
        }
        ui.render(self)?;
        Ok(true)
    }

    /// Blanks the screen and forgets any pending change
    pub fn reset(&mut self) {
        self.pixels.fill(false);
        self.changed = false;
    }
}

impl Default for Screen {
    fn default() -> Self {
        Screen::new(WIDTH, HEIGHT)
    }
}

impl Display for Screen {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        for row in self.rows() {
            for &pixel in row {
                write!(f, "{}", if pixel { '*' } else { '.' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter(usize);
    impl Render for Counter {
        type Error = ();
        fn render(&mut self, _: &Screen) -> std::result::Result<(), ()> {
            self.0 += 1;
            Ok(())
        }
    }

    #[test]
    fn draw_twice_restores_screen() {
        let mut screen = Screen::default();
        screen.draw(3, 4, &[0x81, 0x42], false);
        let before = screen.clone();
        let sprite = [0xf0, 0x3c, 0xff];
        assert!(!screen.draw(10, 7, &sprite, false));
        assert!(screen.draw(10, 7, &sprite, false));
        assert_eq!(before.pixels(), screen.pixels());
    }

    #[test]
    fn clip_at_right_edge() {
        let mut screen = Screen::default();
        screen.draw(60, 0, &[0xff], false);
        let lit: Vec<usize> = (0..WIDTH).filter(|&x| screen.pixel(x, 0)).collect();
        assert_eq!(lit, [60, 61, 62, 63]);
    }

    #[test]
    fn wrap_at_right_edge() {
        let mut screen = Screen::default();
        screen.draw(60, 0, &[0xff], true);
        let lit: Vec<usize> = (0..WIDTH).filter(|&x| screen.pixel(x, 0)).collect();
        assert_eq!(lit, [0, 1, 2, 3, 60, 61, 62, 63]);
    }

    #[test]
    fn clip_at_bottom_edge() {
        let mut screen = Screen::default();
        screen.draw(0, 31, &[0x80, 0x80], false);
        assert!(screen.pixel(0, 31));
        assert!(!screen.pixel(0, 0));
    }

    #[test]
    fn origin_wraps() {
        let mut screen = Screen::default();
        screen.draw(64 + 2, 32 + 1, &[0x80], false);
        assert!(screen.pixel(2, 1));
    }

    #[test]
    fn present_only_when_changed() {
        let mut screen = Screen::default();
        let mut ui = Counter::default();
        assert_eq!(Ok(false), screen.present(&mut ui));
        screen.clear();
        assert_eq!(Ok(true), screen.present(&mut ui));
        assert_eq!(Ok(false), screen.present(&mut ui));
        assert_eq!(1, ui.0);
    }

    #[test]
    fn display() {
        let mut screen = Screen::new(4, 2);
        screen.draw(1, 1, &[0xc0], false);
        assert_eq!(screen.to_string(), "....\n.**.\n");
    }
}
