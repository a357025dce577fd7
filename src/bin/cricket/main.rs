// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Cricket: A chip-8 interpreter in Rust
//! Hello, world!

#[cfg(test)]
mod tests;

mod error;
mod games;
mod ui;

use cricket::{beeper, screen, Beeper, Flags, Mode, Mute, CPU};
use error::Result;
use games::Games;
use gumdrop::*;
use owo_colors::OwoColorize;
use std::{
    io::{stdin, stdout},
    path::PathBuf,
    time::{Duration, Instant},
};
use ui::*;

/// Time between screen updates
const FRAME: Duration = Duration::from_nanos(1_000_000_000 / 60);
/// Time the host loop sleeps between cycles
const IDLE: Duration = Duration::from_micros(100);

pub fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let options = Arguments::parse_args_default_or_exit();
    let games = Games::new(&options.games)?;

    if options.list {
        print!("{games}");
        return Ok(());
    }

    let mut cpu = CPU::with_beeper(
        beeper(&options)?,
        Flags {
            quirks: options.mode.unwrap_or_default().into(),
            debug: options.debug,
            pause: options.pause,
            ..Default::default()
        },
    );

    let mut rom = match (&options.file, options.index) {
        (Some(file), _) => Some(file.clone()),
        (None, Some(index)) => Some(games.get(index)?.to_owned()),
        (None, None) => games.choose(stdin().lock(), stdout())?,
    };
    while let Some(path) = rom {
        match cpu.load_program(&path) {
            Ok(_) => {
                if let Some(rate) = options.rate {
                    cpu.set_rate(rate);
                }
                let ui = UIBuilder::new(screen::WIDTH, screen::HEIGHT, &path).build()?;
                let mut state = State::new(&mut cpu, ui);
                state.run()?;
            }
            Err(e) => eprintln!("{}", e.bold().red()),
        }
        cpu.reset();
        rom = games.choose(stdin().lock(), stdout())?;
    }
    Ok(())
}

/// Builds the [Beeper] described by the command line
fn beeper(options: &Arguments) -> Result<Beeper> {
    let frequency = options.frequency.unwrap_or(beeper::FREQUENCY);
    let duration = options
        .duration
        .map_or(beeper::DURATION, Duration::from_millis);
    #[cfg(feature = "beep")]
    {
        if !options.mute {
            return Ok(Beeper::new(beeper::Speaker, frequency, duration)?);
        }
    }
    Ok(Beeper::new(Mute, frequency, duration)?)
}

#[derive(Clone, Debug, PartialEq, Eq, Options)]
struct Arguments {
    #[options(help = "Load a ROM to run on Cricket.", free)]
    pub file: Option<PathBuf>,
    #[options(help = "Print this help message.")]
    help: bool,
    #[options(help = "Run the game at INDEX in the games directory.", meta = "INDEX")]
    pub index: Option<usize>,
    #[options(
        help = "Directory to choose games from.",
        default = "games",
        meta = "DIR"
    )]
    pub games: PathBuf,
    #[options(help = "List the games directory, and exit.")]
    pub list: bool,

    #[options(help = "Enable debug mode at startup.")]
    pub debug: bool,
    #[options(help = "Enable pause mode at startup.")]
    pub pause: bool,

    #[options(help = "Set the rate, in instructions per second.", meta = "IPS")]
    pub rate: Option<u32>,
    #[options(help = "Run in (Original, Modern) mode.")]
    pub mode: Option<Mode>,

    #[options(help = "Set the beep frequency, in Hz.", meta = "HZ")]
    pub frequency: Option<u32>,
    #[options(
        no_short,
        help = "Set the beep duration per timer tick, in milliseconds.",
        meta = "MS"
    )]
    pub duration: Option<u64>,
    #[options(no_short, help = "Never beep.")]
    pub mute: bool,
}

/// One game's run: the CPU, and the window it's shown in
#[derive(Debug)]
struct State<'cpu> {
    pub cpu: &'cpu mut CPU,
    pub ui: UI,
    pub ft: Instant,
}

impl<'cpu> State<'cpu> {
    fn new(cpu: &'cpu mut CPU, ui: UI) -> Self {
        State {
            cpu,
            ui,
            ft: Instant::now(),
        }
    }
    /// Runs until the window closes
    fn run(&mut self) -> Result<()> {
        self.ui.title(self.cpu);
        while self.keys()? {
            self.tick_cpu();
            if !self.frame()? {
                break;
            }
        }
        Ok(())
    }
    fn keys(&mut self) -> Result<bool> {
        self.ui.keys(self.cpu)
    }
    fn frame(&mut self) -> Result<bool> {
        self.ui.frame(self.cpu)
    }
    /// Cycles the CPU until the next frame is due
    fn tick_cpu(&mut self) {
        self.ft += FRAME;
        let now = Instant::now();
        if self.ft < now {
            // fell behind; don't try to catch up
            self.ft = now + FRAME;
        }
        while Instant::now() < self.ft {
            if let Err(e) = self.cpu.cycle() {
                eprintln!("{}", e.bold().red());
            }
            std::thread::sleep(IDLE);
        }
    }
}
