// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Turns sound-timer ticks into one continuous tone, played off the simulation thread.
//!
//! Every tick of a running sound timer calls [Beeper::accumulate]. When the timer
//! runs out, [Beeper::flush] hands the whole run to a worker thread, which plays it
//! as a single tone of `duration * ticks`.

use crate::error::{Error, Result};
use std::{
    fmt::Debug,
    sync::{
        atomic::{AtomicUsize, Ordering},
        mpsc::{channel, Sender},
    },
    thread::{Builder, JoinHandle},
    time::Duration,
};

/// Default tone frequency, in Hz
pub const FREQUENCY: u32 = 750;
/// Default tone length per accumulated tick
pub const DURATION: Duration = Duration::from_millis(30);

/// Something which can make a noise.
///
/// [Tone::play_tone] runs on the worker thread, and may block for as long as the tone lasts.
pub trait Tone: Send + 'static {
    /// Plays a tone of `frequency` Hz for `duration`
    fn play_tone(&mut self, frequency: u32, duration: Duration);
}

/// Plays nothing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Mute;

impl Tone for Mute {
    fn play_tone(&mut self, _frequency: u32, _duration: Duration) {}
}

/// Plays tones on the PC speaker
#[cfg(feature = "beep")]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Speaker;

#[cfg(feature = "beep")]
impl Tone for Speaker {
    fn play_tone(&mut self, frequency: u32, duration: Duration) {
        let pitch = frequency.min(u16::MAX as u32) as u16;
        if let Err(e) = beep::beep(pitch) {
            log::warn!("speaker unavailable: {e}");
            return;
        }
        std::thread::sleep(duration);
        if let Err(e) = beep::beep(0) {
            log::warn!("speaker would not stop: {e}");
        }
    }
}

/// The worker thread, and the channel used to wake it
struct Worker {
    tx: Sender<usize>,
    handle: JoinHandle<()>,
}

/// Accumulates sound-timer ticks, and flushes them to a [Tone] on a worker thread
pub struct Beeper {
    pending: AtomicUsize,
    worker: Option<Worker>,
}

impl Beeper {
    /// Spawns a worker thread which plays flushed ticks on `tone`,
    /// at `frequency` Hz for `duration` per tick.
    pub fn new(mut tone: impl Tone, frequency: u32, duration: Duration) -> Result<Self> {
        let (tx, rx) = channel::<usize>();
        let handle = Builder::new()
            .name("cricket-beeper".into())
            .spawn(move || {
                // Ends when the Beeper hangs up
                for ticks in rx {
                    let ticks = u32::try_from(ticks).unwrap_or(u32::MAX);
                    tone.play_tone(frequency, duration.saturating_mul(ticks));
                }
            })?;
        Ok(Beeper {
            pending: AtomicUsize::new(0),
            worker: Some(Worker { tx, handle }),
        })
    }

    /// Records one tick of sound. Never blocks.
    pub fn accumulate(&self) {
        self.pending.fetch_add(1, Ordering::AcqRel);
    }

    /// Gets the number of ticks waiting to be flushed
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    /// Takes every pending tick and, if there were any, asks the worker to play them
    /// as one tone. Never blocks.
    ///
    /// Returns the number of ticks flushed.
    /// # Examples
    /// ```rust
    /// # use cricket::Beeper;
    /// let beeper = Beeper::default();
    /// beeper.accumulate();
    /// beeper.accumulate();
    /// assert_eq!(2, beeper.flush());
    /// assert_eq!(0, beeper.flush());
    /// ```
    pub fn flush(&self) -> usize {
        let ticks = self.pending.swap(0, Ordering::AcqRel);
        if ticks == 0 {
            return 0;
        }
        log::debug!("beep for {ticks} ticks");
        if let Some(worker) = &self.worker {
            if worker.tx.send(ticks).is_err() {
                log::warn!("audio worker is gone; dropped {ticks} ticks of sound");
            }
        }
        ticks
    }

    /// Hangs up on the worker, and waits for it to finish any tone it's playing
    pub fn shutdown(&mut self) -> Result<()> {
        match self.worker.take() {
            Some(Worker { tx, handle }) => {
                drop(tx);
                handle.join().map_err(|_| Error::AudioWorker)
            }
            None => Ok(()),
        }
    }

    /// Returns true if flushed ticks will reach a worker
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| !worker.handle.is_finished())
    }
}

impl Default for Beeper {
    /// A beeper with no worker. Flushed ticks are discarded.
    fn default() -> Self {
        Beeper {
            pending: AtomicUsize::new(0),
            worker: None,
        }
    }
}

impl Drop for Beeper {
    fn drop(&mut self) {
        if self.shutdown().is_err() {
            log::error!("audio worker panicked");
        }
    }
}

impl Debug for Beeper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Beeper")
            .field("pending", &self.pending())
            .field("running", &self.is_running())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::Sender;

    /// Reports every tone it's asked to play
    struct Recorder(Sender<(u32, Duration)>);
    impl Tone for Recorder {
        fn play_tone(&mut self, frequency: u32, duration: Duration) {
            self.0.send((frequency, duration)).ok();
        }
    }

    #[test]
    fn flush_plays_one_continuous_tone() {
        let (tx, rx) = channel();
        let mut beeper = Beeper::new(Recorder(tx), FREQUENCY, DURATION).unwrap();
        for _ in 0..5 {
            beeper.accumulate();
        }
        assert_eq!(5, beeper.pending());
        assert_eq!(5, beeper.flush());
        assert_eq!(0, beeper.pending());
        beeper.shutdown().unwrap();
        let played: Vec<_> = rx.iter().collect();
        assert_eq!(played, [(FREQUENCY, DURATION * 5)]);
    }

    #[test]
    fn empty_flush_plays_nothing() {
        let (tx, rx) = channel();
        let mut beeper = Beeper::new(Recorder(tx), 440, DURATION).unwrap();
        assert_eq!(0, beeper.flush());
        beeper.shutdown().unwrap();
        assert_eq!(None, rx.iter().next());
    }

    #[test]
    fn accumulate_while_playing() {
        struct Slow(Sender<Duration>);
        impl Tone for Slow {
            fn play_tone(&mut self, _: u32, duration: Duration) {
                std::thread::sleep(Duration::from_millis(50));
                self.0.send(duration).ok();
            }
        }
        let (tx, rx) = channel();
        let mut beeper = Beeper::new(Slow(tx), FREQUENCY, Duration::from_millis(1)).unwrap();
        beeper.accumulate();
        beeper.flush();
        // the worker is busy, but these don't wait for it
        beeper.accumulate();
        beeper.accumulate();
        beeper.flush();
        beeper.shutdown().unwrap();
        let played: Vec<_> = rx.iter().collect();
        assert_eq!(played, [Duration::from_millis(1), Duration::from_millis(2)]);
    }

    #[test]
    fn shutdown_is_idempotent() {
        let mut beeper = Beeper::new(Mute, FREQUENCY, DURATION).unwrap();
        assert!(beeper.shutdown().is_ok());
        assert!(beeper.shutdown().is_ok());
        assert!(!beeper.is_running());
    }
}
