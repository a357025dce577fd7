// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Lists a directory of games, and asks the user to pick one

use crate::error::{Error, Result};
use std::{
    fmt::Display,
    io::{BufRead, Write},
    path::{Path, PathBuf},
};

/// The games in a directory, sorted by name
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Games {
    games: Vec<PathBuf>,
}

impl Games {
    /// Lists the files in `dir`. A missing directory has no games in it.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("no games directory at {}", dir.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        let mut games = vec![];
        for entry in entries {
            let path = entry?.path();
            if path.is_file() {
                games.push(path);
            }
        }
        games.sort();
        Ok(Games { games })
    }

    /// Gets the game at `index`
    pub fn get(&self, index: usize) -> Result<&Path> {
        self.games
            .get(index)
            .map(PathBuf::as_path)
            .ok_or(Error::NoSuchGame { index })
    }

    /// Prints the games to `output`, then reads indices from `input` until one is valid.
    ///
    /// Returns [None] when the user enters `-1`, or `input` runs dry.
    pub fn choose(&self, mut input: impl BufRead, mut output: impl Write) -> Result<Option<PathBuf>> {
        writeln!(output, "=================== Choose a game ===================")?;
        write!(output, "{self}")?;
        let mut line = String::new();
        loop {
            write!(output, "Enter the game index (-1 to quit): ")?;
            output.flush()?;
            line.clear();
            if input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            match line.trim().parse::<isize>() {
                Ok(-1) => return Ok(None),
                Ok(index) => {
                    if let Some(game) = usize::try_from(index).ok().and_then(|i| self.games.get(i)) {
                        return Ok(Some(game.clone()));
                    }
                }
                Err(_) => (),
            }
            write!(output, "Invalid index. ")?;
        }
    }
}

impl Display for Games {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, game) in self.games.iter().enumerate() {
            let name = game.file_name().unwrap_or(game.as_os_str());
            writeln!(f, "[{index}] {}", name.to_string_lossy())?;
        }
        Ok(())
    }
}

impl From<Vec<PathBuf>> for Games {
    fn from(games: Vec<PathBuf>) -> Self {
        Games { games }
    }
}
