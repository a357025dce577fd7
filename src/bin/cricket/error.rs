// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Error type for the cricket frontend

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Asked for a game past the end of the games directory
    #[error("there is no game at index {index}")]
    NoSuchGame { index: usize },
    /// Error originated in [`cricket`]
    #[error(transparent)]
    Cricket(#[from] cricket::error::Error),
    /// Error originated in [`std::io`]
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Error originated in [`minifb`]
    #[error(transparent)]
    Minifb(#[from] minifb::Error),
}
