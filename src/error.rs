use thiserror::Error;

use crate::env::EnvError;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Env(#[from] EnvError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to draw plot: {0}")]
    Plot(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
