use thiserror::Error;

use crate::{
    config::ConfigError,
    event::{EventError, WaitError},
    menu::MenuError,
};

#[derive(Error, Debug)]
pub enum Error {
    #[error("Wait error: {0}")]
    Wait(#[from] WaitError),
    #[error("Event error: {0}")]
    Event(#[from] EventError),
    #[error("Menu error: {0}")]
    Menu(#[from] MenuError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type InternalResult<T> = Result<T, Error>;

impl Error {
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Error::Internal(message.into())
    }
}
