//! The process-boundary error type: every failure mode the binary can exit on,
//! mapped to the exit codes in §6 ("0=clean, 1=config error, 2=OS/socket error,
//! 3=interface error").

use crate::config::ConfigError;
use crate::dispatcher::socket::DriverSocketError;
use std::result;
use thiserror::Error;

pub type Result<T> = result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("socket error: {0}")]
    Socket(#[from] DriverSocketError),
    #[error("interface error: {0}")]
    Interface(#[from] std::io::Error),
}

impl Error {
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) => 1,
            Error::Socket(_) => 2,
            Error::Interface(_) => 3,
        }
    }
}
