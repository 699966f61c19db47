use serde::{de, ser};
use std::{fmt, io};

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization failed because {0}")]
    Serialization(String),
    #[error("deserialization failed because {0}")]
    Deserialization(String),
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("{kind} needs {need} bytes but only {have} were given")]
    Truncated {
        kind: &'static str,
        need: usize,
        have: usize,
    },
    #[error("{0} bytes remain after decoding the packet")]
    TrailingData(usize),
}

impl ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Serialization(msg.to_string())
    }
}

impl de::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Deserialization(msg.to_string())
    }
}

impl Error {
    pub(crate) fn unsupported_ser(what: &str) -> Self {
        Error::Serialization(format!("{} has no wire representation", what))
    }

    pub(crate) fn unsupported_de(what: &str) -> Self {
        Error::Deserialization(format!("{} has no wire representation", what))
    }
}
