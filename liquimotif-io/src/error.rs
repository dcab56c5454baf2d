use std::fmt::Display;
use std::fmt::Formatter;

use nom::error::Error as NomError;

/// Errors raised while reading a motif file.
#[derive(Debug)]
pub enum Error {
    /// The input is not valid MEME-format motif data.
    InvalidData(Option<String>),
    /// The declared motif alphabet is not the 4-letter DNA alphabet.
    UnsupportedAlphabet(u64),
    Io(std::io::Error),
    Nom(NomError<String>),
}

impl Error {
    pub(crate) fn invalid<S: Into<String>>(reason: S) -> Self {
        Error::InvalidData(Some(reason.into()))
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidData(Some(reason)) => write!(f, "invalid motif data: {}", reason),
            Error::InvalidData(None) => f.write_str("invalid motif data"),
            Error::UnsupportedAlphabet(alength) => write!(
                f,
                "unsupported alphabet size {}, only ACGT motifs are supported",
                alength
            ),
            Error::Io(e) => e.fmt(f),
            Error::Nom(e) => write!(f, "malformed motif data: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<liquimotif::err::InvalidData> for Error {
    fn from(error: liquimotif::err::InvalidData) -> Self {
        Error::InvalidData(error.0)
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io(error)
    }
}

impl From<NomError<&'_ str>> for Error {
    fn from(error: NomError<&'_ str>) -> Self {
        Error::Nom(NomError::new(error.input.to_string(), error.code))
    }
}

impl From<nom::Err<NomError<&'_ str>>> for Error {
    fn from(err: nom::Err<NomError<&'_ str>>) -> Self {
        match err {
            nom::Err::Incomplete(_) => Error::InvalidData(None),
            nom::Err::Error(e) => Error::from(e),
            nom::Err::Failure(e) => Error::from(e),
        }
    }
}
