//! Error types for failible operations in the library.

use std::error::Error;
use std::fmt::Display;
use std::fmt::Error as FmtError;
use std::fmt::Formatter;

/// The given character is not a valid nucleotide.
#[derive(Clone, Debug, PartialEq)]
pub struct InvalidSymbol(pub char);

impl Display for InvalidSymbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "invalid symbol {:?} found", self.0)
    }
}

impl Error for InvalidSymbol {}

/// Invalid data was passed to initialize a matrix or background.
#[derive(Clone, Debug, PartialEq)]
pub struct InvalidData(pub Option<String>);

impl InvalidData {
    pub fn new<S: Into<String>>(reason: S) -> Self {
        InvalidData(Some(reason.into()))
    }
}

impl Display for InvalidData {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match &self.0 {
            Some(reason) => write!(f, "invalid data found: {}", reason),
            None => f.write_str("invalid data found"),
        }
    }
}

impl Error for InvalidData {}
