//! linescan, a `no_std` text scanner and command-line model for loosely-structured input.
#![no_std]
#![deny(missing_docs)]

pub use linescan_parser as parser;

pub use parser::{Commandline, Flag, Scanner};

/// Defines the possible errors that may occur during usage of the crate.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// An error comes from the parsing of a command line.
    #[error(transparent)]
    Parser(#[from] parser::Error),
}

/// Parse a whole command line into its commands and flags.
pub fn parse(text: &str) -> Result<Commandline, Error> {
    Ok(Commandline::parse(text)?)
}
