//! Scanning primitives and a command-line model for loosely-structured text.
#![no_std]

extern crate alloc;

pub mod matchers;
pub mod parser;
pub mod scanner;
pub mod utf8;

pub use parser::{Commandline, Error, Flag};
pub use scanner::Scanner;
