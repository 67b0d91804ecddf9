//! Route console protocol.
//!
//! One command per line on stdin, one response line on stdout. The parser
//! turns lines into `Command`s; `engine::Engine` answers them.

pub mod parser;

pub use parser::{parse_command, Command, Coord};
