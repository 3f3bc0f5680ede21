// Application entry point

use std::io::{self, Write};

pub const START_MESSAGE: &str = "App started.";
pub const FINISH_MESSAGE: &str = "App finished";

/// Does nothing.
pub fn main() {}

pub fn run<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", START_MESSAGE)?;
    main();
    writeln!(out, "{}", FINISH_MESSAGE)?;
    Ok(())
}
