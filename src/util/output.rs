use std::io::{self, Write};

use console::style;

pub fn warn(message: &str) {
    let _ = writeln!(io::stderr(), "{}", style(message).yellow());
}

pub fn error(message: &str) {
    let _ = writeln!(io::stderr(), "{}", style(message).red());
}
