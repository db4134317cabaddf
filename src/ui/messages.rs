//! User-facing status lines. Errors go to stderr, everything else to stdout.

use ansi_term::{Colour, Style};
use std::fmt;

const ICON_INFO: &str = "ℹ️";
const ICON_OK: &str = "✅";
const ICON_WARN: &str = "⚠️";
const ICON_ERR: &str = "❌";

fn line<T: fmt::Display>(colour: Colour, icon: &str, msg: T) -> String {
    format!("{} {}", colour.bold().paint(icon), msg)
}

pub fn info<T: fmt::Display>(msg: T) {
    println!("{}", line(Colour::Blue, ICON_INFO, msg));
}

pub fn success<T: fmt::Display>(msg: T) {
    println!("{}", line(Colour::Green, ICON_OK, msg));
}

pub fn warning<T: fmt::Display>(msg: T) {
    println!("{}", line(Colour::Yellow, ICON_WARN, msg));
}

pub fn error<T: fmt::Display>(msg: T) {
    eprintln!("{}", line(Colour::Red, ICON_ERR, msg));
}

/// Section header, e.g. `=== Register of 2024-01-10 ===`
pub fn header<T: fmt::Display>(msg: T) {
    let style = Style::new().bold().fg(Colour::Blue);
    println!("\n{}", style.paint(format!("=== {} ===", msg)));
}
