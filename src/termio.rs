//! Terminal I/O, with colors!

use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Print an OK message, in green.
pub fn print_ok(msg: &str) {
    print_tagged("OK   ", Color::Green, msg);
}

/// Print a warning message, in yellow.
pub fn print_warn(msg: &str) {
    print_tagged("WARN ", Color::Yellow, msg);
}

/// Print a heading, in bold cyan.
pub fn print_heading(msg: &str) {
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(Color::Cyan)).set_bold(true);

    print_line(&spec, msg, "");
}

fn print_tagged(tag: &str, color: Color, msg: &str) {
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(color));

    print_line(&spec, tag, &format!(" {msg}"));
}

/// Print `colored` then `plain` on stdout, as one line.
fn print_line(spec: &ColorSpec, colored: &str, plain: &str) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);

    write_line(&mut stdout, spec, colored, plain).expect("write message");
}

fn write_line(
    out: &mut impl WriteColor,
    spec: &ColorSpec,
    colored: &str,
    plain: &str,
) -> io::Result<()> {
    out.set_color(spec)?;
    write!(out, "{colored}")?;
    out.reset()?;
    writeln!(out, "{plain}")
}
