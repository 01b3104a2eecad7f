//! Text sinks that runner output is written through
//!
//! Output is never written to a global stream. Every component receives the
//! sink it writes to, and wrappers (quiet filtering, coloring) borrow the
//! sink they wrap for as long as they are in scope.

use colored::{Color, Colorize};
use std::io::{self, Write};

/// A sink for runner output.
///
/// Each call is one write; `writeln` is two writes (the text, then `"\n"`)
/// so filters see line endings the same way a line-oriented stream does.
pub trait TextStream {
    fn write_str(&mut self, text: &str) -> io::Result<()>;

    fn writeln(&mut self, text: &str) -> io::Result<()> {
        self.write_str(text)?;
        self.write_str("\n")
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<T: TextStream + ?Sized> TextStream for &mut T {
    fn write_str(&mut self, text: &str) -> io::Result<()> {
        (**self).write_str(text)
    }

    fn writeln(&mut self, text: &str) -> io::Result<()> {
        (**self).writeln(text)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// In-memory capture
impl TextStream for String {
    fn write_str(&mut self, text: &str) -> io::Result<()> {
        self.push_str(text);
        Ok(())
    }
}

/// Adapts any `io::Write` (stderr, a file) into a [`TextStream`]
#[derive(Debug)]
pub struct WriteStream<W: Write> {
    inner: W,
}

impl<W: Write> WriteStream<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl WriteStream<io::Stderr> {
    /// unittest reports on stderr
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> TextStream for WriteStream<W> {
    fn write_str(&mut self, text: &str) -> io::Result<()> {
        self.inner.write_all(text.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Wraps every non-blank write to the inner sink in a color.
///
/// The wrapped sink is borrowed, so it is back in plain use as soon as this
/// goes out of scope, however the writing code exits.
pub struct ColoredStream<'a> {
    inner: &'a mut dyn TextStream,
    color: Color,
}

impl<'a> ColoredStream<'a> {
    pub fn new(inner: &'a mut dyn TextStream, color: Color) -> Self {
        Self { inner, color }
    }
}

impl TextStream for ColoredStream<'_> {
    fn write_str(&mut self, text: &str) -> io::Result<()> {
        if text.trim().is_empty() {
            return self.inner.write_str(text);
        }
        self.inner.write_str(&text.color(self.color).to_string())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
