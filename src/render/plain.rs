use std::io::{self, Write};

use super::Renderer;
use crate::aggregator::RenderLine;

/// Writes each line as plain text, e.g. for `xsetroot -name` style bars.
#[derive(Debug)]
pub struct PlainRenderer<W: Write + Send> {
    out: W,
    separator: String,
}

impl<W: Write + Send> PlainRenderer<W> {
    pub fn new(out: W, separator: impl Into<String>) -> Self {
        Self {
            out,
            separator: separator.into(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Renderer for PlainRenderer<W> {
    fn render(&mut self, line: &RenderLine) -> io::Result<()> {
        writeln!(self.out, "{}", line.to_plain(&self.separator))?;
        self.out.flush()
    }
}
