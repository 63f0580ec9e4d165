mod i3bar;
mod plain;

use std::io;

use crate::aggregator::RenderLine;

pub use i3bar::{parse_click_event, I3barRenderer};
pub use plain::PlainRenderer;

/// Consumer of aggregated status lines.
pub trait Renderer: Send {
    fn start(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn render(&mut self, line: &RenderLine) -> io::Result<()>;

    fn stop(&mut self) -> io::Result<()> {
        Ok(())
    }
}
