//! i3bar/swaybar JSON protocol: status lines out on stdout, click events in
//! on stdin.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use super::Renderer;
use crate::{
    aggregator::RenderLine,
    input::{InputEvent, Modifier, MouseButton},
};

#[derive(Debug, Serialize)]
struct Header {
    version: u32,
    click_events: bool,
}

#[derive(Debug, Serialize)]
struct Block<'a> {
    full_text: &'a str,
    name: &'a str,
    instance: &'a str,
    separator: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<&'static str>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    urgent: bool,
    /// Custom keys must start with an underscore; i3bar ignores them.
    #[serde(rename = "_tags", skip_serializing_if = "no_tags")]
    tags: &'a [String],
}

fn no_tags(tags: &&[String]) -> bool {
    tags.is_empty()
}

const COLOR_ON: &str = "#00ff00";
const COLOR_WARNING: &str = "#ffff00";
const COLOR_CRITICAL: &str = "#ff0000";

/// Block color for a widget's state tags; the most severe tag wins.
fn tag_color(tags: &[String]) -> Option<&'static str> {
    let has = |tag: &str| tags.iter().any(|t| t.eq_ignore_ascii_case(tag));

    if has("critical") {
        Some(COLOR_CRITICAL)
    } else if has("warning") {
        Some(COLOR_WARNING)
    } else if has("on") {
        Some(COLOR_ON)
    } else {
        None
    }
}

#[derive(Debug, Deserialize)]
struct ClickEvent {
    name: Option<String>,
    instance: Option<String>,
    button: u8,
    #[serde(default)]
    modifiers: Vec<String>,
}

#[derive(Debug)]
pub struct I3barRenderer<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> I3barRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> Renderer for I3barRenderer<W> {
    fn start(&mut self) -> io::Result<()> {
        let header = Header {
            version: 1,
            click_events: true,
        };
        serde_json::to_writer(&mut self.out, &header)?;
        // The body is an endless JSON array of status lines.
        self.out.write_all(b"\n[\n")?;
        self.out.flush()
    }

    fn render(&mut self, line: &RenderLine) -> io::Result<()> {
        let blocks: Vec<Block<'_>> = line
            .iter()
            .map(|entry| Block {
                full_text: &entry.text,
                name: &entry.module,
                instance: &entry.widget,
                separator: true,
                color: tag_color(&entry.tags),
                urgent: entry.tags.iter().any(|t| t.eq_ignore_ascii_case("critical")),
                tags: &entry.tags,
            })
            .collect();

        serde_json::to_writer(&mut self.out, &blocks)?;
        self.out.write_all(b",\n")?;
        self.out.flush()
    }

    fn stop(&mut self) -> io::Result<()> {
        self.out.write_all(b"[]\n]\n")?;
        self.out.flush()
    }
}

/// Decode one click line read from stdin. The leading `[` of the stream and
/// the `,` separators between events are accepted. Lines that are not
/// clicks on a named block yield `None`.
pub fn parse_click_event(line: &str) -> Option<InputEvent> {
    let trimmed = line.trim().trim_start_matches(['[', ',']).trim();
    if trimmed.is_empty() {
        return None;
    }

    let click: ClickEvent = serde_json::from_str(trimmed).ok()?;
    let module = click.name?;
    let button = MouseButton::from_code(click.button)?;

    Some(InputEvent {
        module,
        widget: click.instance,
        button,
        modifier: click.modifiers.iter().find_map(|m| Modifier::from_i3bar(m)),
    })
}
