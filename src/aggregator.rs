use std::sync::Arc;

use crate::module::ModuleRegistry;

/// One visible widget in the rendered line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderEntry {
    pub module: String,
    pub widget: String,
    pub text: String,
    pub tags: Vec<String>,
}

/// Everything the bar shows right now, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderLine {
    pub entries: Vec<RenderEntry>,
}

impl RenderLine {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RenderEntry> {
        self.entries.iter()
    }

    pub fn to_plain(&self, separator: &str) -> String {
        self.entries
            .iter()
            .map(|e| e.text.as_str())
            .collect::<Vec<_>>()
            .join(separator)
    }
}

/// Builds a `RenderLine` from the latest published module snapshots.
#[derive(Debug, Clone)]
pub struct Aggregator {
    registry: Arc<ModuleRegistry>,
}

impl Aggregator {
    pub fn new(registry: Arc<ModuleRegistry>) -> Self {
        Self { registry }
    }

    /// Reads each module's snapshot once; hidden modules and invisible widgets
    /// contribute nothing.
    pub fn snapshot(&self) -> RenderLine {
        let mut entries = Vec::new();

        for slot in self.registry.slots() {
            let state = slot.snapshot();
            if state.is_hidden() {
                continue;
            }

            for (widget, widget_state) in state.widgets.iter() {
                if !widget_state.visible {
                    continue;
                }
                entries.push(RenderEntry {
                    module: slot.name().to_string(),
                    widget: widget.clone(),
                    text: widget_state.text.clone(),
                    tags: widget_state.tags.clone(),
                });
            }
        }

        RenderLine { entries }
    }
}
