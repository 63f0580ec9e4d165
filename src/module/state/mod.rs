mod state_cell;

pub use state_cell::StateCell;

use crate::module::WidgetRender;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleStatus {
    Idle,
    Updating,
    /// Last update failed; hidden until the next successful one.
    Degraded,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetState {
    pub text: String,
    pub visible: bool,
    pub tags: Vec<String>,
}

impl From<WidgetRender> for WidgetState {
    fn from(render: WidgetRender) -> Self {
        Self {
            text: render.text,
            visible: render.visible,
            tags: render.tags,
        }
    }
}

/// Point-in-time view of one module, never mutated once published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleState {
    pub version: u64,
    pub status: ModuleStatus,
    /// Widget id to state, in descriptor order.
    pub widgets: Vec<(String, WidgetState)>,
}

impl ModuleState {
    pub fn new(widget_ids: &[String]) -> Self {
        Self {
            version: 0,
            status: ModuleStatus::Idle,
            widgets: widget_ids
                .iter()
                .map(|id| (id.clone(), WidgetState::default()))
                .collect(),
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.status == ModuleStatus::Degraded
    }

    pub fn widget(&self, id: &str) -> Option<&WidgetState> {
        self.widgets
            .iter()
            .find(|(widget_id, _)| widget_id == id)
            .map(|(_, state)| state)
    }
}
