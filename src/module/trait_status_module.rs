use std::fmt::Debug;

use async_trait::async_trait;

use crate::{
    error::{InputError, UpdateError},
    input::{InputBinding, InputEvent},
    module::ModuleDescriptor,
};

/// What a widget shows right now.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetRender {
    pub text: String,
    pub visible: bool,
    pub tags: Vec<String>,
}

impl WidgetRender {
    pub fn shown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            visible: true,
            tags: Vec::new(),
        }
    }

    pub fn hidden() -> Self {
        Self::default()
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

/// A data source hosted by the runtime.
///
/// The runtime holds each module behind its own execution lock, so `update`
/// and `on_input` never run concurrently for the same module. `render` is
/// called right after a successful update and must only read state.
#[async_trait]
pub trait StatusModule: Send + Sync + Debug {
    fn descriptor(&self) -> ModuleDescriptor;

    /// Fetch fresh data. May block on network or IPC.
    async fn update(&mut self) -> Result<(), UpdateError>;

    fn render(&self, widget_id: &str) -> WidgetRender;

    async fn on_input(&mut self, _event: &InputEvent) -> Result<(), InputError> {
        Ok(())
    }

    /// Input bindings registered together with the module.
    fn bindings(&self) -> Vec<InputBinding> {
        Vec::new()
    }
}
