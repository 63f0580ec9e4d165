mod dispatcher;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};

use crate::error::InputError;

pub use dispatcher::{Dispatch, InputDispatcher};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    WheelUp,
    WheelDown,
}

impl MouseButton {
    /// X11 button numbers as used by the i3bar click protocol.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(MouseButton::Left),
            2 => Some(MouseButton::Middle),
            3 => Some(MouseButton::Right),
            4 => Some(MouseButton::WheelUp),
            5 => Some(MouseButton::WheelDown),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    Shift,
    Control,
    Alt,
    Super,
}

impl Modifier {
    pub fn from_i3bar(name: &str) -> Option<Self> {
        match name {
            "Shift" => Some(Modifier::Shift),
            "Control" => Some(Modifier::Control),
            "Mod1" => Some(Modifier::Alt),
            "Mod4" => Some(Modifier::Super),
            _ => None,
        }
    }
}

/// A pointer event aimed at one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEvent {
    pub module: String,
    pub widget: Option<String>,
    pub button: MouseButton,
    pub modifier: Option<Modifier>,
}

impl InputEvent {
    pub fn new(module: impl Into<String>, button: MouseButton) -> Self {
        Self {
            module: module.into(),
            widget: None,
            button,
            modifier: None,
        }
    }

    pub fn with_widget(mut self, widget: impl Into<String>) -> Self {
        self.widget = Some(widget.into());
        self
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifier = Some(modifier);
        self
    }
}

pub type ActionFn =
    Arc<dyn Fn(InputEvent) -> BoxFuture<'static, Result<(), InputError>> + Send + Sync>;

#[derive(Clone)]
pub enum InputAction {
    /// Forward to the owning module's `on_input`, then refresh it.
    Module,
    /// Launch an external program. Arguments are whitespace separated.
    Command(String),
    /// Arbitrary action, run under the owning module's execution lock.
    Callback(ActionFn),
}

impl InputAction {
    pub fn callback<F, Fut>(action: F) -> Self
    where
        F: Fn(InputEvent) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), InputError>> + Send + 'static,
    {
        let boxed: ActionFn = Arc::new(
            move |event: InputEvent| -> BoxFuture<'static, Result<(), InputError>> {
                action(event).boxed()
            },
        );
        InputAction::Callback(boxed)
    }
}

impl fmt::Debug for InputAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputAction::Module => write!(f, "Module"),
            InputAction::Command(command) => f.debug_tuple("Command").field(command).finish(),
            InputAction::Callback(_) => write!(f, "Callback(..)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindingKey {
    pub module: String,
    pub button: MouseButton,
    pub modifier: Option<Modifier>,
}

impl From<&InputEvent> for BindingKey {
    fn from(event: &InputEvent) -> Self {
        Self {
            module: event.module.clone(),
            button: event.button,
            modifier: event.modifier,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InputBinding {
    pub module: String,
    pub button: MouseButton,
    pub modifier: Option<Modifier>,
    pub action: InputAction,
    /// Drop new events for this binding while its action is still running.
    pub wait: bool,
}

impl InputBinding {
    pub fn new(module: impl Into<String>, button: MouseButton, action: InputAction) -> Self {
        Self {
            module: module.into(),
            button,
            modifier: None,
            action,
            wait: false,
        }
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifier = Some(modifier);
        self
    }

    pub fn waiting(mut self) -> Self {
        self.wait = true;
        self
    }

    pub fn key(&self) -> BindingKey {
        BindingKey {
            module: self.module.clone(),
            button: self.button,
            modifier: self.modifier,
        }
    }
}
