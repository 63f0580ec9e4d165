pub mod aggregator;
pub mod config;
pub mod error;
pub mod input;
pub mod module;
pub mod modules;
pub mod render;
pub mod runtime;
pub mod scheduler;

pub use aggregator::{Aggregator, RenderEntry, RenderLine};
pub use config::BarConfig;
pub use error::{ConfigError, InputError, RuntimeError, UpdateError};
pub use input::{Dispatch, InputAction, InputBinding, InputDispatcher, InputEvent, MouseButton};
pub use module::{ModuleDescriptor, ModuleState, ModuleStatus, StatusModule, WidgetRender};
pub use runtime::{Runtime, RuntimeConfig};
pub use scheduler::{PollScheduler, SchedulerHandle};
