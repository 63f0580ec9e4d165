pub mod trait_status_module;
pub mod state;
pub mod params;

mod descriptor;
mod slot;
mod registry;

pub use descriptor::ModuleDescriptor;
pub use params::ModuleParams;
pub use registry::ModuleRegistry;
pub use slot::ModuleSlot;
pub use state::{ModuleState, ModuleStatus, StateCell, WidgetState};
pub use trait_status_module::{StatusModule, WidgetRender};
