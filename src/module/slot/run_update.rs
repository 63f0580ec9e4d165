use tracing::{info, warn};

use crate::{
    error::UpdateError,
    module::{ModuleSlot, ModuleStatus, StatusModule, WidgetState},
};

impl ModuleSlot {
    /// Update the module under its execution lock and publish the outcome.
    pub async fn run_update(&self) -> Result<(), UpdateError> {
        let mut module = self.module.lock().await;
        self.update_locked(&mut **module).await
    }

    /// Caller must hold the execution lock that guards `module`.
    pub(super) async fn update_locked(
        &self,
        module: &mut dyn StatusModule,
    ) -> Result<(), UpdateError> {
        let previous = self.state.status();
        self.state.set_status(ModuleStatus::Updating);

        let outcome = module.update().await;

        match &outcome {
            Ok(()) => {
                let widgets: Vec<(String, WidgetState)> = self
                    .descriptor
                    .widgets
                    .iter()
                    .map(|id| (id.clone(), WidgetState::from(module.render(id))))
                    .collect();

                self.state.publish(|state| {
                    state.status = ModuleStatus::Idle;
                    state.widgets = widgets;
                });

                if previous == ModuleStatus::Degraded {
                    info!("✅ Module {} recovered", self.name());
                }
            }
            Err(e) => {
                warn!("⚠️ Module {} update failed, hidden until next tick: {}", self.name(), e);
                self.mark_degraded();
            }
        }

        outcome
    }
}
