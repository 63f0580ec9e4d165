use crate::{
    error::InputError,
    input::InputEvent,
    module::ModuleSlot,
};

impl ModuleSlot {
    /// Hand an input event to the module, then refresh it. Both steps run under
    /// the execution lock so they cannot interleave with a scheduled update.
    pub async fn run_input(&self, event: &InputEvent) -> Result<(), InputError> {
        let mut module = self.module.lock().await;
        module.on_input(event).await?;
        self.update_locked(&mut **module).await?;
        Ok(())
    }
}
