use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use crate::{
    error::InputError,
    input::{InputAction, InputBinding, InputEvent},
    module::ModuleRegistry,
};

pub(super) async fn run_action(
    registry: &ModuleRegistry,
    binding: &InputBinding,
    event: &InputEvent,
) -> Result<(), InputError> {
    match &binding.action {
        InputAction::Module => match registry.get(&event.module) {
            Some(slot) => slot.run_input(event).await,
            None => {
                debug!("Module {} is gone, ignoring input", event.module);
                Ok(())
            }
        },
        InputAction::Command(command) => launch(command, binding.wait).await,
        InputAction::Callback(action) => {
            let action = action(event.clone());
            match registry.get(&event.module) {
                Some(slot) => slot.serialized(action).await,
                None => action.await,
            }
        }
    }
}

/// Start `command`; with `wait` also require it to exit successfully.
async fn launch(command: &str, wait: bool) -> Result<(), InputError> {
    let mut parts = command.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| InputError::Action("empty command".to_string()))?;

    info!("🚀 Launching {}", command);

    let mut child = Command::new(program)
        .args(parts)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| InputError::Launch {
            command: command.to_string(),
            source,
        })?;

    if wait {
        let status = child.wait().await.map_err(|source| InputError::Launch {
            command: command.to_string(),
            source,
        })?;

        if !status.success() {
            return Err(InputError::Action(format!("'{}' exited with {}", command, status)));
        }
    }

    Ok(())
}
