use std::sync::Arc;

use parking_lot::RwLock;

use super::{ModuleState, ModuleStatus};

/// Copy-on-write holder of a module's latest published state.
///
/// Readers clone the `Arc` and never see a half-applied change; a writer holds
/// the lock only while it copies and swaps one `ModuleState`.
#[derive(Debug)]
pub struct StateCell {
    current: RwLock<Arc<ModuleState>>,
}

impl StateCell {
    pub fn new(widget_ids: &[String]) -> Self {
        Self {
            current: RwLock::new(Arc::new(ModuleState::new(widget_ids))),
        }
    }

    pub fn load(&self) -> Arc<ModuleState> {
        self.current.read().clone()
    }

    /// Apply `change` to a copy of the current state and publish it with the
    /// next version. Returns that version.
    pub fn publish<F>(&self, change: F) -> u64
    where
        F: FnOnce(&mut ModuleState),
    {
        let mut current = self.current.write();
        let mut next = (**current).clone();
        change(&mut next);
        next.version = current.version + 1;
        let version = next.version;
        *current = Arc::new(next);
        version
    }

    pub fn set_status(&self, status: ModuleStatus) -> u64 {
        self.publish(|state| state.status = status)
    }

    pub fn status(&self) -> ModuleStatus {
        self.current.read().status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::WidgetState;

    fn widgets() -> Vec<String> {
        vec!["a".to_string(), "b".to_string()]
    }

    #[test]
    fn test_initial_state_is_empty_and_invisible() {
        let cell = StateCell::new(&widgets());
        let state = cell.load();

        assert_eq!(state.version, 0);
        assert_eq!(state.status, ModuleStatus::Idle);
        assert!(state.widgets.iter().all(|(_, w)| !w.visible && w.text.is_empty()));
    }

    #[test]
    fn test_publish_bumps_version_and_leaves_old_snapshot_alone() {
        let cell = StateCell::new(&widgets());
        let before = cell.load();

        let version = cell.publish(|state| {
            state.widgets[0].1 = WidgetState {
                text: "on".to_string(),
                visible: true,
                tags: vec![],
            };
        });

        assert_eq!(version, 1);
        assert_eq!(before.widget("a").map(|w| w.visible), Some(false));
        assert_eq!(cell.load().widget("a").map(|w| w.text.as_str()), Some("on"));
    }

    #[test]
    fn test_degraded_is_hidden() {
        let cell = StateCell::new(&widgets());
        cell.set_status(ModuleStatus::Degraded);
        assert!(cell.load().is_hidden());
        assert_eq!(cell.status(), ModuleStatus::Degraded);

        cell.set_status(ModuleStatus::Idle);
        assert!(!cell.load().is_hidden());
        assert_eq!(cell.load().version, 2);
    }
}
