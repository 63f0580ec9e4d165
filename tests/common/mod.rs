#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use status_runtime::{
    InputAction, InputBinding, InputError, InputEvent, ModuleDescriptor, MouseButton,
    StatusModule, UpdateError, WidgetRender,
};

/// Counters shared between a test and the modules it registers.
#[derive(Debug, Default)]
pub struct Probe {
    pub calls: AtomicUsize,
    pub completed: AtomicUsize,
    pub inputs: AtomicUsize,
    pub running: AtomicUsize,
    pub max_running: AtomicUsize,
    pub order: Mutex<Vec<String>>,
}

impl Probe {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn inputs(&self) -> usize {
        self.inputs.load(Ordering::SeqCst)
    }

    pub fn max_running(&self) -> usize {
        self.max_running.load(Ordering::SeqCst)
    }

    pub fn order(&self) -> Vec<String> {
        self.order.lock().unwrap().clone()
    }

    fn enter(&self) -> Running<'_> {
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_running.fetch_max(now, Ordering::SeqCst);
        Running(self)
    }
}

/// Counts a section of module code as running until dropped, also when the
/// task is aborted.
struct Running<'a>(&'a Probe);

impl Drop for Running<'_> {
    fn drop(&mut self) {
        self.0.running.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Configurable module: every widget renders the number of successful updates.
#[derive(Debug)]
pub struct TestModule {
    name: String,
    interval: Duration,
    widgets: Vec<String>,
    probe: Arc<Probe>,
    delay: Duration,
    input_delay: Duration,
    fail_first: usize,
    successes: u64,
    bindings: Vec<InputBinding>,
}

impl TestModule {
    pub fn new(name: &str, interval: Duration, probe: &Arc<Probe>) -> Self {
        Self {
            name: name.to_string(),
            interval,
            widgets: vec![name.to_string()],
            probe: Arc::clone(probe),
            delay: Duration::ZERO,
            input_delay: Duration::ZERO,
            fail_first: 0,
            successes: 0,
            bindings: Vec::new(),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_input_delay(mut self, delay: Duration) -> Self {
        self.input_delay = delay;
        self
    }

    /// Fail the first `count` updates.
    pub fn failing(mut self, count: usize) -> Self {
        self.fail_first = count;
        self
    }

    pub fn always_failing(self) -> Self {
        self.failing(usize::MAX)
    }

    pub fn with_widgets(mut self, widgets: &[&str]) -> Self {
        self.widgets = widgets.iter().map(|w| w.to_string()).collect();
        self
    }

    pub fn bound(mut self, button: MouseButton, action: InputAction, wait: bool) -> Self {
        let binding = InputBinding::new(self.name.clone(), button, action);
        self.bindings.push(if wait { binding.waiting() } else { binding });
        self
    }

    pub fn boxed(self) -> Box<dyn StatusModule> {
        Box::new(self)
    }
}

#[async_trait]
impl StatusModule for TestModule {
    fn descriptor(&self) -> ModuleDescriptor {
        ModuleDescriptor::new(self.name.clone(), self.interval).with_widgets(self.widgets.clone())
    }

    async fn update(&mut self) -> Result<(), UpdateError> {
        let call = self.probe.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.probe.order.lock().unwrap().push(self.name.clone());

        {
            let _running = self.probe.enter();
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }
        self.probe.completed.fetch_add(1, Ordering::SeqCst);

        if call <= self.fail_first {
            return Err(UpdateError::Unavailable(format!("{} call {}", self.name, call)));
        }
        self.successes += 1;
        Ok(())
    }

    fn render(&self, _widget_id: &str) -> WidgetRender {
        WidgetRender::shown(self.successes.to_string())
    }

    async fn on_input(&mut self, _event: &InputEvent) -> Result<(), InputError> {
        let _running = self.probe.enter();
        if !self.input_delay.is_zero() {
            tokio::time::sleep(self.input_delay).await;
        }
        self.probe.inputs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn bindings(&self) -> Vec<InputBinding> {
        self.bindings.clone()
    }
}

pub fn secs(s: f64) -> Duration {
    Duration::from_secs_f64(s)
}
