use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::aggregator::{Aggregator, RenderLine};
use crate::config::BarConfig;
use crate::error::{ConfigError, Result};
use crate::input::{Dispatch, InputDispatcher, InputEvent};
use crate::module::{ModuleRegistry, ModuleSlot, StatusModule};
use crate::modules::build_module;
use crate::render::Renderer;
use crate::scheduler::{PollScheduler, SchedulerHandle, DEFAULT_SHUTDOWN_TIMEOUT};

const MIN_RENDER_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    /// How often the aggregated line is checked for changes. Clamped to 10ms.
    pub render_interval: Duration,
    /// How long in-flight updates may run on after shutdown is requested.
    pub shutdown_timeout: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            render_interval: Duration::from_secs(1),
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }
}

/// Owns the registry, scheduler and input dispatcher of one status bar.
#[derive(Debug)]
pub struct Runtime {
    registry: Arc<ModuleRegistry>,
    scheduler: Option<PollScheduler>,
    scheduler_handle: SchedulerHandle,
    scheduler_task: Option<JoinHandle<()>>,
    dispatcher: Arc<InputDispatcher>,
    aggregator: Aggregator,
    config: RuntimeConfig,
}

impl Runtime {
    pub fn new(config: RuntimeConfig) -> Self {
        let registry = Arc::new(ModuleRegistry::new());
        let scheduler = PollScheduler::new(config.shutdown_timeout);

        Self {
            scheduler_handle: scheduler.handle(),
            scheduler: Some(scheduler),
            scheduler_task: None,
            dispatcher: Arc::new(InputDispatcher::new(Arc::clone(&registry))),
            aggregator: Aggregator::new(Arc::clone(&registry)),
            registry,
            config,
        }
    }

    /// Build and register every module in `config`, in order.
    ///
    /// A module that fails to configure is skipped with an error log, unless
    /// it is marked `required`, in which case startup fails.
    pub fn from_config(config: &BarConfig) -> Result<Self> {
        config.validate()?;
        let runtime = Self::new(config.runtime_config());

        for entry in &config.modules {
            let outcome = build_module(entry).and_then(|module| runtime.register(module));

            match outcome {
                Ok(_) => {}
                Err(e) if entry.required => {
                    error!("❌ Required module {} failed to configure: {}", entry.name, e);
                    return Err(e.into());
                }
                Err(e) => error!("❌ Skipping module {}: {}", entry.name, e),
            }
        }

        info!("📦 Loaded {} of {} configured modules", runtime.registry.len(), config.modules.len());
        Ok(runtime)
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<ModuleRegistry> {
        &self.registry
    }

    pub fn dispatcher(&self) -> &Arc<InputDispatcher> {
        &self.dispatcher
    }

    pub fn is_started(&self) -> bool {
        self.scheduler_task.is_some()
    }

    /// Register a module, its input bindings, and its polling schedule.
    pub fn register(&self, module: Box<dyn StatusModule>) -> std::result::Result<Arc<ModuleSlot>, ConfigError> {
        let bindings = module.bindings();
        let slot = self.registry.register(Arc::new(ModuleSlot::new(module)))?;

        for binding in bindings {
            if binding.module != slot.name() {
                warn!("Module {} binds input for {}", slot.name(), binding.module);
            }
            self.dispatcher.bind(binding);
        }

        self.scheduler_handle.register(Arc::clone(&slot));
        Ok(slot)
    }

    /// Remove a module from the bar. Once the scheduler is running this returns
    /// only after any in-flight update of the module has been aborted.
    pub async fn unregister(&self, name: &str) -> bool {
        let removed = self.registry.unregister(name).is_some();
        let unbound = self.dispatcher.unbind_module(name);
        let ack = self.scheduler_handle.unregister(name);

        if self.is_started() {
            let _ = ack.await;
        }

        debug!("Unregistered {} ({} bindings dropped)", name, unbound);
        removed
    }

    pub fn refresh(&self, name: &str) {
        self.scheduler_handle.refresh(name);
    }

    pub fn refresh_all(&self) {
        self.scheduler_handle.refresh_all();
    }

    pub fn dispatch(&self, event: InputEvent) -> Dispatch {
        self.dispatcher.dispatch(event)
    }

    pub fn snapshot(&self) -> RenderLine {
        self.aggregator.snapshot()
    }

    /// Spawn the scheduler. Calling this twice is a no-op.
    pub fn start(&mut self, stop: CancellationToken) {
        match self.scheduler.take() {
            Some(scheduler) => self.scheduler_task = Some(tokio::spawn(scheduler.run(stop))),
            None => warn!("Runtime already started"),
        }
    }

    /// Wait for the scheduler to finish its shutdown.
    pub async fn join(&mut self) {
        if let Some(task) = self.scheduler_task.take() {
            if let Err(e) = task.await {
                error!("❌ Scheduler task failed: {}", e);
            }
        }
    }

    /// Start polling, refresh every module once, then keep `renderer` in sync
    /// with the modules and route `inputs` until `stop` is cancelled.
    pub async fn run<R: Renderer>(
        &mut self,
        renderer: &mut R,
        mut inputs: mpsc::Receiver<InputEvent>,
        stop: CancellationToken,
    ) -> Result<()> {
        renderer.start()?;
        self.start(stop.clone());
        self.refresh_all();

        let mut ticker = interval(self.config.render_interval.max(MIN_RENDER_INTERVAL));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last: Option<RenderLine> = None;

        info!("🚀 Status runtime running with {} modules", self.registry.len());

        let outcome = loop {
            tokio::select! {
                biased;

                _ = stop.cancelled() => break Ok(()),

                Some(event) = inputs.recv() => {
                    debug!("🖱️ {:?} on {}", event.button, event.module);
                    if let Dispatch::Busy = self.dispatch(event) {
                        debug!("Input dropped, action still running");
                    }
                }

                _ = ticker.tick() => {
                    let line = self.snapshot();
                    if last.as_ref() != Some(&line) {
                        if let Err(e) = renderer.render(&line) {
                            error!("❌ Render failed: {}", e);
                            break Err(e);
                        }
                        last = Some(line);
                    }
                }
            }
        };

        info!("🛑 Shutting down");
        stop.cancel();
        self.join().await;
        outcome?;
        renderer.stop()?;
        Ok(())
    }
}
