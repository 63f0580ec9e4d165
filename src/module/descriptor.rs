use std::time::Duration;

/// Identity and polling contract of a module. Immutable once registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    pub name: String,
    /// Zero means the module is only updated on demand.
    pub interval: Duration,
    /// Widget ids in display order.
    pub widgets: Vec<String>,
}

impl ModuleDescriptor {
    /// Descriptor with a single widget named after the module.
    pub fn new(name: impl Into<String>, interval: Duration) -> Self {
        let name = name.into();
        Self {
            widgets: vec![name.clone()],
            name,
            interval,
        }
    }

    pub fn with_widgets<I, S>(mut self, widgets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.widgets = widgets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn is_manual(&self) -> bool {
        self.interval.is_zero()
    }
}
