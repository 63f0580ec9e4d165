//! Upcoming Google Calendar events for the next day that has any.
//!
//! All-day events are not shown. Left click toggles between the first event
//! with a count of the rest and the full list.
//!
//! Only a stored access token is used; nothing here runs the OAuth consent
//! flow or refreshes the token. Google access tokens expire after about an
//! hour, so an external helper has to keep `.gcalendar_token.json` current.
//! Until it does, updates fail with an authorization error and the module
//! stays hidden.

mod api;
mod events;

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, Locale, TimeZone, Utc};
use tracing::warn;

use crate::{
    error::{ConfigError, InputError, UpdateError},
    input::{InputAction, InputBinding, InputEvent, MouseButton},
    module::{ModuleDescriptor, ModuleParams, StatusModule, WidgetRender},
};

pub use api::{CalendarSource, GoogleCalendarSource, TOKEN_FILE};
pub use events::{is_valid_format, parse_locale, upcoming_lines, CalendarEvent, EventStart};

pub const MODULE_TYPE: &str = "gcalendar";

const DEFAULT_INTERVAL: Duration = Duration::from_secs(15 * 60);
const DEFAULT_TIME_FORMAT: &str = "%H:%M";
const DEFAULT_DATE_FORMAT: &str = "%d.%m.%y";
const DEFAULT_CREDENTIALS_PATH: &str = "~/";
const LOOKAHEAD_DAYS: i64 = 7;

#[derive(Debug)]
pub struct CalendarModule {
    name: String,
    interval: Duration,
    time_format: String,
    date_format: String,
    locale: Locale,
    source: Box<dyn CalendarSource>,
    lines: Vec<String>,
    expanded: bool,
}

impl CalendarModule {
    pub fn new(name: impl Into<String>, source: Box<dyn CalendarSource>) -> Self {
        Self {
            name: name.into(),
            interval: DEFAULT_INTERVAL,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            locale: Locale::en_US,
            source,
            lines: Vec::new(),
            expanded: false,
        }
    }

    pub fn from_params(params: &ModuleParams, interval: Option<Duration>) -> Result<Self, ConfigError> {
        let time_format = checked_format(params, "time_format", DEFAULT_TIME_FORMAT)?;
        let date_format = checked_format(params, "date_format", DEFAULT_DATE_FORMAT)?;
        let credentials_path =
            expand_home(&params.get_or("credentials_path", DEFAULT_CREDENTIALS_PATH));
        let calendars = params.list("calendars");
        let locale = configured_locale(params);

        let module = Self::new(
            params.module(),
            Box::new(GoogleCalendarSource::new(credentials_path, calendars)),
        )
        .with_formats(time_format, date_format)
        .with_locale(locale);

        Ok(match interval {
            Some(interval) => module.with_interval(interval),
            None => module,
        })
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_formats(mut self, time_format: impl Into<String>, date_format: impl Into<String>) -> Self {
        self.time_format = time_format.into();
        self.date_format = date_format.into();
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    /// Fetch the coming week and keep the lines for its first busy day.
    pub async fn refresh_at<Tz>(&mut self, now: DateTime<Tz>) -> Result<(), UpdateError>
    where
        Tz: TimeZone + Send + Sync,
        Tz::Offset: std::fmt::Display + Send + Sync,
    {
        let from = now.with_timezone(&Utc);
        let until = from + chrono::Duration::days(LOOKAHEAD_DAYS);

        let events = self.source.events_between(from, until).await?;
        self.lines = upcoming_lines(&events, &now, &self.time_format, &self.date_format, self.locale);
        Ok(())
    }

    fn status(&self) -> Option<String> {
        match self.lines.as_slice() {
            [] => None,
            [only] => Some(only.clone()),
            lines if self.expanded => Some(lines.join("  ")),
            [first, rest @ ..] => Some(format!("{} (+{})", first, rest.len())),
        }
    }
}

fn checked_format(params: &ModuleParams, key: &str, default: &str) -> Result<String, ConfigError> {
    let format = params.get_or(key, default);
    if is_valid_format(&format) {
        Ok(format)
    } else {
        Err(ConfigError::InvalidParameter {
            module: params.module().to_string(),
            parameter: key.to_string(),
            reason: format!("'{}' is not a valid strftime format", format),
        })
    }
}

/// The `locale` parameter, else the environment's time locale, else `en_US`.
fn configured_locale(params: &ModuleParams) -> Locale {
    let requested = params.get("locale").map(String::from).or_else(|| {
        ["LC_ALL", "LC_TIME", "LANG"]
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
    });

    match requested {
        Some(name) => parse_locale(&name).unwrap_or_else(|| {
            warn!("Unknown locale '{}' for {}, using en_US", name, params.module());
            Locale::en_US
        }),
        None => Locale::en_US,
    }
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix('~'), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest.trim_start_matches('/')),
        _ => Path::new(path).to_path_buf(),
    }
}

#[async_trait]
impl StatusModule for CalendarModule {
    fn descriptor(&self) -> ModuleDescriptor {
        ModuleDescriptor::new(self.name.clone(), self.interval)
    }

    async fn update(&mut self) -> Result<(), UpdateError> {
        self.refresh_at(Local::now()).await
    }

    fn render(&self, _widget_id: &str) -> WidgetRender {
        match self.status() {
            Some(text) => WidgetRender::shown(text),
            None => WidgetRender::hidden(),
        }
    }

    async fn on_input(&mut self, _event: &InputEvent) -> Result<(), InputError> {
        self.expanded = !self.expanded;
        Ok(())
    }

    fn bindings(&self) -> Vec<InputBinding> {
        vec![InputBinding::new(self.name.clone(), MouseButton::Left, InputAction::Module).waiting()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct FakeCalendar {
        events: Vec<CalendarEvent>,
        windows: Mutex<Vec<(DateTime<Utc>, DateTime<Utc>)>>,
    }

    #[async_trait]
    impl CalendarSource for FakeCalendar {
        async fn events_between(
            &self,
            from: DateTime<Utc>,
            until: DateTime<Utc>,
        ) -> Result<Vec<CalendarEvent>, UpdateError> {
            self.windows.lock().unwrap().push((from, until));
            Ok(self.events.clone())
        }
    }

    fn at(rfc3339: &str, summary: &str) -> CalendarEvent {
        CalendarEvent {
            start: EventStart::At(DateTime::parse_from_rfc3339(rfc3339).unwrap()),
            summary: summary.to_string(),
        }
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-03-04T08:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn module_with(events: Vec<CalendarEvent>) -> CalendarModule {
        CalendarModule::new(
            "gcalendar",
            Box::new(FakeCalendar {
                events,
                ..Default::default()
            }),
        )
    }

    #[tokio::test]
    async fn test_collapsed_shows_first_and_count() {
        let mut module = module_with(vec![
            at("2024-03-04T09:30:00Z", "Standup"),
            at("2024-03-04T13:00:00Z", "Lunch"),
            at("2024-03-04T15:00:00Z", "Review"),
        ]);

        module.refresh_at(now()).await.unwrap();
        assert_eq!(module.render("gcalendar").text, "09:30 Standup (+2)");
    }

    #[tokio::test]
    async fn test_click_expands_full_list() {
        let mut module = module_with(vec![
            at("2024-03-04T09:30:00Z", "Standup"),
            at("2024-03-04T15:00:00Z", "Review"),
        ]);
        module.refresh_at(now()).await.unwrap();

        module
            .on_input(&InputEvent::new("gcalendar", MouseButton::Left))
            .await
            .unwrap();
        assert_eq!(module.render("gcalendar").text, "09:30 Standup  15:00 Review");

        module
            .on_input(&InputEvent::new("gcalendar", MouseButton::Left))
            .await
            .unwrap();
        assert_eq!(module.render("gcalendar").text, "09:30 Standup (+1)");
    }

    #[tokio::test]
    async fn test_single_event_and_empty_week() {
        let mut module = module_with(vec![at("2024-03-04T09:30:00Z", "Standup")]);
        module.refresh_at(now()).await.unwrap();
        assert_eq!(module.render("gcalendar").text, "09:30 Standup");

        let mut empty = module_with(vec![]);
        empty.refresh_at(now()).await.unwrap();
        assert!(!empty.render("gcalendar").visible);
    }

    #[tokio::test]
    async fn test_queries_one_week_ahead() {
        let source = std::sync::Arc::new(FakeCalendar::default());

        #[derive(Debug)]
        struct Shared(std::sync::Arc<FakeCalendar>);

        #[async_trait]
        impl CalendarSource for Shared {
            async fn events_between(
                &self,
                from: DateTime<Utc>,
                until: DateTime<Utc>,
            ) -> Result<Vec<CalendarEvent>, UpdateError> {
                self.0.events_between(from, until).await
            }
        }

        let mut module = CalendarModule::new("gcalendar", Box::new(Shared(source.clone())));
        module.refresh_at(now()).await.unwrap();

        let windows = source.windows.lock().unwrap();
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].0, now());
        assert_eq!(windows[0].1 - windows[0].0, chrono::Duration::days(7));
    }

    #[test]
    fn test_click_binding_waits() {
        let module = module_with(vec![]);
        let bindings = module.bindings();

        assert_eq!(bindings.len(), 1);
        assert!(bindings[0].wait);
        assert!(matches!(bindings[0].action, InputAction::Module));
    }

    #[test]
    fn test_from_params() {
        let params = ModuleParams::new(
            "cal",
            HashMap::from([
                ("time_format".to_string(), "%I:%M %p".to_string()),
                ("calendars".to_string(), "Work, Family".to_string()),
            ]),
        );
        let module = CalendarModule::from_params(&params, None).unwrap();

        assert_eq!(module.time_format, "%I:%M %p");
        assert_eq!(module.date_format, DEFAULT_DATE_FORMAT);
        assert_eq!(module.descriptor().interval, DEFAULT_INTERVAL);
    }

    #[test]
    fn test_locale_parameter() {
        let params = |locale: &str| {
            ModuleParams::new("cal", HashMap::from([("locale".to_string(), locale.to_string())]))
        };

        assert_eq!(CalendarModule::from_params(&params("de_DE.UTF-8"), None).unwrap().locale, Locale::de_DE);
        assert_eq!(CalendarModule::from_params(&params("klingon"), None).unwrap().locale, Locale::en_US);
    }

    #[tokio::test]
    async fn test_localized_date_line() {
        let mut module = module_with(vec![at("2024-03-06T09:00:00Z", "Planung")])
            .with_formats("%H:%M", "%a %d.%m.")
            .with_locale(Locale::de_DE);

        module.refresh_at(now()).await.unwrap();
        assert_eq!(module.render("gcalendar").text, "Mi 06.03. 09:00 Planung");
    }

    #[test]
    fn test_bad_format_is_rejected() {
        let params = ModuleParams::new(
            "cal",
            HashMap::from([("date_format".to_string(), "%Q".to_string())]),
        );
        assert!(matches!(
            CalendarModule::from_params(&params, None),
            Err(ConfigError::InvalidParameter { parameter, .. }) if parameter == "date_format"
        ));
    }

    #[test]
    fn test_expand_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/"), home);
            assert_eq!(expand_home("~/.config/cal"), home.join(".config/cal"));
        }
        assert_eq!(expand_home("/etc/cal"), PathBuf::from("/etc/cal"));
    }
}
