use std::fmt::Debug;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use tracing::debug;

use super::events::{CalendarEvent, EventStart};
use crate::error::UpdateError;

const API_BASE: &str = "https://www.googleapis.com/calendar/v3";
pub const TOKEN_FILE: &str = ".gcalendar_token.json";

/// Where calendar events come from.
#[async_trait]
pub trait CalendarSource: Send + Sync + Debug {
    async fn events_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, UpdateError>;
}

#[derive(Debug, Deserialize)]
struct TokenFile {
    token: Option<String>,
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CalendarList {
    #[serde(default)]
    items: Vec<CalendarListEntry>,
}

#[derive(Debug, Deserialize)]
struct CalendarListEntry {
    id: String,
    #[serde(default)]
    summary: String,
}

#[derive(Debug, Deserialize)]
struct EventList {
    #[serde(default)]
    items: Vec<ApiEvent>,
}

#[derive(Debug, Deserialize)]
struct ApiEvent {
    #[serde(default)]
    summary: String,
    start: ApiEventStart,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiEventStart {
    date_time: Option<String>,
    date: Option<String>,
}

impl ApiEvent {
    fn into_event(self) -> Result<CalendarEvent, UpdateError> {
        let start = match (self.start.date_time, self.start.date) {
            (Some(at), _) => EventStart::At(
                DateTime::parse_from_rfc3339(&at)
                    .map_err(|e| UpdateError::Decode(format!("event start '{}': {}", at, e)))?,
            ),
            (None, Some(day)) => EventStart::AllDay(
                NaiveDate::parse_from_str(&day, "%Y-%m-%d")
                    .map_err(|e| UpdateError::Decode(format!("event date '{}': {}", day, e)))?,
            ),
            (None, None) => {
                return Err(UpdateError::Decode(format!(
                    "event '{}' has no start",
                    self.summary
                )))
            }
        };

        Ok(CalendarEvent {
            start,
            summary: self.summary,
        })
    }
}

/// Google Calendar v3 over HTTPS with a stored OAuth access token.
///
/// The token is read from `.gcalendar_token.json` in the credentials
/// directory on every update, so an external helper can refresh it.
#[derive(Debug, Clone)]
pub struct GoogleCalendarSource {
    client: reqwest::Client,
    credentials_path: PathBuf,
    calendars: Option<Vec<String>>,
}

impl GoogleCalendarSource {
    pub fn new(credentials_path: PathBuf, calendars: Option<Vec<String>>) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials_path,
            calendars,
        }
    }

    async fn access_token(&self) -> Result<String, UpdateError> {
        let path = self.credentials_path.join(TOKEN_FILE);
        let raw = tokio::fs::read_to_string(&path).await.map_err(|e| {
            UpdateError::Auth(format!("cannot read {}: {}", path.display(), e))
        })?;

        let file: TokenFile = serde_json::from_str(&raw)
            .map_err(|e| UpdateError::Auth(format!("malformed {}: {}", path.display(), e)))?;

        file.token
            .or(file.access_token)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| UpdateError::Auth(format!("no access token in {}", path.display())))
    }

    fn endpoint(segments: &[&str]) -> Result<Url, UpdateError> {
        let mut url = Url::parse(API_BASE).map_err(|e| UpdateError::Decode(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| UpdateError::Decode("API base cannot take a path".to_string()))?
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T>(&self, url: Url, token: &str) -> Result<T, UpdateError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self.client.get(url).bearer_auth(token).send().await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(UpdateError::Auth(format!(
                "calendar API answered {}",
                response.status()
            ))),
            status if !status.is_success() => Err(UpdateError::Unavailable(format!(
                "calendar API answered {}",
                status
            ))),
            _ => Ok(response.json::<T>().await?),
        }
    }

    fn is_selected(&self, entry: &CalendarListEntry) -> bool {
        match &self.calendars {
            Some(names) => names.iter().any(|name| name == &entry.summary),
            None => true,
        }
    }
}

#[async_trait]
impl CalendarSource for GoogleCalendarSource {
    async fn events_between(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, UpdateError> {
        let token = self.access_token().await?;

        let list: CalendarList = self
            .get_json(Self::endpoint(&["users", "me", "calendarList"])?, &token)
            .await?;

        let time_min = from.to_rfc3339_opts(SecondsFormat::Secs, true);
        let time_max = until.to_rfc3339_opts(SecondsFormat::Secs, true);
        let mut events = Vec::new();

        for calendar in list.items.iter().filter(|c| self.is_selected(c)) {
            let mut url = Self::endpoint(&["calendars", calendar.id.as_str(), "events"])?;
            url.query_pairs_mut()
                .append_pair("timeMin", &time_min)
                .append_pair("timeMax", &time_max)
                .append_pair("singleEvents", "true")
                .append_pair("orderBy", "startTime");

            let page: EventList = self.get_json(url, &token).await?;
            debug!("📅 Calendar {} returned {} events", calendar.summary, page.items.len());

            for item in page.items {
                events.push(item.into_event()?);
            }
        }

        Ok(events)
    }
}
