use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Locale, NaiveDate, TimeZone};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventStart {
    At(DateTime<FixedOffset>),
    AllDay(NaiveDate),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub start: EventStart,
    pub summary: String,
}

pub fn is_valid_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// Parse a POSIX locale name such as `de_DE.UTF-8` or `sr_RS@latin`.
/// The codeset is ignored.
pub fn parse_locale(name: &str) -> Option<Locale> {
    let name = name.trim();
    let base = name.split('.').next().unwrap_or(name);
    let modifier = name.split_once('@').map(|(_, m)| m);
    if base == "C" || base == "POSIX" {
        return Some(Locale::POSIX);
    }

    let candidate = match modifier {
        Some(modifier) if !base.contains('@') => format!("{}@{}", base, modifier),
        _ => base.to_string(),
    };
    Locale::try_from(candidate.as_str()).ok()
}

/// Lines for the next day that has timed events, starting at `now`.
///
/// All-day events are skipped. The first line carries the date unless that
/// day is today; the rest of the day only shows times. Day and month names
/// follow `locale`.
pub fn upcoming_lines<Tz>(
    events: &[CalendarEvent],
    now: &DateTime<Tz>,
    time_format: &str,
    date_format: &str,
    locale: Locale,
) -> Vec<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let zone = now.timezone();
    let mut timed: Vec<(DateTime<Tz>, &str)> = events
        .iter()
        .filter_map(|event| match event.start {
            EventStart::At(start) => Some((start.with_timezone(&zone), event.summary.as_str())),
            EventStart::AllDay(_) => None,
        })
        .filter(|(start, _)| start >= now)
        .collect();
    timed.sort_by(|a, b| a.0.cmp(&b.0));

    let today = now.date_naive();
    let with_date = format!("{} {}", date_format, time_format);
    let mut day: Option<NaiveDate> = None;
    let mut lines = Vec::new();

    for (start, summary) in timed {
        let date = start.date_naive();
        if day.is_some_and(|d| d != date) {
            break;
        }

        let format = if date == today || day.is_some() {
            time_format
        } else {
            with_date.as_str()
        };
        lines.push(format!("{} {}", start.format_localized(format, locale), summary));
        day = Some(date);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn at(rfc3339: &str, summary: &str) -> CalendarEvent {
        CalendarEvent {
            start: EventStart::At(DateTime::parse_from_rfc3339(rfc3339).unwrap()),
            summary: summary.to_string(),
        }
    }

    fn now(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_today_shows_times_only() {
        let events = vec![
            at("2024-03-04T15:00:00Z", "Review"),
            at("2024-03-04T09:30:00Z", "Standup"),
            at("2024-03-05T10:00:00Z", "Tomorrow"),
        ];

        let lines = upcoming_lines(&events, &now("2024-03-04T08:00:00Z"), "%H:%M", "%d.%m.%y", Locale::en_US);
        assert_eq!(lines, vec!["09:30 Standup", "15:00 Review"]);
    }

    #[test]
    fn test_past_and_all_day_events_are_skipped() {
        let events = vec![
            at("2024-03-04T07:00:00Z", "Already over"),
            CalendarEvent {
                start: EventStart::AllDay(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()),
                summary: "Holiday".to_string(),
            },
            at("2024-03-04T12:00:00Z", "Lunch"),
        ];

        let lines = upcoming_lines(&events, &now("2024-03-04T08:00:00Z"), "%H:%M", "%d.%m.%y", Locale::en_US);
        assert_eq!(lines, vec!["12:00 Lunch"]);
    }

    #[test]
    fn test_later_day_gets_date_on_first_line() {
        let events = vec![
            at("2024-03-07T11:00:00Z", "Retro"),
            at("2024-03-06T16:00:00Z", "Demo"),
            at("2024-03-06T09:00:00Z", "Planning"),
        ];

        let lines = upcoming_lines(&events, &now("2024-03-04T08:00:00Z"), "%H:%M", "%d.%m.%y", Locale::en_US);
        assert_eq!(lines, vec!["06.03.24 09:00 Planning", "16:00 Demo"]);
    }

    #[test]
    fn test_events_are_shown_in_local_time_of_now() {
        let events = vec![at("2024-03-04T23:30:00Z", "Late call")];
        let berlin_now = DateTime::parse_from_rfc3339("2024-03-04T20:00:00+01:00").unwrap();

        // 23:30Z is already the next day at +01:00.
        let lines = upcoming_lines(&events, &berlin_now, "%H:%M", "%d.%m.%y", Locale::en_US);
        assert_eq!(lines, vec!["05.03.24 00:30 Late call"]);
    }

    #[test]
    fn test_names_follow_locale() {
        let events = vec![at("2024-03-06T09:00:00Z", "Planning")];
        let now = now("2024-03-04T08:00:00Z");

        let german = upcoming_lines(&events, &now, "%H:%M", "%A %d. %B", Locale::de_DE);
        assert_eq!(german, vec!["Mittwoch 06. März 09:00 Planning"]);

        let english = upcoming_lines(&events, &now, "%H:%M", "%A %d. %B", Locale::en_US);
        assert_eq!(english, vec!["Wednesday 06. March 09:00 Planning"]);
    }

    #[test]
    fn test_parse_locale() {
        assert_eq!(parse_locale("de_DE"), Some(Locale::de_DE));
        assert_eq!(parse_locale("de_DE.UTF-8"), Some(Locale::de_DE));
        assert_eq!(parse_locale(" fr_BE "), Some(Locale::fr_BE));
        assert_eq!(parse_locale("C.UTF-8"), Some(Locale::POSIX));
        assert_eq!(parse_locale("xx_YY"), None);
    }

    #[test]
    fn test_format_validation() {
        assert!(is_valid_format("%H:%M"));
        assert!(is_valid_format("%d.%m.%y"));
        assert!(!is_valid_format("%Q"));
    }
}
