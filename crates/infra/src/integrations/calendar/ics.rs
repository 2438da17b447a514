//! Minimal iCalendar (RFC 5545) reader
//!
//! Extracts `VEVENT` boundaries, summaries and recurrence data. Components
//! nested inside an event (`VALARM`) are ignored. Recurring events are
//! expanded by [`super::recurrence`].

use busylight_domain::constants::UNTITLED_EVENT_SUMMARY;
use busylight_domain::CalendarEvent;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;
use tracing::debug;

use super::recurrence::Recurrence;

pub(super) const DATE_TIME_FORMAT: &str = "%Y%m%dT%H%M%S";
pub(super) const UTC_DATE_TIME_FORMAT: &str = "%Y%m%dT%H%M%SZ";
const DATE_FORMAT: &str = "%Y%m%d";

/// Why a `VEVENT` could not be turned into a [`CalendarEvent`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IcsError {
    #[error("missing {0}")]
    MissingProperty(&'static str),

    #[error("invalid date-time '{0}'")]
    InvalidDateTime(String),

    #[error("invalid duration '{0}'")]
    InvalidDuration(String),

    #[error("local time {0} does not exist in {1}")]
    NonexistentLocalTime(String, String),

    #[error("invalid recurrence rule: {0}")]
    InvalidRecurrence(String),
}

/// One unfolded content line: `NAME;PARAM=VALUE:value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub params: Vec<(String, String)>,
    pub value: String,
}

impl Property {
    /// Parse a content line; `None` when it has no name or no `:`.
    pub fn parse(line: &str) -> Option<Self> {
        let mut in_quotes = false;
        let (split, _) = line.char_indices().find(|&(_, c)| match c {
            '"' => {
                in_quotes = !in_quotes;
                false
            }
            ':' => !in_quotes,
            _ => false,
        })?;

        let mut head = line[..split].split(';');
        let name = head.next()?.trim().to_ascii_uppercase();
        if name.is_empty() {
            return None;
        }

        let params = head
            .filter_map(|param| {
                let (key, value) = param.split_once('=')?;
                Some((key.trim().to_ascii_uppercase(), value.trim().trim_matches('"').to_string()))
            })
            .collect();

        Some(Self { name, params, value: line[split + 1..].to_string() })
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// One property per comma separated value, sharing the parameters.
    fn split_values(&self) -> impl Iterator<Item = Self> + '_ {
        self.value.split(',').map(str::trim).filter(|v| !v.is_empty()).map(|value| Self {
            name: self.name.clone(),
            params: self.params.clone(),
            value: value.to_string(),
        })
    }

    pub(super) fn is_date(&self) -> bool {
        self.param("VALUE").is_some_and(|v| v.eq_ignore_ascii_case("DATE"))
            || self.value.trim().len() == DATE_FORMAT_LEN
    }
}

const DATE_FORMAT_LEN: usize = 8;

/// Raw `VEVENT` as found in the feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VEvent {
    pub uid: Option<String>,
    pub summary: Option<String>,
    pub start: Option<Property>,
    pub end: Option<Property>,
    pub duration: Option<Property>,
    pub rrule: Option<String>,
    pub exdates: Vec<Property>,
    pub recurrence_id: Option<Property>,
}

impl VEvent {
    fn apply(&mut self, prop: &Property) {
        match prop.name.as_str() {
            "UID" => self.uid = Some(prop.value.trim().to_string()),
            "SUMMARY" => self.summary = Some(unescape_text(&prop.value)),
            "DTSTART" => self.start = Some(prop.clone()),
            "DTEND" => self.end = Some(prop.clone()),
            "DURATION" => self.duration = Some(prop.clone()),
            "RRULE" => self.rrule = Some(prop.value.trim().to_string()),
            "EXDATE" => self.exdates.push(prop.clone()),
            "RECURRENCE-ID" => self.recurrence_id = Some(prop.clone()),
            _ => {}
        }
    }

    /// Start instants removed from the recurrence set by `EXDATE`.
    pub fn exclusions(&self, zone: Tz) -> Result<Vec<DateTime<Utc>>, IcsError> {
        self.exdates
            .iter()
            .flat_map(Property::split_values)
            .map(|value| parse_time(&value, zone))
            .collect()
    }

    /// Original start of the occurrence this event overrides, if any.
    pub fn overridden_start(&self, zone: Tz) -> Option<Result<DateTime<Utc>, IcsError>> {
        self.recurrence_id.as_ref().map(|prop| parse_time(prop, zone))
    }

    /// Occurrences overlapping `[from, to]`.
    ///
    /// A plain event yields itself whatever the window; a recurring one is
    /// expanded inside the window, skipping `EXDATE`s and the starts listed
    /// in `overridden`.
    pub fn occurrences(
        &self,
        zone: Tz,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        overridden: &[DateTime<Utc>],
    ) -> Result<Vec<CalendarEvent>, IcsError> {
        let master = self.resolve(zone)?;
        let (Some(rule), Some(start_prop)) = (self.rrule.as_deref(), self.start.as_ref()) else {
            return Ok(vec![master]);
        };

        let mut excluded = self.exclusions(zone)?;
        excluded.extend_from_slice(overridden);

        let recurrence = Recurrence {
            rule,
            start_zone: start_zone(start_prop, zone),
            start_is_utc: !start_prop.is_date() && start_prop.value.trim().ends_with('Z'),
            excluded: &excluded,
        };
        recurrence.expand(&master, from, to)
    }

    /// Resolve into a domain event.
    ///
    /// Floating and all-day times, and times with an unknown `TZID`, are
    /// read in `zone`. Without `DTEND` the end comes from `DURATION`; an
    /// all-day event with neither lasts one day.
    pub fn resolve(&self, zone: Tz) -> Result<CalendarEvent, IcsError> {
        let start_prop = self.start.as_ref().ok_or(IcsError::MissingProperty("DTSTART"))?;
        let start = parse_time(start_prop, zone)?;

        let (end, raw_end) = match (&self.end, &self.duration) {
            (Some(end), _) => (parse_time(end, zone)?, end.value.as_str()),
            (None, Some(duration)) => {
                let length = parse_duration(&duration.value)?;
                (shift(start, length, &duration.value)?, duration.value.as_str())
            }
            (None, None) if start_prop.is_date() => {
                (shift(start, Duration::days(1), &start_prop.value)?, "")
            }
            (None, None) => return Err(IcsError::MissingProperty("DTEND")),
        };

        let summary = self
            .summary
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(UNTITLED_EVENT_SUMMARY);
        let id = event_id(summary, &start_prop.value, raw_end);

        Ok(CalendarEvent::new(id, summary, start, end))
    }
}

/// Join continuation lines (leading space or tab) onto their predecessor.
pub fn unfold(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();

    for raw in text.split('\n') {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);

        if let Some(rest) = raw.strip_prefix(|c| c == ' ' || c == '\t') {
            if let Some(last) = lines.last_mut() {
                last.push_str(rest);
                continue;
            }
        }

        if !raw.is_empty() {
            lines.push(raw.to_string());
        }
    }

    lines
}

/// Every top-level `VEVENT` in the document, in feed order.
pub fn parse_vevents(text: &str) -> Vec<VEvent> {
    let mut events = Vec::new();
    let mut current: Option<VEvent> = None;
    let mut nested = 0usize;

    for line in unfold(text) {
        let Some(prop) = Property::parse(&line) else {
            continue;
        };

        if current.is_none() {
            if prop.name == "BEGIN" && prop.value.trim().eq_ignore_ascii_case("VEVENT") {
                current = Some(VEvent::default());
                nested = 0;
            }
            continue;
        }

        match prop.name.as_str() {
            "BEGIN" => nested += 1,
            "END" if nested > 0 => nested -= 1,
            "END" => {
                if prop.value.trim().eq_ignore_ascii_case("VEVENT") {
                    events.extend(current.take());
                }
            }
            _ if nested == 0 => {
                if let Some(event) = current.as_mut() {
                    event.apply(&prop);
                }
            }
            _ => {}
        }
    }

    events
}

/// Parse an RFC 5545 `DURATION` value such as `PT1H30M` or `-P1W`.
pub fn parse_duration(value: &str) -> Result<Duration, IcsError> {
    let invalid = || IcsError::InvalidDuration(value.to_string());
    let raw = value.trim();

    let (negative, rest) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let rest = rest.strip_prefix('P').ok_or_else(invalid)?;

    let mut total = Duration::zero();
    let mut digits = String::new();
    let mut in_time = false;
    let mut seen_component = false;

    for c in rest.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        if c == 'T' && !in_time && digits.is_empty() {
            in_time = true;
            continue;
        }

        let n: i64 = digits.parse().map_err(|_| invalid())?;
        digits.clear();
        let part = match (c, in_time) {
            ('W', false) => Duration::try_weeks(n),
            ('D', false) => Duration::try_days(n),
            ('H', true) => Duration::try_hours(n),
            ('M', true) => Duration::try_minutes(n),
            ('S', true) => Duration::try_seconds(n),
            _ => None,
        }
        .ok_or_else(invalid)?;
        total = total.checked_add(&part).ok_or_else(invalid)?;
        seen_component = true;
    }

    if !digits.is_empty() || !seen_component {
        return Err(invalid());
    }

    Ok(if negative { -total } else { total })
}

/// `start + length`, or `InvalidDateTime` naming `raw` when out of range.
pub(super) fn shift(
    start: DateTime<Utc>,
    length: Duration,
    raw: &str,
) -> Result<DateTime<Utc>, IcsError> {
    start.checked_add_signed(length).ok_or_else(|| IcsError::InvalidDateTime(raw.to_string()))
}

pub(super) fn parse_time(prop: &Property, default_zone: Tz) -> Result<DateTime<Utc>, IcsError> {
    let value = prop.value.trim();
    let invalid = || IcsError::InvalidDateTime(value.to_string());
    let zone = start_zone(prop, default_zone);

    if prop.is_date() {
        let date = NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| invalid())?;
        let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(invalid)?;
        return localize(midnight, zone);
    }

    if let Some(utc) = value.strip_suffix('Z') {
        let naive = NaiveDateTime::parse_from_str(utc, DATE_TIME_FORMAT).map_err(|_| invalid())?;
        return Ok(Utc.from_utc_datetime(&naive));
    }

    let naive = NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT).map_err(|_| invalid())?;
    localize(naive, zone)
}

/// Zone a local value of `prop` is read in.
fn start_zone(prop: &Property, default_zone: Tz) -> Tz {
    prop.param("TZID").map_or(default_zone, |tzid| resolve_tzid(tzid, default_zone))
}

fn resolve_tzid(tzid: &str, default_zone: Tz) -> Tz {
    // Some producers prefix Olson names with a slash.
    tzid.trim().trim_start_matches('/').parse::<Tz>().unwrap_or_else(|_| {
        debug!(tzid, fallback = default_zone.name(), "unknown TZID, using default zone");
        default_zone
    })
}

fn localize(naive: NaiveDateTime, zone: Tz) -> Result<DateTime<Utc>, IcsError> {
    zone.from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| IcsError::NonexistentLocalTime(naive.to_string(), zone.name().to_string()))
}

fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n' | 'N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }

    out
}

/// Stable non-zero identity from the summary and the raw boundaries.
pub(super) fn event_id(summary: &str, raw_start: &str, raw_end: &str) -> u64 {
    let mut hasher = blake3::Hasher::new();
    for part in [raw_start, raw_end, summary] {
        hasher.update(part.as_bytes());
        hasher.update(&[0x1f]);
    }

    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&hasher.finalize().as_bytes()[..8]);
    u64::from_le_bytes(prefix).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn vevent(body: &str) -> VEvent {
        let doc = format!("BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\n{body}\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n");
        let mut events = parse_vevents(&doc);
        assert_eq!(events.len(), 1);
        events.remove(0)
    }

    #[test]
    fn unfolds_continuation_lines() {
        let lines = unfold("SUMMARY:Quarterly\r\n  planning\r\n\tsession\r\nDTSTART:20240415T090000Z\n");
        assert_eq!(lines, vec!["SUMMARY:Quarterly planningsession", "DTSTART:20240415T090000Z"]);
    }

    #[test]
    fn property_parse_handles_quoted_params() {
        let prop = Property::parse(r#"DTSTART;TZID="America/New_York":20240415T090000"#).unwrap();
        assert_eq!(prop.name, "DTSTART");
        assert_eq!(prop.param("TZID"), Some("America/New_York"));
        assert_eq!(prop.value, "20240415T090000");

        let prop = Property::parse("ATTENDEE;CN=\"Doe: Jane\":mailto:jane@example.com").unwrap();
        assert_eq!(prop.param("CN"), Some("Doe: Jane"));
        assert_eq!(prop.value, "mailto:jane@example.com");

        assert!(Property::parse("no separator here").is_none());
    }

    #[test]
    fn nested_components_do_not_leak_into_event() {
        let doc = "BEGIN:VCALENDAR\nBEGIN:VEVENT\nSUMMARY:Standup\nDTSTART:20240415T090000Z\n\
                   DTEND:20240415T091500Z\nBEGIN:VALARM\nSUMMARY:Reminder\nDTSTART:20240415T085500Z\n\
                   END:VALARM\nEND:VEVENT\nBEGIN:VTODO\nSUMMARY:Not an event\nEND:VTODO\nEND:VCALENDAR\n";

        let events = parse_vevents(doc);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].summary.as_deref(), Some("Standup"));
        assert_eq!(events[0].start.as_ref().unwrap().value, "20240415T090000Z");
    }

    #[test]
    fn resolves_utc_times() {
        let event = vevent("SUMMARY:Sync\r\nDTSTART:20240415T090000Z\r\nDTEND:20240415T093000Z")
            .resolve(Tz::UTC)
            .unwrap();
        assert_eq!(event.start, utc(2024, 4, 15, 9, 0));
        assert_eq!(event.end, utc(2024, 4, 15, 9, 30));
        assert_eq!(event.summary, "Sync");
        assert_ne!(event.id, 0);
    }

    #[test]
    fn resolves_tzid_and_floating_times() {
        let tzid = vevent("DTSTART;TZID=Europe/Berlin:20240701T090000\nDTEND;TZID=/Europe/Berlin:20240701T100000")
            .resolve(Tz::UTC)
            .unwrap();
        assert_eq!(tzid.start, utc(2024, 7, 1, 7, 0));
        assert_eq!(tzid.end, utc(2024, 7, 1, 8, 0));

        let floating = vevent("DTSTART:20240115T090000\nDTEND:20240115T100000")
            .resolve(chrono_tz::Europe::Berlin)
            .unwrap();
        assert_eq!(floating.start, utc(2024, 1, 15, 8, 0));

        let unknown = vevent("DTSTART;TZID=W. Europe Standard Time:20240115T090000\nDTEND:20240115T100000Z")
            .resolve(chrono_tz::Europe::Berlin)
            .unwrap();
        assert_eq!(unknown.start, utc(2024, 1, 15, 8, 0));
    }

    #[test]
    fn all_day_events_span_local_days() {
        let event = vevent("DTSTART;VALUE=DATE:20240415").resolve(chrono_tz::Europe::Berlin).unwrap();
        assert_eq!(event.start, utc(2024, 4, 14, 22, 0));
        assert_eq!(event.end, utc(2024, 4, 15, 22, 0));
    }

    #[test]
    fn duration_fills_missing_end() {
        let event = vevent("DTSTART:20240415T090000Z\nDURATION:PT1H30M").resolve(Tz::UTC).unwrap();
        assert_eq!(event.end, utc(2024, 4, 15, 10, 30));
    }

    #[test]
    fn shift_reports_overflow_instead_of_panicking() {
        assert_eq!(
            shift(DateTime::<Utc>::MAX_UTC, Duration::days(1), "20240415"),
            Err(IcsError::InvalidDateTime("20240415".to_string()))
        );
        assert_eq!(
            shift(utc(2024, 4, 15, 0, 0), Duration::days(1), "20240415"),
            Ok(utc(2024, 4, 16, 0, 0))
        );
    }

    #[test]
    fn recurrence_properties_are_collected() {
        let event = vevent(
            "UID:standup@example.com\nDTSTART;TZID=Europe/Berlin:20240101T091500\n\
             DTEND;TZID=Europe/Berlin:20240101T093000\nRRULE:FREQ=WEEKLY;BYDAY=MO\n\
             EXDATE;TZID=Europe/Berlin:20240408T091500,20240415T091500\nEXDATE:20240422T071500Z",
        );

        assert_eq!(event.uid.as_deref(), Some("standup@example.com"));
        assert_eq!(event.rrule.as_deref(), Some("FREQ=WEEKLY;BYDAY=MO"));
        assert_eq!(
            event.exclusions(Tz::UTC).unwrap(),
            vec![utc(2024, 4, 8, 7, 15), utc(2024, 4, 15, 7, 15), utc(2024, 4, 22, 7, 15)]
        );
        assert!(event.overridden_start(Tz::UTC).is_none());
    }

    #[test]
    fn recurrence_id_names_the_overridden_start() {
        let event = vevent(
            "UID:standup@example.com\nRECURRENCE-ID;TZID=Europe/Berlin:20240415T091500\n\
             DTSTART;TZID=Europe/Berlin:20240415T140000\nDTEND;TZID=Europe/Berlin:20240415T141500",
        );
        assert_eq!(event.overridden_start(Tz::UTC), Some(Ok(utc(2024, 4, 15, 7, 15))));
    }

    #[test]
    fn missing_boundaries_are_errors() {
        assert_eq!(
            vevent("SUMMARY:No start\nDTEND:20240415T090000Z").resolve(Tz::UTC),
            Err(IcsError::MissingProperty("DTSTART"))
        );
        assert_eq!(
            vevent("SUMMARY:No end\nDTSTART:20240415T090000Z").resolve(Tz::UTC),
            Err(IcsError::MissingProperty("DTEND"))
        );
        assert!(matches!(
            vevent("DTSTART:2024-04-15\nDTEND:20240415T090000Z").resolve(Tz::UTC),
            Err(IcsError::InvalidDateTime(_))
        ));
    }

    #[test]
    fn skipped_local_time_is_rejected() {
        let result = vevent("DTSTART;TZID=Europe/Berlin:20240331T023000\nDTEND:20240331T040000Z")
            .resolve(Tz::UTC);
        assert!(matches!(result, Err(IcsError::NonexistentLocalTime(_, zone)) if zone == "Europe/Berlin"));
    }

    #[test]
    fn summary_is_unescaped_and_defaulted() {
        let event = vevent(r"SUMMARY:Design review\, part 2\; final\nroom 4\\B
DTSTART:20240415T090000Z
DTEND:20240415T100000Z")
        .resolve(Tz::UTC)
        .unwrap();
        assert_eq!(event.summary, "Design review, part 2; final\nroom 4\\B");

        let untitled =
            vevent("SUMMARY:  \nDTSTART:20240415T090000Z\nDTEND:20240415T100000Z").resolve(Tz::UTC).unwrap();
        assert_eq!(untitled.summary, "n/a");
    }

    #[test]
    fn identity_depends_on_summary_and_raw_boundaries() {
        let a = event_id("Sync", "20240415T090000Z", "20240415T093000Z");
        assert_eq!(a, event_id("Sync", "20240415T090000Z", "20240415T093000Z"));
        assert_ne!(a, event_id("Sync", "20240415T090000Z", "20240415T094500Z"));
        assert_ne!(a, event_id("Retro", "20240415T090000Z", "20240415T093000Z"));
        // Field boundaries are kept apart.
        assert_ne!(event_id("b", "a", ""), event_id("", "a", "b"));
    }

    #[test]
    fn parses_rfc5545_durations() {
        assert_eq!(parse_duration("PT15M"), Ok(Duration::minutes(15)));
        assert_eq!(parse_duration("P1DT2H"), Ok(Duration::hours(26)));
        assert_eq!(parse_duration("+P2W"), Ok(Duration::weeks(2)));
        assert_eq!(parse_duration("-PT30S"), Ok(Duration::seconds(-30)));

        for bad in ["", "P", "PT", "1H", "PT1", "P1H", "PT1D", "PT99999999999999999999S"] {
            assert!(parse_duration(bad).is_err(), "{bad:?} should be rejected");
        }
    }
}
