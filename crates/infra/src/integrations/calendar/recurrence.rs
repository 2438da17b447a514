//! `RRULE` expansion
//!
//! Recurring events are expanded with the `rrule` crate inside the fetch
//! window only, so a weekly meeting first scheduled years ago costs the same
//! as one created yesterday.

use busylight_domain::CalendarEvent;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rrule::RRuleSet;
use tracing::debug;

use super::ics::{event_id, parse_time, shift, IcsError, Property, DATE_TIME_FORMAT, UTC_DATE_TIME_FORMAT};

/// Upper bound of occurrences produced for one event and window.
pub const MAX_OCCURRENCES: u16 = 1_000;

/// Recurrence data of one master `VEVENT`.
#[derive(Debug, Clone)]
pub struct Recurrence<'a> {
    /// Raw `RRULE` value, e.g. `FREQ=WEEKLY;BYDAY=MO`.
    pub rule: &'a str,
    /// Zone the master's local `DTSTART` is anchored in.
    pub start_zone: Tz,
    /// `DTSTART` was written in UTC form.
    pub start_is_utc: bool,
    /// Occurrence starts to leave out (`EXDATE`s and overridden instances).
    pub excluded: &'a [DateTime<Utc>],
}

impl Recurrence<'_> {
    /// Occurrences of `master` whose span overlaps `[from, to]`.
    ///
    /// Each occurrence keeps the master's summary and length. Local starts
    /// follow the wall clock of `start_zone` across DST changes.
    pub fn expand(
        &self,
        master: &CalendarEvent,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, IcsError> {
        let length = master.end - master.start;
        let set = self
            .to_rrule_text(master.start)?
            .parse::<RRuleSet>()
            .map_err(|e| IcsError::InvalidRecurrence(e.to_string()))?;

        let after = from.checked_sub_signed(length).unwrap_or(from);
        let result = set
            .after(after.with_timezone(&rrule::Tz::UTC))
            .before(to.with_timezone(&rrule::Tz::UTC))
            .all(MAX_OCCURRENCES);

        if result.limited {
            debug!(rule = self.rule, limit = MAX_OCCURRENCES, "recurrence expansion truncated");
        }

        let mut occurrences = Vec::with_capacity(result.dates.len());
        for date in result.dates {
            let start = date.with_timezone(&Utc);
            let end = shift(start, length, self.rule)?;
            if end <= from || start >= to {
                continue;
            }

            let raw_start = start.format(UTC_DATE_TIME_FORMAT).to_string();
            let raw_end = end.format(UTC_DATE_TIME_FORMAT).to_string();
            let id = event_id(&master.summary, &raw_start, &raw_end);
            occurrences.push(CalendarEvent::new(id, master.summary.clone(), start, end));
        }

        Ok(occurrences)
    }

    /// `DTSTART`/`RRULE`/`EXDATE` block in the form `RRuleSet` parses.
    ///
    /// `UNTIL` and `EXDATE` are rewritten in UTC, which `rrule` accepts for
    /// both UTC and zoned starts.
    fn to_rrule_text(&self, start: DateTime<Utc>) -> Result<String, IcsError> {
        let mut text = if self.start_is_utc {
            format!("DTSTART:{}", start.format(UTC_DATE_TIME_FORMAT))
        } else {
            let local = start.with_timezone(&self.start_zone);
            format!("DTSTART;TZID={}:{}", self.start_zone.name(), local.format(DATE_TIME_FORMAT))
        };

        text.push_str("\nRRULE:");
        text.push_str(&self.normalized_rule()?);

        if !self.excluded.is_empty() {
            let dates: Vec<String> = self
                .excluded
                .iter()
                .map(|date| date.format(UTC_DATE_TIME_FORMAT).to_string())
                .collect();
            text.push_str("\nEXDATE:");
            text.push_str(&dates.join(","));
        }

        Ok(text)
    }

    fn normalized_rule(&self) -> Result<String, IcsError> {
        let parts = self
            .rule
            .split(';')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| match part.split_once('=') {
                Some((key, value)) if key.eq_ignore_ascii_case("UNTIL") => {
                    let until = Property {
                        name: "UNTIL".to_string(),
                        params: Vec::new(),
                        value: value.to_string(),
                    };
                    let until = parse_time(&until, self.start_zone)?;
                    Ok(format!("UNTIL={}", until.format(UTC_DATE_TIME_FORMAT)))
                }
                _ => Ok(part.to_string()),
            })
            .collect::<Result<Vec<_>, IcsError>>()?;

        Ok(parts.join(";"))
    }
}
