//! iCalendar feed implementation of the `CalendarSource` port.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use busylight_common::time::{Clock, SystemClock};
use busylight_core::CalendarSource;
use busylight_domain::{BusylightError, CalendarConfig, CalendarEvent, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use reqwest::Method;
use tracing::{debug, instrument, warn};
use url::Url;

use super::ics::{parse_vevents, VEvent};
use crate::http::HttpClient;

/// Calendar source backed by a published `.ics` feed.
pub struct IcsCalendar {
    client: HttpClient,
    source_url: Url,
    timezone: Tz,
    clock: Arc<dyn Clock>,
}

impl IcsCalendar {
    /// # Errors
    /// `BusylightError::Config` for an unparsable URL or an unknown zone.
    pub fn new(source_url: &str, timezone: &str) -> Result<Self> {
        let parsed = Url::parse(source_url.trim()).map_err(|e| {
            BusylightError::Config(format!("invalid calendar source url '{source_url}': {e}"))
        })?;
        let timezone = timezone.trim().parse::<Tz>().map_err(|e| {
            BusylightError::Config(format!("unknown calendar timezone '{timezone}': {e}"))
        })?;

        Ok(Self {
            client: HttpClient::new()?,
            source_url: parsed,
            timezone,
            clock: Arc::new(SystemClock),
        })
    }

    pub fn from_config(config: &CalendarConfig) -> Result<Self> {
        Self::new(&config.source_url, &config.timezone)
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_client(mut self, client: HttpClient) -> Self {
        self.client = client;
        self
    }

    pub fn source_url(&self) -> &Url {
        &self.source_url
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    async fn download(&self) -> Result<String> {
        let request = self.client.request(Method::GET, self.source_url.clone());
        let response = self
            .client
            .send_checked(request)
            .await
            .map_err(|e| BusylightError::Calendar(format!("fetch feed: {e}")))?;

        let body = response
            .text()
            .await
            .map_err(|e| BusylightError::Calendar(format!("read feed body: {e}")))?;

        if !body.contains("BEGIN:VCALENDAR") {
            return Err(BusylightError::Calendar("response is not an iCalendar document".into()));
        }

        Ok(body)
    }
}

#[async_trait]
impl CalendarSource for IcsCalendar {
    #[instrument(skip(self), fields(url = %self.source_url))]
    async fn fetch(&self, limit: chrono::Duration) -> Result<Vec<CalendarEvent>> {
        let body = self.download().await?;
        let now = self.clock.now();
        let events = collect_events(&body, self.timezone, now, now + limit);
        debug!(count = events.len(), "parsed calendar feed");
        Ok(events)
    }
}

/// Events overlapping `[from, to]`, sorted by start with consecutive
/// duplicates removed. Recurring events contribute one event per occurrence
/// inside the window.
pub fn collect_events(
    body: &str,
    zone: Tz,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Vec<CalendarEvent> {
    let vevents = parse_vevents(body);
    let overrides = overridden_starts(&vevents, zone);
    let mut skipped = 0usize;

    let mut events: Vec<CalendarEvent> = vevents
        .iter()
        .filter_map(|raw| {
            let overridden = raw
                .uid
                .as_ref()
                .filter(|_| raw.rrule.is_some())
                .and_then(|uid| overrides.get(uid))
                .map_or(&[][..], Vec::as_slice);
            match raw.occurrences(zone, from, to, overridden) {
                Ok(occurrences) => Some(occurrences),
                Err(err) => {
                    skipped += 1;
                    warn!(
                        summary = raw.summary.as_deref().unwrap_or_default(),
                        error = %err,
                        "skipping calendar event"
                    );
                    None
                }
            }
        })
        .flatten()
        .filter(|event| event.end > from && event.start < to)
        .collect();

    if skipped > 0 {
        warn!(skipped, kept = events.len(), "dropped malformed calendar events");
    }

    events.sort_by_key(|event| event.start);
    events.dedup_by(|later, earlier| later.is_same(earlier));
    events
}

/// Original starts replaced by `RECURRENCE-ID` events, keyed by `UID`.
fn overridden_starts(vevents: &[VEvent], zone: Tz) -> HashMap<String, Vec<DateTime<Utc>>> {
    let mut overrides: HashMap<String, Vec<DateTime<Utc>>> = HashMap::new();

    for raw in vevents {
        let (Some(uid), Some(overridden)) = (raw.uid.as_ref(), raw.overridden_start(zone)) else {
            continue;
        };
        match overridden {
            Ok(start) => overrides.entry(uid.clone()).or_default().push(start),
            Err(err) => debug!(uid, error = %err, "ignoring unreadable RECURRENCE-ID"),
        }
    }

    overrides
}
